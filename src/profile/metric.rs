use crate::core::leading_integer;
use crate::error::{BuildError, BuildResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

const SUFFIXES: &str = "KMGTP";

/// Parse a value with an optional metric suffix (`128k`, `6M`, `1.5`)
///
/// The suffix is case-insensitive and multiplies the integer prefix by
/// 10^3 (K) up to 10^15 (P). Plain numbers are truncated to integers.
pub fn convert_metric_value(value: &str) -> BuildResult<u64> {
    let value = value.trim();
    let invalid = || BuildError::InvalidProfile(format!("invalid metric value: {:?}", value));

    if let Some(last) = value.chars().last() {
        if value.len() > 1 {
            if let Some(exp) = SUFFIXES.find(last.to_ascii_uppercase()) {
                let prefix = &value[..value.len() - last.len_utf8()];
                if !is_decimal(prefix) {
                    return Err(invalid());
                }
                let number = u64::try_from(leading_integer(prefix)).map_err(|_| invalid())?;
                return 1000u64
                    .checked_pow(exp as u32 + 1)
                    .and_then(|multiplier| number.checked_mul(multiplier))
                    .ok_or_else(invalid);
            }
        }
    }

    if let Ok(number) = value.parse::<u64>() {
        return Ok(number);
    }

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(number.trunc() as u64),
        _ => Err(invalid()),
    }
}

/// Digits with an optional fractional part (`6000`, `1.5`)
fn is_decimal(text: &str) -> bool {
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    !int.is_empty()
        && int.chars().all(|c| c.is_ascii_digit())
        && frac.chars().all(|c| c.is_ascii_digit())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMetric {
    Integer(u64),
    Float(f64),
    Text(String),
}

/// serde helper for optional metric fields
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawMetric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMetric::Integer(number)) => Ok(Some(number)),
        Some(RawMetric::Float(number)) if number >= 0.0 => Ok(Some(number.trunc() as u64)),
        Some(RawMetric::Float(number)) => Err(D::Error::custom(format!(
            "invalid metric value: {}",
            number
        ))),
        Some(RawMetric::Text(text)) => convert_metric_value(&text)
            .map(Some)
            .map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_suffixes() {
        assert_eq!(convert_metric_value("128k").unwrap(), 128_000);
        assert_eq!(convert_metric_value("6000K").unwrap(), 6_000_000);
        assert_eq!(convert_metric_value("2M").unwrap(), 2_000_000);
        assert_eq!(convert_metric_value("1g").unwrap(), 1_000_000_000);
        assert_eq!(convert_metric_value("3T").unwrap(), 3_000_000_000_000);
        assert_eq!(convert_metric_value("1P").unwrap(), 1_000_000_000_000_000);
    }

    #[test]
    fn test_suffix_uses_integer_prefix() {
        assert_eq!(convert_metric_value("1.5M").unwrap(), 1_000_000);
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(convert_metric_value("48000").unwrap(), 48_000);
        assert_eq!(convert_metric_value("7").unwrap(), 7);
        assert_eq!(convert_metric_value("29.97").unwrap(), 29);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            convert_metric_value("fast"),
            Err(BuildError::InvalidProfile(_))
        ));
        assert!(convert_metric_value("").is_err());
        assert!(convert_metric_value("-5k").is_err());
    }

    #[test]
    fn test_suffix_needs_numeric_prefix() {
        for value in ["fast", "5mbit", "k", "1.5.2M", " M", "+5k", ".5k", "12xk"] {
            assert!(
                matches!(convert_metric_value(value), Err(BuildError::InvalidProfile(_))),
                "{value} should be rejected"
            );
        }
        assert_eq!(convert_metric_value("2.5k").unwrap(), 2000);
    }
}
