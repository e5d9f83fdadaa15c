use super::metric::convert_metric_value;
use crate::core::leading_integer;
use serde_json::{Map, Value};

/// One ffprobe record (`format` or an entry of `streams`)
pub type Metadata = Map<String, Value>;

/// Present, non-null value that is not the probe's `"unknown"` marker
fn field<'a>(data: &'a Metadata, key: &str) -> Option<&'a Value> {
    match data.get(key)? {
        Value::Null => None,
        Value::String(s) if s == "unknown" => None,
        value => Some(value),
    }
}

pub(crate) fn text(data: &Metadata, key: &str) -> Option<String> {
    match field(data, key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn float(data: &Metadata, key: &str) -> Option<f64> {
    match field(data, key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn unsigned<T: TryFrom<u64>>(data: &Metadata, key: &str) -> Option<T> {
    float(data, key)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .and_then(|v| T::try_from(v.trunc() as u64).ok())
}

pub(crate) fn metric(data: &Metadata, key: &str) -> Option<u64> {
    text(data, key).and_then(|s| convert_metric_value(&s).ok())
}

/// Frames per second from `avg_frame_rate`, falling back to `r_frame_rate`
///
/// Rates are `num/den` fractions; the result is rounded to two decimals.
pub(crate) fn frame_rate(data: &Metadata) -> f64 {
    let rate = match text(data, "avg_frame_rate") {
        Some(avg) if leading_integer(&avg) > 0 => avg,
        _ => text(data, "r_frame_rate").unwrap_or_default(),
    };

    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().unwrap_or(0.0);
            let den = den.trim().parse::<f64>().unwrap_or(0.0);
            if den > 0.0 { num / den } else { 0.0 }
        }
        None => rate.trim().parse::<f64>().unwrap_or(0.0),
    };

    (value * 100.0).round() / 100.0
}

/// Display rotation in degrees
///
/// Prefers the `rotate` tag; otherwise negates the last display matrix
/// rotation found in `side_data_list`.
pub(crate) fn rotation(data: &Metadata) -> i32 {
    let tagged = data
        .get("tags")
        .and_then(Value::as_object)
        .and_then(|tags| text(tags, "rotate"))
        .map(|rotate| leading_integer(&rotate))
        .unwrap_or(0);

    if tagged != 0 {
        return tagged as i32;
    }

    data.get("side_data_list")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .filter_map(|side| float(side, "rotation"))
        .last()
        .map(|rotation| -rotation.trunc() as i32)
        .unwrap_or(0)
}
