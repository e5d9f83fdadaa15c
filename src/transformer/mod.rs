//! Turning a target profile into concrete ffmpeg settings
//!
//! [`ProfileTransformer`] compares what a file is with what it should be and
//! produces the profile of the settings to apply, copying streams that need
//! no work. [`CommandTransformer`] writes such a profile into a [`Command`].
//!
//! [`Command`]: crate::command::Command

mod command;
mod profile;

pub use command::CommandTransformer;
pub use profile::ProfileTransformer;

/// Codec value that keeps the stream as is
pub const COPY_CODEC: &str = "copy";

/// Zero-or-missing aware minimum
///
/// Returns the smaller of the two when both are positive, `value` when only
/// it is positive, `threshold` otherwise.
pub(crate) fn least<T: PartialOrd + Copy + Default>(value: Option<T>, threshold: Option<T>) -> Option<T> {
    let zero = T::default();
    match (value.filter(|v| *v > zero), threshold.filter(|t| *t > zero)) {
        (Some(v), Some(t)) => Some(if t < v { t } else { v }),
        (Some(v), None) => Some(v),
        (None, _) => threshold,
    }
}

/// `value > other`, missing values counting as zero
pub(crate) fn exceeds<T: PartialOrd + Copy + Default>(value: Option<T>, other: Option<T>) -> bool {
    value.unwrap_or_default() > other.unwrap_or_default()
}
