//! Media profiles: container, video and audio parameters
//!
//! Profiles describe either what a media file is (built from probe metadata)
//! or what it should become (loaded from JSON). Bitrate-like values accept
//! metric suffixes such as `6000k` or `2M`.

mod audio;
mod media;
mod metadata;
mod metric;
mod video;

pub use audio::AudioProfile;
pub use media::MediaProfile;
pub use metadata::Metadata;
pub use metric::convert_metric_value;
pub use video::VideoProfile;

use serde::{Deserialize, Deserializer};

/// Either one value or a list of values
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Deserialize a list that may also be written as a single object
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(values)) => values,
        Some(OneOrMany::One(value)) => vec![value],
        None => Vec::new(),
    })
}
