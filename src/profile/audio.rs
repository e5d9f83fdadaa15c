use super::metadata::{self, Metadata};
use super::metric;
use serde::{Deserialize, Serialize};

/// Audio stream parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioProfile {
    /// Codec name (`aac`, `copy`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Codec profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Bitrate in bits per second
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitrate: Option<u64>,
    /// Sample rate in Hz
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub sample_rate: Option<u64>,
    /// Channel count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl AudioProfile {
    /// Build from one ffprobe audio stream record
    pub fn from_metadata(data: &Metadata) -> Self {
        Self {
            codec: metadata::text(data, "codec_name"),
            profile: metadata::text(data, "profile"),
            bitrate: metadata::metric(data, "bit_rate"),
            sample_rate: metadata::metric(data, "sample_rate"),
            channels: metadata::unsigned(data, "channels"),
            duration: metadata::float(data, "duration"),
        }
    }
}
