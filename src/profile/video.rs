use super::metadata::{self, Metadata};
use super::metric;
use serde::{Deserialize, Serialize};

/// Video stream parameters
///
/// Bitrates and the buffer size are in bits (per second) and accept metric
/// suffixes when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoProfile {
    /// Frame width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Frame height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Codec name (`h264`, `copy`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Codec profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Encoder preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Pixel format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<String>,
    /// Target bitrate
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitrate: Option<u64>,
    /// Maximum bitrate
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_bitrate: Option<u64>,
    /// Minimum bitrate
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_bitrate: Option<u64>,
    /// Rate control buffer size
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_size: Option<u64>,
    /// Constant rate factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crf: Option<u32>,
    /// Frames per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    /// GOP size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframe_interval: Option<u32>,
    /// Display rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
}

impl VideoProfile {
    /// Build from one ffprobe video stream record
    pub fn from_metadata(data: &Metadata) -> Self {
        Self {
            width: metadata::unsigned(data, "width"),
            height: metadata::unsigned(data, "height"),
            codec: metadata::text(data, "codec_name"),
            profile: metadata::text(data, "profile"),
            pixel_format: metadata::text(data, "pix_fmt"),
            bitrate: metadata::metric(data, "bit_rate"),
            frame_rate: Some(metadata::frame_rate(data)),
            rotate: Some(metadata::rotation(data)),
            ..Self::default()
        }
    }
}
