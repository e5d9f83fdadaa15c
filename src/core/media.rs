use crate::error::{BuildError, BuildResult};
use std::fmt;
use std::str::FromStr;

/// Elementary stream type, rendered as the ffmpeg stream specifier letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Video stream (`v`)
    Video,
    /// Audio stream (`a`)
    Audio,
}

impl MediaType {
    /// Specifier letter used in stream names and per-stream options
    pub fn tag(&self) -> &'static str {
        match self {
            MediaType::Video => "v",
            MediaType::Audio => "a",
        }
    }

    /// Option that disables every stream of this type in a file
    pub fn disable_flag(&self) -> &'static str {
        match self {
            MediaType::Video => "-vn",
            MediaType::Audio => "-an",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MediaType {
    type Err = BuildError;

    fn from_str(s: &str) -> BuildResult<Self> {
        match s {
            "v" => Ok(MediaType::Video),
            "a" => Ok(MediaType::Audio),
            other => Err(BuildError::UnknownStreamType(other.to_string())),
        }
    }
}

/// Kind of filter chain, which decides the typed filter methods it offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    /// Chain of video filters
    Video,
    /// Chain of audio filters
    Audio,
    /// Chain mixing video and audio streams (concat)
    Complex,
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainType::Video => "video",
            ChainType::Audio => "audio",
            ChainType::Complex => "complex",
        })
    }
}

/// Marker for video streams and video filter chains
#[derive(Debug, Clone, Copy)]
pub struct Video;

/// Marker for audio streams and audio filter chains
#[derive(Debug, Clone, Copy)]
pub struct Audio;

/// Marker for complex filter chains
#[derive(Debug, Clone, Copy)]
pub struct Complex;

/// Compile-time stream type of a stream handle
pub trait StreamKind {
    /// Stream type the handle operates on
    const TYPE: MediaType;
}

impl StreamKind for Video {
    const TYPE: MediaType = MediaType::Video;
}

impl StreamKind for Audio {
    const TYPE: MediaType = MediaType::Audio;
}

/// Compile-time chain kind of a filter chain handle
pub trait ChainKind {
    /// Chain kind the handle operates on
    const TYPE: ChainType;
}

impl ChainKind for Video {
    const TYPE: ChainType = ChainType::Video;
}

impl ChainKind for Audio {
    const TYPE: ChainType = ChainType::Audio;
}

impl ChainKind for Complex {
    const TYPE: ChainType = ChainType::Complex;
}

/// Channel layout understood by the `channelsplit` filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLayout {
    /// 1 channel
    Mono,
    /// 2 channels
    Stereo,
    /// 2.1 (3 channels)
    TwoPointOne,
    /// 5.1 surround (6 channels)
    SurroundFivePointOne,
    /// Any other layout, given as a plain channel count
    Count(usize),
}

impl ChannelLayout {
    /// Parse a layout name; unknown names fall back to their leading integer
    pub fn parse(layout: &str) -> Self {
        match layout {
            "mono" => ChannelLayout::Mono,
            "stereo" => ChannelLayout::Stereo,
            "2.1" => ChannelLayout::TwoPointOne,
            "5.1" => ChannelLayout::SurroundFivePointOne,
            other => ChannelLayout::Count(leading_integer(other).max(0) as usize),
        }
    }

    /// Number of channels in the layout
    pub fn count(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
            ChannelLayout::TwoPointOne => 3,
            ChannelLayout::SurroundFivePointOne => 6,
            ChannelLayout::Count(n) => *n,
        }
    }
}

/// Integer prefix of a string, 0 when there is none (`"30000/1001"` is 30000)
pub fn leading_integer(value: &str) -> i64 {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
