use super::StreamMut;
use crate::core::Audio;

impl<'a> StreamMut<'a, Audio> {
    /// Codec-specific quality (`-q`)
    pub fn quality(self, quality: i32) -> Self {
        self.add_stream_option("-q", quality.to_string())
    }

    /// Sample rate in Hz (`-ar`)
    pub fn rate(self, rate: u64) -> Self {
        self.add_stream_option("-ar", rate.to_string())
    }

    /// Number of channels (`-ac`)
    pub fn channels(self, channels: u32) -> Self {
        self.add_stream_option("-ac", channels.to_string())
    }

    /// Volume, 256 is normal (`-vol`)
    pub fn volume(self, volume: i32) -> Self {
        self.add_option("-vol", volume.to_string())
    }

    /// Simple filter graph for this stream (`-af`)
    pub fn filter(self, graph: &str) -> Self {
        self.add_option("-af", graph)
    }

    /// Sample format (`-sample_fmt`)
    pub fn sample_format(self, format: &str) -> Self {
        self.add_stream_option("-sample_fmt", format)
    }

    /// Channel layout
    pub fn channel_layout(self, layout: &str) -> Self {
        self.add_option("-channel_layout", layout)
    }
}
