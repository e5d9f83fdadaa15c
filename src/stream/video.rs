use super::StreamMut;
use crate::core::Video;

impl<'a> StreamMut<'a, Video> {
    /// Frame rate (`-r`)
    pub fn frame_rate(self, rate: f64) -> Self {
        self.add_stream_option("-r", rate.to_string())
    }

    /// Frame size, `WxH` or an abbreviation such as `hd720` (`-s`)
    pub fn frame_size(self, size: &str) -> Self {
        self.add_stream_option("-s", size)
    }

    /// Display aspect ratio (`-aspect`)
    pub fn aspect_ratio(self, aspect: &str) -> Self {
        self.add_stream_option("-aspect", aspect)
    }

    /// Bits per raw sample
    pub fn bits_per_raw_sample(self, bits: u32) -> Self {
        self.add_option("-bits_per_raw_sample", bits.to_string())
    }

    /// Encoder preset (`ultrafast` … `veryslow`)
    pub fn preset(self, preset: &str) -> Self {
        self.add_option("-preset", preset)
    }

    /// Timecode written into the stream
    pub fn time_code(self, timecode: &str) -> Self {
        self.add_option("-timecode", timecode)
    }

    /// Pass number of a two-pass encode
    pub fn pass(self, number: u32) -> Self {
        self.add_stream_option("-pass", number.to_string())
    }

    /// Simple filter graph for this stream (`-vf`)
    pub fn filter(self, graph: &str) -> Self {
        self.add_option("-vf", graph)
    }

    /// Maximum bitrate
    pub fn max_bitrate(self, bitrate: &str) -> Self {
        self.add_stream_option("-maxrate", bitrate)
    }

    /// Minimum bitrate
    pub fn min_bitrate(self, bitrate: &str) -> Self {
        self.add_stream_option("-minrate", bitrate)
    }

    /// Rate control buffer size
    pub fn buffer_size(self, size: &str) -> Self {
        self.add_stream_option("-bufsize", size)
    }

    /// Constant rate factor
    pub fn crf(self, crf: u32) -> Self {
        self.add_stream_option("-crf", crf.to_string())
    }

    /// Pixel format (`-pix_fmt`)
    pub fn pixel_format(self, format: &str) -> Self {
        self.add_stream_option("-pix_fmt", format)
    }

    /// Group of pictures size (`-g`)
    pub fn keyframe_interval(self, interval: u32) -> Self {
        self.add_option("-g", interval.to_string())
    }
}
