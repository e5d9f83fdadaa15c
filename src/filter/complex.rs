use super::{FilterArgs, FilterChainMut};
use crate::core::{Complex, MediaType};
use crate::error::{BuildError, BuildResult};
use crate::stream::StreamId;

impl<'a> FilterChainMut<'a, Complex> {
    /// Concatenate the inputs as equal segments
    ///
    /// The segment count is the larger of the video and audio input counts,
    /// or the smaller one when both are present and differ. Each segment must
    /// hold the same number of video and of audio streams, in that order.
    pub fn concat(self) -> BuildResult<Self> {
        let video = self
            .signature()
            .iter()
            .filter(|t| **t == MediaType::Video)
            .count();
        let audio = self.signature().len() - video;

        let parts = if video > 0 && audio > 0 && video != audio {
            video.min(audio)
        } else {
            video.max(audio)
        };

        if parts == 0 || video % parts != 0 || audio % parts != 0 {
            return Err(BuildError::UnevenConcatSegments { video, audio });
        }

        let (video, audio) = (video / parts, audio / parts);

        let mut segment = vec![MediaType::Video; video];
        segment.extend(vec![MediaType::Audio; audio]);
        let expected = segment.repeat(parts);

        let args = FilterArgs::new()
            .named("n", parts)
            .named("v", video)
            .named("a", audio);

        self.filter("concat", args, &expected, segment)
    }

    /// Video output `n`
    pub fn output_video_stream(&mut self, n: usize) -> BuildResult<StreamId> {
        nth_output(self.output_video_streams()?, n)
    }

    /// Video outputs in order
    pub fn output_video_streams(&mut self) -> BuildResult<Vec<StreamId>> {
        self.output_streams_of(MediaType::Video)
    }

    /// Audio output `n`
    pub fn output_audio_stream(&mut self, n: usize) -> BuildResult<StreamId> {
        nth_output(self.output_audio_streams()?, n)
    }

    /// Audio outputs in order
    pub fn output_audio_streams(&mut self) -> BuildResult<Vec<StreamId>> {
        self.output_streams_of(MediaType::Audio)
    }
}

fn nth_output(outputs: Vec<StreamId>, n: usize) -> BuildResult<StreamId> {
    outputs
        .get(n)
        .copied()
        .ok_or(BuildError::OutputStreamOutOfRange {
            index: n,
            count: outputs.len(),
        })
}
