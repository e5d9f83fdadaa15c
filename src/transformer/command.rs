use crate::command::Command;
use crate::core::Complex;
use crate::error::BuildResult;
use crate::file::FileId;
use crate::filter::ChainId;
use crate::profile::{AudioProfile, MediaProfile, VideoProfile};
use crate::stream::{AudioStreamMut, VideoStreamMut};
use log::debug;

/// Profile codec names that ffmpeg knows under an encoder name
const CODEC_MAP: &[(&str, &str)] = &[("h264", "libx264"), ("h265", "libx265")];

fn mapped_codec(codec: &str) -> &str {
    CODEC_MAP
        .iter()
        .find(|(name, _)| *name == codec)
        .map_or(codec, |(_, encoder)| *encoder)
}

/// Writes transformation profiles into commands
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandTransformer;

impl CommandTransformer {
    /// Create a transformer
    pub fn new() -> Self {
        Self
    }

    /// Command converting `input` into `output` with `transformation`
    ///
    /// Output files are overwritten and the index is moved to the start of
    /// the output.
    pub fn apply_transformation(
        &self,
        transformation: &MediaProfile,
        input: &str,
        output: &str,
    ) -> BuildResult<Command> {
        let mut command = Command::new();
        command.overwrite_output_files(true);

        let input = command.add_input(input).id();
        let output = command.add_output(output).move_header_to_start()?.id();

        self.apply_transformation_to_files(transformation, &mut command, input, output)?;

        Ok(command)
    }

    /// Map the n-th video and audio stream of `input` to `output`
    ///
    /// The n-th stream profile of `transformation` is applied to the n-th
    /// mapped stream of its type.
    pub fn apply_transformation_to_files(
        &self,
        transformation: &MediaProfile,
        command: &mut Command,
        input: FileId,
        output: FileId,
    ) -> BuildResult<()> {
        debug!(
            "Applying {} video and {} audio profiles",
            transformation.video.len(),
            transformation.audio.len()
        );

        for (n, profile) in transformation.video.iter().enumerate() {
            let source = command.file_mut(input).video_stream(n).id();
            let stream = command.file_mut(output).add_video_stream(Some(source))?;
            self.apply_video_transformation(stream, profile);
        }

        for (n, profile) in transformation.audio.iter().enumerate() {
            let source = command.file_mut(input).audio_stream(n).id();
            let stream = command.file_mut(output).add_audio_stream(Some(source))?;
            self.apply_audio_transformation(stream, profile);
        }

        Ok(())
    }

    /// Map every output of a complex chain to `output`
    ///
    /// All video outputs get the first video profile, all audio outputs the
    /// first audio profile. Outputs of a type without a profile are mapped
    /// unchanged.
    pub fn apply_transformation_to_complex_filter_chain(
        &self,
        transformation: &MediaProfile,
        command: &mut Command,
        chain: ChainId,
        output: FileId,
    ) -> BuildResult<()> {
        let (video, audio) = {
            let mut chain = command.chain_mut::<Complex>(chain)?;
            (chain.output_video_streams()?, chain.output_audio_streams()?)
        };

        for source in video {
            let stream = command.file_mut(output).add_video_stream(Some(source))?;
            if let Some(profile) = transformation.video_profile() {
                self.apply_video_transformation(stream, profile);
            }
        }

        for source in audio {
            let stream = command.file_mut(output).add_audio_stream(Some(source))?;
            if let Some(profile) = transformation.audio_profile() {
                self.apply_audio_transformation(stream, profile);
            }
        }

        Ok(())
    }

    /// Set every defined field of `profile` on a video stream
    pub fn apply_video_transformation<'a>(
        &self,
        mut stream: VideoStreamMut<'a>,
        profile: &VideoProfile,
    ) -> VideoStreamMut<'a> {
        let (width, height) = (profile.width.unwrap_or(0), profile.height.unwrap_or(0));
        if width > 0 || height > 0 {
            stream = stream.frame_size(&format!("{}x{}", width, height));
        }
        if let Some(codec) = &profile.codec {
            stream = stream.codec(mapped_codec(codec));
        }
        if let Some(codec_profile) = &profile.profile {
            stream = stream.profile(codec_profile);
        }
        if let Some(preset) = &profile.preset {
            stream = stream.preset(preset);
        }
        if let Some(pixel_format) = &profile.pixel_format {
            stream = stream.pixel_format(pixel_format);
        }
        if let Some(bitrate) = profile.bitrate {
            stream = stream.bitrate(&bitrate.to_string());
        }
        if let Some(bitrate) = profile.max_bitrate {
            stream = stream.max_bitrate(&bitrate.to_string());
        }
        if let Some(bitrate) = profile.min_bitrate {
            stream = stream.min_bitrate(&bitrate.to_string());
        }
        if let Some(size) = profile.buffer_size {
            stream = stream.buffer_size(&size.to_string());
        }
        if let Some(crf) = profile.crf {
            stream = stream.crf(crf);
        }
        if let Some(frame_rate) = profile.frame_rate {
            stream = stream.frame_rate(frame_rate);
        }
        if let Some(interval) = profile.keyframe_interval {
            stream = stream.keyframe_interval(interval);
        }
        stream
    }

    /// Set every defined field of `profile` on an audio stream
    pub fn apply_audio_transformation<'a>(
        &self,
        mut stream: AudioStreamMut<'a>,
        profile: &AudioProfile,
    ) -> AudioStreamMut<'a> {
        if let Some(codec) = &profile.codec {
            stream = stream.codec(mapped_codec(codec));
        }
        if let Some(codec_profile) = &profile.profile {
            stream = stream.profile(codec_profile);
        }
        if let Some(bitrate) = profile.bitrate {
            stream = stream.bitrate(&bitrate.to_string());
        }
        if let Some(rate) = profile.sample_rate {
            stream = stream.rate(rate);
        }
        if let Some(channels) = profile.channels {
            stream = stream.channels(channels);
        }
        stream
    }
}
