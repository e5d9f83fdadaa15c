use super::{exceeds, least, COPY_CODEC};
use crate::profile::{AudioProfile, MediaProfile, VideoProfile};
use log::debug;

/// Frame dimensions are kept divisible by this
const DIMENSION_ALIGNMENT: i64 = 4;

/// Frame rate under which h264 is encoded with the fastest preset
const SLOW_FRAME_RATE: f64 = 18.0;

/// Computes the settings needed to bring a source profile to a target
///
/// Values never grow: resolution, bitrates, frame rate, sample rate and
/// channel count are capped at the source's. Streams that already satisfy the
/// target get the `copy` codec unless re-encoding is forced.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileTransformer;

impl ProfileTransformer {
    /// Create a transformer
    pub fn new() -> Self {
        Self
    }

    /// Transform every stream of `source` against the first stream profiles of `target`
    pub fn transform_media(
        &self,
        source: &MediaProfile,
        target: &MediaProfile,
        force_video: bool,
        force_audio: bool,
    ) -> MediaProfile {
        let mut transformed = MediaProfile::default();

        if target.format.is_some() && source.format != target.format {
            transformed.format = target.format.clone();
        }

        if target.duration.is_some() && exceeds(source.duration, target.duration) {
            transformed.duration = target.duration;
        }

        if target.bitrate.is_some() && exceeds(source.bitrate, target.bitrate) {
            transformed.bitrate = target.bitrate;
        }

        let target_video = target.video_profile().cloned().unwrap_or_default();
        transformed.video = source
            .video
            .iter()
            .map(|video| self.transform_video(video, &target_video, force_video))
            .collect();

        let target_audio = target.audio_profile().cloned().unwrap_or_default();
        transformed.audio = source
            .audio
            .iter()
            .map(|audio| self.transform_audio(audio, &target_audio, force_audio))
            .collect();

        transformed
    }

    /// Settings that bring one video stream to `target`
    pub fn transform_video(
        &self,
        source: &VideoProfile,
        target: &VideoProfile,
        force: bool,
    ) -> VideoProfile {
        let (width, height) = fit_dimensions(source, target);

        let codec = target.codec.clone().or_else(|| source.codec.clone());
        let pixel_format = target
            .pixel_format
            .clone()
            .or_else(|| source.pixel_format.clone());
        let bitrate = least(source.bitrate, target.bitrate);
        let max_bitrate = least(source.bitrate, target.max_bitrate);
        let frame_rate = least(source.frame_rate, target.frame_rate);

        let reencode = force
            || source.codec != codec
            || source.pixel_format != pixel_format
            || source.rotate.unwrap_or(0) != 0
            || exceeds(source.width, width)
            || exceeds(source.height, height)
            || exceeds(source.bitrate, bitrate)
            || exceeds(source.bitrate, max_bitrate)
            || exceeds(source.frame_rate, frame_rate);

        if !reencode {
            return VideoProfile {
                codec: Some(COPY_CODEC.to_string()),
                ..VideoProfile::default()
            };
        }

        debug!(
            "Video re-encode: {:?} {:?}x{:?} -> {:?} {:?}x{:?}",
            source.codec, source.width, source.height, codec, width, height
        );

        let preset = match (codec.as_deref(), frame_rate) {
            (Some("h264"), Some(fps)) if fps > 0.0 && fps < SLOW_FRAME_RATE => {
                Some("ultrafast".to_string())
            }
            _ => target.preset.clone(),
        };

        let mut transformed = VideoProfile {
            codec,
            profile: target.profile.clone(),
            preset,
            pixel_format: target.pixel_format.clone(),
            bitrate: target.bitrate.filter(|b| *b > 0).and(bitrate),
            max_bitrate: target.max_bitrate,
            min_bitrate: target.min_bitrate,
            buffer_size: target.buffer_size,
            crf: target.crf,
            frame_rate,
            keyframe_interval: target.keyframe_interval,
            ..VideoProfile::default()
        };

        if source.width != width || source.height != height {
            transformed.width = width;
            transformed.height = height;
        }

        transformed
    }

    /// Settings that bring one audio stream to `target`
    pub fn transform_audio(
        &self,
        source: &AudioProfile,
        target: &AudioProfile,
        force: bool,
    ) -> AudioProfile {
        let codec = target.codec.clone().or_else(|| source.codec.clone());
        let bitrate = if source.codec != codec {
            target.bitrate
        } else {
            least(source.bitrate, target.bitrate)
        };
        let sample_rate = least(source.sample_rate, target.sample_rate);
        let channels = least(source.channels, target.channels);

        let reencode = force
            || source.codec != codec
            || exceeds(source.bitrate, bitrate)
            || exceeds(source.sample_rate, sample_rate)
            || exceeds(source.channels, channels);

        if !reencode {
            return AudioProfile {
                codec: Some(COPY_CODEC.to_string()),
                ..AudioProfile::default()
            };
        }

        debug!("Audio re-encode: {:?} -> {:?}", source.codec, codec);

        AudioProfile {
            codec,
            profile: target.profile.clone(),
            bitrate,
            sample_rate,
            channels: if source.channels != channels { channels } else { None },
            ..AudioProfile::default()
        }
    }
}

/// Target frame size: capped at the source, aspect ratio kept, aligned
fn fit_dimensions(source: &VideoProfile, target: &VideoProfile) -> (Option<u32>, Option<u32>) {
    let mut width = least(source.width, target.width).map(f64::from);
    let mut height = least(source.height, target.height).map(f64::from);

    if let (Some(w), Some(h), Some(sw), Some(sh)) = (width, height, source.width, source.height) {
        let (sw, sh) = (f64::from(sw), f64::from(sh));
        if w > 0.0 && h > 0.0 && (sw > w || sh > h) {
            let scale = (sw / w).max(sh / h).max(1.0);
            if scale > 1.0 {
                width = Some(sw / scale);
                height = Some(sh / scale);
            }
        }
    }

    (width.map(align), height.map(align))
}

fn align(value: f64) -> u32 {
    let value = value.trunc() as i64;
    let aligned = (value as f64 / DIMENSION_ALIGNMENT as f64).round() as i64 * DIMENSION_ALIGNMENT;
    aligned.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hd() -> VideoProfile {
        VideoProfile {
            width: Some(1920),
            height: Some(1080),
            codec: Some("h264".to_string()),
            pixel_format: Some("yuv420p".to_string()),
            bitrate: Some(6_000_000),
            frame_rate: Some(29.97),
            rotate: Some(0),
            ..VideoProfile::default()
        }
    }

    fn hd_target() -> VideoProfile {
        VideoProfile {
            width: Some(1280),
            height: Some(720),
            codec: Some("h264".to_string()),
            profile: Some("main".to_string()),
            preset: Some("veryfast".to_string()),
            pixel_format: Some("yuv420p".to_string()),
            bitrate: Some(2_500_000),
            frame_rate: Some(30.0),
            keyframe_interval: Some(250),
            ..VideoProfile::default()
        }
    }

    #[test]
    fn test_video_downscale() {
        let result = ProfileTransformer::new().transform_video(&full_hd(), &hd_target(), false);

        assert_eq!(result.codec.as_deref(), Some("h264"));
        assert_eq!(result.width, Some(1280));
        assert_eq!(result.height, Some(720));
        assert_eq!(result.bitrate, Some(2_500_000));
        assert_eq!(result.profile.as_deref(), Some("main"));
        assert_eq!(result.preset.as_deref(), Some("veryfast"));
        assert_eq!(result.frame_rate, Some(29.97));
        assert_eq!(result.keyframe_interval, Some(250));
    }

    #[test]
    fn test_video_keeps_aspect_ratio() {
        let source = VideoProfile {
            width: Some(1440),
            height: Some(1080),
            ..full_hd()
        };
        let result = ProfileTransformer::new().transform_video(&source, &hd_target(), false);

        assert_eq!(result.width, Some(960));
        assert_eq!(result.height, Some(720));
    }

    #[test]
    fn test_dimensions_are_aligned() {
        let source = VideoProfile {
            width: Some(1918),
            height: Some(1078),
            ..full_hd()
        };
        let target = VideoProfile {
            width: Some(1000),
            height: Some(1000),
            ..hd_target()
        };
        let result = ProfileTransformer::new().transform_video(&source, &target, false);

        // 1078 / 1.918 = 562.04, rounded to the nearest multiple of 4
        assert_eq!(result.width, Some(1000));
        assert_eq!(result.height, Some(564));
    }

    #[test]
    fn test_video_copied_when_within_target() {
        let source = VideoProfile {
            width: Some(1280),
            height: Some(720),
            bitrate: Some(2_000_000),
            ..full_hd()
        };
        let result = ProfileTransformer::new().transform_video(&source, &hd_target(), false);

        assert_eq!(
            result,
            VideoProfile {
                codec: Some("copy".to_string()),
                ..VideoProfile::default()
            }
        );
    }

    #[test]
    fn test_video_forced_keeps_source_size() {
        let source = VideoProfile {
            width: Some(1280),
            height: Some(720),
            bitrate: Some(2_000_000),
            ..full_hd()
        };
        let result = ProfileTransformer::new().transform_video(&source, &hd_target(), true);

        assert_eq!(result.codec.as_deref(), Some("h264"));
        assert_eq!(result.width, None);
        assert_eq!(result.height, None);
        assert_eq!(result.bitrate, Some(2_000_000));
    }

    #[test]
    fn test_rotated_video_is_reencoded() {
        let source = VideoProfile {
            width: Some(1280),
            height: Some(720),
            bitrate: Some(2_000_000),
            rotate: Some(90),
            ..full_hd()
        };
        let result = ProfileTransformer::new().transform_video(&source, &hd_target(), false);

        assert_eq!(result.codec.as_deref(), Some("h264"));
    }

    #[test]
    fn test_slow_h264_uses_fastest_preset() {
        let source = VideoProfile {
            frame_rate: Some(12.0),
            ..full_hd()
        };
        let result = ProfileTransformer::new().transform_video(&source, &hd_target(), false);

        assert_eq!(result.preset.as_deref(), Some("ultrafast"));
        assert_eq!(result.frame_rate, Some(12.0));
    }

    #[test]
    fn test_target_without_bitrate_leaves_it_unset() {
        let target = VideoProfile {
            bitrate: None,
            ..hd_target()
        };
        let result = ProfileTransformer::new().transform_video(&full_hd(), &target, false);

        assert_eq!(result.bitrate, None);
        assert_eq!(result.width, Some(1280));
    }

    #[test]
    fn test_audio_codec_change_uses_target_bitrate() {
        let source = AudioProfile {
            codec: Some("pcm_s16le".to_string()),
            bitrate: Some(1_536_000),
            sample_rate: Some(48_000),
            channels: Some(2),
            ..AudioProfile::default()
        };
        let target = AudioProfile {
            codec: Some("aac".to_string()),
            bitrate: Some(128_000),
            sample_rate: Some(44_100),
            channels: Some(2),
            ..AudioProfile::default()
        };
        let result = ProfileTransformer::new().transform_audio(&source, &target, false);

        assert_eq!(
            result,
            AudioProfile {
                codec: Some("aac".to_string()),
                bitrate: Some(128_000),
                sample_rate: Some(44_100),
                ..AudioProfile::default()
            }
        );
    }

    #[test]
    fn test_audio_downmix() {
        let source = AudioProfile {
            codec: Some("aac".to_string()),
            bitrate: Some(96_000),
            channels: Some(6),
            ..AudioProfile::default()
        };
        let target = AudioProfile {
            bitrate: Some(128_000),
            channels: Some(2),
            ..AudioProfile::default()
        };
        let result = ProfileTransformer::new().transform_audio(&source, &target, false);

        assert_eq!(result.codec.as_deref(), Some("aac"));
        assert_eq!(result.bitrate, Some(96_000));
        assert_eq!(result.channels, Some(2));
    }

    #[test]
    fn test_audio_copied_when_within_target() {
        let source = AudioProfile {
            codec: Some("aac".to_string()),
            bitrate: Some(96_000),
            sample_rate: Some(44_100),
            channels: Some(2),
            ..AudioProfile::default()
        };
        let target = AudioProfile {
            codec: Some("aac".to_string()),
            bitrate: Some(128_000),
            ..AudioProfile::default()
        };
        let transformer = ProfileTransformer::new();

        assert_eq!(
            transformer.transform_audio(&source, &target, false).codec.as_deref(),
            Some("copy")
        );
        assert_eq!(
            transformer.transform_audio(&source, &target, true).codec.as_deref(),
            Some("aac")
        );
    }

    #[test]
    fn test_transform_media() {
        let source = MediaProfile {
            format: Some("mov".to_string()),
            duration: Some(120.0),
            bitrate: Some(8_000_000),
            video: vec![full_hd()],
            audio: vec![
                AudioProfile {
                    codec: Some("aac".to_string()),
                    bitrate: Some(128_000),
                    ..AudioProfile::default()
                },
                AudioProfile {
                    codec: Some("mp3".to_string()),
                    bitrate: Some(128_000),
                    ..AudioProfile::default()
                },
            ],
            ..MediaProfile::default()
        };
        let target = MediaProfile {
            format: Some("mp4".to_string()),
            duration: Some(60.0),
            bitrate: Some(10_000_000),
            video: vec![hd_target()],
            audio: vec![AudioProfile {
                codec: Some("aac".to_string()),
                bitrate: Some(192_000),
                ..AudioProfile::default()
            }],
            ..MediaProfile::default()
        };

        let result = ProfileTransformer::new().transform_media(&source, &target, false, false);

        assert_eq!(result.format.as_deref(), Some("mp4"));
        assert_eq!(result.duration, Some(60.0));
        assert_eq!(result.bitrate, None);
        assert_eq!(result.video.len(), 1);
        assert_eq!(result.video[0].width, Some(1280));
        assert_eq!(result.audio.len(), 2);
        assert_eq!(result.audio[0].codec.as_deref(), Some("copy"));
        assert_eq!(result.audio[1].codec.as_deref(), Some("aac"));
        assert_eq!(result.audio[1].bitrate, Some(192_000));
    }

    #[test]
    fn test_transform_media_without_target_streams() {
        let source = MediaProfile {
            video: vec![full_hd()],
            ..MediaProfile::default()
        };
        let result =
            ProfileTransformer::new().transform_media(&source, &MediaProfile::default(), false, false);

        assert_eq!(result.format, None);
        assert_eq!(result.video[0].codec.as_deref(), Some("copy"));
    }
}
