use super::metadata::{self, Metadata};
use super::{metric, one_or_many, AudioProfile, VideoProfile};
use crate::error::{BuildError, BuildResult};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Bitrate assumed for audio tracks the probe could not measure
const DEFAULT_AUDIO_BITRATE: u64 = 64_000;

/// Container-level profile with its video and audio stream profiles
///
/// In JSON, `video` and `audio` may be a single object or a list; they are
/// always written back as lists. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaProfile {
    /// Profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Container format (`mp4`, `webm`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// File size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Overall bitrate in bits per second
    #[serde(
        default,
        deserialize_with = "metric::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitrate: Option<u64>,
    /// Video stream profiles
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub video: Vec<VideoProfile>,
    /// Audio stream profiles
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub audio: Vec<AudioProfile>,
}

impl MediaProfile {
    /// Parse a profile from JSON text
    pub fn from_json(json: &str) -> BuildResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON profile file
    pub fn load(path: impl AsRef<Path>) -> BuildResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> BuildResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe a probed media file
    ///
    /// `format` is the probe's format record and `streams` its stream
    /// records; streams other than video and audio are ignored. The result
    /// is repaired against `path` (see [`MediaProfile::repair`]).
    pub fn from_probe(format: &Metadata, streams: &[Metadata], path: Option<&Path>) -> Self {
        let filename = metadata::text(format, "filename")
            .or_else(|| path.map(|p| p.to_string_lossy().into_owned()));

        let mut profile = Self {
            format: filename
                .as_deref()
                .and_then(|name| name.rsplit_once('.'))
                .map(|(_, ext)| ext.to_string()),
            duration: metadata::float(format, "duration"),
            size: metadata::unsigned(format, "size"),
            bitrate: metadata::metric(format, "bit_rate"),
            ..Self::default()
        };

        for stream in streams {
            match metadata::text(stream, "codec_type").as_deref() {
                Some("video") => profile.video.push(VideoProfile::from_metadata(stream)),
                Some("audio") => profile.audio.push(AudioProfile::from_metadata(stream)),
                _ => {}
            }
        }

        profile.repair(path);
        profile
    }

    /// Describe a media file from `ffprobe -show_format -show_streams -of json` output
    pub fn from_probe_json(json: &str, path: Option<&Path>) -> BuildResult<Self> {
        let probe: Value = serde_json::from_str(json)?;

        let Some(probe) = probe.as_object() else {
            return Err(BuildError::InvalidProfile(
                "probe output must be a JSON object".to_string(),
            ));
        };

        let format = probe
            .get("format")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let streams: Vec<Metadata> = probe
            .get("streams")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .cloned()
            .collect();

        Ok(Self::from_probe(&format, &streams, path))
    }

    /// Guess size and bitrates the container did not report
    ///
    /// - a missing size is read from `path` when the file exists
    /// - a missing bitrate is derived from size and duration
    /// - unmeasured audio tracks are assumed to be 64 kbit/s
    /// - unmeasured video tracks share what remains of the overall bitrate
    pub fn repair(&mut self, path: Option<&Path>) -> &mut Self {
        if self.size.unwrap_or(0) == 0 {
            if let Some(size) = path.and_then(|p| fs::metadata(p).ok()).map(|m| m.len()) {
                debug!("Repaired size: {}", size);
                self.size = Some(size);
            }
        }

        let duration = self.duration.unwrap_or(0.0);
        if self.bitrate.unwrap_or(0) == 0 && duration > 0.0 {
            let bitrate = (self.size.unwrap_or(0) as f64 / duration * 8.0) as u64;
            debug!("Repaired bitrate: {}", bitrate);
            self.bitrate = Some(bitrate);
        }

        let mut audio_bitrate = 0;
        for audio in &mut self.audio {
            if audio.bitrate.unwrap_or(0) == 0 {
                audio.bitrate = Some(DEFAULT_AUDIO_BITRATE);
            }
            audio_bitrate += audio.bitrate.unwrap_or(0);
        }

        if !self.video.is_empty() {
            let remaining = self.bitrate.unwrap_or(0).saturating_sub(audio_bitrate);
            let fixed = remaining / self.video.len() as u64;

            for video in self.video.iter_mut().filter(|v| v.bitrate.unwrap_or(0) == 0) {
                debug!("Repaired video bitrate: {}", fixed);
                video.bitrate = Some(fixed);
            }
        }

        self
    }

    /// First video profile
    pub fn video_profile(&self) -> Option<&VideoProfile> {
        self.video.first()
    }

    /// First audio profile
    pub fn audio_profile(&self) -> Option<&AudioProfile> {
        self.audio.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REFERENCE: &str = r#"{
        "name": "reference",
        "format": "mp4",
        "video": {
            "width": 1920,
            "height": 1080,
            "codec": "h264",
            "profile": "main",
            "preset": "veryfast",
            "pixel_format": "yuv420p",
            "bitrate": "6000k",
            "frame_rate": 29.97,
            "keyframe_interval": 250
        },
        "audio": {
            "codec": "aac",
            "bitrate": "128k",
            "sample_rate": "48k"
        }
    }"#;

    #[test]
    fn test_from_and_to_json() {
        let profile = MediaProfile::from_json(REFERENCE).unwrap();
        let serialized: Value = serde_json::from_str(&profile.to_json().unwrap()).unwrap();

        assert_eq!(
            serialized,
            json!({
                "name": "reference",
                "format": "mp4",
                "video": [{
                    "width": 1920,
                    "height": 1080,
                    "codec": "h264",
                    "profile": "main",
                    "preset": "veryfast",
                    "pixel_format": "yuv420p",
                    "bitrate": 6000000,
                    "frame_rate": 29.97,
                    "keyframe_interval": 250
                }],
                "audio": [{
                    "codec": "aac",
                    "bitrate": 128000,
                    "sample_rate": 48000
                }]
            })
        );
    }

    #[test]
    fn test_lists_are_accepted() {
        let profile = MediaProfile::from_json(
            r#"{"audio": [{"codec": "aac"}, {"codec": "opus", "bitrate": 96000}]}"#,
        )
        .unwrap();

        assert!(profile.video.is_empty());
        assert_eq!(profile.audio.len(), 2);
        assert_eq!(profile.audio[1].bitrate, Some(96_000));
        assert_eq!(profile.audio_profile().unwrap().codec.as_deref(), Some("aac"));
        assert!(profile.video_profile().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(REFERENCE.as_bytes()).unwrap();

        let profile = MediaProfile::load(file.path()).unwrap();
        assert_eq!(profile.name.as_deref(), Some("reference"));
        assert_eq!(profile.video_profile().unwrap().bitrate, Some(6_000_000));
    }

    #[test]
    fn test_load_missing_file() {
        let result = MediaProfile::load("/nonexistent/profile.json");
        assert!(matches!(result, Err(BuildError::Io(_))));
    }

    #[test]
    fn test_repair_fills_bitrates() {
        let mut profile = MediaProfile {
            duration: Some(10.0),
            size: Some(1_000_000),
            video: vec![VideoProfile::default()],
            audio: vec![AudioProfile::default()],
            ..MediaProfile::default()
        };

        profile.repair(None);

        assert_eq!(profile.bitrate, Some(800_000));
        assert_eq!(profile.audio[0].bitrate, Some(64_000));
        assert_eq!(profile.video[0].bitrate, Some(736_000));
    }

    #[test]
    fn test_repair_keeps_known_values() {
        let mut profile = MediaProfile {
            duration: Some(10.0),
            size: Some(1_000_000),
            bitrate: Some(100_000),
            video: vec![
                VideoProfile {
                    bitrate: Some(50_000),
                    ..VideoProfile::default()
                },
                VideoProfile::default(),
            ],
            audio: vec![AudioProfile {
                bitrate: Some(128_000),
                ..AudioProfile::default()
            }],
            ..MediaProfile::default()
        };

        profile.repair(None);

        assert_eq!(profile.bitrate, Some(100_000));
        assert_eq!(profile.video[0].bitrate, Some(50_000));
        assert_eq!(profile.video[1].bitrate, Some(0));
    }

    #[test]
    fn test_repair_treats_zero_audio_bitrate_as_missing() {
        let mut profile = MediaProfile {
            bitrate: Some(1_000_000),
            video: vec![VideoProfile {
                bitrate: Some(0),
                ..VideoProfile::default()
            }],
            audio: vec![AudioProfile {
                bitrate: Some(0),
                ..AudioProfile::default()
            }],
            ..MediaProfile::default()
        };

        profile.repair(None);

        assert_eq!(profile.audio[0].bitrate, Some(64_000));
        assert_eq!(profile.video[0].bitrate, Some(936_000));
    }

    #[test]
    fn test_repair_reads_size_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 500]).unwrap();
        file.flush().unwrap();

        let mut profile = MediaProfile {
            duration: Some(2.0),
            ..MediaProfile::default()
        };
        profile.repair(Some(file.path()));

        assert_eq!(profile.size, Some(500));
        assert_eq!(profile.bitrate, Some(2000));
    }

    #[test]
    fn test_from_probe_json() {
        let probe = json!({
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "vp9",
                    "width": 1280,
                    "height": 720,
                    "pix_fmt": "yuv420p",
                    "avg_frame_rate": "25/1",
                    "r_frame_rate": "25/1"
                },
                {
                    "codec_type": "audio",
                    "codec_name": "opus",
                    "sample_rate": "48000",
                    "channels": 2
                },
                {"codec_type": "subtitle", "codec_name": "webvtt"}
            ],
            "format": {
                "filename": "/media/clip.final.webm",
                "duration": "4.000000",
                "size": "1000000"
            }
        });

        let profile = MediaProfile::from_probe_json(&probe.to_string(), None).unwrap();

        assert_eq!(profile.format.as_deref(), Some("webm"));
        assert_eq!(profile.duration, Some(4.0));
        assert_eq!(profile.size, Some(1_000_000));
        assert_eq!(profile.bitrate, Some(2_000_000));
        assert_eq!(profile.video.len(), 1);
        assert_eq!(profile.audio.len(), 1);
        assert_eq!(profile.audio[0].bitrate, Some(64_000));
        assert_eq!(profile.video[0].bitrate, Some(1_936_000));
        assert_eq!(profile.video[0].frame_rate, Some(25.0));
    }

    #[test]
    fn test_probe_json_must_be_object() {
        assert!(matches!(
            MediaProfile::from_probe_json("[]", None),
            Err(BuildError::InvalidProfile(_))
        ));
        assert!(matches!(
            MediaProfile::from_probe_json("{", None),
            Err(BuildError::Json(_))
        ));
    }
}
