#![warn(missing_docs)]

//! # ffmpeg-transformer: typed ffmpeg command lines
//!
//! Describe an ffmpeg invocation as files, streams and filter chains, then
//! build it into the exact argument vector ffmpeg expects.
//!
//! ## Features
//!
//! - **Command** - global options, ordered inputs and outputs
//! - **Streams** - typed video/audio setters with stream specifiers
//! - **Filters** - video, audio and complex chains checked against their inputs
//! - **Profiles** - JSON media profiles, ffprobe metadata mapping
//! - **Transform** - minimal re-encode plan from a source and a target profile
//!
//! ## Quick Start
//!
//! ```
//! use ffmpeg_transformer::Command;
//!
//! let mut command = Command::new();
//! command.overwrite_output_files(true);
//!
//! let input = command.add_input("input.mov").id();
//! let video = command.file_mut(input).video_stream(0).id();
//!
//! command
//!     .add_output("output.mp4")
//!     .add_video_stream(Some(video))?
//!     .codec("libx264")
//!     .crf(23);
//!
//! assert_eq!(
//!     command.build()?,
//!     ["-y", "-i", "input.mov", "-map", "0:v:0", "-c:v:0", "libx264", "-crf:v:0", "23", "output.mp4"]
//! );
//! # Ok::<(), ffmpeg_transformer::BuildError>(())
//! ```

/// Command root and build
pub mod command;
/// Stream type tags, channel layouts, option records
pub mod core;
/// Error types for command building
pub mod error;
/// Input and output files
pub mod file;
/// Filter arguments, chains and graphs
pub mod filter;
/// Media, video and audio profiles
pub mod profile;
/// Video and audio streams
pub mod stream;
/// Profile and command transformers
pub mod transformer;

pub use command::Command;
pub use core::{Audio, ChainType, ChannelLayout, Complex, MediaType, Video};
pub use error::{BuildError, BuildResult};
pub use file::{FileId, FileMut};
pub use filter::{
    AudioChainMut, ChainId, ComplexChainMut, FilterArgs, FilterChainMut, FilterGraphMut, GraphId,
    IntoStreams, VideoChainMut,
};
pub use profile::{AudioProfile, MediaProfile, VideoProfile};
pub use stream::{AudioStreamMut, StreamId, StreamMut, VideoStreamMut};
pub use transformer::{CommandTransformer, ProfileTransformer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
