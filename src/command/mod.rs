//! Command root: global options, input and output files, final build
//!
//! The command owns every file, stream and filter chain it describes. Callers
//! keep the `Copy` ids handed out by the builders and come back to the graph
//! through [`Command::file_mut`], [`Command::video_stream_mut`] and friends.

use crate::core::{shell_join, Audio, ChainKind, MediaType, StreamKind, Video};
use crate::error::{BuildError, BuildResult};
use crate::file::{FileData, FileId, FileMut};
use crate::filter::{ChainData, ChainId, FilterChainMut, FilterGraphMut, GraphData, GraphId};
use crate::stream::{StreamData, StreamId, StreamMut};
use log::debug;


/// Root builder of an ffmpeg invocation
#[derive(Debug, Default)]
pub struct Command {
    options: Vec<String>,
    inputs: Vec<FileId>,
    outputs: Vec<FileId>,
    pub(crate) files: Vec<FileData>,
    pub(crate) streams: Vec<StreamData>,
    pub(crate) graphs: Vec<GraphData>,
    pub(crate) chains: Vec<ChainData>,
}

impl Command {
    /// Create an empty command
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty command of the same shape; nothing described so far is carried over
    pub fn fresh_clone(&self) -> Self {
        Self::new()
    }

    /// Add a global option
    pub fn add_option(&mut self, name: &str, argument: impl Into<String>) -> &mut Self {
        let argument = argument.into();
        self.options.push(name.to_string());

        if !argument.is_empty() {
            self.options.push(argument);
        }

        self
    }

    /// Logging verbosity of the transcoder (`-v`)
    pub fn log_level(&mut self, level: &str) -> &mut Self {
        self.add_option("-v", level)
    }

    /// Overwrite (`-y`) or never overwrite (`-n`) output files
    ///
    /// An earlier flag of the opposite polarity is dropped first.
    pub fn overwrite_output_files(&mut self, overwrite: bool) -> &mut Self {
        let (flag, opposite) = if overwrite { ("-y", "-n") } else { ("-n", "-y") };

        if let Some(index) = self.options.iter().position(|o| o == opposite) {
            self.options.remove(index);
        }

        self.add_option(flag, "")
    }

    /// Ignore input streams of unknown type
    pub fn ignore_unknown_stream_types(&mut self) -> &mut Self {
        self.add_option("-ignore_unknown", "")
    }

    /// Print the encoding progress report
    pub fn print_progress_report(&mut self) -> &mut Self {
        self.add_option("-stats", "")
    }

    /// Fraction of decoding errors tolerated before failing
    pub fn max_error_rate(&mut self, ratio: f64) -> &mut Self {
        self.add_option("-max_error_rate", ratio.to_string())
    }

    /// Bits per raw sample
    pub fn bits_per_raw_sample(&mut self, bits: u32) -> &mut Self {
        self.add_option("-bits_per_raw_sample", bits.to_string())
    }

    /// Global audio volume (256 is normal)
    pub fn volume(&mut self, volume: i32) -> &mut Self {
        self.add_option("-vol", volume.to_string())
    }

    /// Global options recorded so far
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Add an input file; its position among the inputs becomes its name
    pub fn add_input(&mut self, filename: impl Into<String>) -> FileMut<'_> {
        let name = self.inputs.len().to_string();
        let id = self.push_file(filename.into(), name, true);
        self.inputs.push(id);
        FileMut::new(self, id)
    }

    /// Add an output file
    pub fn add_output(&mut self, filename: impl Into<String>) -> FileMut<'_> {
        let id = self.push_file(filename.into(), String::new(), false);
        self.outputs.push(id);
        FileMut::new(self, id)
    }

    /// Input files in command-line order
    pub fn inputs(&self) -> &[FileId] {
        &self.inputs
    }

    /// Output files in command-line order
    pub fn outputs(&self) -> &[FileId] {
        &self.outputs
    }

    /// Raw black video frames read from `/dev/zero`
    pub fn generate_black_video(&mut self, width: u32, height: u32, duration: f64) -> FileMut<'_> {
        self.add_input("/dev/zero")
            .format("rawvideo")
            .duration(duration)
            .video_stream(0)
            .frame_size(&format!("{}x{}", width, height))
            .pixel_format("rgb24")
            .end()
    }

    /// Silent audio from the `aevalsrc` lavfi source
    pub fn generate_empty_audio(&mut self, duration: f64) -> FileMut<'_> {
        self.add_input("aevalsrc=0")
            .format("lavfi")
            .duration(duration)
    }

    /// Video looping a single picture
    pub fn generate_video_from_picture(
        &mut self,
        filename: impl Into<String>,
        duration: f64,
    ) -> FileMut<'_> {
        self.add_input(filename)
            .loop_input(true)
            .format("image2")
            .duration(duration)
    }

    /// Handle on a file of this command
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn file_mut(&mut self, id: FileId) -> FileMut<'_> {
        assert!(id.0 < self.files.len(), "file id does not belong to this command");
        FileMut::new(self, id)
    }

    /// Handle on a video stream of this command
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn video_stream_mut(&mut self, id: StreamId) -> BuildResult<StreamMut<'_, Video>> {
        self.stream_mut::<Video>(id)
    }

    /// Handle on an audio stream of this command
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn audio_stream_mut(&mut self, id: StreamId) -> BuildResult<StreamMut<'_, Audio>> {
        self.stream_mut::<Audio>(id)
    }

    /// Typed handle on a stream, checking the stream type
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn stream_mut<K: StreamKind>(&mut self, id: StreamId) -> BuildResult<StreamMut<'_, K>> {
        let actual = self.stream_type(id);
        if actual != K::TYPE {
            return Err(BuildError::StreamTypeMismatch {
                expected: K::TYPE,
                actual,
            });
        }

        Ok(StreamMut::new(self, id))
    }

    /// Type of a stream
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn stream_type(&self, id: StreamId) -> MediaType {
        assert!(id.0 < self.streams.len(), "stream id does not belong to this command");
        self.streams[id.0].kind
    }

    /// Typed handle on a filter chain, checking the chain kind
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn chain_mut<K: ChainKind>(&mut self, id: ChainId) -> BuildResult<FilterChainMut<'_, K>> {
        assert!(id.0 < self.chains.len(), "chain id does not belong to this command");
        let actual = self.chains[id.0].kind;
        if actual != K::TYPE {
            return Err(BuildError::ChainTypeMismatch {
                expected: K::TYPE,
                actual,
            });
        }

        Ok(FilterChainMut::new(self, id))
    }

    /// Handle on a filter graph of this command
    ///
    /// # Panics
    ///
    /// Panics if the id was handed out by another command.
    pub fn graph_mut(&mut self, id: GraphId) -> FilterGraphMut<'_> {
        assert!(id.0 < self.graphs.len(), "graph id does not belong to this command");
        FilterGraphMut::new(self, id)
    }

    /// Build the argument vector
    ///
    /// Global options come first, then every input file, then every output
    /// file. Fails without producing any tokens when a contract is broken.
    pub fn build(&mut self) -> BuildResult<Vec<String>> {
        if self.inputs.is_empty() {
            return Err(BuildError::MissingInput);
        }

        if self.outputs.is_empty() {
            return Err(BuildError::MissingOutput);
        }

        let mut args = self.options.clone();

        for id in self.inputs.clone() {
            args.extend(self.build_file(id)?);
        }

        for id in self.outputs.clone() {
            args.extend(self.build_file(id)?);
        }

        debug!(
            "built command from {} input(s) and {} output(s): {} tokens",
            self.inputs.len(),
            self.outputs.len(),
            args.len()
        );

        Ok(args)
    }

    /// Shell-escaped rendering of [`Command::build`], for display only
    pub fn to_shell_string(&mut self) -> BuildResult<String> {
        Ok(shell_join(&self.build()?))
    }

    fn push_file(&mut self, filename: String, name: String, is_input: bool) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(FileData::new(filename, name, is_input));
        id
    }
}
