//! Input and output files: file options, stream slots, filter graph

mod slots;

pub(crate) use slots::StreamSlots;

use crate::command::Command;
use crate::core::{join_label, push_option, shell_join, Audio, MediaType, StreamName, Video};
use crate::error::{BuildError, BuildResult};
use crate::filter::{FilterGraphMut, GraphId};
use crate::stream::{StreamData, StreamId, StreamMut};

/// Identifier of a file inside its [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub(crate) usize);

/// Stored state of one file
#[derive(Debug, Clone)]
pub(crate) struct FileData {
    pub(crate) filename: String,
    /// Prefix of the labels of the streams this file owns
    pub(crate) name: String,
    pub(crate) is_input: bool,
    pub(crate) options: Vec<String>,
    pub(crate) video: StreamSlots,
    pub(crate) audio: StreamSlots,
    pub(crate) graph: Option<GraphId>,
    /// Shared by video and audio synthetic stream labels
    pub(crate) streams_counter: usize,
}

impl FileData {
    pub(crate) fn new(filename: String, name: String, is_input: bool) -> Self {
        FileData {
            filename,
            name,
            is_input,
            options: Vec::new(),
            video: StreamSlots::default(),
            audio: StreamSlots::default(),
            graph: None,
            streams_counter: 0,
        }
    }

    pub(crate) fn slots(&self, kind: MediaType) -> &StreamSlots {
        match kind {
            MediaType::Video => &self.video,
            MediaType::Audio => &self.audio,
        }
    }

    pub(crate) fn slots_mut(&mut self, kind: MediaType) -> &mut StreamSlots {
        match kind {
            MediaType::Video => &mut self.video,
            MediaType::Audio => &mut self.audio,
        }
    }
}

impl Command {
    /// Position of a stream among the same-type streams of `file`
    pub(crate) fn stream_number(&mut self, file: FileId, stream: StreamId) -> Option<usize> {
        let kind = self.streams[stream.0].kind;
        let slots = self.files[file.0].slots_mut(kind);
        slots.compact();
        slots.position(stream)
    }

    /// Detach a stream from the slot lists of `file` so it is built at most once
    pub(crate) fn detach_stream(&mut self, file: FileId, stream: StreamId) {
        let data = &mut self.files[file.0];
        data.video.remove(stream);
        data.audio.remove(stream);
    }

    /// Mint an unmapped synthetic stream labelled after the file and its counter
    pub(crate) fn create_stream(&mut self, file: FileId, kind: MediaType) -> BuildResult<StreamId> {
        let data = &mut self.files[file.0];
        if data.is_input {
            return Err(BuildError::OutputOnly {
                operation: match kind {
                    MediaType::Video => "CreateVideoStream",
                    MediaType::Audio => "CreateAudioStream",
                },
            });
        }

        let label = format!("{}{}_{}", kind.tag(), data.name, data.streams_counter);
        data.streams_counter += 1;

        Ok(self.push_stream(StreamData::new(
            file,
            StreamName::Resolved(label),
            kind,
            false,
        )))
    }

    /// Stream stored under slot `key`, created on first access
    pub(crate) fn slot_stream(&mut self, file: FileId, kind: MediaType, key: usize) -> StreamId {
        if let Some(id) = self.files[file.0].slots(kind).get(key) {
            return id;
        }

        let data = &self.files[file.0];
        let label = join_label(&[&data.name, kind.tag(), &key.to_string()]);
        let is_input = data.is_input;

        let id = self.push_stream(StreamData::new(
            file,
            StreamName::Resolved(label),
            kind,
            is_input,
        ));
        self.files[file.0].slots_mut(kind).insert(key, id);
        id
    }

    /// Append a new output stream, mapping it to `source` when given
    pub(crate) fn add_stream(
        &mut self,
        file: FileId,
        kind: MediaType,
        source: Option<StreamId>,
    ) -> BuildResult<StreamId> {
        if self.files[file.0].is_input {
            return Err(BuildError::OutputOnly {
                operation: match kind {
                    MediaType::Video => "AddVideoStream",
                    MediaType::Audio => "AddAudioStream",
                },
            });
        }

        if let Some(source) = source {
            let actual = self.streams[source.0].kind;
            if actual != kind {
                return Err(BuildError::StreamTypeMismatch {
                    expected: kind,
                    actual,
                });
            }
        }

        let id = self.push_stream(StreamData::new(file, StreamName::Pending, kind, false));
        self.files[file.0].slots_mut(kind).push(id);

        if let Some(source) = source {
            self.map_stream(id, source)?;
        }

        Ok(id)
    }

    /// Reorder an output stream among its same-type siblings
    pub(crate) fn move_stream(
        &mut self,
        file: FileId,
        stream: StreamId,
        position: usize,
    ) -> BuildResult<()> {
        if self.streams[stream.0].is_input {
            return Err(BuildError::InputStreamReorder);
        }

        let Some(number) = self.stream_number(file, stream) else {
            return Err(BuildError::StreamNotFound {
                name: self.stream_name(stream),
            });
        };

        let kind = self.streams[stream.0].kind;
        self.files[file.0].slots_mut(kind).relocate(number, position);
        Ok(())
    }

    /// Options, filter graph, video streams, audio streams, `-i` for inputs, filename
    pub(crate) fn build_file(&mut self, file: FileId) -> BuildResult<Vec<String>> {
        let mut tokens = self.files[file.0].options.clone();

        if let Some(graph) = self.files[file.0].graph {
            tokens.extend(self.build_graph(graph)?);
        }

        for kind in [MediaType::Video, MediaType::Audio] {
            for stream in self.files[file.0].slots(kind).ids() {
                tokens.extend(self.build_stream(stream)?);
            }
        }

        let data = &self.files[file.0];
        if data.is_input {
            tokens.push("-i".to_string());
        }
        tokens.push(data.filename.clone());

        Ok(tokens)
    }
}

/// Mutable handle on one file of a [`Command`]
#[derive(Debug)]
pub struct FileMut<'a> {
    command: &'a mut Command,
    id: FileId,
}

impl<'a> FileMut<'a> {
    pub(crate) fn new(command: &'a mut Command, id: FileId) -> Self {
        FileMut { command, id }
    }

    fn data(&self) -> &FileData {
        &self.command.files[self.id.0]
    }

    fn data_mut(&mut self) -> &mut FileData {
        &mut self.command.files[self.id.0]
    }

    fn output_only(self, operation: &'static str) -> BuildResult<Self> {
        if self.is_input() {
            return Err(BuildError::OutputOnly { operation });
        }
        Ok(self)
    }

    /// Identifier of this file
    pub fn id(&self) -> FileId {
        self.id
    }

    /// Path or URL of the file
    pub fn filename(&self) -> &str {
        &self.data().filename
    }

    /// Label prefix of the streams of this file (`"0"`, `"1"`, … for inputs)
    pub fn name(&self) -> &str {
        &self.data().name
    }

    /// Whether this is an input file
    pub fn is_input(&self) -> bool {
        self.data().is_input
    }

    /// File options recorded so far
    pub fn options(&self) -> &[String] {
        &self.data().options
    }

    /// Add a file option
    pub fn add_option(mut self, name: &str, argument: impl Into<String>) -> Self {
        push_option(&mut self.data_mut().options, name, &argument.into());
        self
    }

    /// Force the container format
    pub fn format(self, format: &str) -> Self {
        self.add_option("-f", format)
    }

    /// Codec for every stream of the file
    pub fn codec(self, codec: &str) -> Self {
        self.add_option("-c", codec)
    }

    /// Preset file
    pub fn preset(self, preset: &str) -> Self {
        self.add_option("-pre", preset)
    }

    /// Limit the duration read or written, in seconds
    pub fn duration(self, seconds: f64) -> Self {
        self.add_option("-t", seconds.to_string())
    }

    /// Stop at the given position, in seconds
    pub fn to_time(self, seconds: f64) -> Self {
        self.add_option("-to", seconds.to_string())
    }

    /// File size limit in bytes
    pub fn filesize(self, bytes: u64) -> Self {
        self.add_option("-fs", bytes.to_string())
    }

    /// Seek to the given position, in seconds
    pub fn start_time(self, seconds: f64) -> Self {
        self.add_option("-ss", seconds.to_string())
    }

    /// Seek relative to the end of the file
    pub fn start_time_from_end(self, seconds: f64) -> Self {
        self.add_option("-sseof", seconds.to_string())
    }

    /// Interpret the seek position as a timestamp
    pub fn seek_timestamp(self) -> Self {
        self.add_option("-seek_timestamp", "")
    }

    /// Recording timestamp in the container
    pub fn timestamp(self, time: &str) -> Self {
        self.add_option("-timestamp", time)
    }

    /// Metadata `key=value` pair
    pub fn metadata(self, key: &str, value: &str) -> Self {
        self.add_option("-metadata", format!("{}={}", key, value))
    }

    /// Target file type (`vcd`, `pal-dvd`, …)
    pub fn target(self, target: &str) -> Self {
        self.add_option("-target", target)
    }

    /// Pad the audio streams
    pub fn apad(self) -> Self {
        self.add_option("-apad", "")
    }

    /// Number of frames to write
    pub fn frames(self, count: u64) -> Self {
        self.add_option("-frames", count.to_string())
    }

    /// Read the filter graph from a file
    pub fn filter_script(self, filename: &str) -> Self {
        self.add_option("-filter_script", filename)
    }

    /// Reinitialize filters on input changes
    pub fn reinit_filter(self) -> Self {
        self.add_option("-reinit_filter", "")
    }

    /// Discard frames
    pub fn discard(self) -> Self {
        self.add_option("-discard", "")
    }

    /// Stream disposition
    pub fn disposition(self) -> Self {
        self.add_option("-disposition", "")
    }

    /// Accurate seeking
    pub fn accurate_seek(self) -> Self {
        self.add_option("-accurate_seek", "")
    }

    /// Finish with the shortest input stream
    pub fn shortest(self) -> Self {
        self.add_option("-shortest", "")
    }

    /// Encoder profile
    pub fn profile(self, profile: &str) -> Self {
        self.add_option("-profile", profile)
    }

    /// Attach a file as a stream (output files only)
    pub fn attach(self, filename: &str) -> BuildResult<Self> {
        Ok(self.output_only("Attach")?.add_option("-attach", filename))
    }

    /// Move the index to the start of the file (output files only)
    pub fn move_header_to_start(self) -> BuildResult<Self> {
        Ok(self
            .output_only("Movflags")?
            .add_option("-movflags", "faststart"))
    }

    /// Loop over the input (`-loop 1` / `-loop 0`)
    pub fn loop_input(self, enabled: bool) -> Self {
        self.add_option("-loop", if enabled { "1" } else { "0" })
    }

    /// Append an output video stream, mapped to `source` when given
    pub fn add_video_stream(self, source: Option<StreamId>) -> BuildResult<StreamMut<'a, Video>> {
        let id = self.command.add_stream(self.id, MediaType::Video, source)?;
        Ok(StreamMut::new(self.command, id))
    }

    /// Append an output audio stream, mapped to `source` when given
    pub fn add_audio_stream(self, source: Option<StreamId>) -> BuildResult<StreamMut<'a, Audio>> {
        let id = self.command.add_stream(self.id, MediaType::Audio, source)?;
        Ok(StreamMut::new(self.command, id))
    }

    /// Video stream `n` of the file, created on first access
    pub fn video_stream(self, n: usize) -> StreamMut<'a, Video> {
        let id = self.command.slot_stream(self.id, MediaType::Video, n);
        StreamMut::new(self.command, id)
    }

    /// Audio stream `n` of the file, created on first access
    pub fn audio_stream(self, n: usize) -> StreamMut<'a, Audio> {
        let id = self.command.slot_stream(self.id, MediaType::Audio, n);
        StreamMut::new(self.command, id)
    }

    /// New synthetic video stream, not registered in the file (output files only)
    pub fn create_video_stream(self) -> BuildResult<StreamMut<'a, Video>> {
        let id = self.command.create_stream(self.id, MediaType::Video)?;
        Ok(StreamMut::new(self.command, id))
    }

    /// New synthetic audio stream, not registered in the file (output files only)
    pub fn create_audio_stream(self) -> BuildResult<StreamMut<'a, Audio>> {
        let id = self.command.create_stream(self.id, MediaType::Audio)?;
        Ok(StreamMut::new(self.command, id))
    }

    /// New synthetic stream of the given type (output files only)
    pub fn create_stream(&mut self, kind: MediaType) -> BuildResult<StreamId> {
        self.command.create_stream(self.id, kind)
    }

    /// Current position of a stream among its same-type siblings
    pub fn stream_number(&mut self, stream: StreamId) -> Option<usize> {
        self.command.stream_number(self.id, stream)
    }

    /// Video streams in build order
    pub fn video_streams(&self) -> Vec<StreamId> {
        self.data().video.ids()
    }

    /// Audio streams in build order
    pub fn audio_streams(&self) -> Vec<StreamId> {
        self.data().audio.ids()
    }

    /// Move an output stream to `position` among its same-type siblings
    pub fn move_stream_to_position(self, stream: StreamId, position: usize) -> BuildResult<Self> {
        self.command.move_stream(self.id, stream, position)?;
        Ok(self)
    }

    /// Remove a stream from the file; unknown streams are ignored
    pub fn remove_stream(self, stream: StreamId) -> Self {
        self.command.detach_stream(self.id, stream);
        self
    }

    /// Filter graph of the file, created on first access
    pub fn filter(self) -> FilterGraphMut<'a> {
        let graph = match self.data().graph {
            Some(graph) => graph,
            None => {
                let graph = self.command.push_graph(self.id);
                self.command.files[self.id.0].graph = Some(graph);
                graph
            }
        };

        FilterGraphMut::new(self.command, graph)
    }

    /// Empty file of the same name and direction, not registered in the command
    ///
    /// The synthetic stream counter carries over, so labels minted on the
    /// clone never repeat the original's.
    pub fn fresh_clone(self) -> Self {
        let data = self.data();
        let mut clone = FileData::new(data.filename.clone(), data.name.clone(), data.is_input);
        clone.streams_counter = data.streams_counter;

        let id = FileId(self.command.files.len());
        self.command.files.push(clone);
        FileMut::new(self.command, id)
    }

    /// Tokens of this file alone
    pub fn build(&mut self) -> BuildResult<Vec<String>> {
        self.command.build_file(self.id)
    }

    /// Shell-escaped rendering of [`FileMut::build`], for display only
    pub fn to_shell_string(&mut self) -> BuildResult<String> {
        Ok(shell_join(&self.build()?))
    }

    /// Back to the command
    pub fn end(self) -> &'a mut Command {
        self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_build_order() {
        let mut command = Command::new();
        let tokens = command
            .add_input("in.mov")
            .format("mov")
            .start_time(1.5)
            .build()
            .unwrap();

        assert_eq!(tokens, vec!["-f", "mov", "-ss", "1.5", "-i", "in.mov"]);
    }

    #[test]
    fn test_output_only_operations_rejected_on_inputs() {
        let mut command = Command::new();
        let input = command.add_input("in.mov").id();

        assert!(matches!(
            command.file_mut(input).attach("cover.png"),
            Err(BuildError::OutputOnly { operation: "Attach" })
        ));
        assert!(matches!(
            command.file_mut(input).move_header_to_start(),
            Err(BuildError::OutputOnly { .. })
        ));
        assert!(matches!(
            command.file_mut(input).add_video_stream(None),
            Err(BuildError::OutputOnly { .. })
        ));
        assert!(matches!(
            command.file_mut(input).create_audio_stream(),
            Err(BuildError::OutputOnly { .. })
        ));
        assert!(command.file_mut(input).video_streams().is_empty());
    }

    #[test]
    fn test_stream_accessor_is_idempotent() {
        let mut command = Command::new();
        let input = command.add_input("in.mov").id();

        let first = command.file_mut(input).video_stream(0).id();
        let second = command.file_mut(input).video_stream(0).id();
        assert_eq!(first, second);
        assert_eq!(command.file_mut(input).video_streams(), vec![first]);
    }

    #[test]
    fn test_input_stream_labels() {
        let mut command = Command::new();
        command.add_input("first.mov");
        let mut second = command.add_input("second.mov");
        assert_eq!(second.name(), "1");

        let mut stream = second.audio_stream(2);
        assert_eq!(stream.name(), "1:a:2");
    }

    #[test]
    fn test_synthetic_streams_share_counter() {
        let mut command = Command::new();
        let output = command.add_output("out.mp4").id();

        let mut video = command.file_mut(output).create_video_stream().unwrap();
        assert_eq!(video.name(), "v_0");
        let mut audio = command.file_mut(output).create_audio_stream().unwrap();
        assert_eq!(audio.name(), "a_1");

        assert!(command.file_mut(output).video_streams().is_empty());
        assert!(command.file_mut(output).audio_streams().is_empty());
    }

    #[test]
    fn test_move_stream_to_position() {
        let mut command = Command::new();
        let input = command.add_input("in.mov").id();
        let output = command.add_output("out.mp4").id();

        let sources: Vec<StreamId> = (0..3)
            .map(|n| command.file_mut(input).audio_stream(n).id())
            .collect();
        let streams: Vec<StreamId> = sources
            .iter()
            .map(|s| {
                command
                    .file_mut(output)
                    .add_audio_stream(Some(*s))
                    .unwrap()
                    .id()
            })
            .collect();

        let mut file = command
            .file_mut(output)
            .move_stream_to_position(streams[0], 2)
            .unwrap();
        assert_eq!(file.stream_number(streams[0]), Some(2));
        assert_eq!(file.stream_number(streams[1]), Some(0));

        let tokens = file.build().unwrap();
        assert_eq!(
            tokens,
            vec![
                "-map", "0:a:1", "-c:a:0", "copy", "-map", "0:a:2", "-c:a:1", "copy", "-map",
                "0:a:0", "-c:a:2", "copy", "out.mp4",
            ]
        );
    }

    #[test]
    fn test_input_streams_cannot_be_reordered() {
        let mut command = Command::new();
        let input = command.add_input("in.mov").id();
        let stream = command.file_mut(input).video_stream(0).id();

        assert!(matches!(
            command.file_mut(input).move_stream_to_position(stream, 1),
            Err(BuildError::InputStreamReorder)
        ));
    }

    #[test]
    fn test_move_unknown_stream_fails() {
        let mut command = Command::new();
        let output = command.add_output("out.mp4").id();
        let other = command.add_output("other.mp4").id();
        let stream = command
            .file_mut(other)
            .add_video_stream(None)
            .unwrap()
            .id();

        assert!(matches!(
            command.file_mut(output).move_stream_to_position(stream, 0),
            Err(BuildError::StreamNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_stream_is_noop_when_absent() {
        let mut command = Command::new();
        let input = command.add_input("in.mov").id();
        let output = command.add_output("out.mp4").id();
        let source = command.file_mut(input).video_stream(0).id();
        let stream = command
            .file_mut(output)
            .add_video_stream(Some(source))
            .unwrap()
            .id();

        let file = command.file_mut(output).remove_stream(source);
        assert_eq!(file.video_streams(), vec![stream]);

        let file = file.remove_stream(stream);
        assert!(file.video_streams().is_empty());
    }

    #[test]
    fn test_filter_graph_is_created_once() {
        let mut command = Command::new();
        let output = command.add_output("out.mp4").id();

        let first = command.file_mut(output).filter().id();
        let second = command.file_mut(output).filter().id();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fresh_clone_keeps_identity_only() {
        let mut command = Command::new();
        let mut clone = command
            .add_input("in.mov")
            .format("mov")
            .fresh_clone();

        assert_eq!(clone.filename(), "in.mov");
        assert_eq!(clone.name(), "0");
        assert!(clone.is_input());
        assert!(clone.options().is_empty());
        assert_eq!(clone.build().unwrap(), vec!["-i", "in.mov"]);
        assert_eq!(command.inputs().len(), 1);
    }

    #[test]
    fn test_fresh_clone_continues_stream_labels() {
        let mut command = Command::new();
        let mut output = command.add_output("out.mp4");
        output.create_stream(MediaType::Video).unwrap();

        let mut video = output.fresh_clone().create_video_stream().unwrap();
        assert_eq!(video.name(), "v_1");
    }

    #[test]
    fn test_typed_setters() {
        let mut command = Command::new();
        let tokens = command
            .add_output("out.mkv")
            .metadata("title", "Demo")
            .to_time(30.0)
            .filesize(1024)
            .loop_input(false)
            .attach("font.ttf")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                "-metadata", "title=Demo", "-to", "30", "-fs", "1024", "-loop", "0", "-attach",
                "font.ttf", "out.mkv",
            ]
        );
    }
}
