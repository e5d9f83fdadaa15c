//! Stream handles: options, mapping, per-stream build

mod audio;
mod video;

use crate::command::Command;
use crate::core::{
    join_label, shell_join, Audio, MediaType, StreamKind, StreamName, StreamOption, Video,
};
use crate::error::{BuildError, BuildResult};
use crate::file::{FileId, FileMut};
use std::marker::PhantomData;

/// Identifier of a stream inside its [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub(crate) usize);

/// Stored state of one stream
#[derive(Debug, Clone)]
pub(crate) struct StreamData {
    pub(crate) file: FileId,
    pub(crate) name: StreamName,
    pub(crate) kind: MediaType,
    pub(crate) is_input: bool,
    pub(crate) options: Vec<StreamOption>,
    pub(crate) custom_codec: bool,
    pub(crate) mapped: bool,
}

impl StreamData {
    pub(crate) fn new(file: FileId, name: StreamName, kind: MediaType, is_input: bool) -> Self {
        StreamData {
            file,
            name,
            kind,
            is_input,
            options: Vec::new(),
            custom_codec: false,
            mapped: false,
        }
    }
}

/// Handle on a video stream
pub type VideoStreamMut<'a> = StreamMut<'a, Video>;

/// Handle on an audio stream
pub type AudioStreamMut<'a> = StreamMut<'a, Audio>;

impl Command {
    pub(crate) fn push_stream(&mut self, data: StreamData) -> StreamId {
        let id = StreamId(self.streams.len());
        self.streams.push(data);
        id
    }

    /// Label of a stream, fixing a pending label from its current position
    pub(crate) fn stream_name(&mut self, stream: StreamId) -> String {
        if let StreamName::Resolved(name) = &self.streams[stream.0].name {
            return name.clone();
        }

        let data = &self.streams[stream.0];
        let (file, kind) = (data.file, data.kind);
        let number = self
            .stream_number(file, stream)
            .map(|n| n.to_string())
            .unwrap_or_default();
        let name = join_label(&[&self.files[file.0].name, kind.tag(), &number]);

        self.streams[stream.0].name = StreamName::Resolved(name.clone());
        name
    }

    /// Bind `target` to `source` with a `-map` option
    pub(crate) fn map_stream(&mut self, target: StreamId, source: StreamId) -> BuildResult<()> {
        let expected = self.streams[target.0].kind;
        let actual = self.streams[source.0].kind;
        if expected != actual {
            return Err(BuildError::StreamTypeMismatch { expected, actual });
        }

        let file = self.streams[target.0].file;
        self.detach_stream(file, source);

        let source_name = self.stream_name(source);
        let argument = if self.streams[source.0].is_input {
            source_name
        } else {
            self.streams[target.0].name = StreamName::Resolved(source_name.clone());
            format!("[{}]", source_name)
        };

        let data = &mut self.streams[target.0];
        data.options.push(StreamOption {
            name: "-map".to_string(),
            argument,
            per_stream: false,
        });
        data.mapped = true;

        Ok(())
    }

    /// Recorded options with the stream specifier, plus the implicit copy codec
    pub(crate) fn build_stream(&mut self, stream: StreamId) -> BuildResult<Vec<String>> {
        let (file, kind, is_input, mapped) = {
            let data = &self.streams[stream.0];
            (data.file, data.kind, data.is_input, data.mapped)
        };

        if !is_input && !mapped {
            return Err(BuildError::UnmappedStream {
                name: self.stream_name(stream),
            });
        }

        let number = self
            .stream_number(file, stream)
            .map(|n| n.to_string())
            .unwrap_or_default();
        let specifier = format!("{}:{}", kind.tag(), number);

        let data = &self.streams[stream.0];
        let mut tokens = Vec::new();
        for option in &data.options {
            option.render(&specifier, &mut tokens);
        }

        if !data.is_input && !data.custom_codec {
            tokens.push(format!("-c:{}", specifier));
            tokens.push("copy".to_string());
        }

        Ok(tokens)
    }
}

/// Mutable handle on a stream of type `K`
///
/// Setters consume and return the handle so calls chain; [`StreamMut::end`]
/// goes back to the owning file.
#[derive(Debug)]
pub struct StreamMut<'a, K: StreamKind> {
    pub(crate) command: &'a mut Command,
    id: StreamId,
    kind: PhantomData<K>,
}

impl<'a, K: StreamKind> StreamMut<'a, K> {
    pub(crate) fn new(command: &'a mut Command, id: StreamId) -> Self {
        StreamMut {
            command,
            id,
            kind: PhantomData,
        }
    }

    fn data(&self) -> &StreamData {
        &self.command.streams[self.id.0]
    }

    fn data_mut(&mut self) -> &mut StreamData {
        &mut self.command.streams[self.id.0]
    }

    /// Identifier of this stream
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Label of this stream, as used in `-map` and filter graphs
    ///
    /// An output stream without an explicit label takes `<type>:<position>`
    /// at first read and keeps it afterwards.
    pub fn name(&mut self) -> String {
        self.command.stream_name(self.id)
    }

    /// Whether this stream belongs to an input file
    pub fn is_input(&self) -> bool {
        self.data().is_input
    }

    /// Owning file
    pub fn file(&self) -> FileId {
        self.data().file
    }

    /// Add an option without a stream specifier
    pub fn add_option(mut self, name: &str, argument: impl Into<String>) -> Self {
        self.data_mut().options.push(StreamOption {
            name: name.to_string(),
            argument: argument.into(),
            per_stream: false,
        });
        self
    }

    /// Add an option that receives the `:<type>:<index>` stream specifier
    pub fn add_stream_option(mut self, name: &str, argument: impl Into<String>) -> Self {
        self.data_mut().options.push(StreamOption {
            name: name.to_string(),
            argument: argument.into(),
            per_stream: true,
        });
        self
    }

    /// Copy the stream as is
    pub fn copy(mut self) -> Self {
        self.data_mut().custom_codec = false;
        self
    }

    /// Drop every stream of this type from the file (`-vn` / `-an`)
    pub fn disable(mut self) -> Self {
        self.data_mut().custom_codec = true;
        self.add_option(K::TYPE.disable_flag(), "")
    }

    /// Encode with the given codec
    pub fn codec(mut self, codec: &str) -> Self {
        self.data_mut().custom_codec = true;
        self.add_stream_option("-c", codec)
    }

    /// Encoder profile
    pub fn profile(self, profile: &str) -> Self {
        self.add_stream_option("-profile", profile)
    }

    /// Bitrate (`64k`, `2M`, …)
    pub fn bitrate(self, bitrate: &str) -> Self {
        self.add_stream_option("-b", bitrate)
    }

    /// Number of frames to write
    pub fn frames(self, count: u64) -> Self {
        self.add_stream_option("-frames", count.to_string())
    }

    /// Map this stream to `source`, a stream of the same type
    ///
    /// `source` is removed from this stream's file so it is not built twice.
    /// A filter graph output lends its label to this stream.
    pub fn map(self, source: StreamId) -> BuildResult<Self> {
        self.command.map_stream(self.id, source)?;
        Ok(self)
    }

    /// Move this stream to `position` among its same-type siblings
    pub fn move_to(self, position: usize) -> BuildResult<Self> {
        let file = self.file();
        self.command.move_stream(file, self.id, position)?;
        Ok(self)
    }

    /// Unregistered stream of the same label and type without any options
    pub fn fresh_clone(self) -> Self {
        let data = self.data();
        let clone = StreamData::new(data.file, data.name.clone(), data.kind, data.is_input);
        let id = self.command.push_stream(clone);
        StreamMut::new(self.command, id)
    }

    /// Tokens of this stream alone
    pub fn build(&mut self) -> BuildResult<Vec<String>> {
        self.command.build_stream(self.id)
    }

    /// Shell-escaped rendering of [`StreamMut::build`], for display only
    pub fn to_shell_string(&mut self) -> BuildResult<String> {
        Ok(shell_join(&self.build()?))
    }

    /// Back to the owning file
    pub fn end(self) -> FileMut<'a> {
        let file = self.file();
        FileMut::new(self.command, file)
    }
}
