use crate::core::{ChainType, MediaType};
use std::io;
use thiserror::Error;

/// Result type for command building operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Contract violations raised while describing or building a command
///
/// Every variant is a precondition failure: nothing in the crate catches or
/// retries them, they surface at the call that broke the contract.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Command has no input files
    #[error("You should specify at least one input file")]
    MissingInput,

    /// Command has no output files
    #[error("You should specify at least one output file")]
    MissingOutput,

    /// Output-only operation called on an input file
    #[error("{operation} can be used only for output files")]
    OutputOnly {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Attempt to reorder a stream that belongs to an input file
    #[error("You cannot reorder streams in the input file")]
    InputStreamReorder,

    /// Output stream reached the build without a source
    #[error("Stream \"{name}\" is not connected to any output")]
    UnmappedStream {
        /// Label of the stream
        name: String,
    },

    /// Stream is not registered in its file
    #[error("Stream {name} not found")]
    StreamNotFound {
        /// Label of the stream
        name: String,
    },

    /// Stream of the wrong kind passed where a video or audio stream was required
    #[error("Stream type mismatch: expected {expected}, got {actual}")]
    StreamTypeMismatch {
        /// Required stream type
        expected: MediaType,
        /// Type of the offending stream
        actual: MediaType,
    },

    /// Filter chain of the wrong kind requested by id
    #[error("Filter chain type mismatch: expected {expected}, got {actual}")]
    ChainTypeMismatch {
        /// Required chain kind
        expected: ChainType,
        /// Kind of the stored chain
        actual: ChainType,
    },

    /// Textual stream type tag is neither video nor audio
    #[error("Unknown stream type: {0}")]
    UnknownStreamType(String),

    /// Filter appended after the chain outputs were read
    #[error("You cannot add filter after building chain")]
    ChainFrozen,

    /// Input stream added after the first filter
    #[error("Input streams can be added only before filters")]
    InputAfterFilter,

    /// Filter inputs do not line up with the current chain outputs
    #[error("Incompatible filter input, expected: \"{expected}\", actual: \"{actual}\"")]
    IncompatibleFilterInput {
        /// Signature the filter declared
        expected: String,
        /// Signature the chain currently produces
        actual: String,
    },

    /// Concat inputs cannot be split into equal segments
    #[error("All segments must have the same number of streams of each type (video: {video}, audio: {audio})")]
    UnevenConcatSegments {
        /// Number of video inputs
        video: usize,
        /// Number of audio inputs
        audio: usize,
    },

    /// Filter called without one of its required arguments
    #[error("You must specify {argument} for the {filter} filter")]
    MissingFilterArgument {
        /// Filter name
        filter: &'static str,
        /// Missing argument key
        argument: &'static str,
    },

    /// Requested chain output does not exist
    #[error("Output stream {index} is out of range, chain has {count} outputs")]
    OutputStreamOutOfRange {
        /// Requested position
        index: usize,
        /// Number of outputs of the chain
        count: usize,
    },

    /// Profile value could not be interpreted
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// IO error (profile files, probe dumps)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
