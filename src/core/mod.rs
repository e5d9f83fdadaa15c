//! Shared value types used across the builder graph

/// Stream and chain type tags, channel layouts
pub mod media;
/// Stream option records and token helpers
pub mod option;

pub use media::{
    leading_integer, Audio, ChainKind, ChainType, ChannelLayout, Complex, MediaType, StreamKind,
    Video,
};
pub use option::{join_label, push_option, shell_join, StreamName, StreamOption};
