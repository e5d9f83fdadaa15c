//! Filter graphs and filter chains
//!
//! A chain tracks the stream types it currently produces (its signature).
//! Every filter declares the signature it consumes and the one it produces,
//! and is rejected when the consumed signature does not match. Reading the
//! outputs of a chain materializes one synthetic stream per signature entry
//! and freezes the chain.

mod args;
mod audio;
mod complex;
mod graph;
mod video;

pub use args::FilterArgs;
pub(crate) use graph::GraphData;
pub use graph::{FilterGraphMut, GraphId};

use crate::command::Command;
use crate::core::{Audio, ChainKind, ChainType, Complex, MediaType, Video};
use crate::error::{BuildError, BuildResult};
use crate::stream::StreamId;
use log::{debug, trace};
use std::marker::PhantomData;

/// Identifier of a filter chain inside its [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub(crate) usize);

/// One stream or a list of streams, as accepted by the chain constructors
pub trait IntoStreams {
    /// Streams in input order
    fn into_streams(self) -> Vec<StreamId>;
}

impl IntoStreams for StreamId {
    fn into_streams(self) -> Vec<StreamId> {
        vec![self]
    }
}

impl IntoStreams for Vec<StreamId> {
    fn into_streams(self) -> Vec<StreamId> {
        self
    }
}

impl IntoStreams for &Vec<StreamId> {
    fn into_streams(self) -> Vec<StreamId> {
        self.clone()
    }
}

impl IntoStreams for &[StreamId] {
    fn into_streams(self) -> Vec<StreamId> {
        self.to_vec()
    }
}

impl<const N: usize> IntoStreams for [StreamId; N] {
    fn into_streams(self) -> Vec<StreamId> {
        self.to_vec()
    }
}

/// Stored state of one filter chain
#[derive(Debug, Clone)]
pub(crate) struct ChainData {
    pub(crate) graph: GraphId,
    pub(crate) kind: ChainType,
    pub(crate) inputs: Vec<StreamId>,
    pub(crate) filters: Vec<String>,
    /// Materialized outputs; `Some` freezes the chain
    pub(crate) outputs: Option<Vec<StreamId>>,
    /// Stream types the chain currently produces
    pub(crate) signature: Vec<MediaType>,
}

impl ChainData {
    fn new(graph: GraphId, kind: ChainType) -> Self {
        ChainData {
            graph,
            kind,
            inputs: Vec::new(),
            filters: Vec::new(),
            outputs: None,
            signature: Vec::new(),
        }
    }
}

fn render_signature(signature: &[MediaType]) -> String {
    signature
        .iter()
        .map(MediaType::tag)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Command {
    /// Register a chain in `graph`, consuming `inputs`
    pub(crate) fn push_chain(
        &mut self,
        graph: GraphId,
        kind: ChainType,
        inputs: Vec<StreamId>,
    ) -> ChainId {
        let id = ChainId(self.chains.len());
        self.chains.push(ChainData::new(graph, kind));
        self.graphs[graph.0].chains.push(id);

        for stream in inputs {
            self.attach_chain_input(id, stream);
        }

        id
    }

    fn attach_chain_input(&mut self, chain: ChainId, stream: StreamId) {
        let file = self.graphs[self.chains[chain.0].graph.0].file;
        self.detach_stream(file, stream);

        let kind = self.streams[stream.0].kind;
        let data = &mut self.chains[chain.0];
        data.inputs.push(stream);
        data.signature.push(kind);
    }

    pub(crate) fn add_chain_input(&mut self, chain: ChainId, stream: StreamId) -> BuildResult<()> {
        if !self.chains[chain.0].filters.is_empty() {
            return Err(BuildError::InputAfterFilter);
        }

        self.attach_chain_input(chain, stream);
        Ok(())
    }

    /// Append a rendered filter after checking the chain signature
    pub(crate) fn apply_filter(
        &mut self,
        chain: ChainId,
        name: &str,
        args: &FilterArgs,
        expected: &[MediaType],
        produced: Vec<MediaType>,
    ) -> BuildResult<()> {
        let data = &mut self.chains[chain.0];

        if data.outputs.is_some() {
            return Err(BuildError::ChainFrozen);
        }

        if data.signature != expected {
            return Err(BuildError::IncompatibleFilterInput {
                expected: render_signature(expected),
                actual: render_signature(&data.signature),
            });
        }

        let filter = args.render(name);
        trace!("chain {} <- {}", chain.0, filter);

        data.filters.push(filter);
        data.signature = produced;

        Ok(())
    }

    /// Output streams of a chain, materialized on first call
    pub(crate) fn chain_outputs(&mut self, chain: ChainId) -> BuildResult<Vec<StreamId>> {
        if let Some(outputs) = &self.chains[chain.0].outputs {
            return Ok(outputs.clone());
        }

        let file = self.graphs[self.chains[chain.0].graph.0].file;
        let signature = self.chains[chain.0].signature.clone();

        let mut outputs = Vec::with_capacity(signature.len());
        for kind in signature {
            outputs.push(self.create_stream(file, kind)?);
        }

        debug!(
            "chain {} materialized {} output stream(s)",
            chain.0,
            outputs.len()
        );

        self.chains[chain.0].outputs = Some(outputs.clone());
        Ok(outputs)
    }

    /// `[in] … f1, f2 … [out] …`
    pub(crate) fn build_chain(&mut self, chain: ChainId) -> BuildResult<String> {
        let outputs = self.chain_outputs(chain)?;

        let inputs = self.chains[chain.0].inputs.clone();
        let inputs: Vec<String> = inputs
            .into_iter()
            .map(|s| format!("[{}]", self.stream_name(s)))
            .collect();
        let outputs: Vec<String> = outputs
            .into_iter()
            .map(|s| format!("[{}]", self.stream_name(s)))
            .collect();

        Ok(format!(
            "{} {} {}",
            inputs.join(" "),
            self.chains[chain.0].filters.join(", "),
            outputs.join(" ")
        ))
    }
}

/// Mutable handle on a filter chain of kind `K`
///
/// Typed filters for video, audio and complex chains are provided on
/// [`VideoChainMut`], [`AudioChainMut`] and [`ComplexChainMut`].
#[derive(Debug)]
pub struct FilterChainMut<'a, K: ChainKind> {
    command: &'a mut Command,
    id: ChainId,
    kind: PhantomData<K>,
}

/// Handle on a video filter chain
pub type VideoChainMut<'a> = FilterChainMut<'a, Video>;

/// Handle on an audio filter chain
pub type AudioChainMut<'a> = FilterChainMut<'a, Audio>;

/// Handle on a complex filter chain
pub type ComplexChainMut<'a> = FilterChainMut<'a, Complex>;

impl<'a, K: ChainKind> FilterChainMut<'a, K> {
    pub(crate) fn new(command: &'a mut Command, id: ChainId) -> Self {
        FilterChainMut {
            command,
            id,
            kind: PhantomData,
        }
    }

    fn data(&self) -> &ChainData {
        &self.command.chains[self.id.0]
    }

    /// Identifier of this chain
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Input streams in label order
    pub fn input_streams(&self) -> &[StreamId] {
        &self.data().inputs
    }

    /// Rendered filters appended so far
    pub fn filters(&self) -> &[String] {
        &self.data().filters
    }

    /// Stream types the chain currently produces
    pub fn signature(&self) -> &[MediaType] {
        &self.data().signature
    }

    /// Append a filter consuming `expected` and producing `produced`
    ///
    /// Fails when the outputs were already read or when `expected` differs
    /// from the current signature; the chain is left unchanged on failure.
    pub fn filter(
        self,
        name: &str,
        args: FilterArgs,
        expected: &[MediaType],
        produced: Vec<MediaType>,
    ) -> BuildResult<Self> {
        self.command
            .apply_filter(self.id, name, &args, expected, produced)?;
        Ok(self)
    }

    /// Add one more input; only allowed before the first filter
    pub fn add_input_stream(self, stream: StreamId) -> BuildResult<Self> {
        self.command.add_chain_input(self.id, stream)?;
        Ok(self)
    }

    /// Output streams, one per signature entry; freezes the chain
    pub fn output_streams(&mut self) -> BuildResult<Vec<StreamId>> {
        self.command.chain_outputs(self.id)
    }

    /// Output stream `n`
    pub fn output_stream(&mut self, n: usize) -> BuildResult<StreamId> {
        let outputs = self.output_streams()?;
        outputs
            .get(n)
            .copied()
            .ok_or(BuildError::OutputStreamOutOfRange {
                index: n,
                count: outputs.len(),
            })
    }

    /// Output streams of one type, in signature order
    pub fn output_streams_of(&mut self, kind: MediaType) -> BuildResult<Vec<StreamId>> {
        let outputs = self.output_streams()?;
        Ok(outputs
            .into_iter()
            .filter(|s| self.command.stream_type(*s) == kind)
            .collect())
    }

    /// Empty chain of the same kind and signature, not registered in the graph
    pub fn fresh_clone(self) -> Self {
        let data = self.data();
        let mut clone = ChainData::new(data.graph, data.kind);
        clone.signature = data.signature.clone();

        let id = ChainId(self.command.chains.len());
        self.command.chains.push(clone);
        FilterChainMut::new(self.command, id)
    }

    /// Rendered chain; materializes the outputs
    pub fn build(&mut self) -> BuildResult<String> {
        self.command.build_chain(self.id)
    }

    /// Back to the owning graph
    pub fn end(self) -> FilterGraphMut<'a> {
        let graph = self.data().graph;
        FilterGraphMut::new(self.command, graph)
    }
}
