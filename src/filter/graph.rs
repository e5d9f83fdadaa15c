use super::{ChainId, FilterChainMut, IntoStreams};
use crate::command::Command;
use crate::core::{shell_join, Audio, ChainType, Complex, Video};
use crate::error::BuildResult;
use crate::file::{FileId, FileMut};

/// Identifier of a filter graph inside its [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(pub(crate) usize);

/// Stored state of one filter graph
#[derive(Debug, Clone)]
pub(crate) struct GraphData {
    pub(crate) file: FileId,
    pub(crate) chains: Vec<ChainId>,
}

impl Command {
    pub(crate) fn push_graph(&mut self, file: FileId) -> GraphId {
        let id = GraphId(self.graphs.len());
        self.graphs.push(GraphData {
            file,
            chains: Vec::new(),
        });
        id
    }

    /// `-filter_complex` and the chains joined by `; `, nothing when empty
    pub(crate) fn build_graph(&mut self, graph: GraphId) -> BuildResult<Vec<String>> {
        let chains = self.graphs[graph.0].chains.clone();
        if chains.is_empty() {
            return Ok(Vec::new());
        }

        let mut rendered = Vec::with_capacity(chains.len());
        for chain in chains {
            rendered.push(self.build_chain(chain)?);
        }

        Ok(vec!["-filter_complex".to_string(), rendered.join("; ")])
    }
}

/// Mutable handle on the filter graph of a file
#[derive(Debug)]
pub struct FilterGraphMut<'a> {
    command: &'a mut Command,
    id: GraphId,
}

impl<'a> FilterGraphMut<'a> {
    pub(crate) fn new(command: &'a mut Command, id: GraphId) -> Self {
        FilterGraphMut { command, id }
    }

    /// Identifier of this graph
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Owning file
    pub fn file(&self) -> FileId {
        self.command.graphs[self.id.0].file
    }

    /// Chains in rendering order
    pub fn chains(&self) -> &[ChainId] {
        &self.command.graphs[self.id.0].chains
    }

    /// Append a video chain consuming `inputs`
    pub fn video(self, inputs: impl IntoStreams) -> FilterChainMut<'a, Video> {
        let chain = self
            .command
            .push_chain(self.id, ChainType::Video, inputs.into_streams());
        FilterChainMut::new(self.command, chain)
    }

    /// Append an audio chain consuming `inputs`
    pub fn audio(self, inputs: impl IntoStreams) -> FilterChainMut<'a, Audio> {
        let chain = self
            .command
            .push_chain(self.id, ChainType::Audio, inputs.into_streams());
        FilterChainMut::new(self.command, chain)
    }

    /// Append a complex chain consuming `inputs`
    pub fn complex(self, inputs: impl IntoStreams) -> FilterChainMut<'a, Complex> {
        let chain = self
            .command
            .push_chain(self.id, ChainType::Complex, inputs.into_streams());
        FilterChainMut::new(self.command, chain)
    }

    /// Empty graph on the same file, not attached to it
    pub fn fresh_clone(self) -> Self {
        let file = self.file();
        let id = self.command.push_graph(file);
        FilterGraphMut::new(self.command, id)
    }

    /// Tokens of this graph alone
    pub fn build(&mut self) -> BuildResult<Vec<String>> {
        self.command.build_graph(self.id)
    }

    /// Shell-escaped rendering of [`FilterGraphMut::build`], for display only
    pub fn to_shell_string(&mut self) -> BuildResult<String> {
        Ok(shell_join(&self.build()?))
    }

    /// Back to the owning file
    pub fn end(self) -> FileMut<'a> {
        let file = self.file();
        FileMut::new(self.command, file)
    }
}
