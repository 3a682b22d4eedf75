//! Dependency graph model.
//!
//! A [`Graph`] is one sentence or fragment parse: an ordered list of nodes,
//! each addressed by its [`Location`], plus a list of directed, relation
//! labeled [`Edge`]s between locations. Graphs are produced once by the
//! parsing collaborator through [`GraphBuilder`] and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::GraphError;

/// Position of a node within its owning graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location {
    /// The underlying raw position.
    inner: u32,
}

impl Location {
    /// Creates a location from a raw position.
    pub const fn new(position: u32) -> Self {
        Self { inner: position }
    }

    /// Returns the location as a usize for array access.
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.inner)
    }
}

impl From<usize> for Location {
    #[inline]
    fn from(position: usize) -> Self {
        Self {
            inner: position as u32,
        }
    }
}

/// Identifier of a sentence or fragment graph supplied by the collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId {
    /// The underlying raw id.
    inner: u32,
}

impl GraphId {
    /// Creates a graph id from a raw integer.
    pub const fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the raw integer id.
    pub const fn raw(self) -> u32 {
        self.inner
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.inner)
    }
}

impl From<u32> for GraphId {
    #[inline]
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Id of a corpus sentence.
pub type SentenceId = GraphId;

/// Id of a query fragment.
pub type FragmentId = GraphId;

/// A word of the parse.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Normalized word label (lemma), the only attribute matching looks at.
    label: String,
    /// Part-of-speech tag, if the parser supplied one.
    tag: Option<String>,
}

impl Node {
    /// Creates a node.
    pub fn new(label: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            label: label.into(),
            tag,
        }
    }

    /// The node label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The part-of-speech tag.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// A directed grammatical relation between two locations of the same graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Relation label, e.g. `ncsubj`.
    relation: String,
    /// Location of the head word.
    head: Location,
    /// Location of the dependent word.
    dep: Location,
}

impl Edge {
    /// Creates an edge.
    pub fn new(relation: impl Into<String>, head: Location, dep: Location) -> Self {
        Self {
            relation: relation.into(),
            head,
            dep,
        }
    }

    /// The relation label.
    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// The head location.
    #[must_use]
    pub const fn head(&self) -> Location {
        self.head
    }

    /// The dependent location.
    #[must_use]
    pub const fn dep(&self) -> Location {
        self.dep
    }

    /// Returns true if `location` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, location: Location) -> bool {
        self.head == location || self.dep == location
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} -> {})", self.relation, self.head, self.dep)
    }
}

/// One parsed sentence or fragment.
///
/// Deserialization goes through [`Graph::from_parts`], so a decoded graph has
/// no dangling edges either.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphParts")]
pub struct Graph {
    /// Nodes, indexed by location.
    nodes: Vec<Node>,
    /// Edges in parser order.
    edges: Vec<Edge>,
}

/// Unchecked wire form of a [`Graph`].
#[derive(Deserialize)]
struct GraphParts {
    /// Nodes, indexed by location.
    nodes: Vec<Node>,
    /// Edges in parser order.
    edges: Vec<Edge>,
}

impl TryFrom<GraphParts> for Graph {
    type Error = GraphError;

    fn try_from(parts: GraphParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.nodes, parts.edges)
    }
}

impl Graph {
    /// Starts building a graph.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Assembles a graph from parts, rejecting edges with dangling endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingEdge`] if an edge references a location
    /// outside `nodes`.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        if let Some(edge) = edges
            .iter()
            .find(|e| e.head.as_usize() >= nodes.len() || e.dep.as_usize() >= nodes.len())
        {
            return Err(GraphError::dangling_edge(edge, nodes.len()));
        }
        Ok(Self { nodes, edges })
    }

    /// All nodes in location order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in parser order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node at `location`.
    #[must_use]
    pub fn node(&self, location: Location) -> Option<&Node> {
        self.nodes.get(location.as_usize())
    }

    /// Label of the node at `location`.
    #[must_use]
    pub fn label_at(&self, location: Location) -> Option<&str> {
        self.node(location).map(Node::label)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates every location paired with its node.
    pub fn locations(&self) -> impl Iterator<Item = (Location, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (Location::from(idx), node))
    }

    /// Locations whose node carries `label`, ascending.
    pub fn locations_with_label<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = Location> + 'a {
        self.locations()
            .filter(move |(_, node)| node.label() == label)
            .map(|(location, _)| location)
    }

    /// Builds the graph induced by a subset of this graph's edges.
    ///
    /// Only nodes touched by the selected edges are kept. They are renumbered
    /// densely in ascending order of their original location, so the result is
    /// a standalone fragment that can be queried against the corpus.
    #[must_use]
    pub fn edge_subgraph(&self, edge_indices: &[usize]) -> Self {
        let mut renumber: BTreeMap<Location, Location> = BTreeMap::new();
        for edge in edge_indices.iter().filter_map(|&i| self.edges.get(i)) {
            renumber.insert(edge.head, edge.head);
            renumber.insert(edge.dep, edge.dep);
        }
        for (position, target) in renumber.values_mut().enumerate() {
            *target = Location::from(position);
        }

        let nodes = renumber
            .keys()
            .filter_map(|&old| self.node(old).cloned())
            .collect();
        let edges = edge_indices
            .iter()
            .filter_map(|&i| self.edges.get(i))
            .map(|edge| Edge {
                relation: edge.relation.clone(),
                head: renumber[&edge.head],
                dep: renumber[&edge.dep],
            })
            .collect();

        Self { nodes, edges }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<String> = self
            .locations()
            .map(|(location, node)| format!("{}{}", node.label(), location))
            .collect();
        let edges: Vec<String> = self.edges.iter().map(ToString::to_string).collect();
        write!(f, "[{}] {{{}}}", nodes.join(" "), edges.join(", "))
    }
}

/// Incremental construction surface for the parsing collaborator.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    /// Nodes added so far.
    nodes: Vec<Node>,
    /// Edges added so far.
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Appends a node and returns its location.
    pub fn add_node(&mut self, label: impl Into<String>, tag: Option<&str>) -> Location {
        let location = Location::from(self.nodes.len());
        self.nodes.push(Node::new(label, tag.map(str::to_owned)));
        location
    }

    /// Appends an edge. Endpoints are validated by [`GraphBuilder::build`].
    pub fn add_edge(
        &mut self,
        relation: impl Into<String>,
        head: Location,
        dep: Location,
    ) -> &mut Self {
        self.edges.push(Edge::new(relation, head, dep));
        self
    }

    /// Finishes the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingEdge`] if an edge references a location
    /// that was never added.
    pub fn build(self) -> Result<Graph, GraphError> {
        Graph::from_parts(self.nodes, self.edges)
    }
}
