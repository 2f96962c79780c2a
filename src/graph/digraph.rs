//! Concrete directed multigraph backed by a petgraph
//! [`StableDiGraph`](petgraph::stable_graph::StableDiGraph).
//!
//! Vertex and edge handles are stable until the element is explicitly
//! removed; parallel edges and self-loops are allowed. Named numeric
//! attributes (capacities, weights, solver outputs) live in side tables keyed
//! by handle, so the storage layer stays oblivious to what algorithms run on
//! top of it.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use petgraph::stable_graph::{EdgeIndices, Edges, NodeIndices, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::capacity::Capacity;
use crate::graph::{BidirIncidence, EdgeList, GraphBase, Incidence, MutableGraph, VertexList};

/// Stable vertex handle.
pub type VertexId = petgraph::stable_graph::NodeIndex<u32>;

/// Stable edge handle. Parallel edges receive distinct handles.
pub type EdgeId = petgraph::stable_graph::EdgeIndex<u32>;

/// A directed multigraph with named numeric attribute tables.
#[derive(Clone, Debug, Default)]
pub struct DirectedGraph<C = i64> {
    inner: StableDiGraph<(), (), u32>,
    vertex_attrs: BTreeMap<String, BTreeMap<VertexId, C>>,
    edge_attrs: BTreeMap<String, BTreeMap<EdgeId, C>>,
}

impl<C: Capacity> DirectedGraph<C> {
    pub fn new() -> Self {
        Self {
            inner: StableDiGraph::default(),
            vertex_attrs: BTreeMap::new(),
            edge_attrs: BTreeMap::new(),
        }
    }

    /// Builds a graph with `n` fresh vertices and the given edges, returning
    /// the vertex and edge handles in insertion order.
    pub fn from_edges<I>(n: usize, edges: I) -> (Self, Vec<VertexId>, Vec<EdgeId>)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::new();
        let vs: Vec<_> = (0..n).map(|_| g.add_vertex()).collect();
        let es = edges
            .into_iter()
            .map(|(u, v)| g.add_edge(vs[u], vs[v]))
            .collect();
        (g, vs, es)
    }

    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.inner.edge_endpoints(e).is_some()
    }

    pub fn set_vertex_attr(&mut self, name: &str, v: VertexId, value: C) {
        self.vertex_attrs
            .entry(name.to_string())
            .or_default()
            .insert(v, value);
    }

    pub fn vertex_attr(&self, name: &str, v: VertexId) -> Option<C> {
        self.vertex_attrs.get(name).and_then(|m| m.get(&v)).copied()
    }

    pub fn set_edge_attr(&mut self, name: &str, e: EdgeId, value: C) {
        self.edge_attrs
            .entry(name.to_string())
            .or_default()
            .insert(e, value);
    }

    pub fn edge_attr(&self, name: &str, e: EdgeId) -> Option<C> {
        self.edge_attrs.get(name).and_then(|m| m.get(&e)).copied()
    }

    /// Borrows a named vertex attribute table as a property map.
    pub fn vertex_attr_map(&self, name: &str) -> Option<&BTreeMap<VertexId, C>> {
        self.vertex_attrs.get(name)
    }

    /// Borrows a named edge attribute table as a property map.
    pub fn edge_attr_map(&self, name: &str) -> Option<&BTreeMap<EdgeId, C>> {
        self.edge_attrs.get(name)
    }
}

impl<C> GraphBase for DirectedGraph<C> {
    type Vertex = VertexId;
    type Edge = EdgeId;
}

/// Iterator over all vertex handles.
pub struct VertexIter<'a>(NodeIndices<'a, (), u32>);

impl Iterator for VertexIter<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        self.0.next()
    }
}

/// Iterator over all edge handles.
pub struct EdgeIter<'a>(EdgeIndices<'a, (), u32>);

impl Iterator for EdgeIter<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        self.0.next()
    }
}

/// Iterator over the edges incident to one vertex in one direction.
pub struct IncidentEdgeIter<'a>(Edges<'a, (), Directed, u32>);

impl Iterator for IncidentEdgeIter<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        self.0.next().map(|e| e.id())
    }
}

impl<C: Capacity> VertexList for DirectedGraph<C> {
    type VertexIter<'a>
        = VertexIter<'a>
    where
        Self: 'a;

    fn vertices(&self) -> Self::VertexIter<'_> {
        VertexIter(self.inner.node_indices())
    }

    fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    fn contains_vertex(&self, v: VertexId) -> bool {
        self.inner.contains_node(v)
    }
}

impl<C: Capacity> EdgeList for DirectedGraph<C> {
    type EdgeIter<'a>
        = EdgeIter<'a>
    where
        Self: 'a;

    fn edges(&self) -> Self::EdgeIter<'_> {
        EdgeIter(self.inner.edge_indices())
    }

    fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}

impl<C: Capacity> Incidence for DirectedGraph<C> {
    type OutEdgeIter<'a>
        = IncidentEdgeIter<'a>
    where
        Self: 'a;

    fn out_edges(&self, v: VertexId) -> Self::OutEdgeIter<'_> {
        IncidentEdgeIter(self.inner.edges_directed(v, Direction::Outgoing))
    }

    fn source(&self, e: EdgeId) -> VertexId {
        self.inner
            .edge_endpoints(e)
            .expect("edge handle does not belong to this graph")
            .0
    }

    fn target(&self, e: EdgeId) -> VertexId {
        self.inner
            .edge_endpoints(e)
            .expect("edge handle does not belong to this graph")
            .1
    }
}

impl<C: Capacity> BidirIncidence for DirectedGraph<C> {
    type InEdgeIter<'a>
        = IncidentEdgeIter<'a>
    where
        Self: 'a;

    fn in_edges(&self, v: VertexId) -> Self::InEdgeIter<'_> {
        IncidentEdgeIter(self.inner.edges_directed(v, Direction::Incoming))
    }
}

impl<C: Capacity> MutableGraph for DirectedGraph<C> {
    fn add_vertex(&mut self) -> VertexId {
        self.inner.add_node(())
    }

    /// Removes a vertex together with its incident edges and all attributes
    /// attached to any of them.
    fn remove_vertex(&mut self, v: VertexId) {
        let incident: Vec<EdgeId> = self
            .inner
            .edges_directed(v, Direction::Outgoing)
            .map(|e| e.id())
            .chain(self.inner.edges_directed(v, Direction::Incoming).map(|e| e.id()))
            .collect();
        for table in self.edge_attrs.values_mut() {
            for e in &incident {
                table.remove(e);
            }
        }
        for table in self.vertex_attrs.values_mut() {
            table.remove(&v);
        }
        self.inner.remove_node(v);
    }

    fn add_edge(&mut self, source: VertexId, target: VertexId) -> EdgeId {
        self.inner.add_edge(source, target, ())
    }

    fn remove_edge(&mut self, e: EdgeId) {
        for table in self.edge_attrs.values_mut() {
            table.remove(&e);
        }
        self.inner.remove_edge(e);
    }
}
