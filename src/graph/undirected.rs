//! A view presenting a directed multigraph as undirected.
//!
//! Every underlying directed edge is traversable from both of its endpoints.
//! An edge reached from its stored target carries the `inverted` flag and
//! reports its logical endpoints swapped; edge identity ignores the flag, so
//! the same underlying edge reached from either side compares equal.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use crate::graph::{BidirIncidence, EdgeList, GraphBase, Incidence, MutableGraph, VertexList};

/// An edge of the undirected view: an underlying directed edge plus the
/// direction it was traversed in.
#[derive(Clone, Copy, Debug)]
pub struct UndirectedEdge<E> {
    underlying: E,
    inverted: bool,
}

impl<E: Copy> UndirectedEdge<E> {
    pub(crate) fn forward(e: E) -> Self {
        Self {
            underlying: e,
            inverted: false,
        }
    }

    pub(crate) fn inverse(e: E) -> Self {
        Self {
            underlying: e,
            inverted: true,
        }
    }

    /// The underlying directed edge.
    pub fn underlying(&self) -> E {
        self.underlying
    }

    /// Whether the logical endpoints are swapped relative to the underlying
    /// edge's stored direction.
    pub fn inverted(&self) -> bool {
        self.inverted
    }
}

// Identity deliberately ignores the inversion flag: the two views of one
// underlying edge are the same edge.

impl<E: PartialEq> PartialEq for UndirectedEdge<E> {
    fn eq(&self, other: &Self) -> bool {
        self.underlying == other.underlying
    }
}

impl<E: Eq> Eq for UndirectedEdge<E> {}

impl<E: PartialOrd> PartialOrd for UndirectedEdge<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.underlying.partial_cmp(&other.underlying)
    }
}

impl<E: Ord> Ord for UndirectedEdge<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.underlying.cmp(&other.underlying)
    }
}

impl<E: Hash> Hash for UndirectedEdge<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.underlying.hash(state);
    }
}

/// The undirected view itself. Wrap `&G` for traversal, `&mut G` to also
/// forward mutations to the underlying graph.
#[derive(Clone, Copy, Debug)]
pub struct UndirectedView<G> {
    g: G,
}

impl<G> UndirectedView<G> {
    pub fn new(g: G) -> Self {
        Self { g }
    }

    /// The wrapped graph.
    pub fn underlying(&self) -> &G {
        &self.g
    }
}

impl<G: GraphBase> GraphBase for UndirectedView<G> {
    type Vertex = G::Vertex;
    type Edge = UndirectedEdge<G::Edge>;
}

impl<G: VertexList> VertexList for UndirectedView<G> {
    type VertexIter<'a>
        = G::VertexIter<'a>
    where
        Self: 'a;

    fn vertices(&self) -> Self::VertexIter<'_> {
        self.g.vertices()
    }

    fn vertex_count(&self) -> usize {
        self.g.vertex_count()
    }

    fn contains_vertex(&self, v: Self::Vertex) -> bool {
        self.g.contains_vertex(v)
    }
}

/// Enumerates each underlying edge once, non-inverted.
pub struct UndirectedEdgeIter<I> {
    edges: I,
}

impl<E: Copy, I: Iterator<Item = E>> Iterator for UndirectedEdgeIter<I> {
    type Item = UndirectedEdge<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next().map(UndirectedEdge::forward)
    }
}

impl<G: EdgeList> EdgeList for UndirectedView<G> {
    type EdgeIter<'a>
        = UndirectedEdgeIter<G::EdgeIter<'a>>
    where
        Self: 'a;

    fn edges(&self) -> Self::EdgeIter<'_> {
        UndirectedEdgeIter {
            edges: self.g.edges(),
        }
    }

    fn edge_count(&self) -> usize {
        self.g.edge_count()
    }
}

/// Concatenation of a vertex's underlying out-edges (forward) and in-edges
/// (inverted). A self-loop is stored in both sets and therefore appears once
/// per direction of traversal.
pub struct CombinedEdgeIter<I, J> {
    out: I,
    inn: J,
}

impl<E, I, J> Iterator for CombinedEdgeIter<I, J>
where
    E: Copy,
    I: Iterator<Item = E>,
    J: Iterator<Item = E>,
{
    type Item = UndirectedEdge<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.out
            .next()
            .map(UndirectedEdge::forward)
            .or_else(|| self.inn.next().map(UndirectedEdge::inverse))
    }
}

impl<G: BidirIncidence> Incidence for UndirectedView<G> {
    type OutEdgeIter<'a>
        = CombinedEdgeIter<G::OutEdgeIter<'a>, G::InEdgeIter<'a>>
    where
        Self: 'a;

    fn out_edges(&self, v: Self::Vertex) -> Self::OutEdgeIter<'_> {
        CombinedEdgeIter {
            out: self.g.out_edges(v),
            inn: self.g.in_edges(v),
        }
    }

    fn source(&self, e: Self::Edge) -> Self::Vertex {
        if e.inverted {
            self.g.target(e.underlying)
        } else {
            self.g.source(e.underlying)
        }
    }

    fn target(&self, e: Self::Edge) -> Self::Vertex {
        if e.inverted {
            self.g.source(e.underlying)
        } else {
            self.g.target(e.underlying)
        }
    }

    fn out_degree(&self, v: Self::Vertex) -> usize {
        self.g.out_degree(v) + self.g.in_degree(v)
    }
}

impl<G: BidirIncidence> BidirIncidence for UndirectedView<G> {
    type InEdgeIter<'a>
        = CombinedEdgeIter<G::InEdgeIter<'a>, G::OutEdgeIter<'a>>
    where
        Self: 'a;

    fn in_edges(&self, v: Self::Vertex) -> Self::InEdgeIter<'_> {
        CombinedEdgeIter {
            out: self.g.in_edges(v),
            inn: self.g.out_edges(v),
        }
    }
}

impl<G: MutableGraph> MutableGraph for UndirectedView<G> {
    fn add_vertex(&mut self) -> Self::Vertex {
        self.g.add_vertex()
    }

    fn remove_vertex(&mut self, v: Self::Vertex) {
        self.g.remove_vertex(v)
    }

    fn add_edge(&mut self, source: Self::Vertex, target: Self::Vertex) -> Self::Edge {
        UndirectedEdge::forward(self.g.add_edge(source, target))
    }

    fn remove_edge(&mut self, e: Self::Edge) {
        self.g.remove_edge(e.underlying)
    }
}
