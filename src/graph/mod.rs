//! The abstract structural contract every concrete or adapted graph must
//! satisfy.
//!
//! Algorithms are written once against these capability traits and run
//! unmodified over [`DirectedGraph`](digraph::DirectedGraph), the
//! [`UndirectedView`](undirected::UndirectedView) or the
//! [`ResidualView`](residual::ResidualView). Views compose by delegation: a
//! view implements the same traits as the graph it wraps and forwards every
//! structural query, translating edge handles at the boundary.

pub mod digraph;
pub mod residual;
pub mod undirected;

use core::fmt::Debug;

/// Handle types shared by all structural capabilities of a graph.
///
/// Handles are cheap copyable identifiers, stable until the element they name
/// is explicitly removed. Vertex handles are `Ord` so per-vertex algorithm
/// state can live in `BTreeMap`s keyed by them.
pub trait GraphBase {
    type Vertex: Copy + Eq + Ord + Debug;
    type Edge: Copy + Eq + Ord + Debug;
}

/// Enumeration of all vertices.
pub trait VertexList: GraphBase {
    type VertexIter<'a>: Iterator<Item = Self::Vertex>
    where
        Self: 'a;

    fn vertices(&self) -> Self::VertexIter<'_>;

    fn vertex_count(&self) -> usize;

    fn contains_vertex(&self, v: Self::Vertex) -> bool {
        self.vertices().any(|u| u == v)
    }
}

/// Enumeration of all edges. Parallel edges are enumerated individually.
pub trait EdgeList: GraphBase {
    type EdgeIter<'a>: Iterator<Item = Self::Edge>
    where
        Self: 'a;

    fn edges(&self) -> Self::EdgeIter<'_>;

    fn edge_count(&self) -> usize;
}

/// Traversal of the out-edges of a vertex and endpoint queries.
///
/// `source` and `target` report the *logical* endpoints of an edge: a view
/// that traverses an underlying edge against its stored direction reports the
/// endpoints swapped accordingly.
///
/// # Panics
///
/// Endpoint queries panic when given an edge handle that does not belong to
/// the graph or view that produced it.
pub trait Incidence: GraphBase {
    type OutEdgeIter<'a>: Iterator<Item = Self::Edge>
    where
        Self: 'a;

    fn out_edges(&self, v: Self::Vertex) -> Self::OutEdgeIter<'_>;

    fn source(&self, e: Self::Edge) -> Self::Vertex;

    fn target(&self, e: Self::Edge) -> Self::Vertex;

    fn out_degree(&self, v: Self::Vertex) -> usize {
        self.out_edges(v).count()
    }
}

/// Traversal of the in-edges of a vertex.
pub trait BidirIncidence: Incidence {
    type InEdgeIter<'a>: Iterator<Item = Self::Edge>
    where
        Self: 'a;

    fn in_edges(&self, v: Self::Vertex) -> Self::InEdgeIter<'_>;

    fn in_degree(&self, v: Self::Vertex) -> usize {
        self.in_edges(v).count()
    }
}

/// Vertex and edge insertion/removal.
pub trait MutableGraph: GraphBase {
    fn add_vertex(&mut self) -> Self::Vertex;

    fn remove_vertex(&mut self, v: Self::Vertex);

    fn add_edge(&mut self, source: Self::Vertex, target: Self::Vertex) -> Self::Edge;

    fn remove_edge(&mut self, e: Self::Edge);
}

//
// Reference delegation, so views can wrap either `&G` or `&mut G` and still
// satisfy the same contract as `G` itself.
//

impl<'g, G: GraphBase> GraphBase for &'g G {
    type Vertex = G::Vertex;
    type Edge = G::Edge;
}

impl<'g, G: GraphBase> GraphBase for &'g mut G {
    type Vertex = G::Vertex;
    type Edge = G::Edge;
}

impl<'g, G: VertexList> VertexList for &'g G {
    type VertexIter<'a>
        = G::VertexIter<'a>
    where
        Self: 'a;

    fn vertices(&self) -> Self::VertexIter<'_> {
        (**self).vertices()
    }

    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn contains_vertex(&self, v: Self::Vertex) -> bool {
        (**self).contains_vertex(v)
    }
}

impl<'g, G: VertexList> VertexList for &'g mut G {
    type VertexIter<'a>
        = G::VertexIter<'a>
    where
        Self: 'a;

    fn vertices(&self) -> Self::VertexIter<'_> {
        (**self).vertices()
    }

    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn contains_vertex(&self, v: Self::Vertex) -> bool {
        (**self).contains_vertex(v)
    }
}

impl<'g, G: EdgeList> EdgeList for &'g G {
    type EdgeIter<'a>
        = G::EdgeIter<'a>
    where
        Self: 'a;

    fn edges(&self) -> Self::EdgeIter<'_> {
        (**self).edges()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }
}

impl<'g, G: EdgeList> EdgeList for &'g mut G {
    type EdgeIter<'a>
        = G::EdgeIter<'a>
    where
        Self: 'a;

    fn edges(&self) -> Self::EdgeIter<'_> {
        (**self).edges()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }
}

impl<'g, G: Incidence> Incidence for &'g G {
    type OutEdgeIter<'a>
        = G::OutEdgeIter<'a>
    where
        Self: 'a;

    fn out_edges(&self, v: Self::Vertex) -> Self::OutEdgeIter<'_> {
        (**self).out_edges(v)
    }

    fn source(&self, e: Self::Edge) -> Self::Vertex {
        (**self).source(e)
    }

    fn target(&self, e: Self::Edge) -> Self::Vertex {
        (**self).target(e)
    }

    fn out_degree(&self, v: Self::Vertex) -> usize {
        (**self).out_degree(v)
    }
}

impl<'g, G: Incidence> Incidence for &'g mut G {
    type OutEdgeIter<'a>
        = G::OutEdgeIter<'a>
    where
        Self: 'a;

    fn out_edges(&self, v: Self::Vertex) -> Self::OutEdgeIter<'_> {
        (**self).out_edges(v)
    }

    fn source(&self, e: Self::Edge) -> Self::Vertex {
        (**self).source(e)
    }

    fn target(&self, e: Self::Edge) -> Self::Vertex {
        (**self).target(e)
    }

    fn out_degree(&self, v: Self::Vertex) -> usize {
        (**self).out_degree(v)
    }
}

impl<'g, G: BidirIncidence> BidirIncidence for &'g G {
    type InEdgeIter<'a>
        = G::InEdgeIter<'a>
    where
        Self: 'a;

    fn in_edges(&self, v: Self::Vertex) -> Self::InEdgeIter<'_> {
        (**self).in_edges(v)
    }

    fn in_degree(&self, v: Self::Vertex) -> usize {
        (**self).in_degree(v)
    }
}

impl<'g, G: BidirIncidence> BidirIncidence for &'g mut G {
    type InEdgeIter<'a>
        = G::InEdgeIter<'a>
    where
        Self: 'a;

    fn in_edges(&self, v: Self::Vertex) -> Self::InEdgeIter<'_> {
        (**self).in_edges(v)
    }

    fn in_degree(&self, v: Self::Vertex) -> usize {
        (**self).in_degree(v)
    }
}

impl<'g, G: MutableGraph> MutableGraph for &'g mut G {
    fn add_vertex(&mut self) -> Self::Vertex {
        (**self).add_vertex()
    }

    fn remove_vertex(&mut self, v: Self::Vertex) {
        (**self).remove_vertex(v)
    }

    fn add_edge(&mut self, source: Self::Vertex, target: Self::Vertex) -> Self::Edge {
        (**self).add_edge(source, target)
    }

    fn remove_edge(&mut self, e: Self::Edge) {
        (**self).remove_edge(e)
    }
}
