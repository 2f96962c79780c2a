#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

//! Graph view adaptors and flow/matching algorithms written against an
//! abstract graph interface, so that every algorithm runs unmodified over the
//! concrete directed multigraph, the undirected view or the residual view.

extern crate alloc;

pub mod algo;
pub mod capacity;
pub mod error;
pub mod graph;
pub mod property;

pub use crate::algo::edmonds_karp::{edmonds_karp, EdmondsKarp};
pub use crate::algo::kolmogorov::{kolmogorov, Kolmogorov};
pub use crate::algo::matching::{maximum_cardinality_matching, Matching};
pub use crate::algo::min_cut::{min_cut_from_flow, MinCut};
pub use crate::algo::push_relabel::{push_relabel, PushRelabel};
pub use crate::algo::{FlowResult, MaxFlow};
pub use crate::capacity::Capacity;
pub use crate::error::Error;
pub use crate::graph::digraph::{DirectedGraph, EdgeId, VertexId};
pub use crate::graph::residual::{FlowState, ResidualEdge, ResidualView};
pub use crate::graph::undirected::{UndirectedEdge, UndirectedView};
pub use crate::graph::{BidirIncidence, EdgeList, GraphBase, Incidence, MutableGraph, VertexList};
pub use crate::property::{EdgeFlow, FnMap, PropertyMap, PropertyMapMut};
