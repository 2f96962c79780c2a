//! Minimum-cut extraction from a finished maximum-flow run.
//!
//! By max-flow/min-cut duality the vertices still reachable from the source
//! in the residual network of a maximum flow form the source side of a
//! minimum cut, and the original edges leaving that side are exactly the
//! saturated cut edges.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use num_traits::CheckedAdd;
use serde::{Deserialize, Serialize};

use crate::capacity::Capacity;
use crate::error::Error;
use crate::graph::residual::{FlowState, ResidualView};
use crate::graph::{BidirIncidence, EdgeList, Incidence, VertexList};
use crate::property::{EdgeFlow, PropertyMap};

/// A source/sink cut: its capacity, the vertices residually reachable from
/// the source, and the original edges crossing from that side to its
/// complement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut<V: Ord, E, C> {
    pub value: C,
    pub source_side: BTreeSet<V>,
    pub edges: Vec<E>,
}

/// Extracts a minimum cut from a previously computed flow by breadth-first
/// search over residual-positive edges.
///
/// The cut is minimal only if `flow` is a maximum flow for `capacity`; for
/// any other flow the result is still a valid cut description of the
/// reachable set, just not a minimal one. Re-running the extraction on the
/// same flow always yields the same cut.
pub fn min_cut_from_flow<G, W, C>(
    g: &G,
    capacity: &W,
    flow: &EdgeFlow<G::Edge, C>,
    source: G::Vertex,
) -> Result<MinCut<G::Vertex, G::Edge, C>, Error>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity + CheckedAdd,
{
    if !g.contains_vertex(source) {
        return Err(Error::UnknownVertex);
    }

    let residual = ResidualView::new(g);
    let state = FlowState::with_flow(capacity, flow);

    let mut source_side = BTreeSet::from([source]);
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
        for e in residual.out_edges(u) {
            if state.residual(e) <= C::zero() {
                continue;
            }
            let v = residual.target(e);
            if source_side.insert(v) {
                queue.push_back(v);
            }
        }
    }

    let edges: Vec<_> = g
        .edges()
        .filter(|e| source_side.contains(&g.source(*e)) && !source_side.contains(&g.target(*e)))
        .collect();
    let mut value = C::zero();
    for e in &edges {
        value = value
            .checked_add(&capacity.value(*e))
            .ok_or(Error::ArithmeticOverflow)?;
    }

    log::debug!(
        "cut of value {value}: {} vertices on the source side, {} crossing edges",
        source_side.len(),
        edges.len()
    );
    Ok(MinCut {
        value,
        source_side,
        edges,
    })
}
