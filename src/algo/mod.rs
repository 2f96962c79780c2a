//! Flow, cut and matching algorithms over the abstract graph contract.
//!
//! Every flow solver traverses the [`ResidualView`](crate::graph::residual::ResidualView)
//! of the supplied graph and shares the same entry-point signature: a graph,
//! a capacity accessor, and source/sink handles in, an edge-flow accessor and
//! the total flow value out.

use num_traits::CheckedAdd;
use serde::{Deserialize, Serialize};

pub mod edmonds_karp;
pub mod kolmogorov;
pub mod matching;
pub mod min_cut;
pub mod push_relabel;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::graph::{BidirIncidence, EdgeList, GraphBase, VertexList};
use crate::property::{EdgeFlow, PropertyMap};

/// The result of a maximum-flow computation: the total value and the per-edge
/// flow assignment (an accessor keyed by the underlying graph's edge
/// handles).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowResult<E: Ord, C> {
    pub value: C,
    pub flow: EdgeFlow<E, C>,
}

/// A maximum-flow algorithm, implemented by the unit solver types
/// [`EdmondsKarp`](edmonds_karp::EdmondsKarp),
/// [`PushRelabel`](push_relabel::PushRelabel) and
/// [`Kolmogorov`](kolmogorov::Kolmogorov). All implementations report the
/// same flow value for the same input; they differ only in how they find it.
pub trait MaxFlow {
    fn max_flow<G, W, C>(
        &self,
        g: &G,
        capacity: &W,
        source: G::Vertex,
        sink: G::Vertex,
    ) -> Result<FlowResult<G::Edge, C>, Error>
    where
        G: VertexList + EdgeList + BidirIncidence,
        W: PropertyMap<G::Edge, Value = C>,
        C: Capacity + CheckedAdd;
}

/// Fail-fast validation shared by all solver entry points: a flow query with
/// `source == sink`, a handle foreign to `g`, or a negative capacity is
/// rejected before any work is attempted.
pub(crate) fn check_flow_inputs<G, W, C>(
    g: &G,
    capacity: &W,
    source: G::Vertex,
    sink: G::Vertex,
) -> Result<(), Error>
where
    G: VertexList + EdgeList + GraphBase,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity,
{
    if source == sink {
        return Err(Error::SourceIsSink);
    }
    if !g.contains_vertex(source) || !g.contains_vertex(sink) {
        return Err(Error::UnknownVertex);
    }
    if g.edges().any(|e| capacity.value(e) < C::zero()) {
        return Err(Error::NegativeCapacity);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use crate::graph::Incidence;

    /// Asserts flow conservation at every vertex other than source and sink,
    /// and that no edge exceeds its nominal capacity bookkeeping (flow maps
    /// only ever hold positive entries).
    pub(crate) fn assert_conserved<G, C>(
        g: &G,
        res: &FlowResult<G::Edge, C>,
        source: G::Vertex,
        sink: G::Vertex,
    ) where
        G: VertexList + EdgeList + Incidence,
        C: Capacity,
    {
        for v in g.vertices() {
            if v == source || v == sink {
                continue;
            }
            let inflow: C = g
                .edges()
                .filter(|e| g.target(*e) == v)
                .map(|e| res.flow.value(e))
                .sum();
            let outflow: C = g
                .edges()
                .filter(|e| g.source(*e) == v)
                .map(|e| res.flow.value(e))
                .sum();
            assert_eq!(inflow, outflow, "conservation violated at {v:?}");
        }
        assert!(res.flow.iter().all(|(_, f)| f > C::zero()));
    }
}
