//! Preflow-push maximum flow with FIFO active-vertex scheduling.
//!
//! Heights start from exact distance-to-sink labels, excess is pushed across
//! admissible residual edges and stranded excess is lifted back toward the
//! source. Two heuristics keep the height labels tight on large graphs:
//! periodic global relabeling (a reverse breadth-first search from the sink
//! recomputing exact heights) and the gap heuristic (when some height level
//! empties, every vertex stranded above it is lifted past `|V|`).

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;

use num_traits::CheckedAdd;

use crate::algo::{check_flow_inputs, FlowResult, MaxFlow};
use crate::capacity::Capacity;
use crate::error::Error;
use crate::graph::residual::{FlowState, ResidualEdge, ResidualView};
use crate::graph::{BidirIncidence, EdgeList, Incidence, VertexList};
use crate::property::PropertyMap;

/// Unit solver type for [`push_relabel`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PushRelabel;

impl MaxFlow for PushRelabel {
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
        C: Capacity + CheckedAdd,
    {
        push_relabel(g, capacity, source, sink)
    }
}

struct State<'a, G, W, C>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity,
{
    residual: ResidualView<&'a G>,
    flow: FlowState<'a, W, G::Edge, C>,
    excess: BTreeMap<G::Vertex, C>,
    height: BTreeMap<G::Vertex, usize>,
    // Occupancy per height level, for gap detection.
    height_count: Vec<usize>,
    active: VecDeque<G::Vertex>,
    source: G::Vertex,
    sink: G::Vertex,
    n: usize,
    relabels_since_global: usize,
}

impl<'a, G, W, C> State<'a, G, W, C>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity + CheckedAdd,
{
    fn new(g: &'a G, capacity: &'a W, source: G::Vertex, sink: G::Vertex) -> Self {
        let n = g.vertex_count();
        let mut state = State {
            residual: ResidualView::new(g),
            flow: FlowState::new(capacity),
            excess: BTreeMap::new(),
            height: BTreeMap::new(),
            height_count: vec![0; 2 * n + 2],
            active: VecDeque::new(),
            source,
            sink,
            n,
            relabels_since_global: 0,
        };
        state.global_relabel();
        state
    }

    fn excess_of(&self, v: G::Vertex) -> C {
        self.excess.value(v)
    }

    fn height_of(&self, v: G::Vertex) -> usize {
        self.height.get(&v).copied().unwrap_or(self.n + 1)
    }

    fn set_height(&mut self, v: G::Vertex, h: usize) {
        let old = self.height_of(v);
        self.height_count[old] -= 1;
        let idx = min(h, self.height_count.len() - 1);
        self.height_count[idx] += 1;
        self.height.insert(v, h);
    }

    /// Saturates every out-edge of the source, seeding the preflow.
    fn saturate_source(&mut self) -> Result<(), Error> {
        let edges: Vec<_> = self.residual.out_edges(self.source).collect();
        for e in edges {
            let delta = self.flow.residual(e);
            if delta <= C::zero() || self.residual.target(e) == self.source {
                continue;
            }
            self.flow.push(e, delta);
            self.add_excess(self.source, -delta)?;
            self.add_excess(self.residual.target(e), delta)?;
        }
        Ok(())
    }

    /// Adds to a vertex's excess, activating it on the zero-to-positive
    /// transition. The source and sink accumulate excess but are never
    /// scheduled.
    fn add_excess(&mut self, v: G::Vertex, amount: C) -> Result<(), Error> {
        let cell = self.excess.entry(v).or_insert_with(C::zero);
        let was_positive = *cell > C::zero();
        *cell = cell.checked_add(&amount).ok_or(Error::ArithmeticOverflow)?;
        if !was_positive && *cell > C::zero() && v != self.source && v != self.sink {
            self.active.push_back(v);
        }
        Ok(())
    }

    /// Pushes `min(excess, residual)` across an admissible edge.
    fn push(&mut self, e: ResidualEdge<G::Edge>) -> Result<(), Error> {
        let u = self.residual.source(e);
        let v = self.residual.target(e);

        debug_assert!(self.excess_of(u) > C::zero());
        debug_assert!(self.height_of(u) == self.height_of(v) + 1);

        let delta = min(self.excess_of(u), self.flow.residual(e));
        self.flow.push(e, delta);
        self.add_excess(u, -delta)?;
        self.add_excess(v, delta)
    }

    /// Lifts a vertex with excess but no admissible out-edge to one more
    /// than its lowest residual neighbor.
    fn relabel(&mut self, u: G::Vertex) {
        let old = self.height_of(u);
        let min_neighbor = self
            .residual
            .out_edges(u)
            .filter(|e| self.flow.residual(*e) > C::zero() && self.residual.target(*e) != u)
            .map(|e| self.height_of(self.residual.target(e)))
            .min()
            .expect("bug: tried to relabel a vertex with no residual out-edge");
        debug_assert!(min_neighbor + 1 > old);

        self.set_height(u, min_neighbor + 1);
        self.relabels_since_global += 1;

        // The vacated level may have become a gap.
        if old < self.n && self.height_count[old] == 0 {
            self.lift_above_gap(old);
        }
    }

    /// No vertex sits at height `gap` any more, so nothing above it can ever
    /// reach the sink again; lift those vertices past `|V|` in one step so
    /// their excess drains back toward the source.
    fn lift_above_gap(&mut self, gap: usize) {
        log::trace!("gap detected at height {gap}");
        let stranded: Vec<_> = self
            .residual
            .vertices()
            .filter(|v| {
                let h = self.height_of(*v);
                *v != self.source && h > gap && h < self.n
            })
            .collect();
        for v in stranded {
            self.set_height(v, self.n + 1);
        }
    }

    /// Recomputes exact distance-to-sink heights by reverse breadth-first
    /// search over residual edges; vertices that cannot reach the sink are
    /// parked at `|V| + 1`.
    fn global_relabel(&mut self) {
        let mut dist: BTreeMap<G::Vertex, usize> = BTreeMap::from([(self.sink, 0)]);
        let mut queue = VecDeque::from([self.sink]);
        while let Some(v) = queue.pop_front() {
            let next = dist[&v] + 1;
            for e in self.residual.in_edges(v) {
                if self.flow.residual(e) <= C::zero() {
                    continue;
                }
                let u = self.residual.source(e);
                if u == self.source || dist.contains_key(&u) {
                    continue;
                }
                dist.insert(u, next);
                queue.push_back(u);
            }
        }

        self.height.clear();
        self.height_count.iter_mut().for_each(|c| *c = 0);
        let vertices: Vec<_> = self.residual.vertices().collect();
        for v in vertices {
            let h = if v == self.source {
                self.n
            } else {
                dist.get(&v).copied().unwrap_or(self.n + 1)
            };
            self.height_count[h] += 1;
            self.height.insert(v, h);
        }
        self.relabels_since_global = 0;
        log::trace!("global relabel over {} vertices", self.n);
    }

    /// Keeps pushing a vertex's excess across admissible edges, relabeling
    /// whenever the scan exhausts its out-edges, until the excess is gone.
    fn discharge(&mut self, u: G::Vertex) -> Result<(), Error> {
        let edges: Vec<_> = self.residual.out_edges(u).collect();
        let mut i = 0;
        while self.excess_of(u) > C::zero() {
            if i == edges.len() {
                self.relabel(u);
                if self.relabels_since_global >= self.n {
                    self.global_relabel();
                }
                i = 0;
                continue;
            }
            let e = edges[i];
            let v = self.residual.target(e);
            if self.flow.residual(e) > C::zero() && self.height_of(u) == self.height_of(v) + 1 {
                self.push(e)?;
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), Error> {
        self.saturate_source()?;
        while let Some(u) = self.active.pop_front() {
            self.discharge(u)?;
        }
        Ok(())
    }
}

/// Computes a maximum flow from `source` to `sink` in `g` using the
/// push-relabel algorithm over the residual view.
///
/// On return the sink's accumulated excess is the flow value and every other
/// vertex except the source is back to zero excess.
pub fn push_relabel<G, W, C>(
    g: &G,
    capacity: &W,
    source: G::Vertex,
    sink: G::Vertex,
) -> Result<FlowResult<G::Edge, C>, Error>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity + CheckedAdd,
{
    check_flow_inputs(g, capacity, source, sink)?;

    let mut state = State::new(g, capacity, source, sink);
    state.run()?;

    let value = state.excess_of(sink);
    debug_assert!(state.excess_of(source) == -value);
    debug_assert!(state
        .residual
        .vertices()
        .filter(|v| *v != source && *v != sink)
        .all(|v| state.excess_of(v).is_zero()));

    log::debug!("push-relabel: flow {value}");
    Ok(FlowResult {
        value,
        flow: state.flow.into_flow(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::tests_support::assert_conserved;
    use crate::graph::digraph::DirectedGraph;

    #[test]
    fn unit_diamond_carries_two_units() {
        let (g, vs, es) =
            DirectedGraph::<i64>::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
        let cap: BTreeMap<_, _> = es.iter().map(|e| (*e, 1_i64)).collect();
        let res = push_relabel(&g, &cap, vs[0], vs[3]).unwrap();
        assert_eq!(res.value, 2);
        assert_conserved(&g, &res, vs[0], vs[3]);
    }

    #[test]
    fn stranded_excess_returns_to_the_source() {
        // The branch into vertex 2 is a dead end; its preflow must travel all
        // the way back while only one unit reaches the sink.
        let (g, vs, es) =
            DirectedGraph::<i64>::from_edges(5, [(0, 1), (1, 2), (1, 3), (3, 4)]);
        let caps = [5, 3, 5, 1];
        let cap: BTreeMap<_, _> = es.iter().zip(caps).map(|(e, c)| (*e, c)).collect();
        let res = push_relabel(&g, &cap, vs[0], vs[4]).unwrap();
        assert_eq!(res.value, 1);
        assert_conserved(&g, &res, vs[0], vs[4]);
    }

    #[test]
    fn parallel_edges_add_up() {
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(2, [(0, 1), (0, 1)]);
        let cap: BTreeMap<_, _> = es.iter().map(|e| (*e, 2_i64)).collect();
        let res = push_relabel(&g, &cap, vs[0], vs[1]).unwrap();
        assert_eq!(res.value, 4);
    }

    #[test]
    fn disconnected_sink_is_zero_flow() {
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(4, [(0, 1), (2, 3)]);
        let cap: BTreeMap<_, _> = es.iter().map(|e| (*e, 5_i64)).collect();
        let res = push_relabel(&g, &cap, vs[0], vs[3]).unwrap();
        assert_eq!(res.value, 0);
        assert!(res.flow.is_empty());
    }

    #[test]
    fn source_equals_sink_is_rejected() {
        let (g, vs, _) = DirectedGraph::<i64>::from_edges(1, []);
        let cap = BTreeMap::<_, i64>::new();
        assert_eq!(
            push_relabel(&g, &cap, vs[0], vs[0]).unwrap_err(),
            Error::SourceIsSink
        );
    }
}
