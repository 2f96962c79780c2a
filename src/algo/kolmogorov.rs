//! Kolmogorov-style maximum flow by dual search-tree reuse.
//!
//! Two search trees are grown at once, one rooted at the source and one at
//! the sink. When they touch, flow is pushed along the connecting path; the
//! edges that saturate sever their subtrees, and an adoption pass reattaches
//! each severed vertex to a new parent (or returns it to the free pool)
//! instead of rebuilding the trees from scratch. On graphs where augmenting
//! paths share long prefixes this does far less re-discovery than a
//! breadth-first search per augmentation.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use num_traits::CheckedAdd;

use crate::algo::{check_flow_inputs, FlowResult, MaxFlow};
use crate::capacity::Capacity;
use crate::error::Error;
use crate::graph::residual::{FlowState, ResidualEdge, ResidualView};
use crate::graph::{BidirIncidence, EdgeList, Incidence, VertexList};
use crate::property::PropertyMap;

/// Unit solver type for [`kolmogorov`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Kolmogorov;

impl MaxFlow for Kolmogorov {
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
        kolmogorov(g, capacity, source, sink)
    }
}

/// Which search tree a vertex currently belongs to. Untagged vertices are
/// free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tree {
    Source,
    Sink,
}

struct State<'a, G, W, C>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity,
{
    residual: ResidualView<&'a G>,
    flow: FlowState<'a, W, G::Edge, C>,
    tag: BTreeMap<G::Vertex, Tree>,
    // Parent edge in the vertex's tree, always oriented in flow direction:
    // toward the vertex in the source tree, away from it in the sink tree.
    parent: BTreeMap<G::Vertex, ResidualEdge<G::Edge>>,
    active: VecDeque<G::Vertex>,
    orphans: VecDeque<G::Vertex>,
    source: G::Vertex,
    sink: G::Vertex,
    value: C,
}

impl<'a, G, W, C> State<'a, G, W, C>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity + CheckedAdd,
{
    fn new(g: &'a G, capacity: &'a W, source: G::Vertex, sink: G::Vertex) -> Self {
        State {
            residual: ResidualView::new(g),
            flow: FlowState::new(capacity),
            tag: BTreeMap::from([(source, Tree::Source), (sink, Tree::Sink)]),
            parent: BTreeMap::new(),
            active: VecDeque::from([source, sink]),
            orphans: VecDeque::new(),
            source,
            sink,
            value: C::zero(),
        }
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(p) = self.active.pop_front() {
            // A queued vertex may have been freed by an adoption pass.
            let Some(side) = self.tag.get(&p).copied() else {
                continue;
            };
            if let Some(bridge) = self.grow(p, side) {
                self.augment(bridge)?;
                self.adopt();
                // The trees touched at `p`; its remaining edges may yield
                // another bridge, so it stays active.
                self.active.push_back(p);
            }
        }
        Ok(())
    }

    /// Scans the frontier edges of `p`, claiming free neighbors for `side`.
    /// Returns a bridge edge as soon as the scan reaches the opposite tree.
    fn grow(&mut self, p: G::Vertex, side: Tree) -> Option<ResidualEdge<G::Edge>> {
        let residual = self.residual;
        let edges: Vec<_> = match side {
            Tree::Source => residual.out_edges(p).collect(),
            Tree::Sink => residual.in_edges(p).collect(),
        };
        for e in edges {
            if self.flow.residual(e) <= C::zero() {
                continue;
            }
            let q = match side {
                Tree::Source => residual.target(e),
                Tree::Sink => residual.source(e),
            };
            match self.tag.get(&q) {
                None => {
                    self.tag.insert(q, side);
                    self.parent.insert(q, e);
                    self.active.push_back(q);
                }
                Some(other) if *other != side => return Some(e),
                _ => {}
            }
        }
        None
    }

    /// Pushes the bottleneck of the source-to-sink path through `bridge` and
    /// queues the downstream endpoint of every saturated tree edge as an
    /// orphan.
    fn augment(&mut self, bridge: ResidualEdge<G::Edge>) -> Result<(), Error> {
        let mut source_side = Vec::new();
        let mut v = self.residual.source(bridge);
        while v != self.source {
            let e = self.parent[&v];
            source_side.push(e);
            v = self.residual.source(e);
        }

        let mut sink_side = Vec::new();
        let mut v = self.residual.target(bridge);
        while v != self.sink {
            let e = self.parent[&v];
            sink_side.push(e);
            v = self.residual.target(e);
        }

        let bottleneck = source_side
            .iter()
            .chain(&sink_side)
            .chain([&bridge])
            .map(|e| self.flow.residual(*e))
            .min()
            .expect("path through the bridge has at least one edge");
        debug_assert!(bottleneck > C::zero());

        for e in source_side.iter().chain(&sink_side).chain([&bridge]) {
            self.flow.push(*e, bottleneck);
        }
        self.value = self
            .value
            .checked_add(&bottleneck)
            .ok_or(Error::ArithmeticOverflow)?;
        log::trace!(
            "augmented by {bottleneck} across a bridge, path length {}",
            source_side.len() + sink_side.len() + 1
        );

        // A saturated parent link severs everything below it.
        for e in source_side {
            if self.flow.residual(e) <= C::zero() {
                let w = self.residual.target(e);
                self.parent.remove(&w);
                self.orphans.push_back(w);
            }
        }
        for e in sink_side {
            if self.flow.residual(e) <= C::zero() {
                let u = self.residual.source(e);
                self.parent.remove(&u);
                self.orphans.push_back(u);
            }
        }
        Ok(())
    }

    /// Processes the orphan queue: each orphan is reattached under a parent
    /// with a residual edge toward it and an intact chain to its tree's root,
    /// or failing that freed, which orphans its own children in turn.
    fn adopt(&mut self) {
        while let Some(v) = self.orphans.pop_front() {
            let side = self.tag[&v];
            if let Some(e) = self.find_parent(v, side) {
                self.parent.insert(v, e);
                continue;
            }
            self.tag.remove(&v);
            self.release_neighbors(v, side);
        }
    }

    fn find_parent(&self, v: G::Vertex, side: Tree) -> Option<ResidualEdge<G::Edge>> {
        let residual = self.residual;
        match side {
            Tree::Source => residual
                .in_edges(v)
                .find(|e| {
                    self.flow.residual(*e) > C::zero()
                        && self.tag.get(&residual.source(*e)) == Some(&Tree::Source)
                        && self.rooted(residual.source(*e), side)
                }),
            Tree::Sink => residual
                .out_edges(v)
                .find(|e| {
                    self.flow.residual(*e) > C::zero()
                        && self.tag.get(&residual.target(*e)) == Some(&Tree::Sink)
                        && self.rooted(residual.target(*e), side)
                }),
        }
    }

    /// Walks the parent chain of `v`; a chain that dead-ends on another
    /// orphan does not count as attached.
    fn rooted(&self, mut v: G::Vertex, side: Tree) -> bool {
        let root = match side {
            Tree::Source => self.source,
            Tree::Sink => self.sink,
        };
        loop {
            if v == root {
                return true;
            }
            match self.parent.get(&v) {
                Some(e) => {
                    v = match side {
                        Tree::Source => self.residual.source(*e),
                        Tree::Sink => self.residual.target(*e),
                    };
                }
                None => return false,
            }
        }
    }

    /// `v` has just been freed: reactivate same-tree neighbors that could
    /// re-claim it and orphan the children whose parent link ran through it.
    fn release_neighbors(&mut self, v: G::Vertex, side: Tree) {
        let residual = self.residual;
        let (toward_v, away_from_v): (Vec<_>, Vec<_>) = match side {
            Tree::Source => (
                residual.in_edges(v).collect(),
                residual.out_edges(v).collect(),
            ),
            Tree::Sink => (
                residual.out_edges(v).collect(),
                residual.in_edges(v).collect(),
            ),
        };

        for e in toward_v {
            let u = match side {
                Tree::Source => residual.source(e),
                Tree::Sink => residual.target(e),
            };
            if self.tag.get(&u) == Some(&side) && self.flow.residual(e) > C::zero() {
                self.active.push_back(u);
            }
        }
        for e in away_from_v {
            let u = match side {
                Tree::Source => residual.target(e),
                Tree::Sink => residual.source(e),
            };
            if self.tag.get(&u) == Some(&side) && self.parent.get(&u) == Some(&e) {
                self.parent.remove(&u);
                self.orphans.push_back(u);
            }
        }
    }
}

/// Computes a maximum flow from `source` to `sink` in `g` with the
/// Boykov–Kolmogorov dual-tree search.
pub fn kolmogorov<G, W, C>(
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

    log::debug!("kolmogorov: flow {}", state.value);
    Ok(FlowResult {
        value: state.value,
        flow: state.flow.into_flow(),
    })
}
