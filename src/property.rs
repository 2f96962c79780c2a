use alloc::collections::BTreeMap;


use serde::{Deserialize, Serialize};

use crate::capacity::Capacity;

/// A function-like association from vertex or edge handles to values.
///
/// Accessors are the only way algorithms see capacities, weights or computed
/// flows; they never require attributes keyed by anything other than the
/// handles of the graph or view they were invoked on.
pub trait PropertyMap<K> {
    type Value;

    fn value(&self, key: K) -> Self::Value;
}

/// A writable property map, used for outputs populated by a solver.
pub trait PropertyMapMut<K>: PropertyMap<K> {
    fn set_value(&mut self, key: K, value: Self::Value);
}

/// Sparse map-backed accessor: absent keys read as the default value.
impl<K, V> PropertyMap<K> for BTreeMap<K, V>
where
    K: Ord,
    V: Copy + Default,
{
    type Value = V;

    fn value(&self, key: K) -> V {
        self.get(&key).copied().unwrap_or_default()
    }
}

impl<K, V> PropertyMapMut<K> for BTreeMap<K, V>
where
    K: Ord,
    V: Copy + Default,
{
    fn set_value(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Closure-backed accessor, for capacities that are computed rather than
/// stored.
pub struct FnMap<F>(pub F);

impl<K, V, F> PropertyMap<K> for FnMap<F>
where
    F: Fn(K) -> V,
{
    type Value = V;

    fn value(&self, key: K) -> V {
        (self.0)(key)
    }
}

/// The per-edge flow assignment produced by a flow solver.
///
/// Edges absent from the map carry zero flow; solvers drop zero entries
/// before returning, so a disconnected source/sink pair yields an empty map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow<E: Ord, C> {
    flow: BTreeMap<E, C>,
}

impl<E: Copy + Ord, C: Capacity> EdgeFlow<E, C> {
    pub fn new() -> Self {
        Self {
            flow: BTreeMap::new(),
        }
    }

    pub(crate) fn from_positive(flow: BTreeMap<E, C>) -> Self {
        Self {
            flow: flow
                .into_iter()
                .filter(|(_, f)| *f > C::zero())
                .collect(),
        }
    }

    /// Iterates over all edges with strictly positive flow.
    pub fn iter(&self) -> impl Iterator<Item = (E, C)> + '_ {
        self.flow.iter().map(|(e, f)| (*e, *f))
    }

    pub fn is_empty(&self) -> bool {
        self.flow.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flow.len()
    }
}

impl<E: Copy + Ord, C: Capacity> PropertyMap<E> for EdgeFlow<E, C> {
    type Value = C;

    fn value(&self, key: E) -> C {
        self.flow.value(key)
    }
}

impl<E: Copy + Ord, C: Capacity> PropertyMapMut<E> for EdgeFlow<E, C> {
    fn set_value(&mut self, key: E, value: C) {
        if value.is_zero() {
            self.flow.remove(&key);
        } else {
            self.flow.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_as_default() {
        let mut m = BTreeMap::new();
        m.set_value(3_u32, 7_i32);
        assert_eq!(m.value(3), 7);
        assert_eq!(m.value(4), 0);
    }

    #[test]
    fn closures_are_accessors() {
        let unit = FnMap(|_: u32| 1_i32);
        assert_eq!(unit.value(42), 1);
    }

    #[test]
    fn edge_flow_drops_zero_entries() {
        let mut f = EdgeFlow::new();
        f.set_value(1_u32, 5_i32);
        f.set_value(2_u32, 0_i32);
        assert_eq!(f.len(), 1);
        assert_eq!(f.value(1), 5);
        assert_eq!(f.value(2), 0);
        f.set_value(1, 0);
        assert!(f.is_empty());
    }
}
