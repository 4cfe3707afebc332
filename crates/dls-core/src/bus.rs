//! [`Bus`] (wire): a bit-width-typed net shared by one or more elements.
//!
//! Buses live in a [`BusNet`] arena owned by a `Circuit`, which owns
//! nodes and edges by id rather than letting them reference each other
//! directly, sidestepping reference cycles entirely.
//!
//! Connectivity is realized here as an adjacency list over bus ids
//! rather than a pre-flattened transitive closure: `set_value` walks
//! that adjacency with an iterative worklist and a visited set, so a
//! long chain of connected buses cannot blow the stack.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bitvalue::BitValue;
use crate::element::ElementId;
use crate::error::{SimError, SimResult};

/// Unique, per-`Circuit` bus identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusId(pub u64);

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct BusState {
    width: usize,
    value: Option<BitValue>,
    last_update: Option<u64>,
}

/// Arena owning every bus in a circuit, plus the undirected adjacency
/// graph connecting them and the index of which elements observe each one.
#[derive(Debug, Default)]
pub struct BusNet {
    states: HashMap<BusId, BusState>,
    adjacency: HashMap<BusId, Vec<BusId>>,
    attached: HashMap<BusId, Vec<ElementId>>,
    next_id: u64,
}

impl BusNet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new bus of the given width, with no value and `last_update = None`.
    pub fn create_bus(&mut self, width: usize) -> BusId {
        let id = BusId(self.next_id);
        self.next_id += 1;
        self.states.insert(
            id,
            BusState {
                width,
                value: None,
                last_update: None,
            },
        );
        self.adjacency.insert(id, Vec::new());
        self.attached.insert(id, Vec::new());
        id
    }

    fn state(&self, id: BusId) -> SimResult<&BusState> {
        self.states.get(&id).ok_or(SimError::UnknownBus(id))
    }

    /// Current width.
    pub fn width(&self, id: BusId) -> SimResult<usize> {
        Ok(self.state(id)?.width)
    }

    /// Current value, or `None` if unset.
    pub fn value(&self, id: BusId) -> SimResult<Option<&BitValue>> {
        Ok(self.state(id)?.value.as_ref())
    }

    /// Timestamp of the most recent value change, `None` if never set.
    pub fn last_update(&self, id: BusId) -> SimResult<Option<u64>> {
        Ok(self.state(id)?.last_update)
    }

    /// Widen a bus's declared width. Narrowing is rejected — this is a
    /// pre-simulation, loader-only operation.
    pub fn set_width(&mut self, id: BusId, width: usize) -> SimResult<()> {
        let state = self
            .states
            .get_mut(&id)
            .ok_or(SimError::UnknownBus(id))?;
        if width < state.width {
            return Err(SimError::WidthMismatch {
                expected: state.width,
                found: width,
            });
        }
        state.width = width;
        Ok(())
    }

    /// Mutually link two buses onto the same logical net. Idempotent; a
    /// no-op if `a == b`.
    pub fn connect(&mut self, a: BusId, b: BusId) -> SimResult<()> {
        if a == b {
            return Ok(());
        }
        if !self.states.contains_key(&a) {
            return Err(SimError::UnknownBus(a));
        }
        if !self.states.contains_key(&b) {
            return Err(SimError::UnknownBus(b));
        }
        let a_neighbors = self.adjacency.entry(a).or_default();
        if !a_neighbors.contains(&b) {
            a_neighbors.push(b);
        }
        let b_neighbors = self.adjacency.entry(b).or_default();
        if !b_neighbors.contains(&a) {
            b_neighbors.push(a);
        }
        Ok(())
    }

    /// Every bus directly connected to `id` (not the transitive closure).
    pub fn neighbors(&self, id: BusId) -> &[BusId] {
        self.adjacency.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Every bus transitively reachable from `id` (including `id` itself),
    /// via breadth-first traversal of the adjacency graph.
    pub fn connected_component(&self, id: BusId) -> Vec<BusId> {
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        let mut out = Vec::new();
        while let Some(b) = stack.pop() {
            if !visited.insert(b) {
                continue;
            }
            out.push(b);
            for &n in self.neighbors(b) {
                if !visited.contains(&n) {
                    stack.push(n);
                }
            }
        }
        out
    }

    /// Register `element` as observing `bus` (it will be returned by
    /// [`BusNet::set_value`]'s changed-bus list when that bus's value changes).
    pub fn attach_element(&mut self, bus: BusId, element: ElementId) {
        let list = self.attached.entry(bus).or_default();
        if !list.contains(&element) {
            list.push(element);
        }
    }

    /// Elements attached directly to `bus`.
    pub fn attached_elements(&self, bus: BusId) -> &[ElementId] {
        self.attached.get(&bus).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Set `bus`'s value. If it differs from the current value, the new
    /// value and `timestamp` propagate to every bus in the same
    /// connected component (without re-entering `set_value` recursively —
    /// an iterative worklist does the traversal), and the ids of every
    /// bus whose value changed are returned so the caller can enqueue
    /// their attached elements. Setting to the same value is a no-op
    /// that returns an empty list.
    pub fn set_value(
        &mut self,
        bus: BusId,
        value: Option<BitValue>,
        timestamp: u64,
    ) -> SimResult<Vec<BusId>> {
        let current = self.state(bus)?.value.clone();
        if current == value {
            return Ok(Vec::new());
        }
        let mut visited = HashSet::new();
        let mut stack = vec![bus];
        let mut changed = Vec::new();
        while let Some(b) = stack.pop() {
            if !visited.insert(b) {
                continue;
            }
            if let Some(state) = self.states.get_mut(&b) {
                state.value = value.clone();
                state.last_update = Some(timestamp);
            }
            changed.push(b);
            for &n in self.neighbors(b) {
                if !visited.contains(&n) {
                    stack.push(n);
                }
            }
        }
        Ok(changed)
    }

    /// Clear `bus`'s value and `last_update` (does not touch connectivity
    /// or attached elements).
    pub fn reset(&mut self, bus: BusId) -> SimResult<()> {
        let state = self.states.get_mut(&bus).ok_or(SimError::UnknownBus(bus))?;
        state.value = None;
        state.last_update = None;
        Ok(())
    }

    /// Reset every bus in the net.
    pub fn reset_all(&mut self) {
        for state in self.states.values_mut() {
            state.value = None;
            state.last_update = None;
        }
    }

    /// All bus ids in this net.
    pub fn bus_ids(&self) -> impl Iterator<Item = BusId> + '_ {
        self.states.keys().copied()
    }
}

/// Given a bus net, find each connected component and widen every bus
/// in it to the maximum width observed in that component. Loaders call
/// this after assembling a circuit, before the first `run`.
pub fn propagate_widths(net: &mut BusNet) -> SimResult<()> {
    let mut seen = HashSet::new();
    let all_ids: Vec<BusId> = net.bus_ids().collect();
    for id in all_ids {
        if seen.contains(&id) {
            continue;
        }
        let component = net.connected_component(id);
        let max_width = component
            .iter()
            .map(|b| net.width(*b))
            .collect::<SimResult<Vec<_>>>()?
            .into_iter()
            .max()
            .unwrap_or(0);
        for &b in &component {
            net.set_width(b, max_width)?;
            seen.insert(b);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_is_idempotent_and_mutual() {
        let mut net = BusNet::new();
        let a = net.create_bus(4);
        let b = net.create_bus(4);
        net.connect(a, b).unwrap();
        net.connect(a, b).unwrap();
        net.connect(b, a).unwrap();
        assert_eq!(net.neighbors(a), &[b]);
        assert_eq!(net.neighbors(b), &[a]);
    }

    #[test]
    fn connect_self_is_a_no_op() {
        let mut net = BusNet::new();
        let a = net.create_bus(4);
        net.connect(a, a).unwrap();
        assert!(net.neighbors(a).is_empty());
    }

    #[test]
    fn set_value_propagates_to_connected_siblings() {
        let mut net = BusNet::new();
        let a = net.create_bus(4);
        let b = net.create_bus(4);
        let c = net.create_bus(4);
        net.connect(a, b).unwrap();
        net.connect(b, c).unwrap();
        let v = BitValue::from_binary_str("1010").unwrap();
        let changed = net.set_value(a, Some(v.clone()), 1).unwrap();
        assert_eq!(changed.len(), 3);
        assert_eq!(net.value(b).unwrap(), Some(&v));
        assert_eq!(net.value(c).unwrap(), Some(&v));
    }

    #[test]
    fn same_value_write_is_a_no_op() {
        let mut net = BusNet::new();
        let a = net.create_bus(4);
        let v = BitValue::from_binary_str("0101").unwrap();
        net.set_value(a, Some(v.clone()), 1).unwrap();
        let changed = net.set_value(a, Some(v), 2).unwrap();
        assert!(changed.is_empty());
        assert_eq!(net.last_update(a).unwrap(), Some(1));
    }

    #[test]
    fn widen_allowed_narrow_rejected() {
        let mut net = BusNet::new();
        let a = net.create_bus(4);
        assert!(net.set_width(a, 8).is_ok());
        assert!(net.set_width(a, 2).is_err());
    }

    #[test]
    fn width_propagation_widens_whole_component() {
        let mut net = BusNet::new();
        let a = net.create_bus(2);
        let b = net.create_bus(8);
        let c = net.create_bus(4);
        net.connect(a, b).unwrap();
        net.connect(b, c).unwrap();
        propagate_widths(&mut net).unwrap();
        assert_eq!(net.width(a).unwrap(), 8);
        assert_eq!(net.width(b).unwrap(), 8);
        assert_eq!(net.width(c).unwrap(), 8);
    }

    #[test]
    fn reset_clears_value_and_timestamp() {
        let mut net = BusNet::new();
        let a = net.create_bus(4);
        net.set_value(a, Some(BitValue::low(4)), 5).unwrap();
        net.reset(a).unwrap();
        assert!(net.value(a).unwrap().is_none());
        assert_eq!(net.last_update(a).unwrap(), None);
    }
}
