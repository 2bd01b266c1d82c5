#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Lazy, deterministic mapping from `(signal, frame)` to SAT variables.

use crate::cnf::{Literal, Variable};
use crate::netlist::SignalId;
use rustc_hash::FxHashMap;

/// A signal sampled at one time frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarKey {
    /// The sampled signal.
    pub signal: SignalId,
    /// Time frame, `0` being the reset frame.
    pub frame: usize,
}

impl VarKey {
    /// `signal` at `frame`.
    #[must_use]
    pub const fn new(signal: SignalId, frame: usize) -> Self {
        Self { signal, frame }
    }
}

/// Hands out variable ids `1, 2, 3, ...` in first-request order. A key keeps
/// its id for the lifetime of the allocator; ids are never reused. The hash
/// map only serves lookups, so the numbering depends solely on the sequence
/// of requests.
#[derive(Debug, Clone, Default)]
pub struct VariableAllocator {
    ids: FxHashMap<VarKey, Variable>,
    keys: Vec<VarKey>,
}

impl VariableAllocator {
    /// An allocator with no variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `(signal, frame)`, allocating the next one on first use.
    ///
    /// # Panics
    ///
    /// If more than `i32::MAX` variables are requested, which DIMACS cannot express.
    pub fn id_for(&mut self, signal: SignalId, frame: usize) -> Variable {
        let key = VarKey::new(signal, frame);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = Variable::try_from(self.keys.len() + 1)
            .ok()
            .filter(|&id| i32::try_from(id).is_ok())
            .unwrap_or_else(|| panic!("variable space exhausted at {key:?}"));
        self.keys.push(key);
        self.ids.insert(key, id);
        id
    }

    /// The literal of `(signal, frame)` with the given polarity.
    pub fn literal(&mut self, signal: SignalId, frame: usize, polarity: bool) -> Literal {
        Literal::new(self.id_for(signal, frame), polarity)
    }

    /// The id of `(signal, frame)` if one was allocated.
    #[must_use]
    pub fn get(&self, signal: SignalId, frame: usize) -> Option<Variable> {
        self.ids.get(&VarKey::new(signal, frame)).copied()
    }

    /// The key an id was allocated for.
    #[must_use]
    pub fn key_of(&self, var: Variable) -> Option<VarKey> {
        (var as usize)
            .checked_sub(1)
            .and_then(|i| self.keys.get(i))
            .copied()
    }

    /// Number of allocated variables, which is also the largest id.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn len(&self) -> u32 {
        // bounded by the check in `id_for`
        self.keys.len() as u32
    }

    /// Whether no variable was allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(id, key)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, VarKey)> + '_ {
        (1..).zip(self.keys.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::{NetlistBuilder, SignalId};
    use itertools::Itertools;

    fn ids() -> (SignalId, SignalId) {
        let netlist = NetlistBuilder::new("m")
            .input("a")
            .input("b")
            .build()
            .unwrap();
        (
            netlist.signal_id("a").unwrap(),
            netlist.signal_id("b").unwrap(),
        )
    }

    #[test]
    fn test_allocates_from_one_in_request_order() {
        let (a, b) = ids();
        let mut alloc = VariableAllocator::new();
        assert!(alloc.is_empty());
        assert_eq!(alloc.id_for(b, 3), 1);
        assert_eq!(alloc.id_for(a, 0), 2);
        assert_eq!(alloc.id_for(b, 0), 3);
        assert_eq!(alloc.len(), 3);
    }

    #[test]
    fn test_same_key_same_id() {
        let (a, _) = ids();
        let mut alloc = VariableAllocator::new();
        let first = alloc.id_for(a, 1);
        alloc.id_for(a, 2);
        assert_eq!(alloc.id_for(a, 1), first);
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn test_injective_over_many_keys() {
        let (a, b) = ids();
        let mut alloc = VariableAllocator::new();
        let keys = (0..50).flat_map(|t| [(a, t), (b, t)]).collect_vec();
        let first = keys.iter().map(|&(s, t)| alloc.id_for(s, t)).collect_vec();
        let second = keys.iter().map(|&(s, t)| alloc.id_for(s, t)).collect_vec();
        assert_eq!(first, second);
        assert!(first.iter().all_unique());
        assert_eq!(alloc.len(), 100);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let (a, b) = ids();
        let run = || {
            let mut alloc = VariableAllocator::new();
            [(a, 2), (b, 0), (a, 2), (b, 1), (a, 0)]
                .iter()
                .map(|&(s, t)| alloc.id_for(s, t))
                .collect_vec()
        };
        assert_eq!(run(), run());
        assert_eq!(run(), vec![1, 2, 1, 3, 4]);
    }

    #[test]
    fn test_reverse_lookup() {
        let (a, b) = ids();
        let mut alloc = VariableAllocator::new();
        let id = alloc.id_for(b, 7);
        assert_eq!(alloc.key_of(id), Some(VarKey::new(b, 7)));
        assert_eq!(alloc.key_of(0), None);
        assert_eq!(alloc.key_of(2), None);
        assert_eq!(alloc.get(b, 7), Some(id));
        assert_eq!(alloc.get(a, 7), None);
        assert_eq!(alloc.literal(b, 7, false).to_i32(), -1);
        assert_eq!(alloc.iter().collect_vec(), vec![(1, VarKey::new(b, 7))]);
    }
}
