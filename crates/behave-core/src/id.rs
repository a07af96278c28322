use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies an attached fuel-model or moisture-scenario record.
    /// Generational, so a key held across a detach resolves to nothing.
    pub struct RecordKey;
}

/// Identifies a variable in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableId(pub u32);

/// Identifies a function in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

/// Identifies a domain (item) list in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainListId(pub u32);

impl VariableId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FunctionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl DomainListId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_id_equality() {
        let a = VariableId(0);
        let b = VariableId(0);
        let c = VariableId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn function_id_copy() {
        let a = FunctionId(5);
        let b = a; // Copy
        assert_eq!(a, b);
        assert_eq!(b.index(), 5);
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(VariableId(0), "vSurfaceFuelBedDepth");
        map.insert(VariableId(1), "vSurfaceFireSpreadAtHead");
        assert_eq!(map[&VariableId(0)], "vSurfaceFuelBedDepth");
    }

    #[test]
    fn record_keys_are_generational() {
        let mut arena: slotmap::SlotMap<RecordKey, &str> = slotmap::SlotMap::with_key();
        let first = arena.insert("gr1");
        arena.remove(first);
        let second = arena.insert("gr2");
        assert!(arena.get(first).is_none());
        assert_eq!(arena[second], "gr2");
    }
}
