//! Enumerated catalogs (domain lists) and their entries.
//!
//! A [`DomainList`] keeps its values ordered by `sort_key` using byte-wise
//! string comparison, so producers zero-pad numeric sort keys (`"014"`, not
//! `"14"`) to get numeric display order.

use std::path::{Path, PathBuf};

use crate::id::RecordKey;

/// Name of the list seeded with the standard fuel models.
pub const FUEL_MODEL_LIST: &str = "FuelModelList";

/// Name of the list seeded with the standard moisture scenarios.
pub const MOIS_SCENARIO_LIST: &str = "MoisScenarioList";

/// One entry of a domain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainValue {
    pub code: String,
    pub sort_key: String,
    /// Stable numeric index, never reused within a list.
    pub index: u32,
    /// Permanent values come from the definition document or built-in
    /// catalogs and cannot be detached.
    pub permanent: bool,
    /// Translation key of the value's label.
    pub label_key: String,
    /// File the value was attached from.
    pub source: Option<PathBuf>,
    /// Attached record backing this value.
    pub record: Option<RecordKey>,
}

impl DomainValue {
    /// A permanent value declared statically.
    pub fn permanent(code: &str, sort_key: &str, index: u32, label_key: &str) -> Self {
        Self {
            code: code.to_string(),
            sort_key: sort_key.to_string(),
            index,
            permanent: true,
            label_key: label_key.to_string(),
            source: None,
            record: None,
        }
    }
}

/// Errors from list mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("list '{list}' already has a value with code '{code}'")]
    DuplicateCode { list: String, code: String },
    #[error("list '{list}' already has a value with index {index}")]
    DuplicateIndex { list: String, index: u32 },
    #[error("list '{list}' has no value with code '{code}'")]
    NotFound { list: String, code: String },
    #[error("value '{code}' of list '{list}' is permanent")]
    Permanent { list: String, code: String },
    /// No index can follow this one.
    #[error("index {index} leaves list '{list}' no room for further values")]
    IndexExhausted { list: String, index: u32 },
}

/// An ordered, named collection of domain values. Owns its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainList {
    pub name: String,
    values: Vec<DomainValue>,
    next_index: u32,
}

impl DomainList {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
            next_index: 0,
        }
    }

    /// Translation key for a value of this list.
    pub fn label_key_for(&self, code: &str) -> String {
        format!("{}:{}", self.name, code)
    }

    /// Index the next attached value will receive.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Insert a value at its sort position. Values with equal sort keys keep
    /// insertion order.
    pub fn insert(&mut self, value: DomainValue) -> Result<(), DomainError> {
        if self.contains(&value.code) {
            return Err(DomainError::DuplicateCode {
                list: self.name.clone(),
                code: value.code,
            });
        }
        if self.values.iter().any(|v| v.index == value.index) {
            return Err(DomainError::DuplicateIndex {
                list: self.name.clone(),
                index: value.index,
            });
        }
        let following = value
            .index
            .checked_add(1)
            .ok_or_else(|| DomainError::IndexExhausted {
                list: self.name.clone(),
                index: value.index,
            })?;
        self.next_index = self.next_index.max(following);
        let pos = self
            .values
            .partition_point(|v| v.sort_key.as_str() <= value.sort_key.as_str());
        self.values.insert(pos, value);
        Ok(())
    }

    /// Remove a non-permanent value, returning it.
    pub fn remove(&mut self, code: &str) -> Result<DomainValue, DomainError> {
        let pos = self
            .values
            .iter()
            .position(|v| v.code == code)
            .ok_or_else(|| DomainError::NotFound {
                list: self.name.clone(),
                code: code.to_string(),
            })?;
        if self.values[pos].permanent {
            return Err(DomainError::Permanent {
                list: self.name.clone(),
                code: code.to_string(),
            });
        }
        Ok(self.values.remove(pos))
    }

    pub fn get(&self, code: &str) -> Option<&DomainValue> {
        self.values.iter().find(|v| v.code == code)
    }

    /// Point an existing value at a record. Returns `false` if no value has
    /// `code`.
    pub fn set_record(&mut self, code: &str, record: RecordKey) -> bool {
        match self.values.iter_mut().find(|v| v.code == code) {
            Some(value) => {
                value.record = Some(record);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn by_index(&self, index: u32) -> Option<&DomainValue> {
        self.values.iter().find(|v| v.index == index)
    }

    /// The value attached from `source`, if any.
    pub fn by_source(&self, source: &Path) -> Option<&DomainValue> {
        self.values
            .iter()
            .find(|v| v.source.as_deref() == Some(source))
    }

    /// Values in sort order.
    pub fn values(&self) -> &[DomainValue] {
        &self.values
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(code: &str, sort: &str, index: u32, source: &str) -> DomainValue {
        DomainValue {
            code: code.into(),
            sort_key: sort.into(),
            index,
            permanent: false,
            label_key: format!("{FUEL_MODEL_LIST}:{code}"),
            source: Some(PathBuf::from(source)),
            record: None,
        }
    }

    #[test]
    fn values_sort_by_sort_key_not_code() {
        let mut list = DomainList::new(FUEL_MODEL_LIST);
        list.insert(DomainValue::permanent("TL1", "181", 0, "a"))
            .unwrap();
        list.insert(DomainValue::permanent("GR1", "101", 1, "b"))
            .unwrap();
        list.insert(DomainValue::permanent("13", "013", 2, "c"))
            .unwrap();
        let codes: Vec<&str> = list.codes().collect();
        assert_eq!(codes, vec!["13", "GR1", "TL1"]);
    }

    #[test]
    fn unpadded_sort_keys_sort_lexicographically() {
        let mut list = DomainList::new("l");
        list.insert(DomainValue::permanent("a", "14", 0, "a")).unwrap();
        list.insert(DomainValue::permanent("b", "2", 1, "b")).unwrap();
        let codes: Vec<&str> = list.codes().collect();
        assert_eq!(codes, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_code_rejected() {
        let mut list = DomainList::new("l");
        list.insert(DomainValue::permanent("x", "1", 0, "k")).unwrap();
        let err = list
            .insert(DomainValue::permanent("x", "2", 1, "k"))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCode { .. }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn duplicate_index_rejected() {
        let mut list = DomainList::new("l");
        list.insert(DomainValue::permanent("x", "1", 4, "k")).unwrap();
        let err = list
            .insert(DomainValue::permanent("y", "2", 4, "k"))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateIndex { index: 4, .. }));
    }

    #[test]
    fn last_representable_index_rejected() {
        let mut list = DomainList::new("l");
        list.insert(DomainValue::permanent("x", "1", u32::MAX - 1, "k"))
            .unwrap();
        assert_eq!(list.next_index(), u32::MAX);
        let err = list
            .insert(DomainValue::permanent("y", "2", u32::MAX, "k"))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::IndexExhausted {
                list: "l".into(),
                index: u32::MAX,
            }
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn next_index_never_reuses_removed_indices() {
        let mut list = DomainList::new("l");
        list.insert(attached("a", "1", 0, "a.bpf")).unwrap();
        list.insert(attached("b", "2", 1, "b.bpf")).unwrap();
        list.remove("b").unwrap();
        assert_eq!(list.next_index(), 2);
    }

    #[test]
    fn remove_permanent_refused_and_list_unchanged() {
        let mut list = DomainList::new("l");
        list.insert(DomainValue::permanent("1", "001", 0, "k")).unwrap();
        let err = list.remove("1").unwrap_err();
        assert!(matches!(err, DomainError::Permanent { .. }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut list = DomainList::new("l");
        assert!(matches!(
            list.remove("zz"),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn lookup_by_source_and_index() {
        let mut list = DomainList::new(FUEL_MODEL_LIST);
        list.insert(attached("mine", "050", 20, "/tmp/mine.bpf"))
            .unwrap();
        assert_eq!(
            list.by_source(Path::new("/tmp/mine.bpf")).unwrap().code,
            "mine"
        );
        assert_eq!(list.by_index(20).unwrap().code, "mine");
        assert!(list.by_source(Path::new("/tmp/other.bpf")).is_none());
        assert_eq!(list.label_key_for("mine"), "FuelModelList:mine");
    }
}
