use serde::{Deserialize, Serialize};

/// A declared schema release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub number: u32,
    pub description: String,
}

/// Inclusive pair of release numbers for which an entity is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseRange {
    pub from: u32,
    pub thru: u32,
}

impl ReleaseRange {
    pub fn new(from: u32, thru: u32) -> Self {
        Self { from, thru }
    }

    /// Whether `release` falls inside the range.
    pub fn contains(&self, release: u32) -> bool {
        self.from <= release && release <= self.thru
    }
}

/// Releases declared by the definition document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCatalog {
    releases: Vec<Release>,
}

impl ReleaseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a release. Returns `false` when the number is already declared.
    pub fn declare(&mut self, number: u32, description: &str) -> bool {
        if self.is_declared(number) {
            return false;
        }
        self.releases.push(Release {
            number,
            description: description.to_string(),
        });
        true
    }

    pub fn is_declared(&self, number: u32) -> bool {
        self.releases.iter().any(|r| r.number == number)
    }

    pub fn get(&self, number: u32) -> Option<&Release> {
        self.releases.iter().find(|r| r.number == number)
    }

    /// Highest declared release number.
    pub fn latest(&self) -> Option<u32> {
        self.releases.iter().map(|r| r.number).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let range = ReleaseRange::new(10000, 20000);
        assert!(range.contains(10000));
        assert!(range.contains(15000));
        assert!(range.contains(20000));
        assert!(!range.contains(9999));
        assert!(!range.contains(20001));
    }

    #[test]
    fn declare_rejects_duplicates() {
        let mut catalog = ReleaseCatalog::new();
        assert!(catalog.declare(1, "first"));
        assert!(!catalog.declare(1, "again"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().description, "first");
    }

    #[test]
    fn latest_is_highest_number_not_last_declared() {
        let mut catalog = ReleaseCatalog::new();
        catalog.declare(3, "");
        catalog.declare(1, "");
        assert_eq!(catalog.latest(), Some(3));
    }

    #[test]
    fn empty_catalog_has_no_latest() {
        assert_eq!(ReleaseCatalog::new().latest(), None);
    }
}
