use serde::{Deserialize, Serialize};

/// Construction options for an [`EngineRegistry`](crate::registry::EngineRegistry).
///
/// Every field has a default, so a settings file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject a function that names a variable not yet declared. When false,
    /// names are resolved during wiring instead.
    pub validate_references: bool,
    /// Seed the standard moisture scenarios alongside the fuel models.
    pub seed_moisture_scenarios: bool,
    /// Overrides the document's current release.
    pub release: Option<u32>,
    /// Initial translation language. Defaults to the first declared language.
    pub language: Option<String>,
    /// Capacity of the registry event log.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validate_references: true,
            seed_moisture_scenarios: true,
            release: None,
            language: None,
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!(config.validate_references);
        assert!(config.seed_moisture_scenarios);
        assert_eq!(config.release, None);
        assert_eq!(config.event_capacity, 64);
    }
}
