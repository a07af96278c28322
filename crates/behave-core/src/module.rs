//! Toggleable groupings of functions.
//!
//! A [`Module`] collects the functions that name it and the variables those
//! functions produce. Deactivating a module removes its functions from
//! [`EngineRegistry::active_functions`](crate::registry::EngineRegistry::active_functions)
//! without touching the graph.

use crate::id::VariableId;
use crate::release::ReleaseRange;

/// Variables whose producer module is fixed regardless of which functions
/// actually produce them, as `(variable, module)`.
pub const PRODUCER_MODULE_OVERRIDES: &[(&str, &str)] = &[("vWindAdjFactor", "surface")];

/// Fixed producer module for `variable`, if it has one.
pub fn producer_override(variable: &str) -> Option<&'static str> {
    PRODUCER_MODULE_OVERRIDES
        .iter()
        .find(|(v, _)| *v == variable)
        .map(|(_, m)| *m)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub sort_key: String,
    /// Translation key of the module's display name.
    pub text_key: String,
    pub indent: u32,
    pub release: ReleaseRange,
    /// Variables produced by this module's functions, in wiring order.
    pub output_variables: Vec<VariableId>,
    pub active: bool,
}

impl Module {
    pub fn new(name: &str, release: ReleaseRange) -> Self {
        Self {
            name: name.to_string(),
            sort_key: String::new(),
            text_key: String::new(),
            indent: 0,
            release,
            output_variables: Vec::new(),
            active: true,
        }
    }

    pub fn is_current(&self, release: u32) -> bool {
        self.release.contains(release)
    }

    pub fn produces(&self, variable: VariableId) -> bool {
        self.output_variables.contains(&variable)
    }
}

/// Modules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleList {
    modules: Vec<Module>,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            modules: Vec::with_capacity(capacity),
        }
    }

    /// Append a module. Returns `false` if the name is taken.
    pub fn push(&mut self, module: Module) -> bool {
        if self.contains(&module.name) {
            return false;
        }
        self.modules.push(module);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
