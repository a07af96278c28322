use crate::id::VariableId;
use crate::release::ReleaseRange;

/// A named transform with ordered input and output variable references.
///
/// The transform itself lives outside the registry; the graph only records
/// which variables it reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<VariableId>,
    pub outputs: Vec<VariableId>,
    /// Owning module, if any.
    pub module: Option<String>,
    pub release: ReleaseRange,
}

impl Function {
    pub fn new(name: &str, release: ReleaseRange) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            module: None,
            release,
        }
    }

    pub fn is_current(&self, release: u32) -> bool {
        self.release.contains(release)
    }

    pub fn reads(&self, variable: VariableId) -> bool {
        self.inputs.contains(&variable)
    }

    pub fn writes(&self, variable: VariableId) -> bool {
        self.outputs.contains(&variable)
    }
}

/// Variable references of a function whose names have not been resolved yet.
/// Used when forward references are allowed and resolution waits for wiring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PendingRefs {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub line: usize,
}
