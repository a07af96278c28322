use crate::id::{DomainListId, FunctionId};
use crate::release::ReleaseRange;
use crate::slots::Slots;

/// Numeric, bounded, unit-aware variable data.
///
/// The bounds and default are stored as declared; nothing checks that the
/// default lies between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Continuous {
    pub native_units: String,
    pub native_decimals: u32,
    pub display_units: String,
    pub display_decimals: u32,
    pub alternate_units: String,
    pub alternate_decimals: u32,
    pub minimum: f64,
    pub maximum: f64,
    pub default: f64,
    /// Values past the maximum wrap back to the minimum (compass bearings).
    pub wraps_around: bool,
}

/// Enumerated variable data. Unbound discretes carry free-text codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrete {
    pub item_list: Option<DomainListId>,
}

/// The type-specific part of a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    Continuous(Continuous),
    Discrete(Discrete),
    Text,
}

/// Discriminant of [`VariableKind`], used in lookups and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Continuous,
    Discrete,
    Text,
}

impl std::fmt::Display for KindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            KindTag::Continuous => "continuous",
            KindTag::Discrete => "discrete",
            KindTag::Text => "text",
        };
        f.write_str(name)
    }
}

impl KindTag {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "continuous" => Some(KindTag::Continuous),
            "discrete" => Some(KindTag::Discrete),
            "text" => Some(KindTag::Text),
            _ => None,
        }
    }
}

impl VariableKind {
    pub fn tag(&self) -> KindTag {
        match self {
            VariableKind::Continuous(_) => KindTag::Continuous,
            VariableKind::Discrete(_) => KindTag::Discrete,
            VariableKind::Text => KindTag::Text,
        }
    }
}

/// A typed graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub help: String,
    pub sort_in: String,
    pub sort_out: String,
    pub release: ReleaseRange,
    /// Functions that declare this variable as an output.
    pub producers: Slots<FunctionId>,
    /// Functions that declare this variable as an input.
    pub consumers: Slots<FunctionId>,
    pub kind: VariableKind,
}

impl Variable {
    pub fn new(name: &str, release: ReleaseRange, kind: VariableKind) -> Self {
        Self {
            name: name.to_string(),
            help: String::new(),
            sort_in: String::new(),
            sort_out: String::new(),
            release,
            producers: Slots::default(),
            consumers: Slots::default(),
            kind,
        }
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn as_continuous(&self) -> Option<&Continuous> {
        match &self.kind {
            VariableKind::Continuous(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_discrete(&self) -> Option<&Discrete> {
        match &self.kind {
            VariableKind::Discrete(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, VariableKind::Text)
    }

    pub fn is_current(&self, release: u32) -> bool {
        self.release.contains(release)
    }

    /// A variable no function produces is a user input.
    pub fn is_input(&self) -> bool {
        self.producers.capacity() == 0
    }
}
