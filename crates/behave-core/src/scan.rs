//! Pre-parse scan of a definition document.
//!
//! Counts the lines that open each element kind so the registry can size its
//! storage before the structural parse. No XML parsing happens here: a line
//! counts when it contains the element's opening-tag signature (`<variable `,
//! `<function `, ...). The structural parser re-reads the same text, so the
//! two passes always agree for well-formed documents that place one element
//! per line.

use crate::prime::prime_gte;

/// Per-element line counts from a single scan of a definition document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub variables: usize,
    pub functions: usize,
    pub item_lists: usize,
    pub properties: usize,
    pub translates: usize,
    pub languages: usize,
    pub modules: usize,
    pub files: usize,
    pub releases: usize,
}

impl ScanCounts {
    /// Number of translation dictionary entries: one per key and language.
    pub fn translate_entries(&self) -> usize {
        self.translates * self.languages.max(1)
    }

    /// Dictionary capacities derived from the counts.
    pub fn sizing(&self) -> DictionarySizing {
        DictionarySizing {
            variables: prime_gte(self.variables),
            functions: prime_gte(self.functions),
            item_lists: prime_gte(self.item_lists),
            properties: prime_gte(self.properties),
            translations: prime_gte(self.translate_entries()),
            modules: prime_gte(self.modules),
        }
    }
}

/// Initial capacities for the registry's name dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionarySizing {
    pub variables: usize,
    pub functions: usize,
    pub item_lists: usize,
    pub properties: usize,
    pub translations: usize,
    pub modules: usize,
}

const SIGNATURES: [&str; 9] = [
    "<variable ",
    "<function ",
    "<itemList ",
    "<property ",
    "<translate ",
    "<language ",
    "<module ",
    "<file ",
    "<release ",
];

impl ScanCounts {
    fn bump(&mut self, signature: usize) {
        let slot = match signature {
            0 => &mut self.variables,
            1 => &mut self.functions,
            2 => &mut self.item_lists,
            3 => &mut self.properties,
            4 => &mut self.translates,
            5 => &mut self.languages,
            6 => &mut self.modules,
            7 => &mut self.files,
            _ => &mut self.releases,
        };
        *slot += 1;
    }
}

/// Count opening-tag signatures in definition text, one hit per line at most.
pub fn scan_definition(text: &str) -> ScanCounts {
    let mut counts = ScanCounts::default();
    for line in text.lines() {
        if let Some(i) = SIGNATURES.iter().position(|sig| line.contains(sig)) {
            counts.bump(i);
        }
    }
    counts
}
