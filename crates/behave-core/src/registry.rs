//! The equation-application registry.
//!
//! [`EngineRegistry`] owns every variable, function, domain list, module,
//! property and attached record declared by a definition document.
//! Construction runs scan, size, allocate, parse, seed and wire in order, and
//! any failure along the way is fatal. Once built, the graph shape is fixed;
//! only domain lists (attach/detach), property values, module activity and
//! the translation language change at run time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::builder::{BuiltDefinition, DefinitionBuilder, RecordArenas};
use crate::config::EngineConfig;
use crate::definition::{DefinitionError, DefinitionErrorKind, parse_definition};
use crate::domain::{DomainError, DomainList, DomainValue, FUEL_MODEL_LIST, MOIS_SCENARIO_LIST};
use crate::event::{EventLog, RegistryEvent};
use crate::fuel::FuelModel;
use crate::function::Function;
use crate::id::{DomainListId, FunctionId, RecordKey, VariableId};
use crate::manifest::{Manifest, ManifestProblem};
use crate::module::{Module, ModuleList, producer_override};
use crate::moisture::MoisScenario;
use crate::property::{PropertyDict, PropertyError};
use crate::record::{RecordError, code_from_path};
use crate::release::ReleaseCatalog;
use crate::scan::{ScanCounts, scan_definition};
use crate::translate::{LanguageError, Translator};
use crate::units::{StandardUnits, UnitConverter};
use crate::variable::{Continuous, Discrete, KindTag, Variable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failed name lookup or kind-checked access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("variable '{name}' is {found}, not {expected}")]
    WrongKind {
        name: String,
        expected: KindTag,
        found: KindTag,
    },
}

/// Attaching a record file failed; the registry is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid record {}: {source}", path.display())]
    Record { path: PathBuf, source: RecordError },
    #[error("list '{list}' already has a value with code '{code}' from another source")]
    CodeConflict {
        list: &'static str,
        code: String,
        existing: Option<PathBuf>,
    },
    #[error("list not found: {0}")]
    UnknownList(&'static str),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Detaching a domain value failed; the list is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetachError {
    #[error("list not found: {0}")]
    UnknownList(String),
    #[error("list '{list}' has no value with code '{code}'")]
    NotFound { list: String, code: String },
    #[error("value '{code}' of list '{list}' is permanent and cannot be detached")]
    Permanent { list: String, code: String },
}

impl From<DomainError> for DetachError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Permanent { list, code } => DetachError::Permanent { list, code },
            DomainError::NotFound { list, code }
            | DomainError::DuplicateCode { list, code } => DetachError::NotFound { list, code },
            DomainError::DuplicateIndex { list, index }
            | DomainError::IndexExhausted { list, index } => DetachError::NotFound {
                list,
                code: index.to_string(),
            },
        }
    }
}

/// Result of a successful attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attached {
    pub list: &'static str,
    pub code: String,
    pub index: u32,
    /// Code of the value this attach replaced, when the same source file was
    /// attached before.
    pub replaced: Option<String>,
}

// ---------------------------------------------------------------------------
// Attachable records
// ---------------------------------------------------------------------------

/// A record type that backs the values of one domain list.
trait DomainRecord: Sized {
    const LIST: &'static str;

    fn parse(text: &str, default_code: &str, units: &dyn UnitConverter)
    -> Result<Self, RecordError>;
    fn code(&self) -> &str;
    fn sort_key(&self) -> String;
    fn label(&self) -> &str;
    fn arena(arenas: &mut RecordArenas) -> &mut slotmap::SlotMap<RecordKey, Self>;
}

impl DomainRecord for FuelModel {
    const LIST: &'static str = FUEL_MODEL_LIST;

    fn parse(
        text: &str,
        default_code: &str,
        units: &dyn UnitConverter,
    ) -> Result<Self, RecordError> {
        FuelModel::parse(text, default_code, units)
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn sort_key(&self) -> String {
        FuelModel::sort_key(self)
    }
    fn label(&self) -> &str {
        &self.description
    }
    fn arena(arenas: &mut RecordArenas) -> &mut slotmap::SlotMap<RecordKey, Self> {
        &mut arenas.fuel_models
    }
}

impl DomainRecord for MoisScenario {
    const LIST: &'static str = MOIS_SCENARIO_LIST;

    fn parse(
        text: &str,
        default_code: &str,
        units: &dyn UnitConverter,
    ) -> Result<Self, RecordError> {
        MoisScenario::parse(text, default_code, units)
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn sort_key(&self) -> String {
        MoisScenario::sort_key(self)
    }
    fn label(&self) -> &str {
        &self.description
    }
    fn arena(arenas: &mut RecordArenas) -> &mut slotmap::SlotMap<RecordKey, Self> {
        &mut arenas.mois_scenarios
    }
}

// ---------------------------------------------------------------------------
// EngineRegistry
// ---------------------------------------------------------------------------

/// Registry of the equation application graph and its domain catalogs.
pub struct EngineRegistry {
    release: u32,
    releases: ReleaseCatalog,
    variables: Vec<Variable>,
    variable_index: HashMap<String, VariableId>,
    functions: Vec<Function>,
    function_index: HashMap<String, FunctionId>,
    lists: Vec<DomainList>,
    list_index: HashMap<String, DomainListId>,
    modules: ModuleList,
    properties: PropertyDict,
    translator: Translator,
    manifest: Manifest,
    arenas: RecordArenas,
    counts: ScanCounts,
    units: Box<dyn UnitConverter>,
    events: EventLog,
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("release", &self.release)
            .field("variables", &self.variables.len())
            .field("functions", &self.functions.len())
            .field("lists", &self.lists.len())
            .field("modules", &self.modules.len())
            .field("properties", &self.properties.len())
            .finish_non_exhaustive()
    }
}

impl EngineRegistry {
    /// Build a registry from a definition file.
    pub fn from_file(path: &Path, config: &EngineConfig) -> Result<Self, DefinitionError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DefinitionError::unlocated(DefinitionErrorKind::Io(e)))?;
        Self::from_definition(&text, config)
    }

    /// Build a registry from definition text using [`StandardUnits`].
    pub fn from_definition(text: &str, config: &EngineConfig) -> Result<Self, DefinitionError> {
        Self::from_definition_with_units(text, config, Box::new(StandardUnits::new()))
    }

    /// Build a registry with a caller-supplied unit converter.
    pub fn from_definition_with_units(
        text: &str,
        config: &EngineConfig,
        units: Box<dyn UnitConverter>,
    ) -> Result<Self, DefinitionError> {
        let counts = scan_definition(text);
        let built = {
            let mut builder = DefinitionBuilder::new(config, units.as_ref(), counts);
            parse_definition(text, &mut builder)?;
            builder.finish()?
        };
        Ok(Self::assemble(built, units, config))
    }

    fn assemble(built: BuiltDefinition, units: Box<dyn UnitConverter>, config: &EngineConfig) -> Self {
        Self {
            release: built.release,
            releases: built.releases,
            variables: built.variables,
            variable_index: built.variable_index,
            functions: built.functions,
            function_index: built.function_index,
            lists: built.lists,
            list_index: built.list_index,
            modules: built.modules,
            properties: built.properties,
            translator: built.translator,
            manifest: built.manifest,
            arenas: built.arenas,
            counts: built.counts,
            units,
            events: EventLog::new(config.event_capacity),
        }
    }

    // -----------------------------------------------------------------------
    // Releases and construction metadata
    // -----------------------------------------------------------------------

    /// Release the registry was built for.
    pub fn current_release(&self) -> u32 {
        self.release
    }

    pub fn releases(&self) -> &ReleaseCatalog {
        &self.releases
    }

    /// Counts from the pre-parse scan.
    pub fn scan_counts(&self) -> ScanCounts {
        self.counts
    }

    pub fn units(&self) -> &dyn UnitConverter {
        self.units.as_ref()
    }

    // -----------------------------------------------------------------------
    // Variables and functions
    // -----------------------------------------------------------------------

    pub fn variable_id(&self, name: &str) -> Option<VariableId> {
        self.variable_index.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variable_id(name).map(|id| &self.variables[id.index()])
    }

    pub fn variable_by_id(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn function_id(&self, name: &str) -> Option<FunctionId> {
        self.function_index.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.function_id(name).map(|id| &self.functions[id.index()])
    }

    pub fn function_by_id(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.index())
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    fn lookup_variable(&self, name: &str) -> Result<&Variable, LookupError> {
        self.variable(name).ok_or_else(|| LookupError::NotFound {
            kind: "variable",
            name: name.to_string(),
        })
    }

    fn wrong_kind(variable: &Variable, expected: KindTag) -> LookupError {
        LookupError::WrongKind {
            name: variable.name.clone(),
            expected,
            found: variable.tag(),
        }
    }

    pub fn continuous(&self, name: &str) -> Result<&Continuous, LookupError> {
        let variable = self.lookup_variable(name)?;
        variable
            .as_continuous()
            .ok_or_else(|| Self::wrong_kind(variable, KindTag::Continuous))
    }

    pub fn discrete(&self, name: &str) -> Result<&Discrete, LookupError> {
        let variable = self.lookup_variable(name)?;
        variable
            .as_discrete()
            .ok_or_else(|| Self::wrong_kind(variable, KindTag::Discrete))
    }

    /// A text variable.
    pub fn text(&self, name: &str) -> Result<&Variable, LookupError> {
        let variable = self.lookup_variable(name)?;
        if variable.is_text() {
            Ok(variable)
        } else {
            Err(Self::wrong_kind(variable, KindTag::Text))
        }
    }

    /// Item list of a discrete variable, if it is bound to one.
    pub fn item_list_of(&self, name: &str) -> Result<Option<&DomainList>, LookupError> {
        Ok(self
            .discrete(name)?
            .item_list
            .and_then(|id| self.lists.get(id.index())))
    }

    /// Functions that produce the variable, in wiring order.
    pub fn producers_of(&self, name: &str) -> Result<Vec<&Function>, LookupError> {
        let variable = self.lookup_variable(name)?;
        Ok(variable
            .producers
            .iter()
            .map(|id| &self.functions[id.index()])
            .collect())
    }

    /// Functions that consume the variable, in wiring order.
    pub fn consumers_of(&self, name: &str) -> Result<Vec<&Function>, LookupError> {
        let variable = self.lookup_variable(name)?;
        Ok(variable
            .consumers
            .iter()
            .map(|id| &self.functions[id.index()])
            .collect())
    }

    // -----------------------------------------------------------------------
    // Modules
    // -----------------------------------------------------------------------

    pub fn modules(&self) -> &ModuleList {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_active(&self, name: &str) -> Option<bool> {
        self.modules.get(name).map(|m| m.active)
    }

    pub fn set_module_active(&mut self, name: &str, active: bool) -> Result<(), LookupError> {
        let module = self.modules.get_mut(name).ok_or_else(|| LookupError::NotFound {
            kind: "module",
            name: name.to_string(),
        })?;
        if module.active != active {
            module.active = active;
            self.events.record(RegistryEvent::ModuleToggled {
                module: name.to_string(),
                active,
            });
        }
        Ok(())
    }

    /// Functions current for this release whose module is active, plus those
    /// that belong to no module.
    pub fn active_functions(&self) -> Vec<&Function> {
        self.functions
            .iter()
            .filter(|f| f.is_current(self.release))
            .filter(|f| match &f.module {
                Some(m) => self.module_active(m).unwrap_or(false),
                None => true,
            })
            .collect()
    }

    /// Space-separated names, in module order, of the modules whose current
    /// functions produce `variable`. Empty when no module produces it.
    /// Variables in the producer override table always report their fixed
    /// module.
    pub fn find_producer_module(&self, variable: &str) -> Result<String, LookupError> {
        let var = self.lookup_variable(variable)?;
        if let Some(module) = producer_override(variable) {
            return Ok(module.to_string());
        }
        let producing: Vec<&str> = var
            .producers
            .iter()
            .map(|id| &self.functions[id.index()])
            .filter(|f| f.is_current(self.release))
            .filter_map(|f| f.module.as_deref())
            .collect();
        let names: Vec<&str> = self
            .modules
            .iter()
            .filter(|m| producing.contains(&m.name.as_str()))
            .map(|m| m.name.as_str())
            .collect();
        Ok(names.join(" "))
    }

    // -----------------------------------------------------------------------
    // Domain lists and attached records
    // -----------------------------------------------------------------------

    pub fn domain_list(&self, name: &str) -> Option<&DomainList> {
        self.list_index.get(name).map(|id| &self.lists[id.index()])
    }

    pub fn domain_list_by_id(&self, id: DomainListId) -> Option<&DomainList> {
        self.lists.get(id.index())
    }

    pub fn domain_lists(&self) -> &[DomainList] {
        &self.lists
    }

    pub fn fuel_model(&self, code: &str) -> Option<&FuelModel> {
        let key = self.domain_list(FUEL_MODEL_LIST)?.get(code)?.record?;
        self.arenas.fuel_models.get(key)
    }

    pub fn mois_scenario(&self, code: &str) -> Option<&MoisScenario> {
        let key = self.domain_list(MOIS_SCENARIO_LIST)?.get(code)?.record?;
        self.arenas.mois_scenarios.get(key)
    }

    /// Attach a fuel-model file. Re-attaching the same file replaces the
    /// value it added before.
    pub fn attach_fuel_model(&mut self, path: &Path) -> Result<Attached, AttachError> {
        let text = read_record(path)?;
        self.attach_str::<FuelModel>(path, &text)
    }

    /// Attach fuel-model record text as if read from `source`.
    pub fn attach_fuel_model_str(
        &mut self,
        source: &Path,
        text: &str,
    ) -> Result<Attached, AttachError> {
        self.attach_str::<FuelModel>(source, text)
    }

    pub fn attach_mois_scenario(&mut self, path: &Path) -> Result<Attached, AttachError> {
        let text = read_record(path)?;
        self.attach_str::<MoisScenario>(path, &text)
    }

    pub fn attach_mois_scenario_str(
        &mut self,
        source: &Path,
        text: &str,
    ) -> Result<Attached, AttachError> {
        self.attach_str::<MoisScenario>(source, text)
    }

    fn attach_str<R: DomainRecord>(
        &mut self,
        source: &Path,
        text: &str,
    ) -> Result<Attached, AttachError> {
        let record = R::parse(text, &code_from_path(source), self.units.as_ref()).map_err(|e| {
            AttachError::Record {
                path: source.to_path_buf(),
                source: e,
            }
        })?;
        self.attach_record(source, record)
    }

    fn attach_record<R: DomainRecord>(
        &mut self,
        source: &Path,
        record: R,
    ) -> Result<Attached, AttachError> {
        let list_id = *self
            .list_index
            .get(R::LIST)
            .ok_or(AttachError::UnknownList(R::LIST))?;
        let list = &self.lists[list_id.index()];
        let code = record.code().to_string();

        // Check everything before changing anything.
        let previous = list.by_source(source).cloned();
        if let Some(existing) = list.get(&code) {
            if existing.source.as_deref() != Some(source) {
                return Err(AttachError::CodeConflict {
                    list: R::LIST,
                    code,
                    existing: existing.source.clone(),
                });
            }
        }
        let index = previous
            .as_ref()
            .map(|p| p.index)
            .unwrap_or_else(|| list.next_index());
        if index == u32::MAX {
            return Err(DomainError::IndexExhausted {
                list: R::LIST.to_string(),
                index,
            }
            .into());
        }
        let label_key = list.label_key_for(&code);
        let sort_key = record.sort_key();
        let label = if record.label().is_empty() {
            code.clone()
        } else {
            record.label().to_string()
        };

        let list = &mut self.lists[list_id.index()];
        if let Some(previous) = &previous {
            list.remove(&previous.code)?;
            if let Some(key) = previous.record {
                R::arena(&mut self.arenas).remove(key);
            }
            self.translator.remove(&previous.label_key);
        }
        let key = R::arena(&mut self.arenas).insert(record);
        list.insert(DomainValue {
            code: code.clone(),
            sort_key,
            index,
            permanent: false,
            label_key: label_key.clone(),
            source: Some(source.to_path_buf()),
            record: Some(key),
        })?;
        self.translator.insert_all(&label_key, &label);

        let replaced = previous.map(|p| p.code);
        self.events.record(match &replaced {
            Some(old_code) => RegistryEvent::ValueReplaced {
                list: R::LIST.to_string(),
                old_code: old_code.clone(),
                code: code.clone(),
                index,
            },
            None => RegistryEvent::ValueAttached {
                list: R::LIST.to_string(),
                code: code.clone(),
                index,
                source: Some(source.to_path_buf()),
            },
        });
        Ok(Attached {
            list: R::LIST,
            code,
            index,
            replaced,
        })
    }

    /// Remove an attached value, its label and its record.
    pub fn detach(&mut self, list: &str, code: &str) -> Result<DomainValue, DetachError> {
        let id = *self
            .list_index
            .get(list)
            .ok_or_else(|| DetachError::UnknownList(list.to_string()))?;
        let value = self.lists[id.index()].remove(code)?;
        if let Some(key) = value.record {
            match list {
                FUEL_MODEL_LIST => {
                    self.arenas.fuel_models.remove(key);
                }
                MOIS_SCENARIO_LIST => {
                    self.arenas.mois_scenarios.remove(key);
                }
                _ => {}
            }
        }
        self.translator.remove(&value.label_key);
        self.events.record(RegistryEvent::ValueDetached {
            list: list.to_string(),
            code: code.to_string(),
        });
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    pub fn properties(&self) -> &PropertyDict {
        &self.properties
    }

    /// Update a property from text, validating against its declared type.
    pub fn update_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        self.properties.update(name, value)?;
        let stored = self
            .properties
            .get(name)
            .map(|p| p.value().to_string())
            .unwrap_or_default();
        self.events.record(RegistryEvent::PropertyUpdated {
            name: name.to_string(),
            value: stored,
        });
        Ok(())
    }

    /// Read a property file for the current release.
    pub fn load_properties(&mut self, path: &Path) -> Result<usize, PropertyError> {
        let release = self.release;
        self.properties.read_xml_file(path, release)
    }

    /// Write the properties current for this release.
    pub fn save_properties(&self, path: &Path) -> Result<(), PropertyError> {
        self.properties.write_xml_file(path, self.release)
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.translator.translate(key)
    }

    pub fn language(&self) -> Option<&str> {
        self.translator.language()
    }

    pub fn set_language(&mut self, name: &str) -> Result<(), LanguageError> {
        let from = self.translator.language().unwrap_or_default().to_string();
        self.translator.set_language(name)?;
        if from != name {
            self.events.record(RegistryEvent::LanguageChanged {
                from,
                to: name.to_string(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Installation manifest
    // -----------------------------------------------------------------------

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Check the manifest entries current for this release under `root`.
    pub fn check_installation(&self, root: &Path) -> Vec<ManifestProblem> {
        self.manifest.check(root, self.release)
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Recorded events, oldest first.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &RegistryEvent> + '_ {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        self.events.drain()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    pub fn event_log_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }
}

fn read_record(path: &Path) -> Result<String, AttachError> {
    std::fs::read_to_string(path).map_err(|source| AttachError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RegistryEventKind;
    use crate::test_utils::*;

    fn gr14() -> &'static Path {
        Path::new("FuelModels/GR14.bpf")
    }

    #[test]
    fn minimal_definition_wires_one_consumer() {
        let registry = minimal_registry();
        let v1 = registry.variable("v1").unwrap();
        assert_eq!(v1.producers.len(), 0);
        assert_eq!(v1.consumers.len(), 1);
        let f1 = registry.function_id("f1").unwrap();
        assert_eq!(v1.consumers.as_slice(), &[f1]);
        assert_eq!(registry.current_release(), 2);
    }

    #[test]
    fn typed_access_checks_kind() {
        let registry = sample_registry();
        let depth = registry.continuous("vSurfaceFuelBedDepth").unwrap();
        assert_eq!(depth.native_units, "ft");
        assert_eq!(depth.alternate_units, "m");
        assert_eq!(depth.display_decimals, 1);

        let err = registry.continuous("vSurfaceFuelBedModel").unwrap_err();
        assert_eq!(
            err,
            LookupError::WrongKind {
                name: "vSurfaceFuelBedModel".into(),
                expected: KindTag::Continuous,
                found: KindTag::Discrete,
            }
        );
        assert!(matches!(
            registry.discrete("vNothing"),
            Err(LookupError::NotFound { kind: "variable", .. })
        ));
        assert!(registry.text("vDocDescription").is_ok());
        assert!(registry.text("vSpotDistance").is_err());
    }

    #[test]
    fn discrete_variable_resolves_its_item_list() {
        let registry = sample_registry();
        let list = registry
            .item_list_of("vSurfaceFireSpreadDir")
            .unwrap()
            .unwrap();
        assert_eq!(list.name, "SpreadDirection");
        assert_eq!(list.codes().collect::<Vec<_>>(), ["HeadFire", "FromIgPt"]);
        let fuel = registry.item_list_of("vSurfaceFuelBedModel").unwrap().unwrap();
        assert_eq!(fuel.len(), 13);
    }

    #[test]
    fn producers_and_consumers_follow_the_graph() {
        let registry = sample_registry();
        let names = |fs: Vec<&Function>| fs.iter().map(|f| f.name.clone()).collect::<Vec<_>>();
        assert_eq!(
            names(registry.producers_of("vCrownFireSpreadRate").unwrap()),
            ["CrownSpread", "CrownFromSurface"]
        );
        assert_eq!(
            names(registry.consumers_of("vWindSpeedAtMidflame").unwrap()),
            ["SurfaceSpread", "CrownSpread"]
        );
        assert!(registry.producers_of("vSurfaceFuelBedModel").unwrap().is_empty());
        assert!(registry.variable("vSurfaceFuelBedModel").unwrap().is_input());
    }

    #[test]
    fn every_reference_lands_in_exactly_one_slot() {
        let registry = sample_registry();
        for (i, function) in registry.functions().iter().enumerate() {
            let id = FunctionId(i as u32);
            for v in &function.inputs {
                let slots = &registry.variable_by_id(*v).unwrap().consumers;
                assert_eq!(slots.iter().filter(|&&f| f == id).count(), 1);
            }
            for v in &function.outputs {
                let slots = &registry.variable_by_id(*v).unwrap().producers;
                assert_eq!(slots.iter().filter(|&&f| f == id).count(), 1);
            }
        }
        for variable in registry.variables() {
            assert!(variable.producers.is_filled());
            assert!(variable.consumers.is_filled());
        }
    }

    #[test]
    fn producer_module_joins_names_in_module_order() {
        let registry = sample_registry();
        assert_eq!(
            registry.find_producer_module("vCrownFireSpreadRate").unwrap(),
            "surface crown"
        );
        assert_eq!(
            registry.find_producer_module("vSurfaceFireSpreadAtHead").unwrap(),
            "surface"
        );
        assert_eq!(registry.find_producer_module("vSurfaceFuelBedModel").unwrap(), "");
        assert!(registry.find_producer_module("vMissing").is_err());
    }

    #[test]
    fn producer_override_wins_over_the_graph() {
        let registry = sample_registry();
        let producers = registry.producers_of("vWindAdjFactor").unwrap();
        assert_eq!(producers[0].module.as_deref(), Some("crown"));
        assert_eq!(registry.find_producer_module("vWindAdjFactor").unwrap(), "surface");
    }

    #[test]
    fn module_outputs_are_collected() {
        let registry = sample_registry();
        let crown = registry.module("crown").unwrap();
        let names: Vec<&str> = crown
            .output_variables
            .iter()
            .map(|id| registry.variable_by_id(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["vWindAdjFactor", "vCrownFireSpreadRate"]);
    }

    #[test]
    fn toggling_a_module_hides_its_functions() {
        let mut registry = sample_registry();
        assert_eq!(registry.active_functions().len(), 7);
        registry.set_module_active("crown", false).unwrap();
        let active: Vec<&str> = registry
            .active_functions()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert!(!active.contains(&"CrownSpread"));
        assert!(active.contains(&"DescribeRun"));
        assert_eq!(active.len(), 5);

        // Setting the same state again records nothing.
        registry.set_module_active("crown", false).unwrap();
        assert_eq!(registry.event_log().len(), 1);
        assert!(registry.set_module_active("ghost", true).is_err());
    }

    #[test]
    fn earlier_release_hides_later_functions() {
        let config = EngineConfig {
            release: Some(1),
            ..EngineConfig::default()
        };
        let registry = EngineRegistry::from_definition(SAMPLE_DEFINITION, &config).unwrap();
        assert_eq!(registry.active_functions().len(), 4);
        assert_eq!(registry.find_producer_module("vCrownFireSpreadRate").unwrap(), "");
    }

    #[test]
    fn attach_adds_a_replaceable_value() {
        let mut registry = sample_registry();
        let attached = registry
            .attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL)
            .unwrap();
        assert_eq!(attached.code, "GR14");
        assert_eq!(attached.replaced, None);

        let list = registry.domain_list(FUEL_MODEL_LIST).unwrap();
        assert_eq!(list.len(), 14);
        let value = list.get("GR14").unwrap();
        assert_eq!(value.sort_key, "014");
        assert!(!value.permanent);
        assert_eq!(registry.translate(&value.label_key), "Custom short grass");
        assert_eq!(registry.fuel_model("GR14").unwrap().number, Some(14));
    }

    #[test]
    fn reattaching_the_same_source_replaces() {
        let mut registry = sample_registry();
        let first = registry.attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL).unwrap();
        let edited = SAMPLE_FUEL_MODEL.replace("Custom short grass", "Edited grass");
        let second = registry.attach_fuel_model_str(gr14(), &edited).unwrap();

        assert_eq!(second.replaced.as_deref(), Some("GR14"));
        assert_eq!(second.index, first.index);
        let list = registry.domain_list(FUEL_MODEL_LIST).unwrap();
        assert_eq!(list.len(), 14);
        assert_eq!(
            list.values().iter().filter(|v| v.source.as_deref() == Some(gr14())).count(),
            1
        );
        assert_eq!(registry.fuel_model("GR14").unwrap().description, "Edited grass");
    }

    #[test]
    fn code_change_on_reattach_drops_the_old_label() {
        let mut registry = sample_registry();
        registry.attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL).unwrap();
        let renamed = fuel_model_with_code("GR99", 99);
        let attached = registry.attach_fuel_model_str(gr14(), &renamed).unwrap();
        assert_eq!(attached.replaced.as_deref(), Some("GR14"));

        let list = registry.domain_list(FUEL_MODEL_LIST).unwrap();
        assert!(!list.contains("GR14"));
        assert!(list.contains("GR99"));
        assert!(!registry.translator().contains(&list.label_key_for("GR14")));
    }

    #[test]
    fn bad_units_leave_the_list_unchanged() {
        let mut registry = sample_registry();
        let before = registry.domain_list(FUEL_MODEL_LIST).unwrap().len();
        let err = registry
            .attach_fuel_model_str(gr14(), &fuel_model_with_bad_savr_units())
            .unwrap_err();
        assert!(matches!(err, AttachError::Record { .. }));
        assert_eq!(registry.domain_list(FUEL_MODEL_LIST).unwrap().len(), before);
        assert!(registry.event_log().is_empty());
    }

    #[test]
    fn code_owned_by_another_source_is_refused() {
        let mut registry = sample_registry();
        let clash = fuel_model_with_code("10", 10);
        let err = registry
            .attach_fuel_model_str(Path::new("FuelModels/ten.bpf"), &clash)
            .unwrap_err();
        assert!(matches!(err, AttachError::CodeConflict { ref code, existing: None, .. } if code == "10"));
        assert!(registry.domain_list(FUEL_MODEL_LIST).unwrap().get("10").unwrap().permanent);
    }

    #[test]
    fn detach_removes_value_label_and_record() {
        let mut registry = sample_registry();
        registry.attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL).unwrap();
        let label_key = registry
            .domain_list(FUEL_MODEL_LIST)
            .unwrap()
            .get("GR14")
            .unwrap()
            .label_key
            .clone();

        let removed = registry.detach(FUEL_MODEL_LIST, "GR14").unwrap();
        assert_eq!(removed.code, "GR14");
        assert_eq!(registry.domain_list(FUEL_MODEL_LIST).unwrap().len(), 13);
        assert!(!registry.translator().contains(&label_key));
        assert!(registry.fuel_model("GR14").is_none());
    }

    #[test]
    fn detach_refuses_permanent_values() {
        let mut registry = sample_registry();
        let err = registry.detach(FUEL_MODEL_LIST, "1").unwrap_err();
        assert_eq!(
            err,
            DetachError::Permanent {
                list: FUEL_MODEL_LIST.into(),
                code: "1".into(),
            }
        );
        assert_eq!(registry.domain_list(FUEL_MODEL_LIST).unwrap().len(), 13);
        assert!(registry.fuel_model("1").is_some());

        assert!(matches!(
            registry.detach("NoSuchList", "x"),
            Err(DetachError::UnknownList(_))
        ));
        assert!(matches!(
            registry.detach(FUEL_MODEL_LIST, "GR14"),
            Err(DetachError::NotFound { .. })
        ));
    }

    #[test]
    fn moisture_scenarios_attach_and_detach() {
        let mut registry = sample_registry();
        let path = Path::new("MoisScenarios/Drought.bpm");
        let attached = registry
            .attach_mois_scenario_str(path, SAMPLE_MOIS_SCENARIO)
            .unwrap();
        assert_eq!(attached.list, MOIS_SCENARIO_LIST);
        assert_eq!(attached.code, "Drought");
        let scenario = registry.mois_scenario("Drought").unwrap();
        assert!((scenario.dead1 - 0.02).abs() < 1e-9);
        registry.detach(MOIS_SCENARIO_LIST, "Drought").unwrap();
        assert!(registry.mois_scenario("Drought").is_none());
    }

    #[test]
    fn state_changes_are_recorded_in_order() {
        let mut registry = sample_registry();
        registry.attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL).unwrap();
        registry.attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL).unwrap();
        registry.detach(FUEL_MODEL_LIST, "GR14").unwrap();
        registry.update_property("appFontSize", "14").unwrap();
        registry.set_language("es_MX").unwrap();

        let kinds: Vec<RegistryEventKind> = registry.events().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            [
                RegistryEventKind::ValueAttached,
                RegistryEventKind::ValueReplaced,
                RegistryEventKind::ValueDetached,
                RegistryEventKind::PropertyUpdated,
                RegistryEventKind::LanguageChanged,
            ]
        );
        assert_eq!(registry.drain_events().len(), 5);
        assert!(registry.event_log().is_empty());
    }

    #[test]
    fn suppressed_events_are_not_recorded() {
        let mut registry = sample_registry();
        registry
            .event_log_mut()
            .suppress(RegistryEventKind::PropertyUpdated);
        registry.update_property("appShowSplash", "false").unwrap();
        assert!(registry.event_log().is_empty());
        assert!(!registry.properties().boolean("appShowSplash").unwrap());
    }

    #[test]
    fn failed_property_update_keeps_the_old_value() {
        let mut registry = sample_registry();
        assert!(registry.update_property("appFontSize", "large").is_err());
        assert_eq!(registry.properties().integer("appFontSize").unwrap(), 12);
        assert!(registry.event_log().is_empty());
    }

    #[test]
    fn language_switch_changes_translations() {
        let mut registry = sample_registry();
        assert_eq!(registry.language(), Some("en_US"));
        assert_eq!(registry.translate("ModuleCrown"), "Crown");
        registry.set_language("es_MX").unwrap();
        assert_eq!(registry.translate("ModuleCrown"), "Copa");
        // Missing translations fall back to the first language.
        assert_eq!(registry.translate("ModuleSpot"), "Spotting");
        assert!(registry.set_language("fr_FR").is_err());
        assert_eq!(registry.language(), Some("es_MX"));
    }

    #[test]
    fn seeded_labels_are_translated() {
        let registry = sample_registry();
        let list = registry.domain_list(FUEL_MODEL_LIST).unwrap();
        let value = list.get("1").unwrap();
        assert_eq!(
            registry.translate(&value.label_key),
            registry.fuel_model("1").unwrap().description
        );
    }

    #[test]
    fn labels_translate_without_declared_languages() {
        let mut registry = minimal_registry();
        assert_eq!(registry.language(), None);
        let value = registry.domain_list(FUEL_MODEL_LIST).unwrap().get("1").unwrap();
        assert_eq!(
            registry.translate(&value.label_key),
            registry.fuel_model("1").unwrap().description
        );

        registry
            .attach_fuel_model_str(gr14(), SAMPLE_FUEL_MODEL)
            .unwrap();
        let value = registry.domain_list(FUEL_MODEL_LIST).unwrap().get("GR14").unwrap();
        assert_eq!(registry.translate(&value.label_key), "Custom short grass");
    }

    #[test]
    fn scan_counts_match_the_document() {
        let counts = sample_registry().scan_counts();
        assert_eq!(counts.variables, 10);
        assert_eq!(counts.functions, 7);
        assert_eq!(counts.item_lists, 2);
        assert_eq!(counts.properties, 5);
        assert_eq!(counts.languages, 2);
    }

    #[test]
    fn debug_output_summarizes() {
        let text = format!("{:?}", minimal_registry());
        assert!(text.contains("EngineRegistry"));
        assert!(text.contains("variables: 1"));
    }
}
