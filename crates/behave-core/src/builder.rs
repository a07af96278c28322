//! Parse, seed and wiring passes behind
//! [`EngineRegistry::from_definition`](crate::registry::EngineRegistry::from_definition).
//!
//! The builder receives element callbacks from the definition parser and
//! fills storage sized by the pre-scan. After the document is read it seeds
//! the built-in domain values and cross-links every function into the
//! producer and consumer slots of the variables it names.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::catalog::{standard_fuel_models, standard_mois_scenarios};
use crate::config::EngineConfig;
use crate::definition::{Attributes, DefinitionError, DefinitionErrorKind, DefinitionHandler};
use crate::domain::{DomainList, DomainValue, FUEL_MODEL_LIST, MOIS_SCENARIO_LIST};
use crate::fuel::FuelModel;
use crate::function::{Function, PendingRefs};
use crate::id::{DomainListId, FunctionId, RecordKey, VariableId};
use crate::manifest::{FileEntry, FileKind, Manifest, Permission};
use crate::module::{Module, ModuleList};
use crate::moisture::MoisScenario;
use crate::property::{Property, PropertyDict, PropertyError, PropertyType};
use crate::release::{ReleaseCatalog, ReleaseRange};
use crate::scan::ScanCounts;
use crate::slots::Slots;
use crate::translate::Translator;
use crate::units::UnitConverter;
use crate::variable::{Continuous, Discrete, KindTag, Variable, VariableKind};

/// Element names the definition format knows, at any depth.
const KNOWN_ELEMENTS: [&str; 11] = [
    "definition",
    "release",
    "language",
    "translate",
    "property",
    "itemList",
    "item",
    "module",
    "file",
    "function",
    "variable",
];

/// Arenas holding the records behind fuel-model and moisture-scenario values.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordArenas {
    pub fuel_models: SlotMap<RecordKey, FuelModel>,
    pub mois_scenarios: SlotMap<RecordKey, MoisScenario>,
}

/// Everything a finished build hands to the registry.
pub(crate) struct BuiltDefinition {
    pub release: u32,
    pub releases: ReleaseCatalog,
    pub variables: Vec<Variable>,
    pub variable_index: HashMap<String, VariableId>,
    pub functions: Vec<Function>,
    pub function_index: HashMap<String, FunctionId>,
    pub lists: Vec<DomainList>,
    pub list_index: HashMap<String, DomainListId>,
    pub modules: ModuleList,
    pub properties: PropertyDict,
    pub translator: Translator,
    pub manifest: Manifest,
    pub arenas: RecordArenas,
    pub counts: ScanCounts,
}

pub(crate) struct DefinitionBuilder<'a> {
    config: &'a EngineConfig,
    units: &'a dyn UnitConverter,
    counts: ScanCounts,
    stack: Vec<String>,
    document_release: Option<u32>,
    releases: ReleaseCatalog,
    variables: Vec<Variable>,
    variable_index: HashMap<String, VariableId>,
    functions: Vec<Function>,
    function_index: HashMap<String, FunctionId>,
    /// Unresolved references, index-aligned with `functions`.
    pending: Vec<PendingRefs>,
    lists: Vec<DomainList>,
    list_index: HashMap<String, DomainListId>,
    current_list: Option<DomainListId>,
    modules: ModuleList,
    properties: PropertyDict,
    translator: Translator,
    manifest: Manifest,
}

impl<'a> DefinitionBuilder<'a> {
    pub fn new(config: &'a EngineConfig, units: &'a dyn UnitConverter, counts: ScanCounts) -> Self {
        let sizing = counts.sizing();
        Self {
            config,
            units,
            counts,
            stack: Vec::new(),
            document_release: None,
            releases: ReleaseCatalog::new(),
            variables: Vec::with_capacity(counts.variables),
            variable_index: HashMap::with_capacity(sizing.variables),
            functions: Vec::with_capacity(counts.functions),
            function_index: HashMap::with_capacity(sizing.functions),
            pending: Vec::with_capacity(counts.functions),
            lists: Vec::with_capacity(counts.item_lists),
            list_index: HashMap::with_capacity(sizing.item_lists),
            current_list: None,
            modules: ModuleList::with_capacity(counts.modules),
            properties: PropertyDict::with_capacity(sizing.properties),
            translator: Translator::with_capacity(sizing.translations),
            manifest: Manifest::with_capacity(counts.files),
        }
    }

    // -----------------------------------------------------------------------
    // Attribute helpers
    // -----------------------------------------------------------------------

    /// `releaseFrom`/`releaseThru`, defaulting to the first and latest
    /// declared releases. Explicit numbers must have been declared.
    fn release_range(&self, attrs: &Attributes) -> Result<ReleaseRange, DefinitionErrorKind> {
        let lowest = self.releases.iter().map(|r| r.number).min().unwrap_or(0);
        let latest = self.releases.latest().unwrap_or(u32::MAX);
        let from = attrs.optional_u32("releaseFrom", lowest)?;
        let thru = attrs.optional_u32("releaseThru", latest)?;
        for (name, number) in [("releaseFrom", from), ("releaseThru", thru)] {
            if attrs.get(name).is_some() && !self.releases.is_declared(number) {
                return Err(DefinitionErrorKind::UnknownRelease(number));
            }
        }
        if from > thru {
            return Err(DefinitionErrorKind::InvertedReleaseRange { from, thru });
        }
        Ok(ReleaseRange::new(from, thru))
    }

    fn check_capacity(
        len: usize,
        capacity: usize,
        kind: &'static str,
    ) -> Result<(), DefinitionErrorKind> {
        if len >= capacity {
            return Err(DefinitionErrorKind::CapacityExceeded { kind, capacity });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Element handlers
    // -----------------------------------------------------------------------

    fn on_root(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        if attrs.get("release").is_some() {
            self.document_release = Some(attrs.required_u32("release")?);
        }
        Ok(())
    }

    fn on_release(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let number = attrs.required_u32("number")?;
        if !self
            .releases
            .declare(number, &attrs.optional_str("description"))
        {
            return Err(DefinitionErrorKind::DuplicateRelease(number));
        }
        Ok(())
    }

    fn on_language(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let name = attrs.required("name")?;
        if !self.translator.declare_language(name) {
            return Err(DefinitionErrorKind::Duplicate {
                kind: "language",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn on_translate(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let key = attrs.required("key")?;
        for (language, text) in attrs.iter().filter(|(name, _)| *name != "key") {
            if !self.translator.has_language(language) {
                return Err(DefinitionErrorKind::UnknownLanguage(language.to_string()));
            }
            self.translator.insert(key, language, text);
        }
        Ok(())
    }

    fn on_property(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let name = attrs.required("name")?;
        let raw_type = attrs.required("type")?;
        let kind = PropertyType::parse(raw_type)
            .ok_or_else(|| attrs.invalid("type", raw_type, "a property type"))?;
        let value = attrs.required("value")?;
        let release = self.release_range(attrs)?;
        let property = Property::new(name, kind, value, release)
            .map_err(|_| attrs.invalid("value", value, "a value of the declared type"))?;
        self.properties.add(property).map_err(|e| match e {
            PropertyError::Duplicate(name) => DefinitionErrorKind::Duplicate {
                kind: "property",
                name,
            },
            other => DefinitionErrorKind::Xml(other.to_string()),
        })
    }

    fn on_item_list(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        Self::check_capacity(self.lists.len(), self.counts.item_lists, "itemList")?;
        let name = attrs.required("name")?;
        if self.list_index.contains_key(name) {
            return Err(DefinitionErrorKind::Duplicate {
                kind: "itemList",
                name: name.to_string(),
            });
        }
        let id = DomainListId(self.lists.len() as u32);
        self.lists.push(DomainList::new(name));
        self.list_index.insert(name.to_string(), id);
        self.current_list = Some(id);
        Ok(())
    }

    fn on_item(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let Some(id) = self.current_list else {
            return Err(DefinitionErrorKind::MisplacedElement {
                element: "item".to_string(),
                parent: "definition".to_string(),
            });
        };
        let list = &mut self.lists[id.index()];
        let code = attrs.required("name")?;
        let sort = attrs.get("sort").unwrap_or(code);
        let index = attrs.optional_u32("index", list.next_index())?;
        let label_key = list.label_key_for(code);
        list.insert(DomainValue::permanent(code, sort, index, &label_key))?;
        Ok(())
    }

    fn on_module(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let name = attrs.required("name")?;
        let mut module = Module::new(name, self.release_range(attrs)?);
        module.sort_key = attrs.optional_str("sort");
        module.text_key = attrs.get("textKey").unwrap_or(name).to_string();
        module.indent = attrs.optional_u32("indent", 0)?;
        if !self.modules.push(module) {
            return Err(DefinitionErrorKind::Duplicate {
                kind: "module",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn on_file(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        let raw_kind = attrs.required("type")?;
        let kind = FileKind::parse(raw_kind)
            .ok_or_else(|| attrs.invalid("type", raw_kind, "a file type"))?;
        let name = attrs.required("name")?;
        let raw_perm = attrs.get("perm").unwrap_or("");
        let perm = Permission::parse(raw_perm)
            .ok_or_else(|| attrs.invalid("perm", raw_perm, "a combination of E, R and W"))?;
        let release = self.release_range(attrs)?;
        self.manifest.push(FileEntry {
            kind,
            name: name.to_string(),
            perm,
            release,
        });
        Ok(())
    }

    fn on_function(&mut self, attrs: &Attributes, line: usize) -> Result<(), DefinitionErrorKind> {
        Self::check_capacity(self.functions.len(), self.counts.functions, "function")?;
        let name = attrs.required("name")?;
        if self.function_index.contains_key(name) {
            return Err(DefinitionErrorKind::Duplicate {
                kind: "function",
                name: name.to_string(),
            });
        }
        let release = self.release_range(attrs)?;
        let module = attrs.get("module");
        let inputs: Vec<String> = attrs.all("input").map(str::to_string).collect();
        let outputs: Vec<String> = attrs.all("output").map(str::to_string).collect();

        if self.config.validate_references {
            if let Some(module) = module {
                if !self.modules.contains(module) {
                    return Err(DefinitionErrorKind::UnknownModule {
                        function: name.to_string(),
                        module: module.to_string(),
                    });
                }
            }
            if let Some(missing) = inputs
                .iter()
                .chain(&outputs)
                .find(|v| !self.variable_index.contains_key(v.as_str()))
            {
                return Err(DefinitionErrorKind::UnknownVariable {
                    function: name.to_string(),
                    variable: missing.clone(),
                });
            }
        }

        let id = FunctionId(self.functions.len() as u32);
        let mut function = Function::new(name, release);
        function.module = module.map(str::to_string);
        self.functions.push(function);
        self.function_index.insert(name.to_string(), id);
        self.pending.push(PendingRefs {
            inputs,
            outputs,
            line,
        });
        Ok(())
    }

    fn on_variable(&mut self, attrs: &Attributes) -> Result<(), DefinitionErrorKind> {
        Self::check_capacity(self.variables.len(), self.counts.variables, "variable")?;
        let name = attrs.required("name")?;
        if self.variable_index.contains_key(name) {
            return Err(DefinitionErrorKind::Duplicate {
                kind: "variable",
                name: name.to_string(),
            });
        }
        let raw_type = attrs.required("type")?;
        let tag = KindTag::parse(raw_type)
            .ok_or_else(|| attrs.invalid("type", raw_type, "continuous, discrete or text"))?;
        let release = self.release_range(attrs)?;
        let kind = match tag {
            KindTag::Continuous => VariableKind::Continuous(self.continuous(name, attrs)?),
            KindTag::Discrete => VariableKind::Discrete(self.discrete(name, attrs)?),
            KindTag::Text => VariableKind::Text,
        };

        let mut variable = Variable::new(name, release, kind);
        variable.help = attrs.optional_str("help");
        variable.sort_in = attrs.optional_str("sortIn");
        variable.sort_out = attrs.optional_str("sortOut");

        let id = VariableId(self.variables.len() as u32);
        self.variables.push(variable);
        self.variable_index.insert(name.to_string(), id);
        Ok(())
    }

    fn continuous(&self, name: &str, attrs: &Attributes) -> Result<Continuous, DefinitionErrorKind> {
        let native_units = attrs.required("nativeUnits")?.to_string();
        let display_units = attrs
            .get("displayUnits")
            .unwrap_or(native_units.as_str())
            .to_string();
        let alternate_units = attrs
            .get("alternateUnits")
            .unwrap_or(display_units.as_str())
            .to_string();
        for target in [&display_units, &alternate_units] {
            self.units
                .conversion(&native_units, target)
                .map_err(|source| DefinitionErrorKind::Units {
                    variable: name.to_string(),
                    source,
                })?;
        }
        let native_decimals = attrs.optional_u32("nativeDecimals", 0)?;
        Ok(Continuous {
            native_decimals,
            display_decimals: attrs.optional_u32("displayDecimals", native_decimals)?,
            alternate_decimals: attrs.optional_u32("alternateDecimals", native_decimals)?,
            minimum: attrs.optional_f64("minimum", 0.0)?,
            maximum: attrs.optional_f64("maximum", 0.0)?,
            default: attrs.optional_f64("default", 0.0)?,
            wraps_around: attrs.optional_bool("wrap", false)?,
            native_units,
            display_units,
            alternate_units,
        })
    }

    fn discrete(&self, name: &str, attrs: &Attributes) -> Result<Discrete, DefinitionErrorKind> {
        let item_list = match attrs.get("itemList") {
            Some(list) => Some(*self.list_index.get(list).ok_or_else(|| {
                DefinitionErrorKind::UnknownItemList {
                    variable: name.to_string(),
                    list: list.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Discrete { item_list })
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    fn ensure_list(&mut self, name: &str) -> DomainListId {
        if let Some(&id) = self.list_index.get(name) {
            return id;
        }
        let id = DomainListId(self.lists.len() as u32);
        self.lists.push(DomainList::new(name));
        self.list_index.insert(name.to_string(), id);
        id
    }

    /// Add a permanent built-in value, or attach the record to a value the
    /// document already declared with the same code.
    fn seed_value(
        &mut self,
        list: DomainListId,
        code: &str,
        sort_key: &str,
        label: &str,
        record: RecordKey,
    ) -> Result<(), DefinitionError> {
        let list = &mut self.lists[list.index()];
        let label_key = list.label_key_for(code);
        if !list.set_record(code, record) {
            let index = list.next_index();
            let value = DomainValue {
                record: Some(record),
                ..DomainValue::permanent(code, sort_key, index, &label_key)
            };
            list.insert(value)
                .map_err(|e| DefinitionError::unlocated(e.into()))?;
        }
        if !self.translator.contains(&label_key) {
            self.translator.insert_all(&label_key, label);
        }
        Ok(())
    }

    fn seed(&mut self) -> Result<RecordArenas, DefinitionError> {
        let mut arenas = RecordArenas::default();

        let fuel_list = self.ensure_list(FUEL_MODEL_LIST);
        for model in standard_fuel_models() {
            let code = model.code.clone();
            let sort_key = model.sort_key();
            let label = model.description.clone();
            let key = arenas.fuel_models.insert(model);
            self.seed_value(fuel_list, &code, &sort_key, &label, key)?;
        }

        let mois_list = self.ensure_list(MOIS_SCENARIO_LIST);
        if self.config.seed_moisture_scenarios {
            for scenario in standard_mois_scenarios() {
                let code = scenario.code.clone();
                let sort_key = scenario.sort_key();
                let label = scenario.description.clone();
                let key = arenas.mois_scenarios.insert(scenario);
                self.seed_value(mois_list, &code, &sort_key, &label, key)?;
            }
        }
        Ok(arenas)
    }

    // -----------------------------------------------------------------------
    // Wiring
    // -----------------------------------------------------------------------

    fn resolve_references(&mut self) -> Result<(), DefinitionError> {
        let mut resolved = Vec::with_capacity(self.functions.len());
        for (function, refs) in self.functions.iter().zip(&self.pending) {
            let lookup = |variable: &String| {
                self.variable_index.get(variable).copied().ok_or_else(|| {
                    DefinitionError::at(
                        refs.line,
                        DefinitionErrorKind::UnknownVariable {
                            function: function.name.clone(),
                            variable: variable.clone(),
                        },
                    )
                })
            };
            let inputs = refs.inputs.iter().map(lookup).collect::<Result<Vec<_>, _>>()?;
            let outputs = refs.outputs.iter().map(lookup).collect::<Result<Vec<_>, _>>()?;
            if let Some(module) = &function.module {
                if !self.modules.contains(module) {
                    return Err(DefinitionError::at(
                        refs.line,
                        DefinitionErrorKind::UnknownModule {
                            function: function.name.clone(),
                            module: module.clone(),
                        },
                    ));
                }
            }
            resolved.push((inputs, outputs));
        }
        for (function, (inputs, outputs)) in self.functions.iter_mut().zip(resolved) {
            function.inputs = inputs;
            function.outputs = outputs;
        }
        Ok(())
    }

    fn wire(&mut self) -> Result<(), DefinitionError> {
        self.resolve_references()?;

        let mut producer_counts = vec![0usize; self.variables.len()];
        let mut consumer_counts = vec![0usize; self.variables.len()];
        for function in &self.functions {
            for v in &function.inputs {
                consumer_counts[v.index()] += 1;
            }
            for v in &function.outputs {
                producer_counts[v.index()] += 1;
            }
        }
        for (i, variable) in self.variables.iter_mut().enumerate() {
            variable.producers = Slots::with_capacity(producer_counts[i]);
            variable.consumers = Slots::with_capacity(consumer_counts[i]);
        }

        for (i, function) in self.functions.iter().enumerate() {
            let id = FunctionId(i as u32);
            for v in &function.inputs {
                let variable = &mut self.variables[v.index()];
                variable.consumers.push(id).map_err(|_| {
                    DefinitionError::unlocated(DefinitionErrorKind::SlotOverflow {
                        variable: variable.name.clone(),
                        role: "consumer",
                    })
                })?;
            }
            for v in &function.outputs {
                let variable = &mut self.variables[v.index()];
                variable.producers.push(id).map_err(|_| {
                    DefinitionError::unlocated(DefinitionErrorKind::SlotOverflow {
                        variable: variable.name.clone(),
                        role: "producer",
                    })
                })?;
            }
            if let Some(module) = function
                .module
                .as_deref()
                .and_then(|m| self.modules.get_mut(m))
            {
                for v in &function.outputs {
                    if !module.output_variables.contains(v) {
                        module.output_variables.push(*v);
                    }
                }
            }
        }

        for variable in &self.variables {
            for (slots, role) in [(&variable.producers, "producer"), (&variable.consumers, "consumer")] {
                if !slots.is_filled() {
                    return Err(DefinitionError::unlocated(
                        DefinitionErrorKind::UnfilledSlots {
                            variable: variable.name.clone(),
                            role,
                        },
                    ));
                }
            }
        }
        Ok(())
    }

    /// Seed, wire and hand over the finished storage.
    pub fn finish(mut self) -> Result<BuiltDefinition, DefinitionError> {
        let release = self
            .config
            .release
            .or(self.document_release)
            .or_else(|| self.releases.latest())
            .unwrap_or(0);
        if !self.releases.is_empty() && !self.releases.is_declared(release) {
            return Err(DefinitionError::unlocated(
                DefinitionErrorKind::UnknownRelease(release),
            ));
        }

        let arenas = self.seed()?;
        self.wire()?;

        if let Some(language) = &self.config.language {
            self.translator.set_language(language).map_err(|_| {
                DefinitionError::unlocated(DefinitionErrorKind::UnknownLanguage(language.clone()))
            })?;
        }

        Ok(BuiltDefinition {
            release,
            releases: self.releases,
            variables: self.variables,
            variable_index: self.variable_index,
            functions: self.functions,
            function_index: self.function_index,
            lists: self.lists,
            list_index: self.list_index,
            modules: self.modules,
            properties: self.properties,
            translator: self.translator,
            manifest: self.manifest,
            arenas,
            counts: self.counts,
        })
    }
}

impl DefinitionHandler for DefinitionBuilder<'_> {
    fn start(
        &mut self,
        element: &str,
        attributes: &Attributes,
        line: usize,
    ) -> Result<(), DefinitionErrorKind> {
        let parent = self.stack.last().cloned();
        match (parent.as_deref(), element) {
            (None, "definition") => self.on_root(attributes)?,
            (None, other) => {
                return Err(DefinitionErrorKind::WrongRoot {
                    expected: "definition",
                    found: other.to_string(),
                });
            }
            (Some("definition"), "release") => self.on_release(attributes)?,
            (Some("definition"), "language") => self.on_language(attributes)?,
            (Some("definition"), "translate") => self.on_translate(attributes)?,
            (Some("definition"), "property") => self.on_property(attributes)?,
            (Some("definition"), "itemList") => self.on_item_list(attributes)?,
            (Some("itemList"), "item") => self.on_item(attributes)?,
            (Some("definition"), "module") => self.on_module(attributes)?,
            (Some("definition"), "file") => self.on_file(attributes)?,
            (Some("definition"), "function") => self.on_function(attributes, line)?,
            (Some("definition"), "variable") => self.on_variable(attributes)?,
            (Some(parent), other) if KNOWN_ELEMENTS.contains(&other) => {
                return Err(DefinitionErrorKind::MisplacedElement {
                    element: other.to_string(),
                    parent: parent.to_string(),
                });
            }
            (Some(_), other) => {
                return Err(DefinitionErrorKind::UnknownElement(other.to_string()));
            }
        }
        self.stack.push(element.to_string());
        Ok(())
    }

    fn end(&mut self, element: &str) -> Result<(), DefinitionErrorKind> {
        if element == "itemList" {
            self.current_list = None;
        }
        self.stack.pop();
        Ok(())
    }
}
