//! Behave Core -- the equation-application registry of a fire-behavior
//! workbench.
//!
//! This crate reads a declarative definition document and builds the
//! bipartite graph of typed variables and the functions that produce and
//! consume them, along with the enumerated domain lists, modules, properties
//! and translations the document declares.
//!
//! # Construction Pipeline
//!
//! [`registry::EngineRegistry::from_definition`] runs six steps:
//!
//! 1. **Scan** -- Count element lines to size storage ([`scan`]).
//! 2. **Size** -- Round dictionary capacities up to a prime ([`prime`]).
//! 3. **Allocate** -- Reserve exact storage for variables, functions and lists.
//! 4. **Parse** -- Stream the document through the element handlers
//!    ([`definition`]).
//! 5. **Seed** -- Add the standard fuel models and moisture scenarios
//!    ([`catalog`]).
//! 6. **Wire** -- Fill every variable's producer and consumer slots.
//!
//! Any construction error is fatal and reported as a
//! [`definition::DefinitionError`] carrying the document line.
//!
//! # Run-time Changes
//!
//! ```rust,ignore
//! let mut registry = EngineRegistry::from_file(path, &EngineConfig::default())?;
//! registry.attach_fuel_model(Path::new("FuelModels/GR14.bpf"))?;
//! registry.set_module_active("crown", false)?;
//! for event in registry.drain_events() { /* ... */ }
//! ```
//!
//! # Key Types
//!
//! - [`registry::EngineRegistry`] -- Owns the graph, lists, modules and records.
//! - [`variable::Variable`] -- Continuous, discrete or text graph node.
//! - [`function::Function`] -- Named transform with input and output variables.
//! - [`domain::DomainList`] -- Ordered catalog of selectable values.
//! - [`property::PropertyDict`] -- Typed, release-scoped settings.
//! - [`units::UnitConverter`] -- Unit conversion seam.
//! - [`event::EventLog`] -- Ring buffer of registry state changes.

mod builder;
pub mod catalog;
pub mod config;
pub mod definition;
pub mod domain;
pub mod event;
pub mod fuel;
pub mod function;
pub mod id;
pub mod manifest;
pub mod module;
pub mod moisture;
pub mod prime;
pub mod property;
pub mod record;
pub mod registry;
pub mod release;
pub mod scan;
pub mod slots;
pub mod translate;
pub mod units;
pub mod variable;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
