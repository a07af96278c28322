//! Behave Data -- settings loading and workbench bootstrap for
//! [`behave_core`].
//!
//! Reads workbench settings from RON, TOML or JSON, builds the registry from
//! the configured definition document, and attaches the fuel-model and
//! moisture-scenario files found in the configured folders.

pub mod error;
pub mod folder;
pub mod format;
pub mod settings;
pub mod workbench;

pub use error::DataLoadError;
pub use format::SettingsFormat;
pub use settings::WorkbenchSettings;
pub use workbench::{AttachReport, Workbench, open_workbench, open_workbench_file};
