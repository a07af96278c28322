//! Workbench bootstrap: build the registry named by the settings, then attach
//! every record file the settings point at.
//!
//! A broken definition document is fatal. Record files and the property file
//! fail individually; their failures are collected in an [`AttachReport`] and
//! the registry stays usable.

use std::path::{Path, PathBuf};

use behave_core::property::PropertyError;
use behave_core::registry::{AttachError, Attached, EngineRegistry};

use crate::folder::{RecordKind, discover_records};
use crate::error::DataLoadError;
use crate::settings::WorkbenchSettings;

/// Outcome of attaching the configured record files.
#[derive(Debug, Default)]
pub struct AttachReport {
    pub attached: Vec<Attached>,
    pub failed: Vec<(PathBuf, AttachError)>,
    /// Attach-list entries with no recognized record extension.
    pub skipped: Vec<PathBuf>,
    /// Folders that could not be listed.
    pub unreadable_folders: Vec<(PathBuf, std::io::Error)>,
    pub property_error: Option<PropertyError>,
}

impl AttachReport {
    /// True when every configured file loaded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
            && self.skipped.is_empty()
            && self.unreadable_folders.is_empty()
            && self.property_error.is_none()
    }

    fn attach(&mut self, registry: &mut EngineRegistry, path: &Path, kind: RecordKind) {
        let result = match kind {
            RecordKind::FuelModel => registry.attach_fuel_model(path),
            RecordKind::MoisScenario => registry.attach_mois_scenario(path),
        };
        match result {
            Ok(attached) => self.attached.push(attached),
            Err(e) => self.failed.push((path.to_path_buf(), e)),
        }
    }

    fn attach_folder(&mut self, registry: &mut EngineRegistry, dir: &Path, kind: RecordKind) {
        match discover_records(dir, kind) {
            Ok(paths) => {
                for path in paths {
                    self.attach(registry, &path, kind);
                }
            }
            Err(e) => self.unreadable_folders.push((dir.to_path_buf(), e)),
        }
    }
}

/// A built registry and the report of what was attached to it.
#[derive(Debug)]
pub struct Workbench {
    pub registry: EngineRegistry,
    pub report: AttachReport,
}

/// Build the registry and attach the configured records.
pub fn open_workbench(settings: &WorkbenchSettings) -> Result<Workbench, DataLoadError> {
    let mut registry =
        EngineRegistry::from_file(&settings.definition, &settings.engine).map_err(|source| {
            DataLoadError::Definition {
                file: settings.definition.clone(),
                source,
            }
        })?;
    let mut report = AttachReport::default();

    if let Some(path) = &settings.property_file {
        if path.exists() {
            if let Err(e) = registry.load_properties(path) {
                report.property_error = Some(e);
            }
        }
    }
    if let Some(dir) = &settings.fuel_model_folder {
        report.attach_folder(&mut registry, dir, RecordKind::FuelModel);
    }
    if let Some(dir) = &settings.mois_scenario_folder {
        report.attach_folder(&mut registry, dir, RecordKind::MoisScenario);
    }
    for path in &settings.attach {
        match RecordKind::from_path(path) {
            Some(kind) => report.attach(&mut registry, path, kind),
            None => report.skipped.push(path.clone()),
        }
    }

    Ok(Workbench { registry, report })
}

/// Load settings from `path` and open the workbench they describe.
pub fn open_workbench_file(path: &Path) -> Result<Workbench, DataLoadError> {
    open_workbench(&WorkbenchSettings::load(path)?)
}
