//! Workbench settings: which definition document to build, how to build it,
//! and which record files to attach afterwards.
//!
//! Settings are read from RON, TOML or JSON (chosen by extension). Relative
//! paths are resolved against the directory holding the settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use behave_core::config::EngineConfig;

use crate::error::DataLoadError;
use crate::format::{SettingsFormat, read_settings};

/// Base name of the settings file looked up by [`WorkbenchSettings::discover`].
pub const SETTINGS_BASE_NAME: &str = "workbench";

/// On-disk workbench settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchSettings {
    /// Path of the definition document.
    pub definition: PathBuf,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Folder scanned for `.bpf` fuel-model files.
    #[serde(default)]
    pub fuel_model_folder: Option<PathBuf>,
    /// Folder scanned for `.bpm` moisture-scenario files.
    #[serde(default)]
    pub mois_scenario_folder: Option<PathBuf>,
    /// Record files attached after the folders, in order.
    #[serde(default)]
    pub attach: Vec<PathBuf>,
    /// Property file read after construction, when present.
    #[serde(default)]
    pub property_file: Option<PathBuf>,
}

impl WorkbenchSettings {
    pub fn new(definition: impl Into<PathBuf>) -> Self {
        Self {
            definition: definition.into(),
            engine: EngineConfig::default(),
            fuel_model_folder: None,
            mois_scenario_folder: None,
            attach: Vec::new(),
            property_file: None,
        }
    }

    /// Load settings from `path`, resolving relative paths against its
    /// directory.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let settings: Self = read_settings(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(settings.resolved(base))
    }

    /// Load the one `workbench.{ron,toml,json}` in `dir`. Finding none or
    /// several is an error.
    pub fn discover(dir: &Path) -> Result<Self, DataLoadError> {
        let mut found: Vec<PathBuf> = SettingsFormat::ALL
            .into_iter()
            .map(|f| dir.join(format!("{SETTINGS_BASE_NAME}.{}", f.extension())))
            .filter(|p| p.is_file())
            .collect();
        match found.len() {
            0 => Err(DataLoadError::NoSettings {
                dir: dir.to_path_buf(),
            }),
            1 => Self::load(&found.remove(0)),
            _ => Err(DataLoadError::AmbiguousSettings { found }),
        }
    }

    /// Copy with every relative path joined onto `base`.
    pub fn resolved(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.definition = join(self.definition);
        self.fuel_model_folder = self.fuel_model_folder.map(join);
        self.mois_scenario_folder = self.mois_scenario_folder.map(join);
        self.property_file = self.property_file.map(join);
        self.attach = self.attach.into_iter().map(join).collect();
        self
    }
}
