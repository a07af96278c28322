//! Settings file formats. The format is chosen by file extension.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::DataLoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Ron,
    Toml,
    Json,
}

impl SettingsFormat {
    /// Every format, in discovery order.
    pub const ALL: [SettingsFormat; 3] =
        [SettingsFormat::Ron, SettingsFormat::Toml, SettingsFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            SettingsFormat::Ron => "ron",
            SettingsFormat::Toml => "toml",
            SettingsFormat::Json => "json",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Deserialize `text`, reporting the parser's message on failure.
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, String> {
        match self {
            SettingsFormat::Ron => ron::from_str(text).map_err(|e| e.to_string()),
            SettingsFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            SettingsFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

/// Read and deserialize a settings file in the format its extension names.
pub fn read_settings<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = SettingsFormat::from_path(path).ok_or_else(|| {
        DataLoadError::SettingsExtension {
            file: path.to_path_buf(),
        }
    })?;
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    format.parse(&text).map_err(|detail| DataLoadError::Settings {
        file: path.to_path_buf(),
        detail,
    })
}
