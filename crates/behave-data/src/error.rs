use std::path::PathBuf;

use behave_core::definition::DefinitionError;

/// Failure to open a workbench.
///
/// Only the settings file and the definition document are fatal; record
/// files that fail to attach end up in the
/// [`AttachReport`](crate::workbench::AttachReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no workbench settings (workbench.ron, .toml or .json) in {}", .dir.display())]
    NoSettings { dir: PathBuf },

    /// More than one settings file in the same folder.
    #[error("ambiguous workbench settings: {}", display_paths(.found))]
    AmbiguousSettings { found: Vec<PathBuf> },

    #[error("{}: settings must be .ron, .toml or .json", .file.display())]
    SettingsExtension { file: PathBuf },

    #[error("{}: {detail}", .file.display())]
    Settings { file: PathBuf, detail: String },

    #[error("cannot read {}: {source}", .file.display())]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The definition document could not be turned into a registry.
    #[error("definition {}: {source}", .file.display())]
    Definition {
        file: PathBuf,
        #[source]
        source: DefinitionError,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
