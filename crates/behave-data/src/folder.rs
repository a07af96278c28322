//! Record folders: the one-line folder description file and discovery of
//! fuel-model (`.bpf`) and moisture-scenario (`.bpm`) files.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Name of the description file inside a record folder.
pub const DESCRIPTION_FILE: &str = "folder.desc";

/// Kind of attachable record, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    FuelModel,
    MoisScenario,
}

impl RecordKind {
    pub fn extension(self) -> &'static str {
        match self {
            RecordKind::FuelModel => "bpf",
            RecordKind::MoisScenario => "bpm",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bpf") => Some(RecordKind::FuelModel),
            Some(ext) if ext.eq_ignore_ascii_case("bpm") => Some(RecordKind::MoisScenario),
            _ => None,
        }
    }
}

/// First line of the folder's description file, trimmed. `None` when the
/// folder has no description file.
pub fn read_folder_description(dir: &Path) -> io::Result<Option<String>> {
    let file = match fs::File::open(dir.join(DESCRIPTION_FILE)) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(Some(line.trim().to_string()))
}

/// Overwrite the folder's description file. Only the first line of
/// `description` is kept.
pub fn write_folder_description(dir: &Path, description: &str) -> io::Result<()> {
    let line = description.lines().next().unwrap_or_default().trim();
    fs::write(dir.join(DESCRIPTION_FILE), format!("{line}\n"))
}

/// Files of `kind` directly inside `dir`, sorted by path.
pub fn discover_records(dir: &Path, kind: RecordKind) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && RecordKind::from_path(&path) == Some(kind) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
