//! Installation manifest declared by `file` elements.
//!
//! Each entry names a file or directory relative to the installation root,
//! its role, and the access the application needs. [`Manifest::check`]
//! inspects the filesystem and reports problems; it never fails.

use std::path::{Path, PathBuf};

use crate::release::ReleaseRange;

/// Role of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Dir,
    BpData,
    BpDesc,
    GeoData,
    DocHtml,
    DocPdf,
    DocImage,
    DialogImage,
    DocHlp,
}

impl FileKind {
    pub fn parse(text: &str) -> Option<Self> {
        let kind = match text {
            "dir" => FileKind::Dir,
            "bpData" => FileKind::BpData,
            "bpDesc" => FileKind::BpDesc,
            "geoData" => FileKind::GeoData,
            "docHtml" => FileKind::DocHtml,
            "docPdf" => FileKind::DocPdf,
            "docImage" => FileKind::DocImage,
            "dialogImage" => FileKind::DialogImage,
            "docHlp" => FileKind::DocHlp,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_dir(self) -> bool {
        self == FileKind::Dir
    }
}

/// Access flags parsed from a string of `E`, `R` and `W` characters:
/// `E` marks the entry as required to exist, `R` as readable and `W` as
/// writable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permission {
    pub required: bool,
    pub read: bool,
    pub write: bool,
}

impl Permission {
    /// Flags are case-insensitive; any other character is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let mut perm = Permission::default();
        for c in text.chars() {
            match c.to_ascii_uppercase() {
                'E' => perm.required = true,
                'R' => perm.read = true,
                'W' => perm.write = true,
                _ => return None,
            }
        }
        Some(perm)
    }
}

/// One declared installation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub kind: FileKind,
    pub name: String,
    pub perm: Permission,
    pub release: ReleaseRange,
}

/// Something wrong with an installed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestProblem {
    Missing { path: PathBuf },
    /// A directory where a file was expected, or the reverse.
    WrongType { path: PathBuf, expected_dir: bool },
    Unreadable { path: PathBuf },
    ReadOnly { path: PathBuf },
}

impl std::fmt::Display for ManifestProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestProblem::Missing { path } => write!(f, "missing: {}", path.display()),
            ManifestProblem::WrongType { path, expected_dir } => {
                let expected = if *expected_dir { "directory" } else { "file" };
                write!(f, "not a {expected}: {}", path.display())
            }
            ManifestProblem::Unreadable { path } => write!(f, "unreadable: {}", path.display()),
            ManifestProblem::ReadOnly { path } => write!(f, "read-only: {}", path.display()),
        }
    }
}

/// All `file` entries of a definition document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<FileEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every entry current for `release` under `root`.
    pub fn check(&self, root: &Path, release: u32) -> Vec<ManifestProblem> {
        self.entries
            .iter()
            .filter(|e| e.release.contains(release))
            .filter_map(|e| check_entry(root, e))
            .collect()
    }
}

fn check_entry(root: &Path, entry: &FileEntry) -> Option<ManifestProblem> {
    let path = root.join(&entry.name);
    // An absent optional entry is fine; access flags apply once it exists.
    let Ok(meta) = std::fs::metadata(&path) else {
        return entry.perm.required.then_some(ManifestProblem::Missing { path });
    };
    let expected_dir = entry.kind.is_dir();
    if meta.is_dir() != expected_dir {
        return Some(ManifestProblem::WrongType { path, expected_dir });
    }
    if entry.perm.read {
        let readable = if expected_dir {
            std::fs::read_dir(&path).is_ok()
        } else {
            std::fs::File::open(&path).is_ok()
        };
        if !readable {
            return Some(ManifestProblem::Unreadable { path });
        }
    }
    if entry.perm.write && meta.permissions().readonly() {
        return Some(ManifestProblem::ReadOnly { path });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(kind: FileKind, name: &str, perm: &str, from: u32, thru: u32) -> FileEntry {
        FileEntry {
            kind,
            name: name.into(),
            perm: Permission::parse(perm).unwrap(),
            release: ReleaseRange::new(from, thru),
        }
    }

    #[test]
    fn parse_kinds_and_permissions() {
        assert_eq!(FileKind::parse("bpData"), Some(FileKind::BpData));
        assert_eq!(FileKind::parse("dialogImage"), Some(FileKind::DialogImage));
        assert_eq!(FileKind::parse("exe"), None);
        let perm = Permission::parse("RW").unwrap();
        assert!(perm.read && perm.write && !perm.required);
        let perm = Permission::parse("er").unwrap();
        assert!(perm.required && perm.read && !perm.write);
        assert_eq!(Permission::parse("rx"), None);
        assert_eq!(Permission::parse(""), Some(Permission::default()));
    }

    #[test]
    fn reports_missing_and_wrong_type() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("DocsDir"), "not a dir").unwrap();
        let mut manifest = Manifest::new();
        manifest.push(entry(FileKind::BpData, "FuelModels/14.bpf", "ER", 1, 2));
        manifest.push(entry(FileKind::Dir, "DocsDir", "R", 1, 2));

        let problems = manifest.check(root, 1);
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], ManifestProblem::Missing { .. }));
        assert!(matches!(
            problems[1],
            ManifestProblem::WrongType {
                expected_dir: true,
                ..
            }
        ));
    }

    #[test]
    fn entries_outside_release_are_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut manifest = Manifest::new();
        manifest.push(entry(FileKind::DocPdf, "old.pdf", "ER", 1, 1));
        assert_eq!(manifest.check(root, 2), vec![]);
        assert_eq!(manifest.check(root, 1).len(), 1);
    }

    #[test]
    fn present_files_pass() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("FuelModels")).unwrap();
        std::fs::write(root.join("Help.hlp"), "x").unwrap();
        let mut manifest = Manifest::new();
        manifest.push(entry(FileKind::Dir, "FuelModels", "RW", 1, 2));
        manifest.push(entry(FileKind::DocHlp, "Help.hlp", "R", 1, 2));
        assert!(manifest.check(root, 1).is_empty());
    }

    #[test]
    fn optional_entries_may_be_absent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("Required.dat"), "data").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o644);
            std::fs::set_permissions(root.join("Required.dat"), perms).unwrap();
        }
        let mut manifest = Manifest::new();
        manifest.push(entry(FileKind::BpData, "Required.dat", "ER", 1, 2));
        manifest.push(entry(FileKind::DocPdf, "Optional.pdf", "R", 1, 2));
        assert_eq!(manifest.check(root, 2), vec![]);

        std::fs::remove_file(root.join("Required.dat")).unwrap();
        assert_eq!(
            manifest.check(root, 2),
            vec![ManifestProblem::Missing {
                path: root.join("Required.dat")
            }]
        );
    }

    #[test]
    fn problem_display() {
        let p = ManifestProblem::Missing {
            path: PathBuf::from("a/b"),
        };
        assert_eq!(p.to_string(), "missing: a/b");
    }
}
