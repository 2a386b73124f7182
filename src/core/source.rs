use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::{Ident, MoleculeType};

/// A sequence file on disk together with the identity derived for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path as given by the caller (not canonicalized)
    pub path: PathBuf,

    /// Identifier derived from the file name or first record
    pub ident: Ident,

    /// Display name; equal to the identifier unless taken from a FASTA header
    pub name: String,

    /// Genome or proteome
    pub moltype: MoleculeType,

    /// MD5 of the file as stored on disk, lowercase hex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl SourceFile {
    pub fn new(
        path: impl Into<PathBuf>,
        ident: Ident,
        name: impl Into<String>,
        moltype: MoleculeType,
    ) -> Self {
        Self {
            path: path.into(),
            ident,
            name: name.into(),
            moltype,
            md5: None,
        }
    }

    #[must_use]
    pub fn with_md5(mut self, md5: impl Into<String>) -> Self {
        self.md5 = Some(md5.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A file referenced from a manifest row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, md5: Option<String>) -> Self {
        Self {
            path: path.into(),
            md5,
        }
    }

    /// Two entries describe the same file when their paths match and
    /// their checksums do not disagree.
    ///
    /// Paths are compared lexically after dropping a leading `./`; no
    /// symlinks are resolved, so `a.fa` and `/abs/a.fa` still differ.
    #[must_use]
    pub fn is_compatible(&self, other: &FileEntry) -> bool {
        if without_curdir(&self.path) != without_curdir(&other.path) {
            return false;
        }
        match (&self.md5, &other.md5) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

fn without_curdir(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

impl From<&SourceFile> for FileEntry {
    fn from(source: &SourceFile) -> Self {
        Self::new(source.path.clone(), source.md5.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_compatible_ignores_leading_curdir() {
        let plain = FileEntry::new("a.fa", None);
        assert!(plain.is_compatible(&FileEntry::new("./a.fa", None)));
        assert!(FileEntry::new("./dir/a.fa", None).is_compatible(&FileEntry::new("dir/a.fa", None)));
        assert!(!plain.is_compatible(&FileEntry::new("dir/a.fa", None)));
    }

    #[test]
    fn test_is_compatible_md5() {
        let md5 = "6aef897c3d6ff0c78aff06ac189178dd".to_string();
        let with = FileEntry::new("a.fa", Some(md5.clone()));
        assert!(with.is_compatible(&FileEntry::new("a.fa", None)));
        assert!(with.is_compatible(&FileEntry::new("a.fa", Some(md5))));
        assert!(!with.is_compatible(&FileEntry::new(
            "a.fa",
            Some("00000000000000000000000000000000".to_string())
        )));
    }
}
