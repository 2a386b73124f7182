//! Enumeration of candidate source files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::manifest::ManifestError;
use crate::parsing::fasta::is_sequence_file;
use crate::parsing::tables::read_path_list;

/// Files and directories to scan for sequence files.
///
/// Iteration is lazy and can be restarted by calling [`iter`](Self::iter)
/// again. Directories are walked recursively in file-name order, keeping
/// only files with a sequence extension; explicitly named files must exist
/// and carry a sequence extension.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    inputs: Vec<PathBuf>,
}

impl SourceSet {
    pub fn new<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Append the entries of a path list file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` if the list cannot be read.
    pub fn add_list_file(&mut self, list: &Path) -> Result<usize, ManifestError> {
        let paths = read_path_list(list)
            .map_err(|e| ManifestError::invalid_input(list, format!("cannot read path list: {e}")))?;
        let n = paths.len();
        self.inputs.extend(paths);
        Ok(n)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Iterate over candidate source paths.
    pub fn iter(&self) -> impl Iterator<Item = Result<PathBuf, ManifestError>> + '_ {
        self.inputs.iter().flat_map(|input| expand(input))
    }
}

fn expand(input: &Path) -> Box<dyn Iterator<Item = Result<PathBuf, ManifestError>> + '_> {
    if input.is_dir() {
        let walker = WalkDir::new(input)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() && is_sequence_file(entry.path()) => {
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
                Err(e) => Some(Err(ManifestError::Io(e.into()))),
            });
        return Box::new(walker);
    }

    let checked = if !input.exists() {
        Err(ManifestError::invalid_input(input, "path does not exist"))
    } else if !is_sequence_file(input) {
        Err(ManifestError::invalid_input(
            input,
            "unrecognized extension (expected .fa, .fasta, .fna or .faa, optionally gzipped)",
        ))
    } else {
        Ok(input.to_path_buf())
    };
    Box::new(std::iter::once(checked))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, ">s\nACGT\n").unwrap();
    }

    #[test]
    fn test_directory_walk_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.fna"));
        touch(&dir.path().join("a.faa.gz"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("sub/c.fasta"));

        let set = SourceSet::new([dir.path()]);
        let found: Vec<PathBuf> = set.iter().collect::<Result<_, _>>().unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.faa.gz", "b.fna", "sub/c.fasta"]);

        // Restartable: a second pass yields the same sequence
        let again: Vec<PathBuf> = set.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(found, again);
    }

    #[test]
    fn test_explicit_files_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.fa");
        let a = dir.path().join("a.fa");
        touch(&b);
        touch(&a);

        let set = SourceSet::new([&b, &a]);
        let found: Vec<PathBuf> = set.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(found, vec![b, a]);
    }

    #[test]
    fn test_missing_and_unrecognized_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        touch(&txt);

        let set = SourceSet::new([dir.path().join("missing.fa"), txt]);
        let results: Vec<_> = set.iter().collect();
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(ManifestError::InvalidInput { .. }))));
    }

    #[test]
    fn test_add_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("paths.txt");
        std::fs::write(&list, "# inputs\na.fa\nb.fa\n").unwrap();

        let mut set = SourceSet::default();
        assert!(set.is_empty());
        assert_eq!(set.add_list_file(&list).unwrap(), 2);
        assert!(!set.is_empty());
    }
}
