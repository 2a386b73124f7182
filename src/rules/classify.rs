//! Molecule-type classification of source files.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::core::manifest::ManifestError;
use crate::core::types::{Ident, MoleculeType};
use crate::parsing::fasta::sequence_extension;

/// Assigns genome or protein to a source.
///
/// Lookup order: the caller-supplied table (keyed by full path, then file
/// name, then identifier), then the extension convention (`.faa` protein,
/// `.fna` DNA), then `ambiguous` for `.fa`/`.fasta`.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: HashMap<String, MoleculeType>,
    ambiguous: MoleculeType,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
            ambiguous: MoleculeType::Dna,
        }
    }
}

impl Classifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Molecule type for `.fa`/`.fasta` files not in the table
    #[must_use]
    pub fn with_default(mut self, moltype: MoleculeType) -> Self {
        self.ambiguous = moltype;
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: HashMap<String, MoleculeType>) -> Self {
        self.table = table;
        self
    }

    /// Classify a source.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` if the path is not in the table
    /// and has no recognized sequence extension.
    pub fn classify(&self, path: &Path, ident: &Ident) -> Result<MoleculeType, ManifestError> {
        if let Some(moltype) = self.lookup(path, ident) {
            debug!("{} classified as {} by lookup table", path.display(), moltype);
            return Ok(moltype);
        }

        match sequence_extension(path).as_deref() {
            Some("faa") => Ok(MoleculeType::Protein),
            Some("fna") => Ok(MoleculeType::Dna),
            Some(_) => Ok(self.ambiguous),
            None => Err(ManifestError::invalid_input(
                path,
                "cannot classify: unrecognized sequence extension",
            )),
        }
    }

    fn lookup(&self, path: &Path, ident: &Ident) -> Option<MoleculeType> {
        if self.table.is_empty() {
            return None;
        }
        let full = path.to_string_lossy();
        let file_name = path.file_name().map(|n| n.to_string_lossy());

        self.table
            .get(&*full)
            .or_else(|| file_name.and_then(|n| self.table.get(&*n)))
            .or_else(|| self.table.get(ident.as_str()))
            .copied()
    }
}
