//! In-memory manifest and the uniqueness rules applied while assembling it.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::source::{FileEntry, SourceFile};
use crate::core::types::{Ident, MoleculeType};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Invalid input '{path}': {reason}")]
    InvalidInput { path: String, reason: String },

    #[error("Conflicting {what} for identifier '{ident}': '{first}' vs '{second}'")]
    Conflict {
        ident: String,
        what: String,
        first: String,
        second: String,
    },

    #[error("Output '{0}' already exists (use --force to overwrite)")]
    OutputExists(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ManifestError {
    pub fn invalid_input(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn conflict(
        ident: &Ident,
        what: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            ident: ident.to_string(),
            what: what.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// One identifier with its genome and/or protein file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRow {
    pub ident: Ident,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub genome: Option<FileEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<FileEntry>,
}

impl ManifestRow {
    pub fn from_source(source: &SourceFile) -> Self {
        let mut row = Self {
            ident: source.ident.clone(),
            name: source.name.clone(),
            genome: None,
            protein: None,
        };
        *row.slot_mut(source.moltype) = Some(FileEntry::from(source));
        row
    }

    /// File for the given molecule type, if any
    #[must_use]
    pub fn file(&self, moltype: MoleculeType) -> Option<&FileEntry> {
        match moltype {
            MoleculeType::Dna => self.genome.as_ref(),
            MoleculeType::Protein => self.protein.as_ref(),
        }
    }

    /// Files of this row, genome first
    pub fn files(&self) -> impl Iterator<Item = (MoleculeType, &FileEntry)> {
        [MoleculeType::Dna, MoleculeType::Protein]
            .into_iter()
            .filter_map(move |m| self.file(m).map(|f| (m, f)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genome.is_none() && self.protein.is_none()
    }

    fn slot_mut(&mut self, moltype: MoleculeType) -> &mut Option<FileEntry> {
        match moltype {
            MoleculeType::Dna => &mut self.genome,
            MoleculeType::Protein => &mut self.protein,
        }
    }
}

/// Ordered collection of rows, unique by identifier.
///
/// Rows keep the position at which their identifier was first seen. A genome
/// and a protein file sharing an identifier fill the two slots of one row;
/// anything else that lands on an occupied slot is a conflict.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    rows: Vec<ManifestRow>,
    index: HashMap<Ident, usize>,
    origins: HashMap<Ident, String>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a manifest from sources in the order given.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Conflict` if two sources claim the same
    /// identifier and molecule type with different paths, or the same
    /// identifier with different names.
    pub fn assemble<I>(sources: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut manifest = Self::new();
        for source in sources {
            manifest.add_source(&source)?;
        }
        Ok(manifest)
    }

    /// Add a single source file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Conflict` on a duplicate identifier.
    pub fn add_source(&mut self, source: &SourceFile) -> Result<(), ManifestError> {
        self.merge_row(ManifestRow::from_source(source), None)
    }

    /// Merge a row, optionally recording where it came from so conflicts can
    /// name the offending manifests.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Conflict` if the row disagrees with an
    /// existing row for the same identifier, or `ManifestError::InvalidInput`
    /// if the row carries no files.
    pub fn merge_row(
        &mut self,
        row: ManifestRow,
        origin: Option<&str>,
    ) -> Result<(), ManifestError> {
        if row.ident.0.is_empty() {
            return Err(ManifestError::InvalidInput {
                path: origin.unwrap_or("<row>").to_string(),
                reason: "empty identifier".to_string(),
            });
        }
        if row.is_empty() {
            return Err(ManifestError::InvalidInput {
                path: origin.unwrap_or("<row>").to_string(),
                reason: format!("no files listed for '{}'", row.ident),
            });
        }

        let Some(&i) = self.index.get(&row.ident) else {
            self.index.insert(row.ident.clone(), self.rows.len());
            if let Some(origin) = origin {
                self.origins.insert(row.ident.clone(), origin.to_string());
            }
            self.rows.push(row);
            return Ok(());
        };

        let existing_origin = self.origins.get(&row.ident).map(String::as_str);
        let existing = &self.rows[i];

        if existing.name != row.name {
            return Err(ManifestError::conflict(
                &row.ident,
                "names",
                tag(&existing.name, existing_origin),
                tag(&row.name, origin),
            ));
        }

        // Validate every slot before touching the stored row
        for (moltype, incoming) in row.files() {
            if let Some(current) = existing.file(moltype) {
                if !current.is_compatible(incoming) {
                    return Err(ManifestError::conflict(
                        &row.ident,
                        format!("{moltype} files"),
                        tag(&current.path.display().to_string(), existing_origin),
                        tag(&incoming.path.display().to_string(), origin),
                    ));
                }
            }
        }

        let existing = &mut self.rows[i];
        for moltype in [MoleculeType::Dna, MoleculeType::Protein] {
            let Some(incoming) = row.file(moltype).cloned() else {
                continue;
            };
            let slot = existing.slot_mut(moltype);
            if slot.is_none() {
                *slot = Some(incoming);
                continue;
            }
            if let Some(current) = slot.as_mut() {
                debug!(
                    "Duplicate {} entry for '{}' collapsed: {}",
                    moltype,
                    row.ident,
                    incoming.path.display()
                );
                if current.md5.is_none() {
                    current.md5 = incoming.md5;
                }
            }
        }

        Ok(())
    }

    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, ident: &Ident) -> Option<&ManifestRow> {
        self.index.get(ident).map(|&i| &self.rows[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of files across all rows
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.rows.iter().map(|r| r.files().count()).sum()
    }
}

fn tag(value: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) => format!("{value} (in {origin})"),
        None => value.to_string(),
    }
}
