//! Manifest builder: turns source paths into a validated [`Manifest`].
//!
//! Every source is checked (exists, readable, known extension), given an
//! identifier and a molecule type, and merged into the manifest in input
//! order. Nothing is written here; callers hand the finished manifest to
//! [`write_manifest_file`](crate::fromfile::writer::write_manifest_file).

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::manifest::{Manifest, ManifestError};
use crate::core::source::SourceFile;
use crate::core::types::{ManifestLayout, MoleculeType};
use crate::fromfile::sources::SourceSet;
use crate::parsing::fasta::{file_md5, is_sequence_file, read_first_definition};
use crate::parsing::tables::read_moltype_table;
use crate::rules::classify::Classifier;
use crate::rules::identifier::IdentifierRule;

/// Build settings that can be kept in a JSON file.
///
/// ```json
/// {
///   "identifier": { "rule": "prefix", "delimiter": "_", "fields": 2 },
///   "default_moltype": "DNA",
///   "moltype_table": "moltypes.csv",
///   "layout": "fromfile",
///   "md5": false
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub identifier: IdentifierRule,
    pub default_moltype: Option<MoleculeType>,
    pub moltype_table: Option<PathBuf>,
    pub layout: ManifestLayout,
    pub md5: bool,
}

impl BuildConfig {
    /// Load a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Io` if the file cannot be read, or
    /// `ManifestError::Config` if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ManifestError::Config(format!("{}: {e}", path.display())))
    }

    /// Check that the settings are usable together.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Config` for invalid rule parameters, or if MD5
    /// checksums are requested for the fromfile layout, which has no column
    /// for them.
    pub fn validate(&self) -> Result<(), ManifestError> {
        self.identifier.validate()?;
        if self.md5 && self.layout == ManifestLayout::Fromfile {
            return Err(ManifestError::Config(
                "md5 checksums require the 'files' layout".to_string(),
            ));
        }
        Ok(())
    }

    /// Classifier described by this config, loading the lookup table if set.
    ///
    /// # Errors
    ///
    /// Returns errors from reading the lookup table.
    pub fn classifier(&self) -> Result<Classifier, ManifestError> {
        let mut classifier = Classifier::new();
        if let Some(moltype) = self.default_moltype {
            classifier = classifier.with_default(moltype);
        }
        if let Some(table) = &self.moltype_table {
            classifier = classifier.with_table(read_moltype_table(table)?);
        }
        Ok(classifier)
    }
}

/// Builds manifests from source files
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    rule: IdentifierRule,
    classifier: Classifier,
    compute_md5: bool,
}

impl ManifestBuilder {
    #[must_use]
    pub fn new(rule: IdentifierRule, classifier: Classifier) -> Self {
        Self {
            rule,
            classifier,
            compute_md5: false,
        }
    }

    /// Create a builder from a validated config.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Config` for inconsistent settings, or errors
    /// from loading the molecule-type table.
    pub fn from_config(config: &BuildConfig) -> Result<Self, ManifestError> {
        config.validate()?;
        Ok(Self::new(config.identifier.clone(), config.classifier()?).compute_md5(config.md5))
    }

    #[must_use]
    pub fn compute_md5(mut self, compute: bool) -> Self {
        self.compute_md5 = compute;
        self
    }

    pub fn rule(&self) -> &IdentifierRule {
        &self.rule
    }

    /// Describe one source file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` if the path does not exist, is
    /// not a readable regular file, has an unrecognized extension, or the
    /// identifier rule cannot be applied.
    pub fn source_file(&self, path: &Path) -> Result<SourceFile, ManifestError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            ManifestError::invalid_input(path, format!("does not exist or is unreadable: {e}"))
        })?;
        if !metadata.is_file() {
            return Err(ManifestError::invalid_input(path, "not a regular file"));
        }
        if !is_sequence_file(path) {
            return Err(ManifestError::invalid_input(
                path,
                "unrecognized extension (expected .fa, .fasta, .fna or .faa, optionally gzipped)",
            ));
        }
        File::open(path)
            .map_err(|e| ManifestError::invalid_input(path, format!("unreadable: {e}")))?;

        let definition = if self.rule.needs_header() {
            Some(read_first_definition(path)?)
        } else {
            None
        };
        let derived = self.rule.derive(path, definition.as_deref())?;
        let moltype = self.classifier.classify(path, &derived.ident)?;

        let mut source = SourceFile::new(path, derived.ident, derived.name, moltype);
        if self.compute_md5 {
            source = source.with_md5(file_md5(path)?);
        }

        debug!(
            "{} -> ident '{}' ({})",
            path.display(),
            source.ident,
            source.moltype
        );
        Ok(source)
    }

    /// Build a manifest from explicit paths, in order.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` for unusable sources, or
    /// `ManifestError::Conflict` for duplicate identifiers.
    pub fn build<I, P>(&self, paths: I) -> Result<Manifest, ManifestError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut manifest = Manifest::new();
        for path in paths {
            self.add(&mut manifest, path.as_ref())?;
        }
        Ok(manifest)
    }

    /// Build a manifest from an enumerated source set.
    ///
    /// # Errors
    ///
    /// As for [`build`](Self::build), plus enumeration errors.
    pub fn build_from(&self, sources: &SourceSet) -> Result<Manifest, ManifestError> {
        let mut manifest = Manifest::new();
        for path in sources.iter() {
            self.add(&mut manifest, &path?)?;
        }
        Ok(manifest)
    }

    fn add(&self, manifest: &mut Manifest, path: &Path) -> Result<(), ManifestError> {
        info!("processing '{}'", path.display());
        let source = self.source_file(path)?;
        manifest.add_source(&source)
    }
}

/// Build a manifest from `sources` with the given rules.
///
/// # Errors
///
/// See [`ManifestBuilder::build`].
pub fn build<I, P>(
    sources: I,
    identifier_rule: IdentifierRule,
    classifier: Classifier,
) -> Result<Manifest, ManifestError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    ManifestBuilder::new(identifier_rule, classifier).build(sources)
}
