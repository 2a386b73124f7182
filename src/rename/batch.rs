use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::core::manifest::ManifestError;
use crate::core::types::Ident;
use crate::parsing::tables::read_rename_mapping;
use crate::rules::identifier::IdentifierRule;
use crate::utils::validation::check_identifier;

/// Old identifier to new identifier
#[derive(Debug, Clone, Default)]
pub struct RenameMapping {
    lookup: HashMap<Ident, Ident>,
}

impl RenameMapping {
    /// Build a mapping from pairs, collapsing exact repeats.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` if a new identifier could not be
    /// used in a file name (empty, path separators, control characters), or
    /// `ManifestError::Conflict` if one old identifier is mapped to two
    /// different new identifiers.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = (Ident, Ident)>,
    {
        let mut lookup: HashMap<Ident, Ident> = HashMap::new();
        for (old, new) in pairs {
            if let Some(reason) = check_identifier(new.as_str()) {
                return Err(ManifestError::InvalidInput {
                    path: format!("mapping for '{old}'"),
                    reason,
                });
            }
            if let Some(existing) = lookup.get(&old) {
                if existing != &new {
                    return Err(ManifestError::conflict(
                        &old,
                        "mapping targets",
                        existing.to_string(),
                        new.to_string(),
                    ));
                }
                continue;
            }
            lookup.insert(old, new);
        }
        Ok(Self { lookup })
    }

    /// Load a mapping CSV (`old,new`).
    ///
    /// # Errors
    ///
    /// See [`read_rename_mapping`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        Self::from_pairs(read_rename_mapping(path)?)
    }

    #[must_use]
    pub fn get(&self, old: &Ident) -> Option<&Ident> {
        self.lookup.get(old)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// One planned or completed rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
    pub old_ident: Ident,
    pub new_ident: Ident,
}

/// Outcome of a rename batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameReport {
    pub renamed: Vec<RenamedFile>,
    pub skipped: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Work out every rename without touching the file system.
///
/// Targets whose identifier is not a mapping key (or cannot be derived) are
/// skipped. The identifier's span in the file name is replaced with the new
/// identifier; the directory and the rest of the name are kept.
///
/// # Errors
///
/// Returns `ManifestError::Config` for the header rule,
/// `ManifestError::InvalidInput` for targets that are not files or whose new
/// name would land in another directory, or
/// `ManifestError::Conflict` if two targets share a destination or a
/// destination already exists.
pub fn plan_renames<P: AsRef<Path>>(
    mapping: &RenameMapping,
    targets: &[P],
    rule: &IdentifierRule,
) -> Result<RenameReport, ManifestError> {
    if !rule.uses_file_name() {
        return Err(ManifestError::Config(
            "renaming needs an identifier rule that reads the file name".to_string(),
        ));
    }

    let mut report = RenameReport::default();
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut destinations: HashMap<PathBuf, PathBuf> = HashMap::new();

    for target in targets {
        let target = target.as_ref();
        if !seen.insert(target) {
            continue;
        }
        if !target.is_file() {
            return Err(ManifestError::invalid_input(target, "not an existing file"));
        }

        let old_ident = match rule.derive_identifier(target) {
            Ok(ident) => ident,
            Err(e) => {
                warn!("skipping '{}': {e}", target.display());
                report.skipped.push(target.to_path_buf());
                continue;
            }
        };
        let Some(new_ident) = mapping.get(&old_ident).filter(|new| **new != old_ident) else {
            report.skipped.push(target.to_path_buf());
            continue;
        };

        let to = destination(target, rule, new_ident)?;
        if to.parent() != target.parent() {
            return Err(ManifestError::invalid_input(
                target,
                format!("new name '{}' would leave the directory", to.display()),
            ));
        }
        if let Some(other) = destinations.get(&to) {
            return Err(ManifestError::conflict(
                new_ident,
                "rename sources",
                other.display().to_string(),
                target.display().to_string(),
            ));
        }
        if to.exists() {
            return Err(ManifestError::conflict(
                new_ident,
                "rename destination",
                to.display().to_string(),
                target.display().to_string(),
            ));
        }

        destinations.insert(to.clone(), target.to_path_buf());
        report.renamed.push(RenamedFile {
            from: target.to_path_buf(),
            to,
            old_ident,
            new_ident: new_ident.clone(),
        });
    }

    Ok(report)
}

fn destination(
    target: &Path,
    rule: &IdentifierRule,
    new_ident: &Ident,
) -> Result<PathBuf, ManifestError> {
    let span = rule.ident_span(target)?;
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ManifestError::invalid_input(target, "file name is not valid UTF-8"))?;
    let new_name = format!(
        "{}{}{}",
        &file_name[..span.start],
        new_ident,
        &file_name[span.end..]
    );
    Ok(target.with_file_name(new_name))
}

/// Rename every target whose identifier appears in `mapping`.
///
/// All destinations are validated before the first rename.
///
/// # Errors
///
/// See [`plan_renames`]; also `ManifestError::Io` if a rename fails.
pub fn rename_batch<P: AsRef<Path>>(
    mapping: &RenameMapping,
    targets: &[P],
    rule: &IdentifierRule,
    dry_run: bool,
) -> Result<RenameReport, ManifestError> {
    let mut report = plan_renames(mapping, targets, rule)?;
    report.dry_run = dry_run;

    for file in &report.renamed {
        if dry_run {
            info!("would rename '{}' -> '{}'", file.from.display(), file.to.display());
        } else {
            std::fs::rename(&file.from, &file.to)?;
            info!("renamed '{}' -> '{}'", file.from.display(), file.to.display());
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> RenameMapping {
        RenameMapping::from_pairs(
            pairs
                .iter()
                .map(|(old, new)| (Ident::new(*old), Ident::new(*new))),
        )
        .unwrap()
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, ">s\nACGT\n").unwrap();
        path
    }

    #[test]
    fn test_rename_batch() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "gA.fasta");
        let b = touch(dir.path(), "gB.fa.gz");
        let c = touch(dir.path(), "gC.fna");

        let map = mapping(&[("gA", "genome_a"), ("gB", "genome_b")]);
        let report =
            rename_batch(&map, &[&a, &b, &c], &IdentifierRule::StripExtension, false).unwrap();

        assert_eq!(report.renamed.len(), 2);
        assert_eq!(report.skipped, vec![c.clone()]);
        assert!(dir.path().join("genome_a.fasta").exists());
        assert!(dir.path().join("genome_b.fa.gz").exists());
        assert!(!a.exists());
        assert!(c.exists());
    }

    #[test]
    fn test_prefix_rule_keeps_rest_of_name() {
        let dir = tempfile::tempdir().unwrap();
        let g = touch(dir.path(), "GCF_1_asm_genomic.fna");

        let map = mapping(&[("GCF_1", "ecoli")]);
        let report = plan_renames(&map, &[&g], &IdentifierRule::prefix("_", 2)).unwrap();
        assert_eq!(report.renamed[0].to, dir.path().join("ecoli_asm_genomic.fna"));
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "gA.fa");

        let map = mapping(&[("gA", "x")]);
        let report = rename_batch(&map, &[&a], &IdentifierRule::StripExtension, true).unwrap();
        assert!(report.dry_run);
        assert_eq!(report.renamed.len(), 1);
        assert!(a.exists());
        assert!(!dir.path().join("x.fa").exists());
    }

    #[test]
    fn test_collision_between_targets_fails_before_renaming() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.fa");
        let b = touch(dir.path(), "b.fa");

        let map = mapping(&[("a", "same"), ("b", "same")]);
        let err = rename_batch(&map, &[&a, &b], &IdentifierRule::StripExtension, false)
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn test_existing_destination_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.fa");
        touch(dir.path(), "taken.fa");

        let map = mapping(&[("a", "taken")]);
        let err = plan_renames(&map, &[&a], &IdentifierRule::StripExtension).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_different_extensions_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let g = touch(dir.path(), "a.fna");
        let p = touch(dir.path(), "a.faa");

        let map = mapping(&[("a", "b")]);
        let report = plan_renames(&map, &[&g, &p], &IdentifierRule::StripExtension).unwrap();
        assert_eq!(report.renamed.len(), 2);
    }

    #[test]
    fn test_header_rule_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.fa");
        let map = mapping(&[("a", "b")]);
        assert!(matches!(
            plan_renames(&map, &[&a], &IdentifierRule::Header),
            Err(ManifestError::Config(_))
        ));
    }

    #[test]
    fn test_new_identifier_cannot_leave_directory() {
        for new in ["../escaped", "sub/x", "back\\slash", ""] {
            let err = RenameMapping::from_pairs([(Ident::new("a"), Ident::new(new))]).unwrap_err();
            assert!(matches!(err, ManifestError::InvalidInput { .. }), "{new}: {err}");
        }
    }

    #[test]
    fn test_invalid_mapping_entry_renames_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.fa");
        let b = touch(dir.path(), "b.fa");

        let result = RenameMapping::from_pairs([
            (Ident::new("a"), Ident::new("ok")),
            (Ident::new("b"), Ident::new("missing_dir/x")),
        ])
        .and_then(|map| rename_batch(&map, &[&a, &b], &IdentifierRule::StripExtension, false));
        assert!(result.is_err());
        assert!(a.exists() && b.exists());
        assert!(!dir.path().join("ok.fa").exists());
    }

    #[test]
    fn test_destination_must_stay_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let genomes = dir.path().join("genomes");
        std::fs::create_dir(&genomes).unwrap();
        let a = touch(&genomes, "a.fa");

        // Bypasses mapping validation to check the per-target guard
        let mut lookup = HashMap::new();
        lookup.insert(Ident::new("a"), Ident::new("../escaped"));
        let map = RenameMapping { lookup };

        let err = rename_batch(&map, &[&a], &IdentifierRule::StripExtension, false).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidInput { .. }), "{err}");
        assert!(a.exists());
        assert!(!dir.path().join("escaped.fa").exists());
    }

    #[test]
    fn test_mapping_conflict() {
        let err = RenameMapping::from_pairs([
            (Ident::new("a"), Ident::new("x")),
            (Ident::new("a"), Ident::new("y")),
        ])
        .unwrap_err();
        assert!(err.is_conflict());
    }
}
