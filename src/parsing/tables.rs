//! Small auxiliary tables: path lists, molecule-type lookups, rename mappings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::manifest::ManifestError;
use crate::core::types::{Ident, MoleculeType};

/// Parse a path list: one path per line, blank lines and `#` comments skipped.
///
/// Relative paths are kept as written.
///
/// # Errors
///
/// Returns `ManifestError::Io` if the file cannot be read.
pub fn read_path_list(path: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_path_list(&content))
}

#[must_use]
pub fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

/// Read a two-column CSV with a header row into ordered string pairs.
fn read_pairs(path: &Path) -> Result<Vec<(String, String, usize)>, ManifestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut pairs = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Line numbers in errors are 1-based and count the header
        let line_num = record.position().map_or(i + 2, |p| p.line() as usize);
        let (Some(key), Some(value)) = (record.get(0), record.get(1)) else {
            return Err(ManifestError::invalid_input(
                path,
                format!("line {line_num} has fewer than 2 fields"),
            ));
        };
        pairs.push((key.to_string(), value.to_string(), line_num));
    }
    Ok(pairs)
}

/// Load a molecule-type lookup table (`key,moltype`).
///
/// Keys are matched against a source's path, file name, or identifier.
///
/// # Errors
///
/// Returns `ManifestError::InvalidInput` for unknown molecule types or keys
/// listed twice with different types.
pub fn read_moltype_table(path: &Path) -> Result<HashMap<String, MoleculeType>, ManifestError> {
    let mut table = HashMap::new();
    for (key, value, line_num) in read_pairs(path)? {
        let moltype: MoleculeType = value
            .parse()
            .map_err(|e: String| ManifestError::invalid_input(path, format!("line {line_num}: {e}")))?;
        if let Some(previous) = table.insert(key.clone(), moltype) {
            if previous != moltype {
                return Err(ManifestError::invalid_input(
                    path,
                    format!("line {line_num}: '{key}' listed as both {previous} and {moltype}"),
                ));
            }
        }
    }
    Ok(table)
}

/// Load a rename mapping (`old,new`), preserving file order.
///
/// # Errors
///
/// Returns `ManifestError::InvalidInput` for empty identifiers, or
/// `ManifestError::Conflict` if one old identifier maps to two new ones.
pub fn read_rename_mapping(path: &Path) -> Result<Vec<(Ident, Ident)>, ManifestError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut mapping = Vec::new();
    for (old, new, line_num) in read_pairs(path)? {
        if old.is_empty() || new.is_empty() {
            return Err(ManifestError::invalid_input(
                path,
                format!("line {line_num} has an empty identifier"),
            ));
        }
        match seen.get(&old) {
            Some(existing) if existing != &new => {
                return Err(ManifestError::conflict(
                    &Ident::new(old),
                    "mapping targets",
                    existing.clone(),
                    new,
                ));
            }
            Some(_) => continue,
            None => {
                seen.insert(old.clone(), new.clone());
                mapping.push((Ident::new(old), Ident::new(new)));
            }
        }
    }
    Ok(mapping)
}
