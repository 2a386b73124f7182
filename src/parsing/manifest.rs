//! Reader for manifests written by this tool or by hand.
//!
//! The layout is detected from the header row:
//!
//! | Layout     | Required columns                                  | Optional |
//! |------------|---------------------------------------------------|----------|
//! | `fromfile` | `name`, `genome_filename`, `protein_filename`     | `ident`  |
//! | `files`    | `ident`, `filepath`, `moltype`                    | `name`, `md5` |
//!
//! A plain sourmash fromfile has no `ident` column; the identifier is then the
//! first whitespace-delimited token of `name`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::manifest::{ManifestError, ManifestRow};
use crate::core::source::{FileEntry, SourceFile};
use crate::core::types::{Ident, ManifestLayout, MoleculeType};
use crate::utils::validation::normalize_md5;

/// Rows read from one manifest file, in file order
#[derive(Debug, Clone)]
pub struct ParsedManifest {
    pub layout: ManifestLayout,
    pub rows: Vec<ManifestRow>,
}

/// Column positions by lowercased header name
struct Columns(HashMap<String, usize>);

impl Columns {
    fn new(headers: &csv::StringRecord) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().to_lowercase(), i))
                .collect(),
        )
    }

    fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Trimmed cell value, `None` when the column is absent or the cell empty
    fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        let i = *self.0.get(name)?;
        record.get(i).map(str::trim).filter(|s| !s.is_empty())
    }

    fn layout(&self) -> Option<ManifestLayout> {
        if self.has("genome_filename") && self.has("protein_filename") && self.has("name") {
            Some(ManifestLayout::Fromfile)
        } else if self.has("ident") && self.has("filepath") && self.has("moltype") {
            Some(ManifestLayout::Files)
        } else {
            None
        }
    }
}

/// Read a manifest file of either layout.
///
/// # Errors
///
/// Returns `ManifestError::Csv` on malformed CSV, or
/// `ManifestError::InvalidInput` if the header matches no known layout or a
/// row is missing required values.
pub fn read_manifest(path: &Path) -> Result<ParsedManifest, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::invalid_input(path, "manifest not found"));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let columns = Columns::new(reader.headers()?);
    let layout = columns.layout().ok_or_else(|| {
        ManifestError::invalid_input(
            path,
            "header matches neither the fromfile nor the files layout",
        )
    })?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Line numbers in errors are 1-based and count the header
        let line_num = record.position().map_or(i + 2, |p| p.line() as usize);
        let row = match layout {
            ManifestLayout::Fromfile => fromfile_row(path, &columns, &record, line_num)?,
            ManifestLayout::Files => files_row(path, &columns, &record, line_num)?,
        };
        rows.push(row);
    }

    Ok(ParsedManifest { layout, rows })
}

fn fromfile_row(
    path: &Path,
    columns: &Columns,
    record: &csv::StringRecord,
    line_num: usize,
) -> Result<ManifestRow, ManifestError> {
    let name = columns
        .get(record, "name")
        .ok_or_else(|| ManifestError::invalid_input(path, format!("line {line_num}: empty name")))?;
    let ident = match columns.get(record, "ident") {
        Some(ident) => ident,
        None => name.split_whitespace().next().unwrap_or(name),
    };

    let row = ManifestRow {
        ident: Ident::new(ident),
        name: name.to_string(),
        genome: columns
            .get(record, "genome_filename")
            .map(|p| FileEntry::new(PathBuf::from(p), None)),
        protein: columns
            .get(record, "protein_filename")
            .map(|p| FileEntry::new(PathBuf::from(p), None)),
    };
    if row.is_empty() {
        return Err(ManifestError::invalid_input(
            path,
            format!("line {line_num}: neither genome_filename nor protein_filename is set"),
        ));
    }
    Ok(row)
}

fn files_row(
    path: &Path,
    columns: &Columns,
    record: &csv::StringRecord,
    line_num: usize,
) -> Result<ManifestRow, ManifestError> {
    let missing =
        |column: &str| ManifestError::invalid_input(path, format!("line {line_num}: empty {column}"));

    let ident = columns.get(record, "ident").ok_or_else(|| missing("ident"))?;
    let filepath = columns.get(record, "filepath").ok_or_else(|| missing("filepath"))?;
    let moltype: MoleculeType = columns
        .get(record, "moltype")
        .ok_or_else(|| missing("moltype"))?
        .parse()
        .map_err(|e: String| ManifestError::invalid_input(path, format!("line {line_num}: {e}")))?;
    let name = columns.get(record, "name").unwrap_or(ident);

    let mut source = SourceFile::new(filepath, Ident::new(ident), name, moltype);
    if let Some(md5) = columns.get(record, "md5") {
        let md5 = normalize_md5(md5).ok_or_else(|| {
            ManifestError::invalid_input(path, format!("line {line_num}: invalid md5 '{md5}'"))
        })?;
        source = source.with_md5(md5);
    }
    Ok(ManifestRow::from_source(&source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        temp.write_all(content.as_bytes()).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_read_fromfile_layout() {
        let temp = csv_file(
            "ident,name,genome_filename,protein_filename\n\
             GCF_1,GCF_1,GCF_1_genomic.fna,GCF_1_protein.faa\n\
             GCF_2,GCF_2,GCF_2_genomic.fna,\n",
        );
        let parsed = read_manifest(temp.path()).unwrap();
        assert_eq!(parsed.layout, ManifestLayout::Fromfile);
        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.rows[0].protein.is_some());
        assert!(parsed.rows[1].protein.is_none());
    }

    #[test]
    fn test_read_sourmash_fromfile_without_ident() {
        let temp = csv_file(
            "name,genome_filename,protein_filename\n\
             NC_000913.3 Escherichia coli,ecoli.fna,\n",
        );
        let parsed = read_manifest(temp.path()).unwrap();
        assert_eq!(parsed.rows[0].ident, Ident::new("NC_000913.3"));
        assert_eq!(parsed.rows[0].name, "NC_000913.3 Escherichia coli");
    }

    #[test]
    fn test_read_files_layout() {
        let temp = csv_file(
            "ident,name,filepath,md5,moltype\n\
             a,a,a.fna,F1F8F4BF413B16AD135722AA4591043E,DNA\n\
             a,a,a.faa,,protein\n",
        );
        let parsed = read_manifest(temp.path()).unwrap();
        assert_eq!(parsed.layout, ManifestLayout::Files);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(
            parsed.rows[0].genome.as_ref().unwrap().md5.as_deref(),
            Some("f1f8f4bf413b16ad135722aa4591043e")
        );
        assert!(parsed.rows[1].protein.is_some());
    }

    #[test]
    fn test_row_without_files_is_rejected() {
        let temp = csv_file("ident,name,genome_filename,protein_filename\na,a,,\n");
        let err = read_manifest(temp.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_unknown_header_is_rejected() {
        let temp = csv_file("foo,bar\n1,2\n");
        assert!(matches!(
            read_manifest(temp.path()),
            Err(ManifestError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_bad_moltype_is_rejected() {
        let temp = csv_file("ident,name,filepath,md5,moltype\na,a,a.fa,,rna\n");
        assert!(read_manifest(temp.path()).is_err());
    }
}
