use std::collections::HashMap;
use std::path::Path;

use crate::core::manifest::ManifestError;
use crate::plan::params::{SketchMoltype, SketchParams};

/// A sketch listed in an existing sourmash manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingSketch {
    pub name: String,
    pub params: SketchParams,
}

const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "moltype",
    "ksize",
    "num",
    "scaled",
    "with_abundance",
];

/// Parse a sourmash manifest CSV.
///
/// The leading `# SOURMASH-MANIFEST-VERSION` line and any other `#` comments
/// are skipped. Rows without a name are ignored.
///
/// # Errors
///
/// Returns `ManifestError::InvalidInput` if required columns are missing or
/// values are malformed.
pub fn read_sourmash_manifest(path: &Path) -> Result<Vec<ExistingSketch>, ManifestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .from_path(path)?;

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();
    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(ManifestError::invalid_input(
                path,
                format!("not a sourmash manifest: missing column '{required}'"),
            ));
        }
    }
    let get = |record: &csv::StringRecord, column: &str| -> String {
        columns
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let mut sketches = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line_num = record.position().map_or(i + 2, |p| p.line() as usize);
        let invalid = |what: &str, value: &str| {
            ManifestError::invalid_input(path, format!("line {line_num}: invalid {what} '{value}'"))
        };

        let name = get(&record, "name");
        if name.is_empty() {
            continue;
        }

        let moltype_str = get(&record, "moltype");
        let moltype: SketchMoltype = moltype_str
            .parse()
            .map_err(|_| invalid("moltype", &moltype_str))?;
        let number = |column: &str| -> Result<u32, ManifestError> {
            let value = get(&record, column);
            value.parse().map_err(|_| invalid(column, &value))
        };
        let abund = get(&record, "with_abundance");
        let track_abundance = match abund.to_lowercase().as_str() {
            "1" | "true" => true,
            "0" | "false" | "" => false,
            _ => return Err(invalid("with_abundance", &abund)),
        };

        sketches.push(ExistingSketch {
            name,
            params: SketchParams {
                moltype,
                ksize: number("ksize")?,
                scaled: number("scaled")?,
                num: number("num")?,
                track_abundance,
            },
        });
    }

    Ok(sketches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_sourmash_manifest() {
        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        temp.write_all(
            b"# SOURMASH-MANIFEST-VERSION: 1.0\n\
internal_location,md5,md5short,ksize,moltype,num,scaled,n_hashes,with_abundance,name,filename\n\
a.sig,abc,abc,31,DNA,0,1000,50,0,GCF_1 E. coli,GCF_1.fna\n\
a.sig,def,def,10,protein,0,200,20,1,GCF_1 E. coli,GCF_1.faa\n\
a.sig,ghi,ghi,31,DNA,0,1000,50,False,,x.fna\n",
        )
        .unwrap();
        temp.flush().unwrap();

        let sketches = read_sourmash_manifest(temp.path()).unwrap();
        assert_eq!(sketches.len(), 2);
        assert_eq!(sketches[0].name, "GCF_1 E. coli");
        assert_eq!(sketches[0].params.moltype, SketchMoltype::Dna);
        assert_eq!(sketches[1].params.ksize, 10);
        assert!(sketches[1].params.track_abundance);
    }

    #[test]
    fn test_missing_columns() {
        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        temp.write_all(b"name,genome_filename\na,a.fna\n").unwrap();
        temp.flush().unwrap();
        assert!(read_sourmash_manifest(temp.path()).is_err());
    }
}
