//! FASTA file recognition and first-record lookup using noodles.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna`, `.faa` (uncompressed)
//! - the same with `.gz` or `.bgz` appended (gzip/bgzip compressed)

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::core::manifest::ManifestError;

/// Sequence extensions recognized when enumerating sources
pub const SEQUENCE_EXTENSIONS: [&str; 4] = ["fasta", "fna", "faa", "fa"];

/// Compression suffixes that may follow a sequence extension
pub const COMPRESSION_EXTENSIONS: [&str; 2] = ["gz", "bgz"];

/// Split a file name into its stem and its sequence suffix.
///
/// The suffix includes the leading dot and any compression extension, e.g.
/// `GCF_1.fna.gz` becomes `("GCF_1", ".fna.gz")`. Matching ignores case.
#[must_use]
pub fn split_sequence_suffix(file_name: &str) -> Option<(&str, &str)> {
    let lower = file_name.to_ascii_lowercase();

    let mut body = lower.as_str();
    for comp in COMPRESSION_EXTENSIONS {
        if let Some(rest) = body.strip_suffix(comp).and_then(|r| r.strip_suffix('.')) {
            body = rest;
            break;
        }
    }

    for ext in SEQUENCE_EXTENSIONS {
        if let Some(stem) = body.strip_suffix(ext).and_then(|r| r.strip_suffix('.')) {
            let cut = stem.len();
            return Some((file_name.get(..cut)?, file_name.get(cut..)?));
        }
    }
    None
}

/// Sequence extension of a path without compression, lowercased (e.g. `fna`)
#[must_use]
pub fn sequence_extension(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let (_, suffix) = split_sequence_suffix(file_name)?;
    let suffix = suffix.to_lowercase();
    let ext = suffix.trim_start_matches('.').split('.').next()?;
    Some(ext.to_string())
}

/// Check if the path has a recognized FASTA extension
#[must_use]
pub fn is_sequence_file(path: &Path) -> bool {
    sequence_extension(path).is_some()
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read the definition line of the first record (name plus description,
/// without the leading `>`).
///
/// # Errors
///
/// Returns `ManifestError::Io` if the file cannot be opened, or
/// `ManifestError::InvalidInput` if it cannot be parsed or holds no records.
pub fn read_first_definition(path: &Path) -> Result<String, ManifestError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(MultiGzDecoder::new(file));
        first_definition(path, &mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        first_definition(path, &mut fasta::io::Reader::new(reader))
    }
}

fn first_definition<R: BufRead>(
    path: &Path,
    reader: &mut fasta::io::Reader<R>,
) -> Result<String, ManifestError> {
    let record = reader
        .records()
        .next()
        .ok_or_else(|| ManifestError::invalid_input(path, "no sequences found in FASTA file"))?
        .map_err(|e| {
            ManifestError::invalid_input(path, format!("failed to parse FASTA record: {e}"))
        })?;

    let name = String::from_utf8_lossy(record.name()).to_string();
    let definition = match record.description() {
        Some(description) if !description.is_empty() => {
            format!("{name} {}", String::from_utf8_lossy(description))
        }
        _ => name,
    };
    Ok(definition)
}

/// Compute the MD5 of a file's bytes as stored on disk.
///
/// # Errors
///
/// Returns `ManifestError::Io` if the file cannot be read.
pub fn file_md5(path: &Path) -> Result<String, ManifestError> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        context.consume(&buf[..n]);
    }
    Ok(format!("{:x}", context.compute()))
}
