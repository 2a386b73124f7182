//! Readers for the files kiln consumes.
//!
//! - **FASTA** ([`fasta`]): sequence extensions, first definition line, MD5
//! - **Manifests** ([`manifest`]): existing fromfile or files-layout CSVs
//! - **Sourmash manifests** ([`sourmash`]): sketches that already exist
//! - **Tables** ([`tables`]): path lists, molecule-type lookups, rename mappings
//!
//! Compressed FASTA (`.gz`, `.bgz`) is read through a multi-member gzip
//! decoder, so BGZF files work too.
//!
//! | Extension | Molecule type |
//! |-----------|---------------|
//! | `.fna`    | DNA           |
//! | `.faa`    | protein       |
//! | `.fa`, `.fasta` | configured default |

pub mod fasta;
pub mod manifest;
pub mod sourmash;
pub mod tables;
