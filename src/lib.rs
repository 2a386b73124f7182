//! # kiln
//!
//! A library for building the manifests that tell a sketching tool which
//! genome and proteome files belong together.
//!
//! A *fromfile* manifest maps an identifier to a genome file, a protein file,
//! or both. Writing one by hand for thousands of downloads is error-prone:
//! identifiers collide, extensions are inconsistent, and a typo silently drops
//! a genome from the database.
//!
//! `kiln` derives identifiers from file names (or FASTA headers), classifies
//! each file as DNA or protein, and refuses to write a manifest in which two
//! different files claim the same identifier and role.
//!
//! ## Features
//!
//! - **Identifier rules**: strip extension, delimiter prefix, regex capture, or FASTA header
//! - **Conflict detection**: duplicate identifiers are reported with both paths
//! - **Atomic output**: manifests appear complete or not at all
//! - **Extraction**: merge existing manifests of either layout
//! - **Renaming**: replace identifiers in file names from a mapping table
//! - **Sketch planning**: list the sketches not yet present in a database
//!
//! ## Example
//!
//! ```rust,no_run
//! use kiln::{ManifestBuilder, ManifestLayout, SourceSet};
//! use kiln::fromfile::writer::write_manifest_file;
//! use std::path::Path;
//!
//! let sources = SourceSet::new(["genomeA.fasta", "genomeB.fasta"]);
//! let manifest = ManifestBuilder::default().build_from(&sources).unwrap();
//!
//! for row in manifest.rows() {
//!     println!("{}: {} file(s)", row.ident, row.files().count());
//! }
//!
//! write_manifest_file(&manifest, ManifestLayout::Fromfile, Path::new("out.csv"), false).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifiers, source files and the manifest itself
//! - [`fromfile`]: Building, extracting and writing manifests
//! - [`parsing`]: Readers for FASTA, manifests and lookup tables
//! - [`plan`]: Sketch parameter parsing and planning
//! - [`rename`]: Batch renaming of files by identifier
//! - [`rules`]: Identifier derivation and molecule-type classification
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod fromfile;
pub mod parsing;
pub mod plan;
pub mod rename;
pub mod rules;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::manifest::{Manifest, ManifestError, ManifestRow};
pub use core::source::{FileEntry, SourceFile};
pub use core::types::*;
pub use fromfile::builder::{BuildConfig, ManifestBuilder};
pub use fromfile::sources::SourceSet;
pub use rename::batch::{RenameMapping, RenameReport};
pub use rules::classify::Classifier;
pub use rules::identifier::IdentifierRule;
