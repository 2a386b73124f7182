//! Fromfile manifest construction, merging, and output.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kiln::fromfile::builder::ManifestBuilder;
//! use kiln::fromfile::sources::SourceSet;
//! use kiln::fromfile::writer::write_manifest_file;
//! use kiln::rules::classify::Classifier;
//! use kiln::rules::identifier::IdentifierRule;
//! use kiln::ManifestLayout;
//! use std::path::Path;
//!
//! let sources = SourceSet::new(["genomes/", "proteomes/"]);
//! let builder = ManifestBuilder::new(IdentifierRule::prefix("_", 2), Classifier::new());
//! let manifest = builder.build_from(&sources).unwrap();
//! write_manifest_file(&manifest, ManifestLayout::Fromfile, Path::new("fromfile.csv"), false)
//!     .unwrap();
//! ```

pub mod builder;
pub mod extract;
pub mod sources;
pub mod writer;
