//! Core data types.
//!
//! - [`Ident`]: the key shared by every file of one genome
//! - [`SourceFile`]: one input with its derived identifier, name and role
//! - [`Manifest`], [`ManifestRow`]: identifier-keyed rows in first-seen order
//! - [`ManifestLayout`]: the two supported CSV layouts
//!
//! A row holds at most one genome and one protein file. Adding a second file
//! for an occupied slot is a [`ManifestError::Conflict`] unless it is the same
//! path.
//!
//! [`Ident`]: types::Ident
//! [`SourceFile`]: source::SourceFile
//! [`Manifest`]: manifest::Manifest
//! [`ManifestRow`]: manifest::ManifestRow
//! [`ManifestLayout`]: types::ManifestLayout
//! [`ManifestError::Conflict`]: manifest::ManifestError::Conflict

pub mod manifest;
pub mod source;
pub mod types;
