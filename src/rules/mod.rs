//! Naming and classification rules applied to source files.

pub mod classify;
pub mod identifier;
