use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier that keys a row of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(pub String);

impl Ident {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Molecule type of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum MoleculeType {
    /// Nucleotide sequence (genome)
    #[serde(rename = "DNA")]
    #[value(alias = "genome")]
    Dna,
    /// Amino acid sequence (proteome)
    #[serde(rename = "protein")]
    #[value(alias = "proteome")]
    Protein,
}

impl MoleculeType {
    /// Label used in the `moltype` column
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dna => "DNA",
            Self::Protein => "protein",
        }
    }
}

impl std::fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MoleculeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dna" | "genome" | "genomic" | "nucleotide" => Ok(Self::Dna),
            "protein" | "proteome" | "aa" => Ok(Self::Protein),
            other => Err(format!("Unknown molecule type: '{other}'")),
        }
    }
}

/// Column layout of a manifest on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ManifestLayout {
    /// One row per identifier: `ident,name,genome_filename,protein_filename`
    #[default]
    Fromfile,
    /// One row per file: `ident,name,filepath,md5,moltype`
    Files,
}

impl ManifestLayout {
    pub const FROMFILE_HEADER: [&'static str; 4] =
        ["ident", "name", "genome_filename", "protein_filename"];
    pub const FILES_HEADER: [&'static str; 5] = ["ident", "name", "filepath", "md5", "moltype"];

    #[must_use]
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Self::Fromfile => &Self::FROMFILE_HEADER,
            Self::Files => &Self::FILES_HEADER,
        }
    }
}
