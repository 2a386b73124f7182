//! Sketch parameter strings.
//!
//! A parameter string names one molecule type plus optional settings, e.g.
//! `dna,k=21,k=31,scaled=1000,abund`. Each k-size produces its own
//! [`SketchParams`]. Defaults follow the sketching tool:
//!
//! | moltype   | k  | scaled |
//! |-----------|----|--------|
//! | `dna`     | 31 | 1000   |
//! | `protein` | 10 | 200    |
//! | `dayhoff` | 16 | 200    |
//! | `hp`      | 42 | 200    |

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::core::types::MoleculeType;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SketchParamError {
    #[error("Empty parameter string")]
    Empty,

    #[error("No molecule type in '{0}' (expected dna, protein, dayhoff or hp)")]
    MissingMoltype(String),

    #[error("More than one molecule type in '{0}'")]
    MultipleMoltypes(String),

    #[error("Unknown item '{item}' in '{param}'")]
    UnknownItem { item: String, param: String },

    #[error("Invalid value for '{key}': '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Cannot set both num and scaled in '{0}'")]
    NumAndScaled(String),

    #[error("'{0}' is not tracked by sketch manifests and cannot be planned")]
    Untracked(String),
}

/// Molecule type of a sketch (not of the input file)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchMoltype {
    #[serde(rename = "DNA")]
    Dna,
    Protein,
    Dayhoff,
    Hp,
}

impl SketchMoltype {
    /// Which input file the sketch is computed from
    #[must_use]
    pub fn input(self) -> MoleculeType {
        match self {
            Self::Dna => MoleculeType::Dna,
            Self::Protein | Self::Dayhoff | Self::Hp => MoleculeType::Protein,
        }
    }

    fn default_ksize(self) -> u32 {
        match self {
            Self::Dna => 31,
            Self::Protein => 10,
            Self::Dayhoff => 16,
            Self::Hp => 42,
        }
    }

    fn default_scaled(self) -> u32 {
        match self {
            Self::Dna => 1000,
            _ => 200,
        }
    }
}

impl std::fmt::Display for SketchMoltype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dna => write!(f, "DNA"),
            Self::Protein => write!(f, "protein"),
            Self::Dayhoff => write!(f, "dayhoff"),
            Self::Hp => write!(f, "hp"),
        }
    }
}

impl FromStr for SketchMoltype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dna" | "nucleotide" | "rna" => Ok(Self::Dna),
            "protein" => Ok(Self::Protein),
            "dayhoff" => Ok(Self::Dayhoff),
            "hp" => Ok(Self::Hp),
            other => Err(format!("Unknown sketch molecule type: '{other}'")),
        }
    }
}

/// Settings of a single sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SketchParams {
    pub moltype: SketchMoltype,
    pub ksize: u32,
    pub scaled: u32,
    pub num: u32,
    pub track_abundance: bool,
}

impl SketchParams {
    /// Parse a parameter string into one parameter set per k-size.
    ///
    /// # Errors
    ///
    /// Returns a `SketchParamError` describing the first problem found.
    pub fn parse_param_string(param: &str) -> Result<Vec<Self>, SketchParamError> {
        let items: Vec<&str> = param
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            return Err(SketchParamError::Empty);
        }

        let mut moltype: Option<SketchMoltype> = None;
        let mut ksizes: Vec<u32> = Vec::new();
        let mut scaled: Option<u32> = None;
        let mut num: Option<u32> = None;
        let mut track_abundance = false;

        for item in items {
            if let Some((key, value)) = item.split_once('=') {
                let parsed = || {
                    value.trim().parse::<u32>().map_err(|_| SketchParamError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                };
                match key.trim() {
                    "k" => {
                        let k = parsed()?;
                        if k == 0 {
                            return Err(SketchParamError::InvalidValue {
                                key: "k".to_string(),
                                value: value.to_string(),
                            });
                        }
                        if !ksizes.contains(&k) {
                            ksizes.push(k);
                        }
                    }
                    "scaled" => scaled = Some(parsed()?),
                    "num" => num = Some(parsed()?),
                    "seed" => return Err(SketchParamError::Untracked("seed".to_string())),
                    _ => {
                        return Err(SketchParamError::UnknownItem {
                            item: item.to_string(),
                            param: param.to_string(),
                        })
                    }
                }
                continue;
            }

            match item {
                "abund" => track_abundance = true,
                "noabund" => track_abundance = false,
                _ => {
                    let parsed: SketchMoltype =
                        item.parse().map_err(|_| SketchParamError::UnknownItem {
                            item: item.to_string(),
                            param: param.to_string(),
                        })?;
                    if moltype.is_some_and(|m| m != parsed) {
                        return Err(SketchParamError::MultipleMoltypes(param.to_string()));
                    }
                    moltype = Some(parsed);
                }
            }
        }

        let moltype = moltype.ok_or_else(|| SketchParamError::MissingMoltype(param.to_string()))?;
        let (scaled, num) = match (scaled, num) {
            (Some(s), Some(n)) if s > 0 && n > 0 => {
                return Err(SketchParamError::NumAndScaled(param.to_string()))
            }
            (Some(s), Some(n)) => (s, n),
            (Some(s), None) => (s, 0),
            (None, Some(n)) if n > 0 => (0, n),
            (None, _) => (moltype.default_scaled(), 0),
        };
        if ksizes.is_empty() {
            ksizes.push(moltype.default_ksize());
        }

        Ok(ksizes
            .into_iter()
            .map(|ksize| Self {
                moltype,
                ksize,
                scaled,
                num,
                track_abundance,
            })
            .collect())
    }

    /// Parse several parameter strings, dropping repeats.
    ///
    /// # Errors
    ///
    /// Returns the first `SketchParamError` encountered.
    pub fn parse_all<S: AsRef<str>>(params: &[S]) -> Result<Vec<Self>, SketchParamError> {
        let mut all: Vec<Self> = Vec::new();
        for param in params {
            for p in Self::parse_param_string(param.as_ref())? {
                if !all.contains(&p) {
                    all.push(p);
                }
            }
        }
        Ok(all)
    }
}

impl std::fmt::Display for SketchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},k={}", self.moltype, self.ksize)?;
        if self.num > 0 {
            write!(f, ",num={}", self.num)?;
        } else {
            write!(f, ",scaled={}", self.scaled)?;
        }
        if self.track_abundance {
            write!(f, ",abund")?;
        }
        Ok(())
    }
}
