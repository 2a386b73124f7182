//! Identifier derivation rules.
//!
//! Different data sources name their files differently, so the rule that turns
//! a path into an identifier is configuration rather than code:
//!
//! | Rule              | `GCF_000005845.2_ASM584v2_genomic.fna.gz` |
//! |-------------------|-------------------------------------------|
//! | `strip_extension` | `GCF_000005845.2_ASM584v2_genomic`        |
//! | `prefix` (`_`, 2) | `GCF_000005845.2`                         |
//! | `regex`           | named group `ident`, else group 1         |
//! | `header`          | first token of the first FASTA record     |

use std::ops::Range;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::manifest::ManifestError;
use crate::core::types::Ident;
use crate::parsing::fasta::split_sequence_suffix;
use crate::utils::validation::check_identifier;

/// Identifier and display name derived for a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    pub ident: Ident,
    pub name: String,
}

/// How to turn a source path into an identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum IdentifierRule {
    /// File name minus its sequence extension
    #[default]
    StripExtension,

    /// First `fields` tokens of the file name split on `delimiter`
    Prefix {
        #[serde(default = "default_delimiter")]
        delimiter: String,
        #[serde(default = "default_fields")]
        fields: usize,
    },

    /// Capture from a regular expression matched against the file name
    Regex {
        #[serde(with = "regex_serde")]
        pattern: Regex,
    },

    /// First token of the first FASTA record; the full line becomes the name
    Header,
}

fn default_delimiter() -> String {
    "_".to_string()
}

fn default_fields() -> usize {
    2
}

impl IdentifierRule {
    #[must_use]
    pub fn prefix(delimiter: impl Into<String>, fields: usize) -> Self {
        Self::Prefix {
            delimiter: delimiter.into(),
            fields,
        }
    }

    /// Build a regex rule.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Config` if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, ManifestError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ManifestError::Config(format!("invalid identifier pattern: {e}")))?;
        Ok(Self::Regex { pattern })
    }

    /// Whether the rule needs the first FASTA definition line
    #[must_use]
    pub fn needs_header(&self) -> bool {
        matches!(self, Self::Header)
    }

    /// Whether the identifier is taken from the file name
    #[must_use]
    pub fn uses_file_name(&self) -> bool {
        !self.needs_header()
    }

    /// Check rule parameters.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Config` for an empty delimiter or zero fields.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if let Self::Prefix { delimiter, fields } = self {
            if delimiter.is_empty() {
                return Err(ManifestError::Config(
                    "prefix delimiter must not be empty".to_string(),
                ));
            }
            if *fields == 0 {
                return Err(ManifestError::Config(
                    "prefix field count must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Derive the identifier and name of a source.
    ///
    /// `definition` is the first FASTA definition line and is only consulted
    /// by the header rule. No I/O is performed.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` if the rule cannot be applied to
    /// the path or yields an unusable identifier.
    pub fn derive(
        &self,
        path: &Path,
        definition: Option<&str>,
    ) -> Result<DerivedName, ManifestError> {
        let derived = match self {
            Self::Header => {
                let definition = definition
                    .map(str::trim)
                    .ok_or_else(|| {
                        ManifestError::invalid_input(path, "header rule needs the first FASTA record")
                    })?;
                let ident = definition.split_whitespace().next().unwrap_or_default();
                DerivedName {
                    ident: Ident::new(ident),
                    name: definition.to_string(),
                }
            }
            _ => {
                let ident = self.ident_from_file_name(path)?;
                DerivedName {
                    name: ident.clone(),
                    ident: Ident::new(ident),
                }
            }
        };

        if let Some(reason) = check_identifier(derived.ident.as_str()) {
            return Err(ManifestError::invalid_input(path, reason));
        }
        Ok(derived)
    }

    /// Derive only the identifier from a path.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` as for [`derive`](Self::derive);
    /// the header rule always fails here.
    pub fn derive_identifier(&self, path: &Path) -> Result<Ident, ManifestError> {
        self.derive(path, None).map(|d| d.ident)
    }

    fn ident_from_file_name(&self, path: &Path) -> Result<String, ManifestError> {
        let file_name = file_name_str(path)?;
        let span = self.ident_span(path)?;
        Ok(file_name[span].to_string())
    }

    /// Byte range of the identifier within the path's file name.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidInput` if the rule does not apply to the
    /// file name; the header rule always fails here.
    pub fn ident_span(&self, path: &Path) -> Result<Range<usize>, ManifestError> {
        let file_name = file_name_str(path)?;

        match self {
            Self::StripExtension => split_sequence_suffix(file_name)
                .map(|(stem, _)| 0..stem.len())
                .ok_or_else(|| {
                    ManifestError::invalid_input(path, "unrecognized sequence extension")
                }),
            Self::Prefix { delimiter, fields } => {
                // Split the stem so the extension never ends up in the last field
                let stem = split_sequence_suffix(file_name).map_or(file_name, |(stem, _)| stem);
                let tokens: Vec<&str> = stem.split(delimiter.as_str()).collect();
                if tokens.len() < *fields {
                    return Err(ManifestError::invalid_input(
                        path,
                        format!(
                            "expected at least {fields} '{delimiter}'-separated fields in file name"
                        ),
                    ));
                }
                let len = tokens[..*fields].iter().map(|t| t.len()).sum::<usize>()
                    + delimiter.len() * fields.saturating_sub(1);
                Ok(0..len)
            }
            Self::Regex { pattern } => {
                let caps = pattern.captures(file_name).ok_or_else(|| {
                    ManifestError::invalid_input(
                        path,
                        format!("file name does not match pattern '{}'", pattern.as_str()),
                    )
                })?;
                caps.name("ident")
                    .or_else(|| caps.get(1))
                    .or_else(|| caps.get(0))
                    .map(|m| m.range())
                    .ok_or_else(|| ManifestError::invalid_input(path, "empty pattern match"))
            }
            Self::Header => Err(ManifestError::invalid_input(
                path,
                "header rule does not use the file name",
            )),
        }
    }
}

fn file_name_str(path: &Path) -> Result<&str, ManifestError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ManifestError::invalid_input(path, "file name is not valid UTF-8"))
}

mod regex_serde {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pattern: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(pattern.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Regex, D::Error> {
        let s = String::deserialize(deserializer)?;
        Regex::new(&s).map_err(serde::de::Error::custom)
    }
}
