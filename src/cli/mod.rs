//! Command-line interface for kiln.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **build**: Build a manifest from genome and proteome files
//! - **extract**: Merge existing manifests into one
//! - **rename**: Rename files by replacing their identifiers
//! - **plan**: List sketches that still need to be computed
//!
//! ## Usage
//!
//! ```text
//! # Build from two directories, identifier = first two '_' fields
//! kiln build genomes/ proteomes/ --ident-rule prefix -o fromfile.csv
//!
//! # Files layout with checksums
//! kiln build genomes/ --layout files --md5 -o files.csv
//!
//! # Merge manifests
//! kiln extract a.csv b.csv -o merged.csv
//!
//! # Preview renames
//! kiln rename genomes/*.fna --mapping names.csv --dry-run
//!
//! # Plan sketches, JSON summary
//! kiln plan fromfile.csv -p dna,k=21,k=31 -p protein -o jobs.csv --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::manifest::ManifestError;
use crate::rules::identifier::IdentifierRule;

pub mod build;
pub mod extract;
pub mod plan;
pub mod rename;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Build and maintain fromfile manifests for sketch databases")]
#[command(
    long_about = "kiln builds the CSV manifests that map identifiers to genome and proteome files.\n\nIt derives identifiers from file names or FASTA headers and:\n- Merges a genome and a proteome with the same identifier into one row\n- Refuses to write a manifest with conflicting identifiers\n- Writes output atomically, never leaving a partial file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a manifest from sequence files and directories
    Build(build::BuildArgs),

    /// Merge existing manifests into one
    Extract(extract::ExtractArgs),

    /// Rename files by replacing their identifiers
    Rename(rename::RenameArgs),

    /// Plan the sketches still missing from a database
    Plan(plan::PlanArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum IdentRuleKind {
    /// File name minus its sequence extension
    StripExtension,
    /// First N delimiter-separated fields of the file name
    Prefix,
    /// Capture group of a regular expression
    Regex,
    /// First token of the first FASTA record
    Header,
}

/// Identifier rule flags shared by `build` and `rename`
#[derive(clap::Args, Clone, Debug, Default)]
pub struct IdentArgs {
    /// How to derive identifiers
    #[arg(long, value_enum)]
    pub ident_rule: Option<IdentRuleKind>,

    /// Delimiter for the prefix rule
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Number of fields kept by the prefix rule
    #[arg(long)]
    pub fields: Option<usize>,

    /// Pattern for the regex rule (uses group 'ident', else group 1, else the match)
    #[arg(long)]
    pub pattern: Option<String>,
}

impl IdentArgs {
    /// Resolve the flags into a rule, falling back to `base` when no rule is named.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Config` for a missing or invalid pattern, or
    /// rule options given without the rule they belong to.
    pub fn resolve(&self, base: IdentifierRule) -> Result<IdentifierRule, ManifestError> {
        let kind = match self.ident_rule {
            Some(kind) => kind,
            None if self.delimiter.is_some() || self.fields.is_some() => IdentRuleKind::Prefix,
            None if self.pattern.is_some() => IdentRuleKind::Regex,
            None => return Ok(base),
        };

        if kind != IdentRuleKind::Prefix && (self.delimiter.is_some() || self.fields.is_some()) {
            return Err(ManifestError::Config(
                "--delimiter and --fields only apply to the prefix rule".to_string(),
            ));
        }
        if kind != IdentRuleKind::Regex && self.pattern.is_some() {
            return Err(ManifestError::Config(
                "--pattern only applies to the regex rule".to_string(),
            ));
        }

        let rule = match kind {
            IdentRuleKind::StripExtension => IdentifierRule::StripExtension,
            IdentRuleKind::Prefix => {
                // Keep config-file values for options not given on the command line
                let (base_delimiter, base_fields) = match base {
                    IdentifierRule::Prefix { delimiter, fields } => (delimiter, fields),
                    _ => ("_".to_string(), 2),
                };
                IdentifierRule::prefix(
                    self.delimiter.clone().unwrap_or(base_delimiter),
                    self.fields.unwrap_or(base_fields),
                )
            }
            IdentRuleKind::Regex => match (&self.pattern, base) {
                (Some(pattern), _) => IdentifierRule::regex(pattern)?,
                (None, rule @ IdentifierRule::Regex { .. }) => rule,
                (None, _) => {
                    return Err(ManifestError::Config(
                        "the regex rule needs --pattern".to_string(),
                    ))
                }
            },
            IdentRuleKind::Header => IdentifierRule::Header,
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Paths are shown as given
pub(crate) fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
