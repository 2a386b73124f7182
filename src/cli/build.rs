use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{IdentArgs, OutputFormat};
use crate::core::manifest::Manifest;
use crate::core::types::{ManifestLayout, MoleculeType};
use crate::fromfile::builder::{BuildConfig, ManifestBuilder};
use crate::fromfile::sources::SourceSet;
use crate::fromfile::writer::write_manifest_file;

#[derive(Args)]
pub struct BuildArgs {
    /// Sequence files or directories (.fa, .fasta, .fna, .faa, optionally .gz)
    pub paths: Vec<PathBuf>,

    /// Output manifest CSV
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// File listing one source path per line
    #[arg(long)]
    pub from_list: Option<PathBuf>,

    /// JSON build config; command-line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub ident: IdentArgs,

    /// CSV mapping path, file name or identifier to a molecule type
    #[arg(long)]
    pub moltype_table: Option<PathBuf>,

    /// Molecule type for .fa/.fasta files
    #[arg(long, value_enum)]
    pub default_moltype: Option<MoleculeType>,

    /// Output layout
    #[arg(long, value_enum)]
    pub layout: Option<ManifestLayout>,

    /// Compute MD5 checksums (files layout only)
    #[arg(long)]
    pub md5: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct BuildSummary<'a> {
    output: &'a PathBuf,
    layout: ManifestLayout,
    entries: usize,
    files: usize,
    genomes: usize,
    proteomes: usize,
}

impl<'a> BuildSummary<'a> {
    fn new(output: &'a PathBuf, layout: ManifestLayout, manifest: &Manifest) -> Self {
        let count = |moltype| {
            manifest
                .rows()
                .iter()
                .filter(|row| row.file(moltype).is_some())
                .count()
        };
        Self {
            output,
            layout,
            entries: manifest.len(),
            files: manifest.file_count(),
            genomes: count(MoleculeType::Dna),
            proteomes: count(MoleculeType::Protein),
        }
    }
}

/// Execute build subcommand
///
/// # Errors
///
/// Returns an error if the config is invalid, a source is unusable,
/// identifiers conflict, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: BuildArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    config.validate()?;

    let mut sources = SourceSet::new(args.paths.iter());
    if let Some(list) = &args.from_list {
        let added = sources.add_list_file(list)?;
        if verbose {
            eprintln!("Read {added} paths from '{}'", list.display());
        }
    }
    if sources.is_empty() {
        anyhow::bail!("No input paths given (pass paths or --from-list)");
    }

    let builder = ManifestBuilder::from_config(&config)?;
    let manifest = builder.build_from(&sources)?;
    if manifest.is_empty() {
        eprintln!("Warning: No sequence files found; writing an empty manifest.");
    }

    write_manifest_file(&manifest, config.layout, &args.output, args.force)?;

    let summary = BuildSummary::new(&args.output, config.layout, &manifest);
    match format {
        OutputFormat::Text => {
            println!(
                "wrote {} entries to '{}'",
                summary.entries,
                summary.output.display()
            );
            if verbose {
                println!(
                    "  {} genome file(s), {} protein file(s), {} layout",
                    summary.genomes,
                    summary.proteomes,
                    layout_name(summary.layout)
                );
            }
        }
        OutputFormat::Json => super::print_json(&summary)?,
        OutputFormat::Tsv => {
            println!("output\tlayout\tentries\tfiles\tgenomes\tproteomes");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                summary.output.display(),
                layout_name(summary.layout),
                summary.entries,
                summary.files,
                summary.genomes,
                summary.proteomes
            );
        }
    }

    Ok(())
}

/// Config file values, overridden by any flag given on the command line
fn resolve_config(args: &BuildArgs) -> anyhow::Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };

    config.identifier = args.ident.resolve(config.identifier)?;
    if let Some(moltype) = args.default_moltype {
        config.default_moltype = Some(moltype);
    }
    if let Some(table) = &args.moltype_table {
        config.moltype_table = Some(table.clone());
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    config.md5 |= args.md5;

    Ok(config)
}

fn layout_name(layout: ManifestLayout) -> &'static str {
    match layout {
        ManifestLayout::Fromfile => "fromfile",
        ManifestLayout::Files => "files",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::identifier::IdentifierRule;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: BuildArgs,
    }

    fn parse(argv: &[&str]) -> BuildArgs {
        TestCli::parse_from(std::iter::once("build").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("build.json");
        std::fs::write(
            &config_path,
            r#"{"identifier": {"rule": "prefix", "delimiter": ".", "fields": 1}, "layout": "files"}"#,
        )
        .unwrap();

        let args = parse(&[
            "a.fa",
            "-o",
            "out.csv",
            "--config",
            config_path.to_str().unwrap(),
            "--fields",
            "2",
            "--md5",
        ]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.layout, ManifestLayout::Files);
        assert!(config.md5);
        match config.identifier {
            IdentifierRule::Prefix { delimiter, fields } => {
                assert_eq!(delimiter, ".");
                assert_eq!(fields, 2);
            }
            other => panic!("unexpected rule {other:?}"),
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let args = parse(&["a.fa", "-o", "out.csv"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.layout, ManifestLayout::Fromfile);
        assert!(!config.md5);
        assert!(matches!(config.identifier, IdentifierRule::StripExtension));
    }
}
