use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::types::ManifestLayout;
use crate::fromfile::extract::extract;
use crate::fromfile::writer::write_manifest_file;

#[derive(Args)]
pub struct ExtractArgs {
    /// Existing manifests (fromfile or files layout)
    #[arg(required = true)]
    pub manifests: Vec<PathBuf>,

    /// Output manifest CSV
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Output layout
    #[arg(long, value_enum, default_value = "fromfile")]
    pub layout: ManifestLayout,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct ExtractSummary<'a> {
    inputs: &'a [PathBuf],
    output: &'a PathBuf,
    entries: usize,
    files: usize,
}

/// Execute extract subcommand
///
/// # Errors
///
/// Returns an error if a manifest cannot be read, rows conflict, or the output
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtractArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        eprintln!(
            "Extracting from {} manifest(s): {}",
            args.manifests.len(),
            super::display_paths(&args.manifests)
        );
    }

    let manifest = extract(&args.manifests)?;
    write_manifest_file(&manifest, args.layout, &args.output, args.force)?;

    let summary = ExtractSummary {
        inputs: &args.manifests,
        output: &args.output,
        entries: manifest.len(),
        files: manifest.file_count(),
    };
    match format {
        OutputFormat::Text => println!(
            "wrote {} entries to '{}'",
            summary.entries,
            summary.output.display()
        ),
        OutputFormat::Json => super::print_json(&summary)?,
        OutputFormat::Tsv => {
            println!("output\tinputs\tentries\tfiles");
            println!(
                "{}\t{}\t{}\t{}",
                summary.output.display(),
                summary.inputs.len(),
                summary.entries,
                summary.files
            );
        }
    }

    Ok(())
}
