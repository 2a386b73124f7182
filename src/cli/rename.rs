use std::path::PathBuf;

use clap::Args;

use crate::cli::{IdentArgs, OutputFormat};
use crate::rename::batch::{rename_batch, RenameMapping};
use crate::rules::identifier::IdentifierRule;

#[derive(Args)]
pub struct RenameArgs {
    /// Files to rename
    #[arg(required = true)]
    pub targets: Vec<PathBuf>,

    /// CSV with header and columns `old,new`
    #[arg(short, long, required = true)]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub ident: IdentArgs,

    /// Report the renames without performing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute rename subcommand
///
/// # Errors
///
/// Returns an error if the mapping is invalid, renames would collide, or a
/// rename fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RenameArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let rule = args.ident.resolve(IdentifierRule::StripExtension)?;
    let mapping = RenameMapping::load(&args.mapping)?;
    if verbose {
        eprintln!(
            "Loaded {} identifier mapping(s) from '{}'",
            mapping.len(),
            args.mapping.display()
        );
    }

    let report = rename_batch(&mapping, &args.targets, &rule, args.dry_run)?;

    match format {
        OutputFormat::Text => {
            let verb = if report.dry_run { "would rename" } else { "renamed" };
            for file in &report.renamed {
                println!("{verb} '{}' -> '{}'", file.from.display(), file.to.display());
            }
            let done = if report.dry_run { "to rename" } else { "renamed" };
            println!(
                "{} file(s) {done}, {} skipped",
                report.renamed.len(),
                report.skipped.len()
            );
            if verbose && !report.skipped.is_empty() {
                println!("skipped: {}", super::display_paths(&report.skipped));
            }
        }
        OutputFormat::Json => super::print_json(&report)?,
        OutputFormat::Tsv => {
            println!("from\tto\told_ident\tnew_ident");
            for file in &report.renamed {
                println!(
                    "{}\t{}\t{}\t{}",
                    file.from.display(),
                    file.to.display(),
                    file.old_ident,
                    file.new_ident
                );
            }
        }
    }

    Ok(())
}
