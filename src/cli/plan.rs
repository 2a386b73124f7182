use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::fromfile::extract::extract;
use crate::plan::params::SketchParams;
use crate::plan::planner::{plan_sketches, write_plan_file, AlreadyDone};

#[derive(Args)]
pub struct PlanArgs {
    /// Manifest listing the genome and protein files
    #[arg(required = true)]
    pub manifest: PathBuf,

    /// Sketch parameter string, e.g. 'dna,k=21,k=31,scaled=1000' (repeatable)
    #[arg(short, long = "param", required = true)]
    pub params: Vec<String>,

    /// Sourmash manifest(s) of sketches that already exist
    #[arg(long)]
    pub already_done: Vec<PathBuf>,

    /// Output CSV of sketches to build
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

/// Execute plan subcommand
///
/// # Errors
///
/// Returns an error if a parameter string is invalid, an input cannot be read,
/// a needed file is missing from the manifest, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PlanArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let params = SketchParams::parse_all(&args.params)?;
    if verbose {
        eprintln!("Requested {} parameter set(s):", params.len());
        for p in &params {
            eprintln!("  {p}");
        }
    }

    let manifest = extract(std::slice::from_ref(&args.manifest))?;
    let done = AlreadyDone::load(&args.already_done)?;
    let plan = plan_sketches(&manifest, &params, &done)?;

    write_plan_file(&plan, &args.output, args.force)?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} sketches requested, {} already done, {} to build from {} file(s)",
                plan.total,
                plan.skipped,
                plan.to_build(),
                plan.jobs.len()
            );
            println!("wrote plan to '{}'", args.output.display());
        }
        OutputFormat::Json => super::print_json(&plan)?,
        OutputFormat::Tsv => {
            println!("total\tskipped\tto_build\tfiles");
            println!(
                "{}\t{}\t{}\t{}",
                plan.total,
                plan.skipped,
                plan.to_build(),
                plan.jobs.len()
            );
        }
    }

    Ok(())
}
