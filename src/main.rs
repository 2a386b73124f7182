use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod fromfile;
mod parsing;
mod plan;
mod rename;
mod rules;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("kiln=debug,info")
    } else {
        EnvFilter::new("kiln=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Build(args) => {
            cli::build::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Extract(args) => {
            cli::extract::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Rename(args) => {
            cli::rename::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Plan(args) => {
            cli::plan::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
