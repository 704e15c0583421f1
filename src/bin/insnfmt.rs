//! Command-line front end: validates description files and lists the formats they use.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use insnfmt::InsnDescription;
use insnfmt::loader::{DescriptionLoader, FormatCatalog, LoadError, LoaderOptions};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "insnfmt", about = "Instruction encoding description tools")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Cross-check every orig_fmt against the canonical format.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate every description.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print each distinct canonical format with its use count.
    Formats {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "insnfmt=debug" } else { "insnfmt=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let loader = DescriptionLoader::with_options(LoaderOptions {
        strict_orig_format: cli.strict,
    });

    match run(&loader, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(line = err.line(), "{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(loader: &DescriptionLoader, command: Command) -> Result<(), LoadError> {
    match command {
        Command::Check { files } => {
            let descs = loader.load_files(&files)?;
            info!(
                files = files.len(),
                insns = descs.len(),
                "all descriptions valid"
            );
        }
        Command::Formats { files } => {
            let descs: Vec<InsnDescription> = loader.load_files(&files)?;
            let catalog = FormatCatalog::gather(&descs);
            for (repr, entry) in catalog.iter() {
                println!("{repr:<16} {:>4}", entry.uses);
            }
            debug!(formats = catalog.len(), "listed formats");
        }
    }
    Ok(())
}
