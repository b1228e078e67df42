//! Typedfn Probe Binary
//!
//! Run with: `typedfn-probe [OPTIONS] [ARGS...]`, where each `ARGS` is a JSON
//! array such as `'["a", 1, 2]'`.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use typedfn_probe::{Outcome, Probe, ProbeFile};

#[derive(Parser)]
#[command(name = "typedfn-probe")]
#[command(about = "Show which typed signature an argument list selects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Argument lists to probe, each a JSON array
    #[arg(value_name = "ARGS")]
    args: Vec<String>,

    /// Probe file (TOML) with `name`, `signatures` and instance settings
    #[arg(short = 'c', long, env = "TYPEDFN_PROBE_FILE")]
    config: Option<PathBuf>,

    /// Signature to try, in priority order (appended after the probe file's)
    #[arg(short, long = "signature", value_name = "SIGNATURE")]
    signatures: Vec<String>,

    /// Dispatcher name used in diagnostics
    #[arg(short, long)]
    name: Option<String>,

    /// Type names to drop from unions
    #[arg(long, value_name = "TYPE")]
    ignore: Vec<String>,

    /// Exit with a failure status if any argument list does not match
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective probe file
    Config,
    /// List the compiled signatures in dispatch order
    Signatures,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let file = build_probe_file(&cli)?;

    if let Some(Commands::Config) = &cli.command {
        println!("{}", toml::to_string_pretty(&file)?);
        return Ok(());
    }

    let probe = Probe::new(&file).context("Failed to compile signatures")?;

    if let Some(Commands::Signatures) = &cli.command {
        for (index, signature) in probe.function().signature_texts().enumerate() {
            println!("#{} {}", index, signature);
        }
        return Ok(());
    }

    if cli.args.is_empty() {
        bail!("no argument lists given; pass JSON arrays such as '[1, \"a\"]'");
    }

    let mut unmatched = 0;
    for args in &cli.args {
        debug!("Probing: {}", args);
        match probe.probe_json(args) {
            Ok(outcome) => {
                if matches!(outcome, Outcome::NoMatch { .. }) {
                    unmatched += 1;
                }
                println!("{} => {}", args, outcome);
            }
            Err(e) => {
                error!("Error probing {}: {}", args, e);
                unmatched += 1;
            }
        }
    }

    info!("Probed {} argument lists, {} unmatched", cli.args.len(), unmatched);
    if cli.strict && unmatched > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn build_probe_file(cli: &Cli) -> Result<ProbeFile> {
    let mut file = if let Some(path) = &cli.config {
        ProbeFile::load(path).with_context(|| format!("Failed to load probe file: {}", path.display()))?
    } else {
        ProbeFile::default()
    };

    // Override with CLI options
    if let Some(name) = &cli.name {
        file.name = Some(name.clone());
    }
    file.signatures.extend(cli.signatures.iter().cloned());
    file.config.ignore.extend(cli.ignore.iter().cloned());

    Ok(file)
}
