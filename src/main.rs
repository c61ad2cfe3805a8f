use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kukugen::config::{self, LoadedConfig};
use kukugen::infrastructure::codegen::{check_bindings, write_bindings, Staleness};
use kukugen::{Artifact, ArtifactScanner, GeneratedBinding, Generator, GeneratorOptions};

#[derive(Debug, Parser)]
#[command(
    name = "kukugen",
    version,
    about = "kukugen: typed Rust bindings from Solidity ABI artifacts"
)]
struct Args {
    /// Config file (default: $KUKUGEN_CONFIG, then ./kukugen.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate bindings and write them to the output directory
    Generate(GenerateArgs),
    /// Exit with status 1 if generated bindings are missing or out of date
    Check(GenerateArgs),
    /// Print the functions of an artifact with their selectors
    Inspect {
        /// ABI artifact (raw ABI array or Hardhat/Foundry JSON)
        artifact: PathBuf,

        /// Only show the function with this selector (e.g. 0xe2bbb158)
        #[arg(long)]
        selector: Option<String>,
    },
}

#[derive(Debug, ClapArgs)]
struct GenerateArgs {
    /// Artifact files or directories (default: `artifacts` from the config)
    inputs: Vec<PathBuf>,

    /// Output directory (default: `out_dir` from the config)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Rust path generated code imports the runtime from
    #[arg(long)]
    runtime_path: Option<String>,

    /// Do not emit deploy support, even for artifacts with bytecode
    #[arg(long)]
    no_bytecode: bool,

    /// Do not write `mod.rs`
    #[arg(long)]
    no_index: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let loaded = config::load(args.config.as_deref())?;

    match args.command {
        Command::Generate(opts) => {
            let (bindings, out_dir, with_index) = generate(&opts, &loaded)?;
            let written = write_bindings(&bindings, &out_dir, with_index)?;
            println!(
                "{} contract(s), {} file(s) written to {}",
                bindings.len(),
                written.len(),
                out_dir.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(opts) => {
            let (bindings, out_dir, with_index) = generate(&opts, &loaded)?;
            let stale = check_bindings(&bindings, &out_dir, with_index);
            if stale.is_empty() {
                println!("{} contract(s) up to date", bindings.len());
                return Ok(ExitCode::SUCCESS);
            }
            for item in &stale {
                let reason = match item.staleness {
                    Staleness::Missing => "missing",
                    Staleness::Outdated => "outdated",
                };
                println!("{reason}: {}", item.path.display());
            }
            Ok(ExitCode::from(1))
        }
        Command::Inspect { artifact, selector } => {
            inspect(&artifact, selector.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the requested artifacts and render their bindings
fn generate(
    args: &GenerateArgs,
    loaded: &LoadedConfig,
) -> Result<(Vec<GeneratedBinding>, PathBuf, bool)> {
    let inputs = if args.inputs.is_empty() {
        loaded.artifact_paths()
    } else {
        args.inputs.clone()
    };
    if inputs.is_empty() {
        bail!("No artifacts given; pass paths or set `artifacts` in kukugen.toml");
    }

    let Some(out_dir) = args.out_dir.clone().or_else(|| loaded.out_dir()) else {
        bail!("No output directory; pass --out-dir or set `out_dir` in kukugen.toml");
    };

    let mut options: GeneratorOptions = loaded.generator_options();
    if let Some(path) = &args.runtime_path {
        options.runtime_path = path.clone();
    }
    if args.no_bytecode {
        options.emit_bytecode = false;
    }

    let set = ArtifactScanner::collect(&inputs).context("Failed to load artifacts")?;
    for err in &set.errors {
        tracing::warn!("{err}");
    }
    if set.is_empty() {
        bail!("No ABI artifacts found in {} input(s)", inputs.len());
    }
    tracing::debug!(
        artifacts = set.len(),
        scanned = set.scanned_files,
        ms = set.scan_ms as u64,
        "artifacts loaded"
    );

    let generator = Generator::new(options);
    let bindings = generator.generate_all(set.artifacts.iter().map(|artifact| &artifact.contract))?;
    Ok((bindings, out_dir, loaded.config.index && !args.no_index))
}

fn inspect(path: &Path, selector: Option<&str>) -> Result<()> {
    let artifact = Artifact::load(path)?;
    let contract = &artifact.contract;

    let entries = match selector {
        Some(selector) => {
            let Some(entry) = contract.lookup_hex(selector) else {
                bail!("No function with selector {selector} in {}", contract.name);
            };
            vec![entry]
        }
        None => contract.entries.iter().collect(),
    };

    println!(
        "{} ({} function(s){})",
        contract.name,
        contract.len(),
        if contract.is_deployable() {
            ", deployable"
        } else {
            ""
        }
    );
    for entry in entries {
        println!(
            "  {}  {:<10}  {}",
            entry.selector_hex(),
            entry.mutability_str(),
            entry.signature
        );
    }
    Ok(())
}
