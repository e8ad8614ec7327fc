//! JSON override CLI
//!
//! Entry point for the `json-override` command-line tool.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use json_override::generate::{generate, ParamRange};
use json_override::store::OverrideStore;
use json_override::{CliOverrides, EffectiveSettings, FsRepository, JsonValue, Tree};
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "json-override")]
#[command(about = "Inspect merged JSON configuration and record overrides", version)]
struct Cli {
    /// Path to settings file (default: ~/.config/json-override/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory containing config*.json documents
    #[arg(long, global = true)]
    configs: Option<PathBuf>,

    /// Path to the overrides.json file
    #[arg(long, global = true)]
    overrides: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration as a key/value tree
    Show {
        /// List base documents with their digests
        #[arg(long)]
        sources: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print one value of the effective configuration
    Get {
        /// Dot-separated path, list elements by index (e.g. config_net.hosts.0)
        path: String,
    },

    /// Edit one leaf value and record the override
    Set {
        /// Dot-separated path of the leaf to edit
        path: String,

        /// New value (stored as a string)
        value: String,
    },

    /// Print the overrides currently visible in the effective configuration
    Diff,

    /// Remove every override
    Reset,

    /// Write a randomly structured sample document
    Generate {
        /// Output file (must end in .json)
        file: PathBuf,

        /// Range for the number of params
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [2, 5])]
        params: Vec<usize>,
    },
}

/// Initialize tracing subscriber with environment-based filtering.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cli_overrides = CliOverrides {
        config_dir: cli.configs.clone(),
        override_file: cli.overrides.clone(),
    };

    let settings = cli.settings.as_deref();
    let result = match cli.command {
        Commands::Show { sources, json } => {
            open_store(settings, &cli_overrides)
                .and_then(|(effective, store)| run_show(&effective, &store, sources, json))
        }
        Commands::Get { path } => {
            open_store(settings, &cli_overrides).and_then(|(_, store)| run_get(&store, &path))
        }
        Commands::Set { path, value } => {
            open_store(settings, &cli_overrides).and_then(|(_, store)| run_set(store, &path, &value))
        }
        Commands::Diff => {
            open_store(settings, &cli_overrides).and_then(|(_, store)| run_diff(&store))
        }
        Commands::Reset => {
            open_store(settings, &cli_overrides).and_then(|(_, store)| run_reset(store))
        }
        Commands::Generate { file, params } => run_generate(&file, &params),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

type Session = (EffectiveSettings, OverrideStore<FsRepository>);

fn open_store(
    settings_file: Option<&Path>,
    cli: &CliOverrides,
) -> Result<Session, Box<dyn std::error::Error>> {
    let effective = EffectiveSettings::build(settings_file, cli)?;
    let repository = FsRepository::from_settings(&effective.settings)?;
    let store = OverrideStore::open(repository)?;
    Ok((effective, store))
}

fn run_show(
    effective: &EffectiveSettings,
    store: &OverrideStore<FsRepository>,
    sources: bool,
    json: bool,
) -> CliResult {
    if sources {
        for source in &effective.sources {
            match (&source.path, &source.digest) {
                (Some(path), Some(digest)) => println!(
                    "settings  {}  {}  sha256:{}",
                    source.origin.as_str(),
                    path,
                    &digest[..12]
                ),
                _ => println!("settings  {}", source.origin.as_str()),
            }
        }
        for source in store.configs().sources() {
            println!(
                "document  {}  sha256:{}  ({} bytes)",
                source.name,
                &source.digest[..12],
                source.size
            );
        }
        println!();
    }

    let view = store.effective_view()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    for row in Tree::build(&view).rows() {
        let indent = "  ".repeat(row.depth);
        if row.value.is_empty() {
            println!("{}{}", indent, row.key);
        } else {
            println!("{}{}: {}", indent, row.key, row.value);
        }
    }
    Ok(())
}

fn run_get(store: &OverrideStore<FsRepository>, path: &str) -> CliResult {
    match store.get(path)? {
        value @ JsonValue::Scalar(_) => println!("{}", value),
        container => println!("{}", serde_json::to_string_pretty(&container)?),
    }
    Ok(())
}

fn run_set(mut store: OverrideStore<FsRepository>, path: &str, value: &str) -> CliResult {
    let patch = store.apply_edit(path, value)?;
    println!("{}", serde_json::to_string_pretty(&patch)?);
    eprintln!("Wrote: {}", store.repository().override_file().display());
    Ok(())
}

fn run_diff(store: &OverrideStore<FsRepository>) -> CliResult {
    println!("{}", serde_json::to_string_pretty(&store.diff()?)?);
    Ok(())
}

fn run_reset(mut store: OverrideStore<FsRepository>) -> CliResult {
    store.reset()?;
    eprintln!("Cleared: {}", store.repository().override_file().display());
    Ok(())
}

fn run_generate(file: &Path, params: &[usize]) -> CliResult {
    let range = match params {
        [min, max] => ParamRange::new(*min, *max)?,
        _ => ParamRange::default(),
    };
    generate(file, range)?;
    eprintln!("Wrote: {}", file.display());
    Ok(())
}
