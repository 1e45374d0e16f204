//! Tideline Migration CLI Tool
//!
//! Command-line interface for inspecting the migrations of a project: which
//! versions exist, which file declares each one, and generating new ones.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tideline::migration::{build_registry, calculate_checksum};
use tideline::{FinderConfig, MigrationFinder, VersionRegistry};
use tideline_migrate::build_script;

#[derive(Parser)]
#[command(name = "tideline-migrate")]
#[command(about = "Migration discovery tool for Tideline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file path
    #[arg(long, default_value = tideline::config::CONFIG_FILE)]
    config: PathBuf,

    /// Migrations directory path (overrides configuration)
    #[arg(long)]
    migrations_dir: Option<PathBuf>,

    /// Only keep migrations under this module path (overrides configuration)
    #[arg(long)]
    namespace: Option<String>,

    /// Module path migration files are mounted under (overrides configuration)
    #[arg(long)]
    module_root: Option<String>,

    /// Fail on duplicate version identifiers
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered migrations in version order
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show detailed information about one migration
    Info {
        /// Migration version
        version: String,
    },

    /// Generate a new migration file
    Generate {
        /// Short description (e.g., "create users table")
        description: String,
    },

    /// Generate the build-time registry module
    Registry {
        /// Output file
        #[arg(long, default_value = build_script::REGISTRY_FILE)]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ListedMigration<'a> {
    version: &'a str,
    name: &'a str,
    file: String,
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = FinderConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(dir) = cli.migrations_dir {
        config.directory = dir;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = Some(namespace);
    }
    if let Some(module_root) = cli.module_root {
        config.module_root = module_root;
    }
    config.strict_versions |= cli.strict;

    match cli.command {
        Commands::List { format } => handle_list(&config, format),
        Commands::Info { version } => handle_info(&config, &version),
        Commands::Generate { description } => handle_generate(&config.directory, &description),
        Commands::Registry { out } => handle_registry(&config, &out),
    }
}

fn discover(config: &FinderConfig) -> Result<VersionRegistry> {
    log::debug!(
        "Discovering migrations in {} (module root {})",
        config.directory.display(),
        config.module_root
    );
    let (mut finder, filter) = MigrationFinder::from_config(config)?;
    let registry = finder.find(&config.directory, &filter, config.namespace.as_deref())?;
    Ok(registry)
}

/// Path relative to the working directory when possible
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn handle_list(config: &FinderConfig, format: OutputFormat) -> Result<()> {
    let registry = discover(config)?;

    match format {
        OutputFormat::Json => {
            let listed: Vec<ListedMigration<'_>> = registry
                .iter()
                .map(|(version, unit)| ListedMigration {
                    version,
                    name: unit.qualified_name(),
                    file: display_path(unit.origin()),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        OutputFormat::Text => {
            if registry.is_empty() {
                println!("No migrations found in {}", config.directory.display());
                return Ok(());
            }

            println!("\n{}\n", "Migrations".bold());
            for (version, unit) in registry.iter() {
                println!(
                    "  {}  {}  {}",
                    version.green(),
                    unit.qualified_name(),
                    display_path(unit.origin()).dimmed()
                );
            }
            println!("\n{} migration(s)", registry.len());
        }
    }

    Ok(())
}

fn handle_info(config: &FinderConfig, version: &str) -> Result<()> {
    let registry = discover(config)?;

    let Some(unit) = registry.get(version) else {
        bail!("No migration with version {} in {}", version, config.directory.display());
    };

    println!("\n{}\n", "Migration Information".bold());
    println!("Version: {}", version);
    println!("Name: {}", unit.qualified_name());
    println!("File: {}", display_path(unit.origin()));
    println!("Checksum: {}", calculate_checksum(unit.origin())?);
    if registry.latest_version() == Some(version) {
        println!("Latest: yes");
    }

    Ok(())
}

fn handle_generate(migrations_dir: &Path, description: &str) -> Result<()> {
    let now = chrono::Utc::now();
    let timestamp = now.format("%Y%m%d%H%M%S").to_string();

    std::fs::create_dir_all(migrations_dir).with_context(|| {
        format!("Failed to create migrations directory {}", migrations_dir.display())
    })?;

    let filepath = migrations_dir.join(tideline_migrate::migration_file_name(&timestamp));
    if filepath.exists() {
        bail!("Migration file already exists: {}", filepath.display());
    }

    let generated_time = now.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let template = tideline_migrate::migration_template(&timestamp, description, &generated_time);

    std::fs::write(&filepath, template)
        .with_context(|| format!("Failed to write migration file {}", filepath.display()))?;

    println!("{} Generated migration: {}", "✓".green(), filepath.display());
    println!("   Edit the file to implement up() and down()");

    Ok(())
}

fn handle_registry(config: &FinderConfig, out: &Path) -> Result<()> {
    let (mut finder, filter) = MigrationFinder::from_config(config)?;
    let units = finder.candidates(&config.directory, &filter, config.namespace.as_deref())?;
    let registry = build_registry(&units, config.strict_versions)?;

    build_script::generate_registry_module(&units, &config.module_root, out)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!(
        "{} Wrote registry for {} migration(s) to {}",
        "✓".green(),
        registry.len(),
        out.display()
    );
    if units.len() > registry.len() {
        println!(
            "   {} unit(s) shadowed by a later migration with the same version",
            units.len() - registry.len()
        );
    }
    Ok(())
}
