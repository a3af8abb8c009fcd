//! CLI binary for gast: normalize source files into generic syntax tree tables.

mod discover;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gast_batch::BatchOrchestrator;
use gast_core::config::{GastConfig, Granularity};
use gast_core::storage::for_each_table;
use gast_core::validate::validate;
use gast_parser::{Language, generate_source};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gast", about = "Generic syntax tree normalizer", version)]
struct Cli {
    /// Directory holding .gast/config.toml (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds tables.
#[derive(Args)]
struct GenerateArgs {
    /// Granularity: verbatim, fine, coarse
    #[arg(short, long)]
    granularity: Option<Granularity>,

    /// Force the source language instead of detecting it by extension
    #[arg(short, long)]
    lang: Option<String>,

    /// Run the language-specific simplification pass first
    #[arg(long)]
    normalize: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every matching file into <OUTPUT>.json / .txt / _failed.txt
    Batch {
        /// Files, directories or glob patterns (e.g. "src/**/*.py")
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Output stem
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        generate: GenerateArgs,

        /// Glob patterns to exclude files (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Worker threads (0 = available parallelism)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Capacity of the result channel
        #[arg(long)]
        channel_capacity: Option<usize>,

        /// Advisory lower bound on table size
        #[arg(long)]
        min_nodes: Option<usize>,

        /// Advisory upper bound on table size
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Normalize one file and print its node table as JSON
    Parse {
        file: PathBuf,

        #[command(flatten)]
        generate: GenerateArgs,

        /// Pretty-print the table
        #[arg(long)]
        pretty: bool,
    },

    /// Check every table of a JSON Lines file against the node table invariants
    Validate {
        file: PathBuf,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let mut config = GastConfig::load(&project_root)
        .with_context(|| format!("failed to load config under {}", project_root.display()))?;

    match cli.command {
        Commands::Batch {
            patterns,
            output,
            generate,
            exclude,
            workers,
            channel_capacity,
            min_nodes,
            max_nodes,
            progress,
        } => {
            let language = apply_generate_args(&mut config, &generate)?;
            if let Some(n) = workers {
                config.batch.workers = n;
            }
            if let Some(n) = channel_capacity {
                config.batch.channel_capacity = n;
            }
            if min_nodes.is_some() {
                config.generate.min_nodes = min_nodes;
            }
            if max_nodes.is_some() {
                config.generate.max_nodes = max_nodes;
            }
            config.batch.progress_bar |= progress;
            config.validate()?;
            cmd_batch(&config, language, &patterns, &exclude, &output)
        }
        Commands::Parse {
            file,
            generate,
            pretty,
        } => {
            let language = apply_generate_args(&mut config, &generate)?;
            cmd_parse(&config, language, &file, pretty)
        }
        Commands::Validate { file } => cmd_validate(&file),
    }
}

/// Apply the shared generation flags and resolve a forced language.
fn apply_generate_args(config: &mut GastConfig, args: &GenerateArgs) -> Result<Option<Language>> {
    if let Some(granularity) = args.granularity {
        config.generate.granularity = granularity;
    }
    config.generate.normalize |= args.normalize;
    args.lang
        .as_deref()
        .map(|name| {
            Language::from_name(name)
                .with_context(|| format!("unsupported language '{name}' (expected python, java or c)"))
        })
        .transpose()
}

fn cmd_batch(
    config: &GastConfig,
    language: Option<Language>,
    patterns: &[String],
    exclude: &[String],
    output: &Path,
) -> Result<()> {
    let files = discover::discover(patterns, exclude, language)?;
    if files.is_empty() {
        bail!("no files matched {}", patterns.join(" "));
    }
    eprintln!("Found {} files", files.len());

    let mut orchestrator = BatchOrchestrator::new(config.batch.clone(), config.generate.clone());
    if let Some(language) = language {
        orchestrator = orchestrator.with_language(language);
    }
    let summary = orchestrator.run(&files, output)?;

    eprintln!("\nBatch finished in {:.1}s", summary.elapsed.as_secs_f64());
    eprintln!("  Processed: {}", summary.success_count);
    eprintln!("  Failed: {}", summary.failure_count);
    eprintln!("  Normalization gaps: {}", summary.gap_count);
    if summary.write_errors > 0 {
        eprintln!("  Lost to write errors: {}", summary.write_errors);
    }
    eprintln!("  Output: {}.json", output.display());
    Ok(())
}

fn cmd_parse(config: &GastConfig, language: Option<Language>, file: &Path, pretty: bool) -> Result<()> {
    let Some(language) = language.or_else(|| Language::from_path(file)) else {
        bail!("cannot detect language of {} (use --lang)", file.display());
    };
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    match generate_source(language, &source, &config.generate) {
        Ok(normalized) => {
            let json = if pretty {
                serde_json::to_string_pretty(&normalized.table)?
            } else {
                normalized.table.to_json_line()?
            };
            println!("{json}");
            if !normalized.gaps.is_empty() {
                tracing::debug!(gaps = ?normalized.gaps, "normalization gaps");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("could not parse {}: {e}", file.display());
            std::process::exit(1);
        }
    }
}

fn cmd_validate(file: &Path) -> Result<()> {
    let mut valid = 0usize;
    let mut invalid = 0usize;
    for_each_table(file, |line, table| {
        let problem = match table {
            Ok(table) => validate(&table).err().map(|e| e.to_string()),
            Err(e) => Some(format!("{e:#}")),
        };
        match problem {
            Some(problem) => {
                invalid += 1;
                eprintln!("  line {line}: {problem}");
            }
            None => valid += 1,
        }
        Ok(())
    })?;

    eprintln!("{valid} valid, {invalid} invalid tables in {}", file.display());
    if invalid > 0 {
        std::process::exit(1);
    }
    Ok(())
}
