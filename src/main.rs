//! apidox: generate Markdown API documentation from source comment blocks.
//!
//! Supports two modes:
//!
//! - **config mode**: `apidox` (reads `apidox.json`) or `apidox -c docs.json`
//! - **shorthand mode**: `apidox 'lib/*.js' -d docs`, one entry built from flags

mod config;
mod engine;
mod error;
mod paths;
mod render;
mod resolve;
mod sections;
mod task;
mod workspace;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{
    ConfigEntry, DoxOptions, InputTitle, RenderOptions, TaskConfig, CONFIG_FILENAME,
    MAX_EXTRA_HEADING_LEVELS,
};
use engine::markdown::DoxEngine;
use workspace::{FsWorkspace, Workspace};

#[derive(Parser)]
#[command(
    name = "apidox",
    version,
    about = "Generate Markdown API documentation from source comment blocks"
)]
struct Cli {
    /// Input file or glob pattern. If omitted, the configuration file is used.
    input: Option<String>,

    /// JSON configuration file (default: apidox.json in the working directory)
    #[arg(short = 'c', long, conflicts_with = "input")]
    config: Option<PathBuf>,

    /// Output file, relative to --outdir. Several matched inputs are merged
    /// into it; without it each input gets its own .md file.
    #[arg(short = 'o', long, requires = "input")]
    output: Option<String>,

    /// Output directory
    #[arg(short = 'd', long, requires = "input")]
    outdir: Option<String>,

    /// Title of the source attribution line
    #[arg(long, requires = "input", conflicts_with = "no_input_title")]
    input_title: Option<String>,

    /// Omit the source attribution line
    #[arg(long, requires = "input")]
    no_input_title: bool,

    /// Include the whole leading source comment, not just its first paragraph
    #[arg(long, requires = "input")]
    full_source_description: bool,

    /// Levels added to every generated heading
    #[arg(
        long,
        value_name = "N",
        requires = "input",
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_EXTRA_HEADING_LEVELS as u64)
    )]
    extra_heading_levels: Option<usize>,

    /// Ignore /* single-star */ comments
    #[arg(long, requires = "input")]
    skip_single_star: bool,

    /// Markdown to insert before an entry's TOC line; an empty KEY inserts
    /// after the TOC. `\n` in MARKDOWN becomes a newline. Repeatable.
    #[arg(long = "section", value_name = "KEY=MARKDOWN", requires = "input")]
    sections: Vec<String>,

    /// More logging (-v info, -vv debug). RUST_LOG applies otherwise.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let workspace = FsWorkspace::current()?;
    let config = load_config(&cli, workspace.root())?;
    let written = task::run(&config, &DoxEngine, &workspace)?;
    info!(written, "done");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the configuration from the positional input, --config, or the
/// default configuration file, in that order.
fn load_config(cli: &Cli, root: &Path) -> Result<TaskConfig> {
    if let Some(input) = &cli.input {
        return Ok(TaskConfig::Entry(shorthand_entry(cli, input)?));
    }

    let path = match &cli.config {
        Some(path) => path.clone(),
        None => {
            let candidate = root.join(CONFIG_FILENAME);
            if !candidate.is_file() {
                bail!("no configuration found: pass an input or create {CONFIG_FILENAME}");
            }
            candidate
        }
    };
    Ok(config::load(&path)?)
}

/// One entry assembled from command-line flags.
fn shorthand_entry(cli: &Cli, input: &str) -> Result<ConfigEntry> {
    let input_title = if cli.no_input_title {
        Some(InputTitle::Enabled(false))
    } else {
        cli.input_title.clone().map(InputTitle::Text)
    };
    let sections = parse_sections(&cli.sections)?;

    Ok(ConfigEntry {
        input: Some(input.to_string()),
        output: cli.output.clone(),
        outdir: cli.outdir.clone(),
        options: RenderOptions {
            input_title,
            full_source_description: cli.full_source_description,
            sections: (!sections.is_empty()).then_some(sections),
            extra_heading_levels: cli.extra_heading_levels.unwrap_or(0),
            dox_options: DoxOptions {
                skip_single_star: cli.skip_single_star,
                ..DoxOptions::default()
            },
        },
    })
}

/// Parse `KEY=MARKDOWN` pairs.
fn parse_sections(raw: &[String]) -> Result<BTreeMap<String, String>> {
    raw.iter()
        .map(|pair| {
            let (key, markdown) = pair
                .split_once('=')
                .with_context(|| format!("invalid --section {pair:?}: expected KEY=MARKDOWN"))?;
            Ok((key.to_string(), markdown.replace("\\n", "\n")))
        })
        .collect()
}
