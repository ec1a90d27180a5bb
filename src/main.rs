use std::{
    fs,
    io::{stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use clap::{ColorChoice, Parser};
use serde::Serialize;

use figma_extract_lib::{
    debug, extract_batch, extract_file, log, logger, Config, ExtractError, MatchMode,
    RootSelector, SearchOptions, DEFAULT_CONFIG_FILE,
};

/// Extract helpful metrics from a Figma node JSON dump
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Node names to capture. Defaults to a curated set for the persona admin layout
    targets: Vec<String>,

    /// How TEXT content is compared with the targets
    #[arg(long, value_enum)]
    match_mode: Option<MatchMode>,

    /// Include recursive summaries of matched nodes' children
    #[arg(long)]
    include_children: bool,

    /// Figma JSON export to read (repeat for a batch)
    #[arg(short, long = "file", value_hint = clap::ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Key of the root under `nodes` (node exports)
    #[arg(long)]
    node_id: Option<String>,

    /// JSON Pointer to the root node, e.g. /nodes/26:1861/document
    #[arg(long)]
    pointer: Option<String>,

    /// Config file path (default: figma-extract.toml if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Also copy the report to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Print debug information
    #[arg(short, long)]
    verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    color: ColorChoice,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let files = if cli.files.is_empty() { config.files } else { cli.files };
    if files.is_empty() {
        bail!("no input file, pass --file or set `files` in {DEFAULT_CONFIG_FILE}");
    }

    let selector = RootSelector {
        pointer: cli.pointer.or(config.pointer),
        node_id: cli.node_id.or(config.node_id),
    };
    let match_mode = cli.match_mode.or(config.match_mode).unwrap_or_default();
    let include_children = cli.include_children || config.include_children.unwrap_or(false);
    let compact = cli.compact || config.compact.unwrap_or(false);

    let options = match (cli.targets, config.targets) {
        (targets, _) if !targets.is_empty() => SearchOptions::new(targets, match_mode, include_children),
        (_, Some(targets)) => SearchOptions::new(targets, match_mode, include_children),
        (_, None) => SearchOptions::with_default_targets(match_mode, include_children),
    }?;
    debug!("config"; "{} targets, {:?} text matching", options.targets().len(), options.match_mode());

    let (report, failed) = match files.as_slice() {
        [file] => {
            let matches = extract_file(file, &selector, &options)
                .with_context(|| format!("failed to extract `{}`", file.display()))?;
            log!("extract"; "{}: {} matches", file.display(), matches.len());
            (render(&matches, compact)?, 0)
        }
        _ => {
            let reports = extract_batch(&files, &selector, &options);
            for r in &reports {
                match &r.error {
                    Some(e) => log!("error"; "{}: {e}", r.file.display()),
                    None => log!("extract"; "{}: {} matches", r.file.display(), r.matches.len()),
                }
            }
            let failed = reports.iter().filter(|r| r.error.is_some()).count();
            (render(&reports, compact)?, failed)
        }
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{report}\n"))
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("extract"; "report written to {}", path.display());
        }
        None => writeln!(stdout().lock(), "{report}").context("failed to write report")?,
    }

    if cli.copy {
        copy_to_clipboard(report)?;
        debug!("extract"; "report copied to clipboard");
    }

    if failed > 0 {
        bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}

fn render<T: Serialize + ?Sized>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

fn copy_to_clipboard(report: String) -> Result<(), ExtractError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(report)?;
    Ok(())
}
