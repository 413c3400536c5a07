//! CLI for the tree-rewrite tool.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tree_rewrite::prelude::*;
use tree_rewrite::rule::{DEFAULT_REPLACEMENT, DEFAULT_TARGET};

#[derive(Parser)]
#[command(name = "tree-rewrite")]
#[command(author, version, about = "Rename files and rewrite their contents across a directory tree", long_about = None)]
struct Cli {
    /// Directory to search (prompted for when omitted)
    path: Option<PathBuf>,

    /// Substring to search for in file names and contents
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    target: String,

    /// Substring to write in place of the target
    #[arg(short, long, default_value = DEFAULT_REPLACEMENT)]
    replacement: String,

    /// JSON file with "target" and "replacement"
    #[arg(long, conflicts_with_all = ["target", "replacement"])]
    rule: Option<PathBuf>,

    /// Glob pattern to exclude, relative to the search root
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rule = match cli.rule {
        Some(ref path) => RewriteRule::from_json_file(path)
            .with_context(|| format!("Failed to load rule from {}", path.display()))?,
        None => RewriteRule::new(&cli.target, &cli.replacement).context("Invalid rewrite rule")?,
    };

    let path = match cli.path {
        Some(path) => path,
        None => prompt_for_directory()?,
    };

    let report = DirectoryRewriter::new(rule)
        .matching(|f| f.excludes(cli.exclude))
        .traverse(&path)
        .context("Rewrite failed")?;

    println!("{report}");
    println!("{}", report.summary());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(io::stdout)
        .with_target(false)
        .with_level(false)
        .without_time()
        .init();
}

fn prompt_for_directory() -> Result<PathBuf> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter the directory to search: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read directory from stdin")?;

    let trimmed = line.trim();
    anyhow::ensure!(!trimmed.is_empty(), "No directory given");
    Ok(PathBuf::from(trimmed))
}
