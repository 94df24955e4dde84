use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use compword::{
    search::is_length_exact, CliOverrides, EncodingMode, FinderConfig, FinderError,
    ResultOrdering, SearchMode, SearchOutcome, SplitBound,
};
use std::{num::NonZeroUsize, path::PathBuf, time::Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Find the longest compound word in a word list", long_about = None)]
struct Cli {
    /// Word list, one word per line
    path: Option<PathBuf>,

    /// Search strategy
    #[arg(value_enum)]
    mode: Option<ModeArg>,

    /// Number of workers for the parallel mode (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Also try splits whose prefix is exactly as long as the shortest word
    #[arg(long)]
    inclusive_splits: bool,

    /// In parallel mode, only accept a word once every longer bucket is done
    #[arg(long)]
    ordered: bool,

    /// How to handle invalid UTF-8 sequences
    #[arg(long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Sequential,
    Parallel,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => SearchMode::Sequential,
            ModeArg::Parallel => SearchMode::Parallel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Failfast,
    Lossy,
}

impl From<EncodingArg> for EncodingMode {
    fn from(encoding: EncodingArg) -> Self {
        match encoding {
            EncodingArg::Failfast => EncodingMode::FailFast,
            EncodingArg::Lossy => EncodingMode::Lossy,
        }
    }
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        word_list: cli.path.clone(),
        mode: cli.mode.map(SearchMode::from),
        thread_count: cli.threads,
        split_bound: cli.inclusive_splits.then_some(SplitBound::Inclusive),
        result_ordering: cli.ordered.then_some(ResultOrdering::LongestFirst),
        encoding_mode: cli.encoding.map(EncodingMode::from),
        log_level: if cli.verbose {
            Some("debug".to_string())
        } else {
            cli.log_level.clone()
        },
    };

    let config = FinderConfig::load_from(cli.config.as_deref())?.merge_with_cli(overrides);
    init_logging(&config.log_level);

    if config.word_list.as_os_str().is_empty() {
        return Err(FinderError::config_error(
            "No word list given; pass a path or set word_list in a config file",
        )
        .into());
    }
    if !is_length_exact(&config) {
        debug!("First-found ordering: a shorter compound word may win the race");
    }

    let start = Instant::now();
    let outcome = compword::run(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
        let total = format!("{:.3?}", start.elapsed());
        println!("Total elapsed time: {}", total.dimmed());
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_outcome(outcome: &SearchOutcome) {
    match outcome.mode {
        SearchMode::Sequential => println!("{}", "Sequential search".blue()),
        SearchMode::Parallel => println!("{}", "Parallel search".blue()),
    }
    println!("Longest word found in {}", outcome.elapsed_display());
    println!(
        "Size of invalid word set: {}",
        outcome.stats.memo_entries.to_string().dimmed()
    );

    if outcome.is_found() {
        println!("Longest compound word found: {}", outcome.word.green());
    } else {
        println!("Longest compound word found: {}", "(none)".yellow());
    }
    println!("Longest compound word size: {}", outcome.length);
}
