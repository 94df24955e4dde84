use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{FinderError, FinderResult};

/// Configuration for a compound word search.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations, later entries
/// overriding earlier ones:
/// 1. Global `$HOME/.config/compword/config.yaml`
/// 2. Local `.compword.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag (must exist)
///
/// # Configuration Format
///
/// ```yaml
/// # Word list, one word per line
/// word_list: "wordlist.txt"
///
/// # sequential | parallel
/// mode: parallel
///
/// # Worker pool size for the parallel mode (default: CPU cores)
/// thread_count: 6
///
/// # strict | inclusive
/// split_bound: strict
///
/// # first_found | longest_first
/// result_ordering: first_found
///
/// # failfast | lossy
/// encoding_mode: failfast
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Command-line arguments take precedence over file values, see
/// [`FinderConfig::merge_with_cli`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Path of the word list
    pub word_list: PathBuf,

    /// Which search strategy to run
    pub mode: SearchMode,

    /// Number of workers in the parallel pool.
    /// Defaults to number of CPU cores if not specified
    pub thread_count: NonZeroUsize,

    /// Lower bound policy for decomposition split points
    pub split_bound: SplitBound,

    /// How the parallel pool picks its answer
    pub result_ordering: ResultOrdering,

    /// How to handle invalid UTF-8 in the word list
    pub encoding_mode: EncodingMode,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Search strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Sequential,
    Parallel,
}

/// Where the split loop of the decomposition test stops.
///
/// With `Strict` a prefix is always longer than the shortest dictionary word,
/// so `{cat, dog, catdog}` does not make `catdog` compound. `Inclusive` also
/// tries the prefix of exactly the shortest length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitBound {
    #[default]
    Strict,
    Inclusive,
}

/// How the parallel pool turns worker reports into an answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrdering {
    /// The first compound word any worker reports wins
    #[default]
    FirstFound,
    /// A report is only accepted once every longer bucket is done
    LongestFirst,
}

/// Handling of invalid UTF-8 sequences in the word list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    #[default]
    FailFast,
    Lossy,
}

pub(crate) fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            word_list: PathBuf::new(),
            mode: SearchMode::default(),
            thread_count: default_thread_count(),
            split_bound: SplitBound::default(),
            result_ordering: ResultOrdering::default(),
            encoding_mode: EncodingMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl FinderConfig {
    /// Creates a configuration for the given word list with default settings
    pub fn new(word_list: impl Into<PathBuf>) -> Self {
        Self {
            word_list: word_list.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> FinderResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file
    pub fn load_from(config_path: Option<&Path>) -> FinderResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("compword/config.yaml")),
            Some(PathBuf::from(".compword.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(FinderError::file_not_found(path));
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies the values given on the command line over the loaded ones
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(word_list) = cli.word_list {
            self.word_list = word_list;
        }
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(split_bound) = cli.split_bound {
            self.split_bound = split_bound;
        }
        if let Some(result_ordering) = cli.result_ordering {
            self.result_ordering = result_ordering;
        }
        if let Some(encoding_mode) = cli.encoding_mode {
            self.encoding_mode = encoding_mode;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Settings given explicitly on the command line.
///
/// `None` leaves the file (or default) value in place, so an explicit value
/// wins even when it equals the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub word_list: Option<PathBuf>,
    pub mode: Option<SearchMode>,
    pub thread_count: Option<NonZeroUsize>,
    pub split_bound: Option<SplitBound>,
    pub result_ordering: Option<ResultOrdering>,
    pub encoding_mode: Option<EncodingMode>,
    pub log_level: Option<String>,
}
