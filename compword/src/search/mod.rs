/// Longest compound word search.
///
/// Both strategies walk the lexicon's bucket keys longest first and hand each
/// word to the [`Decomposer`]:
///
/// 1. **Sequential**: one loop, one memo, first hit wins. Because buckets are
///    visited in descending length order the hit is a longest compound word.
/// 2. **Parallel**: a dispatcher feeds bucket indices to a fixed pool of
///    workers, each with its own memo, and the first reported hit wins (or,
///    with [`ResultOrdering::LongestFirst`], the first hit that no longer
///    bucket can beat).
///
/// ```rust,ignore
/// let lexicon = Lexicon::build(words)?;
/// let strategy = create_strategy(&config, SearchMetrics::new());
/// let word = strategy.search(&lexicon);
/// ```
pub mod decompose;
pub mod parallel;
pub mod sequential;

pub use decompose::{is_compound, Decomposer, InvalidWords};
pub use parallel::ParallelSearch;
pub use sequential::SequentialSearch;

use std::time::Instant;
use tracing::{info, trace};

use crate::config::{FinderConfig, ResultOrdering, SearchMode};
use crate::lexicon::Lexicon;
use crate::metrics::SearchMetrics;
use crate::results::SearchOutcome;

/// A way of finding the longest compound word in a [`Lexicon`]
pub trait SearchStrategy: Send + Sync {
    fn mode(&self) -> SearchMode;

    /// Returns the answer, or an empty string if no compound word exists
    fn search(&self, lexicon: &Lexicon) -> String;
}

/// Builds the strategy selected by `config`
pub fn create_strategy(config: &FinderConfig, metrics: SearchMetrics) -> Box<dyn SearchStrategy> {
    match config.mode {
        SearchMode::Sequential => Box::new(SequentialSearch::new(config.split_bound, metrics)),
        SearchMode::Parallel => Box::new(ParallelSearch::new(
            config.thread_count,
            config.split_bound,
            config.result_ordering,
            metrics,
        )),
    }
}

/// Runs the configured strategy and wraps its answer with timing and stats
pub fn find_longest(config: &FinderConfig, lexicon: &Lexicon) -> SearchOutcome {
    let metrics = SearchMetrics::new();
    let strategy = create_strategy(config, metrics.clone());

    match strategy.mode() {
        SearchMode::Sequential => info!("Running sequential search"),
        SearchMode::Parallel => info!(
            "Running in parallel with {} workers ({:?})",
            config.thread_count, config.result_ordering
        ),
    }

    let start = Instant::now();
    let word = strategy.search(lexicon);
    let elapsed = start.elapsed();

    metrics.log_stats();
    let outcome = SearchOutcome::new(word, strategy.mode(), elapsed, metrics.get_stats());
    info!(
        "Longest word found in {}: {:?}",
        outcome.elapsed_display(),
        outcome.word
    );
    outcome
}

/// Walks one bucket in stored order and returns its first compound word.
///
/// Words already in the memo are skipped. `cancelled` is polled before every
/// word; once it returns true the walk stops with `None`.
pub(crate) fn scan_bucket<'w>(
    decomposer: &Decomposer<'_>,
    bucket: &'w [String],
    memo: &mut InvalidWords,
    metrics: &SearchMetrics,
    mut cancelled: impl FnMut() -> bool,
) -> Option<&'w str> {
    let mut hit = None;
    for word in bucket {
        if cancelled() {
            break;
        }
        if memo.contains(word) {
            continue;
        }

        trace!("Testing word: {}", word);
        metrics.record_word_tested();
        if decomposer.is_compound(word, memo) {
            hit = Some(word.as_str());
            break;
        }
    }
    metrics.record_bucket();
    hit
}

/// Whether `config` guarantees the same answer length as a sequential run
pub fn is_length_exact(config: &FinderConfig) -> bool {
    config.mode == SearchMode::Sequential || config.result_ordering == ResultOrdering::LongestFirst
}
