use tracing::debug;

use super::{scan_bucket, Decomposer, InvalidWords, SearchStrategy};
use crate::config::{SearchMode, SplitBound};
use crate::lexicon::Lexicon;
use crate::metrics::SearchMetrics;

/// Single-threaded longest-first scan.
///
/// Buckets are visited in the lexicon's key order, so the first compound
/// word found is a longest one.
#[derive(Debug, Clone)]
pub struct SequentialSearch {
    bound: SplitBound,
    metrics: SearchMetrics,
}

impl SequentialSearch {
    pub fn new(bound: SplitBound, metrics: SearchMetrics) -> Self {
        Self { bound, metrics }
    }
}

impl Default for SequentialSearch {
    fn default() -> Self {
        Self::new(SplitBound::default(), SearchMetrics::new())
    }
}

impl SearchStrategy for SequentialSearch {
    fn mode(&self) -> SearchMode {
        SearchMode::Sequential
    }

    fn search(&self, lexicon: &Lexicon) -> String {
        let decomposer = Decomposer::new(lexicon, self.bound);
        let mut memo = InvalidWords::new();

        let found = lexicon.sorted_keys().iter().find_map(|key| {
            scan_bucket(
                &decomposer,
                lexicon.bucket(key),
                &mut memo,
                &self.metrics,
                || false,
            )
        });

        debug!("Size of invalid word set: {}", memo.len());
        self.metrics.record_memo(memo.len());
        found.map(str::to_owned).unwrap_or_default()
    }
}
