use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Counters describing one search run.
///
/// Clones share the same counters, so every worker of the parallel pool can
/// record into one instance without locking.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    words_tested: Arc<AtomicU64>,
    buckets_processed: Arc<AtomicU64>,
    memo_entries: Arc<AtomicU64>,
    peak_memo_entries: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            words_tested: Arc::new(AtomicU64::new(0)),
            buckets_processed: Arc::new(AtomicU64::new(0)),
            memo_entries: Arc::new(AtomicU64::new(0)),
            peak_memo_entries: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a dictionary word handed to the decomposition test
    pub fn record_word_tested(&self) {
        self.words_tested.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a bucket fully walked (or abandoned after a hit)
    pub fn record_bucket(&self) {
        let total = self.buckets_processed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Buckets processed: {}", total);
    }

    /// Records the final size of one memo.
    ///
    /// Sizes of several memos (one per worker) add up; the peak keeps the
    /// largest single memo.
    pub fn record_memo(&self, entries: usize) {
        let entries = entries as u64;
        self.memo_entries.fetch_add(entries, Ordering::Relaxed);
        let mut peak = self.peak_memo_entries.load(Ordering::Relaxed);
        while entries > peak {
            match self.peak_memo_entries.compare_exchange_weak(
                peak,
                entries,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => peak = current,
            }
        }
    }

    /// Gets the current statistics
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            words_tested: self.words_tested.load(Ordering::Relaxed),
            buckets_processed: self.buckets_processed.load(Ordering::Relaxed),
            memo_entries: self.memo_entries.load(Ordering::Relaxed),
            peak_memo_entries: self.peak_memo_entries.load(Ordering::Relaxed),
        }
    }

    /// Logs the current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Words tested: {}\n\
             Buckets processed: {}\n\
             Invalid word set size (total/peak): {}/{}",
            stats.words_tested,
            stats.buckets_processed,
            stats.memo_entries,
            stats.peak_memo_entries
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SearchStats {
    pub words_tested: u64,
    pub buckets_processed: u64,
    pub memo_entries: u64,
    pub peak_memo_entries: u64,
}
