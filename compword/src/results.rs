use serde::Serialize;
use std::time::Duration;

use crate::config::SearchMode;
use crate::metrics::SearchStats;

/// Answer of one search run plus the diagnostics gathered along the way.
///
/// An empty `word` means the dictionary holds no compound word; that is a
/// normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// The longest compound word found, or empty
    pub word: String,
    /// Byte length of `word`
    pub length: usize,
    /// Strategy that produced the answer
    pub mode: SearchMode,
    /// Wall-clock time of the search itself, loading excluded
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn new(word: String, mode: SearchMode, elapsed: Duration, stats: SearchStats) -> Self {
        Self {
            length: word.len(),
            word,
            mode,
            elapsed,
            stats,
        }
    }

    /// Whether a compound word was found
    pub fn is_found(&self) -> bool {
        !self.word.is_empty()
    }

    /// Elapsed time in human readable form, e.g. `1ms 250us`
    pub fn elapsed_display(&self) -> String {
        humantime::format_duration(self.elapsed).to_string()
    }
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}
