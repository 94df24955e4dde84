pub mod config;
pub mod errors;
pub mod lexicon;
pub mod loader;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::{
    CliOverrides, EncodingMode, FinderConfig, ResultOrdering, SearchMode, SplitBound,
};
pub use errors::{FinderError, FinderResult};
pub use lexicon::{BucketKey, Lexicon};
pub use results::SearchOutcome;
pub use search::{find_longest, SearchStrategy};

use std::time::Instant;
use tracing::debug;

/// Loads the configured word list, builds the lexicon and runs the search
pub fn run(config: &FinderConfig) -> FinderResult<SearchOutcome> {
    let start = Instant::now();
    let words = loader::load_words(&config.word_list, config.encoding_mode)?;
    let lexicon = Lexicon::build(words)?;
    debug!(
        "Loading the strings took {}, number of buckets = {}",
        humantime::format_duration(start.elapsed()),
        lexicon.bucket_count()
    );

    Ok(find_longest(config, &lexicon))
}
