use anyhow::Result;
use compword::search::{is_compound, InvalidWords, ParallelSearch, SequentialSearch};
use compword::{
    find_longest, metrics::SearchMetrics, FinderConfig, FinderError, Lexicon, ResultOrdering,
    SearchMode, SearchStrategy, SplitBound,
};
use std::fs::File;
use std::io::Write;
use std::num::NonZeroUsize;
use tempfile::tempdir;

const ROOTS: [&str; 10] = [
    "moon", "star", "fire", "wood", "rain", "sun", "box", "car", "pet", "top",
];

/// Roots, every root pair, a handful of triples and some long words that
/// do not decompose at all.
fn synthetic_words() -> Vec<String> {
    let mut words: Vec<String> = ROOTS.iter().map(|r| r.to_string()).collect();
    for a in ROOTS {
        for b in ROOTS {
            words.push(format!("{a}{b}"));
        }
    }
    for (i, a) in ROOTS.iter().enumerate().take(4) {
        words.push(format!("{a}{}{}", ROOTS[(i + 1) % 4], ROOTS[5 + i]));
    }
    for len in [12, 13, 14, 20] {
        words.push("q".repeat(len - 1) + "z");
        words.push("x".repeat(len));
    }
    words
}

fn sequential(lexicon: &Lexicon, bound: SplitBound) -> String {
    SequentialSearch::new(bound, SearchMetrics::new()).search(lexicon)
}

fn parallel(lexicon: &Lexicon, workers: usize, ordering: ResultOrdering) -> String {
    ParallelSearch::new(
        NonZeroUsize::new(workers).unwrap(),
        SplitBound::Strict,
        ordering,
        SearchMetrics::new(),
    )
    .search(lexicon)
}

fn strategies(bound: SplitBound) -> Vec<Box<dyn SearchStrategy>> {
    let mut all: Vec<Box<dyn SearchStrategy>> =
        vec![Box::new(SequentialSearch::new(bound, SearchMetrics::new()))];
    for workers in [1, 2, 4] {
        all.push(Box::new(ParallelSearch::new(
            NonZeroUsize::new(workers).unwrap(),
            bound,
            ResultOrdering::LongestFirst,
            SearchMetrics::new(),
        )));
    }
    all
}

/// Re-derives a decomposition of `word` without the search's memo
fn has_decomposition(word: &str, lexicon: &Lexicon, bound: SplitBound) -> bool {
    let min = lexicon.min_word_length();
    (1..word.len())
        .filter(|&i| word.is_char_boundary(i))
        .filter(|&i| word.len() - i >= min)
        .filter(|&i| match bound {
            SplitBound::Strict => i > min,
            SplitBound::Inclusive => i >= min,
        })
        .any(|i| {
            let (prefix, suffix) = word.split_at(i);
            let ok = |part: &str| {
                lexicon.contains(part) || is_compound(part, &mut InvalidWords::new(), lexicon, bound)
            };
            ok(prefix) && ok(suffix)
        })
}

fn longest_compound_length(words: &[String], lexicon: &Lexicon, bound: SplitBound) -> usize {
    words
        .iter()
        .filter(|w| is_compound(w, &mut InvalidWords::new(), lexicon, bound))
        .map(|w| w.len())
        .max()
        .unwrap_or(0)
}

#[test]
fn test_scenario_a_boundary_policy() -> Result<()> {
    let lexicon = Lexicon::build(["cat", "dog", "catdog"])?;
    assert_eq!(lexicon.min_word_length(), 3);

    for strategy in strategies(SplitBound::Strict) {
        assert_eq!(strategy.search(&lexicon), "", "{:?}", strategy.mode());
    }
    for strategy in strategies(SplitBound::Inclusive) {
        assert_eq!(strategy.search(&lexicon), "catdog", "{:?}", strategy.mode());
    }
    Ok(())
}

#[test]
fn test_scenario_b_longer_word_first() -> Result<()> {
    let lexicon = Lexicon::build(["a", "b", "ab", "abc", "c"])?;

    for strategy in strategies(SplitBound::Strict) {
        assert_eq!(strategy.search(&lexicon), "abc", "{:?}", strategy.mode());
    }
    Ok(())
}

#[test]
fn test_scenario_c_no_compound_word() -> Result<()> {
    let lexicon = Lexicon::build(["x", "y", "z"])?;

    for bound in [SplitBound::Strict, SplitBound::Inclusive] {
        for strategy in strategies(bound) {
            assert_eq!(strategy.search(&lexicon), "");
        }
    }
    assert_eq!(parallel(&lexicon, 3, ResultOrdering::FirstFound), "");
    Ok(())
}

#[test]
fn test_scenario_d_empty_dictionary() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.txt");
    File::create(&path)?;

    for mode in [SearchMode::Sequential, SearchMode::Parallel] {
        let config = FinderConfig {
            mode,
            ..FinderConfig::new(&path)
        };
        assert!(matches!(
            compword::run(&config),
            Err(FinderError::EmptyLexicon)
        ));
    }
    Ok(())
}

#[test]
fn test_result_is_a_longest_compound_word() -> Result<()> {
    let words = synthetic_words();
    let lexicon = Lexicon::build(words.clone())?;
    let expected_len = longest_compound_length(&words, &lexicon, SplitBound::Strict);
    assert_eq!(expected_len, 11);

    let word = sequential(&lexicon, SplitBound::Strict);
    assert_eq!(word.len(), expected_len);
    assert!(has_decomposition(&word, &lexicon, SplitBound::Strict));
    Ok(())
}

#[test]
fn test_sequential_and_parallel_agree() -> Result<()> {
    let words = synthetic_words();
    let lexicon = Lexicon::build(words)?;
    let expected = sequential(&lexicon, SplitBound::Strict);

    for workers in 1..=8 {
        assert_eq!(
            parallel(&lexicon, workers, ResultOrdering::LongestFirst),
            expected,
            "{} workers",
            workers
        );
    }
    Ok(())
}

#[test]
fn test_first_found_returns_a_valid_compound_word() -> Result<()> {
    let words = synthetic_words();
    let lexicon = Lexicon::build(words)?;

    for workers in [2, 4, 8] {
        let word = parallel(&lexicon, workers, ResultOrdering::FirstFound);
        assert!(!word.is_empty());
        assert!(lexicon.contains(&word));
        assert!(has_decomposition(&word, &lexicon, SplitBound::Strict));
    }
    Ok(())
}

#[test]
fn test_repeated_searches_are_idempotent() -> Result<()> {
    let words = synthetic_words();
    let lexicon = Lexicon::build(words)?;

    let first = sequential(&lexicon, SplitBound::Strict);
    for _ in 0..5 {
        assert_eq!(sequential(&lexicon, SplitBound::Strict), first);
        assert_eq!(parallel(&lexicon, 4, ResultOrdering::LongestFirst), first);
    }
    Ok(())
}

#[test]
fn test_run_from_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("words.txt");
    let mut file = File::create(&path)?;
    for word in ["Moon", "STAR", "sun", "moonstar", "moonstarsun", "zzzzzzzzzzzzzz"] {
        writeln!(file, "{}", word)?;
    }
    drop(file);

    let config = FinderConfig {
        mode: SearchMode::Parallel,
        thread_count: NonZeroUsize::new(3).unwrap(),
        // moonstar is compound too and may win a plain race
        result_ordering: ResultOrdering::LongestFirst,
        ..FinderConfig::new(&path)
    };
    let outcome = compword::run(&config)?;
    assert_eq!(outcome.word, "moonstarsun");
    assert_eq!(outcome.length, 11);
    assert_eq!(outcome.mode, SearchMode::Parallel);

    let outcome = compword::run(&FinderConfig::new(&path))?;
    assert_eq!(outcome.word, "moonstarsun");
    Ok(())
}

#[test]
fn test_find_longest_collects_stats() -> Result<()> {
    let lexicon = Lexicon::build(synthetic_words())?;
    let config = FinderConfig {
        mode: SearchMode::Parallel,
        thread_count: NonZeroUsize::new(4).unwrap(),
        result_ordering: ResultOrdering::LongestFirst,
        ..FinderConfig::default()
    };

    let outcome = find_longest(&config, &lexicon);
    assert!(outcome.is_found());
    assert!(outcome.stats.words_tested > 0);
    assert!(outcome.stats.buckets_processed > 0);
    Ok(())
}
