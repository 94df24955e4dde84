use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::errors::{FinderError, FinderResult};

/// Identifies a bucket: all words sharing a first character and a length.
///
/// Lengths are byte lengths of the UTF-8 encoding, the same unit used for
/// split points in the decomposition test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub first: char,
    pub len: usize,
}

impl BucketKey {
    /// Computes the key of a word, `None` for the empty string
    pub fn of(word: &str) -> Option<Self> {
        word.chars().next().map(|first| Self {
            first,
            len: word.len(),
        })
    }
}

/// Segmented, read-only word store.
///
/// Words are split into buckets by [`BucketKey`] so that a membership test
/// only binary-searches the handful of words sharing the probe's first
/// character and length. Keys are kept in a separate list ordered longest
/// first, which is the order both search strategies walk.
#[derive(Debug, Clone)]
pub struct Lexicon {
    buckets: HashMap<BucketKey, Vec<String>>,
    sorted_keys: Vec<BucketKey>,
    min_word_length: usize,
    word_count: usize,
}

impl Lexicon {
    /// Builds the store from already normalized words.
    ///
    /// Duplicates and unsorted input are tolerated; empty strings are ignored.
    /// Fails with [`FinderError::EmptyLexicon`] when no word remains.
    pub fn build<I, S>(words: I) -> FinderResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buckets: HashMap<BucketKey, Vec<String>> = HashMap::new();
        let mut sorted_keys = Vec::new();
        let mut seen = HashSet::new();
        let mut word_count = 0;

        for word in words {
            let word = word.into();
            let Some(key) = BucketKey::of(&word) else {
                continue;
            };
            if seen.insert(key) {
                sorted_keys.push(key);
            }
            buckets.entry(key).or_default().push(word);
            word_count += 1;
        }

        // Stable, so equal lengths keep first-seen order
        sorted_keys.sort_by(|a, b| b.len.cmp(&a.len));

        let min_word_length = sorted_keys
            .last()
            .map(|key| key.len)
            .ok_or(FinderError::EmptyLexicon)?;

        buckets
            .par_iter_mut()
            .for_each(|(_, bucket)| bucket.sort_unstable());

        debug!(
            "Lexicon built: {} words in {} buckets, shortest word {} bytes",
            word_count,
            sorted_keys.len(),
            min_word_length
        );

        Ok(Self {
            buckets,
            sorted_keys,
            min_word_length,
            word_count,
        })
    }

    /// Exact membership test
    pub fn contains(&self, word: &str) -> bool {
        BucketKey::of(word)
            .and_then(|key| self.buckets.get(&key))
            .is_some_and(|bucket| {
                bucket
                    .binary_search_by(|probe| probe.as_str().cmp(word))
                    .is_ok()
            })
    }

    /// Bucket keys, longest words first
    pub fn sorted_keys(&self) -> &[BucketKey] {
        &self.sorted_keys
    }

    /// Words of a bucket in sorted order, empty if the key does not occur
    pub fn bucket(&self, key: &BucketKey) -> &[String] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length of the shortest word in the store
    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    pub fn bucket_count(&self) -> usize {
        self.sorted_keys.len()
    }

    /// Number of words loaded, duplicates included
    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_groups_words_into_buckets() {
        let lexicon = Lexicon::build(["dog", "cat", "cow", "catdog", "ant"]).unwrap();

        assert_eq!(lexicon.word_count(), 5);
        assert_eq!(lexicon.bucket_count(), 4);
        assert_eq!(lexicon.min_word_length(), 3);

        let c3 = BucketKey { first: 'c', len: 3 };
        assert_eq!(lexicon.bucket(&c3), ["cat".to_string(), "cow".to_string()]);
        assert!(lexicon.bucket(&BucketKey { first: 'z', len: 3 }).is_empty());
    }

    #[test]
    fn test_keys_sorted_longest_first_without_duplicates() {
        let lexicon = Lexicon::build(["a", "bb", "abc", "b", "ab", "abc", "c"]).unwrap();
        let lengths: Vec<usize> = lexicon.sorted_keys().iter().map(|k| k.len).collect();

        assert_eq!(lengths, vec![3, 2, 2, 1, 1, 1]);

        let unique: HashSet<_> = lexicon.sorted_keys().iter().collect();
        assert_eq!(unique.len(), lexicon.sorted_keys().len());
        for key in lexicon.sorted_keys() {
            assert!(!lexicon.bucket(key).is_empty());
        }
    }

    #[test]
    fn test_equal_lengths_keep_first_seen_order() {
        let lexicon = Lexicon::build(["zz", "aa", "mm"]).unwrap();
        let firsts: Vec<char> = lexicon.sorted_keys().iter().map(|k| k.first).collect();
        assert_eq!(firsts, vec!['z', 'a', 'm']);
    }

    #[test]
    fn test_contains() {
        let lexicon = Lexicon::build(["pear", "peach", "plum", "apple"]).unwrap();

        assert!(lexicon.contains("pear"));
        assert!(lexicon.contains("peach"));
        assert!(!lexicon.contains("peak"));
        assert!(!lexicon.contains("banana"));
        assert!(!lexicon.contains(""));
    }

    #[test]
    fn test_multibyte_words() {
        let lexicon = Lexicon::build(["über", "ab"]).unwrap();

        assert!(lexicon.contains("über"));
        assert_eq!(
            BucketKey::of("über"),
            Some(BucketKey { first: 'ü', len: 5 })
        );
        assert_eq!(lexicon.min_word_length(), 2);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result = Lexicon::build(Vec::<String>::new());
        assert!(matches!(result, Err(FinderError::EmptyLexicon)));

        let result = Lexicon::build(["", ""]);
        assert!(matches!(result, Err(FinderError::EmptyLexicon)));
    }
}
