use std::collections::HashSet;
use std::ops::RangeInclusive;

use crate::config::SplitBound;
use crate::lexicon::Lexicon;

/// Substrings already proven to be neither a dictionary word nor compound.
///
/// Owned by exactly one search loop (the sequential scan or one worker).
pub type InvalidWords = HashSet<String>;

/// Recursive compound word test over a [`Lexicon`].
///
/// A word is compound when some split yields a prefix and a suffix that are
/// each either a dictionary word or compound themselves. Splits are tried
/// from the longest prefix inward and the first one that works wins.
///
/// Halves that fail are remembered in the caller's [`InvalidWords`] memo and
/// skipped on every later encounter, which is what keeps the recursion
/// affordable on large word lists. The memo only ever prunes work; an empty
/// memo gives the same answers.
#[derive(Debug, Clone, Copy)]
pub struct Decomposer<'a> {
    lexicon: &'a Lexicon,
    bound: SplitBound,
}

impl<'a> Decomposer<'a> {
    pub fn new(lexicon: &'a Lexicon, bound: SplitBound) -> Self {
        Self { lexicon, bound }
    }

    /// Byte offsets to split `word` at, in the order they are tried.
    ///
    /// The suffix is never shorter than the shortest dictionary word. With
    /// [`SplitBound::Strict`] the prefix is always strictly longer than it,
    /// with [`SplitBound::Inclusive`] it may be equal.
    pub fn split_points(&self, word: &str) -> std::iter::Rev<RangeInclusive<usize>> {
        let min = self.lexicon.min_word_length();
        let lowest = match self.bound {
            SplitBound::Strict => min + 1,
            SplitBound::Inclusive => min,
        };
        // An empty range when the word is too short to split
        let highest = word.len().saturating_sub(min);
        (lowest..=highest).rev()
    }

    /// Tests whether `word` splits into dictionary or compound words
    pub fn is_compound(&self, word: &str, memo: &mut InvalidWords) -> bool {
        for i in self.split_points(word) {
            if !word.is_char_boundary(i) {
                continue;
            }

            let (prefix, suffix) = word.split_at(i);
            if self.qualifies(prefix, memo) && self.qualifies(suffix, memo) {
                return true;
            }
        }

        false
    }

    /// A split half qualifies when it is a word or itself compound
    fn qualifies(&self, part: &str, memo: &mut InvalidWords) -> bool {
        if memo.contains(part) {
            return false;
        }

        if self.lexicon.contains(part) || self.is_compound(part, memo) {
            true
        } else {
            memo.insert(part.to_owned());
            false
        }
    }
}

/// Free-standing form of [`Decomposer::is_compound`]
pub fn is_compound(
    word: &str,
    memo: &mut InvalidWords,
    lexicon: &Lexicon,
    bound: SplitBound,
) -> bool {
    Decomposer::new(lexicon, bound).is_compound(word, memo)
}
