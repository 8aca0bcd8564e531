//! Text normalization into terms.

use lazy_static::lazy_static;
use regex::Regex;

use crate::vectorizer::term::TermFrequency;

lazy_static! {
    // `\w` and `\s` are Unicode-aware in the regex crate.
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
}

/// Split text into normalized terms.
///
/// Lowercases the input, replaces every character that is neither a Unicode
/// word character nor whitespace with a space, then splits on whitespace.
/// Token order is preserved. Empty or punctuation-only input yields an
/// empty vector.
///
/// ```
/// use tfidf_index::tokenize;
/// assert_eq!(tokenize("The Cat, sat!"), vec!["the", "cat", "sat"]);
/// assert!(tokenize("?!...").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Tokenize and count occurrences in one step.
pub fn term_frequency(text: &str) -> TermFrequency {
    let mut freq = TermFrequency::new();
    freq.add_terms(&tokenize(text));
    freq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's RUST-lang."),
            vec!["hello", "world", "it", "s", "rust", "lang"]
        );
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
        assert!(tokenize("--- ... !!! ???").is_empty());
    }

    #[test]
    fn keeps_unicode_letters_and_drops_symbols() {
        assert_eq!(tokenize("Café naïve 東京 🦀 rocks"), vec!["café", "naïve", "東京", "rocks"]);
        assert_eq!(tokenize("snake_case x2"), vec!["snake_case", "x2"]);
    }

    #[test]
    fn emoji_between_letters_splits_terms() {
        assert_eq!(tokenize("rust🦀lang"), vec!["rust", "lang"]);
    }

    #[test]
    fn retokenizing_output_is_stable() {
        let inputs = ["The cat SAT on the mat.", "a—b c…d", "ÀÉÎ õü", "x_y 42 z"];
        for input in inputs {
            let once = tokenize(input);
            let twice = tokenize(&once.join(" "));
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let text = "Repeat, repeat; REPEAT!";
        assert_eq!(tokenize(text), tokenize(text));
        assert_eq!(term_frequency(text).term_count("repeat"), 3);
    }
}
