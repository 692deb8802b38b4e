//! Word counting for text files.

use serde::Serialize;
use std::collections::HashMap;

/// How often one word appears.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// The result of counting the words of a text.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WordStats {
    total: usize,
    frequencies: HashMap<String, usize>,
}

impl WordStats {
    /// Number of words, counting repeats.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct words.
    pub fn distinct(&self) -> usize {
        self.frequencies.len()
    }

    pub fn count_of(&self, word: &str) -> usize {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    /// The `n` most frequent words, most frequent first. Words with the same count are ordered
    /// alphabetically.
    pub fn top(&self, n: usize) -> Vec<WordCount> {
        let mut ranked: Vec<WordCount> = self
            .frequencies
            .iter()
            .map(|(word, &count)| WordCount {
                word: word.clone(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        ranked.truncate(n);
        ranked
    }
}

/// Splits `text` on Unicode whitespace and counts the pieces. Words are compared exactly, so
/// `Hola` and `hola` are different words.
pub fn count_words(text: &str) -> WordStats {
    let mut stats = WordStats::default();
    for word in text.split_whitespace() {
        stats.total += 1;
        *stats.frequencies.entry(word.to_string()).or_insert(0) += 1;
    }
    stats
}
