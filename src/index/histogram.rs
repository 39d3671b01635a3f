//! Token histogram that remembers first-seen order.

use indexmap::IndexMap;

use crate::types::KeywordFrequency;

/// A unique-keyed token count table.
///
/// Counts live in an `IndexMap`, which iterates in the order tokens were
/// first inserted. Ranking sorts those entries stably, so tokens with equal
/// counts keep their first-seen order on every run.
#[derive(Debug, Clone, Default)]
pub struct TokenHistogram {
    counts: IndexMap<String, u64>,
}

impl TokenHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `token`.
    pub fn add(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_string(), 1);
            }
        }
    }

    /// Count every token in `tokens`, in order.
    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            self.add(token.as_ref());
        }
    }

    /// Count for `token`, or 0 if never seen.
    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(token, count)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// The `n` most frequent tokens, count descending, ties in first-seen order.
    pub fn top(&self, n: usize) -> Vec<KeywordFrequency> {
        let mut ranked: Vec<(&String, &u64)> = self.counts.iter().collect();
        // `sort_by` is stable; insertion order settles ties.
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(token, count)| KeywordFrequency::new(token.clone(), *count))
            .collect()
    }

    /// Consume into every entry, ranked as in [`top`](Self::top).
    pub fn into_frequencies(self) -> Vec<KeywordFrequency> {
        let mut entries: Vec<(String, u64)> = self.counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .map(|(token, frequency)| KeywordFrequency { token, frequency })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_first_seen_order() {
        let mut h = TokenHistogram::new();
        h.extend(["great", "battery", "life", "battery", "great", "camera"]);
        assert_eq!(h.len(), 4);
        assert_eq!(h.get("battery"), 2);
        assert_eq!(h.get("missing"), 0);
        assert_eq!(h.total(), 6);

        let order: Vec<&str> = h.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["great", "battery", "life", "camera"]);
    }

    #[test]
    fn test_top_breaks_ties_by_insertion() {
        let mut h = TokenHistogram::new();
        h.extend(["b", "a", "c", "a", "b", "d"]);
        let top = h.top(3);
        let tokens: Vec<&str> = top.iter().map(|k| k.token.as_str()).collect();
        // b and a both have 2; b was seen first.
        assert_eq!(tokens, vec!["b", "a", "c"]);
        assert_eq!(top[0].frequency, 2);
        assert_eq!(top[2].frequency, 1);
    }

    #[test]
    fn test_top_larger_than_len() {
        let mut h = TokenHistogram::new();
        h.add("only");
        assert_eq!(h.top(10).len(), 1);
        assert!(TokenHistogram::new().top(5).is_empty());
    }

    #[test]
    fn test_case_sensitive_keys() {
        let mut h = TokenHistogram::new();
        h.extend(["Battery", "battery"]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_into_frequencies_matches_top() {
        let mut h = TokenHistogram::new();
        h.extend(["x", "y", "y", "z", "x", "y"]);
        let all = h.top(usize::MAX);
        assert_eq!(h.into_frequencies(), all);
    }
}
