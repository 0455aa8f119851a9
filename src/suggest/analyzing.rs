//! Prefix completion over analyzed token sequences.

use crate::data::{Entry, LookupResult};
use crate::error::Result;
use crate::suggest::dictionary::{SuggestDictionary, join_tokens};
use crate::suggest::ranking;
use crate::suggest::SuggestConfig;

/// Completes queries whose analyzed tokens prefix an entry's token sequence.
///
/// The query is analyzed in completion mode: all tokens but the last must
/// match an entry's tokens exactly, and the last matches by prefix. Both the
/// completed interpretation and the raw prefix seed are searched, so a typed
/// stop word still completes ("the" reaches "theories take time") while a
/// finished one matches nothing ("the " has no seed and its completed form
/// is dropped).
#[derive(Debug)]
pub struct AnalyzingSuggester {
    dict: SuggestDictionary,
}

impl AnalyzingSuggester {
    pub fn build(
        config: &SuggestConfig,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<Self> {
        let dict = SuggestDictionary::build_prefix(
            &config.index_analyzer,
            &config.query_analyzer,
            source,
        )?;
        Ok(Self { dict })
    }

    pub fn from_dictionary(dict: SuggestDictionary) -> Self {
        Self { dict }
    }

    pub fn dictionary(&self) -> &SuggestDictionary {
        &self.dict
    }

    pub fn lookup(&self, text: &str, limit: usize) -> Vec<LookupResult> {
        let query = self.dict.query_analyzer().analyze_for_completion(text);
        if query.is_empty() {
            return Vec::new();
        }

        let mut ords: Vec<u64> = Vec::new();
        if !query.completed.is_empty() {
            // Finished tokens match exactly; only further tokens may follow.
            ords.extend(self.dict.search_tokens(&query.completed));
        }
        if let Some(seed) = &query.seed {
            let mut tokens = query.prelude.clone();
            tokens.push(seed.clone());
            let prefix = join_tokens(&tokens);
            ords.extend(self.dict.search_prefix(&prefix).into_iter().map(|(_, v)| v));
        }

        ranking::top_by_weight(ords, self.dict.entries(), limit)
            .into_iter()
            .map(|ord| self.dict.lookup_result(ord))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::SuggesterKind;

    fn build(entries: &[(&str, i64)]) -> AnalyzingSuggester {
        let config = SuggestConfig::new("s", SuggesterKind::Analyzing);
        let source = entries
            .iter()
            .map(|&(text, weight)| Ok(Entry::new(text, weight, b"foobar".to_vec())));
        AnalyzingSuggester::build(&config, source).unwrap()
    }

    fn corpus() -> AnalyzingSuggester {
        build(&[
            ("lucene", 5),
            ("lucifer", 10),
            ("love", 15),
            ("theories take time", 5),
            ("the time is now", 5),
        ])
    }

    #[test]
    fn test_single_letter_prefix() {
        let s = corpus();
        let results = s.lookup("l", 5);
        let keys: Vec<&str> = results.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["love", "lucifer", "lucene"]);
        let weights: Vec<i64> = results.iter().map(|r| r.weight).collect();
        assert_eq!(weights, [15, 10, 5]);
        assert!(results.iter().all(|r| r.payload == b"foobar"));
        assert!(results.iter().all(|r| r.fragments.is_empty()));
    }

    #[test]
    fn test_stop_word_prefix_still_completes() {
        let s = corpus();
        let results = s.lookup("the", 5);
        let keys: Vec<&str> = results.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["theories take time"]);
    }

    #[test]
    fn test_finished_stop_word_matches_nothing() {
        let s = corpus();
        assert!(s.lookup("the ", 5).is_empty());
    }

    #[test]
    fn test_multi_token_query() {
        let s = corpus();
        let results = s.lookup("theories tak", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, "theories take time");
    }

    #[test]
    fn test_finished_token_matches_exactly() {
        let config = SuggestConfig::new("s", SuggesterKind::Analyzing)
            .analyzer(crate::analysis::AnalyzerSpec::standard());
        let source = [("loved", 3), ("love lost", 9), ("love", 15)]
            .iter()
            .map(|&(text, weight)| Ok(Entry::new(text, weight, Vec::new())));
        let s = AnalyzingSuggester::build(&config, source).unwrap();

        // Still typing: "love" is a prefix of "loved" too.
        assert_eq!(s.lookup("love", 5).len(), 3);
        // Finished: "love" must match a whole token.
        let keys: Vec<String> = s.lookup("love ", 5).into_iter().map(|r| r.key).collect();
        assert_eq!(keys, ["love", "love lost"]);
    }

    #[test]
    fn test_limit() {
        let s = corpus();
        assert_eq!(s.lookup("l", 2).len(), 2);
    }

    #[test]
    fn test_no_match() {
        let s = corpus();
        assert!(s.lookup("zebra", 5).is_empty());
        assert!(s.lookup("", 5).is_empty());
    }
}
