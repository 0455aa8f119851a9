//! Analyzer resolution and the completion analysis mode.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::analysis::token_filter::{self, TokenFilter};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Declarative description of an analysis chain.
///
/// Pure data: a tokenizer name plus an ordered list of filter names. Specs
/// are stored alongside a built suggester so the exact same pipeline can be
/// re-resolved after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerSpec {
    /// Tokenizer name; see [`Tokenizer::resolve`].
    pub tokenizer: String,
    /// Filter names applied in order; see [`TokenFilter::resolve`].
    #[serde(default)]
    pub token_filters: Vec<String>,
}

impl AnalyzerSpec {
    /// Build a spec from a tokenizer name and filter names.
    pub fn new<T, F>(tokenizer: T, token_filters: impl IntoIterator<Item = F>) -> Self
    where
        T: Into<String>,
        F: Into<String>,
    {
        Self {
            tokenizer: tokenizer.into(),
            token_filters: token_filters.into_iter().map(Into::into).collect(),
        }
    }

    /// English chain: standard tokenizer with possessive stripping,
    /// lowercasing, stop word removal, and Porter stemming.
    pub fn english() -> Self {
        Self::new(
            "standard",
            ["english_possessive", "lowercase", "stop", "porter_stem"],
        )
    }

    /// Standard chain: unicode word tokenization plus lowercasing.
    pub fn standard() -> Self {
        Self::new("standard", ["lowercase"])
    }

    /// Whitespace tokenization plus lowercasing.
    pub fn lowercase_whitespace() -> Self {
        Self::new("whitespace", ["lowercase"])
    }

    /// Resolve this spec into a runnable analyzer.
    pub fn resolve(&self) -> Result<Analyzer> {
        Analyzer::resolve(self)
    }
}

/// The analyzed form of a query in completion mode.
///
/// The final input token is interpreted two ways at once: run through the
/// full filter chain as a finished word (`completed` ends with it), and kept
/// as a raw prefix `seed` for a word still being typed. When the input ends
/// at a token boundary there is nothing mid-word to complete, so `seed` is
/// absent and only the completed interpretation applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionQuery {
    /// Fully analyzed tokens before the forked final token.
    pub prelude: Vec<String>,
    /// The complete-word interpretation: `prelude` plus the final token run
    /// through the full chain (possibly dropped as a stop word).
    pub completed: Vec<String>,
    /// The prefix-seed interpretation of the final token, exempt from stop
    /// word removal and stemming. Absent when the input ends at a boundary.
    pub seed: Option<String>,
}

impl CompletionQuery {
    /// True if neither interpretation produced anything to match.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.seed.is_none()
    }
}

/// A resolved analysis pipeline: tokenizer plus ordered filter chain.
#[derive(Debug, Clone)]
pub struct Analyzer {
    spec: AnalyzerSpec,
    tokenizer: Tokenizer,
    filters: Vec<TokenFilter>,
}

impl Analyzer {
    /// Resolve an analyzer from its declarative spec.
    pub fn resolve(spec: &AnalyzerSpec) -> Result<Self> {
        let tokenizer = Tokenizer::resolve(&spec.tokenizer)?;
        let filters = spec
            .token_filters
            .iter()
            .map(|name| TokenFilter::resolve(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            spec: spec.clone(),
            tokenizer,
            filters,
        })
    }

    /// The spec this analyzer was resolved from.
    pub fn spec(&self) -> &AnalyzerSpec {
        &self.spec
    }

    /// Plain analysis: tokenize and run the filter chain.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        self.run_filters(self.tokenizer.tokenize(text))
    }

    /// Completion analysis for query text.
    ///
    /// Forks the final token into a completed interpretation and a prefix
    /// seed (keyword-marked, so stop removal and stemming leave it alone).
    /// The seed exists only when the text ends inside the final token; a
    /// trailing separator closes the token boundary. Non-keyword English
    /// stop words are always dropped from the completed interpretation in
    /// this mode, whether or not the chain carries a stop filter: a typed
    /// stop word is either an in-progress prefix (the seed keeps it) or
    /// noise that would never start a useful completion.
    pub fn analyze_for_completion(&self, text: &str) -> CompletionQuery {
        let raw = self.tokenizer.tokenize(text);
        let Some((last, head)) = raw.split_last() else {
            return CompletionQuery::default();
        };
        let boundary_closed = last.end_offset < text.len();

        let prelude: Vec<String> = self
            .completion_filter(self.run_filters(head.to_vec()))
            .into_iter()
            .map(|t| t.text)
            .collect();

        let mut completed = prelude.clone();
        completed.extend(
            self.completion_filter(self.run_filters(vec![last.clone()]))
                .into_iter()
                .map(|t| t.text),
        );

        let seed = if boundary_closed {
            None
        } else {
            self.run_filters(vec![last.clone().keyword()])
                .into_iter()
                .next()
                .map(|t| t.text)
        };

        CompletionQuery {
            prelude,
            completed,
            seed,
        }
    }

    fn run_filters(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut out = tokens;
        for filter in &self.filters {
            out = out.into_iter().filter_map(|t| filter.apply(t)).collect();
        }
        out
    }

    /// The completion-mode stop pass; keyword-marked tokens survive.
    fn completion_filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|t| t.keyword || !token_filter::is_stop_word(&t.text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_english_chain() {
        let analyzer = AnalyzerSpec::english().resolve().unwrap();
        let tokens = analyzer.analyze("The time is now");
        assert_eq!(texts(&tokens), ["time", "now"]);
        let tokens = analyzer.analyze("Theories take time");
        assert_eq!(texts(&tokens), ["theori", "take", "time"]);
    }

    #[test]
    fn test_completion_forks_last_token() {
        let spec = AnalyzerSpec::new(
            "standard",
            ["english_possessive", "lowercase", "porter_stem"],
        );
        let analyzer = spec.resolve().unwrap();

        let q = analyzer.analyze_for_completion("the");
        // "the" is dropped from the completed interpretation as a stop word
        // but survives as the keyword-marked prefix seed, unstemmed.
        assert!(q.completed.is_empty());
        assert_eq!(q.seed.as_deref(), Some("the"));
        assert!(q.prelude.is_empty());
    }

    #[test]
    fn test_completion_closed_boundary_has_no_seed() {
        let analyzer = AnalyzerSpec::standard().resolve().unwrap();
        let q = analyzer.analyze_for_completion("the ");
        assert!(q.seed.is_none());
        assert!(q.completed.is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn test_completion_seed_is_not_stemmed() {
        let spec = AnalyzerSpec::new("standard", ["lowercase", "porter_stem"]);
        let analyzer = spec.resolve().unwrap();
        let q = analyzer.analyze_for_completion("Theories");
        assert_eq!(q.completed, ["theori"]);
        assert_eq!(q.seed.as_deref(), Some("theories"));
    }

    #[test]
    fn test_completion_with_prelude() {
        let analyzer = AnalyzerSpec::standard().resolve().unwrap();
        let q = analyzer.analyze_for_completion("theories take t");
        assert_eq!(q.prelude, ["theories", "take"]);
        assert_eq!(q.completed, ["theories", "take", "t"]);
        assert_eq!(q.seed.as_deref(), Some("t"));
    }

    #[test]
    fn test_empty_input() {
        let analyzer = AnalyzerSpec::standard().resolve().unwrap();
        assert!(analyzer.analyze_for_completion("").is_empty());
        assert!(analyzer.analyze_for_completion("   ").is_empty());
    }

    #[test]
    fn test_spec_round_trips_through_json() {
        let spec = AnalyzerSpec::english();
        let json = serde_json::to_string(&spec).unwrap();
        let back: AnalyzerSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
