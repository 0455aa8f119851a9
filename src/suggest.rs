//! Suggester variants, their configuration, and the build/lookup surface.

pub mod analyzing;
pub mod dictionary;
pub mod fuzzy;
pub mod infix;
pub mod ranking;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerSpec;
use crate::data::{Entry, LookupResult};
use crate::error::{Result, SuggestError};
use crate::suggest::analyzing::AnalyzingSuggester;
use crate::suggest::dictionary::SuggestDictionary;
use crate::suggest::fuzzy::FuzzySuggester;
use crate::suggest::infix::InfixSuggester;

/// Result-count cap applied when a lookup does not pass its own limit.
pub const DEFAULT_LOOKUP_LIMIT: usize = 5;

/// The matching discipline a suggester is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggesterKind {
    /// Analyzed-prefix completion.
    Analyzing,
    /// Prefix completion tolerant of edits in the final token.
    Fuzzy,
    /// Completion from any token position, with highlighting.
    Infix,
}

impl SuggesterKind {
    pub fn name(&self) -> &'static str {
        match self {
            SuggesterKind::Analyzing => "analyzing",
            SuggesterKind::Fuzzy => "fuzzy",
            SuggesterKind::Infix => "infix",
        }
    }
}

impl std::fmt::Display for SuggesterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tolerance knobs for the fuzzy variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyParams {
    /// Maximum edits allowed in the seed; at most 2.
    pub max_edits: u32,
    /// Count adjacent transpositions as single edits.
    pub transpositions: bool,
    /// Leading characters of the seed that must match exactly.
    pub non_fuzzy_prefix: u32,
    /// Seeds shorter than this match exactly only.
    pub min_fuzzy_length: u32,
}

impl Default for FuzzyParams {
    fn default() -> Self {
        Self {
            max_edits: 1,
            transpositions: true,
            non_fuzzy_prefix: 1,
            min_fuzzy_length: 3,
        }
    }
}

impl FuzzyParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_edits > 2 {
            return Err(SuggestError::build(format!(
                "max_edits must be at most 2, got {}",
                self.max_edits
            )));
        }
        Ok(())
    }
}

/// Everything needed to build (or rebuild) a named suggester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Name the suggester is registered and persisted under.
    pub name: String,
    /// Matching discipline.
    pub kind: SuggesterKind,
    /// Analysis applied to entry text at build time.
    pub index_analyzer: AnalyzerSpec,
    /// Analysis applied to query text at lookup time.
    pub query_analyzer: AnalyzerSpec,
    /// Fuzzy tolerance; ignored by the other kinds.
    #[serde(default)]
    pub fuzzy: FuzzyParams,
}

impl SuggestConfig {
    /// A config with the English analysis chain on both sides.
    pub fn new(name: impl Into<String>, kind: SuggesterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            index_analyzer: AnalyzerSpec::english(),
            query_analyzer: AnalyzerSpec::english(),
            fuzzy: FuzzyParams::default(),
        }
    }

    pub fn index_analyzer(mut self, spec: AnalyzerSpec) -> Self {
        self.index_analyzer = spec;
        self
    }

    pub fn query_analyzer(mut self, spec: AnalyzerSpec) -> Self {
        self.query_analyzer = spec;
        self
    }

    /// Use the same analysis chain on both sides.
    pub fn analyzer(self, spec: AnalyzerSpec) -> Self {
        let spec2 = spec.clone();
        self.index_analyzer(spec).query_analyzer(spec2)
    }

    pub fn fuzzy(mut self, params: FuzzyParams) -> Self {
        self.fuzzy = params;
        self
    }
}

/// A built, immutable suggester of any kind.
///
/// Building is a bulk, replace-all operation; lookups are `&self` and safe
/// to run concurrently.
#[derive(Debug)]
pub enum Suggester {
    Analyzing(AnalyzingSuggester),
    Fuzzy(FuzzySuggester),
    Infix(InfixSuggester),
}

impl Suggester {
    /// Build a suggester from a bulk entry source.
    pub fn build(
        config: &SuggestConfig,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<Self> {
        match config.kind {
            SuggesterKind::Analyzing => {
                Ok(Suggester::Analyzing(AnalyzingSuggester::build(config, source)?))
            }
            SuggesterKind::Fuzzy => Ok(Suggester::Fuzzy(FuzzySuggester::build(config, source)?)),
            SuggesterKind::Infix => Ok(Suggester::Infix(InfixSuggester::build(config, source)?)),
        }
    }

    /// Ranked completions for partial query text.
    pub fn lookup(&self, text: &str, limit: usize) -> Vec<LookupResult> {
        match self {
            Suggester::Analyzing(s) => s.lookup(text, limit),
            Suggester::Fuzzy(s) => s.lookup(text, limit),
            Suggester::Infix(s) => s.lookup(text, limit),
        }
    }

    pub fn kind(&self) -> SuggesterKind {
        match self {
            Suggester::Analyzing(_) => SuggesterKind::Analyzing,
            Suggester::Fuzzy(_) => SuggesterKind::Fuzzy,
            Suggester::Infix(_) => SuggesterKind::Infix,
        }
    }

    pub(crate) fn dictionary(&self) -> &SuggestDictionary {
        match self {
            Suggester::Analyzing(s) => s.dictionary(),
            Suggester::Fuzzy(s) => s.dictionary(),
            Suggester::Infix(s) => s.dictionary(),
        }
    }

    /// Number of source entries consumed by the build.
    pub fn input_count(&self) -> u64 {
        self.dictionary().input_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_json() {
        for kind in [
            SuggesterKind::Analyzing,
            SuggesterKind::Fuzzy,
            SuggesterKind::Infix,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: SuggesterKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(serde_json::to_string(&SuggesterKind::Infix).unwrap(), "\"infix\"");
    }

    #[test]
    fn test_fuzzy_params_default_when_absent() {
        let config: SuggestConfig =
            serde_json::from_str(r#"{"name":"s","kind":"fuzzy","index_analyzer":{"tokenizer":"standard"},"query_analyzer":{"tokenizer":"standard"}}"#)
                .unwrap();
        assert_eq!(config.fuzzy, FuzzyParams::default());
    }

    #[test]
    fn test_dispatch_by_kind() {
        let source = || vec![Ok(Entry::new("love lost", 15, Vec::new()))];
        for kind in [
            SuggesterKind::Analyzing,
            SuggesterKind::Fuzzy,
            SuggesterKind::Infix,
        ] {
            let suggester = Suggester::build(&SuggestConfig::new("s", kind), source()).unwrap();
            assert_eq!(suggester.kind(), kind);
            assert_eq!(suggester.input_count(), 1);
            assert_eq!(suggester.lookup("love", DEFAULT_LOOKUP_LIMIT).len(), 1);
        }
    }
}
