//! Prefix completion tolerant of typos in the final query token.

use crate::data::{Entry, LookupResult};
use crate::error::Result;
use crate::suggest::dictionary::{SuggestDictionary, TOKEN_SEPARATOR, join_tokens};
use crate::suggest::ranking;
use crate::suggest::{FuzzyParams, SuggestConfig};
use crate::util::levenshtein::prefix_edit_distance;

/// Like the analyzing variant, but the prefix seed admits candidates within
/// a bounded edit distance instead of requiring an exact byte prefix.
///
/// Tolerance follows the classic fuzzy-completion defaults: up to one edit
/// with transpositions counted as single edits, the first character matched
/// exactly, and seeds shorter than three characters matched exactly
/// throughout. Admission is the only thing that changes; ranking still uses
/// entry weights alone.
#[derive(Debug)]
pub struct FuzzySuggester {
    dict: SuggestDictionary,
    params: FuzzyParams,
}

impl FuzzySuggester {
    pub fn build(
        config: &SuggestConfig,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<Self> {
        config.fuzzy.validate()?;
        let dict = SuggestDictionary::build_prefix(
            &config.index_analyzer,
            &config.query_analyzer,
            source,
        )?;
        Ok(Self {
            dict,
            params: config.fuzzy.clone(),
        })
    }

    pub fn from_dictionary(dict: SuggestDictionary, params: FuzzyParams) -> Self {
        Self { dict, params }
    }

    pub fn dictionary(&self) -> &SuggestDictionary {
        &self.dict
    }

    pub fn params(&self) -> &FuzzyParams {
        &self.params
    }

    pub fn lookup(&self, text: &str, limit: usize) -> Vec<LookupResult> {
        let query = self.dict.query_analyzer().analyze_for_completion(text);
        if query.is_empty() {
            return Vec::new();
        }

        let mut ords: Vec<u64> = Vec::new();
        if !query.completed.is_empty() {
            ords.extend(self.dict.search_tokens(&query.completed));
        }
        if let Some(seed) = &query.seed {
            ords.extend(self.seed_candidates(&query.prelude, seed));
        }

        ranking::top_by_weight(ords, self.dict.entries(), limit)
            .into_iter()
            .map(|ord| self.dict.lookup_result(ord))
            .collect()
    }

    /// Scan keys sharing the exact prelude plus the non-fuzzy prefix of the
    /// seed, admitting those whose token at the seed position is within
    /// tolerance.
    fn seed_candidates(&self, prelude: &[String], seed: &str) -> Vec<u64> {
        let nfp_end = char_boundary(seed, self.params.non_fuzzy_prefix as usize);
        let mut scan_prefix = join_tokens(prelude);
        if !prelude.is_empty() {
            scan_prefix.push(TOKEN_SEPARATOR);
        }
        scan_prefix.push_str(&seed[..nfp_end]);

        let mut out = Vec::new();
        for (key, value) in self.dict.search_prefix(&scan_prefix) {
            let key = String::from_utf8_lossy(&key);
            let Some(token) = key.split(TOKEN_SEPARATOR).nth(prelude.len()) else {
                continue;
            };
            if self.admits(seed, nfp_end, token) {
                out.push(value);
            }
        }
        out
    }

    fn admits(&self, seed: &str, nfp_end: usize, token: &str) -> bool {
        if token.starts_with(seed) {
            return true;
        }
        if seed.chars().count() < self.params.min_fuzzy_length as usize {
            return false;
        }
        if !token.starts_with(&seed[..nfp_end]) {
            return false;
        }
        // Distance applies past the exact prefix only.
        let dist = prefix_edit_distance(
            &seed[nfp_end..],
            &token[nfp_end..],
            self.params.transpositions,
        );
        dist <= self.params.max_edits as usize
    }
}

/// Byte index of the `n`-th character boundary, clamped to the string end.
fn char_boundary(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}
