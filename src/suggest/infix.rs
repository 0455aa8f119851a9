//! Completion from any token position, with highlighted results.

use std::collections::hash_map::Entry as Slot;

use ahash::AHashMap;

use crate::data::{Entry, Fragment, LookupResult};
use crate::error::Result;
use crate::suggest::dictionary::{SuggestDictionary, TOKEN_SEPARATOR, join_tokens};
use crate::suggest::ranking;
use crate::suggest::SuggestConfig;

/// Matches the analyzed query against every token suffix of every entry, so
/// "lost" completes "love lost". Results carry highlight fragments splitting
/// the display text into matched and unmatched spans; when an entry matches
/// at several positions the leftmost one is highlighted.
#[derive(Debug)]
pub struct InfixSuggester {
    dict: SuggestDictionary,
}

/// How far a candidate's match extends, for highlighting.
struct MatchSpan {
    /// Token position in the entry where the match starts.
    pos: usize,
    /// Number of query tokens matched.
    len: usize,
    /// Typed byte length of the final query token.
    last_typed: usize,
}

impl InfixSuggester {
    pub fn build(
        config: &SuggestConfig,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<Self> {
        let dict =
            SuggestDictionary::build_infix(&config.index_analyzer, &config.query_analyzer, source)?;
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

        let mut spans: AHashMap<u64, MatchSpan> = AHashMap::new();
        if !query.completed.is_empty() {
            let last_typed = query.completed.last().map_or(0, |t| t.len());
            let joined = join_tokens(&query.completed);
            // Finished tokens match a suffix exactly (the 0x00 terminator
            // follows) or continue into further tokens.
            for terminator in ['\u{0}', TOKEN_SEPARATOR] {
                let mut prefix = joined.clone();
                prefix.push(terminator);
                self.collect(&prefix, query.completed.len(), last_typed, &mut spans);
            }
        }
        if let Some(seed) = &query.seed {
            let mut tokens = query.prelude.to_vec();
            tokens.push(seed.clone());
            self.collect(&join_tokens(&tokens), tokens.len(), seed.len(), &mut spans);
        }

        let ords: Vec<u64> = spans.keys().copied().collect();
        ranking::top_by_weight(ords, self.dict.entries(), limit)
            .into_iter()
            .map(|ord| {
                let mut result = self.dict.lookup_result(ord);
                if let Some(span) = spans.get(&ord) {
                    result.fragments = self.highlight(&result.key, span);
                }
                result
            })
            .collect()
    }

    fn collect(
        &self,
        prefix: &str,
        query_len: usize,
        last_typed: usize,
        spans: &mut AHashMap<u64, MatchSpan>,
    ) {
        for (_, value) in self.dict.search_prefix(prefix) {
            let ord = value >> 16;
            let span = MatchSpan {
                pos: (value & 0xFFFF) as usize,
                len: query_len,
                last_typed,
            };
            match spans.entry(ord) {
                Slot::Occupied(mut slot) => {
                    // Leftmost match wins; at equal position keep the longer
                    // highlight.
                    let prev = slot.get_mut();
                    if span.pos < prev.pos
                        || (span.pos == prev.pos && span.last_typed > prev.last_typed)
                    {
                        *prev = span;
                    }
                }
                Slot::Vacant(slot) => {
                    slot.insert(span);
                }
            }
        }
    }

    /// Split the display text into fragments by re-analyzing it with the
    /// index analyzer; offsets are byte positions into the surface text. The
    /// final matched token is highlighted only for the typed length.
    fn highlight(&self, text: &str, span: &MatchSpan) -> Vec<Fragment> {
        let tokens = self.dict.index_analyzer().analyze(text);
        let mut fragments = Vec::new();
        let mut cursor = 0;
        for (i, token) in tokens.iter().enumerate().skip(span.pos).take(span.len) {
            let start = token.start_offset;
            let end = if i == span.pos + span.len - 1 {
                clamp_to_boundary(text, start + span.last_typed, token.end_offset)
            } else {
                token.end_offset
            };
            if start > cursor {
                fragments.push(Fragment::plain(&text[cursor..start]));
            }
            fragments.push(Fragment::hit(&text[start..end]));
            cursor = end;
        }
        if cursor < text.len() {
            fragments.push(Fragment::plain(&text[cursor..]));
        }
        fragments
    }
}

/// Clamp `end` to `max` and back onto a character boundary.
fn clamp_to_boundary(text: &str, end: usize, max: usize) -> usize {
    let mut end = end.min(max);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}
