//! Shared built state behind every suggester variant.
//!
//! A dictionary is the immutable product of a bulk build: the surviving
//! entry table sorted by normalized key, an [`fst::Map`] from key bytes to
//! entry ordinal, the analyzer specs the build used, and the count of
//! consumed inputs. Table order and ordinal order coincide, so ordinals
//! double as the deterministic tie-break during ranking.

use std::collections::hash_map::Entry as Slot;

use ahash::AHashMap;
use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Map, MapBuilder, Streamer};

use crate::analysis::{Analyzer, AnalyzerSpec};
use crate::data::{Entry, LookupResult};
use crate::error::{Result, SuggestError};
use crate::storage::structured::{StructReader, StructWriter};

/// Separator between analyzed tokens inside a map key. Sorts below every
/// printable character, so shorter token sequences order before their
/// extensions.
pub const TOKEN_SEPARATOR: char = '\u{1f}';

/// Terminator between a suffix key's token text and its ordinal suffix.
/// Sorts below [`TOKEN_SEPARATOR`], keeping `"lost"` suffix keys ahead of
/// `"lost<sep>time"` ones.
const SUFFIX_TERMINATOR: u8 = 0x00;

/// Join analyzed token texts into map-key form.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(&TOKEN_SEPARATOR.to_string())
}

/// A deduplicated entry retained in the dictionary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Surface text, returned verbatim in results.
    pub text: String,
    /// Ranking weight.
    pub weight: i64,
    /// Payload of the winning input entry.
    pub payload: Vec<u8>,
}

/// Immutable built state shared by all suggester variants.
pub struct SuggestDictionary {
    index_spec: AnalyzerSpec,
    query_spec: AnalyzerSpec,
    index_analyzer: Analyzer,
    query_analyzer: Analyzer,
    entries: Vec<StoredEntry>,
    map: Map<Vec<u8>>,
    input_count: u64,
}

impl std::fmt::Debug for SuggestDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestDictionary")
            .field("entries", &self.entries.len())
            .field("input_count", &self.input_count)
            .finish_non_exhaustive()
    }
}

/// Intermediate per-entry row before the variant-specific map is built.
struct TableRow {
    key: String,
    tokens: Vec<String>,
    entry: StoredEntry,
}

impl SuggestDictionary {
    /// Build with full-key mapping, as used by the prefix-matching variants.
    pub fn build_prefix(
        index_spec: &AnalyzerSpec,
        query_spec: &AnalyzerSpec,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<Self> {
        let index_analyzer = index_spec.resolve()?;
        let query_analyzer = query_spec.resolve()?;
        let (rows, input_count) = collect_table(&index_analyzer, source)?;

        let mut builder = MapBuilder::memory();
        for (ord, row) in rows.iter().enumerate() {
            builder
                .insert(row.key.as_bytes(), ord as u64)
                .map_err(|e| SuggestError::build(format!("map construction failed: {e}")))?;
        }
        Ok(Self::assemble(
            index_spec.clone(),
            query_spec.clone(),
            index_analyzer,
            query_analyzer,
            rows,
            builder.into_map(),
            input_count,
        ))
    }

    /// Build with one key per token suffix of every entry, as used by the
    /// infix variant.
    ///
    /// Each suffix key is `join(tokens[i..])` terminated by a 0x00 byte and
    /// the entry ordinal, which keeps keys unique across entries sharing a
    /// suffix. The value packs `ordinal << 16 | i` so a lookup recovers both
    /// the entry and the matched token position.
    pub fn build_infix(
        index_spec: &AnalyzerSpec,
        query_spec: &AnalyzerSpec,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<Self> {
        let index_analyzer = index_spec.resolve()?;
        let query_analyzer = query_spec.resolve()?;
        let (rows, input_count) = collect_table(&index_analyzer, source)?;

        let mut pairs: Vec<(Vec<u8>, u64)> = Vec::new();
        for (ord, row) in rows.iter().enumerate() {
            // Token positions must fit the 16-bit slot in the packed value.
            for i in 0..row.tokens.len().min(1 << 16) {
                let mut key = join_tokens(&row.tokens[i..]).into_bytes();
                key.push(SUFFIX_TERMINATOR);
                key.extend_from_slice(&(ord as u32).to_be_bytes());
                pairs.push((key, ((ord as u64) << 16) | i as u64));
            }
        }
        pairs.sort();

        let mut builder = MapBuilder::memory();
        for (key, value) in &pairs {
            builder
                .insert(key, *value)
                .map_err(|e| SuggestError::build(format!("map construction failed: {e}")))?;
        }
        Ok(Self::assemble(
            index_spec.clone(),
            query_spec.clone(),
            index_analyzer,
            query_analyzer,
            rows,
            builder.into_map(),
            input_count,
        ))
    }

    fn assemble(
        index_spec: AnalyzerSpec,
        query_spec: AnalyzerSpec,
        index_analyzer: Analyzer,
        query_analyzer: Analyzer,
        rows: Vec<TableRow>,
        map: Map<Vec<u8>>,
        input_count: u64,
    ) -> Self {
        Self {
            index_spec,
            query_spec,
            index_analyzer,
            query_analyzer,
            entries: rows.into_iter().map(|r| r.entry).collect(),
            map,
            input_count,
        }
    }

    pub fn index_spec(&self) -> &AnalyzerSpec {
        &self.index_spec
    }

    pub fn query_spec(&self) -> &AnalyzerSpec {
        &self.query_spec
    }

    pub fn index_analyzer(&self) -> &Analyzer {
        &self.index_analyzer
    }

    pub fn query_analyzer(&self) -> &Analyzer {
        &self.query_analyzer
    }

    pub fn entries(&self) -> &[StoredEntry] {
        &self.entries
    }

    pub fn entry(&self, ord: u64) -> &StoredEntry {
        &self.entries[ord as usize]
    }

    /// Number of source entries consumed by the build, duplicates included.
    pub fn input_count(&self) -> u64 {
        self.input_count
    }

    /// All `(key bytes, value)` pairs whose key starts with `prefix`.
    pub fn search_prefix(&self, prefix: &str) -> Vec<(Vec<u8>, u64)> {
        let automaton = Str::new(prefix).starts_with();
        let mut stream = self.map.search(automaton).into_stream();
        let mut out = Vec::new();
        while let Some((key, value)) = stream.next() {
            out.push((key.to_vec(), value));
        }
        out
    }

    /// Values for keys whose token sequence begins with exactly these
    /// tokens: the key equal to them, plus any key continuing with further
    /// tokens. Unlike [`search_prefix`](Self::search_prefix), the final
    /// token must match in full.
    pub fn search_tokens(&self, tokens: &[String]) -> Vec<u64> {
        let joined = join_tokens(tokens);
        let mut out = Vec::new();
        if let Some(value) = self.map.get(joined.as_bytes()) {
            out.push(value);
        }
        let mut continuation = joined;
        continuation.push(TOKEN_SEPARATOR);
        out.extend(
            self.search_prefix(&continuation)
                .into_iter()
                .map(|(_, v)| v),
        );
        out
    }

    /// A highlight-free result for the entry at `ord`.
    pub fn lookup_result(&self, ord: u64) -> LookupResult {
        let entry = self.entry(ord);
        LookupResult {
            key: entry.text.clone(),
            weight: entry.weight,
            payload: entry.payload.clone(),
            fragments: Vec::new(),
        }
    }

    /// Serialize the table, input count, and map into a structured writer.
    /// Analyzer specs are written by the caller ahead of this.
    pub fn write_to(&self, writer: &mut StructWriter) -> Result<()> {
        writer.write_u64(self.input_count)?;
        let count: u32 = self
            .entries
            .len()
            .try_into()
            .map_err(|_| SuggestError::persistence("entry table exceeds u32::MAX rows"))?;
        writer.write_u32(count)?;
        for entry in &self.entries {
            writer.write_bytes(entry.text.as_bytes())?;
            writer.write_i64(entry.weight)?;
            writer.write_bytes(&entry.payload)?;
        }
        writer.write_bytes(self.map.as_fst().as_bytes())?;
        Ok(())
    }

    /// Restore a dictionary from a structured reader, re-resolving the
    /// analyzers from their persisted specs.
    pub fn read_from(
        reader: &mut StructReader,
        index_spec: AnalyzerSpec,
        query_spec: AnalyzerSpec,
    ) -> Result<Self> {
        let index_analyzer = index_spec
            .resolve()
            .map_err(|e| SuggestError::persistence(format!("stored index analyzer: {e}")))?;
        let query_analyzer = query_spec
            .resolve()
            .map_err(|e| SuggestError::persistence(format!("stored query analyzer: {e}")))?;

        let input_count = reader.read_u64()?;
        let count = reader.read_u32()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let text = String::from_utf8(reader.read_bytes()?)
                .map_err(|_| SuggestError::persistence("entry text is not valid UTF-8"))?;
            let weight = reader.read_i64()?;
            let payload = reader.read_bytes()?;
            entries.push(StoredEntry {
                text,
                weight,
                payload,
            });
        }
        let map = Map::new(reader.read_bytes()?)
            .map_err(|e| SuggestError::persistence(format!("stored map is invalid: {e}")))?;

        Ok(Self {
            index_spec,
            query_spec,
            index_analyzer,
            query_analyzer,
            entries,
            map,
            input_count,
        })
    }
}

/// Drain the source, analyze each entry, and collapse duplicates.
///
/// Entries sharing a normalized key keep the highest weight; equal weights
/// keep the first seen. Entries that analyze to zero tokens are consumed and
/// counted but never matchable. An empty source is a build error.
fn collect_table(
    index_analyzer: &Analyzer,
    source: impl IntoIterator<Item = Result<Entry>>,
) -> Result<(Vec<TableRow>, u64)> {
    let mut by_key: AHashMap<String, TableRow> = AHashMap::new();
    let mut input_count = 0u64;

    for entry in source {
        let entry = entry?;
        input_count += 1;
        let tokens: Vec<String> = index_analyzer
            .analyze(&entry.text)
            .into_iter()
            .map(|t| t.text)
            .collect();
        if tokens.is_empty() {
            continue;
        }
        let key = join_tokens(&tokens);
        let row = TableRow {
            key: key.clone(),
            tokens,
            entry: StoredEntry {
                text: entry.text,
                weight: entry.weight,
                payload: entry.payload,
            },
        };
        match by_key.entry(key) {
            Slot::Vacant(slot) => {
                slot.insert(row);
            }
            Slot::Occupied(mut slot) => {
                if row.entry.weight > slot.get().entry.weight {
                    slot.insert(row);
                }
            }
        }
    }

    if input_count == 0 {
        return Err(SuggestError::build("source produced no entries"));
    }

    let mut rows: Vec<TableRow> = by_key.into_values().collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    Ok((rows, input_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, weight: i64) -> Result<Entry> {
        Ok(Entry::new(text, weight, b"p".to_vec()))
    }

    fn build(entries: Vec<Result<Entry>>) -> SuggestDictionary {
        SuggestDictionary::build_prefix(&AnalyzerSpec::english(), &AnalyzerSpec::english(), entries)
            .unwrap()
    }

    #[test]
    fn test_table_in_key_order() {
        let dict = build(vec![entry("lucene", 5), entry("love", 15), entry("lucifer", 10)]);
        assert_eq!(dict.input_count(), 3);
        let texts: Vec<&str> = dict.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["love", "lucene", "lucifer"]);
    }

    #[test]
    fn test_duplicate_key_keeps_highest_weight() {
        let dict = build(vec![entry("Lovers", 3), entry("lover", 9), entry("lover", 9)]);
        // "lovers" and "lover" both stem to "lover".
        assert_eq!(dict.input_count(), 3);
        assert_eq!(dict.entries().len(), 1);
        assert_eq!(dict.entries()[0].text, "lover");
        assert_eq!(dict.entries()[0].weight, 9);
    }

    #[test]
    fn test_empty_source_is_build_error() {
        let err = SuggestDictionary::build_prefix(
            &AnalyzerSpec::english(),
            &AnalyzerSpec::english(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SuggestError::Build(_)));
    }

    #[test]
    fn test_source_error_propagates() {
        let entries = vec![entry("ok", 1), Err(SuggestError::source("bad line"))];
        let err = SuggestDictionary::build_prefix(
            &AnalyzerSpec::english(),
            &AnalyzerSpec::english(),
            entries,
        )
        .unwrap_err();
        assert!(matches!(err, SuggestError::Source(_)));
    }

    #[test]
    fn test_prefix_search() {
        let dict = build(vec![
            entry("lucene", 5),
            entry("love", 15),
            entry("theories take time", 5),
        ]);
        let hits = dict.search_prefix("l");
        assert_eq!(hits.len(), 2);
        let hits = dict.search_prefix("theori");
        assert_eq!(hits.len(), 1);
        assert_eq!(dict.entry(hits[0].1).text, "theories take time");
    }

    #[test]
    fn test_search_tokens_requires_full_final_token() {
        let dict = SuggestDictionary::build_prefix(
            &AnalyzerSpec::standard(),
            &AnalyzerSpec::standard(),
            vec![entry("loved", 3), entry("love lost", 9), entry("love", 15)],
        )
        .unwrap();
        let ords = dict.search_tokens(&["love".to_string()]);
        let texts: Vec<&str> = ords.iter().map(|&o| dict.entry(o).text.as_str()).collect();
        assert_eq!(texts, ["love", "love lost"]);
        // A byte-prefix search would also reach "loved".
        assert_eq!(dict.search_prefix("love").len(), 3);
    }

    #[test]
    fn test_infix_suffix_keys() {
        let dict = SuggestDictionary::build_infix(
            &AnalyzerSpec::english(),
            &AnalyzerSpec::english(),
            vec![entry("love lost", 15)],
        )
        .unwrap();
        let hits = dict.search_prefix("lost");
        assert_eq!(hits.len(), 1);
        let (ord, pos) = (hits[0].1 >> 16, (hits[0].1 & 0xFFFF) as usize);
        assert_eq!(dict.entry(ord).text, "love lost");
        assert_eq!(pos, 1);
    }
}
