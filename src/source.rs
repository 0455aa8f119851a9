//! Bulk entry sources for suggester builds.
//!
//! Entries come from either a flat local file (one entry per line, fields
//! separated by the 0x1F unit separator) or a scan of stored document fields
//! as of a fixed index generation. Both sources are all-or-nothing: a single
//! malformed line or missing field aborts the whole build, since a silently
//! skipped entry would make rebuilds non-reproducible.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::{Entry, FieldValue};
use crate::error::{Result, SuggestError};

/// Field separator used by the local file format.
pub const UNIT_SEPARATOR: char = '\u{1f}';

/// Read-only view of a document store at a fixed generation.
///
/// Implemented by the host's index layer; the suggest core only pulls stored
/// field values through it.
pub trait DocumentStore: Send + Sync {
    /// Identifiers of all live documents as of `generation`.
    fn live_doc_ids(&self, generation: u64) -> Result<Vec<u64>>;

    /// Stored value of one field, or `None` if the document lacks it.
    fn read_stored_field(
        &self,
        generation: u64,
        doc_id: u64,
        field_name: &str,
    ) -> Result<Option<FieldValue>>;
}

/// Evaluates a compiled weight expression against a document's numeric
/// stored fields. Supplied by the host's expression compiler; the suggest
/// core never parses expression syntax itself.
pub trait WeightEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, generation: u64, doc_id: u64) -> Result<f64>;
}

/// Where a stored-field scan takes each entry's weight from.
#[derive(Clone)]
pub enum WeightSource {
    /// Read the weight directly from a stored field, truncating toward zero.
    Field(String),
    /// Compute the weight with an externally compiled expression.
    Expression {
        expression: String,
        evaluator: Arc<dyn WeightEvaluator>,
    },
}

impl std::fmt::Debug for WeightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightSource::Field(name) => f.debug_tuple("Field").field(name).finish(),
            WeightSource::Expression { expression, .. } => f
                .debug_struct("Expression")
                .field("expression", expression)
                .finish_non_exhaustive(),
        }
    }
}

/// Open a local entry file as a lazy sequence of entries.
///
/// Each line is `weight<0x1F>text<0x1F>payload` in UTF-8.
pub fn open_local_file<P: AsRef<Path>>(path: P) -> Result<LocalFileEntries> {
    let path = path.as_ref().to_path_buf();
    let file = File::open(&path).map_err(|e| {
        SuggestError::source(format!("cannot open {}: {}", path.display(), e))
    })?;
    Ok(LocalFileEntries {
        lines: BufReader::new(file).lines(),
        path,
        line_no: 0,
    })
}

/// Lazy iterator over entries in a local file.
pub struct LocalFileEntries {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    line_no: u64,
}

impl LocalFileEntries {
    fn malformed(&self, detail: &str) -> SuggestError {
        SuggestError::source(format!(
            "{} line {}: {}",
            self.path.display(),
            self.line_no,
            detail
        ))
    }

    fn parse_line(&self, line: &str) -> Result<Entry> {
        let fields: Vec<&str> = line.split(UNIT_SEPARATOR).collect();
        if fields.len() != 3 {
            return Err(self.malformed(&format!("expected 3 fields, found {}", fields.len())));
        }
        let weight = parse_weight(fields[0])
            .ok_or_else(|| self.malformed(&format!("invalid weight {:?}", fields[0])))?;
        Ok(Entry::new(fields[1], weight, fields[2].as_bytes().to_vec()))
    }
}

impl Iterator for LocalFileEntries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => {
                return Some(Err(SuggestError::source(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))));
            }
        };
        self.line_no += 1;
        Some(self.parse_line(&line))
    }
}

fn parse_weight(field: &str) -> Option<i64> {
    if let Ok(w) = field.parse::<i64>() {
        return Some(w);
    }
    // Fractional weights are truncated toward zero, matching stored-field
    // coercion.
    field.parse::<f64>().map(|w| w.trunc() as i64).ok()
}

/// Open a stored-field scan as a lazy sequence of entries.
pub fn open_stored_field_scan(
    store: Arc<dyn DocumentStore>,
    generation: u64,
    suggest_field: impl Into<String>,
    weight: WeightSource,
    payload_field: impl Into<String>,
) -> Result<StoredFieldEntries> {
    let doc_ids = store.live_doc_ids(generation)?;
    Ok(StoredFieldEntries {
        store,
        generation,
        suggest_field: suggest_field.into(),
        weight,
        payload_field: payload_field.into(),
        doc_ids: doc_ids.into_iter(),
    })
}

/// Lazy iterator over entries built from stored document fields.
pub struct StoredFieldEntries {
    store: Arc<dyn DocumentStore>,
    generation: u64,
    suggest_field: String,
    weight: WeightSource,
    payload_field: String,
    doc_ids: std::vec::IntoIter<u64>,
}

impl StoredFieldEntries {
    fn read_required(&self, doc_id: u64, field_name: &str) -> Result<FieldValue> {
        self.store
            .read_stored_field(self.generation, doc_id, field_name)?
            .ok_or_else(|| {
                SuggestError::source(format!(
                    "document {} is missing stored field {:?}",
                    doc_id, field_name
                ))
            })
    }

    fn entry_for(&self, doc_id: u64) -> Result<Entry> {
        let text_value = self.read_required(doc_id, &self.suggest_field)?;
        let text = text_value.as_text().ok_or_else(|| {
            SuggestError::source(format!(
                "document {}: field {:?} is not text",
                doc_id, self.suggest_field
            ))
        })?;
        let weight = match &self.weight {
            WeightSource::Field(name) => self
                .read_required(doc_id, name)?
                .as_integer()
                .ok_or_else(|| {
                    SuggestError::source(format!(
                        "document {}: field {:?} is not numeric",
                        doc_id, name
                    ))
                })?,
            WeightSource::Expression {
                expression,
                evaluator,
            } => evaluator
                .evaluate(expression, self.generation, doc_id)?
                .trunc() as i64,
        };
        let payload_value = self.read_required(doc_id, &self.payload_field)?;
        let payload = payload_value.as_text().ok_or_else(|| {
            SuggestError::source(format!(
                "document {}: field {:?} is not text",
                doc_id, self.payload_field
            ))
        })?;
        Ok(Entry::new(text, weight, payload.as_bytes().to_vec()))
    }
}

impl Iterator for StoredFieldEntries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let doc_id = self.doc_ids.next()?;
        Some(self.entry_for(doc_id))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ahash::AHashMap;
    use tempfile::TempDir;

    use super::*;

    fn write_source(dir: &TempDir, lines: &[String]) -> PathBuf {
        let path = dir.path().join("entries.txt");
        let mut f = File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_local_file_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            &[
                format!("5{US}lucene{US}foobar", US = UNIT_SEPARATOR),
                format!("15{US}love{US}foobar", US = UNIT_SEPARATOR),
            ],
        );

        let entries: Vec<Entry> = open_local_file(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "lucene");
        assert_eq!(entries[0].weight, 5);
        assert_eq!(entries[0].payload, b"foobar");
        assert_eq!(entries[1].text, "love");
        assert_eq!(entries[1].weight, 15);
    }

    #[test]
    fn test_fractional_weight_truncates() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, &[format!("9.75{US}pie{US}", US = UNIT_SEPARATOR)]);
        let entries: Vec<Entry> = open_local_file(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries[0].weight, 9);
    }

    #[test]
    fn test_malformed_line_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            &[
                format!("5{US}ok{US}p", US = UNIT_SEPARATOR),
                "no separators here".to_string(),
            ],
        );
        let res: Result<Vec<Entry>> = open_local_file(&path).unwrap().collect();
        let err = res.unwrap_err();
        assert!(matches!(err, SuggestError::Source(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_invalid_weight_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, &[format!("heavy{US}x{US}p", US = UNIT_SEPARATOR)]);
        let res: Result<Vec<Entry>> = open_local_file(&path).unwrap().collect();
        assert!(matches!(res.unwrap_err(), SuggestError::Source(_)));
    }

    #[derive(Debug)]
    struct MapStore {
        docs: Vec<AHashMap<String, FieldValue>>,
    }

    impl DocumentStore for MapStore {
        fn live_doc_ids(&self, _generation: u64) -> Result<Vec<u64>> {
            Ok((0..self.docs.len() as u64).collect())
        }

        fn read_stored_field(
            &self,
            _generation: u64,
            doc_id: u64,
            field_name: &str,
        ) -> Result<Option<FieldValue>> {
            Ok(self.docs[doc_id as usize].get(field_name).cloned())
        }
    }

    fn doc(text: &str, weight: i64, payload: &str) -> AHashMap<String, FieldValue> {
        let mut fields = AHashMap::new();
        fields.insert("title".to_string(), FieldValue::Text(text.to_string()));
        fields.insert("rank".to_string(), FieldValue::Int64(weight));
        fields.insert("extra".to_string(), FieldValue::Text(payload.to_string()));
        fields
    }

    #[test]
    fn test_stored_field_scan() {
        let store = Arc::new(MapStore {
            docs: vec![doc("love", 15, "foobar"), doc("lucene", 5, "foobar")],
        });
        let entries: Vec<Entry> = open_stored_field_scan(
            store,
            1,
            "title",
            WeightSource::Field("rank".to_string()),
            "extra",
        )
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "love");
        assert_eq!(entries[0].weight, 15);
        assert_eq!(entries[1].payload, b"foobar");
    }

    #[test]
    fn test_missing_field_aborts_scan() {
        let mut missing = doc("love", 15, "foobar");
        missing.remove("rank");
        let store = Arc::new(MapStore {
            docs: vec![missing],
        });
        let res: Result<Vec<Entry>> = open_stored_field_scan(
            store,
            1,
            "title",
            WeightSource::Field("rank".to_string()),
            "extra",
        )
        .unwrap()
        .collect();
        assert!(matches!(res.unwrap_err(), SuggestError::Source(_)));
    }

    struct DoubleRank;

    impl WeightEvaluator for DoubleRank {
        fn evaluate(&self, _expression: &str, _generation: u64, doc_id: u64) -> Result<f64> {
            Ok((doc_id as f64 + 1.0) * 2.5)
        }
    }

    #[test]
    fn test_expression_weight_truncates() {
        let store = Arc::new(MapStore {
            docs: vec![doc("a", 0, "p"), doc("b", 0, "p")],
        });
        let entries: Vec<Entry> = open_stored_field_scan(
            store,
            1,
            "title",
            WeightSource::Expression {
                expression: "rank * 2.5".to_string(),
                evaluator: Arc::new(DoubleRank),
            },
            "extra",
        )
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(entries[0].weight, 2);
        assert_eq!(entries[1].weight, 5);
    }
}
