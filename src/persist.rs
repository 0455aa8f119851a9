//! Saving built suggesters and restoring them after a restart.
//!
//! One blob per suggester, named `{name}.suggest`, written through the
//! checksummed structured codec. Layout: magic, format version, kind tag,
//! fuzzy params (fuzzy kind only), both analyzer specs as JSON, then the
//! dictionary table and map. A load never decodes best-effort: bad magic,
//! unknown version or kind, or a checksum mismatch all fail that name with
//! a `Persistence` error, and a missing blob is `NotFound`.

use log::{debug, info};

use crate::analysis::AnalyzerSpec;
use crate::error::{Result, SuggestError};
use crate::storage::Storage;
use crate::storage::structured::{StructReader, StructWriter};
use crate::suggest::analyzing::AnalyzingSuggester;
use crate::suggest::dictionary::SuggestDictionary;
use crate::suggest::fuzzy::FuzzySuggester;
use crate::suggest::infix::InfixSuggester;
use crate::suggest::{FuzzyParams, Suggester, SuggesterKind};

const MAGIC: u32 = u32::from_le_bytes(*b"SGST");
const FORMAT_VERSION: u32 = 1;

/// File extension shared by all suggester blobs.
pub const BLOB_EXTENSION: &str = ".suggest";

/// Blob name a suggester persists under.
pub fn blob_name(name: &str) -> String {
    format!("{name}{BLOB_EXTENSION}")
}

fn kind_tag(kind: SuggesterKind) -> u8 {
    match kind {
        SuggesterKind::Analyzing => 0,
        SuggesterKind::Fuzzy => 1,
        SuggesterKind::Infix => 2,
    }
}

fn kind_from_tag(tag: u8) -> Result<SuggesterKind> {
    match tag {
        0 => Ok(SuggesterKind::Analyzing),
        1 => Ok(SuggesterKind::Fuzzy),
        2 => Ok(SuggesterKind::Infix),
        _ => Err(SuggestError::persistence(format!(
            "unknown suggester kind tag {tag}"
        ))),
    }
}

fn write_json<T: serde::Serialize>(writer: &mut StructWriter, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| SuggestError::persistence(format!("cannot encode spec: {e}")))?;
    writer.write_bytes(&bytes)
}

fn read_json<T: serde::de::DeserializeOwned>(reader: &mut StructReader) -> Result<T> {
    let bytes = reader.read_bytes()?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SuggestError::persistence(format!("cannot decode spec: {e}")))
}

/// Persist a built suggester under `name`.
///
/// The blob is written to a temporary name and renamed into place after the
/// checksum footer is durable, so a save that fails partway leaves any
/// previously saved blob untouched.
pub fn save(storage: &dyn Storage, name: &str, suggester: &Suggester) -> Result<()> {
    let blob = blob_name(name);
    let tmp_blob = format!("{blob}.tmp");
    let mut writer = StructWriter::new(storage.create_output(&tmp_blob)?);
    writer.write_u32(MAGIC)?;
    writer.write_u32(FORMAT_VERSION)?;
    writer.write_u8(kind_tag(suggester.kind()))?;
    if let Suggester::Fuzzy(fuzzy) = suggester {
        write_json(&mut writer, fuzzy.params())?;
    }
    let dict = suggester.dictionary();
    write_json(&mut writer, dict.index_spec())?;
    write_json(&mut writer, dict.query_spec())?;
    dict.write_to(&mut writer)?;
    writer.close()?;

    // Atomic replace
    storage.rename_file(&tmp_blob, &blob)?;
    info!(
        "saved suggester name={:?} kind={} entries={}",
        name,
        suggester.kind(),
        dict.entries().len()
    );
    Ok(())
}

/// Restore a suggester saved under `name`.
pub fn load(storage: &dyn Storage, name: &str) -> Result<Suggester> {
    let blob = blob_name(name);
    if !storage.file_exists(&blob) {
        return Err(SuggestError::not_found(format!(
            "no saved suggester named {name:?}"
        )));
    }
    let mut reader = StructReader::from_input(storage.open_input(&blob)?)?;

    let magic = reader.read_u32()?;
    if magic != MAGIC {
        return Err(SuggestError::persistence(format!(
            "bad magic {magic:#010x} in {blob}"
        )));
    }
    let version = reader.read_u32()?;
    if version != FORMAT_VERSION {
        return Err(SuggestError::persistence(format!(
            "unsupported format version {version} in {blob}"
        )));
    }
    let kind = kind_from_tag(reader.read_u8()?)?;
    let fuzzy: Option<FuzzyParams> = match kind {
        SuggesterKind::Fuzzy => Some(read_json(&mut reader)?),
        _ => None,
    };
    let index_spec: AnalyzerSpec = read_json(&mut reader)?;
    let query_spec: AnalyzerSpec = read_json(&mut reader)?;
    let dict = SuggestDictionary::read_from(&mut reader, index_spec, query_spec)?;
    debug!(
        "loaded suggester name={:?} kind={} entries={}",
        name,
        kind,
        dict.entries().len()
    );

    Ok(match kind {
        SuggesterKind::Analyzing => Suggester::Analyzing(AnalyzingSuggester::from_dictionary(dict)),
        SuggesterKind::Fuzzy => Suggester::Fuzzy(FuzzySuggester::from_dictionary(
            dict,
            fuzzy.unwrap_or_default(),
        )),
        SuggesterKind::Infix => Suggester::Infix(InfixSuggester::from_dictionary(dict)),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use super::*;
    use crate::data::Entry;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::{StorageInput, StorageOutput};
    use crate::suggest::SuggestConfig;

    fn sample(kind: SuggesterKind) -> Suggester {
        let source = vec![
            Ok(Entry::new("love", 15, b"foobar".to_vec())),
            Ok(Entry::new("lucene", 5, b"foobar".to_vec())),
        ];
        Suggester::build(&SuggestConfig::new("s", kind), source).unwrap()
    }

    #[test]
    fn test_round_trip_each_kind() {
        let storage = MemoryStorage::default();
        for kind in [
            SuggesterKind::Analyzing,
            SuggesterKind::Fuzzy,
            SuggesterKind::Infix,
        ] {
            let built = sample(kind);
            save(&storage, "s", &built).unwrap();
            let loaded = load(&storage, "s").unwrap();
            assert_eq!(loaded.kind(), kind);
            assert_eq!(loaded.input_count(), 2);
            let before = built.lookup("l", 5);
            let after = loaded.lookup("l", 5);
            assert_eq!(before, after);
        }
    }

    /// Storage whose outputs run out of space after a fixed byte budget.
    #[derive(Debug)]
    struct ShortWriteStorage {
        inner: Arc<MemoryStorage>,
        budget: usize,
    }

    impl Storage for ShortWriteStorage {
        fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
            Ok(Box::new(ShortWriteOutput {
                inner: self.inner.create_output(name)?,
                remaining: self.budget,
            }))
        }

        fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
            self.inner.open_input(name)
        }

        fn file_exists(&self, name: &str) -> bool {
            self.inner.file_exists(name)
        }

        fn delete_file(&self, name: &str) -> Result<()> {
            self.inner.delete_file(name)
        }

        fn rename_file(&self, from: &str, to: &str) -> Result<()> {
            self.inner.rename_file(from, to)
        }

        fn list_files(&self) -> Result<Vec<String>> {
            self.inner.list_files()
        }
    }

    struct ShortWriteOutput {
        inner: Box<dyn StorageOutput>,
        remaining: usize,
    }

    impl Write for ShortWriteOutput {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            if data.len() > self.remaining {
                return Err(std::io::Error::other("no space left on device"));
            }
            self.remaining -= data.len();
            self.inner.write(data)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.inner.flush()
        }
    }

    impl StorageOutput for ShortWriteOutput {
        fn flush_and_sync(&mut self) -> Result<()> {
            self.inner.flush_and_sync()
        }
    }

    #[test]
    fn test_failed_resave_keeps_previous_blob() {
        let storage = Arc::new(MemoryStorage::default());
        let built = sample(SuggesterKind::Analyzing);
        save(&*storage, "s", &built).unwrap();
        let before = built.lookup("l", 5);

        // A re-save that dies mid-write must not touch the live blob.
        let failing = ShortWriteStorage {
            inner: Arc::clone(&storage),
            budget: 10,
        };
        let err = save(&failing, "s", &sample(SuggesterKind::Analyzing)).unwrap_err();
        assert!(matches!(err, SuggestError::Io(_)));

        let loaded = load(&*storage, "s").unwrap();
        assert_eq!(loaded.lookup("l", 5), before);
    }

    #[test]
    fn test_missing_blob_is_not_found() {
        let storage = MemoryStorage::default();
        let err = load(&storage, "ghost").unwrap_err();
        assert!(matches!(err, SuggestError::NotFound(_)));
    }

    #[test]
    fn test_wrong_magic_is_persistence_error() {
        let storage = MemoryStorage::default();
        let mut writer = StructWriter::new(storage.create_output(&blob_name("s")).unwrap());
        writer.write_u32(0xDEAD_BEEF).unwrap();
        writer.close().unwrap();
        let err = load(&storage, "s").unwrap_err();
        assert!(matches!(err, SuggestError::Persistence(_)));
    }

    #[test]
    fn test_future_version_is_persistence_error() {
        let storage = MemoryStorage::default();
        let mut writer = StructWriter::new(storage.create_output(&blob_name("s")).unwrap());
        writer.write_u32(MAGIC).unwrap();
        writer.write_u32(FORMAT_VERSION + 1).unwrap();
        writer.close().unwrap();
        let err = load(&storage, "s").unwrap_err();
        assert!(matches!(err, SuggestError::Persistence(_)));
    }
}
