//! The host-facing registry of named, servable suggesters.

use std::sync::Arc;

use ahash::AHashMap;
use log::{info, warn};
use parking_lot::RwLock;

use crate::data::{Entry, LookupResult};
use crate::error::{Result, SuggestError};
use crate::persist;
use crate::storage::Storage;
use crate::suggest::{DEFAULT_LOOKUP_LIMIT, SuggestConfig, Suggester};

/// Holds the active suggester for each name and the storage they persist to.
///
/// A rebuild runs entirely off-lock and swaps the name in atomically when it
/// succeeds, so the prior suggester keeps serving lookups during the build
/// and survives a failed one. Lookups against a name that was never built or
/// loaded are `NotFound`, never an empty result.
pub struct SuggestRegistry {
    storage: Arc<dyn Storage>,
    suggesters: RwLock<AHashMap<String, Arc<Suggester>>>,
}

impl SuggestRegistry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            suggesters: RwLock::new(AHashMap::new()),
        }
    }

    /// Build (or rebuild) the suggester for `config.name` from a bulk
    /// source; returns the number of entries consumed.
    pub fn build(
        &self,
        config: &SuggestConfig,
        source: impl IntoIterator<Item = Result<Entry>>,
    ) -> Result<u64> {
        let suggester = Suggester::build(config, source)?;
        let count = suggester.input_count();
        info!(
            "built suggester name={:?} kind={} entries={}",
            config.name, config.kind, count
        );
        self.suggesters
            .write()
            .insert(config.name.clone(), Arc::new(suggester));
        Ok(count)
    }

    /// Ranked completions from the named suggester.
    pub fn lookup(
        &self,
        name: &str,
        text: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LookupResult>> {
        let suggester = self.get(name)?;
        Ok(suggester.lookup(text, limit.unwrap_or(DEFAULT_LOOKUP_LIMIT)))
    }

    /// The active suggester registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<Suggester>> {
        self.suggesters
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SuggestError::not_found(format!("no suggester named {name:?}")))
    }

    /// Names of all active suggesters, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.suggesters.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Persist the named suggester to storage.
    pub fn save(&self, name: &str) -> Result<()> {
        let suggester = self.get(name)?;
        persist::save(self.storage.as_ref(), name, &suggester)
    }

    /// Persist every active suggester.
    pub fn save_all(&self) -> Result<()> {
        for name in self.names() {
            self.save(&name)?;
        }
        Ok(())
    }

    /// Restore the named suggester from storage and make it servable.
    pub fn load(&self, name: &str) -> Result<()> {
        let suggester = persist::load(self.storage.as_ref(), name)?;
        self.suggesters
            .write()
            .insert(name.to_string(), Arc::new(suggester));
        Ok(())
    }

    /// Restore every suggester blob found in storage; returns the names
    /// loaded. A blob that fails to load is logged and skipped so one
    /// corrupt suggester cannot keep the rest from starting.
    pub fn load_all(&self) -> Result<Vec<String>> {
        let mut loaded = Vec::new();
        for file in self.storage.list_files()? {
            let Some(name) = file.strip_suffix(persist::BLOB_EXTENSION) else {
                continue;
            };
            match self.load(name) {
                Ok(()) => loaded.push(name.to_string()),
                Err(e) => warn!("skipping suggester {name:?}: {e}"),
            }
        }
        Ok(loaded)
    }
}

impl std::fmt::Debug for SuggestRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestRegistry")
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}
