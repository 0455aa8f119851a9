//! Quickstart example - build a suggester, look up completions, and restart
//! from the saved blob.

use std::sync::Arc;

use tempfile::TempDir;

use sibyl::storage::file::FileStorageConfig;
use sibyl::storage::{StorageConfig, StorageFactory};
use sibyl::{Entry, Result, SuggestConfig, SuggestRegistry, SuggesterKind};

fn main() -> Result<()> {
    println!("=== Quickstart - Weighted Prefix Suggestions ===\n");

    // Create a storage backend for persistence
    let temp_dir = TempDir::new().unwrap();
    let storage =
        StorageFactory::create(StorageConfig::File(FileStorageConfig::new(temp_dir.path())))?;

    // Build a suggester from weighted entries
    let registry = SuggestRegistry::new(Arc::clone(&storage));
    let config = SuggestConfig::new("titles", SuggesterKind::Analyzing);
    let source = vec![
        Ok(Entry::new("lucene", 5, b"doc-1".to_vec())),
        Ok(Entry::new("lucifer", 10, b"doc-2".to_vec())),
        Ok(Entry::new("love", 15, b"doc-3".to_vec())),
        Ok(Entry::new("theories take time", 5, b"doc-4".to_vec())),
        Ok(Entry::new("the time is now", 5, b"doc-5".to_vec())),
    ];
    let count = registry.build(&config, source)?;
    println!("Built 'titles' from {count} entries\n");

    // Look up partial queries
    for query in ["l", "the", "theories tak"] {
        println!("lookup({query:?}):");
        for result in registry.lookup("titles", query, None)? {
            println!("  {:>3}  {}", result.weight, result.key);
        }
        println!();
    }

    // Save, then serve from a fresh registry as a restart would
    registry.save("titles")?;
    let restarted = SuggestRegistry::new(storage);
    restarted.load("titles")?;
    let results = restarted.lookup("titles", "l", None)?;
    println!("After restart, lookup(\"l\") still returns {} results", results.len());

    Ok(())
}
