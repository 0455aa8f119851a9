//! Infix example - match inside entries and render highlighted fragments.

use std::sync::Arc;

use sibyl::storage::memory::MemoryStorage;
use sibyl::{AnalyzerSpec, Entry, Result, SuggestConfig, SuggestRegistry, SuggesterKind};

fn main() -> Result<()> {
    println!("=== Infix Suggestions with Highlighting ===\n");

    let registry = SuggestRegistry::new(Arc::new(MemoryStorage::default()));
    let config = SuggestConfig::new("songs", SuggesterKind::Infix)
        .analyzer(AnalyzerSpec::standard());
    let source = vec![
        Ok(Entry::new("love lost", 15, Vec::new())),
        Ok(Entry::new("paradise lost", 12, Vec::new())),
        Ok(Entry::new("the lost chord", 8, Vec::new())),
    ];
    registry.build(&config, source)?;

    for query in ["lost", "los", "paradise"] {
        println!("lookup({query:?}):");
        for result in registry.lookup("songs", query, None)? {
            // Render hits in brackets, e.g. "love [lost]".
            let rendered: String = result
                .fragments
                .iter()
                .map(|f| {
                    if f.is_hit {
                        format!("[{}]", f.text)
                    } else {
                        f.text.clone()
                    }
                })
                .collect();
            println!("  {:>3}  {}", result.weight, rendered);
        }
        println!();
    }

    Ok(())
}
