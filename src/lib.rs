//! # Sibyl
//!
//! A search-suggestion (autocomplete) engine for Rust.
//!
//! ## Features
//!
//! - Weighted completions ranked by weight with deterministic tie-breaks
//! - Three matching disciplines: analyzed prefix, fuzzy prefix, and infix
//!   with highlighting
//! - Configurable analysis pipelines, divergent between index and query time
//! - Bulk builds from flat files or stored document fields
//! - Restart-safe persistence over pluggable storage backends
//!
//! ```no_run
//! use sibyl::{Entry, SuggestConfig, Suggester, SuggesterKind};
//!
//! # fn main() -> sibyl::Result<()> {
//! let config = SuggestConfig::new("titles", SuggesterKind::Analyzing);
//! let suggester = Suggester::build(
//!     &config,
//!     vec![
//!         Ok(Entry::new("love", 15, b"doc-1".to_vec())),
//!         Ok(Entry::new("lucene", 5, b"doc-2".to_vec())),
//!     ],
//! )?;
//! for result in suggester.lookup("l", 5) {
//!     println!("{} ({})", result.key, result.weight);
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod analysis;
mod data;
mod error;
pub mod persist;
mod registry;
pub mod source;
pub mod storage;
pub mod suggest;
mod util;

// Re-exports for the public API
pub use analysis::{Analyzer, AnalyzerSpec, CompletionQuery};
pub use data::{Entry, FieldValue, Fragment, LookupResult};
pub use error::{Result, SuggestError};
pub use registry::SuggestRegistry;
pub use source::{DocumentStore, WeightEvaluator, WeightSource, open_local_file, open_stored_field_scan};
pub use storage::{Storage, StorageConfig, StorageFactory};
pub use suggest::{DEFAULT_LOOKUP_LIMIT, FuzzyParams, SuggestConfig, Suggester, SuggesterKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
