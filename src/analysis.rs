//! Text analysis for suggestion indexing and querying.
//!
//! Text flows through a simple pipeline:
//!
//! ```text
//! Text → Tokenizer → Token Stream → Token Filters → Analyzed Tokens
//! ```
//!
//! Pipelines are resolved from declarative [`AnalyzerSpec`]s (names only, no
//! live state), so a persisted suggester can rebuild the exact same chains
//! after a restart. Query-time analysis additionally supports a completion
//! mode that forks the final token into a complete interpretation and a
//! prefix seed; see [`analyzer::Analyzer::analyze_for_completion`].

pub mod analyzer;
pub mod stem;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, AnalyzerSpec, CompletionQuery};
pub use token::Token;
pub use token_filter::TokenFilter;
pub use tokenizer::Tokenizer;
