//! Token transformation and filtering.

use crate::analysis::stem;
use crate::analysis::token::Token;
use crate::error::{Result, SuggestError};

/// The standard English stop word set.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
    "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// Returns true if `word` is in the English stop word set.
pub fn is_stop_word(word: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(&word)
}

/// A single token-stream transformation, resolved by name.
///
/// All filters are token-local: they transform or drop one token at a time
/// and never change offsets, so offsets always point into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFilter {
    /// Lowercases token text.
    Lowercase,
    /// Strips trailing `'s` / `’s`.
    EnglishPossessive,
    /// Drops English stop words; keyword-marked tokens are never dropped.
    Stop,
    /// Porter stemming; keyword-marked tokens are left untouched.
    PorterStem,
}

impl TokenFilter {
    /// Resolve a filter by its registered name.
    pub fn resolve(name: &str) -> Result<Self> {
        match name {
            "lowercase" => Ok(TokenFilter::Lowercase),
            "english_possessive" => Ok(TokenFilter::EnglishPossessive),
            "stop" => Ok(TokenFilter::Stop),
            "porter_stem" => Ok(TokenFilter::PorterStem),
            other => Err(SuggestError::analysis(format!(
                "unknown token filter '{other}'"
            ))),
        }
    }

    /// The name this filter resolves from.
    pub fn name(&self) -> &'static str {
        match self {
            TokenFilter::Lowercase => "lowercase",
            TokenFilter::EnglishPossessive => "english_possessive",
            TokenFilter::Stop => "stop",
            TokenFilter::PorterStem => "porter_stem",
        }
    }

    /// Transform one token; `None` drops it from the stream.
    pub fn apply(&self, mut token: Token) -> Option<Token> {
        match self {
            TokenFilter::Lowercase => {
                if token.text.chars().any(|c| c.is_uppercase()) {
                    token.text = token.text.to_lowercase();
                }
                Some(token)
            }
            TokenFilter::EnglishPossessive => {
                for suffix in ["'s", "\u{2019}s"] {
                    if let Some(stripped) = token.text.strip_suffix(suffix) {
                        token.text = stripped.to_string();
                        break;
                    }
                }
                Some(token)
            }
            TokenFilter::Stop => {
                if !token.keyword && is_stop_word(&token.text) {
                    None
                } else {
                    Some(token)
                }
            }
            TokenFilter::PorterStem => {
                if !token.keyword {
                    token.text = stem::stem(&token.text);
                }
                Some(token)
            }
        }
    }
}
