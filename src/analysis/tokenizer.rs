//! Text tokenization strategies.

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::Token;
use crate::error::{Result, SuggestError};

/// Splits raw text into tokens. Resolved by name from an analyzer spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tokenizer {
    /// Unicode word boundaries; keeps segments containing alphanumerics.
    Standard,
    /// Splits on whitespace runs.
    Whitespace,
    /// The whole input as a single token.
    Keyword,
}

impl Tokenizer {
    /// Resolve a tokenizer by its registered name.
    pub fn resolve(name: &str) -> Result<Self> {
        match name {
            "standard" => Ok(Tokenizer::Standard),
            "whitespace" => Ok(Tokenizer::Whitespace),
            "keyword" => Ok(Tokenizer::Keyword),
            other => Err(SuggestError::analysis(format!(
                "unknown tokenizer '{other}'"
            ))),
        }
    }

    /// The name this tokenizer resolves from.
    pub fn name(&self) -> &'static str {
        match self {
            Tokenizer::Standard => "standard",
            Tokenizer::Whitespace => "whitespace",
            Tokenizer::Keyword => "keyword",
        }
    }

    /// Split `text` into tokens with byte offsets.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        match self {
            Tokenizer::Standard => text
                .split_word_bound_indices()
                .filter(|(_, word)| word.chars().any(|c| c.is_alphanumeric()))
                .map(|(start, word)| Token::new(word, start, start + word.len()))
                .collect(),
            Tokenizer::Whitespace => {
                let mut tokens = Vec::new();
                let mut start: Option<usize> = None;
                for (idx, ch) in text.char_indices() {
                    if ch.is_whitespace() {
                        if let Some(s) = start.take() {
                            tokens.push(Token::new(&text[s..idx], s, idx));
                        }
                    } else if start.is_none() {
                        start = Some(idx);
                    }
                }
                if let Some(s) = start {
                    tokens.push(Token::new(&text[s..], s, text.len()));
                }
                tokens
            }
            Tokenizer::Keyword => {
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Token::new(text, 0, text.len())]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_offsets() {
        let tokens = Tokenizer::Standard.tokenize("Love, lost!");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Love");
        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (0, 4));
        assert_eq!(tokens[1].text, "lost");
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (6, 10));
    }

    #[test]
    fn test_standard_keeps_contractions() {
        let tokens = Tokenizer::Standard.tokenize("don't stop");
        assert_eq!(tokens[0].text, "don't");
        assert_eq!(tokens[1].text, "stop");
    }

    #[test]
    fn test_whitespace() {
        let tokens = Tokenizer::Whitespace.tokenize("  love  lost ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "love");
        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (2, 6));
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (8, 12));
    }

    #[test]
    fn test_keyword_whole_input() {
        let tokens = Tokenizer::Keyword.tokenize("love lost");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "love lost");
        assert!(Tokenizer::Keyword.tokenize("").is_empty());
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(Tokenizer::resolve("icu").is_err());
        assert_eq!(Tokenizer::resolve("standard").unwrap(), Tokenizer::Standard);
    }
}
