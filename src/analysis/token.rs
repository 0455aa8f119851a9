//! Token representation.

/// A single analyzed token with byte offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text after any filter transformations.
    pub text: String,
    /// Byte offset of the token's start in the original text.
    pub start_offset: usize,
    /// Byte offset one past the token's end in the original text.
    pub end_offset: usize,
    /// Keyword-marked tokens pass through normalization filters (stop word
    /// removal, stemming) untouched. Completion analysis marks prefix seeds
    /// this way so a half-typed word is never stemmed or dropped.
    pub keyword: bool,
}

impl Token {
    /// Create a token spanning `start..end` in the source text.
    pub fn new(text: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            text: text.into(),
            start_offset,
            end_offset,
            keyword: false,
        }
    }

    /// Mark this token as exempt from normalization filters.
    pub fn keyword(mut self) -> Self {
        self.keyword = true;
        self
    }
}
