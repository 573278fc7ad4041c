use crate::cweb::legend::{TokenModifier, TokenType};
use serde::Serialize;

/// One classified span of a single line.
///
/// `line` and `start` are zero-based; `start` and `length` count UTF-16 code units, which is
/// what editors use for columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub line: u32,
    pub start: u32,
    pub length: u32,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub modifiers: Vec<TokenModifier>,
}

impl Token {
    pub fn new(line: u32, start: u32, length: u32, token_type: TokenType) -> Self {
        Self {
            line,
            start,
            length,
            token_type,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: TokenModifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }
}
