//! Token encoding
//!
//!     Maps a symbolic [`Token`] onto the integers an editor expects: the type becomes its
//!     index in the legend, the modifiers become one bit each, OR-ed together.
//!
//!     The classifier only emits names that the standard legend registers, so a missing name
//!     here means the two sides disagree. That is a bug, not an input problem, and it panics.

use crate::cweb::legend::{Legend, TokenModifier, TokenType};
use crate::cweb::token::Token;
use serde::Serialize;

/// A token in legend coordinates: `(line, start, length, token_type, modifier_bits)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedToken {
    pub line: u32,
    pub start: u32,
    pub length: u32,
    pub token_type: u32,
    pub modifier_bits: u32,
}

pub fn encode(token: &Token, legend: &Legend) -> EncodedToken {
    EncodedToken {
        line: token.line,
        start: token.start,
        length: token.length,
        token_type: encode_type(token.token_type, legend),
        modifier_bits: encode_modifiers(&token.modifiers, legend),
    }
}

pub fn encode_all(tokens: &[Token], legend: &Legend) -> Vec<EncodedToken> {
    tokens.iter().map(|token| encode(token, legend)).collect()
}

pub fn encode_type(token_type: TokenType, legend: &Legend) -> u32 {
    match legend.type_index(token_type.as_str()) {
        Some(index) => index,
        None => panic!("token type `{}` is not in the legend", token_type.as_str()),
    }
}

pub fn encode_modifiers(modifiers: &[TokenModifier], legend: &Legend) -> u32 {
    modifiers.iter().fold(0, |bits, modifier| {
        match legend.modifier_index(modifier.as_str()) {
            Some(index) => bits | (1 << index),
            None => panic!("token modifier `{}` is not in the legend", modifier.as_str()),
        }
    })
}
