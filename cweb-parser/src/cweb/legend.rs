//! Token legend
//!
//!     The legend is the fixed, ordered catalog of token types and token modifiers that the
//!     classifier may emit. A type is encoded as its position in the type list; a modifier is
//!     encoded as the bit `1 << position` in the modifier list. Editors receive the two
//!     ordered name lists once, at registration, and use them to decode every token after.
//!
//!     The names follow the standard semantic token vocabulary so that existing editor themes
//!     color CWEB documents without extra configuration.
//!
//!     [`Legend::standard`] is built once per process and never mutated. Tests that want an
//!     isolated catalog can build their own with [`Legend::new`].

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Comment,
    Enum,
    EnumMember,
    Function,
    Keyword,
    Label,
    Macro,
    Number,
    Operator,
    Parameter,
    Property,
    String,
    Struct,
    Type,
    Variable,
}

impl TokenType {
    /// Returns the semantic token type name as published in the legend.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Comment => "comment",
            TokenType::Enum => "enum",
            TokenType::EnumMember => "enumMember",
            TokenType::Function => "function",
            TokenType::Keyword => "keyword",
            TokenType::Label => "label",
            TokenType::Macro => "macro",
            TokenType::Number => "number",
            TokenType::Operator => "operator",
            TokenType::Parameter => "parameter",
            TokenType::Property => "property",
            TokenType::String => "string",
            TokenType::Struct => "struct",
            TokenType::Type => "type",
            TokenType::Variable => "variable",
        }
    }
}

pub const TOKEN_TYPES: &[TokenType] = &[
    TokenType::Comment,
    TokenType::Enum,
    TokenType::EnumMember,
    TokenType::Function,
    TokenType::Keyword,
    TokenType::Label,
    TokenType::Macro,
    TokenType::Number,
    TokenType::Operator,
    TokenType::Parameter,
    TokenType::Property,
    TokenType::String,
    TokenType::Struct,
    TokenType::Type,
    TokenType::Variable,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenModifier {
    Declaration,
    Definition,
    Documentation,
    Modification,
    Readonly,
    Static,
}

impl TokenModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenModifier::Declaration => "declaration",
            TokenModifier::Definition => "definition",
            TokenModifier::Documentation => "documentation",
            TokenModifier::Modification => "modification",
            TokenModifier::Readonly => "readonly",
            TokenModifier::Static => "static",
        }
    }
}

pub const TOKEN_MODIFIERS: &[TokenModifier] = &[
    TokenModifier::Declaration,
    TokenModifier::Definition,
    TokenModifier::Documentation,
    TokenModifier::Modification,
    TokenModifier::Readonly,
    TokenModifier::Static,
];

static STANDARD: Lazy<Legend> = Lazy::new(|| {
    Legend::new(
        TOKEN_TYPES.iter().map(|kind| kind.as_str()),
        TOKEN_MODIFIERS.iter().map(|modifier| modifier.as_str()),
    )
});

/// Ordered type and modifier names with their reverse lookup tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    token_types: Vec<String>,
    token_modifiers: Vec<String>,
    type_indices: HashMap<String, u32>,
    modifier_indices: HashMap<String, u32>,
}

impl Legend {
    /// Build a legend where every name's index is its position in the given order.
    ///
    /// A repeated name keeps the index of its first occurrence.
    pub fn new<T, M>(token_types: T, token_modifiers: M) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let token_types: Vec<String> = token_types.into_iter().map(Into::into).collect();
        let token_modifiers: Vec<String> = token_modifiers.into_iter().map(Into::into).collect();
        Self {
            type_indices: index_names(&token_types),
            modifier_indices: index_names(&token_modifiers),
            token_types,
            token_modifiers,
        }
    }

    /// The process-wide legend covering every [`TokenType`] and [`TokenModifier`].
    pub fn standard() -> &'static Legend {
        &STANDARD
    }

    pub fn token_types(&self) -> &[String] {
        &self.token_types
    }

    pub fn token_modifiers(&self) -> &[String] {
        &self.token_modifiers
    }

    pub fn type_index(&self, name: &str) -> Option<u32> {
        self.type_indices.get(name).copied()
    }

    pub fn modifier_index(&self, name: &str) -> Option<u32> {
        self.modifier_indices.get(name).copied()
    }
}

fn index_names(names: &[String]) -> HashMap<String, u32> {
    let mut indices = HashMap::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        indices.entry(name.clone()).or_insert(index as u32);
    }
    indices
}
