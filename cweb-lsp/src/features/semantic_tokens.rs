//! Semantic tokens for CWEB documents
//!
//!     Bridges the classifier to the LSP wire format. The classifier yields symbolic tokens in
//!     line order; each one is encoded against the legend and pushed into a
//!     [`SemanticTokensBuilder`], which turns absolute positions into the relative
//!     (delta line, delta start) form that `textDocument/semanticTokens` responses use.
//!
//!     The builder relies on tokens arriving in document order. The classifier emits at most
//!     one token per line, always in ascending line order, so that holds by construction.

use cweb_parser::{classify, encode, CancelSignal, Legend, Token};
use lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

/// Accumulates tokens given in absolute coordinates and emits them delta encoded.
#[derive(Debug, Default)]
pub struct SemanticTokensBuilder {
    data: Vec<SemanticToken>,
    prev_line: u32,
    prev_start: u32,
}

impl SemanticTokensBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token. Positions must not go backwards.
    pub fn push(
        &mut self,
        line: u32,
        start: u32,
        length: u32,
        token_type: u32,
        token_modifiers_bitset: u32,
    ) {
        debug_assert!(
            self.data.is_empty() || (line, start) >= (self.prev_line, self.prev_start),
            "semantic tokens pushed out of order: {}:{} after {}:{}",
            line,
            start,
            self.prev_line,
            self.prev_start
        );
        let delta_line = line.saturating_sub(self.prev_line);
        let delta_start = if delta_line == 0 {
            start.saturating_sub(self.prev_start)
        } else {
            start
        };
        self.data.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type,
            token_modifiers_bitset,
        });
        self.prev_line = line;
        self.prev_start = start;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn build(self) -> Vec<SemanticToken> {
        self.data
    }
}

/// The legend in the shape the `initialize` response advertises.
pub fn semantic_tokens_legend(legend: &Legend) -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: legend
            .token_types()
            .iter()
            .map(|name| SemanticTokenType::from(name.clone()))
            .collect(),
        token_modifiers: legend
            .token_modifiers()
            .iter()
            .map(|name| SemanticTokenModifier::from(name.clone()))
            .collect(),
    }
}

pub fn encode_semantic_tokens(tokens: &[Token], legend: &Legend) -> Vec<SemanticToken> {
    let mut builder = SemanticTokensBuilder::new();
    for token in tokens {
        let encoded = encode(token, legend);
        builder.push(
            encoded.line,
            encoded.start,
            encoded.length,
            encoded.token_type,
            encoded.modifier_bits,
        );
    }
    builder.build()
}

/// Classify `text` and encode the result, honoring `cancel` between lines.
pub fn provide_semantic_tokens<S>(text: &str, cancel: &S, legend: &Legend) -> Vec<SemanticToken>
where
    S: CancelSignal + ?Sized,
{
    encode_semantic_tokens(&classify(text, cancel), legend)
}
