//! Output formats for `cweb tokens` and `cweb legend`.

use cweb_lsp::features::semantic_tokens::encode_semantic_tokens;
use cweb_parser::{Legend, Token};
use serde_json::json;

/// One `line:start+length type` entry per token, modifiers in brackets when present.
pub fn render_simple(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&format!(
            "{}:{}+{} {}",
            token.line,
            token.start,
            token.length,
            token.token_type.as_str()
        ));
        if !token.modifiers.is_empty() {
            let names: Vec<&str> = token.modifiers.iter().map(|m| m.as_str()).collect();
            out.push_str(&format!("[{}]", names.join(",")));
        }
        out.push('\n');
    }
    out
}

pub fn render_json(tokens: &[Token]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tokens)
}

/// The flat relative integer array, five entries per token, as sent to editors.
pub fn render_lsp(tokens: &[Token], legend: &Legend) -> Result<String, serde_json::Error> {
    let data: Vec<u32> = encode_semantic_tokens(tokens, legend)
        .iter()
        .flat_map(|token| {
            [
                token.delta_line,
                token.delta_start,
                token.length,
                token.token_type,
                token.token_modifiers_bitset,
            ]
        })
        .collect();
    serde_json::to_string(&json!({ "data": data }))
}

pub fn render_legend(legend: &Legend) -> String {
    let mut out = String::from("Token types:\n");
    for (index, name) in legend.token_types().iter().enumerate() {
        out.push_str(&format!("  {:>2}  {}\n", index, name));
    }
    out.push_str("\nToken modifiers:\n");
    for (index, name) in legend.token_modifiers().iter().enumerate() {
        out.push_str(&format!("  {:>2}  {} (bit {:#x})\n", index, name, 1u32 << index));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cweb_parser::{classify_all, TokenModifier, TokenType};

    const SOURCE: &str = "% note\n@* Intro. Text\n@c\nint x;\n@ next";

    #[test]
    fn simple_lists_one_token_per_line() {
        let rendered = render_simple(&classify_all(SOURCE));
        assert_eq!(
            rendered,
            "0:0+6 comment\n1:0+8 keyword\n2:0+2 keyword\n4:0+1 keyword\n"
        );
    }

    #[test]
    fn simple_shows_modifiers() {
        let token =
            Token::new(0, 0, 3, TokenType::Comment).with_modifier(TokenModifier::Documentation);
        assert_eq!(render_simple(&[token]), "0:0+3 comment[documentation]\n");
    }

    #[test]
    fn json_uses_legend_names() {
        let rendered = render_json(&classify_all("@<Part@>=")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value[0]["type"], "keyword");
        assert_eq!(value[0]["length"], 9);
        assert_eq!(value[0]["modifiers"], json!([]));
    }

    #[test]
    fn lsp_output_is_delta_encoded() {
        let rendered = render_lsp(&classify_all(SOURCE), Legend::standard()).unwrap();
        assert_eq!(
            rendered,
            r#"{"data":[0,0,6,0,0,1,0,8,4,0,1,0,2,4,0,2,0,1,4,0]}"#
        );
    }

    #[test]
    fn legend_lists_indices() {
        let rendered = render_legend(Legend::standard());
        assert!(rendered.contains("   4  keyword\n"));
        assert!(rendered.contains("   2  documentation (bit 0x4)\n"));
    }
}
