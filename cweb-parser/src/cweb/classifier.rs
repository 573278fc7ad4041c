//! Line classifier
//!
//!     A CWEB document alternates between TeX prose and program code. Every document starts
//!     in TeX mode. The classifier walks the document line by line, tracking that single mode
//!     variable, and emits at most one token per line.
//!
//! TeX Mode
//!
//!     The first matching rule wins; a line matching none of them produces nothing:
//!
//!         %...        comment over the whole line
//!         @*...       keyword from column 0 up to (not including) the first '.', or the
//!                     whole line when there is no '.'
//!         @ ...       keyword over the '@' only
//!         @c...       keyword over the whole line, then switch to Code
//!         @<... @(... keyword over the whole line, then switch to Code
//!
//! Code Mode
//!
//!     Code lines produce no tokens. A line starting with `@*` or `@ ` opens a new section:
//!     the mode switches back to TeX and that same line is classified again under the TeX
//!     rules. Getting this lookahead wrong shifts every later line into the wrong mode.
//!
//! Cancellation
//!
//!     The signal is polled before every step, including the re-classification step of a
//!     section line. Once active, the tokens gathered so far are returned as they are.

use crate::cweb::cancel::{CancelSignal, NeverCancel};
use crate::cweb::legend::TokenType;
use crate::cweb::token::Token;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    TeX,
    Code,
}

/// Classify a whole document, stopping early once `cancel` becomes active.
pub fn classify<S>(text: &str, cancel: &S) -> Vec<Token>
where
    S: CancelSignal + ?Sized,
{
    let lines = split_lines(text);
    let mut tokens = Vec::new();
    let mut mode = Mode::TeX;
    let mut index = 0;

    while index < lines.len() {
        if cancel.is_cancellation_requested() {
            debug!(line = index, tokens = tokens.len(), "classification cancelled");
            break;
        }
        let line = lines[index];
        let line_number = index as u32;
        match mode {
            Mode::Code => {
                if opens_section(line) {
                    debug!(line = index, "leaving code mode");
                    mode = Mode::TeX;
                } else {
                    mode = classify_code_line(&mut tokens, line_number, line);
                    index += 1;
                }
            }
            Mode::TeX => {
                mode = classify_tex_line(&mut tokens, line_number, line);
                if mode == Mode::Code {
                    debug!(line = index, "entering code mode");
                }
                index += 1;
            }
        }
    }

    tokens
}

pub fn classify_all(text: &str) -> Vec<Token> {
    classify(text, &NeverCancel)
}

/// Split on `\n`, dropping a `\r` only when it directly precedes the `\n`.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        if let Some(stripped) = line.strip_suffix('\r') {
            *line = stripped;
        }
    }
    lines
}

fn opens_section(line: &str) -> bool {
    line.starts_with("@*") || line.starts_with("@ ")
}

// Program text is not tokenized; code lines only matter for leaving code mode.
fn classify_code_line(_tokens: &mut Vec<Token>, _line_number: u32, _line: &str) -> Mode {
    Mode::Code
}

fn classify_tex_line(tokens: &mut Vec<Token>, line_number: u32, line: &str) -> Mode {
    if line.starts_with('%') {
        push(tokens, line_number, utf16_len(line), TokenType::Comment);
        Mode::TeX
    } else if line.starts_with("@*") {
        let title_end = line.find('.').unwrap_or(line.len());
        push(tokens, line_number, utf16_len(&line[..title_end]), TokenType::Keyword);
        Mode::TeX
    } else if line.starts_with("@ ") {
        push(tokens, line_number, 1, TokenType::Keyword);
        Mode::TeX
    } else if line.starts_with("@c") || line.starts_with("@<") || line.starts_with("@(") {
        push(tokens, line_number, utf16_len(line), TokenType::Keyword);
        Mode::Code
    } else {
        Mode::TeX
    }
}

fn push(tokens: &mut Vec<Token>, line_number: u32, length: u32, token_type: TokenType) {
    let token = Token::new(line_number, 0, length, token_type);
    trace!(?token, "token");
    tokens.push(token);
}

fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cweb::cancel::CancelFn;
    use rstest::rstest;
    use std::cell::Cell;

    const SAMPLE: &str = "% cweb sample
\\def\\title{Sample}
@* Introduction. This is a sample.
Some prose here.
@c
int main() { return 0; }
@ The next section.
@<Include files@>=
#include <stdio.h>
@*Done";

    fn keyword(line: u32, length: u32) -> Token {
        Token::new(line, 0, length, TokenType::Keyword)
    }

    fn render(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|token| {
                format!(
                    "{}:{}+{} {}",
                    token.line,
                    token.start,
                    token.length,
                    token.token_type.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[rstest]
    #[case::comment("% this is a note", Token::new(0, 0, 16, TokenType::Comment))]
    #[case::star_section("@* Introduction. Some text", keyword(0, 15))]
    #[case::star_without_period("@* Introduction", keyword(0, 15))]
    #[case::star_period_first("@*. Dotted", keyword(0, 2))]
    #[case::plain_section("@ This section", keyword(0, 1))]
    #[case::code_section("@c", keyword(0, 2))]
    #[case::code_section_with_text("@c int x;", keyword(0, 9))]
    #[case::named_section("@<Some module@>=", keyword(0, 16))]
    #[case::output_file("@(out.c@>=", keyword(0, 10))]
    fn classifies_tex_lines(#[case] line: &str, #[case] expected: Token) {
        assert_eq!(classify_all(line), vec![expected]);
    }

    #[rstest]
    #[case::prose("Plain prose.")]
    #[case::empty("")]
    #[case::indented_comment("  % not at column zero")]
    #[case::bare_at("@")]
    #[case::other_control("@d SIZE 10")]
    #[case::escaped_at("@@ literal")]
    #[case::binary("\u{0}\u{1}\u{7f}@c")]
    fn ignores_unmatched_tex_lines(#[case] line: &str) {
        assert!(classify_all(line).is_empty());
    }

    #[test]
    fn comment_length_is_the_full_line() {
        let line = "% this is a note";
        let tokens = classify_all(line);
        assert_eq!(tokens[0].length as usize, line.len());
        assert!(tokens[0].modifiers.is_empty());
    }

    #[test]
    fn tokens_keep_their_line_index() {
        let text = "prose\n\n@* Introduction. Some text";
        assert_eq!(classify_all(text), vec![keyword(2, 15)]);
    }

    #[test]
    fn code_section_enters_code_mode() {
        let text = "a\nb\nc\nd\ne\n@c\n% looks like a comment\n@c again";
        assert_eq!(classify_all(text), vec![keyword(5, 2)]);
    }

    #[test]
    fn named_section_enters_code_mode() {
        let text = "@<Some module@>=\n@<Nested use@>;\n% code comment";
        let tokens = classify_all(text);
        assert_eq!(tokens, vec![keyword(0, 16)]);
    }

    #[rstest]
    #[case::star("@* Next part. More", keyword(2, 12))]
    #[case::plain("@ Next section.", keyword(2, 1))]
    fn section_line_in_code_is_reclassified_as_tex(#[case] line: &str, #[case] expected: Token) {
        let text = format!("@c\nint x;\n{}\n% back in prose", line);
        let tokens = classify_all(&text);
        assert_eq!(
            tokens,
            vec![
                keyword(0, 2),
                expected,
                Token::new(3, 0, 15, TokenType::Comment)
            ]
        );
    }

    #[test]
    fn at_without_space_does_not_leave_code() {
        let text = "@c\n@<Other part@>\n@\tTab section\n% still code";
        assert_eq!(classify_all(text), vec![keyword(0, 2)]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = "% note\r\n@* Title. Rest\r\n@c\r\nint x;\r\n@ more\r\n";
        assert_eq!(
            classify_all(text),
            vec![
                Token::new(0, 0, 6, TokenType::Comment),
                keyword(1, 8),
                keyword(2, 2),
                keyword(4, 1),
            ]
        );
    }

    #[test]
    fn lone_carriage_return_is_part_of_the_line() {
        let tokens = classify_all("% note\r");
        assert_eq!(tokens, vec![Token::new(0, 0, 7, TokenType::Comment)]);
    }

    #[test]
    fn split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("x\ry"), vec!["x\ry"]);
    }

    #[test]
    fn lengths_count_utf16_units() {
        let tokens = classify_all("% naïve 𝄞");
        // "% naïve " is 8 units, the clef is a surrogate pair
        assert_eq!(tokens[0].length, 10);
        let tokens = classify_all("@* Über. rest");
        assert_eq!(tokens[0].length, 7);
    }

    #[test]
    fn empty_document_has_no_tokens() {
        assert!(classify_all("").is_empty());
        assert!(classify_all("\n\n\n").is_empty());
    }

    #[test]
    fn classifies_sample_document() {
        insta::assert_snapshot!(render(&classify_all(SAMPLE)), @r"
        0:0+13 comment
        2:0+15 keyword
        4:0+2 keyword
        6:0+1 keyword
        7:0+18 keyword
        9:0+6 keyword
        ");
    }

    #[test]
    fn classification_is_idempotent() {
        assert_eq!(classify_all(SAMPLE), classify_all(SAMPLE));
    }

    #[test]
    fn active_signal_returns_nothing() {
        assert!(classify(SAMPLE, &true).is_empty());
    }

    #[test]
    fn cancellation_returns_the_prefix() {
        // No code-to-TeX transitions, so poll n happens right before line n.
        let text = "% one\n@* Two. x\nprose\n@c\ncode\ncode\n";
        let lines = split_lines(text);
        for stop in 0..=lines.len() {
            let polls = Cell::new(0usize);
            let signal = CancelFn(|| {
                let seen = polls.get();
                polls.set(seen + 1);
                seen >= stop
            });
            let partial = classify(text, &signal);
            let expected = classify_all(&lines[..stop].join("\n"));
            assert_eq!(partial, expected, "stopped before line {}", stop);
        }
    }

    #[test]
    fn cancellation_is_checked_before_reclassifying_a_section_line() {
        // polls: line 0, line 1, line 2 (leaves code), then the re-classification of line 2
        let text = "@c\ncode\n@ section";
        let polls = Cell::new(0usize);
        let signal = CancelFn(|| {
            let seen = polls.get();
            polls.set(seen + 1);
            seen >= 3
        });
        assert_eq!(classify(text, &signal), vec![keyword(0, 2)]);
        assert_eq!(polls.get(), 4);
    }
}
