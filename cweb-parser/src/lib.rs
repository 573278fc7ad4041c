//! # cweb-parser
//!
//! A lexical classifier for CWEB literate-programming sources.
//!
//! The crate turns the text of a CWEB document into a flat list of classified spans
//! (line, column, length, category, modifiers) that an editor can use for highlighting.
//! It does not parse CWEB: there is no macro expansion, no section numbering and no
//! tokenization of the embedded program text.
//!
//! Layout
//!
//!     src/cweb
//!       ├── legend       The fixed catalog of token types and modifiers
//!       ├── token        The symbolic token produced by the classifier
//!       ├── cancel       Cooperative cancellation signals polled by the scan
//!       ├── classifier   The two-mode line scanner (TeX / Code)
//!       └── encoding     Symbolic tokens to legend indices and modifier bits
//!
//! The classifier and encoder are infallible: unexpected input simply produces no token,
//! and cancellation truncates the result silently.

pub mod cweb;

pub use cweb::cancel::{CancelFn, CancelSignal, CancellationFlag, NeverCancel};
pub use cweb::classifier::{classify, classify_all, split_lines, Mode};
pub use cweb::encoding::{encode, encode_all, encode_modifiers, encode_type, EncodedToken};
pub use cweb::legend::{Legend, TokenModifier, TokenType, TOKEN_MODIFIERS, TOKEN_TYPES};
pub use cweb::token::Token;
