//! Language Server Protocol (LSP) implementation for CWEB
//!
//!     This crate provides semantic highlighting for CWEB literate-programming sources in any
//!     LSP-compatible editor. It registers for documents of the `cweb` language, publishes
//!     the token legend during `initialize`, and answers `textDocument/semanticTokens/full`.
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - Handles JSON-RPC communication
//!         - Protocol handshaking and capability negotiation
//!
//!     Server Layer ([server]):
//!         - Implements the LanguageServer trait
//!         - Keeps the full text of open documents
//!         - Tracks one cancellation flag per document so a newer request or an edit stops
//!           the scan it supersedes
//!
//!     Feature Layer ([features]):
//!         - Classification through cweb-parser, legend encoding and the delta wire format
//!         - Stateless, with the dense unit tests
//!
//! Usage
//!
//!     Binary:
//!         $ cweb-lsp
//!         Starts the language server on stdin/stdout for editor integration. Logs go to
//!         stderr; set RUST_LOG to change the level.

pub mod features;
pub mod server;

pub use server::CwebLanguageServer;
