//! Lossless HTML tokenizer for the Quoll toolkit.
//!
//! # Scope
//!
//! This crate implements a character-level tokenizer whose parse events
//! reconstruct the input exactly:
//! - **Lexer** - an eleven-state machine recognizing tags, attributes,
//!   comments, declarations, and processing instructions
//! - **Cursor** - single-pass input walking with one-unit push-back,
//!   CR/LF/CRLF coalescing, and line/column bookkeeping
//! - **Event sink** - per-event handler slots with an unhandled fallback
//!   that preserves round-trip fidelity under partial registration
//! - **Text repair** - opt-in escaping of bare `<`/`>` and malformed
//!   character references in text runs
//!
//! Concatenating the leading-space, content, and trailing-space fields of
//! every emitted event, in order, reproduces the source text byte for byte
//! (subject only to configured line-ending remapping and opt-in repair).
//!
//! # Not Implemented
//!
//! - Tree construction, tag-omission rules, and semantic validation
//! - Character encoding detection (input is `&str`, already decoded)
//! - Streaming input (the full document is resident before parsing)

/// Tokenizer state machine, cursor, classifiers, and event plumbing.
pub mod lexer;

pub use lexer::core::{HTMLLexer, LexerOptions, LexerState};
pub use lexer::cursor::{Cursor, LineEnding, Unit};
pub use lexer::error::ParseError;
