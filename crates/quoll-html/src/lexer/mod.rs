//! Lossless HTML tokenization.
//!
//! The lexer walks the source one [`cursor::Unit`] at a time, classifies
//! characters with the predicates in [`chars`], and reports everything it
//! recognizes through the handler slots in [`events`]. Whitespace between
//! tokens is collected and re-attached to the next event as its leading
//! space, which is what makes the event stream lossless.

/// Character classifiers (markup start, tag name, attribute name).
pub mod chars;
/// The tokenizer state machine.
pub mod core;
/// Input cursor with push-back and line/column bookkeeping.
pub mod cursor;
/// Error taxonomy reported through the error handler.
pub mod error;
/// Handler slots and registration plumbing.
pub mod events;
/// Opt-in repair of malformed text runs.
pub mod repair;

pub use self::core::{HTMLLexer, LexerOptions, LexerState};
pub use cursor::{Cursor, LineEnding, Unit};
pub use error::ParseError;
