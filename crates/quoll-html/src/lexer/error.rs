//! Error taxonomy for the tokenizer.
//!
//! Every error except [`ParseError::MissingEndHandler`] is recoverable: the
//! lexer reports it through the error handler (with the current line and
//! column) and resynchronizes to the outside-markup state. Nothing aborts a
//! traversal once it has started.

use thiserror::Error;

/// Problems the tokenizer can detect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Whitespace immediately after `</`, or a close tag not terminated
    /// by `>`.
    #[error("Syntax error in close tag")]
    CloseTagSyntax,

    /// An attribute position held a character that is neither a valid
    /// attribute-name character, `>`, nor the start of `/>`.
    #[error("Syntax error in <{tag}>")]
    OpenTagSyntax {
        /// Name of the open tag being parsed when the error was found.
        tag: String,
    },

    /// Input ended before a declaration's closing `>`.
    #[error("File ended in unterminated declaration")]
    UnterminatedDeclaration,

    /// Input ended before a processing instruction's closing `>`.
    #[error("File ended in unterminated processing instruction")]
    UnterminatedProcessingInstruction,

    /// Input ended before a comment's closing `-->`.
    #[error("File ended in unterminated comment")]
    UnterminatedComment,

    /// Input ended while the lexer was inside a construct.
    #[error("Unexpected end of file")]
    UnexpectedEndOfFile,

    /// `parse()` was called with no end-of-input handler registered.
    ///
    /// This is a precondition failure returned from `parse()` itself; it is
    /// never dispatched to the error handler and the traversal never starts.
    #[error("an end-of-input handler must be registered before parsing")]
    MissingEndHandler,
}
