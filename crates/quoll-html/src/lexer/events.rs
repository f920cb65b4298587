//! Handler slots for the parse-event stream.
//!
//! One optional slot per event kind, plus an unhandled fallback. Dispatch
//! is explicit: the lexer tries the specific slot first and otherwise hands
//! the fallback the raw reconstructed markup for the event, so no input is
//! silently dropped under partial registration. Registration itself lives
//! on [`super::core::HTMLLexer`] as chainable `on_*` methods.

use super::error::ParseError;

/// Handler for events carrying `(leading_space, content, trailing)`.
///
/// Used for open-tag-start (trailing empty), open-tag-end (trailing is the
/// closer, `">"` or `"/>"`), close-tag, text, comment, declaration, and
/// processing-instruction events, and for the unhandled fallback.
pub type BasicHandler<'h> = Box<dyn FnMut(&str, &str, &str) + 'h>;

/// Handler for attribute events:
/// `(leading_space, name, equals_sign, value, quote)`.
///
/// `equals_sign` carries the `=` together with any surrounding whitespace;
/// `quote` is `"\""`, `"'"`, or empty for an unquoted value. Concatenating
/// `leading + name + equals_sign + quote + value + quote` reproduces the
/// source form of the attribute.
pub type AttributeHandler<'h> = Box<dyn FnMut(&str, &str, &str, &str, &str) + 'h>;

/// Handler for the end-of-input event, carrying the final trailing
/// whitespace.
pub type EndHandler<'h> = Box<dyn FnMut(&str) + 'h>;

/// Handler for recoverable errors, carrying the error and the line and
/// column where it was detected.
pub type ErrorHandler<'h> = Box<dyn FnMut(&ParseError, usize, usize) + 'h>;

/// The fixed set of optional handler slots.
#[derive(Default)]
pub(super) struct HandlerSet<'h> {
    pub attribute: Option<AttributeHandler<'h>>,
    pub close_tag: Option<BasicHandler<'h>>,
    pub comment: Option<BasicHandler<'h>>,
    pub declaration: Option<BasicHandler<'h>>,
    pub end: Option<EndHandler<'h>>,
    pub error: Option<ErrorHandler<'h>>,
    pub open_tag_end: Option<BasicHandler<'h>>,
    pub open_tag_start: Option<BasicHandler<'h>>,
    pub processing: Option<BasicHandler<'h>>,
    pub text: Option<BasicHandler<'h>>,
    pub unhandled: Option<BasicHandler<'h>>,
}
