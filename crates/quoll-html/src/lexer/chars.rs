//! Pure character classifiers used by the state machine.
//!
//! These are deliberately permissive: the goal is to accept recognizably
//! tag-like constructs, not to enforce a strict naming grammar. Whitespace
//! classification lives on [`super::cursor::Unit`], since a coalesced line
//! break is whitespace regardless of its emitted text.

/// Can `ch` begin markup after a `<`?
///
/// An ASCII letter starts an open tag, `/` a close tag, `!` a declaration
/// or comment, `?` a processing instruction. Anything else leaves the `<`
/// as literal text.
#[must_use]
pub const fn is_markup_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '/' | '!' | '?')
}

/// Is `ch` valid within a tag name?
///
/// Follows the character set of a
/// [valid custom element name](https://html.spec.whatwg.org/multipage/custom-elements.html#valid-custom-element-name)
/// (`PCENChar`), broadened to permit uppercase ASCII and digits anywhere:
/// ASCII alphanumerics, `-`, `.`, `_`, the PCEN Unicode ranges, and every
/// astral code point.
#[must_use]
pub const fn is_tag_name_char(ch: char) -> bool {
    if ch <= 'z' {
        return ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_');
    }

    matches!(ch,
        '\u{B7}'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{203F}'..='\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// Is `ch` valid within an attribute name?
///
/// Tag-name characters plus `:` (namespace-style names such as
/// `xlink:href`). Punctuation like `@`, `#`, or `(` is rejected, which is
/// what turns a stray character in an attribute position into a reported
/// syntax error instead of a mis-parsed name.
#[must_use]
pub const fn is_attribute_name_char(ch: char) -> bool {
    ch == ':' || is_tag_name_char(ch)
}
