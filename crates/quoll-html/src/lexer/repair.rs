//! Opt-in repair of malformed text runs.
//!
//! Applied by the lexer to a finished text-run body, and only when the run
//! contained a bare `<`, `>`, or `&`. Attribute values and comment or
//! declaration bodies are never repaired.

/// Escape bare structural characters and patch up ampersands so the text is
/// safe to re-embed in markup.
///
/// `<` and `>` become `&lt;`/`&gt;`. Every `&` that does not begin a named,
/// decimal, or hexadecimal character reference gets `amp;` inserted after
/// it; a recognized reference missing its terminating `;` has one appended.
#[must_use]
pub fn repair_text(text: &str) -> String {
    let escaped = text.replace('<', "&lt;").replace('>', "&gt;");
    let mut parts = escaped.split('&');

    // split always yields at least one part
    let Some(first) = parts.next() else {
        return escaped;
    };

    let mut out = String::with_capacity(escaped.len());
    out.push_str(first);

    for part in parts {
        out.push('&');

        match reference_name_len(part) {
            None => {
                out.push_str("amp;");
                out.push_str(part);
            }
            Some(len) => {
                if part.as_bytes().get(len) == Some(&b';') {
                    out.push_str(part);
                } else {
                    out.push_str(&part[..len]);
                    out.push(';');
                    out.push_str(&part[len..]);
                }
            }
        }
    }

    out
}

/// Length of a recognizable character-reference name at the start of
/// `part` (the text following an `&`), or `None` if there is none.
///
/// Recognized forms: a run of ASCII letters (named), `#` plus decimal
/// digits, or `#x`/`#X` plus hex digits.
fn reference_name_len(part: &str) -> Option<usize> {
    if let Some(numeric) = part.strip_prefix('#') {
        if let Some(hex) = numeric.strip_prefix(['x', 'X']) {
            let digits = hex.bytes().take_while(u8::is_ascii_hexdigit).count();
            return (digits > 0).then_some(2 + digits);
        }

        let digits = numeric.bytes().take_while(u8::is_ascii_digit).count();
        return (digits > 0).then_some(1 + digits);
    }

    let letters = part.bytes().take_while(u8::is_ascii_alphabetic).count();
    (letters > 0).then_some(letters)
}
