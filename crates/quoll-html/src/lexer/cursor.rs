//! Input cursor: one logical character unit at a time, with push-back.
//!
//! The cursor owns the source text, the line/column counters, and the
//! push-back stack, so the two invariants that must not drift apart -
//! replay order and position correctness - live behind one seam.

/// Target form for line-ending remapping.
///
/// When configured, every coalesced line break read by the cursor carries
/// this form as its text instead of whatever appeared in the source. The
/// line/column bookkeeping is unaffected by remapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r`
    Cr,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The textual form of this line ending.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::CrLf => "\r\n",
        }
    }
}

/// The smallest unit the cursor returns: one scalar character, or one
/// coalesced line break.
///
/// A CR, LF, or CR immediately followed by LF is read as a single
/// `LineBreak` carrying the text to emit (the source form, or the configured
/// [`LineEnding`]). A unit is never split across two reads or two
/// push-backs; in particular an astral character is one `Char` unit, since
/// a Rust `char` is a full Unicode scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A single scalar character.
    Char(char),
    /// A coalesced line break, carrying its emitted text.
    LineBreak(&'static str),
}

impl Unit {
    /// True for line breaks and for any character with a code point at or
    /// below U+0020 (the tokenizer's permissive whitespace rule).
    #[must_use]
    pub const fn is_whitespace(self) -> bool {
        match self {
            Self::LineBreak(_) => true,
            Self::Char(c) => c <= ' ',
        }
    }

    /// True when this unit is exactly the given character.
    ///
    /// A line break never matches, even against `'\n'`; breaks are matched
    /// structurally, not by their emitted text.
    #[must_use]
    pub fn is(self, ch: char) -> bool {
        self == Self::Char(ch)
    }

    /// The scalar character, if this unit is one.
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::LineBreak(_) => None,
        }
    }

    /// Append this unit's text to an accumulator.
    pub fn push_onto(self, out: &mut String) {
        match self {
            Self::Char(c) => out.push(c),
            Self::LineBreak(text) => out.push_str(text),
        }
    }
}

/// Read position within the source text, one [`Unit`] at a time.
///
/// Reading N units and then pushing back N units restores the cursor to its
/// exact prior position and pending-buffer state. Pushing back a unit
/// reverses the line/column delta its read applied; replaying it from the
/// buffer applies the delta again.
pub struct Cursor {
    source: String,
    /// Byte index of the next unread character.
    pos: usize,
    line: usize,
    column: usize,
    put_backs: Vec<Unit>,
    eol: Option<LineEnding>,
}

impl Cursor {
    /// Create a cursor over `source`, optionally remapping line breaks.
    #[must_use]
    pub fn new(source: &str, eol: Option<LineEnding>) -> Self {
        Self {
            source: source.to_owned(),
            pos: 0,
            line: 1,
            column: 0,
            put_backs: Vec::new(),
            eol,
        }
    }

    /// Point the cursor at new source text, clearing all read state.
    ///
    /// The remapping configuration is retained.
    pub fn reset(&mut self, source: &str) {
        self.source = source.to_owned();
        self.pos = 0;
        self.line = 1;
        self.column = 0;
        self.put_backs.clear();
    }

    /// Line number of the most recently read unit (1-based).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Column of the most recently read unit (0 at the start of a line).
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Read the next unit, or `None` at end of input.
    ///
    /// Pending push-backs are replayed first, most recent first.
    pub fn next(&mut self) -> Option<Unit> {
        if let Some(unit) = self.put_backs.pop() {
            self.advance(unit);
            return Some(unit);
        }

        let ch = self.source[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();

        let unit = match ch {
            '\r' => {
                if self.source[self.pos..].starts_with('\n') {
                    self.pos += 1;
                    self.line_break("\r\n")
                } else {
                    self.line_break("\r")
                }
            }
            '\n' => self.line_break("\n"),
            _ => Unit::Char(ch),
        };

        self.advance(unit);
        Some(unit)
    }

    /// Make `unit` the next value [`Self::next`] returns, reversing the
    /// line/column delta its read applied.
    ///
    /// Pushing back a line break restores the previous line number but not
    /// the column within that line; pushed-back units are consumed again
    /// before any position is reported, so the approximation is never
    /// observable through diagnostics.
    pub fn push_back(&mut self, unit: Unit) {
        match unit {
            Unit::LineBreak(_) => self.line = self.line.saturating_sub(1),
            Unit::Char(_) => self.column = self.column.saturating_sub(1),
        }

        self.put_backs.push(unit);
    }

    fn line_break(&self, source_form: &'static str) -> Unit {
        Unit::LineBreak(self.eol.map_or(source_form, LineEnding::as_str))
    }

    const fn advance(&mut self, unit: Unit) {
        match unit {
            Unit::LineBreak(_) => {
                self.line += 1;
                self.column = 0;
            }
            Unit::Char(_) => self.column += 1,
        }
    }
}
