//! The tokenizer state machine.
//!
//! A single-pass, pull-based traversal: the main loop draws one unit from
//! the cursor, dispatches on the current [`LexerState`], and hands finished
//! tokens to the handler slots. Whitespace between tokens accumulates in
//! `collected_space` and is flushed as the leading space of the next event,
//! which is what makes the stream reconstruct the input exactly. Every
//! recoverable error resynchronizes to [`LexerState::OutsideMarkup`] and
//! parsing continues.

use std::mem::take;

use strum_macros::Display;

use quoll_common::warning::warn_once;

use super::chars::{is_attribute_name_char, is_markup_start, is_tag_name_char};
use super::cursor::{Cursor, LineEnding, Unit};
use super::error::ParseError;
use super::events::HandlerSet;
use super::repair::repair_text;

/// Configuration for a traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexerOptions {
    /// Remap every line break to this form; `None` leaves breaks as read.
    pub line_ending: Option<LineEnding>,
    /// Repair text runs containing bare `<`, `>`, or malformed `&`
    /// references (see [`super::repair`]).
    pub repair_bad_text: bool,
}

/// The tokenizer's states.
///
/// The machine starts in `OutsideMarkup`, and that is the only state in
/// which end of input is clean; reaching the end in any other state reports
/// [`ParseError::UnexpectedEndOfFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LexerState {
    /// In text between markup; the initial state.
    OutsideMarkup,
    /// Just past a `<` known to start markup.
    AtMarkupStart,
    /// Just past `</`, before the tag name.
    AtCloseTagStart,
    /// Past a close tag's name, expecting `>`.
    InCloseTag,
    /// Just past `<!`, before deciding between declaration and comment.
    AtDeclarationStart,
    /// Just past `<!--`, inside a comment body.
    AtCommentStart,
    /// Just past `<?`, inside a processing instruction body.
    AtProcessingStart,
    /// Just past `<`, before an open tag's name.
    AtOpenTagStart,
    /// Inside an open tag, before an attribute name, `>`, or `/>`.
    AtAttributeStart,
    /// Past an attribute name, expecting `=` or the next attribute.
    AtAttributeAssignment,
    /// Past `=`, expecting the attribute value.
    AtAttributeValue,
}

/// The lossless HTML tokenizer.
///
/// Construct it over the full source text, register handlers with the
/// chainable `on_*` methods (an end handler is mandatory), then call
/// [`Self::parse`]. The instance can be pointed at new input with
/// [`Self::reset`] and reused; handlers and options are retained.
///
/// All traversal state - cursor, collected whitespace, partial tokens, the
/// push-back buffer - is owned exclusively by one lexer value, and `parse`
/// takes `&mut self`, so a traversal can never be driven twice concurrently.
pub struct HTMLLexer<'h> {
    cursor: Cursor,
    options: LexerOptions,
    state: LexerState,
    /// Whitespace seen since the last emitted event.
    collected_space: String,
    /// Leading space remembered for the pending close tag or attribute.
    leading_space: String,
    /// Whitespace between an attribute name and its `=`.
    pre_equals_space: String,
    /// Name of the tag currently being parsed.
    tag_name: String,
    /// Name of the attribute currently being parsed.
    attribute_name: String,
    handlers: HandlerSet<'h>,
}

impl<'h> HTMLLexer<'h> {
    /// Create a lexer over `source` with default options.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self::with_options(source, LexerOptions::default())
    }

    /// Create a lexer over `source` with explicit options.
    #[must_use]
    pub fn with_options(source: &str, options: LexerOptions) -> Self {
        Self {
            cursor: Cursor::new(source, options.line_ending),
            options,
            state: LexerState::OutsideMarkup,
            collected_space: String::new(),
            leading_space: String::new(),
            pre_equals_space: String::new(),
            tag_name: String::new(),
            attribute_name: String::new(),
            handlers: HandlerSet::default(),
        }
    }

    /// The lexer's current state, for diagnostics.
    #[must_use]
    pub const fn state(&self) -> LexerState {
        self.state
    }

    /// Point the lexer at new source text for another traversal.
    ///
    /// All traversal state is cleared; handlers and options are retained.
    pub fn reset(&mut self, source: &str) {
        self.cursor.reset(source);
        self.state = LexerState::OutsideMarkup;
        self.collected_space.clear();
        self.leading_space.clear();
        self.pre_equals_space.clear();
        self.tag_name.clear();
        self.attribute_name.clear();
    }

    /// Run the traversal to end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingEndHandler`] without starting when no
    /// end-of-input handler was registered. Every other detected problem is
    /// recovered from and reported through the error handler instead.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        if self.handlers.end.is_none() {
            return Err(ParseError::MissingEndHandler);
        }

        self.parse_to_end();

        let trailing = take(&mut self.collected_space);
        if let Some(end) = self.handlers.end.as_mut() {
            end(&trailing);
        }

        Ok(())
    }

    fn parse_to_end(&mut self) {
        loop {
            // Comment, declaration, and processing bodies keep their
            // interior whitespace, so those states read units raw.
            let unit = if matches!(
                self.state,
                LexerState::AtDeclarationStart
                    | LexerState::AtProcessingStart
                    | LexerState::AtCommentStart
            ) {
                self.cursor.next()
            } else {
                self.get_non_space()
            };

            let Some(unit) = unit else {
                break;
            };

            match self.state {
                LexerState::OutsideMarkup => {
                    self.cursor.push_back(unit);

                    let (body, trailing, found_markup) = self.gather_text();

                    if !body.is_empty() {
                        let leading = take(&mut self.collected_space);
                        self.emit_text(&leading, &body, &trailing);
                    }

                    if found_markup {
                        self.state = LexerState::AtMarkupStart;
                    }
                }

                LexerState::AtMarkupStart => {
                    if unit.is('/') {
                        self.state = LexerState::AtCloseTagStart;

                        match self.cursor.next() {
                            Some(next) if next.is_whitespace() => {
                                self.report_error(&ParseError::CloseTagSyntax);
                            }
                            Some(next) => self.cursor.push_back(next),
                            None => {}
                        }
                    } else if unit.is('!') {
                        self.state = LexerState::AtDeclarationStart;
                    } else if unit.is('?') {
                        self.state = LexerState::AtProcessingStart;
                    } else {
                        self.cursor.push_back(unit);
                        self.state = LexerState::AtOpenTagStart;
                    }
                }

                LexerState::AtOpenTagStart => {
                    self.gather_tag_name(unit);

                    let leading = take(&mut self.collected_space);
                    self.emit_open_tag_start(&leading);
                    self.state = LexerState::AtAttributeStart;
                }

                LexerState::AtCloseTagStart => {
                    self.gather_tag_name(unit);
                    self.leading_space = take(&mut self.collected_space);
                    self.state = LexerState::InCloseTag;
                }

                LexerState::InCloseTag => {
                    if unit.is('>') {
                        let leading = take(&mut self.leading_space);
                        let trailing = take(&mut self.collected_space);
                        self.emit_close_tag(&leading, &trailing);
                        self.state = LexerState::OutsideMarkup;
                    } else {
                        self.report_error(&ParseError::CloseTagSyntax);
                    }
                }

                LexerState::AtAttributeStart => {
                    let (unit, closer) = if unit.is('/') {
                        match self.cursor.next() {
                            Some(next) => (next, "/>"),
                            None => {
                                self.report_open_tag_error();
                                continue;
                            }
                        }
                    } else {
                        (unit, ">")
                    };

                    if unit.is('>') {
                        let leading = take(&mut self.collected_space);
                        self.emit_open_tag_end(&leading, closer);
                        self.state = LexerState::OutsideMarkup;
                    } else if closer == "/>" {
                        // `/` not followed by `>` inside a tag
                        self.report_open_tag_error();
                    } else if matches!(unit, Unit::Char(c) if is_attribute_name_char(c)) {
                        self.leading_space = take(&mut self.collected_space);
                        self.gather_attribute_name(unit);
                        self.state = LexerState::AtAttributeAssignment;
                    } else {
                        self.report_open_tag_error();
                    }
                }

                LexerState::AtAttributeAssignment => {
                    if unit.is('=') {
                        self.pre_equals_space = take(&mut self.collected_space);
                        self.state = LexerState::AtAttributeValue;
                    } else {
                        // Attribute without a value; reprocess the unit.
                        self.emit_attribute("", "", "");
                        self.cursor.push_back(unit);
                        self.state = LexerState::AtAttributeStart;
                    }
                }

                LexerState::AtAttributeValue => {
                    match unit {
                        Unit::Char(quote @ ('"' | '\'')) => {
                            let value = self.gather_quoted_value(quote);
                            let equals = format!(
                                "{}={}",
                                take(&mut self.pre_equals_space),
                                take(&mut self.collected_space)
                            );
                            let quote_text = if quote == '"' { "\"" } else { "'" };
                            self.emit_attribute(&equals, &value, quote_text);
                        }
                        Unit::Char(c) if is_attribute_name_char(c) => {
                            let value = self.gather_unquoted_value(unit);
                            let equals = format!(
                                "{}={}",
                                take(&mut self.pre_equals_space),
                                take(&mut self.collected_space)
                            );
                            self.emit_attribute(&equals, &value, "");
                        }
                        other => {
                            // Not a value start. The attribute ends with an
                            // empty value and the attribute-start rule
                            // reprocesses this unit, closing the tag for `>`
                            // and reporting anything else.
                            let equals = format!("{}=", take(&mut self.pre_equals_space));
                            self.emit_attribute(&equals, "", "");
                            self.cursor.push_back(other);
                        }
                    }

                    self.state = LexerState::AtAttributeStart;
                }

                LexerState::AtDeclarationStart => {
                    if unit.is('-') {
                        match self.cursor.next() {
                            Some(next) if next.is('-') => {
                                self.state = LexerState::AtCommentStart;
                                continue;
                            }
                            Some(next) => self.cursor.push_back(next),
                            None => {}
                        }
                    }

                    let (body, terminated) = self.gather_declaration(unit, true);

                    if terminated {
                        let leading = take(&mut self.collected_space);
                        self.emit_declaration(&leading, &body);
                        self.state = LexerState::OutsideMarkup;
                    } else {
                        self.report_error(&ParseError::UnterminatedDeclaration);
                    }
                }

                LexerState::AtProcessingStart => {
                    let (body, terminated) = self.gather_declaration(unit, false);

                    if terminated {
                        let leading = take(&mut self.collected_space);
                        self.emit_processing(&leading, &body);
                        self.state = LexerState::OutsideMarkup;
                    } else {
                        self.report_error(&ParseError::UnterminatedProcessingInstruction);
                    }
                }

                LexerState::AtCommentStart => {
                    let (body, terminated) = self.gather_comment(unit);

                    if terminated {
                        let leading = take(&mut self.collected_space);
                        self.emit_comment(&leading, &body);
                        self.state = LexerState::OutsideMarkup;
                    } else {
                        self.report_error(&ParseError::UnterminatedComment);
                    }
                }
            }
        }

        if self.state != LexerState::OutsideMarkup {
            self.report_error(&ParseError::UnexpectedEndOfFile);
        }
    }

    /// Read past whitespace, accumulating it in `collected_space`, and
    /// return the first non-whitespace unit.
    fn get_non_space(&mut self) -> Option<Unit> {
        loop {
            let unit = self.cursor.next()?;

            if unit.is_whitespace() {
                unit.push_onto(&mut self.collected_space);
            } else {
                return Some(unit);
            }
        }
    }

    /// Like [`Self::get_non_space`], but pushes the non-whitespace unit
    /// back instead of returning it.
    fn eat_whitespace(&mut self) {
        while let Some(unit) = self.cursor.next() {
            if unit.is_whitespace() {
                unit.push_onto(&mut self.collected_space);
            } else {
                self.cursor.push_back(unit);
                return;
            }
        }
    }

    /// Gather a text run up to the next `<` that genuinely starts markup,
    /// or end of input.
    ///
    /// Returns the body (repaired if enabled and flagged), the run's
    /// trailing whitespace, and whether markup was found. A `<` not
    /// followed by a markup-start character stays in the body.
    fn gather_text(&mut self) -> (String, String, bool) {
        let mut text = String::new();
        let mut ws_start: Option<usize> = None;
        let mut might_need_repair = false;
        let mut found_markup = false;

        self.eat_whitespace();

        while let Some(unit) = self.cursor.next() {
            if unit.is('<') {
                match self.cursor.next() {
                    Some(next) if next.as_char().is_some_and(is_markup_start) => {
                        self.cursor.push_back(next);
                        found_markup = true;
                        break;
                    }
                    next => {
                        text.push('<');
                        ws_start = None;
                        might_need_repair = true;

                        if let Some(next) = next {
                            self.cursor.push_back(next);
                        }
                    }
                }
            } else {
                if unit.is_whitespace() {
                    if ws_start.is_none() {
                        ws_start = Some(text.len());
                    }
                } else {
                    ws_start = None;

                    if unit.is('>') || unit.is('&') {
                        might_need_repair = true;
                    }
                }

                unit.push_onto(&mut text);
            }
        }

        let trailing = ws_start.map_or_else(String::new, |at| text.split_off(at));

        if might_need_repair && self.options.repair_bad_text {
            text = repair_text(&text);
        }

        (text, trailing, found_markup)
    }

    /// Gather a tag name starting with `init`, pushing back the first unit
    /// that fails the tag-name classifier.
    fn gather_tag_name(&mut self, init: Unit) {
        self.tag_name.clear();
        init.push_onto(&mut self.tag_name);

        while let Some(unit) = self.cursor.next() {
            match unit {
                Unit::Char(c) if is_tag_name_char(c) => self.tag_name.push(c),
                _ => {
                    self.cursor.push_back(unit);
                    break;
                }
            }
        }
    }

    /// Gather an attribute name starting with `init`, pushing back the
    /// first unit that fails the attribute-name classifier.
    fn gather_attribute_name(&mut self, init: Unit) {
        self.attribute_name.clear();
        init.push_onto(&mut self.attribute_name);

        while let Some(unit) = self.cursor.next() {
            match unit {
                Unit::Char(c) if is_attribute_name_char(c) => self.attribute_name.push(c),
                _ => {
                    self.cursor.push_back(unit);
                    break;
                }
            }
        }
    }

    /// Gather a quoted attribute value, consuming (but not keeping) the
    /// closing quote. An unclosed quote runs to end of input; the main loop
    /// reports the resulting unexpected end of file.
    fn gather_quoted_value(&mut self, quote: char) -> String {
        let mut value = String::new();

        while let Some(unit) = self.cursor.next() {
            if unit.is(quote) {
                break;
            }

            unit.push_onto(&mut value);
        }

        value
    }

    /// Gather an unquoted attribute value starting with `init`.
    ///
    /// The value ends at whitespace, `>`, or a `/` that begins `/>`; a `/`
    /// followed by anything else belongs to the value (`foo/bar` is one
    /// value). The terminating unit(s) are pushed back.
    fn gather_unquoted_value(&mut self, init: Unit) -> String {
        let mut value = String::new();
        init.push_onto(&mut value);

        while let Some(unit) = self.cursor.next() {
            if unit.is_whitespace() || unit.is('>') {
                self.cursor.push_back(unit);
                break;
            }

            if unit.is('/') {
                match self.cursor.next() {
                    Some(next) if next.is('>') => {
                        self.cursor.push_back(next);
                        self.cursor.push_back(unit);
                        break;
                    }
                    Some(next) => {
                        value.push('/');
                        self.cursor.push_back(next);
                    }
                    None => {
                        value.push('/');
                        break;
                    }
                }
            } else {
                unit.push_onto(&mut value);
            }
        }

        value
    }

    /// Gather a declaration or processing-instruction body starting with
    /// `init`, up to the terminating `>` (excluded from the body).
    ///
    /// With `quote_aware` set, `"` toggles an in-quotes condition that
    /// suppresses `>` termination; `'` never toggles and there is no escape
    /// handling. Returns the body and whether the terminator was found.
    fn gather_declaration(&mut self, init: Unit, quote_aware: bool) -> (String, bool) {
        let mut body = String::new();
        let mut in_quotes = false;
        let mut pending = Some(init);

        loop {
            let Some(unit) = pending.take().or_else(|| self.cursor.next()) else {
                return (body, false);
            };

            if quote_aware && unit.is('"') {
                in_quotes = !in_quotes;
            } else if !in_quotes && unit.is('>') {
                return (body, true);
            }

            unit.push_onto(&mut body);
        }
    }

    /// Gather a comment body starting with `init`, up to the terminating
    /// `-->` (excluded from the body).
    ///
    /// A sliding three-stage scan: a run of dashes keeps the scanner armed,
    /// so `--->` terminates. Returns the body and whether the terminator
    /// was found.
    fn gather_comment(&mut self, init: Unit) -> (String, bool) {
        let mut body = String::new();
        let mut stage = usize::from(init.is('-'));
        init.push_onto(&mut body);

        while let Some(unit) = self.cursor.next() {
            unit.push_onto(&mut body);

            if unit.is('-') {
                stage = (stage + 1).min(2);
            } else if stage == 2 && unit.is('>') {
                body.truncate(body.len() - 3);
                return (body, true);
            } else {
                stage = 0;
            }
        }

        (body, false)
    }

    /// Report a recoverable error and resynchronize to `OutsideMarkup`.
    ///
    /// With no error handler registered the error goes to the shared
    /// warning system instead, so it is never silently dropped.
    fn report_error(&mut self, error: &ParseError) {
        let (line, column) = (self.cursor.line(), self.cursor.column());

        if let Some(cb) = self.handlers.error.as_mut() {
            cb(error, line, column);
        } else {
            warn_once("HTML Lexer", &format!("{error} [{line}:{column}]"));
        }

        self.state = LexerState::OutsideMarkup;
    }

    fn report_open_tag_error(&mut self) {
        let error = ParseError::OpenTagSyntax {
            tag: self.tag_name.clone(),
        };
        self.report_error(&error);
    }

    fn emit_open_tag_start(&mut self, leading: &str) {
        if let Some(cb) = self.handlers.open_tag_start.as_mut() {
            cb(leading, &self.tag_name, "");
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            let raw = format!("<{}", self.tag_name);
            cb(leading, &raw, "");
        }
    }

    fn emit_open_tag_end(&mut self, leading: &str, closer: &str) {
        if let Some(cb) = self.handlers.open_tag_end.as_mut() {
            cb(leading, &self.tag_name, closer);
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            cb(leading, closer, "");
        }
    }

    fn emit_close_tag(&mut self, leading: &str, trailing: &str) {
        if let Some(cb) = self.handlers.close_tag.as_mut() {
            cb(leading, &self.tag_name, trailing);
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            let raw = format!("</{}", self.tag_name);
            let tail = format!("{trailing}>");
            cb(leading, &raw, &tail);
        }
    }

    fn emit_attribute(&mut self, equals_sign: &str, value: &str, quote: &str) {
        if let Some(cb) = self.handlers.attribute.as_mut() {
            cb(
                &self.leading_space,
                &self.attribute_name,
                equals_sign,
                value,
                quote,
            );
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            let raw = format!("{}{equals_sign}{quote}{value}{quote}", self.attribute_name);
            cb(&self.leading_space, &raw, "");
        }
    }

    fn emit_text(&mut self, leading: &str, body: &str, trailing: &str) {
        if let Some(cb) = self.handlers.text.as_mut() {
            cb(leading, body, trailing);
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            cb(leading, body, trailing);
        }
    }

    fn emit_comment(&mut self, leading: &str, body: &str) {
        if let Some(cb) = self.handlers.comment.as_mut() {
            cb(leading, body, "");
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            let raw = format!("<!--{body}-->");
            cb(leading, &raw, "");
        }
    }

    fn emit_declaration(&mut self, leading: &str, body: &str) {
        if let Some(cb) = self.handlers.declaration.as_mut() {
            cb(leading, body, "");
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            let raw = format!("<!{body}>");
            cb(leading, &raw, "");
        }
    }

    fn emit_processing(&mut self, leading: &str, body: &str) {
        if let Some(cb) = self.handlers.processing.as_mut() {
            cb(leading, body, "");
        } else if let Some(cb) = self.handlers.unhandled.as_mut() {
            let raw = format!("<?{body}>");
            cb(leading, &raw, "");
        }
    }
}

/// Handler registration. Each method stores its closure in the matching
/// slot and returns `&mut Self` so registrations chain fluently.
impl<'h> HTMLLexer<'h> {
    /// Register the attribute handler:
    /// `(leading_space, name, equals_sign, value, quote)`.
    pub fn on_attribute(
        &mut self,
        handler: impl FnMut(&str, &str, &str, &str, &str) + 'h,
    ) -> &mut Self {
        self.handlers.attribute = Some(Box::new(handler));
        self
    }

    /// Register the close-tag handler: `(leading_space, name, trailing)`.
    pub fn on_close_tag(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.close_tag = Some(Box::new(handler));
        self
    }

    /// Register the comment handler: `(leading_space, body, "")`. The body
    /// excludes the `<!--` and `-->` delimiters.
    pub fn on_comment(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.comment = Some(Box::new(handler));
        self
    }

    /// Register the declaration handler: `(leading_space, body, "")`. The
    /// body excludes the `<!` and `>` delimiters.
    pub fn on_declaration(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.declaration = Some(Box::new(handler));
        self
    }

    /// Register the mandatory end-of-input handler:
    /// `(final_trailing_space)`.
    pub fn on_end(&mut self, handler: impl FnMut(&str) + 'h) -> &mut Self {
        self.handlers.end = Some(Box::new(handler));
        self
    }

    /// Register the error handler: `(error, line, column)`.
    pub fn on_error(&mut self, handler: impl FnMut(&ParseError, usize, usize) + 'h) -> &mut Self {
        self.handlers.error = Some(Box::new(handler));
        self
    }

    /// Register the open-tag-end handler: `(leading_space, name, closer)`,
    /// where closer is `">"` or `"/>"`.
    pub fn on_open_tag_end(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.open_tag_end = Some(Box::new(handler));
        self
    }

    /// Register the open-tag-start handler: `(leading_space, name, "")`.
    pub fn on_open_tag_start(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.open_tag_start = Some(Box::new(handler));
        self
    }

    /// Register the processing-instruction handler:
    /// `(leading_space, body, "")`. The body excludes the `<?` and `>`
    /// delimiters.
    pub fn on_processing(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.processing = Some(Box::new(handler));
        self
    }

    /// Register the text handler: `(leading_space, body, trailing)`.
    pub fn on_text(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.text = Some(Box::new(handler));
        self
    }

    /// Register the unhandled fallback: `(leading_space, raw, trailing)`.
    ///
    /// Any event kind without a specific handler is routed here with the
    /// raw reconstructed markup for the event, so concatenating the fields
    /// still reproduces the input under partial registration.
    pub fn on_unhandled(&mut self, handler: impl FnMut(&str, &str, &str) + 'h) -> &mut Self {
        self.handlers.unhandled = Some(Box::new(handler));
        self
    }
}
