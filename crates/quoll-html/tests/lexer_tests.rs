//! Integration tests for the tokenizer state machine and text repair.

use std::cell::RefCell;
use std::rc::Rc;

use quoll_html::lexer::repair::repair_text;
use quoll_html::{HTMLLexer, LexerOptions, ParseError};

/// Run the lexer over `source` with every handler registered, recording one
/// labeled line per event. Leading/trailing fields are debug-quoted so
/// whitespace differences show up in failures.
fn capture_events(source: &str, options: LexerOptions) -> Vec<String> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut lexer = HTMLLexer::with_options(source, options);

    let sink = Rc::clone(&events);
    let _ = lexer.on_open_tag_start(move |leading, name, _| {
        sink.borrow_mut().push(format!("open-start {leading:?} {name}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_open_tag_end(move |leading, name, closer| {
        sink.borrow_mut().push(format!("open-end {leading:?} {name} {closer}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_close_tag(move |leading, name, trailing| {
        sink.borrow_mut().push(format!("close {leading:?} {name} {trailing:?}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_attribute(move |leading, name, equals, value, quote| {
        sink.borrow_mut()
            .push(format!("attribute {leading:?} {name} {equals:?} {value:?} {quote:?}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_text(move |leading, body, trailing| {
        sink.borrow_mut().push(format!("text {leading:?} {body:?} {trailing:?}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_comment(move |leading, body, _| {
        sink.borrow_mut().push(format!("comment {leading:?} {body:?}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_declaration(move |leading, body, _| {
        sink.borrow_mut().push(format!("declaration {leading:?} {body:?}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_processing(move |leading, body, _| {
        sink.borrow_mut().push(format!("processing {leading:?} {body:?}"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_error(move |error, line, column| {
        sink.borrow_mut().push(format!("error {error} [{line}:{column}]"));
    });

    let sink = Rc::clone(&events);
    let _ = lexer.on_end(move |trailing| {
        sink.borrow_mut().push(format!("end {trailing:?}"));
    });

    lexer.parse().expect("an end handler is registered");

    events.borrow().clone()
}

fn capture(source: &str) -> Vec<String> {
    capture_events(source, LexerOptions::default())
}

#[test]
fn test_tokenizes_an_element_with_text() {
    assert_eq!(
        capture("<p>Hello</p>"),
        [
            "open-start \"\" p",
            "open-end \"\" p >",
            "text \"\" \"Hello\" \"\"",
            "close \"\" p \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_splits_text_into_leading_body_and_trailing() {
    assert_eq!(
        capture("  Hello,  world  "),
        ["text \"  \" \"Hello,  world\" \"  \"", "end \"\""]
    );
}

#[test]
fn test_whitespace_only_input_goes_to_the_end_event() {
    assert_eq!(capture(" \t \n "), ["end \" \\t \\n \""]);
}

#[test]
fn test_reports_attributes_with_their_source_form() {
    assert_eq!(
        capture("<a href=\"url\" download>link</a>"),
        [
            "open-start \"\" a",
            "attribute \" \" href \"=\" \"url\" \"\\\"\"",
            "attribute \" \" download \"\" \"\" \"\"",
            "open-end \"\" a >",
            "text \"\" \"link\" \"\"",
            "close \"\" a \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_equals_sign_keeps_its_surrounding_whitespace() {
    assert_eq!(
        capture("<input value = 'x'>"),
        [
            "open-start \"\" input",
            "attribute \" \" value \" = \" \"x\" \"'\"",
            "open-end \"\" input >",
            "end \"\"",
        ]
    );
}

#[test]
fn test_a_slash_inside_an_unquoted_value_belongs_to_the_value() {
    assert_eq!(
        capture("<a href=foo/bar>"),
        [
            "open-start \"\" a",
            "attribute \" \" href \"=\" \"foo/bar\" \"\"",
            "open-end \"\" a >",
            "end \"\"",
        ]
    );
}

#[test]
fn test_a_slash_before_the_closer_ends_an_unquoted_value() {
    assert_eq!(
        capture("<a href=foo/>"),
        [
            "open-start \"\" a",
            "attribute \" \" href \"=\" \"foo\" \"\"",
            "open-end \"\" a />",
            "end \"\"",
        ]
    );
}

#[test]
fn test_tokenizes_a_self_closing_tag() {
    assert_eq!(
        capture("<br/>"),
        ["open-start \"\" br", "open-end \"\" br />", "end \"\""]
    );
}

#[test]
fn test_comment_bodies_exclude_the_delimiters() {
    assert_eq!(
        capture("x<!-- note -->y"),
        [
            "text \"\" \"x\" \"\"",
            "comment \"\" \" note \"",
            "text \"\" \"y\" \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_a_dash_run_still_terminates_a_comment() {
    assert_eq!(capture("<!--a--->"), ["comment \"\" \"a-\"", "end \"\""]);
}

#[test]
fn test_tokenizes_a_doctype_declaration() {
    assert_eq!(
        capture("<!DOCTYPE html>"),
        ["declaration \"\" \"DOCTYPE html\"", "end \"\""]
    );
}

#[test]
fn test_a_quoted_gt_does_not_end_a_declaration() {
    assert_eq!(
        capture("<!ENTITY greeting \"he>llo\">"),
        ["declaration \"\" \"ENTITY greeting \\\"he>llo\\\"\"", "end \"\""]
    );
}

#[test]
fn test_tokenizes_a_processing_instruction() {
    assert_eq!(
        capture("<?xml version=\"1.0\"?>"),
        ["processing \"\" \"xml version=\\\"1.0\\\"?\"", "end \"\""]
    );
}

#[test]
fn test_processing_instructions_are_not_quote_aware() {
    // the first > ends the instruction even inside quotes
    assert_eq!(
        capture("<?x \">\" ?>"),
        [
            "processing \"\" \"x \\\"\"",
            "text \"\" \"\\\" ?>\" \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_a_stray_lt_stays_in_the_text() {
    assert_eq!(capture("a < b"), ["text \"\" \"a < b\" \"\"", "end \"\""]);
}

#[test]
fn test_close_tags_keep_whitespace_before_the_gt() {
    assert_eq!(
        capture("x</p  >"),
        ["text \"\" \"x\" \"\"", "close \"\" p \"  \"", "end \"\""]
    );
}

#[test]
fn test_whitespace_after_a_close_tag_slash_is_an_error() {
    assert_eq!(
        capture("</ p>"),
        [
            "error Syntax error in close tag [1:3]",
            "text \"\" \"p>\" \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_a_bad_character_in_an_attribute_position_is_an_error() {
    assert_eq!(
        capture("<a href=@>next"),
        [
            "open-start \"\" a",
            "attribute \" \" href \"=\" \"\" \"\"",
            "error Syntax error in <a> [1:9]",
            "text \"\" \">next\" \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_errors_carry_the_line_of_later_input() {
    assert_eq!(
        capture("one\n</ x>"),
        [
            "text \"\" \"one\" \"\\n\"",
            "error Syntax error in close tag [2:3]",
            "text \"\" \"x>\" \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_an_unterminated_comment_is_reported_and_recovered() {
    assert_eq!(
        capture("<!-- oops"),
        ["error File ended in unterminated comment [1:9]", "end \"\""]
    );
}

#[test]
fn test_input_ending_inside_a_tag_is_an_unexpected_end() {
    assert_eq!(
        capture("<a href"),
        [
            "open-start \"\" a",
            "error Unexpected end of file [1:7]",
            "end \"\"",
        ]
    );
}

#[test]
fn test_repair_rewrites_flagged_text_runs() {
    let options = LexerOptions {
        line_ending: None,
        repair_bad_text: true,
    };

    assert_eq!(
        capture_events("a < b & AT&T > c", options),
        [
            "text \"\" \"a &lt; b &amp; AT&T; &gt; c\" \"\"",
            "end \"\"",
        ]
    );
}

#[test]
fn test_repair_leaves_trailing_whitespace_alone() {
    let options = LexerOptions {
        line_ending: None,
        repair_bad_text: true,
    };

    assert_eq!(
        capture_events("bits & bobs  \n", options),
        ["text \"\" \"bits &amp; bobs\" \"  \\n\"", "end \"\""]
    );
}

#[test]
fn test_the_lexer_reports_its_state_by_name() {
    let lexer = HTMLLexer::new("");

    assert_eq!(lexer.state().to_string(), "OutsideMarkup");
}

#[test]
fn test_parse_requires_an_end_handler() {
    let mut lexer = HTMLLexer::new("text");

    assert_eq!(lexer.parse(), Err(ParseError::MissingEndHandler));
}

#[test]
fn test_reset_allows_reusing_handlers_on_new_input() {
    let texts = Rc::new(RefCell::new(Vec::new()));
    let mut lexer = HTMLLexer::new("first");

    let captured = Rc::clone(&texts);
    let _ = lexer
        .on_text(move |_, body, _| captured.borrow_mut().push(body.to_owned()))
        .on_end(|_| {});

    lexer.parse().expect("an end handler is registered");
    lexer.reset("second");
    lexer.parse().expect("an end handler is registered");

    assert_eq!(*texts.borrow(), ["first", "second"]);
}

#[test]
fn test_repair_inserts_amp_after_a_bare_ampersand() {
    assert_eq!(repair_text("a & b"), "a &amp; b");
}

#[test]
fn test_repair_terminates_an_unterminated_reference() {
    assert_eq!(repair_text("AT&T"), "AT&T;");
    assert_eq!(repair_text("&#160 and &#xA0 left"), "&#160; and &#xA0; left");
}

#[test]
fn test_repair_keeps_well_formed_references() {
    assert_eq!(repair_text("&lt; stays &#38; so &#x26; this"), "&lt; stays &#38; so &#x26; this");
}

#[test]
fn test_repair_escapes_structural_characters() {
    assert_eq!(repair_text("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
}
