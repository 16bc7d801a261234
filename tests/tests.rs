use std::cell::{Cell, RefCell};
use tagback::*;

/// Parses `document` with a recording handler for each of `names`. Returns the parse
/// result and every `(tag, content)` the handlers saw, in call order.
fn collect(
    document: &str,
    names: &[&'static str],
) -> (Result<(), ParseError>, Vec<(String, String)>) {
    let calls = RefCell::new(Vec::new());
    let mut registry = CallbackRegistry::new();
    for &name in names {
        let calls = &calls;
        registry.register(name, move |content| {
            calls
                .borrow_mut()
                .push((name.to_string(), content.to_string()));
        });
    }
    let result = parse(document.as_bytes(), &mut registry);
    drop(registry);
    (result, calls.into_inner())
}

fn call(name: &str, content: &str) -> (String, String) {
    (name.to_string(), content.to_string())
}

fn kind_and_offset(result: Result<(), ParseError>) -> (ErrorKind, usize) {
    let error = result.unwrap_err();
    (error.kind, error.offset)
}

#[test]
fn content_span_is_exact() {
    let (result, calls) = collect("<a> TEXT, with\n spaces </a>", &["a"]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("a", " TEXT, with\n spaces ")]);
}

#[test]
fn content_view_knows_its_offset() {
    let seen = Cell::new((0, 0));
    let mut registry = CallbackRegistry::new();
    registry.register("b", |content| seen.set((content.offset(), content.len())));
    parse(b"<a><b>xyz</b></a>", &mut registry).unwrap();
    assert_eq!(seen.get(), (6, 3));
}

#[test]
fn unknown_tag_is_inert() {
    let mut registry = CallbackRegistry::new();
    let mut parser = XmlParser::from("<x>hello</x>");
    assert!(parser.parse(&mut registry).is_ok());
    assert_eq!(parser.error(), None);
    assert_eq!(parser.elements(), 1);
}

#[test]
fn nested_markup_preserved_raw() {
    let (result, calls) = collect("<a><b>5</b></a>", &["a"]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("a", "<b>5</b>")]);
}

#[test]
fn inner_handlers_fire_before_outer() {
    let (result, calls) = collect("<a><b>1</b><c>2</c></a>", &["a", "b", "c"]);
    assert!(result.is_ok());
    assert_eq!(
        calls,
        vec![call("b", "1"), call("c", "2"), call("a", "<b>1</b><c>2</c>")]
    );
}

#[test]
fn mismatched_tags_fail_at_first_closing_tag() {
    let (result, calls) = collect("<a><b></a></b>", &["a", "b"]);
    assert_eq!(kind_and_offset(result), (ErrorKind::UnbalancedTags, 6));
    assert!(calls.is_empty());
}

#[test]
fn tag_names_are_case_sensitive() {
    let (result, _) = collect("<a></A>", &[]);
    assert_eq!(kind_and_offset(result), (ErrorKind::UnbalancedTags, 3));
}

#[test]
fn duplicate_registration_first_wins() {
    let first = Cell::new(0);
    let second = Cell::new(0);
    let mut registry = CallbackRegistry::new();
    registry
        .register("x", |_| first.set(first.get() + 1))
        .register("x", |_| second.set(second.get() + 1));
    assert_eq!(registry.len(), 2);
    parse(b"<x>1</x>", &mut registry).unwrap();
    drop(registry);
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
}

#[test]
fn handler_trait_objects_can_be_registered() {
    struct Counter<'a>(&'a Cell<usize>);

    impl Handler for Counter<'_> {
        fn handle(&mut self, content: View<'_>) {
            self.0.set(self.0.get() + content.len());
        }
    }

    let total = Cell::new(0);
    let mut registry = CallbackRegistry::new();
    registry.register_handler("n", Counter(&total));
    parse(b"<n>12</n><n>345</n>", &mut registry).unwrap();
    assert_eq!(total.get(), 5);
}

#[test]
fn comments_are_invisible_to_structure() {
    let (result, calls) = collect("<a><!-- <b> --></a>", &["a", "b"]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("a", "<!-- <b> -->")]);
}

#[test]
fn comment_ends_at_first_terminator() {
    let (result, calls) = collect("<a><!-- x --> y --></a>", &["a"]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("a", "<!-- x --> y -->")]);
}

#[test]
fn comment_with_extra_dashes() {
    let (result, calls) = collect("<a><!-- x -- y ---></a>", &["a"]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("a", "<!-- x -- y --->")]);
}

#[test]
fn nested_comment_opener_is_not_special() {
    let (result, calls) = collect("<!-- Bob <!-- --><bobby>\n</bobby>", &["bobby"]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("bobby", "\n")]);
}

#[test]
fn malformed_comment() {
    let (result, _) = collect("<a><!x></a>", &[]);
    assert_eq!(kind_and_offset(result), (ErrorKind::MalformedComment, 3));
}

#[test]
fn unterminated_comment() {
    let (result, _) = collect("<a><!-- never closed -></a>", &[]);
    assert_eq!(kind_and_offset(result), (ErrorKind::UnterminatedComment, 3));

    let (result, _) = collect("<a><!-", &[]);
    assert_eq!(kind_and_offset(result), (ErrorKind::UnterminatedComment, 3));
}

#[test]
fn unterminated_tag() {
    let (result, calls) = collect("<bob>\n</bob", &["bob"]);
    assert_eq!(kind_and_offset(result), (ErrorKind::UnterminatedTag, 6));
    assert!(calls.is_empty());
}

#[test]
fn lone_angle_bracket_at_end() {
    let (result, calls) = collect("<a>1</a><", &["a"]);
    assert_eq!(kind_and_offset(result), (ErrorKind::UnterminatedTag, 8));
    assert_eq!(calls, vec![call("a", "1")]);
}

#[test]
fn closing_tag_with_nothing_open() {
    let (result, _) = collect("text </a>", &["a"]);
    assert_eq!(kind_and_offset(result), (ErrorKind::StackUnderflow, 5));
}

#[test]
fn unclosed_tags_at_end_are_an_error() {
    let (result, calls) = collect("<a><b>1</b>", &["a", "b"]);
    let error = result.unwrap_err();
    assert_eq!(error.kind, ErrorKind::UnbalancedTags);
    assert_eq!(error.offset, 0);
    assert_eq!(error.message, "Tag never closed");
    assert_eq!(calls, vec![call("b", "1")]);
}

#[test]
fn unclosed_tags_can_be_allowed() {
    let mut parser = XmlParser::from("<a><b>1</b>").with_options(Options {
        allow_unclosed: true,
        ..Options::default()
    });
    assert!(parser.parse(&mut CallbackRegistry::new()).is_ok());
    assert_eq!(parser.state(), ParserState::Finished);
    assert_eq!(parser.depth(), 0);
}

#[test]
fn empty_names_are_accepted() {
    let (result, calls) = collect("<>x</>", &[""]);
    assert!(result.is_ok());
    assert_eq!(calls, vec![call("", "x")]);
}

#[test]
fn empty_document() {
    for document in ["", "   \n\t", "<!-- nothing -->\n", "just text"] {
        let (result, calls) = collect(document, &["a"]);
        assert!(result.is_ok(), "{document:?}");
        assert!(calls.is_empty());
    }
}

#[test]
fn depth_integrity() {
    let names: Vec<String> = (0..1000).map(|level| format!("l{level}")).collect();
    let mut document = String::new();
    for name in &names {
        document.push_str(&format!("<{name}>"));
    }
    for name in names.iter().rev() {
        document.push_str(&format!("</{name}>"));
    }

    let order = RefCell::new(Vec::new());
    let mut registry = CallbackRegistry::new();
    for (level, name) in names.iter().enumerate() {
        let order = &order;
        registry.register(name.as_str(), move |_| order.borrow_mut().push(level));
    }
    let mut parser = XmlParser::from(document.as_str());
    parser.parse(&mut registry).unwrap();
    assert_eq!(parser.depth(), 0);
    assert_eq!(parser.elements(), 1000);
    drop(registry);

    let expected: Vec<usize> = (0..1000).rev().collect();
    assert_eq!(order.into_inner(), expected);
}

#[test]
fn error_slot_records_halt() {
    let mut parser = XmlParser::from("<a><b></a></b>");
    let result = parser.parse(&mut CallbackRegistry::new());
    assert_eq!(parser.state(), ParserState::Halted);
    assert_eq!(parser.error(), result.as_ref().err());
    assert_eq!(parser.error().map(|error| error.offset), Some(6));
}

#[test]
fn parser_can_run_again() {
    let count = Cell::new(0);
    let mut registry = CallbackRegistry::new();
    registry.register("a", |_| count.set(count.get() + 1));
    let mut parser = XmlParser::from("<a></a><a></a>");
    parser.parse(&mut registry).unwrap();
    parser.parse(&mut registry).unwrap();
    assert_eq!(count.get(), 4);
    assert_eq!(parser.elements(), 2);
}

#[test]
fn diagnostic_shows_position_and_excerpt() {
    let document = "<a>\n\t<b></a></b>";
    let error = parse(document.as_bytes(), &mut CallbackRegistry::new()).unwrap_err();
    let diagnostic = error.diagnostic(document.as_bytes(), &Options::default());
    assert_eq!(diagnostic.position, FilePosition { line: 2, column: 8 });
    assert_eq!(diagnostic.excerpt, b"</a></b>");
    assert_eq!(
        diagnostic.to_string(),
        "Error Mismatched opening/closing tags\n\tAt:8 [2:8] (</a></b>...)"
    );
}

#[test]
fn excerpt_is_capped() {
    let error = ParseError::new(ErrorKind::UnterminatedTag, 2);
    assert_eq!(error.excerpt(b"0123456789abcdef", 4), b"2345");
    assert_eq!(error.excerpt(b"012", 4), b"2");
    assert_eq!(error.excerpt(b"", 4), b"");
}

#[test]
fn crlf_counts_as_one_line_break() {
    let position = lexer::position_at(b"<a>\r\n<b>", 5, 4);
    assert_eq!(position, FilePosition { line: 2, column: 1 });
}

#[test]
fn view_helpers() {
    let buffer = b"  <name> \n";
    let view = View::new(buffer);
    let trimmed = view.trim();
    assert_eq!(trimmed, "<name>");
    assert_eq!(trimmed.offset(), 2);
    let inner = trimmed.slice(1..5).unwrap();
    assert_eq!(inner, "name");
    assert_eq!(inner.offset(), 3);
    assert!(trimmed.slice(4..9).is_none());
    assert_eq!(View::new(b" \t ").trim().len(), 0);
}

use proptest::prelude::*;

proptest! {
    #[test]
    fn doesnt_crash_01(s in "\\PC*") {
        let calls = Cell::new(0);
        let mut registry = CallbackRegistry::new();
        registry.register("a", |_| calls.set(calls.get() + 1));
        let _ = parse(s.as_bytes(), &mut registry);
    }

    #[test]
    fn doesnt_crash_02(s in "([<>/!ab -]|<!--|-->){0,40}") {
        let mut registry = CallbackRegistry::new();
        registry.register("a", |_| {}).register("b", |_| {});
        let _ = parse(s.as_bytes(), &mut registry);
    }

    #[test]
    fn content_round_trips(text in "[^<>]*") {
        let (result, calls) = collect(&format!("<a>{text}</a>"), &["a"]);
        prop_assert!(result.is_ok());
        prop_assert_eq!(calls, vec![call("a", &text)]);
    }
}
