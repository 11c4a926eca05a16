use proptest::{prelude::*, test_runner::{Config, TestRunner}};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

use crate::transformer::{
    WithTransformer,
    code_block::{CodeHighlightTransformer, highlight_css},
};

fn render(kind: CodeBlockKind<'static>, body: &str) -> Vec<Event<'static>> {
    let events = vec![
        Event::Start(Tag::CodeBlock(kind)),
        Event::Text(CowStr::from(body.to_string())),
        Event::End(TagEnd::CodeBlock),
    ];
    events
        .into_iter()
        .with_transformer::<CodeHighlightTransformer<_>>()
        .collect()
}

#[test]
fn code_highlight_replaces_block() {
    let mut runner = TestRunner::new(Config {
        cases: 8,
        failure_persistence: None,
        ..Config::default()
    });

    runner
        .run(&".*", |body| {
            let out = render(CodeBlockKind::Fenced(CowStr::from("rs")), &body);
            prop_assert_eq!(out.len(), 1);
            prop_assert!(matches!(out[0], Event::Html(_)));
            Ok(())
        })
        .unwrap();
}

#[test]
fn language_is_exposed_as_class_and_attribute() {
    let out = render(
        CodeBlockKind::Fenced(CowStr::from("ts title=\"a.ts\"")),
        "const a = 1;\n",
    );
    let Event::Html(html) = &out[0] else {
        panic!("expected html, got {out:?}");
    };
    assert!(html.starts_with("<div class=\"code-frame\"><pre class=\"code language-ts\" data-language=\"ts\"><code>"));
    assert!(html.ends_with("</code></pre></div>\n"));
    assert!(!html.contains("style="));
}

#[test]
fn indented_code_has_no_language() {
    let out = render(CodeBlockKind::Indented, "<b>\n");
    let Event::Html(html) = &out[0] else {
        panic!("expected html, got {out:?}");
    };
    assert!(html.starts_with("<div class=\"code-frame\"><pre class=\"code\"><code>"));
    assert!(html.contains("&lt;b&gt;"));
}

#[test]
fn other_events_pass_through() {
    let events = vec![
        Event::Start(Tag::Paragraph),
        Event::Text(CowStr::from("plain")),
        Event::End(TagEnd::Paragraph),
    ];
    let out: Vec<_> = events
        .clone()
        .into_iter()
        .with_transformer::<CodeHighlightTransformer<_>>()
        .collect();
    assert_eq!(out, events);
}

#[test]
fn stylesheet_has_no_background() {
    let css = highlight_css();
    assert!(!css.is_empty());
    assert!(!css.contains("background-color"));
}

#[test]
fn consecutive_blocks_do_not_share_state() {
    let events = vec![
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::from("sql")))),
        Event::Text(CowStr::from("SELECT 1;\n")),
        Event::End(TagEnd::CodeBlock),
        Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)),
        Event::Text(CowStr::from("plain\n")),
        Event::End(TagEnd::CodeBlock),
    ];
    let out: Vec<_> = events
        .into_iter()
        .with_transformer::<CodeHighlightTransformer<_>>()
        .collect();

    assert_eq!(out.len(), 2);
    let Event::Html(second) = &out[1] else {
        panic!("expected html, got {out:?}");
    };
    assert!(!second.contains("SELECT"));
    assert!(!second.contains("data-language"));
}
