//! Footnotes, GFM style: numbered superscript references and a list of
//! definitions at the end of the document, each with a link back to its
//! first reference.

use std::{collections::HashMap, fmt::Write as _};

use pulldown_cmark::{CowStr, Event, Tag};

use crate::{
    transformer::Transformer,
    utils::{FenceTracker, Segment, code_spans},
};

/// Label prefix of footnotes generated from `^[inline notes]`.
pub const INLINE_NOTE_PREFIX: &str = "inline-";

/// Turn every `^[inline note]` into a reference to a generated footnote
/// whose definition is appended to the text.
pub fn expand_inline_notes(text: &str) -> String {
    let mut body = String::with_capacity(text.len());
    let mut definitions = String::new();
    let mut fence = FenceTracker::new();
    let mut count = 0usize;

    for line in text.split_inclusive('\n') {
        if fence.is_code(line) {
            body.push_str(line);
            continue;
        }

        for segment in code_spans(line) {
            let mut rest = match segment {
                Segment::Code(code) => {
                    body.push_str(code);
                    continue;
                }
                Segment::Prose(prose) => prose,
            };

            while let Some(start) = rest.find("^[") {
                let Some(len) = note_len(&rest[start + 1..]) else {
                    body.push_str(&rest[..start + 2]);
                    rest = &rest[start + 2..];
                    continue;
                };

                count += 1;
                let note = &rest[start + 2..start + len];
                let _ = write!(body, "{}[^{INLINE_NOTE_PREFIX}{count}]", &rest[..start]);
                let _ = write!(definitions, "\n[^{INLINE_NOTE_PREFIX}{count}]: {note}\n");
                rest = &rest[start + 1 + len..];
            }
            body.push_str(rest);
        }
    }

    if !definitions.is_empty() {
        if !body.ends_with('\n') {
            body.push('\n');
        }
        body.push_str(&definitions);
    }
    body
}

/// Byte length of the bracketed note at the start of `s`, brackets included.
fn note_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Render footnotes as simple superscripts with an appended ordered list.
pub struct PlainFootnoteTransformer<'a> {
    inner: std::vec::IntoIter<Event<'a>>,
}

impl<'a> Iterator for PlainFootnoteTransformer<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, I> Transformer<'a, I> for PlainFootnoteTransformer<'a>
where
    I: Iterator<Item = Event<'a>>,
{
    fn transform(inner: I) -> Self {
        let events: Vec<Event<'a>> = inner.collect();
        let rewritten = convert_footnotes_to_plain_list(events);
        Self {
            inner: rewritten.into_iter(),
        }
    }
}

/// Convert footnotes into bare HTML that reads correctly without CSS.
pub fn convert_footnotes_to_plain_list<'a>(events: Vec<Event<'a>>) -> Vec<Event<'a>> {
    let defs = FootnoteDefinitions::collect(&events);
    let mut out: Vec<Event<'a>> = Vec::with_capacity(events.len() + 8);

    let mut skipping_definition_depth: usize = 0;
    let mut ordered_labels: Vec<String> = Vec::new();
    let mut reference_counts: HashMap<usize, usize> = HashMap::new();

    let mut note_number = |label: &str| -> usize {
        if let Some(idx) = ordered_labels.iter().position(|l| l == label) {
            idx + 1
        } else {
            ordered_labels.push(label.to_string());
            ordered_labels.len()
        }
    };

    for event in events {
        if skipping_definition_depth > 0 {
            match event {
                Event::Start(_) => skipping_definition_depth += 1,
                Event::End(_) => {
                    skipping_definition_depth = skipping_definition_depth.saturating_sub(1)
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::FootnoteDefinition(_label)) => {
                skipping_definition_depth = 1;
            }

            Event::FootnoteReference(label) => {
                let num = note_number(label.as_ref());
                let seen = reference_counts.entry(num).or_insert(0);
                *seen += 1;
                // Later references to the same note need their own id.
                let ref_id = match *seen {
                    1 => format!("user-content-fnref-{num}"),
                    n => format!("user-content-fnref-{num}-{n}"),
                };
                let html = format!(
                    "<sup><a href=\"#user-content-fn-{num}\" id=\"{ref_id}\" data-footnote-ref aria-describedby=\"footnote-label\">{num}</a></sup>"
                );
                out.push(Event::InlineHtml(CowStr::from(html)));
            }

            other => out.push(other),
        }
    }

    if ordered_labels.is_empty() {
        return out;
    }

    let mut list_html = String::new();
    list_html.push_str(r#"<section data-footnotes class="footnotes">"#);
    list_html.push_str(r#"<h2 class="sr-only" id="footnote-label">Footnotes</h2><ol>"#);
    for (idx, label) in ordered_labels.iter().enumerate() {
        let num = idx + 1;
        let def_events = defs.get(label.as_str()).unwrap_or(&[]);
        let backref = format!(
            "<a href=\"#user-content-fnref-{num}\" data-footnote-backref aria-label=\"Back to reference {num}\" class=\"data-footnote-backref\">↩</a>"
        );
        let def_html = with_backref(render_definition_as_block_html(def_events), &backref);
        let _ = write!(&mut list_html, "<li id=\"user-content-fn-{num}\">{def_html}</li>");
    }
    list_html.push_str("</ol></section>");

    out.push(Event::Html(CowStr::from(list_html)));
    out
}

struct FootnoteDefinitions<'a>(HashMap<String, Vec<Event<'a>>>);

impl<'a> FootnoteDefinitions<'a> {
    fn collect(events: &[Event<'a>]) -> Self {
        let mut defs: HashMap<String, Vec<Event<'a>>> = HashMap::new();

        let mut i: usize = 0;
        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::FootnoteDefinition(label)) => {
                    let key = label.to_string();

                    let mut depth: usize = 1;
                    let mut inner: Vec<Event<'a>> = Vec::new();

                    i += 1;
                    while i < events.len() && depth > 0 {
                        match &events[i] {
                            Event::Start(_) => {
                                depth += 1;
                                inner.push(events[i].clone());
                            }
                            Event::End(_) => {
                                depth = depth.saturating_sub(1);
                                if depth > 0 {
                                    inner.push(events[i].clone());
                                }
                            }
                            other => inner.push(other.clone()),
                        }
                        i += 1;
                    }

                    defs.insert(key, inner);
                    continue;
                }
                _ => i += 1,
            }
        }

        FootnoteDefinitions(defs)
    }

    fn get(&self, key: &str) -> Option<&[Event<'a>]> {
        self.0.get(key).map(|v| v.as_slice())
    }
}

fn render_definition_as_block_html<'a>(events: &[Event<'a>]) -> String {
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.iter().cloned());
    html.trim().to_string()
}

/// Place the back link inside the closing paragraph, if the definition ends
/// with one.
fn with_backref(mut def_html: String, backref: &str) -> String {
    let cut = def_html.strip_suffix("</p>").map(str::len);
    match cut {
        Some(cut) => def_html.insert_str(cut, &format!(" {backref}")),
        None => {
            def_html.push(' ');
            def_html.push_str(backref);
        }
    }
    def_html
}
