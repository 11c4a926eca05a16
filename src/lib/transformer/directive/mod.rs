use std::sync::OnceLock;

use pulldown_cmark::{CowStr, Event};
use regex::{Captures, Regex};

use crate::{
    mdx::directive::{DirectiveNode, DirectiveTree},
    utils::{escape_attr, escape_text},
};

static MARKER: OnceLock<Regex> = OnceLock::new();
fn marker() -> &'static Regex {
    MARKER.get_or_init(|| Regex::new(r"<(/?)directive-(\d+)>").expect("static marker pattern is valid"))
}

/// Replace directive sentinels in raw HTML events with the element each
/// node was given. Sentinels may also sit inside HTML produced by earlier
/// transformers, such as rendered footnote definitions.
pub struct DirectiveRenderer<'t, I> {
    inner: I,
    tree: &'t DirectiveTree,
}

impl<'t, I> DirectiveRenderer<'t, I> {
    pub fn new(inner: I, tree: &'t DirectiveTree) -> Self {
        Self { inner, tree }
    }
}

impl<'a, I> Iterator for DirectiveRenderer<'_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.inner.next()?;
        if self.tree.is_empty() {
            return Some(event);
        }

        Some(match event {
            Event::Html(html) => Event::Html(render_markers(html, self.tree)),
            Event::InlineHtml(html) => Event::InlineHtml(render_markers(html, self.tree)),
            other => other,
        })
    }
}

fn render_markers<'a>(html: CowStr<'a>, tree: &DirectiveTree) -> CowStr<'a> {
    if !marker().is_match(&html) {
        return html;
    }

    let rendered = marker().replace_all(&html, |caps: &Captures<'_>| {
        let node = caps[2].parse().ok().and_then(|id| tree.get(id));
        match (node, &caps[1]) {
            (Some(node), "") => open_tag(node),
            (Some(node), _) => format!("</{}>", tag_of(node)),
            (None, _) => caps[0].to_string(),
        }
    });
    CowStr::from(rendered.into_owned())
}

fn tag_of(node: &DirectiveNode) -> &'static str {
    node.element
        .as_ref()
        .map_or_else(|| node.kind.default_tag(), |e| e.tag)
}

fn open_tag(node: &DirectiveNode) -> String {
    let mut classes: Vec<&str> = Vec::new();
    if let Some(class) = node.element.as_ref().and_then(|e| e.class) {
        classes.push(class);
    }
    if let Some((_, class)) = node.attributes.iter().find(|(k, _)| k == "class") {
        classes.push(class);
    }

    let mut tag = format!("<{}", tag_of(node));
    if !classes.is_empty() {
        tag.push_str(&format!(" class=\"{}\"", escape_attr(&classes.join(" "))));
    }
    for (key, value) in node.attributes.iter().filter(|(k, _)| k != "class") {
        tag.push_str(&format!(" {}=\"{}\"", escape_text(key), escape_attr(value)));
    }
    if node.element.is_none() {
        tag.push_str(&format!(" data-directive=\"{}\"", escape_attr(&node.name)));
    }
    tag.push('>');
    tag
}
