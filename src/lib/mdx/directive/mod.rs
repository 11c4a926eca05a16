//! Generic directive syntax.
//!
//! ```text
//! :::name[label]{#id .class key=value}    container, closed by a `:::` line
//! ::name[label]{attrs}                    leaf, one line
//! :name[content]{attrs}                   text, inline
//! ```
//!
//! Parsing leaves sentinel tags (`<directive-N>` and `</directive-N>`) in
//! the text and records node `N` in a [`DirectiveTree`]. Later passes decide
//! what element a node becomes; [`crate::transformer::directive`] swaps the
//! sentinels for that element once the markdown has been rendered.

use crate::{
    error::CompileError,
    utils::{FenceTracker, Segment, code_spans},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    Container,
    Leaf,
    Text,
}

impl DirectiveKind {
    /// Element used when no pass has claimed the node.
    pub fn default_tag(self) -> &'static str {
        match self {
            DirectiveKind::Container | DirectiveKind::Leaf => "div",
            DirectiveKind::Text => "span",
        }
    }
}

/// HTML element a directive renders as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub class: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveNode {
    pub id: usize,
    pub kind: DirectiveKind,
    pub name: String,
    /// Bracketed part: the label of a container or leaf, the content of a
    /// text directive.
    pub label: Option<String>,
    /// In source order. `#id` is stored as `id`, `.class` entries are merged
    /// into one `class`.
    pub attributes: Vec<(String, String)>,
    /// Enclosing directive, if any.
    pub parent: Option<usize>,
    pub element: Option<Element>,
}

/// Directive nodes of one document, indexed by id (document order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveTree {
    nodes: Vec<DirectiveNode>,
}

impl DirectiveTree {
    pub fn get(&self, id: usize) -> Option<&DirectiveNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[DirectiveNode] {
        &self.nodes
    }

    pub fn children(&self, id: usize) -> impl Iterator<Item = &DirectiveNode> {
        self.nodes.iter().filter(move |n| n.parent == Some(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rewrite every node, keeping ids and structure.
    pub fn map(self, f: impl FnMut(DirectiveNode) -> DirectiveNode) -> Self {
        Self {
            nodes: self.nodes.into_iter().map(f).collect(),
        }
    }

    fn push(
        &mut self,
        kind: DirectiveKind,
        head: Head<'_>,
        parent: Option<usize>,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(DirectiveNode {
            id,
            kind,
            name: head.name.to_string(),
            label: head.label.map(ToOwned::to_owned),
            attributes: head.attributes,
            parent,
            element: None,
        });
        id
    }
}

pub fn open_marker(id: usize) -> String {
    format!("<directive-{id}>")
}

pub fn close_marker(id: usize) -> String {
    format!("</directive-{id}>")
}

/// Replace directive syntax in `text` with sentinels.
pub fn parse(text: &str) -> Result<(String, DirectiveTree), CompileError> {
    let mut out = String::with_capacity(text.len());
    let mut tree = DirectiveTree::default();
    // (node id, line it was opened on)
    let mut open: Vec<(usize, usize)> = Vec::new();
    let mut fence = FenceTracker::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if fence.is_code(line) {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        let trimmed = line.trim();
        let parent = open.last().map(|&(id, _)| id);

        if let Some(rest) = trimmed.strip_prefix(":::") {
            let rest = rest.trim_start_matches(':');
            if rest.is_empty() {
                let Some((id, _)) = open.pop() else {
                    return Err(CompileError::UnmatchedDirectiveClose { line: line_no });
                };
                push_block(&mut out, &close_marker(id));
                continue;
            }

            match parse_head(rest) {
                Some((head, tail)) if tail.trim().is_empty() => {
                    let label = head.label;
                    let id = tree.push(DirectiveKind::Container, head, parent);
                    open.push((id, line_no));
                    push_block(&mut out, &open_marker(id));
                    if let Some(label) = label {
                        out.push_str(label);
                        out.push_str("\n\n");
                    }
                    continue;
                }
                _ => {}
            }
        } else if let Some(rest) = trimmed.strip_prefix("::") {
            match parse_head(rest) {
                Some((head, tail)) if tail.trim().is_empty() => {
                    let label = head.label;
                    let id = tree.push(DirectiveKind::Leaf, head, parent);
                    push_block(&mut out, &open_marker(id));
                    if let Some(label) = label {
                        out.push_str(label);
                        out.push_str("\n\n");
                    }
                    push_block(&mut out, &close_marker(id));
                    continue;
                }
                _ => {}
            }
        }

        out.push_str(&text_directives(line, &mut tree, parent));
        out.push('\n');
    }

    if let Some(&(id, line)) = open.last() {
        let name = tree.get(id).map(|n| n.name.clone()).unwrap_or_default();
        return Err(CompileError::UnterminatedDirective { name, line });
    }

    Ok((out, tree))
}

/// Sentinels for block directives stand alone, between blank lines, so the
/// markdown parser keeps them as raw HTML blocks.
fn push_block(out: &mut String, marker: &str) {
    out.push('\n');
    out.push_str(marker);
    out.push_str("\n\n");
}

fn text_directives(line: &str, tree: &mut DirectiveTree, parent: Option<usize>) -> String {
    let mut out = String::with_capacity(line.len());
    for segment in code_spans(line) {
        match segment {
            Segment::Code(code) => out.push_str(code),
            Segment::Prose(prose) => scan_prose(prose, tree, parent, &mut out),
        }
    }
    out
}

fn scan_prose(prose: &str, tree: &mut DirectiveTree, parent: Option<usize>, out: &mut String) {
    let mut rest = prose;
    let mut prev: Option<char> = None;

    while let Some(ch) = rest.chars().next() {
        let after = &rest[ch.len_utf8()..];

        if ch == '\\' {
            let escaped = after.chars().next().map_or(0, char::len_utf8);
            out.push_str(&rest[..1 + escaped]);
            prev = after.chars().next();
            rest = &after[escaped..];
            continue;
        }

        let boundary = prev.is_none_or(|p| !p.is_alphanumeric() && p != ':');
        if ch == ':' && boundary {
            if let Some((head, tail)) = parse_head(after) {
                if let Some(content) = head.label {
                    let id = tree.push(DirectiveKind::Text, head, parent);
                    out.push_str(&open_marker(id));
                    scan_prose(content, tree, Some(id), out);
                    out.push_str(&close_marker(id));
                    prev = Some(']');
                    rest = tail;
                    continue;
                }
            }
        }

        out.push(ch);
        prev = Some(ch);
        rest = after;
    }
}

/// Name, label and attributes of a directive.
#[derive(Debug, PartialEq, Eq)]
struct Head<'a> {
    name: &'a str,
    label: Option<&'a str>,
    attributes: Vec<(String, String)>,
}

/// Parse `name[label]{attrs}` at the start of `s`; returns the unconsumed
/// tail as well.
fn parse_head(s: &str) -> Option<(Head<'_>, &str)> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    let name_end = chars
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .map_or(s.len(), |(i, _)| i);
    let name = &s[..name_end];
    let mut rest = &s[name_end..];

    let mut label = None;
    if rest.starts_with('[') {
        let (inner, tail) = enclosed(rest, '[', ']')?;
        label = Some(inner);
        rest = tail;
    }

    let mut attributes = Vec::new();
    if rest.starts_with('{') {
        let (inner, tail) = enclosed(rest, '{', '}')?;
        attributes = parse_attributes(inner)?;
        rest = tail;
    }

    Some((
        Head {
            name,
            label,
            attributes,
        },
        rest,
    ))
}

/// Split `s`, which starts with `open`, at its matching `close`. Nested pairs,
/// backslash escapes and quoted strings (inside braces) are respected.
fn enclosed(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' if open == '{' => quote = Some(c),
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[open.len_utf8()..i], &s[i + close.len_utf8()..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_attributes(s: &str) -> Option<Vec<(String, String)>> {
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut chars = s.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(first) = chars.next() else {
            break;
        };

        match first {
            '#' => {
                let id = take_until(&mut chars, |c| c.is_whitespace() || c == '#' || c == '.');
                if id.is_empty() {
                    return None;
                }
                set_attribute(&mut attributes, "id", id);
            }
            '.' => {
                let class = take_until(&mut chars, |c| c.is_whitespace() || c == '#' || c == '.');
                if class.is_empty() {
                    return None;
                }
                match attributes.iter_mut().find(|(k, _)| k == "class") {
                    Some((_, existing)) => {
                        existing.push(' ');
                        existing.push_str(&class);
                    }
                    None => attributes.push(("class".to_string(), class)),
                }
            }
            c if c.is_alphanumeric() || c == '_' || c == ':' => {
                let mut key = String::from(c);
                key.push_str(&take_until(&mut chars, |c| c.is_whitespace() || c == '='));

                let value = if chars.next_if_eq(&'=').is_some() {
                    match chars.peek().copied() {
                        Some(q @ ('"' | '\'')) => {
                            chars.next();
                            let value = take_until(&mut chars, |c| c == q);
                            // Unterminated quote.
                            chars.next()?;
                            value
                        }
                        _ => take_until(&mut chars, char::is_whitespace),
                    }
                } else {
                    String::new()
                };
                set_attribute(&mut attributes, &key, value);
            }
            _ => return None,
        }
    }

    Some(attributes)
}

fn take_until(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    stop: impl Fn(char) -> bool,
) -> String {
    let mut word = String::new();
    while let Some(c) = chars.next_if(|&c| !stop(c)) {
        word.push(c);
    }
    word
}

fn set_attribute(attributes: &mut Vec<(String, String)>, key: &str, value: String) {
    match attributes.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => *existing = value,
        None => attributes.push((key.to_string(), value)),
    }
}
