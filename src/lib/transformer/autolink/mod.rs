use std::{collections::VecDeque, iter::Peekable, sync::OnceLock};

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

use crate::transformer::Transformer;

static LITERAL_URL: OnceLock<Regex> = OnceLock::new();
fn literal_url() -> &'static Regex {
    LITERAL_URL.get_or_init(|| {
        Regex::new(r#"(?:https?://|www\.)[^\s<>"]+"#).expect("static autolink pattern is valid")
    })
}

/// Link literal URLs (`https://…`, `www.…`) in running text, the way GFM
/// does. Text already inside links, images or code is left alone.
pub struct AutolinkTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    inner: Peekable<I>,
    pending: VecDeque<Event<'a>>,
    /// Depth of enclosing links and images.
    link_depth: usize,
    in_code_block: bool,
}

impl<'a, I> Iterator for AutolinkTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.inner.next()?;
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => self.link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => {
                self.link_depth = self.link_depth.saturating_sub(1)
            }
            Event::Start(Tag::CodeBlock(_)) => self.in_code_block = true,
            Event::End(TagEnd::CodeBlock) => self.in_code_block = false,
            _ => {}
        }

        match event {
            Event::Text(text) if self.link_depth == 0 && !self.in_code_block => {
                let text = self.coalesce(text);
                self.pending = link_literals(text);
                self.pending.pop_front()
            }
            other => Some(other),
        }
    }
}

impl<'a, I> AutolinkTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    /// The parser may split one run of text into several events; a URL can
    /// straddle them.
    fn coalesce(&mut self, first: CowStr<'a>) -> CowStr<'a> {
        if !matches!(self.inner.peek(), Some(Event::Text(_))) {
            return first;
        }
        let mut joined = first.into_string();
        while let Some(Event::Text(next)) = self.inner.next_if(|e| matches!(e, Event::Text(_))) {
            joined.push_str(&next);
        }
        CowStr::from(joined)
    }
}

/// Split `text` into plain text and link events.
fn link_literals<'a>(text: CowStr<'a>) -> VecDeque<Event<'a>> {
    let mut out = VecDeque::new();
    let mut last = 0;

    for m in literal_url().find_iter(&text) {
        let preceded_ok = text[..m.start()]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '*' | '_' | '~'));
        if !preceded_ok {
            continue;
        }

        let url = trim_trailing(m.as_str());
        if url.ends_with("://") || url.len() <= "www.".len() {
            continue;
        }

        if m.start() > last {
            out.push_back(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }

        let dest_url = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        out.push_back(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(dest_url),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push_back(Event::Text(CowStr::from(url.to_string())));
        out.push_back(Event::End(TagEnd::Link));

        last = m.start() + url.len();
    }

    if last == 0 {
        out.push_back(Event::Text(text));
    } else if last < text.len() {
        out.push_back(Event::Text(CowStr::from(text[last..].to_string())));
    }
    out
}

/// Drop trailing punctuation, and closing parentheses that have no opening
/// partner inside the URL.
fn trim_trailing(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().next_back() else {
            return url;
        };
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '*' | '_' | '~' | '\'' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !strip {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

impl<'a, I> Transformer<'a, I> for AutolinkTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn transform(inner: I) -> Self {
        Self {
            inner: inner.peekable(),
            pending: VecDeque::new(),
            link_depth: 0,
            in_code_block: false,
        }
    }
}
