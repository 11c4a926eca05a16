use std::sync::OnceLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::{
    transformer::Transformer,
    utils::{escape_attr, escape_text},
};

/// Light theme whose classes the highlighter emits.
const THEME_NAME: &str = "InspiredGitHub";

/// Renders fenced and indented code blocks as one HTML event.
///
/// Tokens carry syntect class names only; colours come from
/// [`highlight_css`], which leaves the block background to the page. The
/// `<pre>` names the language twice, as `language-*` for stylesheets and as
/// `data-language` for the copy-button label.
pub struct CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    inner: I,
    /// Source of the open block.
    buffer: String,
    /// `Some` while inside a block; holds the info-string language, if any.
    open: Option<Option<CowStr<'a>>>,
}

/// First word of a fenced info string.
fn block_language(kind: CodeBlockKind<'_>) -> Option<CowStr<'_>> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .map(|word| CowStr::from(word.to_string())),
        CodeBlockKind::Indented => None,
    }
}

impl<'a, I> CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn render(&self, language: Option<&str>) -> String {
        let syntax_set = syntax_set();
        let syntax = language
            .and_then(|lang| syntax_set.find_syntax_by_token(lang))
            .unwrap_or_else(|| syntax_set.find_syntax_plain_text());

        render_classed_html(&self.buffer, syntax_set, syntax, language)
            .unwrap_or_else(|| fallback_plain(&self.buffer, language))
    }
}

impl<'a, I> Iterator for CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let event = self.inner.next()?;

            if self.open.is_none() {
                match event {
                    Event::Start(Tag::CodeBlock(kind)) => {
                        self.open = Some(block_language(kind));
                        self.buffer.clear();
                    }
                    other => return Some(other),
                }
                continue;
            }

            match event {
                Event::End(TagEnd::CodeBlock) => {
                    let language = self.open.take().flatten();
                    let html = self.render(language.as_deref());
                    return Some(Event::Html(CowStr::from(html)));
                }
                Event::Text(text) | Event::Code(text) | Event::Html(text) => {
                    self.buffer.push_str(&text)
                }
                Event::SoftBreak | Event::HardBreak => self.buffer.push('\n'),
                _ => {}
            }
        }
    }
}

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

static THEME: OnceLock<Theme> = OnceLock::new();
fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let mut themes = ThemeSet::load_defaults().themes;
        themes.remove(THEME_NAME).unwrap_or_default()
    })
}

static HIGHLIGHT_CSS: OnceLock<String> = OnceLock::new();
/// Return the CSS needed for class-based syntax highlighting.
///
/// Only token colours are kept: code blocks take their background from the
/// page, so the theme's `.code` background rule is dropped.
pub fn highlight_css() -> &'static str {
    HIGHLIGHT_CSS.get_or_init(|| {
        css_for_theme_with_class_style(theme(), ClassStyle::Spaced)
            .map(|css| without_background(&css))
            .unwrap_or_default()
    })
}

fn without_background(css: &str) -> String {
    css.lines()
        .filter(|line| !line.trim_start().starts_with("background-color"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn open_frame(out: &mut String, language: Option<&str>) {
    out.push_str("<div class=\"code-frame\"><pre class=\"code");
    if let Some(lang) = language {
        let lang = escape_attr(lang);
        out.push_str(" language-");
        out.push_str(&lang);
        out.push_str("\" data-language=\"");
        out.push_str(&lang);
    }
    out.push_str("\"><code>");
}

fn render_classed_html(
    source: &str,
    syntax_set: &SyntaxSet,
    syntax: &SyntaxReference,
    language: Option<&str>,
) -> Option<String> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, ClassStyle::Spaced);

    for line in LinesWithEndings::from(source) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .ok()?;
    }

    let mut out = String::with_capacity(source.len() + 96);
    open_frame(&mut out, language);
    out.push_str(&generator.finalize());
    out.push_str("</code></pre></div>\n");
    Some(out)
}

/// Escaped, unhighlighted block in the same frame.
pub fn fallback_plain(source: &str, language: Option<&str>) -> String {
    let mut out = String::with_capacity(source.len() + 96);
    open_frame(&mut out, language);
    out.push_str(&escape_text(source));
    out.push_str("</code></pre></div>\n");
    out
}

impl<'a, I> Transformer<'a, I> for CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn transform(inner: I) -> Self {
        Self {
            inner,
            buffer: String::new(),
            open: None,
        }
    }
}

#[cfg(test)]
mod tests;
