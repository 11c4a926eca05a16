//! MDX body compiler.
//!
//! The body goes through text passes first (callouts, directives,
//! expressions, inline notes), then through pulldown-cmark and the event
//! transformers. The order is fixed.

pub mod admonition;
pub mod directive;
pub mod expression;
pub mod note;

use pulldown_cmark::{Event, Options, Parser};
use tracing::debug;

use crate::{
    error::CompileError,
    transformer::{
        WithTransformer,
        autolink::AutolinkTransformer,
        code_block::CodeHighlightTransformer,
        directive::DirectiveRenderer,
        footnote::{PlainFootnoteTransformer, expand_inline_notes},
        heading::{HeadingAnchors, assign_heading_anchors},
    },
};

use directive::DirectiveTree;

/// Rendered post body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledBody {
    pub html: String,
    /// Ids given to heading elements, in document order.
    pub anchors: Vec<String>,
}

/// Markdown dialect of post bodies: CommonMark plus the GFM extensions.
pub fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Body text after the text passes, ready for the markdown parser.
pub(crate) struct Prepared {
    pub text: String,
    pub tree: DirectiveTree,
}

pub(crate) fn prepare(body: &str) -> Result<Prepared, CompileError> {
    let text = admonition::rewrite(body);
    let (text, tree) = directive::parse(&text)?;
    let text = expression::strip(&text)?;
    let tree = note::retag(tree);
    let text = expand_inline_notes(&text);
    Ok(Prepared { text, tree })
}

/// Parse prepared text up to and including heading anchoring. Both the
/// compiler and the table of contents read headings from here.
pub(crate) fn anchored(text: &str) -> HeadingAnchors<'_> {
    let events: Vec<Event<'_>> = Parser::new_ext(text, parser_options())
        .with_transformer::<AutolinkTransformer<'_, _>>()
        .with_transformer::<PlainFootnoteTransformer<'_>>()
        .collect();

    assign_heading_anchors(events)
}

/// Compile a post body (front matter already removed) into HTML.
pub fn compile(body: &str) -> Result<CompiledBody, CompileError> {
    let Prepared { text, tree } = prepare(body)?;

    let HeadingAnchors { events, anchors, .. } = anchored(&text);

    let events = events
        .into_iter()
        .with_transformer::<CodeHighlightTransformer<'_, _>>();

    let mut html = String::with_capacity(text.len() + text.len() / 2);
    pulldown_cmark::html::push_html(&mut html, DirectiveRenderer::new(events, &tree));

    debug!(
        directives = tree.len(),
        anchors = anchors.len(),
        bytes = html.len(),
        "compiled body"
    );

    Ok(CompiledBody { html, anchors })
}
