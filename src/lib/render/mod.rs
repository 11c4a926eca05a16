//! Listing and post pages.

mod templates;

pub use templates::redirect_page;

use itertools::Itertools;
use serde_json::{Value, json};

use crate::{
    config::{SiteMeta, blog_path},
    head::BlogPostHead,
    mdx::CompiledBody,
    utils::{escape_attr, escape_text},
};

/// Where the highlight stylesheet is served from.
pub const HIGHLIGHT_CSS_PATH: &str = "/highlight.css";

/// `<title>`, description and canonical link.
fn head_fragment(title: &str, description: &str, canonical: &str) -> String {
    format!(
        r#"<title>{}</title>
<meta name="description" content="{}">
<link rel="canonical" href="{}">
<link rel="alternate" type="application/rss+xml" href="{}/rss.xml">
<link rel="stylesheet" href="{HIGHLIGHT_CSS_PATH}">"#,
        escape_text(title),
        escape_attr(description),
        escape_attr(canonical),
        blog_path(),
    )
}

pub fn listing_page(heads: &[BlogPostHead], meta: &SiteMeta) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<header><h1>{}</h1><p>{}</p></header>\n",
        escape_text(&meta.title),
        escape_text(&meta.tagline)
    ));

    // Undated posts sort last, so they never split a year group.
    for (year, group) in &heads.iter().chunk_by(|h| h.published_at.map(|d| d.year())) {
        if let Some(y) = year {
            body.push_str(&format!("<h2>{y}</h2>\n"));
        }
        body.push_str("<ul class=\"posts\">\n");
        for head in group {
            body.push_str("<li>");
            if let Some(date) = head.published_at {
                let date = date.as_str();
                body.push_str(&format!(
                    r#"<time datetime="{}">{}</time> "#,
                    escape_attr(&date),
                    escape_text(&date)
                ));
            }
            body.push_str(&format!(
                r#"<a href="{}">{}</a><p>{}</p>"#,
                escape_attr(&head.url),
                escape_text(&head.title),
                escape_text(&head.description)
            ));
            body.push_str("</li>\n");
        }
        body.push_str("</ul>\n");
    }

    let head = head_fragment(&meta.title, &meta.description, &meta.absolute(&blog_path()));
    templates::page_shell(&meta.language, &head, &body)
}

pub fn post_page(head: &BlogPostHead, body: &CompiledBody, meta: &SiteMeta) -> String {
    let url = meta.absolute(&head.url);
    let mut out = String::new();

    out.push_str("<article>\n<header>");
    out.push_str(&format!("<h1>{}</h1>", escape_text(&head.title)));
    out.push_str(r#"<p class="meta">"#);
    if let Some(date) = head.published_at {
        let date = date.as_str();
        out.push_str(&format!(
            r#"<time datetime="{}">{}</time>"#,
            escape_attr(&date),
            escape_text(&date)
        ));
    }
    if !head.tags.is_empty() {
        let tags = head.tags.iter().map(|t| escape_text(&t.name)).join(", ");
        out.push_str(&format!(r#"<span class="tags">{tags}</span>"#));
    }
    out.push_str("</p></header>\n");

    out.push_str(&toc(head));
    out.push_str(&body.html);
    out.push_str("</article>\n");
    out.push_str(&format!(
        r#"<p class="meta"><a href="{}">All posts</a></p>"#,
        blog_path()
    ));
    out.push_str(&format!(
        "\n<script type=\"application/ld+json\">{}</script>",
        script_safe(&json_ld(head, meta).to_string())
    ));

    let mut fragment = head_fragment(&head.title, &head.description, &url);
    fragment.push_str(&opengraph_meta(head, &url, meta));
    templates::page_shell(&meta.language, &fragment, &out)
}

/// OpenGraph and Twitter card tags for a post.
fn opengraph_meta(head: &BlogPostHead, url: &str, meta: &SiteMeta) -> String {
    let tags = [
        ("og:title", head.title.as_str()),
        ("og:description", head.description.as_str()),
        ("og:type", "article"),
        ("og:url", url),
        ("og:site_name", meta.title.as_str()),
    ];

    let mut out = String::new();
    for (property, content) in tags {
        out.push_str(&format!(
            "\n<meta property=\"{property}\" content=\"{}\">",
            escape_attr(content)
        ));
    }
    out.push_str("\n<meta name=\"twitter:card\" content=\"summary\">");
    out
}

/// Contents list from the headings that have anchors.
fn toc(head: &BlogPostHead) -> String {
    let items = head
        .headings
        .iter()
        .filter_map(|h| {
            let slug = h.slug.as_deref()?;
            Some(format!(
                r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
                h.level,
                escape_attr(slug),
                escape_text(&h.text)
            ))
        })
        .join("");

    if items.is_empty() {
        return String::new();
    }
    format!(r#"<nav class="toc" aria-label="Contents"><ol>{items}</ol></nav>"#) + "\n"
}

/// schema.org `BlogPosting` record for a post.
pub fn json_ld(head: &BlogPostHead, meta: &SiteMeta) -> Value {
    let mut record = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": head.title,
        "isFamilyFriendly": true,
        "isPartOf": {
            "@type": "Blog",
            "name": meta.title,
            "url": meta.absolute(&blog_path()),
        },
        "keywords": head.tags.iter().map(|t| t.name.as_str()).join(", "),
        "author": {
            "@type": "Person",
            "name": head.author.name,
        },
        "publisher": {
            "@type": "Organization",
            "name": meta.publisher,
        },
        "text": head.description,
        "url": meta.absolute(&head.url),
    });

    if let Some(date) = head.published_at {
        record["datePublished"] = Value::String(date.to_rfc3339());
    }
    record
}

// JSON is embedded in a <script> element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests;
