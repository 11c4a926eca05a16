//! `sitemap.xml` and `robots.txt`.

use time::Date;

use crate::{config::SiteMeta, head::BlogPostHead, types::format_day, utils::escape_text};

/// Home page (last modified `today`) plus one entry per post.
pub fn sitemap_xml(heads: &[BlogPostHead], meta: &SiteMeta, today: Date) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    xml.push_str(&entry(&meta.absolute("/"), Some(today)));
    for head in heads {
        xml.push_str(&entry(
            &meta.absolute(&head.url),
            head.published_at.map(|at| at.as_date()),
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

fn entry(loc: &str, lastmod: Option<Date>) -> String {
    let loc = escape_text(loc);
    match lastmod {
        Some(date) => format!(
            "  <url><loc>{loc}</loc><lastmod>{}</lastmod></url>\n",
            format_day(date)
        ),
        None => format!("  <url><loc>{loc}</loc></url>\n"),
    }
}

pub fn robots_txt(meta: &SiteMeta) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}\n",
        meta.absolute("sitemap.xml")
    )
}
