//! Content trees for tests.

use std::{fs, path::Path};

use tempfile::TempDir;

use crate::{content::ContentSource, tags::TagRegistry, types::Author};

pub(crate) fn post_source(
    title: &str,
    guid: &str,
    published_at: Option<&str>,
    tags: &[&str],
    body: &str,
) -> String {
    let mut raw = format!("---\ntitle: {title}\ndescription: About {title}.\nguid: {guid}\n");
    if let Some(date) = published_at {
        raw.push_str(&format!("publishedAt: {date}\n"));
    }
    raw.push_str(&format!("tags: [{}]\n---\n{body}", tags.join(", ")));
    raw
}

pub(crate) fn write_post(root: &Path, slug: &str, file: &str, raw: &str) {
    let dir = root.join(slug);
    fs::create_dir_all(&dir).expect("post dir");
    fs::write(dir.join(file), raw).expect("post file");
}

/// Three posts: two dated (out of order on disk) and one undated draft.
pub(crate) fn sample_site() -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    let root = tmp.path();

    write_post(
        root,
        "2024-01-10-example",
        "blogPost.mdx",
        &post_source(
            "Example",
            "g1",
            Some("2024-01-10"),
            &["sql"],
            "# Example\n\nHello *world*.",
        ),
    );
    write_post(
        root,
        "2023-05-01-older",
        "blogPost.mdx",
        &post_source(
            "Older",
            "g0",
            Some("2023-05-01"),
            &["postgresql", "engineering"],
            "## Intro\n\nText.\n\n## Intro\n\n:::note\nRemember.\n:::\n\n```sql\nSELECT 1;\n```\n",
        ),
    );
    write_post(
        root,
        "draft",
        "blogPost.md",
        &post_source("Draft", "g2", None, &[], "Work in progress.\n"),
    );

    tmp
}

pub(crate) fn source_for(root: &Path) -> ContentSource {
    ContentSource::new(root, TagRegistry::default(), Author::new("Gajus Kuizinas"))
}
