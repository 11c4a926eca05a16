use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};
use serde_json::Value;

use super::{json_ld, listing_page, post_page, redirect_page};
use crate::{
    config::site_meta,
    lookup::{RequestScope, get_body},
    test_support::{post_source, sample_site, source_for, write_post},
};

#[test]
fn listing_groups_by_year() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        failure_persistence: None,
        ..Config::default()
    });

    runner
        .run(
            &proptest::collection::vec(("Post[a-z]{2,6}", 1990i32..=2025), 1..5),
            |items| {
                let tmp = tempfile::TempDir::new().unwrap();
                for (i, (title, year)) in items.iter().enumerate() {
                    write_post(
                        tmp.path(),
                        &format!("post-{i}"),
                        "blogPost.mdx",
                        &post_source(title, &format!("g{i}"), Some(&format!("{year:04}-01-01")), &[], "x"),
                    );
                }
                let heads = source_for(tmp.path()).assemble().unwrap();
                let page = listing_page(&heads, &site_meta());

                for (title, year) in &items {
                    let heading = format!("<h2>{year}</h2>");
                    prop_assert!(page.contains(&heading));
                    prop_assert!(page.contains(title.as_str()));
                }
                // One heading per distinct year.
                let mut years: Vec<i32> = items.iter().map(|(_, y)| *y).collect();
                years.sort_unstable();
                years.dedup();
                prop_assert_eq!(page.matches("<h2>").count(), years.len());
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn listing_links_every_post() {
    let site = sample_site();
    let heads = source_for(site.path()).assemble().unwrap();
    let page = listing_page(&heads, &site_meta());

    assert!(page.contains(r#"<a href="/blog/2024-01-10-example">Example</a>"#));
    assert!(page.contains(r#"<a href="/blog/draft">Draft</a>"#));
    assert!(page.contains(r#"<time datetime="2023-05-01">2023-05-01</time>"#));
    assert!(page.contains("<title>Gajus Blog</title>"));
}

#[test]
fn post_page_has_meta_toc_and_body() {
    let site = sample_site();
    let source = source_for(site.path());
    let scope = RequestScope::new(&source);
    let head = scope.heads().unwrap()[1].clone();
    let body = get_body(&scope, &head).unwrap();

    let page = post_page(&head, &body, &site_meta());
    assert!(page.contains("<h1>Older</h1>"));
    assert!(page.contains(r#"<span class="tags">PostgreSQL, Engineering</span>"#));
    assert!(page.contains(r##"<li class="toc-level-2"><a href="#intro">Intro</a></li>"##));
    assert!(page.contains(r##"<a href="#intro-1">"##));
    assert!(page.contains(&body.html));
    assert!(page.contains(r#"<link rel="canonical" href="https://gajus.com/blog/2023-05-01-older">"#));
    assert!(page.contains(r#"<script type="application/ld+json">"#));
    assert!(page.contains(r#"<meta property="og:url" content="https://gajus.com/blog/2023-05-01-older">"#));
    assert!(page.contains(r#"<meta property="og:type" content="article">"#));
}

#[test]
fn json_ld_describes_the_post() {
    let site = sample_site();
    let heads = source_for(site.path()).assemble().unwrap();
    let record = json_ld(&heads[0], &site_meta());

    assert_eq!(record["@type"], "BlogPosting");
    assert_eq!(record["headline"], "Example");
    assert_eq!(record["keywords"], "SQL");
    assert_eq!(record["url"], "https://gajus.com/blog/2024-01-10-example");
    assert_eq!(record["text"], "About Example.");
    assert_eq!(record["publisher"]["name"], "Gajus");
    assert_eq!(record["isPartOf"]["@type"], "Blog");
    assert_eq!(record["datePublished"], "2024-01-10T00:00:00Z");

    let draft = heads.iter().find(|h| h.slug == "draft").unwrap();
    assert_eq!(json_ld(draft, &site_meta()).get("datePublished"), None::<&Value>);
}

#[test]
fn script_content_cannot_close_the_element() {
    let site = sample_site();
    write_post(
        site.path(),
        "tricky",
        "blogPost.mdx",
        &post_source("\"</script>\"", "g9", None, &[], "x"),
    );
    let source = source_for(site.path());
    let scope = RequestScope::new(&source);
    let head = scope.heads().unwrap().iter().find(|h| h.slug == "tricky").unwrap().clone();
    let body = get_body(&scope, &head).unwrap();

    let page = post_page(&head, &body, &site_meta());
    assert_eq!(page.matches("</script>").count(), 1);
}

#[test]
fn redirect_points_at_target() {
    let page = redirect_page("/blog");
    assert!(page.contains(r#"content="0; url=/blog""#));
    assert!(page.contains(r#"<a href="/blog">"#));
}
