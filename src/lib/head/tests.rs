use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use super::{HeadInput, validate};
use crate::{
    error::SchemaError,
    headings,
    tags::{Tag, TagRegistry},
    types::{Author, PublishDate},
};

fn attributes(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn run(attrs: Value) -> Result<super::BlogPostHead, SchemaError> {
    let registry = TagRegistry::default();
    let author = Author::new("Gajus Kuizinas");
    let attrs = attributes(attrs);
    validate(HeadInput {
        attributes: &attrs,
        slug: "2024-01-10-example",
        source: PathBuf::from("2024-01-10-example/blogPost.mdx"),
        headings: headings::extract("# Example\n\nHello *world*."),
        registry: &registry,
        author: &author,
    })
}

fn example() -> Value {
    json!({
        "title": "Example",
        "description": "d",
        "guid": "g1",
        "publishedAt": "2024-01-10",
        "tags": ["sql"],
    })
}

#[test]
fn example_scenario() {
    let head = run(example()).unwrap();

    assert_eq!(head.slug, "2024-01-10-example");
    assert_eq!(head.guid, "g1");
    assert_eq!(head.title, "Example");
    assert_eq!(head.url, "/blog/2024-01-10-example");
    assert_eq!(head.published_at.map(|d| d.as_str()).as_deref(), Some("2024-01-10"));
    assert_eq!(
        head.tags,
        vec![Tag {
            name: "SQL".to_string(),
            slug: "sql".to_string(),
        }]
    );
    assert_eq!(head.headings.len(), 1);
    assert_eq!(head.headings[0].level, 1);
    assert_eq!(head.headings[0].slug.as_deref(), Some("example"));
    assert_eq!(head.headings[0].text, "Example");
    assert_eq!(head.author.name, "Gajus Kuizinas");
}

#[test]
fn missing_date_and_tags_are_allowed() {
    let head = run(json!({"title": "t", "description": "d", "guid": "g"})).unwrap();
    assert_eq!(head.published_at, None);
    assert!(head.tags.is_empty());

    let head = run(json!({"title": "t", "description": "d", "guid": "g", "publishedAt": null, "tags": null})).unwrap();
    assert_eq!(head.published_at, None);
}

#[test]
fn timestamps_are_accepted() {
    let mut attrs = example();
    attrs["publishedAt"] = json!("2024-01-10T08:30:00Z");
    let head = run(attrs).unwrap();
    assert_eq!(head.published_at, PublishDate::parse("2024-01-10T08:30:00+00:00"));
}

#[test]
fn required_fields_are_enforced() {
    for field in ["title", "description", "guid"] {
        let mut attrs = example();
        attrs.as_object_mut().unwrap().remove(field);
        let err = run(attrs).unwrap_err();
        assert_eq!(err.field(), field);
        assert!(matches!(err, SchemaError::MissingField { .. }));

        let mut attrs = example();
        attrs[field] = json!("   ");
        assert_eq!(run(attrs), Err(SchemaError::EmptyField { field }));

        let mut attrs = example();
        attrs[field] = json!(42);
        assert_eq!(
            run(attrs),
            Err(SchemaError::InvalidType {
                field,
                expected: "a string",
            })
        );
    }
}

#[test]
fn bad_dates_are_rejected() {
    let mut attrs = example();
    attrs["publishedAt"] = json!("last tuesday");
    assert_eq!(
        run(attrs),
        Err(SchemaError::InvalidDate {
            value: "last tuesday".to_string(),
        })
    );

    let mut attrs = example();
    attrs["publishedAt"] = json!(20240110);
    assert_eq!(run(attrs).unwrap_err().field(), "publishedAt");
}

#[test]
fn unknown_tag_is_not_found() {
    let mut attrs = example();
    attrs["tags"] = json!(["sql", "rust"]);
    let err = run(attrs).unwrap_err();
    assert_eq!(
        err,
        SchemaError::TagNotFound {
            slug: "rust".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Tag with slug \"rust\" not found.");
}

#[test]
fn tags_must_be_a_list_of_strings() {
    let mut attrs = example();
    attrs["tags"] = json!("sql");
    assert_eq!(run(attrs).unwrap_err().field(), "tags");

    let mut attrs = example();
    attrs["tags"] = json!([1]);
    assert_eq!(run(attrs).unwrap_err().field(), "tags");
}

#[test]
fn tag_order_is_preserved() {
    let mut attrs = example();
    attrs["tags"] = json!(["typescript", "bdd", "sql"]);
    let slugs: Vec<String> = run(attrs).unwrap().tags.into_iter().map(|t| t.slug).collect();
    assert_eq!(slugs, vec!["typescript", "bdd", "sql"]);
}
