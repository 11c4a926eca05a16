use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};

use super::{DEFAULT_TAGS, TagRegistry};
use crate::error::SchemaError;

#[test]
fn default_registry_resolves_every_entry() {
    let registry = TagRegistry::default();
    assert_eq!(registry.len(), DEFAULT_TAGS.len());

    for (slug, name) in DEFAULT_TAGS {
        let tag = registry.get(slug).expect("known tag");
        assert_eq!(tag.slug, *slug);
        assert_eq!(tag.name, *name);
    }
}

#[test]
fn sql_tag_has_display_name() {
    let registry = TagRegistry::default();
    let tag = registry.find("sql").unwrap();
    assert_eq!(tag.name, "SQL");
}

#[test]
fn unknown_slug_is_tag_not_found() {
    let mut runner = TestRunner::new(Config {
        cases: 32,
        failure_persistence: None,
        ..Config::default()
    });
    let registry = TagRegistry::default();

    runner
        .run(&"[a-z]{1,12}", |slug| {
            prop_assume!(registry.find(&slug).is_none());
            let err = registry.get(&slug).unwrap_err();
            prop_assert_eq!(
                err.to_string(),
                format!("Tag with slug \"{slug}\" not found.")
            );
            prop_assert_eq!(err, SchemaError::TagNotFound { slug: slug.clone() });
            Ok(())
        })
        .unwrap();
}

#[test]
fn lookup_is_case_sensitive() {
    let registry = TagRegistry::default();
    assert!(registry.find("SQL").is_none());
}
