//! Compiled-in tag registry.
//!
//! Tags are not dynamic: adding one means extending [`DEFAULT_TAGS`]. The
//! registry is built once at startup and handed to the content source by
//! reference.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::SchemaError;

/// `(slug, display name)` pairs known to the site.
pub const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("batching", "Batching"),
    ("bdd", "BDD"),
    ("caching", "Caching"),
    ("engineering", "Engineering"),
    ("fastify", "Fastify"),
    ("graphql", "GraphQL"),
    ("javascript", "JavaScript"),
    ("leadership", "Leadership"),
    ("miscellaneous", "Miscellaneous"),
    ("nodejs", "Node.js"),
    ("postgresql", "PostgreSQL"),
    ("product", "Product"),
    ("slonik", "Slonik"),
    ("sql", "SQL"),
    ("typescript", "TypeScript"),
];

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug)]
pub struct TagRegistry {
    tags: HashMap<String, Tag>,
}

impl TagRegistry {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let tags = entries
            .into_iter()
            .map(|(slug, name)| {
                (
                    slug.to_string(),
                    Tag {
                        name: name.to_string(),
                        slug: slug.to_string(),
                    },
                )
            })
            .collect();
        Self { tags }
    }

    pub fn find(&self, slug: &str) -> Option<&Tag> {
        self.tags.get(slug)
    }

    /// Like [`TagRegistry::find`], but an unknown slug is a schema violation.
    pub fn get(&self, slug: &str) -> Result<&Tag, SchemaError> {
        self.find(slug).ok_or_else(|| SchemaError::TagNotFound {
            slug: slug.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TAGS.iter().copied())
    }
}

#[cfg(test)]
mod tests;
