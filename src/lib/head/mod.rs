//! Post heads: the validated, derived metadata of one post.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::{
    config::post_path,
    error::SchemaError,
    headings::Heading,
    tags::{Tag, TagRegistry},
    types::{Author, PublishDate},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogPostHead {
    /// Name of the post directory.
    pub slug: String,
    pub guid: String,
    pub title: String,
    pub description: String,
    /// `None` sorts after every dated post.
    pub published_at: Option<PublishDate>,
    pub tags: Vec<Tag>,
    pub headings: Vec<Heading>,
    pub author: Author,
    /// Source file, relative to the posts root.
    pub source: PathBuf,
    /// Site-relative URL.
    pub url: String,
}

/// Everything the validator needs besides the raw attributes.
pub struct HeadInput<'a> {
    pub attributes: &'a Map<String, Value>,
    pub slug: &'a str,
    pub source: PathBuf,
    pub headings: Vec<Heading>,
    pub registry: &'a TagRegistry,
    pub author: &'a Author,
}

pub fn validate(input: HeadInput<'_>) -> Result<BlogPostHead, SchemaError> {
    let HeadInput {
        attributes,
        slug,
        source,
        headings,
        registry,
        author,
    } = input;

    let title = required_string(attributes, "title")?;
    let description = required_string(attributes, "description")?;
    let guid = required_string(attributes, "guid")?;
    let published_at = published_at(attributes)?;
    let tags = tags(attributes, registry)?;

    Ok(BlogPostHead {
        slug: slug.to_string(),
        guid,
        title,
        description,
        published_at,
        tags,
        headings,
        author: author.clone(),
        source,
        url: post_path(slug),
    })
}

fn required_string(attributes: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    match attributes.get(field) {
        None | Some(Value::Null) => Err(SchemaError::MissingField { field }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(SchemaError::EmptyField { field }),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(SchemaError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn published_at(attributes: &Map<String, Value>) -> Result<Option<PublishDate>, SchemaError> {
    match attributes.get("publishedAt") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => PublishDate::parse(s)
            .map(Some)
            .ok_or_else(|| SchemaError::InvalidDate { value: s.clone() }),
        Some(_) => Err(SchemaError::InvalidType {
            field: "publishedAt",
            expected: "a date string",
        }),
    }
}

fn tags(attributes: &Map<String, Value>, registry: &TagRegistry) -> Result<Vec<Tag>, SchemaError> {
    let entries = match attributes.get("tags") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(SchemaError::InvalidType {
                field: "tags",
                expected: "a list of tag slugs",
            });
        }
    };

    entries
        .iter()
        .map(|entry| match entry {
            Value::String(slug) => registry.get(slug).cloned(),
            _ => Err(SchemaError::InvalidType {
                field: "tags",
                expected: "a list of tag slugs",
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests;
