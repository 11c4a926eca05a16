//! Error taxonomy of the content pipeline.
//!
//! Component errors (`FrontMatterError`, `SchemaError`, `CompileError`) carry
//! no document context; `ContentError` wraps them with the slug of the post
//! that failed.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The metadata block is absent or is not a YAML mapping.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front matter block is missing")]
    Missing,
    #[error("front matter is not valid YAML: {0}")]
    Yaml(String),
    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
}

/// Metadata is present but does not satisfy the post head schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field `{field}` is required")]
    MissingField { field: &'static str },
    #[error("field `{field}` must not be empty")]
    EmptyField { field: &'static str },
    #[error("field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `publishedAt` is not a valid date: {value:?}")]
    InvalidDate { value: String },
    #[error("Tag with slug \"{slug}\" not found.")]
    TagNotFound { slug: String },
}

impl SchemaError {
    /// Name of the offending front matter field.
    pub fn field(&self) -> &'static str {
        match self {
            SchemaError::MissingField { field }
            | SchemaError::EmptyField { field }
            | SchemaError::InvalidType { field, .. } => *field,
            SchemaError::InvalidDate { .. } => "publishedAt",
            SchemaError::TagNotFound { .. } => "tags",
        }
    }
}

/// The body cannot be parsed as MDX.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("directive `{name}` opened on line {line} is never closed")]
    UnterminatedDirective { name: String, line: usize },
    #[error("directive fence on line {line} closes nothing")]
    UnmatchedDirectiveClose { line: usize },
    #[error("unbalanced expression brace on line {line}")]
    UnbalancedExpression { line: usize },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed front matter in post `{slug}`: {source}")]
    MalformedFrontMatter {
        slug: String,
        #[source]
        source: FrontMatterError,
    },
    #[error("invalid head for post `{slug}`: {source}")]
    SchemaValidation {
        slug: String,
        #[source]
        source: SchemaError,
    },
    #[error("failed to compile post `{slug}`: {source}")]
    Compile {
        slug: String,
        #[source]
        source: CompileError,
    },
    #[error("source file {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("post directory {} has no source file", .dir.display())]
    MissingSource { dir: PathBuf },
    #[error("post directory {} has more than one source file", .dir.display())]
    AmbiguousSource { dir: PathBuf },
    #[error("guid `{guid}` is used by both `{first}` and `{second}`")]
    DuplicateGuid {
        guid: String,
        first: String,
        second: String,
    },
    #[error("failed to walk content directory")]
    Walk(#[from] walkdir::Error),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            ContentError::NotFound { path }
        } else {
            ContentError::Io { path, source }
        }
    }
}
