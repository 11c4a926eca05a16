//! The post collection.
//!
//! Layout: `<root>/<slug>/<one .mdx or .md file>`. Every post is read,
//! validated and indexed on each assembly; nothing is cached here (see
//! [`crate::lookup::RequestScope`] for per-request reuse).

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::{
    config::SOURCE_EXTENSIONS,
    error::ContentError,
    front_matter,
    head::{self, BlogPostHead, HeadInput},
    headings,
    tags::TagRegistry,
    types::Author,
};

/// Where posts live, plus the site-wide inputs every head needs.
#[derive(Clone, Debug)]
pub struct ContentSource {
    root: PathBuf,
    registry: TagRegistry,
    author: Author,
}

impl ContentSource {
    pub fn new(root: impl Into<PathBuf>, registry: TagRegistry, author: Author) -> Self {
        Self {
            root: root.into(),
            registry,
            author,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the raw contents of a post's source file.
    pub fn read_source(&self, source: &Path) -> Result<String, ContentError> {
        let path = self.root.join(source);
        fs::read_to_string(&path).map_err(|e| ContentError::io(path, e))
    }

    /// Build every head, newest first. The first broken post aborts the
    /// whole assembly.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn assemble(&self) -> Result<Vec<BlogPostHead>, ContentError> {
        let mut heads = Vec::new();
        let mut guids: HashMap<String, String> = HashMap::new();

        for dir in self.post_dirs()? {
            let head = self.load(&dir)?;

            if let Some(first) = guids.insert(head.guid.clone(), head.slug.clone()) {
                return Err(ContentError::DuplicateGuid {
                    guid: head.guid,
                    first,
                    second: head.slug,
                });
            }

            debug!(slug = %head.slug, headings = head.headings.len(), "loaded post");
            heads.push(head);
        }

        sort_newest_first(&mut heads);
        info!(posts = heads.len(), "assembled collection");
        Ok(heads)
    }

    fn post_dirs(&self) -> Result<Vec<PathBuf>, ContentError> {
        if !self.root.is_dir() {
            return Err(ContentError::NotFound {
                path: self.root.clone(),
            });
        }

        let mut dirs = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }

    fn load(&self, dir: &Path) -> Result<BlogPostHead, ContentError> {
        let slug = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = source_file(dir)?;
        let source = PathBuf::from(&slug).join(file.file_name().unwrap_or_default());

        let raw = fs::read_to_string(&file).map_err(|e| ContentError::io(&file, e))?;
        let matter = front_matter::extract(&raw).map_err(|source| {
            ContentError::MalformedFrontMatter {
                slug: slug.clone(),
                source,
            }
        })?;

        head::validate(HeadInput {
            attributes: &matter.attributes,
            slug: &slug,
            source,
            headings: headings::extract(&matter.body),
            registry: &self.registry,
            author: &self.author,
        })
        .map_err(|source| ContentError::SchemaValidation {
            slug: slug.clone(),
            source,
        })
    }
}

/// The single source file of a post directory.
fn source_file(dir: &Path) -> Result<PathBuf, ContentError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let is_source = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if is_source {
            found.push(entry.into_path());
        }
    }

    match found.len() {
        0 => Err(ContentError::MissingSource {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(ContentError::AmbiguousSource {
            dir: dir.to_path_buf(),
        }),
    }
}

/// Descending by publish date; undated posts go last, keeping their
/// relative order.
pub fn sort_newest_first(heads: &mut [BlogPostHead]) {
    heads.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
