//! Finding posts and compiling their bodies on behalf of one request.

use std::{
    cell::{OnceCell, RefCell},
    collections::HashMap,
};

use tracing::{debug, warn};

use crate::{
    content::ContentSource,
    error::ContentError,
    front_matter,
    head::BlogPostHead,
    mdx::{self, CompiledBody},
};

/// Per-request memo of the collection and of compiled bodies.
///
/// Create one per request and drop it with the request; it is not `Sync`
/// and is never shared, so concurrent requests cannot observe each other's
/// work.
pub struct RequestScope<'a> {
    source: &'a ContentSource,
    heads: OnceCell<Vec<BlogPostHead>>,
    bodies: RefCell<HashMap<String, CompiledBody>>,
}

impl<'a> RequestScope<'a> {
    pub fn new(source: &'a ContentSource) -> Self {
        Self {
            source,
            heads: OnceCell::new(),
            bodies: RefCell::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &'a ContentSource {
        self.source
    }

    /// The assembled collection, built on first use.
    pub fn heads(&self) -> Result<&[BlogPostHead], ContentError> {
        if let Some(heads) = self.heads.get() {
            return Ok(heads);
        }
        let heads = self.source.assemble()?;
        Ok(self.heads.get_or_init(|| heads))
    }
}

/// The first post whose slug or guid equals `key`. Not finding one is
/// `Ok(None)`.
pub fn find_by_slug_or_guid(
    scope: &RequestScope<'_>,
    key: &str,
) -> Result<Option<BlogPostHead>, ContentError> {
    let found = scope
        .heads()?
        .iter()
        .find(|head| head.slug == key || head.guid == key)
        .cloned();

    if found.is_none() {
        debug!(key, "no post matches");
    }
    Ok(found)
}

/// Compile the body of `head`, at most once per scope.
pub fn get_body(scope: &RequestScope<'_>, head: &BlogPostHead) -> Result<CompiledBody, ContentError> {
    if let Some(body) = scope.bodies.borrow().get(&head.slug) {
        return Ok(body.clone());
    }

    let raw = scope.source.read_source(&head.source).inspect_err(|e| {
        if let ContentError::NotFound { path } = e {
            warn!(slug = %head.slug, path = %path.display(), "post head has no source file");
        }
    })?;
    let matter = front_matter::extract(&raw).map_err(|source| ContentError::MalformedFrontMatter {
        slug: head.slug.clone(),
        source,
    })?;
    let body = mdx::compile(&matter.body).map_err(|source| ContentError::Compile {
        slug: head.slug.clone(),
        source,
    })?;

    scope
        .bodies
        .borrow_mut()
        .insert(head.slug.clone(), body.clone());
    Ok(body)
}
