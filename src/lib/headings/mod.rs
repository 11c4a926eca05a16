//! Table of contents of a post body.
//!
//! Headings are read from the same prepared event stream the compiler
//! renders, with the same [`Slugger`](crate::utils::Slugger), so every
//! entry points at the id of a rendered heading.

use tracing::debug;

use crate::mdx;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// 1 through 6.
    pub level: u8,
    /// `None` when the heading text has no anchor characters.
    pub slug: Option<String>,
    /// Plain text: inline markup, link targets, directive syntax and
    /// comments removed.
    pub text: String,
}

/// Headings of `body` in document order.
///
/// A body the compiler rejects still gets a table of contents, read from the
/// unprepared text; it never renders, so there is nothing to link to.
pub fn extract(body: &str) -> Vec<Heading> {
    match mdx::prepare(body) {
        Ok(prepared) => mdx::anchored(&prepared.text).headings,
        Err(e) => {
            debug!(error = %e, "headings read from unprepared body");
            mdx::anchored(body).headings
        }
    }
}
