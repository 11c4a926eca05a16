//! Content pipeline for a personal blog: post discovery, front-matter
//! validation, MDX-flavoured Markdown compilation, syndication and the
//! static/served site built on top.

pub mod build;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod front_matter;
pub mod head;
pub mod headings;
pub mod lookup;
pub mod mdx;
pub mod render;
pub mod server;
pub mod sitemap;
pub mod tags;
pub mod transformer;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
