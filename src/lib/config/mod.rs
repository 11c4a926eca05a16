pub const CONTENT_DIR: &str = "posts";
pub const OUTPUT_DIR: &str = "public";
pub const BLOG_DIR: &str = "blog";

// Each post directory holds exactly one source file with one of these extensions.
pub const SOURCE_EXTENSIONS: &[&str] = &["mdx", "md"];

// Site-wide metadata used for feeds, the sitemap and absolute links.
pub const SITE_TITLE: &str = "Gajus Blog";
pub const SITE_DESCRIPTION: &str = "Gajus blog posts.";
pub const SITE_TAGLINE: &str = "A source of truth for my thoughts about engineering and startups";
pub const SITE_BASE_URL: &str = "https://gajus.com/";
pub const SITE_AUTHOR: &str = "Gajus Kuizinas";
pub const SITE_PUBLISHER: &str = "Gajus";
pub const SITE_LANGUAGE: &str = "en";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Convenience container for site metadata used across rendering.
#[derive(Clone, Debug)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    pub tagline: String,
    pub base_url: String,
    pub author: String,
    pub publisher: String,
    pub language: String,
}

impl SiteMeta {
    /// Absolute URL for a site-relative path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Site-relative URL of the post listing.
pub fn blog_path() -> String {
    format!("/{BLOG_DIR}")
}

/// Site-relative URL of a post.
pub fn post_path(slug: &str) -> String {
    format!("/{BLOG_DIR}/{slug}")
}

impl Default for SiteMeta {
    fn default() -> Self {
        site_meta()
    }
}

pub fn site_meta() -> SiteMeta {
    SiteMeta {
        title: SITE_TITLE.to_string(),
        description: SITE_DESCRIPTION.to_string(),
        tagline: SITE_TAGLINE.to_string(),
        base_url: SITE_BASE_URL.trim_end_matches('/').to_string(),
        author: SITE_AUTHOR.to_string(),
        publisher: SITE_PUBLISHER.to_string(),
        language: SITE_LANGUAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{post_path, site_meta};

    #[test]
    fn absolute_urls_have_single_slash() {
        let meta = site_meta();
        assert_eq!(meta.absolute("/blog/x"), "https://gajus.com/blog/x");
        assert_eq!(meta.absolute("sitemap.xml"), "https://gajus.com/sitemap.xml");
        assert_eq!(meta.absolute(&post_path("a")), "https://gajus.com/blog/a");
    }
}
