//! Static build: render the whole site into an output directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Section;
use minify_html::{Cfg, minify};
use time::Date;
use tracing::{debug, info, instrument};

use crate::{
    config::{BLOG_DIR, SiteMeta, blog_path},
    content::ContentSource,
    feed,
    head::BlogPostHead,
    lookup::{RequestScope, get_body},
    mdx::CompiledBody,
    render,
    sitemap,
    transformer::code_block::highlight_css,
};

/// A file to write, relative to the output directory.
type Output = (PathBuf, Vec<u8>);

/// Build the site from `source` into `output_dir`. `today` is the sitemap's
/// last-modified date for the home page.
#[instrument(skip(source, meta), fields(output = %output_dir.display()))]
pub fn build_at(
    source: &ContentSource,
    output_dir: &Path,
    meta: &SiteMeta,
    today: Date,
) -> color_eyre::Result<usize> {
    let ctx = BuildCtx {
        output_dir: output_dir.to_path_buf(),
        meta: meta.clone(),
        today,
        min_cfg: Cfg::new(),
    };
    fs::create_dir_all(&ctx.output_dir)
        .with_note(|| format!("While creating {}", ctx.output_dir.display()))?;

    let scope = RequestScope::new(source);
    Pipeline::new(ctx, &scope)
        .discover()?
        .compile()?
        .render()?
        .emit()
}

struct BuildCtx {
    output_dir: PathBuf,
    meta: SiteMeta,
    today: Date,
    min_cfg: Cfg,
}

impl BuildCtx {
    fn html(&self, rel: PathBuf, page: String) -> Output {
        (rel, minify(page.as_bytes(), &self.min_cfg))
    }
}

trait PipelineStage {}
/// Pipeline typestate driver
struct Pipeline<'s, S: PipelineStage> {
    ctx: BuildCtx,
    scope: &'s RequestScope<'s>,
    state: S,
}

struct Discovered(Vec<BlogPostHead>);
impl PipelineStage for Discovered {}
struct Compiled(Vec<(BlogPostHead, CompiledBody)>);
impl PipelineStage for Compiled {}
struct Rendered {
    outputs: Vec<Output>,
    posts: usize,
}
impl PipelineStage for Rendered {}
impl PipelineStage for () {}

impl<'s> Pipeline<'s, ()> {
    fn new(ctx: BuildCtx, scope: &'s RequestScope<'s>) -> Self {
        Self {
            ctx,
            scope,
            state: (),
        }
    }

    fn discover(self) -> color_eyre::Result<Pipeline<'s, Discovered>> {
        let heads = self
            .scope
            .heads()
            .with_note(|| format!("While reading posts from {}", self.scope.source().root().display()))?
            .to_vec();
        Ok(Pipeline {
            ctx: self.ctx,
            scope: self.scope,
            state: Discovered(heads),
        })
    }
}

impl<'s> Pipeline<'s, Discovered> {
    fn compile(self) -> color_eyre::Result<Pipeline<'s, Compiled>> {
        let mut compiled = Vec::with_capacity(self.state.0.len());
        for head in self.state.0 {
            let body = get_body(self.scope, &head)
                .with_note(|| format!("While compiling {}", head.source.display()))?;
            compiled.push((head, body));
        }
        Ok(Pipeline {
            ctx: self.ctx,
            scope: self.scope,
            state: Compiled(compiled),
        })
    }
}

impl<'s> Pipeline<'s, Compiled> {
    fn render(self) -> color_eyre::Result<Pipeline<'s, Rendered>> {
        let outputs = render_site(&self.ctx, &self.state.0);
        Ok(Pipeline {
            ctx: self.ctx,
            scope: self.scope,
            state: Rendered {
                outputs,
                posts: self.state.0.len(),
            },
        })
    }
}

impl Pipeline<'_, Rendered> {
    fn emit(self) -> color_eyre::Result<usize> {
        for (rel, bytes) in &self.state.outputs {
            let path = self.ctx.output_dir.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, bytes).with_note(|| format!("While writing {}", path.display()))?;
            debug!(path = %rel.display(), bytes = bytes.len(), "wrote");
        }

        info!(
            posts = self.state.posts,
            files = self.state.outputs.len(),
            "site built"
        );
        Ok(self.state.posts)
    }
}

fn render_site(ctx: &BuildCtx, posts: &[(BlogPostHead, CompiledBody)]) -> Vec<Output> {
    let blog = PathBuf::from(BLOG_DIR);
    let heads: Vec<BlogPostHead> = posts.iter().map(|(head, _)| head.clone()).collect();
    let mut outputs = Vec::with_capacity(posts.len() + 6);

    outputs.push(ctx.html(
        PathBuf::from("index.html"),
        render::redirect_page(&blog_path()),
    ));
    outputs.push(ctx.html(
        blog.join("index.html"),
        render::listing_page(&heads, &ctx.meta),
    ));

    for (head, body) in posts {
        outputs.push(ctx.html(
            blog.join(&head.slug).join("index.html"),
            render::post_page(head, body, &ctx.meta),
        ));
    }

    outputs.push((
        blog.join("rss.xml"),
        feed::rss(&heads, &ctx.meta).into_bytes(),
    ));
    outputs.push((
        PathBuf::from("sitemap.xml"),
        sitemap::sitemap_xml(&heads, &ctx.meta, ctx.today).into_bytes(),
    ));
    outputs.push((
        PathBuf::from("robots.txt"),
        sitemap::robots_txt(&ctx.meta).into_bytes(),
    ));
    outputs.push((
        PathBuf::from("highlight.css"),
        highlight_css().as_bytes().to_vec(),
    ));

    outputs
}
