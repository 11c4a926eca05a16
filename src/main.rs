use std::{
    env::current_dir,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use color_eyre::{Section, eyre::eyre};
use quill::{
    build::build_at,
    config::{CONTENT_DIR, DEFAULT_LISTEN_ADDR, OUTPUT_DIR, SiteMeta, site_meta},
    content::ContentSource,
    server::{self, AppState},
    tags::TagRegistry,
    types::Author,
};
use time::OffsetDateTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Blog content pipeline: build the site or serve it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Site root; content and output directories are relative to it
    #[arg(short, long, env = "QUILL_ROOT")]
    root: Option<PathBuf>,

    /// Directory holding one sub-directory per post
    #[arg(short, long, env = "QUILL_CONTENT_DIR", default_value = CONTENT_DIR)]
    content: PathBuf,

    /// Override the absolute base URL used in feeds and the sitemap
    #[arg(long, env = "QUILL_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every page and document into the output directory
    Build {
        #[arg(short, long, env = "QUILL_OUTPUT_DIR", default_value = OUTPUT_DIR)]
        output: PathBuf,
    },

    /// Serve pages straight from the content directory
    Serve {
        #[arg(short, long, env = "QUILL_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
        listen: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => current_dir().with_note(|| "While getting the current working directory")?,
    };

    let mut meta = site_meta();
    if let Some(base_url) = cli.base_url {
        meta.base_url = base_url.trim_end_matches('/').to_string();
    }

    let content_dir = root.join(&cli.content);
    if !content_dir.is_dir() {
        return Err(
            eyre!("content directory {} does not exist", content_dir.display())
                .with_note(|| "Pass --content or set QUILL_CONTENT_DIR."),
        );
    }
    let source = ContentSource::new(content_dir, TagRegistry::default(), Author::new(&meta.author));

    match cli.command {
        Command::Build { output } => build(&source, &root.join(output), &meta),
        Command::Serve { listen } => server::serve(listen, AppState::new(source, meta)).await,
    }
}

fn build(source: &ContentSource, output: &Path, meta: &SiteMeta) -> color_eyre::Result<()> {
    let today = OffsetDateTime::now_utc().date();
    let posts = build_at(source, output, meta, today)?;
    info!(posts, output = %output.display(), "done");
    Ok(())
}
