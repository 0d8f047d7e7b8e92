//! `mdboard`: export a Markdown file as a self-contained themed HTML page.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use mdboard_config::Config;
use mdboard_engine::render::html::to_html_document;
use mdboard_engine::{PreviewInfo, RenderOptions, THEME_NAMES, Theme, render_markdown};
use mdboard_preview::PreviewClient;

#[derive(Debug, Parser)]
#[command(name = "mdboard", about = "Render Markdown to inline-styled HTML")]
struct Cli {
    /// Markdown file to render.
    input: PathBuf,

    /// Theme name. Falls back to the configured theme, then the default.
    #[arg(long)]
    theme: Option<String>,

    /// Output path. Defaults to the input path with an .html extension.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the page to stdout instead of a file.
    #[arg(long)]
    stdout: bool,

    /// Fetch link previews for standalone links.
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mdboard=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable config");
        None
    });
    run_with_config(cli, config)
}

fn run_with_config(cli: Cli, config: Option<Config>) -> Result<()> {
    let markdown = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let theme_name = pick_theme_name(cli.theme.as_deref(), config.as_ref());
    if let Some(name) = &theme_name
        && !THEME_NAMES.contains(&name.as_str())
    {
        warn!(theme = %name, "unknown theme, using default");
    }
    let theme = theme_name
        .as_deref()
        .map(Theme::resolve)
        .unwrap_or_default();

    let enable_preview = cli.preview || config.is_some_and(|c| c.enable_preview);
    let preview_data = if enable_preview {
        fetch_preview_data(&markdown)?
    } else {
        HashMap::new()
    };

    let options = RenderOptions {
        enable_link_preview: enable_preview,
        preview_data,
    };
    let styled = render_markdown(&markdown, &theme, &options);
    let page = to_html_document(&styled, &page_title(&cli.input));

    if cli.stdout {
        print!("{page}");
        return Ok(());
    }
    let out = cli.out.unwrap_or_else(|| output_path(&cli.input));
    std::fs::write(&out, page).with_context(|| format!("failed to write {}", out.display()))?;
    info!(output = %out.display(), "export complete");
    Ok(())
}

/// Flag wins over config; `None` means render with the default theme.
fn pick_theme_name(flag: Option<&str>, config: Option<&Config>) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| config.and_then(|c| c.theme.clone()))
}

/// The async runtime exists only while previews are being fetched.
fn fetch_preview_data(markdown: &str) -> Result<HashMap<String, PreviewInfo>> {
    let client = PreviewClient::new().context("failed to set up preview client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(runtime.block_on(client.prepare_preview_data(markdown)))
}

fn output_path(input: &Path) -> PathBuf {
    input.with_extension("html")
}

fn page_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mdboard".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(output_path(Path::new("notes/post.md")), PathBuf::from("notes/post.html"));
        assert_eq!(output_path(Path::new("plain")), PathBuf::from("plain.html"));
    }

    #[test]
    fn title_comes_from_the_file_stem() {
        assert_eq!(page_title(Path::new("dir/my-post.md")), "my-post");
    }

    #[test]
    fn flag_beats_configured_theme() {
        let config = Config {
            theme: Some("sepia".to_string()),
            enable_preview: false,
        };
        assert_eq!(
            pick_theme_name(Some("nord"), Some(&config)).as_deref(),
            Some("nord")
        );
        assert_eq!(
            pick_theme_name(None, Some(&config)).as_deref(),
            Some("sepia")
        );
        assert_eq!(pick_theme_name(None, None), None);
    }

    #[test]
    fn export_writes_a_self_contained_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        std::fs::write(&input, "# Title\n\nbody text").unwrap();

        run_with_config(
            Cli {
                input: input.clone(),
                theme: Some("dark".to_string()),
                out: None,
                stdout: false,
                preview: false,
            },
            None,
        )
        .unwrap();

        let page = std::fs::read_to_string(dir.path().join("doc.html")).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1"));
        assert!(page.contains("body text"));
        assert!(page.contains("#1e1e1e"));
    }
}
