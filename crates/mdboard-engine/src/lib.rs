//! Markdown to themed, inline-styled document trees.
//!
//! The pipeline is parse → transform → render: Markdown text becomes a typed
//! [`Node`](ast::Node) tree, custom block extensions are folded in, and the
//! tree plus a [`Theme`] renders to a [`StyledNode`] tree with every visual
//! property inlined. The output suits embedding surfaces that cannot load
//! stylesheets or scripts.
//!
//! ```
//! use mdboard_engine::{render_markdown, RenderOptions, Theme};
//!
//! let styled = render_markdown("# Hello", &Theme::resolve("dark"), &RenderOptions::default());
//! let html = mdboard_engine::render::html::to_html_fragment(&styled);
//! assert!(html.contains("<h1"));
//! ```

pub mod ast;
pub mod highlight;
pub mod links;
pub mod parsing;
pub mod preview;
pub mod render;
pub mod theme;

pub use ast::Node;
pub use links::{StandaloneLink, extract_standalone_links};
pub use parsing::parse_document;
pub use preview::PreviewInfo;
pub use render::{RenderOptions, StyledElement, StyledNode, render};
pub use theme::{THEME_NAMES, Theme};

/// Parses and renders in one call.
pub fn render_markdown(markdown: &str, theme: &Theme, options: &RenderOptions) -> StyledNode {
    let document = parse_document(markdown);
    render(&document, theme, options)
}
