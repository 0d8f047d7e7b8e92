//! Node renderer: maps the typed document tree plus a resolved theme onto a
//! tree of styled output nodes.
//!
//! Every visual property is inlined on the node it belongs to because the
//! target embedding environment cannot load external stylesheets or scripts.
//! Rendering is a pure function of `(tree, theme, options)`: no I/O, no
//! hidden state, and no failure mode — any input tree produces a complete
//! styled tree.

pub mod html;
pub mod url;

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::ast::Node;
use crate::highlight;
use crate::preview::PreviewInfo;
use crate::theme::Theme;

use url::{is_external, sanitize_url};

/// One node of the styled output tree: either an element carrying inline
/// style properties, or a run of literal text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StyledNode {
    Element(StyledElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledElement {
    pub tag: &'static str,
    /// Non-style attributes (`href`, `src`, ...), in emission order.
    pub attrs: Vec<(&'static str, String)>,
    /// Inline style properties, in emission order.
    pub style: Vec<(&'static str, String)>,
    pub children: Vec<StyledNode>,
}

impl StyledElement {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: vec![],
            style: vec![],
            children: vec![],
        }
    }

    pub fn style(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.style.push((name, value.into()));
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<StyledNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: Vec<StyledNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl From<StyledElement> for StyledNode {
    fn from(element: StyledElement) -> Self {
        StyledNode::Element(element)
    }
}

impl StyledNode {
    pub fn text(value: impl Into<String>) -> Self {
        StyledNode::Text(value.into())
    }
}

/// Caller-facing render switches plus the preview-data map gathered by the
/// fetch collaborator before the render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub enable_link_preview: bool,
    pub preview_data: HashMap<String, PreviewInfo>,
}

/// Renders one node (recursively) into a styled node.
///
/// Total over the node-kind space: suppressed kinds render as empty text,
/// unresolved references render their literal bracket fallback.
pub fn render(node: &Node, theme: &Theme, options: &RenderOptions) -> StyledNode {
    render_node(node, theme, options).unwrap_or_else(|| StyledNode::text(""))
}

/// Renders a sibling sequence, dropping nodes that render to nothing.
fn render_all(nodes: &[Node], theme: &Theme, options: &RenderOptions) -> Vec<StyledNode> {
    nodes
        .iter()
        .filter_map(|n| render_node(n, theme, options))
        .collect()
}

fn render_node(node: &Node, theme: &Theme, options: &RenderOptions) -> Option<StyledNode> {
    let styled = match node {
        Node::Document { children } => StyledElement::new("div")
            .style("background-color", &theme.background_color)
            .style("color", &theme.text_color)
            .style("padding", "30px")
            .style("border-radius", "5px")
            .style("transition", "all 0.3s ease")
            .children(render_all(children, theme, options))
            .into(),

        Node::Paragraph { children } => render_paragraph(children, theme, options),

        Node::Heading { level, children } => {
            // Clamped at parse time; clamp again so a hand-built tree with a
            // wild level still maps onto a defined style.
            let level = (*level).clamp(1, 4);
            heading_element(level, theme)
                .children(render_all(children, theme, options))
                .into()
        }

        Node::ThematicBreak => StyledElement::new("hr")
            .style("border", "0")
            .style(
                "border-top",
                format!("1px solid {}", theme.horizontal_rule_color),
            )
            .style("margin", "1em 0")
            .into(),

        Node::Blockquote { children, source } => {
            let mut quote = StyledElement::new("blockquote")
                .style(
                    "border-left",
                    format!("4px solid {}", theme.blockquote_border_color),
                )
                .style("padding-left", "16px")
                .style("padding-top", "8px")
                .style("padding-bottom", "8px")
                .style("background-color", &theme.blockquote_background_color)
                .style("color", &theme.blockquote_text_color)
                .style("margin", "1.5em 0")
                .style("border-radius", "0 4px 4px 0")
                .children(render_all(children, theme, options));
            if let Some(source) = source {
                quote = quote.child(
                    StyledElement::new("cite")
                        .style("display", "block")
                        .style("text-align", "right")
                        .style("margin-top", "8px")
                        .style("font-size", "0.9em")
                        .style("font-style", "italic")
                        .style("opacity", "0.8")
                        .style("word-break", "break-word")
                        .style("max-width", "100%")
                        .style("padding-right", "8px")
                        .child(StyledNode::text(format!("\u{2014} {source}"))),
                );
            }
            quote.into()
        }

        Node::List { ordered, children } => {
            let (tag, marker) = if *ordered {
                ("ol", "decimal")
            } else {
                ("ul", "disc")
            };
            StyledElement::new(tag)
                .style("margin", "0")
                .style("padding-left", "30px")
                .style("list-style-type", marker)
                .style("color", &theme.text_color)
                .children(render_all(children, theme, options))
                .into()
        }

        Node::ListItem { children, checked } => {
            render_list_item(children, *checked, theme, options)
        }

        Node::Table { children } => render_table(children, theme, options),

        // Reached only for rows/cells outside a table; inside one, the
        // table path renders them with header/body context.
        Node::TableRow { cells } => render_table_row(cells, false, theme, options),
        Node::TableCell { children } => table_cell_element(false, theme)
            .children(render_all(children, theme, options))
            .into(),

        Node::CodeBlock { content, language } => StyledElement::new("pre")
            .style("background-color", &theme.code_background_color)
            .style("color", &theme.code_text_color)
            .style("padding", "10px")
            .style("border-radius", "4px")
            .style("overflow-x", "auto")
            .style("font-family", "monospace")
            .child(
                StyledElement::new("code").children(highlight::tokenize_code(
                    content,
                    language.as_deref().unwrap_or(""),
                    theme,
                )),
            )
            .into(),

        Node::Text { value } => StyledNode::text(value),

        Node::Emphasis { children } => StyledElement::new("em")
            .style("font-style", "italic")
            .children(render_all(children, theme, options))
            .into(),

        Node::Strong { children } => StyledElement::new("strong")
            .style("font-weight", "bold")
            .children(render_all(children, theme, options))
            .into(),

        Node::Strikethrough { children } => StyledElement::new("del")
            .style("text-decoration", "line-through")
            .children(render_all(children, theme, options))
            .into(),

        Node::InlineCode { value } => StyledElement::new("code")
            .style("padding", "2px 4px")
            .style("border-radius", "3px")
            .style("font-family", "monospace")
            .child(StyledNode::text(value))
            .into(),

        Node::LineBreak => StyledElement::new("br").into(),

        Node::Link {
            url,
            title,
            children,
        } => render_link(url, title.as_deref(), children, theme, options),

        Node::Image { src, alt, title } => {
            let mut img = StyledElement::new("img")
                .attr("src", sanitize_url(src))
                .attr("alt", alt.clone().unwrap_or_default());
            if let Some(title) = title {
                img = img.attr("title", title);
            }
            img.style("max-width", "100%")
                .style("height", "auto")
                .style("display", "block")
                .style("margin", "10px 0")
                .into()
        }

        Node::Note {
            label,
            title,
            children,
        } => render_note(label.as_deref(), title.as_deref(), children, theme, options),

        Node::Footer { children } => StyledElement::new("div")
            .style("margin-top", "2em")
            .style("padding-top", "12px")
            .style(
                "border-top",
                format!("1px solid {}", theme.horizontal_rule_color),
            )
            .style("font-size", "0.9em")
            .style("opacity", "0.8")
            .style("color", &theme.text_color)
            .children(render_all(children, theme, options))
            .into(),

        Node::Html { value } => {
            // Deliberate: raw HTML is never passed through.
            warn!(snippet = %value.chars().take(40).collect::<String>(),
                "raw HTML suppressed");
            return None;
        }

        // Unresolved references render their literal bracket syntax:
        // "not yet resolved", not an error.
        Node::LinkReference { label } => StyledNode::text(format!("[{label}]")),
        Node::ImageReference { alt } => StyledNode::text(format!("![{alt}]")),
        Node::FootnoteReference { label } => StyledNode::text(format!("[^{label}]")),
    };
    Some(styled)
}

fn heading_element(level: u8, theme: &Theme) -> StyledElement {
    match level {
        1 => StyledElement::new("h1")
            .style("font-size", "2em")
            .style("font-weight", "bold")
            .style("margin", "1.0em 0")
            .style("color", &theme.text_color)
            .style("line-height", "1.2")
            .style("letter-spacing", "-0.03em")
            .style("padding-bottom", "0.5rem")
            .style("border-bottom", "3px solid #3498db"),
        2 => StyledElement::new("h2")
            .style("font-size", "1.5em")
            .style("font-weight", "bold")
            .style("margin", "0.75em 0")
            .style("color", &theme.text_color)
            .style("line-height", "1.3")
            .style("padding-left", "1rem")
            .style("border-left", "5px solid #2ecc71"),
        3 => StyledElement::new("h3")
            .style("font-size", "1.17em")
            .style("font-weight", "bold")
            .style("margin", "0.5em 0")
            .style("color", &theme.text_color)
            .style("padding-bottom", "0.4rem")
            .style("display", "inline-block"),
        _ => StyledElement::new("h4")
            .style("font-size", "1.1em")
            .style("font-weight", "bold")
            .style("margin", "0.25em 0")
            .style("color", &theme.text_color)
            .style("padding-bottom", "0.4rem")
            .style("display", "inline-block"),
    }
}

fn render_paragraph(children: &[Node], theme: &Theme, options: &RenderOptions) -> StyledNode {
    // A paragraph that is exactly one link is a standalone link; with
    // preview data available it renders as a card instead of an anchor.
    if options.enable_link_preview
        && let [Node::Link { url, .. }] = children
        && let Some(info) = options.preview_data.get(url)
        && info.has_content()
    {
        return preview_card(url, info, theme);
    }

    StyledElement::new("p")
        .style("margin", "1em 0")
        .style("padding-left", "10px")
        .style("color", &theme.text_color)
        // Literal line breaks in source stay visible.
        .style("white-space", "pre-wrap")
        .children(render_all(children, theme, options))
        .into()
}

fn render_link(
    link_url: &str,
    title: Option<&str>,
    children: &[Node],
    theme: &Theme,
    options: &RenderOptions,
) -> StyledNode {
    let href = sanitize_url(link_url);
    let mut anchor = StyledElement::new("a").attr("href", href.clone());
    if is_external(&href) {
        anchor = anchor
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer");
    }
    if let Some(title) = title {
        anchor = anchor.attr("title", title);
    }
    anchor
        .style("color", &theme.link_color)
        .style("text-decoration", "underline")
        .children(render_all(children, theme, options))
        .into()
}

fn render_list_item(
    children: &[Node],
    checked: Option<bool>,
    theme: &Theme,
    options: &RenderOptions,
) -> StyledNode {
    // Tight item: its only child is a paragraph, rendered as bare inline
    // content. Loose items render each child, but paragraph children are
    // still spliced inline so list rows don't pick up paragraph margins.
    let rendered: Vec<StyledNode> = match children {
        [Node::Paragraph { children }] => render_all(children, theme, options),
        _ => children
            .iter()
            .flat_map(|child| match child {
                Node::Paragraph { children } => render_all(children, theme, options),
                other => render_node(other, theme, options).into_iter().collect(),
            })
            .collect(),
    };

    let mut item = StyledElement::new("li")
        .style("margin", "0")
        .style("display", "list-item")
        .style("color", &theme.text_color);

    match checked {
        Some(checked) => {
            let mut checkbox = StyledElement::new("input")
                .attr("type", "checkbox")
                .attr("readonly", "");
            if checked {
                checkbox = checkbox.attr("checked", "");
            }
            item = item
                .style("list-style-type", "none")
                .child(
                    checkbox
                        .style("margin-right", "8px")
                        .style("vertical-align", "middle"),
                )
                .child(
                    StyledElement::new("span")
                        .style("margin-left", "8px")
                        .children(rendered),
                );
        }
        None => item = item.children(rendered),
    }
    item.into()
}

fn render_table(rows: &[Node], theme: &Theme, options: &RenderOptions) -> StyledNode {
    // Row 0 is always the header, separator or not: the separator line is a
    // parse-time signal only.
    let mut header = StyledElement::new("thead").style("color", &theme.text_color);
    let mut body = StyledElement::new("tbody").style("color", &theme.text_color);
    for (i, row) in rows.iter().enumerate() {
        let cells = match row {
            Node::TableRow { cells } => cells.as_slice(),
            other => std::slice::from_ref(other),
        };
        let rendered = render_table_row(cells, i == 0, theme, options);
        if i == 0 {
            header = header.child(rendered);
        } else {
            body = body.child(rendered);
        }
    }

    StyledElement::new("table")
        .style("border-collapse", "collapse")
        .style("width", "100%")
        .style("margin", "1em 0")
        .style("color", &theme.text_color)
        .child(header)
        .child(body)
        .into()
}

fn render_table_row(
    cells: &[Node],
    header: bool,
    theme: &Theme,
    options: &RenderOptions,
) -> StyledNode {
    let mut row = StyledElement::new("tr").style("color", &theme.text_color);
    for cell in cells {
        let children = match cell {
            Node::TableCell { children } => render_all(children, theme, options),
            other => render_node(other, theme, options).into_iter().collect(),
        };
        row = row.child(table_cell_element(header, theme).children(children));
    }
    row.into()
}

fn table_cell_element(header: bool, theme: &Theme) -> StyledElement {
    let tag = if header { "th" } else { "td" };
    let mut cell = StyledElement::new(tag)
        .style("border", format!("1px solid {}", theme.table_border_color))
        .style("padding", "8px");
    if header {
        cell = cell.style("background-color", &theme.table_header_background_color);
    }
    cell.style("color", &theme.text_color)
        .style("text-align", "left")
}

fn render_note(
    label: Option<&str>,
    title: Option<&str>,
    children: &[Node],
    theme: &Theme,
    options: &RenderOptions,
) -> StyledNode {
    let mut heading = StyledElement::new("div")
        .style("font-weight", "bold")
        .style("margin-bottom", "8px")
        .style("color", &theme.text_color)
        .child(StyledNode::text(label.unwrap_or("NOTE")));
    if let Some(title) = title {
        heading = heading.child(
            StyledElement::new("span")
                .style("font-weight", "normal")
                .style("margin-left", "8px")
                .style("opacity", "0.85")
                .child(StyledNode::text(title)),
        );
    }

    StyledElement::new("div")
        .style(
            "border-left",
            format!("4px solid {}", theme.blockquote_border_color),
        )
        .style("background-color", &theme.blockquote_background_color)
        .style("padding", "12px 16px")
        .style("margin", "1.5em 0")
        .style("border-radius", "0 4px 4px 0")
        .style("color", &theme.text_color)
        .child(heading)
        .children(render_all(children, theme, options))
        .into()
}

/// Truncation width for card descriptions.
const CARD_DESCRIPTION_MAX: usize = 140;

fn preview_card(card_url: &str, info: &PreviewInfo, theme: &Theme) -> StyledNode {
    let href = sanitize_url(card_url);

    let mut text_box = StyledElement::new("div")
        .style("flex", "1")
        .style("padding", "12px")
        .style("display", "flex")
        .style("flex-direction", "column")
        .style("justify-content", "space-between")
        .style("min-width", "0");

    if let Some(title) = &info.title {
        text_box = text_box.child(
            StyledElement::new("div")
                .style("font-size", "15px")
                .style("font-weight", "bold")
                .style("color", &theme.text_color)
                .style("margin-bottom", "4px")
                .style("overflow", "hidden")
                .style("text-overflow", "ellipsis")
                .style("white-space", "nowrap")
                .style("line-height", "1.3")
                .child(StyledNode::text(title)),
        );
    }
    if let Some(description) = &info.description {
        text_box = text_box.child(
            StyledElement::new("div")
                .style("font-size", "12px")
                .style("color", &theme.text_color)
                .style("opacity", "0.75")
                .style("overflow", "hidden")
                .style("line-height", "1.3")
                .style("margin-bottom", "6px")
                .style("flex", "1")
                .child(StyledNode::text(truncate_chars(
                    description,
                    CARD_DESCRIPTION_MAX,
                ))),
        );
    }

    let site_label = info
        .site_name
        .clone()
        .or_else(|| url::host_of(info.url.as_deref().unwrap_or(card_url)))
        .unwrap_or_else(|| href.clone());
    text_box = text_box.child(
        StyledElement::new("div")
            .style("font-size", "11px")
            .style("color", &theme.link_color)
            .style("overflow", "hidden")
            .style("text-overflow", "ellipsis")
            .style("white-space", "nowrap")
            .style("font-weight", "500")
            .style("text-transform", "lowercase")
            .child(StyledNode::text(site_label)),
    );

    let mut content = StyledElement::new("div")
        .style("display", "flex")
        .style("flex-direction", "row")
        .style("height", "100px")
        .style("width", "100%")
        .child(text_box);

    if let Some(image) = &info.image {
        content = content.child(
            StyledElement::new("div")
                .style("width", "100px")
                .style("height", "100px")
                .style("flex-shrink", "0")
                .style("background-color", &theme.table_border_color)
                .style("overflow", "hidden")
                .child(
                    StyledElement::new("img")
                        .attr("src", sanitize_url(image))
                        .attr(
                            "alt",
                            info.title.clone().unwrap_or_else(|| "preview".to_string()),
                        )
                        .attr("loading", "lazy")
                        .style("width", "100%")
                        .style("height", "100%")
                        .style("object-fit", "cover")
                        .style("display", "block"),
                ),
        );
    }

    StyledElement::new("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .style("display", "block")
        .style("text-decoration", "none")
        .style("color", "inherit")
        .style("border", format!("1px solid {}", theme.table_border_color))
        .style("border-radius", "12px")
        .style("overflow", "hidden")
        .style("margin", "20px 0")
        .style("background-color", &theme.background_color)
        .style("box-shadow", "0 4px 6px rgba(0, 0, 0, 0.1)")
        .style("max-width", "600px")
        .child(content)
        .into()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('\u{2026}');
    out
}
