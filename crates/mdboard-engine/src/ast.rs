use serde::Serialize;

/// One typed element of the parsed document tree.
///
/// Every container variant owns an ordered `children` sequence; that order is
/// rendering order and is never rearranged after construction. Nodes are
/// plain values: a parse produces a fresh tree and nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Document {
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    /// Heading with level already clamped to 1..=4. Source levels 5-6
    /// collapse to 4 at parse time, so the renderer never sees them.
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    ThematicBreak,
    /// Blockquote with an optional attribution extracted from a trailing
    /// `-- Author` line. The attribution line is not part of `children`.
    Blockquote {
        children: Vec<Node>,
        source: Option<String>,
    },
    List {
        ordered: bool,
        children: Vec<Node>,
    },
    /// `checked` is `Some(_)` only for checkbox items (`- [ ]` / `- [x]`).
    ListItem {
        children: Vec<Node>,
        checked: Option<bool>,
    },
    /// Rows only; the first row is always the header row (a parse-time
    /// separator line toggles header mode but never appears as a row).
    Table {
        children: Vec<Node>,
    },
    TableRow {
        cells: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    CodeBlock {
        content: String,
        language: Option<String>,
    },
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Strikethrough {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    LineBreak,
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        src: String,
        alt: Option<String>,
        title: Option<String>,
    },
    /// Admonition block produced by the `:::NOTE` extension.
    Note {
        label: Option<String>,
        title: Option<String>,
        children: Vec<Node>,
    },
    /// Trailing region after the last horizontal rule of the document.
    Footer {
        children: Vec<Node>,
    },
    /// Raw HTML. Parsed through but always suppressed at render time.
    Html {
        value: String,
    },
    /// Unresolved reference-style link (`[text][id]`).
    LinkReference {
        label: String,
    },
    /// Unresolved reference-style image (`![alt][id]`).
    ImageReference {
        alt: String,
    },
    /// Unresolved footnote reference (`[^id]`).
    FootnoteReference {
        label: String,
    },
}

impl Node {
    /// Borrows the ordered child sequence for container variants.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children }
            | Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::Blockquote { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Table { children }
            | Node::TableCell { children }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Strikethrough { children }
            | Node::Link { children, .. }
            | Node::Note { children, .. }
            | Node::Footer { children } => Some(children),
            Node::TableRow { cells } => Some(cells),
            _ => None,
        }
    }

    /// Borrows the scalar text payload for value-carrying leaf variants.
    pub fn scalar_value(&self) -> Option<&str> {
        match self {
            Node::Text { value } | Node::InlineCode { value } | Node::Html { value } => {
                Some(value)
            }
            Node::CodeBlock { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Concatenation of all `Text` values beneath this node, in order.
    ///
    /// Used by the extension transform to match block markers against the
    /// full trimmed text of a paragraph.
    pub fn plain_text(&self) -> String {
        fn walk(node: &Node, out: &mut String) {
            match node {
                Node::Text { value } => out.push_str(value),
                Node::LineBreak => out.push('\n'),
                _ => {
                    if let Some(children) = node.children() {
                        for child in children {
                            walk(child, out);
                        }
                    }
                }
            }
        }
        let mut out = String::new();
        walk(self, &mut out);
        out
    }
}
