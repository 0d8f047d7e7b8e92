//! Styled-tree to HTML serialization.
//!
//! The serializer is deliberately dumb: it walks the styled tree and writes
//! tags, escaped attributes, and escaped text. All policy (style values,
//! suppression, sanitization) was settled by the renderer; nothing here
//! inspects content.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{StyledElement, StyledNode};

const VOID_ELEMENTS: [&str; 4] = ["hr", "br", "img", "input"];

/// Serializes one styled node to an HTML fragment.
pub fn to_html_fragment(node: &StyledNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Wraps a styled tree in a minimal standalone page.
///
/// The page carries no stylesheet and no script: every visual property is
/// already inline on the nodes.
pub fn to_html_document(node: &StyledNode, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body style=\"margin:0\">\n{}\n</body>\n</html>\n",
        encode_text(title),
        to_html_fragment(node)
    )
}

fn write_node(node: &StyledNode, out: &mut String) {
    match node {
        StyledNode::Text(text) => out.push_str(&encode_text(text)),
        StyledNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &StyledElement, out: &mut String) {
    out.push('<');
    out.push_str(element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(value));
            out.push('"');
        }
    }
    if !element.style.is_empty() {
        out.push_str(" style=\"");
        let css: String = element
            .style
            .iter()
            .map(|(name, value)| format!("{name}:{value};"))
            .collect();
        out.push_str(&encode_double_quoted_attribute(&css));
        out.push('"');
    }
    if VOID_ELEMENTS.contains(&element.tag) {
        out.push('>');
        return;
    }
    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_is_escaped() {
        let node = StyledNode::text("<script>&\"");
        assert_eq!(to_html_fragment(&node), "&lt;script&gt;&amp;\"");
    }

    #[test]
    fn attributes_are_escaped() {
        let node: StyledNode = StyledElement::new("a")
            .attr("href", "https://example.com/?a=1&b=\"x\"")
            .into();
        assert_eq!(
            to_html_fragment(&node),
            "<a href=\"https://example.com/?a=1&amp;b=&quot;x&quot;\"></a>"
        );
    }

    #[test]
    fn styles_join_into_one_attribute() {
        let node: StyledNode = StyledElement::new("p")
            .style("margin", "1em 0")
            .style("color", "#333")
            .into();
        assert_eq!(
            to_html_fragment(&node),
            "<p style=\"margin:1em 0;color:#333;\"></p>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        assert_eq!(to_html_fragment(&StyledElement::new("hr").into()), "<hr>");
        assert_eq!(to_html_fragment(&StyledElement::new("br").into()), "<br>");
    }

    #[test]
    fn boolean_attributes_render_bare() {
        let node: StyledNode = StyledElement::new("input")
            .attr("type", "checkbox")
            .attr("checked", "")
            .into();
        assert_eq!(
            to_html_fragment(&node),
            "<input type=\"checkbox\" checked>"
        );
    }

    #[test]
    fn children_nest_in_order() {
        let node: StyledNode = StyledElement::new("p")
            .child(StyledNode::text("a "))
            .child(StyledElement::new("strong").child(StyledNode::text("b")))
            .into();
        assert_eq!(to_html_fragment(&node), "<p>a <strong>b</strong></p>");
    }

    #[test]
    fn document_wrapper_escapes_the_title() {
        let page = to_html_document(&StyledNode::text("hi"), "<t>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>&lt;t&gt;</title>"));
        assert!(page.contains("hi"));
        assert!(!page.contains("<script"));
        assert!(!page.contains("<link"));
    }
}
