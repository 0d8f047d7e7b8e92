//! Markdown parsing pipeline: line-oriented block parser, inline tokenizer,
//! nested-list reconstruction, and the custom block-extension transform.

pub mod blocks;
pub mod inline;
mod lists;
pub mod transform;

use crate::ast::Node;

use blocks::BlockBuilder;

/// Parses raw Markdown into a document node tree.
///
/// Total for any input: malformed constructs resolve to defined fallbacks
/// and the empty string parses to an empty document.
pub fn parse_document(markdown: &str) -> Node {
    let mut builder = BlockBuilder::new();
    for line in markdown.lines() {
        builder.push(line);
    }
    let blocks = transform::apply_extensions(builder.finish());
    Node::Document { children: blocks }
}
