//! Extension transform: a second pass over the top-level block sequence
//! that rewrites the custom block grammar into dedicated node types.
//!
//! Two rewrites run in order: note-block recognition (`:::NOTE ... :::`)
//! and footer extraction (everything after the last horizontal rule).
//! Extensions are recognized at document top level only, and the pass is
//! the identity on a sequence without matching markers, so running it twice
//! equals running it once.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Node;

static NOTE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:::NOTE(?:[ \t]+([^()]+?))?[ \t]*(?:\(([^)]*)\))?$").unwrap()
});

const NOTE_CLOSE: &str = ":::";

pub fn apply_extensions(blocks: Vec<Node>) -> Vec<Node> {
    extract_footer(collect_notes(blocks))
}

/// Rewrites `[open marker, blocks..., close marker]` runs into `Note` nodes.
///
/// The close marker is consumed. A missing close marker is not an error:
/// every block after the open marker is absorbed into the note.
fn collect_notes(blocks: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter();

    while let Some(block) = iter.next() {
        let Some((label, title)) = match_note_open(&block) else {
            out.push(block);
            continue;
        };

        let mut children = vec![];
        for inner in iter.by_ref() {
            if is_note_close(&inner) {
                break;
            }
            children.push(inner);
        }
        out.push(Node::Note {
            label,
            title,
            children,
        });
    }

    out
}

fn match_note_open(block: &Node) -> Option<(Option<String>, Option<String>)> {
    let Node::Paragraph { .. } = block else {
        return None;
    };
    let text = block.plain_text();
    let caps = NOTE_OPEN.captures(text.trim())?;
    let label = caps.get(1).map(|m| m.as_str().trim().to_string());
    let title = caps.get(2).map(|m| m.as_str().trim().to_string());
    Some((
        label.filter(|s| !s.is_empty()),
        title.filter(|s| !s.is_empty()),
    ))
}

fn is_note_close(block: &Node) -> bool {
    matches!(block, Node::Paragraph { .. }) && block.plain_text().trim() == NOTE_CLOSE
}

/// Wraps everything after the last top-level `ThematicBreak` in a `Footer`
/// node and drops the separating rule itself.
///
/// No rule, or a rule in final position, produces no footer.
fn extract_footer(mut blocks: Vec<Node>) -> Vec<Node> {
    let Some(rule_index) = blocks
        .iter()
        .rposition(|b| matches!(b, Node::ThematicBreak))
    else {
        return blocks;
    };
    if rule_index + 1 >= blocks.len() {
        return blocks;
    }

    let trailing = blocks.split_off(rule_index + 1);
    blocks.pop();
    blocks.push(Node::Footer { children: trailing });
    blocks
}
