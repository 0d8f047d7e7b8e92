//! Line-oriented block parser.
//!
//! The document is consumed line by line through [`BlockBuilder`], which
//! keeps exactly one open accumulator at a time (paragraph, code fence,
//! blockquote, list, table). Code-fence state masks every other rule; the
//! remaining accumulators are mutually exclusive. Anything still open at end
//! of input is flushed, so malformed input (an unterminated fence, a table
//! with no closing blank line) always produces a complete tree.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::Node;

use super::inline;
use super::lists::{FlatItem, nest_items};

static THEMATIC_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{0,3}(?:(?:-[ \t]*){3,}|(?:_[ \t]*){3,}|(?:\*[ \t]*){3,})$").unwrap()
});
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*`{3,}\s*([^`\s]*)\s*$").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*`{3,}\s*$").unwrap());
static QUOTE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}>\s?(.*)$").unwrap());
static CHECKBOX_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)- \[([ xX])\]\s+(.*)$").unwrap());
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").unwrap());
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\d+\.\s+(.*)$").unwrap());
static SEPARATOR_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());
static ATTRIBUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:--|\x{2014}|\x{2013})\s*(.+)$").unwrap());

/// The single open accumulator of the state machine.
#[derive(Debug)]
enum OpenBlock {
    None,
    Paragraph { children: Vec<Node> },
    Fence { language: Option<String>, lines: Vec<String> },
    Quote { lines: Vec<String> },
    List { items: Vec<FlatItem> },
    Table { rows: Vec<Node> },
}

pub struct BlockBuilder {
    open: OpenBlock,
    out: Vec<Node>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            open: OpenBlock::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, line: &str) {
        // Fence state masks everything else until a closing fence.
        if matches!(self.open, OpenBlock::Fence { .. }) {
            self.consume_fence_line(line);
            return;
        }
        if let Some(caps) = FENCE_OPEN.captures(line) {
            let lang = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            self.flush_open();
            self.open = OpenBlock::Fence {
                language: (!lang.is_empty()).then(|| lang.to_string()),
                lines: vec![],
            };
            return;
        }

        // Continue or close the open multi-line accumulator.
        if matches!(self.open, OpenBlock::List { .. }) {
            if let Some(item) = parse_list_item(line) {
                if let OpenBlock::List { items } = &mut self.open {
                    items.push(item);
                }
                return;
            }
            self.flush_open();
            if is_blank(line) {
                return;
            }
        } else if matches!(self.open, OpenBlock::Table { .. }) {
            if line.contains('|') {
                if let OpenBlock::Table { rows } = &mut self.open {
                    // A separator row only toggles header mode, never emits.
                    if !is_separator_row(line) {
                        rows.push(parse_table_row(line));
                    }
                }
                return;
            }
            self.flush_open();
            if is_blank(line) {
                return;
            }
        } else if matches!(self.open, OpenBlock::Quote { .. }) {
            if let Some(caps) = QUOTE_LINE.captures(line) {
                if let OpenBlock::Quote { lines } = &mut self.open {
                    lines.push(caps[1].to_string());
                }
                return;
            }
            self.flush_open();
            if is_blank(line) {
                return;
            }
        }

        self.dispatch(line);
    }

    pub fn finish(mut self) -> Vec<Node> {
        // EOF flush, including unterminated fences.
        self.flush_open();
        self.out
    }

    fn dispatch(&mut self, line: &str) {
        if is_blank(line) {
            self.flush_open();
            return;
        }
        if THEMATIC_BREAK.is_match(line) {
            self.flush_open();
            self.out.push(Node::ThematicBreak);
            return;
        }
        let trimmed = line.trim();
        // Extension block markers must stay isolated so the transform pass
        // can see them as standalone paragraphs.
        if trimmed.starts_with(":::") {
            self.flush_open();
            self.out.push(Node::Paragraph {
                children: vec![Node::Text {
                    value: trimmed.to_string(),
                }],
            });
            return;
        }
        if let Some(caps) = HEADING.captures(line) {
            self.flush_open();
            let level = (caps[1].len() as u8).min(4);
            self.out.push(Node::Heading {
                level,
                children: inline::tokenize(caps[2].trim()),
            });
            return;
        }
        if let Some(caps) = QUOTE_LINE.captures(line) {
            self.flush_open();
            self.open = OpenBlock::Quote {
                lines: vec![caps[1].to_string()],
            };
            return;
        }
        if let Some(item) = parse_list_item(line) {
            self.flush_open();
            self.open = OpenBlock::List { items: vec![item] };
            return;
        }
        if line.contains('|') {
            self.flush_open();
            let rows = if is_separator_row(line) {
                vec![]
            } else {
                vec![parse_table_row(line)]
            };
            self.open = OpenBlock::Table { rows };
            return;
        }

        // Plain paragraph line. Consecutive plain lines merge into one
        // paragraph with an explicit line break between them; the renderer
        // preserves those breaks with pre-wrap styling.
        if let OpenBlock::Paragraph { children } = &mut self.open {
            children.push(Node::LineBreak);
            children.extend(inline::tokenize(trimmed));
        } else {
            self.open = OpenBlock::Paragraph {
                children: inline::tokenize(trimmed),
            };
        }
    }

    fn consume_fence_line(&mut self, line: &str) {
        if FENCE_CLOSE.is_match(line) {
            self.flush_open();
            return;
        }
        if let OpenBlock::Fence { lines, .. } = &mut self.open {
            lines.push(line.to_string());
        }
    }

    fn flush_open(&mut self) {
        match std::mem::replace(&mut self.open, OpenBlock::None) {
            OpenBlock::None => {}
            OpenBlock::Paragraph { children } => {
                if !children.is_empty() {
                    self.out.push(Node::Paragraph { children });
                }
            }
            OpenBlock::Fence { language, lines } => {
                self.out.push(Node::CodeBlock {
                    content: lines.join("\n"),
                    language,
                });
            }
            OpenBlock::Quote { lines } => {
                self.out.push(build_blockquote(lines));
            }
            OpenBlock::List { items } => {
                self.out.push(nest_items(items));
            }
            OpenBlock::Table { rows } => {
                if !rows.is_empty() {
                    self.out.push(Node::Table { children: rows });
                }
            }
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Indentation level for list nesting: two spaces per level.
fn indent_level(indent: &str) -> usize {
    indent.chars().filter(|c| *c == ' ').count() / 2
}

fn parse_list_item(line: &str) -> Option<FlatItem> {
    // Checkbox beats plain unordered (same `- ` prefix).
    if let Some(caps) = CHECKBOX_ITEM.captures(line) {
        return Some(FlatItem {
            level: indent_level(&caps[1]),
            ordered: false,
            checked: Some(caps[2].eq_ignore_ascii_case("x")),
            children: vec![Node::Paragraph {
                children: inline::tokenize(caps[3].trim()),
            }],
        });
    }
    if THEMATIC_BREAK.is_match(line) {
        // `* * *` style rules would otherwise match the item pattern.
        return None;
    }
    if let Some(caps) = UNORDERED_ITEM.captures(line) {
        return Some(FlatItem {
            level: indent_level(&caps[1]),
            ordered: false,
            checked: None,
            children: vec![Node::Paragraph {
                children: inline::tokenize(caps[2].trim()),
            }],
        });
    }
    if let Some(caps) = ORDERED_ITEM.captures(line) {
        return Some(FlatItem {
            level: indent_level(&caps[1]),
            ordered: true,
            checked: None,
            children: vec![Node::Paragraph {
                children: inline::tokenize(caps[2].trim()),
            }],
        });
    }
    None
}

fn split_row_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(|c| c.trim().to_string()).collect()
}

fn is_separator_row(line: &str) -> bool {
    let cells = split_row_cells(line);
    !cells.is_empty() && cells.iter().all(|c| SEPARATOR_CELL.is_match(c))
}

fn parse_table_row(line: &str) -> Node {
    Node::TableRow {
        cells: split_row_cells(line)
            .into_iter()
            .map(|cell| Node::TableCell {
                children: inline::tokenize(&cell),
            })
            .collect(),
    }
}

/// Assembles accumulated quote lines into a blockquote node, extracting a
/// trailing `-- Author` attribution line into `source`.
fn build_blockquote(mut lines: Vec<String>) -> Node {
    let mut source = None;
    if let Some(last) = lines.last() {
        if let Some(caps) = ATTRIBUTION.captures(last.trim()) {
            source = Some(caps[1].trim().to_string());
            lines.pop();
        }
    }

    let mut children = vec![];
    let mut paragraph: Vec<Node> = vec![];
    for line in &lines {
        if line.trim().is_empty() {
            if !paragraph.is_empty() {
                children.push(Node::Paragraph {
                    children: std::mem::take(&mut paragraph),
                });
            }
        } else {
            if !paragraph.is_empty() {
                paragraph.push(Node::LineBreak);
            }
            paragraph.extend(inline::tokenize(line.trim()));
        }
    }
    if !paragraph.is_empty() {
        children.push(Node::Paragraph {
            children: paragraph,
        });
    }

    Node::Blockquote { children, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(input: &str) -> Vec<Node> {
        let mut builder = BlockBuilder::new();
        for line in input.lines() {
            builder.push(line);
        }
        builder.finish()
    }

    fn text(value: &str) -> Node {
        Node::Text {
            value: value.to_string(),
        }
    }

    #[test]
    fn consecutive_plain_lines_merge_with_line_breaks() {
        let blocks = parse("first line\nsecond line");
        assert_eq!(
            blocks,
            vec![Node::Paragraph {
                children: vec![text("first line"), Node::LineBreak, text("second line")],
            }]
        );
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        let blocks = parse("one\n\ntwo");
        assert_eq!(blocks.len(), 2);
    }

    #[rstest]
    #[case("# Title", 1)]
    #[case("## Title", 2)]
    #[case("### Title", 3)]
    #[case("#### Title", 4)]
    #[case("##### Title", 4)]
    #[case("###### Title", 4)]
    fn heading_levels_clamp_to_four(#[case] line: &str, #[case] expected: u8) {
        let blocks = parse(line);
        assert_eq!(
            blocks,
            vec![Node::Heading {
                level: expected,
                children: vec![text("Title")],
            }]
        );
    }

    #[rstest]
    #[case("---")]
    #[case("----")]
    #[case("___")]
    #[case("***")]
    fn thematic_break_forms(#[case] line: &str) {
        assert_eq!(parse(line), vec![Node::ThematicBreak]);
    }

    #[test]
    fn unterminated_fence_flushes_at_eof() {
        let blocks = parse("```rust\nlet x = 1;");
        assert_eq!(
            blocks,
            vec![Node::CodeBlock {
                content: "let x = 1;".to_string(),
                language: Some("rust".to_string()),
            }]
        );
    }

    #[test]
    fn fence_masks_other_block_rules() {
        let blocks = parse("```\n# not a heading\n- not a list\n```");
        assert_eq!(
            blocks,
            vec![Node::CodeBlock {
                content: "# not a heading\n- not a list".to_string(),
                language: None,
            }]
        );
    }

    #[test]
    fn blockquote_attribution_is_extracted() {
        let blocks = parse("> A\n> B\n> -- Author");
        assert_eq!(
            blocks,
            vec![Node::Blockquote {
                children: vec![Node::Paragraph {
                    children: vec![text("A"), Node::LineBreak, text("B")],
                }],
                source: Some("Author".to_string()),
            }]
        );
    }

    #[test]
    fn blockquote_without_attribution_keeps_all_lines() {
        let blocks = parse("> only line");
        assert_eq!(
            blocks,
            vec![Node::Blockquote {
                children: vec![Node::Paragraph {
                    children: vec![text("only line")],
                }],
                source: None,
            }]
        );
    }

    #[test]
    fn em_dash_attribution_marker() {
        let blocks = parse("> quote\n> \u{2014} Someone");
        assert_eq!(
            blocks,
            vec![Node::Blockquote {
                children: vec![Node::Paragraph {
                    children: vec![text("quote")],
                }],
                source: Some("Someone".to_string()),
            }]
        );
    }

    #[test]
    fn checkbox_items_carry_checked_state() {
        let blocks = parse("- [x] done\n- [ ] open");
        let Node::List { ordered, children } = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert!(!ordered);
        assert_eq!(children.len(), 2);
        assert!(matches!(
            children[0],
            Node::ListItem {
                checked: Some(true),
                ..
            }
        ));
        assert!(matches!(
            children[1],
            Node::ListItem {
                checked: Some(false),
                ..
            }
        ));
    }

    #[test]
    fn ordered_list_is_detected() {
        let blocks = parse("1. one\n2. two");
        assert!(matches!(blocks[0], Node::List { ordered: true, .. }));
    }

    #[test]
    fn blank_line_closes_list_without_starting_a_block() {
        let blocks = parse("- a\n\nafter");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Node::List { .. }));
        assert!(matches!(blocks[1], Node::Paragraph { .. }));
    }

    #[test]
    fn table_separator_row_is_not_emitted() {
        let blocks = parse("| a | b |\n|---|---|\n| 1 | 2 |");
        let Node::Table { children } = &blocks[0] else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn table_closes_on_line_without_separator() {
        let blocks = parse("| a | b |\nplain text");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Node::Table { .. }));
        assert!(matches!(blocks[1], Node::Paragraph { .. }));
    }

    #[test]
    fn table_rows_keep_their_own_cell_count() {
        let blocks = parse("| a | b |\n| only |");
        let Node::Table { children } = &blocks[0] else {
            panic!("expected table");
        };
        let Node::TableRow { cells } = &children[1] else {
            panic!("expected row");
        };
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn note_marker_lines_become_standalone_paragraphs() {
        let blocks = parse(":::NOTE Tip(Heads up)\nBody text\n:::");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].plain_text(), ":::NOTE Tip(Heads up)");
        assert_eq!(blocks[1].plain_text(), "Body text");
        assert_eq!(blocks[2].plain_text(), ":::");
    }

    #[test]
    fn star_rule_is_not_a_list_item() {
        assert_eq!(parse("* * *"), vec![Node::ThematicBreak]);
    }

    #[test]
    fn empty_input_produces_no_blocks() {
        assert_eq!(parse(""), vec![]);
    }
}
