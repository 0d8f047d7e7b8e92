//! Inline tokenizer: splits a run of text into literal text and inline
//! markup nodes.
//!
//! Patterns are applied in a fixed priority order, each pass scanning only
//! the literal segments left unconsumed by earlier passes. Code spans come
//! first and act as raw zones: markup inside backticks is never re-scanned.
//! Image and link constructs are matched whole before the emphasis family so
//! underscores or stars inside their text and URLs stay literal (image before
//! generic link syntax), while link text still recurses into the remaining
//! passes. Bold runs before italic so `**x**` is not misread as two italic
//! markers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::ast::Node;

/// Pattern priority, highest first. Later passes only see the literal
/// segments earlier passes did not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Code,
    Image,
    Link,
    Strong,
    Emphasis,
    Strikethrough,
}

const PASSES: [Pass; 6] = [
    Pass::Code,
    Pass::Image,
    Pass::Link,
    Pass::Strong,
    Pass::Emphasis,
    Pass::Strikethrough,
];

static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`").unwrap());
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*|_([^_]+)_").unwrap());
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]*)(?:\s+"([^"]*)")?\)"#).unwrap()
});
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]]*)\]\(([^)\s]*)(?:\s+"([^"]*)")?\)"#).unwrap()
});

/// Tokenizes one line of text into an ordered inline node sequence.
///
/// Unmatched text remains literal `Text` nodes. An empty input produces an
/// empty sequence, never an error.
pub fn tokenize(text: &str) -> Vec<Node> {
    tokenize_from(text, 0)
}

/// Runs passes `pass_index..` over `text`, recursing into matched constructs
/// with the remaining (lower-priority) passes only.
fn tokenize_from(text: &str, pass_index: usize) -> Vec<Node> {
    if text.is_empty() {
        return vec![];
    }
    let Some(&pass) = PASSES.get(pass_index) else {
        return vec![Node::Text {
            value: text.to_string(),
        }];
    };

    let re: &Regex = match pass {
        Pass::Code => &CODE,
        Pass::Strong => &STRONG,
        Pass::Emphasis => &EMPHASIS,
        Pass::Strikethrough => &STRIKETHROUGH,
        Pass::Image => &IMAGE,
        Pass::Link => &LINK,
    };

    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in re.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        if whole.start() > cursor {
            out.extend(tokenize_from(&text[cursor..whole.start()], pass_index + 1));
        }
        out.push(build_node(pass, &caps, pass_index));
        cursor = whole.end();
    }
    if cursor < text.len() {
        out.extend(tokenize_from(&text[cursor..], pass_index + 1));
    }
    out
}

fn build_node(pass: Pass, caps: &Captures<'_>, pass_index: usize) -> Node {
    // First non-empty alternation group (bold/italic have `*` and `_` arms).
    let inner = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or("");

    match pass {
        Pass::Code => Node::InlineCode {
            value: inner.to_string(),
        },
        Pass::Strong => Node::Strong {
            children: tokenize_from(inner, pass_index + 1),
        },
        Pass::Emphasis => Node::Emphasis {
            children: tokenize_from(inner, pass_index + 1),
        },
        Pass::Strikethrough => Node::Strikethrough {
            children: tokenize_from(inner, pass_index + 1),
        },
        Pass::Image => {
            let alt = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            Node::Image {
                src: caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
                alt: (!alt.is_empty()).then(|| alt.to_string()),
                title: caps.get(3).map(|m| m.as_str().to_string()),
            }
        }
        Pass::Link => Node::Link {
            url: caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
            title: caps.get(3).map(|m| m.as_str().to_string()),
            children: tokenize_from(inner, pass_index + 1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Node {
        Node::Text {
            value: value.to_string(),
        }
    }

    #[test]
    fn plain_text_stays_literal() {
        assert_eq!(tokenize("just words"), vec![text("just words")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn bold_is_matched_before_italic() {
        let nodes = tokenize("**bold** and *italic*");
        assert_eq!(
            nodes,
            vec![
                Node::Strong {
                    children: vec![text("bold")],
                },
                text(" and "),
                Node::Emphasis {
                    children: vec![text("italic")],
                },
            ]
        );
    }

    #[test]
    fn code_span_suppresses_markup_inside() {
        let nodes = tokenize("`**not bold**`");
        assert_eq!(
            nodes,
            vec![Node::InlineCode {
                value: "**not bold**".to_string(),
            }]
        );
    }

    #[test]
    fn empty_code_span_is_preserved() {
        assert_eq!(
            tokenize("``"),
            vec![Node::InlineCode {
                value: String::new(),
            }]
        );
    }

    #[test]
    fn image_is_matched_before_link() {
        let nodes = tokenize("![cat](/cat.jpg)");
        assert_eq!(
            nodes,
            vec![Node::Image {
                src: "/cat.jpg".to_string(),
                alt: Some("cat".to_string()),
                title: None,
            }]
        );
    }

    #[test]
    fn image_without_alt_text() {
        let nodes = tokenize("![](/cat_icon_600.jpg)");
        assert_eq!(
            nodes,
            vec![Node::Image {
                src: "/cat_icon_600.jpg".to_string(),
                alt: None,
                title: None,
            }]
        );
    }

    #[test]
    fn link_with_title() {
        let nodes = tokenize(r#"[site](https://example.com "Example")"#);
        assert_eq!(
            nodes,
            vec![Node::Link {
                url: "https://example.com".to_string(),
                title: Some("Example".to_string()),
                children: vec![text("site")],
            }]
        );
    }

    #[test]
    fn empty_link_text_is_preserved() {
        let nodes = tokenize("[](https://example.com)");
        assert_eq!(
            nodes,
            vec![Node::Link {
                url: "https://example.com".to_string(),
                title: None,
                children: vec![],
            }]
        );
    }

    #[test]
    fn underscores_in_link_text_and_url_stay_literal() {
        let nodes = tokenize("[my_file](/docs/my_file.md)");
        assert_eq!(
            nodes,
            vec![Node::Link {
                url: "/docs/my_file.md".to_string(),
                title: None,
                children: vec![text("my_file")],
            }]
        );
    }

    #[test]
    fn stars_in_image_url_stay_literal() {
        let nodes = tokenize("![shot](/img/a*b*c.png)");
        assert_eq!(
            nodes,
            vec![Node::Image {
                src: "/img/a*b*c.png".to_string(),
                alt: Some("shot".to_string()),
                title: None,
            }]
        );
    }

    #[test]
    fn emphasis_still_applies_inside_link_text() {
        let nodes = tokenize("[see *this*](/x)");
        assert_eq!(
            nodes,
            vec![Node::Link {
                url: "/x".to_string(),
                title: None,
                children: vec![
                    text("see "),
                    Node::Emphasis {
                        children: vec![text("this")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn strikethrough_wraps_nested_content() {
        let nodes = tokenize("~~gone~~");
        assert_eq!(
            nodes,
            vec![Node::Strikethrough {
                children: vec![text("gone")],
            }]
        );
    }

    #[test]
    fn underscore_emphasis_variants() {
        let nodes = tokenize("__strong__ and _soft_");
        assert_eq!(
            nodes,
            vec![
                Node::Strong {
                    children: vec![text("strong")],
                },
                text(" and "),
                Node::Emphasis {
                    children: vec![text("soft")],
                },
            ]
        );
    }

    #[test]
    fn nested_emphasis_inside_bold() {
        let nodes = tokenize("**outer *inner* tail**");
        assert_eq!(
            nodes,
            vec![Node::Strong {
                children: vec![
                    text("outer "),
                    Node::Emphasis {
                        children: vec![text("inner")],
                    },
                    text(" tail"),
                ],
            }]
        );
    }

    #[test]
    fn matches_within_one_pass_are_left_to_right() {
        let nodes = tokenize("`a` mid `b`");
        assert_eq!(
            nodes,
            vec![
                Node::InlineCode {
                    value: "a".to_string(),
                },
                text(" mid "),
                Node::InlineCode {
                    value: "b".to_string(),
                },
            ]
        );
    }
}
