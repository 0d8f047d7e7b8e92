//! Lightweight syntax highlighting for fenced code blocks.
//!
//! Token colors are emitted as inline styles like everything else, with a
//! dark and a light palette chosen from the active theme's background.
//! Coverage is intentionally shallow: the JavaScript/TypeScript family and
//! CSS get token colors, every other language renders as one plain text run.
//! Unknown languages are never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::{StyledElement, StyledNode};
use crate::theme::Theme;

/// Token colors for one background polarity.
struct Palette {
    comment: &'static str,
    string: &'static str,
    keyword: &'static str,
    function: &'static str,
    property: &'static str,
}

const DARK: Palette = Palette {
    comment: "#6A9955",
    string: "#CE9178",
    keyword: "#569CD6",
    function: "#DCDCAA",
    property: "#9CDCFE",
};

const LIGHT: Palette = Palette {
    comment: "#008000",
    string: "#a31515",
    keyword: "#0000ff",
    function: "#795E26",
    property: "#001080",
};

// Alternation order is match priority: comments mask strings, strings mask
// keywords, and so on down the line.
static SCRIPT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<comment>//[^\n]*|/\*[\s\S]*?\*/)",
        r#"|(?P<string>"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`)"#,
        r"|(?P<keyword>\b(?:const|let|var|function|return|if|else|for|while|do|switch|case|break|continue|class|extends|new|this|super|import|export|from|default|async|await|try|catch|finally|throw|typeof|instanceof|in|of|void|delete|yield|static|get|set|interface|type|enum|implements|readonly|public|private|protected|abstract|namespace|declare|as|is|keyof|infer|never|unknown|any|string|number|boolean|null|undefined|true|false)\b)",
        // No lookahead in this regex flavor: the call/declaration suffix is
        // consumed by the match and re-emitted as plain text.
        r"|(?P<function>[A-Za-z_$][\w$]*)\s*\(",
        r"|(?P<property>\.[A-Za-z_$][\w$]*)",
    ))
    .unwrap()
});

static CSS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<comment>/\*[\s\S]*?\*/)",
        r#"|(?P<string>"[^"]*"|'[^']*')"#,
        r"|(?P<property>[A-Za-z-]+)\s*:",
    ))
    .unwrap()
});

fn script_family(lang: &str) -> bool {
    matches!(
        lang,
        "js" | "jsx" | "javascript" | "ts" | "tsx" | "typescript"
    )
}

fn css_family(lang: &str) -> bool {
    matches!(lang, "css" | "scss" | "less")
}

/// Tokenizes a code block body into styled runs.
///
/// Always returns at least one node for non-empty code; plain runs between
/// tokens come through as unstyled text.
pub fn tokenize_code(code: &str, lang: &str, theme: &Theme) -> Vec<StyledNode> {
    let lang = lang.to_lowercase();
    let pattern: &Regex = if script_family(&lang) {
        &SCRIPT_TOKEN
    } else if css_family(&lang) {
        &CSS_TOKEN
    } else {
        if code.is_empty() {
            return vec![];
        }
        return vec![StyledNode::text(code)];
    };

    let palette = if theme.is_dark() { &DARK } else { &LIGHT };
    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in pattern.captures_iter(code) {
        let (token, color) = if let Some(m) = caps.name("comment") {
            (m, palette.comment)
        } else if let Some(m) = caps.name("string") {
            (m, palette.string)
        } else if let Some(m) = caps.name("keyword") {
            (m, palette.keyword)
        } else if let Some(m) = caps.name("function") {
            (m, palette.function)
        } else if let Some(m) = caps.name("property") {
            (m, palette.property)
        } else {
            continue;
        };
        if token.start() > cursor {
            out.push(StyledNode::text(&code[cursor..token.start()]));
        }
        out.push(
            StyledElement::new("span")
                .style("color", color)
                .child(StyledNode::text(token.as_str()))
                .into(),
        );
        // Any consumed suffix after the token (a call paren, a colon) falls
        // into the next plain run.
        cursor = token.end();
    }
    if cursor < code.len() {
        out.push(StyledNode::text(&code[cursor..]));
    }
    out
}
