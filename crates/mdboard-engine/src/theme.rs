//! Theme records and resolution.
//!
//! A theme is an immutable set of color tokens applied uniformly across one
//! render pass. Themes are looked up by name from a fixed set; an unknown
//! name falls back to the default, never an error. Callers can also build
//! their own `Theme` value and pass it straight to the renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background_color: String,
    pub text_color: String,
    pub link_color: String,
    pub code_background_color: String,
    pub code_text_color: String,
    pub blockquote_background_color: String,
    pub blockquote_border_color: String,
    pub blockquote_text_color: String,
    pub table_header_background_color: String,
    pub table_border_color: String,
    pub horizontal_rule_color: String,
}

/// Names of the built-in themes, in presentation order.
pub const THEME_NAMES: [&str; 7] = [
    "light", "dark", "sepia", "nord", "github", "dracula", "board",
];

macro_rules! theme {
    ($bg:literal, $text:literal, $link:literal, $code_bg:literal, $code_text:literal,
     $quote_bg:literal, $quote_border:literal, $quote_text:literal,
     $table_header:literal, $table_border:literal, $rule:literal) => {
        Theme {
            background_color: $bg.to_string(),
            text_color: $text.to_string(),
            link_color: $link.to_string(),
            code_background_color: $code_bg.to_string(),
            code_text_color: $code_text.to_string(),
            blockquote_background_color: $quote_bg.to_string(),
            blockquote_border_color: $quote_border.to_string(),
            blockquote_text_color: $quote_text.to_string(),
            table_header_background_color: $table_header.to_string(),
            table_border_color: $table_border.to_string(),
            horizontal_rule_color: $rule.to_string(),
        }
    };
}

impl Theme {
    pub fn light() -> Self {
        theme!(
            "#ffffff", "#333333", "#007bff", "#f0f0f0", "#333333", "#f9f9f9", "#ccc", "#666",
            "#f2f2f2", "#ddd", "#ccc"
        )
    }

    pub fn dark() -> Self {
        theme!(
            "#1e1e1e", "#e0e0e0", "#4da3ff", "#2d2d2d", "#e0e0e0", "#2a2a2a", "#555", "#aaa",
            "#2a2a2a", "#555", "#555"
        )
    }

    pub fn sepia() -> Self {
        theme!(
            "#f4ecd8", "#5b4636", "#1e7b75", "#e8e0cc", "#5b4636", "#eae0c9", "#c3b393",
            "#7d6b56", "#e8e0cc", "#c3b393", "#c3b393"
        )
    }

    pub fn nord() -> Self {
        theme!(
            "#2e3440", "#d8dee9", "#88c0d0", "#3b4252", "#d8dee9", "#3b4252", "#81a1c1",
            "#e5e9f0", "#3b4252", "#4c566a", "#4c566a"
        )
    }

    pub fn github() -> Self {
        theme!(
            "#ffffff", "#24292e", "#0366d6", "#f6f8fa", "#24292e", "#f6f8fa", "#dfe2e5",
            "#6a737d", "#f6f8fa", "#dfe2e5", "#e1e4e8"
        )
    }

    pub fn dracula() -> Self {
        theme!(
            "#282a36", "#f8f8f2", "#8be9fd", "#44475a", "#f8f8f2", "#44475a", "#6272a4",
            "#f8f8f2", "#44475a", "#6272a4", "#6272a4"
        )
    }

    /// House theme of the original board exporter.
    pub fn board() -> Self {
        theme!(
            "#0F0F0F", "#f8f8f2", "#8be9fd", "#16191d", "#f8f8f2", "#3C3D37", "#6272a4",
            "#9e978c", "#232D3F", "#6272a4", "#6272a4"
        )
    }

    /// Looks up a built-in theme by name.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            "sepia" => Some(Self::sepia()),
            "nord" => Some(Self::nord()),
            "github" => Some(Self::github()),
            "dracula" => Some(Self::dracula()),
            "board" => Some(Self::board()),
            _ => None,
        }
    }

    /// Resolves a theme name, substituting the default for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::named(name).unwrap_or_default()
    }

    /// Rough dark-background check used to pick highlight palettes.
    pub fn is_dark(&self) -> bool {
        let bg = self.background_color.to_lowercase();
        bg.contains("#0") || bg.contains("#1") || bg.contains("#2") || bg.contains("#3")
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::board()
    }
}
