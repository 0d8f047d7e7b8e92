//! Standalone-link extraction.
//!
//! A standalone link is a source line whose entire trimmed content is a
//! single inline link to an absolute http(s) URL. These are the only lines
//! eligible for preview-card enrichment, so the fetch collaborator scans for
//! them before parsing rather than walking the parsed tree.

use std::sync::LazyLock;

use regex::Regex;

static STANDALONE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+?)\]\(([^)]+?)\)$").unwrap()
});

/// One line that consists solely of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneLink {
    /// Zero-based index of the source line.
    pub line_index: usize,
    pub url: String,
    pub text: String,
}

/// Scans source lines for standalone links, in document order.
///
/// Only absolute http(s) URLs qualify; relative links and other schemes are
/// never candidates for preview fetching.
pub fn extract_standalone_links(markdown: &str) -> Vec<StandaloneLink> {
    markdown
        .lines()
        .enumerate()
        .filter_map(|(line_index, line)| {
            let caps = STANDALONE_LINK.captures(line.trim())?;
            let url = caps[2].trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return None;
            }
            Some(StandaloneLink {
                line_index,
                url,
                text: caps[1].to_string(),
            })
        })
        .collect()
}
