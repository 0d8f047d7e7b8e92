//! Open Graph metadata scraping from fetched HTML.
//!
//! Parsing is regex-based over the raw page text. That is deliberate: the
//! interesting tags live in `<head>`, attribute order varies between sites,
//! and a full HTML parser buys nothing for four meta fields.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

use mdboard_engine::PreviewInfo;

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Extracts preview metadata from one page.
///
/// Open Graph tags win; `<title>` and the plain description meta are
/// fallbacks. `request_url` fills the `url` field when the page does not
/// declare `og:url`, and is the base for resolving a relative image.
pub fn scrape_preview(html: &str, request_url: &str) -> PreviewInfo {
    let title = meta_content(html, "og:title").or_else(|| title_text(html));
    let description =
        meta_content(html, "og:description").or_else(|| named_meta_content(html, "description"));
    let image = meta_content(html, "og:image").map(|src| resolve_url(&src, request_url));
    let site_name = meta_content(html, "og:site_name");
    let url = meta_content(html, "og:url").or_else(|| Some(request_url.to_string()));

    PreviewInfo {
        title,
        description,
        image,
        site_name,
        url,
    }
}

/// `<meta property="og:x" content="...">` in either attribute order.
fn meta_content(html: &str, property: &str) -> Option<String> {
    meta_lookup(html, "property", property)
}

/// `<meta name="description" content="...">` in either attribute order.
fn named_meta_content(html: &str, name: &str) -> Option<String> {
    meta_lookup(html, "name", name)
}

fn meta_lookup(html: &str, attr: &str, key: &str) -> Option<String> {
    let key = regex::escape(key);
    let forward = Regex::new(&format!(
        r#"(?is)<meta[^>]*\b{attr}\s*=\s*["']{key}["'][^>]*\bcontent\s*=\s*["']([^"']*)["']"#
    ))
    .ok()?;
    let reversed = Regex::new(&format!(
        r#"(?is)<meta[^>]*\bcontent\s*=\s*["']([^"']*)["'][^>]*\b{attr}\s*=\s*["']{key}["']"#
    ))
    .ok()?;
    let raw = forward
        .captures(html)
        .or_else(|| reversed.captures(html))
        .map(|caps| caps[1].to_string())?;
    non_empty(decode_html_entities(&raw).trim().to_string())
}

fn title_text(html: &str) -> Option<String> {
    let raw = TITLE_TAG.captures(html).map(|caps| caps[1].to_string())?;
    non_empty(decode_html_entities(&raw).trim().to_string())
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Resolves a possibly relative image reference against the page URL.
fn resolve_url(candidate: &str, base: &str) -> String {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return candidate.to_string();
    }
    if let Some(rest) = candidate.strip_prefix("//") {
        let scheme = if base.starts_with("http://") {
            "http"
        } else {
            "https"
        };
        return format!("{scheme}://{rest}");
    }
    let origin = origin_of(base);
    if candidate.starts_with('/') {
        return format!("{origin}{candidate}");
    }
    // Relative to the page's directory.
    let dir = base.rfind('/').filter(|&i| i > origin.len()).map_or_else(
        || origin.clone(),
        |i| base[..i].to_string(),
    );
    format!("{dir}/{candidate}")
}

fn origin_of(url: &str) -> String {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let host_end = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i)
        .unwrap_or(url.len());
    url[..host_end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const PAGE: &str = r#"<html><head>
        <title>Fallback Title</title>
        <meta property="og:title" content="OG Title">
        <meta property="og:description" content="OG description &amp; more">
        <meta content="Example Site" property="og:site_name">
        <meta property="og:image" content="/img/cover.png">
        <meta name="description" content="plain description">
        </head><body></body></html>"#;

    #[test]
    fn og_tags_win_over_fallbacks() {
        let info = scrape_preview(PAGE, "https://example.com/post/1");
        assert_eq!(info.title.as_deref(), Some("OG Title"));
        assert_eq!(info.description.as_deref(), Some("OG description & more"));
        assert_eq!(info.site_name.as_deref(), Some("Example Site"));
    }

    #[test]
    fn reversed_attribute_order_is_accepted() {
        let info = scrape_preview(PAGE, "https://example.com/");
        assert_eq!(info.site_name.as_deref(), Some("Example Site"));
    }

    #[test]
    fn title_tag_is_the_fallback() {
        let html = "<head><title> Only Title </title></head>";
        let info = scrape_preview(html, "https://example.com/");
        assert_eq!(info.title.as_deref(), Some("Only Title"));
    }

    #[test]
    fn description_meta_is_the_fallback() {
        let html = r#"<meta name="description" content="plain">"#;
        let info = scrape_preview(html, "https://example.com/");
        assert_eq!(info.description.as_deref(), Some("plain"));
    }

    #[test]
    fn missing_og_url_falls_back_to_request_url() {
        let info = scrape_preview("<html></html>", "https://example.com/post");
        assert_eq!(info.url.as_deref(), Some("https://example.com/post"));
        assert!(!info.has_content());
    }

    #[rstest]
    #[case("https://cdn.example.com/x.png", "https://cdn.example.com/x.png")]
    #[case("//cdn.example.com/x.png", "https://cdn.example.com/x.png")]
    #[case("/img/x.png", "https://example.com/img/x.png")]
    #[case("x.png", "https://example.com/post/x.png")]
    fn image_urls_resolve_against_the_page(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(resolve_url(src, "https://example.com/post/1"), expected);
    }

    #[test]
    fn empty_content_counts_as_absent() {
        let html = r#"<meta property="og:title" content="">"#;
        let info = scrape_preview(html, "https://example.com/");
        assert_eq!(info.title, None);
    }
}
