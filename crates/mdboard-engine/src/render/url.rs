//! URL checks shared by every link-rendering path.

/// Placeholder substituted for URLs with a script-invocation scheme.
pub const SAFE_PLACEHOLDER: &str = "#";

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Neutralizes script-invocation URLs before they reach any output
/// attribute. This runs on every path that can emit a link or image, not
/// just the common one.
pub fn sanitize_url(url: &str) -> String {
    // Strip whitespace and control characters before the scheme check so
    // `java\tscript:` cannot slip through.
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();
    if BLOCKED_SCHEMES.iter().any(|s| compact.starts_with(s)) {
        SAFE_PLACEHOLDER.to_string()
    } else {
        url.trim().to_string()
    }
}

/// External links (absolute http/https) open in a new context with safe
/// `rel` attributes.
pub fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Best-effort host extraction for preview-card site labels.
pub fn host_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    (!host.is_empty()).then(|| host.to_string())
}
