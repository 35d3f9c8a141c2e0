/// CDN base for hero media, baked in at build time. `None` means same-origin.
pub fn cdn_base() -> Option<&'static str> {
    option_env!("BACKDROP_CDN_BASE_URL")
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
}

/// Resolve a site-relative asset path against an optional CDN base.
///
/// Absolute `http(s)://` paths pass through unchanged.
pub fn asset_url(path: &str, base: Option<&str>) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.map(|b| b.trim_end_matches('/')).unwrap_or("");
    if base.is_empty() {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
