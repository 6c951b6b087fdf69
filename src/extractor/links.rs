use url::Url;

/// Resolve an `href`/`src` value found on a listing page.
///
/// Host-relative values (`/world/story`) land on the scheme and host of
/// `base`; other relative values join against `base` itself. Returns `None`
/// for empty values, fragments, script links and anything that does not end
/// up as an http(s) URL.
pub fn resolve(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }
    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("javascript:") || lowered.starts_with("mailto:") {
        return None;
    }

    let resolved = base.join(raw).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
