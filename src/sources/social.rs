// src/sources/social.rs
//! Turn social profile links (`https://twitch.tv/someone`) into `platform -> handle` pairs.

use url::Url;

/// Last non-empty path segment, percent-decoded. `None` for empty or relative input.
pub fn extract_handle(link: &str) -> Option<String> {
    let url = match Url::parse(link.trim()) {
        Ok(u) => u,
        Err(e) => {
            if !link.trim().is_empty() {
                tracing::debug!(link, error = %e, "invalid url in social link");
            }
            return None;
        }
    };
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded: String = url::form_urlencoded::parse(segment.as_bytes())
        .map(|(k, _)| k.into_owned())
        .next()
        .unwrap_or_else(|| segment.to_string());
    Some(decoded)
}

/// First label of the host without `www.`: `https://www.facebook.com/x` → `facebook`.
pub fn platform_name(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_lowercase)
}
