//! API root composition for public and enterprise hosts.

/// Host name of the public service.
pub const DEFAULT_API_HOST: &str = "github.com";

/// Whether `host` names an enterprise server rather than the public service.
#[must_use]
pub fn is_enterprise_host(host: &str) -> bool {
    !host.trim().eq_ignore_ascii_case(DEFAULT_API_HOST)
}

/// Root URL of the REST API for `host`, without a trailing slash.
///
/// `github.com` → `https://api.github.com`;
/// anything else → `https://<host>/api/v3`.
#[must_use]
pub fn api_root(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if is_enterprise_host(host) {
        format!("https://{host}/api/v3")
    } else {
        format!("https://api.{DEFAULT_API_HOST}")
    }
}

/// Absolute URL for a relative `uri_fragment`.
#[must_use]
pub fn compose_url(host: &str, uri_fragment: &str) -> String {
    format!("{}/{}", api_root(host), uri_fragment.trim_start_matches('/'))
}
