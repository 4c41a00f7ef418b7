//! RFC 5988 `Link` header parsing and pagination progress math.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINK_ENTRY: Regex =
        Regex::new(r#"<([^>]*)>\s*;\s*rel\s*=\s*"?([^",;]+)"?"#).expect("link regex is valid");
}

/// Navigation links extracted from a `Link` response header.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/repositories/1/assignees?page=2>; rel="next", <...?page=5>; rel="last"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub first: Option<String>,
}

impl PageLinks {
    /// Parse a `Link` header value. Unknown relations are ignored.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut links = Self::default();
        for cap in LINK_ENTRY.captures_iter(header) {
            let url = cap[1].trim().to_string();
            for rel in cap[2].split_whitespace() {
                let slot = match rel.to_ascii_lowercase().as_str() {
                    "next" => &mut links.next,
                    "last" => &mut links.last,
                    "prev" => &mut links.prev,
                    "first" => &mut links.first,
                    _ => continue,
                };
                *slot = Some(url.clone());
            }
        }
        links
    }

    /// Page count advertised by the `rel="last"` URL, if it carries one.
    ///
    /// Best effort: backends are not obliged to expose a numeric page hint.
    #[must_use]
    pub fn last_page(&self) -> Option<u32> {
        self.last.as_deref().and_then(page_number)
    }
}

/// Extract the `page` query parameter from a URL.
#[must_use]
pub fn page_number(url: &str) -> Option<u32> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// Whether per-page progress should be reported.
///
/// A threshold of zero disables reporting; otherwise reporting starts once the
/// estimated page count reaches the threshold.
#[must_use]
pub fn should_report_progress(threshold: u32, estimated_pages: Option<u32>) -> bool {
    threshold > 0 && estimated_pages.is_some_and(|pages| pages >= threshold)
}
