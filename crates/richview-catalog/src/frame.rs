//! Probes whether a third-party page allows being embedded in a frame.
//!
//! Only response headers are inspected: `X-Frame-Options` and the
//! `frame-ancestors` directive of `Content-Security-Policy`.

use std::sync::LazyLock;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::Serialize;

use crate::error::CatalogError;

static FRAME_ANCESTORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)frame-ancestors\s+([^;]+)").expect("valid frame-ancestors regex")
});

static PERMISSIVE_ANCESTORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\*|'self'|https:)").expect("valid ancestors source regex")
});

static HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid scheme regex"));

/// Framing headers as returned by the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameHeaders {
    #[serde(rename = "x-frame-options")]
    pub x_frame_options: Option<String>,
    #[serde(rename = "content-security-policy")]
    pub content_security_policy: Option<String>,
}

/// Outcome of a frame probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameCheck {
    pub frameable: bool,
    pub headers: FrameHeaders,
}

impl FrameCheck {
    /// The answer to use when the probe itself failed.
    #[must_use]
    pub fn assume_blocked() -> Self {
        Self {
            frameable: false,
            headers: FrameHeaders::default(),
        }
    }

    #[must_use]
    pub fn from_headers(headers: FrameHeaders) -> Self {
        let frameable = is_frameable(
            headers.x_frame_options.as_deref(),
            headers.content_security_policy.as_deref(),
        );
        Self { frameable, headers }
    }
}

/// Applies the framing rules to raw header values.
#[must_use]
pub fn is_frameable(x_frame_options: Option<&str>, csp: Option<&str>) -> bool {
    if let Some(xfo) = x_frame_options {
        let xfo = xfo.to_ascii_lowercase();
        if ["deny", "sameorigin", "same-origin"]
            .iter()
            .any(|blocked| xfo.contains(blocked))
        {
            return false;
        }
    }

    if let Some(ancestors) = csp
        .and_then(|policy| FRAME_ANCESTORS.captures(policy))
        .and_then(|caps| caps.get(1))
    {
        return PERMISSIVE_ANCESTORS.is_match(ancestors.as_str());
    }

    true
}

/// Decodes a possibly percent-encoded URL and checks it is http(s).
///
/// # Errors
///
/// Returns [`CatalogError::InvalidUrl`] when the URL is blank or not http(s).
pub fn prepare_probe_url(raw: &str) -> Result<String, CatalogError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_owned(), |d| d.into_owned());
    let decoded = decoded.trim();
    if !HTTP_SCHEME.is_match(decoded) {
        return Err(CatalogError::InvalidUrl {
            url: raw.to_owned(),
            reason: "only http and https URLs can be probed".to_owned(),
        });
    }
    Ok(decoded.to_owned())
}

fn framing_headers(headers: &HeaderMap) -> FrameHeaders {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    FrameHeaders {
        x_frame_options: get("x-frame-options"),
        content_security_policy: get("content-security-policy")
            .or_else(|| get("x-content-security-policy")),
    }
}

/// HTTP prober for framing headers.
pub struct FrameProbe {
    client: Client,
}

impl FrameProbe {
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `raw_url` and evaluates its framing headers. Tries `HEAD`
    /// first and falls back to `GET` when `HEAD` is not answered with a
    /// success status. Redirects are followed.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidUrl`] if the URL is not http(s).
    /// - [`CatalogError::Http`] if the target cannot be reached.
    pub async fn check(&self, raw_url: &str) -> Result<FrameCheck, CatalogError> {
        let url = prepare_probe_url(raw_url)?;

        let head = self.client.head(&url).send().await?;
        let response = if head.status().is_success() {
            head
        } else {
            tracing::debug!(
                url = %url,
                status = head.status().as_u16(),
                "HEAD not accepted, retrying frame probe with GET"
            );
            self.client.get(&url).send().await?
        };

        Ok(FrameCheck::from_headers(framing_headers(response.headers())))
    }

    /// Like [`Self::check`] but degrades to [`FrameCheck::assume_blocked`]
    /// on any failure.
    pub async fn check_or_assume_blocked(&self, raw_url: &str) -> FrameCheck {
        match self.check(raw_url).await {
            Ok(check) => check,
            Err(e) => {
                tracing::warn!(error = %e, url = raw_url, "frame probe failed; assuming blocked");
                FrameCheck::assume_blocked()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_headers_is_frameable() {
        assert!(is_frameable(None, None));
    }

    #[test]
    fn x_frame_options_blocks() {
        assert!(!is_frameable(Some("DENY"), None));
        assert!(!is_frameable(Some("SAMEORIGIN"), None));
        assert!(!is_frameable(Some("same-origin"), None));
        assert!(is_frameable(Some("ALLOW-FROM https://a.test"), None));
    }

    #[test]
    fn csp_frame_ancestors_rules() {
        assert!(!is_frameable(None, Some("default-src 'self'; frame-ancestors 'none'")));
        assert!(!is_frameable(None, Some("frame-ancestors https://shop.example")));
        assert!(is_frameable(None, Some("frame-ancestors *")));
        assert!(is_frameable(None, Some("frame-ancestors 'self' https://a.test")));
        assert!(is_frameable(None, Some("Frame-Ancestors https:; script-src 'self'")));
        assert!(is_frameable(None, Some("default-src 'self'")));
    }

    #[test]
    fn x_frame_options_checked_before_csp() {
        assert!(!is_frameable(Some("deny"), Some("frame-ancestors *")));
    }

    #[test]
    fn prepare_probe_url_decodes_and_validates() {
        assert_eq!(
            prepare_probe_url("https%3A%2F%2Fpaystack.com%2Fbuy%2Fx").unwrap(),
            "https://paystack.com/buy/x"
        );
        assert_eq!(
            prepare_probe_url("HTTP://Example.com").unwrap(),
            "HTTP://Example.com"
        );
        assert!(matches!(
            prepare_probe_url("javascript:alert(1)"),
            Err(CatalogError::InvalidUrl { .. })
        ));
        assert!(prepare_probe_url("ftp://files.test").is_err());
        assert!(prepare_probe_url("").is_err());
    }

    #[test]
    fn framing_headers_fall_back_to_x_csp() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-content-security-policy",
            "frame-ancestors 'none'".parse().unwrap(),
        );
        let check = FrameCheck::from_headers(framing_headers(&headers));
        assert!(!check.frameable);
        assert_eq!(
            check.headers.content_security_policy.as_deref(),
            Some("frame-ancestors 'none'")
        );
    }

    #[test]
    fn assume_blocked_is_not_frameable() {
        let check = FrameCheck::assume_blocked();
        assert!(!check.frameable);
        assert_eq!(check.headers, FrameHeaders::default());
    }
}
