//! URL utilities for talking to the modem
//!
//! The status page authenticates through query fragments
//! (`?login_<credential>` and `?ct_<token>`), so every URL that reaches a
//! log line or error message goes through [`UrlUtils::obfuscate_credentials`].

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static SESSION_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([?&](?:login|ct)_)[^&#\s)]*").expect("static regex"));

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Normalize URL scheme by ensuring it has a proper HTTP/HTTPS prefix
    ///
    /// The modem only answers over TLS, so a bare host defaults to HTTPS.
    ///
    /// ```rust
    /// use surfboard_exporter::utils::url::UrlUtils;
    ///
    /// assert_eq!(UrlUtils::normalize_scheme("192.168.100.1"), "https://192.168.100.1");
    /// assert_eq!(UrlUtils::normalize_scheme("http://modem.lan"), "http://modem.lan");
    /// ```
    pub fn normalize_scheme(url: &str) -> String {
        let trimmed = url.trim();

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        }
    }

    /// Sanitize a base URL by normalizing the scheme and removing trailing slashes
    pub fn sanitize(url: &str) -> String {
        let mut sanitized = Self::normalize_scheme(url);

        // Keep the slashes belonging to the scheme
        while sanitized.len() > 8 && sanitized.ends_with('/') {
            sanitized.pop();
        }

        sanitized
    }

    /// Sanitize and validate a base URL, returning the sanitized form
    pub fn parse_base(url: &str) -> Result<String, url::ParseError> {
        let sanitized = Self::sanitize(url);
        let parsed = Url::parse(&sanitized)?;
        if parsed.host_str().is_none() {
            return Err(url::ParseError::EmptyHost);
        }
        Ok(sanitized)
    }

    /// Obfuscate session credentials embedded in a URL or message
    ///
    /// ```rust
    /// use surfboard_exporter::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::obfuscate_credentials("https://192.168.100.1/cmconnectionstatus.html?login_c2VjcmV0"),
    ///     "https://192.168.100.1/cmconnectionstatus.html?login_****"
    /// );
    /// ```
    pub fn obfuscate_credentials(url: &str) -> String {
        let mut obfuscated = url.to_string();

        // Handle URL auth (user:pass@host)
        if let Ok(parsed) = Url::parse(url)
            && (!parsed.username().is_empty() || parsed.password().is_some())
        {
            let mut new_url = parsed.clone();
            let _ = new_url.set_username("****");
            let _ = new_url.set_password(Some("****"));
            obfuscated = new_url.to_string();
        }

        SESSION_FRAGMENT
            .replace_all(&obfuscated, "${1}****")
            .to_string()
    }
}
