//! URL normalization and validation.
//!
//! Normalization is minimal: trim surrounding whitespace and default the
//! scheme to `https://` when the input carries no scheme at all. Input that
//! already names a scheme (`http://`, `https://`, or anything else such as
//! `ftp://`) is left as is, so validation can reject foreign schemes instead
//! of silently reading `ftp` as a host name. Host case, ports and paths are
//! kept as submitted, so the normalized string is exactly what a later
//! redirect will return.

use url::Url;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Errors produced by [`validate_url`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Trims the input and prepends `https://` when it has no scheme.
///
/// Empty input stays empty so validation can report it.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("  example.com/a "), "https://example.com/a");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.starts_with(HTTP_PREFIX)
        || trimmed.starts_with(HTTPS_PREFIX)
        || has_explicit_scheme(trimmed)
    {
        return trimmed.to_string();
    }

    format!("{HTTPS_PREFIX}{trimmed}")
}

/// Detects a leading `scheme://` (RFC 3986 scheme characters).
fn has_explicit_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Checks that `value` is an absolute http/https URL with a non-empty host.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for an empty string
/// - [`UrlValidationError::InvalidFormat`] when the URL contains control
///   characters or does not parse
/// - [`UrlValidationError::UnsupportedProtocol`] for any scheme other than http/https
/// - [`UrlValidationError::MissingHost`] when the host is empty
pub fn validate_url(value: &str) -> Result<(), UrlValidationError> {
    if value.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // The parser strips tabs and newlines, but the raw string is what gets
    // stored and later sent back as a Location header.
    if value.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "invalid control character in URL".to_string(),
        ));
    }

    let parsed = Url::parse(value).map_err(|e| match e {
        url::ParseError::EmptyHost => UrlValidationError::MissingHost,
        other => UrlValidationError::InvalidFormat(other.to_string()),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Returns true if [`validate_url`] accepts `value`.
pub fn is_valid_url(value: &str) -> bool {
    validate_url(value).is_ok()
}

/// Normalizes and validates in one step.
///
/// # Errors
///
/// See [`validate_url`].
pub fn normalize_and_validate(raw: &str) -> Result<String, UrlValidationError> {
    let normalized = normalize_url(raw);
    validate_url(&normalized)?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_https_scheme() {
        assert_eq!(normalize_url("example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_url("  example.com/a \n"), "https://example.com/a");
        assert_eq!(
            normalize_url("\thttps://example.com/a  "),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(
            normalize_url("https://EXAMPLE.com:8443/Path?q=1#frag"),
            "https://EXAMPLE.com:8443/Path?q=1#frag"
        );
    }

    #[test]
    fn test_normalize_unschemed_matches_prefix_rule() {
        for input in ["a.b", " rust-lang.org/learn ", "localhost:8080/x", "x.y/?q=1"] {
            assert_eq!(normalize_url(input), format!("https://{}", input.trim()));
        }
    }

    #[test]
    fn test_normalize_empty_stays_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn test_foreign_scheme_is_kept_then_rejected() {
        let normalized = normalize_url("ftp://example.com/file");
        assert_eq!(normalized, "ftp://example.com/file");
        assert_eq!(
            validate_url(&normalized),
            Err(UrlValidationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_uppercase_scheme_is_not_prefixed() {
        assert_eq!(normalize_url("HTTPS://example.com"), "HTTPS://example.com");
        assert!(is_valid_url("HTTPS://example.com"));
    }

    #[test]
    fn test_path_containing_scheme_like_text_is_prefixed() {
        assert_eq!(
            normalize_url("example.com/redirect?to=https://other.org"),
            "https://example.com/redirect?to=https://other.org"
        );
    }

    #[test]
    fn test_validate_accepts_http_and_https() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("https://example.com/a?b=c"));
        assert!(is_valid_url("https://127.0.0.1:3000"));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(validate_url(""), Err(UrlValidationError::Empty));
        assert!(!is_valid_url(&normalize_url("")));
    }

    #[test]
    fn test_validate_rejects_ftp() {
        assert_eq!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("mailto:user@example.com"));
        assert!(!is_valid_url("file:///etc/passwd"));
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url(&normalize_url("https://")));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(!is_valid_url("https://exa mple.com"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn test_validate_rejects_control_characters() {
        for url in [
            "https://example.com/a\nb",
            "https://example.com/\r\nx",
            "https://exam\tple.com",
            "https://example.com/\u{7f}",
        ] {
            assert!(
                matches!(validate_url(url), Err(UrlValidationError::InvalidFormat(_))),
                "{url:?}"
            );
        }
        assert!(normalize_and_validate("example.com/a\nb").is_err());
    }

    #[test]
    fn test_validate_accepts_non_ascii() {
        assert!(is_valid_url("https://example.com/café"));
        assert!(is_valid_url("https://bücher.example/"));
    }

    #[test]
    fn test_normalize_and_validate() {
        assert_eq!(
            normalize_and_validate("example.com/a").unwrap(),
            "https://example.com/a"
        );
        assert!(normalize_and_validate("").is_err());
        assert!(normalize_and_validate("https://").is_err());
    }
}
