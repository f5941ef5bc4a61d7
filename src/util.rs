//! Shared request helpers.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Extract the admin credential from request headers.
///
/// `X-API-Key` wins; otherwise `Authorization` is used, with an optional
/// `Bearer ` prefix stripped. Returns None if neither header carries a
/// non-empty value.
pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    header_value("X-API-Key").or_else(|| {
        header_value("Authorization")
            .map(|s| match s {
                "Bearer" => "",
                _ => s.strip_prefix("Bearer ").unwrap_or(s).trim(),
            })
            .filter(|s| !s.is_empty())
    })
}

/// Constant-time string comparison for secrets.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
