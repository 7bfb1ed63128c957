//! Request handlers grouped by resource.

pub mod attribute;
pub mod auth;
pub mod category;
pub mod health;
pub mod history;
pub mod image;
pub mod item;
pub mod location;
pub mod media;
pub mod stats;
pub mod stock;

use axum::http::HeaderMap;

/// Header carrying the acting user's password for protected deletes.
pub const CONFIRM_PASSWORD_HEADER: &str = "x-confirm-password";

/// Password supplied for a protected delete, if any.
/// Decoded as raw UTF-8, so non-ASCII passwords are accepted.
pub(crate) fn confirm_password(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONFIRM_PASSWORD_HEADER)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONFIRM_PASSWORD_HEADER,
            HeaderValue::from_bytes(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_confirm_password_reads_cyrillic() {
        let headers = headers_with("пароль123".as_bytes());
        assert_eq!(confirm_password(&headers).as_deref(), Some("пароль123"));
    }

    #[test]
    fn test_confirm_password_ascii_and_missing() {
        assert_eq!(
            confirm_password(&headers_with(b"secret-pass")).as_deref(),
            Some("secret-pass")
        );
        assert_eq!(confirm_password(&HeaderMap::new()), None);
        assert_eq!(confirm_password(&headers_with(b"")), None);
        assert_eq!(confirm_password(&headers_with(&[0xff, 0xfe])), None);
    }
}
