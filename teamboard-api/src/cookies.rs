/// Session cookies
///
/// Login and refresh deliver the token pair as two HTTP-only cookies,
/// `accessToken` and `refreshToken`. In production they are `Secure` with
/// `SameSite=None` so a client on another origin can send them; elsewhere
/// they use `SameSite=Lax` over plain HTTP.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::AppendHeaders,
};
use chrono::{DateTime, Utc};
use teamboard_shared::auth::jwt::TokenPair;

use crate::error::{ApiError, ApiResult};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// `Set-Cookie` headers for both session cookies
pub type SessionCookies = AppendHeaders<[(HeaderName, HeaderValue); 2]>;

fn attributes(production: bool) -> &'static str {
    if production {
        "Path=/; HttpOnly; Secure; SameSite=None"
    } else {
        "Path=/; HttpOnly; SameSite=Lax"
    }
}

fn max_age(expires_at: DateTime<Utc>) -> i64 {
    (expires_at - Utc::now()).num_seconds().max(0)
}

fn cookie(name: &str, value: &str, max_age: i64, production: bool) -> ApiResult<HeaderValue> {
    let raw = format!("{name}={value}; Max-Age={max_age}; {}", attributes(production));
    HeaderValue::from_str(&raw)
        .map_err(|e| ApiError::InternalError(format!("invalid cookie value: {e}")))
}

/// Cookies carrying a freshly issued token pair
pub fn session_cookies(tokens: &TokenPair, production: bool) -> ApiResult<SessionCookies> {
    Ok(AppendHeaders([
        (
            header::SET_COOKIE,
            cookie(
                ACCESS_COOKIE,
                &tokens.access_token,
                max_age(tokens.access_expires_at),
                production,
            )?,
        ),
        (
            header::SET_COOKIE,
            cookie(
                REFRESH_COOKIE,
                &tokens.refresh_token,
                max_age(tokens.refresh_expires_at),
                production,
            )?,
        ),
    ]))
}

/// Cookies that make the browser drop both tokens
pub fn cleared_cookies(production: bool) -> ApiResult<SessionCookies> {
    Ok(AppendHeaders([
        (header::SET_COOKIE, cookie(ACCESS_COOKIE, "", 0, production)?),
        (header::SET_COOKIE, cookie(REFRESH_COOKIE, "", 0, production)?),
    ]))
}

/// Value of the named cookie from any `Cookie` header, if present and
/// non-empty
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "access.jwt.value".to_string(),
            access_expires_at: Utc::now() + Duration::minutes(15),
            refresh_token: "refresh.jwt.value".to_string(),
            refresh_expires_at: Utc::now() + Duration::days(7),
        }
    }

    #[test]
    fn test_development_cookies() {
        let AppendHeaders(headers) = session_cookies(&pair(), false).unwrap();
        let access = headers[0].1.to_str().unwrap();
        let refresh = headers[1].1.to_str().unwrap();

        assert!(access.starts_with("accessToken=access.jwt.value;"));
        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Lax"));
        assert!(!access.contains("Secure"));
        assert!(refresh.starts_with("refreshToken=refresh.jwt.value;"));

        let age: i64 = refresh
            .split("; ")
            .find_map(|attr| attr.strip_prefix("Max-Age="))
            .unwrap()
            .parse()
            .unwrap();
        assert!(age > 6 * 24 * 3600 && age <= 7 * 24 * 3600);
    }

    #[test]
    fn test_production_cookies_are_secure() {
        let AppendHeaders(headers) = session_cookies(&pair(), true).unwrap();
        for (name, value) in &headers {
            assert_eq!(*name, header::SET_COOKIE);
            let value = value.to_str().unwrap();
            assert!(value.contains("Secure"));
            assert!(value.contains("SameSite=None"));
        }
    }

    #[test]
    fn test_cleared_cookies_expire_immediately() {
        let AppendHeaders(headers) = cleared_cookies(false).unwrap();
        assert_eq!(headers[0].1.to_str().unwrap().split(';').next(), Some("accessToken="));
        assert!(headers[1].1.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; accessToken=abc"));
        headers.append(header::COOKIE, HeaderValue::from_static("refreshToken=def"));

        assert_eq!(read_cookie(&headers, ACCESS_COOKIE), Some("abc"));
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE), Some("def"));
        assert_eq!(read_cookie(&headers, "missing"), None);

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("accessToken="));
        assert_eq!(read_cookie(&empty, ACCESS_COOKIE), None);
    }
}
