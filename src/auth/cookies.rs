use axum::http::{header, HeaderMap};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const PKCE_VERIFIER_COOKIE: &str = "pkce_verifier";

pub const REFRESH_TOKEN_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;
pub const PKCE_VERIFIER_MAX_AGE_SECS: i64 = 10 * 60;

pub fn build_token_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}");

    if secure {
        cookie.push_str("; Secure");
    }

    cookie
}

pub fn build_clear_cookie(name: &str, secure: bool) -> String {
    build_token_cookie(name, "", 0, secure)
}

pub fn extract_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_header| cookie_header.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            let value = value.trim();

            if name.trim() == cookie_name && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}

pub fn access_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie_value(headers, ACCESS_TOKEN_COOKIE)
}
