//! Cookie-backed login sessions.
//!
//! A session token is an opaque random string handed to the browser in an
//! `HttpOnly` cookie. Only its SHA-256 digest is stored server-side, so a
//! database leak does not expose live sessions. API clients that cannot hold
//! cookies may send the same token as `Authorization: Bearer <token>`.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "civic_session";

/// Default session lifetime in hours (7 days).
const DEFAULT_TTL_HOURS: i64 = 24 * 7;
/// Default interval between expired-session sweeps, in seconds.
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3600;

/// Configuration for session lifetime and cookie attributes.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in hours.
    pub ttl_hours: i64,
    /// Add the `Secure` attribute to the cookie (HTTPS deployments).
    pub cookie_secure: bool,
    /// How often expired sessions are deleted, in seconds.
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL_HOURS,
            cookie_secure: false,
            purge_interval_secs: DEFAULT_PURGE_INTERVAL_SECS,
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                       | Default |
    /// |-------------------------------|---------|
    /// | `SESSION_TTL_HOURS`           | `168`   |
    /// | `COOKIE_SECURE`               | `false` |
    /// | `SESSION_PURGE_INTERVAL_SECS` | `3600`  |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but invalid, or the TTL or purge interval
    /// is not positive.
    pub fn from_env() -> Self {
        let ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_TTL_HOURS.to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");
        assert!(ttl_hours > 0, "SESSION_TTL_HOURS must be positive");

        let purge_interval_secs: u64 = std::env::var("SESSION_PURGE_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_PURGE_INTERVAL_SECS.to_string())
            .parse()
            .expect("SESSION_PURGE_INTERVAL_SECS must be a valid u64");
        assert!(
            purge_interval_secs > 0,
            "SESSION_PURGE_INTERVAL_SECS must be positive"
        );

        Self {
            ttl_hours,
            cookie_secure: crate::config::env_flag("COOKIE_SECURE", false),
            purge_interval_secs,
        }
    }

    fn max_age_secs(&self) -> i64 {
        self.ttl_hours * 3600
    }
}

/// Generate a random session token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext is
/// sent to the client; only the hash should be persisted server-side.
pub fn generate_session_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `Set-Cookie` value that installs a session token.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    build_cookie(token, config.max_age_secs(), config.cookie_secure)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    build_cookie("", 0, config.cookie_secure)
}

fn build_cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull the session token from a bearer header or the session cookie.
///
/// The `Authorization` header wins when both are present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn token_hash_is_stable_sha256_hex() {
        let (plaintext, hash) = generate_session_token();
        assert_eq!(hash, hash_session_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_eq!(plaintext.len(), 64);
    }

    #[test]
    fn tokens_are_unique() {
        let (a, _) = generate_session_token();
        let (b, _) = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn session_cookie_attributes() {
        let config = SessionConfig {
            ttl_hours: 2,
            ..SessionConfig::default()
        };
        let cookie = session_cookie("abc", &config);
        assert_eq!(
            cookie,
            "civic_session=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=7200"
        );
    }

    #[test]
    fn secure_flag_is_appended() {
        let config = SessionConfig {
            cookie_secure: true,
            ..SessionConfig::default()
        };
        assert!(clear_session_cookie(&config).ends_with("Max-Age=0; Secure"));
    }

    #[test]
    fn token_read_from_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; civic_session=tok123; lang=en"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn bearer_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("civic_session=cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("header"));
    }

    #[test]
    fn empty_cookie_is_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("civic_session="));
        assert_eq!(token_from_headers(&headers), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
