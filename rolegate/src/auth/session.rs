//! Signed session tokens and the cookie that carries them.
//!
//! A session token is `{user_id}.{signature}`, where the signature is the unpadded URL-safe base64
//! HMAC-SHA256 of the user id under the configured `secret_key`. Tokens do not expire; the cookie
//! lives for the browser session and is cleared by logout or a failed login.

use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    config::{Config, SessionConfig},
    errors::Error,
    types::UserId,
};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(config: &Config) -> Result<HmacSha256, Error> {
    let secret_key = config.secret_key.as_ref().ok_or_else(|| Error::Internal {
        operation: "sign session: secret_key is not configured".to_string(),
    })?;
    HmacSha256::new_from_slice(secret_key.as_bytes()).map_err(|e| Error::Internal {
        operation: format!("sign session: {e}"),
    })
}

/// Create a signed session token for a user
pub fn create_session_token(user_id: UserId, config: &Config) -> Result<String, Error> {
    let mut mac = mac_for(config)?;
    mac.update(user_id.to_string().as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{user_id}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify a session token.
///
/// Returns `Ok(None)` for any token that is malformed or carries a bad signature; only a missing
/// signing key is an error.
pub fn verify_session_token(token: &str, config: &Config) -> Result<Option<UserId>, Error> {
    let Some((id_part, signature_part)) = token.split_once('.') else {
        return Ok(None);
    };
    let Ok(user_id) = Uuid::parse_str(id_part) else {
        return Ok(None);
    };
    let Ok(signature) = URL_SAFE_NO_PAD.decode(signature_part) else {
        return Ok(None);
    };

    let mut mac = mac_for(config)?;
    mac.update(id_part.as_bytes());
    // verify_slice compares in constant time
    Ok(mac.verify_slice(&signature).ok().map(|_| user_id))
}

/// `Set-Cookie` value that establishes a session
pub fn session_cookie(token: &str, session: &SessionConfig) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly", session.cookie_name, token);
    if session.cookie_secure {
        cookie.push_str("; Secure");
    }
    if let Some(same_site) = &session.cookie_same_site {
        cookie.push_str("; SameSite=");
        cookie.push_str(&same_site_attribute(same_site));
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(session: &SessionConfig) -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", session.cookie_name)
}

fn same_site_attribute(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Every value of the named cookie across all `Cookie` headers, in order of appearance.
/// Headers that are not valid UTF-8 are skipped.
pub fn read_session_cookies<'a>(headers: &'a HeaderMap, cookie_name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    headers
        .get_all(header::COOKIE)
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(move |pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name.trim() == cookie_name).then(|| value.trim())
        })
}
