//! services/api/src/web/session.rs
//!
//! Stateless, signed session tokens carried in the `session` cookie.
//!
//! A token is `base64url(payload) "." base64url(HMAC-SHA256(payload))` where the
//! payload is a small JSON document holding the user id and the expiry time.
//! There is no server-side session table, so a token stays valid until it
//! expires; logging out only clears the browser's copy.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{digest::InvalidLength, Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use todo_core::domain::UserId;
use tower_cookies::cookie::{time, SameSite};
use tower_cookies::{Cookie, Cookies};
use tracing::warn;

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Lifetime of a session, also used as the cookie `Max-Age`.
pub const SESSION_TTL_SECS: i64 = 86_400;

const GENERATED_SECRET_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize)]
struct Claims {
    uid: UserId,
    exp: i64,
}

/// Issues and validates session tokens. Built once at startup and shared.
#[derive(Clone)]
pub struct SessionManager {
    mac: HmacSha256,
    secure: bool,
}

impl SessionManager {
    /// Creates a manager signing with `secret`.
    ///
    /// `secure` sets the `Secure` attribute on issued cookies.
    pub fn new(secret: &[u8], secure: bool) -> Result<Self, InvalidLength> {
        let mac = HmacSha256::new_from_slice(secret)?;
        Ok(Self { mac, secure })
    }

    /// Uses `secret` when configured, otherwise a random key that only lives as
    /// long as this process.
    pub fn from_secret(secret: Option<&str>, secure: bool) -> Result<Self, InvalidLength> {
        match secret {
            Some(secret) => Self::new(secret.as_bytes(), secure),
            None => {
                let mut key = [0u8; GENERATED_SECRET_LEN];
                OsRng.fill_bytes(&mut key);
                warn!("SESSION_SECRET is not set; generated a random secret. Sessions will not survive a restart.");
                Self::new(&key, secure)
            }
        }
    }

    /// Creates a token for `user_id` that expires 24 hours after `now`.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> String {
        let claims = Claims {
            uid: user_id,
            exp: (now + Duration::seconds(SESSION_TTL_SECS)).timestamp(),
        };
        // Serializing two integers cannot fail.
        let json = serde_json::to_vec(&claims).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{payload}.{signature}")
    }

    /// Returns the user id if `token` carries a valid signature and has not expired at `now`.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Option<UserId> {
        let (payload, signature) = token.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&json).ok()?;
        (now.timestamp() < claims.exp).then_some(claims.uid)
    }

    /// Builds the cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, token);
        cookie.set_path("/");
        cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS));
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Lax);
        cookie
    }

    /// Issues a token for `user_id` and stores it in the response cookies.
    pub fn start_session(&self, cookies: &Cookies, user_id: UserId) {
        let token = self.issue(user_id, Utc::now());
        cookies.add(self.session_cookie(token));
    }

    /// Removes the session cookie from the browser.
    pub fn end_session(&self, cookies: &Cookies) {
        let mut cookie = Cookie::from(SESSION_COOKIE);
        cookie.set_path("/");
        cookies.remove(cookie);
    }

    /// The authenticated user of the current request, if any.
    ///
    /// A missing, malformed or expired cookie means "not logged in", never an error.
    pub fn current_user(&self, cookies: &Cookies) -> Option<UserId> {
        let cookie = cookies.get(SESSION_COOKIE)?;
        self.validate(cookie.value(), Utc::now())
    }
}
