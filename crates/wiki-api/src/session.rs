use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use wiki_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "wiki_session";

/// Who is making the request. Built fresh from the session cookie on every
/// request and handed to each handler; never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { username: String },
}

impl Session {
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { username } => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Start a session: returns the jar carrying a fresh token plus the new state.
pub fn begin(
    jar: CookieJar,
    state: &AppState,
    username: &str,
) -> anyhow::Result<(CookieJar, Session)> {
    let token = create_token(&state.session_secret, username, state.session_ttl)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Session::Authenticated {
            username: username.to_string(),
        },
    ))
}

/// End a session by dropping the cookie.
pub fn end(jar: CookieJar) -> (CookieJar, Session) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Session::Anonymous,
    )
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Session::Anonymous);
        };

        let claims = match decode_token(&state.session_secret, cookie.value()) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Ignoring invalid session token: {}", e);
                return Ok(Session::Anonymous);
            }
        };

        // The account behind an old token may be gone if the database was replaced.
        // A failed lookup is a server error, not a logout.
        let db = state.clone();
        let username = claims.sub.clone();
        let user = tokio::task::spawn_blocking(move || db.db.get_user(&username)).await??;

        match user {
            Some(user) => Ok(Session::Authenticated {
                username: user.username,
            }),
            None => {
                debug!("Session token for unknown user {}", claims.sub);
                Ok(Session::Anonymous)
            }
        }
    }
}

pub fn create_token(secret: &str, username: &str, ttl: chrono::Duration) -> anyhow::Result<String> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (chrono::Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn decode_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let token = create_token("secret", "alice", chrono::Duration::days(1)).unwrap();
        let claims = decode_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = create_token("secret", "alice", chrono::Duration::days(1)).unwrap();
        assert!(decode_token("other", &token).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Beyond the default 60s leeway
        let token = create_token("secret", "alice", chrono::Duration::hours(-1)).unwrap();
        assert!(decode_token("secret", &token).is_err());
    }

    #[test]
    fn session_accessors() {
        let session = Session::Authenticated {
            username: "bob".into(),
        };
        assert_eq!(session.username(), Some("bob"));
        assert!(session.is_authenticated());
        assert_eq!(Session::Anonymous.username(), None);
        assert!(!Session::Anonymous.is_authenticated());
    }
}
