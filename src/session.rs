use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use thiserror::Error;

use crate::routes::auth::claims::SessionClaims;
use crate::utils::jwt::{create_jwt, SessionKeys};

pub const SESSION_COOKIE: &str = "session";
/// Lifetime of a permanent session.
pub const PERMANENT_SESSION_DAYS: i64 = 31;
/// Token lifetime backing a browser-session cookie.
const TRANSIENT_SESSION_DAYS: i64 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no username")]
    MissingUsername,
    #[error("session has no auth provider")]
    MissingAuthProvider,
    #[error("failed to sign session: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Session values set by a handler. Nothing reaches the client until the
/// route layer calls [`SessionContext::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    username: Option<String>,
    auth_provider: Option<String>,
    permanent: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn set_auth_provider(&mut self, provider: impl Into<String>) {
        self.auth_provider = Some(provider.into());
    }

    pub fn set_permanent(&mut self, permanent: bool) {
        self.permanent = permanent;
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn auth_provider(&self) -> Option<&str> {
        self.auth_provider.as_deref()
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// Signs the session and adds it to `jar` as an HTTP-only cookie.
    pub fn commit(
        self,
        jar: CookieJar,
        keys: &SessionKeys,
        secure: bool,
    ) -> Result<CookieJar, SessionError> {
        let username = self.username.ok_or(SessionError::MissingUsername)?;
        let auth_provider = self
            .auth_provider
            .ok_or(SessionError::MissingAuthProvider)?;

        let lifetime_days = if self.permanent {
            PERMANENT_SESSION_DAYS
        } else {
            TRANSIENT_SESSION_DAYS
        };
        let claims = SessionClaims {
            username,
            auth_provider,
            exp: (Utc::now() + Duration::days(lifetime_days)).timestamp() as usize,
        };
        let token = create_jwt(&claims, keys)?;

        let mut cookie = Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/");
        if self.permanent {
            cookie = cookie.max_age(time::Duration::days(PERMANENT_SESSION_DAYS));
        }

        Ok(jar.add(cookie.build()))
    }
}

pub fn clear_session_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    let expired = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();
    jar.add(expired)
}
