//! Browser session: the bearer token pair and user id kept in cookies.
//!
//! This is the only module that reads or writes those cookies. Handlers get
//! a [`Session`] value and hand it to the backend client explicitly.

use crate::backend::BackendClient;
use crate::errors::ApiError;
use crate::models::{AuthResponse, LoginCredentials};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const USER_ID_COOKIE: &str = "userId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_id: Option<u64>,
}

impl Session {
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        let access_token = jar
            .get(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())?;

        Some(Self {
            access_token,
            refresh_token: jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()),
            user_id: jar.get(USER_ID_COOKIE).and_then(|c| c.value().parse().ok()),
        })
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            access_token: auth.access,
            refresh_token: Some(auth.refresh),
            user_id: Some(auth.user_id),
        }
    }
}

pub fn is_authenticated(jar: &CookieJar) -> bool {
    Session::from_jar(jar).is_some()
}

pub fn current_user_id(jar: &CookieJar) -> Option<u64> {
    Session::from_jar(jar).and_then(|s| s.user_id)
}

/// Exchanges credentials for tokens and writes them into the jar.
pub async fn login(
    backend: &BackendClient,
    jar: CookieJar,
    credentials: &LoginCredentials,
    secure: bool,
) -> Result<(CookieJar, Session), ApiError> {
    let session: Session = match backend.obtain_token(credentials).await {
        Ok(auth) => auth.into(),
        Err(err) => {
            warn!("login failed for {}: {err}", credentials.username);
            return Err(err);
        }
    };
    info!(user_id = ?session.user_id, "login succeeded");
    let jar = store(jar, &session, secure);
    Ok((jar, session))
}

pub fn logout(jar: CookieJar) -> CookieJar {
    [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, USER_ID_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| jar.remove(Cookie::build(name).path("/")))
}

fn store(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    let mut jar = jar.add(session_cookie(ACCESS_TOKEN_COOKIE, session.access_token.clone(), secure));
    if let Some(refresh) = &session.refresh_token {
        jar = jar.add(session_cookie(REFRESH_TOKEN_COOKIE, refresh.clone(), secure));
    }
    if let Some(user_id) = session.user_id {
        jar = jar.add(session_cookie(USER_ID_COOKIE, user_id.to_string(), secure));
    }
    jar
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
