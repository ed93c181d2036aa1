//! Session cookie extractor
//!
//! Generic over any state `S` where `Arc<dyn SessionStore>: FromRef<S>`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderName, HeaderValue,
    },
    response::AppendHeaders,
};
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::error::StudioError;
use crate::repository::SessionStore;

pub const SESSION_COOKIE: &str = "cinema_session";

/// The caller's session, loaded from the `cinema_session` cookie
///
/// A missing, malformed, unknown or expired token yields a fresh session that
/// is only persisted once a handler commits it.
#[derive(Debug)]
pub struct CurrentSession {
    pub session: Session,
    pub is_new: bool,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    Arc<dyn SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StudioError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<dyn SessionStore>::from_ref(state);

        if let Some(id) = session_token(parts) {
            if let Some(session) = store.load(id).await? {
                return Ok(Self {
                    session,
                    is_new: false,
                });
            }
        }

        Ok(Self {
            session: Session::new(),
            is_new: true,
        })
    }
}

impl CurrentSession {
    /// Persist the session, returning the cookie to set when it was just created
    pub async fn commit(
        self,
        store: &dyn SessionStore,
    ) -> Result<Option<HeaderValue>, StudioError> {
        let id = self.session.id;
        store.save(self.session).await?;

        if !self.is_new {
            return Ok(None);
        }

        tracing::debug!(session_id = %id, "Created session");
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        HeaderValue::from_str(&cookie)
            .map(Some)
            .map_err(|e| cinema_common::Error::Internal(format!("Invalid session cookie: {}", e)).into())
    }
}

/// Attach an optional `Set-Cookie` header to a response
pub fn with_cookie<T>(
    cookie: Option<HeaderValue>,
    body: T,
) -> (AppendHeaders<Option<(HeaderName, HeaderValue)>>, T) {
    (AppendHeaders(cookie.map(|value| (SET_COOKIE, value))), body)
}

fn session_token(parts: &Parts) -> Option<Uuid> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
