use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::warn;

use crate::router::BookwormState;
use crate::session::Session;

/// The only path reachable without a signed-in session.
pub const LOGIN_PATH: &str = "/login";

/// Require a session user that still resolves to a stored credential.
/// Anything else is sent to the login page with a temporary redirect.
pub async fn verify_user(
    State(state): State<BookwormState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == LOGIN_PATH {
        return next.run(request).await;
    }

    if let Some(username) = session.user() {
        match state.credentials.exists(&username).await {
            Ok(true) => {
                request
                    .extensions_mut()
                    .insert(AuthenticatedUser(username));
                return next.run(request).await;
            }
            Ok(false) => warn!(username = %username, "session user no longer exists"),
            Err(e) => return e.into_response(),
        }
    }
    Redirect::temporary(LOGIN_PATH).into_response()
}

/// Username placed on the request by [`verify_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| Redirect::temporary(LOGIN_PATH).into_response())
    }
}
