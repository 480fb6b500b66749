use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::router::BookwormState;

/// Outermost gate: every request first proves the book store answers.
/// No route logic, including the authorization check, runs otherwise.
pub async fn verify_database(
    State(state): State<BookwormState>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(e) = state.storage.ping().await {
        warn!(path = %request.uri().path(), error = %e, "book store unreachable");
        return e.into_response();
    }
    next.run(request).await
}
