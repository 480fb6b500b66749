use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::info;

use crate::middleware::FormFields;
use crate::router::BookwormState;
use crate::session::Session;
use crate::{BookwormError, views};

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(views::login_page(None))
}

/// POST /login with either a `register` or a `login` intent.
/// Credential failures re-render the form with a message; the session stays anonymous.
pub async fn login_submit(
    State(state): State<BookwormState>,
    session: Session,
    form: FormFields,
) -> Result<Response, BookwormError> {
    let username = form.value("username");
    let password = form.value("password");

    let outcome = if form.has("register") {
        state.credentials.register(username, password).await
    } else if form.has("login") {
        state.credentials.authenticate(username, password).await
    } else {
        return Ok(Html(views::login_page(None)).into_response());
    };

    match outcome {
        Ok(user) => {
            info!(username = %user.username, "user signed in");
            // Start from a clean view; leftovers may belong to a previous user.
            let session = session
                .without_filter()
                .without_sort_by()
                .with_user(&user.username);
            Ok((session, Redirect::to("/")).into_response())
        }
        Err(e) => match e.login_message() {
            Some(message) => Ok(Html(views::login_page(Some(&message))).into_response()),
            None => Err(e),
        },
    }
}

/// GET|POST /logout
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Some(username) = session.user() {
        info!(username = %username, "user signed out");
    }
    (
        session.without_user().without_filter(),
        Redirect::to("/login"),
    )
}
