use axum::Router;
use axum::extract::FromRef;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum_extra::extract::cookie::Key;
use time::Duration;
use tracing::warn;

use crate::api::classify_client::ClassifyClient;
use crate::config::Config;
use crate::db::BookStorage;
use crate::error::BookwormError;
use crate::handlers::{books, login};
use crate::middleware::{verify_database, verify_user};
use crate::service::credential_store::CredentialStore;
use crate::session::SessionPolicy;

/// Everything a request may touch, injected once at startup.
#[derive(Clone)]
pub struct BookwormState {
    pub storage: BookStorage,
    pub credentials: CredentialStore,
    pub classify: ClassifyClient,
    pub cookie_key: Key,
    pub session_policy: SessionPolicy,
}

impl BookwormState {
    pub fn new(storage: BookStorage, cfg: &Config) -> Result<Self, BookwormError> {
        let classify = ClassifyClient::from_config(cfg)?;
        Ok(Self::with_classify(storage, classify, cfg))
    }

    /// Same as [`BookwormState::new`] with a caller-supplied lookup client.
    pub fn with_classify(storage: BookStorage, classify: ClassifyClient, cfg: &Config) -> Self {
        let credentials = CredentialStore::new(storage.clone(), cfg.password_iterations);
        Self {
            storage,
            credentials,
            classify,
            cookie_key: cookie_key(cfg.session_secret.as_deref()),
            session_policy: session_policy(cfg),
        }
    }
}

/// Upper bound on the session cookie lifetime, in days.
const MAX_SESSION_DAYS: i64 = 3650;

fn session_policy(cfg: &Config) -> SessionPolicy {
    SessionPolicy {
        secure: !cfg.insecure_cookie,
        max_age: Duration::days(cfg.session_max_age_days.clamp(1, MAX_SESSION_DAYS)),
    }
}

fn cookie_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            warn!(error = %e, "session secret unusable; sessions will not survive a restart");
            Key::generate()
        }
        None => {
            warn!("no session secret configured; sessions will not survive a restart");
            Key::generate()
        }
    }
}

impl FromRef<BookwormState> for Key {
    fn from_ref(state: &BookwormState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<BookwormState> for SessionPolicy {
    fn from_ref(state: &BookwormState) -> Self {
        state.session_policy
    }
}

/// Build the application router. Layers run bottom-up: the store liveness
/// check wraps the authorization gate, which wraps every route.
pub fn bookworm_router(state: BookwormState) -> Router {
    Router::new()
        .route("/", get(books::index))
        .route("/login", get(login::login_page).post(login::login_submit))
        .route("/logout", get(login::logout).post(login::logout))
        .route("/books", get(books::list_books).put(books::add_book))
        .route("/books/{pk}", delete(books::delete_book))
        .route("/search", post(books::search))
        .layer(from_fn_with_state(state.clone(), verify_user))
        .layer(from_fn_with_state(state.clone(), verify_database))
        .with_state(state)
}
