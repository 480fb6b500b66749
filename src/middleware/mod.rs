//! Request pipeline, outermost first: store liveness, then authorization.
//! Also hosts the request extractors the handlers share.

pub mod auth;
pub mod form_fields;
pub mod liveness;

pub use auth::{AuthenticatedUser, LOGIN_PATH, verify_user};
pub use form_fields::FormFields;
pub use liveness::verify_database;
