use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

/// HTML form values gathered from the query string and, for
/// `application/x-www-form-urlencoded` bodies, the body. Body values win,
/// and repeated names never fail extraction.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    /// The named value, if present. A repeated name yields its last value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The named value, or `""` when absent.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Whether the named value is present and non-empty.
    pub fn has(&self, key: &str) -> bool {
        !self.value(key).is_empty()
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut fields = HashMap::new();
        if let Some(qs) = req.uri().query() {
            fields.extend(url::form_urlencoded::parse(qs.as_bytes()).into_owned());
        }

        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
        if is_form {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            fields.extend(url::form_urlencoded::parse(&body).into_owned());
        }

        Ok(Self(fields))
    }
}
