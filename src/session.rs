//! Typed per-client session state carried in private (encrypted and
//! authenticated) cookies. Exactly three keys are recognized: the signed-in
//! user, the catalog filter and the catalog sort column.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

use crate::types::catalog::{CatalogFilter, SortColumn};

pub const USER_KEY: &str = "User";
pub const FILTER_KEY: &str = "Filter";
pub const SORT_BY_KEY: &str = "SortBy";

/// Cookie attributes applied to every session value.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub secure: bool,
    pub max_age: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            secure: true,
            max_age: Duration::days(7),
        }
    }
}

/// Session state for one request. Setters consume and return the session;
/// return it from the handler to emit the changes as `Set-Cookie`.
pub struct Session {
    jar: PrivateCookieJar,
    policy: SessionPolicy,
}

impl Session {
    pub fn new(jar: PrivateCookieJar, policy: SessionPolicy) -> Self {
        Self { jar, policy }
    }

    pub fn user(&self) -> Option<String> {
        self.get(USER_KEY)
    }

    pub fn filter(&self) -> Option<CatalogFilter> {
        self.get(FILTER_KEY).and_then(|v| v.parse().ok())
    }

    pub fn sort_by(&self) -> Option<SortColumn> {
        self.get(SORT_BY_KEY).and_then(|v| v.parse().ok())
    }

    pub fn with_user(self, username: &str) -> Self {
        self.set(USER_KEY, username.to_string())
    }

    pub fn with_filter(self, filter: CatalogFilter) -> Self {
        self.set(FILTER_KEY, filter.as_str().to_string())
    }

    pub fn with_sort_by(self, sort: SortColumn) -> Self {
        self.set(SORT_BY_KEY, sort.as_str().to_string())
    }

    pub fn without_user(self) -> Self {
        self.clear(USER_KEY)
    }

    pub fn without_filter(self) -> Self {
        self.clear(FILTER_KEY)
    }

    pub fn without_sort_by(self) -> Self {
        self.clear(SORT_BY_KEY)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.jar
            .get(key)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty())
    }

    fn set(self, key: &str, value: String) -> Self {
        let cookie = Cookie::build(Cookie::new(key.to_string(), value))
            .path("/")
            .http_only(true)
            .secure(self.policy.secure)
            .same_site(SameSite::Lax)
            .max_age(self.policy.max_age)
            .build();
        Self {
            jar: self.jar.add(cookie),
            policy: self.policy,
        }
    }

    fn clear(self, key: &str) -> Self {
        let cookie = Cookie::build(Cookie::new(key.to_string(), ""))
            .path("/")
            .build();
        Self {
            jar: self.jar.remove(cookie),
            policy: self.policy,
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
    SessionPolicy: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;
        Ok(Self::new(jar, SessionPolicy::from_ref(state)))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fresh() -> Session {
        Session::new(PrivateCookieJar::new(Key::generate()), SessionPolicy::default())
    }

    #[test]
    fn empty_session_has_no_values() {
        let session = fresh();
        assert_eq!(session.user(), None);
        assert_eq!(session.filter(), None);
        assert_eq!(session.sort_by(), None);
    }

    #[test]
    fn set_values_are_readable() {
        let session = fresh()
            .with_user("alice")
            .with_filter(CatalogFilter::Fiction)
            .with_sort_by(SortColumn::Author);
        assert_eq!(session.user().as_deref(), Some("alice"));
        assert_eq!(session.filter(), Some(CatalogFilter::Fiction));
        assert_eq!(session.sort_by(), Some(SortColumn::Author));
    }

    #[test]
    fn clear_then_get_is_absent() {
        let session = fresh()
            .with_user("alice")
            .with_filter(CatalogFilter::Nonfiction)
            .with_sort_by(SortColumn::Title)
            .without_user()
            .without_filter();
        assert_eq!(session.user(), None);
        assert_eq!(session.filter(), None);
        assert_eq!(session.sort_by(), Some(SortColumn::Title));
    }

    #[test]
    fn last_write_wins() {
        let session = fresh()
            .with_filter(CatalogFilter::Fiction)
            .with_filter(CatalogFilter::All);
        assert_eq!(session.filter(), Some(CatalogFilter::All));
    }
}
