#![allow(dead_code)]

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::{Body, to_bytes};
use axum::extract::Query;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::routing::get;
use axum::Router;
use bookworm::config::Config;
use bookworm::db::BookStorage;
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub const MOBY_DICK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<classify xmlns="http://classify.oclc.org">
  <response code="0"/>
  <work author="Herman Melville" editions="1520" holdings="21331" owi="OWI123" title="Moby-Dick">4567</work>
  <recommendations>
    <ddc>
      <mostPopular holdings="9436" nsfa="813.3" sfa="823"/>
    </ddc>
  </recommendations>
</classify>"#;

pub const CALCULUS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<classify xmlns="http://classify.oclc.org">
  <response code="0"/>
  <work author="Michael Spivak" owi="OWI515" title="Calculus">88</work>
  <recommendations>
    <ddc>
      <mostPopular holdings="1200" sfa="515"/>
    </ddc>
  </recommendations>
</classify>"#;

pub const UNCLASSIFIED: &str = r#"<classify><response code="0"/><work author="Anonymous" owi="OWI000" title="Pamphlet"/></classify>"#;

pub const NOT_FOUND: &str = r#"<classify><response code="102"/></classify>"#;

pub const WHALE_SEARCH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<classify xmlns="http://classify.oclc.org">
  <response code="4"/>
  <works>
    <work author="Herman Melville" hyr="2003" owi="OWI123" title="Moby-Dick"/>
    <work author="Philip Hoare" hyr="2008" owi="OWI999" title="Leviathan, or The Whale"/>
  </works>
</classify>"#;

async fn classify_stub(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    if let Some(owi) = params.get("owi") {
        return match owi.as_str() {
            "OWI123" => (StatusCode::OK, MOBY_DICK.to_string()),
            "OWI515" => (StatusCode::OK, CALCULUS.to_string()),
            "OWI000" => (StatusCode::OK, UNCLASSIFIED.to_string()),
            "BROKEN" => (StatusCode::OK, "<classify><work".to_string()),
            "DOWN" => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            _ => (StatusCode::OK, NOT_FOUND.to_string()),
        };
    }
    match params.get("title").map(String::as_str) {
        Some("whale") => (StatusCode::OK, WHALE_SEARCH.to_string()),
        _ => (StatusCode::OK, NOT_FOUND.to_string()),
    }
}

/// Serve a fake classification service on an ephemeral port.
pub async fn spawn_classify_stub() -> Url {
    let app = Router::new().route("/classify2/Classify", get(classify_stub));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub listener");
    let addr = listener.local_addr().expect("stub has no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    Url::parse(&format!("http://{addr}/classify2/Classify")).expect("invalid stub url")
}

pub async fn memory_storage() -> BookStorage {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite url")
        .foreign_keys(true);
    // A single, never-recycled connection keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .expect("failed to open in-memory sqlite");
    let storage = BookStorage::new(pool);
    storage.init_schema().await.expect("failed to init schema");
    storage
}

pub struct TestApp {
    pub app: Router,
    pub storage: BookStorage,
}

pub async fn spawn_app() -> TestApp {
    let classify_url = spawn_classify_stub().await;
    let storage = memory_storage().await;
    let cfg = Config {
        insecure_cookie: true,
        password_iterations: 1_000,
        classify_url,
        ..Config::default()
    };
    let state = bookworm::BookwormState::new(storage.clone(), &cfg).expect("failed to build state");
    TestApp {
        app: bookworm::bookworm_router(state),
        storage,
    }
}

impl TestApp {
    pub fn browser(&self) -> Browser {
        Browser {
            app: self.app.clone(),
            cookies: HashMap::new(),
        }
    }
}

/// Minimal cookie-keeping client driving the router in-process.
pub struct Browser {
    app: Router,
    pub cookies: HashMap<String, String>,
}

impl Browser {
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        form: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let header = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, header);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        let resp = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed");
        self.absorb_cookies(&resp);
        resp
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.request("GET", uri, None).await
    }

    pub async fn register(&mut self, username: &str, password: &str) -> Response<Body> {
        let form = format!("username={username}&password={password}&register=Register");
        self.request("POST", "/login", Some(&form)).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Response<Body> {
        let form = format!("username={username}&password={password}&login=Log+In");
        self.request("POST", "/login", Some(&form)).await
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    fn absorb_cookies(&mut self, resp: &Response<Body>) {
        for value in resp.headers().get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let mut attrs = raw.split(';').map(str::trim);
            let Some((name, val)) = attrs.next().and_then(|kv| kv.split_once('=')) else {
                continue;
            };
            let removed = val.is_empty() || attrs.any(|a| a.eq_ignore_ascii_case("Max-Age=0"));
            if removed {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), val.to_string());
            }
        }
    }
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

pub async fn body_json<T: DeserializeOwned>(resp: Response<Body>) -> T {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not the expected json")
}
