use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::BookwormError;

/// Environment prefix for every setting, e.g. `BOOKWORM_DATABASE_URL`.
pub const ENV_PREFIX: &str = "BOOKWORM_";

pub const DEFAULT_CLASSIFY_URL: &str = "http://classify.oclc.org/classify2/Classify";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Key material for the private session cookies. At least 64 bytes.
    pub session_secret: Option<String>,
    /// Drop the `Secure` cookie attribute (plain-HTTP development only).
    pub insecure_cookie: bool,
    pub session_max_age_days: i64,
    pub classify_url: Url,
    pub proxy: Option<Url>,
    pub password_iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database_url: "sqlite://bookworm.db".to_string(),
            loglevel: "info".to_string(),
            session_secret: None,
            insecure_cookie: false,
            session_max_age_days: 7,
            classify_url: Url::parse(DEFAULT_CLASSIFY_URL).expect("default classify url is valid"),
            proxy: None,
            password_iterations: 100_000,
        }
    }
}

impl Config {
    /// Defaults overlaid with `BOOKWORM_*` environment variables.
    pub fn load() -> Result<Self, BookwormError> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }
}
