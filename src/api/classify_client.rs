use crate::config::Config;
use crate::error::BookwormError;
use crate::types::classify::{BibliographicRecord, ClassifyResponse};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{info, warn};
use url::Url;

/// Client for the external classification service. One GET per call, no retry.
#[derive(Clone)]
pub struct ClassifyClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ClassifyClient {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build the HTTP client from config (user agent, optional proxy).
    pub fn from_config(cfg: &Config) -> Result<Self, BookwormError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml, text/xml"));
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("bookworm/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        Ok(Self::new(builder.build()?, cfg.classify_url.clone()))
    }

    /// Look up a single work by its external identifier.
    pub async fn find_by_id(&self, external_id: &str) -> Result<BibliographicRecord, BookwormError> {
        let body = self.fetch("owi", external_id).await?;
        let record = ClassifyResponse::parse(&body)?.into_record(external_id)?;
        info!(
            external_id,
            title = %record.title,
            classification = %record.classification,
            "classification lookup resolved"
        );
        Ok(record)
    }

    pub async fn search_by_title(&self, query: &str) -> Result<Vec<BibliographicRecord>, BookwormError> {
        let body = self.fetch("title", query).await?;
        Ok(ClassifyResponse::parse(&body)?.into_search_results())
    }

    fn lookup_url(&self, key: &str, value: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("summary", "true")
            .append_pair(key, value);
        url
    }

    async fn fetch(&self, key: &str, value: &str) -> Result<String, BookwormError> {
        let url = self.lookup_url(key, value);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .inspect_err(|e| warn!(key, value, error = %e, "classification request failed"))?;
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_url_escapes_query() {
        let client = ClassifyClient::new(
            reqwest::Client::new(),
            Url::parse("http://classify.example/classify2/Classify").unwrap(),
        );
        let url = client.lookup_url("title", "war & peace");
        assert_eq!(
            url.as_str(),
            "http://classify.example/classify2/Classify?summary=true&title=war+%26+peace"
        );
    }
}
