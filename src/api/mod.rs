//! Thin JSON client for the gym REST backend under `/api`.

pub mod attendance;
pub mod envelope;
pub mod settings;
pub mod staff;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;
use crate::models::Resource;

pub use envelope::Page;

/// Query string pairs appended to a request URL.
pub type Query<'a> = [(&'a str, String)];

#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Resolves `path` (relative to `/api/`) against the base URL.
    pub fn url(&self, path: &str, query: &Query<'_>) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(&format!("api/{}", path.trim_start_matches('/')))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<Value>,
    ) -> Result<String, ClientError> {
        let url = self.url(path, query)?;
        debug!(%method, %url, "request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            warn!(%method, path, error = %err, "request failed");
            ClientError::from(err)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ClientError::from_response(status, &text);
            warn!(%method, path, %status, error = %err, "request rejected");
            return Err(err);
        }
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let text = self.send(method, path, query, body).await?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(serde_json::from_value(envelope::unwrap_single(value))?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json(Method::GET, path, &[], None).await
    }

    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, ClientError> {
        self.send_json(Method::GET, path, query, None).await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::PUT, path, &[], Some(body)).await
    }

    /// Sends a request whose response body is irrelevant.
    pub async fn send_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(), ClientError> {
        self.send(method, path, &[], body.cloned()).await.map(|_| ())
    }

    pub async fn list_raw(&self, path: &str, query: &Query<'_>) -> Result<Value, ClientError> {
        let text = self.send(Method::GET, path, query, None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn list<R: Resource>(&self) -> Result<Page<R>, ClientError> {
        self.list_with::<R>(&[]).await
    }

    pub async fn list_with<R: Resource>(&self, query: &Query<'_>) -> Result<Page<R>, ClientError> {
        let value = self.list_raw(R::PATH, query).await?;
        envelope::normalize_list(value, R::PATH)
    }

    /// Server-side pagination. `page` is zero-based; the backend counts from one.
    pub async fn list_page<R: Resource>(
        &self,
        page: usize,
        limit: usize,
        search: Option<&str>,
    ) -> Result<Page<R>, ClientError> {
        let mut query = vec![("page", (page + 1).to_string()), ("limit", limit.to_string())];
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query.push(("search", term.to_string()));
        }
        self.list_with::<R>(&query).await
    }

    pub async fn get<R: Resource>(&self, id: &str) -> Result<R, ClientError> {
        self.get_json(&format!("{}/{id}", R::PATH)).await
    }

    pub async fn create<R: Resource>(&self, body: &impl Serialize) -> Result<R, ClientError> {
        self.post_json(R::PATH, body).await
    }

    pub async fn update<R: Resource>(&self, id: &str, body: &impl Serialize) -> Result<R, ClientError> {
        self.put_json(&format!("{}/{id}", R::PATH), body).await
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &format!("{}/{id}", R::PATH), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_join() {
        let api = client("http://localhost:5000");
        let url = api.url("classes/c1", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/classes/c1");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let api = client("https://example.com/gym");
        let url = api
            .url("/attendance", &[("page", "2".to_string()), ("search", "jo ann".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/gym/api/attendance?page=2&search=jo+ann"
        );
    }

    #[test]
    fn test_token_roundtrip() {
        let api = client("http://localhost:5000");
        assert!(!api.is_authenticated());
        api.set_token(Some("t".into()));
        assert_eq!(api.token().as_deref(), Some("t"));
        api.set_token(None);
        assert!(!api.is_authenticated());
    }
}
