//! HTTP wrapper shared by every endpoint.
//!
//! Attaches the stored bearer token to each request and turns a 401 into a
//! forced logout: the session keys are removed from the store before
//! [`ClientError::Unauthorized`] reaches the caller.

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::ApiErrorBody;
use crate::storage::LocalStore;

pub struct ApiClient {
    http: Client,
    base: String,
    store: Arc<LocalStore>,
}

impl ApiClient {
    pub fn new(config: &Config, store: Arc<LocalStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base: config.api_base(),
            store,
        })
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// `{api_url}/api`
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.store.token()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    fn send(&self, request: RequestBuilder, method: &str, path: &str) -> Result<Response> {
        tracing::debug!(method, path, "api request");
        let response = self.authorize(request)?.send()?;
        self.check(response, method, path)
    }

    fn check(&self, response: Response, method: &str, path: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let parsed = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.message());

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(method, path, "unauthorized, clearing session");
            self.store.clear_session()?;
            return Err(ClientError::Unauthorized { message: parsed });
        }

        let message = parsed
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        tracing::warn!(method, path, status = status.as_u16(), %message, "api request failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    // ========================================================================
    // VERBS
    // ========================================================================

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.http.get(self.url(path)), "GET", path)?;
        Self::decode(response)
    }

    pub fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(self.http.post(self.url(path)).json(body), "POST", path)?;
        Self::decode(response)
    }

    /// POST with a JSON body, ignoring whatever comes back.
    pub fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.http.post(self.url(path)).json(body), "POST", path)?;
        Ok(())
    }

    /// Bodyless POST used by the state-transition endpoints.
    pub fn post_empty(&self, path: &str) -> Result<()> {
        self.send(self.http.post(self.url(path)), "POST", path)?;
        Ok(())
    }

    pub fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.http.put(self.url(path)).json(body), "PUT", path)?;
        Ok(())
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        self.send(self.http.delete(self.url(path)), "DELETE", path)?;
        Ok(())
    }

    pub fn post_multipart(&self, path: &str, form: multipart::Form) -> Result<()> {
        self.send(self.http.post(self.url(path)).multipart(form), "POST", path)?;
        Ok(())
    }
}

/// Append a query string when it is not empty.
pub(crate) fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/expenses", ""), "/expenses");
        assert_eq!(with_query("/expenses", "page=1"), "/expenses?page=1");
    }

    #[test]
    fn test_base_url_includes_api_prefix() {
        let store = Arc::new(LocalStore::open_in_memory().unwrap());
        let config = Config::default().with_api_url("http://127.0.0.1:9/");
        let client = ApiClient::new(&config, store).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
    }
}
