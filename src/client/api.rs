//! HTTP client for the Student Store API.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::api::dto::{DeleteStudentResponse, HealthResponse, StudentRequest, StudentResponse};
use crate::client::error::{ClientError, ClientResult};
use crate::config::settings::ClientConfig;

/// Typed wrapper over the `/api/students` endpoints.
///
/// Cloning is cheap; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct StudentClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StudentClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an http or https URL".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("school-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        tracing::debug!(method = %method, url = %url, "Sending API request");
        self.http.request(method, url.clone())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> ClientResult<T> {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ClientError::from_response(status, &body);
            tracing::debug!(status = %status, error = %error, "API request failed");
            return Err(error);
        }

        response.json::<T>().await.map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// All students, newest first.
    pub async fn list(&self) -> ClientResult<Vec<StudentResponse>> {
        let url = self.endpoint(&["api", "students"])?;
        self.send(self.request(Method::GET, &url), &url).await
    }

    pub async fn get(&self, id: i32) -> ClientResult<StudentResponse> {
        let url = self.endpoint(&["api", "students", &id.to_string()])?;
        self.send(self.request(Method::GET, &url), &url).await
    }

    pub async fn create(&self, student: &StudentRequest) -> ClientResult<StudentResponse> {
        let url = self.endpoint(&["api", "students"])?;
        self.send(self.request(Method::POST, &url).json(student), &url)
            .await
    }

    /// Replaces every field of student `id`.
    pub async fn update(&self, id: i32, student: &StudentRequest) -> ClientResult<StudentResponse> {
        let url = self.endpoint(&["api", "students", &id.to_string()])?;
        self.send(self.request(Method::PUT, &url).json(student), &url)
            .await
    }

    pub async fn delete(&self, id: i32) -> ClientResult<DeleteStudentResponse> {
        let url = self.endpoint(&["api", "students", &id.to_string()])?;
        self.send(self.request(Method::DELETE, &url), &url).await
    }

    /// Server-side substring search over name, registration number, father's
    /// name and primary contact.
    ///
    /// An empty query matches every student.
    pub async fn search(&self, query: &str) -> ClientResult<Vec<StudentResponse>> {
        let url = self.search_url(query)?;
        self.send(self.request(Method::GET, &url), &url).await
    }

    /// `/api/students/search/{query}` when the query survives as a path
    /// segment, otherwise `/api/students/search?q=...`.
    ///
    /// URL parsing drops `.` and `..` segments and an empty segment names a
    /// different route, so those go through the query string.
    fn search_url(&self, query: &str) -> ClientResult<Url> {
        match query {
            "" => self.endpoint(&["api", "students", "search"]),
            "." | ".." => {
                let mut url = self.endpoint(&["api", "students", "search"])?;
                url.query_pairs_mut().append_pair("q", query);
                Ok(url)
            }
            _ => self.endpoint(&["api", "students", "search", query]),
        }
    }

    /// Searches when `query` has content, otherwise lists everything.
    pub async fn search_or_list(&self, query: &str) -> ClientResult<Vec<StudentResponse>> {
        match query.trim() {
            "" => self.list().await,
            trimmed => self.search(trimmed).await,
        }
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let url = self.endpoint(&["api", "health"])?;
        self.send(self.request(Method::GET, &url), &url).await
    }
}
