use crate::error::ApiError;
use railreport_config::Credentials;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;

/// Status and body of an HTTP exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves bytes to and from the TestRail server.
///
/// Only connection-level failures are errors here; HTTP error statuses come
/// back as a [`RawResponse`] for the client to judge.
pub trait Transport {
    fn get(&self, url: &str) -> Result<RawResponse, ApiError>;

    fn post(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError>;
}

/// Blocking `reqwest` transport with HTTP basic auth.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder =
            Client::builder().user_agent(concat!("railreport/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Transport {
            method: "BUILD",
            url: String::new(),
            source: Box::new(e),
        })?;
        Ok(Self {
            client,
            credentials,
        })
    }

    pub fn user(&self) -> &str {
        self.credentials.user()
    }

    fn finish(
        &self,
        method: &'static str,
        url: &str,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<RawResponse, ApiError> {
        let transport_err = |e: reqwest::Error| ApiError::Transport {
            method,
            url: url.to_string(),
            source: Box::new(e),
        };

        let resp = req
            .basic_auth(self.credentials.user(), Some(self.credentials.key()))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(transport_err)?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(transport_err)?;
        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
        self.finish("GET", url, self.client.get(url))
    }

    fn post(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError> {
        self.finish("POST", url, self.client.post(url).json(body))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
        (**self).get(url)
    }

    fn post(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError> {
        (**self).post(url, body)
    }
}
