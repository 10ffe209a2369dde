//! HTTP transport for the LapakGaming API.

use std::fmt;
use std::sync::Arc;

use lapakgaming_core::{LapakConfig, LapakError, Operation, Params};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::response::interpret;

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Parameters are sent as a query string.
    Get,
    /// Parameters are sent as a JSON body.
    Post,
    /// Parameters are sent as a JSON body.
    Put,
}

impl Method {
    /// Get the method name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends authenticated requests and classifies their responses.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<LapakConfig>,
}

impl HttpTransport {
    /// Create a transport for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: Arc<LapakConfig>) -> Result<Self, LapakError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| LapakError::config("api_key (not a valid header value)"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LapakError::generic(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The configuration this transport was built from.
    #[must_use]
    pub fn config(&self) -> &LapakConfig {
        &self.config
    }

    /// Send one request and classify the response.
    ///
    /// `product_code` is attached to product-not-found errors.
    ///
    /// # Errors
    ///
    /// Transport failures become [`LapakError::Generic`]. Response failures
    /// are classified by [`interpret`].
    pub async fn send(
        &self,
        operation: Operation,
        method: Method,
        params: &Params,
        product_code: Option<&str>,
    ) -> Result<Value, LapakError> {
        let url = self.config.url(operation);
        tracing::debug!(%operation, %method, url = %url, "Sending LapakGaming request");

        let request = match method {
            Method::Get => self.client.get(&url).query(&query_pairs(params)),
            Method::Post => self.client.post(&url).json(params),
            Method::Put => self.client.put(&url).json(params),
        };

        let response = request.send().await.map_err(request_failed)?;
        let status = response.status();
        let body = response.text().await.map_err(request_failed)?;

        tracing::debug!(%operation, status = status.as_u16(), "LapakGaming response received");
        interpret(status, &body, product_code)
    }
}

fn request_failed(error: reqwest::Error) -> LapakError {
    LapakError::generic(format!("API request failed: {error}"))
}

/// Flatten parameters into query pairs. Strings are sent unquoted.
fn query_pairs(params: &Params) -> Vec<(&str, String)> {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), value)
        })
        .collect()
}
