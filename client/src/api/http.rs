//! HTTP transport shared by every backend operation
//!
//! Maps responses onto a uniform contract: 204 is an empty success, any other
//! 2xx body is deserialized into the expected type, and non-2xx statuses
//! become a [`ClientError::Api`] carrying the backend's `detail` message.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult, GENERIC_ERROR_MESSAGE};

/// Inventory backend client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Method, headers, query and body of a single call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// POST with a JSON body
    pub fn post<B: Serialize>(body: &B) -> ClientResult<Self> {
        Self::new(Method::POST).json(body)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl ApiClient {
    /// Create a new ApiClient for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a new ApiClient with a request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a call and decode the response body into `T`
    ///
    /// A 204 response decodes as JSON `null`, so `T = ()` reads it as unit.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let body = self.send(path, options).await?;
        serde_json::from_value(body.unwrap_or(Value::Null)).map_err(|e| {
            tracing::warn!(path, error = %e, "Response body did not match the expected shape");
            ClientError::Decode(e.to_string())
        })
    }

    /// Issue a call and return the raw JSON body, `None` for 204
    pub async fn send(&self, path: &str, options: RequestOptions) -> ClientResult<Option<Value>> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        tracing::debug!(method = %options.method, path, "Sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %options.method, path, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = if status == StatusCode::NO_CONTENT {
            None
        } else {
            // An undecodable body is treated as null
            match response.bytes().await {
                Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
                Err(_) => None,
            }
        };

        if !status.is_success() {
            let message = error_message(status, body.as_ref());
            tracing::warn!(
                method = %options.method,
                path,
                status = status.as_u16(),
                %message,
                "Backend returned an error"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        Ok(Some(body.unwrap_or(Value::Null)))
    }
}

/// Message for a failed response
///
/// `detail` as a string is used verbatim. As an array, its string entries
/// (and the `msg` of object entries) are joined with ", ". Anything else
/// falls back to the status reason, then to a generic message.
pub fn error_message(status: StatusCode, body: Option<&Value>) -> String {
    if let Some(detail) = body.and_then(|b| b.get("detail")) {
        match detail {
            Value::String(message) => return message.clone(),
            Value::Array(entries) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(message) => Some(message.as_str()),
                        Value::Object(fields) => fields.get("msg").and_then(Value::as_str),
                        _ => None,
                    })
                    .collect();
                if !messages.is_empty() {
                    return messages.join(", ");
                }
            }
            _ => {}
        }
    }

    status
        .canonical_reason()
        .filter(|reason| !reason.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
