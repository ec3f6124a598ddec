//! CLI Commands

pub mod forms;
pub mod responses;
pub mod session;
pub mod submit;

use anyhow::{bail, Context, Result};
use event_forms::ErrorMap;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// API client
pub struct ApiClient {
    pub base_url: String,
    client: reqwest::Client,
}

/// Write acknowledgement from the API
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// Non-2xx answer from the API, carrying its `{error, fields}` body.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub error: String,
    pub fields: Option<ErrorMap>,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.status)
    }
}

impl std::error::Error for ApiFailure {}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    fields: Option<ErrorMap>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.client.get(self.url(path)).send().await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    /// GET a list, accepting the shapes older servers returned.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let value: Value = self.get(path).await?;
        decode_list(value)
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(self.url(path)).send().await?;
        Ok(Self::checked(resp).await?.bytes().await?.to_vec())
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.client.delete(self.url(path)).send().await?;
        Ok(Self::checked(resp).await?.json().await?)
    }

    async fn checked(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let failure = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => ApiFailure { status, error: body.error, fields: body.fields },
            Err(_) => ApiFailure {
                status,
                error: if text.trim().is_empty() { "Request failed".into() } else { text },
                fields: None,
            },
        };
        Err(failure.into())
    }
}

/// Accept a bare array, `{"forms": [...]}` or `{"items": [...]}`.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    let items = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("forms")
            .or_else(|| map.remove("items"))
            .context("expected a list, or an object with `forms` or `items`")?,
        other => bail!("expected a list, got {}", other),
    };
    Ok(serde_json::from_value(items)?)
}
