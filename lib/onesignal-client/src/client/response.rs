use indexmap::IndexMap;
use serde_json::Value;

use super::Error;

/// A normalized API response: status, headers and a decoded body.
///
/// Non-2xx statuses are not errors; callers inspect [`status`](Self::status)
/// (or [`is_success`](Self::is_success)) themselves. Only transport failures
/// and undecodable JSON bodies surface as [`Error`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    headers: IndexMap<String, String>,
    body: ResponseBody,
}

/// The decoded body of an [`ApiResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body was returned.
    Empty,
    /// The body was declared and decoded as JSON.
    Json(Value),
    /// The body was returned verbatim (non-JSON content type).
    Text(String),
}

impl ApiResponse {
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self, Error> {
        let status = response.status().as_u16();
        let is_json = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let text = response.text().await?;
        let body = if text.is_empty() {
            ResponseBody::Empty
        } else if is_json {
            let value = serde_json::from_str(&text).map_err(|error| Error::Decode {
                error,
                body: text.clone(),
            })?;
            ResponseBody::Json(value)
        } else {
            ResponseBody::Text(text)
        };

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The response headers, in arrival order. Repeated header names keep
    /// the last value.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The decoded body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// The body as JSON, when it was decoded as such.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Empty | ResponseBody::Text(_) => None,
        }
    }
}
