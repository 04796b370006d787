use std::sync::{Arc, RwLock};

use muse_types::config::BackendConfig;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, Result};

/// Error body returned by the backend
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: Option<u16>,
    message: Option<String>,
}

/// Shared HTTP access to the backend.
///
/// Cheap to clone, all clones share the bearer token so signing out in one place
/// affects every service built from the same client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_url(),
            token: Arc::new(RwLock::new(config.api_token().map(|t| t.to_string()))),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_token(&self, token: impl Into<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token.into()),
            Err(e) => warn!("Token lock poisoned: {e}"),
        }
    }

    pub fn clear_token(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Joins API path (e.g. `api/exhibit`) to base URL and appends escaped segments
    pub fn url<'a>(&self, path: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            parts.pop_if_empty();
            parts.extend(segments);
        }
        Ok(url)
    }

    /// Request builder with current bearer token, read at the time of the call
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match self.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        check_status(response).await
    }

    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!("Cannot decode response: {e}");
            ClientError::Decode(e)
        })
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = api_error(status, &body);
    warn!("Request failed: {error}");
    Err(error)
}

pub(crate) fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            status_code,
            message,
        }) => ClientError::Api {
            status: status_code.unwrap_or(status.as_u16()),
            message: message.unwrap_or_else(|| status.to_string()),
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = BackendConfig::new("http://localhost:3000/muse".parse().unwrap(), None);
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_segments() {
        let client = client();
        let url = client.url("api/exhibit", ["ex 1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/muse/api/exhibit/ex%201");
        let url = client
            .url("api/asset/temporary", "audio/a.mp3".split('/'))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/muse/api/asset/temporary/audio/a.mp3"
        );
        let url = client.url("api/institution", []).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/muse/api/institution");
    }

    #[test]
    fn test_token_shared_between_clones() {
        let client = client();
        let other = client.clone();
        assert!(!other.has_token());
        client.set_token("secret");
        assert!(other.has_token());
        other.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn test_api_error_mapping() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode": 409, "message": "errors.resource.conflict"}"#,
        );
        assert!(matches!(
            err,
            ClientError::Api { status: 409, ref message } if message == "errors.resource.conflict"
        ));
        assert!(!err.is_retryable());

        let err = api_error(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(
            err,
            ClientError::Api { status: 502, ref message } if message == "Bad Gateway"
        ));
        assert!(err.is_retryable());
    }
}
