use muse_types::LanguageCode;
use reqwest::Method;
use serde::Deserialize;

use crate::{client::ApiClient, error::Result};

const SESSION_PATH: &str = "api/session";

/// Customer context of the signed in operator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub customer_id: String,
    pub customer_name: String,
    /// Languages the customer publishes content in
    #[serde(default)]
    pub languages: Vec<LanguageCode>,
}

pub async fn fetch_session(client: &ApiClient) -> Result<SessionInfo> {
    let url = client.url(SESSION_PATH, [])?;
    client.send_json(client.request(Method::GET, url)).await
}
