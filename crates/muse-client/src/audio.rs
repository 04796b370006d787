use muse_content::{
    asset::{AssetKey, AssetUrl, StoreNamespace},
    audio::{AudioPreviewSource, SynthesisRequest},
};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::{asset::AssetStore, client::ApiClient, error::ClientError};

const PREVIEW_PATH: &str = "api/audio/preview";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    asset_key: AssetKey,
}

/// Speech synthesis of audio scripts
#[derive(Clone, Debug)]
pub struct AudioService {
    client: ApiClient,
    assets: AssetStore,
}

impl AudioService {
    pub fn new(client: ApiClient) -> Self {
        let assets = AssetStore::new(client.clone());
        AudioService { client, assets }
    }
}

impl AudioPreviewSource for AudioService {
    type Error = ClientError;

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AssetKey, ClientError> {
        let url = self.client.url(PREVIEW_PATH, [])?;
        let response: PreviewResponse = self
            .client
            .send_json(self.client.request(Method::POST, url).json(request))
            .await?;
        debug!(
            "Synthesized {} with voice {} into {}",
            request.language_code, request.voice, response.asset_key
        );
        Ok(response.asset_key)
    }

    async fn asset_url(
        &self,
        namespace: StoreNamespace,
        key: &AssetKey,
    ) -> Result<AssetUrl, ClientError> {
        self.assets.asset_url(namespace, key).await
    }
}
