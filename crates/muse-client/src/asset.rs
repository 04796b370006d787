use std::path::Path;

use futures::TryStreamExt as _;
use muse_content::asset::{AssetKey, AssetUrl, StoreNamespace};
use reqwest::{Body, Method};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::{
    client::ApiClient,
    error::{ClientError, Result},
};

const ASSET_PATH: &str = "api/asset";

#[inline]
fn hex(bytes: &[u8]) -> String {
    base16ct::lower::encode_string(bytes)
}

/// Result of an upload into the temporary namespace
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInfo {
    pub asset_key: AssetKey,
    pub size: u64,
    /// SHA256 hash, lower case hex
    pub hash: String,
}

#[derive(Clone, Debug)]
pub struct AssetStore {
    client: ApiClient,
}

impl AssetStore {
    pub fn new(client: ApiClient) -> Self {
        AssetStore { client }
    }

    /// Signed, time limited URL of a stored asset
    pub async fn asset_url(&self, namespace: StoreNamespace, key: &AssetKey) -> Result<AssetUrl> {
        let path = format!("{ASSET_PATH}/{}", namespace.as_str());
        let url = self.client.url(&path, key.as_ref().split('/'))?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    pub async fn upload_bytes(&self, name: &str, data: Vec<u8>) -> Result<UploadInfo> {
        let hash = hex(&Sha256::digest(&data));
        let size = data.len() as u64;
        self.upload(name, Body::from(data), size, hash).await
    }

    /// Streams file to the backend, hash is computed locally beforehand
    pub async fn upload_file(&self, path: &Path) -> Result<UploadInfo> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| std::io::Error::other(format!("Invalid file name {path:?}")))?;
        let (size, hash) = file_digest(path).await?;
        let file = fs::File::open(path).await?;
        let body = Body::wrap_stream(ReaderStream::new(file));
        self.upload(name, body, size, hash).await
    }

    async fn upload(&self, name: &str, body: Body, size: u64, hash: String) -> Result<UploadInfo> {
        let path = format!("{ASSET_PATH}/{}", StoreNamespace::Temporary.as_str());
        let url = self.client.url(&path, [name])?;
        debug!("Uploading {name}, {size} bytes");
        let info: UploadInfo = self
            .client
            .send_json(self.client.request(Method::POST, url).body(body))
            .await?;
        if info.hash != hash || info.size != size {
            return Err(ClientError::HashMismatch {
                expected: hash,
                actual: info.hash,
            });
        }
        info!("Uploaded {name} as {}", info.asset_key);
        Ok(info)
    }
}

async fn file_digest(path: &Path) -> Result<(u64, String)> {
    let file = fs::File::open(path).await?;
    let mut stream = ReaderStream::new(file);
    let mut digester = Sha256::new();
    let mut size = 0u64;
    while let Some(chunk) = stream.try_next().await? {
        size += chunk.len() as u64;
        digester.update(&chunk);
    }
    Ok((size, hex(&digester.finalize())))
}
