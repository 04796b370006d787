use muse_content::resource::{Resource, ResourceDraft, ResourceId, ResourceShort};
use muse_types::ResourceKind;
use reqwest::Method;
use tracing::{debug, info};

use crate::{
    client::ApiClient,
    error::Result,
    paging::{ListQuery, Page, PageSource},
};

/// Backend persistence of one resource kind
pub trait ResourcePersistence {
    fn kind(&self) -> ResourceKind;

    async fn get(&self, id: &ResourceId) -> Result<Resource>;

    async fn create(&self, draft: &ResourceDraft) -> Result<Resource>;

    async fn update(&self, id: &ResourceId, draft: &ResourceDraft) -> Result<Resource>;

    async fn delete(&self, id: &ResourceId) -> Result<()>;

    async fn list(&self, query: &ListQuery) -> Result<Page<ResourceShort>>;
}

/// REST persistence under `api/{kind}`
#[derive(Clone, Debug)]
pub struct ResourceService {
    client: ApiClient,
    kind: ResourceKind,
}

impl ResourceService {
    pub fn new(client: ApiClient, kind: ResourceKind) -> Self {
        ResourceService { client, kind }
    }
}

impl ResourcePersistence for ResourceService {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn get(&self, id: &ResourceId) -> Result<Resource> {
        let url = self.client.url(self.kind.api_path(), [id.as_ref()])?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn create(&self, draft: &ResourceDraft) -> Result<Resource> {
        let url = self.client.url(self.kind.api_path(), [])?;
        let created: Resource = self
            .client
            .send_json(self.client.request(Method::POST, url).json(draft))
            .await?;
        info!("Created {} {}", self.kind, created.id);
        Ok(created)
    }

    async fn update(&self, id: &ResourceId, draft: &ResourceDraft) -> Result<Resource> {
        let url = self.client.url(self.kind.api_path(), [id.as_ref()])?;
        let updated: Resource = self
            .client
            .send_json(self.client.request(Method::PUT, url).json(draft))
            .await?;
        info!("Updated {} {}, version {}", self.kind, id, updated.version);
        Ok(updated)
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        let url = self.client.url(self.kind.api_path(), [id.as_ref()])?;
        self.client
            .send(self.client.request(Method::DELETE, url))
            .await?;
        info!("Deleted {} {}", self.kind, id);
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<ResourceShort>> {
        let url = self.client.url(self.kind.api_path(), [])?;
        let page: Page<ResourceShort> = self
            .client
            .send_json(self.client.request(Method::GET, url).query(query))
            .await?;
        debug!("Listed {} {} items", page.items.len(), self.kind);
        Ok(page)
    }
}

impl PageSource for ResourceService {
    type Item = ResourceShort;

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<ResourceShort>> {
        self.list(query).await
    }
}
