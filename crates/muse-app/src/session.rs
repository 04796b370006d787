use muse_client::{
    ApiClient, ListQuery, ResourceService,
    asset::AssetStore,
    audio::AudioService,
    session::{SessionInfo, fetch_session},
};
use muse_types::{LanguageCode, ResourceKind, UiLocale, config::BackendConfig};
use tracing::{debug, info};

use crate::{error::AppError, error::Result, messages};

/// Application wide context of a signed in operator.
///
/// Built once and passed explicitly to whatever needs backend access or user messages.
#[derive(Debug, Clone)]
pub struct AppSession {
    client: ApiClient,
    locale: UiLocale,
    page_size: u32,
    info: Option<SessionInfo>,
}

impl AppSession {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(AppSession {
            client,
            locale: config.locale(),
            page_size: config.page_size(),
            info: None,
        })
    }

    /// Creates session and loads customer context, needs a token in config
    pub async fn start(config: &BackendConfig) -> Result<Self> {
        let mut session = Self::new(config)?;
        if !session.client.has_token() {
            return Err(AppError::NotSignedIn);
        }
        session.refresh().await?;
        Ok(session)
    }

    pub async fn sign_in(&mut self, token: impl Into<String>) -> Result<&SessionInfo> {
        self.client.set_token(token);
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<&SessionInfo> {
        let info = fetch_session(&self.client).await?;
        info!(
            "Session for customer {} ({})",
            info.customer_name, info.customer_id
        );
        Ok(self.info.insert(info))
    }

    pub fn sign_out(&mut self) {
        debug!("Signing out");
        self.client.clear_token();
        self.info = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.info.is_some() && self.client.has_token()
    }

    pub fn customer(&self) -> Result<&SessionInfo> {
        self.info.as_ref().ok_or(AppError::NotSignedIn)
    }

    /// Content languages offered to the operator
    pub fn languages(&self) -> Vec<LanguageCode> {
        match &self.info {
            Some(info) if !info.languages.is_empty() => info.languages.clone(),
            _ => LanguageCode::ALL.to_vec(),
        }
    }

    pub fn locale(&self) -> UiLocale {
        self.locale
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn resources(&self, kind: ResourceKind) -> ResourceService {
        ResourceService::new(self.client.clone(), kind)
    }

    pub fn audio(&self) -> AudioService {
        AudioService::new(self.client.clone())
    }

    pub fn assets(&self) -> AssetStore {
        AssetStore::new(self.client.clone())
    }

    pub fn list_query(&self) -> ListQuery {
        ListQuery::with_page_size(self.page_size)
    }

    pub fn message(&self, error: &AppError) -> String {
        messages::localize(self.locale, error)
    }

    pub fn text(&self, key: &str) -> &'static str {
        messages::text(self.locale, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_requires_token() {
        let config = BackendConfig::new("http://localhost:1/".parse().unwrap(), None);
        let result = AppSession::start(&config).await;
        assert!(matches!(result, Err(AppError::NotSignedIn)));
    }

    #[test]
    fn test_defaults_before_session() {
        let config = BackendConfig::new("http://localhost:1/".parse().unwrap(), Some("t".into()))
            .with_locale(UiLocale::Pl)
            .with_page_size(5);
        let session = AppSession::new(&config).unwrap();
        assert!(!session.is_signed_in());
        assert_eq!(session.languages().len(), LanguageCode::ALL.len());
        assert_eq!(session.list_query().page_size, Some(5));
        assert_eq!(session.text("errors.session.missing"), "Zaloguj się");
        assert!(matches!(session.customer(), Err(AppError::NotSignedIn)));
    }
}
