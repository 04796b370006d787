use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::UiLocale;

#[derive(Debug, Clone, Parser)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "MUSE_API_URL",
        default_value = "http://localhost:3000/",
        help = "Base URL of muse.cloud backend API"
    )]
    api_url: Url,

    #[arg(
        long,
        env = "MUSE_API_TOKEN",
        hide_env_values = true,
        help = "Bearer token used to authorize API calls"
    )]
    api_token: Option<String>,

    #[arg(
        long,
        env = "MUSE_UI_LOCALE",
        value_enum,
        default_value_t = UiLocale::En,
        help = "Language of console messages"
    )]
    locale: UiLocale,

    #[arg(
        long,
        env = "MUSE_PAGE_SIZE",
        default_value_t = 20,
        value_parser = clap::value_parser!(u32).range(1..=1000),
        help = "Default page size for listings"
    )]
    page_size: u32,

    #[arg(
        long,
        env = "MUSE_HTTP_TIMEOUT",
        default_value = "30s",
        help = "HTTP request timeout in human friendly format (e.g. 10s, 1m)",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,
}

impl BackendConfig {
    pub fn new(api_url: Url, api_token: Option<String>) -> Self {
        BackendConfig {
            api_url,
            api_token,
            locale: UiLocale::default(),
            page_size: 20,
            timeout: Duration::from_secs(30),
        }
    }

    /// Base URL, always ending with `/` so relative API paths can be joined
    pub fn api_url(&self) -> Url {
        let mut url = self.api_url.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn locale(&self) -> UiLocale {
        self.locale
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_locale(mut self, locale: UiLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        backend: BackendConfig,
    }

    #[test]
    fn test_parse_args() {
        let args = TestArgs::try_parse_from([
            "test",
            "--api-url",
            "https://api.muse.cloud/v1",
            "--locale",
            "pl",
            "--timeout",
            "1m",
        ])
        .unwrap();
        let config = args.backend;
        assert_eq!(config.api_url().as_str(), "https://api.muse.cloud/v1/");
        assert_eq!(config.locale(), UiLocale::Pl);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_page_size_range() {
        let res = TestArgs::try_parse_from(["test", "--page-size", "0"]);
        assert!(res.is_err());
    }
}
