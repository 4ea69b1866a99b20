pub mod api;
pub mod domain;
pub mod filters;
pub mod state;

pub mod config {
    use anyhow::Context;

    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_PAGE_SIZE: u32 = 20;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub api_timeout_secs: u64,
        pub default_page_size: u32,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let api_timeout_secs = std::env::var("STOCKBOARD_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS);

            let default_page_size = std::env::var("STOCKBOARD_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE);

            Ok(Self {
                api_base_url: std::env::var("STOCKBOARD_API_BASE_URL").ok(),
                api_timeout_secs,
                default_page_size,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_api_base_url(&self) -> anyhow::Result<&str> {
            self.api_base_url
                .as_deref()
                .context("STOCKBOARD_API_BASE_URL is required")
        }
    }
}
