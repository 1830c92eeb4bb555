pub mod client;
pub mod domain;
pub mod flow;
pub mod render;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
    pub const DEFAULT_ML_URL: &str = "http://localhost:5000";

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub api_url: Option<String>,
        pub ml_url: Option<String>,
        pub http_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let http_timeout_secs = match std::env::var("PRICECAST_HTTP_TIMEOUT_SECS") {
                Ok(s) if !s.trim().is_empty() => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("PRICECAST_HTTP_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                _ => None,
            };

            Ok(Self {
                api_url: non_empty_var("PRICECAST_API_URL"),
                ml_url: non_empty_var("PRICECAST_ML_URL"),
                http_timeout_secs,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        /// Base URL of the prediction backend (`/predictions` lives under it).
        pub fn api_url(&self) -> &str {
            self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
        }

        /// Base URL of the model-serving endpoint.
        pub fn ml_url(&self) -> &str {
            self.ml_url.as_deref().unwrap_or(DEFAULT_ML_URL)
        }

        /// No timeout unless configured; a slow backend keeps a flow in its loading state.
        pub fn http_timeout(&self) -> Option<Duration> {
            self.http_timeout_secs.map(Duration::from_secs)
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

}
