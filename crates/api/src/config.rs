use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use vidgen_core::job::{Credential, ProviderKind};
use vidgen_core::timing::{
    ProxySettings, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};
use vidgen_providers::http::DEFAULT_HTTP_TIMEOUT;
use vidgen_providers::{openai, replicate, OpenAiConfig, ReplicateConfig};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Poll cadence and request deadline.
    pub proxy: ProxySettings,
    /// Timeout for a single upstream HTTP call.
    pub provider_http_timeout: Duration,
    pub replicate: ReplicateConfig,
    pub openai: OpenAiConfig,
    /// Server-side keys used when a request does not carry its own.
    pub replicate_api_token: Option<Credential>,
    pub openai_api_key: Option<Credential>,
    /// Directory of the built front end, served for non-API paths.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                     |
    /// |------------------------------|-----------------------------|
    /// | `HOST`                       | `0.0.0.0`                   |
    /// | `PORT`                       | `3001`                      |
    /// | `CORS_ORIGINS`               | `http://localhost:3000`     |
    /// | `REQUEST_TIMEOUT_SECS`       | `300`                       |
    /// | `POLL_INTERVAL_SECS`         | `10`                        |
    /// | `MAX_POLL_ATTEMPTS`          | `30`                        |
    /// | `PROVIDER_HTTP_TIMEOUT_SECS` | `60`                        |
    /// | `REPLICATE_API_URL`          | `https://api.replicate.com` |
    /// | `REPLICATE_MODEL_VERSION`    | `openai/sora-2`             |
    /// | `OPENAI_API_URL`             | `https://api.openai.com`    |
    /// | `REPLICATE_API_TOKEN`        | unset                       |
    /// | `OPENAI_API_KEY`             | unset                       |
    /// | `STATIC_DIR`                 | unset                       |
    ///
    /// Panics on unparseable or out-of-range values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };
        let secret = |key: &str| -> Option<Credential> {
            lookup(key)
                .map(Credential::new)
                .filter(|c| !c.is_empty())
        };

        let host = var("HOST", "0.0.0.0");
        let port: u16 = parse_or(&lookup, "PORT", 3001);

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let proxy = ProxySettings {
            poll_interval: Duration::from_secs(parse_or(
                &lookup,
                "POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL.as_secs(),
            )),
            max_poll_attempts: parse_or(&lookup, "MAX_POLL_ATTEMPTS", DEFAULT_MAX_POLL_ATTEMPTS),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )),
        };
        if let Err(e) = proxy.validate() {
            panic!("Invalid polling configuration: {e}");
        }

        let provider_http_timeout = Duration::from_secs(parse_or(
            &lookup,
            "PROVIDER_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT.as_secs(),
        ));

        let openai_api_key = secret("OPENAI_API_KEY");

        let replicate = ReplicateConfig {
            base_url: var("REPLICATE_API_URL", replicate::DEFAULT_BASE_URL),
            model_version: var("REPLICATE_MODEL_VERSION", replicate::DEFAULT_MODEL_VERSION),
            openai_api_key: openai_api_key.clone(),
            ..Default::default()
        };

        let openai = OpenAiConfig {
            base_url: var("OPENAI_API_URL", openai::DEFAULT_BASE_URL),
            ..Default::default()
        };

        Self {
            host,
            port,
            cors_origins,
            proxy,
            provider_http_timeout,
            replicate,
            openai,
            replicate_api_token: secret("REPLICATE_API_TOKEN"),
            openai_api_key,
            static_dir: lookup("STATIC_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Server-side key for `provider`, if one is configured.
    pub fn fallback_credential(&self, provider: ProviderKind) -> Option<&Credential> {
        match provider {
            ProviderKind::Replicate => self.replicate_api_token.as_ref(),
            ProviderKind::OpenAi => self.openai_api_key.as_ref(),
        }
    }

    /// The key to use for a request: the caller's own if non-blank,
    /// otherwise the server's. Empty when neither exists.
    pub fn resolve_credential(&self, provider: ProviderKind, supplied: Option<&str>) -> Credential {
        supplied
            .map(Credential::new)
            .filter(|c| !c.is_empty())
            .or_else(|| self.fallback_credential(provider).cloned())
            .unwrap_or_else(|| Credential::new(""))
    }
}

/// Parse `key` if set, otherwise return `default`.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number, got '{raw}': {e}")),
    }
}
