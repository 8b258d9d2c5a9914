use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// UpstreamConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpstreamConfig {
    /// Full chat completion URL. Takes precedence over `azure_endpoint`.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Resource base URL, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub azure_endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Deployment name, also sent as the request `model`.
    #[serde(default = "default_deployment")]
    pub deployment: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Log request and response payloads.
    #[serde(default = "default_debug")]
    pub debug: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            azure_endpoint: None,
            api_key: None,
            deployment: default_deployment(),
            api_version: default_api_version(),
            debug: default_debug(),
        }
    }
}

fn default_deployment() -> String {
    "gpt-4o".to_string()
}

fn default_api_version() -> String {
    "2024-05-01-preview".to_string()
}

fn default_debug() -> bool {
    true
}

impl UpstreamConfig {
    /// Apply overrides from process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values are treated as unset.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = var("AZ_URL") {
            self.endpoint_url = Some(url);
        }
        if let Some(endpoint) = var("AZURE_ENDPOINT") {
            self.azure_endpoint = Some(endpoint);
        }
        if let Some(key) = var("AZURE_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(deployment) = var("AZURE_DEPLOYMENT").or_else(|| var("OPENAI_API_MODEL")) {
            self.deployment = deployment;
        }
        if let Some(version) = var("AZURE_API_VERSION") {
            self.api_version = version;
        }
        if var("OPENAI_API_DISABLE_DEBUG").as_deref() == Some("true") {
            self.debug = false;
        }
    }

    /// Validate and settle the values the relay runs with.
    pub fn resolve(&self) -> Result<RelayConfig, ConfigError> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint = match (&self.endpoint_url, &self.azure_endpoint) {
            (Some(url), _) if !url.is_empty() => url.clone(),
            (_, Some(base)) if !base.is_empty() => {
                deployment_url(base, &self.deployment, &self.api_version)?
            }
            _ => return Err(ConfigError::MissingEndpoint),
        };

        Ok(RelayConfig {
            endpoint,
            api_key,
            model: self.deployment.clone(),
            debug: self.debug,
        })
    }
}

/// Build `{base}/openai/deployments/{deployment}/chat/completions?api-version={version}`.
fn deployment_url(base: &str, deployment: &str, api_version: &str) -> Result<String, ConfigError> {
    let mut url =
        Url::parse(base).map_err(|e| ConfigError::InvalidEndpoint(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ConfigError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(["openai", "deployments", deployment, "chat", "completions"]);
    url.query_pairs_mut().append_pair("api-version", api_version);
    Ok(url.to_string())
}

// ============================================================================
// RelayConfig
// ============================================================================

/// Upstream settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub debug: bool,
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("missing AZURE_API_KEY (upstream.api_key)")]
    MissingApiKey,

    #[error("missing AZ_URL or AZURE_ENDPOINT (upstream.endpoint_url / upstream.azure_endpoint)")]
    MissingEndpoint,

    #[error("invalid upstream endpoint: {0}")]
    InvalidEndpoint(String),
}

// ============================================================================
// Tests
// ============================================================================
