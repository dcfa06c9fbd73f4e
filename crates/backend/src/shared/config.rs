use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Body size limit for drawing uploads and CSV imports
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid server address {}: {}", addr, e))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// In-process store, data is lost on restart
    Memory,
    /// Hosted PostgREST database plus object storage
    Rest,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_component_table")]
    pub component_table: String,
    #[serde(default = "default_reading_table")]
    pub reading_table: String,
    #[serde(default = "default_attachment_bucket")]
    pub attachment_bucket: String,
    /// Per-request timeout; requests wait indefinitely when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl StoreConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.kind == StoreKind::Rest {
            if self.url.trim().is_empty() {
                anyhow::bail!("store.url is required for the rest store");
            }
            if self.api_key.trim().is_empty() {
                anyhow::bail!("store.api_key is required for the rest store");
            }
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_mb() -> usize {
    50
}

fn default_component_table() -> String {
    "Component Table".into()
}

fn default_reading_table() -> String {
    "Readings".into()
}

fn default_attachment_bucket() -> String {
    "pdfs".into()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 3000
max_upload_mb = 50

[store]
kind = "memory"
component_table = "Component Table"
reading_table = "Readings"
attachment_bucket = "pdfs"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    config.store.validate()?;
    Ok(config)
}
