use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub blog: BlogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogConfig {
    /// Maximum content length, counted in characters.
    #[serde(default = "default_max_content_len")]
    pub max_content_len: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self { max_content_len: default_max_content_len() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(anyhow!("unknown storage backend `{other}` (expected memory|file)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum number of stored blogs; unlimited when absent.
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            capacity: None,
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_body_limit() -> usize { 1024 * 1024 }
fn default_max_content_len() -> usize { 10_000 }
fn default_storage_path() -> String { "data/blogs.json".into() }
fn default_io_timeout_ms() -> u64 { 5_000 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) and validate it.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_or_env(&config_path(), |key| std::env::var(key).ok())
    }

    /// Only a missing file falls back to defaults plus env overrides; an
    /// unreadable or malformed file is an error.
    pub fn load_or_env<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).map_err(|e| anyhow!("invalid config file {path}: {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env_lookup(lookup)?,
            Err(e) => return Err(anyhow!("cannot read config file {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults with overrides from `SERVER_HOST`, `SERVER_PORT`,
    /// `BLOG_MAX_CONTENT_LEN`, `BLOG_STORAGE_BACKEND`, `BLOG_STORAGE_PATH`,
    /// `BLOG_STORAGE_CAPACITY` and `LOG_FORMAT`.
    pub fn from_env_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            cfg.server.port = port.parse().map_err(|e| anyhow!("SERVER_PORT: {e}"))?;
        }
        if let Some(len) = lookup("BLOG_MAX_CONTENT_LEN") {
            cfg.blog.max_content_len = len.parse().map_err(|e| anyhow!("BLOG_MAX_CONTENT_LEN: {e}"))?;
        }
        if let Some(backend) = lookup("BLOG_STORAGE_BACKEND") {
            cfg.storage.backend = backend.parse()?;
        }
        if let Some(path) = lookup("BLOG_STORAGE_PATH") {
            cfg.storage.path = path;
        }
        if let Some(cap) = lookup("BLOG_STORAGE_CAPACITY") {
            cfg.storage.capacity = Some(cap.parse().map_err(|e| anyhow!("BLOG_STORAGE_CAPACITY: {e}"))?);
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            cfg.log.format = match format.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Compact,
            };
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.blog.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        // 0 线程视为未配置，交给 tokio 默认值
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        if self.body_limit_bytes == 0 {
            return Err(anyhow!("server.body_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

impl BlogConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_content_len == 0 {
            return Err(anyhow!("blog.max_content_len must be > 0"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::File && self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is required for the file backend"));
        }
        if self.capacity == Some(0) {
            return Err(anyhow!("storage.capacity must be > 0 when set"));
        }
        if self.io_timeout_ms == 0 {
            return Err(anyhow!("storage.io_timeout_ms must be > 0"));
        }
        Ok(())
    }

    pub fn io_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.io_timeout_ms)
    }
}
