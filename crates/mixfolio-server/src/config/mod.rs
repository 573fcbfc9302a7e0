use mixfolio_store::{AssetStore, HttpObjectStore, LocalFsStore, RetryPolicy};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Immutable one year; asset bytes never change under a given key.
pub const ASSET_CACHE_MAX_AGE: Duration = Duration::from_secs(31_536_000);

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub resolve_timeout: Duration,
    pub asset_cache_max_age: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(10),
            asset_cache_max_age: ASSET_CACHE_MAX_AGE,
        }
    }
}

/// Where audio assets live. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StorageConfig {
    Local {
        root: PathBuf,
    },
    Remote {
        base_url: String,
        #[serde(skip)]
        bearer: Option<String>,
    },
}

impl StorageConfig {
    pub fn build_store(&self) -> Result<Arc<dyn AssetStore>, String> {
        match self {
            Self::Local { root } => Ok(Arc::new(LocalFsStore::new(root.clone()))),
            Self::Remote { base_url, bearer } => {
                let store = HttpObjectStore::new(base_url, bearer.clone())
                    .map_err(|e| format!("invalid remote storage config: {e}"))?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub schema_version: &'static str,
    pub bind: SocketAddr,
    pub storage: StorageConfig,
    pub catalog_path: PathBuf,
    pub retry: RetryConfig,
    pub api: ApiConfig,
    pub shutdown_drain: Duration,
    pub log_json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            base_backoff_ms: cfg.base_backoff_ms,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves every setting through `lookup`, applying defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };
        let bind_raw = env
            .string("MIXFOLIO_BIND")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| format!("invalid bind addr {bind_raw}: {e}"))?;

        let storage = if env.bool("MIXFOLIO_REMOTE_STORAGE", false) {
            let base_url = env.string("MIXFOLIO_STORAGE_BASE_URL").ok_or_else(|| {
                "MIXFOLIO_STORAGE_BASE_URL is required when remote storage is enabled".to_string()
            })?;
            StorageConfig::Remote {
                base_url,
                bearer: env.string("MIXFOLIO_STORAGE_BEARER"),
            }
        } else {
            StorageConfig::Local {
                root: PathBuf::from(
                    env.string("MIXFOLIO_STORAGE_ROOT")
                        .unwrap_or_else(|| "public/files".to_string()),
                ),
            }
        };

        Ok(Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            bind,
            storage,
            catalog_path: PathBuf::from(
                env.string("MIXFOLIO_CATALOG_PATH")
                    .unwrap_or_else(|| "content_meta.yaml".to_string()),
            ),
            retry: RetryConfig {
                max_attempts: env.usize("MIXFOLIO_STORE_RETRY_ATTEMPTS", 4),
                base_backoff_ms: env.u64("MIXFOLIO_STORE_RETRY_BASE_MS", 120),
            },
            api: ApiConfig {
                resolve_timeout: env.duration_ms("MIXFOLIO_RESOLVE_TIMEOUT_MS", 10_000),
                ..ApiConfig::default()
            },
            shutdown_drain: env.duration_ms("MIXFOLIO_SHUTDOWN_DRAIN_MS", 2000),
            log_json: env.bool("MIXFOLIO_LOG_JSON", true),
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn bool(&self, name: &str, default: bool) -> bool {
        self.string(name)
            .and_then(|v| match v.as_str() {
                "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
                "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
                _ => None,
            })
            .unwrap_or(default)
    }

    fn u64(&self, name: &str, default: u64) -> u64 {
        self.string(name)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(default)
    }

    fn usize(&self, name: &str, default: usize) -> usize {
        self.string(name)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(default)
    }

    fn duration_ms(&self, name: &str, default_ms: u64) -> Duration {
        Duration::from_millis(self.u64(name, default_ms))
    }
}
