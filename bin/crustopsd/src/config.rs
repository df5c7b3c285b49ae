//! Server configuration, loaded from a TOML context file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub otp: OtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Login code lifetime in seconds.
    pub ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            otp: OtpConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".into(),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

impl ServerConfig {
    /// Resolve a context name to a config path. A bare name maps to
    /// `/etc/crustops/<name>.toml`; anything containing `/` or `.` is
    /// treated as a literal path.
    pub fn resolve_path(name: &str) -> PathBuf {
        if name.contains('/') || name.contains('.') {
            PathBuf::from(name)
        } else {
            PathBuf::from(format!("/etc/crustops/{}.toml", name))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse {}: {}", path.display(), e))?;
        Ok(config)
    }
}
