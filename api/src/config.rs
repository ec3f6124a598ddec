//! Server configuration

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const BIND_ENV: &str = "EVENTFORMS_BIND";

/// API server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,
    /// Allow cross-origin requests from any origin (the public form is served elsewhere)
    pub permissive_cors: bool,
    /// Largest accepted request body, in bytes
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".into(),
            permissive_cors: true,
            body_limit_bytes: 256 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load from file
    pub fn load(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(addr) = std::env::var(BIND_ENV) {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
        self
    }
}
