use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB: &str = "vitae.db";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("VITAE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            db_path: std::env::var("VITAE_DB").unwrap_or_else(|_| DEFAULT_DB.to_string()),
        }
    }
}
