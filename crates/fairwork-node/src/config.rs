use anyhow::Result;
use fairwork_chain::ChainConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node: NodeSettings,
    pub chain: ChainConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSettings {
    pub name: String,
    /// Seed for the platform authority keypair. Overridable via
    /// FAIRWORK_AUTHORITY_SEED; the default is only fit for local runs.
    pub authority_seed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. "info" or "fairwork=debug,info"
    pub level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node: NodeSettings {
                name: "fairwork-node".to_string(),
                authority_seed: "fairwork-local-authority".to_string(),
            },
            chain: ChainConfig::default(),
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl NodeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(name) = env::var("FAIRWORK_NODE_NAME") {
            if !name.is_empty() {
                self.node.name = name;
            }
        }
        if let Ok(seed) = env::var("FAIRWORK_AUTHORITY_SEED") {
            if !seed.is_empty() {
                self.node.authority_seed = seed;
            }
        }
        if let Ok(host) = env::var("FAIRWORK_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = env::var("FAIRWORK_API_PORT") {
            if let Ok(port) = port.parse() {
                self.api.port = port;
            }
        }
        if let Ok(network) = env::var("FAIRWORK_NETWORK") {
            if !network.is_empty() {
                self.chain.network = network;
            }
        }
        if let Ok(level) = env::var("FAIRWORK_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = NodeConfig::default();
        config.api.port = 9090;
        config.save_to_file(&path).unwrap();

        let loaded = NodeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.port, 9090);
        assert_eq!(loaded.chain.network, config.chain.network);
    }

    #[test]
    fn test_env_override() {
        let mut config = NodeConfig::default();
        env::set_var("FAIRWORK_API_PORT", "7070");
        config.apply_env_overrides();
        env::remove_var("FAIRWORK_API_PORT");

        assert_eq!(config.api.port, 7070);
    }
}
