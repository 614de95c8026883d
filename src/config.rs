use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the dataset files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Load every dataset at startup instead of on first request
    #[serde(default = "default_preload")]
    pub preload_datasets: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_preload() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.preload_datasets);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("DATA_DIR".to_string(), "/srv/data".to_string()),
            ("PRELOAD_DATASETS".to_string(), "false".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert!(!config.preload_datasets);
        assert_eq!(config.port, 8080);
    }
}
