use serde::Deserialize;

/// Where the catalog artifacts are loaded from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// JSON files in a local directory
    #[default]
    File,
    /// JSON files served under a base URL
    Http,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artifact loading strategy
    #[serde(default)]
    pub data_source: DataSourceKind,

    /// Directory holding the artifacts when `data_source` is `file`
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Base URL of the artifacts when `data_source` is `http`
    #[serde(default)]
    pub data_url: Option<String>,

    /// Per-request timeout for the HTTP source
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_source: DataSourceKind::default(),
            data_dir: default_data_dir(),
            data_url: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> anyhow::Result<Self> {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.data_source, DataSourceKind::File);
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.data_url, None);
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_http_source() {
        let config = Config::from_vars(vars(&[
            ("DATA_SOURCE", "http"),
            ("DATA_URL", "https://cdn.example.com/bookflix"),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.data_source, DataSourceKind::Http);
        assert_eq!(config.data_url.as_deref(), Some("https://cdn.example.com/bookflix"));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_port() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_unknown_source_kind() {
        assert!(Config::from_vars(vars(&[("DATA_SOURCE", "s3")])).is_err());
    }
}
