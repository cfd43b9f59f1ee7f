use serde::{Deserialize, Serialize};

/// Service configuration loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub tables: Option<TablesConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub artifact_path: String,
    /// Overrides the threshold stored in the artifact when set.
    pub threshold: Option<f64>,
}

/// Optional YAML files replacing the built-in keyword tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesConfig {
    pub rules_path: Option<String>,
    pub risk_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                artifact_path: "/var/lib/phishlens/model.json".to_string(),
                threshold: None,
            },
            tables: None,
            logging: Some(LoggingConfig {
                level: "info".to_string(),
            }),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.model.artifact_path, config.model.artifact_path);
        assert!(parsed.model.threshold.is_none());
    }

    #[test]
    fn test_partial_config_parses() {
        let yaml = "model:\n  artifact_path: /tmp/model.json\n  threshold: 0.4\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.artifact_path, "/tmp/model.json");
        assert_eq!(config.model.threshold, Some(0.4));
        assert!(config.tables.is_none());
    }
}
