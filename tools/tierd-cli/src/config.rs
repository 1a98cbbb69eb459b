//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tierd_observability::{LogFormat, LogLevel};
use tierd_ranking::ranking::RankingConfig;

/// CLI configuration file (`tierd.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Ranking parameters.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(path, &content)
    }

    /// Parse config content; the format follows the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Where the catalog comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in seed catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub level: LogLevel,
}

/// Generate a default tierd.toml config file.
pub fn generate_default_config() -> String {
    r#"# Tier'd ranking configuration

[ranking]
strategy = "confidence"    # or "trending"
z = 1.96
decay_weight = 0.1
rating_weight = 0.0
tie_break = "newest_first" # or "input_order"

[catalog]
# path = "catalog.json"    # built-in seed catalog when unset

[logging]
format = "human"           # or "json"
level = "info"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierd_ranking::ranking::{RankingStrategy, TieBreak};

    #[test]
    fn test_default_config_parses() {
        let config = CliConfig::parse("tierd.toml", &generate_default_config()).unwrap();
        assert_eq!(config.ranking, RankingConfig::default());
        assert!(config.catalog.path.is_none());
        assert_eq!(config.logging.format, LogFormat::Human);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CliConfig::parse(
            "tierd.toml",
            "[ranking]\nstrategy = \"trending\"\ntie_break = \"input_order\"\n",
        )
        .unwrap();
        assert_eq!(config.ranking.strategy, RankingStrategy::Trending);
        assert_eq!(config.ranking.tie_break, TieBreak::InputOrder);
        assert_eq!(config.ranking.z, 1.96);
        assert_eq!(config.ranking.decay_weight, 0.1);
    }

    #[test]
    fn test_json_config() {
        let content = r#"{
            "catalog": {"path": "catalog.json"},
            "logging": {"format": "json", "level": "debug"}
        }"#;
        let config = CliConfig::parse("tierd.json", content).unwrap();
        assert_eq!(config.catalog.path.as_deref(), Some("catalog.json"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = CliConfig::parse("tierd.toml", "[ranking]\nstrategy = \"random\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = CliConfig::default();
        config.ranking.rating_weight = 0.25;
        config.catalog.path = Some("gear.json".to_string());

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = CliConfig::parse("tierd.toml", &text).unwrap();
        assert_eq!(parsed.ranking.rating_weight, 0.25);
        assert_eq!(parsed.catalog.path.as_deref(), Some("gear.json"));
    }
}
