//! Configuration management commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use tierd_observability::{LogFormat, LogLevel};
use tierd_ranking::ranking::{RankingStrategy, TieBreak};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let ranking = &ctx.config.ranking;
    ctx.output.info("[ranking]");
    ctx.output.kv("strategy", ranking.strategy.as_str());
    ctx.output.kv("z", &ranking.z.to_string());
    ctx.output.kv("decay_weight", &ranking.decay_weight.to_string());
    ctx.output.kv("rating_weight", &ranking.rating_weight.to_string());
    ctx.output.kv("tie_break", ranking.tie_break.as_str());

    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        ctx.config.catalog.path.as_deref().unwrap_or("(built-in seed)"),
    );

    ctx.output.info("[logging]");
    ctx.output.kv("format", ctx.config.logging.format.as_str());
    ctx.output.kv("level", ctx.config.logging.level.as_str());

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = match &ctx.config_path {
        Some(path) => path.to_string_lossy().to_string(),
        None => bail!("No config file found. Run `tierd config init` to create one."),
    };

    let mut config = CliConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.ranking.validate()?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.ranking.validate() {
        errors.push(e.to_string());
    }

    if ctx.config.ranking.strategy == RankingStrategy::Trending
        && ctx.config.ranking.rating_weight > 0.0
    {
        warnings.push("ranking.rating_weight has no effect with the trending strategy".to_string());
    }

    if let Some(path) = ctx.config.catalog.path.as_deref() {
        match ctx.load_catalog(Some(path)) {
            Ok(products) if products.is_empty() => {
                warnings.push(format!("catalog.path '{}' contains no products", path))
            }
            Ok(products) => {
                let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                if ids.len() != products.len() {
                    errors.push(format!("catalog.path '{}' has duplicate product ids", path));
                }
            }
            Err(e) => errors.push(format!("{:#}", e)),
        }
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["ranking", "strategy"] => Ok(format!("\"{}\"", config.ranking.strategy.as_str())),
        ["ranking", "z"] => Ok(config.ranking.z.to_string()),
        ["ranking", "decay_weight"] => Ok(config.ranking.decay_weight.to_string()),
        ["ranking", "rating_weight"] => Ok(config.ranking.rating_weight.to_string()),
        ["ranking", "tie_break"] => Ok(format!("\"{}\"", config.ranking.tie_break.as_str())),
        ["catalog", "path"] => Ok(config
            .catalog
            .path
            .as_ref()
            .map(|p| format!("\"{}\"", p))
            .unwrap_or_else(|| "null".to_string())),
        ["logging", "format"] => Ok(format!("\"{}\"", config.logging.format.as_str())),
        ["logging", "level"] => Ok(format!("\"{}\"", config.logging.level.as_str())),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["ranking", "strategy"] => {
            config.ranking.strategy = RankingStrategy::from_str(value)
                .ok_or_else(|| anyhow!("Unknown strategy: {}", value))?
        }
        ["ranking", "z"] => config.ranking.z = value.parse()?,
        ["ranking", "decay_weight"] => config.ranking.decay_weight = value.parse()?,
        ["ranking", "rating_weight"] => config.ranking.rating_weight = value.parse()?,
        ["ranking", "tie_break"] => {
            config.ranking.tie_break =
                TieBreak::from_str(value).ok_or_else(|| anyhow!("Unknown tie-break: {}", value))?
        }
        ["catalog", "path"] => {
            config.catalog.path = match value {
                "" | "null" => None,
                path => Some(path.to_string()),
            }
        }
        ["logging", "format"] => {
            config.logging.format =
                LogFormat::from_str(value).ok_or_else(|| anyhow!("Unknown log format: {}", value))?
        }
        ["logging", "level"] => {
            config.logging.level =
                LogLevel::from_str(value).ok_or_else(|| anyhow!("Unknown log level: {}", value))?
        }
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = CliConfig::default();
        assert_eq!(get_config_value(&config, "ranking.strategy").unwrap(), "\"confidence\"");
        assert_eq!(get_config_value(&config, "ranking.z").unwrap(), "1.96");
        assert_eq!(get_config_value(&config, "catalog.path").unwrap(), "null");
        assert_eq!(get_config_value(&config, "logging.level").unwrap(), "\"info\"");
        assert!(get_config_value(&config, "ranking.nope").is_err());
    }

    #[test]
    fn test_set_config_value() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "ranking.strategy", "hot").unwrap();
        set_config_value(&mut config, "ranking.tie_break", "input-order").unwrap();
        set_config_value(&mut config, "ranking.rating_weight", "0.3").unwrap();
        set_config_value(&mut config, "catalog.path", "gear.json").unwrap();
        set_config_value(&mut config, "logging.format", "json").unwrap();

        assert_eq!(config.ranking.strategy, RankingStrategy::Trending);
        assert_eq!(config.ranking.tie_break, TieBreak::InputOrder);
        assert_eq!(config.ranking.rating_weight, 0.3);
        assert_eq!(config.catalog.path.as_deref(), Some("gear.json"));
        assert_eq!(config.logging.format, LogFormat::Json);

        set_config_value(&mut config, "catalog.path", "null").unwrap();
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_set_config_value_rejects_bad_input() {
        let mut config = CliConfig::default();
        assert!(set_config_value(&mut config, "ranking.strategy", "random").is_err());
        assert!(set_config_value(&mut config, "ranking.z", "wide").is_err());
        assert!(set_config_value(&mut config, "logging.level", "loud").is_err());
        assert!(set_config_value(&mut config, "build.target", "x").is_err());
    }
}
