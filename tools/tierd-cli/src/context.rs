//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tierd_ranking::catalog::{seed_catalog, Product};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["tierd.toml", ".tierd.toml", "tierd.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd)? {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    ///
    /// A file that exists but fails to parse is an error rather than skipped.
    fn find_config(start: &Path) -> Result<Option<(CliConfig, PathBuf)>> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    let config = CliConfig::load(&config_path.to_string_lossy())?;
                    return Ok(Some((config, config_path)));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Catalog file to read, from the argument or the config.
    pub fn catalog_path(&self, arg: Option<&str>) -> Option<PathBuf> {
        arg.or(self.config.catalog.path.as_deref())
            .map(|path| self.resolve_path(path))
    }

    /// Load the catalog, falling back to the built-in seed list.
    pub fn load_catalog(&self, arg: Option<&str>) -> Result<Vec<Product>> {
        let Some(path) = self.catalog_path(arg) else {
            self.output.debug("Using built-in seed catalog");
            return Ok(seed_catalog());
        };

        self.output
            .debug(&format!("Loading catalog from {}", path.display()));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        let products: Vec<Product> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;

        Ok(products)
    }

    /// Write products back as a catalog file.
    pub fn save_catalog(&self, path: &Path, products: &[Product]) -> Result<()> {
        let json = serde_json::to_string_pretty(products)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write catalog: {}", path.display()))
    }
}
