//! Optional `versus.toml` settings for the external tools.
//!
//! Every key has a default, so an empty or missing file is fine. Values
//! given on the command line take precedence over the file.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "versus.toml";

/// Comparisons fired per batch before waiting for the batch to drain.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub batch_size: usize,
    pub cloc: ClocConfig,
    pub jsinspect: JsInspectConfig,
    pub phpcpd: PhpcpdConfig,
    pub import: ImportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            cloc: ClocConfig::default(),
            jsinspect: JsInspectConfig::default(),
            phpcpd: PhpcpdConfig::default(),
            import: ImportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClocConfig {
    pub binary: String,
}

impl Default for ClocConfig {
    fn default() -> Self {
        Self {
            binary: "cloc".to_string(),
        }
    }
}

/// Settings for `jsinspect`, run through `npx`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsInspectConfig {
    pub npx: String,
    /// Minimum AST node count of a match (`-t`).
    pub threshold: usize,
    /// Minimum instances of a match (`-m`).
    pub min_instances: usize,
    /// Regex of paths to ignore (`--ignore`).
    pub ignore: String,
}

impl Default for JsInspectConfig {
    fn default() -> Self {
        Self {
            npx: if cfg!(windows) { "npx.cmd" } else { "npx" }.to_string(),
            threshold: 30,
            min_instances: 2,
            ignore: "test|dist".to_string(),
        }
    }
}

/// Settings for `phpcpd`, run through the PHP interpreter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhpcpdConfig {
    pub php: String,
    pub script: String,
    pub memory_limit: String,
    pub min_lines: usize,
    pub min_tokens: usize,
}

impl Default for PhpcpdConfig {
    fn default() -> Self {
        Self {
            php: "php".to_string(),
            script: "vendor/bin/phpcpd".to_string(),
            memory_limit: "512M".to_string(),
            min_lines: 5,
            min_tokens: 70,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Clone depth; 0 fetches the full history.
    pub depth: i32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { depth: 1 }
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn parse(content: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = toml::from_str(content)?;
        if config.batch_size == 0 {
            return Err("batch_size must be at least 1".into());
        }
        if config.import.depth < 0 {
            return Err("import.depth must not be negative".into());
        }
        Ok(config)
    }

    /// Load settings. An explicit path must exist; otherwise `versus.toml`
    /// in the working directory is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let path = match explicit {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        Self::parse(&content).map_err(|e| format!("invalid config {}: {e}", path.display()).into())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
