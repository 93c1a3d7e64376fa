use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::io;
use crate::paths;

/// Root configuration structure for textpatch.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextpatchConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via textpatch.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_pattern")]
    pub pattern: String,

    #[serde(default = "default_search")]
    pub search: String,

    #[serde(default = "default_replace")]
    pub replace: String,

    /// Directory names never descended into. Empty means every directory is visited.
    #[serde(default)]
    pub skip_dirs: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            search: default_search(),
            replace: default_replace(),
            skip_dirs: Vec::new(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

/// File name pattern for the generated-bindings variant.
pub const GENERATED_PATTERN: &str = "*.gen.cs";

fn default_pattern() -> String {
    "*.cs".to_string()
}

fn default_search() -> String {
    "using System.Numerics".to_string()
}

fn default_replace() -> String {
    "using UnityEngine".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the full textpatch.json config, falling back to defaults on any error.
pub fn load_config() -> TextpatchConfig {
    load_config_from_file().unwrap_or_default()
}

/// Load config from an explicit path. Unlike `load_config`, a missing or
/// malformed file is an error.
pub fn load_config_from(path: &Path) -> Result<TextpatchConfig> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
    let path = Path::new(&expanded);

    if !path.is_file() {
        return Err(Error::config_invalid_value(
            "config",
            Some(path.display().to_string()),
            "Config file does not exist",
        ));
    }

    parse_config_file(path)
}

fn load_config_from_file() -> Result<TextpatchConfig> {
    let path = paths::textpatch_json()?;

    if !path.exists() {
        return Err(Error::config_invalid_value(
            "config",
            Some(path.display().to_string()),
            "textpatch.json not found",
        ));
    }

    parse_config_file(&path)
}

fn parse_config_file(path: &Path) -> Result<TextpatchConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    let config: TextpatchConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    if config.defaults.search.is_empty() {
        return Err(Error::config_invalid_value(
            "defaults.search",
            None,
            "Search literal cannot be empty",
        ));
    }

    Ok(config)
}

/// Get the path to textpatch.json (for display purposes)
pub fn config_path() -> Result<String> {
    Ok(paths::textpatch_json()?.display().to_string())
}

/// Check if textpatch.json file exists
pub fn config_exists() -> bool {
    paths::textpatch_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
