//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File-based configuration for voxport
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub hub: HubConfig,
    pub dataset: DatasetConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Bearer credential; supports `${VAR}` environment references.
    #[serde(deserialize_with = "deserialize_env_var")]
    pub token: Option<String>,
    /// On-disk cache for fetched row pages.
    pub cache_dir: Option<PathBuf>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            token: std::env::var("HF_TOKEN").ok(),
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Dataset repository id on the hub
    pub repo: String,
    /// Dataset config name (language code)
    pub language: String,
    pub split: String,
    /// Keep only records with this locale
    pub locale_filter: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            repo: "mozilla-foundation/common_voice_17_0".to_string(),
            language: "sk".to_string(),
            split: "train".to_string(),
            locale_filter: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// `flat` or `client-prefix`
    pub layout: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("filtered_common_voice"),
            layout: "client-prefix".to_string(),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl FileConfig {
    /// Load from an explicit path, or search the default locations.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./voxport.toml (current directory)
    /// 2. ~/.config/voxport/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("voxport.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "voxport") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_env_var_passthrough() {
        assert_eq!(expand_env_var("hf_abc"), Some("hf_abc".to_string()));
    }

    #[test]
    fn expand_env_var_missing_is_none() {
        assert_eq!(expand_env_var("${VOXPORT_TEST_UNSET_VAR}"), None);
    }

    #[test]
    fn expand_env_var_reads_environment() {
        std::env::set_var("VOXPORT_TEST_TOKEN", "hf_fromenv");
        assert_eq!(
            expand_env_var("${VOXPORT_TEST_TOKEN}"),
            Some("hf_fromenv".to_string())
        );
    }

    #[test]
    fn parses_full_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("voxport.toml");
        std::fs::write(
            &path,
            r#"
[hub]
token = "hf_literal"
cache_dir = ".cache/voxport"

[dataset]
repo = "example/corpus"
language = "de"
split = "validation"
locale_filter = "de"

[output]
dir = "corpus_out"
layout = "flat"
"#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.hub.token.as_deref(), Some("hf_literal"));
        assert_eq!(
            config.hub.cache_dir,
            Some(PathBuf::from(".cache/voxport"))
        );
        assert_eq!(config.dataset.repo, "example/corpus");
        assert_eq!(config.dataset.language, "de");
        assert_eq!(config.dataset.split, "validation");
        assert_eq!(config.dataset.locale_filter.as_deref(), Some("de"));
        assert_eq!(config.output.dir, PathBuf::from("corpus_out"));
        assert_eq!(config.output.layout, "flat");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("voxport.toml");
        std::fs::write(&path, "[dataset]\nlanguage = \"cs\"\n").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.dataset.language, "cs");
        assert_eq!(config.dataset.split, "train");
        assert_eq!(config.output.layout, "client-prefix");
    }
}
