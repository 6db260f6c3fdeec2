//! Common Voice pipeline configuration

use std::path::PathBuf;

use voxport_core::Layout;

/// Runtime configuration for the Common Voice exporter
#[derive(Debug, Clone)]
pub struct Config {
    /// Hub bearer credential. Required before any dataset access; absence is
    /// a fatal startup condition, not a per-record error.
    pub token: String,
    /// Dataset repository id on the hub.
    pub dataset: String,
    /// Dataset config name (for Common Voice: the language code).
    pub language: String,
    /// Split to export.
    pub split: String,
    /// Destination for WAV files and the metadata index.
    pub output_dir: PathBuf,
    /// Optional on-disk cache for fetched row pages.
    pub cache_dir: Option<PathBuf>,
    /// Keep only records with this locale.
    pub locale_filter: Option<String>,
    /// Arrangement of saved audio files.
    pub layout: Layout,
    /// Maximum records to consume from the source (for testing).
    pub max_records: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            dataset: "mozilla-foundation/common_voice_17_0".to_string(),
            language: "sk".to_string(),
            split: "train".to_string(),
            output_dir: PathBuf::from("filtered_common_voice"),
            cache_dir: None,
            locale_filter: None,
            layout: Layout::default(),
            max_records: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.token.is_empty());
        assert_eq!(config.dataset, "mozilla-foundation/common_voice_17_0");
        assert_eq!(config.language, "sk");
        assert_eq!(config.split, "train");
        assert_eq!(config.output_dir, PathBuf::from("filtered_common_voice"));
        assert!(config.cache_dir.is_none());
        assert!(config.locale_filter.is_none());
        assert_eq!(config.layout, Layout::ClientPrefix);
        assert!(config.max_records.is_none());
    }
}
