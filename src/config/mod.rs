//! Configuration for the stylesheet converter
//!
//! This module provides:
//! - `.css-datauri.toml` config file support
//! - [`ConverterConfig`], the resolved settings a conversion runs with
//!
//! Precedence is command-line flag, then config file, then built-in defaults.

pub mod file;
pub mod loader;

pub use file::{ConfigFile, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;

use crate::converter::data_uri::DEFAULT_THRESHOLD_BYTES;
use crate::converter::mime::MimeTable;
use crate::error::ConvertError;

/// Resolved converter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Largest resource (in bytes) that is still inlined
    pub threshold_bytes: usize,
    /// Extension to MIME type lookup
    pub mime_types: MimeTable,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            threshold_bytes: DEFAULT_THRESHOLD_BYTES,
            mime_types: MimeTable::default(),
        }
    }
}

impl ConverterConfig {
    /// Apply a config file on top of the defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use css_datauri::config::{ConfigFile, ConverterConfig};
    ///
    /// let mut file = ConfigFile::default();
    /// file.max_size_bytes = Some(4096);
    /// file.mime_types.insert(".svg".to_string(), "image/svg+xml".to_string());
    ///
    /// let config = ConverterConfig::from_file(&file)?;
    /// assert_eq!(config.threshold_bytes, 4096);
    /// assert_eq!(config.mime_types.lookup(".svg"), Some("image/svg+xml"));
    /// assert_eq!(config.mime_types.lookup(".png"), Some("image/png"));
    /// # Ok::<(), css_datauri::error::ConvertError>(())
    /// ```
    pub fn from_file(file: &ConfigFile) -> Result<Self, ConvertError> {
        file.validate()?;

        let mut config = Self::default();
        if let Some(threshold) = file.max_size_bytes {
            config.threshold_bytes = threshold;
        }
        for (extension, mime) in &file.mime_types {
            config.mime_types.insert(extension, mime);
        }

        Ok(config)
    }

    /// Override the threshold (command-line `--max-size`)
    pub fn with_threshold(mut self, threshold_bytes: usize) -> Result<Self, ConvertError> {
        if threshold_bytes == 0 {
            return Err(ConvertError::InvalidConfig {
                message: "--max-size must be greater than zero".to_string(),
            });
        }
        self.threshold_bytes = threshold_bytes;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_builtin_constants() {
        let config = ConverterConfig::default();
        assert_eq!(config.threshold_bytes, 2048);
        assert_eq!(config.mime_types.lookup(".jpeg"), Some("image/jpeg"));
        assert_eq!(config.mime_types.lookup(".bmp"), None);
    }

    #[test]
    fn test_from_default_file_is_default_config() {
        let config = ConverterConfig::from_file(&ConfigFile::default()).unwrap();
        assert_eq!(config, ConverterConfig::default());
    }

    #[test]
    fn test_from_file_rejects_invalid_file() {
        let file = ConfigFile {
            max_size_bytes: Some(0),
            ..Default::default()
        };
        assert!(ConverterConfig::from_file(&file).is_err());
    }

    #[test]
    fn test_with_threshold_overrides_file_value() {
        let file = ConfigFile {
            max_size_bytes: Some(512),
            ..Default::default()
        };
        let config = ConverterConfig::from_file(&file)
            .unwrap()
            .with_threshold(8192)
            .unwrap();
        assert_eq!(config.threshold_bytes, 8192);
    }

    #[test]
    fn test_with_zero_threshold_is_rejected() {
        assert!(ConverterConfig::default().with_threshold(0).is_err());
    }

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, ".css-datauri.toml");
    }
}
