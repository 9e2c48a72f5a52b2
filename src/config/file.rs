//! Configuration file data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConvertError;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".css-datauri.toml";

/// css-datauri configuration file structure
///
/// ```toml
/// max-size-bytes = 4096
///
/// [mime-types]
/// ".svg" = "image/svg+xml"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Largest resource (in bytes) that is still inlined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<usize>,

    /// Extra extension to MIME type entries, on top of the built-in table
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mime_types: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Check values before they reach the converter
    ///
    /// Ensures the threshold is positive, extensions start with a dot and
    /// MIME types look like `type/subtype`.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.max_size_bytes == Some(0) {
            return Err(ConvertError::InvalidConfig {
                message: "max-size-bytes must be greater than zero".to_string(),
            });
        }

        for (extension, mime) in &self.mime_types {
            if extension.len() < 2 || !extension.starts_with('.') {
                return Err(ConvertError::InvalidConfig {
                    message: format!(
                        "extension '{}' must start with '.' and name a suffix",
                        extension
                    ),
                });
            }
            let well_formed = mime
                .split_once('/')
                .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty());
            if !well_formed {
                return Err(ConvertError::InvalidConfig {
                    message: format!("MIME type '{}' for '{}' is not type/subtype", mime, extension),
                });
            }
        }

        Ok(())
    }
}
