//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::ConvertError;
use log::debug;
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `.css-datauri.toml` in the given directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use css_datauri::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Threshold override: {:?}", config.max_size_bytes);
    /// # Ok::<(), css_datauri::error::ConvertError>(())
    /// ```
    pub fn load(dir: &Path) -> Result<ConfigFile, ConvertError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        // Read directly instead of checking existence first
        let contents = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(ConvertError::io(
                    format!("reading {}", config_path.display()),
                    e,
                ));
            }
        };

        Self::parse(&contents, &config_path)
    }

    /// Load config from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<ConfigFile, ConvertError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConvertError::ConfigNotFound {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<ConfigFile, ConvertError> {
        let config: ConfigFile =
            toml_edit::de::from_str(contents).map_err(|e| ConvertError::InvalidConfig {
                message: format!("{}: {}", path.display(), e),
            })?;

        config.validate()?;
        debug!("loaded configuration from {}", path.display());

        Ok(config)
    }
}
