//! Service settings.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable naming the storage directory.
pub const DATA_DIR_ENV: &str = "CONFSTORE_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "./confstore-data";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory the entity store persists into. Consumers need read/write
    /// access to this path.
    pub data_directory: PathBuf,
}

impl Settings {
    /// Resolve settings from the environment, falling back to
    /// `./confstore-data` when `CONFSTORE_DATA_DIR` is unset.
    pub fn from_env() -> Self {
        let data_directory = env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self { data_directory }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_config_text() {
        let settings: Settings =
            serde_json::from_str(r#"{"data_directory": "/var/lib/confstore"}"#).unwrap();
        assert_eq!(settings.data_directory, PathBuf::from("/var/lib/confstore"));
    }
}
