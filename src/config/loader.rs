//! JSON config file loading

use std::fs;
use std::path::Path;

use super::ConfigError;

/// Top-level keys of a JSON config file.
pub type JsonConfig = serde_json::Map<String, serde_json::Value>;

/// Read and parse `path`, which must hold a JSON object.
pub fn read_json(path: &Path) -> Result<JsonConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject { path: path.to_path_buf() }),
    }
}

/// Load `path` without ever failing.
///
/// Returns an empty map when `path` is not a regular file. Read and parse
/// failures are logged at error level and also yield an empty map.
pub fn load_json(path: &Path) -> JsonConfig {
    if !path.is_file() {
        return JsonConfig::new();
    }

    tracing::debug!("attempting to load json config file [{}]", path.display());
    match read_json(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("error during loading of config file [{}]: {}", path.display(), e);
            JsonConfig::new()
        }
    }
}
