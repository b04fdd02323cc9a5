//! Global configuration model for the PacketLens supervisor.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PacketLensError, Result};

/// Root configuration for a capture supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Path to the helper executable (the interpreter running the capture script).
    pub helper_path: PathBuf,
    /// Path to the capture script passed to the helper.
    pub script_path: PathBuf,
    /// Overrides the OS-derived elevation command when set.
    #[serde(default)]
    pub elevation_override: Option<String>,
    /// Base URL of the intent resolution backend.
    pub backend_url: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            helper_path: PathBuf::from(crate::constants::DEFAULT_HELPER_PATH),
            script_path: PathBuf::from(crate::constants::DEFAULT_SCRIPT_PATH),
            elevation_override: None,
            backend_url: crate::constants::DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl CaptureConfig {
    /// Loads configuration from a JSON file, returning defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PacketLensError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CaptureConfig::load(&dir.path().join("nope.json")).expect("load");
        assert_eq!(config.backend_url, crate::constants::DEFAULT_BACKEND_URL);
        assert!(config.elevation_override.is_none());
    }

    #[test]
    fn load_roundtrips_through_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let mut config = CaptureConfig::default();
        config.elevation_override = Some("doas".into());
        std::fs::write(&path, serde_json::to_string(&config).expect("serialize"))
            .expect("write");

        let loaded = CaptureConfig::load(&path).expect("load");
        assert_eq!(loaded.elevation_override.as_deref(), Some("doas"));
        assert_eq!(loaded.helper_path, config.helper_path);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").expect("write");
        assert!(CaptureConfig::load(&path).is_err());
    }
}
