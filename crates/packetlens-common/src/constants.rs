//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used in CLI output and config files.
pub const APP_NAME: &str = "packetlens";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "plens";

/// Layer name assumed before the first layer header line is seen.
///
/// Matches the first layer the helper dump format emits; fields seen before
/// any header are attributed to no layer at all and dropped.
pub const DEFAULT_LAYER: &str = "Eth";

/// Marker that identifies a layer header line in the helper dump output.
pub const LAYER_MARKER: &str = "###";

/// Characters stripped from a header line to obtain the layer name.
pub const LAYER_DECORATION: [char; 3] = ['#', '[', ']'];

/// Default base URL of the intent resolution backend.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default path of the helper interpreter, relative to the app directory.
pub const DEFAULT_HELPER_PATH: &str = "python/venv/bin/python3";

/// Default path of the capture script, relative to the app directory.
pub const DEFAULT_SCRIPT_PATH: &str = "python/logger.py";

/// Size of the stdout read buffer; one read is treated as one packet dump.
pub const READ_BUFFER_SIZE: usize = 8192;

/// Returns the config directory, preferring `$HOME/.packetlens`, falling
/// back to the current directory when no home is available.
fn resolve_config_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        return PathBuf::from(home).join(format!(".{APP_NAME}"));
    }
    PathBuf::from(".")
}

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the resolved config directory for this session.
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(resolve_config_dir)
}

/// Returns the default config file path.
pub fn default_config_file() -> PathBuf {
    config_dir().join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_file_is_under_config_dir() {
        assert!(default_config_file().starts_with(config_dir()));
    }

    #[test]
    fn layer_decoration_covers_marker_characters() {
        assert!(LAYER_MARKER.chars().all(|c| LAYER_DECORATION.contains(&c)));
    }
}
