//! Standard locations for Muse files

use std::path::PathBuf;

const APP_DIR: &str = "muse";

/// Directory holding Muse configuration
///
/// Returns: `~/.config/muse` (or the platform equivalent)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_DIR)
}

/// Default configuration file
///
/// Returns: `~/.config/muse/config.yaml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

/// Where finished recordings are written when the caller saves them to disk
///
/// Returns: `~/Music/muse-recordings`
pub fn default_recordings_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("muse-recordings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_ends_with_file_name() {
        let path = default_config_path();
        assert!(path.ends_with("muse/config.yaml"));
    }

    #[test]
    fn test_recordings_dir_name() {
        assert!(default_recordings_dir().ends_with("muse-recordings"));
    }
}
