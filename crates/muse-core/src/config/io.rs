//! YAML configuration I/O
//!
//! Loading never fails: a missing file yields defaults, an unreadable or
//! malformed file is logged and yields defaults. Values that survive parsing
//! are passed through [`Sanitize`] so out-of-range numbers written by hand
//! cannot reach the controllers.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Post-load normalization of configuration values
pub trait Sanitize {
    /// Return a copy with every field clamped into its valid range
    fn sanitized(self) -> Self;
}

/// Load configuration from a YAML file
///
/// # Example
///
/// ```ignore
/// let config: MuseConfig = load_config(&default_config_path());
/// ```
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default + Sanitize,
{
    log::info!("Config: loading {:?}", path);

    if !path.exists() {
        log::info!("Config: {:?} not found, using defaults", path);
        return T::default();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("Config: failed to read {:?}: {}, using defaults", path, e);
            return T::default();
        }
    };

    if contents.trim().is_empty() {
        return T::default();
    }

    match serde_yaml::from_str::<T>(&contents) {
        Ok(config) => config.sanitized(),
        Err(e) => {
            log::warn!("Config: malformed {:?}: {}, using defaults", path, e);
            T::default()
        }
    }
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("Config: saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Knob {
        level: f32,
        label: String,
    }

    impl Default for Knob {
        fn default() -> Self {
            Self {
                level: 0.5,
                label: "knob".to_string(),
            }
        }
    }

    impl Sanitize for Knob {
        fn sanitized(mut self) -> Self {
            self.level = self.level.clamp(0.0, 1.0);
            self
        }
    }

    #[test]
    fn test_missing_file_returns_default() {
        let knob: Knob = load_config(Path::new("/nonexistent/muse/knob.yaml"));
        assert_eq!(knob, Knob::default());
    }

    #[test]
    fn test_malformed_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knob.yaml");
        std::fs::write(&path, "level: [not, a, number").unwrap();

        let knob: Knob = load_config(&path);
        assert_eq!(knob, Knob::default());
    }

    #[test]
    fn test_loaded_values_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knob.yaml");
        std::fs::write(&path, "level: 7.5\nlabel: loud\n").unwrap();

        let knob: Knob = load_config(&path);
        assert_eq!(knob.level, 1.0);
        assert_eq!(knob.label, "loud");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("knob.yaml");

        let knob = Knob {
            level: 0.25,
            label: "saved".to_string(),
        };
        save_config(&knob, &path).unwrap();

        let loaded: Knob = load_config(&path);
        assert_eq!(loaded, knob);
    }
}
