//! User preferences read from a TOML file.
use crate::error::Result;
use crate::import::duplicates::{DEFAULT_DUPLICATE_THRESHOLD, DuplicateOptions};
use crate::language::Language;
use crate::matching::Strictness;
use crate::models::{Direction, SessionConfig};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Tag of the learner's language (`source_text`).
    #[serde(default = "default_native_language")]
    pub native_language: String,
    /// Tag of the language being learned (`target_text`).
    #[serde(default = "default_foreign_language")]
    pub foreign_language: String,
    #[serde(default)]
    pub strictness: Strictness,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("vocab.sqlite3")
}

fn default_native_language() -> String {
    "de".to_string()
}

fn default_foreign_language() -> String {
    "fr".to_string()
}

fn default_duplicate_threshold() -> f64 {
    DEFAULT_DUPLICATE_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            native_language: default_native_language(),
            foreign_language: default_foreign_language(),
            strictness: Strictness::default(),
            direction: Direction::default(),
            duplicate_threshold: default_duplicate_threshold(),
        }
    }
}

impl Settings {
    /// Loads settings, writing a default file when none exists. A file that
    /// fails to parse is left alone and defaults are used.
    pub fn load(path: impl AsRef<Path>) -> Settings {
        let path = path.as_ref();
        debug!("Loading settings from {}", path.display());

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Settings>(&contents) {
                Ok(settings) => {
                    info!(
                        "Settings loaded: {} -> {}, strictness {:?}",
                        settings.native_language, settings.foreign_language, settings.strictness
                    );
                    return settings;
                }
                Err(e) => {
                    error!("Failed to parse config file '{}': {}", path.display(), e);
                    return Settings::default();
                }
            },
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Config file not found. Creating default.");
            }
            Err(e) => {
                error!("Failed to read config file '{}': {}", path.display(), e);
                return Settings::default();
            }
        }

        let default_settings = Settings::default();
        if let Err(e) = default_settings.save(path) {
            warn!("Failed to write default config file: {}", e);
        }
        default_settings
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn native(&self) -> Option<Language> {
        Language::from_tag(&self.native_language)
    }

    pub fn foreign(&self) -> Option<Language> {
        Language::from_tag(&self.foreign_language)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            direction: self.direction,
            strictness: self.strictness,
            native_language: self.native(),
            foreign_language: self.foreign(),
        }
    }

    pub fn duplicate_options(&self) -> DuplicateOptions {
        DuplicateOptions {
            threshold: self.duplicate_threshold,
            native_language: self.native(),
            foreign_language: self.foreign(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vocab.toml");

        let settings = Settings::load(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        fs::write(&path, "strictness = \"strict\"\nforeign_language = \"es\"\n").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.strictness, Strictness::Strict);
        assert_eq!(settings.foreign(), Some(Language::Spanish));
        assert_eq!(settings.duplicate_threshold, 0.9);
        assert_eq!(settings.session_config().foreign_language, Some(Language::Spanish));
    }

    #[test]
    fn test_invalid_file_uses_defaults_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        fs::write(&path, "strictness = [").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "strictness = [");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        let settings = Settings {
            strictness: Strictness::Lenient,
            direction: Direction::ForeignToNative,
            native_language: "en".to_string(),
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }
}
