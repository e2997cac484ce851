//! Process-wide settings: credential, sandbox override, multimedia flag.
//!
//! Persisted as a small JSON object in the per-application config
//! directory. The credential can also arrive via environment variables,
//! which take precedence over the file so packaged builds and CI can run
//! without writing secrets to disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub allow_root_access: bool,
    pub multimedia_support: bool,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            allow_root_access: false,
            multimedia_support: true,
            model: None,
            base_url: None,
        }
    }
}

/// Partial update: only fields present in the patch are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub api_key: Option<String>,
    pub allow_root_access: Option<bool>,
    pub multimedia_support: Option<bool>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves the settings file. Reads go back to disk on every
/// call so concurrent turns always observe the latest saved state.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the conventional per-application location.
    pub fn default_location() -> Self {
        Self::new(config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the persisted settings. A missing, unreadable, or invalid
    /// file yields the defaults; corruption is logged, never raised.
    pub fn load(&self) -> Settings {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "invalid settings file, using defaults");
                Settings::default()
            }
        }
    }

    /// Persisted settings with environment overrides applied.
    pub fn effective(&self) -> Settings {
        let mut settings = self.load();
        if let Some(key) = env_value("DIRPILOT_API_KEY") {
            settings.api_key = Some(key);
        }
        if let Some(model) = env_value("DIRPILOT_MODEL") {
            settings.model = Some(model);
        }
        if let Some(base_url) = env_value("DIRPILOT_BASE_URL") {
            settings.base_url = Some(base_url);
        }
        settings
    }

    /// Apply a partial update and persist the merged result.
    pub fn save(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        let mut settings = self.load();
        if let Some(api_key) = patch.api_key {
            settings.api_key = Some(api_key);
        }
        if let Some(allow_root) = patch.allow_root_access {
            settings.allow_root_access = allow_root;
        }
        if let Some(multimedia) = patch.multimedia_support {
            settings.multimedia_support = multimedia;
        }
        if let Some(model) = patch.model {
            settings.model = Some(model);
        }
        if let Some(base_url) = patch.base_url {
            settings.base_url = Some(base_url);
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&self.path, raw).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(settings)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn config_dir() -> PathBuf {
    if let Some(dir) = env_value("DIRPILOT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(app_data) = std::env::var("APPDATA") {
            return PathBuf::from(app_data).join("Dirpilot");
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".dirpilot");
    }

    if let Ok(profile) = std::env::var("USERPROFILE") {
        return PathBuf::from(profile).join(".dirpilot");
    }

    PathBuf::from(".dirpilot")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::new(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, store) = temp_store();
        let settings = store.load();
        assert!(settings.api_key.is_none());
        assert!(!settings.allow_root_access);
        assert!(settings.multimedia_support);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{not json").unwrap();
        let settings = store.load();
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn save_merges_partial_patch() {
        let (_dir, store) = temp_store();
        store
            .save(SettingsPatch {
                api_key: Some("sk-test".into()),
                ..SettingsPatch::default()
            })
            .unwrap();
        let saved = store
            .save(SettingsPatch {
                allow_root_access: Some(true),
                ..SettingsPatch::default()
            })
            .unwrap();

        assert_eq!(saved.api_key.as_deref(), Some("sk-test"));
        assert!(saved.allow_root_access);

        let reloaded = store.load();
        assert_eq!(reloaded.api_key.as_deref(), Some("sk-test"));
        assert!(reloaded.allow_root_access);
    }
}
