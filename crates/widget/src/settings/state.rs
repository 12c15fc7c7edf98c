use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use super::labels::WidgetLabels;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const SETTINGS_DIRECTORY_NAME: &str = "stp-chat";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DATABASE_FILE_NAME: &str = "widget.db";
/// Environment variables with this prefix override file values; `__` separates nested keys.
pub const ENV_PREFIX: &str = "STP_CHAT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSettings {
    /// Base URL of the assistant backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Identity used for the storage keys; `None` means guest.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub labels: WidgetLabels,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_id: None,
            database_path: None,
            labels: WidgetLabels::default(),
        }
    }
}

impl WidgetSettings {
    pub fn normalized(mut self) -> Self {
        self.endpoint = if self.endpoint.trim().is_empty() {
            default_endpoint()
        } else {
            self.endpoint.trim().to_string()
        };
        self.user_id = self
            .user_id
            .map(|user_id| user_id.trim().to_string())
            .filter(|user_id| !user_id.is_empty());
        self
    }

    pub fn database_path_or_default(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(SettingsStore::default_database_path)
    }
}

pub struct SettingsStore {
    settings: WidgetSettings,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".stp-chat"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn default_database_path() -> PathBuf {
        dirs::data_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".stp-chat"))
            .join(DATABASE_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from(&config_path, Env::prefixed(ENV_PREFIX).split("__"));
        Self {
            settings,
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn update(&mut self, settings: WidgetSettings) -> Result<(), SettingsError> {
        let normalized_settings = settings.normalized();
        self.persist(&normalized_settings)?;
        self.settings = normalized_settings;
        Ok(())
    }

    /// Writes the current settings when no file exists yet, so users have something to edit.
    pub fn persist_if_missing(&self) -> Result<bool, SettingsError> {
        if self.config_path.exists() {
            return Ok(false);
        }
        self.persist(&self.settings)?;
        Ok(true)
    }

    fn load_from(path: &Path, env: Env) -> WidgetSettings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        let figment = Figment::from(Serialized::defaults(WidgetSettings::default()))
            .merge(Json::file(path))
            .merge(env);

        match figment.extract::<WidgetSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                WidgetSettings::default()
            }
        }
    }

    fn persist(&self, settings: &WidgetSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-settings-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(settings).context(SerializeConfigSnafu {
            stage: "serialize-settings-json",
        })?;

        let temp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-settings-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.config_path).context(RenameTempFileSnafu {
            stage: "rename-temporary-settings-file",
            from: temp_path,
            to: self.config_path.clone(),
        })?;

        tracing::info!("saved settings to {:?}", self.config_path);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to create settings directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize settings on `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write settings file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace settings file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // A prefix no test environment sets, so env overrides never leak in.
    const ISOLATED_PREFIX: &str = "STP_CHAT_TEST_UNSET_";

    fn load_isolated(path: &Path) -> WidgetSettings {
        SettingsStore::load_from(path, Env::prefixed(ISOLATED_PREFIX).split("__"))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let settings = load_isolated(&directory.path().join("absent.json"));
        assert_eq!(settings, WidgetSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"endpoint":" https://crm.example.com ","user_id":"  ","labels":{"link_label":"[Doc]"}}"#,
        )
        .unwrap();

        let settings = load_isolated(&path);

        assert_eq!(settings.endpoint, "https://crm.example.com");
        assert_eq!(settings.user_id, None);
        assert_eq!(settings.labels.link_label, "[Doc]");
        assert_eq!(settings.labels.error_prefix, "Erreur: ");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_isolated(&path), WidgetSettings::default());
    }

    #[test]
    fn update_persists_normalized_settings() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("nested").join(SETTINGS_FILE_NAME);
        let mut store = SettingsStore {
            settings: WidgetSettings::default(),
            config_path: path.clone(),
        };

        assert!(store.persist_if_missing().unwrap());
        assert!(!store.persist_if_missing().unwrap());

        store
            .update(WidgetSettings {
                user_id: Some(" 42 ".to_string()),
                ..WidgetSettings::default()
            })
            .unwrap();

        assert_eq!(store.settings().user_id.as_deref(), Some("42"));
        assert_eq!(load_isolated(&path).user_id.as_deref(), Some("42"));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
