// Readshelf Settings Engine
// Manages client settings: loading, saving, updating individual values, and resetting to defaults.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ReaderSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ReaderSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ReaderSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn override_value(&mut self, key: &str, value: serde_json::Value)
        -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
///
/// Session overrides (environment variables, command line) sit on top of the
/// persisted settings and are never written to the file.
pub struct SettingsEngine {
    config_path: String,
    /// What the config file holds.
    settings: ReaderSettings,
    overrides: Vec<(String, serde_json::Value)>,
    /// `settings` with `overrides` applied; what callers see.
    effective: ReaderSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: ReaderSettings::default(),
            overrides: Vec::new(),
            effective: ReaderSettings::default(),
        }
    }

    /// Returns `base` with one (dot-separated) key replaced.
    ///
    /// The new value is validated by deserializing the whole settings object,
    /// so `"page_size": "twelve"` is rejected.
    fn with_value(
        base: &ReaderSettings,
        key: &str,
        value: serde_json::Value,
    ) -> Result<ReaderSettings, SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(base).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let parts: Vec<&str> = key.split('.').collect();
        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| SettingsError::InvalidKey("Key cannot be empty".to_string()))?;

        let mut current = &mut json_value;
        for part in parents {
            current = current.get_mut(*part).ok_or_else(|| {
                SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
            })?;
        }

        match current {
            serde_json::Value::Object(map) if map.contains_key(*last) => {
                map.insert(last.to_string(), value);
            }
            serde_json::Value::Object(_) => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )));
            }
        }

        serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })
    }

    /// Recomputes the effective settings from the persisted ones.
    fn refresh_effective(&mut self) -> Result<(), SettingsError> {
        let mut effective = self.settings.clone();
        for (key, value) in &self.overrides {
            effective = Self::with_value(&effective, key, value.clone())?;
        }
        self.effective = effective;
        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults. A malformed file is an error; fields
    /// absent from a well-formed file take their default values.
    fn load(&mut self) -> Result<ReaderSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ReaderSettings::default();
            self.refresh_effective()?;
            return Ok(self.effective.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: ReaderSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        self.refresh_effective()?;
        Ok(self.effective.clone())
    }

    /// Saves the persisted settings (without overrides), creating parent
    /// directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &ReaderSettings {
        &self.effective
    }

    /// Updates one setting by (dot-separated) key and saves. An invalid value
    /// leaves both memory and disk untouched. An active override for the same
    /// key keeps winning until the process exits.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        let updated = Self::with_value(&self.settings, key, value)?;
        self.settings = updated;
        self.save()?;
        self.refresh_effective()
    }

    /// Applies a value for this session only. Nothing is written to disk.
    fn override_value(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), SettingsError> {
        self.effective = Self::with_value(&self.effective, key, value.clone())?;
        self.overrides.push((key.to_string(), value));
        Ok(())
    }

    /// Resets all settings to defaults and saves to disk. Overrides stay.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ReaderSettings::default();
        self.save()?;
        self.refresh_effective()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
