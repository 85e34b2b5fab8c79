//! Session configuration
//!
//! Property-based configuration with typed values, change listeners and
//! JSON persistence. Keys are dotted names such as `keyboard.layout`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::keyboard::KeyboardLayout;
use crate::lib5250::request::TelnetFlags;

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "TN5250WEB_CONFIG";

pub const KEY_TIMEOUT_SECONDS: &str = "session.timeoutSeconds";
pub const KEY_KEYBOARD_LAYOUT: &str = "keyboard.layout";
pub const KEY_AUTO_ADVANCE: &str = "keyboard.autoAdvance";
pub const KEY_DBCS: &str = "display.dbcs";
pub const KEY_COLUMN_SEPARATORS: &str = "display.columnSeparators";
pub const KEY_TELNET_FLAGS: &str = "request.telnetFlags";

/// Host round trip timeout used when nothing is configured
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 300;

/// Configuration change event
#[derive(Debug, Clone)]
pub struct ConfigChangeEvent {
    pub property_name: String,
    pub old_value: Option<ConfigValue>,
    /// `None` when the property was removed
    pub new_value: Option<ConfigValue>,
}

/// Configuration change listener trait
pub trait ConfigChangeListener: Send + Sync {
    fn on_config_changed(&mut self, event: &ConfigChangeEvent);
}

/// Supported configuration value types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl ConfigValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

/// Per-session settings
pub struct SessionConfig {
    properties: HashMap<String, ConfigValue>,
    listeners: Vec<Box<dyn ConfigChangeListener>>,
    session_name: String,
    config_resource: String,
}

impl SessionConfig {
    /// Create a new configuration instance with defaults
    pub fn new(config_resource: String, session_name: String) -> Self {
        let mut config = Self {
            properties: HashMap::new(),
            listeners: Vec::new(),
            session_name,
            config_resource,
        };
        config.set_defaults();
        config
    }

    fn set_defaults(&mut self) {
        self.properties.insert(KEY_TIMEOUT_SECONDS.to_string(), DEFAULT_TIMEOUT_SECONDS.into());
        self.properties.insert(KEY_KEYBOARD_LAYOUT.to_string(), "pc".into());
        self.properties.insert(KEY_AUTO_ADVANCE.to_string(), true.into());
        self.properties.insert(KEY_DBCS.to_string(), false.into());
        self.properties.insert(KEY_COLUMN_SEPARATORS.to_string(), true.into());
        self.properties.insert(KEY_TELNET_FLAGS.to_string(), "00".into());
    }

    pub fn get_property(&self, key: &str) -> Option<&ConfigValue> {
        self.properties.get(key)
    }

    pub fn get_string_property(&self, key: &str) -> Option<String> {
        self.properties.get(key).and_then(|v| v.as_string()).map(str::to_string)
    }

    pub fn get_string_property_or(&self, key: &str, default: &str) -> String {
        self.get_string_property(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_int_property(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(|v| v.as_integer())
    }

    pub fn get_int_property_or(&self, key: &str, default: i64) -> i64 {
        self.get_int_property(key).unwrap_or(default)
    }

    pub fn get_boolean_property(&self, key: &str) -> Option<bool> {
        self.properties.get(key).and_then(|v| v.as_boolean())
    }

    pub fn get_boolean_property_or(&self, key: &str, default: bool) -> bool {
        self.get_boolean_property(key).unwrap_or(default)
    }

    /// Set configuration property and fire change event
    pub fn set_property<T: Into<ConfigValue>>(&mut self, key: &str, value: T) {
        let new_value = value.into();
        let old_value = self.properties.insert(key.to_string(), new_value.clone());
        self.fire_change_event(&ConfigChangeEvent {
            property_name: key.to_string(),
            old_value,
            new_value: Some(new_value),
        });
    }

    /// Add a configuration change listener
    pub fn add_listener(&mut self, listener: Box<dyn ConfigChangeListener>) {
        self.listeners.push(listener);
    }

    fn fire_change_event(&mut self, event: &ConfigChangeEvent) {
        log::trace!("config property '{}' changed", event.property_name);
        for listener in &mut self.listeners {
            listener.on_config_changed(event);
        }
    }

    pub fn get_session_name(&self) -> &str {
        &self.session_name
    }

    pub fn get_config_resource(&self) -> &str {
        &self.config_resource
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&self.properties)?)
    }

    /// Merge properties from JSON, firing a change event per property
    pub fn from_json(&mut self, json: &str) -> ConfigResult<()> {
        let loaded: HashMap<String, ConfigValue> = serde_json::from_str(json)?;
        for (key, value) in loaded {
            self.set_property(&key, value);
        }
        Ok(())
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Remove property and fire change event
    pub fn remove_property(&mut self, key: &str) -> Option<ConfigValue> {
        let old_value = self.properties.remove(key)?;
        self.fire_change_event(&ConfigChangeEvent {
            property_name: key.to_string(),
            old_value: Some(old_value.clone()),
            new_value: None,
        });
        Some(old_value)
    }

    /// Host round trip timeout
    pub fn timeout(&self) -> ConfigResult<Duration> {
        let seconds = self.get_int_property_or(KEY_TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS);
        if seconds <= 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: KEY_TIMEOUT_SECONDS.to_string(),
                value: seconds.to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }
        Ok(Duration::from_secs(seconds.unsigned_abs()))
    }

    pub fn keyboard_layout(&self) -> ConfigResult<KeyboardLayout> {
        self.get_string_property_or(KEY_KEYBOARD_LAYOUT, "pc").parse()
    }

    pub fn auto_advance(&self) -> bool {
        self.get_boolean_property_or(KEY_AUTO_ADVANCE, true)
    }

    /// DBCS-aware column counting
    pub fn dbcs_enabled(&self) -> bool {
        self.get_boolean_property_or(KEY_DBCS, false)
    }

    /// Whether redraw runs keep their column separator flag
    pub fn column_separators(&self) -> bool {
        self.get_boolean_property_or(KEY_COLUMN_SEPARATORS, true)
    }

    pub fn telnet_flags(&self) -> ConfigResult<TelnetFlags> {
        self.get_string_property_or(KEY_TELNET_FLAGS, "00").parse()
    }

    /// Check every typed setting parses
    pub fn validate(&self) -> ConfigResult<()> {
        self.timeout()?;
        self.keyboard_layout()?;
        self.telnet_flags()?;
        Ok(())
    }
}

/// Default config file location.
/// `TN5250WEB_CONFIG` wins; otherwise the platform config directory, falling
/// back to `./session.json` when there is none.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("tn5250web").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("session.json"))
}

/// Load a configuration file. A missing file yields the defaults.
pub fn load_config(path: &Path, session_name: &str) -> ConfigResult<SessionConfig> {
    let mut config = SessionConfig::new(path.to_string_lossy().to_string(), session_name.to_string());
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(config);
    }

    let text = fs::read_to_string(path).map_err(|e| ConfigError::FileError {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    config.from_json(&text)?;
    config.validate()?;
    Ok(config)
}

/// Write a configuration to its `config_resource` path, creating parent
/// directories as needed
pub fn save_config(config: &SessionConfig) -> ConfigResult<()> {
    let path = PathBuf::from(config.get_config_resource());
    let file_error = |e: std::io::Error| ConfigError::FileError {
        path: path.display().to_string(),
        error: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(file_error)?;
    }
    fs::write(&path, config.to_json()?).map_err(file_error)?;
    Ok(())
}
