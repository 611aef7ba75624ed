use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::keybindings::PickerAction;
use crate::services::platform::SupportPolicy;

/// Environment override for the VS Code extensions directory
pub const SOURCE_DIR_ENV: &str = "VSCODE2WARP_SOURCE_DIR";
/// Environment override for the Warp themes directory
pub const DEST_DIR_ENV: &str = "VSCODE2WARP_DEST_DIR";

fn default_overwrite() -> bool {
    true
}

fn is_default_policy(policy: &SupportPolicy) -> bool {
    *policy == SupportPolicy::default()
}

/// Application settings (~/.vscode2warp/settings.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where to look for VS Code extensions instead of ~/.vscode/extensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,
    /// Where to write Warp themes instead of the platform default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_dir: Option<String>,
    /// Replace an existing theme file with the same name
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
    /// Platform gate checked before discovery ("all_platforms" or "reject_windows")
    #[serde(default, skip_serializing_if = "is_default_policy")]
    pub support_policy: SupportPolicy,
    /// Picker keybinding overrides, e.g. {"quit": ["q", "ctrl+q"]}
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub keybindings: HashMap<PickerAction, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_dir: None,
            destination_dir: None,
            overwrite: default_overwrite(),
            support_policy: SupportPolicy::default(),
            keybindings: HashMap::new(),
        }
    }
}

impl Settings {
    /// Returns the config directory path (~/.vscode2warp)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".vscode2warp"))
    }

    /// Returns the config file path (~/.vscode2warp/settings.json)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.json"))
    }

    /// Returns the debug log directory (~/.vscode2warp/debug)
    pub fn debug_dir() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("debug"))
    }

    /// Loads settings from the config file, returns default if not found or invalid
    pub fn load() -> Self {
        match Self::load_with_error() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "using default settings");
                Self::default()
            }
        }
    }

    /// Loads settings from the config file with error information.
    /// A missing file is not an error.
    pub fn load_with_error() -> Result<Self, String> {
        let config_path = Self::config_path()
            .ok_or_else(|| "Could not determine config path".to_string())?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content)
            .map_err(|e| format!("Invalid JSON in settings.json: {}", e))
    }

    /// Saves settings to the config file using atomic write pattern
    pub fn save(&self) -> io::Result<()> {
        let Some(config_dir) = Self::config_dir() else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            ));
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            // Set directory permissions to user-only on Unix
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = fs::Permissions::from_mode(0o700);
                let _ = fs::set_permissions(&config_dir, perms);
            }
        }

        let config_path = config_dir.join("settings.json");
        let temp_path = config_dir.join("settings.json.tmp");
        let content = serde_json::to_string_pretty(self)?;

        // Atomic write: write to temp file first, then rename
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &config_path)?;

        Ok(())
    }

    /// Source root: environment, then settings file, then `fallback`.
    pub fn source_root<F>(&self, fallback: F) -> PathBuf
    where
        F: FnOnce() -> PathBuf,
    {
        let env_value = std::env::var(SOURCE_DIR_ENV).ok();
        resolve_override(env_value.as_deref(), self.source_dir.as_deref(), fallback)
    }

    /// Destination root: environment, then settings file, then `fallback`.
    pub fn destination_root<F>(&self, fallback: F) -> PathBuf
    where
        F: FnOnce() -> PathBuf,
    {
        let env_value = std::env::var(DEST_DIR_ENV).ok();
        resolve_override(env_value.as_deref(), self.destination_dir.as_deref(), fallback)
    }
}

/// First usable override wins. Only absolute paths are accepted.
fn resolve_override<F>(env_value: Option<&str>, setting: Option<&str>, fallback: F) -> PathBuf
where
    F: FnOnce() -> PathBuf,
{
    for candidate in [env_value, setting].into_iter().flatten() {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        let path = PathBuf::from(candidate);
        if path.is_absolute() {
            return path;
        }
        tracing::warn!(path = %candidate, "ignoring relative directory override");
    }
    fallback()
}
