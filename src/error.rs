use std::path::PathBuf;

use thiserror::Error;

use crate::services::platform::Platform;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Could not determine the home directory")]
    HomeDirectoryUnavailable,

    #[error("Warp terminal themes are not supported on {0}")]
    UnsupportedPlatform(Platform),

    #[error("Failed to read theme file {path}: {source}")]
    ThemeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse theme JSON {path}: {source}")]
    ThemeParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Theme has no name: {0}")]
    MissingThemeName(PathBuf),

    #[error("No VS Code themes found under {0}. Please ensure you have VS Code installed with some theme extensions.")]
    NoThemesFound(PathBuf),

    #[error("Theme name {0:?} does not produce a usable filename")]
    InvalidThemeName(String),

    #[error("Theme file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to write {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode theme as YAML: {0}")]
    Serialize(#[from] serde_yaml::Error),
}
