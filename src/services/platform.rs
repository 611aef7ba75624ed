use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Host operating systems the path policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    /// BSDs and anything else; treated like macOS for paths.
    OtherUnix,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            _ => Platform::OtherUnix,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::OtherUnix => "Unix",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `(os, arch)` as reported by the Rust target, e.g. `("linux", "x86_64")`.
pub fn platform_info() -> (&'static str, &'static str) {
    (std::env::consts::OS, std::env::consts::ARCH)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Platform support gate
// ═══════════════════════════════════════════════════════════════════════════════

/// Which platforms the converter agrees to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportPolicy {
    /// Warp ships on Windows, macOS and Linux.
    #[default]
    AllPlatforms,
    /// Older Warp releases had no Windows build.
    RejectWindows,
}

impl SupportPolicy {
    pub fn allows(&self, platform: Platform) -> bool {
        match self {
            SupportPolicy::AllPlatforms => true,
            SupportPolicy::RejectWindows => platform != Platform::Windows,
        }
    }

    /// Checked once at startup, before any discovery or conversion.
    pub fn validate(&self, platform: Platform) -> Result<(), ConvertError> {
        if self.allows(platform) {
            Ok(())
        } else {
            Err(ConvertError::UnsupportedPlatform(platform))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Path resolution
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolves source and destination roots for one platform.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: PathBuf,
    platform: Platform,
    xdg_data_home: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(home: PathBuf, platform: Platform, xdg_data_home: Option<PathBuf>) -> Self {
        Self {
            home,
            platform,
            xdg_data_home,
        }
    }

    /// Resolver for the running process (home dir, OS and `XDG_DATA_HOME`).
    pub fn from_env() -> Result<Self, ConvertError> {
        let home = dirs::home_dir().ok_or(ConvertError::HomeDirectoryUnavailable)?;
        let xdg_data_home = std::env::var_os("XDG_DATA_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Ok(Self::new(home, Platform::current(), xdg_data_home))
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// `~/.vscode/extensions` on every platform.
    pub fn source_themes_root(&self) -> PathBuf {
        self.home.join(".vscode").join("extensions")
    }

    pub fn destination_themes_root(&self) -> PathBuf {
        match self.platform {
            Platform::Windows => self.home.join(".warp").join("themes").join("standard"),
            Platform::Linux => {
                let data_home = self
                    .xdg_data_home
                    .clone()
                    .unwrap_or_else(|| self.home.join(".local").join("share"));
                data_home.join("warp-terminal").join("themes").join("standard")
            }
            Platform::MacOs | Platform::OtherUnix => self.home.join(".warp").join("themes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn resolver(platform: Platform, xdg: Option<&str>) -> PathResolver {
        PathResolver::new(PathBuf::from("/home/user"), platform, xdg.map(PathBuf::from))
    }

    #[test]
    fn test_source_root_same_everywhere() {
        for platform in [Platform::Windows, Platform::MacOs, Platform::Linux, Platform::OtherUnix] {
            let root = resolver(platform, None).source_themes_root();
            assert_eq!(root, Path::new("/home/user").join(".vscode").join("extensions"));
        }
    }

    #[test]
    fn test_macos_destination() {
        let root = resolver(Platform::MacOs, Some("/ignored")).destination_themes_root();
        assert_eq!(root, Path::new("/home/user").join(".warp").join("themes"));
    }

    #[test]
    fn test_windows_destination_uses_standard_subdir() {
        let root = resolver(Platform::Windows, None).destination_themes_root();
        assert_eq!(
            root,
            Path::new("/home/user").join(".warp").join("themes").join("standard")
        );
    }

    #[test]
    fn test_linux_destination_prefers_xdg_data_home() {
        let root = resolver(Platform::Linux, Some("/data")).destination_themes_root();
        assert_eq!(
            root,
            Path::new("/data").join("warp-terminal").join("themes").join("standard")
        );
    }

    #[test]
    fn test_linux_destination_falls_back_to_local_share() {
        let root = resolver(Platform::Linux, None).destination_themes_root();
        assert_eq!(
            root,
            Path::new("/home/user")
                .join(".local")
                .join("share")
                .join("warp-terminal")
                .join("themes")
                .join("standard")
        );
    }

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("freebsd"), Platform::OtherUnix);
    }

    #[test]
    fn test_support_policy() {
        assert!(SupportPolicy::AllPlatforms.validate(Platform::Windows).is_ok());
        assert!(SupportPolicy::RejectWindows.validate(Platform::Linux).is_ok());
        let err = SupportPolicy::RejectWindows.validate(Platform::Windows);
        assert!(matches!(err, Err(ConvertError::UnsupportedPlatform(Platform::Windows))));
    }
}
