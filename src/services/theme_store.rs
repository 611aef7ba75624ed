use std::fs;
use std::path::{Path, PathBuf};

use super::vscode::ExtensionMetadata;
use super::warp::WarpTheme;
use crate::error::ConvertError;
use crate::utils::naming::sanitize_filename;

pub const THEME_EXTENSION: &str = "yaml";

/// `dest_dir/<sanitized name>.yaml`
pub fn theme_file_path(dest_dir: &Path, theme_name: &str) -> Result<PathBuf, ConvertError> {
    let stem = sanitize_filename(theme_name);
    if stem.is_empty() {
        return Err(ConvertError::InvalidThemeName(theme_name.to_string()));
    }
    Ok(dest_dir.join(format!("{}.{}", stem, THEME_EXTENSION)))
}

/// Control characters would end the comment line early.
fn comment_text(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// YAML comment lines crediting the source extension, if known.
pub fn attribution_header(metadata: &ExtensionMetadata) -> Option<String> {
    let title = comment_text(metadata.title());
    if title.is_empty() {
        return None;
    }

    let mut line = format!("# Converted from VS Code extension \"{}\"", title);
    let version = comment_text(&metadata.version);
    if !version.is_empty() {
        line.push_str(&format!(" {}", version));
    }
    let creator = comment_text(metadata.creator());
    if !creator.is_empty() {
        line.push_str(&format!(" by {}", creator));
    }
    line.push('\n');

    let url = comment_text(metadata.source_url());
    if !url.is_empty() {
        line.push_str(&format!("# Source: {}\n", url));
    }
    Some(line)
}

/// Full file content: optional attribution comment followed by the theme.
pub fn render_theme_file(
    theme: &WarpTheme,
    metadata: Option<&ExtensionMetadata>,
) -> Result<String, ConvertError> {
    let mut content = metadata.and_then(attribution_header).unwrap_or_default();
    content.push_str(&theme.to_yaml()?);
    Ok(content)
}

/// Write `theme` into `dest_dir`, creating the directory if needed.
/// Returns the written path.
pub fn save_warp_theme(
    theme: &WarpTheme,
    theme_name: &str,
    metadata: Option<&ExtensionMetadata>,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf, ConvertError> {
    let theme_path = theme_file_path(dest_dir, theme_name)?;
    if !overwrite && theme_path.exists() {
        return Err(ConvertError::AlreadyExists(theme_path));
    }

    let content = render_theme_file(theme, metadata)?;

    fs::create_dir_all(dest_dir).map_err(|source| ConvertError::Persistence {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    // Atomic write: write to temp file first, then rename
    let temp_path = theme_path.with_extension(format!("{}.tmp", THEME_EXTENSION));
    fs::write(&temp_path, &content)
        .and_then(|_| fs::rename(&temp_path, &theme_path))
        .map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            ConvertError::Persistence {
                path: theme_path.clone(),
                source,
            }
        })?;

    tracing::info!(path = %theme_path.display(), "saved Warp theme");
    Ok(theme_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vscode::{Person, Repository, VsCodeTheme};
    use crate::services::warp::convert_vscode_to_warp;
    use tempfile::TempDir;

    fn sample_theme() -> WarpTheme {
        let source = VsCodeTheme {
            name: "Sample".to_string(),
            theme_type: "dark".to_string(),
            ..Default::default()
        };
        convert_vscode_to_warp(&source)
    }

    fn sample_metadata() -> ExtensionMetadata {
        ExtensionMetadata {
            name: "theme-dracula".to_string(),
            display_name: "Dracula Official".to_string(),
            publisher: String::new(),
            author: Some(Person::Plain("Zeno Rocha".to_string())),
            version: "2.24.3".to_string(),
            repository: Some(Repository::Url("https://github.com/dracula/visual-studio-code".to_string())),
        }
    }

    #[test]
    fn test_theme_file_path() {
        let dir = Path::new("/warp/themes");
        assert_eq!(
            theme_file_path(dir, "My Theme (Pro)!! v2").unwrap(),
            dir.join("my_theme_pro!!_v2.yaml")
        );
        assert!(matches!(
            theme_file_path(dir, "()"),
            Err(ConvertError::InvalidThemeName(_))
        ));
    }

    #[test]
    fn test_attribution_header() {
        let header = attribution_header(&sample_metadata()).unwrap();
        assert_eq!(
            header,
            "# Converted from VS Code extension \"Dracula Official\" 2.24.3 by Zeno Rocha\n\
             # Source: https://github.com/dracula/visual-studio-code\n"
        );
        assert!(attribution_header(&ExtensionMetadata::default()).is_none());
    }

    #[test]
    fn test_attribution_keeps_multiline_values_in_comments() {
        let mut metadata = sample_metadata();
        metadata.display_name = "Evil\naccent: \"#ff0000\"\n#".to_string();
        metadata.version = "1.0\r\nbackground: '#000000'".to_string();

        let header = attribution_header(&metadata).unwrap();
        assert_eq!(header.lines().count(), 2);
        assert!(header.lines().all(|l| l.starts_with('#')));

        let theme = sample_theme();
        let rendered = render_theme_file(&theme, Some(&metadata)).unwrap();
        let parsed: WarpTheme = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, theme);
    }

    #[test]
    fn test_attribution_does_not_change_colors() {
        let theme = sample_theme();
        let plain = render_theme_file(&theme, None).unwrap();
        let attributed = render_theme_file(&theme, Some(&sample_metadata())).unwrap();
        assert!(attributed.ends_with(&plain));

        let parsed: WarpTheme = serde_yaml::from_str(&attributed).unwrap();
        assert_eq!(parsed, theme);
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let root = TempDir::new().unwrap();
        let dest = root.path().join("warp").join("themes");
        let theme = sample_theme();

        let path = save_warp_theme(&theme, "Sample Theme", None, &dest, true).unwrap();
        assert_eq!(path, dest.join("sample_theme.yaml"));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, theme.to_yaml().unwrap());
        assert!(!dest.join("sample_theme.yaml.tmp").exists());
    }

    #[test]
    fn test_save_respects_overwrite_flag() {
        let root = TempDir::new().unwrap();
        let theme = sample_theme();

        save_warp_theme(&theme, "Twice", None, root.path(), true).unwrap();
        assert!(save_warp_theme(&theme, "Twice", None, root.path(), true).is_ok());
        assert!(matches!(
            save_warp_theme(&theme, "Twice", None, root.path(), false),
            Err(ConvertError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_save_is_byte_identical_across_runs() {
        let root = TempDir::new().unwrap();
        let theme = sample_theme();
        let first = save_warp_theme(&theme, "Same", None, root.path(), true).unwrap();
        let first_bytes = fs::read(&first).unwrap();
        let second = save_warp_theme(&theme, "Same", None, root.path(), true).unwrap();
        assert_eq!(first_bytes, fs::read(&second).unwrap());
    }
}
