use std::path::{Path, PathBuf};

use super::theme_store::save_warp_theme;
use super::vscode::{load_extension_metadata, load_vscode_theme};
use super::warp::{convert_vscode_to_warp, WarpTheme};
use crate::error::ConvertError;

/// Result of converting one theme file.
#[derive(Debug, Clone)]
pub struct ConvertedTheme {
    pub theme_name: String,
    pub output_path: PathBuf,
    pub theme: WarpTheme,
}

/// Re-read `source_path` in full, convert it and write it under `dest_dir`.
pub fn convert_theme_file(
    source_path: &Path,
    dest_dir: &Path,
    overwrite: bool,
) -> Result<ConvertedTheme, ConvertError> {
    let source = load_vscode_theme(source_path)?;
    let metadata = load_extension_metadata(source_path);
    let theme = convert_vscode_to_warp(&source);
    tracing::debug!(
        name = %source.name,
        source = %source_path.display(),
        has_metadata = metadata.is_some(),
        "converted theme"
    );

    let output_path = save_warp_theme(&theme, &source.name, metadata.as_ref(), dest_dir, overwrite)?;

    Ok(ConvertedTheme {
        theme_name: source.name,
        output_path,
        theme,
    })
}

/// Load and convert without writing anything; used for previews.
pub fn preview_theme_file(source_path: &Path) -> Result<WarpTheme, ConvertError> {
    let source = load_vscode_theme(source_path)?;
    Ok(convert_vscode_to_warp(&source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const THEME: &str = r##"{
        "name": "Night Owl",
        "type": "dark",
        "colors": {
            "editor.background": "#011627",
            "editor.foreground": "#d6deeb",
            "focusBorder": "#122d42",
            "terminal.ansiRed": "#EF5350"
        }
    }"##;

    #[test]
    fn test_convert_theme_file_end_to_end() {
        let root = TempDir::new().unwrap();
        let ext = root.path().join("extensions").join("sdras.night-owl-2.0.1");
        let source = ext.join("themes").join("Night Owl-color-theme.json");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, THEME).unwrap();
        fs::write(
            ext.join("package.json"),
            r#"{"name": "night-owl", "displayName": "Night Owl", "publisher": "sdras", "version": "2.0.1"}"#,
        )
        .unwrap();

        let dest = root.path().join("out");
        let converted = convert_theme_file(&source, &dest, true).unwrap();
        assert_eq!(converted.theme_name, "Night Owl");
        assert_eq!(converted.output_path, dest.join("night_owl.yaml"));
        assert_eq!(converted.theme.background, "#011627");
        assert_eq!(converted.theme.accent, "#122d42");
        assert_eq!(converted.theme.terminal_colors.normal.red, "#EF5350");

        let written = fs::read_to_string(&converted.output_path).unwrap();
        assert!(written.starts_with("# Converted from VS Code extension \"Night Owl\" 2.0.1 by sdras\n"));
        let parsed: WarpTheme = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed, converted.theme);
    }

    #[test]
    fn test_convert_theme_file_propagates_parse_errors() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("broken.json");
        fs::write(&source, "{").unwrap();
        assert!(matches!(
            convert_theme_file(&source, root.path(), true),
            Err(ConvertError::ThemeParse { .. })
        ));
        assert!(!root.path().join("broken.yaml").exists());
    }

    #[test]
    fn test_preview_matches_conversion() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("theme.json");
        fs::write(&source, THEME).unwrap();
        let preview = preview_theme_file(&source).unwrap();
        let converted = convert_theme_file(&source, root.path(), true).unwrap();
        assert_eq!(preview, converted.theme);
    }
}
