use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::ConvertError;
use crate::utils::naming::extract_extension_label;

// ═══════════════════════════════════════════════════════════════════════════════
// Source documents
// ═══════════════════════════════════════════════════════════════════════════════

/// A VS Code color theme as found in an extension's `themes/` directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VsCodeTheme {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    /// `"dark"`, `"light"`, or whatever the author wrote.
    #[serde(default, rename = "type", deserialize_with = "deserialize_text")]
    pub theme_type: String,
    /// Color role key (`editor.background`) to color literal.
    #[serde(default, deserialize_with = "deserialize_colors")]
    pub colors: HashMap<String, String>,
    #[serde(default, rename = "tokenColors")]
    pub token_colors: Option<TokenColors>,
}

/// `tokenColors` is usually inline rules or a path to a TextMate theme.
/// Any other shape is kept as raw JSON rather than rejecting the theme.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
pub enum TokenColors {
    Rules(Vec<TokenColor>),
    Include(String),
    Other(serde_json::Value),
}

/// Syntax highlighting rule. Carried for completeness; Warp has no use for it.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct TokenColor {
    #[serde(default)]
    pub name: Option<String>,
    /// A scope string, a list of them, or anything else an author wrote
    #[serde(default)]
    pub scope: serde_json::Value,
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// `null` reads as an empty string.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Null entries (`"editor.background": null`) are treated as unset.
fn deserialize_colors<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

/// Light/dark classification shown in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Unknown,
}

impl ThemeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "dark" => ThemeKind::Dark,
            "light" => ThemeKind::Light,
            _ => ThemeKind::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark theme",
            ThemeKind::Light => "Light theme",
            ThemeKind::Unknown => "Unknown",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Extension metadata (package.json)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub author: Option<Person>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub repository: Option<Repository>,
}

/// npm allows `"author": "Name <mail> (url)"` as well as an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Plain(String),
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default)]
        url: String,
    },
}

impl Person {
    pub fn name(&self) -> &str {
        match self {
            Person::Plain(s) => s,
            Person::Detailed { name, .. } => name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Person::Plain(_) => "",
            Person::Detailed { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    Url(String),
    Detailed {
        #[serde(default)]
        url: String,
    },
}

impl Repository {
    pub fn url(&self) -> &str {
        match self {
            Repository::Url(url) => url,
            Repository::Detailed { url, .. } => url,
        }
    }
}

impl ExtensionMetadata {
    /// `displayName`, falling back to `name`.
    pub fn title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// `publisher`, falling back to the author's name.
    pub fn creator(&self) -> &str {
        if !self.publisher.is_empty() {
            return &self.publisher;
        }
        self.author.as_ref().map(Person::name).unwrap_or("")
    }

    /// Repository URL, falling back to the author's homepage.
    pub fn source_url(&self) -> &str {
        let repository = self.repository.as_ref().map(Repository::url).unwrap_or("");
        if !repository.is_empty() {
            return repository;
        }
        self.author.as_ref().map(Person::url).unwrap_or("")
    }
}

/// The extension directory owning `theme_path`: everything up to and
/// including the segment after `extensions`.
pub fn extension_dir(theme_path: &Path) -> Option<PathBuf> {
    let components: Vec<Component> = theme_path.components().collect();
    let position = components
        .iter()
        .position(|c| matches!(c, Component::Normal(s) if *s == "extensions"))?;
    if position + 1 >= components.len() {
        return None;
    }
    Some(components[..=position + 1].iter().collect())
}

/// Read `package.json` next to the theme's extension. Best effort.
pub fn load_extension_metadata(theme_path: &Path) -> Option<ExtensionMetadata> {
    let package_json = extension_dir(theme_path)?.join("package.json");
    let content = match fs::read_to_string(&package_json) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!(path = %package_json.display(), error = %err, "no extension metadata");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            tracing::debug!(path = %package_json.display(), error = %err, "unreadable extension metadata");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading and discovery
// ═══════════════════════════════════════════════════════════════════════════════

/// One discovered theme, before full conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo {
    /// File stem, e.g. `dracula-soft`.
    pub name: String,
    /// `Dracula Soft (Theme Dracula by Dracula-Theme)`
    pub display_name: String,
    pub path: PathBuf,
    pub kind: ThemeKind,
}

/// Read and parse a theme file; themes without a name are rejected.
pub fn load_vscode_theme(path: &Path) -> Result<VsCodeTheme, ConvertError> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::ThemeRead {
        path: path.to_path_buf(),
        source,
    })?;
    let theme: VsCodeTheme =
        serde_json::from_str(&content).map_err(|source| ConvertError::ThemeParse {
            path: path.to_path_buf(),
            source,
        })?;
    if theme.name.is_empty() {
        return Err(ConvertError::MissingThemeName(path.to_path_buf()));
    }
    Ok(theme)
}

/// Build the catalog entry for one candidate file.
pub fn parse_theme_file(path: &Path) -> Result<ThemeInfo, ConvertError> {
    let theme = load_vscode_theme(path)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let display_name = match extract_extension_label(path) {
        Some(label) => format!("{} ({})", theme.name, label),
        None => theme.name.clone(),
    };

    Ok(ThemeInfo {
        name,
        display_name,
        path: path.to_path_buf(),
        kind: ThemeKind::from_tag(&theme.theme_type),
    })
}

fn segment_is_themes(segment: &str) -> bool {
    if cfg!(windows) {
        segment.eq_ignore_ascii_case("themes")
    } else {
        segment == "themes"
    }
}

/// True if some whole path segment is `themes` (not `mythemes`).
pub fn is_in_themes_dir(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(s) => segment_is_themes(&s.to_string_lossy()),
        _ => false,
    })
}

/// A `.json` file (any case) inside a `themes` directory.
pub fn is_theme_candidate(path: &Path) -> bool {
    let is_json = path
        .to_string_lossy()
        .to_lowercase()
        .ends_with(".json");
    is_json && is_in_themes_dir(path)
}

/// Depth-first walk collecting every parseable theme under `current_path`.
fn collect_themes(current_path: &Path, themes: &mut Vec<ThemeInfo>) {
    let entries = match fs::read_dir(current_path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %current_path.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let metadata = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(_) => continue,
        };

        // Symlinked directories are not followed to avoid cycles
        if metadata.is_dir() {
            collect_themes(&path, themes);
            continue;
        }

        if !is_theme_candidate(&path) {
            continue;
        }

        match parse_theme_file(&path) {
            Ok(info) => themes.push(info),
            Err(err) => tracing::debug!(error = %err, "skipping theme candidate"),
        }
    }
}

/// Every valid theme under `source_root`, in traversal order.
pub fn discover_themes(source_root: &Path) -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    collect_themes(source_root, &mut themes);
    tracing::info!(root = %source_root.display(), count = themes.len(), "theme discovery finished");
    themes
}
