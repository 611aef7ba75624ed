use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::vscode::VsCodeTheme;
use crate::error::ConvertError;

// ═══════════════════════════════════════════════════════════════════════════════
// Warp theme document (field order is the YAML key order)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpTheme {
    pub accent: String,
    pub background: String,
    /// `"darker"` or `"lighter"`
    pub details: String,
    pub foreground: String,
    pub terminal_colors: TerminalColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalColors {
    pub normal: ColorPalette,
    pub bright: ColorPalette,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub black: String,
    pub red: String,
    pub green: String,
    pub yellow: String,
    pub blue: String,
    pub magenta: String,
    pub cyan: String,
    pub white: String,
}

impl ColorPalette {
    /// Slots in ANSI order with their lowercase names.
    pub fn slots(&self) -> [(&'static str, &str); 8] {
        [
            ("black", self.black.as_str()),
            ("red", self.red.as_str()),
            ("green", self.green.as_str()),
            ("yellow", self.yellow.as_str()),
            ("blue", self.blue.as_str()),
            ("magenta", self.magenta.as_str()),
            ("cyan", self.cyan.as_str()),
            ("white", self.white.as_str()),
        ]
    }
}

impl WarpTheme {
    pub fn to_yaml(&self) -> Result<String, ConvertError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Defaults
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_BACKGROUND: &str = "#1e1e1e";
pub const DEFAULT_FOREGROUND: &str = "#d4d4d4";
pub const DEFAULT_ACCENT: &str = "#007acc";

/// Accent candidates, most specific first.
pub const ACCENT_KEYS: [&str; 6] = [
    "focusBorder",
    "button.background",
    "progressBar.background",
    "textLink.foreground",
    "editorCursor.foreground",
    "terminal.ansiBlue",
];

struct AnsiSlot {
    /// Suffix of `terminal.ansi<Name>` / `terminal.ansiBright<Name>`
    name: &'static str,
    normal: &'static str,
    bright: &'static str,
}

const ANSI_SLOTS: [AnsiSlot; 8] = [
    AnsiSlot { name: "Black", normal: "#1e1e1e", bright: "#686868" },
    AnsiSlot { name: "Red", normal: "#f44747", bright: "#f44747" },
    AnsiSlot { name: "Green", normal: "#6a9955", bright: "#6a9955" },
    AnsiSlot { name: "Yellow", normal: "#dcdcaa", bright: "#dcdcaa" },
    AnsiSlot { name: "Blue", normal: "#569cd6", bright: "#569cd6" },
    AnsiSlot { name: "Magenta", normal: "#c586c0", bright: "#c586c0" },
    AnsiSlot { name: "Cyan", normal: "#9cdcfe", bright: "#9cdcfe" },
    AnsiSlot { name: "White", normal: "#d4d4d4", bright: "#ffffff" },
];

// ═══════════════════════════════════════════════════════════════════════════════
// Conversion
// ═══════════════════════════════════════════════════════════════════════════════

/// Normalize a color literal to `#rrggbb` where the shape is recognizable.
///
/// `#rrggbbaa` loses its alpha, `#rgb` is expanded. Anything else (named
/// colors, odd lengths) is returned trimmed but otherwise untouched.
pub fn clean_color(color: &str) -> String {
    let color = color.trim();
    if !color.starts_with('#') {
        return color.to_string();
    }

    match color.len() {
        9 => color.get(..7).unwrap_or(color).to_string(),
        4 => {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for digit in color[1..].chars() {
                expanded.push(digit);
                expanded.push(digit);
            }
            expanded
        }
        _ => color.to_string(),
    }
}

/// The cleaned value of the first key present with a non-empty value.
pub fn first_present_color(colors: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| colors.get(*key))
        .find(|value| !value.is_empty())
        .map(|value| clean_color(value))
}

fn color_or_default(colors: &HashMap<String, String>, key: &str, default: &str) -> String {
    first_present_color(colors, &[key]).unwrap_or_else(|| default.to_string())
}

fn convert_palette(colors: &HashMap<String, String>, bright: bool) -> ColorPalette {
    let prefix = if bright { "terminal.ansiBright" } else { "terminal.ansi" };
    let [black, red, green, yellow, blue, magenta, cyan, white] = ANSI_SLOTS.map(|slot| {
        let default = if bright { slot.bright } else { slot.normal };
        color_or_default(colors, &format!("{}{}", prefix, slot.name), default)
    });
    ColorPalette {
        black,
        red,
        green,
        yellow,
        blue,
        magenta,
        cyan,
        white,
    }
}

/// Map a VS Code theme onto Warp's fixed schema. Every field is filled,
/// from the source where possible and from the defaults above otherwise.
pub fn convert_vscode_to_warp(theme: &VsCodeTheme) -> WarpTheme {
    let colors = &theme.colors;

    let details = if theme.theme_type == "light" {
        "lighter"
    } else {
        "darker"
    };

    WarpTheme {
        accent: first_present_color(colors, &ACCENT_KEYS)
            .unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
        background: color_or_default(colors, "editor.background", DEFAULT_BACKGROUND),
        details: details.to_string(),
        foreground: color_or_default(colors, "editor.foreground", DEFAULT_FOREGROUND),
        terminal_colors: TerminalColors {
            normal: convert_palette(colors, false),
            bright: convert_palette(colors, true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_with(theme_type: &str, colors: &[(&str, &str)]) -> VsCodeTheme {
        VsCodeTheme {
            name: "Test".to_string(),
            theme_type: theme_type.to_string(),
            colors: colors
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            token_colors: None,
        }
    }

    #[test]
    fn test_clean_color() {
        assert_eq!(clean_color("#aabbccdd"), "#aabbcc");
        assert_eq!(clean_color("#abc"), "#aabbcc");
        assert_eq!(clean_color("red"), "red");
        assert_eq!(clean_color("  #123456  "), "#123456");
    }

    #[test]
    fn test_clean_color_passes_odd_lengths_through() {
        assert_eq!(clean_color("#12345"), "#12345");
        assert_eq!(clean_color("#abcd"), "#abcd");
        assert_eq!(clean_color("#"), "#");
        assert_eq!(clean_color(" rgb(1, 2, 3) "), "rgb(1, 2, 3)");
    }

    #[test]
    fn test_defaults_for_empty_theme() {
        let warp = convert_vscode_to_warp(&theme_with("dark", &[]));
        assert_eq!(warp.background, "#1e1e1e");
        assert_eq!(warp.foreground, "#d4d4d4");
        assert_eq!(warp.accent, "#007acc");
        assert_eq!(warp.details, "darker");

        let normal = &warp.terminal_colors.normal;
        assert_eq!(normal.black, "#1e1e1e");
        assert_eq!(normal.red, "#f44747");
        assert_eq!(normal.green, "#6a9955");
        assert_eq!(normal.yellow, "#dcdcaa");
        assert_eq!(normal.blue, "#569cd6");
        assert_eq!(normal.magenta, "#c586c0");
        assert_eq!(normal.cyan, "#9cdcfe");
        assert_eq!(normal.white, "#d4d4d4");

        let bright = &warp.terminal_colors.bright;
        assert_eq!(bright.black, "#686868");
        assert_eq!(bright.red, "#f44747");
        assert_eq!(bright.green, "#6a9955");
        assert_eq!(bright.yellow, "#dcdcaa");
        assert_eq!(bright.blue, "#569cd6");
        assert_eq!(bright.magenta, "#c586c0");
        assert_eq!(bright.cyan, "#9cdcfe");
        assert_eq!(bright.white, "#ffffff");
    }

    #[test]
    fn test_editor_colors_are_cleaned() {
        let warp = convert_vscode_to_warp(&theme_with(
            "dark",
            &[("editor.background", "#282a36ff"), ("editor.foreground", "#fff")],
        ));
        assert_eq!(warp.background, "#282a36");
        assert_eq!(warp.foreground, "#ffffff");
    }

    #[test]
    fn test_accent_priority() {
        let warp = convert_vscode_to_warp(&theme_with(
            "dark",
            &[("textLink.foreground", "#111111"), ("terminal.ansiBlue", "#222222")],
        ));
        assert_eq!(warp.accent, "#111111");

        let warp = convert_vscode_to_warp(&theme_with(
            "dark",
            &[
                ("terminal.ansiBlue", "#222222"),
                ("button.background", "#333333"),
                ("focusBorder", "#444444"),
            ],
        ));
        assert_eq!(warp.accent, "#444444");
    }

    #[test]
    fn test_accent_skips_empty_values() {
        let warp = convert_vscode_to_warp(&theme_with(
            "dark",
            &[("focusBorder", ""), ("progressBar.background", "#0e70c0")],
        ));
        assert_eq!(warp.accent, "#0e70c0");
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let warp = convert_vscode_to_warp(&theme_with("dark", &[("editor.background", "")]));
        assert_eq!(warp.background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_details_follow_theme_type() {
        assert_eq!(convert_vscode_to_warp(&theme_with("light", &[])).details, "lighter");
        assert_eq!(convert_vscode_to_warp(&theme_with("dark", &[])).details, "darker");
        assert_eq!(convert_vscode_to_warp(&theme_with("Light", &[])).details, "darker");
        assert_eq!(convert_vscode_to_warp(&theme_with("", &[])).details, "darker");
    }

    #[test]
    fn test_terminal_palette_mapping() {
        let warp = convert_vscode_to_warp(&theme_with(
            "dark",
            &[
                ("terminal.ansiRed", "#ff5555"),
                ("terminal.ansiBrightRed", "#ff6e6e"),
                ("terminal.ansiBrightWhite", "#fafafa80"),
            ],
        ));
        assert_eq!(warp.terminal_colors.normal.red, "#ff5555");
        assert_eq!(warp.terminal_colors.bright.red, "#ff6e6e");
        assert_eq!(warp.terminal_colors.bright.white, "#fafafa");
        assert_eq!(warp.terminal_colors.normal.white, "#d4d4d4");
    }

    #[test]
    fn test_yaml_shape_and_order() {
        let yaml = convert_vscode_to_warp(&theme_with("light", &[])).to_yaml().unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|line| !line.starts_with(' '))
            .map(|line| line.split(':').next().unwrap_or(""))
            .collect();
        assert_eq!(keys, ["accent", "background", "details", "foreground", "terminal_colors"]);
        assert!(yaml.contains("details: lighter"));
        assert!(yaml.contains("terminal_colors:\n  normal:\n    black: "));

        let parsed: WarpTheme = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.terminal_colors.bright.white, "#ffffff");
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let source = theme_with(
            "dark",
            &[("editor.background", "#000"), ("terminal.ansiCyan", "#00ffff")],
        );
        let first = convert_vscode_to_warp(&source).to_yaml().unwrap();
        let second = convert_vscode_to_warp(&source).to_yaml().unwrap();
        assert_eq!(first, second);
    }
}
