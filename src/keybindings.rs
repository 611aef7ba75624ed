use std::collections::HashMap;
use std::hash::Hash;
use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

// ─── Generic key binding infrastructure ────────────────────────────────

/// A key combination (key code + modifiers).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Reverse-lookup map: KeyBind → Action, plus display strings per action.
pub struct ActionMap<A> {
    map: HashMap<KeyBind, A>,
    display: HashMap<A, Vec<String>>,
}

impl<A: Copy + Eq + Hash> ActionMap<A> {
    /// Merge user overrides on top of defaults.
    ///
    /// An action present in `overrides` loses all of its default bindings;
    /// actions not mentioned keep theirs.
    pub fn build(
        defaults: &HashMap<A, Vec<String>>,
        overrides: &HashMap<A, Vec<String>>,
    ) -> Self {
        let mut merged = defaults.clone();
        for (action, keys) in overrides {
            merged.insert(*action, keys.clone());
        }

        let mut map = HashMap::new();
        let mut display: HashMap<A, Vec<String>> = HashMap::new();
        for (action, key_strings) in &merged {
            for key_str in key_strings {
                if let Some(bind) = parse_key(key_str) {
                    map.insert(bind, *action);
                }
            }
            let keys = key_strings
                .iter()
                .filter(|s| !s.trim().starts_with("//"))
                .map(|s| format_key_display(s))
                .collect();
            display.insert(*action, keys);
        }

        Self { map, display }
    }

    pub fn keys(&self, action: A) -> &[String] {
        self.display.get(&action).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// First display key for an action, or `""` when unbound.
    pub fn first_key(&self, action: A) -> &str {
        self.keys(action).first().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn keys_joined(&self, action: A, sep: &str) -> String {
        self.keys(action).join(sep)
    }

    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<A> {
        let bind = KeyBind { code, modifiers };
        if let Some(action) = self.map.get(&bind) {
            return Some(*action);
        }
        // crossterm reports SHIFT alongside uppercase letters and shifted
        // symbols; the character itself already carries that information.
        if let KeyCode::Char(_) = code {
            if modifiers.contains(KeyModifiers::SHIFT) {
                let stripped = modifiers & !KeyModifiers::SHIFT;
                return self.map.get(&KeyBind { code, modifiers: stripped }).copied();
            }
        }
        None
    }
}

// ─── Key string parsing ───────────────────────────────────────────────

/// Parse `"ctrl+c"`, `"pagedown"`, `"g"`, `"G"` or `"shift+g"`.
///
/// Single characters are case-sensitive (`g` and `G` are different
/// bindings). `shift+<letter>` is stored as the uppercase letter.
/// Strings starting with `//` are comments.
pub fn parse_key(s: &str) -> Option<KeyBind> {
    let trimmed = s.trim();
    if trimmed.starts_with("//") || trimmed.is_empty() {
        return None;
    }

    // A lone "+" is a key, not a separator
    let (modifier_parts, key_part) = match trimmed.rsplit_once('+') {
        Some((mods, key)) if !key.is_empty() => (mods, key),
        _ => ("", trimmed),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in modifier_parts.split('+').filter(|p| !p.is_empty()) {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => {}
        }
    }

    let code = if key_part.chars().count() == 1 {
        let ch = key_part.chars().next()?;
        if modifiers.contains(KeyModifiers::SHIFT) && ch.is_ascii_alphabetic() {
            modifiers.remove(KeyModifiers::SHIFT);
            KeyCode::Char(ch.to_ascii_uppercase())
        } else {
            KeyCode::Char(ch)
        }
    } else {
        match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            _ => return None,
        }
    };

    Some(KeyBind { code, modifiers })
}

/// `"ctrl+c"` → `"Ctrl+C"`, `"pageup"` → `"PgUp"`, `"shift+g"` → `"G"`.
pub fn format_key_display(s: &str) -> String {
    let Some(bind) = parse_key(s) else {
        return s.trim().to_string();
    };

    let mut parts: Vec<String> = Vec::new();
    if bind.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".into());
    }
    if bind.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".into());
    }
    if bind.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift".into());
    }

    let key = match bind.code {
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Backspace => "BkSp".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Char(c) if bind.modifiers.is_empty() => c.to_string(),
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        other => format!("{:?}", other),
    };
    parts.push(key);
    parts.join("+")
}

// ─── Theme picker context ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerAction {
    Quit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    Filter,
    Convert,
}

pub fn default_picker_keybindings() -> HashMap<PickerAction, Vec<String>> {
    let mut m = HashMap::new();
    m.insert(PickerAction::Quit, vec!["//Quit".into(), "q".into()]);
    m.insert(PickerAction::MoveUp, vec!["//Move up".into(), "up".into(), "k".into()]);
    m.insert(PickerAction::MoveDown, vec!["//Move down".into(), "down".into(), "j".into()]);
    m.insert(PickerAction::PageUp, vec!["//Page up".into(), "pageup".into()]);
    m.insert(PickerAction::PageDown, vec!["//Page down".into(), "pagedown".into()]);
    m.insert(PickerAction::GoTop, vec!["//Go to first theme".into(), "g".into(), "home".into()]);
    m.insert(PickerAction::GoBottom, vec!["//Go to last theme".into(), "G".into(), "end".into()]);
    m.insert(PickerAction::Filter, vec!["//Filter by name".into(), "/".into()]);
    m.insert(PickerAction::Convert, vec!["//Convert selected theme".into(), "enter".into()]);
    m
}

/// Runtime keybindings for the picker.
pub struct Keybindings {
    picker: ActionMap<PickerAction>,
}

impl Keybindings {
    pub fn from_overrides(overrides: &HashMap<PickerAction, Vec<String>>) -> Self {
        Self {
            picker: ActionMap::build(&default_picker_keybindings(), overrides),
        }
    }

    pub fn picker_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<PickerAction> {
        self.picker.lookup(code, modifiers)
    }
    pub fn picker_first_key(&self, action: PickerAction) -> &str { self.picker.first_key(action) }
    pub fn picker_keys_joined(&self, action: PickerAction, sep: &str) -> String { self.picker.keys_joined(action, sep) }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::from_overrides(&HashMap::new())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────
