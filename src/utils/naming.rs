use std::path::{Component, Path};

/// Characters that cannot appear in a theme filename on some platform.
const REPLACED_CHARS: [char; 10] = [' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Turn a theme name into a lowercase, underscore-separated filename stem.
///
/// `"My Theme (Pro)!! v2"` becomes `"my_theme_pro!!_v2"`. Other punctuation is
/// kept. The result may be empty; callers must check before using it.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch == '(' || ch == ')' {
            continue;
        }
        let ch = if REPLACED_CHARS.contains(&ch) { '_' } else { ch };
        for lower in ch.to_lowercase() {
            if lower == '_' && out.ends_with('_') {
                continue;
            }
            out.push(lower);
        }
    }
    out.trim_matches('_').to_string()
}

/// Upper-case the first letter of every word, leaving the rest untouched.
/// Word boundaries are any character that is not alphanumeric or `_`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for ch in s.chars() {
        if at_boundary {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_boundary = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

/// Remove a trailing `-<version>` where the version starts with a digit or
/// contains a dot: `foo.bar-1.2.3` -> `foo.bar`, `one-dark` stays.
fn strip_version_suffix(dir_name: &str) -> &str {
    let Some(dash) = dir_name.rfind('-') else {
        return dir_name;
    };
    let version = &dir_name[dash + 1..];
    let looks_like_version = version
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
        || version.contains('.');
    if looks_like_version {
        &dir_name[..dash]
    } else {
        dir_name
    }
}

/// Human label for the extension that owns `path`.
///
/// The directory right after an `extensions` segment names the extension,
/// e.g. `.../extensions/dracula-theme.theme-dracula-2.24.3/themes/x.json`
/// gives `"Theme Dracula by Dracula-Theme"`.
pub fn extract_extension_label(path: &Path) -> Option<String> {
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let position = segments.iter().position(|s| s == "extensions")?;
    let extension_dir = segments.get(position + 1)?;
    let name = strip_version_suffix(extension_dir);

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() == 2 {
        let (publisher, extension) = (parts[0], parts[1]);
        return Some(format!(
            "{} by {}",
            title_case(&extension.replace('-', " ")),
            title_case(publisher)
        ));
    }

    Some(title_case(&name.replace('-', " ")))
}
