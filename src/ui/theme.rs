use ratatui::style::{Color, Modifier, Style};
use supports_color::Stream;

// ═══════════════════════════════════════════════════════════════════════════════
// Picker colors (256-color indices so every terminal renders them)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub fg_strong: Color,
    pub accent: Color,      // title, shortcut keys
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub border: Color,
    pub positive: Color,
    pub highlight: Color,   // errors
}

#[derive(Clone, Copy)]
pub struct Theme {
    pub palette: Palette,
    /// Terminal can show 24-bit colors, so previews use real swatches
    pub true_color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            palette: Palette {
                bg: Color::Reset,
                fg: Color::Indexed(252),
                fg_dim: Color::Indexed(244),
                fg_strong: Color::Indexed(255),
                accent: Color::Indexed(170),
                selected_bg: Color::Indexed(237),
                selected_fg: Color::Indexed(170),
                border: Color::Indexed(240),
                positive: Color::Indexed(114),
                highlight: Color::Indexed(203),
            },
            true_color: Self::supports_true_color(),
        }
    }

    /// Check if terminal supports true color (24-bit RGB)
    fn supports_true_color() -> bool {
        if let Some(support) = supports_color::on(Stream::Stdout) {
            support.has_16m
        } else {
            false
        }
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.palette.fg)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.palette.fg_dim)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.palette.selected_fg)
            .bg(self.palette.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_style(&self) -> Style {
        Style::default().fg(self.palette.fg_strong).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.palette.border)
    }

    pub fn success_style(&self) -> Style {
        Style::default()
            .fg(self.palette.positive)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.palette.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Background style showing `literal` as a color block, when possible.
    pub fn swatch_style(&self, literal: &str) -> Option<Style> {
        if !self.true_color {
            return None;
        }
        parse_hex_color(literal).map(|color| Style::default().bg(color))
    }
}

/// `#rrggbb` to an RGB color; anything else is not previewable.
pub fn parse_hex_color(literal: &str) -> Option<Color> {
    let hex = literal.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_swatch_requires_true_color() {
        let mut theme = Theme::dark();
        theme.true_color = false;
        assert!(theme.swatch_style("#000000").is_none());
        theme.true_color = true;
        assert_eq!(
            theme.swatch_style("#000000"),
            Some(Style::default().bg(Color::Rgb(0, 0, 0)))
        );
        assert!(theme.swatch_style("blue").is_none());
    }
}
