use std::path::PathBuf;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::keybindings::{Keybindings, PickerAction};
use crate::services::converter::preview_theme_file;
use crate::services::vscode::ThemeInfo;
use crate::services::warp::WarpTheme;

const PAGE_SIZE: i32 = 10;
const FILTER_CHAR_LIMIT: usize = 50;

/// What happened after the user picked a theme.
#[derive(Debug, Clone)]
pub enum Outcome {
    Converted { display_name: String, output_path: PathBuf },
    Failed(String),
}

/// Request from the picker to the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerCommand {
    Quit,
    Convert(ThemeInfo),
}

#[derive(Debug)]
pub struct PickerState {
    pub themes: Vec<ThemeInfo>,
    /// Indices into `themes` matching the current filter
    pub filtered: Vec<usize>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub filter_text: String,
    pub filter_mode: bool,
    pub destination: PathBuf,
    pub outcome: Option<Outcome>,
    preview: Option<(PathBuf, Option<WarpTheme>)>,
}

impl PickerState {
    pub fn new(themes: Vec<ThemeInfo>, destination: PathBuf) -> Self {
        let filtered = (0..themes.len()).collect();
        Self {
            themes,
            filtered,
            selected_index: 0,
            scroll_offset: 0,
            filter_text: String::new(),
            filter_mode: false,
            destination,
            outcome: None,
            preview: None,
        }
    }

    pub fn current_item(&self) -> Option<&ThemeInfo> {
        self.filtered
            .get(self.selected_index)
            .and_then(|&i| self.themes.get(i))
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.filtered.is_empty() {
            return;
        }
        let max = self.filtered.len().saturating_sub(1) as i32;
        self.selected_index = (self.selected_index as i32 + delta).clamp(0, max) as usize;
    }

    pub fn cursor_to_start(&mut self) {
        self.selected_index = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.selected_index = self.filtered.len().saturating_sub(1);
    }

    /// Keep the selection visible in a window of `visible_height` rows
    pub fn adjust_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Recompute `filtered` from `filter_text` (case-insensitive substring).
    pub fn apply_filter(&mut self) {
        let needle = self.filter_text.to_lowercase();
        self.filtered = self
            .themes
            .iter()
            .enumerate()
            .filter(|(_, t)| needle.is_empty() || t.display_name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.apply_filter();
    }

    /// Converted colors for the selected theme, computed once per selection.
    fn selected_preview(&mut self) -> Option<&WarpTheme> {
        let path = self.current_item()?.path.clone();
        let stale = !matches!(&self.preview, Some((cached, _)) if *cached == path);
        if stale {
            let converted = match preview_theme_file(&path) {
                Ok(theme) => Some(theme),
                Err(err) => {
                    tracing::debug!(error = %err, "preview unavailable");
                    None
                }
            };
            self.preview = Some((path, converted));
        }
        self.preview.as_ref().and_then(|(_, theme)| theme.as_ref())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Input
// ═══════════════════════════════════════════════════════════════════════════════

pub fn handle_input(
    state: &mut PickerState,
    code: KeyCode,
    modifiers: KeyModifiers,
    kb: &Keybindings,
) -> Option<PickerCommand> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(PickerCommand::Quit);
    }

    // After a conversion only quitting is possible
    if state.outcome.is_some() {
        return match kb.picker_action(code, modifiers) {
            Some(PickerAction::Quit) => Some(PickerCommand::Quit),
            _ => None,
        };
    }

    if state.filter_mode {
        match code {
            KeyCode::Esc => {
                state.filter_mode = false;
                state.clear_filter();
            }
            KeyCode::Enter => state.filter_mode = false,
            KeyCode::Backspace => {
                if state.filter_text.pop().is_some() {
                    state.apply_filter();
                }
            }
            KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if state.filter_text.chars().count() < FILTER_CHAR_LIMIT {
                    state.filter_text.push(c);
                    state.apply_filter();
                }
            }
            _ => {}
        }
        return None;
    }

    match kb.picker_action(code, modifiers)? {
        PickerAction::Quit => return Some(PickerCommand::Quit),
        PickerAction::MoveUp => state.move_cursor(-1),
        PickerAction::MoveDown => state.move_cursor(1),
        PickerAction::PageUp => state.move_cursor(-PAGE_SIZE),
        PickerAction::PageDown => state.move_cursor(PAGE_SIZE),
        PickerAction::GoTop => state.cursor_to_start(),
        PickerAction::GoBottom => state.cursor_to_end(),
        PickerAction::Filter => state.filter_mode = true,
        PickerAction::Convert => {
            return state.current_item().cloned().map(PickerCommand::Convert);
        }
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════════════

pub fn draw(frame: &mut Frame, state: &mut PickerState, theme: &Theme, kb: &Keybindings) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.palette.bg)), area);

    if let Some(outcome) = state.outcome.clone() {
        draw_outcome(frame, &outcome, &state.destination, area, theme, kb);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // filter / hint
            Constraint::Min(5),    // list
            Constraint::Length(7), // preview
        ])
        .split(area);

    draw_status_line(frame, state, chunks[0], theme, kb);
    draw_list(frame, state, chunks[1], theme);
    draw_preview(frame, state, chunks[2], theme);
}

fn draw_status_line(frame: &mut Frame, state: &PickerState, area: Rect, theme: &Theme, kb: &Keybindings) {
    let line = if state.filter_mode {
        Line::from(vec![
            Span::styled(" Filter: ", theme.header_style()),
            Span::styled(format!("{}█", state.filter_text), theme.normal_style()),
            Span::styled(
                format!("  {} matching · Enter to navigate, Esc to cancel", state.filtered.len()),
                theme.dim_style(),
            ),
        ])
    } else if !state.filter_text.is_empty() {
        Line::from(vec![
            Span::styled(" Filtered by: ", theme.header_style()),
            Span::styled(format!("\"{}\"", state.filter_text), theme.normal_style()),
            Span::styled(
                format!(
                    " ({} results) · {} to change filter",
                    state.filtered.len(),
                    kb.picker_first_key(PickerAction::Filter)
                ),
                theme.dim_style(),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(format!(" {} ", kb.picker_first_key(PickerAction::Filter)), theme.key_style()),
            Span::styled("filter  ", theme.dim_style()),
            Span::styled(kb.picker_keys_joined(PickerAction::MoveDown, "/"), theme.key_style()),
            Span::styled(" ", theme.dim_style()),
            Span::styled(kb.picker_keys_joined(PickerAction::MoveUp, "/"), theme.key_style()),
            Span::styled(" navigate  ", theme.dim_style()),
            Span::styled(kb.picker_first_key(PickerAction::Convert).to_string(), theme.key_style()),
            Span::styled(" convert  ", theme.dim_style()),
            Span::styled(kb.picker_first_key(PickerAction::Quit).to_string(), theme.key_style()),
            Span::styled(" quit", theme.dim_style()),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Truncate to `width` display columns, ending with `…` when cut.
fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + ch.to_string().width() + 1 > width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

fn draw_list(frame: &mut Frame, state: &mut PickerState, area: Rect, theme: &Theme) {
    let title = format!(" VS Code Themes ({}) ", state.filtered.len());
    let block = Block::default()
        .title(title)
        .title_style(theme.header_style())
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.filtered.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No themes match the filter.",
            theme.dim_style(),
        )));
        frame.render_widget(empty, inner);
        return;
    }

    let visible_height = inner.height as usize;
    state.adjust_scroll(visible_height);
    let name_width = (inner.width as usize).saturating_sub(8);

    let lines: Vec<Line> = state
        .filtered
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .take(visible_height)
        .filter_map(|(row, &theme_index)| {
            let item = state.themes.get(theme_index)?;
            let is_selected = row == state.selected_index;
            let text = format!("{}. {}", row + 1, fit_to_width(&item.display_name, name_width));
            Some(if is_selected {
                Line::from(Span::styled(format!("> {}", text), theme.selected_style()))
            } else {
                Line::from(Span::styled(format!("  {}", text), theme.normal_style()))
            })
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if state.filtered.len() > visible_height {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state = ScrollbarState::new(state.filtered.len()).position(state.selected_index);
        frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }
}

fn swatch_spans<'a>(label: &'a str, literal: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    let mut spans = vec![Span::styled(format!("{} ", label), theme.dim_style())];
    if let Some(style) = theme.swatch_style(literal) {
        spans.push(Span::styled("  ", style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(format!("{:<8}", literal), theme.normal_style()));
    spans
}

fn draw_preview(frame: &mut Frame, state: &mut PickerState, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = state.current_item().cloned() else {
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(item.kind.description(), theme.header_style()),
        Span::styled(format!(" · {}", item.path.display()), theme.dim_style()),
    ])];

    match state.selected_preview() {
        Some(warp) => {
            let mut base = Vec::new();
            base.extend(swatch_spans("accent", &warp.accent, theme));
            base.extend(swatch_spans("bg", &warp.background, theme));
            base.extend(swatch_spans("fg", &warp.foreground, theme));
            base.push(Span::styled(format!("details {}", warp.details), theme.dim_style()));
            lines.push(Line::from(base));

            for (label, palette) in [
                ("normal", &warp.terminal_colors.normal),
                ("bright", &warp.terminal_colors.bright),
            ] {
                let mut spans = vec![Span::styled(format!("{:<7}", label), theme.dim_style())];
                for (_, literal) in palette.slots() {
                    match theme.swatch_style(literal) {
                        Some(style) => spans.push(Span::styled("   ", style)),
                        None => spans.push(Span::styled(format!("{} ", literal), theme.normal_style())),
                    }
                }
                lines.push(Line::from(spans));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Preview unavailable for this theme.",
            theme.error_style(),
        ))),
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_outcome(
    frame: &mut Frame,
    outcome: &Outcome,
    destination: &std::path::Path,
    area: Rect,
    theme: &Theme,
    kb: &Keybindings,
) {
    let quit_key = kb.picker_first_key(PickerAction::Quit);
    let lines = match outcome {
        Outcome::Converted { display_name, output_path } => vec![
            Line::from(Span::styled(
                format!("Successfully converted '{}' to a Warp theme!", display_name),
                theme.success_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(format!("Saved to {}", output_path.display()), theme.normal_style())),
            Line::from(Span::styled("You can now select it in Warp's settings.", theme.dim_style())),
            Line::from(Span::styled(
                format!("Warp loads custom themes from {}", destination.display()),
                theme.dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(format!("Press '{}' to quit.", quit_key), theme.dim_style())),
        ],
        Outcome::Failed(message) => vec![
            Line::from(Span::styled(format!("Error: {}", message), theme.error_style())),
            Line::from(""),
            Line::from(Span::styled(format!("Press '{}' to quit.", quit_key), theme.dim_style())),
        ],
    };

    let height = (lines.len() as u16 + 2).min(area.height);
    let vertical = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(area.x, vertical, area.width, height);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vscode::ThemeKind;

    fn item(display_name: &str) -> ThemeInfo {
        ThemeInfo {
            name: display_name.to_lowercase(),
            display_name: display_name.to_string(),
            path: PathBuf::from(format!("/ext/themes/{}.json", display_name)),
            kind: ThemeKind::Dark,
        }
    }

    fn state() -> PickerState {
        PickerState::new(
            vec![item("Dracula"), item("Monokai"), item("Dracula Soft"), item("Solarized Light")],
            PathBuf::from("/warp"),
        )
    }

    fn press(state: &mut PickerState, code: KeyCode) -> Option<PickerCommand> {
        handle_input(state, code, KeyModifiers::NONE, &Keybindings::default())
    }

    #[test]
    fn test_navigation() {
        let mut s = state();
        press(&mut s, KeyCode::Char('j'));
        press(&mut s, KeyCode::Down);
        assert_eq!(s.selected_index, 2);
        press(&mut s, KeyCode::Char('k'));
        assert_eq!(s.selected_index, 1);
        handle_input(&mut s, KeyCode::Char('G'), KeyModifiers::SHIFT, &Keybindings::default());
        assert_eq!(s.selected_index, 3);
        press(&mut s, KeyCode::PageDown);
        assert_eq!(s.selected_index, 3);
        press(&mut s, KeyCode::Char('g'));
        assert_eq!(s.selected_index, 0);
        press(&mut s, KeyCode::Up);
        assert_eq!(s.selected_index, 0);
    }

    #[test]
    fn test_filter_mode() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        assert!(s.filter_mode);
        for c in "DRAC".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        assert_eq!(s.filtered, vec![0, 2]);

        // q is text while filtering
        assert_eq!(press(&mut s, KeyCode::Char('q')), None);
        assert!(s.filtered.is_empty());
        press(&mut s, KeyCode::Backspace);
        assert_eq!(s.filtered.len(), 2);

        press(&mut s, KeyCode::Enter);
        assert!(!s.filter_mode);
        assert_eq!(s.filter_text, "DRAC");
        press(&mut s, KeyCode::Char('j'));
        assert_eq!(s.current_item().map(|t| t.display_name.as_str()), Some("Dracula Soft"));
    }

    #[test]
    fn test_filter_escape_clears() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        press(&mut s, KeyCode::Char('m'));
        assert_eq!(s.filtered, vec![1]);
        press(&mut s, KeyCode::Esc);
        assert!(!s.filter_mode);
        assert!(s.filter_text.is_empty());
        assert_eq!(s.filtered.len(), 4);
    }

    #[test]
    fn test_convert_returns_selected_theme() {
        let mut s = state();
        press(&mut s, KeyCode::Char('j'));
        assert_eq!(press(&mut s, KeyCode::Enter), Some(PickerCommand::Convert(item("Monokai"))));
    }

    #[test]
    fn test_convert_with_empty_filter_result() {
        let mut s = state();
        s.filter_text = "zzz".to_string();
        s.apply_filter();
        assert_eq!(press(&mut s, KeyCode::Enter), None);
    }

    #[test]
    fn test_quit_keys() {
        let mut s = state();
        assert_eq!(press(&mut s, KeyCode::Char('q')), Some(PickerCommand::Quit));
        s.filter_mode = true;
        assert_eq!(
            handle_input(&mut s, KeyCode::Char('c'), KeyModifiers::CONTROL, &Keybindings::default()),
            Some(PickerCommand::Quit)
        );
    }

    #[test]
    fn test_outcome_only_allows_quit() {
        let mut s = state();
        s.outcome = Some(Outcome::Failed("boom".to_string()));
        assert_eq!(press(&mut s, KeyCode::Enter), None);
        assert_eq!(press(&mut s, KeyCode::Char('j')), None);
        assert_eq!(s.selected_index, 0);
        assert_eq!(press(&mut s, KeyCode::Char('q')), Some(PickerCommand::Quit));
    }

    #[test]
    fn test_adjust_scroll() {
        let mut s = state();
        s.selected_index = 3;
        s.adjust_scroll(2);
        assert_eq!(s.scroll_offset, 2);
        s.selected_index = 0;
        s.adjust_scroll(2);
        assert_eq!(s.scroll_offset, 0);
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width("short", 10), "short");
        assert_eq!(fit_to_width("a very long theme name", 8), "a very …");
    }
}
