mod config;
mod error;
mod keybindings;
mod logging;
mod services;
mod ui;
mod utils;

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Settings;
use crate::error::ConvertError;
use crate::keybindings::{Keybindings, PickerAction};
use crate::services::converter::convert_theme_file;
use crate::services::platform::{platform_info, PathResolver, Platform};
use crate::services::vscode::{discover_themes, ThemeInfo};
use crate::ui::picker::{self, Outcome, PickerCommand, PickerState};
use crate::ui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolved roots and options shared by every command.
struct Context {
    settings: Settings,
    source_root: PathBuf,
    destination_root: PathBuf,
}

impl Context {
    fn resolve() -> Result<Self, ConvertError> {
        let settings = Settings::load();
        settings.support_policy.validate(Platform::current())?;
        let resolver = PathResolver::from_env()?;
        let source_root = settings.source_root(|| resolver.source_themes_root());
        let destination_root = settings.destination_root(|| resolver.destination_themes_root());
        tracing::debug!(
            platform = %resolver.platform(),
            source = %source_root.display(),
            destination = %destination_root.display(),
            "resolved theme roots"
        );
        Ok(Self { settings, source_root, destination_root })
    }

    fn themes(&self) -> Result<Vec<ThemeInfo>, ConvertError> {
        let themes = discover_themes(&self.source_root);
        if themes.is_empty() {
            return Err(ConvertError::NoThemesFound(self.source_root.clone()));
        }
        Ok(themes)
    }
}

fn print_help() {
    let (os, arch) = platform_info();
    let kb = Keybindings::from_overrides(&Settings::load().keybindings);

    println!("vscode2warp {} - Convert VS Code color themes to Warp themes", VERSION);
    println!();
    println!("USAGE:");
    println!("    vscode2warp [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print help information");
    println!("    -v, --version           Print version information");
    println!("    --list                  List installed VS Code themes");
    println!("    --convert <PATH>        Convert one theme file without the picker");
    println!("    --init-config           Write default settings to ~/.vscode2warp/settings.json");
    println!();
    println!("CONTROLS:");
    println!(
        "    {:<20}Move selection",
        format!(
            "{} / {}",
            kb.picker_keys_joined(PickerAction::MoveUp, ","),
            kb.picker_keys_joined(PickerAction::MoveDown, ",")
        )
    );
    println!(
        "    {:<20}Jump to first / last",
        format!(
            "{} / {}",
            kb.picker_first_key(PickerAction::GoTop),
            kb.picker_first_key(PickerAction::GoBottom)
        )
    );
    println!("    {:<20}Filter by name", kb.picker_keys_joined(PickerAction::Filter, ","));
    println!("    {:<20}Convert selected theme", kb.picker_keys_joined(PickerAction::Convert, ","));
    println!("    {:<20}Quit", format!("{}, ctrl+c", kb.picker_keys_joined(PickerAction::Quit, ",")));
    println!();
    println!("PLATFORM: {}/{}", os, arch);
    match Context::resolve() {
        Ok(ctx) => println!("THEMES DIRECTORY: {}", ctx.destination_root.display()),
        Err(err) => println!("THEMES DIRECTORY: unavailable ({})", err),
    }
}

fn print_version() {
    println!("vscode2warp {}", VERSION);
}

fn fail(err: impl std::fmt::Display) -> ! {
    tracing::error!(error = %err, "fatal");
    eprintln!("Error: {}", err);
    process::exit(1);
}

fn handle_list() {
    let ctx = Context::resolve().unwrap_or_else(|e| fail(e));
    let themes = ctx.themes().unwrap_or_else(|e| fail(e));
    for (i, theme) in themes.iter().enumerate() {
        println!("{:>3}. {}", i + 1, theme.display_name);
        println!("     {} • {}", theme.kind.description(), theme.path.display());
    }
}

fn handle_convert(path: &Path) {
    let ctx = Context::resolve().unwrap_or_else(|e| fail(e));
    match convert_theme_file(path, &ctx.destination_root, ctx.settings.overwrite) {
        Ok(converted) => {
            println!("Successfully converted '{}' to a Warp theme!", converted.theme_name);
            println!("Saved to {}", converted.output_path.display());
        }
        Err(err) => fail(err),
    }
}

fn handle_init_config() {
    let Some(path) = Settings::config_path() else {
        fail(ConvertError::HomeDirectoryUnavailable);
    };
    if path.exists() {
        fail(format!("settings file already exists: {}", path.display()));
    }
    if let Err(err) = Settings::default().save() {
        fail(format!("failed to write {}: {}", path.display(), err));
    }
    println!("Wrote default settings to {}", path.display());
}

fn main() -> io::Result<()> {
    logging::init();

    // Handle command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "-h" | "--help" => print_help(),
            "-v" | "--version" => print_version(),
            "--list" => handle_list(),
            "--init-config" => handle_init_config(),
            "--convert" => {
                let Some(path) = args.get(2) else {
                    eprintln!("Error: --convert requires a theme file path");
                    eprintln!("Usage: vscode2warp --convert <PATH>");
                    process::exit(2);
                };
                handle_convert(Path::new(path));
            }
            _ => {
                eprintln!("Unknown option: {}", args[1]);
                eprintln!("Use --help for usage information");
                process::exit(2);
            }
        }
        return Ok(());
    }

    let ctx = Context::resolve().unwrap_or_else(|e| fail(e));
    let themes = ctx.themes().unwrap_or_else(|e| fail(e));
    let kb = Keybindings::from_overrides(&ctx.settings.keybindings);
    let mut state = PickerState::new(themes, ctx.destination_root.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut state, &ctx, &kb);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut PickerState,
    ctx: &Context,
    kb: &Keybindings,
) -> io::Result<()> {
    let theme = Theme::default();
    loop {
        terminal.draw(|f| picker::draw(f, state, &theme, kb))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match picker::handle_input(state, key.code, key.modifiers, kb) {
            Some(PickerCommand::Quit) => return Ok(()),
            Some(PickerCommand::Convert(item)) => {
                let outcome = match convert_theme_file(&item.path, &ctx.destination_root, ctx.settings.overwrite) {
                    Ok(converted) => Outcome::Converted {
                        display_name: item.display_name,
                        output_path: converted.output_path,
                    },
                    Err(err) => {
                        tracing::warn!(error = %err, path = %item.path.display(), "conversion failed");
                        Outcome::Failed(err.to_string())
                    }
                };
                state.outcome = Some(outcome);
            }
            None => {}
        }
    }
}
