pub mod converter;
pub mod platform;
pub mod theme_store;
pub mod vscode;
pub mod warp;
