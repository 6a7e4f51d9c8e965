//! TacMap Application
//!
//! The editor shell that owns the session, routes input to tools and the
//! viewport, and renders floors; plus the operations behind the `tacmap` CLI.

pub mod commands;
mod config;
mod editor;
mod error;
mod shortcuts;

pub use config::AppConfig;
pub use editor::Editor;
pub use error::{AppError, AppResult};
pub use shortcuts::{Shortcut, ShortcutRegistry};
