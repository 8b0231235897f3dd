//! CANoe Run GUI - Main entry point
//!
//! Handles configuration loading, logging initialization, and application
//! launch; all behavior lives behind the controller in crg_core.

use std::path::PathBuf;

use crg_core::config::ConfigManager;
use crg_core::logging::init_tracing;

mod app;
mod components;
mod theme;

use app::App;

/// Default config path: .config/settings.toml (relative to current working directory)
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("settings.toml")
}

fn main() -> iced::Result {
    // Load configuration first (read-only; defaults apply when absent)
    let config_path = default_config_path();
    let mut config_manager = ConfigManager::new(&config_path);

    if let Err(e) = config_manager.load_if_present() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let settings = config_manager.settings().clone();
    init_tracing(settings.logging.level);

    tracing::info!("CANoe Run GUI starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", crg_core::version());

    iced::application(move || App::new(settings.clone()), App::update, App::view)
        .title(App::title)
        .window_size(iced::Size::new(720.0, 640.0))
        .run()
}
