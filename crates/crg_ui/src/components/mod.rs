//! Reusable widgets for the main window.

pub mod file_input;
pub mod log_view;

pub use file_input::FileInput;
pub use log_view::LogViewer;
