//! Theme configuration for CANoe Run GUI.

use iced::Color;

/// Status-line accent colors keyed on the controller's status text.
pub mod status {
    use super::Color;

    /// Accent for well-known statuses; `None` keeps the theme default.
    pub fn for_status(status: &str) -> Option<Color> {
        match status {
            "Measurement Running" => Some(Color::from_rgb(0.25, 0.60, 0.25)),
            "Measurement Stopped" | "CANoe Closed" => Some(Color::from_rgb(0.30, 0.50, 0.70)),
            s if s.starts_with("Error:") => Some(Color::from_rgb(0.75, 0.25, 0.25)),
            _ => None,
        }
    }
}

/// Spacing constants.
pub mod spacing {
    /// Extra small spacing (4px)
    pub const XS: f32 = 4.0;
    /// Small spacing (8px)
    pub const SM: f32 = 8.0;
    /// Medium spacing (12px)
    pub const MD: f32 = 12.0;
    /// Large spacing (16px)
    pub const LG: f32 = 16.0;
}

/// Font sizes.
pub mod font {
    /// Normal font size
    pub const NORMAL: f32 = 13.0;
    /// Medium font size
    pub const MD: f32 = 14.0;
}
