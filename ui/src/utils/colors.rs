//! Shared color constants for the UI.

use egui::Color32;

/// Forest green for success messages.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red for errors and destructive actions.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Amber for warnings.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);

/// Blue outline of the selected list item.
pub const COLOR_SELECTED: Color32 = Color32::from_rgb(59, 130, 246);
