//! Color palette for the dashboard.
//!
//! Panels, text and the mind-state ramp all come from here so the graph
//! canvas and the side panels stay visually consistent.

use egui::Color32;

use crate::core::MindState;

/// Background colors for different layers
pub mod bg {
    use super::*;

    /// Main graph area background - darkest layer
    pub const GRAPH: Color32 = Color32::from_rgb(14, 17, 23);

    /// Panel backgrounds - slightly lighter than graph
    pub const PANEL: Color32 = Color32::from_rgb(20, 22, 28);

    /// Card/elevated surface backgrounds
    pub const SURFACE: Color32 = Color32::from_rgb(28, 30, 38);
}

/// Text colors at different emphasis levels
pub mod text {
    use super::*;

    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
    pub const SECONDARY: Color32 = Color32::from_rgb(180, 180, 190);
    pub const MUTED: Color32 = Color32::from_rgb(120, 125, 135);
}

/// Accent colors
pub mod accent {
    use super::*;

    /// Selection highlight
    pub const SELECTED: Color32 = Color32::from_rgb(255, 220, 80);

    /// Hover highlight
    pub const HOVERED: Color32 = Color32::WHITE;

    /// Edge stroke
    pub const EDGE: Color32 = Color32::from_rgb(90, 95, 110);

    /// Sleep histogram bars
    pub const SLEEP: Color32 = Color32::from_rgb(59, 130, 246);

    /// Errors
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
}

/// Diverging ramp for the seven mind states, red through grey to green.
pub fn mind_state_color(state: MindState) -> Color32 {
    match state {
        MindState::Awful => Color32::from_rgb(220, 50, 47),
        MindState::Bad => Color32::from_rgb(235, 100, 60),
        MindState::Low => Color32::from_rgb(230, 160, 80),
        MindState::Neutral => Color32::from_rgb(150, 155, 165),
        MindState::Good => Color32::from_rgb(140, 190, 90),
        MindState::Great => Color32::from_rgb(80, 190, 110),
        MindState::Radiant => Color32::from_rgb(40, 200, 160),
    }
}

/// Node fill for words the aggregator has no data for.
pub const NO_DATA_NODE: Color32 = Color32::from_rgb(70, 74, 85);
