use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_CAP;
use crate::model::{self, Color};
use crate::tray::DEFAULT_HIDE_DELAY;

/// Host-tunable knobs plus the state remembered between runs. Every field
/// defaults individually, so a settings file from an older build keeps
/// working when fields are added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoodleSettings {
    /// Colour the surface is filled with on mount and on clear.
    #[serde(default = "default_background")]
    pub background: Color,
    /// Snapshot retention for undo.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Quiet period before the action tray hides, in milliseconds.
    #[serde(default = "default_tray_hide_delay_ms")]
    pub tray_hide_delay_ms: u64,
    /// Colour selected when the app was last closed.
    #[serde(default = "default_last_color")]
    pub last_color: Color,
    /// Brush width selected when the app was last closed.
    #[serde(default = "default_last_width")]
    pub last_width: u32,
    /// Swatches offered by the colour picker.
    #[serde(default = "default_quick_colors")]
    pub quick_colors: Vec<Color>,
    /// Widths offered by the size picker.
    #[serde(default = "default_brush_widths")]
    pub brush_widths: Vec<u32>,
    /// Where share fallbacks land. `None` means the platform download folder.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// When enabled `logging::init_from_settings` starts the logger at debug
    /// level. Defaults to `false` when the field is missing.
    #[serde(default)]
    pub debug_logging: bool,
}

impl DoodleSettings {
    pub fn tray_hide_delay(&self) -> Duration {
        Duration::from_millis(self.tray_hide_delay_ms)
    }
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

fn default_tray_hide_delay_ms() -> u64 {
    DEFAULT_HIDE_DELAY.as_millis() as u64
}

fn default_last_color() -> Color {
    model::DEFAULT_COLOR
}

fn default_last_width() -> u32 {
    model::DEFAULT_WIDTH
}

fn default_quick_colors() -> Vec<Color> {
    model::PALETTE.iter().map(|entry| entry.color).collect()
}

fn default_brush_widths() -> Vec<u32> {
    model::BRUSH_WIDTHS.to_vec()
}

impl Default for DoodleSettings {
    fn default() -> Self {
        Self {
            background: default_background(),
            history_cap: default_history_cap(),
            tray_hide_delay_ms: default_tray_hide_delay_ms(),
            last_color: default_last_color(),
            last_width: default_last_width(),
            quick_colors: default_quick_colors(),
            brush_widths: default_brush_widths(),
            download_dir: None,
            debug_logging: false,
        }
    }
}
