//! Pre-game character selection screen

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Skins offered on the selection screen
pub const CHARACTER_OPTIONS: [&str; 2] = ["player", "player2"];
pub const START_BUTTON: Rect = Rect::new(300.0, 500.0, 200.0, 60.0);

/// One-time skin picker shown before the first session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSelector {
    pub options: Vec<String>,
    pub selected: usize,
    /// Cleared once START is pressed
    pub is_active: bool,
}

impl Default for CharacterSelector {
    fn default() -> Self {
        Self {
            options: CHARACTER_OPTIONS.iter().map(|s| s.to_string()).collect(),
            selected: 0,
            is_active: true,
        }
    }
}

impl CharacterSelector {
    /// Card rect for option `index`
    pub fn option_rect(index: usize) -> Rect {
        Rect::new(150.0 + index as f32 * 300.0, 250.0, 200.0, 200.0)
    }

    pub fn selected_base(&self) -> &str {
        self.options
            .get(self.selected)
            .map_or(CHARACTER_OPTIONS[0], String::as_str)
    }

    /// Pick a card or press START; returns true when the game should begin
    pub fn handle_click(&mut self, pos: Vec2) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(index) =
            (0..self.options.len()).find(|&i| Self::option_rect(i).contains_point(pos))
        {
            self.selected = index;
            log::debug!("Selected character {}", self.options[index]);
            return false;
        }
        if START_BUTTON.contains_point(pos) {
            self.is_active = false;
            log::info!("Starting as {}", self.selected_base());
            return true;
        }
        false
    }
}
