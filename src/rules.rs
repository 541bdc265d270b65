//! Game rules and variant presets
//!
//! The two shipped variants differ in a handful of collision and shop
//! details. Every such difference is a field here so a session never
//! branches on the variant itself.

use serde::{Deserialize, Serialize};

/// Rule variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Flash step, three cannons, coins ignore guards
    #[default]
    Classic,
    /// Player evolution, tiered coins, guards intercept coins and bullets
    Evolution,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Evolution => "Evolution",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "a" => Some(Variant::Classic),
            "evolution" | "evolved" | "b" => Some(Variant::Evolution),
            _ => None,
        }
    }
}

/// Complete rule set for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub variant: Variant,

    // === Thresholds ===
    /// One laser cannon per entry, unlocked at that score
    pub laser_unlock_scores: Vec<i64>,
    pub spikes_unlock_score: i64,
    pub enemy_unlock_score: i64,
    pub penalty_score: i64,
    /// Score promoting the player to level 2 (None = no evolution)
    pub evolution_score: Option<i64>,

    // === Movement ===
    /// Keep the player hit-box horizontally on screen
    pub clamp_to_screen: bool,

    // === Coins ===
    /// Coin size depends on score and penalty history
    pub tiered_coins: bool,
    /// Shield and block stance swallow coins without scoring
    pub guards_consume_coins: bool,
    /// Missed normal coins still cost points during penalty mode
    pub miss_penalty_in_penalty_mode: bool,

    // === Bullets ===
    /// Shield and block stance destroy bullets on contact
    pub guards_stop_bullets: bool,

    // === Shop ===
    /// Block skill can only be bought once
    pub block_skill_once: bool,
    /// Flash step is offered in the shop
    pub flash_step_in_shop: bool,
    /// First item row, measured from the panel top
    pub shop_first_row: f32,
    /// Distance between item row tops
    pub shop_row_pitch: f32,
    /// Show the block key hint under the shop title
    pub shop_block_hint: bool,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::classic()
    }
}

impl Ruleset {
    /// Flash-step variant
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            laser_unlock_scores: vec![2000, 4000, 6000],
            spikes_unlock_score: 2500,
            enemy_unlock_score: 3000,
            penalty_score: 1500,
            evolution_score: None,
            clamp_to_screen: false,
            tiered_coins: false,
            guards_consume_coins: false,
            miss_penalty_in_penalty_mode: true,
            guards_stop_bullets: false,
            block_skill_once: false,
            flash_step_in_shop: true,
            shop_first_row: 80.0,
            shop_row_pitch: 80.0,
            shop_block_hint: false,
        }
    }

    /// Evolution variant
    pub fn evolution() -> Self {
        Self {
            variant: Variant::Evolution,
            laser_unlock_scores: vec![2000, 4000],
            spikes_unlock_score: 2500,
            enemy_unlock_score: 3000,
            penalty_score: 1500,
            evolution_score: Some(100),
            clamp_to_screen: true,
            tiered_coins: true,
            guards_consume_coins: true,
            miss_penalty_in_penalty_mode: false,
            guards_stop_bullets: true,
            block_skill_once: true,
            flash_step_in_shop: false,
            // Extra room for the block hint under the title
            shop_first_row: 100.0,
            shop_row_pitch: 85.0,
            shop_block_hint: true,
        }
    }

    /// Rules for a preset
    pub fn from_preset(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Evolution => Self::evolution(),
        }
    }

    /// Parse rules from JSON; missing fields take the Classic defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let rules: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded {} ruleset ({} laser cannons)",
            rules.variant.as_str(),
            rules.laser_unlock_scores.len()
        );
        Ok(rules)
    }

    /// Serialize rules to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
