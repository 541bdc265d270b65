//! Coin Catcher - A catch-the-falling-coin arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, hazards, scoring, session state)
//! - `renderer`: Draw-list generation with placeholder geometry
//! - `rules`: Ruleset presets for the two game variants
//! - `assets`: Resource provider contract and skin lookup
//! - `app`: Input handling and fixed-timestep driver

pub mod app;
pub mod assets;
pub mod renderer;
pub mod rules;
pub mod sim;

pub use app::{App, InputEvent, Key};
pub use assets::{AssetCatalog, ImageHandle, ResourceProvider};
pub use rules::{Ruleset, Variant};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (frames per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical canvas
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 200.0;
    pub const PLAYER_SPEED: f32 = 7.0;
    pub const BLOCKING_SPEED: f32 = 2.0;
    pub const GRAVITY: f32 = 0.8;
    pub const JUMP_STRENGTH: f32 = -15.0;
    /// Gap between the sprite bottom and the canvas bottom
    pub const GROUND_MARGIN: f32 = 10.0;
    /// Hit-box shrink factors (fraction of the sprite removed)
    pub const HITBOX_SHRINK_W: f32 = 0.75;
    pub const HITBOX_SHRINK_H: f32 = 0.4;

    /// Shield
    pub const SHIELD_DURATION: u32 = 300;
    pub const SHIELD_WIDTH: f32 = 500.0;
    pub const SHIELD_HEIGHT: f32 = 40.0;
    pub const SHIELD_GAP: f32 = 10.0;

    /// Flash step cooldown (30 seconds)
    pub const FLASH_STEP_COOLDOWN: u32 = 1800;

    /// Coins
    pub const COIN_SPEED: f32 = 5.0;
    pub const NORMAL_COIN_FREQUENCY: u64 = 45;
    pub const PENALTY_COIN_FREQUENCY: u64 = 1;
    pub const COIN_REWARD: i64 = 100;
    pub const MISSED_COIN_PENALTY: i64 = 5;

    /// Session timers
    pub const PENALTY_DURATION: u32 = 300;
    pub const DEATH_DURATION: u32 = 120;

    /// Aerial enemy
    pub const ENEMY_SIZE: f32 = 200.0;
    pub const ENEMY_SPEED: f32 = 4.0;
    pub const ENEMY_Y: f32 = 20.0;
    pub const ENEMY_SHOOT_COOLDOWN: u32 = 120;

    /// Bullets
    pub const BULLET_SIZE: f32 = 24.0;
    pub const BULLET_SPEED: f32 = 6.0;

    /// HUD panel, doubles as the shop toggle hotspot
    pub const HUD_X: f32 = 10.0;
    pub const HUD_Y: f32 = 10.0;
    pub const HUD_WIDTH: f32 = 260.0;
    pub const HUD_HEIGHT: f32 = 140.0;
}

/// Frames to whole seconds, rounded up the way the HUD counts down
#[inline]
pub fn frames_to_seconds(frames: u32) -> u32 {
    frames / consts::SIM_HZ + 1
}
