//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, monotonic ids)
//! - No rendering or platform dependencies

pub mod coin;
pub mod collision;
pub mod enemy;
pub mod hazard;
pub mod player;
pub mod rect;
pub mod selector;
pub mod shop;
pub mod state;
pub mod tick;

pub use coin::{Coin, CoinKind, CoinTier};
pub use collision::{BulletOutcome, CoinOutcome, HitTest, beam_hits, resolve_bullet, resolve_coin};
pub use enemy::{AerialEnemy, Bullet};
pub use hazard::{CycleTimings, GroundSpikes, Hazard, HazardCycle, HazardPhase, LaserCannon};
pub use player::{Controls, Player, PlayerForm};
pub use rect::Rect;
pub use selector::CharacterSelector;
pub use shop::{ItemKind, PurchaseError, Shop, ShopClick};
pub use state::{GameEvent, GameState};
pub use tick::{HUD_RECT, TickInput, tick};
