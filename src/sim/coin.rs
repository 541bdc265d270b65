//! Falling coins

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::HitTest;
use super::rect::Rect;
use crate::consts::*;

/// Scoring kind, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinKind {
    /// +100 when caught, -5 when missed
    Normal,
    /// -100 when caught
    Penalty,
}

/// Size tier, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinTier {
    /// Below 100 points
    Small,
    /// 100+ points
    Medium,
    /// 500+ points
    Large,
    /// After surviving penalty mode
    Cleared,
    /// Spawned during penalty mode
    Penalty,
}

impl CoinTier {
    /// Pick the tier for a coin spawned now
    pub fn choose(score: i64, in_penalty_mode: bool, has_cleared_penalty: bool, tiered: bool) -> Self {
        if in_penalty_mode {
            CoinTier::Penalty
        } else if !tiered {
            CoinTier::Small
        } else if has_cleared_penalty {
            CoinTier::Cleared
        } else if score >= 500 {
            CoinTier::Large
        } else if score >= 100 {
            CoinTier::Medium
        } else {
            CoinTier::Small
        }
    }

    pub fn kind(&self) -> CoinKind {
        match self {
            CoinTier::Penalty => CoinKind::Penalty,
            _ => CoinKind::Normal,
        }
    }

    /// Sprite edge length
    pub fn size(&self) -> f32 {
        match self {
            CoinTier::Small => 70.0,
            CoinTier::Medium => 90.0,
            CoinTier::Large => 120.0,
            CoinTier::Cleared => 80.0,
            CoinTier::Penalty => 180.0,
        }
    }

    /// Hit-box edge length; untiered rules use 80% of the sprite
    pub fn hit_size(&self, tiered: bool) -> f32 {
        if !tiered {
            return self.size() * 0.8;
        }
        match self {
            CoinTier::Small => 60.0,
            CoinTier::Medium => 80.0,
            CoinTier::Large => 100.0,
            CoinTier::Cleared => 70.0,
            CoinTier::Penalty => 100.0,
        }
    }

    /// Image looked up in the resource provider
    pub fn asset_name(&self) -> &'static str {
        match self {
            CoinTier::Small | CoinTier::Cleared => "flag",
            CoinTier::Medium => "flag2",
            CoinTier::Large => "player_jump",
            CoinTier::Penalty => "flag3",
        }
    }
}

/// A falling coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub tier: CoinTier,
    pub kind: CoinKind,
    pub rect: Rect,
    pub hit_rect: Rect,
    pub speed: f32,
}

impl Coin {
    /// Coin just above the top edge at `x`
    pub fn new(id: u32, tier: CoinTier, x: f32, tiered: bool) -> Self {
        let size = tier.size();
        let rect = Rect::new(x, -size, size, size);
        let hit = tier.hit_size(tiered);
        Self {
            id,
            tier,
            kind: tier.kind(),
            rect,
            hit_rect: Rect::from_center(rect.center(), hit, hit),
            speed: COIN_SPEED,
        }
    }

    /// Coin at a random column that fits on screen
    pub fn spawn(id: u32, tier: CoinTier, tiered: bool, rng: &mut Pcg32) -> Self {
        let max_x = (SCREEN_WIDTH - tier.size()).max(1.0) as u32;
        let x = rng.random_range(0..max_x) as f32;
        Self::new(id, tier, x, tiered)
    }

    pub fn update(&mut self) {
        self.rect.y += self.speed;
        self.hit_rect.set_center(self.rect.center());
    }
}

impl HitTest for Coin {
    fn hit_box(&self) -> Option<Rect> {
        Some(self.hit_rect)
    }
}
