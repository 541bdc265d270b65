//! Collision rules between the player and everything that can touch it
//!
//! All tests are axis-aligned. The interesting part is precedence: guards
//! (shield, block stance) are checked before the body, so a coin or bullet
//! that touches both is swallowed rather than scored.

use super::coin::Coin;
use super::enemy::Bullet;
use super::player::Player;
use super::rect::Rect;
use crate::consts::*;
use crate::rules::Ruleset;

/// Anything with a collision rect
///
/// `None` means the entity currently takes no part in collisions
/// (an idle hazard, an inactive enemy).
pub trait HitTest {
    fn hit_box(&self) -> Option<Rect>;

    fn hits(&self, target: &Rect) -> bool {
        self.hit_box().is_some_and(|b| b.intersects(target))
    }
}

/// What happened to a coin this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinOutcome {
    /// Still falling, untouched
    Falling,
    /// Fell past the bottom edge
    Missed,
    /// Swallowed by the shield
    Shielded,
    /// Swallowed by the block stance
    Blocked,
    /// Touched the player's body
    Collected,
}

impl CoinOutcome {
    /// Whether the coin leaves play
    pub fn consumes(&self) -> bool {
        !matches!(self, CoinOutcome::Falling)
    }
}

/// What happened to a bullet this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOutcome {
    /// No contact (or harmless contact while blocking)
    Clear,
    /// Destroyed by the shield
    Shielded,
    /// Destroyed by the block stance
    Blocked,
    /// Lethal hit
    Hit,
}

/// Resolve one coin against the player, off-screen check first
pub fn resolve_coin(coin: &Coin, player: &Player, rules: &Ruleset) -> CoinOutcome {
    if coin.rect.top() > SCREEN_HEIGHT {
        return CoinOutcome::Missed;
    }
    let Some(target) = coin.hit_box() else {
        return CoinOutcome::Falling;
    };
    if rules.guards_consume_coins {
        if player.shield.hits(&target) {
            return CoinOutcome::Shielded;
        }
        if player.is_blocking && player.hits(&target) {
            return CoinOutcome::Blocked;
        }
    }
    if player.hits(&target) {
        return CoinOutcome::Collected;
    }
    CoinOutcome::Falling
}

/// Resolve one bullet against the player
pub fn resolve_bullet(bullet: &Bullet, player: &Player, rules: &Ruleset) -> BulletOutcome {
    let Some(target) = bullet.hit_box() else {
        return BulletOutcome::Clear;
    };
    if rules.guards_stop_bullets {
        if player.shield.hits(&target) {
            return BulletOutcome::Shielded;
        }
        if player.is_blocking && player.hits(&target) {
            return BulletOutcome::Blocked;
        }
    }
    if player.hits(&target) && !player.is_blocking {
        return BulletOutcome::Hit;
    }
    BulletOutcome::Clear
}

/// Beam test with shield negation
///
/// A raised shield touching the beam absorbs it entirely, even if the beam
/// also overlaps the player's body.
pub fn beam_hits(beam: &Rect, target: &Rect, shield: Option<Rect>) -> bool {
    if shield.is_some_and(|s| s.intersects(beam)) {
        return false;
    }
    beam.intersects(target)
}
