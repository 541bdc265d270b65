//! The aerial enemy and its bullets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::HitTest;
use super::rect::Rect;
use crate::consts::*;

/// A straight-flying bullet, aimed once at spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rect: Rect,
}

impl Bullet {
    /// Bullet at `origin` heading for `target`
    pub fn new(id: u32, origin: Vec2, target: Vec2) -> Self {
        let delta = target - origin;
        let angle = delta.y.atan2(delta.x);
        Self {
            id,
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * BULLET_SPEED,
            rect: Rect::from_center(origin, BULLET_SIZE, BULLET_SIZE),
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.rect.set_center(self.pos);
    }

    /// Fully off the canvas in any direction
    pub fn is_offscreen(&self) -> bool {
        self.rect.is_outside(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl HitTest for Bullet {
    fn hit_box(&self) -> Option<Rect> {
        Some(self.rect)
    }
}

/// Flying enemy that patrols the top of the screen and shoots at the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerialEnemy {
    pub unlock_score: i64,
    pub active: bool,
    pub rect: Rect,
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub shoot_cooldown: u32,
    /// Frames since the last shot
    pub timer: u32,
}

impl AerialEnemy {
    pub fn new(unlock_score: i64) -> Self {
        Self {
            unlock_score,
            active: false,
            rect: Rect::new(-ENEMY_SIZE, ENEMY_Y, ENEMY_SIZE, ENEMY_SIZE),
            speed: ENEMY_SPEED,
            direction: 1.0,
            shoot_cooldown: ENEMY_SHOOT_COOLDOWN,
            timer: 0,
        }
    }

    /// Advance one frame; returns the point to fire from when a shot is due
    pub fn update(&mut self, score: i64) -> Option<Vec2> {
        let was_active = self.active;
        self.active = score >= self.unlock_score;
        if self.active != was_active {
            log::info!(
                "Aerial enemy {}",
                if self.active { "engaged" } else { "retreated" }
            );
        }
        if !self.active {
            return None;
        }

        self.rect.x += self.speed * self.direction;
        if self.rect.right() >= SCREEN_WIDTH {
            self.direction = -1.0;
        } else if self.rect.left() <= 0.0 {
            self.direction = 1.0;
        }

        self.timer += 1;
        if self.timer >= self.shoot_cooldown {
            self.timer = 0;
            return Some(self.rect.center());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_aims_at_target_once() {
        let mut b = Bullet::new(1, Vec2::new(100.0, 100.0), Vec2::new(100.0, 400.0));
        assert!((b.vel - Vec2::new(0.0, BULLET_SPEED)).length() < 1e-4);
        b.update();
        assert!((b.pos.y - (100.0 + BULLET_SPEED)).abs() < 1e-4);
        assert_eq!(b.rect.center(), b.pos);
    }

    #[test]
    fn test_bullet_offscreen_only_when_fully_out() {
        let mut b = Bullet::new(1, Vec2::new(400.0, SCREEN_HEIGHT), Vec2::new(400.0, 1000.0));
        assert!(!b.is_offscreen());
        for _ in 0..2 {
            b.update();
        }
        assert!(!b.is_offscreen(), "top edge still visible");
        for _ in 0..2 {
            b.update();
        }
        assert!(b.is_offscreen());
    }

    #[test]
    fn test_enemy_gated_by_score() {
        let mut e = AerialEnemy::new(3000);
        let x0 = e.rect.x;
        for _ in 0..500 {
            assert_eq!(e.update(2999), None);
        }
        assert!(!e.active);
        assert_eq!(e.rect.x, x0);
    }

    #[test]
    fn test_enemy_shoots_on_cooldown() {
        let mut e = AerialEnemy::new(0);
        let shots: Vec<_> = (0..ENEMY_SHOOT_COOLDOWN * 3)
            .filter_map(|_| e.update(0))
            .collect();
        assert_eq!(shots.len(), 3);
    }

    #[test]
    fn test_enemy_bounces_between_edges() {
        let mut e = AerialEnemy::new(0);
        let mut seen_left = false;
        for _ in 0..400 {
            e.update(0);
            if e.direction < 0.0 {
                seen_left = true;
                assert!(e.rect.right() <= SCREEN_WIDTH + ENEMY_SPEED);
            }
        }
        assert!(seen_left);
        assert!(e.rect.left() >= -ENEMY_SIZE);
    }
}
