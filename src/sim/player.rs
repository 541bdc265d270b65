//! The player character: movement, jumping, shield, block stance and flash step

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::HitTest;
use super::rect::Rect;
use crate::consts::*;

/// Visual form of the player, selects the skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerForm {
    /// Level 1
    #[default]
    Normal,
    /// Level 2 (promoted by score)
    Evolved,
    /// Penalty mode skin, overrides the level
    Penalty,
}

/// Held movement controls for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub block: bool,
}

/// Energy shield floating above the player's head
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub active: bool,
    /// Frames remaining while active
    pub timer: u32,
    pub duration: u32,
    pub rect: Rect,
}

impl Default for Shield {
    fn default() -> Self {
        Self {
            active: false,
            timer: 0,
            duration: SHIELD_DURATION,
            rect: Rect::new(0.0, 0.0, SHIELD_WIDTH, SHIELD_HEIGHT),
        }
    }
}

impl Shield {
    /// Rect only while raised
    pub fn active_rect(&self) -> Option<Rect> {
        self.active.then_some(self.rect)
    }

    fn follow(&mut self, sprite: &Rect) {
        self.rect.set_center_x(sprite.center_x());
        self.rect.set_bottom(sprite.top() - SHIELD_GAP);
    }
}

/// Teleport ability cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashStep {
    /// Frames until ready again
    pub timer: u32,
    pub cooldown: u32,
}

impl Default for FlashStep {
    fn default() -> Self {
        Self {
            timer: 0,
            cooldown: FLASH_STEP_COOLDOWN,
        }
    }
}

impl FlashStep {
    pub fn is_ready(&self) -> bool {
        self.timer == 0
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Skin chosen in the character selector
    pub base_skin: String,
    /// Full sprite rect
    pub rect: Rect,
    /// Reduced collision rect, centered on the sprite
    pub hit_rect: Rect,
    pub velocity_y: f32,
    pub speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
    pub ground_y: f32,
    pub is_jumping: bool,
    pub is_blocking: bool,
    pub level: u8,
    pub form: PlayerForm,
    pub shield: Shield,
    pub flash: FlashStep,
}

impl Player {
    pub fn new(base_skin: impl Into<String>) -> Self {
        let mut rect = Rect::new(0.0, 0.0, PLAYER_SIZE, PLAYER_SIZE);
        rect.set_center_x(SCREEN_WIDTH / 2.0);
        rect.set_bottom(SCREEN_HEIGHT - GROUND_MARGIN);

        Self {
            base_skin: base_skin.into(),
            rect,
            hit_rect: hitbox_for(&rect),
            velocity_y: 0.0,
            speed: PLAYER_SPEED,
            jump_strength: JUMP_STRENGTH,
            gravity: GRAVITY,
            ground_y: rect.bottom(),
            is_jumping: false,
            is_blocking: false,
            level: 1,
            form: PlayerForm::Normal,
            shield: Shield::default(),
            flash: FlashStep::default(),
        }
    }

    /// Skin name for the standing pose
    pub fn idle_skin(&self) -> String {
        match self.form {
            PlayerForm::Normal => self.base_skin.clone(),
            PlayerForm::Evolved | PlayerForm::Penalty => format!("{}2", self.base_skin),
        }
    }

    /// Skin name for the jumping pose
    pub fn jump_skin(&self) -> String {
        format!("{}_jump", self.idle_skin())
    }

    /// Skin name for the current pose
    pub fn current_skin(&self) -> String {
        if self.is_jumping {
            self.jump_skin()
        } else {
            self.idle_skin()
        }
    }

    /// Re-derive the form after a level or mode change and rebuild the hit-box
    pub fn refresh_form(&mut self, in_penalty_mode: bool) {
        self.form = if in_penalty_mode {
            PlayerForm::Penalty
        } else if self.level >= 2 {
            PlayerForm::Evolved
        } else {
            PlayerForm::Normal
        };

        let center = self.rect.center();
        self.rect = Rect::from_center(center, PLAYER_SIZE, PLAYER_SIZE);
        self.hit_rect = hitbox_for(&self.rect);
        log::debug!("Player form -> {:?} (skin {})", self.form, self.idle_skin());
    }

    /// Start a jump; fails mid-air or while blocking
    pub fn jump(&mut self) -> bool {
        if self.is_jumping || self.is_blocking {
            return false;
        }
        self.velocity_y = self.jump_strength;
        self.is_jumping = true;
        true
    }

    /// Raise the shield, consuming one charge
    pub fn activate_shield(&mut self, charges: &mut u32) -> bool {
        if *charges == 0 || self.shield.active {
            return false;
        }
        *charges -= 1;
        self.shield.active = true;
        self.shield.timer = self.shield.duration;
        self.shield.follow(&self.rect);
        true
    }

    /// Teleport the sprite center to `target`, never below the ground
    pub fn flash_step(&mut self, owned: bool, target: Vec2) -> bool {
        if !owned || !self.flash.is_ready() {
            return false;
        }
        self.rect.set_center(target);
        if self.rect.bottom() > self.ground_y {
            self.rect.set_bottom(self.ground_y);
        }
        self.hit_rect.set_center(self.rect.center());
        self.flash.timer = self.flash.cooldown;
        true
    }

    /// Per-frame movement and physics
    pub fn update(&mut self, controls: Controls, has_block_skill: bool, clamp_to_screen: bool) {
        self.is_blocking = controls.block && has_block_skill;
        let move_speed = if self.is_blocking {
            BLOCKING_SPEED
        } else {
            self.speed
        };
        if controls.left {
            self.rect.x -= move_speed;
        }
        if controls.right {
            self.rect.x += move_speed;
        }

        self.flash.timer = self.flash.timer.saturating_sub(1);

        self.velocity_y += self.gravity;
        self.rect.y += self.velocity_y;
        if self.rect.bottom() >= self.ground_y {
            self.rect.set_bottom(self.ground_y);
            self.velocity_y = 0.0;
            self.is_jumping = false;
        }

        if self.shield.active {
            self.shield.follow(&self.rect);
            self.shield.timer = self.shield.timer.saturating_sub(1);
            if self.shield.timer == 0 {
                self.shield.active = false;
            }
        }

        self.hit_rect.set_center(self.rect.center());

        if clamp_to_screen {
            if self.hit_rect.left() < 0.0 {
                self.rect.x -= self.hit_rect.left();
                self.hit_rect.set_left(0.0);
            }
            if self.hit_rect.right() > SCREEN_WIDTH {
                self.rect.x -= self.hit_rect.right() - SCREEN_WIDTH;
                self.hit_rect.set_right(SCREEN_WIDTH);
            }
        }
    }
}

impl HitTest for Shield {
    fn hit_box(&self) -> Option<Rect> {
        self.active_rect()
    }
}

impl HitTest for Player {
    fn hit_box(&self) -> Option<Rect> {
        Some(self.hit_rect)
    }
}

fn hitbox_for(sprite: &Rect) -> Rect {
    sprite.inflate(-sprite.w * HITBOX_SHRINK_W, -sprite.h * HITBOX_SHRINK_H)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> Player {
        Player::new("player")
    }

    #[test]
    fn test_spawn_position_and_hitbox() {
        let p = grounded();
        assert_eq!(p.rect.center_x(), SCREEN_WIDTH / 2.0);
        assert_eq!(p.rect.bottom(), SCREEN_HEIGHT - GROUND_MARGIN);
        assert_eq!(p.hit_rect.w, 50.0);
        assert_eq!(p.hit_rect.h, 120.0);
        assert_eq!(p.hit_rect.center(), p.rect.center());
    }

    #[test]
    fn test_jump_and_land() {
        let mut p = grounded();
        assert!(p.jump());
        assert!(!p.jump(), "no double jump");
        assert_eq!(p.current_skin(), "player_jump");

        let mut frames = 0;
        while p.is_jumping {
            p.update(Controls::default(), false, false);
            frames += 1;
            assert!(frames < 100, "player never landed");
        }
        assert_eq!(p.rect.bottom(), p.ground_y);
        assert_eq!(p.velocity_y, 0.0);
        assert_eq!(p.current_skin(), "player");
    }

    #[test]
    fn test_blocking_slows_and_prevents_jump() {
        let mut p = grounded();
        let x0 = p.rect.x;
        let controls = Controls {
            right: true,
            block: true,
            ..Default::default()
        };
        p.update(controls, true, false);
        assert!(p.is_blocking);
        assert_eq!(p.rect.x - x0, BLOCKING_SPEED);
        assert!(!p.jump());

        // Without the skill the block key does nothing
        p.update(controls, false, false);
        assert!(!p.is_blocking);
    }

    #[test]
    fn test_shield_consumes_charge_and_expires() {
        let mut p = grounded();
        let mut charges = 0;
        assert!(!p.activate_shield(&mut charges));

        charges = 2;
        assert!(p.activate_shield(&mut charges));
        assert_eq!(charges, 1);
        assert!(!p.activate_shield(&mut charges), "already active");
        assert_eq!(charges, 1);
        assert_eq!(p.shield.timer, SHIELD_DURATION);
        assert_eq!(p.shield.rect.bottom(), p.rect.top() - SHIELD_GAP);
        assert_eq!(p.shield.rect.center_x(), p.rect.center_x());

        for _ in 0..SHIELD_DURATION {
            p.update(Controls::default(), false, false);
        }
        assert!(!p.shield.active);
    }

    #[test]
    fn test_flash_step_clamps_to_ground_and_cools_down() {
        let mut p = grounded();
        assert!(!p.flash_step(false, Vec2::new(100.0, 100.0)));

        assert!(p.flash_step(true, Vec2::new(100.0, 580.0)));
        assert_eq!(p.rect.center_x(), 100.0);
        assert_eq!(p.rect.bottom(), p.ground_y);
        assert_eq!(p.flash.timer, FLASH_STEP_COOLDOWN);
        assert!(!p.flash_step(true, Vec2::new(400.0, 300.0)));

        for _ in 0..FLASH_STEP_COOLDOWN {
            p.update(Controls::default(), false, false);
        }
        assert!(p.flash.is_ready());
    }

    #[test]
    fn test_clamp_keeps_hitbox_on_screen() {
        let mut p = grounded();
        p.rect.x = -200.0;
        p.update(Controls::default(), false, true);
        assert_eq!(p.hit_rect.left(), 0.0);
        assert_eq!(p.hit_rect.center(), p.rect.center());

        let mut free = grounded();
        free.rect.x = -200.0;
        free.update(Controls::default(), false, false);
        assert!(free.hit_rect.left() < 0.0);
    }

    #[test]
    fn test_refresh_form_skins() {
        let mut p = Player::new("player2");
        p.level = 2;
        p.refresh_form(false);
        assert_eq!(p.form, PlayerForm::Evolved);
        assert_eq!(p.idle_skin(), "player22");
        assert_eq!(p.jump_skin(), "player22_jump");

        p.level = 1;
        p.refresh_form(true);
        assert_eq!(p.form, PlayerForm::Penalty);
        p.refresh_form(false);
        assert_eq!(p.idle_skin(), "player2");
    }
}
