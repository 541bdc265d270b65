//! Fixed timestep simulation tick
//!
//! Advances one session frame. The order inside a frame is fixed:
//! input one-shots, evolution check, hazard ticks, enemy tick,
//! hazard/bullet collisions, entity motion, coin spawn, coin resolution.

use glam::Vec2;

use super::coin::{Coin, CoinKind, CoinTier};
use super::collision::{BulletOutcome, CoinOutcome, resolve_bullet, resolve_coin};
use super::enemy::Bullet;
use super::player::Controls;
use super::rect::Rect;
use super::shop::ShopClick;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Shop hotspot over the HUD panel
pub const HUD_RECT: Rect = Rect::new(HUD_X, HUD_Y, HUD_WIDTH, HUD_HEIGHT);

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: move left
    pub left: bool,
    /// Held: move right
    pub right: bool,
    /// Held: block stance (needs the block skill)
    pub block: bool,
    /// One-shot: jump
    pub jump: bool,
    /// One-shot: raise the shield
    pub shield: bool,
    /// One-shot: teleport to `pointer`
    pub flash_step: bool,
    /// Pointer position in canvas coordinates
    pub pointer: Vec2,
    /// Clicks since the last tick, oldest first
    pub clicks: Vec<Vec2>,
}

impl TickInput {
    fn controls(&self) -> Controls {
        Controls {
            left: self.left,
            right: self.right,
            block: self.block,
        }
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    // Dead: only the countdown runs, input is ignored
    if state.is_dead {
        state.death_timer = state.death_timer.saturating_sub(1);
        if state.death_timer == 0 {
            state.reset();
        }
        return;
    }

    apply_actions(state, input);
    if state.shop.is_open {
        return;
    }

    update_progression(state);
    if state.is_dead {
        return;
    }

    for hazard in &mut state.hazards {
        hazard.tick(state.score, &mut state.rng);
    }
    if let Some(origin) = state.enemy.update(state.score) {
        let id = state.next_entity_id();
        state
            .bullets
            .push(Bullet::new(id, origin, state.player.hit_rect.center()));
        log::debug!("Enemy fired bullet {id}");
    }

    check_hazard_hits(state);
    check_bullet_hits(state);
    // Nothing moves, spawns or scores on the frame of death
    if state.is_dead {
        return;
    }

    state.player.update(
        input.controls(),
        state.shop.has_block_skill,
        state.rules.clamp_to_screen,
    );
    for coin in &mut state.coins {
        coin.update();
    }
    for bullet in &mut state.bullets {
        bullet.update();
    }
    state.bullets.retain(|b| !b.is_offscreen());

    spawn_coins(state);
    resolve_coins(state);
}

/// Keys and clicks queued since the last frame
fn apply_actions(state: &mut GameState, input: &TickInput) {
    if input.jump && state.player.jump() {
        state.events.push(GameEvent::Jumped);
    }
    if input.shield && state.player.activate_shield(&mut state.shop.shield_count) {
        state.events.push(GameEvent::ShieldRaised);
    }
    if input.flash_step
        && state
            .player
            .flash_step(state.shop.has_flash_step, input.pointer)
    {
        state.events.push(GameEvent::FlashStepped);
    }

    for &click in &input.clicks {
        if HUD_RECT.contains_point(click) {
            state.shop.toggle();
            state.events.push(GameEvent::ShopToggled {
                open: state.shop.is_open,
            });
            continue;
        }
        match state
            .shop
            .handle_click(click, &mut state.score, &mut state.player)
        {
            ShopClick::Purchased(item) => state.events.push(GameEvent::Purchased(item)),
            ShopClick::Closed => state.events.push(GameEvent::ShopToggled { open: false }),
            ShopClick::Ignored | ShopClick::Rejected(_) => {}
        }
    }
}

/// Death, penalty mode and evolution, evaluated from the current score
fn update_progression(state: &mut GameState) {
    if state.score < 0 {
        state.trigger_death();
    }

    if state.score >= state.rules.penalty_score
        && !state.in_penalty_mode
        && !state.has_cleared_penalty
    {
        state.in_penalty_mode = true;
        state.penalty_timer = PENALTY_DURATION;
        state.player.refresh_form(true);
        state.events.push(GameEvent::PenaltyStarted);
        log::info!("Penalty mode for {PENALTY_DURATION} frames");
    } else if state.in_penalty_mode {
        state.penalty_timer = state.penalty_timer.saturating_sub(1);
        if state.penalty_timer == 0 {
            state.in_penalty_mode = false;
            state.has_cleared_penalty = true;
            state.player.level = 1;
            state.player.refresh_form(false);
            state.events.push(GameEvent::PenaltyCleared);
            log::info!("Penalty mode cleared");
        }
    }

    if let Some(threshold) = state.rules.evolution_score
        && !state.in_penalty_mode
        && !state.is_dead
        && state.player.level == 1
        && state.score >= threshold
    {
        state.player.level = 2;
        state.player.refresh_form(false);
        state.events.push(GameEvent::Evolved);
        log::info!("Player evolved at {} credits", state.score);
    }
}

fn check_hazard_hits(state: &mut GameState) {
    let shield = state.shield_rect();
    let hit = state
        .hazards
        .iter()
        .any(|h| h.check_collision(&state.player.hit_rect, shield));
    if hit {
        state.trigger_death();
    }
}

fn check_bullet_hits(state: &mut GameState) {
    let mut hit = false;
    let mut stopped = 0;
    state.bullets.retain(|bullet| {
        match resolve_bullet(bullet, &state.player, &state.rules) {
            BulletOutcome::Shielded | BulletOutcome::Blocked => {
                stopped += 1;
                return false;
            }
            BulletOutcome::Hit => hit = true,
            BulletOutcome::Clear => {}
        }
        true
    });
    for _ in 0..stopped {
        state.events.push(GameEvent::BulletStopped);
    }
    if hit {
        state.trigger_death();
    }
}

fn spawn_coins(state: &mut GameState) {
    state.coin_counter += 1;
    let frequency = if state.in_penalty_mode {
        PENALTY_COIN_FREQUENCY
    } else {
        NORMAL_COIN_FREQUENCY
    };
    if state.coin_counter % frequency != 0 {
        return;
    }

    let tiered = state.rules.tiered_coins;
    let tier = CoinTier::choose(
        state.score,
        state.in_penalty_mode,
        state.has_cleared_penalty,
        tiered,
    );
    let id = state.next_entity_id();
    let coin = Coin::spawn(id, tier, tiered, &mut state.rng);
    log::debug!("Spawned {:?} coin {id} at x={}", tier, coin.rect.x);
    state.coins.push(coin);
}

/// Score every coin against the player; consumed coins leave play for good
fn resolve_coins(state: &mut GameState) {
    let coins = std::mem::take(&mut state.coins);
    let mut live = Vec::with_capacity(coins.len());

    for coin in coins {
        let outcome = resolve_coin(&coin, &state.player, &state.rules);
        match outcome {
            CoinOutcome::Falling => {}
            CoinOutcome::Missed => {
                let penalize = coin.kind == CoinKind::Normal
                    && (!state.in_penalty_mode || state.rules.miss_penalty_in_penalty_mode);
                let penalty = if penalize { MISSED_COIN_PENALTY } else { 0 };
                state.score -= penalty;
                state.events.push(GameEvent::CoinMissed {
                    kind: coin.kind,
                    penalty,
                });
            }
            CoinOutcome::Shielded | CoinOutcome::Blocked => {
                state.events.push(GameEvent::CoinGuarded);
            }
            CoinOutcome::Collected => {
                let value = match coin.kind {
                    CoinKind::Normal if state.shop.double_score_active => COIN_REWARD * 2,
                    CoinKind::Normal => COIN_REWARD,
                    CoinKind::Penalty => -COIN_REWARD,
                };
                state.score += value;
                state.events.push(GameEvent::CoinCollected {
                    kind: coin.kind,
                    value,
                });
            }
        }
        if !outcome.consumes() {
            live.push(coin);
        }
    }
    state.coins = live;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Ruleset;
    use crate::sim::hazard::{Hazard, HazardPhase};
    use crate::sim::player::PlayerForm;
    use crate::sim::shop::{ItemKind, SHOP_CLOSE_BUTTON};

    fn classic() -> GameState {
        GameState::new(12345, Ruleset::classic(), "player")
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn click(pos: Vec2) -> TickInput {
        TickInput {
            clicks: vec![pos],
            ..Default::default()
        }
    }

    /// Coin whose hit-box sits on the player's hit-box center
    fn coin_on_player(state: &mut GameState, tier: CoinTier) -> u32 {
        let id = state.next_entity_id();
        let mut coin = Coin::new(id, tier, 0.0, state.rules.tiered_coins);
        let center = state.player.hit_rect.center();
        coin.rect.set_center(center);
        coin.hit_rect.set_center(center);
        state.coins.push(coin);
        id
    }

    #[test]
    fn test_tick_collect_coin() {
        let mut state = classic();
        let id = coin_on_player(&mut state, CoinTier::Small);
        tick(&mut state, &idle());

        assert_eq!(state.score, COIN_REWARD);
        assert!(state.coins.iter().all(|c| c.id != id));
        assert!(state.events.contains(&GameEvent::CoinCollected {
            kind: CoinKind::Normal,
            value: COIN_REWARD,
        }));

        // Gone for good
        tick(&mut state, &idle());
        assert_eq!(state.score, COIN_REWARD);
    }

    #[test]
    fn test_penalty_coin_costs() {
        let mut state = classic();
        state.score = 300;
        coin_on_player(&mut state, CoinTier::Penalty);
        tick(&mut state, &idle());
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_double_score() {
        let mut state = classic();
        state.shop.double_score_active = true;
        coin_on_player(&mut state, CoinTier::Small);
        tick(&mut state, &idle());
        assert_eq!(state.score, 2 * COIN_REWARD);
    }

    #[test]
    fn test_missed_coin_penalty() {
        let mut state = classic();
        state.score = 10;
        let id = state.next_entity_id();
        let mut coin = Coin::new(id, CoinTier::Small, 0.0, false);
        coin.rect.y = SCREEN_HEIGHT;
        state.coins.push(coin);
        tick(&mut state, &idle());
        assert_eq!(state.score, 10 - MISSED_COIN_PENALTY);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_missed_coin_free_during_penalty_mode() {
        let mut state = GameState::new(1, Ruleset::evolution(), "player");
        state.score = 1500;
        tick(&mut state, &idle());
        assert!(state.in_penalty_mode);
        state.coins.clear();

        let id = state.next_entity_id();
        let mut coin = Coin::new(id, CoinTier::Small, 0.0, true);
        coin.rect.y = SCREEN_HEIGHT;
        state.coins.push(coin);
        tick(&mut state, &idle());
        assert_eq!(state.score, 1500);
    }

    #[test]
    fn test_penalty_scenario() {
        let mut state = classic();
        coin_on_player(&mut state, CoinTier::Small);
        tick(&mut state, &idle());
        assert_eq!(state.score, 100);

        state.score = 1500;
        tick(&mut state, &idle());
        assert!(state.in_penalty_mode);
        assert_eq!(state.penalty_timer, PENALTY_DURATION);
        assert_eq!(state.player.form, PlayerForm::Penalty);
        assert!(state.events.contains(&GameEvent::PenaltyStarted));

        for _ in 0..PENALTY_DURATION - 1 {
            state.coins.clear();
            tick(&mut state, &idle());
            assert!(state.in_penalty_mode);
        }
        state.coins.clear();
        tick(&mut state, &idle());
        assert!(!state.in_penalty_mode);
        assert!(state.has_cleared_penalty);
        assert_eq!(state.player.form, PlayerForm::Normal);

        // Once per session
        state.coins.clear();
        tick(&mut state, &idle());
        assert!(!state.in_penalty_mode);
    }

    #[test]
    fn test_penalty_mode_spawns_every_frame() {
        let mut state = classic();
        state.score = 1500;
        tick(&mut state, &idle());
        let before = state.coins.len();
        tick(&mut state, &idle());
        assert_eq!(state.coins.len(), before + 1);
        assert_eq!(state.coins.last().map(|c| c.kind), Some(CoinKind::Penalty));
    }

    #[test]
    fn test_normal_spawn_cadence() {
        let mut state = classic();
        for _ in 0..NORMAL_COIN_FREQUENCY - 1 {
            tick(&mut state, &idle());
        }
        assert!(state.coins.is_empty());
        tick(&mut state, &idle());
        assert_eq!(state.coins.len(), 1);
    }

    #[test]
    fn test_death_scenario() {
        let mut state = classic();
        state.score = -1;
        tick(&mut state, &idle());
        assert!(state.is_dead);
        assert_eq!(state.death_timer, DEATH_DURATION);

        let mut last = state.death_timer;
        for _ in 0..DEATH_DURATION - 1 {
            tick(&mut state, &idle());
            assert!(state.is_dead);
            assert!(state.death_timer < last);
            last = state.death_timer;
        }
        tick(&mut state, &idle());
        assert!(!state.is_dead);
        assert_eq!(state.score, 0);
        assert!(state.coins.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.events.contains(&GameEvent::Reset));
    }

    #[test]
    fn test_death_frame_freezes_world() {
        let mut state = classic();
        state.score = -1;
        state.coin_counter = NORMAL_COIN_FREQUENCY - 1;
        coin_on_player(&mut state, CoinTier::Small);
        let x = state.player.rect.x;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right);

        assert!(state.is_dead);
        assert_eq!(state.score, -1);
        assert_eq!(state.coin_counter, NORMAL_COIN_FREQUENCY - 1);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.player.rect.x, x);
        assert_eq!(state.events, vec![GameEvent::Died]);
    }

    #[test]
    fn test_hazard_death_stops_scoring() {
        let mut state = classic();
        state.score = 2000;
        state.has_cleared_penalty = true;
        coin_on_player(&mut state, CoinTier::Small);
        if let Hazard::Laser(laser) = &mut state.hazards[0] {
            laser.active = true;
            laser.x = state.player.hit_rect.center_x() - laser.width / 2.0;
            laser.cycle.force(HazardPhase::Active);
        }
        tick(&mut state, &idle());
        assert!(state.is_dead);
        assert_eq!(state.score, 2000);
        assert_eq!(state.coins.len(), 1);
    }

    #[test]
    fn test_input_ignored_while_dead() {
        let mut state = classic();
        state.trigger_death();
        let input = TickInput {
            jump: true,
            clicks: vec![HUD_RECT.center()],
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(!state.player.is_jumping);
        assert!(!state.shop.is_open);
    }

    #[test]
    fn test_shield_scenario() {
        let mut state = classic();
        state.score = 1000;
        state.has_cleared_penalty = true;

        tick(&mut state, &click(HUD_RECT.center()));
        assert!(state.shop.is_open);
        let row = state.shop.item_rect(2).center();
        tick(&mut state, &click(row));
        assert_eq!(state.shop.shield_count, 1);
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::Purchased(ItemKind::Shield)));
        tick(&mut state, &click(SHOP_CLOSE_BUTTON.center()));
        assert!(!state.shop.is_open);

        state.score = 2000;
        let raise = TickInput {
            shield: true,
            ..Default::default()
        };
        tick(&mut state, &raise);
        assert_eq!(state.shop.shield_count, 0);
        assert!(state.player.shield.active);
        // Counted down once by this frame's motion step
        assert_eq!(state.player.shield.timer, SHIELD_DURATION - 1);

        // Firing laser straight through the player
        if let Hazard::Laser(laser) = &mut state.hazards[0] {
            laser.x = state.player.hit_rect.center_x() - laser.width / 2.0;
            laser.cycle.force(HazardPhase::Active);
        }
        tick(&mut state, &idle());
        assert!(!state.is_dead, "shield absorbs the beam");

        state.player.shield.active = false;
        tick(&mut state, &idle());
        assert!(state.is_dead);
    }

    #[test]
    fn test_shop_freezes_world() {
        let mut state = classic();
        coin_on_player(&mut state, CoinTier::Small);
        tick(&mut state, &click(HUD_RECT.center()));
        assert!(state.shop.is_open);

        let counter = state.coin_counter;
        let y = state.coins[0].rect.y;
        let held = TickInput {
            right: true,
            ..Default::default()
        };
        let x = state.player.rect.x;
        for _ in 0..100 {
            tick(&mut state, &held);
        }
        assert_eq!(state.coin_counter, counter);
        assert_eq!(state.coins[0].rect.y, y);
        assert_eq!(state.player.rect.x, x);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_evolution_only_with_rule() {
        let mut state = GameState::new(1, Ruleset::evolution(), "player");
        state.score = 100;
        tick(&mut state, &idle());
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.form, PlayerForm::Evolved);
        assert!(state.events.contains(&GameEvent::Evolved));

        let mut classic = classic();
        classic.score = 100;
        tick(&mut classic, &idle());
        assert_eq!(classic.player.level, 1);
    }

    #[test]
    fn test_block_swallows_coin() {
        let mut state = GameState::new(1, Ruleset::evolution(), "player");
        state.shop.has_block_skill = true;
        coin_on_player(&mut state, CoinTier::Small);
        let input = TickInput {
            block: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.score, 0);
        assert!(state.coins.is_empty());
        assert!(state.events.contains(&GameEvent::CoinGuarded));
    }

    #[test]
    fn test_bullet_hits_player() {
        let mut state = classic();
        let center = state.player.hit_rect.center();
        let id = state.next_entity_id();
        state.bullets.push(Bullet::new(id, center, center + Vec2::Y));
        tick(&mut state, &idle());
        assert!(state.is_dead);
    }

    #[test]
    fn test_blocking_stops_bullet_with_guard_rule() {
        let mut state = GameState::new(1, Ruleset::evolution(), "player");
        state.shop.has_block_skill = true;
        // Stance from the previous frame
        state.player.is_blocking = true;
        let center = state.player.hit_rect.center();
        let id = state.next_entity_id();
        state.bullets.push(Bullet::new(id, center, center + Vec2::Y));
        let input = TickInput {
            block: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(!state.is_dead);
        assert!(state.bullets.is_empty());
        assert!(state.events.contains(&GameEvent::BulletStopped));
    }

    #[test]
    fn test_enemy_fires_at_player() {
        let mut state = classic();
        state.score = 3000;
        state.has_cleared_penalty = true;
        state.hazards.clear();
        for _ in 0..ENEMY_SHOOT_COOLDOWN {
            tick(&mut state, &idle());
        }
        assert!(state.enemy.active);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].vel.y > 0.0);
    }

    #[test]
    fn test_flash_step_needs_purchase() {
        let mut state = classic();
        let input = TickInput {
            flash_step: true,
            pointer: Vec2::new(100.0, 300.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.rect.center_x(), SCREEN_WIDTH / 2.0);

        state.shop.has_flash_step = true;
        tick(&mut state, &input);
        assert_eq!(state.player.rect.center_x(), 100.0);
        assert!(state.events.contains(&GameEvent::FlashStepped));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Ruleset::evolution(), "player2");
        let mut state2 = GameState::new(99999, Ruleset::evolution(), "player2");
        for state in [&mut state1, &mut state2] {
            state.score = 3100;
            state.has_cleared_penalty = true;
        }

        for frame in 0..900u32 {
            let input = TickInput {
                left: frame % 200 < 100,
                right: frame % 200 >= 100,
                jump: frame % 37 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        let a = serde_json::to_string(&state1).unwrap();
        let b = serde_json::to_string(&state2).unwrap();
        assert_eq!(a, b);
    }
}
