//! Game session state
//!
//! Everything a session needs lives in one explicit, serializable
//! `GameState` that `tick` advances. Same seed + same inputs = same state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::coin::{Coin, CoinKind};
use super::enemy::{AerialEnemy, Bullet};
use super::hazard::{GroundSpikes, Hazard, HazardPhase, LaserCannon};
use super::player::Player;
use super::rect::Rect;
use super::shop::{ItemKind, Shop};
use crate::consts::*;
use crate::rules::Ruleset;

/// Something that happened during the last tick
///
/// Drained at the start of every tick; consumers (logging, audio, demo
/// statistics) read them after the tick returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected { kind: CoinKind, value: i64 },
    CoinMissed { kind: CoinKind, penalty: i64 },
    /// Swallowed by the shield or block stance
    CoinGuarded,
    BulletStopped,
    Jumped,
    ShieldRaised,
    FlashStepped,
    Purchased(ItemKind),
    ShopToggled { open: bool },
    Evolved,
    PenaltyStarted,
    PenaltyCleared,
    Died,
    Reset,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rules: Ruleset,
    /// Credits; may go negative, which kills the player
    pub score: i64,
    pub in_penalty_mode: bool,
    /// Penalty mode happens at most once per session
    pub has_cleared_penalty: bool,
    /// Frames of penalty mode left
    pub penalty_timer: u32,
    pub is_dead: bool,
    /// Frames until the automatic reset
    pub death_timer: u32,
    /// Coin spawn cadence counter
    pub coin_counter: u64,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    pub player: Player,
    pub shop: Shop,
    /// Laser cannons, then the ground spikes
    pub hazards: Vec<Hazard>,
    pub enemy: AerialEnemy,
    /// Live coins in spawn order
    pub coins: Vec<Coin>,
    /// Live bullets in spawn order
    pub bullets: Vec<Bullet>,
    /// Events from the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh session for the given character skin
    pub fn new(seed: u64, rules: Ruleset, base_skin: &str) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hazards = build_hazards(&rules, &mut rng);
        log::info!(
            "New {} session (seed {seed}, skin {base_skin}, {} hazards)",
            rules.variant.as_str(),
            hazards.len()
        );

        Self {
            seed,
            score: 0,
            in_penalty_mode: false,
            has_cleared_penalty: false,
            penalty_timer: 0,
            is_dead: false,
            death_timer: 0,
            coin_counter: 0,
            time_ticks: 0,
            player: Player::new(base_skin),
            shop: Shop::new(&rules),
            hazards,
            enemy: AerialEnemy::new(rules.enemy_unlock_score),
            coins: Vec::new(),
            bullets: Vec::new(),
            events: Vec::new(),
            rules,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Back to a fresh session with the same skin, rules and RNG stream
    pub fn reset(&mut self) {
        self.score = 0;
        self.in_penalty_mode = false;
        self.has_cleared_penalty = false;
        self.penalty_timer = 0;
        self.is_dead = false;
        self.death_timer = 0;
        self.coin_counter = 0;
        for hazard in &mut self.hazards {
            hazard.reset_cycle(&mut self.rng);
        }
        self.enemy = AerialEnemy::new(self.rules.enemy_unlock_score);
        self.coins.clear();
        self.bullets.clear();
        self.player = Player::new(self.player.base_skin.clone());
        self.shop.reset();
        self.events.push(GameEvent::Reset);
        log::info!("Session reset");
    }

    /// Enter the death countdown (no-op while already dead)
    pub fn trigger_death(&mut self) {
        if self.is_dead {
            return;
        }
        self.is_dead = true;
        self.death_timer = DEATH_DURATION;
        self.events.push(GameEvent::Died);
        log::info!("Player died at {} credits", self.score);
    }

    /// Shield negating lasers this frame
    pub fn shield_rect(&self) -> Option<Rect> {
        self.player.shield.active_rect()
    }

    /// Any hazard currently telegraphing an attack
    pub fn any_hazard_warning(&self) -> bool {
        self.hazards
            .iter()
            .any(|h| h.is_active() && h.phase() == HazardPhase::Warning)
    }
}

/// One cannon per laser threshold, then the spikes
fn build_hazards(rules: &Ruleset, rng: &mut Pcg32) -> Vec<Hazard> {
    let mut hazards: Vec<Hazard> = rules
        .laser_unlock_scores
        .iter()
        .map(|&unlock| Hazard::Laser(LaserCannon::new(unlock, rng)))
        .collect();
    hazards.push(Hazard::Spikes(GroundSpikes::new(rules.spikes_unlock_score)));
    hazards
}
