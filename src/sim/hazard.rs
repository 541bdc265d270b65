//! Score-gated hazards: laser cannons and ground spikes
//!
//! Both run the same cycle, an explicit state machine driven by a duration
//! table:
//!
//! ```text
//! Dormant -> Warning -> Active -> Cooldown -> Warning -> ...
//! ```
//!
//! Phase lengths reproduce a `timer % period` schedule where the warning
//! starts at cycle position 1, the attack at `warning` and the idle stretch
//! at `warning + active`. Only `Active` has a hit region.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{HitTest, beam_hits};
use super::rect::Rect;
use crate::consts::*;

/// Laser cannon tuning
pub const LASER_PERIOD: u32 = 300;
pub const LASER_WARNING: u32 = 120;
pub const LASER_FIRE: u32 = 40;
pub const LASER_WIDTH: f32 = 140.0;
/// Beam inset from each side of the cannon housing
pub const LASER_BEAM_INSET: f32 = 20.0;
/// Largest random start offset when a cannon arms
pub const LASER_MAX_JITTER: u32 = 100;
pub const MAX_LASER_PARTICLES: usize = 20;

/// Ground spike tuning
pub const SPIKES_PERIOD: u32 = 180;
pub const SPIKES_WARNING: u32 = 60;
pub const SPIKES_ATTACK: u32 = 40;
pub const SPIKES_WIDTH: f32 = 300.0;
pub const SPIKES_HEIGHT: f32 = 120.0;

/// Phase of a hazard cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardPhase {
    /// Armed but waiting for the first warning
    #[default]
    Dormant,
    /// Telegraphing the next attack; harmless
    Warning,
    /// Firing / attacking; the only harmful phase
    Active,
    /// Idle until the cycle wraps
    Cooldown,
}

/// Duration table for one hazard type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTimings {
    /// Frames from one warning start to the next
    pub period: u32,
    /// Cycle position where the attack begins
    pub warning: u32,
    /// Frames spent attacking
    pub active: u32,
}

impl CycleTimings {
    pub const fn new(period: u32, warning: u32, active: u32) -> Self {
        Self {
            period,
            warning,
            active,
        }
    }

    /// Frames spent in `phase` once entered
    pub fn ticks_in(&self, phase: HazardPhase) -> u32 {
        match phase {
            HazardPhase::Warning => self.warning.saturating_sub(1).max(1),
            HazardPhase::Active => self.active.max(1),
            HazardPhase::Cooldown => (self.period + 1)
                .saturating_sub(self.warning + self.active)
                .max(1),
            HazardPhase::Dormant => self.period,
        }
    }

    /// Frames from a reset with the given start offset to the first warning
    pub fn ticks_to_first_warning(&self, jitter: u32) -> u32 {
        (self.period - jitter % self.period) % self.period + 1
    }
}

/// Cyclic hazard timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardCycle {
    pub timings: CycleTimings,
    pub phase: HazardPhase,
    /// Frames left in the current phase
    pub ticks_left: u32,
}

impl HazardCycle {
    /// Held-in-reset cycle starting `jitter` frames into its period
    pub fn new(timings: CycleTimings, jitter: u32) -> Self {
        Self {
            timings,
            phase: HazardPhase::Dormant,
            ticks_left: timings.ticks_to_first_warning(jitter),
        }
    }

    /// Advance one frame; returns the phase entered, if any
    pub fn tick(&mut self) -> Option<HazardPhase> {
        if self.ticks_left > 1 {
            self.ticks_left -= 1;
            return None;
        }
        let next = match self.phase {
            HazardPhase::Dormant | HazardPhase::Cooldown => HazardPhase::Warning,
            HazardPhase::Warning => HazardPhase::Active,
            HazardPhase::Active => HazardPhase::Cooldown,
        };
        self.phase = next;
        self.ticks_left = self.timings.ticks_in(next);
        Some(next)
    }

    /// Jump straight into a phase
    pub fn force(&mut self, phase: HazardPhase) {
        self.phase = phase;
        self.ticks_left = self.timings.ticks_in(phase);
    }
}

/// Rising energy mote shown while a laser warns
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyParticle {
    pub x: f32,
    pub y: f32,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
}

/// Ceiling-mounted laser cannon that sweeps a vertical strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserCannon {
    pub unlock_score: i64,
    pub active: bool,
    pub x: f32,
    pub width: f32,
    pub cycle: HazardCycle,
    /// Frames since arming (animation clock)
    pub age: u64,
    /// Visual only
    #[serde(skip)]
    pub particles: Vec<EnergyParticle>,
}

impl LaserCannon {
    pub fn new(unlock_score: i64, rng: &mut Pcg32) -> Self {
        Self {
            unlock_score,
            active: false,
            x: 0.0,
            width: LASER_WIDTH,
            cycle: HazardCycle::new(Self::timings(), rng.random_range(0..=LASER_MAX_JITTER)),
            age: 0,
            particles: Vec::new(),
        }
    }

    pub const fn timings() -> CycleTimings {
        CycleTimings::new(LASER_PERIOD, LASER_WARNING, LASER_FIRE)
    }

    pub fn reset_cycle(&mut self, rng: &mut Pcg32) {
        self.cycle = HazardCycle::new(Self::timings(), rng.random_range(0..=LASER_MAX_JITTER));
        self.age = 0;
        self.particles.clear();
    }

    /// The lethal strip while firing
    pub fn beam_rect(&self) -> Rect {
        Rect::new(
            self.x + LASER_BEAM_INSET,
            0.0,
            self.width - 2.0 * LASER_BEAM_INSET,
            SCREEN_HEIGHT,
        )
    }

    fn on_enter(&mut self, phase: HazardPhase, rng: &mut Pcg32) {
        match phase {
            HazardPhase::Warning => {
                self.x = rng.random_range(0..=(SCREEN_WIDTH - self.width) as u32) as f32;
                self.particles.clear();
                log::debug!("Laser ({}) warning at x={}", self.unlock_score, self.x);
            }
            HazardPhase::Active => {
                self.particles.clear();
                log::debug!("Laser ({}) firing", self.unlock_score);
            }
            _ => {}
        }
    }

    fn update_particles(&mut self, rng: &mut Pcg32) {
        if self.particles.len() < MAX_LASER_PARTICLES {
            let px = self.x + rng.random_range(0..=self.width as u32) as f32;
            let py = rng.random_range(50..=150) as f32;
            self.particles.push(EnergyParticle {
                x: px,
                y: py,
                life: 1.0,
            });
        }
        for p in &mut self.particles {
            p.y -= 2.0;
            p.life -= 0.02;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

/// Spikes bursting out of the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSpikes {
    pub unlock_score: i64,
    pub active: bool,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub cycle: HazardCycle,
    /// Frames since the current warning/attack began
    pub anim_frame: u32,
}

impl GroundSpikes {
    pub fn new(unlock_score: i64) -> Self {
        Self {
            unlock_score,
            active: false,
            x: 0.0,
            width: SPIKES_WIDTH,
            height: SPIKES_HEIGHT,
            cycle: HazardCycle::new(Self::timings(), 0),
            anim_frame: 0,
        }
    }

    pub const fn timings() -> CycleTimings {
        CycleTimings::new(SPIKES_PERIOD, SPIKES_WARNING, SPIKES_ATTACK)
    }

    pub fn reset_cycle(&mut self) {
        self.cycle = HazardCycle::new(Self::timings(), 0);
        self.anim_frame = 0;
    }

    /// The lethal floor strip while attacking
    pub fn spike_rect(&self) -> Rect {
        Rect::new(self.x, SCREEN_HEIGHT - self.height, self.width, self.height)
    }

    fn on_enter(&mut self, phase: HazardPhase, rng: &mut Pcg32) {
        match phase {
            HazardPhase::Warning => {
                self.x = rng.random_range(0..=(SCREEN_WIDTH - self.width) as u32) as f32;
                self.anim_frame = 0;
                log::debug!("Spikes warning at x={}", self.x);
            }
            HazardPhase::Active => {
                self.anim_frame = 0;
                log::debug!("Spikes attacking");
            }
            _ => {}
        }
    }
}

/// Any cyclic hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Hazard {
    Laser(LaserCannon),
    Spikes(GroundSpikes),
}

impl Hazard {
    pub fn unlock_score(&self) -> i64 {
        match self {
            Hazard::Laser(l) => l.unlock_score,
            Hazard::Spikes(s) => s.unlock_score,
        }
    }

    /// Armed (score at or above the unlock threshold)
    pub fn is_active(&self) -> bool {
        match self {
            Hazard::Laser(l) => l.active,
            Hazard::Spikes(s) => s.active,
        }
    }

    pub fn cycle(&self) -> &HazardCycle {
        match self {
            Hazard::Laser(l) => &l.cycle,
            Hazard::Spikes(s) => &s.cycle,
        }
    }

    pub fn cycle_mut(&mut self) -> &mut HazardCycle {
        match self {
            Hazard::Laser(l) => &mut l.cycle,
            Hazard::Spikes(s) => &mut s.cycle,
        }
    }

    pub fn phase(&self) -> HazardPhase {
        self.cycle().phase
    }

    /// Whether a raised shield absorbs this hazard
    pub fn is_shieldable(&self) -> bool {
        matches!(self, Hazard::Laser(_))
    }

    /// Disarm and hold in reset, re-rolling any start jitter
    pub fn reset_cycle(&mut self, rng: &mut Pcg32) {
        self.set_active(false);
        match self {
            Hazard::Laser(l) => l.reset_cycle(rng),
            Hazard::Spikes(s) => s.reset_cycle(),
        }
    }

    /// Advance one frame at the given score
    pub fn tick(&mut self, score: i64, rng: &mut Pcg32) {
        let armed = score >= self.unlock_score();
        if !armed {
            // Held in reset while disarmed, jitter re-rolled
            if self.is_active() {
                log::debug!("Hazard ({}) disarmed", self.unlock_score());
                self.reset_cycle(rng);
            }
            return;
        }
        if !self.is_active() {
            log::info!("Hazard ({}) armed", self.unlock_score());
            self.set_active(true);
        }

        let entered = self.cycle_mut().tick();
        match self {
            Hazard::Laser(l) => {
                l.age += 1;
                if let Some(phase) = entered {
                    l.on_enter(phase, rng);
                }
                if l.cycle.phase == HazardPhase::Warning {
                    l.update_particles(rng);
                }
            }
            Hazard::Spikes(s) => {
                if let Some(phase) = entered {
                    s.on_enter(phase, rng);
                }
                if matches!(s.cycle.phase, HazardPhase::Warning | HazardPhase::Active) {
                    s.anim_frame += 1;
                }
            }
        }
    }

    /// Lethal contact with `target`, honoring shield negation
    pub fn check_collision(&self, target: &Rect, shield: Option<Rect>) -> bool {
        let Some(region) = self.hit_box() else {
            return false;
        };
        if self.is_shieldable() {
            beam_hits(&region, target, shield)
        } else {
            region.intersects(target)
        }
    }

    fn set_active(&mut self, active: bool) {
        match self {
            Hazard::Laser(l) => l.active = active,
            Hazard::Spikes(s) => s.active = active,
        }
    }
}

impl HitTest for Hazard {
    fn hit_box(&self) -> Option<Rect> {
        if !self.is_active() || self.phase() != HazardPhase::Active {
            return None;
        }
        Some(match self {
            Hazard::Laser(l) => l.beam_rect(),
            Hazard::Spikes(s) => s.spike_rect(),
        })
    }
}
