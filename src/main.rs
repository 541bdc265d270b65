//! Coin Catcher entry point
//!
//! There is no window here: the host that owns one feeds `App` input and
//! rasterizes its draw lists. The native binary runs a headless autopilot
//! session per variant and logs what happened.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use glam::Vec2;

use coin_catcher::consts::*;
use coin_catcher::sim::selector::START_BUTTON;
use coin_catcher::sim::shop::SHOP_CLOSE_BUTTON;
use coin_catcher::sim::{
    CharacterSelector, CoinKind, GameEvent, GameState, HUD_RECT, Hazard, HazardPhase, ItemKind,
};
use coin_catcher::{App, AssetCatalog, InputEvent, Key, Ruleset, Variant};

const DEMO_SEED: u64 = 12345;
/// Two minutes of play
const DEMO_FRAMES: u64 = 7200;
/// Credits kept in reserve when buying a shield
const SHIELD_RESERVE: i64 = 300;

fn main() {
    env_logger::init();
    log::info!("Coin Catcher (native) starting...");

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let assets = AssetCatalog::scan_dir("assets").context("scanning assets")?;
    for variant in [Variant::Classic, Variant::Evolution] {
        log::info!("--- {} ---", variant.as_str());
        play(Ruleset::from_preset(variant), &assets);
    }
    Ok(())
}

fn play(rules: Ruleset, assets: &AssetCatalog) {
    let mut app = App::new(DEMO_SEED, rules);
    app.handle_event(InputEvent::Click(CharacterSelector::option_rect(0).center()));
    app.handle_event(InputEvent::Click(START_BUTTON.center()));

    let mut pilot = Autopilot::default();
    let mut stats = Stats::default();
    for _ in 0..DEMO_FRAMES {
        if let Some(state) = app.state() {
            for event in pilot.decide(state) {
                app.handle_event(event);
            }
        }
        // One step per frame so no tick's events are missed
        app.update(SIM_DT);
        if let Some(state) = app.state() {
            stats.record(state);
        }
        let frame = app.frame(assets);
        let upload: usize = frame.mesh_bytes().map(<[u8]>::len).sum();
        stats.peak_upload = stats.peak_upload.max(upload);
    }

    if let Some(state) = app.state() {
        stats.report(state);
    }
}

/// Walks under the lowest coin, shields against lasers and buys shields
#[derive(Default)]
struct Autopilot {
    held: Option<Key>,
}

impl Autopilot {
    fn decide(&mut self, state: &GameState) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if state.is_dead {
            return events;
        }

        if state.shop.is_open {
            let wants_shield = state.shop.shield_count == 0
                && state.score >= ItemKind::Shield.cost() + SHIELD_RESERVE;
            let click = match state.shop.items.iter().position(|&i| i == ItemKind::Shield) {
                Some(index) if wants_shield => state.shop.item_rect(index).center(),
                _ => SHOP_CLOSE_BUTTON.center(),
            };
            events.push(InputEvent::Click(click));
            return events;
        }
        if state.shop.shield_count == 0
            && state.score >= ItemKind::Shield.cost() + SHIELD_RESERVE
            && !state.any_hazard_warning()
        {
            events.push(InputEvent::Click(HUD_RECT.center()));
            return events;
        }

        let body = state.player.hit_rect;
        let laser_overhead = state.hazards.iter().any(|h| match h {
            Hazard::Laser(l) => {
                h.phase() == HazardPhase::Warning
                    && l.active
                    && l.beam_rect().right() > body.left()
                    && l.beam_rect().left() < body.right()
            }
            Hazard::Spikes(_) => false,
        });
        if laser_overhead && state.player.shield.active_rect().is_none() {
            events.push(InputEvent::KeyDown(Key::Shield));
        }

        let target = state
            .coins
            .iter()
            .filter(|c| c.kind == CoinKind::Normal)
            .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
            .map(|c| c.rect.center_x());
        let want = match target {
            Some(x) if x < body.center_x() - state.player.speed => Some(Key::Left),
            Some(x) if x > body.center_x() + state.player.speed => Some(Key::Right),
            _ => None,
        };
        if want != self.held {
            if let Some(key) = self.held.take() {
                events.push(InputEvent::KeyUp(key));
            }
            if let Some(key) = want {
                events.push(InputEvent::KeyDown(key));
            }
            self.held = want;
        }
        events
    }
}

#[derive(Default)]
struct Stats {
    collected: u32,
    missed: u32,
    guarded: u32,
    deaths: u32,
    best_score: i64,
    /// Largest per-frame vertex upload in bytes
    peak_upload: usize,
    purchases: BTreeMap<&'static str, u32>,
}

impl Stats {
    fn record(&mut self, state: &GameState) {
        self.best_score = self.best_score.max(state.score);
        for event in &state.events {
            match event {
                GameEvent::CoinCollected { .. } => self.collected += 1,
                GameEvent::CoinMissed { .. } => self.missed += 1,
                GameEvent::CoinGuarded | GameEvent::BulletStopped => self.guarded += 1,
                GameEvent::Purchased(item) => {
                    *self.purchases.entry(item.name()).or_default() += 1;
                }
                GameEvent::Evolved => log::info!("Evolved at frame {}", state.time_ticks),
                GameEvent::PenaltyStarted => {
                    log::info!("Penalty mode at frame {}", state.time_ticks)
                }
                GameEvent::Died => {
                    self.deaths += 1;
                    log::info!("Died at frame {} (score {})", state.time_ticks, state.score);
                }
                _ => {}
            }
        }
    }

    fn report(&self, state: &GameState) {
        log::info!(
            "Final score {} (best {}), collected {}, missed {}, guarded {}, deaths {}",
            state.score,
            self.best_score,
            self.collected,
            self.missed,
            self.guarded,
            self.deaths
        );
        for (name, count) in &self.purchases {
            log::info!("  {name}: {count}");
        }
        log::debug!("Peak vertex upload per frame: {} bytes", self.peak_upload);
        let pos = Vec2::new(state.player.rect.x, state.player.rect.y);
        log::debug!("Player ended at {pos}, form {:?}", state.player.form);
    }
}
