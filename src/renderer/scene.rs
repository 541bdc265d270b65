//! Frame building: turns session state into an ordered draw list
//!
//! The host owns the window and the pixels. Each frame it receives a flat
//! list of commands to replay in order: colored triangle meshes, image blits
//! for names the resource provider knows, and text labels. Anything without
//! an image gets deterministic placeholder geometry.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, as_bytes, colors, rgba, with_alpha};
use crate::assets::{ImageHandle, ResourceProvider, SkinImages};
use crate::consts::*;
use crate::frames_to_seconds;
use crate::sim::hazard::{GroundSpikes, Hazard, HazardPhase, LaserCannon};
use crate::sim::selector::{CharacterSelector, START_BUTTON};
use crate::sim::shop::{SHOP_CLOSE_BUTTON, SHOP_PANEL, Shop};
use crate::sim::{AerialEnemy, Bullet, Coin, CoinKind, GameState, HUD_RECT, Player, Rect};

/// Text sizes in pixels
pub const FONT_SIZE: f32 = 36.0;
pub const BIG_FONT_SIZE: f32 = 72.0;
pub const SMALL_FONT_SIZE: f32 = 22.0;

const CIRCLE_SEGMENTS: u32 = 32;
const CORNER_SEGMENTS: u32 = 6;

/// Horizontal anchor of a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos` is the top-left corner
    Left,
    /// `pos` is the top-center point
    Center,
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Colored triangle list
    Mesh(Vec<Vertex>),
    /// Image scaled into `rect`
    Sprite { image: ImageHandle, rect: Rect },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: [f32; 4],
        align: TextAlign,
    },
}

/// Ordered draw list for one presented frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub commands: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            clear_color,
            commands: Vec::new(),
        }
    }

    /// Append triangles, merging with a directly preceding mesh
    pub fn mesh(&mut self, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        if let Some(DrawCmd::Mesh(last)) = self.commands.last_mut() {
            last.extend(vertices);
        } else {
            self.commands.push(DrawCmd::Mesh(vertices));
        }
    }

    pub fn sprite(&mut self, image: ImageHandle, rect: Rect) {
        self.commands.push(DrawCmd::Sprite { image, rect });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: [f32; 4]) {
        self.push_text(text.into(), pos, size, color, TextAlign::Left);
    }

    pub fn text_centered(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: [f32; 4]) {
        self.push_text(text.into(), pos, size, color, TextAlign::Center);
    }

    fn push_text(&mut self, text: String, pos: Vec2, size: f32, color: [f32; 4], align: TextAlign) {
        self.commands.push(DrawCmd::Text {
            text,
            pos,
            size,
            color,
            align,
        });
    }

    /// All labels in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn sprites(&self) -> impl Iterator<Item = (ImageHandle, Rect)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Sprite { image, rect } => Some((*image, *rect)),
            _ => None,
        })
    }

    /// Raw vertex bytes of each mesh, in draw order
    pub fn mesh_bytes(&self) -> impl Iterator<Item = &[u8]> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Mesh(v) => Some(as_bytes(v)),
            _ => None,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                DrawCmd::Mesh(v) => v.len(),
                _ => 0,
            })
            .sum()
    }
}

/// What an entity needs to draw itself
pub struct DrawContext<'a> {
    pub assets: &'a dyn ResourceProvider,
}

/// Entity drawing capability
pub trait Draw {
    fn draw(&self, frame: &mut Frame, ctx: &DrawContext);
}

impl Draw for Player {
    fn draw(&self, frame: &mut Frame, ctx: &DrawContext) {
        let skin = SkinImages::resolve(ctx.assets, self);
        if let Some(image) = skin.current(self.is_jumping) {
            frame.sprite(image, self.rect);
            return;
        }
        let color = if self.level == 1 {
            colors::WHITE
        } else {
            colors::GREEN
        };
        let body = self.rect.inflate(-40.0, -40.0);
        frame.mesh(shapes::rounded_rect(&body, 20.0, color, CORNER_SEGMENTS));
    }
}

impl Draw for Coin {
    fn draw(&self, frame: &mut Frame, ctx: &DrawContext) {
        if let Some(image) = ctx.assets.get(self.tier.asset_name()) {
            frame.sprite(image, self.rect);
            return;
        }
        let color = match self.kind {
            CoinKind::Normal => colors::GOLD,
            CoinKind::Penalty => colors::RED,
        };
        let radius = self.rect.w / 2.0;
        let center = self.rect.center();
        frame.mesh(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
        frame.mesh(shapes::ring(center, radius - 3.0, radius, colors::WHITE, CIRCLE_SEGMENTS));
    }
}

impl Draw for Bullet {
    fn draw(&self, frame: &mut Frame, _ctx: &DrawContext) {
        let center = self.rect.center();
        frame.mesh(shapes::circle(center, BULLET_SIZE / 2.0, colors::RED, 16));
        frame.mesh(shapes::circle(center, BULLET_SIZE / 4.0, colors::WHITE, 16));
    }
}

impl Draw for AerialEnemy {
    fn draw(&self, frame: &mut Frame, ctx: &DrawContext) {
        if !self.active {
            return;
        }
        if let Some(image) = ctx.assets.get("player_jump") {
            frame.sprite(image, self.rect);
            return;
        }
        frame.mesh(shapes::rounded_rect(&self.rect, 15.0, colors::RED, CORNER_SEGMENTS));
        frame.mesh(shapes::circle(
            self.rect.center(),
            self.rect.w / 3.0,
            colors::WHITE,
            CIRCLE_SEGMENTS,
        ));
    }
}

impl Draw for LaserCannon {
    fn draw(&self, frame: &mut Frame, _ctx: &DrawContext) {
        if !self.active {
            return;
        }
        let t = self.age as f32;
        let phase = self.cycle.phase;

        // Housing and core
        let body = Rect::new(self.x, 0.0, self.width, 35.0);
        frame.mesh(shapes::rect(&body, colors::CANNON_BODY));
        frame.mesh(shapes::rect_outline(&body, 2.0, colors::GRAY));
        let core = match phase {
            HazardPhase::Warning => colors::RED,
            HazardPhase::Active => rgba(255, 255, 200, 255),
            _ => colors::WHITE,
        };
        frame.mesh(shapes::circle(
            Vec2::new(self.x + self.width / 2.0, 15.0),
            8.0,
            core,
            16,
        ));

        match phase {
            HazardPhase::Warning => {
                let alpha = ((t * 0.1).sin().abs() * 60.0 + 20.0) / 255.0;
                let strip = Rect::new(self.x, 0.0, self.width, SCREEN_HEIGHT);
                frame.mesh(shapes::rect(&strip, with_alpha(colors::RED, alpha)));
                if (self.age / 15) % 2 == 0 {
                    for edge in [self.x, self.x + self.width] {
                        frame.mesh(shapes::line(
                            Vec2::new(edge, 0.0),
                            Vec2::new(edge, SCREEN_HEIGHT),
                            2.0,
                            colors::RED,
                        ));
                    }
                }
                for p in &self.particles {
                    frame.mesh(shapes::circle(
                        Vec2::new(p.x, p.y),
                        3.0,
                        rgba(255, 50, 50, (p.life.clamp(0.0, 1.0) * 255.0) as u8),
                        8,
                    ));
                }
            }
            HazardPhase::Active => {
                let glow_w = self.width - 20.0;
                for i in 0..5 {
                    let offset = i as f32 * 4.0;
                    let glow = Rect::new(self.x + 10.0 + offset, 0.0, glow_w - offset * 2.0, SCREEN_HEIGHT);
                    let alpha = (100.0 - i as f32 * 20.0) / 255.0;
                    frame.mesh(shapes::rect(&glow, with_alpha(colors::RED, alpha)));
                }

                let main_w = 40.0 + (t * 0.5).sin() * 10.0;
                let main = Rect::new(self.x + (self.width - main_w) / 2.0, 0.0, main_w, SCREEN_HEIGHT);
                frame.mesh(shapes::rect(&main, colors::LASER_RED));
                let core_w = main_w * 0.4;
                let core = Rect::new(self.x + (self.width - core_w) / 2.0, 0.0, core_w, SCREEN_HEIGHT);
                frame.mesh(shapes::rect(&core, colors::WHITE));

                for i in 0..5 {
                    let seed = self.age * 31 + i;
                    let spark = Vec2::new(
                        self.x + scatter(seed) * self.width,
                        SCREEN_HEIGHT - scatter(seed ^ 0xA5) * 30.0,
                    );
                    let radius = 2.0 + (scatter(seed + 7) * 3.0).floor();
                    frame.mesh(shapes::circle(spark, radius, colors::YELLOW, 8));
                }
            }
            _ => {}
        }
    }
}

impl Draw for GroundSpikes {
    fn draw(&self, frame: &mut Frame, _ctx: &DrawContext) {
        if !self.active {
            return;
        }
        let anim = self.anim_frame as f32;
        match self.cycle.phase {
            HazardPhase::Warning => {
                let shake = (scatter(self.anim_frame as u64) * 5.0).floor() - 2.0;
                let alpha = ((anim * 0.2).sin().abs() * 150.0 + 50.0) / 255.0;
                let bar = Rect::new(self.x + shake, SCREEN_HEIGHT - 15.0, self.width, 15.0);
                frame.mesh(shapes::rect(&bar, with_alpha(colors::RED, alpha)));
                for i in 0..3u64 {
                    let seed = self.anim_frame as u64 * 17 + i;
                    let ember = Vec2::new(
                        self.x + scatter(seed) * self.width,
                        SCREEN_HEIGHT - scatter(seed ^ 0x5A) * 20.0,
                    );
                    let radius = 1.0 + (scatter(seed + 3) * 3.0).floor();
                    frame.mesh(shapes::circle(ember, radius, colors::RED, 6));
                }
            }
            HazardPhase::Active => {
                let rise = (anim / 6.0).min(1.0);
                let h = self.height * rise;
                let count = 6;
                let spike_w = (self.width / count as f32).floor();
                for i in 0..count {
                    let base_x = self.x + i as f32 * spike_w;
                    let tip = Vec2::new(base_x + (spike_w / 2.0).floor(), SCREEN_HEIGHT - h);
                    frame.mesh(shapes::triangle(
                        Vec2::new(base_x, SCREEN_HEIGHT),
                        tip,
                        Vec2::new(base_x + spike_w * 0.7, SCREEN_HEIGHT),
                        colors::SPIKE_DARK,
                    ));
                    let left = Vec2::new(base_x + 5.0, SCREEN_HEIGHT);
                    let right = Vec2::new(base_x + spike_w - 5.0, SCREEN_HEIGHT);
                    frame.mesh(shapes::triangle(left, tip, right, colors::SPIKE));
                    for (a, b) in [(left, tip), (tip, right), (right, left)] {
                        frame.mesh(shapes::line(a, b, 1.0, colors::WHITE));
                    }
                    if rise > 0.8 {
                        frame.mesh(shapes::circle(tip, 3.0, colors::WHITE, 8));
                    }
                }
                let glow = Rect::new(self.x, SCREEN_HEIGHT - 10.0, self.width, 20.0);
                frame.mesh(shapes::rounded_rect(&glow, 10.0, colors::SPIKE_GLOW, CORNER_SEGMENTS));
            }
            _ => {}
        }
    }
}

impl Draw for Hazard {
    fn draw(&self, frame: &mut Frame, ctx: &DrawContext) {
        match self {
            Hazard::Laser(l) => l.draw(frame, ctx),
            Hazard::Spikes(s) => s.draw(frame, ctx),
        }
    }
}

/// Build the draw list for a running session
pub fn build_frame(state: &GameState, assets: &dyn ResourceProvider) -> Frame {
    let ctx = DrawContext { assets };
    let mut frame = Frame::new(colors::BACKGROUND);

    state.player.draw(&mut frame, &ctx);
    for coin in &state.coins {
        coin.draw(&mut frame, &ctx);
    }
    for bullet in &state.bullets {
        bullet.draw(&mut frame, &ctx);
    }
    state.enemy.draw(&mut frame, &ctx);
    draw_guards(&mut frame, &state.player);

    // Lasers before spikes
    for hazard in state.hazards.iter().filter(|h| h.is_shieldable()) {
        hazard.draw(&mut frame, &ctx);
    }
    for hazard in state.hazards.iter().filter(|h| !h.is_shieldable()) {
        hazard.draw(&mut frame, &ctx);
    }

    draw_hud(&mut frame, state);
    if state.is_dead {
        draw_death_overlay(&mut frame);
    }
    if state.shop.is_open {
        draw_shop(&mut frame, &state.shop, state.rules.shop_block_hint);
    }
    frame
}

/// Shield bar and block stance ring
fn draw_guards(frame: &mut Frame, player: &Player) {
    if let Some(shield) = player.shield.active_rect() {
        frame.mesh(shapes::rounded_rect(&shield, 15.0, colors::SHIELD, CORNER_SEGMENTS));
        frame.mesh(shapes::rect_outline(&shield, 2.0, colors::WHITE));
    }
    if player.is_blocking {
        frame.mesh(shapes::ring(
            player.rect.center(),
            90.0,
            100.0,
            colors::BLOCK_RING,
            CIRCLE_SEGMENTS,
        ));
    }
}

fn draw_hud(frame: &mut Frame, state: &GameState) {
    frame.mesh(shapes::rounded_rect(&HUD_RECT, 10.0, colors::DARK_GRAY, CORNER_SEGMENTS));
    frame.mesh(shapes::rect_outline(&HUD_RECT, 2.0, colors::WHITE));

    let x = HUD_X + 10.0;
    frame.text(
        format!("Credits: {}", state.score),
        Vec2::new(x, 15.0),
        FONT_SIZE,
        colors::WHITE,
    );
    if state.in_penalty_mode {
        frame.text(
            format!("DANGER: {}s", frames_to_seconds(state.penalty_timer)),
            Vec2::new(x, 50.0),
            SMALL_FONT_SIZE,
            colors::RED,
        );
    }

    let shop = &state.shop;
    let shields = format!("Shields: {} (X)", shop.shield_count);
    let shield_color = if shop.shield_count > 0 {
        colors::BLUE
    } else {
        colors::GRAY
    };
    if state.rules.flash_step_in_shop {
        if shop.has_flash_step {
            let flash = &state.player.flash;
            let (msg, color) = if flash.is_ready() {
                ("Flash READY (B)".to_string(), colors::YELLOW)
            } else {
                (format!("Flash CD: {}s", flash.timer / SIM_HZ), colors::RED)
            };
            frame.text(msg, Vec2::new(x, 75.0), SMALL_FONT_SIZE, color);
            frame.text(shields, Vec2::new(x, 100.0), SMALL_FONT_SIZE, shield_color);
        } else {
            frame.text(shields, Vec2::new(x, 75.0), SMALL_FONT_SIZE, shield_color);
        }
    } else {
        frame.text(shields, Vec2::new(x, 75.0), SMALL_FONT_SIZE, shield_color);
        let (msg, color) = if shop.has_block_skill {
            ("BLOCK: READY (F)", colors::YELLOW)
        } else {
            ("BLOCK: NOT OWNED", colors::GRAY)
        };
        frame.text(msg, Vec2::new(x, 100.0), SMALL_FONT_SIZE, color);
    }
    frame.text("(Click to Shop)", Vec2::new(x, 122.0), SMALL_FONT_SIZE, colors::GOLD);
}

fn draw_death_overlay(frame: &mut Frame) {
    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    frame.mesh(shapes::rect(&screen, colors::DEATH_OVERLAY));
    frame.text_centered(
        "GAME OVER",
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - 50.0),
        BIG_FONT_SIZE,
        colors::WHITE,
    );
    frame.text_centered(
        "You are such a failure",
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 + 40.0),
        FONT_SIZE,
        colors::YELLOW,
    );
}

fn draw_shop(frame: &mut Frame, shop: &Shop, block_hint: bool) {
    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    frame.mesh(shapes::rect(&screen, colors::SHOP_OVERLAY));
    frame.mesh(shapes::rounded_rect(&SHOP_PANEL, 15.0, colors::BLUE, CORNER_SEGMENTS));
    frame.mesh(shapes::rect_outline(&SHOP_PANEL, 3.0, colors::WHITE));

    let center_x = SHOP_PANEL.center_x();
    frame.text_centered(
        "Item Shop",
        Vec2::new(center_x, SHOP_PANEL.y + 20.0),
        FONT_SIZE,
        colors::GOLD,
    );
    if block_hint {
        frame.text_centered(
            "[ Press F to use BLOCK ]",
            Vec2::new(center_x, SHOP_PANEL.y + 55.0),
            SMALL_FONT_SIZE,
            colors::WHITE,
        );
    }

    frame.mesh(shapes::rect(&SHOP_CLOSE_BUTTON, colors::CLOSE_BUTTON));
    frame.text_centered(
        "X",
        Vec2::new(SHOP_CLOSE_BUTTON.center_x(), SHOP_CLOSE_BUTTON.y + 8.0),
        SMALL_FONT_SIZE,
        colors::WHITE,
    );

    for (i, item) in shop.items.iter().enumerate() {
        let row = shop.item_rect(i);
        frame.mesh(shapes::rounded_rect(&row, 10.0, colors::GRAY, CORNER_SEGMENTS));
        let name = if shop.is_owned(*item) {
            format!("{} (OWNED)", item.name())
        } else {
            item.name().to_string()
        };
        frame.text(name, Vec2::new(row.x + 20.0, row.y + 10.0), SMALL_FONT_SIZE, colors::WHITE);
        frame.text(
            format!("Cost: {}", item.cost()),
            Vec2::new(row.x + 20.0, row.y + 40.0),
            SMALL_FONT_SIZE,
            colors::YELLOW,
        );
    }
}

/// Build the draw list for the character selection screen
pub fn build_selector_frame(selector: &CharacterSelector, assets: &dyn ResourceProvider) -> Frame {
    let mut frame = Frame::new(colors::DARK_GRAY);
    frame.text_centered(
        "Choose Your Character",
        Vec2::new(SCREEN_WIDTH / 2.0, 100.0),
        FONT_SIZE,
        colors::WHITE,
    );

    for (i, option) in selector.options.iter().enumerate() {
        let card = CharacterSelector::option_rect(i);
        let border = if i == selector.selected {
            colors::GOLD
        } else {
            colors::WHITE
        };
        frame.mesh(shapes::rect_outline(&card, 5.0, border));
        if let Some(image) = assets.get(option) {
            frame.sprite(image, card.inflate(-20.0, -20.0));
        } else {
            frame.mesh(shapes::circle(card.center(), 60.0, colors::GRAY, CIRCLE_SEGMENTS));
            frame.text_centered(
                option.clone(),
                Vec2::new(card.center_x(), card.bottom() + 10.0),
                SMALL_FONT_SIZE,
                colors::WHITE,
            );
        }
    }

    frame.mesh(shapes::rounded_rect(&START_BUTTON, 10.0, colors::BLUE, CORNER_SEGMENTS));
    frame.text_centered(
        "START",
        Vec2::new(START_BUTTON.center_x(), START_BUTTON.y + 12.0),
        FONT_SIZE,
        colors::WHITE,
    );
    frame
}

/// Stable pseudo-random value in [0, 1) for decorative effects
fn scatter(seed: u64) -> f32 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 40) as f32 / (1u64 << 24) as f32
}
