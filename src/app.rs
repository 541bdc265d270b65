//! Input handling and fixed-timestep driver
//!
//! The host forwards raw input as `InputEvent`s and calls `update` once per
//! presented frame with the elapsed wall time. `App` folds events into the
//! next `TickInput`, runs as many fixed steps as the accumulator allows and
//! hands back a draw list via `frame`.

use glam::Vec2;

use crate::assets::ResourceProvider;
use crate::consts::*;
use crate::renderer::{Frame, build_frame, build_selector_frame};
use crate::rules::Ruleset;
use crate::sim::{CharacterSelector, GameState, TickInput, tick};

/// Longest wall-clock gap fed into the accumulator
const MAX_FRAME_DT: f32 = 0.1;

/// Game actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Shield,
    /// Held
    Block,
    FlashStep,
}

impl Key {
    /// Map a DOM-style key name to an action
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Space" => Some(Key::Jump),
            "x" | "X" => Some(Key::Shield),
            "f" | "F" => Some(Key::Block),
            "b" | "B" => Some(Key::FlashStep),
            _ => None,
        }
    }
}

/// Raw input from the host, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMoved(Vec2),
    Click(Vec2),
}

/// Selector screen followed by the running session
pub struct App {
    rules: Ruleset,
    seed: u64,
    selector: CharacterSelector,
    state: Option<GameState>,
    input: TickInput,
    accumulator: f32,
}

impl App {
    pub fn new(seed: u64, rules: Ruleset) -> Self {
        Self {
            rules,
            seed,
            selector: CharacterSelector::default(),
            state: None,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn selector(&self) -> &CharacterSelector {
        &self.selector
    }

    pub fn is_selecting(&self) -> bool {
        self.state.is_none()
    }

    /// Input queued for the next step
    pub fn pending_input(&self) -> &TickInput {
        &self.input
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        // Held state always tracks the physical keys
        match event {
            InputEvent::KeyDown(key) | InputEvent::KeyUp(key) => {
                let down = matches!(event, InputEvent::KeyDown(_));
                match key {
                    Key::Left => self.input.left = down,
                    Key::Right => self.input.right = down,
                    Key::Block => self.input.block = down,
                    _ => {}
                }
            }
            InputEvent::PointerMoved(pos) => self.input.pointer = pos,
            InputEvent::Click(_) => {}
        }

        let Some(state) = &self.state else {
            if let InputEvent::Click(pos) = event
                && self.selector.handle_click(pos)
            {
                self.start_session();
            }
            return;
        };
        if state.is_dead {
            return;
        }

        match event {
            InputEvent::KeyDown(Key::Jump) => self.input.jump = true,
            InputEvent::KeyDown(Key::Shield) => self.input.shield = true,
            InputEvent::KeyDown(Key::FlashStep) => self.input.flash_step = true,
            InputEvent::Click(pos) => self.input.clicks.push(pos),
            _ => {}
        }
    }

    fn start_session(&mut self) {
        let skin = self.selector.selected_base().to_string();
        self.state = Some(GameState::new(self.seed, self.rules.clone(), &skin));
        self.accumulator = 0.0;
    }

    /// Advance by `dt` seconds of wall time; returns the steps run
    pub fn update(&mut self, dt: f32) -> u32 {
        let Some(state) = self.state.as_mut() else {
            return 0;
        };
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.shield = false;
            self.input.flash_step = false;
            self.input.clicks.clear();
        }
        substeps
    }

    /// Draw list for the current screen
    pub fn frame(&self, assets: &dyn ResourceProvider) -> Frame {
        match &self.state {
            Some(state) => build_frame(state, assets),
            None => build_selector_frame(&self.selector, assets),
        }
    }
}
