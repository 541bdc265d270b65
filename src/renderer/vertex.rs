//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (canvas pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Raw bytes of a vertex slice, ready for a GPU buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Color with alpha taken from 0-255 channels
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> [f32; 4] {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

/// Same color, different alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    use super::rgba;

    pub const BLACK: [f32; 4] = rgba(0, 0, 0, 255);
    pub const WHITE: [f32; 4] = rgba(255, 255, 255, 255);
    pub const YELLOW: [f32; 4] = rgba(255, 255, 0, 255);
    pub const GRAY: [f32; 4] = rgba(100, 100, 100, 255);
    pub const BLUE: [f32; 4] = rgba(50, 50, 200, 255);
    pub const GOLD: [f32; 4] = rgba(255, 215, 0, 255);
    pub const DARK_GRAY: [f32; 4] = rgba(30, 30, 30, 255);
    pub const RED: [f32; 4] = rgba(255, 0, 0, 255);
    pub const GREEN: [f32; 4] = rgba(0, 255, 0, 255);

    pub const SHIELD: [f32; 4] = rgba(100, 200, 255, 180);
    pub const BLOCK_RING: [f32; 4] = rgba(255, 255, 255, 80);
    pub const LASER_RED: [f32; 4] = rgba(255, 50, 50, 255);
    pub const CANNON_BODY: [f32; 4] = rgba(40, 40, 50, 255);
    pub const WARNING: [f32; 4] = rgba(255, 0, 0, 80);
    pub const SPIKE: [f32; 4] = rgba(150, 150, 150, 255);
    pub const SPIKE_DARK: [f32; 4] = rgba(60, 60, 60, 255);
    pub const SPIKE_GLOW: [f32; 4] = rgba(255, 50, 0, 100);
    pub const DEATH_OVERLAY: [f32; 4] = rgba(150, 0, 0, 180);
    pub const SHOP_OVERLAY: [f32; 4] = rgba(0, 0, 0, 150);
    pub const CLOSE_BUTTON: [f32; 4] = rgba(200, 0, 0, 255);
    pub const BACKGROUND: [f32; 4] = BLACK;
}
