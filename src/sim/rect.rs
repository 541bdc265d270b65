//! Axis-aligned rectangles for sprites and hit-boxes
//!
//! Screen space: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    /// Grow (positive) or shrink (negative) around the center
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        Self::new(
            self.x - dw / 2.0,
            self.y - dh / 2.0,
            (self.w + dw).max(0.0),
            (self.h + dh).max(0.0),
        )
    }

    /// Strict overlap test; touching edges and empty rects never collide
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open point containment (left/top inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// True once no part of the rect is visible on the canvas
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        self.top() > height || self.bottom() < 0.0 || self.left() > width || self.right() < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap_and_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        // Empty rect never collides
        assert!(!a.intersects(&Rect::new(2.0, 2.0, 0.0, 5.0)));
    }

    #[test]
    fn test_inflate_keeps_center() {
        let sprite = Rect::new(300.0, 390.0, 200.0, 200.0);
        let hit = sprite.inflate(-150.0, -80.0);
        assert_eq!(hit.w, 50.0);
        assert_eq!(hit.h, 120.0);
        assert_eq!(hit.center(), sprite.center());
    }

    #[test]
    fn test_contains_point_half_open() {
        let r = Rect::new(10.0, 10.0, 260.0, 140.0);
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!r.contains_point(Vec2::new(270.0, 50.0)));
    }

    #[test]
    fn test_is_outside() {
        assert!(Rect::new(0.0, 601.0, 10.0, 10.0).is_outside(800.0, 600.0));
        assert!(Rect::new(-30.0, 0.0, 24.0, 24.0).is_outside(800.0, 600.0));
        assert!(!Rect::new(790.0, 590.0, 24.0, 24.0).is_outside(800.0, 600.0));
    }
}
