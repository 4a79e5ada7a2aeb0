//! Heads-up display overlays.
//!
//! Overlays never touch a renderer directly; they draw through a
//! [`ScreenDrawer`] the host implements on top of its canvas.

mod crosshair;

pub use crosshair::CrosshairHud;

use eternity_utils::math::Vector2;

/// A linear RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearColor {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl LinearColor {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// 2D drawing surface in screen space, provided by the host.
pub trait ScreenDrawer {
    /// Size of the viewport in pixels, or `None` while no viewport exists.
    fn viewport_size(&self) -> Option<Vector2<f32>>;

    /// Draws a line segment.
    fn draw_line(&self, start: Vector2<f32>, end: Vector2<f32>, color: LinearColor, thickness: f32);
}
