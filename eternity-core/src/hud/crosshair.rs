//! Two-layer crosshair: a white outer cross with a smaller black cross on top.

use eternity_utils::math::Vector2;

use super::{LinearColor, ScreenDrawer};
use crate::config::CrosshairConfig;

/// Draws the crosshair at the centre of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairHud {
    /// Half length of the outer cross arms, in pixels.
    pub size: f32,
    /// Line thickness, in pixels.
    pub thickness: f32,
}

impl CrosshairHud {
    /// Default half length of the outer cross arms.
    pub const DEFAULT_SIZE: f32 = 10.0;
    /// Default line thickness.
    pub const DEFAULT_THICKNESS: f32 = 2.0;

    /// Creates a crosshair with explicit dimensions.
    #[must_use]
    pub const fn new(size: f32, thickness: f32) -> Self {
        Self { size, thickness }
    }

    /// Creates a crosshair from the `crosshair` config section.
    #[must_use]
    pub const fn from_config(config: &CrosshairConfig) -> Self {
        Self::new(config.size, config.thickness)
    }

    /// Draws one frame of the crosshair. Draws nothing without a viewport.
    ///
    /// Returns the number of segments drawn.
    pub fn draw_hud(&self, drawer: &dyn ScreenDrawer) -> usize {
        let Some(viewport) = drawer.viewport_size() else {
            return 0;
        };
        let center = viewport / 2.0;

        let size = self.size;
        let inner_size = size * 0.5;
        // The inner cross is shifted up and left by this much.
        let inner_offset = inner_size * 0.5;

        let segments = [
            (
                Vector2::new(center.x - size, center.y),
                Vector2::new(center.x + size, center.y),
                LinearColor::WHITE,
            ),
            (
                Vector2::new(center.x, center.y - size),
                Vector2::new(center.x, center.y + size),
                LinearColor::WHITE,
            ),
            (
                Vector2::new(center.x - inner_size - inner_offset, center.y),
                Vector2::new(center.x + inner_size - inner_offset, center.y),
                LinearColor::BLACK,
            ),
            (
                Vector2::new(center.x, center.y - inner_size - inner_offset),
                Vector2::new(center.x, center.y + inner_size - inner_offset),
                LinearColor::BLACK,
            ),
        ];

        for (start, end, color) in segments {
            drawer.draw_line(start, end, color, self.thickness);
        }
        segments.len()
    }
}

impl Default for CrosshairHud {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_THICKNESS)
    }
}
