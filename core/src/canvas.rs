//! Character canvas configuration.

use serde::{Deserialize, Serialize};

/// Size of the character drawing area.
///
/// Every asset coordinate lives in this space. Mirroring reflects across the
/// vertical line `x = width / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterCanvas {
    /// Canvas width in asset units.
    pub width: f32,
    /// Canvas height in asset units.
    pub height: f32,
}

impl CharacterCanvas {
    /// Default canvas width.
    pub const DEFAULT_WIDTH: f32 = 1000.0;
    /// Default canvas height.
    pub const DEFAULT_HEIGHT: f32 = 1500.0;

    /// Create a canvas of the given size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The x coordinate of the vertical midline.
    pub fn midline(&self) -> f32 {
        self.width / 2.0
    }
}

impl Default for CharacterCanvas {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canvas() {
        let canvas = CharacterCanvas::default();
        assert_eq!(canvas.width, 1000.0);
        assert_eq!(canvas.height, 1500.0);
        assert_eq!(canvas.midline(), 500.0);
    }
}
