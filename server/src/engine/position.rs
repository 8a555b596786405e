//! Placement of the evasive decline control

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Offset of the control from its resting spot, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Room reserved for the control itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 100.0,
        }
    }
}

/// Reachable area, centered on the resting spot: `x` spans
/// `[-span_x / 2, span_x / 2]`, `y` likewise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub span_x: f64,
    pub span_y: f64,
}

impl Bounds {
    pub fn new(viewport: Viewport, footprint: Footprint) -> Self {
        Self {
            span_x: (viewport.width - footprint.width).max(0.0),
            span_y: (viewport.height - footprint.height).max(0.0),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x.abs() <= self.span_x / 2.0 && position.y.abs() <= self.span_y / 2.0
    }

    /// Maps unit samples in `[0, 1)` onto the centered area.
    pub fn place(&self, unit_x: f64, unit_y: f64) -> Position {
        Position {
            x: unit_x * self.span_x - self.span_x / 2.0,
            y: unit_y * self.span_y - self.span_y / 2.0,
        }
    }
}

/// Source of new positions for the evasive control.
pub trait PositionSource: Send {
    fn next_position(&mut self, bounds: &Bounds) -> Position;
}

/// Uniformly random placement.
pub struct RandomPositions {
    rng: StdRng,
}

impl RandomPositions {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPositions {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for RandomPositions {
    fn next_position(&mut self, bounds: &Bounds) -> Position {
        let unit_x: f64 = self.rng.gen();
        let unit_y: f64 = self.rng.gen();
        bounds.place(unit_x, unit_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_subtract_the_control_footprint() {
        let bounds = Bounds::new(
            Viewport {
                width: 1000.0,
                height: 600.0,
            },
            Footprint::default(),
        );
        assert_eq!(bounds.span_x, 800.0);
        assert_eq!(bounds.span_y, 500.0);
        assert!(bounds.contains(Position { x: 400.0, y: -250.0 }));
        assert!(!bounds.contains(Position { x: 401.0, y: 0.0 }));
    }

    #[test]
    fn tiny_viewports_collapse_to_the_resting_spot() {
        let bounds = Bounds::new(
            Viewport {
                width: 120.0,
                height: 80.0,
            },
            Footprint::default(),
        );
        assert_eq!(bounds.place(0.9, 0.1), Position::ORIGIN);
    }

    #[test]
    fn random_positions_stay_inside_bounds() {
        let bounds = Bounds::new(Viewport::default(), Footprint::default());
        let mut source = RandomPositions::seeded(7);
        for _ in 0..500 {
            assert!(bounds.contains(source.next_position(&bounds)));
        }
    }
}
