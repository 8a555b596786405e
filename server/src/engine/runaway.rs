//! Evasive-control variant ("The Runaway No")

use std::fmt;

use super::position::{Bounds, Footprint, Position, PositionSource, Viewport};

pub const TAUNTS: [&str; 5] = [
    "Wait! Think about it...",
    "Are you sure? 🥺",
    "Really? You're breaking my heart...",
    "One more chance?",
    "Pretty please? 💕",
];

pub const HARD_TO_GET_HINT: &str = "(Psst... the No button is playing hard to get 😉)";

const HINT_AFTER_ATTEMPTS: u32 = 3;

/// Redraws allowed when the source lands on the current spot.
const MAX_REDRAWS: usize = 8;

pub struct Runaway {
    attempts: u32,
    position: Position,
    footprint: Footprint,
    bounds: Bounds,
    source: Box<dyn PositionSource>,
}

impl Runaway {
    pub fn new(viewport: Viewport, source: Box<dyn PositionSource>) -> Self {
        let footprint = Footprint::default();
        Self {
            attempts: 0,
            position: Position::ORIGIN,
            footprint,
            bounds: Bounds::new(viewport, footprint),
            source,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.bounds = Bounds::new(viewport, self.footprint);
    }

    /// Any hover, touch or click on the decline control relocates it.
    pub fn evade(&mut self) {
        self.attempts = self.attempts.saturating_add(1);

        let mut next = self.source.next_position(&self.bounds);
        for _ in 0..MAX_REDRAWS {
            if next != self.position {
                break;
            }
            next = self.source.next_position(&self.bounds);
        }
        self.position = next;
    }

    pub fn taunt(&self) -> Option<&'static str> {
        let index = (self.attempts as usize).checked_sub(1)?;
        Some(TAUNTS[index.min(TAUNTS.len() - 1)])
    }

    pub fn hint(&self) -> Option<&'static str> {
        (self.attempts > HINT_AFTER_ATTEMPTS).then_some(HARD_TO_GET_HINT)
    }
}

impl fmt::Debug for Runaway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runaway")
            .field("attempts", &self.attempts)
            .field("position", &self.position)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
