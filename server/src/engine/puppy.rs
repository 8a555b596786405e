//! Anticipation-reveal variant ("Puppy Eyes Mode")

pub const PUPPY_CAPTION: &str = "How can you say no to THIS face? 🥺";
pub const PUPPY_IMAGE: &str = "https://images.unsplash.com/photo-1651044204351-f0a6aab96e3e?crop=entropy&cs=srgb&fm=jpg&q=85";
pub const DARE_HINT: &str = "(Hover over \"No\" if you dare... 🐶)";

/// Hovering or touching decline reveals the puppy for the rest of the
/// session. Clicking decline does nothing.
#[derive(Debug, Clone, Default)]
pub struct Puppy {
    revealed: bool,
}

impl Puppy {
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn caption(&self) -> Option<&'static str> {
        self.revealed.then_some(PUPPY_CAPTION)
    }

    pub fn hint(&self) -> Option<&'static str> {
        (!self.revealed).then_some(DARE_HINT)
    }
}
