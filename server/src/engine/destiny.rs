//! Delayed-inevitability variant ("Destiny Mode")

use tokio::time::{Duration, Instant};

/// Time spent "checking destiny" before the answer is forced to yes.
pub const DESTINY_DELAY: Duration = Duration::from_millis(3000);

pub const CHECKING_TITLE: &str = "Checking destiny...";
pub const REVEAL_TITLE: &str = "Destiny Has Spoken!";
pub const REVEAL_SUBTITLE: &str = "You are meant to say YES 💖";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinyPhase {
    Question,
    Checking { deadline: Instant },
    Revealed,
}

#[derive(Debug, Clone)]
pub struct Destiny {
    phase: DestinyPhase,
}

impl Default for Destiny {
    fn default() -> Self {
        Self {
            phase: DestinyPhase::Question,
        }
    }
}

impl Destiny {
    pub fn phase(&self) -> DestinyPhase {
        self.phase
    }

    /// Arms the single-shot timer. A pending timer is never re-armed.
    pub fn decline(&mut self, now: Instant) -> bool {
        match self.phase {
            DestinyPhase::Question => {
                self.phase = DestinyPhase::Checking {
                    deadline: now + DESTINY_DELAY,
                };
                true
            }
            DestinyPhase::Checking { .. } | DestinyPhase::Revealed => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            DestinyPhase::Checking { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// True exactly once, when the timer has elapsed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.phase {
            DestinyPhase::Checking { deadline } if now >= deadline => {
                self.phase = DestinyPhase::Revealed;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_decline_does_not_push_the_deadline_back() {
        let start = Instant::now();
        let mut destiny = Destiny::default();

        assert!(destiny.decline(start));
        assert!(!destiny.decline(start + Duration::from_millis(1500)));
        assert_eq!(destiny.deadline(), Some(start + DESTINY_DELAY));
    }

    #[test]
    fn fires_once_at_the_deadline() {
        let start = Instant::now();
        let mut destiny = Destiny::default();
        destiny.decline(start);

        assert!(!destiny.fire_if_due(start + Duration::from_millis(2999)));
        assert!(destiny.fire_if_due(start + DESTINY_DELAY));
        assert!(!destiny.fire_if_due(start + Duration::from_secs(10)));
        assert_eq!(destiny.phase(), DestinyPhase::Revealed);
    }
}
