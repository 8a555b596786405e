//! Remorse- and guilt-escalation variants
//!
//! Both share one mechanic: each decline click advances a counter that
//! shrinks the decline control, grows the accept control and rotates the
//! regret display. Once the counter reaches one less than the message count
//! the decline control is disabled for good. The two variants differ only in tuning.

const SAD_PUPPY_IMAGE: &str = "https://images.unsplash.com/photo-1651044204351-f0a6aab96e3e?crop=entropy&cs=srgb&fm=jpg&q=85";

/// One step of the regret display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood {
    pub emoji: &'static str,
    pub image: Option<&'static str>,
}

const fn mood(emoji: &'static str) -> Mood {
    Mood { emoji, image: None }
}

const fn mood_with_image(emoji: &'static str, image: &'static str) -> Mood {
    Mood {
        emoji,
        image: Some(image),
    }
}

/// A linear function of the counter, clamped to `limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub base: f64,
    pub step: f64,
    pub limit: f64,
}

impl Ramp {
    pub fn at(&self, count: u32) -> f64 {
        let value = self.base + self.step * f64::from(count);
        if self.step >= 0.0 {
            value.min(self.limit)
        } else {
            value.max(self.limit)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EscalationTuning {
    pub messages: &'static [&'static str],
    /// Index of the message shown after the first click.
    pub first_message: usize,
    /// Indexed by `min(count, len - 1)`.
    pub moods: &'static [Mood],
    pub accept_scale: Ramp,
    pub accept_opacity: Ramp,
    pub decline_scale: Ramp,
    pub decline_opacity: Ramp,
    /// Hovering the decline control dims the page.
    pub dims_on_hover: bool,
    pub hint_after: u32,
    pub hint: Option<&'static str>,
    pub exhausted_comment: Option<&'static str>,
}

pub const REMORSE: EscalationTuning = EscalationTuning {
    messages: &[
        "Really? 🥺",
        "My heart is breaking... 💔",
        "I already told my friends about you...",
        "Even practiced what to say...",
        "Okay... I understand... 😢",
    ],
    first_message: 0,
    moods: &[
        mood("💖"),
        mood("😢"),
        mood("😢"),
        mood_with_image("😢", SAD_PUPPY_IMAGE),
        mood_with_image("💔", SAD_PUPPY_IMAGE),
    ],
    accept_scale: Ramp {
        base: 1.0,
        step: 0.1,
        limit: 1.4,
    },
    accept_opacity: Ramp {
        base: 0.85,
        step: 0.05,
        limit: 1.0,
    },
    decline_scale: Ramp {
        base: 1.0,
        step: -0.12,
        limit: 0.6,
    },
    decline_opacity: Ramp {
        base: 1.0,
        step: -0.2,
        limit: 0.35,
    },
    dims_on_hover: true,
    hint_after: u32::MAX,
    hint: None,
    exhausted_comment: Some("Okay... I understand... 😢"),
};

pub const GUILT: EscalationTuning = EscalationTuning {
    messages: &[
        "Are you absolutely sure?",
        "Like... REALLY sure?",
        "I even dressed up for this... 👗",
        "My mom already knows about you...",
        "I've been practicing this moment... 😭",
        "This is the last time I'm asking... 💔",
    ],
    first_message: 1,
    moods: &[
        mood("💖"),
        mood("🥺"),
        mood("🥺"),
        mood("🥺"),
        mood("😭"),
        mood("😭"),
    ],
    accept_scale: Ramp {
        base: 1.0,
        step: 0.15,
        limit: 1.75,
    },
    accept_opacity: Ramp {
        base: 1.0,
        step: 0.0,
        limit: 1.0,
    },
    decline_scale: Ramp {
        base: 1.0,
        step: -0.1,
        limit: 0.5,
    },
    decline_opacity: Ramp {
        base: 1.0,
        step: -0.15,
        limit: 0.3,
    },
    dims_on_hover: false,
    hint_after: 2,
    hint: Some("(Notice how the YES button is getting bigger? That's a sign! 😉)"),
    exhausted_comment: Some("The No button has given up. Maybe you should too? 😊"),
};

#[derive(Debug, Clone)]
pub struct Escalation {
    tuning: EscalationTuning,
    count: u32,
    hovering: bool,
}

impl Escalation {
    pub fn new(tuning: EscalationTuning) -> Self {
        Self {
            tuning,
            count: 0,
            hovering: false,
        }
    }

    pub fn remorse() -> Self {
        Self::new(REMORSE)
    }

    pub fn guilt() -> Self {
        Self::new(GUILT)
    }

    pub fn tuning(&self) -> &EscalationTuning {
        &self.tuning
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Click count at which the decline control locks.
    pub fn click_limit(&self) -> u32 {
        self.tuning.messages.len().saturating_sub(1) as u32
    }

    pub fn decline_disabled(&self) -> bool {
        self.count >= self.click_limit()
    }

    pub fn hover(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn is_dimmed(&self) -> bool {
        self.tuning.dims_on_hover && self.hovering && !self.decline_disabled()
    }

    /// Returns false once the decline control is disabled.
    pub fn decline(&mut self) -> bool {
        if self.decline_disabled() {
            return false;
        }
        self.count += 1;
        true
    }

    /// Nothing is shown before the first click.
    pub fn message(&self) -> Option<&'static str> {
        let clicks = (self.count as usize).checked_sub(1)?;
        let messages = self.tuning.messages;
        let index = (self.tuning.first_message + clicks).min(messages.len().saturating_sub(1));
        messages.get(index).copied()
    }

    pub fn mood(&self) -> Mood {
        let moods = self.tuning.moods;
        let step = if self.count == 0 && self.is_dimmed() {
            1
        } else {
            self.count as usize
        };
        moods
            .get(step.min(moods.len().saturating_sub(1)))
            .copied()
            .unwrap_or(mood("💖"))
    }

    pub fn hint(&self) -> Option<&'static str> {
        if self.count > self.tuning.hint_after {
            self.tuning.hint
        } else {
            None
        }
    }

    pub fn exhausted_comment(&self) -> Option<&'static str> {
        if self.decline_disabled() {
            self.tuning.exhausted_comment
        } else {
            None
        }
    }

    pub fn accept_scale(&self) -> f64 {
        self.tuning.accept_scale.at(self.count)
    }

    pub fn accept_opacity(&self) -> f64 {
        self.tuning.accept_opacity.at(self.count)
    }

    pub fn decline_scale(&self) -> f64 {
        self.tuning.decline_scale.at(self.count)
    }

    pub fn decline_opacity(&self) -> f64 {
        self.tuning.decline_opacity.at(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guilt_disables_decline_at_last_message() {
        let mut guilt = Escalation::guilt();
        let mut clicks = 0;
        while guilt.decline() {
            clicks += 1;
        }

        assert_eq!(clicks, GUILT.messages.len() - 1);
        assert!(guilt.decline_disabled());
        assert_eq!(guilt.message(), Some("This is the last time I'm asking... 💔"));
        assert_eq!(guilt.exhausted_comment(), GUILT.exhausted_comment);
        assert_eq!(guilt.decline_scale(), 0.5);
        assert!((guilt.accept_scale() - 1.75).abs() < 1e-9);
    }

    fn messages_after_each_click(mut escalation: Escalation) -> Vec<Option<&'static str>> {
        let mut shown = vec![escalation.message()];
        while escalation.decline() {
            shown.push(escalation.message());
        }
        shown
    }

    #[test]
    fn remorse_opens_with_its_first_line_on_the_first_click() {
        assert_eq!(
            messages_after_each_click(Escalation::remorse()),
            vec![
                None,
                Some("Really? 🥺"),
                Some("My heart is breaking... 💔"),
                Some("I already told my friends about you..."),
                Some("Even practiced what to say..."),
            ]
        );

        let mut remorse = Escalation::remorse();
        while remorse.decline() {}
        assert_eq!(remorse.exhausted_comment(), Some("Okay... I understand... 😢"));
    }

    #[test]
    fn guilt_skips_its_opening_line() {
        assert_eq!(
            messages_after_each_click(Escalation::guilt()),
            vec![
                None,
                Some("Like... REALLY sure?"),
                Some("I even dressed up for this... 👗"),
                Some("My mom already knows about you..."),
                Some("I've been practicing this moment... 😭"),
                Some("This is the last time I'm asking... 💔"),
            ]
        );
    }

    #[test]
    fn hover_dims_remorse_without_a_message() {
        let mut remorse = Escalation::remorse();
        assert_eq!(remorse.message(), None);

        remorse.hover(true);
        assert!(remorse.is_dimmed());
        assert_eq!(remorse.message(), None);
        assert_eq!(remorse.mood().emoji, "😢");

        remorse.hover(false);
        assert!(!remorse.is_dimmed());
        assert_eq!(remorse.mood().emoji, "💖");
    }

    #[test]
    fn guilt_ignores_hover() {
        let mut guilt = Escalation::guilt();
        guilt.hover(true);
        assert!(!guilt.is_dimmed());
        assert_eq!(guilt.message(), None);
        assert_eq!(guilt.mood().emoji, "💖");
    }

    #[test]
    fn empty_tunings_lock_immediately() {
        let mut bare = Escalation::new(EscalationTuning {
            messages: &[],
            moods: &[],
            exhausted_comment: None,
            ..GUILT
        });
        assert!(bare.decline_disabled());
        assert!(!bare.decline());
        assert_eq!(bare.message(), None);
        assert_eq!(bare.mood().emoji, "💖");
    }

    #[test]
    fn remorse_shows_the_sad_puppy_after_three_clicks() {
        let mut remorse = Escalation::remorse();
        remorse.decline();
        remorse.decline();
        assert_eq!(remorse.mood().image, None);
        remorse.decline();
        assert!(remorse.mood().image.is_some());
    }

    #[test]
    fn guilt_hint_follows_the_third_click() {
        let mut guilt = Escalation::guilt();
        guilt.decline();
        guilt.decline();
        assert_eq!(guilt.hint(), None);
        guilt.decline();
        assert_eq!(guilt.hint(), GUILT.hint);
    }

    #[test]
    fn ramps_clamp_in_the_direction_they_move() {
        let growing = Ramp {
            base: 1.0,
            step: 0.5,
            limit: 2.0,
        };
        let shrinking = Ramp {
            base: 1.0,
            step: -0.5,
            limit: 0.25,
        };
        assert_eq!(growing.at(10), 2.0);
        assert_eq!(shrinking.at(10), 0.25);
        assert_eq!(shrinking.at(1), 0.5);
    }
}
