//! Recipient-facing template engine
//!
//! All five templates share one shape: `Prompting`, optional taunting
//! states, then `Resolved(yes)`. They differ only in what the decline
//! control does. Activating accept resolves immediately from any
//! non-terminal state, and the response listener fires exactly once.

mod destiny;
mod escalation;
mod position;
mod puppy;
mod runaway;

pub use destiny::{
    Destiny, DestinyPhase, CHECKING_TITLE, DESTINY_DELAY, REVEAL_SUBTITLE, REVEAL_TITLE,
};
pub use escalation::{Escalation, EscalationTuning, Mood, Ramp, GUILT, REMORSE};
pub use position::{Bounds, Footprint, Position, PositionSource, RandomPositions, Viewport};
pub use puppy::{Puppy, DARE_HINT, PUPPY_CAPTION, PUPPY_IMAGE};
pub use runaway::{Runaway, HARD_TO_GET_HINT, TAUNTS};

use tokio::time::Instant;

use crate::models::{Answer, TemplateId};

/// Pointer input on the two controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Accept,
    DeclineHover,
    DeclineLeave,
    DeclineTouch,
    DeclineClick,
}

/// Coarse state shared by every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Prompting,
    Taunting,
    Checking,
    Resolved(Answer),
}

/// Per-variant presentation state.
#[derive(Debug)]
pub enum Variant {
    Runaway(Runaway),
    Remorse(Escalation),
    Guilt(Escalation),
    Puppy(Puppy),
    Destiny(Destiny),
}

impl Variant {
    fn is_taunting(&self) -> bool {
        match self {
            Variant::Runaway(runaway) => runaway.attempts() > 0,
            Variant::Remorse(escalation) | Variant::Guilt(escalation) => {
                escalation.count() > 0 || escalation.is_dimmed()
            }
            Variant::Puppy(puppy) => puppy.is_revealed(),
            Variant::Destiny(_) => false,
        }
    }
}

/// One-shot marker for the response effect.
#[derive(Debug, Default)]
pub struct ResponseGuard {
    fired: bool,
}

impl ResponseGuard {
    /// True the first time only.
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

type ResponseListener = Box<dyn FnMut(Answer) + Send>;

pub struct TemplateEngine {
    template: TemplateId,
    variant: Variant,
    resolved: Option<Answer>,
    guard: ResponseGuard,
    listener: Option<ResponseListener>,
}

impl TemplateEngine {
    pub fn new(template: TemplateId) -> Self {
        Self::with_positions(template, Viewport::default(), Box::new(RandomPositions::new()))
    }

    /// Engine whose evasive control draws positions from `source`.
    pub fn with_positions(
        template: TemplateId,
        viewport: Viewport,
        source: Box<dyn PositionSource>,
    ) -> Self {
        let variant = match template {
            TemplateId::RunawayNo => Variant::Runaway(Runaway::new(viewport, source)),
            TemplateId::EmotionalDamage => Variant::Remorse(Escalation::remorse()),
            TemplateId::GuiltTrip => Variant::Guilt(Escalation::guilt()),
            TemplateId::PuppyEyes => Variant::Puppy(Puppy::default()),
            TemplateId::DestinyMode => Variant::Destiny(Destiny::default()),
        };

        Self {
            template,
            variant,
            resolved: None,
            guard: ResponseGuard::default(),
            listener: None,
        }
    }

    /// Registers the `onResponse` listener.
    pub fn on_response(mut self, listener: impl FnMut(Answer) + Send + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn resolved(&self) -> Option<Answer> {
        self.resolved
    }

    pub fn state(&self) -> EngineState {
        if let Some(answer) = self.resolved {
            return EngineState::Resolved(answer);
        }
        match &self.variant {
            Variant::Destiny(destiny) if destiny.deadline().is_some() => EngineState::Checking,
            variant if variant.is_taunting() => EngineState::Taunting,
            _ => EngineState::Prompting,
        }
    }

    /// When the pending destiny timer is due, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        match &self.variant {
            Variant::Destiny(destiny) => destiny.deadline(),
            _ => None,
        }
    }

    /// Applies one interaction. Returns the answer on the transition into
    /// `Resolved` and `None` on every other call.
    pub fn handle(&mut self, interaction: Interaction, now: Instant) -> Option<Answer> {
        if self.resolved.is_some() {
            return None;
        }

        if interaction == Interaction::Accept {
            return self.resolve(Answer::Yes);
        }

        match &mut self.variant {
            Variant::Runaway(runaway) => match interaction {
                Interaction::DeclineHover | Interaction::DeclineTouch | Interaction::DeclineClick => {
                    runaway.evade()
                }
                _ => {}
            },
            Variant::Remorse(escalation) | Variant::Guilt(escalation) => match interaction {
                Interaction::DeclineHover | Interaction::DeclineTouch => escalation.hover(true),
                Interaction::DeclineLeave => escalation.hover(false),
                Interaction::DeclineClick => {
                    escalation.decline();
                }
                Interaction::Accept => {}
            },
            Variant::Puppy(puppy) => {
                if matches!(
                    interaction,
                    Interaction::DeclineHover | Interaction::DeclineTouch
                ) {
                    puppy.reveal();
                }
            }
            Variant::Destiny(destiny) => {
                if interaction == Interaction::DeclineClick && destiny.decline(now) {
                    tracing::debug!(template = %self.template, "destiny timer armed");
                }
            }
        }

        None
    }

    /// Advances timers. The destiny timer resolves to yes regardless of what
    /// the recipient clicked.
    pub fn poll(&mut self, now: Instant) -> Option<Answer> {
        let fired = match &mut self.variant {
            Variant::Destiny(destiny) => destiny.fire_if_due(now),
            _ => false,
        };

        if fired {
            self.resolve(Answer::Yes)
        } else {
            None
        }
    }

    fn resolve(&mut self, answer: Answer) -> Option<Answer> {
        if !self.guard.fire() {
            return None;
        }

        self.resolved = Some(answer);
        if let Some(listener) = self.listener.as_mut() {
            listener(answer);
        }
        Some(answer)
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("template", &self.template)
            .field("variant", &self.variant)
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}
