//! Recipient view of a shared valentine link

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use super::api::Api;
use crate::engine::{Interaction, TemplateEngine};
use crate::models::{Answer, TemplateId, Valentine};

pub const CELEBRATION_DURATION: Duration = Duration::from_millis(3000);
pub const BURST_INTERVAL: Duration = Duration::from_millis(50);
pub const PARTICLES_PER_SIDE: u32 = 3;
pub const CELEBRATION_COLOURS: [&str; 4] = ["#E11D48", "#F43F5E", "#FFE4E6", "#FFFFFF"];

/// One emitter firing from a screen edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emitter {
    pub particles: u32,
    /// Launch angle in degrees.
    pub angle: u32,
    /// Horizontal origin, 0 is the left edge and 1 the right.
    pub origin_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub at: Duration,
    pub left: Emitter,
    pub right: Emitter,
}

/// Particle schedule shown once the recipient says yes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Celebration;

impl Celebration {
    pub fn colours(&self) -> &'static [&'static str] {
        &CELEBRATION_COLOURS
    }

    pub fn bursts(&self) -> impl Iterator<Item = Burst> {
        let count = (CELEBRATION_DURATION.as_millis() / BURST_INTERVAL.as_millis()) as u32;
        (0..count).map(|i| Burst {
            at: BURST_INTERVAL * i,
            left: Emitter {
                particles: PARTICLES_PER_SIDE,
                angle: 60,
                origin_x: 0.0,
            },
            right: Emitter {
                particles: PARTICLES_PER_SIDE,
                angle: 120,
                origin_x: 1.0,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionView {
    /// Terminal. Unknown ids, unpaid drafts and transport failures all land here.
    NotFound,
    Prompt,
    Celebration(Celebration),
}

pub struct RecipientSession {
    api: Arc<dyn Api>,
    valentine: Option<Valentine>,
    engine: Option<TemplateEngine>,
    view: SessionView,
    submission: Option<JoinHandle<bool>>,
}

impl RecipientSession {
    pub async fn load(api: Arc<dyn Api>, id: &str) -> Self {
        Self::load_with(api, id, TemplateEngine::new).await
    }

    /// Like `load`, with control over how the engine is built.
    pub async fn load_with(
        api: Arc<dyn Api>,
        id: &str,
        engine: impl FnOnce(TemplateId) -> TemplateEngine,
    ) -> Self {
        let mut session = Self {
            api: api.clone(),
            valentine: None,
            engine: None,
            view: SessionView::NotFound,
            submission: None,
        };

        let valentine = match api.get_valentine(id).await {
            Ok(valentine) => valentine,
            Err(e) => {
                tracing::warn!(valentine_id = id, error = %e, "valentine unavailable");
                return session;
            }
        };

        if !valentine.is_paid() {
            tracing::debug!(valentine_id = id, "unpaid valentine hidden from recipient");
            return session;
        }

        if valentine.is_answered() {
            session.view = SessionView::Celebration(Celebration);
        } else {
            session.engine = Some(engine(valentine.template_id));
            session.view = SessionView::Prompt;
        }
        session.valentine = Some(valentine);
        session
    }

    pub fn view(&self) -> &SessionView {
        &self.view
    }

    pub fn valentine(&self) -> Option<&Valentine> {
        self.valentine.as_ref()
    }

    /// None once the record was answered before loading.
    pub fn engine(&self) -> Option<&TemplateEngine> {
        self.engine.as_ref()
    }

    pub fn interact(&mut self, interaction: Interaction, now: Instant) -> Option<Answer> {
        let answer = self.engine.as_mut()?.handle(interaction, now)?;
        self.resolved(answer);
        Some(answer)
    }

    /// Drives engine timers.
    pub fn tick(&mut self, now: Instant) -> Option<Answer> {
        let answer = self.engine.as_mut()?.poll(now)?;
        self.resolved(answer);
        Some(answer)
    }

    /// Sleeps until the pending engine timer is due, then fires it.
    pub async fn wait_for_deadline(&mut self) -> Option<Answer> {
        let deadline = self.engine.as_ref()?.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.tick(deadline.max(Instant::now()))
    }

    /// Waits for the in-flight response submission. True if the backend
    /// acknowledged it.
    pub async fn settle(&mut self) -> Option<bool> {
        let submission = self.submission.take()?;
        submission.await.ok()
    }

    fn resolved(&mut self, answer: Answer) {
        self.view = SessionView::Celebration(Celebration);

        let Some(valentine) = self.valentine.as_mut() else {
            return;
        };
        valentine.response = Some(answer);

        let api = self.api.clone();
        let id = valentine.valentine_id.clone();
        self.submission = Some(tokio::spawn(async move {
            match api.submit_response(&id, answer).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(valentine_id = %id, error = %e, "response submission failed");
                    false
                }
            }
        }));
    }
}

impl std::fmt::Debug for RecipientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientSession")
            .field("valentine", &self.valentine)
            .field("engine", &self.engine)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
