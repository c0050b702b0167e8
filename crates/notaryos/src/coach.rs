//! AI coach chat panel.
//!
//! There is no inference behind the coach yet. [`ScriptedResponder`] answers
//! every question with the same placeholder, and [`Coach`] keeps the
//! transcript and delivers each reply after a short delay.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// First message shown in every new transcript.
pub const GREETING: &str =
    "Hello! I am your Notary Coach. Ask me about fees, ID rules, or state laws.";

/// Reply given by the scripted responder.
pub const PLACEHOLDER_REPLY: &str =
    "This is a demo response. Add your Gemini API key in settings to get real answers!";

/// Default delay before a reply appears.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(600);

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The notary asking.
    User,
    /// The coach answering.
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub content: String,
}

impl Turn {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Produces the coach's answer to a question.
#[async_trait]
pub trait CoachResponder: Send + Sync {
    /// Answer `question`, given everything said so far.
    async fn respond(&self, transcript: &[Turn], question: &str) -> String;
}

/// Stand-in responder that always returns [`PLACEHOLDER_REPLY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedResponder;

#[async_trait]
impl CoachResponder for ScriptedResponder {
    async fn respond(&self, _transcript: &[Turn], _question: &str) -> String {
        PLACEHOLDER_REPLY.to_string()
    }
}

type Transcript = Mutex<Vec<Turn>>;

/// Chat state for the coach panel.
pub struct Coach {
    transcript: Arc<Transcript>,
    responder: Arc<dyn CoachResponder>,
    delay: Duration,
}

impl std::fmt::Debug for Coach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coach")
            .field("turns", &lock(&self.transcript).len())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Default for Coach {
    fn default() -> Self {
        Self::new(Arc::new(ScriptedResponder), DEFAULT_REPLY_DELAY)
    }
}

impl Coach {
    /// Start a transcript with the greeting.
    #[must_use]
    pub fn new(responder: Arc<dyn CoachResponder>, delay: Duration) -> Self {
        Self {
            transcript: Arc::new(Mutex::new(vec![Turn::new(Role::Assistant, GREETING)])),
            responder,
            delay,
        }
    }

    /// Snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Vec<Turn> {
        lock(&self.transcript).clone()
    }

    /// Ask a question.
    ///
    /// The user's turn is appended immediately; the reply is appended once
    /// the delay has passed. Empty input is ignored and returns `None`.
    ///
    /// Replies are scheduled on the current tokio runtime. Outside one the
    /// question is still recorded but no reply is scheduled, and `None` is
    /// returned.
    pub fn send(&self, input: &str) -> Option<JoinHandle<()>> {
        if input.is_empty() {
            return None;
        }
        lock(&self.transcript).push(Turn::new(Role::User, input));
        debug!(chars = input.len(), "coach question");

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no runtime; coach reply not scheduled");
            return None;
        };
        let transcript = Arc::downgrade(&self.transcript);
        let responder = Arc::clone(&self.responder);
        let delay = self.delay;
        let question = input.to_string();
        Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            deliver_reply(&transcript, responder.as_ref(), &question).await;
        }))
    }
}

async fn deliver_reply(
    transcript: &Weak<Transcript>,
    responder: &dyn CoachResponder,
    question: &str,
) {
    let Some(shared) = transcript.upgrade() else {
        trace!("coach closed before reply");
        return;
    };
    let history = lock(&shared).clone();
    drop(shared);

    let reply = responder.respond(&history, question).await;
    if let Some(shared) = transcript.upgrade() {
        lock(&shared).push(Turn::new(Role::Assistant, reply));
    } else {
        trace!("coach closed before reply");
    }
}

fn lock(transcript: &Transcript) -> MutexGuard<'_, Vec<Turn>> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}
