//! Transient toast notifications.
//!
//! [`Notifier::notify`] appends a toast and schedules its removal on the
//! tokio timer. The timer task only holds a weak reference to the toast list,
//! so a notifier that has been dropped is never touched after teardown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::models::next_id_value;

/// Default time a toast stays visible.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

/// Visual kind of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Confirmation of a completed action.
    #[default]
    Success,
    /// Something the user has to fix.
    Error,
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Timestamp-derived identifier.
    pub id: i64,
    /// Message text.
    pub msg: String,
    /// Kind.
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

type ToastList = Mutex<Vec<Toast>>;

/// Ordered list of live toasts.
#[derive(Debug)]
pub struct Notifier {
    toasts: Arc<ToastList>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl Notifier {
    /// Create a notifier whose toasts live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    /// How long each toast stays visible.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `msg` and schedule its removal. Returns the toast id.
    ///
    /// Expiry needs a tokio runtime; outside one the toast stays until
    /// [`Notifier::dismiss`] or [`Notifier::drain`] removes it.
    pub fn notify(&self, msg: impl Into<String>, kind: ToastKind) -> i64 {
        let toast = Toast {
            id: next_id_value(),
            msg: msg.into(),
            kind,
        };
        let id = toast.id;
        debug!(id, %kind, msg = %toast.msg, "toast");
        lock(&self.toasts).push(toast);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let list = Arc::downgrade(&self.toasts);
                let ttl = self.ttl;
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    expire(&list, id);
                });
            }
            Err(_) => trace!(id, "no runtime; toast will not auto-expire"),
        }
        id
    }

    /// Shorthand for a success toast.
    pub fn success(&self, msg: impl Into<String>) -> i64 {
        self.notify(msg, ToastKind::Success)
    }

    /// Shorthand for an error toast.
    pub fn error(&self, msg: impl Into<String>) -> i64 {
        self.notify(msg, ToastKind::Error)
    }

    /// Snapshot of the live toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }

    /// Remove a toast early. Returns `true` if it was still visible.
    pub fn dismiss(&self, id: i64) -> bool {
        let mut toasts = lock(&self.toasts);
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Take every live toast, leaving the list empty.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *lock(&self.toasts))
    }
}

fn expire(list: &Weak<ToastList>, id: i64) {
    match list.upgrade() {
        Some(toasts) => {
            lock(&toasts).retain(|t| t.id != id);
            trace!(id, "toast expired");
        }
        None => trace!(id, "notifier gone; dropping expiry"),
    }
}

fn lock(list: &ToastList) -> MutexGuard<'_, Vec<Toast>> {
    // A panic while holding the lock cannot leave the Vec half-updated.
    list.lock().unwrap_or_else(PoisonError::into_inner)
}
