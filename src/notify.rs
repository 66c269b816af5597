use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Pending toasts, oldest first. Every message is also logged.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    pending: Vec<Notification>,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("notify: {message}");
        self.pending.push(Notification {
            message,
            kind: NotificationKind::Success,
        });
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("notify: {message}");
        self.pending.push(Notification {
            message,
            kind: NotificationKind::Failure,
        });
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_in_order() {
        let mut notifications = Notifications::default();
        notifications.failure("Email not registered");
        notifications.success("ok");
        assert_eq!(notifications.pending()[1].kind, NotificationKind::Success);

        let drained = notifications.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "Email not registered");
        assert!(notifications.pending().is_empty());
    }
}
