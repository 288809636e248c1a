//! Dismissible user-facing notifications.
//!
//! Notifications expire on their own once the host reports enough elapsed
//! time through [`NotificationCenter::expire`]. Time is whatever monotonic
//! clock the host keeps; the center only compares durations.

use std::time::Duration;

/// Most notifications kept at once; the oldest is dropped first.
pub const MAX_NOTIFICATIONS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl NotificationLevel {
    /// How long a notification of this level stays up.
    pub fn lifetime(self) -> Duration {
        match self {
            Self::Error => Duration::from_secs(5),
            Self::Info | Self::Success => Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    /// Host time at which the notification was queued.
    pub created: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Duration {
        self.created + self.level.lifetime()
    }
}

/// Queue of notifications shown until dismissed or expired. Oldest first.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    next_id: u64,
    /// Latest host time seen by [`NotificationCenter::expire`].
    now: Duration,
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification and return its id.
    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        if level == NotificationLevel::Error {
            log::warn!("{message}");
        }
        if self.items.len() == MAX_NOTIFICATIONS {
            self.items.remove(0);
        }
        self.items.push(Notification {
            id,
            level,
            message,
            created: self.now,
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Error, message)
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Advance to host time `now` and drop every notification whose
    /// lifetime has run out. Returns how many were dropped.
    pub fn expire(&mut self, now: Duration) -> usize {
        self.now = self.now.max(now);
        let before = self.items.len();
        let now = self.now;
        self.items.retain(|n| n.expires_at() > now);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
