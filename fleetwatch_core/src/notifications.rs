//! Bounded notification log with read/unread tracking.
//!
//! Engines never write to the log directly: they return
//! [`NotificationDraft`]s, and the runtime dispatches them only after the
//! asset update that produced them has been committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Asset id used for fleet-wide events.
pub const SYSTEM_ASSET_ID: &str = "SYS";

/// Default log capacity.
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Critical,
    Warning,
    Info,
}

/// A notification not yet stamped with id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub asset_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationDraft {
    pub fn new(
        asset_id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn info(asset_id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(asset_id, NotificationKind::Info, title, message)
    }

    pub fn warning(asset_id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(asset_id, NotificationKind::Warning, title, message)
    }

    pub fn critical(asset_id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(asset_id, NotificationKind::Critical, title, message)
    }
}

/// A dispatched notification. Only `read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub asset_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Configuration for the notification log.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Maximum retained entries; the oldest is evicted first
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Append-only bounded FIFO of notifications, newest first.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    capacity: usize,
    next_seq: u64,
}

impl NotificationLog {
    pub fn new(config: NotificationConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Stamps and stores a draft, evicting the oldest entry when full.
    /// Returns the id of the new notification.
    pub fn push(&mut self, draft: NotificationDraft, timestamp: DateTime<Utc>) -> String {
        self.next_seq += 1;
        let id = format!("NTF-{:06}", self.next_seq);

        self.entries.push_front(Notification {
            id: id.clone(),
            asset_id: draft.asset_id,
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            timestamp,
            read: false,
        });

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::trace!("Evicted notification {}", evicted.id);
            }
        }

        id
    }

    /// Marks one notification as read. Returns false if the id is unknown.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for n in self.entries.iter_mut() {
            n.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}
