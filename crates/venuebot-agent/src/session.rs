// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation sessions keyed by sender identity.
//!
//! A [`Conversation`] is seeded once with the instruction text (and so with a
//! point-in-time copy of the knowledge base). It lives until it fails, goes
//! idle, or is pushed out by newer conversations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use venuebot_config::model::SessionConfig;
use venuebot_core::chat::ChatTurn;
use venuebot_core::{SessionId, VenueError};

/// One open exchange with the model.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: SessionId,
    /// Rendered instruction, fixed for the life of the conversation.
    pub system_instruction: String,
    /// History, oldest first.
    pub turns: Vec<ChatTurn>,
    pub started_at: chrono::NaiveDateTime,
}

impl Conversation {
    pub fn new(
        id: SessionId,
        system_instruction: String,
        started_at: chrono::NaiveDateTime,
    ) -> Self {
        Self {
            id,
            system_instruction,
            turns: Vec::new(),
            started_at,
        }
    }
}

/// Holding the lock serializes turns for one identity.
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Storage for open conversations.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// The open conversation for `id`, if any.
    async fn get(&self, id: &SessionId) -> Result<Option<SharedConversation>, VenueError>;

    /// Stores `conversation` unless one is already open for its id, and
    /// returns whichever is stored.
    async fn create(&self, conversation: Conversation) -> Result<SharedConversation, VenueError>;

    /// Drops the conversation for `id`. Unknown ids are ignored.
    async fn evict(&self, id: &SessionId) -> Result<(), VenueError>;

    /// Number of open conversations.
    async fn count(&self) -> usize;
}

struct Entry {
    conversation: SharedConversation,
    last_used: Instant,
}

/// In-process session store bounded by size (least recently used goes first)
/// and by idle time.
pub struct InMemorySessionStore {
    entries: DashMap<SessionId, Entry>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_limits(
            config.max_sessions,
            Duration::from_secs(config.idle_timeout_secs),
        )
    }

    pub fn with_limits(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_used) > self.idle_timeout
    }

    fn purge_expired(&self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry, now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "dropped idle conversations");
        }
    }

    fn evict_least_recent(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_used)
            .map(|entry| entry.key().clone());
        if let Some(id) = oldest {
            self.entries.remove(&id);
            debug!(session = %id, "session limit reached, dropped least recent conversation");
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<SharedConversation>, VenueError> {
        let now = Instant::now();
        let expired = match self.entries.get_mut(id) {
            None => return Ok(None),
            Some(mut entry) => {
                if self.is_expired(&entry, now) {
                    true
                } else {
                    entry.last_used = now;
                    return Ok(Some(entry.conversation.clone()));
                }
            }
        };
        if expired {
            self.entries.remove(id);
            debug!(session = %id, "conversation expired");
        }
        Ok(None)
    }

    async fn create(&self, conversation: Conversation) -> Result<SharedConversation, VenueError> {
        let now = Instant::now();
        self.purge_expired(now);
        if !self.entries.contains_key(&conversation.id) && self.entries.len() >= self.max_sessions
        {
            self.evict_least_recent();
        }

        let mut entry = self
            .entries
            .entry(conversation.id.clone())
            .or_insert_with(|| Entry {
                conversation: Arc::new(Mutex::new(conversation)),
                last_used: now,
            });
        entry.last_used = now;
        Ok(entry.conversation.clone())
    }

    async fn evict(&self, id: &SessionId) -> Result<(), VenueError> {
        if self.entries.remove(id).is_some() {
            debug!(session = %id, "conversation evicted");
        }
        Ok(())
    }

    async fn count(&self) -> usize {
        self.entries.len()
    }
}
