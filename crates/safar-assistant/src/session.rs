//! In-memory session store.
//!
//! Maps opaque chat ids to live model sessions. Sessions exist only for
//! the process lifetime; a restart loses them all and clients simply get
//! fresh ids. Each entry is wrapped in its own async mutex so that two
//! requests carrying the same chat id serialize against each other
//! without blocking unrelated sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::error::AssistantError;
use crate::gateway::{ModelGateway, SessionHandle};

/// One stored session: the opaque gateway handle plus bookkeeping.
pub struct SessionEntry {
    pub handle: SessionHandle,
    last_used_at: i64,
}

impl SessionEntry {
    fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            last_used_at: Utc::now().timestamp(),
        }
    }

    fn is_expired(&self, ttl_minutes: u32) -> bool {
        let age_secs = Utc::now().timestamp().saturating_sub(self.last_used_at);
        age_secs >= i64::from(ttl_minutes) * 60
    }

    fn touch(&mut self) {
        self.last_used_at = Utc::now().timestamp();
    }
}

/// Outcome of resolving a chat id against the store.
pub struct ResolvedSession {
    /// The id the reply must echo back; freshly minted when no usable
    /// session existed.
    pub chat_id: String,
    pub entry: Arc<tokio::sync::Mutex<SessionEntry>>,
    pub is_new: bool,
}

/// Keyed map of live sessions with lazy TTL expiry.
pub struct SessionStore {
    entries: Mutex<HashMap<String, Arc<tokio::sync::Mutex<SessionEntry>>>>,
    ttl_minutes: u32,
}

impl SessionStore {
    pub fn new(ttl_minutes: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_minutes,
        }
    }

    /// Resolve a chat id to a live session, creating one when the id is
    /// absent, unknown, or expired.
    ///
    /// Expiry is checked on access; there is no background sweeper. A
    /// presented id that has expired is dropped and replaced by a fresh
    /// session under a fresh id, never resurrected.
    pub async fn get_or_create(
        &self,
        chat_id: Option<&str>,
        gateway: &dyn ModelGateway,
        system_instruction: &str,
    ) -> Result<ResolvedSession, AssistantError> {
        if let Some(id) = chat_id {
            let existing = {
                let mut entries = self.entries.lock().expect("session map lock poisoned");
                match entries.get(id) {
                    Some(entry) => {
                        // Peek at expiry without waiting on the entry's own
                        // lock; a stale timestamp here only delays expiry by
                        // one turn.
                        let expired = entry
                            .try_lock()
                            .map(|guard| guard.is_expired(self.ttl_minutes))
                            .unwrap_or(false);
                        if expired {
                            tracing::info!(chat_id = %id, "Dropping expired session");
                            entries.remove(id);
                            None
                        } else {
                            Some(Arc::clone(entry))
                        }
                    }
                    None => None,
                }
            };

            if let Some(entry) = existing {
                entry.lock().await.touch();
                tracing::debug!(chat_id = %id, "Reusing existing session");
                return Ok(ResolvedSession {
                    chat_id: id.to_string(),
                    entry,
                    is_new: false,
                });
            }
            tracing::info!(chat_id = %id, "Presented chat id has no live session, starting fresh");
        }

        // Start the session outside the map lock; the gateway call may
        // take a network round trip.
        let handle = gateway.start_session(system_instruction).await?;
        let id = Uuid::new_v4().to_string();
        let entry = Arc::new(tokio::sync::Mutex::new(SessionEntry::new(handle)));

        self.entries
            .lock()
            .expect("session map lock poisoned")
            .insert(id.clone(), Arc::clone(&entry));

        tracing::info!(chat_id = %id, "Started new session");
        Ok(ResolvedSession {
            chat_id: id,
            entry,
            is_new: true,
        })
    }

    /// Number of live entries (expired ones included until next access).
    pub fn len(&self) -> usize {
        self.entries.lock().expect("session map lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
