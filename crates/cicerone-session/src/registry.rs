// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session registry: per-session slots with serialized turn processing.
//!
//! Each session owns one `Mutex<SessionContext>`; a turn holds the lock
//! through classification and state mutation, so no two turns for the same
//! session are ever processed concurrently, while different sessions run
//! fully independently.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use cicerone_config::EngineConfig;
use cicerone_core::types::SessionId;

use crate::context::SessionContext;

/// In-memory registry of live sessions.
///
/// Sessions are created on the first utterance of a session key and
/// destroyed explicitly or by the idle sweep. No persistence: a restart
/// starts every conversation fresh.
pub struct SessionRegistry {
    slots: DashMap<SessionId, Arc<Mutex<SessionContext>>>,
    config: EngineConfig,
}

impl SessionRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            slots: DashMap::new(),
            config,
        }
    }

    /// Whether a session already exists for this key.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.slots.contains_key(id)
    }

    /// Fetch the session slot, creating an empty one on first use. Prior
    /// facts are hydrated by the first turn under the session lock, so a
    /// racing second creation never wastes a memory read.
    pub fn get_or_create(&self, id: &SessionId) -> Arc<Mutex<SessionContext>> {
        if let Some(slot) = self.slots.get(id) {
            return Arc::clone(&slot);
        }

        let slot = Arc::new(Mutex::new(SessionContext::new(
            self.config.history_limit,
            self.config.history_truncate_chars,
        )));
        debug!(session = %id.0, "session created");
        self.slots
            .entry(id.clone())
            .or_insert_with(|| Arc::clone(&slot))
            .clone()
    }

    /// Destroy a session explicitly (session end from the channel).
    pub fn remove(&self, id: &SessionId) {
        if self.slots.remove(id).is_some() {
            debug!(session = %id.0, "session removed");
        }
    }

    /// Evict sessions idle for longer than the configured timeout.
    /// Returns the number evicted. Intended to be called periodically by
    /// the host.
    pub async fn sweep_idle(&self) -> usize {
        let timeout = chrono::TimeDelta::seconds(self.config.idle_timeout_secs as i64);
        let now = Utc::now();

        let mut expired: Vec<SessionId> = Vec::new();
        for entry in self.slots.iter() {
            // try_lock: a session mid-turn is by definition not idle.
            if let Ok(ctx) = entry.value().try_lock()
                && now - ctx.last_activity() > timeout
            {
                expired.push(entry.key().clone());
            }
        }

        for id in &expired {
            self.slots.remove(id);
        }

        if !expired.is_empty() {
            info!(evicted = expired.len(), "idle sessions evicted");
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
