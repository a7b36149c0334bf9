// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term user fact memory collaborator.

use async_trait::async_trait;

use crate::error::CiceroneError;

/// Read/write boundary to the long-term user memory store.
///
/// The engine reads a small set of prior-fact strings when a session starts
/// and writes short declarative sentences whenever a topic is confidently
/// resolved. Storage, deduplication, and retention live behind this trait.
#[async_trait]
pub trait FactMemory: Send + Sync {
    /// Facts previously recorded for this user, most relevant first.
    async fn prior_facts(&self, user: &str) -> Result<Vec<String>, CiceroneError>;

    /// Record one declarative fact sentence. Called fire-and-forget: the
    /// engine logs failures but never blocks a turn on this write.
    async fn record_fact(&self, user: &str, sentence: &str) -> Result<(), CiceroneError>;
}
