// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation mutable state.
//!
//! One `SessionContext` exists per active conversation, owned exclusively by
//! that session's turn-processing path. Access is serialized by the registry
//! (one mutex per session key), so no field here needs its own lock.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::warn;

use cicerone_core::error::CiceroneError;
use cicerone_core::types::{PresentationPayload, Speaker, TopicId, TopicRecord, Turn};

use crate::facts::FactLedger;

/// A fully composed Stage-2 answer, published by the background research
/// task and reconciled into the session by the next turn.
#[derive(Debug, Clone)]
pub struct ComposedAnswer {
    /// Turn sequence number of the triggering turn, for stale detection.
    pub seq: u64,
    /// Topic the answer was computed for.
    pub topic_id: Option<TopicId>,
    /// The resolved query the answer addresses.
    pub query: String,
    pub text: String,
    /// Fingerprint sources to merge into the ledger when applied.
    pub facts: Vec<String>,
    pub payload: PresentationPayload,
}

/// The single in-flight research job for a session.
///
/// Holding a watch receiver rather than a join handle lets any number of
/// later turns await the same job without duplicating retrieval.
#[derive(Debug, Clone)]
pub struct ResearchSlot {
    pub seq: u64,
    pub topic_id: Option<TopicId>,
    pub rx: watch::Receiver<Option<ComposedAnswer>>,
}

/// A Stage-2 answer cached for instant replay on the confirming turn.
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    pub topic_id: Option<TopicId>,
    pub query: String,
    pub text: String,
    pub payload: PresentationPayload,
}

/// Per-conversation mutable record.
pub struct SessionContext {
    /// Rolling history, oldest first, bounded by `history_limit`.
    history: VecDeque<Turn>,
    history_limit: usize,
    truncate_chars: usize,

    /// The topic anchor. Set only by confirmed topic changes or the first
    /// resolved query.
    current_topic: Option<Arc<TopicRecord>>,
    /// Proposed topic awaiting user confirmation. Never equal to the anchor.
    pending_topic: Option<Arc<TopicRecord>>,
    /// Facts already spoken for the current topic.
    pub disclosed: FactLedger,
    /// Set once per session lifetime.
    pub greeted: bool,
    /// The topic last offered in a follow-up suggestion, so a later "yes"
    /// can be told apart from a direct topic statement.
    pub last_suggested_topic: Option<Arc<TopicRecord>>,

    /// Prior facts about this user, read from fact memory at session start.
    pub prior_facts: Vec<String>,
    /// Whether the one-time fact-memory read happened yet. Set even when the
    /// read fails, so a failure never turns into a retry storm.
    prior_facts_loaded: bool,

    /// Monotonically increasing per-session turn counter.
    turn_seq: u64,
    /// Seq of the last research result applied, for out-of-order suppression.
    last_applied_seq: u64,

    /// The single in-flight Stage-2 job, if any.
    pub research: Option<ResearchSlot>,
    /// The last applied Stage-2 answer, for instant replay.
    pub cached_answer: Option<CachedAnswer>,

    last_activity: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(history_limit: usize, truncate_chars: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(history_limit),
            history_limit: history_limit.max(1),
            truncate_chars: truncate_chars.max(16),
            current_topic: None,
            pending_topic: None,
            disclosed: FactLedger::new(),
            greeted: false,
            last_suggested_topic: None,
            prior_facts: Vec::new(),
            prior_facts_loaded: false,
            turn_seq: 0,
            last_applied_seq: 0,
            research: None,
            cached_answer: None,
            last_activity: Utc::now(),
        }
    }

    pub fn current_topic(&self) -> Option<&Arc<TopicRecord>> {
        self.current_topic.as_ref()
    }

    pub fn pending_topic(&self) -> Option<&Arc<TopicRecord>> {
        self.pending_topic.as_ref()
    }

    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter()
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn prior_facts_loaded(&self) -> bool {
        self.prior_facts_loaded
    }

    /// Record the outcome of the one-time fact-memory read. Done under the
    /// session lock, so exactly one turn performs the read.
    pub fn load_prior_facts(&mut self, facts: Vec<String>) {
        self.prior_facts = facts;
        self.prior_facts_loaded = true;
    }

    /// Append a turn, truncating its text and evicting the oldest entry
    /// once the bound is reached.
    pub fn push_turn(&mut self, speaker: Speaker, text: &str) {
        let mut text = text.trim().to_string();
        if text.len() > self.truncate_chars {
            let cut = text
                .char_indices()
                .map(|(i, _)| i)
                .take_while(|i| *i <= self.truncate_chars)
                .last()
                .unwrap_or(0);
            text.truncate(cut);
        }

        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(Turn { speaker, text });
        self.last_activity = Utc::now();
    }

    /// Allocate the sequence number for a newly classified turn.
    pub fn next_seq(&mut self) -> u64 {
        self.turn_seq += 1;
        self.turn_seq
    }

    pub fn current_seq(&self) -> u64 {
        self.turn_seq
    }

    /// Anchor the conversation directly (first resolved query only; later
    /// changes go through the pending/confirm path). Any pending proposal is
    /// dropped, so the pending≠current invariant holds regardless of the
    /// caller's ordering.
    pub fn anchor(&mut self, topic: Arc<TopicRecord>) {
        self.current_topic = Some(topic);
        self.pending_topic = None;
        self.disclosed.clear();
        self.cached_answer = None;
    }

    /// Propose a topic change, to be confirmed or discarded by a later turn.
    ///
    /// The proposed topic must differ from the anchor. A violation is a
    /// programming defect upstream: it panics under debug assertions and
    /// self-heals (pending stays clear) in release builds.
    pub fn propose(&mut self, topic: Arc<TopicRecord>) -> Result<(), CiceroneError> {
        if let Some(current) = &self.current_topic
            && current.id == topic.id
        {
            debug_assert!(
                false,
                "pending topic must never equal the current anchor: {}",
                topic.id.0
            );
            warn!(topic = %topic.id.0, "refusing to propose the current anchor, self-healing");
            self.pending_topic = None;
            return Err(CiceroneError::InvariantViolation(format!(
                "pending topic {} equals current anchor",
                topic.id.0
            )));
        }
        self.pending_topic = Some(topic);
        Ok(())
    }

    /// Promote the pending topic to the anchor: clears disclosed facts and
    /// the cached answer, returns the new anchor.
    pub fn promote_pending(&mut self) -> Option<Arc<TopicRecord>> {
        let topic = self.pending_topic.take()?;
        self.current_topic = Some(Arc::clone(&topic));
        self.disclosed.clear();
        self.cached_answer = None;
        Some(topic)
    }

    /// Discard the pending topic, leaving the anchor untouched.
    pub fn discard_pending(&mut self) {
        self.pending_topic = None;
    }

    /// Decide whether a research result may still be applied.
    ///
    /// Stale when an older turn's result arrives after a newer one was
    /// applied, or when the anchor moved away from the topic the job was
    /// computed for. Stale results are discarded silently; they are not
    /// errors.
    pub fn is_stale(&self, answer: &ComposedAnswer) -> bool {
        if answer.seq <= self.last_applied_seq {
            return true;
        }
        let current_id = self.current_topic.as_ref().map(|t| &t.id);
        answer.topic_id.as_ref() != current_id
    }

    /// Apply a fresh research result: merge fact fingerprints, cache the
    /// answer for replay, and advance the applied-seq watermark.
    pub fn apply_answer(&mut self, answer: ComposedAnswer) {
        for fact in &answer.facts {
            self.disclosed.insert(fact);
        }
        self.last_applied_seq = answer.seq;
        self.cached_answer = Some(CachedAnswer {
            topic_id: answer.topic_id,
            query: answer.query,
            text: answer.text,
            payload: answer.payload,
        });
        if self
            .research
            .as_ref()
            .map(|slot| slot.seq <= self.last_applied_seq)
            .unwrap_or(false)
        {
            self.research = None;
        }
    }

    /// The cached answer for the current anchor, if one is ready.
    pub fn replayable_answer(&self) -> Option<&CachedAnswer> {
        let cached = self.cached_answer.as_ref()?;
        let current_id = self.current_topic.as_ref().map(|t| &t.id);
        (cached.topic_id.as_ref() == current_id).then_some(cached)
    }
}
