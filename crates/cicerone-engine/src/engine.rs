// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The turn orchestrator.
//!
//! One `Engine` serves all sessions. Each utterance is normalized, classified
//! by the guard, answered immediately by Stage-1, and (when the turn resolves
//! a topic) backed by a Stage-2 research job spawned into the background.
//! The session mutex is held for the whole turn, so turns for one session
//! are strictly serialized while sessions stay independent.
//!
//! `handle_utterance` is deliberately infallible: every failure mode is
//! spoken as an in-voice apology rather than surfaced as an error to the
//! channel adapter.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use cicerone_config::CiceroneConfig;
use cicerone_core::error::CiceroneError;
use cicerone_core::types::{GuideReply, SessionId, Speaker, TopicRecord};
use cicerone_core::{CorpusSearch, FactMemory, GenerationProvider};
use cicerone_lexicon::{LexicalCache, normalize_utterance};
use cicerone_retrieval::HybridRetriever;
use cicerone_session::{ComposedAnswer, ResearchSlot, SessionContext, SessionRegistry};

use crate::guard::{self, TurnClass};
use crate::stage_one::{self, StageOne};
use crate::stage_two::{ResearchInput, StageTwo};

/// Featured topics offered when a query resolves nothing.
const FEATURED_COUNT: usize = 3;

pub struct Engine {
    config: CiceroneConfig,
    cache: Arc<LexicalCache>,
    stage_one: StageOne,
    stage_two: Arc<StageTwo>,
    memory: Arc<dyn FactMemory>,
    sessions: SessionRegistry,
    featured: Vec<Arc<TopicRecord>>,
}

impl Engine {
    /// Load the topic list, build the lexical cache, and wire the two
    /// responders. Fails only when the corpus itself is unreachable.
    pub async fn bootstrap(
        config: CiceroneConfig,
        corpus: Arc<dyn CorpusSearch>,
        provider: Arc<dyn GenerationProvider>,
        memory: Arc<dyn FactMemory>,
    ) -> Result<Self, CiceroneError> {
        let topics = corpus.load_topics().await?;
        let featured: Vec<Arc<TopicRecord>> = topics
            .iter()
            .take(FEATURED_COUNT)
            .cloned()
            .map(Arc::new)
            .collect();
        let cache = Arc::new(LexicalCache::build(topics, &config.lexicon));

        let retriever = HybridRetriever::new(Arc::clone(&corpus), config.retrieval.clone());
        let stage_two = Arc::new(StageTwo::new(
            retriever,
            Arc::clone(&corpus),
            Arc::clone(&provider),
            config.stage_two.clone(),
        ));
        let stage_one = StageOne::new(provider, config.stage_one.clone());
        let sessions = SessionRegistry::new(config.engine.clone());

        info!(keywords = cache.len(), "engine ready");

        Ok(Self {
            config,
            cache,
            stage_one,
            stage_two,
            memory,
            sessions,
            featured,
        })
    }

    /// Process one user utterance and produce the spoken reply.
    pub async fn handle_utterance(
        &self,
        session_id: &SessionId,
        user: &str,
        utterance: &str,
    ) -> GuideReply {
        let normalized = normalize_utterance(utterance);

        let slot = self.sessions.get_or_create(session_id);
        let mut ctx = slot.lock().await;

        // One fact-memory read per session, done under the lock so two
        // racing first utterances cannot both hit the store.
        if !ctx.prior_facts_loaded() {
            let prior = match self.memory.prior_facts(user).await {
                Ok(facts) => facts,
                Err(e) => {
                    warn!(user = %user, error = %e, "prior-fact read failed, starting cold");
                    vec![]
                }
            };
            ctx.load_prior_facts(prior);
        }

        let seq = ctx.next_seq();
        ctx.push_turn(Speaker::User, &normalized);

        let class = guard::classify(&normalized, &ctx, &self.cache);
        debug!(session = %session_id.0, seq, class = ?class, utterance = %normalized, "turn classified");

        let mut reply = match class {
            TurnClass::ConfirmPending { affirmative: true } => {
                self.confirm_topic(&mut ctx, seq, user, &normalized).await
            }
            TurnClass::ConfirmPending { affirmative: false } => decline_topic(&mut ctx),
            TurnClass::TopicChange(topic) => {
                if ctx.current_topic().is_none() {
                    self.open_topic(&mut ctx, seq, user, topic, &normalized).await
                } else {
                    self.propose_topic(&mut ctx, seq, user, topic, &normalized)
                        .await
                }
            }
            TurnClass::VagueFollowUp => self.vague_follow_up(&mut ctx, seq, &normalized).await,
            TurnClass::Continuation => self.continuation(&mut ctx, seq, user, &normalized).await,
        };

        if self.config.engine.greeting_enabled && !ctx.greeted {
            ctx.greeted = true;
            reply.text = format!("{}{}", stage_one::greeting_line(), reply.text);
        }

        ctx.push_turn(Speaker::Guide, &reply.text);
        info!(session = %session_id.0, seq, "turn handled");
        reply
    }

    /// End a session explicitly (hang-up from the channel adapter).
    pub fn end_session(&self, session_id: &SessionId) {
        self.sessions.remove(session_id);
    }

    /// Evict idle sessions; intended to be driven on a host timer.
    pub async fn sweep_idle(&self) -> usize {
        self.sessions.sweep_idle().await
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// First resolved query: anchor directly, no confirmation round-trip.
    async fn open_topic(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        user: &str,
        topic: Arc<TopicRecord>,
        query: &str,
    ) -> GuideReply {
        ctx.anchor(Arc::clone(&topic));
        ctx.last_suggested_topic = None;
        // The teaser speaks the hook; mark it disclosed so research covers
        // different facets.
        ctx.disclosed.insert(&topic.hook);
        self.record_fact(user, &format!("Asked about {}.", topic.title));
        self.enqueue_research(ctx, seq, Some(Arc::clone(&topic)), query.to_string());

        GuideReply::spoken(self.stage_one.teaser(&topic, query, ctx).await)
    }

    /// A new topic while one is anchored: propose, ask, and start research
    /// early so a confirming "yes" is answered instantly.
    async fn propose_topic(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        user: &str,
        topic: Arc<TopicRecord>,
        query: &str,
    ) -> GuideReply {
        match ctx.propose(Arc::clone(&topic)) {
            Ok(()) => {
                ctx.last_suggested_topic = Some(Arc::clone(&topic));
                self.enqueue_research(ctx, seq, Some(Arc::clone(&topic)), query.to_string());
                GuideReply::spoken(stage_one::confirmation_question(&topic))
            }
            // Self-healed invariant violation upstream; answer on the anchor.
            Err(_) => self.continuation(ctx, seq, user, query).await,
        }
    }

    async fn confirm_topic(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        user: &str,
        normalized: &str,
    ) -> GuideReply {
        match ctx.promote_pending() {
            Some(topic) => {
                // The confirmation question already spoke the hook.
                ctx.disclosed.insert(&topic.hook);
                ctx.last_suggested_topic = None;
                self.record_fact(user, &format!("Asked about {}.", topic.title));
                self.deliver_research(ctx, seq, normalized).await
            }
            None => self.continuation(ctx, seq, user, normalized).await,
        }
    }

    /// Short pronoun-bearing follow-up: enrich the query with the anchor
    /// title, acknowledge, and let research run with the fuller query.
    async fn vague_follow_up(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        normalized: &str,
    ) -> GuideReply {
        let Some(anchor) = ctx.current_topic().cloned() else {
            // Unreachable through the guard, which classifies vague only
            // with an anchor present. Kept in line with the continuation
            // miss path so a following "yes" still opens a suggestion.
            ctx.last_suggested_topic = self.featured.first().cloned();
            return GuideReply::spoken(stage_one::miss_text(&self.featured));
        };
        let enriched = format!("{} {normalized}", anchor.title);
        self.enqueue_research(ctx, seq, Some(Arc::clone(&anchor)), enriched);
        GuideReply::spoken(stage_one::deeper_look_text(&anchor))
    }

    async fn continuation(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        user: &str,
        normalized: &str,
    ) -> GuideReply {
        if guard::wants_more(normalized) {
            // "Yes" to an earlier suggestion before anything is anchored.
            if ctx.current_topic().is_none()
                && let Some(topic) = ctx.last_suggested_topic.clone()
            {
                let query = topic.title.to_lowercase();
                return self.open_topic(ctx, seq, user, topic, &query).await;
            }
            return self.deliver_research(ctx, seq, normalized).await;
        }

        // A literal repeat of an answered question replays from cache.
        if let Some(cached) = ctx.replayable_answer()
            && cached.query == normalized
        {
            debug!(query = %normalized, "replayed cached answer");
            return GuideReply {
                text: cached.text.clone(),
                payload: cached.payload.clone(),
            };
        }

        match ctx.current_topic().cloned() {
            Some(anchor) => {
                self.enqueue_research(ctx, seq, Some(Arc::clone(&anchor)), normalized.to_string());
                GuideReply::spoken(self.stage_one.teaser(&anchor, normalized, ctx).await)
            }
            None => {
                // Nothing resolved and nothing anchored: probe the corpus in
                // the background and offer the featured topics meanwhile.
                self.enqueue_research(ctx, seq, None, normalized.to_string());
                ctx.last_suggested_topic = self.featured.first().cloned();
                GuideReply::spoken(stage_one::miss_text(&self.featured))
            }
        }
    }

    /// Hand over the researched answer: consume the in-flight job when it is
    /// for the current anchor, otherwise research inline under the session
    /// lock. Stale results are discarded, never spoken.
    async fn deliver_research(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        normalized: &str,
    ) -> GuideReply {
        let anchor = ctx.current_topic().cloned();
        let anchor_id = anchor.as_ref().map(|t| t.id.clone());

        let in_flight = match ctx.research.clone() {
            Some(research) if research.topic_id == anchor_id => Some(research.rx),
            _ => None,
        };
        if let Some(rx) = in_flight
            && let Some(answer) = await_answer(rx).await
        {
            if ctx.is_stale(&answer) {
                debug!(seq = answer.seq, "stale research result discarded");
            } else {
                let reply = GuideReply {
                    text: answer.text.clone(),
                    payload: answer.payload.clone(),
                };
                ctx.apply_answer(answer);
                return reply;
            }
        }

        let Some(anchor) = anchor else {
            ctx.last_suggested_topic = self.featured.first().cloned();
            return GuideReply::spoken(stage_one::miss_text(&self.featured));
        };

        // No usable job in flight: the disclosed ledger steers this fresh
        // pass toward facets not yet spoken.
        let input = ResearchInput {
            seq,
            topic: Some(Arc::clone(&anchor)),
            query: format!("{} {normalized}", anchor.title),
            history: ctx.history().cloned().collect(),
            prior_facts: ctx.prior_facts.clone(),
            disclosed: ctx.disclosed.clone(),
        };
        let answer = self.stage_two.run(input).await;
        let reply = GuideReply {
            text: answer.text.clone(),
            payload: answer.payload.clone(),
        };
        if !ctx.is_stale(&answer) {
            ctx.apply_answer(answer);
        }
        reply
    }

    /// Spawn a Stage-2 job for this turn, superseding any earlier one. The
    /// session state is snapshotted here, under the lock; the task never
    /// touches the live context and publishes through the watch channel.
    fn enqueue_research(
        &self,
        ctx: &mut SessionContext,
        seq: u64,
        topic: Option<Arc<TopicRecord>>,
        query: String,
    ) {
        let (tx, rx) = watch::channel(None);
        ctx.research = Some(ResearchSlot {
            seq,
            topic_id: topic.as_ref().map(|t| t.id.clone()),
            rx,
        });

        let input = ResearchInput {
            seq,
            topic,
            query,
            history: ctx.history().cloned().collect(),
            prior_facts: ctx.prior_facts.clone(),
            disclosed: ctx.disclosed.clone(),
        };
        let stage_two = Arc::clone(&self.stage_two);
        tokio::spawn(async move {
            let answer = stage_two.run(input).await;
            // The receiver is gone when a newer job superseded this one.
            let _ = tx.send(Some(answer));
        });
    }

    /// Fire-and-forget fact write; a turn never blocks on memory.
    fn record_fact(&self, user: &str, sentence: &str) {
        let memory = Arc::clone(&self.memory);
        let user = user.to_string();
        let sentence = sentence.to_string();
        tokio::spawn(async move {
            if let Err(e) = memory.record_fact(&user, &sentence).await {
                warn!(user = %user, error = %e, "fact memory write failed");
            }
        });
    }
}

fn decline_topic(ctx: &mut SessionContext) -> GuideReply {
    // Drop the job started for the declined proposal along with it.
    let job_was_for_pending = match (&ctx.research, ctx.pending_topic()) {
        (Some(research), Some(pending)) => research.topic_id.as_ref() == Some(&pending.id),
        _ => false,
    };
    if job_was_for_pending {
        ctx.research = None;
    }
    ctx.discard_pending();
    ctx.last_suggested_topic = None;

    let text = match ctx.current_topic() {
        Some(topic) => format!(
            "Not to worry — we'll stay with {}. What would you like to know?",
            topic.title
        ),
        None => "Not to worry. What would you like to hear about instead?".to_string(),
    };
    GuideReply::spoken(text)
}

/// Wait for the background job to publish. Returns `None` only when the
/// task died without publishing (it always sends, even apologies).
async fn await_answer(mut rx: watch::Receiver<Option<ComposedAnswer>>) -> Option<ComposedAnswer> {
    loop {
        if let Some(answer) = rx.borrow_and_update().clone() {
            return Some(answer);
        }
        if rx.changed().await.is_err() {
            return rx.borrow().clone();
        }
    }
}
