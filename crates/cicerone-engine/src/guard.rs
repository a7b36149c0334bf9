// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic drift and confirmation guard.
//!
//! Classifies each incoming turn against the session state and gates whether
//! the topic anchor may change. Precedence is explicit and fixed:
//! confirmation replies (while a proposal is pending), then topic-change
//! detection, then vague-follow-up detection, then same-topic continuation.
//! Topic-change runs before vague-follow-up so an utterance that both names
//! a new topic and contains a pronoun switches rather than enriches.

use std::sync::Arc;

use tracing::debug;

use cicerone_core::types::TopicRecord;
use cicerone_lexicon::{LexicalCache, tokenize};
use cicerone_session::SessionContext;

/// Classification of one turn.
#[derive(Debug, Clone)]
pub enum TurnClass {
    /// A yes/no reply to a pending topic-change proposal.
    ConfirmPending { affirmative: bool },
    /// The utterance names a topic different from the anchor. Whether this
    /// anchors directly (no anchor yet) or becomes a pending proposal is the
    /// engine's call.
    TopicChange(Arc<TopicRecord>),
    /// Short, pronoun-bearing follow-up: the query is enriched with the
    /// anchor title before retrieval, the anchor does not move.
    VagueFollowUp,
    /// Anything else; resolves against the anchor unchanged.
    Continuation,
}

/// Token count below which a pronoun-bearing utterance counts as vague.
const VAGUE_TOKEN_THRESHOLD: usize = 8;

/// Pronouns and demonstratives that signal a vague follow-up.
const PRONOUNS: &[&str] = &["it", "that", "this", "there", "they", "them", "its", "the"];

const AFFIRMATIVES: &[&str] = &[
    "yes", "yeah", "yep", "sure", "please", "ok", "okay", "aye", "definitely", "absolutely",
];

const NEGATIVES: &[&str] = &["no", "nope", "nah", "not"];

/// Phrases that ask for the deeper, already-researched answer.
const CONTINUE_PHRASES: &[&str] = &["tell me more", "go on", "continue", "more please", "carry on"];

/// Classify a normalized utterance against the session state.
pub fn classify(
    utterance: &str,
    ctx: &SessionContext,
    cache: &LexicalCache,
) -> TurnClass {
    let tokens = tokenize(utterance);

    // 1. A pending proposal turns the next yes/no into a confirmation reply.
    if ctx.pending_topic().is_some() {
        if is_affirmative(&tokens) {
            return TurnClass::ConfirmPending { affirmative: true };
        }
        if is_negative(&tokens) {
            return TurnClass::ConfirmPending { affirmative: false };
        }
        // Neither: fall through, the user changed direction mid-proposal.
    }

    // 2. Topic-change check before vague-follow-up (documented precedence).
    if let Some(hit) = cache.lookup(utterance) {
        let differs = ctx
            .current_topic()
            .map(|anchor| anchor.id != hit.topic.id)
            .unwrap_or(true);
        // Enough distinctive overlap: the matched phrase must not merely
        // echo words from the anchor's own title.
        if differs && !echoes_anchor(&hit.matched, ctx) {
            debug!(matched = %hit.matched, topic = %hit.topic.id.0, "topic-change detected");
            return TurnClass::TopicChange(Arc::clone(&hit.topic));
        }
    }

    // 3. Vague follow-up: short, pronoun-bearing, not naming the anchor.
    if ctx.current_topic().is_some()
        && tokens.len() < VAGUE_TOKEN_THRESHOLD
        && tokens.iter().any(|t| PRONOUNS.contains(&t.as_str()))
        && !names_anchor(&tokens, ctx)
    {
        return TurnClass::VagueFollowUp;
    }

    TurnClass::Continuation
}

/// Whether the turn asks to hear the deeper answer ("yes", "tell me more").
pub fn wants_more(utterance: &str) -> bool {
    let tokens = tokenize(utterance);
    if tokens.is_empty() {
        return false;
    }
    if is_affirmative(&tokens) {
        return true;
    }
    let joined = tokens.join(" ");
    CONTINUE_PHRASES.iter().any(|p| joined.contains(p))
}

/// A short reply made only of affirmative tokens ("yes", "yes please").
pub fn is_affirmative(tokens: &[String]) -> bool {
    !tokens.is_empty()
        && tokens.len() <= 3
        && tokens.iter().all(|t| AFFIRMATIVES.contains(&t.as_str()))
}

/// A short reply led by a negative token ("no", "no thanks", "not now").
pub fn is_negative(tokens: &[String]) -> bool {
    !tokens.is_empty() && tokens.len() <= 3 && NEGATIVES.contains(&tokens[0].as_str())
}

/// Distinctive anchor-title tokens present in the utterance.
fn names_anchor(tokens: &[String], ctx: &SessionContext) -> bool {
    let Some(anchor) = ctx.current_topic() else {
        return false;
    };
    let title_tokens = tokenize(&anchor.title);
    tokens
        .iter()
        .any(|t| t.len() >= 3 && title_tokens.contains(t))
}

/// Whether a matched cache phrase is just an echo of the anchor's title.
fn echoes_anchor(matched: &str, ctx: &SessionContext) -> bool {
    let Some(anchor) = ctx.current_topic() else {
        return false;
    };
    let title_tokens = tokenize(&anchor.title);
    tokenize(matched)
        .iter()
        .all(|t| title_tokens.contains(t))
}
