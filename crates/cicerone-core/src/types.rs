// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Cicerone workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
///
/// Session identifiers are supplied by the voice/chat channel adapter; the
/// engine never fabricates identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Unique identifier for a canonical topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(pub String);

/// Unique identifier for an article chunk in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(pub String);

/// A canonical entity surfaced by search. Immutable after corpus load;
/// many topic keywords map onto one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: TopicId,
    pub title: String,
    /// One engaging sentence about the most interesting fact.
    pub hook: String,
    /// Historical era label ("Victorian", "Tudor", ...), if known.
    pub era: Option<String>,
    /// Area label ("Westminster", "Southwark", ...), if known.
    pub location: Option<String>,
    /// Keyword and phonetic-variant surface forms that resolve to this topic.
    pub keywords: Vec<String>,
}

/// Who produced a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Speaker {
    User,
    Guide,
}

/// One entry in a session's rolling history. Text is truncated at append
/// time; the full utterance never needs to be retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// An article chunk fetched from the corpus for answer composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleChunk {
    pub id: ChunkId,
    pub title: String,
    pub content: String,
}

/// One fused retrieval hit with rank provenance from both sub-searches.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChunk {
    pub chunk_id: ChunkId,
    /// Fused RRF score.
    pub score: f32,
    /// 1-based rank in the vector-similarity list, if present there.
    pub vector_rank: Option<usize>,
    /// 1-based rank in the lexical list, if present there.
    pub lexical_rank: Option<usize>,
}

/// Ranked output of one hybrid retrieval pass. Produced fresh per Stage-2
/// invocation; never persisted.
#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    pub hits: Vec<RankedChunk>,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Generation variants: the cheap/fast acknowledgement style and the fuller
/// researched style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GenerationStyle {
    Teaser,
    Research,
}

/// Context handed to the generation provider for one call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub style: GenerationStyle,
    /// The user's (normalized, possibly enriched) query.
    pub query: String,
    /// Title of the anchored topic, when one is resolved.
    pub topic_title: Option<String>,
    /// Source excerpts the answer must stay inside.
    pub excerpts: Vec<String>,
    /// Last few conversation turns, oldest first.
    pub history: Vec<Turn>,
    /// Prior facts known about this user.
    pub prior_facts: Vec<String>,
    /// Facts already spoken for the current topic; the answer must cover a
    /// different facet.
    pub disclosed: Vec<String>,
    /// Hard cap on answer length, in sentences.
    pub max_sentences: usize,
}

/// Location data for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
}

/// Event for timeline visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: i32,
    pub title: String,
    pub description: String,
}

/// Data for rendering one article card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleCard {
    pub id: ChunkId,
    pub title: String,
    pub excerpt: String,
    pub score: f32,
    pub location: Option<MapLocation>,
    pub era: Option<String>,
}

/// Structured result shapes for the presentation collaborator.
///
/// One variant per renderable shape; the presentation layer matches on the
/// tag instead of probing loosely-typed dictionaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentationPayload {
    Articles { cards: Vec<ArticleCard> },
    Location { location: MapLocation },
    Timeline { era: String, events: Vec<TimelineEvent> },
    Apology,
    None,
}

/// The value returned to the channel adapter for one utterance: the text to
/// speak immediately plus a structured payload for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideReply {
    pub text: String,
    pub payload: PresentationPayload,
}

impl GuideReply {
    /// A plain spoken reply with nothing for the presentation layer.
    pub fn spoken(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: PresentationPayload::None,
        }
    }

    /// An in-voice apology. The engine never returns raw errors to the
    /// speech channel.
    pub fn apology(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: PresentationPayload::Apology,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_display_round_trip() {
        use std::str::FromStr;
        assert_eq!(Speaker::User.to_string(), "user");
        assert_eq!(Speaker::from_str("guide").unwrap(), Speaker::Guide);
    }

    #[test]
    fn presentation_payload_serializes_tagged() {
        let payload = PresentationPayload::Location {
            location: MapLocation {
                name: "Tyburn".into(),
                lat: 51.5127,
                lng: -0.1599,
                description: None,
            },
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"kind\":\"location\""));

        let parsed: PresentationPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn guide_reply_constructors() {
        let reply = GuideReply::spoken("hello");
        assert_eq!(reply.payload, PresentationPayload::None);

        let reply = GuideReply::apology("sorry");
        assert_eq!(reply.payload, PresentationPayload::Apology);
    }

    #[test]
    fn retrieval_result_empty() {
        assert!(RetrievalResult::default().is_empty());
    }
}
