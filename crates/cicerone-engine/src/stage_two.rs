// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage-2 responder: hybrid retrieval, facet selection, and grounded answer
//! composition, run as a background task per triggering turn.
//!
//! `run` is infallible by construction. Every failure mode (retrieval error,
//! empty corpus, provider timeout after retry) degrades to an in-voice
//! apology answer; the raw error never reaches the speech channel.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use cicerone_config::StageTwoConfig;
use cicerone_core::error::CiceroneError;
use cicerone_core::types::{
    ArticleCard, ArticleChunk, GenerationRequest, GenerationStyle, PresentationPayload,
    TopicRecord, Turn,
};
use cicerone_core::{CorpusSearch, GenerationProvider};
use cicerone_lexicon::{detect_era, locate, locate_by_name, timeline_for};
use cicerone_retrieval::HybridRetriever;
use cicerone_session::{ComposedAnswer, FactLedger};

/// Chunks fetched for answer composition; retrieval ranks many more, only
/// the head is worth reading aloud.
const COMPOSE_CHUNKS: usize = 3;

/// Excerpt length handed to the provider per chunk.
const EXCERPT_CHARS: usize = 600;

const APOLOGY_NO_RESULTS: &str = "I'm sorry — I had a good rummage through the archives \
     but found nothing on that. Perhaps try another place or name?";

const APOLOGY_FAILURE: &str = "I'm terribly sorry — my memory is failing me on that one. \
     Do ask me again in a moment.";

/// Snapshot of session state taken under the session lock when the job is
/// enqueued. The background task never touches the live context.
#[derive(Debug, Clone)]
pub struct ResearchInput {
    pub seq: u64,
    pub topic: Option<Arc<TopicRecord>>,
    pub query: String,
    pub history: Vec<Turn>,
    pub prior_facts: Vec<String>,
    pub disclosed: FactLedger,
}

pub struct StageTwo {
    retriever: HybridRetriever,
    corpus: Arc<dyn CorpusSearch>,
    provider: Arc<dyn GenerationProvider>,
    config: StageTwoConfig,
}

impl StageTwo {
    pub fn new(
        retriever: HybridRetriever,
        corpus: Arc<dyn CorpusSearch>,
        provider: Arc<dyn GenerationProvider>,
        config: StageTwoConfig,
    ) -> Self {
        Self {
            retriever,
            corpus,
            provider,
            config,
        }
    }

    /// Run one research job to a composed answer.
    pub async fn run(&self, input: ResearchInput) -> ComposedAnswer {
        let topic_id = input.topic.as_ref().map(|t| t.id.clone());

        let retrieval = match self.retriever.retrieve(&input.query).await {
            Ok(r) => r,
            Err(e) => {
                warn!(query = %input.query, error = %e, "retrieval failed");
                return apology(&input, topic_id, APOLOGY_FAILURE);
            }
        };

        if retrieval.is_empty() {
            debug!(query = %input.query, "no retrieval hits");
            return apology(&input, topic_id, APOLOGY_NO_RESULTS);
        }

        let head: Vec<_> = retrieval
            .hits
            .iter()
            .take(COMPOSE_CHUNKS)
            .map(|h| h.chunk_id.clone())
            .collect();
        let chunks = match self.corpus.fetch_chunks(&head).await {
            Ok(chunks) if !chunks.is_empty() => chunks,
            Ok(_) => return apology(&input, topic_id, APOLOGY_NO_RESULTS),
            Err(e) => {
                warn!(error = %e, "chunk fetch failed");
                return apology(&input, topic_id, APOLOGY_FAILURE);
            }
        };

        // Pick facets not already spoken for this topic.
        let facets = select_facets(&chunks, &input.disclosed, self.config.max_sentences);

        let request = GenerationRequest {
            style: GenerationStyle::Research,
            query: input.query.clone(),
            topic_title: input.topic.as_ref().map(|t| t.title.clone()),
            excerpts: chunks
                .iter()
                .map(|c| truncate_excerpt(&c.content, EXCERPT_CHARS))
                .collect(),
            history: input.history.clone(),
            prior_facts: input.prior_facts.clone(),
            disclosed: input.disclosed.fingerprints().map(str::to_string).collect(),
            max_sentences: self.config.max_sentences,
        };

        let text = match self.generate_with_retry(request).await {
            Ok(text) => cap_sentences(&text, self.config.max_sentences),
            Err(e) => {
                warn!(query = %input.query, error = %e, "generation failed after retry");
                return apology(&input, topic_id, APOLOGY_FAILURE);
            }
        };

        let payload = build_payload(&input, &retrieval.hits, &chunks);

        info!(
            seq = input.seq,
            query = %input.query,
            facets = facets.len(),
            "research answer composed"
        );

        ComposedAnswer {
            seq: input.seq,
            topic_id,
            query: input.query,
            text,
            facts: facets,
            payload,
        }
    }

    /// One retry after a backoff, then give up.
    async fn generate_with_retry(&self, request: GenerationRequest) -> Result<String, CiceroneError> {
        let budget = Duration::from_millis(self.config.generation_timeout_ms);

        match self.timed_generate(request.clone(), budget).await {
            Ok(text) => Ok(text),
            Err(first) => {
                warn!(error = %first, "generation attempt failed, retrying once");
                tokio::time::sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                self.timed_generate(request, budget).await
            }
        }
    }

    async fn timed_generate(
        &self,
        request: GenerationRequest,
        budget: Duration,
    ) -> Result<String, CiceroneError> {
        match tokio::time::timeout(budget, self.provider.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(CiceroneError::Timeout { duration: budget }),
        }
    }
}

fn apology(input: &ResearchInput, topic_id: Option<cicerone_core::types::TopicId>, text: &str) -> ComposedAnswer {
    ComposedAnswer {
        seq: input.seq,
        topic_id,
        query: input.query.clone(),
        text: text.to_string(),
        facts: vec![],
        payload: PresentationPayload::Apology,
    }
}

/// Select up to `max` source sentences covering facets not yet spoken.
/// Works down the ranked chunks so the best sources contribute first; falls
/// back to already-spoken material only when every candidate is exhausted.
pub fn select_facets(chunks: &[ArticleChunk], disclosed: &FactLedger, max: usize) -> Vec<String> {
    let mut fresh: Vec<String> = Vec::new();
    let mut spoken: Vec<String> = Vec::new();

    for chunk in chunks {
        for sentence in split_sentences(&chunk.content) {
            if sentence.split_whitespace().count() < 4 {
                continue;
            }
            if disclosed.overlaps(&sentence) {
                spoken.push(sentence);
            } else if !fresh.iter().any(|f| f == &sentence) {
                fresh.push(sentence);
            }
            if fresh.len() == max {
                return fresh;
            }
        }
    }

    fresh.extend(spoken.into_iter().take(max - fresh.len().min(max)));
    fresh.truncate(max);
    fresh
}

/// Split text into trimmed sentences, keeping terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let s = current.trim().to_string();
            if !s.is_empty() {
                sentences.push(s);
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Hard length cap for the spoken answer.
pub fn cap_sentences(text: &str, max: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max {
        return text.trim().to_string();
    }
    sentences[..max].join(" ")
}

fn truncate_excerpt(content: &str, max_chars: usize) -> String {
    if content.len() <= max_chars {
        return content.to_string();
    }
    let cut = content
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= max_chars)
        .last()
        .unwrap_or(0);
    format!("{}…", &content[..cut])
}

/// Choose the presentation shape from the query intent and what the sources
/// actually carry: a "where" question with a located place renders the map,
/// an era/timeline question with a known era renders the timeline, anything
/// else renders article cards.
fn build_payload(
    input: &ResearchInput,
    hits: &[cicerone_core::types::RankedChunk],
    chunks: &[ArticleChunk],
) -> PresentationPayload {
    let cards: Vec<ArticleCard> = chunks
        .iter()
        .map(|chunk| {
            let score = hits
                .iter()
                .find(|h| h.chunk_id == chunk.id)
                .map(|h| h.score)
                .unwrap_or(0.0);
            ArticleCard {
                id: chunk.id.clone(),
                title: chunk.title.clone(),
                excerpt: truncate_excerpt(&chunk.content, 200),
                score,
                location: locate(&chunk.title, &chunk.content),
                era: detect_era(&chunk.content),
            }
        })
        .collect();

    let query = input.query.to_lowercase();

    if query.contains("where") {
        // The anchored topic's own name is the best pin; the sources are
        // the fallback.
        let location = input
            .topic
            .as_ref()
            .and_then(|t| locate_by_name(&t.title))
            .or_else(|| cards.iter().find_map(|c| c.location.clone()));
        if let Some(location) = location {
            return PresentationPayload::Location { location };
        }
    }

    if query.contains("timeline") || query.contains("era") || query.contains("when was") {
        let era = cards
            .iter()
            .find_map(|c| c.era.clone())
            .or_else(|| input.topic.as_ref().and_then(|t| t.era.clone()));
        if let Some(era) = era
            && let Some(events) = timeline_for(&era)
        {
            return PresentationPayload::Timeline { era, events };
        }
    }

    if cards.is_empty() {
        PresentationPayload::None
    } else {
        PresentationPayload::Articles { cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cicerone_core::types::ChunkId;

    fn chunk(id: &str, title: &str, content: &str) -> ArticleChunk {
        ArticleChunk {
            id: ChunkId(id.into()),
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn split_keeps_terminal_punctuation() {
        let s = split_sentences("It opened in 1876. Did it thrive? Not quite");
        assert_eq!(s, vec!["It opened in 1876.", "Did it thrive?", "Not quite"]);
    }

    #[test]
    fn cap_truncates_long_answers() {
        let text = "One fact here. Two facts here. Three facts here. Four facts here.";
        let capped = cap_sentences(text, 3);
        assert_eq!(split_sentences(&capped).len(), 3);
        assert!(!capped.contains("Four"));
    }

    #[test]
    fn cap_leaves_short_answers_alone() {
        assert_eq!(cap_sentences("Just the one.", 3), "Just the one.");
    }

    #[test]
    fn facets_skip_disclosed_material() {
        let chunks = vec![chunk(
            "a",
            "Royal Aquarium",
            "The aquarium opened its doors in 1876. It hosted boxing matches and \
             beauty shows instead of fish. The roof was built to open for balloon ascents.",
        )];
        let mut ledger = FactLedger::new();
        ledger.insert("The aquarium opened its doors in 1876");

        let facets = select_facets(&chunks, &ledger, 2);
        assert_eq!(facets.len(), 2);
        assert!(facets.iter().all(|f| !f.contains("1876")));
    }

    #[test]
    fn facets_fall_back_when_everything_was_spoken() {
        let chunks = vec![chunk("a", "T", "The gallows stood at the crossroads for centuries.")];
        let mut ledger = FactLedger::new();
        ledger.insert("The gallows stood at the crossroads for centuries.");

        let facets = select_facets(&chunks, &ledger, 3);
        assert_eq!(facets.len(), 1);
    }

    #[test]
    fn tiny_fragments_are_not_facets() {
        let chunks = vec![chunk("a", "T", "Indeed. A much longer sentence with real substance here.")];
        let facets = select_facets(&chunks, &FactLedger::new(), 3);
        assert_eq!(facets.len(), 1);
        assert!(facets[0].contains("substance"));
    }

    #[test]
    fn where_query_with_located_chunk_renders_map() {
        let input = ResearchInput {
            seq: 1,
            topic: None,
            query: "where was the royal aquarium".into(),
            history: vec![],
            prior_facts: vec![],
            disclosed: FactLedger::new(),
        };
        let chunks = vec![chunk(
            "a",
            "Royal Aquarium",
            "It stood in Westminster opposite the Abbey.",
        )];
        let payload = build_payload(&input, &[], &chunks);
        assert!(matches!(payload, PresentationPayload::Location { .. }));
    }

    #[test]
    fn plain_query_renders_article_cards() {
        let input = ResearchInput {
            seq: 1,
            topic: None,
            query: "royal aquarium".into(),
            history: vec![],
            prior_facts: vec![],
            disclosed: FactLedger::new(),
        };
        let chunks = vec![chunk("a", "Royal Aquarium", "Opened in 1876 in Westminster.")];
        match build_payload(&input, &[], &chunks) {
            PresentationPayload::Articles { cards } => {
                assert_eq!(cards.len(), 1);
                assert!(cards[0].era.as_deref().unwrap().starts_with("Victorian"));
            }
            other => panic!("expected cards, got {other:?}"),
        }
    }
}
