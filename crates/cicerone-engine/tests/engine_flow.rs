// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversation tests for the two-stage engine.
//!
//! Each test builds an isolated engine over the mock corpus, provider, and
//! fact memory. Tests are independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use cicerone_config::CiceroneConfig;
use cicerone_core::types::{PresentationPayload, SessionId};
use cicerone_engine::Engine;
use cicerone_session::fact_fingerprint;
use cicerone_test_utils::{MockCorpus, MockMemory, MockProvider, fixtures};

struct Fixture {
    engine: Engine,
    corpus: Arc<MockCorpus>,
    provider: Arc<MockProvider>,
    memory: Arc<MockMemory>,
}

async fn fixture() -> Fixture {
    fixture_with(MockCorpus::new()
        .with_topics(fixtures::topics())
        .with_chunks(fixtures::chunks()))
    .await
}

async fn fixture_with(corpus: MockCorpus) -> Fixture {
    let corpus = Arc::new(corpus);
    let provider = Arc::new(MockProvider::new());
    let memory = Arc::new(MockMemory::new());

    let engine = Engine::bootstrap(
        CiceroneConfig::default(),
        Arc::clone(&corpus) as _,
        Arc::clone(&provider) as _,
        Arc::clone(&memory) as _,
    )
    .await
    .unwrap();

    Fixture {
        engine,
        corpus,
        provider,
        memory,
    }
}

fn session(id: &str) -> SessionId {
    SessionId(id.to_string())
}

/// Let spawned background jobs and fire-and-forget writes settle.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

// ---- Stage-1 resolution ----

#[tokio::test]
async fn first_topic_query_gets_a_teaser_with_continuation_prompt() {
    let f = fixture().await;

    let reply = f
        .engine
        .handle_utterance(&session("s1"), "ada", "tell me about the royal aquarium")
        .await;

    assert!(reply.text.contains("Royal Aquarium"), "got: {}", reply.text);
    assert!(reply.text.contains("rarely contained any fish"));
    assert!(reply.text.ends_with("Shall I tell you more?"));
    // No provider call on the Stage-1 path with template teasers.
    assert_eq!(f.provider.call_count().await, 0);
}

#[tokio::test]
async fn phonetic_variant_resolves_through_normalization() {
    let f = fixture().await;

    let reply = f
        .engine
        .handle_utterance(&session("s1"), "ada", "what happened at tie burn")
        .await;

    assert!(reply.text.contains("Tyburn"), "got: {}", reply.text);
}

#[tokio::test]
async fn greeting_is_spoken_exactly_once() {
    let f = fixture().await;
    let id = session("s1");

    let first = f.engine.handle_utterance(&id, "ada", "tell me about tyburn").await;
    let second = f.engine.handle_utterance(&id, "ada", "tell me about thorney island").await;

    assert!(first.text.starts_with("Hello"));
    assert!(!second.text.starts_with("Hello"));
}

#[tokio::test]
async fn cache_miss_offers_featured_topics_and_a_yes_opens_one() {
    let f = fixture().await;
    let id = session("s1");

    let miss = f
        .engine
        .handle_utterance(&id, "ada", "something entirely unrecognizable")
        .await;
    assert!(miss.text.contains("Royal Aquarium"), "got: {}", miss.text);

    // A bare "yes" refers to the suggestion, not a direct topic statement.
    let opened = f.engine.handle_utterance(&id, "ada", "yes").await;
    assert!(opened.text.contains("Royal Aquarium"), "got: {}", opened.text);
}

#[tokio::test]
async fn generated_teaser_mode_speaks_the_provider_text() {
    let corpus = Arc::new(
        MockCorpus::new()
            .with_topics(fixtures::topics())
            .with_chunks(fixtures::chunks()),
    );
    // Retrieval is down, so the one scripted response can only be consumed
    // by the Stage-1 teaser call, never the background research job.
    corpus.fail_vector(true);
    corpus.fail_lexical(true);
    let provider = Arc::new(MockProvider::new());
    provider
        .add_response("A palace of amusements with hardly a fish in sight.")
        .await;

    let mut config = CiceroneConfig::default();
    config.stage_one.generated_teasers = true;
    let engine = Engine::bootstrap(
        config,
        Arc::clone(&corpus) as _,
        Arc::clone(&provider) as _,
        Arc::new(MockMemory::new()) as _,
    )
    .await
    .unwrap();

    let reply = engine
        .handle_utterance(&session("s1"), "ada", "tell me about the royal aquarium")
        .await;
    assert!(
        reply.text.contains("A palace of amusements"),
        "got: {}",
        reply.text
    );
    assert!(reply.text.ends_with("Shall I tell you more?"));
}

// ---- Topic-change confirmation flow ----

#[tokio::test]
async fn topic_change_asks_for_confirmation_and_yes_promotes() {
    let f = fixture().await;
    let id = session("s1");

    f.engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    let question = f.engine.handle_utterance(&id, "ada", "what about tyburn").await;
    assert!(question.text.contains("Tyburn"), "got: {}", question.text);
    assert!(question.text.ends_with('?'));

    let answer = f.engine.handle_utterance(&id, "ada", "yes").await;
    assert!(answer.text.contains("Tyburn"), "got: {}", answer.text);
    assert!(!matches!(answer.payload, PresentationPayload::Apology));
}

#[tokio::test]
async fn declined_topic_change_keeps_the_anchor() {
    let f = fixture().await;
    let id = session("s1");

    f.engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    f.engine.handle_utterance(&id, "ada", "what about tyburn").await;
    let declined = f.engine.handle_utterance(&id, "ada", "no thanks").await;
    assert!(declined.text.contains("Royal Aquarium"), "got: {}", declined.text);

    // A vague follow-up still resolves against the kept anchor.
    let vague = f.engine.handle_utterance(&id, "ada", "what happened to it?").await;
    assert!(vague.text.contains("Royal Aquarium"), "got: {}", vague.text);
}

#[tokio::test]
async fn confirming_turn_reuses_the_early_research_job() {
    let f = fixture().await;
    let id = session("s1");

    f.engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    f.engine.handle_utterance(&id, "ada", "what about tyburn").await;
    settle().await;

    // Research for the proposed topic started at proposal time; the
    // confirming turn consumes it without another retrieval pass.
    let searches_before = f.corpus.search_calls();
    let answer = f.engine.handle_utterance(&id, "ada", "yes").await;
    assert!(answer.text.contains("Tyburn"));
    assert_eq!(f.corpus.search_calls(), searches_before);
}

#[tokio::test]
async fn repeated_question_replays_the_cached_answer() {
    let f = fixture().await;
    let id = session("s1");

    f.engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    let first = f.engine.handle_utterance(&id, "ada", "yes").await;

    // Asking the identical question again replays the cached answer without
    // another retrieval pass.
    let searches_before = f.corpus.search_calls();
    let replayed = f
        .engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    assert_eq!(replayed.text, first.text);
    assert_eq!(f.corpus.search_calls(), searches_before);
}

// ---- Anti-repetition across a session ----

#[tokio::test]
async fn three_turns_on_one_topic_disclose_three_distinct_facets() {
    let f = fixture().await;
    let id = session("s1");

    let teaser = f
        .engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    let first = f.engine.handle_utterance(&id, "ada", "yes").await;
    let second = f.engine.handle_utterance(&id, "ada", "tell me more").await;

    let fingerprints: Vec<String> = [&teaser.text, &first.text, &second.text]
        .iter()
        .map(|t| fact_fingerprint(t))
        .collect();
    assert_ne!(fingerprints[0], fingerprints[1]);
    assert_ne!(fingerprints[1], fingerprints[2]);
    assert_ne!(fingerprints[0], fingerprints[2]);

    // The second research pass was steered by a non-empty disclosed list.
    let requests = f.provider.requests().await;
    let last = requests.last().unwrap();
    assert!(!last.disclosed.is_empty());
}

// ---- Degradation ----

#[tokio::test]
async fn retrieval_outage_degrades_to_spoken_apology() {
    let f = fixture().await;
    let id = session("s1");
    f.corpus.fail_vector(true);
    f.corpus.fail_lexical(true);

    // Stage-1 still works: the teaser needs only the lexical cache.
    let teaser = f
        .engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    assert!(teaser.text.contains("Royal Aquarium"));

    let answer = f.engine.handle_utterance(&id, "ada", "yes").await;
    assert!(matches!(answer.payload, PresentationPayload::Apology));
    assert!(answer.text.contains("sorry"), "got: {}", answer.text);
}

#[tokio::test]
async fn provider_failure_retries_once_then_apologizes() {
    let f = fixture().await;
    let id = session("s1");
    f.provider.add_failure().await;
    f.provider.add_failure().await;

    f.engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    let answer = f.engine.handle_utterance(&id, "ada", "yes").await;

    assert!(matches!(answer.payload, PresentationPayload::Apology));
    assert_eq!(f.provider.call_count().await, 2);
}

#[tokio::test]
async fn prior_fact_read_failure_starts_cold_but_answers() {
    let f = fixture().await;
    f.memory.fail_reads(true);

    let reply = f
        .engine
        .handle_utterance(&session("s1"), "ada", "tell me about tyburn")
        .await;
    assert!(reply.text.contains("Tyburn"));
}

// ---- Memory and sessions ----

#[tokio::test]
async fn resolved_topics_are_recorded_to_fact_memory() {
    let f = fixture().await;

    f.engine
        .handle_utterance(&session("s1"), "ada", "tell me about thorney island")
        .await;
    settle().await;

    let facts = f.memory.facts_for("ada").await;
    assert!(
        facts.iter().any(|s| s.contains("Thorney Island")),
        "got: {facts:?}"
    );
}

#[tokio::test]
async fn prior_facts_are_read_once_and_reach_the_provider() {
    let f = fixture().await;
    f.memory.seed("ada", vec!["Asked about Tyburn.".into()]).await;
    let id = session("s1");

    f.engine
        .handle_utterance(&id, "ada", "tell me about the royal aquarium")
        .await;
    f.engine.handle_utterance(&id, "ada", "yes").await;

    // One fact-memory read serves the whole session.
    assert_eq!(f.memory.read_calls(), 1);

    // The research request carried the remembered fact.
    let requests = f.provider.requests().await;
    assert!(
        requests
            .iter()
            .any(|r| r.prior_facts.iter().any(|s| s.contains("Tyburn"))),
        "got: {requests:?}"
    );
}

#[tokio::test]
async fn sessions_do_not_share_anchors() {
    let f = fixture().await;

    f.engine
        .handle_utterance(&session("a"), "ada", "tell me about tyburn")
        .await;
    let other = f
        .engine
        .handle_utterance(&session("b"), "ben", "what happened to it?")
        .await;

    // Session b has no anchor; the pronoun cannot borrow session a's.
    assert!(
        other.text.contains("didn't quite catch"),
        "got: {}",
        other.text
    );
    assert_eq!(f.engine.active_sessions(), 2);
}

#[tokio::test]
async fn ended_sessions_are_forgotten() {
    let f = fixture().await;
    let id = session("s1");

    f.engine.handle_utterance(&id, "ada", "tell me about tyburn").await;
    f.engine.end_session(&id);
    assert_eq!(f.engine.active_sessions(), 0);

    // A new session under the same key greets again.
    let reply = f.engine.handle_utterance(&id, "ada", "tell me about tyburn").await;
    assert!(reply.text.starts_with("Hello"));
}
