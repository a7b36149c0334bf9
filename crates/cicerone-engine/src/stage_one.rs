// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stage-1 acknowledger: the sub-second spoken reply.
//!
//! Everything here reads only in-memory state (lexical cache hit, session
//! context) and never awaits retrieval. The one optional await is the
//! generated-teaser path, hard-capped by `teaser_timeout_ms` with a template
//! fallback, so the latency budget holds either way.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use cicerone_config::StageOneConfig;
use cicerone_core::GenerationProvider;
use cicerone_core::types::{GenerationRequest, GenerationStyle, TopicRecord};
use cicerone_session::SessionContext;

/// Teaser answers stay short; the substance arrives with Stage-2.
const TEASER_MAX_SENTENCES: usize = 2;

/// Deterministic opener variation keyed off the turn counter, so repeated
/// topic hits within one session do not all start identically.
const OPENERS: &[&str] = &["Ah,", "Now,", "Well now,", "Oh,"];

pub struct StageOne {
    provider: Arc<dyn GenerationProvider>,
    config: StageOneConfig,
}

impl StageOne {
    pub fn new(provider: Arc<dyn GenerationProvider>, config: StageOneConfig) -> Self {
        Self { provider, config }
    }

    /// Compose the immediate teaser for a cache-resolved topic.
    ///
    /// Template-based unless generated teasers are enabled; the generated
    /// path falls back to the template on timeout or provider error.
    pub async fn teaser(&self, topic: &TopicRecord, query: &str, ctx: &SessionContext) -> String {
        if self.config.generated_teasers {
            let request = GenerationRequest {
                style: GenerationStyle::Teaser,
                query: query.to_string(),
                topic_title: Some(topic.title.clone()),
                excerpts: vec![topic.hook.clone()],
                history: ctx.history().cloned().collect(),
                prior_facts: ctx.prior_facts.clone(),
                disclosed: ctx.disclosed.fingerprints().map(str::to_string).collect(),
                max_sentences: TEASER_MAX_SENTENCES,
            };
            let budget = Duration::from_millis(self.config.teaser_timeout_ms);
            match tokio::time::timeout(budget, self.provider.generate(request)).await {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    return with_continuation_prompt(text.trim());
                }
                Ok(Ok(_)) => warn!("empty generated teaser, using template"),
                Ok(Err(e)) => warn!(error = %e, "teaser generation failed, using template"),
                Err(_) => warn!(?budget, "teaser generation timed out, using template"),
            }
        }
        template_teaser(topic, ctx.current_seq())
    }
}

/// The template teaser: opener, title, hook, continuation prompt.
pub fn template_teaser(topic: &TopicRecord, seq: u64) -> String {
    let opener = OPENERS[(seq as usize) % OPENERS.len()];
    with_continuation_prompt(&format!("{opener} {} — {}", topic.title, topic.hook.trim()))
}

/// The question asked before moving the anchor to a newly named topic.
pub fn confirmation_question(topic: &TopicRecord) -> String {
    format!(
        "It sounds like you'd like to hear about {} — {} Shall we move on to that?",
        topic.title,
        topic.hook.trim()
    )
}

/// Reply when nothing in the cache matches and no anchor exists yet. Offers
/// featured topics and promises the deeper look already underway.
pub fn miss_text(featured: &[Arc<TopicRecord>]) -> String {
    let suggestions: Vec<&str> = featured.iter().take(3).map(|t| t.title.as_str()).collect();
    if suggestions.is_empty() {
        "I didn't quite catch the place or person you're after. \
         Give me a moment to rummage through the archives, then ask me again."
            .to_string()
    } else {
        format!(
            "I didn't quite catch the place or person you're after. \
             You could ask me about {} — or give me a moment to rummage \
             through the archives for what you said.",
            join_titles(&suggestions)
        )
    }
}

/// Acknowledgement for a vague follow-up. The anchor carries the meaning
/// while Stage-2 digs with the enriched query.
pub fn deeper_look_text(topic: &TopicRecord) -> String {
    format!(
        "A closer look at {}, then — let me see what the archives say. \
         Ask me for more in just a moment.",
        topic.title
    )
}

pub fn greeting_line() -> &'static str {
    "Hello, and welcome. "
}

fn with_continuation_prompt(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.to_lowercase().contains("more") && trimmed.ends_with('?') {
        return trimmed.to_string();
    }
    format!("{trimmed} Shall I tell you more?")
}

fn join_titles(titles: &[&str]) -> String {
    match titles {
        [] => String::new(),
        [a] => (*a).to_string(),
        [a, b] => format!("{a} or {b}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cicerone_core::error::CiceroneError;
    use cicerone_core::types::TopicId;
    use cicerone_session::SessionContext;
    use cicerone_test_utils::MockProvider;

    fn topic() -> TopicRecord {
        TopicRecord {
            id: TopicId("aquarium".into()),
            title: "Royal Aquarium".into(),
            hook: "it rarely contained any fish.".into(),
            era: Some("Victorian".into()),
            location: Some("Westminster".into()),
            keywords: vec![],
        }
    }

    #[test]
    fn template_ends_with_continuation_prompt() {
        let text = template_teaser(&topic(), 1);
        assert!(text.contains("Royal Aquarium"));
        assert!(text.contains("rarely contained any fish"));
        assert!(text.ends_with("Shall I tell you more?"));
    }

    #[test]
    fn openers_vary_with_turn_seq() {
        let a = template_teaser(&topic(), 0);
        let b = template_teaser(&topic(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn confirmation_names_the_proposed_topic() {
        let text = confirmation_question(&topic());
        assert!(text.contains("Royal Aquarium"));
        assert!(text.ends_with('?'));
    }

    #[test]
    fn miss_text_offers_featured_topics() {
        let featured = vec![Arc::new(topic())];
        assert!(miss_text(&featured).contains("Royal Aquarium"));
        assert!(miss_text(&[]).contains("archives"));
    }

    #[test]
    fn existing_prompt_is_not_doubled() {
        let text = with_continuation_prompt("Quite a place. Want to hear more?");
        assert_eq!(text.matches('?').count(), 1);
    }

    fn ctx() -> SessionContext {
        SessionContext::new(4, 160)
    }

    fn generated(provider: Arc<dyn GenerationProvider>) -> StageOne {
        StageOne::new(
            provider,
            StageOneConfig {
                generated_teasers: true,
                ..StageOneConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn generated_teaser_speaks_the_provider_reply() {
        let provider = Arc::new(MockProvider::new());
        provider.add_response("It was a marvel of glass and iron.").await;
        let stage = generated(Arc::clone(&provider) as _);

        let text = stage.teaser(&topic(), "royal aquarium", &ctx()).await;
        assert!(text.starts_with("It was a marvel of glass and iron."));
        assert!(text.ends_with("Shall I tell you more?"));

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(matches!(requests[0].style, GenerationStyle::Teaser));
        assert_eq!(requests[0].max_sentences, TEASER_MAX_SENTENCES);
    }

    #[tokio::test]
    async fn failed_generation_falls_back_to_the_template() {
        let provider = Arc::new(MockProvider::new());
        provider.add_failure().await;
        let stage = generated(Arc::clone(&provider) as _);

        let session = ctx();
        let text = stage.teaser(&topic(), "royal aquarium", &session).await;
        assert_eq!(text, template_teaser(&topic(), session.current_seq()));
        assert_eq!(provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn stalled_generation_times_out_to_the_template() {
        struct StalledProvider;

        #[async_trait::async_trait]
        impl GenerationProvider for StalledProvider {
            async fn generate(
                &self,
                _request: GenerationRequest,
            ) -> Result<String, CiceroneError> {
                std::future::pending().await
            }
        }

        let stage = StageOne::new(
            Arc::new(StalledProvider),
            StageOneConfig {
                generated_teasers: true,
                teaser_timeout_ms: 20,
            },
        );

        let session = ctx();
        let text = stage.teaser(&topic(), "royal aquarium", &session).await;
        assert_eq!(text, template_teaser(&topic(), session.current_seq()));
    }
}
