// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory lexical cache from keyword/phonetic variants to topic records.
//!
//! Built once at startup from the corpus topic list and read-only afterwards,
//! so it is shared across all sessions without locking. A cache miss is an
//! expected outcome: the caller falls back to full hybrid retrieval.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use cicerone_config::LexiconConfig;
use cicerone_core::types::TopicRecord;

/// Overly generic tokens that would cause cross-topic contamination if they
/// were allowed as cache keys.
const DENYLIST: &[&str] = &[
    "the", "and", "for", "with", "from", "about", "history", "historical", "london", "old",
    "new", "show", "tell", "images", "image", "pictures", "picture", "photos", "story",
    "stories", "place", "places", "site", "area", "street", "what", "where", "when", "who",
];

/// A successful cache lookup.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub topic: Arc<TopicRecord>,
    /// The normalized phrase that matched, longest phrase wins ties.
    pub matched: String,
}

/// Map from normalized keyword/phrase to canonical topic record.
pub struct LexicalCache {
    entries: HashMap<String, Arc<TopicRecord>>,
    max_phrase_tokens: usize,
}

impl LexicalCache {
    /// Build the cache from the corpus topic list.
    ///
    /// Every keyword variant is lowercased and punctuation-stripped, then
    /// inserted unless it is shorter than `min_keyword_len`, on the
    /// denylist, or a duplicate within its own topic's variant list.
    pub fn build(topics: Vec<TopicRecord>, config: &LexiconConfig) -> Self {
        let mut entries: HashMap<String, Arc<TopicRecord>> = HashMap::new();
        let topic_count = topics.len();

        for topic in topics {
            let topic = Arc::new(topic);
            let mut seen: Vec<String> = Vec::new();

            for raw in topic.keywords.iter().chain(std::iter::once(&topic.title)) {
                let key = normalize_phrase(raw);
                if key.len() < config.min_keyword_len || DENYLIST.contains(&key.as_str()) {
                    continue;
                }
                if seen.contains(&key) {
                    continue;
                }
                seen.push(key.clone());

                if let Some(existing) = entries.get(&key) {
                    if existing.id != topic.id {
                        debug!(
                            keyword = %key,
                            first = %existing.id.0,
                            second = %topic.id.0,
                            "keyword collision, keeping first topic"
                        );
                    }
                    continue;
                }
                entries.insert(key, Arc::clone(&topic));
            }
        }

        info!(
            topics = topic_count,
            keywords = entries.len(),
            "lexical cache built"
        );

        Self {
            entries,
            max_phrase_tokens: config.max_phrase_tokens.max(1),
        }
    }

    /// Number of keyword entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a normalized query against the cache.
    ///
    /// Tests every single token and every adjacent token phrase up to
    /// `max_phrase_tokens`; the longest matching phrase wins ties. Returns
    /// `None` on a miss -- non-fatal, the caller falls back to retrieval.
    pub fn lookup(&self, query: &str) -> Option<CacheHit> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<CacheHit> = None;

        for width in 1..=self.max_phrase_tokens.min(tokens.len()) {
            for window in tokens.windows(width) {
                let phrase = window.join(" ");
                if let Some(topic) = self.entries.get(&phrase) {
                    let longer = best
                        .as_ref()
                        .map(|b| phrase.len() > b.matched.len())
                        .unwrap_or(true);
                    if longer {
                        best = Some(CacheHit {
                            topic: Arc::clone(topic),
                            matched: phrase,
                        });
                    }
                }
            }
        }

        best
    }
}

/// Lowercase a phrase and strip punctuation from each token.
fn normalize_phrase(raw: &str) -> String {
    tokenize(raw).join(" ")
}

/// Split on whitespace, trim punctuation per token, drop emptied tokens.
///
/// Punctuation must be trimmed per token, not matched on raw substrings:
/// "it?" has to come out as "it".
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cicerone_core::types::TopicId;

    fn topic(id: &str, title: &str, keywords: &[&str]) -> TopicRecord {
        TopicRecord {
            id: TopicId(id.into()),
            title: title.into(),
            hook: format!("{title} hook"),
            era: None,
            location: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn cache(topics: Vec<TopicRecord>) -> LexicalCache {
        LexicalCache::build(topics, &LexiconConfig::default())
    }

    #[test]
    fn build_rejects_short_and_denylisted_keywords() {
        let c = cache(vec![topic(
            "tyburn",
            "Tyburn",
            &["tyburn", "the", "it", "history", "gallows"],
        )]);
        assert!(c.lookup("tyburn").is_some());
        assert!(c.lookup("gallows").is_some());
        assert!(c.lookup("the").is_none());
        assert!(c.lookup("it").is_none());
        assert!(c.lookup("history").is_none());
    }

    #[test]
    fn build_deduplicates_variant_lists() {
        let c = cache(vec![topic("tyburn", "Tyburn", &["tyburn", "Tyburn", "TYBURN"])]);
        // One topic, one effective keyword plus the title (same key).
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn lookup_tests_adjacent_token_pairs() {
        let c = cache(vec![
            topic("aquarium", "Royal Aquarium", &["royal aquarium", "aquarium"]),
            topic("palace", "Crystal Palace", &["crystal palace"]),
        ]);

        let hit = c.lookup("tell me about the royal aquarium").unwrap();
        assert_eq!(hit.topic.id.0, "aquarium");
        // Longest matching phrase wins the tie over the bare "aquarium" key.
        assert_eq!(hit.matched, "royal aquarium");

        let hit = c.lookup("where was crystal palace").unwrap();
        assert_eq!(hit.topic.id.0, "palace");
    }

    #[test]
    fn lookup_strips_punctuation_per_token() {
        let c = cache(vec![topic("tyburn", "Tyburn", &["tyburn"])]);
        assert!(c.lookup("what happened at tyburn?").is_some());
        assert!(c.lookup("tyburn!").is_some());
    }

    #[test]
    fn lookup_miss_is_none() {
        let c = cache(vec![topic("tyburn", "Tyburn", &["tyburn"])]);
        assert!(c.lookup("tell me about rome").is_none());
        assert!(c.lookup("").is_none());
    }

    #[test]
    fn first_topic_wins_keyword_collision() {
        let c = cache(vec![
            topic("abbey", "Westminster Abbey", &["westminster"]),
            topic("hall", "Westminster Hall", &["westminster"]),
        ]);
        let hit = c.lookup("westminster").unwrap();
        assert_eq!(hit.topic.id.0, "abbey");
    }

    #[test]
    fn tokenize_keeps_interior_apostrophes() {
        assert_eq!(tokenize("devil's acre?"), vec!["devil's", "acre"]);
        assert_eq!(tokenize("  What   happened to it? "), vec!["what", "happened", "to", "it"]);
    }
}
