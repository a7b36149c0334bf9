// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock corpus accessor for deterministic testing.
//!
//! Scoring is naive token overlap between the query and each chunk's title
//! and content, which makes rankings query-sensitive without any real
//! embedding or index behind them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use cicerone_core::CorpusSearch;
use cicerone_core::error::CiceroneError;
use cicerone_core::types::{ArticleChunk, ChunkId, TopicRecord};

/// In-memory corpus with call counters and per-side failure injection.
#[derive(Default)]
pub struct MockCorpus {
    topics: Vec<TopicRecord>,
    chunks: Vec<ArticleChunk>,
    vector_fails: AtomicBool,
    lexical_fails: AtomicBool,
    vector_calls: AtomicUsize,
    lexical_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MockCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topics(mut self, topics: Vec<TopicRecord>) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_chunks(mut self, chunks: Vec<ArticleChunk>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Make the vector side fail until cleared.
    pub fn fail_vector(&self, fail: bool) {
        self.vector_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lexical(&self, fail: bool) {
        self.lexical_fails.store(fail, Ordering::SeqCst);
    }

    /// Total search invocations across both sides.
    pub fn search_calls(&self) -> usize {
        self.vector_calls.load(Ordering::SeqCst) + self.lexical_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Rank chunks by shared-token count with the query, descending.
    fn rank(&self, query: &str, limit: usize) -> Vec<(ChunkId, f32)> {
        let query_tokens: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .filter(|t| t.len() >= 3)
            .collect();

        let mut scored: Vec<(ChunkId, f32)> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                let haystack = format!("{} {}", chunk.title, chunk.content).to_lowercase();
                let overlap = query_tokens
                    .iter()
                    .filter(|t| haystack.contains(t.as_str()))
                    .count();
                (overlap > 0).then(|| (chunk.id.clone(), overlap as f32))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.0.cmp(&b.0.0)));
        scored.truncate(limit);
        scored
    }
}

#[async_trait]
impl CorpusSearch for MockCorpus {
    async fn vector_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(ChunkId, f32)>, CiceroneError> {
        self.vector_calls.fetch_add(1, Ordering::SeqCst);
        if self.vector_fails.load(Ordering::SeqCst) {
            return Err(CiceroneError::Corpus {
                message: "vector backend down".into(),
                source: None,
            });
        }
        Ok(self.rank(query, limit))
    }

    async fn lexical_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(ChunkId, f32)>, CiceroneError> {
        self.lexical_calls.fetch_add(1, Ordering::SeqCst);
        if self.lexical_fails.load(Ordering::SeqCst) {
            return Err(CiceroneError::Corpus {
                message: "lexical backend down".into(),
                source: None,
            });
        }
        Ok(self.rank(query, limit))
    }

    async fn fetch_chunks(&self, ids: &[ChunkId]) -> Result<Vec<ArticleChunk>, CiceroneError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.chunks.iter().find(|c| &c.id == id).cloned())
            .collect())
    }

    async fn load_topics(&self) -> Result<Vec<TopicRecord>, CiceroneError> {
        Ok(self.topics.clone())
    }
}
