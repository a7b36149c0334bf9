// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corpus accessor trait over the pre-populated article store.

use async_trait::async_trait;

use crate::error::CiceroneError;
use crate::types::{ArticleChunk, ChunkId, TopicRecord};

/// Accessor for the already-ingested, searchable article corpus.
///
/// The two searches are independently callable I/O operations; the hybrid
/// retriever runs them concurrently and fuses the rankings. Article
/// ingestion, embedding, and storage schema live behind this boundary.
#[async_trait]
pub trait CorpusSearch: Send + Sync {
    /// Vector-similarity search. Results are sorted by similarity descending.
    async fn vector_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(ChunkId, f32)>, CiceroneError>;

    /// Lexical/keyword search. Results are sorted by relevance descending.
    async fn lexical_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(ChunkId, f32)>, CiceroneError>;

    /// Fetch full chunk content for answer composition.
    async fn fetch_chunks(&self, ids: &[ChunkId]) -> Result<Vec<ArticleChunk>, CiceroneError>;

    /// Enumerate all canonical topic records. Called once at startup to
    /// build the lexical cache.
    async fn load_topics(&self) -> Result<Vec<TopicRecord>, CiceroneError>;
}
