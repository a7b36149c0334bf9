// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retriever combining vector similarity and lexical search via RRF.
//!
//! The two sub-searches are independent I/O calls and run concurrently, each
//! under its own timeout. A timed-out or failed sub-search contributes an
//! empty list; the query proceeds with whichever side completed rather than
//! failing outright.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use cicerone_config::RetrievalConfig;
use cicerone_core::CorpusSearch;
use cicerone_core::error::CiceroneError;
use cicerone_core::types::{ChunkId, RetrievalResult};

use crate::fusion::reciprocal_rank_fusion;

/// Hybrid retriever over the corpus accessor.
pub struct HybridRetriever {
    corpus: Arc<dyn CorpusSearch>,
    config: RetrievalConfig,
}

impl HybridRetriever {
    pub fn new(corpus: Arc<dyn CorpusSearch>, config: RetrievalConfig) -> Self {
        Self { corpus, config }
    }

    /// Run both sub-searches concurrently and fuse the rankings.
    ///
    /// Returns an error only when BOTH sub-searches fail hard; a one-sided
    /// timeout or backend error degrades to the surviving list.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalResult, CiceroneError> {
        let timeout = Duration::from_millis(self.config.sub_search_timeout_ms);
        let limit = self.config.limit;

        let (vector, lexical) = tokio::join!(
            tokio::time::timeout(timeout, self.corpus.vector_search(query, limit)),
            tokio::time::timeout(timeout, self.corpus.lexical_search(query, limit)),
        );

        let vector = flatten_sub_search("vector", vector, timeout);
        let lexical = flatten_sub_search("lexical", lexical, timeout);

        let (vector, lexical) = match (vector, lexical) {
            (Err(e), Err(_)) => return Err(e),
            (v, l) => (v.unwrap_or_default(), l.unwrap_or_default()),
        };

        let fused = reciprocal_rank_fusion(&vector, &lexical, self.config.rrf_k);

        debug!(
            query = %query,
            vector_hits = vector.len(),
            lexical_hits = lexical.len(),
            fused = fused.hits.len(),
            "hybrid retrieval complete"
        );

        let mut fused = fused;
        fused.hits.truncate(limit);
        Ok(fused)
    }
}

/// Collapse a timed sub-search outcome into its ranked list, logging and
/// degrading on timeout or backend failure.
fn flatten_sub_search(
    side: &str,
    outcome: Result<Result<Vec<(ChunkId, f32)>, CiceroneError>, tokio::time::error::Elapsed>,
    timeout: Duration,
) -> Result<Vec<(ChunkId, f32)>, CiceroneError> {
    match outcome {
        Ok(Ok(list)) => Ok(list),
        Ok(Err(e)) => {
            warn!(side = side, error = %e, "sub-search failed, proceeding without it");
            Err(e)
        }
        Err(_) => {
            warn!(side = side, ?timeout, "sub-search timed out, proceeding without it");
            Err(CiceroneError::Timeout { duration: timeout })
        }
    }
}
