// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reciprocal Rank Fusion over independently ranked result lists.
//!
//! RRF score for item d = sum(1 / (k + rank)) over the lists containing d,
//! with 1-based ranks and k = 60 per the rank-fusion literature. The damping
//! constant keeps a single top rank in one list from dominating the fusion.

use std::collections::HashMap;

use cicerone_core::types::{ChunkId, RankedChunk, RetrievalResult};

/// Fuse a vector-similarity ranking and a lexical ranking into one list.
///
/// Both inputs are (id, score) pairs already sorted by relevance descending;
/// only the positions matter here. Output is sorted by fused score
/// descending, ties broken by vector rank (the finer-grained signal), with
/// rank provenance preserved on every item.
pub fn reciprocal_rank_fusion(
    vector_results: &[(ChunkId, f32)],
    lexical_results: &[(ChunkId, f32)],
    k: f32,
) -> RetrievalResult {
    struct Entry {
        score: f32,
        vector_rank: Option<usize>,
        lexical_rank: Option<usize>,
    }

    let mut entries: HashMap<ChunkId, Entry> = HashMap::new();

    for (idx, (id, _)) in vector_results.iter().enumerate() {
        let rank = idx + 1;
        let e = entries.entry(id.clone()).or_insert(Entry {
            score: 0.0,
            vector_rank: None,
            lexical_rank: None,
        });
        e.score += 1.0 / (k + rank as f32);
        e.vector_rank = Some(rank);
    }

    for (idx, (id, _)) in lexical_results.iter().enumerate() {
        let rank = idx + 1;
        let e = entries.entry(id.clone()).or_insert(Entry {
            score: 0.0,
            vector_rank: None,
            lexical_rank: None,
        });
        e.score += 1.0 / (k + rank as f32);
        e.lexical_rank = Some(rank);
    }

    let mut hits: Vec<RankedChunk> = entries
        .into_iter()
        .map(|(chunk_id, e)| RankedChunk {
            chunk_id,
            score: e.score,
            vector_rank: e.vector_rank,
            lexical_rank: e.lexical_rank,
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                // Tie break: better (lower) vector rank first; items absent
                // from the vector list sort after those present.
                let a_rank = a.vector_rank.unwrap_or(usize::MAX);
                let b_rank = b.vector_rank.unwrap_or(usize::MAX);
                a_rank.cmp(&b_rank)
            })
    });

    RetrievalResult { hits }
}
