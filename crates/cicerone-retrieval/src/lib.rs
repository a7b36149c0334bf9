// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retrieval for the Cicerone guide engine.
//!
//! Runs vector-similarity and lexical search concurrently against the
//! corpus accessor and fuses the rankings with Reciprocal Rank Fusion.

pub mod fusion;
pub mod retriever;

pub use fusion::reciprocal_rank_fusion;
pub use retriever::HybridRetriever;
