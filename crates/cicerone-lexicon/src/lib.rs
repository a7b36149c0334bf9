// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phonetic normalization, the lexical topic cache, and static reference
//! tables (gazetteer, eras) for the Cicerone guide engine.
//!
//! Everything in this crate is pure or read-only after a one-time build, so
//! it is freely shared across sessions without locking.

pub mod cache;
pub mod era;
pub mod gazetteer;
pub mod phonetic;

pub use cache::{CacheHit, LexicalCache, tokenize};
pub use era::{detect_era, timeline_for};
pub use gazetteer::{locate, locate_by_name};
pub use phonetic::normalize_utterance;
