// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cicerone guide engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Cicerone workspace. The engine's three
//! external collaborators -- corpus search, generation, user fact memory --
//! are trait objects defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CiceroneError;
pub use types::{ChunkId, GuideReply, PresentationPayload, SessionId, TopicId, TopicRecord};

pub use traits::{CorpusSearch, FactMemory, GenerationProvider};
