// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Cicerone guide engine: a voice-first, two-stage contextual
//! retrieval-and-response loop over a historical article corpus.
//!
//! Stage-1 answers every utterance in well under a second from in-memory
//! state alone; Stage-2 runs hybrid retrieval and grounded composition in
//! the background and hands its answer to the next turn that wants it.

pub mod engine;
pub mod guard;
pub mod stage_one;
pub mod stage_two;

pub use engine::Engine;
pub use guard::{TurnClass, classify};
pub use stage_two::{ResearchInput, StageTwo};
