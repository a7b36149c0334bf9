// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation session state for the Cicerone guide engine.
//!
//! The registry serializes turn processing per session key; the context
//! holds the topic anchor, pending topic-change proposal, rolling history,
//! and disclosed-fact ledger that keep a conversation coherent.

pub mod context;
pub mod facts;
pub mod registry;

pub use context::{CachedAnswer, ComposedAnswer, ResearchSlot, SessionContext};
pub use facts::{FactLedger, fact_fingerprint};
pub use registry::SessionRegistry;
