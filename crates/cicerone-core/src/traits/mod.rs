// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Cicerone engine boundary.
//!
//! The engine consumes three external collaborators: a searchable corpus, a
//! generation provider, and a user fact memory. All use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod corpus;
pub mod generation;
pub mod memory;

pub use corpus::CorpusSearch;
pub use generation::GenerationProvider;
pub use memory::FactMemory;
