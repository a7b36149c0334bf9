// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Cicerone integration tests.
//!
//! Provides mock collaborators for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockCorpus`] - In-memory corpus with deterministic scoring, failure
//!   injection, and call counters
//! - [`MockProvider`] - Generation provider with pre-configured responses
//! - [`MockMemory`] - In-memory user fact store
//! - [`fixtures`] - A small London-history topic and chunk set

pub mod fixtures;
pub mod mock_corpus;
pub mod mock_memory;
pub mod mock_provider;

pub use mock_corpus::MockCorpus;
pub use mock_memory::MockMemory;
pub use mock_provider::MockProvider;
