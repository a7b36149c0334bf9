// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation provider trait for composing spoken answers.

use async_trait::async_trait;

use crate::error::CiceroneError;
use crate::types::GenerationRequest;

/// A single-call text generation interface.
///
/// Used by both responders: Stage-1 with [`GenerationStyle::Teaser`] (cheap,
/// fast, optional) and Stage-2 with [`GenerationStyle::Research`] (fuller,
/// grounded in retrieved excerpts).
///
/// [`GenerationStyle::Teaser`]: crate::types::GenerationStyle::Teaser
/// [`GenerationStyle::Research`]: crate::types::GenerationStyle::Research
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Compose answer text for the given request context.
    async fn generate(&self, request: GenerationRequest) -> Result<String, CiceroneError>;
}
