// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation provider for deterministic testing.
//!
//! Outcomes are popped from a FIFO queue; when the queue is empty a default
//! answer is synthesized from the request so tests do not need to script
//! every call. Every received request is captured for assertions.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cicerone_core::GenerationProvider;
use cicerone_core::error::CiceroneError;
use cicerone_core::types::GenerationRequest;

enum Scripted {
    Text(String),
    Failure,
}

/// A generation provider that replays pre-configured outcomes.
#[derive(Default)]
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load responses, returned in order.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let queue: VecDeque<Scripted> = responses.into_iter().map(Scripted::Text).collect();
        Self {
            outcomes: Arc::new(Mutex::new(queue)),
            requests: Arc::default(),
        }
    }

    /// Queue a successful response.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.outcomes.lock().await.push_back(Scripted::Text(text.into()));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self) {
        self.outcomes.lock().await.push_back(Scripted::Failure);
    }

    /// All requests received so far, in call order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// A default answer grounded in the request: echoes the first excerpt
    /// whose content is not already on the disclosed list, which makes the
    /// anti-repetition contract observable without scripting.
    fn default_answer(request: &GenerationRequest) -> String {
        let topic = request.topic_title.as_deref().unwrap_or("that");
        let excerpt = request
            .excerpts
            .iter()
            .find(|e| {
                let text = normalize(e);
                !request
                    .disclosed
                    .iter()
                    .any(|d| text.contains(normalize(d).as_str()))
            })
            .or_else(|| request.excerpts.first())
            .map(String::as_str)
            .unwrap_or("the archives are quiet on this one");
        format!("About {topic}: {excerpt}")
    }
}

/// Lowercase, alphanumeric-token normalization matching the engine's fact
/// fingerprints, so disclosed prefixes can be matched against raw excerpts.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<String, CiceroneError> {
        self.requests.lock().await.push(request.clone());
        match self.outcomes.lock().await.pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure) => Err(CiceroneError::Provider {
                message: "scripted provider failure".into(),
                source: None,
            }),
            None => Ok(Self::default_answer(&request)),
        }
    }
}
