// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory user fact store for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use cicerone_core::FactMemory;
use cicerone_core::error::CiceroneError;

/// Fact memory backed by a per-user map, with read-failure injection.
#[derive(Default)]
pub struct MockMemory {
    facts: Arc<Mutex<HashMap<String, Vec<String>>>>,
    read_fails: AtomicBool,
    read_calls: AtomicUsize,
}

impl MockMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed prior facts for a user.
    pub async fn seed(&self, user: &str, facts: Vec<String>) {
        self.facts.lock().await.insert(user.to_string(), facts);
    }

    /// Make `prior_facts` fail until cleared.
    pub fn fail_reads(&self, fail: bool) {
        self.read_fails.store(fail, Ordering::SeqCst);
    }

    /// Facts recorded for a user so far.
    pub async fn facts_for(&self, user: &str) -> Vec<String> {
        self.facts.lock().await.get(user).cloned().unwrap_or_default()
    }

    /// How many times `prior_facts` was called, failures included.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactMemory for MockMemory {
    async fn prior_facts(&self, user: &str) -> Result<Vec<String>, CiceroneError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.read_fails.load(Ordering::SeqCst) {
            return Err(CiceroneError::Internal("memory store offline".into()));
        }
        Ok(self.facts_for(user).await)
    }

    async fn record_fact(&self, user: &str, sentence: &str) -> Result<(), CiceroneError> {
        self.facts
            .lock()
            .await
            .entry(user.to_string())
            .or_default()
            .push(sentence.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_reads_back() {
        let memory = MockMemory::new();
        memory.record_fact("ada", "Asked about Tyburn.").await.unwrap();
        assert_eq!(
            memory.prior_facts("ada").await.unwrap(),
            vec!["Asked about Tyburn.".to_string()]
        );
        assert!(memory.prior_facts("someone-else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_failure_injection() {
        let memory = MockMemory::new();
        memory.fail_reads(true);
        assert!(memory.prior_facts("ada").await.is_err());
        // Writes still land.
        assert!(memory.record_fact("ada", "fact").await.is_ok());
    }
}
