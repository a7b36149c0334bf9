// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Disclosed-fact fingerprints for anti-repetition.
//!
//! Each fact spoken for the current topic leaves a fingerprint behind;
//! Stage-2 checks candidate facts against the ledger and picks a different
//! facet rather than restating one. The ledger is cleared whenever the
//! topic anchor changes.

use std::collections::HashSet;

/// Canonical fingerprint of a fact sentence: lowercased, punctuation
/// stripped, whitespace collapsed, capped at a token prefix so trailing
/// rephrasings still collide.
pub fn fact_fingerprint(sentence: &str) -> String {
    const PREFIX_TOKENS: usize = 12;

    sentence
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .take(PREFIX_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Set of fact fingerprints already spoken for the current topic.
#[derive(Debug, Default, Clone)]
pub struct FactLedger {
    fingerprints: HashSet<String>,
}

impl FactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a spoken fact. Returns true if it was new.
    pub fn insert(&mut self, sentence: &str) -> bool {
        let fp = fact_fingerprint(sentence);
        if fp.is_empty() {
            return false;
        }
        self.fingerprints.insert(fp)
    }

    /// Fuzzy repetition check: a candidate overlaps when its fingerprint
    /// contains, or is contained by, a previously spoken one.
    pub fn overlaps(&self, candidate: &str) -> bool {
        let fp = fact_fingerprint(candidate);
        if fp.is_empty() {
            return false;
        }
        self.fingerprints
            .iter()
            .any(|prior| prior.contains(&fp) || fp.contains(prior.as_str()))
    }

    /// Recorded fingerprints, order unspecified.
    pub fn fingerprints(&self) -> impl Iterator<Item = &str> {
        self.fingerprints.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Drop all fingerprints. Called when the topic anchor changes.
    pub fn clear(&mut self) {
        self.fingerprints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_ignores_case_and_punctuation() {
        assert_eq!(
            fact_fingerprint("Built in 1876, demolished in 1903!"),
            fact_fingerprint("built in 1876 demolished in 1903")
        );
    }

    #[test]
    fn insert_reports_novelty() {
        let mut ledger = FactLedger::new();
        assert!(ledger.insert("The aquarium opened in 1876."));
        assert!(!ledger.insert("The aquarium opened in 1876"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn overlap_is_bidirectional_substring() {
        let mut ledger = FactLedger::new();
        ledger.insert("It hosted boxing matches and beauty shows");

        // Shorter candidate contained in a prior fingerprint.
        assert!(ledger.overlaps("hosted boxing matches"));
        // Restatement with trailing additions still collides on the prefix.
        assert!(ledger.overlaps("It hosted boxing matches and beauty shows every week"));
        // A genuinely different facet does not.
        assert!(!ledger.overlaps("The roof was designed to open for balloon ascents"));
    }

    #[test]
    fn clear_empties_the_ledger() {
        let mut ledger = FactLedger::new();
        ledger.insert("some fact");
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.overlaps("some fact"));
    }

    #[test]
    fn empty_sentence_never_overlaps() {
        let ledger = FactLedger::new();
        assert!(!ledger.overlaps(""));
        assert!(!ledger.overlaps("?!"));
    }
}
