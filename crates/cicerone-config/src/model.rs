// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cicerone guide engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Cicerone configuration.
///
/// Loaded from TOML files with environment variable overrides. All sections
/// are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CiceroneConfig {
    /// Session and turn-processing settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Stage-1 (immediate acknowledgement) settings.
    #[serde(default)]
    pub stage_one: StageOneConfig,

    /// Stage-2 (researched answer) settings.
    #[serde(default)]
    pub stage_two: StageTwoConfig,

    /// Hybrid retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Lexical cache build settings.
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// Session and turn-processing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Rolling history length kept per session, in turns.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Per-turn text truncation for history entries, in characters.
    #[serde(default = "default_history_truncate_chars")]
    pub history_truncate_chars: usize,

    /// Idle seconds after which a session is eligible for eviction.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Greet the user once on the first turn of a session.
    #[serde(default = "default_greeting_enabled")]
    pub greeting_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            history_truncate_chars: default_history_truncate_chars(),
            idle_timeout_secs: default_idle_timeout_secs(),
            greeting_enabled: default_greeting_enabled(),
        }
    }
}

fn default_history_limit() -> usize {
    4
}

fn default_history_truncate_chars() -> usize {
    160
}

fn default_idle_timeout_secs() -> u64 {
    900
}

fn default_greeting_enabled() -> bool {
    true
}

/// Stage-1 responder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StageOneConfig {
    /// When true, teasers go through the generation provider (teaser style)
    /// under `teaser_timeout_ms`, falling back to the template on timeout or
    /// error. When false (the default), teasers are composed from the
    /// lexical cache alone and Stage-1 never suspends on the network.
    #[serde(default)]
    pub generated_teasers: bool,

    /// Timeout for a generated teaser before the template fallback kicks in.
    #[serde(default = "default_teaser_timeout_ms")]
    pub teaser_timeout_ms: u64,
}

impl Default for StageOneConfig {
    fn default() -> Self {
        Self {
            generated_teasers: false,
            teaser_timeout_ms: default_teaser_timeout_ms(),
        }
    }
}

fn default_teaser_timeout_ms() -> u64 {
    700
}

/// Stage-2 responder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StageTwoConfig {
    /// Strict upper bound on answer length, in sentences.
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,

    /// Backoff before the single generation retry.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Timeout on each generation call.
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,
}

impl Default for StageTwoConfig {
    fn default() -> Self {
        Self {
            max_sentences: default_max_sentences(),
            retry_backoff_ms: default_retry_backoff_ms(),
            generation_timeout_ms: default_generation_timeout_ms(),
        }
    }
}

fn default_max_sentences() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_generation_timeout_ms() -> u64 {
    8000
}

/// Hybrid retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Result cap for each sub-search and the fused list.
    #[serde(default = "default_retrieval_limit")]
    pub limit: usize,

    /// Timeout applied to each sub-search independently. A timed-out
    /// sub-search contributes nothing; it never fails the whole query.
    #[serde(default = "default_sub_search_timeout_ms")]
    pub sub_search_timeout_ms: u64,

    /// Reciprocal Rank Fusion damping constant.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_retrieval_limit(),
            sub_search_timeout_ms: default_sub_search_timeout_ms(),
            rrf_k: default_rrf_k(),
        }
    }
}

fn default_retrieval_limit() -> usize {
    10
}

fn default_sub_search_timeout_ms() -> u64 {
    2500
}

fn default_rrf_k() -> f32 {
    60.0
}

/// Lexical cache build configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconConfig {
    /// Keywords shorter than this are rejected at cache build time.
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,

    /// Longest adjacent-token phrase tested at lookup time.
    #[serde(default = "default_max_phrase_tokens")]
    pub max_phrase_tokens: usize,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            min_keyword_len: default_min_keyword_len(),
            max_phrase_tokens: default_max_phrase_tokens(),
        }
    }
}

fn default_min_keyword_len() -> usize {
    3
}

fn default_max_phrase_tokens() -> usize {
    2
}
