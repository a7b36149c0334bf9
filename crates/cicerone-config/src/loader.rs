// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./cicerone.toml` > `~/.config/cicerone/cicerone.toml` with
//! environment variable overrides via the `CICERONE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CiceroneConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/cicerone/cicerone.toml` (user XDG config)
/// 3. `./cicerone.toml` (local directory)
/// 4. `CICERONE_*` environment variables
pub fn load_config() -> Result<CiceroneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CiceroneConfig::default()))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cicerone/cicerone.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cicerone.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and embedded configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CiceroneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CiceroneConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CiceroneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CiceroneConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CICERONE_STAGE_ONE_TEASER_TIMEOUT_MS`
/// must map to `stage_one.teaser_timeout_ms`, not `stage.one.teaser...`.
fn env_provider() -> Env {
    Env::prefixed("CICERONE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("engine_", "engine.", 1)
            .replacen("stage_one_", "stage_one.", 1)
            .replacen("stage_two_", "stage_two.", 1)
            .replacen("retrieval_", "retrieval.", 1)
            .replacen("lexicon_", "lexicon.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [retrieval]
            limit = 25
            rrf_k = 30.0

            [stage_one]
            generated_teasers = true
            "#,
        )
        .unwrap();

        assert_eq!(config.retrieval.limit, 25);
        assert_eq!(config.retrieval.rrf_k, 30.0);
        assert!(config.stage_one.generated_teasers);
        // Untouched sections keep their defaults.
        assert_eq!(config.engine.history_limit, 4);
    }

    #[test]
    fn load_from_str_empty_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.stage_two.max_sentences, 3);
        assert_eq!(config.lexicon.max_phrase_tokens, 2);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(load_config_from_str("[engine\nbroken").is_err());
    }
}
