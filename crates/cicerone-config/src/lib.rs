// SPDX-FileCopyrightText: 2026 Cicerone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Cicerone guide engine.
//!
//! TOML models with strict key validation plus a Figment-based layered
//! loader (defaults < files < environment).

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    CiceroneConfig, EngineConfig, LexiconConfig, RetrievalConfig, StageOneConfig, StageTwoConfig,
};
