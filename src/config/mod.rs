//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, ChatLogConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Per-connection limits (LimitsConfig, FloodConfig, IdleTimeoutsConfig)
//! - [`validation`]: Startup sanity checks

mod limits;
mod listen;
mod types;
mod validation;

pub use limits::{FloodConfig, IdleTimeoutsConfig, LimitsConfig};
pub use types::{ChatLogConfig, Config};
pub use validation::validate;
