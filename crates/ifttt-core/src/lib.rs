//! ifttt-core — building blocks of the IFTTT channel.
//!
//! - **`trigger`** — the [`Trigger`] capability each pollable feed implements
//! - **`poll`** — IFTTT poll request / `{"data": [...]}` response envelope
//! - **`registry`** — ordered trigger set with slug-collision checks
//! - **`naming`** — CamelCase → snake_case slugs and display names
//! - **`config`** — layered TOML channel configuration

pub mod config;
pub mod error;
pub mod naming;
pub mod poll;
pub mod registry;
pub mod trigger;

pub use config::ChannelConfig;
pub use error::{ConfigError, RegistryError, TriggerError, TriggerResult};
pub use poll::{ItemMeta, PollRequest, PollResponse, TriggerItem};
pub use registry::{FeedEntry, TriggerRegistry};
pub use trigger::{Fields, Trigger};
