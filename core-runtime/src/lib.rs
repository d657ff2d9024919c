//! # Worker Runtime Module
//!
//! Foundational runtime infrastructure for the offline worker core:
//! - Logging and tracing infrastructure
//! - Worker configuration with fail-fast validation
//! - Client message hub (worker → page broadcast)
//! - Control message wire types (page → worker)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the router depends on. It
//! establishes the logging conventions, the configuration surface, and the
//! message contracts between the worker and the page contexts it serves.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{ApiRules, PushDefaults, StaticAssetRules, WorkerConfig};
pub use error::{Error, Result};
pub use events::{ClientHub, ClientMessage, ControlMessage};
