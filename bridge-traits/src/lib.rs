//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host embedding
//! the offline worker core.
//!
//! ## Overview
//!
//! This crate defines the contract between the worker core and the platform it
//! runs inside. Each trait represents a capability the router needs but that
//! only the host can provide: performing a live network fetch, presenting a
//! system notification, opening a window, reading the clock.
//!
//! ## Traits
//!
//! - [`Fetcher`](fetch::Fetcher) - Live network fetch for intercepted requests
//! - [`NotificationPresenter`](notifications::NotificationPresenter) - Display
//!   push notifications with actions
//! - [`WindowOpener`](notifications::WindowOpener) - Open or focus a page in
//!   response to a notification action
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Fail-Fast Strategy
//!
//! The core should fail fast with descriptive errors when a required capability
//! is missing, rather than silently degrading. Optional capabilities (e.g. a
//! notification presenter on a headless host) are represented as `Option` at
//! the injection site and skipped with a debug log when absent.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Host
//! implementations should convert platform-specific failures into
//! `BridgeError` with actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod error;
pub mod fetch;
pub mod notifications;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use fetch::{FetchRequest, FetchResponse, Fetcher, HttpMethod, RequestDestination, RequestMode};
pub use notifications::{Notification, NotificationAction, NotificationPresenter, WindowOpener};
pub use time::{Clock, SystemClock};
