//! # Offline Cache Router
//!
//! Request-routing and cache-lifecycle engine for an offline-first web shell.
//!
//! ## Overview
//!
//! The router intercepts outgoing requests, classifies each one against an
//! ordered route table, and applies the matching caching strategy:
//!
//! | Class        | Strategy                                                  |
//! |--------------|-----------------------------------------------------------|
//! | Navigation   | network-first, cached document fallback                   |
//! | Static asset | cache-first, synthesized placeholder on total failure     |
//! | API          | network-first raced against a timeout, offline JSON       |
//! | Default      | network-first, cache fallback, rejection propagates       |
//!
//! Around that sit the lifecycle transitions (install precaches the shell
//! manifest all-or-nothing, activate deletes namespaces from older
//! versions), the page control messages (`CACHE_URLS`, `CLEAR_CACHE`,
//! `SKIP_WAITING`), background-sync relay, and push notifications.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌───────────────────────────────┐
//!  WorkerEvent ──>│  OfflineWorker::handle_event  │──> EventOutcome
//!                 └──────┬────────────────────────┘
//!                        │
//!          ┌─────────────┼──────────────┬───────────────┐
//!          ▼             ▼              ▼               ▼
//!     RouteTable     strategies     CacheStorage    ClientHub
//!     (classify)   (per-class I/O)  (namespaces)   (page fan-out)
//! ```
//!
//! Every live fetch goes through the injected [`Fetcher`] bridge; push UI
//! goes through [`NotificationPresenter`] and [`WindowOpener`]. The worker
//! itself holds no platform handles.
//!
//! [`Fetcher`]: bridge_traits::fetch::Fetcher
//! [`NotificationPresenter`]: bridge_traits::notifications::NotificationPresenter
//! [`WindowOpener`]: bridge_traits::notifications::WindowOpener

pub mod error;
pub mod messages;
pub mod routes;
mod strategy;
pub mod worker;

pub use error::{Result, RouterError};
pub use messages::{PushPayload, SyncTag};
pub use routes::{RequestClass, RouteTable};
pub use worker::{EventOutcome, LifecyclePhase, OfflineWorker, WorkerEvent};
