//! # Client Message Hub
//!
//! Message contracts between the worker and its page clients, plus the
//! broadcast hub that fans worker messages out to every connected client,
//! built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Two directions, two types:
//! - [`ControlMessage`] - page → worker maintenance commands
//! - [`ClientMessage`] - worker → page notifications, delivered through the
//!   [`ClientHub`] to every currently connected client
//!
//! Both serialize with a `type` tag so the wire form matches the page-side
//! protocol (`{"type": "SYNC_BACKUP", "timestamp": ...}`).
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{ClientHub, ClientMessage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let hub = ClientHub::new(16);
//! let mut page = hub.connect();
//!
//! hub.post(ClientMessage::SyncBackup { timestamp: 1_700_000_000_000 }).ok();
//!
//! let received = page.recv().await.unwrap();
//! assert!(matches!(received, ClientMessage::SyncBackup { .. }));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! `post` returns an error when no client is connected; the worker treats
//! that as a quiet no-op (there is simply nobody to tell). Slow clients
//! receive `RecvError::Lagged` and keep going.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

use crate::error::{Error, Result};

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the client hub channel.
pub const DEFAULT_CLIENT_BUFFER_SIZE: usize = 64;

// ============================================================================
// Page → Worker: control messages
// ============================================================================

/// Maintenance commands a page sends to the worker.
///
/// Each command is idempotent and side-effect-only; none produces a response
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Bulk-add a list of URLs to the runtime namespace.
    #[serde(rename = "CACHE_URLS")]
    CacheUrls { urls: Vec<String> },

    /// Delete all cache namespaces unconditionally.
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache,

    /// Force-skip the waiting/install gate.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}

impl ControlMessage {
    /// Parse a control message from its JSON wire form.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(Error::from)
    }
}

// ============================================================================
// Worker → Page: client messages
// ============================================================================

/// Notifications the worker posts to every connected page client.
///
/// The worker performs no data movement for sync tags; it only tells the
/// pages that now is the moment to do their backup or breach-check work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// A `backup-data` sync fired.
    #[serde(rename = "SYNC_BACKUP")]
    SyncBackup { timestamp: u64 },

    /// A `breach-check` sync fired.
    #[serde(rename = "SYNC_BREACH_CHECK")]
    SyncBreachCheck { timestamp: u64 },

    /// The periodic backup tag fired.
    #[serde(rename = "PERIODIC_BACKUP")]
    PeriodicBackup { timestamp: u64 },
}

impl ClientMessage {
    /// Unix-millis timestamp the message was stamped with.
    pub fn timestamp(&self) -> u64 {
        match self {
            ClientMessage::SyncBackup { timestamp }
            | ClientMessage::SyncBreachCheck { timestamp }
            | ClientMessage::PeriodicBackup { timestamp } => *timestamp,
        }
    }
}

// ============================================================================
// Client Hub
// ============================================================================

/// Broadcast hub connecting the worker to its open page clients.
///
/// Each connected page is a broadcast subscriber; `post` clones the message
/// to every one of them. Posting with no clients connected returns an error
/// the caller may ignore.
#[derive(Clone)]
pub struct ClientHub {
    sender: broadcast::Sender<ClientMessage>,
}

impl ClientHub {
    /// Creates a hub with the given per-client buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Posts a message to all connected clients.
    ///
    /// Returns the number of clients that received it, or an error if none
    /// are connected.
    pub fn post(&self, message: ClientMessage) -> std::result::Result<usize, SendError<ClientMessage>> {
        self.sender.send(message)
    }

    /// Connects a new page client and returns its message stream.
    ///
    /// Past messages are not replayed.
    pub fn connect(&self) -> Receiver<ClientMessage> {
        self.sender.subscribe()
    }

    /// Number of currently connected clients.
    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ClientHub {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for ClientHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHub")
            .field("client_count", &self.client_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_message_wire_format() {
        let json = br#"{"type":"CACHE_URLS","urls":["/extra.css","/extra.js"]}"#;
        let message = ControlMessage::from_json(json).unwrap();
        assert_eq!(
            message,
            ControlMessage::CacheUrls {
                urls: vec!["/extra.css".to_string(), "/extra.js".to_string()]
            }
        );

        let clear = ControlMessage::from_json(br#"{"type":"CLEAR_CACHE"}"#).unwrap();
        assert_eq!(clear, ControlMessage::ClearCache);

        let skip = ControlMessage::from_json(br#"{"type":"SKIP_WAITING"}"#).unwrap();
        assert_eq!(skip, ControlMessage::SkipWaiting);
    }

    #[test]
    fn test_control_message_rejects_unknown_type() {
        let result = ControlMessage::from_json(br#"{"type":"REBOOT"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_message_wire_format() {
        let message = ClientMessage::SyncBackup {
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&message).unwrap();

        assert!(json.contains("\"type\":\"SYNC_BACKUP\""));
        assert!(json.contains("\"timestamp\":1700000000000"));

        let parsed: ClientMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, message);
        assert_eq!(parsed.timestamp(), 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_post_with_no_clients_errors() {
        let hub = ClientHub::new(8);
        let result = hub.post(ClientMessage::PeriodicBackup { timestamp: 1 });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_every_client_receives_each_message() {
        let hub = ClientHub::new(8);
        let mut page_a = hub.connect();
        let mut page_b = hub.connect();
        assert_eq!(hub.client_count(), 2);

        let message = ClientMessage::SyncBreachCheck { timestamp: 42 };
        let delivered = hub.post(message.clone()).unwrap();
        assert_eq!(delivered, 2);

        assert_eq!(page_a.recv().await.unwrap(), message);
        assert_eq!(page_b.recv().await.unwrap(), message);
    }

    #[tokio::test]
    async fn test_clients_connect_independently() {
        let hub = ClientHub::new(8);
        let mut early = hub.connect();

        hub.post(ClientMessage::SyncBackup { timestamp: 1 }).ok();

        // A client connecting later never sees earlier messages.
        let mut late = hub.connect();
        hub.post(ClientMessage::SyncBackup { timestamp: 2 }).ok();

        assert_eq!(early.recv().await.unwrap().timestamp(), 1);
        assert_eq!(early.recv().await.unwrap().timestamp(), 2);
        assert_eq!(late.recv().await.unwrap().timestamp(), 2);
    }
}
