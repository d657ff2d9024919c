//! Sync tags and push payload contract.

use serde::Deserialize;
use tracing::debug;

/// Wire name of the backup-data sync tag.
pub const SYNC_BACKUP_TAG: &str = "backup-data";

/// Wire name of the breach-check sync tag.
pub const SYNC_BREACH_CHECK_TAG: &str = "breach-check";

/// Wire name of the periodic backup tag.
pub const PERIODIC_BACKUP_TAG: &str = "backup-sync";

/// Notification action identifier that opens the root page.
pub const ACTION_VIEW: &str = "view";

/// Notification action identifier that just closes the notification.
pub const ACTION_DISMISS: &str = "dismiss";

/// A background-sync registration tag.
///
/// The router only relays these to the page; the page does the actual backup
/// or breach-check work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTag {
    BackupData,
    BreachCheck,
    /// A tag the router does not recognize; logged and ignored.
    Other(String),
}

impl SyncTag {
    pub fn parse(tag: &str) -> Self {
        match tag {
            SYNC_BACKUP_TAG => SyncTag::BackupData,
            SYNC_BREACH_CHECK_TAG => SyncTag::BreachCheck,
            other => SyncTag::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SyncTag::BackupData => SYNC_BACKUP_TAG,
            SyncTag::BreachCheck => SYNC_BREACH_CHECK_TAG,
            SyncTag::Other(tag) => tag,
        }
    }
}

impl From<&str> for SyncTag {
    fn from(tag: &str) -> Self {
        SyncTag::parse(tag)
    }
}

/// Structured push payload: both fields optional, defaults fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PushPayload {
    /// Parse a push payload from raw bytes.
    ///
    /// A payload that is not valid JSON is treated as carrying no fields at
    /// all, so the configured defaults apply across the board.
    pub fn parse(payload: &[u8]) -> Self {
        serde_json::from_slice(payload).unwrap_or_else(|error| {
            debug!(%error, "malformed push payload, falling back to defaults");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_tag_round_trip() {
        assert_eq!(SyncTag::parse("backup-data"), SyncTag::BackupData);
        assert_eq!(SyncTag::parse("breach-check"), SyncTag::BreachCheck);
        assert_eq!(
            SyncTag::parse("mystery"),
            SyncTag::Other("mystery".to_string())
        );

        assert_eq!(SyncTag::BackupData.as_str(), "backup-data");
        assert_eq!(SyncTag::Other("mystery".to_string()).as_str(), "mystery");
    }

    #[test]
    fn test_push_payload_full() {
        let payload = PushPayload::parse(br#"{"title":"Backup done","body":"All synced"}"#);
        assert_eq!(payload.title.as_deref(), Some("Backup done"));
        assert_eq!(payload.body.as_deref(), Some("All synced"));
    }

    #[test]
    fn test_push_payload_partial() {
        let payload = PushPayload::parse(br#"{"body":"Only a body"}"#);
        assert_eq!(payload.title, None);
        assert_eq!(payload.body.as_deref(), Some("Only a body"));
    }

    #[test]
    fn test_push_payload_ignores_extra_fields() {
        let payload = PushPayload::parse(br#"{"title":"Hi","priority":"high"}"#);
        assert_eq!(payload.title.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_push_payload_malformed_is_empty() {
        let payload = PushPayload::parse(b"not json at all");
        assert_eq!(payload, PushPayload::default());
    }
}
