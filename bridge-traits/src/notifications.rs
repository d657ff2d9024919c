//! Notification Presentation Abstraction
//!
//! Value types for platform notifications and the traits the host implements
//! to display them and react to their actions.

use async_trait::async_trait;

use crate::error::Result;

/// A single button on a displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    /// Identifier reported back when the user activates the action.
    pub action: String,
    /// Button label.
    pub title: String,
    /// Optional icon URL.
    pub icon: Option<String>,
}

impl NotificationAction {
    pub fn new(action: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            title: title.into(),
            icon: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A notification to be displayed by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub badge: Option<String>,
    /// Replacement tag: a new notification with the same tag replaces the old.
    pub tag: Option<String>,
    /// Keep the notification visible until the user interacts with it.
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
            badge: None,
            tag: None,
            require_interaction: false,
            actions: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn require_interaction(mut self, required: bool) -> Self {
        self.require_interaction = required;
        self
    }

    pub fn action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Notification display trait
///
/// Abstracts the platform notification surface. Implementations should map
/// [`Notification`] onto whatever the host offers and report activation of an
/// action back to the worker as a notification-click event.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Display a notification
    async fn show(&self, notification: Notification) -> Result<()>;
}

/// Window opening trait
///
/// Lets the worker open or focus a page in response to a notification action.
#[async_trait]
pub trait WindowOpener: Send + Sync {
    /// Open (or focus, if already open) the page at `url`
    async fn open_window(&self, url: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_builder() {
        let notification = Notification::new("Backup complete", "All entries synced")
            .icon("/icons/icon-192.png")
            .badge("/icons/icon-96.png")
            .tag("worker-notification")
            .require_interaction(true)
            .action(NotificationAction::new("view", "View").icon("/icons/icon-96.png"))
            .action(NotificationAction::new("dismiss", "Dismiss"));

        assert_eq!(notification.title, "Backup complete");
        assert_eq!(notification.actions.len(), 2);
        assert_eq!(notification.actions[0].action, "view");
        assert!(notification.actions[0].icon.is_some());
        assert!(notification.actions[1].icon.is_none());
        assert!(notification.require_interaction);
    }
}
