//! Notification descriptors shown for push events.

use serde::{Deserialize, Serialize};

/// Action id for the "view recipes" notification button.
pub const ACTION_EXPLORE: &str = "explore";

/// Action id for the dismiss button.
pub const ACTION_CLOSE: &str = "close";

/// A notification the agent asks the host to display.
///
/// Serializes with the field names a web notification surface expects
/// (`dateOfArrival`, `primaryKey`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

/// Payload carried on the notification for the click handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// Milliseconds since the epoch when the push arrived.
    pub date_of_arrival: i64,
    pub primary_key: u32,
}

/// One tappable action on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

impl Notification {
    /// The standing "new recipes available" notification shown for every
    /// push, whatever its payload.
    pub fn recipes_available() -> Self {
        Self {
            title: "Filipino Recipes".to_string(),
            body: "New Filipino recipes available!".to_string(),
            icon: "./icons/icon-192x192.png".to_string(),
            badge: "./icons/icon-96x96.png".to_string(),
            vibrate: vec![100, 50, 100],
            data: NotificationData { date_of_arrival: chrono::Utc::now().timestamp_millis(), primary_key: 1 },
            actions: vec![
                NotificationAction {
                    action: ACTION_EXPLORE.to_string(),
                    title: "View Recipes".to_string(),
                    icon: "./icons/icon-96x96.png".to_string(),
                },
                NotificationAction {
                    action: ACTION_CLOSE.to_string(),
                    title: "Close".to_string(),
                    icon: "./icons/icon-96x96.png".to_string(),
                },
            ],
        }
    }
}
