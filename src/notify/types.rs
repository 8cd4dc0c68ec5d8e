//! Wire types of the user notification API.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Maintenance,
    Update,
}

impl From<String> for NotificationKind {
    /// Unknown kinds are shown as info.
    fn from(s: String) -> Self {
        match s.as_str() {
            "success" => NotificationKind::Success,
            "warning" => NotificationKind::Warning,
            "error" => NotificationKind::Error,
            "maintenance" => NotificationKind::Maintenance,
            "update" => NotificationKind::Update,
            _ => NotificationKind::Info,
        }
    }
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
            NotificationKind::Maintenance => "maintenance",
            NotificationKind::Update => "update",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Info => "Info",
            NotificationKind::Success => "Success",
            NotificationKind::Warning => "Warning",
            NotificationKind::Error => "Error",
            NotificationKind::Maintenance => "Maintenance",
            NotificationKind::Update => "Update",
        }
    }

    /// Remix icon class.
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Info => "ri-information-line",
            NotificationKind::Success => "ri-check-line",
            NotificationKind::Warning => "ri-error-warning-line",
            NotificationKind::Error => "ri-close-circle-line",
            NotificationKind::Maintenance => "ri-tools-line",
            NotificationKind::Update => "ri-refresh-line",
        }
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
    /// Server timestamp, usually SQLite `YYYY-MM-DD HH:MM:SS` in UTC.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Followed directly when the notification is opened.
    #[serde(default)]
    pub link: Option<String>,
    /// Offered as an action from the detail view.
    #[serde(default)]
    pub target: Option<String>,
}

/// Body of `GET /api/user/notifications`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotificationList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notifications: Vec<Notification>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unread_count: u32,
}

/// Body returned by the read, read-all and delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let list: NotificationList = serde_json::from_str("{}").unwrap();
        assert!(list.notifications.is_empty());
        assert_eq!(list.unread_count, 0);

        let list: NotificationList =
            serde_json::from_str(r#"{"notifications": null, "unread_count": null}"#).unwrap();
        assert_eq!(list, NotificationList::default());
    }

    #[test]
    fn parses_a_server_notification() {
        let raw = r#"{
            "id": 7,
            "title": "Backup",
            "message": "Nightly backup done",
            "type": "maintenance",
            "read": false,
            "created_at": "2024-03-01 08:30:00",
            "link": null
        }"#;
        let n: Notification = serde_json::from_str(raw).unwrap();
        assert_eq!(n.id, 7);
        assert_eq!(n.kind, NotificationKind::Maintenance);
        assert_eq!(n.created_at.as_deref(), Some("2024-03-01 08:30:00"));
        assert!(n.link.is_none());
    }

    #[test]
    fn unknown_kind_is_info() {
        let n: Notification = serde_json::from_str(r#"{"id": 1, "type": "party"}"#).unwrap();
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.kind.label(), "Info");
        assert_eq!(n.kind.icon(), "ri-information-line");

        let n: Notification = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert_eq!(n.kind, NotificationKind::Info);
    }

    #[test]
    fn action_response_with_message() {
        let r: ActionResponse =
            serde_json::from_str(r#"{"success": false, "message": "not yours"}"#).unwrap();
        assert!(!r.success);
        assert_eq!(r.message.as_deref(), Some("not yours"));
    }
}
