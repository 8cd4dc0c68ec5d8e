use super::error::Result;
use super::format::time_label;
use super::types::{ActionResponse, Notification, NotificationKind, NotificationList};
use super::worker::{Command, Reply};
use log::{debug, error, info, warn};
use time::{OffsetDateTime, UtcOffset};

/// Hover-leave waits this long before closing the panel.
pub const CLOSE_DELAY: f32 = 0.3;
pub const EMPTY_LIST: &str = "No notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Panel {
    Closed,
    Open,
    /// Pointer left; closes once `now` reaches `at` unless it comes back.
    Closing { at: f32 },
}

impl Panel {
    pub fn is_open(&self) -> bool {
        !matches!(self, Panel::Closed)
    }
}

/// Row of the notification list, ready to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub time: String,
    pub unread: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub time: String,
    pub target: Option<String>,
}

/// Result of opening a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Opened {
    Navigate(String),
    Detail(Detail),
}

/// Fires once right away and then every `interval` seconds.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: f32,
    next: Option<f32>,
}

impl Poller {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn due(&mut self, now: f32) -> bool {
        match self.next {
            Some(next) if now < next => false,
            _ => {
                self.next = Some(now + self.interval);
                true
            }
        }
    }
}

/// Client-side state of the notification panel.
pub struct NotificationCenter {
    notifications: Vec<Notification>,
    unread: u32,
    panel: Panel,
    toasts: Vec<Toast>,
    display_offset: UtcOffset,
}

impl NotificationCenter {
    pub fn new(display_offset: UtcOffset) -> Self {
        Self {
            notifications: Vec::new(),
            unread: 0,
            panel: Panel::Closed,
            toasts: Vec::new(),
            display_offset,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    /// Badge text, hidden when nothing is unread.
    pub fn badge(&self) -> Option<String> {
        (self.unread > 0).then(|| self.unread.to_string())
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Takes the toasts raised since the last call.
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toasts.push(Toast::new(level, message));
    }

    /// Applies a finished API call.
    pub fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::Listed { manual, result } => self.listed(manual, result),
            Reply::MarkedRead { id, result } => self.marked_read(id, result),
            Reply::MarkedAllRead(result) => self.marked_all_read(result),
            Reply::Deleted { id, result } => self.deleted(id, result),
        }
    }

    /// A manual refresh always confirms; a scheduled one only speaks up when
    /// the unread count grew.
    fn listed(&mut self, manual: bool, result: Result<NotificationList>) {
        match result {
            Ok(list) => {
                let previous = self.unread;
                self.notifications = list.notifications;
                self.unread = list.unread_count;
                debug!(
                    "Loaded {} notifications, {} unread",
                    self.notifications.len(),
                    self.unread
                );

                if manual {
                    self.toast(ToastLevel::Success, "Notifications updated");
                } else if self.unread > previous {
                    let new = self.unread - previous;
                    info!("{} new notifications", new);
                    self.toast(ToastLevel::Info, format!("You have {new} new notifications"));
                }
            }
            Err(e) => {
                error!("Failed to load notifications: {}", e);
                self.toast(ToastLevel::Error, "Failed to load notifications");
            }
        }
    }

    /// Call needed to mark `id` read; `None` when it is unknown or already read.
    pub fn mark_read(&self, id: i64) -> Option<Command> {
        self.notifications
            .iter()
            .any(|n| n.id == id && !n.read)
            .then_some(Command::MarkRead(id))
    }

    fn marked_read(&mut self, id: i64, result: Result<ActionResponse>) {
        match result {
            Ok(response) if response.success => {
                // A second reply for the same entry must not count twice.
                if let Some(n) = self.notifications.iter_mut().find(|n| n.id == id && !n.read) {
                    n.read = true;
                    self.unread = self.unread.saturating_sub(1);
                }
            }
            Ok(_) => warn!("Server refused to mark notification {} as read", id),
            Err(e) => {
                error!("Failed to mark notification {} as read: {}", id, e);
                self.toast(ToastLevel::Error, "Failed to mark notification as read");
            }
        }
    }

    pub fn mark_all_read(&self) -> Option<Command> {
        (self.unread > 0).then_some(Command::MarkAllRead)
    }

    fn marked_all_read(&mut self, result: Result<ActionResponse>) {
        match result {
            Ok(response) if response.success => {
                for n in &mut self.notifications {
                    n.read = true;
                }
                self.unread = 0;
                self.toast(ToastLevel::Success, "All notifications marked as read");
            }
            Ok(_) => warn!("Server refused to mark all notifications as read"),
            Err(e) => {
                error!("Failed to mark all notifications as read: {}", e);
                self.toast(ToastLevel::Error, "Failed to mark all notifications as read");
            }
        }
    }

    fn deleted(&mut self, id: i64, result: Result<ActionResponse>) {
        match result {
            Ok(response) if response.success => {
                if let Some(index) = self.notifications.iter().position(|n| n.id == id) {
                    let removed = self.notifications.remove(index);
                    if !removed.read {
                        self.unread = self.unread.saturating_sub(1);
                    }
                }
                info!("Deleted notification {}", id);
                self.toast(ToastLevel::Success, "Notification deleted");
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Failed to delete notification".to_string());
                self.toast(ToastLevel::Error, message);
            }
            Err(e) => {
                error!("Failed to delete notification {}: {}", id, e);
                self.toast(ToastLevel::Error, "Failed to delete notification");
            }
        }
    }

    /// Where opening `id` leads: its link, or a detail view.
    pub fn describe(&self, id: i64, now: OffsetDateTime) -> Option<Opened> {
        let n = self.notifications.iter().find(|n| n.id == id)?;
        if let Some(link) = n.link.as_ref().filter(|l| !l.is_empty()) {
            return Some(Opened::Navigate(link.clone()));
        }
        Some(Opened::Detail(Detail {
            title: n.title.clone(),
            message: n.message.clone(),
            kind: n.kind,
            time: time_label(n.created_at.as_deref(), now, self.display_offset),
            target: n.target.clone(),
        }))
    }

    pub fn rows(&self, now: OffsetDateTime) -> Vec<Row> {
        self.notifications
            .iter()
            .map(|n| Row {
                id: n.id,
                title: n.title.clone(),
                message: n.message.clone(),
                kind: n.kind,
                time: time_label(n.created_at.as_deref(), now, self.display_offset),
                unread: !n.read,
            })
            .collect()
    }

    pub fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Closed => Panel::Open,
            Panel::Open | Panel::Closing { .. } => Panel::Closed,
        };
    }

    /// Pointer over the bell or the panel: open and cancel a pending close.
    pub fn pointer_enter(&mut self) {
        self.panel = Panel::Open;
    }

    pub fn pointer_leave(&mut self, now: f32) {
        if self.panel == Panel::Open {
            self.panel = Panel::Closing {
                at: now + CLOSE_DELAY,
            };
        }
    }

    pub fn outside_click(&mut self) {
        self.panel = Panel::Closed;
    }

    /// Runs the delayed close.
    pub fn update(&mut self, now: f32) {
        if let Panel::Closing { at } = self.panel {
            if now >= at {
                self.panel = Panel::Closed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::client::NotificationApi;
    use crate::notify::error::NotifyError;
    use std::cell::{Cell, RefCell};
    use time::macros::{datetime, offset};

    #[derive(Default)]
    struct FakeApi {
        list: RefCell<Option<NotificationList>>,
        fail: Cell<bool>,
        refuse: RefCell<Option<ActionResponse>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn with(notifications: Vec<Notification>, unread: u32) -> Self {
            let api = FakeApi::default();
            api.set(notifications, unread);
            api
        }

        fn set(&self, notifications: Vec<Notification>, unread: u32) {
            *self.list.borrow_mut() = Some(NotificationList {
                notifications,
                unread_count: unread,
            });
        }

        fn respond(&self, call: String) -> Result<ActionResponse> {
            self.calls.borrow_mut().push(call);
            if self.fail.get() {
                return Err(NotifyError::Status {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(self.refuse.borrow().clone().unwrap_or_else(ActionResponse::ok))
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl NotificationApi for FakeApi {
        fn list(&self) -> Result<NotificationList> {
            self.calls.borrow_mut().push("list".to_string());
            if self.fail.get() {
                return Err(NotifyError::Status {
                    status: 502,
                    message: "bad gateway".to_string(),
                });
            }
            Ok(self.list.borrow().clone().unwrap_or_default())
        }

        fn mark_read(&self, id: i64) -> Result<ActionResponse> {
            self.respond(format!("read {id}"))
        }

        fn mark_all_read(&self) -> Result<ActionResponse> {
            self.respond("read-all".to_string())
        }

        fn delete(&self, id: i64) -> Result<ActionResponse> {
            self.respond(format!("delete {id}"))
        }
    }

    fn note(id: i64, read: bool) -> Notification {
        Notification {
            id,
            title: format!("Title {id}"),
            message: format!("Message {id}"),
            kind: NotificationKind::Info,
            read,
            created_at: Some("2024-03-10 02:15:00".to_string()),
            link: None,
            target: None,
        }
    }

    fn run(center: &mut NotificationCenter, api: &FakeApi, command: Option<Command>) {
        if let Some(command) = command {
            center.apply(command.run(api));
        }
    }

    fn poll(center: &mut NotificationCenter, api: &FakeApi, manual: bool) {
        run(center, api, Some(Command::Poll { manual }));
    }

    fn mark_read(center: &mut NotificationCenter, api: &FakeApi, id: i64) {
        let command = center.mark_read(id);
        run(center, api, command);
    }

    fn mark_all_read(center: &mut NotificationCenter, api: &FakeApi) {
        let command = center.mark_all_read();
        run(center, api, command);
    }

    fn delete(center: &mut NotificationCenter, api: &FakeApi, id: i64) {
        run(center, api, Some(Command::Delete(id)));
    }

    fn open(
        center: &mut NotificationCenter,
        api: &FakeApi,
        id: i64,
        now: OffsetDateTime,
    ) -> Option<Opened> {
        mark_read(center, api, id);
        center.describe(id, now)
    }

    fn loaded(api: &FakeApi) -> NotificationCenter {
        let mut center = NotificationCenter::new(offset!(+8));
        poll(&mut center, api, false);
        center.drain_toasts();
        center
    }

    #[test]
    fn scheduled_poll_announces_only_new_unread() {
        let api = FakeApi::with(vec![note(1, false), note(2, true)], 1);
        let mut center = NotificationCenter::new(offset!(+8));

        poll(&mut center, &api, false);
        assert_eq!(center.unread(), 1);
        assert_eq!(
            center.drain_toasts(),
            vec![Toast::new(ToastLevel::Info, "You have 1 new notifications")]
        );

        poll(&mut center, &api, false);
        assert!(center.drain_toasts().is_empty());

        api.set(vec![note(1, false), note(2, true), note(3, false), note(4, false)], 3);
        poll(&mut center, &api, false);
        assert_eq!(
            center.drain_toasts(),
            vec![Toast::new(ToastLevel::Info, "You have 2 new notifications")]
        );
    }

    #[test]
    fn manual_poll_always_confirms() {
        let api = FakeApi::with(vec![], 0);
        let mut center = NotificationCenter::new(offset!(+8));
        poll(&mut center, &api, true);
        assert_eq!(
            center.drain_toasts(),
            vec![Toast::new(ToastLevel::Success, "Notifications updated")]
        );
    }

    #[test]
    fn failed_poll_keeps_state_and_reports() {
        let api = FakeApi::with(vec![note(1, false)], 1);
        let mut center = loaded(&api);
        api.fail.set(true);
        poll(&mut center, &api, false);
        assert_eq!(center.notifications().len(), 1);
        assert_eq!(
            center.drain_toasts(),
            vec![Toast::new(ToastLevel::Error, "Failed to load notifications")]
        );
    }

    #[test]
    fn mark_read_skips_unknown_and_read() {
        let api = FakeApi::with(vec![note(1, false), note(2, true)], 1);
        let mut center = loaded(&api);

        mark_read(&mut center, &api, 99);
        mark_read(&mut center, &api, 2);
        assert_eq!(api.calls(), vec!["list"]);

        mark_read(&mut center, &api, 1);
        assert_eq!(api.calls(), vec!["list", "read 1"]);
        assert!(center.notifications()[0].read);
        assert_eq!(center.unread(), 0);
        assert_eq!(center.badge(), None);
    }

    #[test]
    fn unread_never_goes_negative() {
        // Server says 0 unread but the entry itself is unread.
        let api = FakeApi::with(vec![note(1, false)], 0);
        let mut center = loaded(&api);
        mark_read(&mut center, &api, 1);
        assert_eq!(center.unread(), 0);
    }

    #[test]
    fn mark_all_read_is_a_noop_without_unread() {
        let api = FakeApi::with(vec![note(1, true)], 0);
        let mut center = loaded(&api);
        mark_all_read(&mut center, &api);
        assert_eq!(api.calls(), vec!["list"]);
        assert!(center.drain_toasts().is_empty());
    }

    #[test]
    fn mark_all_read_clears_everything() {
        let api = FakeApi::with(vec![note(1, false), note(2, false), note(3, true)], 2);
        let mut center = loaded(&api);
        assert_eq!(center.badge().as_deref(), Some("2"));

        mark_all_read(&mut center, &api);
        assert_eq!(center.unread(), 0);
        assert!(center.notifications().iter().all(|n| n.read));
        assert_eq!(
            center.drain_toasts(),
            vec![Toast::new(ToastLevel::Success, "All notifications marked as read")]
        );
    }

    #[test]
    fn delete_removes_one_entry() {
        let api = FakeApi::with(vec![note(1, false), note(2, true), note(3, false)], 2);
        let mut center = loaded(&api);

        delete(&mut center, &api, 2);
        assert_eq!(center.notifications().len(), 2);
        assert_eq!(center.unread(), 2);

        delete(&mut center, &api, 1);
        assert_eq!(center.unread(), 1);
        let ids: Vec<_> = center.notifications().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(
            center.drain_toasts(),
            vec![
                Toast::new(ToastLevel::Success, "Notification deleted"),
                Toast::new(ToastLevel::Success, "Notification deleted"),
            ]
        );
    }

    #[test]
    fn refused_delete_shows_server_message() {
        let api = FakeApi::with(vec![note(1, false)], 1);
        let mut center = loaded(&api);

        *api.refuse.borrow_mut() = Some(ActionResponse {
            success: false,
            message: Some("Not allowed".to_string()),
        });
        delete(&mut center, &api, 1);
        *api.refuse.borrow_mut() = Some(ActionResponse::default());
        delete(&mut center, &api, 1);

        assert_eq!(center.notifications().len(), 1);
        assert_eq!(
            center.drain_toasts(),
            vec![
                Toast::new(ToastLevel::Error, "Not allowed"),
                Toast::new(ToastLevel::Error, "Failed to delete notification"),
            ]
        );
    }

    #[test]
    fn open_follows_link_or_shows_detail() {
        let mut linked = note(1, false);
        linked.link = Some("/reports/42".to_string());
        let mut plain = note(2, false);
        plain.kind = NotificationKind::Warning;
        plain.target = Some("/settings".to_string());
        let api = FakeApi::with(vec![linked, plain], 2);
        let mut center = loaded(&api);
        let now = datetime!(2024-03-10 12:00 UTC);

        assert_eq!(
            open(&mut center, &api, 1, now),
            Some(Opened::Navigate("/reports/42".to_string()))
        );
        assert_eq!(
            open(&mut center, &api, 2, now),
            Some(Opened::Detail(Detail {
                title: "Title 2".to_string(),
                message: "Message 2".to_string(),
                kind: NotificationKind::Warning,
                time: "Today 10:15".to_string(),
                target: Some("/settings".to_string()),
            }))
        );
        assert_eq!(center.unread(), 0);
        assert_eq!(open(&mut center, &api, 9, now), None);
    }

    #[test]
    fn repeated_mark_read_reply_counts_once() {
        let api = FakeApi::with(vec![note(1, false), note(2, false)], 2);
        let mut center = loaded(&api);
        let command = center.mark_read(1);
        run(&mut center, &api, command);
        run(&mut center, &api, command);
        assert_eq!(center.unread(), 1);
        assert_eq!(center.mark_read(1), None);
    }

    #[test]
    fn rows_carry_labels() {
        let api = FakeApi::with(vec![note(1, false)], 1);
        let center = loaded(&api);
        let rows = center.rows(datetime!(2024-03-10 12:00 UTC));
        assert_eq!(rows[0].time, "Today 10:15");
        assert!(rows[0].unread);
    }

    #[test]
    fn panel_hover_close_is_delayed_and_cancellable() {
        let mut center = NotificationCenter::new(offset!(+8));
        center.pointer_enter();
        assert!(center.panel().is_open());

        center.pointer_leave(1.0);
        center.update(1.2);
        assert!(center.panel().is_open());

        center.pointer_enter();
        center.update(1.5);
        assert_eq!(center.panel(), Panel::Open);

        center.pointer_leave(2.0);
        center.update(2.31);
        assert_eq!(center.panel(), Panel::Closed);
    }

    #[test]
    fn panel_toggle_and_outside_click() {
        let mut center = NotificationCenter::new(offset!(+8));
        center.toggle_panel();
        assert_eq!(center.panel(), Panel::Open);
        center.outside_click();
        assert_eq!(center.panel(), Panel::Closed);
        center.toggle_panel();
        center.toggle_panel();
        assert_eq!(center.panel(), Panel::Closed);
    }

    #[test]
    fn poller_fires_immediately_then_on_interval() {
        let mut poller = Poller::new(10.0);
        assert!(poller.due(0.0));
        assert!(!poller.due(5.0));
        assert!(poller.due(10.0));
        assert!(!poller.due(19.9));
        assert!(poller.due(20.5));
    }
}
