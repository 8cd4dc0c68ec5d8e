use crate::config::Config;
use crate::gfx::draw::Surface;
use crate::gfx::math::Vec2;
use crate::login::{Frame, LoginAnimation};
use crate::notify::{
    Command, NotificationApi, NotificationCenter, NotificationWorker, Opened, Poller, Toast,
};
use crate::offline::{Fetched, Network, OfflineService, OfflineWorker, Request};
use anyhow::Result;
use log::{debug, info, warn};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Skip button on the login animation.
    Skip,
    Resize { width: f32, height: f32 },
    PanelToggle,
    PointerEnter,
    PointerLeave,
    OutsideClick,
    Refresh,
    /// Log the notification list.
    List,
    MarkRead(i64),
    MarkAllRead,
    Open(i64),
    Delete(i64),
    /// Load a resource through the offline cache.
    Fetch(String),
    /// Navigate to a page through the offline cache.
    Visit(String),
    Quit,
}

pub struct App {
    pub config: Config,
    pub viewport: Vec2,
    pub time: f32,
    pub login: Option<LoginAnimation>,
    pub notifications: NotificationCenter,
    /// Set when an opened notification links somewhere.
    pub navigate_to: Option<String>,
    /// Detail view of the last opened notification without a link.
    pub detail: Option<Opened>,
    /// Last page or resource the offline service answered.
    pub last_fetch: Option<Fetched>,
    pub quit: bool,
    worker: NotificationWorker,
    offline: OfflineService,
    poller: Poller,
}

impl App {
    pub fn new(
        config: Config,
        api: Box<dyn NotificationApi + Send>,
        network: Box<dyn Network + Send>,
        viewport: Vec2,
    ) -> Result<Self> {
        let offset = config.notifications.display_offset()?;
        let poller = Poller::new(config.notifications.poll_interval_secs);
        let cache = config.offline.enabled.then(|| {
            OfflineWorker::new(
                config.offline.cache_version.as_str(),
                config.offline.precache.clone(),
            )
        });

        Ok(Self {
            config,
            viewport,
            time: 0.0,
            login: None,
            notifications: NotificationCenter::new(offset),
            navigate_to: None,
            detail: None,
            last_fetch: None,
            quit: false,
            worker: NotificationWorker::spawn(api),
            offline: OfflineService::spawn(cache, network),
            poller,
        })
    }

    pub fn start_login(&mut self, display_name: &str) -> Result<()> {
        let settings = self.config.animation.settings()?;
        self.login = Some(LoginAnimation::new(
            display_name,
            self.config.theme,
            self.viewport,
            settings,
            self.time,
        ));
        Ok(())
    }

    pub fn login_running(&self) -> bool {
        self.login.as_ref().is_some_and(LoginAnimation::is_running)
    }

    /// No API call or fetch is outstanding.
    pub fn is_idle(&self) -> bool {
        self.worker.is_idle() && self.offline.is_idle()
    }

    fn send(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.worker.send(command);
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        debug!("Event {:?}", event);
        match event {
            UiEvent::Skip => {
                if let Some(login) = self.login.as_mut() {
                    debug!(
                        "Skip requested while {:?} in {:?}",
                        login.state(),
                        login.current_phase()
                    );
                    login.skip();
                }
            }
            UiEvent::Resize { width, height } => {
                self.viewport = Vec2::new(width, height);
                if let Some(login) = self.login.as_mut() {
                    login.resize(width, height);
                    info!(
                        "Resized to {}x{}: high performance {}, {} charts, {} background particles",
                        width,
                        height,
                        login.quality().high_performance,
                        login.charts().len(),
                        login.field().background.len()
                    );
                }
            }
            UiEvent::PanelToggle => self.notifications.toggle_panel(),
            UiEvent::PointerEnter => self.notifications.pointer_enter(),
            UiEvent::PointerLeave => self.notifications.pointer_leave(self.time),
            UiEvent::OutsideClick => self.notifications.outside_click(),
            UiEvent::Refresh => self.worker.send(Command::Poll { manual: true }),
            UiEvent::List => self.log_list(),
            UiEvent::MarkRead(id) => {
                let command = self.notifications.mark_read(id);
                self.send(command);
            }
            UiEvent::MarkAllRead => {
                let command = self.notifications.mark_all_read();
                self.send(command);
            }
            UiEvent::Open(id) => {
                let command = self.notifications.mark_read(id);
                self.send(command);
                match self.notifications.describe(id, OffsetDateTime::now_utc()) {
                    Some(Opened::Navigate(link)) => {
                        info!("Opening notification {} link {}", id, link);
                        self.offline.request(Request::navigate(link.as_str()));
                        self.navigate_to = Some(link);
                    }
                    Some(detail) => self.detail = Some(detail),
                    None => warn!("No notification {}", id),
                }
            }
            UiEvent::Delete(id) => self.worker.send(Command::Delete(id)),
            UiEvent::Fetch(url) => self.offline.request(Request::get(url)),
            UiEvent::Visit(url) => self.offline.request(Request::navigate(url)),
            UiEvent::Quit => self.quit = true,
        }
    }

    fn log_list(&self) {
        if self.notifications.notifications().is_empty() {
            info!("{}", crate::notify::center::EMPTY_LIST);
            return;
        }
        info!(
            "{} notifications, {} unread",
            self.notifications.notifications().len(),
            self.notifications.badge().unwrap_or_else(|| "none".to_string())
        );
        for row in self.notifications.rows(OffsetDateTime::now_utc()) {
            info!(
                "{}{} {} [{}] {}: {} ({})",
                if row.unread { "* " } else { "  " },
                row.id,
                row.kind.icon(),
                row.kind.label(),
                row.title,
                row.message,
                row.time
            );
        }
        debug!("Panel open: {}", self.notifications.panel().is_open());
    }

    /// Advances time, applies finished background work, runs the scheduled
    /// poll and the delayed panel close.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.notifications.update(self.time);

        while let Some(reply) = self.worker.try_recv() {
            self.notifications.apply(reply);
        }
        if self.poller.due(self.time) {
            if self.worker.is_polling() {
                debug!("Previous poll still running");
            } else {
                self.worker.send(Command::Poll { manual: false });
            }
        }

        while let Some(fetched) = self.offline.try_recv() {
            let request = &fetched.request;
            match &fetched.result {
                Ok(response) => info!(
                    "{} {} -> {} ({} bytes)",
                    request.method,
                    request.url,
                    response.status,
                    response.body.len()
                ),
                Err(e) => warn!("{} {} failed: {}", request.method, request.url, e),
            }
            self.last_fetch = Some(fetched);
        }
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.notifications.drain_toasts()
    }

    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Frame {
        match self.login.as_mut() {
            Some(login) => login.tick(self.time, surface),
            None => Frame::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::draw::DrawList;
    use crate::input::{dispatch, spawn_reader};
    use crate::login::phase::Phase;
    use crate::notify::error::Result as NotifyResult;
    use crate::notify::types::{ActionResponse, Notification, NotificationKind, NotificationList};
    use crate::notify::ToastLevel;
    use crate::offline::cache::Response;
    use crate::offline::worker::OfflineError;
    use crate::offline::Request;
    use std::io::Cursor;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn report() -> NotificationList {
        NotificationList {
            notifications: vec![Notification {
                id: 1,
                title: "Report ready".to_string(),
                message: String::new(),
                kind: NotificationKind::Success,
                read: false,
                created_at: None,
                link: Some("/reports/1".to_string()),
                target: None,
            }],
            unread_count: 1,
        }
    }

    /// Serves one unread notification. With a gate, `list` waits until the
    /// test releases it.
    struct StaticApi {
        gate: Option<Mutex<Receiver<()>>>,
    }

    impl NotificationApi for StaticApi {
        fn list(&self) -> NotifyResult<NotificationList> {
            if let Some(gate) = &self.gate {
                if let Ok(rx) = gate.lock() {
                    let _ = rx.recv_timeout(Duration::from_secs(5));
                }
            }
            Ok(report())
        }

        fn mark_read(&self, _id: i64) -> NotifyResult<ActionResponse> {
            Ok(ActionResponse::ok())
        }

        fn mark_all_read(&self) -> NotifyResult<ActionResponse> {
            Ok(ActionResponse::ok())
        }

        fn delete(&self, _id: i64) -> NotifyResult<ActionResponse> {
            Ok(ActionResponse::ok())
        }
    }

    struct StaticNetwork;

    impl Network for StaticNetwork {
        fn fetch(&self, request: &Request) -> std::result::Result<Response, OfflineError> {
            Ok(Response::ok(format!("page {}", request.url)))
        }
    }

    fn app_with(api: StaticApi) -> App {
        App::new(
            Config::default(),
            Box::new(api),
            Box::new(StaticNetwork),
            Vec2::new(1280.0, 800.0),
        )
        .unwrap()
    }

    fn app() -> App {
        app_with(StaticApi { gate: None })
    }

    /// Pumps updates until every background call has been applied.
    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.update(0.0);
            if app.is_idle() {
                return;
            }
            assert!(Instant::now() < deadline, "background work never finished");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn login_runs_to_completion() {
        let mut app = app();
        app.start_login("ada").unwrap();
        let mut surface = DrawList::new(1280.0, 800.0);

        let mut frames = 0;
        loop {
            app.update(0.5);
            frames += 1;
            if app.render(&mut surface) != Frame::Continue {
                break;
            }
        }
        assert_eq!(frames, 20);
        assert!(!app.login_running());
    }

    #[test]
    fn skip_event_stops_the_animation() {
        let mut app = app();
        app.start_login("ada").unwrap();
        let mut surface = DrawList::new(1280.0, 800.0);
        app.update(1.0);
        assert_eq!(app.render(&mut surface), Frame::Continue);

        app.handle_event(UiEvent::Skip);
        app.update(1.0);
        assert_eq!(app.render(&mut surface), Frame::Stopped);
    }

    #[test]
    fn resize_reaches_the_animation() {
        let mut app = app();
        app.start_login("ada").unwrap();
        app.handle_event(UiEvent::Resize {
            width: 500.0,
            height: 700.0,
        });
        assert_eq!(app.viewport, Vec2::new(500.0, 700.0));
        let login = app.login.as_ref().unwrap();
        assert!(!login.quality().high_performance);
    }

    #[test]
    fn polls_on_schedule_and_opens_links() {
        let mut app = app();
        app.update(0.016);
        settle(&mut app);
        assert_eq!(app.notifications.unread(), 1);
        let toasts = app.take_toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Info);

        app.handle_event(UiEvent::Open(1));
        assert_eq!(app.navigate_to.as_deref(), Some("/reports/1"));
        settle(&mut app);
        assert_eq!(app.notifications.unread(), 0);
        let page = app.last_fetch.as_ref().unwrap();
        assert_eq!(page.request, Request::navigate("/reports/1"));
        assert_eq!(page.result.as_ref().unwrap().body, b"page /reports/1");

        app.handle_event(UiEvent::Refresh);
        settle(&mut app);
        assert_eq!(app.take_toasts()[0].message, "Notifications updated");
    }

    #[test]
    fn panel_closes_after_hover_delay() {
        let mut app = app();
        app.handle_event(UiEvent::PointerEnter);
        app.handle_event(UiEvent::PointerLeave);
        app.update(0.1);
        assert!(app.notifications.panel().is_open());
        app.update(0.25);
        assert!(!app.notifications.panel().is_open());
    }

    #[test]
    fn slow_poll_does_not_hold_up_frames() {
        let (release, gate) = mpsc::channel();
        let mut app = app_with(StaticApi {
            gate: Some(Mutex::new(gate)),
        });
        app.start_login("ada").unwrap();
        let mut surface = DrawList::new(1280.0, 800.0);

        let started = Instant::now();
        let mut seen = Vec::new();
        loop {
            app.update(0.25);
            let frame = app.render(&mut surface);
            if let Some(phase) = app.login.as_ref().and_then(|l| l.current_phase()) {
                if seen.last() != Some(&phase) {
                    seen.push(phase);
                }
            }
            if frame != Frame::Continue {
                break;
            }
        }
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(
            seen,
            vec![Phase::Initial, Phase::Expansion, Phase::Charts, Phase::FadeOut]
        );
        assert_eq!(app.notifications.unread(), 0);

        release.send(()).unwrap();
        settle(&mut app);
        assert_eq!(app.notifications.unread(), 1);
    }

    #[test]
    fn commands_from_input_reach_the_app() {
        let mut app = app();
        app.start_login("ada").unwrap();
        let events = spawn_reader(Cursor::new("resize 600 900\nbogus\n\nrefresh\nskip\nquit\n"));

        let deadline = Instant::now() + Duration::from_secs(5);
        while dispatch(&mut app, &events) {
            assert!(Instant::now() < deadline, "input never closed");
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(app.viewport, Vec2::new(600.0, 900.0));
        assert!(!app.login_running());
        assert!(app.quit);

        settle(&mut app);
        let toasts = app.take_toasts();
        assert!(toasts.iter().any(|t| t.message == "Notifications updated"));
    }
}
