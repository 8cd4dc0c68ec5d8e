mod app;
mod config;
mod gfx;
mod input;
mod login;
mod notify;
mod offline;

use anyhow::Result;
use app::App;
use config::Config;
use gfx::{
    draw::{DrawList, Surface},
    math::Vec2,
};
use log::{info, warn};
use login::Frame;
use notify::{HttpNotificationApi, ToastLevel};
use offline::HttpNetwork;
use std::io::{self, BufReader};
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting glint...");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Could not load config, using defaults: {:#}", e);
        Config::default()
    });
    if Config::path().is_ok_and(|path| !path.exists()) {
        if let Err(e) = config.save() {
            warn!("Could not write default config: {:#}", e);
        }
    }
    let display_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.display_name.clone());

    let api = HttpNotificationApi::new(
        config.notifications.base_url.as_str(),
        config.notifications.session.clone(),
    )?;
    let network = HttpNetwork::new(&config.notifications.base_url)?;
    let viewport = Vec2::new(config.viewport.width as f32, config.viewport.height as f32);
    let frame_time = Duration::from_secs_f32(1.0 / config.fps_cap.max(1) as f32);

    let mut app = App::new(config, Box::new(api), Box::new(network), viewport)?;
    app.start_login(&display_name)?;
    let mut surface = DrawList::new(viewport.x, viewport.y);

    let events = input::spawn_reader(BufReader::new(io::stdin()));
    info!("{}", input::HELP);
    let mut input_open = true;

    let mut last_frame = Instant::now();

    // Main loop
    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        if input_open {
            input_open = input::dispatch(&mut app, &events);
        }
        if app.quit {
            break;
        }
        if surface.size() != app.viewport {
            surface.resize(app.viewport.x, app.viewport.y);
        }

        app.update(dt);

        for toast in app.take_toasts() {
            match toast.level {
                ToastLevel::Error => warn!("{}", toast.message),
                _ => info!("{}", toast.message),
            }
        }

        if app.render(&mut surface) == Frame::Finished {
            info!("Login animation done after {} frames", surface.frames);
        }

        // Without input there is nothing left to do once the animation and
        // any outstanding requests are over.
        if !input_open && !app.login_running() && app.is_idle() {
            break;
        }

        std::thread::sleep(frame_time);
    }

    info!(
        "Exiting with {} unread notifications",
        app.notifications.unread()
    );
    Ok(())
}
