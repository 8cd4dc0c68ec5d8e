pub mod charts;
pub mod palette;
pub mod particles;
pub mod phase;
pub mod story;

use crate::gfx::anim::{lerp, stage, AnimationClock};
use crate::gfx::draw::{Align, Paint, Surface};
use crate::gfx::math::{Color, Rect, Vec2};
use charts::{chart_layout, draw_chart, ChartSlot, ChartStyle};
use log::{debug, info};
use palette::{Palette, Theme};
use particles::{advance_particles, draw_background, draw_connections, draw_streams, ParticleField};
use phase::{Phase, PhaseTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use story::{current_stage, Greeting, STORY_STAGES};

/// Viewports narrower than this get the low-quality profile.
pub const LOW_QUALITY_WIDTH: f32 = 768.0;

const SUBTITLE: &str = "Ready to start your data analysis journey";

/// Rendering profile picked once per viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality {
    pub high_performance: bool,
    pub glow: bool,
    pub halo_radius: f32,
    pub background_particles: usize,
    pub streams: usize,
}

impl Quality {
    pub fn for_viewport(viewport: Vec2, high_performance_allowed: bool) -> Self {
        if high_performance_allowed && viewport.x >= LOW_QUALITY_WIDTH {
            Self {
                high_performance: true,
                glow: true,
                halo_radius: 80.0,
                background_particles: 50,
                streams: 15,
            }
        } else {
            Self {
                high_performance: false,
                glow: false,
                halo_radius: 60.0,
                background_particles: 20,
                streams: 8,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationSettings {
    /// Total run time in seconds.
    pub duration: f32,
    pub phases: PhaseTable,
    /// `false` forces the low-quality profile on any viewport.
    pub high_performance: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration: 10.0,
            phases: PhaseTable::default(),
            high_performance: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Finished,
    Skipped,
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Schedule another tick.
    Continue,
    /// The run reached the end; stop scheduling.
    Finished,
    /// The animation is no longer running, nothing was drawn.
    Stopped,
}

pub struct LoginAnimation {
    display_name: String,
    greeting: Greeting,
    theme: Theme,
    palette: Palette,
    settings: AnimationSettings,
    viewport: Vec2,
    quality: Quality,
    clock: AnimationClock,
    charts: Vec<ChartSlot>,
    field: ParticleField,
    rng: StdRng,
    state: RunState,
    phase: Option<Phase>,
}

impl LoginAnimation {
    pub fn new(
        display_name: &str,
        theme: Theme,
        viewport: Vec2,
        settings: AnimationSettings,
        now: f32,
    ) -> Self {
        Self::with_rng(display_name, theme, viewport, settings, now, StdRng::from_entropy())
    }

    /// Same as [`LoginAnimation::new`] with a caller-supplied generator, so
    /// runs can be replayed.
    pub fn with_rng(
        display_name: &str,
        theme: Theme,
        viewport: Vec2,
        settings: AnimationSettings,
        now: f32,
        rng: StdRng,
    ) -> Self {
        let mut clock = AnimationClock::new(settings.duration);
        clock.start(now);

        let mut anim = Self {
            display_name: display_name.to_string(),
            greeting: Greeting::now(),
            theme,
            palette: Palette::for_theme(theme),
            quality: Quality::for_viewport(viewport, settings.high_performance),
            settings,
            viewport,
            clock,
            charts: Vec::new(),
            field: ParticleField::default(),
            rng,
            state: RunState::Running,
            phase: None,
        };
        anim.generate();
        debug!("Phase table: {:?}", anim.settings.phases.spans());

        info!(
            "Login animation started for {:?}: {}x{}, high performance {}",
            anim.display_name, viewport.x, viewport.y, anim.quality.high_performance
        );
        anim
    }

    fn generate(&mut self) {
        self.charts = chart_layout(self.viewport, &self.quality);
        self.field = ParticleField::generate(
            &mut self.rng,
            self.viewport,
            &self.palette,
            &self.quality,
            &self.charts,
        );
        let kinds: Vec<String> = self.charts.iter().map(|c| c.kind.to_string()).collect();
        debug!("Chart layout: {}", kinds.join(", "));
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Phase drawn by the last tick, `None` before the first one.
    pub fn current_phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn quality(&self) -> &Quality {
        &self.quality
    }

    pub fn charts(&self) -> &[ChartSlot] {
        &self.charts
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn tick<S: Surface + ?Sized>(&mut self, now: f32, surface: &mut S) -> Frame {
        if self.state != RunState::Running {
            return Frame::Stopped;
        }

        self.clock.update(now);
        let progress = self.clock.progress();
        let (phase, p) = self.settings.phases.resolve(progress);

        if self.phase != Some(phase) {
            info!("Login animation entering {} phase at {:.3}", phase, progress);
            self.phase = Some(phase);
        }

        surface.clear();
        match phase {
            Phase::Initial => self.draw_initial(surface, p),
            Phase::Expansion => self.draw_expansion(surface, p),
            Phase::Charts => self.draw_charts_phase(surface, p),
            Phase::FadeOut => self.draw_fade_out(surface, p),
        }

        if self.clock.is_complete() {
            info!("Login animation finished");
            self.state = RunState::Finished;
            Frame::Finished
        } else {
            Frame::Continue
        }
    }

    /// Stops the run and drops every generated element.
    pub fn skip(&mut self) {
        if self.state == RunState::Skipped {
            return;
        }
        info!("Login animation skipped");
        self.state = RunState::Skipped;
        self.field.clear();
        self.charts.clear();
    }

    /// Regenerates every element for the new viewport. Keeps the clock.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.state == RunState::Skipped {
            return;
        }
        debug!("Login animation resized to {}x{}", width, height);
        self.field.clear();
        self.charts.clear();
        self.viewport = Vec2::new(width, height);
        self.quality = Quality::for_viewport(self.viewport, self.settings.high_performance);
        self.generate();
    }

    fn centre(&self) -> Vec2 {
        self.viewport * 0.5
    }

    fn blur(&self, amount: f32) -> f32 {
        if self.quality.glow {
            amount
        } else {
            0.0
        }
    }

    fn draw_initial<S: Surface + ?Sized>(&mut self, surface: &mut S, p: f32) {
        draw_background(&mut self.field.background, self.viewport, &mut self.rng, surface, p * 0.5);

        let halo = self.palette.primary;
        surface.fill_circle(
            self.centre(),
            self.quality.halo_radius * p,
            Paint::gradient(halo.with_alpha(0.4), Color::TRANSPARENT),
        );

        let blur = self.blur(5.0 * p);
        for particle in &self.field.centre {
            surface.fill_circle(
                particle.pos,
                particle.radius,
                Paint::solid(particle.color).alpha(particle.alpha * p).glow(blur),
            );
        }

        if p > 0.7 {
            self.draw_welcome(surface, stage(p, 0.7, 0.3) * 0.5);
        }
    }

    fn draw_expansion<S: Surface + ?Sized>(&mut self, surface: &mut S, p: f32) {
        let centre = self.centre();
        draw_background(&mut self.field.background, self.viewport, &mut self.rng, surface, 0.5 + p * 0.5);
        draw_streams(&mut self.field.streams, surface, p, self.quality.glow);

        let moved = (p * 1.5).min(1.0);
        advance_particles(&mut self.field.centre, centre, moved);

        let fade = 1.0 - p * 0.5;
        let blur = self.blur(5.0 * fade);
        for particle in &self.field.centre {
            surface.fill_circle(
                particle.pos,
                particle.radius,
                Paint::solid(particle.color).alpha(particle.alpha * fade).glow(blur),
            );
            if moved < 0.8 {
                surface.stroke_line(
                    centre,
                    particle.pos,
                    0.8,
                    Paint::solid(particle.color).alpha(0.2 * (1.0 - moved)),
                );
            }
        }

        self.draw_welcome(surface, 0.5 + (p * 2.0).min(1.0) * 0.5);

        if p > 0.7 {
            let style = self.chart_style();
            let outline = stage(p, 0.7, 0.3) * 0.2;
            for slot in self.charts.iter().filter(|slot| slot.kind.has_outline()) {
                draw_chart(surface, &style, slot, outline);
            }
        }
    }

    fn draw_charts_phase<S: Surface + ?Sized>(&mut self, surface: &mut S, p: f32) {
        draw_background(&mut self.field.background, self.viewport, &mut self.rng, surface, 1.0);
        self.draw_welcome(surface, 1.0);
        draw_connections(&mut self.field.connections, surface, p, self.quality.glow);
        self.draw_all_charts(surface, 0.2 + p * 0.8);
        self.draw_story(surface, p);
        draw_streams(&mut self.field.streams, surface, 1.0 - p * 0.5, self.quality.glow);

        for particle in &self.field.centre {
            surface.fill_circle(
                particle.pos,
                particle.radius,
                Paint::solid(particle.color).alpha(particle.alpha * (1.0 - p)),
            );
        }
    }

    fn draw_fade_out<S: Surface + ?Sized>(&mut self, surface: &mut S, p: f32) {
        surface.set_opacity(1.0 - p);
        draw_background(&mut self.field.background, self.viewport, &mut self.rng, surface, 1.0);
        self.draw_welcome(surface, 1.0);
        draw_connections(&mut self.field.connections, surface, 1.0, self.quality.glow);
        self.draw_story(surface, 1.0);
        self.draw_all_charts(surface, 1.0);
    }

    fn chart_style(&self) -> ChartStyle<'_> {
        ChartStyle {
            palette: &self.palette,
            glow: self.quality.glow,
            time: self.clock.elapsed(),
        }
    }

    fn draw_all_charts<S: Surface + ?Sized>(&self, surface: &mut S, progress: f32) {
        let style = self.chart_style();
        for slot in &self.charts {
            draw_chart(surface, &style, slot, progress);
        }
    }

    /// Greeting line with its decorations and the subtitle.
    fn draw_welcome<S: Surface + ?Sized>(&self, surface: &mut S, progress: f32) {
        let at = Vec2::new(self.viewport.x / 2.0, self.viewport.y * 0.3);
        let (from, to) = self.palette.greeting;

        let mut size = (self.viewport.x / 18.0).min(32.0);
        if progress < 0.7 {
            size *= lerp(0.8, 1.0, progress / 0.7);
        }
        surface.fill_text(
            &format!("{}, {}", self.greeting.text(), self.display_name),
            at,
            size,
            Align::Center,
            Paint::gradient(from, to).alpha(progress).glow(self.blur(15.0 * progress)),
        );

        if progress > 0.4 {
            let dp = stage(progress, 0.4, 0.6);
            let line = Paint::solid(from.with_alpha(0.6));
            surface.stroke_line(at - Vec2::new(180.0, 0.0), at - Vec2::new(180.0 - 100.0 * dp, 0.0), 2.0, line);
            surface.stroke_line(at + Vec2::new(180.0, 0.0), at + Vec2::new(180.0 - 100.0 * dp, 0.0), 2.0, line);
            surface.fill_circle(at - Vec2::new(190.0, 0.0), 4.0 * dp, Paint::solid(from));
            surface.fill_circle(at + Vec2::new(190.0, 0.0), 4.0 * dp, Paint::solid(from));
        }

        if progress > 0.7 {
            let sp = stage(progress, 0.7, 0.3);
            surface.fill_text(
                SUBTITLE,
                at + Vec2::new(0.0, 45.0),
                (self.viewport.x / 40.0).min(16.0) * sp,
                Align::Center,
                Paint::solid(self.palette.text_muted).alpha(sp),
            );
        }
    }

    /// Status pill at the bottom: current story text over a progress bar.
    fn draw_story<S: Surface + ?Sized>(&self, surface: &mut S, progress: f32) {
        let Some(current) = current_stage(&STORY_STAGES, progress) else {
            return;
        };
        let at = Vec2::new(self.viewport.x * 0.5, self.viewport.y * 0.9);
        let palette = &self.palette;

        surface.fill_rect(Rect::centered(at, 300.0, 30.0), 15.0, Paint::solid(palette.panel));

        let end = if self.theme.is_dark() {
            palette.accents[1]
        } else {
            palette.accents[2]
        };
        surface.fill_rect(
            Rect::new(at.x - 145.0, at.y - 10.0, 290.0 * progress, 20.0),
            10.0,
            Paint::gradient(palette.primary, end),
        );
        surface.fill_text(current.text, at, 14.0, Align::Center, Paint::solid(palette.text));
    }
}
