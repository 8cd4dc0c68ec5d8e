use super::charts::ChartSlot;
use super::palette::Palette;
use super::Quality;
use crate::gfx::draw::{Paint, Surface};
use crate::gfx::math::{Color, Vec2};
use rand::Rng;
use std::f32::consts::TAU;

const CENTRE_PARTICLES: usize = 100;
const CENTRE_SPREAD: f32 = 50.0;
const CENTRE_REACH: f32 = 300.0;
/// Connection curves bow this far above the straight line.
const CONNECTION_LIFT: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub target: Vec2,
    pub color: Color,
    pub radius: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundParticle {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color: Color,
    pub speed: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rider {
    /// Position along the path, wraps in `[0, 1]`.
    pub position: f32,
    pub radius: f32,
    pub speed: f32,
    pub direction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataStream {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub color: Color,
    pub riders: Vec<Rider>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataConnection {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Color,
    pub width: f32,
    /// Own growth, advanced every frame up to 1.
    pub progress: f32,
    pub speed: f32,
    pub riders: Vec<Rider>,
}

impl DataConnection {
    pub fn control(&self) -> Vec2 {
        Vec2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0 - CONNECTION_LIFT,
        )
    }
}

/// Everything the sequencer regenerates on init and resize.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    pub centre: Vec<Particle>,
    pub background: Vec<BackgroundParticle>,
    pub streams: Vec<DataStream>,
    pub connections: Vec<DataConnection>,
}

impl ParticleField {
    pub fn generate<R: Rng>(
        rng: &mut R,
        viewport: Vec2,
        palette: &Palette,
        quality: &Quality,
        charts: &[ChartSlot],
    ) -> Self {
        Self {
            centre: centre_particles(rng, viewport, palette),
            background: background_particles(rng, viewport, palette, quality.background_particles),
            streams: data_streams(rng, viewport, palette, quality.streams),
            connections: data_connections(rng, palette, charts),
        }
    }

    pub fn clear(&mut self) {
        self.centre.clear();
        self.background.clear();
        self.streams.clear();
        self.connections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.centre.is_empty()
            && self.background.is_empty()
            && self.streams.is_empty()
            && self.connections.is_empty()
    }
}

fn pick_color<R: Rng>(rng: &mut R, palette: &Palette) -> Color {
    let colors = palette.particle_colors();
    colors[rng.gen_range(0..colors.len())]
}

pub fn centre_particles<R: Rng>(rng: &mut R, viewport: Vec2, palette: &Palette) -> Vec<Particle> {
    let centre = viewport * 0.5;
    (0..CENTRE_PARTICLES)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let spread = rng.gen_range(0.0..CENTRE_SPREAD);
            Particle {
                pos: centre + Vec2::from_angle(angle, spread),
                target: centre + Vec2::from_angle(angle, CENTRE_REACH),
                color: pick_color(rng, palette),
                radius: rng.gen_range(1.0..4.0),
                alpha: 1.0,
            }
        })
        .collect()
}

pub fn background_particles<R: Rng>(
    rng: &mut R,
    viewport: Vec2,
    palette: &Palette,
    count: usize,
) -> Vec<BackgroundParticle> {
    (0..count)
        .map(|_| BackgroundParticle {
            pos: Vec2::new(
                rng.gen_range(0.0..=viewport.x.max(0.0)),
                rng.gen_range(0.0..=viewport.y.max(0.0)),
            ),
            radius: rng.gen_range(1.0..3.0),
            alpha: rng.gen_range(0.1..0.4),
            color: pick_color(rng, palette).with_alpha(0.7),
            speed: rng.gen_range(0.1..0.3),
            angle: rng.gen_range(0.0..TAU),
        })
        .collect()
}

pub fn data_streams<R: Rng>(
    rng: &mut R,
    viewport: Vec2,
    palette: &Palette,
    count: usize,
) -> Vec<DataStream> {
    let centre = viewport * 0.5;
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let length = rng.gen_range(150.0..250.0);
            let rider_count = rng.gen_range(3..7);
            let riders = (0..rider_count)
                .map(|j| Rider {
                    position: j as f32 / rider_count as f32,
                    radius: rng.gen_range(1.0..4.0),
                    speed: rng.gen_range(0.01..0.03),
                    direction: 1.0,
                })
                .collect();
            DataStream {
                start: centre,
                end: centre + Vec2::from_angle(angle, length),
                width: rng.gen_range(0.5..2.0),
                color: pick_color(rng, palette),
                riders,
            }
        })
        .collect()
}

/// Links every chart but the last to one or two other charts.
pub fn data_connections<R: Rng>(
    rng: &mut R,
    palette: &Palette,
    charts: &[ChartSlot],
) -> Vec<DataConnection> {
    let mut connections = Vec::new();
    if charts.len() < 2 {
        return connections;
    }

    for (i, from) in charts.iter().enumerate().take(charts.len() - 1) {
        let links = rng.gen_range(1..=2);
        for _ in 0..links {
            // Any index but our own.
            let mut target = rng.gen_range(0..charts.len() - 1);
            if target >= i {
                target += 1;
            }
            let to = &charts[target];

            let riders = if rng.gen_bool(0.5) {
                let n = rng.gen_range(2..5);
                (0..n)
                    .map(|_| Rider {
                        position: rng.gen_range(0.0..1.0),
                        radius: rng.gen_range(1.0..3.5),
                        speed: rng.gen_range(0.005..0.015),
                        direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
                    })
                    .collect()
            } else {
                Vec::new()
            };

            connections.push(DataConnection {
                start: from.pos,
                end: to.pos,
                color: pick_color(rng, palette).with_alpha(0.7),
                width: rng.gen_range(1.0..2.5),
                progress: 0.0,
                speed: rng.gen_range(0.002..0.007),
                riders,
            });
        }
    }
    connections
}

/// Point on the quadratic Bézier `from -> control -> to` at `t`.
pub fn quad_point(from: Vec2, control: Vec2, to: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    from * (u * u) + control * (2.0 * u * t) + to * (t * t)
}

fn wrap_unit(v: f32) -> f32 {
    if v > 1.0 {
        0.0
    } else if v < 0.0 {
        1.0
    } else {
        v
    }
}

impl Rider {
    fn advance(&mut self) {
        self.position = wrap_unit(self.position + self.speed * self.direction);
    }
}

/// Moves every centre particle from `centre` toward its target by `t`.
pub fn advance_particles(particles: &mut [Particle], centre: Vec2, t: f32) {
    let t = t.clamp(0.0, 1.0);
    for particle in particles {
        particle.pos = centre.lerp(particle.target, t);
    }
}

/// Drifts background particles, wrapping at the viewport edges, then draws
/// them at `progress` opacity.
pub fn draw_background<R: Rng, S: Surface + ?Sized>(
    particles: &mut [BackgroundParticle],
    viewport: Vec2,
    rng: &mut R,
    surface: &mut S,
    progress: f32,
) {
    for p in particles.iter_mut() {
        p.pos = p.pos + Vec2::from_angle(p.angle, p.speed);

        if p.pos.x < 0.0 {
            p.pos.x = viewport.x;
        }
        if p.pos.x > viewport.x {
            p.pos.x = 0.0;
        }
        if p.pos.y < 0.0 {
            p.pos.y = viewport.y;
        }
        if p.pos.y > viewport.y {
            p.pos.y = 0.0;
        }

        p.angle += (rng.gen::<f32>() - 0.5) * 0.01;

        surface.fill_circle(p.pos, p.radius, Paint::solid(p.color).alpha(p.alpha * progress));
    }
}

/// Radial lines out of the centre, grown to `progress` of their length, with
/// riders shown on the visible part.
pub fn draw_streams<S: Surface + ?Sized>(
    streams: &mut [DataStream],
    surface: &mut S,
    progress: f32,
    glow: bool,
) {
    let blur = |amount: f32| if glow { amount * progress } else { 0.0 };

    for stream in streams.iter_mut() {
        let end = stream.start.lerp(stream.end, progress);
        surface.stroke_line(
            stream.start,
            end,
            stream.width,
            Paint::solid(stream.color).alpha(0.3 * progress).glow(blur(5.0)),
        );

        for rider in stream.riders.iter_mut() {
            rider.advance();
            if rider.position <= progress {
                let at = stream.start.lerp(end, rider.position);
                surface.fill_circle(
                    at,
                    rider.radius,
                    Paint::solid(stream.color).alpha(0.7 * progress).glow(blur(8.0)),
                );
            }
        }
    }
}

/// Curves between chart anchors, each growing at its own pace.
pub fn draw_connections<S: Surface + ?Sized>(
    connections: &mut [DataConnection],
    surface: &mut S,
    progress: f32,
    glow: bool,
) {
    for conn in connections.iter_mut() {
        conn.progress = (conn.progress + conn.speed).min(1.0);
        let reach = conn.progress * progress;
        let end = conn.start.lerp(conn.end, reach);
        let control = conn.control();

        surface.stroke_quad(
            conn.start,
            control,
            end,
            conn.width,
            Paint::solid(conn.color)
                .alpha(0.6 * progress)
                .glow(if glow { 5.0 * progress } else { 0.0 }),
        );

        for rider in conn.riders.iter_mut() {
            rider.advance();
            let t = rider.position * reach;
            if t > 0.0 {
                let at = quad_point(conn.start, control, end, t);
                surface.fill_circle(at, rider.radius, Paint::solid(conn.color).alpha(0.8 * progress));
            }
        }
    }
}
