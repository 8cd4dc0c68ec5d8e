//! Chart slots and the procedural chart renderers.
//!
//! Every renderer is a function of `(position, progress)` plus the shared
//! [`ChartStyle`]. Progress 0 draws nothing visible, 1 draws the finished
//! chart; the intermediate values reveal parts in a fixed order.

use super::palette::Palette;
use super::Quality;
use crate::gfx::anim::stage;
use crate::gfx::draw::{Align, Paint, Surface};
use crate::gfx::math::{Color, Rect, Vec2};
use std::f32::consts::{PI, TAU};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Gauge,
    Heatmap,
    MultiFile,
    SingleFile,
    AiAnalysis,
    SalesTrend,
    DataDetective,
}

impl ChartKind {
    /// Declared type string, as used in layouts.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Gauge => "gauge",
            ChartKind::Heatmap => "heatmap",
            ChartKind::MultiFile => "multiFile",
            ChartKind::SingleFile => "singleFile",
            ChartKind::AiAnalysis => "aiAnalysis",
            ChartKind::SalesTrend => "salesTrend",
            ChartKind::DataDetective => "dataDetective",
        }
    }

    /// Kinds whose outlines are sketched while the particles expand.
    pub fn has_outline(self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::Line | ChartKind::Pie)
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Bar => "Sales Trend",
            ChartKind::Line => "Data Trend",
            ChartKind::Pie => "Market Share",
            ChartKind::Gauge => "System Performance",
            ChartKind::Heatmap => "Data Heatmap",
            ChartKind::MultiFile => "Multi-file Analysis",
            ChartKind::SingleFile => "Single-file Analysis",
            ChartKind::AiAnalysis => "AI Analysis",
            ChartKind::SalesTrend => "Sales Trend Analysis",
            ChartKind::DataDetective => "Data Detective",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSlot {
    pub kind: ChartKind,
    pub pos: Vec2,
}

impl ChartSlot {
    fn at(kind: ChartKind, viewport: Vec2, fx: f32, fy: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(viewport.x * fx, viewport.y * fy),
        }
    }
}

/// Fixed chart positions for the viewport. The low-quality profile shows
/// only a bar and a pie chart.
pub fn chart_layout(viewport: Vec2, quality: &Quality) -> Vec<ChartSlot> {
    if quality.high_performance {
        vec![
            ChartSlot::at(ChartKind::MultiFile, viewport, 0.25, 0.35),
            ChartSlot::at(ChartKind::SingleFile, viewport, 0.75, 0.35),
            ChartSlot::at(ChartKind::AiAnalysis, viewport, 0.25, 0.65),
            ChartSlot::at(ChartKind::SalesTrend, viewport, 0.60, 0.65),
            ChartSlot::at(ChartKind::DataDetective, viewport, 0.75, 0.5),
        ]
    } else {
        vec![
            ChartSlot::at(ChartKind::Bar, viewport, 0.4, 0.5),
            ChartSlot::at(ChartKind::Pie, viewport, 0.6, 0.5),
        ]
    }
}

pub struct ChartStyle<'a> {
    pub palette: &'a Palette,
    pub glow: bool,
    /// Seconds since the animation started, drives the pulsing details.
    pub time: f32,
}

impl ChartStyle<'_> {
    fn blur(&self, amount: f32) -> f32 {
        if self.glow {
            amount
        } else {
            0.0
        }
    }
}

pub fn draw_chart<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, slot: &ChartSlot, progress: f32) {
    let p = progress.clamp(0.0, 1.0);
    let o = slot.pos;
    match slot.kind {
        ChartKind::Bar => draw_bar(s, style, o, p),
        ChartKind::Line => draw_line(s, style, o, p),
        ChartKind::Pie => draw_pie(s, style, o, p),
        ChartKind::Gauge => draw_gauge(s, style, o, p),
        ChartKind::Heatmap => draw_heatmap(s, style, o, p),
        ChartKind::MultiFile => draw_multi_file(s, style, o, p),
        ChartKind::SingleFile => draw_single_file(s, style, o, p),
        ChartKind::AiAnalysis => draw_ai_analysis(s, style, o, p),
        ChartKind::SalesTrend => draw_sales_trend(s, style, o, p),
        ChartKind::DataDetective => draw_data_detective(s, style, o, p),
    }
}

fn title<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, kind: ChartKind, dy: f32, p: f32) {
    if p <= 0.7 {
        return;
    }
    let tp = stage(p, 0.7, 0.3);
    s.fill_text(
        kind.title(),
        o + Vec2::new(0.0, dy),
        14.0 * tp,
        Align::Center,
        Paint::solid(style.palette.text).alpha(tp),
    );
}

fn stroke_rect<S: Surface + ?Sized>(s: &mut S, r: Rect, width: f32, paint: Paint) {
    let tl = Vec2::new(r.x, r.y);
    let tr = Vec2::new(r.x + r.width, r.y);
    let br = Vec2::new(r.x + r.width, r.y + r.height);
    let bl = Vec2::new(r.x, r.y + r.height);
    s.stroke_line(tl, tr, width, paint);
    s.stroke_line(tr, br, width, paint);
    s.stroke_line(br, bl, width, paint);
    s.stroke_line(bl, tl, width, paint);
}

/// Strokes the polyline through `points` up to horizontal coordinate `limit`.
fn polyline_until<S: Surface + ?Sized>(s: &mut S, points: &[Vec2], limit: f32, width: f32, paint: Paint) {
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.x >= limit {
            break;
        }
        let end = if b.x > limit {
            a.lerp(b, (limit - a.x) / (b.x - a.x))
        } else {
            b
        };
        s.stroke_line(a, end, width, paint);
    }
}

fn bar_colors() -> [Color; 5] {
    [
        Color::rgb(0x4c, 0x75, 0xe6),
        Color::rgb(0x5a, 0x8c, 0xf5),
        Color::rgb(0x5a, 0xa5, 0xf5),
        Color::rgb(0x5a, 0xbb, 0xf5),
        Color::rgb(0x5a, 0xd1, 0xf5),
    ]
}

fn draw_bar<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let w = 100.0 * p;
    let h = 80.0 * p;
    title(s, style, o, ChartKind::Bar, -h / 2.0 - 12.0, p);

    let bar_w = w / 10.0;
    let gap = bar_w * 0.4;
    for (i, color) in bar_colors().into_iter().enumerate() {
        let fi = i as f32;
        let bar_h = ((fi * 0.8).sin() + 1.5) * h / 2.5;
        let cx = fi * (bar_w + gap) - w / 2.0 + bar_w / 2.0;
        let rect = Rect::new(o.x + cx - bar_w / 2.0, o.y - bar_h, bar_w, bar_h);

        s.fill_rect(
            rect,
            4.0 * p,
            Paint::gradient(color, color.lighten(20.0)).alpha(p).glow(style.blur(12.0 * p)),
        );
        // Top highlight
        s.fill_rect(
            Rect::new(rect.x, rect.y, bar_w, (5.0 * p).min(bar_h)),
            4.0 * p,
            Paint::solid(Color::WHITE).alpha(0.4 * p),
        );

        if p > 0.85 {
            let lp = stage(p, 0.85, 0.15);
            let value = (bar_h / h * 100.0).floor();
            s.fill_text(
                &format!("{value}"),
                Vec2::new(o.x + cx, o.y - bar_h - 6.0),
                11.0 * lp,
                Align::Center,
                Paint::solid(style.palette.text).alpha(lp),
            );
        }
    }
}

fn draw_line<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let w = 100.0 * p;
    let h = 60.0 * p;
    let primary = style.palette.primary;
    title(s, style, o, ChartKind::Line, -h / 2.0 - 12.0, p);

    if p > 0.4 {
        let ap = stage(p, 0.4, 0.3);
        let origin = o + Vec2::new(-w / 2.0, h / 2.0);
        let axis = Paint::solid(style.palette.grid);
        s.stroke_line(origin, origin + Vec2::new(w * ap, 0.0), 1.5, axis);
        s.stroke_line(origin, origin - Vec2::new(0.0, h * ap), 1.5, axis);
    }

    let points: Vec<Vec2> = (0..8)
        .map(|i| {
            let f = i as f32 / 7.0;
            o + Vec2::new(-w / 2.0 + w * f, (f * PI * 1.5).sin() * h / 2.5)
        })
        .collect();
    let span = points[7].x - points[0].x;

    if p > 0.5 {
        let lp = stage(p, 0.5, 0.5);
        polyline_until(
            s,
            &points,
            points[0].x + span * lp,
            3.0 * p,
            Paint::solid(primary).alpha(p).glow(style.blur(10.0 * p)),
        );
    }

    if p > 0.6 {
        let pp = stage(p, 0.6, 0.4);
        let limit = points[0].x + span * pp;
        for pt in points.iter().filter(|pt| pt.x <= limit) {
            s.fill_circle(*pt, 5.0 * p, Paint::solid(Color::WHITE).alpha(p).glow(style.blur(8.0 * p)));
            s.fill_circle(*pt, 3.0 * p, Paint::solid(primary).alpha(p));
        }
    }
}

const PIE_SHARES: [f32; 5] = [0.35, 0.25, 0.2, 0.15, 0.05];
const PIE_LABELS: [&str; 5] = ["Product A", "Product B", "Product C", "Product D", "Other"];

fn pie_colors() -> [Color; 5] {
    [
        Color::rgb(0x4c, 0x75, 0xe6),
        Color::rgb(0x5b, 0xbf, 0x54),
        Color::rgb(0xf0, 0xc1, 0x39),
        Color::rgb(0xe3, 0x5d, 0x62),
        Color::rgb(0x8e, 0x44, 0xad),
    ]
}

fn draw_pie<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let radius = 40.0 * p;
    let palette = style.palette;
    title(s, style, o, ChartKind::Pie, -radius - 12.0, p);

    if p < 0.2 {
        s.fill_circle(o, radius, Paint::solid(palette.panel).alpha(p * 5.0));
    } else {
        s.fill_circle(
            o + Vec2::new(0.0, 3.0),
            radius * 0.95,
            Paint::solid(Color::BLACK.with_alpha(0.15)).alpha(0.5 * p),
        );
    }

    let sweep = (p * 5.0).min(1.0);
    let mut start = -PI / 2.0;
    for ((share, color), label) in PIE_SHARES.iter().zip(pie_colors()).zip(PIE_LABELS) {
        let angle = share * TAU * sweep;
        let end = start + angle;
        let mid = start + angle / 2.0;
        let glow = if p > 0.8 { style.blur(12.0 * (p - 0.8) / 0.2) } else { 0.0 };

        s.fill_sector(o, radius, start, end, Paint::gradient(color.lighten(20.0), color).alpha(p).glow(glow));
        if p > 0.8 {
            s.fill_sector(o, radius * 0.85, start, end, Paint::solid(Color::WHITE).alpha(0.2));
        }

        if p > 0.85 && *share > 0.1 {
            let lp = stage(p, 0.85, 0.15);
            let dot = o + Vec2::from_angle(mid, radius * 1.2);
            s.stroke_line(
                o + Vec2::from_angle(mid, radius * 0.9),
                dot,
                1.5 * lp,
                Paint::solid(palette.text_muted).alpha(lp),
            );
            s.fill_circle(dot, 3.0 * lp, Paint::solid(color).alpha(lp));

            let align = if mid > PI / 2.0 && mid < PI * 1.5 { Align::Right } else { Align::Left };
            s.fill_text(
                &format!("{label} {}%", (share * 100.0).round()),
                o + Vec2::from_angle(mid, radius * 1.4),
                12.0 * lp,
                align,
                Paint::solid(palette.text).alpha(lp),
            );
        }
        start = end;
    }

    if p > 0.3 {
        let ip = stage(p, 0.3, 0.4);
        s.fill_circle(o, radius * 0.4 * ip, Paint::gradient(palette.background.with_alpha(1.0), palette.panel.with_alpha(1.0)).alpha(ip));
    }
}

fn draw_gauge<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let radius = 40.0 * p;
    let palette = style.palette;
    title(s, style, o, ChartKind::Gauge, -radius - 12.0, p);

    s.stroke_arc(o, radius, 0.0, TAU, 2.0 * p, Paint::solid(palette.grid).alpha(p));

    let track = radius - 5.0 * p;
    let start = PI * 0.75;
    s.stroke_arc(o, track, start, PI * 2.25, 10.0 * p, Paint::solid(palette.grid.with_alpha(0.1)).alpha(p));

    let value = p * 0.85;
    let needle_angle = PI * (0.75 + 1.5 * value);
    s.stroke_arc(o, track, start, needle_angle, 10.0 * p, Paint::gradient(palette.primary, palette.accents[0]).alpha(p));
    s.fill_circle(o, 15.0 * p, Paint::solid(palette.panel.with_alpha(0.9)));

    if p > 0.3 {
        let np = stage(p, 0.3, 0.7);
        let tip = o + Vec2::from_angle(needle_angle, (radius - 10.0 * p) * np);
        s.stroke_line(o, tip, 2.0 * p, Paint::solid(palette.alert));
        s.fill_circle(tip, 4.0 * p, Paint::solid(palette.alert));
    }

    if p > 0.6 {
        let vp = stage(p, 0.6, 0.4);
        s.fill_text(
            &format!("{}%", (value * 100.0).round()),
            o + Vec2::new(0.0, radius / 2.0),
            16.0 * vp,
            Align::Center,
            Paint::solid(palette.text).alpha(vp),
        );
    }
}

/// Heat value for a cell: a smooth pattern with a fixed per-cell offset.
fn heat(row: usize, col: usize) -> f32 {
    let base = ((row as f32 / 2.0).sin() + (col as f32 / 3.0).cos() + 2.0) / 4.0;
    let jitter = ((row * 7 + col * 13) % 10) as f32 / 10.0 - 0.5;
    (base + jitter * 0.3).clamp(0.0, 1.0)
}

fn draw_heatmap<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    const COLS: usize = 5;
    const ROWS: usize = 4;
    let h = 80.0 * p;
    let cell = 14.0 * p;
    let palette = style.palette;
    title(s, style, o, ChartKind::Heatmap, -h / 2.0 - 12.0, p);

    let origin = o + Vec2::new(-(COLS as f32) * cell / 2.0, -(ROWS as f32) * cell / 2.0);
    let total = (ROWS * COLS) as f32;

    for row in 0..ROWS {
        for col in 0..COLS {
            let index = (row * COLS + col) as f32;
            let shown = ((p * 1.2 * total - index) / 3.0).min(1.0);
            if shown <= 0.0 {
                continue;
            }
            let value = heat(row, col);
            let color = if value < 0.3 {
                palette.primary
            } else if value < 0.6 {
                palette.accents[1]
            } else {
                palette.tertiary
            };
            let at = origin + Vec2::new(col as f32 * cell, row as f32 * cell);
            s.fill_rect(Rect::new(at.x, at.y, cell - 1.0, cell - 1.0), 0.0, Paint::solid(color).alpha(shown));

            if shown > 0.7 && p > 0.8 {
                let tp = stage(shown, 0.7, 0.3);
                s.fill_text(
                    &format!("{}", (value * 100.0).round()),
                    at + Vec2::new(cell / 2.0, cell / 2.0),
                    7.0 * tp,
                    Align::Center,
                    Paint::solid(Color::WHITE).alpha(tp),
                );
            }
        }
    }

    if p > 0.9 {
        let lp = stage(p, 0.9, 0.1);
        let y = o.y + h / 2.0 + 10.0;
        let text = Paint::solid(palette.text_muted).alpha(lp);
        s.fill_text("Activity", Vec2::new(o.x, y), 10.0 * lp, Align::Center, text);
        s.fill_rect(
            Rect::new(o.x - 30.0, y + 5.0, 60.0, 6.0),
            3.0,
            Paint::gradient(palette.primary, palette.tertiary).alpha(lp),
        );
        s.fill_text("Low", Vec2::new(o.x - 30.0, y + 20.0), 8.0 * lp, Align::Center, text);
        s.fill_text("High", Vec2::new(o.x + 30.0, y + 20.0), 8.0 * lp, Align::Center, text);
    }
}

fn draw_multi_file<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let h = 80.0 * p;
    let palette = style.palette;
    title(s, style, o, ChartKind::MultiFile, -h / 2.0 - 12.0, p);

    let file_w = 30.0 * p;
    let file_h = 40.0 * p;
    let colors = [
        palette.primary,
        palette.accents[0],
        palette.accents[1],
        palette.accents[3],
        palette.accents[4],
    ];

    for (i, color) in colors.into_iter().enumerate() {
        let fi = i as f32;
        let appear = 0.4 + fi * 0.15;
        if p < appear {
            continue;
        }
        let opacity = ((p - appear) / 0.15).min(1.0);
        let at = o + Vec2::new(-20.0 + fi * 10.0 * p, -20.0 + fi * 5.0 * p);

        s.fill_rect(
            Rect::new(at.x, at.y, file_w, file_h),
            5.0 * p,
            Paint::gradient(color, color.lighten(20.0)).alpha(0.8 * opacity),
        );

        if p > 0.6 {
            let lp = stage(p, 0.6, 0.2);
            for j in 0..3 {
                let y = at.y + 10.0 + j as f32 * 8.0 * p;
                s.stroke_line(
                    Vec2::new(at.x + 5.0, y),
                    Vec2::new(at.x + file_w - 10.0, y),
                    1.5 * lp,
                    Paint::solid(palette.text_muted).alpha(0.7 * lp),
                );
            }
        }

        if i > 0 && p > 0.7 {
            let cp = stage(p, 0.7, 0.3);
            s.stroke_line(
                at + Vec2::new(-10.0, file_h / 2.0),
                o + Vec2::new(-30.0 + fi * 10.0, -5.0 + fi * 5.0),
                2.0 * cp,
                Paint::solid(color).alpha(0.7 * cp).glow(style.blur(8.0 * cp)),
            );
        }
    }

    if p > 0.8 {
        let ap = stage(p, 0.8, 0.2);
        s.stroke_line(
            o + Vec2::new(-30.0, 15.0),
            o + Vec2::new(40.0, 15.0),
            2.0 * ap,
            Paint::gradient(palette.primary.with_alpha(0.0), palette.accents[4]).alpha(ap),
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_magnifier<S: Surface + ?Sized>(
    s: &mut S,
    style: &ChartStyle,
    center: Vec2,
    radius: f32,
    handle: f32,
    width: f32,
    color: Color,
    alpha: f32,
) {
    let paint = Paint::solid(color).alpha(alpha).glow(style.blur(10.0 * alpha));
    s.stroke_arc(center, radius, 0.0, TAU, width, paint);
    s.fill_circle(center, radius - 2.0 * alpha, Paint::gradient(Color::WHITE.with_alpha(0.1), Color::WHITE.with_alpha(0.05)));
    let angle = PI * 0.75;
    s.stroke_line(
        center + Vec2::from_angle(angle, radius),
        center + Vec2::from_angle(angle, radius + handle),
        width,
        paint,
    );
}

fn draw_single_file<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let h = 90.0 * p;
    let palette = style.palette;
    let sky = palette.accents[4];
    title(s, style, o, ChartKind::SingleFile, -h / 2.0 - 12.0, p);

    let file_w = 50.0 * p;
    let file_h = 65.0 * p;
    let file = Rect::centered(o, file_w, file_h);

    if p > 0.3 {
        let fp = stage(p, 0.3, 0.4);
        s.fill_rect(file, 8.0 * p, Paint::gradient(sky, sky.lighten(20.0)).alpha(fp));

        if style.glow && p > 0.5 {
            let bp = stage(p, 0.5, 0.5);
            stroke_rect(s, file, 2.0 * bp, Paint::solid(sky).alpha(0.8 * bp).glow(10.0 * bp));
        }

        if p > 0.5 {
            let lp = stage(p, 0.5, 0.3);
            for i in 0..6 {
                let y = file.y + 15.0 + i as f32 * 8.0 * p;
                let len = (file_w - 15.0) * if i % 3 == 0 { 0.6 } else { 0.8 };
                s.stroke_line(
                    Vec2::new(o.x - len / 2.0, y),
                    Vec2::new(o.x + len / 2.0, y),
                    1.5 * lp,
                    Paint::solid(palette.text_muted).alpha(lp),
                );
            }
        }
    }

    if p > 0.6 {
        let mp = stage(p, 0.6, 0.4);
        let lens = o + Vec2::new(15.0, 10.0);
        draw_magnifier(s, style, lens, 15.0 * mp, 20.0 * mp, 2.5 * mp, palette.primary, mp);

        if p > 0.8 {
            let fp = stage(p, 0.8, 0.2);
            let y = file.y + 25.0;
            s.fill_rect(
                Rect::new(file.x + 5.0, y - 3.0, file_w - 10.0, 8.0),
                3.0,
                Paint::solid(palette.primary).alpha(0.3 * fp),
            );
            s.fill_text(
                "Key data point",
                Vec2::new(o.x, y + 1.0),
                10.0 * fp,
                Align::Center,
                Paint::solid(palette.text).alpha(fp),
            );
            s.stroke_line(
                lens,
                Vec2::new(o.x + file_w / 4.0, y),
                fp,
                Paint::solid(palette.primary).alpha(0.5 * fp),
            );
        }
    }
}

const AI_LABELS: [&str; 4] = [
    "Pattern recognition",
    "Forecasting",
    "Anomaly detection",
    "Recommendations",
];

fn draw_ai_analysis<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let h = 80.0 * p;
    let palette = style.palette;
    let violet = palette.accents[1];
    title(s, style, o, ChartKind::AiAnalysis, -h / 2.0 - 14.0, p);

    if p > 0.3 {
        let bp = stage(p, 0.3, 0.5);
        let brain = 32.0 * bp;

        if style.glow {
            s.fill_circle(o, brain * 1.2, Paint::gradient(violet.with_alpha(0.3), Color::TRANSPARENT).alpha(bp));
        }
        s.fill_circle(o, brain, Paint::gradient(violet.lighten(20.0), violet).alpha(bp).glow(style.blur(15.0 * bp)));

        if p > 0.4 {
            let tp = stage(p, 0.4, 0.4);
            let inner = brain * 0.4;
            let outer = brain * 0.8;
            for i in 0..10 {
                let angle = i as f32 / 10.0 * TAU;
                let from = o + Vec2::from_angle(angle, inner);
                let to = o + Vec2::from_angle(angle + 0.4, outer);
                let control = o + Vec2::from_angle(angle + 0.25, (inner + outer) / 2.0);
                let paint = Paint::solid(Color::WHITE).alpha(0.6 * tp).glow(style.blur(3.0 * tp));
                s.stroke_quad(from, control, to, tp, paint);
                s.fill_circle(from.lerp(to, 0.5), 2.5 * tp, Paint::solid(Color::WHITE).alpha(0.8 * tp));
            }

            let core = brain * 0.35;
            s.fill_circle(
                o,
                core,
                Paint::gradient(Color::WHITE, palette.accents[2].lighten(30.0)).alpha(tp).glow(style.blur(10.0 * tp)),
            );
            let pulse = (style.time * 3.0).sin() * 2.0 + 2.0;
            s.stroke_arc(o, (core + pulse) * tp, 0.0, TAU, 1.0, Paint::solid(Color::WHITE).alpha(0.5 * tp));
        }
    }

    if p > 0.6 {
        let ap = stage(p, 0.6, 0.4);
        let rays = [palette.primary, palette.secondary, palette.accents[0], palette.accents[2]];
        for (i, (color, label)) in rays.into_iter().zip(AI_LABELS).enumerate() {
            let angle = i as f32 / 4.0 * TAU;
            let inner = 32.0 * p;
            let from = o + Vec2::from_angle(angle, inner);
            let to = o + Vec2::from_angle(angle, inner + 35.0 * ap);
            s.stroke_line(from, to, 2.0 * ap, Paint::solid(color).alpha(ap).glow(style.blur(6.0 * ap)));

            if p > 0.75 {
                let ip = stage(p, 0.75, 0.25);
                s.fill_circle(to, 7.0 * ip, Paint::solid(color).alpha(ip).glow(style.blur(8.0 * ip)));
                s.fill_circle(to, 4.0 * ip, Paint::solid(Color::WHITE).alpha(ip));

                let cos = angle.cos();
                let align = if cos > 0.1 {
                    Align::Left
                } else if cos < -0.1 {
                    Align::Right
                } else {
                    Align::Center
                };
                s.fill_text(
                    label,
                    to + Vec2::from_angle(angle, 12.0 * ip),
                    9.0 * ip,
                    align,
                    Paint::solid(palette.text).alpha(ip),
                );
            }
        }

        if p > 0.85 {
            let cp = stage(p, 0.85, 0.15);
            let pulse = 5.0 + (style.time * 4.0).sin() * 3.0;
            s.stroke_arc(o, (32.0 + pulse) * cp, 0.0, TAU, 2.0 * cp, Paint::solid(palette.secondary).alpha(0.6 * cp));
            s.fill_text("100%", o, 12.0 * cp, Align::Center, Paint::solid(Color::WHITE).alpha(cp));
        }
    }
}

const SALES: [f32; 6] = [15.0, 30.0, 25.0, 40.0, 35.0, 50.0];
const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

fn draw_sales_trend<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let w = 100.0 * p;
    let h = 80.0 * p;
    let palette = style.palette;
    let green = palette.secondary;
    title(s, style, o, ChartKind::SalesTrend, -h / 2.0 - 12.0, p);

    let base_y = o.y + h / 3.0;
    let left = o.x - w / 2.0;
    let step = w / 6.0;

    if p > 0.3 {
        let ap = stage(p, 0.3, 0.3);
        let axis = Paint::solid(palette.text_muted).alpha(ap);
        s.stroke_line(Vec2::new(left, base_y), Vec2::new(left + w * ap, base_y), 2.0 * ap, axis);
        s.stroke_line(Vec2::new(left, base_y), Vec2::new(left, base_y - h * 0.6 * ap), 2.0 * ap, axis);

        if p > 0.4 {
            let lp = stage(p, 0.4, 0.3);
            for (i, month) in MONTHS.iter().enumerate() {
                if i as f32 > ap * 6.0 {
                    break;
                }
                let x = left + i as f32 * step + step / 2.0;
                s.fill_text(month, Vec2::new(x, base_y + 5.0), 9.0 * lp, Align::Center, Paint::solid(palette.text_muted).alpha(lp));
                s.stroke_line(Vec2::new(x, base_y), Vec2::new(x, base_y + 3.0), 2.0 * ap, axis);
            }
        }
    }

    if p > 0.5 {
        let lp = stage(p, 0.5, 0.4);
        let chart_h = h * 0.6;
        let points: Vec<Vec2> = SALES
            .iter()
            .enumerate()
            .map(|(i, v)| Vec2::new(left + i as f32 * step + step / 2.0, base_y - v / 50.0 * chart_h))
            .collect();
        let limit = points[0].x + (points[5].x - points[0].x) * lp;

        polyline_until(s, &points, limit, 3.0 * p, Paint::solid(green).alpha(p).glow(style.blur(8.0 * p)));

        if lp > 0.5 {
            let pp = stage(lp, 0.5, 0.5);
            for pt in points.iter().filter(|pt| pt.x <= limit) {
                s.fill_circle(*pt, 5.0 * pp, Paint::solid(Color::WHITE).alpha(pp).glow(style.blur(6.0 * pp)));
                s.fill_circle(*pt, 3.0 * pp, Paint::solid(green).alpha(pp));
            }
        }

        if p > 0.8 {
            let vp = stage(p, 0.8, 0.2);
            for (pt, v) in points.iter().zip(SALES).filter(|(pt, _)| pt.x <= limit) {
                s.fill_text(&format!("{v}k"), *pt - Vec2::new(0.0, 8.0), 8.0 * vp, Align::Center, Paint::solid(palette.text).alpha(vp));
            }
        }
    }

    if p > 0.85 {
        let ip = stage(p, 0.85, 0.15);
        let at = o + Vec2::new(w / 3.0, -h / 3.0);
        s.fill_rect(Rect::centered(at, 36.0 * ip, 16.0 * ip), 8.0 * ip, Paint::solid(green).alpha(ip).glow(style.blur(8.0 * ip)));
        s.fill_text("+24%", at, 10.0 * ip, Align::Center, Paint::solid(Color::WHITE).alpha(ip));
    }
}

fn draw_data_detective<S: Surface + ?Sized>(s: &mut S, style: &ChartStyle, o: Vec2, p: f32) {
    let w = 100.0 * p;
    let h = 80.0 * p;
    let palette = style.palette;
    title(s, style, o, ChartKind::DataDetective, -h / 2.0 - 12.0, p);

    let nodes = [
        (Vec2::new(0.0, 0.0), 15.0, palette.accents[0]),
        (Vec2::new(-25.0, -20.0), 10.0, palette.primary),
        (Vec2::new(25.0, -15.0), 8.0, palette.accents[3]),
        (Vec2::new(-20.0, 20.0), 12.0, palette.accents[1]),
        (Vec2::new(30.0, 25.0), 9.0, palette.accents[4]),
    ];
    const LINKS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (0, 4), (1, 3), (2, 4)];

    if p > 0.3 {
        let dp = stage(p, 0.3, 0.4);
        for (a, b) in LINKS {
            s.stroke_line(o + nodes[a].0, o + nodes[b].0, 1.5 * dp, Paint::solid(palette.grid).alpha(0.7 * dp));
        }
        for (offset, radius, color) in nodes {
            s.fill_circle(
                o + offset,
                radius * dp,
                Paint::gradient(color.lighten(20.0), color).alpha(dp).glow(style.blur(8.0 * dp)),
            );
        }
    }

    if p > 0.5 {
        let mp = stage(p, 0.5, 0.4);
        let wander = Vec2::new(style.time.sin() * 15.0, (style.time * 0.7).cos() * 10.0);
        let lens = o + wander;
        let lens_radius = 25.0 * mp;

        // Nodes under the lens, magnified.
        for (offset, radius, color) in nodes {
            let magnified = lens + (o + offset - lens) * 1.5;
            if magnified.distance(lens) + radius * 1.5 * mp <= lens_radius {
                s.fill_circle(magnified, radius * 1.5 * mp, Paint::solid(color.lighten(30.0)).alpha(mp));
                if radius > 10.0 && p > 0.7 {
                    s.fill_text("!", magnified, 12.0 * mp, Align::Center, Paint::solid(Color::WHITE).alpha(mp));
                }
            }
        }
        draw_magnifier(s, style, lens, lens_radius, 30.0 * mp, 3.0 * mp, palette.tertiary, mp);
    }

    if p > 0.7 {
        let sp = stage(p, 0.7, 0.3);
        let sweep = (style.time % 1.5) / 1.5;
        let y = o.y - 30.0 + 60.0 * sweep;
        s.stroke_line(
            Vec2::new(o.x - w / 2.0, y),
            Vec2::new(o.x + w / 2.0, y),
            1.5 * sp,
            Paint::gradient(palette.tertiary.with_alpha(0.0), palette.tertiary).alpha(0.7 * sp),
        );

        if p > 0.85 {
            let rp = stage(p, 0.85, 0.15);
            s.fill_rect(
                Rect::new(o.x - 40.0, o.y - h / 2.0 + 15.0, 80.0, 20.0),
                10.0,
                Paint::solid(palette.tertiary).alpha(rp).glow(style.blur(10.0 * rp)),
            );
            s.fill_text(
                "Anomaly found!",
                Vec2::new(o.x, o.y - h / 2.0 + 25.0),
                11.0 * rp,
                Align::Center,
                Paint::solid(Color::WHITE).alpha(rp),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::draw::{DrawCmd, DrawList};
    use crate::login::palette::Theme;

    fn render(kind: ChartKind, progress: f32) -> DrawList {
        let palette = Palette::for_theme(Theme::Dark);
        let style = ChartStyle {
            palette: &palette,
            glow: true,
            time: 1.25,
        };
        let slot = ChartSlot {
            kind,
            pos: Vec2::new(200.0, 200.0),
        };
        let mut list = DrawList::new(400.0, 400.0);
        list.clear();
        draw_chart(&mut list, &style, &slot, progress);
        list
    }

    const ALL: [ChartKind; 10] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Gauge,
        ChartKind::Heatmap,
        ChartKind::MultiFile,
        ChartKind::SingleFile,
        ChartKind::AiAnalysis,
        ChartKind::SalesTrend,
        ChartKind::DataDetective,
    ];

    #[test]
    fn type_strings() {
        assert_eq!(ChartKind::MultiFile.to_string(), "multiFile");
        assert_eq!(ChartKind::DataDetective.as_str(), "dataDetective");
    }

    #[test]
    fn only_basic_charts_have_outlines() {
        let outlined: Vec<_> = ALL.into_iter().filter(|k| k.has_outline()).collect();
        assert_eq!(outlined, vec![ChartKind::Bar, ChartKind::Line, ChartKind::Pie]);
    }

    #[test]
    fn every_chart_draws_when_complete() {
        for kind in ALL {
            let list = render(kind, 1.0);
            assert!(list.commands.len() > 3, "{kind} drew {} commands", list.commands.len());
            assert!(list.texts().any(|t| t == kind.title()), "{kind} has no title");
        }
    }

    #[test]
    fn nothing_visible_at_zero_progress() {
        for kind in ALL {
            let list = render(kind, 0.0);
            let visible = list.count(|cmd| match cmd {
                DrawCmd::Clear => false,
                DrawCmd::Circle { radius, .. } => *radius > 0.0,
                _ => true,
            });
            assert_eq!(visible, 0, "{kind} drew at progress 0: {:?}", list.commands);
        }
    }

    #[test]
    fn titles_appear_late() {
        let list = render(ChartKind::Bar, 0.5);
        assert!(list.texts().next().is_none());
    }

    #[test]
    fn layouts_by_quality() {
        let viewport = Vec2::new(1000.0, 800.0);
        let high = chart_layout(viewport, &Quality::for_viewport(viewport, true));
        assert_eq!(high.len(), 5);
        assert_eq!(high[0].kind, ChartKind::MultiFile);
        assert!(high[0].pos.distance(Vec2::new(250.0, 280.0)) < 1e-3);

        let low = chart_layout(viewport, &Quality::for_viewport(viewport, false));
        let kinds: Vec<_> = low.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Pie]);
    }

    #[test]
    fn heat_values_stay_in_range() {
        for row in 0..4 {
            for col in 0..5 {
                assert!((0.0..=1.0).contains(&heat(row, col)));
            }
        }
    }
}
