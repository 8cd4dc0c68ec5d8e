use super::math::{Color, Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Two-stop gradient. Linear along the shape's main axis, radial for
    /// circles and sectors (inner color first).
    Gradient(Color, Color),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Fill,
    pub alpha: f32,
    /// Shadow blur radius in pixels, 0 for none.
    pub glow: f32,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            fill: Fill::Solid(color),
            alpha: 1.0,
            glow: 0.0,
        }
    }

    pub fn gradient(from: Color, to: Color) -> Self {
        Self {
            fill: Fill::Gradient(from, to),
            alpha: 1.0,
            glow: 0.0,
        }
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn glow(mut self, blur: f32) -> Self {
        self.glow = blur.max(0.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Draw primitives the animation needs. Coordinates are logical pixels with
/// the origin in the top-left corner; angles are radians, clockwise.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    /// Opacity of the whole surface, applied on top of every paint.
    fn set_opacity(&mut self, opacity: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint);
    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, width: f32, paint: Paint);
    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, paint: Paint);
    fn fill_rect(&mut self, rect: Rect, corner_radius: f32, paint: Paint);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint);
    fn stroke_quad(&mut self, from: Vec2, control: Vec2, to: Vec2, width: f32, paint: Paint);
    fn fill_text(&mut self, text: &str, at: Vec2, size: f32, align: Align, paint: Paint);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear,
    Opacity(f32),
    Circle { center: Vec2, radius: f32, paint: Paint },
    Arc { center: Vec2, radius: f32, start: f32, end: f32, width: f32, paint: Paint },
    Sector { center: Vec2, radius: f32, start: f32, end: f32, paint: Paint },
    Rect { rect: Rect, corner_radius: f32, paint: Paint },
    Line { from: Vec2, to: Vec2, width: f32, paint: Paint },
    Quad { from: Vec2, control: Vec2, to: Vec2, width: f32, paint: Paint },
    Text { text: String, at: Vec2, size: f32, align: Align, paint: Paint },
}

/// Headless surface that records the commands of the current frame.
///
/// `clear` drops the previous frame, so after a tick `commands` holds exactly
/// what that tick drew.
#[derive(Debug, Clone)]
pub struct DrawList {
    viewport: Vec2,
    pub opacity: f32,
    pub commands: Vec<DrawCmd>,
    pub frames: u64,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            opacity: 1.0,
            commands: Vec::with_capacity(1024),
            frames: 0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }
}

#[cfg(test)]
impl DrawList {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.viewport
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear);
        self.frames += 1;
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.commands.push(DrawCmd::Opacity(self.opacity));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
        if radius <= 0.0 {
            return;
        }
        self.commands.push(DrawCmd::Circle { center, radius, paint });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, width: f32, paint: Paint) {
        if radius <= 0.0 || width <= 0.0 {
            return;
        }
        self.commands.push(DrawCmd::Arc { center, radius, start, end, width, paint });
    }

    fn fill_sector(&mut self, center: Vec2, radius: f32, start: f32, end: f32, paint: Paint) {
        if radius <= 0.0 {
            return;
        }
        self.commands.push(DrawCmd::Sector { center, radius, start, end, paint });
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: f32, paint: Paint) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        self.commands.push(DrawCmd::Rect { rect, corner_radius, paint });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint) {
        if width <= 0.0 {
            return;
        }
        self.commands.push(DrawCmd::Line { from, to, width, paint });
    }

    fn stroke_quad(&mut self, from: Vec2, control: Vec2, to: Vec2, width: f32, paint: Paint) {
        if width <= 0.0 {
            return;
        }
        self.commands.push(DrawCmd::Quad { from, control, to, width, paint });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, size: f32, align: Align, paint: Paint) {
        if size <= 0.0 || text.is_empty() {
            return;
        }
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            at,
            size,
            align,
            paint,
        });
    }
}
