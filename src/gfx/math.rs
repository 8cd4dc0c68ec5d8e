#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f32, length: f32) -> Self {
        Self::new(angle.cos() * length, angle.sin() * length)
    }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rect of the given size centred on `center`.
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }
}

/// Straight-alpha RGBA color, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Scales every channel by `(100 + percent) / 100` on the 0..255 scale.
    pub fn lighten(self, percent: f32) -> Self {
        self.scale_channels((100.0 + percent) / 100.0)
    }

    fn scale_channels(self, factor: f32) -> Self {
        let scale = |c: f32| ((c * 255.0).round() * factor).floor().clamp(0.0, 255.0) / 255.0;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(c: Color) -> [u8; 4] {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(c.r), byte(c.g), byte(c.b), byte(c.a)]
    }

    #[test]
    fn byte_constructors() {
        assert_eq!(bytes(Color::rgb(0, 113, 227)), [0, 113, 227, 255]);
        assert_eq!(bytes(Color::rgba(245, 245, 247, 230)), [245, 245, 247, 230]);
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(0.5).a, 0.5);
    }

    #[test]
    fn lighten_saturates_at_white() {
        let c = Color::rgb(0x4c, 0x75, 0xe6).lighten(20.0);
        // 76*1.2 = 91.2, 117*1.2 = 140.4, 230*1.2 = 276 -> 255
        assert_eq!(bytes(c), [91, 140, 255, 255]);
    }

    #[test]
    fn vec_helpers() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.5), Vec2::new(5.0, 10.0));
        assert!((Vec2::new(3.0, 4.0).distance(a) - 5.0).abs() < 1e-6);
        assert_eq!(Rect::centered(b, 4.0, 6.0), Rect::new(8.0, 17.0, 4.0, 6.0));
    }
}
