use crystal::prelude::*;

/// A normalized RGBA color, every channel in `0.0..=1.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    const CLAMP_MAX: f64 = u8::MAX as f64;

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// For channels between 0-255; the alpha channel is already normalized (0-1).
    pub fn from_rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: f64::from(r) / Color::CLAMP_MAX,
            g: f64::from(g) / Color::CLAMP_MAX,
            b: f64::from(b) / Color::CLAMP_MAX,
            a,
        }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Reads `0xRRGGBBAA`.
    pub fn from_u32(value: u32) -> Self {
        let [r, g, b, a] = value.to_be_bytes();
        Self::from_rgba(r, g, b, f64::from(a) / Color::CLAMP_MAX)
    }

    /// Returns the channels scaled to 0-255, alpha included.
    pub fn to_bytes(&self) -> [u8; 4] {
        let scale = |channel: f64| (channel.clamp(0.0, 1.0) * Color::CLAMP_MAX).round() as u8;
        [scale(self.r), scale(self.g), scale(self.b), scale(self.a)]
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

impl From<Vec4> for Color {
    fn from(value: Vec4) -> Self {
        Self::new(value.x, value.y, value.z, value.w)
    }
}

impl From<Vec3> for Color {
    fn from(value: Vec3) -> Self {
        Self::new(value.x, value.y, value.z, 1.0)
    }
}
