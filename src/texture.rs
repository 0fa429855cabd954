use crystal::prelude::*;

use crate::color::Color;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("A {width}x{height} texture needs {expected} colors, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Coordinate ({x}, {y}) is outside of the {width}x{height} texture")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// A decoded texture as handed to the renderer.
///
/// Colors are stored row by row; every row is `width` long and there are
/// `height` rows, so `colors.len() == width * height` at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    colors: Vec<Color>,
}

impl Texture {
    /// Creates a fully transparent texture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            colors: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn from_colors(width: u32, height: u32, colors: Vec<Color>) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize;
        if colors.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: colors.len(),
            });
        }

        Ok(Self {
            width,
            height,
            colors,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the color at a texel coordinate; fractional parts are dropped.
    pub fn get_color(&self, coord: Vec2) -> Option<&Color> {
        if !(coord.x >= 0.0 && coord.y >= 0.0) {
            return None;
        }
        self.get_color_at(coord.x as u32, coord.y as u32)
    }

    pub fn get_color_at(&self, x: u32, y: u32) -> Option<&Color> {
        self.index(x, y).map(|idx| &self.colors[idx])
    }

    pub fn set_color(&mut self, x: u32, y: u32, color: Color) -> Result<(), TextureError> {
        let idx = self.index(x, y).ok_or(TextureError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.colors[idx] = color;
        Ok(())
    }

    /// RGBA8 bytes, row by row.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|color| color.to_bytes()).collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(x as usize + self.width as usize * y as usize)
        } else {
            None
        }
    }
}
