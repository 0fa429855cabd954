use std::ops::{Add, Mul, Neg, Sub};

use crate::{mat4::Mat4, norm::Normed};

/// A structure with 2 components (used for 2D space and texture coordinates).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// A structure with 3 components (used for 3D space).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A structure with 4 components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

// Equality is the derived exact comparison of every component. Vertex
// deduplication relies on this, so no epsilon may be introduced here.
macro_rules! impl_vec {
    ( $( $vec:ident [$len:literal] { $( $field:ident ),+ } )+ ) => {
        $(
            impl $vec {
                pub const ZERO: Self = Self { $( $field: 0.0 ),+ };
                pub const ONE: Self = Self { $( $field: 1.0 ),+ };

                pub fn dot(&self, rhs: &Self) -> f64 {
                    0.0 $( + self.$field * rhs.$field )+
                }

                pub fn to_array(self) -> [f64; $len] {
                    [$( self.$field ),+]
                }

                pub fn to_f32_array(self) -> [f32; $len] {
                    [$( self.$field as f32 ),+]
                }
            }

            impl Add<f64> for $vec {
                type Output = Self;

                fn add(self, rhs: f64) -> Self::Output {
                    Self { $( $field: self.$field + rhs ),+ }
                }
            }

            impl Sub<f64> for $vec {
                type Output = Self;

                fn sub(self, rhs: f64) -> Self::Output {
                    Self { $( $field: self.$field - rhs ),+ }
                }
            }

            impl Mul<f64> for $vec {
                type Output = Self;

                fn mul(self, rhs: f64) -> Self::Output {
                    Self { $( $field: self.$field * rhs ),+ }
                }
            }

            /// Component-wise product.
            impl Mul<$vec> for $vec {
                type Output = Self;

                fn mul(self, rhs: $vec) -> Self::Output {
                    Self { $( $field: self.$field * rhs.$field ),+ }
                }
            }

            impl Add<$vec> for $vec {
                type Output = Self;

                fn add(self, rhs: $vec) -> Self::Output {
                    Self { $( $field: self.$field + rhs.$field ),+ }
                }
            }

            impl Sub<$vec> for $vec {
                type Output = Self;

                fn sub(self, rhs: $vec) -> Self::Output {
                    Self { $( $field: self.$field - rhs.$field ),+ }
                }
            }

            impl Neg for $vec {
                type Output = Self;

                fn neg(self) -> Self::Output {
                    Self { $( $field: -self.$field ),+ }
                }
            }

            impl Normed for $vec {
                fn norm_squared(&self) -> f64 {
                    self.dot(self)
                }

                fn scale_mut(&mut self, n: f64) {
                    $( self.$field *= n; )+
                }

                fn unscale_mut(&mut self, n: f64) {
                    $( self.$field /= n; )+
                }
            }

            impl From<[f64; $len]> for $vec {
                fn from(data: [f64; $len]) -> Self {
                    let [$( $field ),+] = data;
                    Self { $( $field ),+ }
                }
            }

            impl From<$vec> for [f64; $len] {
                fn from(value: $vec) -> Self {
                    value.to_array()
                }
            }
        )+
    };
}

impl_vec! {
    Vec2 [2] { x, y }
    Vec3 [3] { x, y, z }
    Vec4 [4] { x, y, z, w }
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Vec3 {
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn cross(&self, rhs: &Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub const fn extend(self, w: f64) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    /// Creates a 4x4 scale matrix: the identity with `x, y, z` on the diagonal.
    pub fn to_scale_matrix(self) -> Mat4 {
        Mat4 {
            m00: self.x,
            m11: self.y,
            m22: self.z,
            ..Mat4::IDENTITY
        }
    }

    /// Creates a 4x4 translation matrix: the identity with `x, y, z` in the last column.
    pub fn to_translation_matrix(self) -> Mat4 {
        Mat4 {
            m03: self.x,
            m13: self.y,
            m23: self.z,
            ..Mat4::IDENTITY
        }
    }
}

impl Vec4 {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub const fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}
