//! Value types for 2D/3D space: vectors, quaternions and 4x4 matrices.
//!
//! All types are `Copy` and every operation returns a new value. Matrices use
//! the column-vector convention (`v' = M * v`) with the translation stored in
//! the last column.

mod mat4;
mod norm;
mod quaternion;
mod vector;

#[cfg(feature = "serde-serialize")]
mod serde;

#[cfg(test)]
mod test_util;

pub mod prelude {
    pub use crate::mat4::{ClipPlanes, Mat4};
    pub use crate::norm::Normed;
    pub use crate::quaternion::Quaternion;
    pub use crate::vector::{Vec2, Vec3, Vec4};
}
