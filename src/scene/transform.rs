use crystal::prelude::*;

/// Placement of an object in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quaternion,
    pub scale: Vec3,
}

/// Why a transform cannot be inverted or yields a skewed model matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    NonUnitRotation,
    ZeroScale,
}

impl Transform {
    const UNIT_MARGIN: f64 = 1e-6;

    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Model matrix scaling first, then rotating, then translating.
    pub fn to_model_matrix(&self) -> Mat4 {
        Mat4::IDENTITY
            * self.translation.to_translation_matrix()
            * self.rotation.to_rotation_matrix()
            * self.scale.to_scale_matrix()
    }

    /// `None` if the model matrix has no inverse.
    pub fn to_inverse_model_matrix(&self) -> Option<Mat4> {
        self.to_model_matrix().try_inverse()
    }

    pub fn degeneracy(&self) -> Option<Degeneracy> {
        if !self.rotation.is_normalized(Self::UNIT_MARGIN) {
            Some(Degeneracy::NonUnitRotation)
        } else if self.scale.x == 0.0 || self.scale.y == 0.0 || self.scale.z == 0.0 {
            Some(Degeneracy::ZeroScale)
        } else {
            None
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
