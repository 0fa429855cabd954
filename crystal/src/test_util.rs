use crate::{mat4::Mat4, vector::Vec3, vector::Vec4};

#[derive(Debug, Clone)]
pub struct MatrixCmp {
    error_margin: f64,
}

impl MatrixCmp {
    pub const DEFAULT: Self = Self { error_margin: 1e-9 };

    pub fn eq_margin(&self, mat_one: &Mat4, mat_two: &Mat4, error_margin: f64) {
        let (one, two) = (mat_one.to_cols_array(), mat_two.to_cols_array());

        for col_idx in 0..4 {
            for row_idx in 0..4 {
                let (v1, v2) = (one[col_idx * 4 + row_idx], two[col_idx * 4 + row_idx]);
                let diff_abs = (v1 - v2).abs();

                assert!(
                    diff_abs <= error_margin,
                    "is: {:?} should: {:?} (+- {:?}) @ ({}, {})",
                    v1,
                    v2,
                    error_margin,
                    row_idx,
                    col_idx
                );
            }
        }
    }

    pub fn eq(&self, mat_one: &Mat4, mat_two: &Mat4) {
        self.eq_margin(mat_one, mat_two, self.error_margin)
    }

    pub fn eq_vec4(&self, one: &Vec4, two: &Vec4) {
        for (idx, (v1, v2)) in one.to_array().iter().zip(two.to_array().iter()).enumerate() {
            assert!(
                (v1 - v2).abs() <= self.error_margin,
                "is: {:?} should: {:?} (+- {:?}) @ {}",
                one,
                two,
                self.error_margin,
                idx
            );
        }
    }

    pub fn eq_vec3(&self, one: &Vec3, two: &Vec3) {
        self.eq_vec4(&one.extend(0.0), &two.extend(0.0))
    }
}

impl Default for MatrixCmp {
    fn default() -> Self {
        Self::DEFAULT
    }
}
