use serde::{
    de::{Error, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::mat4::Mat4;

const MAT4_LEN: usize = 16;

// A matrix is written as a flat sequence in column-major order, the same
// layout that is uploaded to the GPU.
impl Serialize for Mat4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(MAT4_LEN))?;
        for element in self.to_cols_array().iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Mat4 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(Mat4Visitor)
    }
}

struct Mat4Visitor;

impl<'de> Visitor<'de> for Mat4Visitor {
    type Value = Mat4;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a 4x4 matrix as 16 column-major elements")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        if let Some(size_hint) = seq.size_hint() {
            if size_hint != MAT4_LEN {
                return Err(A::Error::custom(format!(
                    "invalid size for matrix (expected: {}, got: {})",
                    MAT4_LEN, size_hint
                )));
            }
        }

        let mut data = [0.0; MAT4_LEN];
        for (idx, element) in data.iter_mut().enumerate() {
            *element = seq.next_element()?.ok_or_else(|| {
                A::Error::custom(format!(
                    "invalid size for matrix (expected: {}, got: {})",
                    MAT4_LEN, idx
                ))
            })?;
        }

        Ok(Mat4::from_cols_array(data))
    }
}
