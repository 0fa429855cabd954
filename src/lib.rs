pub mod assets;
pub mod color;
pub mod scene;
pub mod texture;

pub mod prelude {
    pub use crystal::prelude::*;

    pub use crate::assets::obj::{self, AttributeMode, ObjError, ObjOptions};
    pub use crate::color::Color;
    pub use crate::scene::material::{
        Basic2DMaterial, BasicMaterial, BillboardMaterial, Material, MaterialError, Text2DMaterial,
    };
    pub use crate::scene::model::mesh::{
        AttributeFormat, Face, FaceList, Mesh, MeshError, Vertex, VertexAttribute,
    };
    pub use crate::scene::model::{InstancedModel, Model};
    pub use crate::scene::transform::{Degeneracy, Transform};
    pub use crate::scene::Scene;
    pub use crate::texture::{Texture, TextureError};
}
