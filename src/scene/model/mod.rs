use std::rc::Rc;

use crystal::prelude::*;

use self::mesh::{Mesh, MeshError};

use super::{
    material::{Material, MaterialError, ShaderState},
    transform::Transform,
};

pub mod mesh;

/// An object owning its mesh outright.
pub struct Model {
    pub mesh: Mesh,
    pub material: Rc<dyn Material>,
    pub transform: Transform,
}

impl Model {
    pub fn new(mesh: Mesh, material: Rc<dyn Material>, transform: Transform) -> Self {
        Self {
            mesh,
            material,
            transform,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_model_matrix()
    }

    pub fn vertex_buffer(&self) -> Result<Vec<u8>, MeshError> {
        self.mesh.vertex_buffer(self.material.layout())
    }

    pub fn shader_states(&self) -> Result<Vec<ShaderState<'_>>, MaterialError> {
        shader_states(&self.mesh, self.material.as_ref())
    }
}

/// One placement of a mesh shared with other instances.
///
/// The mesh is only copied when an instance asks to change it.
#[derive(Clone)]
pub struct InstancedModel {
    mesh: Rc<Mesh>,
    pub material: Rc<dyn Material>,
    pub transform: Transform,
}

impl InstancedModel {
    pub fn new(mesh: Rc<Mesh>, material: Rc<dyn Material>, transform: Transform) -> Self {
        Self {
            mesh,
            material,
            transform,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn shared_mesh(&self) -> Rc<Mesh> {
        self.mesh.clone()
    }

    /// Mutable access, detaching this instance from the shared mesh first if needed.
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        Rc::make_mut(&mut self.mesh)
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_model_matrix()
    }

    pub fn vertex_buffer(&self) -> Result<Vec<u8>, MeshError> {
        self.mesh.vertex_buffer(self.material.layout())
    }

    pub fn shader_states(&self) -> Result<Vec<ShaderState<'_>>, MaterialError> {
        shader_states(&self.mesh, self.material.as_ref())
    }
}

fn shader_states<'a>(mesh: &'a Mesh, material: &dyn Material) -> Result<Vec<ShaderState<'a>>, MaterialError> {
    mesh.vertices()
        .iter()
        .map(|vertex| material.use_attributes(vertex))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::mesh::{Face, FaceList, Vertex};
    use super::*;
    use crate::color::Color;
    use crate::scene::material::BasicMaterial;

    fn triangle() -> Mesh {
        let mut faces = FaceList::new();
        let a = faces.push_vertex(Vertex::new(Vec3::new(0.0, 0.0, 0.0)));
        let b = faces.push_vertex(Vertex::new(Vec3::new(1.0, 0.0, 0.0)));
        let c = faces.push_vertex(Vertex::new(Vec3::new(0.0, 1.0, 0.0)));
        faces.push_face(Face::new(a, b, c)).unwrap();
        Mesh::from_faces(&faces).unwrap()
    }

    fn material() -> Rc<dyn Material> {
        Rc::new(BasicMaterial::new(
            Color::WHITE,
            None,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
        ))
    }

    #[test]
    fn model_buffers() {
        let model = Model::new(triangle(), material(), Transform::default());

        // three positions of three f32 each
        assert_eq!(model.vertex_buffer().unwrap().len(), 36);
        assert_eq!(model.shader_states().unwrap().len(), 3);
        assert_eq!(model.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn instances_share_until_mutated() {
        let mesh = Rc::new(triangle());
        let first = InstancedModel::new(mesh.clone(), material(), Transform::default());
        let mut second = InstancedModel::new(
            mesh.clone(),
            material(),
            Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
        );

        assert!(Rc::ptr_eq(&first.shared_mesh(), &second.shared_mesh()));

        second.mesh_mut().map_vertices(|vertex| vertex.position.z = 1.0).unwrap();

        assert!(!Rc::ptr_eq(&first.shared_mesh(), &second.shared_mesh()));
        assert_eq!(first.mesh(), mesh.as_ref());
        assert_eq!(second.mesh().vertices()[0].position, Vec3::new(0.0, 0.0, 1.0));
    }
}
