use std::rc::Rc;

use crystal::prelude::*;

use crate::color::Color;
use crate::scene::model::mesh::{AttributeFormat, MeshError, Vertex, VertexAttribute};
use crate::scene::transform::Transform;
use crate::texture::Texture;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MaterialError {
    #[error("Material {material} cannot use vertex: {source}")]
    UnsupportedVertex {
        material: &'static str,
        source: MeshError,
    },
}

/// Value bound to a named shader uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum Uniform {
    Color(Color),
    Matrix(Mat4),
    Texture(Rc<Texture>),
}

/// Everything a shader needs to draw one vertex: the attributes in layout
/// order and the uniforms of the material.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderState<'a> {
    pub attributes: Vec<&'a VertexAttribute>,
    pub uniforms: Vec<(&'static str, Uniform)>,
}

pub trait Material {
    fn name(&self) -> &'static str;

    /// Vertex attribute layout of the shader, position excluded.
    fn layout(&self) -> &[AttributeFormat];

    fn uniforms(&self) -> Vec<(&'static str, Uniform)>;

    fn use_attributes<'a>(&self, vertex: &'a Vertex) -> Result<ShaderState<'a>, MaterialError> {
        let attributes = vertex
            .supply(self.layout())
            .map_err(|source| MaterialError::UnsupportedVertex {
                material: self.name(),
                source,
            })?;

        Ok(ShaderState {
            attributes,
            uniforms: self.uniforms(),
        })
    }
}

const NO_ATTRIBUTES: &[AttributeFormat] = &[];
const UV_ATTRIBUTES: &[AttributeFormat] = &[AttributeFormat::Float2];

fn color_and_mvp(color: Color, mvp: Mat4, texture: &Option<Rc<Texture>>) -> Vec<(&'static str, Uniform)> {
    let mut uniforms = vec![("color", Uniform::Color(color)), ("mvp", Uniform::Matrix(mvp))];
    if let Some(texture) = texture {
        uniforms.push(("texture", Uniform::Texture(texture.clone())));
    }
    uniforms
}

/// Colored, optionally textured 3D material. The default.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    pub texture: Option<Rc<Texture>>,
    pub mvp: Mat4,
}

impl BasicMaterial {
    pub fn new(color: Color, texture: Option<Rc<Texture>>, model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            color,
            texture,
            mvp: projection * view * model,
        }
    }

    pub fn from_transform(
        color: Color,
        texture: Option<Rc<Texture>>,
        transform: &Transform,
        view: Mat4,
        projection: Mat4,
    ) -> Self {
        Self::new(color, texture, transform.to_model_matrix(), view, projection)
    }
}

impl Material for BasicMaterial {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn layout(&self) -> &[AttributeFormat] {
        // texture sampling needs coordinates
        if self.texture.is_some() {
            UV_ATTRIBUTES
        } else {
            NO_ATTRIBUTES
        }
    }

    fn uniforms(&self) -> Vec<(&'static str, Uniform)> {
        color_and_mvp(self.color, self.mvp, &self.texture)
    }
}

/// Flat on screen material for UI. Uses an orthographic projection and no view.
#[derive(Debug, Clone, PartialEq)]
pub struct Basic2DMaterial {
    pub color: Color,
    pub mvp: Mat4,
}

impl Basic2DMaterial {
    pub fn new(color: Color, model: Mat4, width: f64, height: f64) -> Self {
        let projection = Mat4::from_orthographic(0.0, width, 0.0, height, 0.0, 1.0);
        Self {
            color,
            mvp: projection * model,
        }
    }
}

impl Material for Basic2DMaterial {
    fn name(&self) -> &'static str {
        "basic_2d"
    }

    fn layout(&self) -> &[AttributeFormat] {
        NO_ATTRIBUTES
    }

    fn uniforms(&self) -> Vec<(&'static str, Uniform)> {
        color_and_mvp(self.color, self.mvp, &None)
    }
}

/// Draws glyphs from a font atlas in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Text2DMaterial {
    pub color: Color,
    pub font: Rc<Texture>,
    pub mvp: Mat4,
}

impl Text2DMaterial {
    pub fn new(color: Color, font: Rc<Texture>, model: Mat4, width: f64, height: f64) -> Self {
        let projection = Mat4::from_orthographic(0.0, width, 0.0, height, 0.0, 1.0);
        Self {
            color,
            font,
            mvp: projection * model,
        }
    }
}

impl Material for Text2DMaterial {
    fn name(&self) -> &'static str {
        "text_2d"
    }

    fn layout(&self) -> &[AttributeFormat] {
        UV_ATTRIBUTES
    }

    fn uniforms(&self) -> Vec<(&'static str, Uniform)> {
        color_and_mvp(self.color, self.mvp, &Some(self.font.clone()))
    }
}

/// Always faces the camera: the rotation of view and model is dropped, only
/// position and scale are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardMaterial {
    pub color: Color,
    pub texture: Option<Rc<Texture>>,
    pub mvp: Mat4,
}

impl BillboardMaterial {
    pub fn new(
        color: Color,
        texture: Option<Rc<Texture>>,
        transform: &Transform,
        view: Mat4,
        projection: Mat4,
    ) -> Self {
        let mut model_view = view * transform.translation.to_translation_matrix();
        let scale = transform.scale;
        model_view.m00 = scale.x;
        model_view.m10 = 0.0;
        model_view.m20 = 0.0;
        model_view.m01 = 0.0;
        model_view.m11 = scale.y;
        model_view.m21 = 0.0;
        model_view.m02 = 0.0;
        model_view.m12 = 0.0;
        model_view.m22 = scale.z;

        Self {
            color,
            texture,
            mvp: projection * model_view,
        }
    }
}

impl Material for BillboardMaterial {
    fn name(&self) -> &'static str {
        "billboard"
    }

    fn layout(&self) -> &[AttributeFormat] {
        if self.texture.is_some() {
            UV_ATTRIBUTES
        } else {
            NO_ATTRIBUTES
        }
    }

    fn uniforms(&self) -> Vec<(&'static str, Uniform)> {
        color_and_mvp(self.color, self.mvp, &self.texture)
    }
}
