use std::collections::{BTreeMap, HashMap};

use crystal::prelude::*;

use crate::color::Color;

/// Name under which parsers store the vertex normal.
pub const NORMAL: &str = "normal";
/// Name under which parsers store the texture coordinate.
pub const UV: &str = "uv";
/// Name under which parsers store the vertex color.
pub const COLOR: &str = "color";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    #[error("Vertex does not supply an attribute of format {0:?}")]
    InsufficientAttributes(AttributeFormat),
    #[error("Index {index} is out of range for {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Index list of length {0} does not describe whole triangles")]
    IncompleteTriangle(usize),
    #[error("Vertex {second} is equal to vertex {first}")]
    DuplicateVertex { first: usize, second: usize },
    #[error("Mesh has more vertices than a 32 bit index can address")]
    TooManyVertices,
}

/// Shader side format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeFormat {
    Float2,
    Float3,
    Float4,
}

impl AttributeFormat {
    pub fn components(self) -> usize {
        match self {
            AttributeFormat::Float2 => 2,
            AttributeFormat::Float3 => 3,
            AttributeFormat::Float4 => 4,
        }
    }

    /// Size in bytes once packed into a vertex buffer.
    pub fn size(self) -> usize {
        self.components() * std::mem::size_of::<f32>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexAttribute {
    Color(Color),
    Normal(Vec3),
    Uv(Vec2),
}

impl VertexAttribute {
    pub fn format(&self) -> AttributeFormat {
        match self {
            VertexAttribute::Color(_) => AttributeFormat::Float4,
            VertexAttribute::Normal(_) => AttributeFormat::Float3,
            VertexAttribute::Uv(_) => AttributeFormat::Float2,
        }
    }

    /// The payload padded to four components; only the first
    /// `format().components()` are meaningful.
    fn components(&self) -> [f64; 4] {
        match *self {
            VertexAttribute::Color(c) => [c.r, c.g, c.b, c.a],
            VertexAttribute::Normal(n) => [n.x, n.y, n.z, 0.0],
            VertexAttribute::Uv(uv) => [uv.x, uv.y, 0.0, 0.0],
        }
    }

    fn write_f32(&self, out: &mut Vec<u8>) {
        let components = self.components();
        for value in &components[..self.format().components()] {
            out.extend_from_slice(&(*value as f32).to_ne_bytes());
        }
    }
}

/// A position with named, typed attributes.
///
/// Two vertices are equal when their positions are equal and their attribute
/// maps hold the same names with equal values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub attributes: BTreeMap<String, VertexAttribute>,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: VertexAttribute) -> Self {
        self.set_attribute(name, attribute);
        self
    }

    /// Stores an attribute, replacing and returning any earlier value of the same name.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: VertexAttribute,
    ) -> Option<VertexAttribute> {
        self.attributes.insert(name.into(), attribute)
    }

    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.get(name)
    }

    /// Picks one attribute per layout entry, in layout order.
    ///
    /// Each entry takes the first attribute (by name) of the requested format
    /// that has not been handed out yet.
    pub fn supply(&self, layout: &[AttributeFormat]) -> Result<Vec<&VertexAttribute>, MeshError> {
        let mut used = vec![false; self.attributes.len()];
        let mut supplied = Vec::with_capacity(layout.len());

        for format in layout {
            let (idx, attribute) = self
                .attributes
                .values()
                .enumerate()
                .find(|(idx, attribute)| !used[*idx] && attribute.format() == *format)
                .ok_or(MeshError::InsufficientAttributes(*format))?;
            used[idx] = true;
            supplied.push(attribute);
        }

        Ok(supplied)
    }

    // Bit patterns used as hash key. `None` for vertices holding a NaN, which
    // never compare equal to anything.
    fn key(&self) -> Option<VertexKey<'_>> {
        let position = [
            float_bits(self.position.x)?,
            float_bits(self.position.y)?,
            float_bits(self.position.z)?,
        ];

        let mut attributes = Vec::with_capacity(self.attributes.len());
        for (name, attribute) in &self.attributes {
            let mut bits = [0; 4];
            for (dst, value) in bits.iter_mut().zip(attribute.components().iter()) {
                *dst = float_bits(*value)?;
            }
            attributes.push((name.as_str(), attribute.format(), bits));
        }

        Some(VertexKey {
            position,
            attributes,
        })
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct VertexKey<'a> {
    position: [u64; 3],
    attributes: Vec<(&'a str, AttributeFormat, [u64; 4])>,
}

fn float_bits(value: f64) -> Option<u64> {
    if value.is_nan() {
        None
    } else if value == 0.0 {
        // -0.0 == 0.0
        Some(0)
    } else {
        Some(value.to_bits())
    }
}

/// One triangle, as three indices into the vertex arena of a [`FaceList`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Face {
    pub indices: [usize; 3],
}

impl Face {
    pub fn new(p1: usize, p2: usize, p3: usize) -> Self {
        Self {
            indices: [p1, p2, p3],
        }
    }
}

/// Vertex arena plus the faces referencing it, as produced by a parser
/// before indexing.
#[derive(Debug, Clone, Default)]
pub struct FaceList {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl FaceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex to the arena and returns its index.
    pub fn push_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn push_face(&mut self, face: Face) -> Result<(), MeshError> {
        if let Some(&index) = face.indices.iter().find(|&&idx| idx >= self.vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                len: self.vertices.len(),
            });
        }
        self.faces.push(face);
        Ok(())
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn vertex_mut(&mut self, index: usize) -> Option<&mut Vertex> {
        self.vertices.get_mut(index)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    fn corners(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces.iter().flat_map(|face| face.indices.iter().copied())
    }
}

/// Deduplicated vertices plus a triangle list indexing into them.
///
/// Every index is in range, the index list holds whole triangles and no two
/// stored vertices compare equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    index_faces: Vec<u32>,
}

impl Mesh {
    /// Builds a mesh from faces, reusing a vertex whenever an equal one was
    /// already emitted. Vertices are ordered by first reference; arena
    /// vertices no face references are left out.
    pub fn from_faces(faces: &FaceList) -> Result<Self, MeshError> {
        Indexer::new(&faces.vertices).push_corners(faces.corners())
    }

    /// Like [`Mesh::from_faces`], but keeps every arena vertex in arena order,
    /// referenced or not. Equal vertices still collapse onto the first one, so
    /// without duplicates an index is the arena slot itself.
    pub fn from_arena(faces: &FaceList) -> Result<Self, MeshError> {
        let mut indexer = Indexer::new(&faces.vertices);
        indexer.keep_arena_order()?;
        indexer.push_corners(faces.corners())
    }

    /// Wraps buffers produced elsewhere after checking they form a valid mesh.
    pub fn from_indexed(vertices: Vec<Vertex>, index_faces: Vec<u32>) -> Result<Self, MeshError> {
        if index_faces.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(index_faces.len()));
        }
        if u32::try_from(vertices.len()).is_err() {
            return Err(MeshError::TooManyVertices);
        }
        if let Some(&index) = index_faces.iter().find(|&&idx| idx as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index: index as usize,
                len: vertices.len(),
            });
        }

        if let Some((first, second)) = find_duplicate(&vertices) {
            return Err(MeshError::DuplicateVertex { first, second });
        }

        Ok(Self {
            vertices,
            index_faces,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Three indices per triangle.
    pub fn index_buffer(&self) -> &[u32] {
        &self.index_faces
    }

    pub fn triangle_count(&self) -> usize {
        self.index_faces.len() / 3
    }

    /// True when the mesh holds neither vertices nor triangles.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.index_faces.is_empty()
    }

    /// Changes every vertex in place and merges vertices that became equal.
    /// Vertex order is kept. On error the mesh is left untouched.
    pub fn map_vertices<F>(&mut self, f: F) -> Result<(), MeshError>
    where
        F: FnMut(&mut Vertex),
    {
        let mut vertices = self.vertices.clone();
        vertices.iter_mut().for_each(f);

        let mut indexer = Indexer::new(&vertices);
        indexer.keep_arena_order()?;
        let mesh = indexer.push_corners(self.index_faces.iter().map(|&idx| idx as usize))?;
        *self = mesh;
        Ok(())
    }

    /// Packs the vertices for upload: position as three `f32` followed by the
    /// attributes picked by [`Vertex::supply`], all native endian.
    pub fn vertex_buffer(&self, layout: &[AttributeFormat]) -> Result<Vec<u8>, MeshError> {
        let stride = 3 * std::mem::size_of::<f32>()
            + layout.iter().map(|format| format.size()).sum::<usize>();
        let mut buffer = Vec::with_capacity(stride * self.vertices.len());

        for vertex in &self.vertices {
            for value in [vertex.position.x, vertex.position.y, vertex.position.z] {
                buffer.extend_from_slice(&(value as f32).to_ne_bytes());
            }
            for attribute in vertex.supply(layout)? {
                attribute.write_f32(&mut buffer);
            }
        }

        Ok(buffer)
    }
}

fn find_duplicate(vertices: &[Vertex]) -> Option<(usize, usize)> {
    let mut seen = HashMap::with_capacity(vertices.len());
    for (second, vertex) in vertices.iter().enumerate() {
        if let Some(key) = vertex.key() {
            if let Some(first) = seen.insert(key, second) {
                return Some((first, second));
            }
        }
    }
    None
}

/// Maps arena slots onto deduplicated output vertices.
struct Indexer<'a> {
    arena: &'a [Vertex],
    lookup: HashMap<VertexKey<'a>, u32>,
    remap: Vec<Option<u32>>,
    mesh: Mesh,
}

impl<'a> Indexer<'a> {
    fn new(arena: &'a [Vertex]) -> Self {
        Self {
            arena,
            lookup: HashMap::new(),
            remap: vec![None; arena.len()],
            mesh: Mesh::default(),
        }
    }

    /// Output index of arena slot `slot`, which must be in range. A slot is
    /// appended unless an equal vertex was emitted before.
    fn index(&mut self, slot: usize) -> Result<u32, MeshError> {
        if let Some(index) = self.remap[slot] {
            return Ok(index);
        }

        let arena = self.arena;
        let vertex = &arena[slot];
        let key = vertex.key();
        let index = match key.as_ref().and_then(|key| self.lookup.get(key)).copied() {
            Some(index) => index,
            None => {
                let index =
                    u32::try_from(self.mesh.vertices.len()).map_err(|_| MeshError::TooManyVertices)?;
                self.mesh.vertices.push(vertex.clone());
                if let Some(key) = key {
                    self.lookup.insert(key, index);
                }
                index
            }
        };
        self.remap[slot] = Some(index);
        Ok(index)
    }

    /// Emits every arena vertex up front, so output order follows the arena.
    fn keep_arena_order(&mut self) -> Result<(), MeshError> {
        for slot in 0..self.arena.len() {
            self.index(slot)?;
        }
        Ok(())
    }

    fn push_corners<I>(mut self, corners: I) -> Result<Mesh, MeshError>
    where
        I: IntoIterator<Item = usize>,
    {
        for corner in corners {
            let index = self.index(corner)?;
            self.mesh.index_faces.push(index);
        }

        log::debug!(
            "Indexed {} triangles onto {} vertices",
            self.mesh.triangle_count(),
            self.mesh.vertices.len()
        );

        Ok(self.mesh)
    }
}
