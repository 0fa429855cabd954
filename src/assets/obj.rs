//! Parses Wavefront `.obj` files (https://en.wikipedia.org/wiki/Wavefront_.obj_file).

use std::fmt;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crystal::prelude::*;
use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::color::Color;
use crate::scene::model::mesh::{self, Face, FaceList, Mesh, MeshError, Vertex, VertexAttribute};

/// How `vt`/`vn` data referenced by faces ends up on vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Attributes are written onto the shared position vertex; the last face
    /// referencing a position decides its uv and normal.
    Shared,
    /// Every face corner becomes its own vertex, equal corners are merged by
    /// the indexer afterwards.
    PerCorner,
}

impl Default for AttributeMode {
    fn default() -> Self {
        AttributeMode::Shared
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ObjOptions {
    /// Mirrors positions and normals along x, y and z.
    pub flip_axis: [bool; 3],
    pub attributes: AttributeMode,
}

/// Side table a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Position,
    Uv,
    Normal,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Table::Position => "v",
            Table::Uv => "vt",
            Table::Normal => "vn",
        };
        f.write_str(keyword)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    #[error("expected {expected} numbers after `{keyword}`, found {found}")]
    MissingComponents {
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("invalid index {0:?}")]
    InvalidIndex(String),
    #[error("face token {0:?} is none of v, v/vt, v//vn or v/vt/vn")]
    InvalidFaceToken(String),
    #[error("indices start at 1, found 0")]
    ZeroIndex,
    #[error("`{table}` index {index} is out of range, only {len} defined so far")]
    IndexOutOfRange { table: Table, index: usize, len: usize },
    #[error("a face needs at least 3 corners, found {0}")]
    TooFewCorners(usize),
}

#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("Could not open model file: {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read model.")]
    Io(#[from] io::Error),
    #[error("Malformed model at line {line}: {kind}")]
    MalformedInput { line: usize, kind: MalformedKind },
    #[error("Failed to index model.")]
    Mesh(#[from] MeshError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ObjFaceIndex {
    vert_i: usize,
    uv_i: Option<usize>,
    normal_i: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ObjMeshBuilder {
    options: ObjOptions,
    positions: Vec<Vertex>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    // per corner vertices, only used with `AttributeMode::PerCorner`
    corners: Vec<Vertex>,
    faces: Vec<Face>,
}

impl ObjMeshBuilder {
    pub fn new(options: ObjOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    fn flip(&self, mut value: Vec3) -> Vec3 {
        let [x, y, z] = self.options.flip_axis;
        if x {
            value.x = -value.x;
        }
        if y {
            value.y = -value.y;
        }
        if z {
            value.z = -value.z;
        }
        value
    }

    fn push_vertex(&mut self, position: Vec3, color: Option<Color>) {
        let mut vertex = Vertex::new(self.flip(position));
        if let Some(color) = color {
            vertex.set_attribute(mesh::COLOR, VertexAttribute::Color(color));
        }
        self.positions.push(vertex);
    }

    fn push_uv(&mut self, uv: Vec2) {
        self.uvs.push(uv);
    }

    fn push_normal(&mut self, normal: Vec3) {
        let normal = self.flip(normal);
        self.normals.push(normal);
    }

    fn check_index(index: usize, table: Table, len: usize) -> Result<usize, MalformedKind> {
        if index < len {
            Ok(index)
        } else {
            Err(MalformedKind::IndexOutOfRange {
                table,
                index: index + 1,
                len,
            })
        }
    }

    fn push_face(&mut self, face: &[ObjFaceIndex]) -> Result<(), MalformedKind> {
        if face.len() < 3 {
            return Err(MalformedKind::TooFewCorners(face.len()));
        }

        // resolve everything first so a bad token leaves no half applied face
        let mut resolved = Vec::with_capacity(face.len());
        for index in face {
            let vert = Self::check_index(index.vert_i, Table::Position, self.positions.len())?;
            let uv = match index.uv_i {
                Some(uv_i) => Some(self.uvs[Self::check_index(uv_i, Table::Uv, self.uvs.len())?]),
                None => None,
            };
            let normal = match index.normal_i {
                Some(normal_i) => Some(
                    self.normals[Self::check_index(normal_i, Table::Normal, self.normals.len())?],
                ),
                None => None,
            };
            resolved.push((vert, uv, normal));
        }

        let mut arena_i = Vec::with_capacity(resolved.len());
        for (vert, uv, normal) in resolved {
            let vertex = match self.options.attributes {
                AttributeMode::Shared => {
                    arena_i.push(vert);
                    &mut self.positions[vert]
                }
                AttributeMode::PerCorner => {
                    let corner = self.corners.len();
                    self.corners.push(self.positions[vert].clone());
                    arena_i.push(corner);
                    &mut self.corners[corner]
                }
            };
            if let Some(uv) = uv {
                vertex.set_attribute(mesh::UV, VertexAttribute::Uv(uv));
            }
            if let Some(normal) = normal {
                vertex.set_attribute(mesh::NORMAL, VertexAttribute::Normal(normal));
            }
        }

        // triangulate polygons for convex shapes
        for i in 2..arena_i.len() {
            debug!(
                "Create triangle between {}, {}, {}",
                arena_i[0],
                arena_i[i - 1],
                arena_i[i]
            );
            self.faces.push(Face::new(arena_i[0], arena_i[i - 1], arena_i[i]));
        }

        Ok(())
    }

    pub fn build_mesh(self) -> Result<Mesh, ObjError> {
        let arena = match self.options.attributes {
            AttributeMode::Shared => self.positions,
            AttributeMode::PerCorner => self.corners,
        };

        let mut faces = FaceList::new();
        for vertex in arena {
            faces.push_vertex(vertex);
        }
        for face in self.faces {
            faces.push_face(face)?;
        }

        // shared positions keep file order, so `f 1 2 3` still means v1 v2 v3
        let mesh = match self.options.attributes {
            AttributeMode::Shared => Mesh::from_arena(&faces)?,
            AttributeMode::PerCorner => Mesh::from_faces(&faces)?,
        };
        Ok(mesh)
    }
}

/// Reads and indexes the model at `path`.
pub fn parse<P: AsRef<Path>>(path: P, options: &ObjOptions) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| ObjError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loading mesh: {}", path.display());

    parse_reader(io::BufReader::new(file), options)
}

/// Parses model text from any reader. Stops at the first malformed line.
pub fn parse_reader<R: BufRead>(reader: R, options: &ObjOptions) -> Result<Mesh, ObjError> {
    let mut builder = ObjMeshBuilder::new(options.clone());

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = match line.split_once('#') {
            Some((content, comment)) => {
                debug!("Comment: {:?}", comment.trim());
                content.trim()
            }
            None => line.trim(),
        };
        if line.is_empty() {
            continue;
        }

        debug!("Parsing: \"{}\"", line);

        let (token, value) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        parse_token(token, value.trim(), &mut builder)
            .map_err(|kind| ObjError::MalformedInput { line: idx + 1, kind })?;
    }

    builder.build_mesh()
}

/// Like [`parse`], but hands back an empty mesh next to the error instead of
/// failing, so a missing or broken asset need not be fatal.
pub fn load_or_empty<P: AsRef<Path>>(path: P, options: &ObjOptions) -> (Mesh, Option<ObjError>) {
    match parse(path.as_ref(), options) {
        Ok(mesh) => (mesh, None),
        Err(err) => {
            error!("Could not load model {}: {}", path.as_ref().display(), err);
            (Mesh::default(), Some(err))
        }
    }
}

fn parse_token(token: &str, value: &str, builder: &mut ObjMeshBuilder) -> Result<(), MalformedKind> {
    match token {
        // vertex
        "v" => {
            let (position, color) = parse_vertex(value)?;
            builder.push_vertex(position, color);
        }
        // texture coordinates
        "vt" => builder.push_uv(parse_uv(value)?),
        // vertex normals
        "vn" => builder.push_normal(parse_normal(value)?),
        "f" => builder.push_face(&parse_face(value)?)?,
        // name and group, everything ends up in one mesh
        "o" | "g" => warn!("Objects and groups are merged into one mesh. Ignoring: {}", value),
        // material
        "mtllib" | "usemtl" => warn!(".mtl materials are not implemented. Ignoring."),
        // smoothing groups
        "s" => warn!("Smoothing groups not supported. Ignoring."),
        // parameter space vertices
        "vp" => warn!("Parameter space vertices not supported. Ignoring."),
        _ => error!("Found invalid token: \"{}\"", token),
    };

    Ok(())
}

fn parse_vertex(value: &str) -> Result<(Vec3, Option<Color>), MalformedKind> {
    let numbers = parse_numbers("v", value, 3)?;

    // check for colors, a lone fourth number is the ignored w
    let color = if numbers.len() == 6 {
        Some(Color::new(numbers[3], numbers[4], numbers[5], 1.0))
    } else {
        None
    };

    Ok((Vec3::new(numbers[0], numbers[1], numbers[2]), color))
}

fn parse_normal(value: &str) -> Result<Vec3, MalformedKind> {
    let numbers = parse_numbers("vn", value, 3)?;
    Ok(Vec3::new(numbers[0], numbers[1], numbers[2]))
}

fn parse_uv(value: &str) -> Result<Vec2, MalformedKind> {
    let numbers = parse_numbers("vt", value, 2)?;
    Ok(Vec2::new(numbers[0], numbers[1]))
}

// parses at least `expected` numbers separated by whitespace
fn parse_numbers(keyword: &'static str, value: &str, expected: usize) -> Result<Vec<f64>, MalformedKind> {
    let numbers = value
        .split_whitespace()
        .map(|x| x.parse().map_err(|_| MalformedKind::InvalidNumber(x.to_owned())))
        .collect::<Result<Vec<f64>, _>>()?;

    if numbers.len() < expected {
        return Err(MalformedKind::MissingComponents {
            keyword,
            expected,
            found: numbers.len(),
        });
    }

    Ok(numbers)
}

fn parse_face(value: &str) -> Result<Vec<ObjFaceIndex>, MalformedKind> {
    value.split_whitespace().map(parse_face_index).collect()
}

// the token shape is decided per token by its slashes
fn parse_face_index(value: &str) -> Result<ObjFaceIndex, MalformedKind> {
    let parts: Vec<&str> = value.split('/').collect();
    let (vert, uv, normal) = match parts.as_slice() {
        [v] => (*v, None, None),
        [v, vt] => (*v, Some(*vt), None),
        [v, "", vn] => (*v, None, Some(*vn)),
        [v, vt, vn] => (*v, Some(*vt), Some(*vn)),
        _ => return Err(MalformedKind::InvalidFaceToken(value.to_owned())),
    };

    let index = |part: &str| parse_index(value, part);
    Ok(ObjFaceIndex {
        vert_i: index(vert)?,
        uv_i: uv.map(index).transpose()?,
        normal_i: normal.map(index).transpose()?,
    })
}

// converts a 1-based file index to a 0-based one
fn parse_index(token: &str, part: &str) -> Result<usize, MalformedKind> {
    if part.is_empty() {
        return Err(MalformedKind::InvalidFaceToken(token.to_owned()));
    }
    let index: usize = part
        .parse()
        .map_err(|_| MalformedKind::InvalidIndex(part.to_owned()))?;
    index.checked_sub(1).ok_or(MalformedKind::ZeroIndex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> Result<Mesh, ObjError> {
        parse_reader(text.as_bytes(), &ObjOptions::default())
    }

    fn malformed(result: Result<Mesh, ObjError>) -> (usize, MalformedKind) {
        match result {
            Err(ObjError::MalformedInput { line, kind }) => (line, kind),
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_token() -> Result<(), MalformedKind> {
        let mut builder = ObjMeshBuilder::default();

        parse_token("o", "foo bar", &mut builder)?;
        parse_token("v", "1 2 3", &mut builder)?;
        parse_token("v", "4 5 6", &mut builder)?;
        parse_token("v", "7 8 9", &mut builder)?;
        parse_token("f", "1 2 3", &mut builder)?;
        parse_token("g", "new group", &mut builder)?;
        parse_token("foo", "bar", &mut builder)?;

        assert_eq!(
            builder.positions,
            vec![
                Vertex::new(Vec3::new(1.0, 2.0, 3.0)),
                Vertex::new(Vec3::new(4.0, 5.0, 6.0)),
                Vertex::new(Vec3::new(7.0, 8.0, 9.0)),
            ]
        );
        assert_eq!(builder.faces, vec![Face::new(0, 1, 2)]);

        Ok(())
    }

    #[test]
    fn test_parse_vertex() -> Result<(), MalformedKind> {
        assert_eq!(
            parse_vertex("1 1 1 1 0.5 0")?,
            (Vec3::ONE, Some(Color::new(1.0, 0.5, 0.0, 1.0)))
        );
        assert_eq!(parse_vertex("1  1 1 1")?, (Vec3::ONE, None));
        assert_eq!(
            parse_vertex("1 1"),
            Err(MalformedKind::MissingComponents {
                keyword: "v",
                expected: 3,
                found: 2
            })
        );
        assert_eq!(parse_vertex("1 x 1"), Err(MalformedKind::InvalidNumber("x".into())));

        Ok(())
    }

    #[test]
    fn test_parse_face_index() -> Result<(), MalformedKind> {
        assert_eq!(
            parse_face_index("1")?,
            ObjFaceIndex {
                vert_i: 0,
                ..ObjFaceIndex::default()
            }
        );
        assert_eq!(
            parse_face_index("2/3")?,
            ObjFaceIndex {
                vert_i: 1,
                uv_i: Some(2),
                ..ObjFaceIndex::default()
            }
        );
        assert_eq!(
            parse_face_index("5//2")?,
            ObjFaceIndex {
                vert_i: 4,
                normal_i: Some(1),
                ..ObjFaceIndex::default()
            }
        );
        assert_eq!(
            parse_face_index("3/2/1")?,
            ObjFaceIndex {
                vert_i: 2,
                uv_i: Some(1),
                normal_i: Some(0),
            }
        );

        Ok(())
    }

    #[test]
    fn test_parse_face_index_malformed() {
        assert_eq!(
            parse_face_index("1///2"),
            Err(MalformedKind::InvalidFaceToken("1///2".into()))
        );
        assert_eq!(
            parse_face_index("1/2/3/4"),
            Err(MalformedKind::InvalidFaceToken("1/2/3/4".into()))
        );
        assert_eq!(parse_face_index("/2"), Err(MalformedKind::InvalidFaceToken("/2".into())));
        assert_eq!(parse_face_index("1/"), Err(MalformedKind::InvalidFaceToken("1/".into())));
        assert_eq!(parse_face_index("0"), Err(MalformedKind::ZeroIndex));
        assert_eq!(parse_face_index("-1"), Err(MalformedKind::InvalidIndex("-1".into())));
    }

    #[test]
    fn position_only_triangle() {
        let mesh = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();

        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.index_buffer(), &[0, 1, 2]);
        assert!(mesh.vertices().iter().all(|vertex| vertex.attributes.is_empty()));
    }

    #[test]
    fn uv_faces() {
        let mesh = parse_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n",
        )
        .unwrap();

        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        assert_eq!(mesh.vertices().len(), 3);
        for (vertex, uv) in mesh.vertices().iter().zip(uvs) {
            assert_eq!(vertex.attribute(mesh::UV), Some(&VertexAttribute::Uv(uv)));
            assert_eq!(vertex.attribute(mesh::NORMAL), None);
        }
    }

    #[test]
    fn normal_faces() {
        let mesh = parse_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 1 0\nvn 1 0 0\nf 1//1 2//2 3//3\n",
        )
        .unwrap();

        let normals = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        assert_eq!(mesh.index_buffer(), &[0, 1, 2]);
        for (vertex, normal) in mesh.vertices().iter().zip(normals) {
            assert_eq!(vertex.attribute(mesh::NORMAL), Some(&VertexAttribute::Normal(normal)));
            assert_eq!(vertex.attribute(mesh::UV), None);
        }
    }

    #[test]
    fn shared_attributes_last_write_wins() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nvt 0 0\nvt 1 1\n\
                    f 1/1 2/1 3/1\nf 2/2 4/2 3/2\n";

        let mesh = parse_str(text).unwrap();

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.index_buffer(), &[0, 1, 2, 1, 3, 2]);
        assert_eq!(
            mesh.vertices()[1].attribute(mesh::UV),
            Some(&VertexAttribute::Uv(Vec2::new(1.0, 1.0)))
        );
        assert_eq!(
            mesh.vertices()[0].attribute(mesh::UV),
            Some(&VertexAttribute::Uv(Vec2::new(0.0, 0.0)))
        );
    }

    #[test]
    fn per_corner_attributes_split() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nvt 0 0\nvt 1 1\n\
                    f 1/1 2/1 3/1\nf 2/2 4/2 3/1\n";
        let options = ObjOptions {
            attributes: AttributeMode::PerCorner,
            ..ObjOptions::default()
        };

        let mesh = parse_reader(text.as_bytes(), &options).unwrap();

        // vertex 2 appears with two uvs, vertex 3 twice with the same one
        assert_eq!(mesh.vertices().len(), 5);
        assert_eq!(mesh.index_buffer(), &[0, 1, 2, 3, 4, 2]);
    }

    #[test]
    fn polygons_are_fanned() {
        let mesh = parse_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4").unwrap();

        assert_eq!(mesh.index_buffer(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn shared_positions_keep_file_order() {
        let mesh = parse_str("v 0 0 0
v 1 0 0
v 0 1 0
v 5 5 5
f 3 2 1
").unwrap();

        assert_eq!(mesh.index_buffer(), &[2, 1, 0]);
        let positions: Vec<_> = mesh.vertices().iter().map(|vertex| vertex.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(5.0, 5.0, 5.0),
            ]
        );
    }

    #[test]
    fn vertex_colors_and_flip() {
        let options = ObjOptions {
            flip_axis: [false, false, true],
            ..ObjOptions::default()
        };
        let text = "v 0 0 1 1 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1";

        let mesh = parse_reader(text.as_bytes(), &options).unwrap();

        let first = &mesh.vertices()[0];
        assert_eq!(first.position, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(first.attribute(mesh::COLOR), Some(&VertexAttribute::Color(Color::RED)));
        assert_eq!(
            first.attribute(mesh::NORMAL),
            Some(&VertexAttribute::Normal(Vec3::new(0.0, 0.0, -1.0)))
        );
    }

    #[test]
    fn comments_and_blank_lines() {
        let text = "# a triangle\n\nv 0 0 0\n#no space\nv 1 0 0\n   \nv 0 1 0\ns off\nf 1 2 3 # trailing\n";

        let mesh = parse_str(text).unwrap();

        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.index_buffer(), &[0, 1, 2]);
    }

    #[test]
    fn three_slashes_are_malformed() {
        let result = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1///1 2//1 3//1");

        assert_eq!(malformed(result), (5, MalformedKind::InvalidFaceToken("1///1".into())));
    }

    #[test]
    fn out_of_range_indices() {
        let uv = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/2 3/1");
        assert_eq!(
            malformed(uv),
            (
                5,
                MalformedKind::IndexOutOfRange {
                    table: Table::Uv,
                    index: 2,
                    len: 1
                }
            )
        );

        let normal = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1");
        assert_eq!(
            malformed(normal),
            (
                4,
                MalformedKind::IndexOutOfRange {
                    table: Table::Normal,
                    index: 1,
                    len: 0
                }
            )
        );

        let position = parse_str("v 0 0 0\nf 1 2 3");
        assert_eq!(
            malformed(position),
            (
                2,
                MalformedKind::IndexOutOfRange {
                    table: Table::Position,
                    index: 2,
                    len: 1
                }
            )
        );
    }

    #[test]
    fn truncated_lines() {
        assert_eq!(
            malformed(parse_str("v 0 0 0\nv 1 0 0\nf 1 2")),
            (3, MalformedKind::TooFewCorners(2))
        );
        assert_eq!(
            malformed(parse_str("vn 0 1")),
            (
                1,
                MalformedKind::MissingComponents {
                    keyword: "vn",
                    expected: 3,
                    found: 2
                }
            )
        );
    }

    #[test]
    fn missing_file() {
        let (mesh, err) = load_or_empty("does/not/exist.obj", &ObjOptions::default());

        assert_eq!(mesh.vertices().len(), 0);
        assert_eq!(mesh.index_buffer().len(), 0);
        assert!(matches!(err, Some(ObjError::FileNotFound { .. })));
    }

    #[test]
    fn options_from_toml_like_defaults() {
        assert_eq!(ObjOptions::default().attributes, AttributeMode::Shared);
        assert_eq!(ObjOptions::default().flip_axis, [false; 3]);
    }
}
