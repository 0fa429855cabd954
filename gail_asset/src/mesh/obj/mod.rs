mod meta;

use anyhow::Result;
use gail::assets::obj;
use gail::scene::model::mesh::Mesh;
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::Path;

use self::meta::ObjMeta;

/// What was found in one model file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct MeshStats {
    pub(crate) vertices: usize,
    pub(crate) triangles: usize,
    pub(crate) attributes: BTreeSet<String>,
}

impl MeshStats {
    fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices().len(),
            triangles: mesh.triangle_count(),
            attributes: mesh
                .vertices()
                .iter()
                .flat_map(|vertex| vertex.attributes.keys().cloned())
                .collect(),
        }
    }
}

/// Returns `None` for models skipped by their meta.
pub(crate) fn process(path: &Path) -> Result<Option<MeshStats>> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let meta = ObjMeta::lookup(path)?;
    if meta.ignore {
        debug!("Ignored by meta: {}", path.display());
        return Ok(None);
    }

    let mesh = obj::parse(path, &meta.options)?;
    let stats = MeshStats::from_mesh(&mesh);
    info!(
        "{}: {} vertices, {} triangles, attributes {:?}",
        path.display(),
        stats.vertices,
        stats.triangles,
        stats.attributes
    );

    Ok(Some(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_with_folder_meta() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/models/flipped/triangle.obj");

        let stats = process(&path)?.expect("not ignored");

        assert_eq!(stats.vertices, 3);
        assert_eq!(stats.triangles, 1);
        assert_eq!(
            stats.attributes.into_iter().collect::<Vec<_>>(),
            vec!["color".to_owned(), "normal".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn test_process_malformed() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/models/broken.obj");

        assert!(process(&path).is_err());
    }
}
