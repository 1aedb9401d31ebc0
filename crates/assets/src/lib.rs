//! Mesh import: Wavefront OBJ to an ordered, unindexed vertex list.
//!
//! Parsing is delegated to `tobj`. Faces are triangulated and every face
//! corner becomes its own [`Vertex`], in file order, so the result can be
//! drawn directly as a triangle list. Corners without a normal get
//! [`Vertex::DEFAULT_NORMAL`].

use glam::Vec3;
use objview_common::Vertex;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Errors from mesh import.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse OBJ {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("OBJ {path}: model {model} references missing {attribute} index {index}")]
    BadIndex {
        path: PathBuf,
        model: String,
        attribute: &'static str,
        index: usize,
    },
    #[error("OBJ {0} contains no triangles")]
    Empty(PathBuf),
}

/// Axis-aligned bounds of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// An imported mesh, ready for upload.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Where the mesh came from, for diagnostics.
    pub origin: PathBuf,
    /// Triangle list: every three vertices form one face.
    pub vertices: Vec<Vertex>,
    /// Number of OBJ models (`o`/`g` groups) merged into `vertices`.
    pub model_count: usize,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.vertices.iter().map(Vertex::position);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Bounds { min, max })
    }

    /// Vertices whose normal came from the file rather than the default.
    pub fn has_file_normals(&self) -> bool {
        self.vertices
            .iter()
            .any(|v| v.normal != Vertex::DEFAULT_NORMAL)
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file. Material libraries are resolved next to the file; a
/// missing or broken library is logged and otherwise ignored.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let (models, materials) = tobj::load_obj_buf(&mut text.as_bytes(), &load_options(), |mtl| {
        tobj::load_mtl(base.join(mtl))
    })
    .map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if let Err(e) = materials {
        tracing::warn!("{}: material library ignored: {e}", path.display());
    }

    let mesh = unroll(path, models, &corner_normal_flags(&text))?;
    tracing::info!(
        "loaded {}: {} models, {} triangles",
        path.display(),
        mesh.model_count,
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load OBJ text from a reader. `origin` is only used in diagnostics;
/// `mtllib` statements are ignored.
pub fn load_obj_from_reader<R: Read>(
    reader: &mut R,
    origin: impl Into<PathBuf>,
) -> Result<MeshData, AssetError> {
    let origin = origin.into();
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| AssetError::Io {
            path: origin.clone(),
            source,
        })?;
    let (models, _) = tobj::load_obj_buf(&mut text.as_bytes(), &load_options(), |_| {
        Ok((Vec::new(), Default::default()))
    })
    .map_err(|source| AssetError::Parse {
        path: origin.clone(),
        source,
    })?;
    unroll(&origin, models, &corner_normal_flags(&text))
}

/// For every triangulated face corner in file order, whether the face
/// statement gave that corner a normal (`v//vn` or `v/vt/vn`).
///
/// tobj fills in a normal index for corners that have none, so presence has
/// to be read from the source. Polygons are fanned from their first corner,
/// the same way tobj triangulates them.
fn corner_normal_flags(text: &str) -> Vec<bool> {
    let mut flags = Vec::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("f") {
            continue;
        }
        let face: Vec<bool> = tokens
            .map(|t| t.split('/').nth(2).is_some_and(|n| !n.is_empty()))
            .collect();
        for i in 1..face.len().saturating_sub(1) {
            flags.extend([face[0], face[i], face[i + 1]]);
        }
    }
    flags
}

fn vec3_at(data: &[f32], index: usize) -> Option<[f32; 3]> {
    let start = index.checked_mul(3)?;
    let slice = data.get(start..start + 3)?;
    Some([slice[0], slice[1], slice[2]])
}

fn unroll(
    path: &Path,
    models: Vec<tobj::Model>,
    normal_flags: &[bool],
) -> Result<MeshData, AssetError> {
    let model_count = models.len();
    let total_corners: usize = models
        .iter()
        .map(|m| m.mesh.indices.len() - m.mesh.indices.len() % 3)
        .sum();
    // A mismatch means the face scan disagrees with tobj; trust tobj's indices.
    let normal_flags = if normal_flags.len() == total_corners {
        Some(normal_flags)
    } else {
        tracing::debug!(
            "{}: scanned {} face corners, tobj produced {total_corners}",
            path.display(),
            normal_flags.len()
        );
        None
    };

    let mut vertices = Vec::with_capacity(total_corners);
    for model in models {
        let mesh = &model.mesh;
        let bad_index = |attribute, index| AssetError::BadIndex {
            path: path.to_path_buf(),
            model: model.name.clone(),
            attribute,
            index,
        };
        // Only whole triangles; triangulation guarantees this for faces.
        let corners = mesh.indices.len() - mesh.indices.len() % 3;

        for (corner, &pi) in mesh.indices[..corners].iter().enumerate() {
            let pi = pi as usize;
            let position = vec3_at(&mesh.positions, pi).ok_or_else(|| bad_index("position", pi))?;
            let has_normal = normal_flags.is_none_or(|flags| flags[vertices.len()]);
            let normal = match mesh.normal_indices.get(corner) {
                Some(&ni) if has_normal && !mesh.normals.is_empty() => {
                    let ni = ni as usize;
                    vec3_at(&mesh.normals, ni).ok_or_else(|| bad_index("normal", ni))?
                }
                _ => Vertex::DEFAULT_NORMAL,
            };
            vertices.push(Vertex::new(position, normal));
        }
    }

    if vertices.is_empty() {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    Ok(MeshData {
        origin: path.to_path_buf(),
        vertices,
        model_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE_NO_NORMALS: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

    const QUAD_WITH_NORMALS: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 1 0
f 1//1 2//1 3//1 4//1
";

    fn parse(text: &str) -> Result<MeshData, AssetError> {
        load_obj_from_reader(&mut text.as_bytes(), "inline.obj")
    }

    #[test]
    fn missing_normals_default_to_plus_z() {
        let mesh = parse(TRIANGLE_NO_NORMALS).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(!mesh.has_file_normals());
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn quads_are_triangulated_and_unrolled() {
        let mesh = parse(QUAD_WITH_NORMALS).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(mesh.has_file_normals());
    }

    #[test]
    fn vertices_follow_face_order() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 2 3
f 4 3 2
";
        let mesh = parse(text).unwrap();
        let positions: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn multiple_models_are_concatenated() {
        let text = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 5 5 5
v 6 5 5
v 5 6 5
f 4 5 6
";
        let mesh = parse(text).unwrap();
        assert_eq!(mesh.model_count, 2);
        assert_eq!(mesh.triangle_count(), 2);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(6.0, 6.0, 5.0));
    }

    #[test]
    fn mesh_without_faces_is_rejected() {
        let err = parse("v 0 0 0\nv 1 0 0\n").unwrap_err();
        assert!(matches!(err, AssetError::Empty(_)));
    }

    #[test]
    fn face_without_vertices_is_a_parse_error() {
        let err = parse("f 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            AssetError::Parse {
                source: tobj::LoadError::FaceVertexOutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn faces_without_normals_keep_default_in_mixed_file() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vn 1 0 0
f 1 2 3
f 2//1 3//1 4//1
";
        let mesh = parse(text).unwrap();
        let normals: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.normal).collect();
        assert_eq!(
            normals,
            vec![
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn per_corner_normals_survive_triangulation() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 1 0
f 1//1 2 3//1 4
";
        let mesh = parse(text).unwrap();
        let normals: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.normal).collect();
        let (up, z) = ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        // Fan (1, 2, 3), (1, 3, 4).
        assert_eq!(normals, vec![up, z, up, up, up, z]);
    }

    #[test]
    fn corner_flags_fan_polygons() {
        let flags = corner_normal_flags("f 1/1/1 2/2 3//3 4\nl 1 2\nf 1 2 3\n");
        assert_eq!(
            flags,
            vec![true, false, true, true, true, false, false, false, false]
        );
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        tmp.write_all(QUAD_WITH_NORMALS.as_bytes()).unwrap();
        let mesh = load_obj(tmp.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.origin, tmp.path());
    }

    #[test]
    fn missing_material_library_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.obj");
        std::fs::write(&path, format!("mtllib missing.mtl\n{TRIANGLE_NO_NORMALS}")).unwrap();
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_obj(dir.path().join("absent.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("absent.obj"));
    }

    #[test]
    fn bounds_center_and_size() {
        let mesh = parse(QUAD_WITH_NORMALS).unwrap();
        let b = mesh.bounds().unwrap();
        assert_eq!(b.size(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(b.center(), Vec3::new(0.5, 0.5, 0.0));
    }
}
