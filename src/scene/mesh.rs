use crate::math::{Aabb, Point3, Vector3};

/// RGBA color with components in [0, 1]
pub type Color = [f32; 4];

/// Identifier of a geometry stored in a [`SceneGraph`](crate::scene::SceneGraph)
///
/// Clones of a mesh share the same geometry id, which is what shape caching keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub(crate) u32);

/// Indexed triangle geometry of a visual mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshGeometry {
    /// Vertex positions in mesh space
    pub positions: Vec<Point3>,

    /// Per-vertex normals (may be empty)
    pub normals: Vec<Vector3>,

    /// Per-vertex colors (may be empty)
    pub colors: Vec<Color>,

    /// Triangles as vertex index triples
    pub indices: Vec<[u32; 3]>,
}

impl MeshGeometry {
    /// Creates geometry from positions and triangles only
    pub fn new(positions: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            colors: Vec::new(),
            indices,
        }
    }

    /// Creates an axis-aligned box centered at the origin with the given full dimensions
    ///
    /// Each face has its own four vertices so normals stay flat.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [(Vector3, [[f32; 3]; 4]); 6] = [
            (Vector3::x(), [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]]),
            (-Vector3::x(), [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]]),
            (Vector3::y(), [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]]),
            (-Vector3::y(), [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]]),
            (Vector3::z(), [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
            (-Vector3::z(), [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]]),
        ];

        let mut geometry = Self::default();
        for (normal, corners) in faces {
            let base = geometry.positions.len() as u32;
            for [cx, cy, cz] in corners {
                geometry.positions.push(Point3::new(cx, cy, cz));
                geometry.normals.push(normal);
            }
            geometry.indices.push([base, base + 1, base + 2]);
            geometry.indices.push([base, base + 2, base + 3]);
        }
        geometry
    }

    /// Returns the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the mesh-space bounding box, or `None` for empty geometry
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter())
    }

    /// Returns true if the geometry can be drawn (has at least one triangle)
    pub fn is_renderable(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_layout() {
        let geometry = MeshGeometry::cuboid(2.0, 1.0, 0.4);
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.triangle_count(), 12);
        assert_eq!(geometry.normals.len(), 24);

        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -0.5, -0.2));
        assert_eq!(bounds.max, Point3::new(1.0, 0.5, 0.2));
    }

    #[test]
    fn cuboid_faces_point_outwards() {
        let geometry = MeshGeometry::cuboid(1.0, 1.0, 1.0);
        for (t, [a, b, c]) in geometry.indices.iter().enumerate() {
            let pa = geometry.positions[*a as usize];
            let pb = geometry.positions[*b as usize];
            let pc = geometry.positions[*c as usize];
            let face = (pb - pa).cross(&(pc - pa));
            let expected = geometry.normals[*a as usize];
            assert!(face.dot(&expected) > 0.0, "triangle {} winds inwards", t);
        }
    }

    #[test]
    fn empty_geometry_has_no_bounds() {
        assert!(MeshGeometry::default().bounds().is_none());
        assert!(!MeshGeometry::default().is_renderable());
    }
}
