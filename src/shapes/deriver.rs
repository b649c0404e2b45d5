use std::collections::HashMap;

use log::{debug, warn};

use crate::error::SimError;
use crate::math::{Aabb, Transform, Vector3};
use crate::scene::{GeometryId, NodeId, SceneGraph};
use crate::shapes::ShapeDesc;
use crate::Result;

/// Builds a box shape whose half-extents are half the bounding box extents
pub fn shape_from_bounds(bounds: &Aabb) -> Result<ShapeDesc> {
    if bounds.is_degenerate() {
        return Err(SimError::DegenerateGeometry {
            extents: bounds.extents(),
        });
    }
    Ok(ShapeDesc::cuboid(bounds.half_extents()))
}

type CacheKey = (GeometryId, [u32; 3]);

/// Derives box collision shapes from the bounds of visual meshes
///
/// Nodes cloned from the same geometry with the same scale get the same shape, so
/// derived shapes are cached by geometry id and scale.
#[derive(Debug, Default)]
pub struct CollisionShapeDeriver {
    cache: HashMap<CacheKey, ShapeDesc>,
}

impl CollisionShapeDeriver {
    /// Creates a deriver with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the shape of a mesh node in body space (node scale applied, rotation left to the body)
    pub fn derive(&mut self, scene: &SceneGraph, node: NodeId) -> Result<ShapeDesc> {
        let scale = scene.node(node)?.transform.scale;
        let (geometry, _) = scene.mesh_geometry(node)?;
        self.derive_geometry(scene, geometry, scale)
    }

    /// Derives the shape of a stored geometry drawn at the given scale
    pub fn derive_geometry(&mut self, scene: &SceneGraph, geometry_id: GeometryId, scale: Vector3) -> Result<ShapeDesc> {
        let key: CacheKey = (geometry_id, scale.map(f32::to_bits).into());
        if let Some(shape) = self.cache.get(&key) {
            return Ok(shape.clone());
        }

        let bounds = scene
            .geometry(geometry_id)?
            .bounds()
            .ok_or(SimError::DegenerateGeometry {
                extents: Vector3::zeros(),
            })?;
        let scaled = bounds.transformed(&Transform {
            scale,
            ..Transform::identity()
        });
        let shape = shape_from_bounds(&scaled)?;

        debug!("derived {:?} for geometry {:?}", shape.half_extents(), geometry_id);
        self.cache.insert(key, shape.clone());
        Ok(shape)
    }

    /// Derives a box from the node's world-space bounds, rotation included
    pub fn derive_world_aligned(&self, scene: &SceneGraph, node: NodeId) -> Result<ShapeDesc> {
        let transform = scene.node(node)?.transform;
        let (_, geometry) = scene.mesh_geometry(node)?;

        let bounds = geometry.bounds().ok_or(SimError::DegenerateGeometry {
            extents: Vector3::zeros(),
        })?;
        shape_from_bounds(&bounds.transformed(&transform))
    }

    /// Like [`derive`](Self::derive), but flat axes are widened to `min_half_extent`
    pub fn derive_or_min(&mut self, scene: &SceneGraph, node: NodeId, min_half_extent: f32) -> Result<ShapeDesc> {
        match self.derive(scene, node) {
            Err(SimError::DegenerateGeometry { extents }) => {
                let half = (extents * 0.5).map(|h| h.max(min_half_extent));
                warn!(
                    "node {:?} has degenerate bounds {:?}, using half-extents {:?}",
                    node, extents, half
                );
                let shape = ShapeDesc::cuboid(half);
                shape.validate()?;
                Ok(shape)
            }
            other => other,
        }
    }

    /// Returns the number of cached shapes
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached shape
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point3, Quaternion};
    use crate::scene::MeshGeometry;
    use approx::assert_relative_eq;

    fn plank() -> MeshGeometry {
        MeshGeometry::new(
            vec![
                Point3::new(-1.0, -0.5, -0.2),
                Point3::new(1.0, 0.5, 0.2),
                Point3::new(1.0, -0.5, 0.2),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn half_extents_are_half_the_bounds() {
        let mut scene = SceneGraph::new();
        let node = scene.add_mesh(plank(), Transform::identity());

        let mut deriver = CollisionShapeDeriver::new();
        let shape = deriver.derive(&scene, node).unwrap();
        assert_relative_eq!(shape.half_extents(), Vector3::new(1.0, 0.5, 0.2));
    }

    #[test]
    fn clones_share_a_cached_shape() {
        let mut scene = SceneGraph::new();
        let first = scene.add_mesh(plank(), Transform::identity());
        let (geometry, _) = scene.mesh_geometry(first).unwrap();
        let second = scene
            .add_node(crate::scene::SceneNode::mesh(geometry))
            .unwrap();

        let mut deriver = CollisionShapeDeriver::new();
        let a = deriver.derive(&scene, first).unwrap();
        let b = deriver.derive(&scene, second).unwrap();
        assert_eq!(a, b);
        assert_eq!(deriver.cached(), 1);
    }

    #[test]
    fn scale_applies_but_rotation_does_not() {
        let mut scene = SceneGraph::new();
        let transform = Transform::new(
            Vector3::new(3.0, 0.0, 0.0),
            Quaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2),
            Vector3::new(2.0, 1.0, 1.0),
        );
        let node = scene.add_mesh(plank(), transform);

        let mut deriver = CollisionShapeDeriver::new();
        let local = deriver.derive(&scene, node).unwrap();
        assert_relative_eq!(local.half_extents(), Vector3::new(2.0, 0.5, 0.2));

        let world = deriver.derive_world_aligned(&scene, node).unwrap();
        assert_relative_eq!(world.half_extents(), Vector3::new(0.2, 0.5, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn flat_mesh_is_rejected_unless_widened() {
        let mut scene = SceneGraph::new();
        let flat = MeshGeometry::new(
            vec![
                Point3::new(-1.0, 0.0, -1.0),
                Point3::new(1.0, 0.0, -1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1]],
        );
        let node = scene.add_mesh(flat, Transform::identity());

        let mut deriver = CollisionShapeDeriver::new();
        assert!(matches!(
            deriver.derive(&scene, node),
            Err(SimError::DegenerateGeometry { .. })
        ));

        let widened = deriver.derive_or_min(&scene, node, 0.01).unwrap();
        assert_relative_eq!(widened.half_extents(), Vector3::new(1.0, 0.01, 1.0));
    }
}
