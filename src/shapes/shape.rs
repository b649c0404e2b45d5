use std::sync::Arc;

use rapier3d::prelude::{ColliderBuilder, SharedShape};

use crate::error::SimError;
use crate::math::{is_finite_vector, Direction3, Point3, Vector3, EPSILON};
use crate::Result;

/// Collision shape descriptor handed to the physics world
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDesc {
    /// A box (cuboid) with the given half-extents
    Cuboid {
        /// Half-width, half-height and half-depth
        half_extents: Vector3,
    },

    /// A sphere
    Ball {
        /// Radius of the sphere
        radius: f32,
    },

    /// A static triangle soup, e.g. terrain
    TriMesh {
        /// Vertex positions in body space
        vertices: Arc<Vec<Point3>>,
        /// Triangles as vertex index triples
        indices: Arc<Vec<[u32; 3]>>,
    },
}

impl ShapeDesc {
    /// Creates a box shape with the given half-extents
    pub fn cuboid(half_extents: Vector3) -> Self {
        Self::Cuboid { half_extents }
    }

    /// Creates a box shape with the given full dimensions
    pub fn cuboid_with_dimensions(width: f32, height: f32, depth: f32) -> Self {
        Self::Cuboid {
            half_extents: Vector3::new(width, height, depth) * 0.5,
        }
    }

    /// Creates a ball shape
    pub fn ball(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Returns the type name of the shape
    pub fn shape_type(&self) -> &'static str {
        match self {
            Self::Cuboid { .. } => "Cuboid",
            Self::Ball { .. } => "Ball",
            Self::TriMesh { .. } => "TriMesh",
        }
    }

    /// Returns the half-extents of the shape's local bounding box
    pub fn half_extents(&self) -> Vector3 {
        match self {
            Self::Cuboid { half_extents } => *half_extents,
            Self::Ball { radius } => Vector3::repeat(*radius),
            Self::TriMesh { vertices, .. } => crate::math::Aabb::from_points(vertices.iter())
                .map(|aabb| aabb.half_extents())
                .unwrap_or_else(Vector3::zeros),
        }
    }

    /// Returns the full extent of the shape projected onto a direction
    pub fn extent_along(&self, direction: &Direction3) -> f32 {
        let half = self.half_extents();
        2.0 * (direction.x.abs() * half.x + direction.y.abs() * half.y + direction.z.abs() * half.z)
    }

    /// Checks that the shape can back a collider
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Cuboid { half_extents } => {
                if !is_finite_vector(half_extents) || half_extents.iter().any(|h| *h <= EPSILON) {
                    return Err(SimError::DegenerateGeometry {
                        extents: *half_extents * 2.0,
                    });
                }
            }
            Self::Ball { radius } => {
                if !(radius.is_finite() && *radius > EPSILON) {
                    return Err(SimError::InvalidParameter(format!(
                        "ball radius must be positive, got {}",
                        radius
                    )));
                }
            }
            Self::TriMesh { vertices, indices } => {
                if indices.is_empty() {
                    return Err(SimError::InvalidParameter("triangle mesh has no triangles".into()));
                }
                let count = vertices.len() as u32;
                if indices.iter().flatten().any(|i| *i >= count) {
                    return Err(SimError::InvalidParameter(
                        "triangle mesh index out of range".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns a collider builder for the wrapped dynamics engine
    pub(crate) fn collider_builder(&self) -> ColliderBuilder {
        match self {
            Self::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            Self::Ball { radius } => ColliderBuilder::ball(*radius),
            Self::TriMesh { vertices, indices } => ColliderBuilder::new(SharedShape::trimesh(
                vertices.as_ref().clone(),
                indices.as_ref().clone(),
            )),
        }
    }
}
