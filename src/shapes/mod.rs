mod shape;
pub mod deriver;

pub use self::shape::ShapeDesc;
pub use self::deriver::{shape_from_bounds, CollisionShapeDeriver};
