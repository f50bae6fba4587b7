pub mod bounding_box;
pub mod closest_segment;
pub mod intersects;

pub use bounding_box::{Aabb, BoundingBox};
pub use closest_segment::ClosestSegment;
pub use intersects::Intersects;
