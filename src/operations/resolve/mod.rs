//! Resolution of the shared segment between a trigger feature and the
//! features topologically related to it.

mod common;
mod find_segment;
mod related;
mod segment_set;

pub use common::{find_vertex_indices, CommonGeometries, ReshapeResult};
pub use find_segment::FindSegmentToReshape;
pub use related::{FindRelatedFeatures, RelatedFeature};
pub use segment_set::{build_shared_line, line_segments, SegmentKey};
