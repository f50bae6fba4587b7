//! Rewriting of common parts and edges onto a replacement geometry.

mod make_edits;
mod replace;
mod session;
mod vertex_run;

pub use make_edits::MakeReshapeEdits;
pub use replace::{move_vertex, reshape_geometry};
pub use session::EditSession;
pub use vertex_run::{RunShape, VertexRun};

use crate::geometry::{LineString, Point};
use crate::topology::{FeatureId, LayerId};

/// Default label of the undo entry a reshape leaves on each layer.
pub const DEFAULT_EDIT_LABEL: &str = "Reshape segment";

/// A feature that contains the shared segment and has its run of vertices
/// replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPart {
    pub layer: LayerId,
    pub feature: FeatureId,
    /// Vertex numbers of the shared segment's points in this feature.
    pub vertex_indices: Vec<usize>,
    /// `true` if this feature is digitized opposite to the shared segment.
    pub is_reversed: bool,
}

/// A feature touching one end of the shared segment; one vertex moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub layer: LayerId,
    pub feature: FeatureId,
    pub vertex_index: usize,
    /// `true` if the vertex sits at the start of the shared segment.
    pub is_start: bool,
}

/// The geometry drawn in place of the shared segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    Point(Point),
    Line(LineString),
}

impl Replacement {
    /// Builds a replacement from captured points: one point is a point
    /// replacement, more form a line, none gives `None`.
    #[must_use]
    pub fn from_points(mut points: Vec<Point>) -> Option<Self> {
        match points.len() {
            0 => None,
            1 => points.pop().map(Replacement::Point),
            _ => Some(Replacement::Line(LineString::new(points))),
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point> {
        match self {
            Replacement::Point(p) => Some(*p),
            Replacement::Line(line) => line.start_point().copied(),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point> {
        match self {
            Replacement::Point(p) => Some(*p),
            Replacement::Line(line) => line.end_point().copied(),
        }
    }

    /// Returns the replacement as seen by a part digitized the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Replacement::Point(p) => Replacement::Point(*p),
            Replacement::Line(line) => Replacement::Line(line.reversed()),
        }
    }
}

/// Parameters for [`MakeReshapeEdits`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditParams {
    /// Label of the undo entry recorded on every edited layer.
    pub label: String,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            label: DEFAULT_EDIT_LABEL.to_string(),
        }
    }
}
