use thiserror::Error;

use crate::geometry::GeometryType;
use crate::topology::{FeatureId, LayerId};

/// Top-level error type for segment resolution and reshaping.
#[derive(Debug, Error)]
pub enum ReshapeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Transformation(#[from] TransformationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors related to geometry values and their vertex editing.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("unsupported source geometry type {0:?}")]
    UnsupportedGeometryType(GeometryType),

    #[error("vertex {index} is out of range for a geometry with {count} vertices")]
    VertexOutOfRange { index: usize, count: usize },

    #[error("invalid vertex edit: {0}")]
    InvalidEdit(String),

    #[error("invalid WKT: {0}")]
    Wkt(String),
}

/// Errors raised while resolving the shared segment between features.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A coordinate expected to be shared is missing from a feature.
    #[error("could not find vertex index for ({x} {y})")]
    VertexNotFound { x: f64, y: f64 },

    #[error("trigger segment ({from}, {to}) does not identify an edge of the feature")]
    TriggerSegmentNotFound { from: usize, to: usize },

    #[error("no segment found at the trigger location")]
    NoSegmentAtLocation,
}

/// Failures while rewriting feature geometries.
///
/// Any of these aborts a reshape and rolls back the edit transactions
/// the reshape opened itself.
#[derive(Debug, Error)]
pub enum TransformationError {
    #[error("could not move vertex {index} to ({x} {y}): {source}")]
    MoveVertex {
        index: usize,
        x: f64,
        y: f64,
        source: GeometryError,
    },

    #[error("could not insert vertex ({x} {y}) before {index}: {source}")]
    InsertVertex {
        index: usize,
        x: f64,
        y: f64,
        source: GeometryError,
    },

    #[error("could not delete vertex {index}: {source}")]
    DeleteVertex { index: usize, source: GeometryError },

    #[error("vertex run {indices:?} has no vertex before its wraparound start")]
    WraparoundStart { indices: Vec<usize> },

    #[error("vertex run to replace is empty")]
    EmptyVertexRun,

    #[error("replacement geometry has no vertices")]
    EmptyReplacement,

    #[error("could not start editing on layer {layer:?}: {source}")]
    StartEditing { layer: LayerId, source: StoreError },

    #[error("could not begin edit transaction on layer {layer:?}: {source}")]
    BeginTransaction { layer: LayerId, source: StoreError },

    #[error("could not update geometry of feature {feature:?} on layer {layer:?}: {source}")]
    UpdateGeometry {
        layer: LayerId,
        feature: FeatureId,
        source: StoreError,
    },
}

/// Errors reported by a feature store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("layer not found: {0:?}")]
    LayerNotFound(LayerId),

    #[error("feature {feature:?} not found on layer {layer:?}")]
    FeatureNotFound { layer: LayerId, feature: FeatureId },

    #[error("layer {0:?} is not editable")]
    NotEditable(LayerId),

    #[error("layer {0:?} already has an active edit transaction")]
    TransactionActive(LayerId),

    #[error("layer {0:?} has no active edit transaction")]
    NoTransaction(LayerId),
}

/// Convenience type alias for results using [`ReshapeError`].
pub type Result<T> = std::result::Result<T, ReshapeError>;
