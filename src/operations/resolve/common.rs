use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::related::RelatedFeature;
use super::segment_set::{build_shared_line, line_segments, SegmentKey};
use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{Component, Geometry, GeometryType, LineString, Point, VertexKey};
use crate::operations::query::intersects::point_touches_component;
use crate::operations::reshape::{CommonPart, Edge, VertexRun};
use crate::topology::{FeatureId, FeatureStore, LayerId};

/// The shared segment and everything that has to follow it when reshaped.
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeResult {
    /// The shared segment in the trigger feature's digitizing direction.
    pub segment: Option<LineString>,
    /// The trigger feature first, then every feature containing the
    /// segment, in related-feature order.
    pub common_parts: Vec<CommonPart>,
    /// Features touching the segment's start or end.
    pub edges: Vec<Edge>,
}

/// Computes the shared segment of a trigger edge against a given list of
/// related features.
///
/// The trigger edge is the pair of vertex numbers `(from, to)` of the
/// trigger feature; the component holding `to` is the one reshaped.
pub struct CommonGeometries {
    layer: LayerId,
    feature: FeatureId,
    trigger: (usize, usize),
}

impl CommonGeometries {
    /// Creates a new `CommonGeometries` operation.
    #[must_use]
    pub fn new(layer: LayerId, feature: FeatureId, trigger: (usize, usize)) -> Self {
        Self {
            layer,
            feature,
            trigger,
        }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::UnsupportedGeometryType` for a point trigger,
    /// `TopologyError::TriggerSegmentNotFound` if `(from, to)` is not a
    /// segment of the trigger feature, `TopologyError::VertexNotFound` if a
    /// common part lacks a vertex of the shared segment, or a store error.
    pub fn execute<S>(&self, store: &S, related: &[RelatedFeature]) -> Result<ReshapeResult>
    where
        S: FeatureStore + ?Sized,
    {
        let geometry = store.geometry(self.layer, self.feature)?;
        let geometry_type = geometry.geometry_type();
        if geometry_type == GeometryType::Point {
            return Err(GeometryError::UnsupportedGeometryType(geometry_type).into());
        }

        let (from, to) = self.trigger;
        let not_found = || TopologyError::TriggerSegmentNotFound { from, to };
        let from_vertex = geometry.vertex_at(from).ok_or_else(not_found)?;
        let to_vertex = geometry.vertex_at(to).ok_or_else(not_found)?;
        let trigger = SegmentKey::between(from_vertex, to_vertex);
        let (_, trigger_part) = geometry.component_of_vertex(to).ok_or_else(not_found)?;
        let trigger_points = trigger_part.points();

        let mut keep = line_segments(trigger_points);
        let mut common_candidates: Vec<RelatedFeature> = Vec::new();
        let mut edge_candidates: Vec<(RelatedFeature, Component<'_>)> = Vec::new();

        for &candidate in related {
            let other = store.geometry(candidate.layer, candidate.feature)?;
            for component in other.components() {
                if component.is_point() {
                    edge_candidates.push((candidate, component));
                    continue;
                }
                let segments = line_segments(component.points());
                if segments.contains(&trigger) {
                    // Narrow down to what both agree on.
                    keep.retain(|s| segments.contains(s));
                    common_candidates.push(candidate);
                } else {
                    keep.retain(|s| !segments.contains(s));
                    edge_candidates.push((candidate, component));
                }
            }
        }

        let trigger_keys: HashSet<VertexKey> = trigger_points.iter().map(Point::key).collect();
        let split_points: HashSet<VertexKey> = edge_candidates
            .iter()
            .flat_map(|(_, component)| component.points().iter().map(Point::key))
            .filter(|key| trigger_keys.contains(key))
            .collect();

        let segment = build_shared_line(trigger_points, &keep, trigger, &split_points)
            .ok_or_else(not_found)?;
        debug!(
            vertices = segment.len(),
            common_parts = common_candidates.len() + 1,
            edge_candidates = edge_candidates.len(),
            "resolved shared segment"
        );

        let mut common_parts = vec![CommonPart {
            layer: self.layer,
            feature: self.feature,
            vertex_indices: find_vertex_indices(geometry, &segment.points)?,
            is_reversed: false,
        }];
        for candidate in common_candidates {
            let other = store.geometry(candidate.layer, candidate.feature)?;
            let vertex_indices = find_vertex_indices(other, &segment.points)?;
            let is_reversed = VertexRun::new(&vertex_indices).is_reversed();
            common_parts.push(CommonPart {
                layer: candidate.layer,
                feature: candidate.feature,
                vertex_indices,
                is_reversed,
            });
        }

        let mut edges = Vec::new();
        if let (Some(start), Some(end)) = (segment.start_point(), segment.end_point()) {
            for (candidate, component) in &edge_candidates {
                for (point, is_start) in [(start, true), (end, false)] {
                    if !point_touches_component(point, component) {
                        continue;
                    }
                    let other = store.geometry(candidate.layer, candidate.feature)?;
                    let indices = find_vertex_indices(other, std::slice::from_ref(point))?;
                    edges.push(Edge {
                        layer: candidate.layer,
                        feature: candidate.feature,
                        vertex_index: indices[0],
                        is_start,
                    });
                }
            }
        }
        debug!(edges = edges.len(), "resolved edges");

        Ok(ReshapeResult {
            segment: Some(segment),
            common_parts,
            edges,
        })
    }
}

/// Vertex numbers in `geometry` of each of `points`, matched on exact X/Y.
///
/// A coordinate that occurs more than once resolves to its last
/// occurrence, so the origin of a ring maps to its closing vertex.
///
/// # Errors
///
/// Returns `TopologyError::VertexNotFound` for a point that is not a
/// vertex of `geometry`.
pub fn find_vertex_indices(
    geometry: &Geometry,
    points: &[Point],
) -> std::result::Result<Vec<usize>, TopologyError> {
    let index_by_key: HashMap<VertexKey, usize> =
        geometry.vertices().map(|(nr, p)| (p.key(), nr)).collect();
    points
        .iter()
        .map(|p| {
            index_by_key
                .get(&p.key())
                .copied()
                .ok_or(TopologyError::VertexNotFound { x: p.x, y: p.y })
        })
        .collect()
}
