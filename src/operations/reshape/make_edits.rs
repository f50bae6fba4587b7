use std::collections::HashMap;

use tracing::{debug, info};

use super::replace::{move_vertex, reshape_geometry};
use super::session::EditSession;
use super::{CommonPart, Edge, EditParams, Replacement};
use crate::error::{Result, TransformationError};
use crate::geometry::{Geometry, Point};
use crate::topology::{FeatureId, FeatureStore, LayerId};

/// Applies a replacement geometry to every common part and edge.
///
/// Common parts are rewritten first, then edges, in the given order. Each
/// affected layer gets one edit transaction labelled with
/// [`EditParams::label`]; transactions the caller already opened are reused
/// and left open.
pub struct MakeReshapeEdits<'a> {
    common_parts: &'a [CommonPart],
    edges: &'a [Edge],
    replacement: &'a Replacement,
    params: EditParams,
}

impl<'a> MakeReshapeEdits<'a> {
    /// Creates a new `MakeReshapeEdits` operation with default parameters.
    #[must_use]
    pub fn new(
        common_parts: &'a [CommonPart],
        edges: &'a [Edge],
        replacement: &'a Replacement,
    ) -> Self {
        Self {
            common_parts,
            edges,
            replacement,
            params: EditParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: EditParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the edits.
    ///
    /// On success every transaction opened here is committed. On any
    /// failure those transactions are discarded, layers made editable here
    /// leave editing again, and the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TransformationError` if a vertex edit, a geometry update or
    /// starting an edit fails, or a store error if a feature cannot be read.
    pub fn execute<S>(&self, store: &mut S) -> Result<()>
    where
        S: FeatureStore + ?Sized,
    {
        if matches!(self.replacement, Replacement::Line(line) if line.is_empty()) {
            return Err(TransformationError::EmptyReplacement.into());
        }

        let mut session = EditSession::new(self.params.label.as_str());
        match self.apply(store, &mut session) {
            Ok(()) => {
                let layers = session.opened().len();
                session.commit(store)?;
                info!(
                    layers,
                    common_parts = self.common_parts.len(),
                    edges = self.edges.len(),
                    "reshape committed"
                );
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "reshape failed, rolling back");
                session.rollback(store);
                Err(err)
            }
        }
    }

    fn apply<S>(&self, store: &mut S, session: &mut EditSession) -> Result<()>
    where
        S: FeatureStore + ?Sized,
    {
        for part in self.common_parts {
            session.ensure_transaction(store, part.layer)?;
            let replacement = if part.is_reversed {
                self.replacement.reversed()
            } else {
                self.replacement.clone()
            };
            let new = reshape_geometry(
                store.geometry(part.layer, part.feature)?,
                &part.vertex_indices,
                &replacement,
            )?;
            update_geometry(store, part.layer, part.feature, new)?;
        }

        if self.edges.is_empty() {
            return Ok(());
        }
        let (start, end) = self.replacement_ends()?;

        // Later moves on the same feature build on the earlier ones.
        let mut updated: HashMap<(LayerId, FeatureId), Geometry> = HashMap::new();
        for edge in self.edges {
            session.ensure_transaction(store, edge.layer)?;
            let target = if edge.is_start { start } else { end };
            let key = (edge.layer, edge.feature);
            let new = match updated.get(&key) {
                Some(current) => move_vertex(current, edge.vertex_index, target)?,
                None => {
                    let current = store.geometry(edge.layer, edge.feature)?;
                    move_vertex(current, edge.vertex_index, target)?
                }
            };
            update_geometry(store, edge.layer, edge.feature, new.clone())?;
            updated.insert(key, new);
        }
        Ok(())
    }

    fn replacement_ends(&self) -> Result<(Point, Point)> {
        self.replacement
            .start_point()
            .zip(self.replacement.end_point())
            .ok_or_else(|| TransformationError::EmptyReplacement.into())
    }
}

fn update_geometry<S>(
    store: &mut S,
    layer: LayerId,
    feature: FeatureId,
    geometry: Geometry,
) -> Result<()>
where
    S: FeatureStore + ?Sized,
{
    store
        .replace_geometry(layer, feature, geometry)
        .map_err(|source| TransformationError::UpdateGeometry { layer, feature, source }.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ReshapeError;
    use crate::geometry::LineString;
    use crate::topology::MemoryStore;

    fn geom(wkt: &str) -> Geometry {
        wkt.parse().unwrap()
    }

    fn part(
        layer: LayerId,
        feature: FeatureId,
        indices: &[usize],
        is_reversed: bool,
    ) -> CommonPart {
        CommonPart {
            layer,
            feature,
            vertex_indices: indices.to_vec(),
            is_reversed,
        }
    }

    #[test]
    fn edits_commit_one_undo_entry_per_layer() {
        let mut store = MemoryStore::new();
        let lines = store.add_project_layer("lines");
        let others = store.add_project_layer("others");
        let a = store.add_feature(lines, geom("LINESTRING(0 0, 1 1, 2 2)")).unwrap();
        let b = store.add_feature(lines, geom("LINESTRING(2 2, 1 1, 0 1)")).unwrap();
        let c = store.add_feature(others, geom("LINESTRING(2 2, 3 3)")).unwrap();

        let parts = [part(lines, a, &[1, 2], false), part(lines, b, &[1, 0], true)];
        let edges = [Edge {
            layer: others,
            feature: c,
            vertex_index: 0,
            is_start: false,
        }];
        let replacement = Replacement::Line(LineString::from_xy(&[(1.5, 1.0), (2.5, 2.0)]));
        MakeReshapeEdits::new(&parts, &edges, &replacement)
            .execute(&mut store)
            .unwrap();

        assert_eq!(store.geometry(lines, a).unwrap(), &geom("LINESTRING(0 0, 1.5 1, 2.5 2)"));
        assert_eq!(store.geometry(lines, b).unwrap(), &geom("LINESTRING(2.5 2, 1.5 1, 0 1)"));
        assert_eq!(store.geometry(others, c).unwrap(), &geom("LINESTRING(2.5 2, 3 3)"));

        for layer in [lines, others] {
            assert!(!store.is_edit_transaction_active(layer));
            let stack = store.undo_stack(layer).unwrap();
            assert_eq!(stack.len(), 1);
            assert_eq!(stack[0].label, "Reshape segment");
        }
    }

    #[test]
    fn custom_label() {
        let mut store = MemoryStore::new();
        let layer = store.add_project_layer("lines");
        let a = store.add_feature(layer, geom("LINESTRING(0 0, 1 1)")).unwrap();
        let replacement = Replacement::Point(Point::new(0.5, 0.5));
        let edges = [Edge {
            layer,
            feature: a,
            vertex_index: 1,
            is_start: true,
        }];
        MakeReshapeEdits::new(&[], &edges, &replacement)
            .with_params(EditParams {
                label: "Move end".into(),
            })
            .execute(&mut store)
            .unwrap();
        assert_eq!(store.undo_stack(layer).unwrap()[0].label, "Move end");
        assert_eq!(store.geometry(layer, a).unwrap(), &geom("LINESTRING(0 0, 0.5 0.5)"));
    }

    #[test]
    fn both_ends_of_one_feature_move() {
        let mut store = MemoryStore::new();
        let layer = store.add_project_layer("lines");
        let a = store
            .add_feature(layer, geom("LINESTRING(1 1, 0 3, 2 2)"))
            .unwrap();
        let edges = [
            Edge {
                layer,
                feature: a,
                vertex_index: 0,
                is_start: true,
            },
            Edge {
                layer,
                feature: a,
                vertex_index: 2,
                is_start: false,
            },
        ];
        let replacement = Replacement::Line(LineString::from_xy(&[(1.1, 1.1), (2.2, 2.2)]));
        MakeReshapeEdits::new(&[], &edges, &replacement)
            .execute(&mut store)
            .unwrap();
        assert_eq!(
            store.geometry(layer, a).unwrap(),
            &geom("LINESTRING(1.1 1.1, 0 3, 2.2 2.2)")
        );
    }

    #[test]
    fn failure_rolls_back_to_non_editable() {
        let mut store = MemoryStore::new();
        let layer = store.add_project_layer("lines");
        let a = store.add_feature(layer, geom("LINESTRING(0 0, 1 1, 2 2)")).unwrap();
        let b = store.add_feature(layer, geom("LINESTRING(0 0, 1 1)")).unwrap();

        let parts = [part(layer, a, &[1, 2], false), part(layer, b, &[1, 2], false)];
        let replacement = Replacement::Line(LineString::from_xy(&[(2.0, 2.0), (3.0, 3.0)]));
        let err = MakeReshapeEdits::new(&parts, &[], &replacement)
            .execute(&mut store)
            .unwrap_err();

        assert!(matches!(
            err,
            ReshapeError::Transformation(TransformationError::DeleteVertex { index: 4, .. })
        ));
        assert!(!store.is_editable(layer));
        assert!(!store.is_edit_transaction_active(layer));
        assert_eq!(store.geometry(layer, a).unwrap(), &geom("LINESTRING(0 0, 1 1, 2 2)"));
    }

    #[test]
    fn failure_leaves_caller_transaction_open() {
        let mut store = MemoryStore::new();
        let layer = store.add_project_layer("lines");
        let a = store.add_feature(layer, geom("LINESTRING(0 0, 1 1)")).unwrap();
        store.begin_editable(layer).unwrap();
        store.begin_edit_transaction(layer, "outer").unwrap();

        let parts = [part(layer, a, &[5], false)];
        let replacement = Replacement::Point(Point::new(0.0, 0.0));
        let err = MakeReshapeEdits::new(&parts, &[], &replacement)
            .execute(&mut store)
            .unwrap_err();

        assert!(matches!(
            err,
            ReshapeError::Transformation(TransformationError::MoveVertex { index: 5, .. })
        ));
        assert!(store.is_editable(layer));
        assert!(store.is_edit_transaction_active(layer));
    }

    #[test]
    fn empty_line_replacement_is_rejected() {
        let mut store = MemoryStore::new();
        let layer = store.add_project_layer("lines");
        let replacement = Replacement::Line(LineString::default());
        let err = MakeReshapeEdits::new(&[], &[], &replacement)
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            ReshapeError::Transformation(TransformationError::EmptyReplacement)
        ));
        assert!(!store.is_editable(layer));
    }
}
