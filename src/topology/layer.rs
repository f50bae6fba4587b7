use std::collections::HashMap;

use slotmap::SlotMap;

use super::{FeatureId, LayerId};
use crate::error::StoreError;
use crate::geometry::Geometry;
use crate::operations::query::bounding_box::{Aabb, BoundingBox};

/// Label of the undo entry recorded for a geometry change made outside
/// an explicit edit transaction.
pub const IMPLICIT_CHANGE_LABEL: &str = "Change geometry";

/// A stored feature and its cached bounding box.
#[derive(Debug, Clone)]
pub struct FeatureData {
    pub geometry: Geometry,
    /// `None` for empty geometries.
    pub bbox: Option<Aabb>,
}

impl FeatureData {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let bbox = BoundingBox::new(&geometry).execute();
        Self { geometry, bbox }
    }
}

/// One undoable step: the geometries as they were before the step.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub label: String,
    pub before: HashMap<FeatureId, Geometry>,
}

#[derive(Debug, Default)]
struct EditBuffer {
    /// Geometries at the moment editing began, recorded on first change.
    originals: HashMap<FeatureId, Geometry>,
    transaction: Option<UndoEntry>,
    undo_stack: Vec<UndoEntry>,
}

/// A layer of features with its editing state.
#[derive(Debug)]
pub struct LayerData {
    pub name: String,
    features: SlotMap<FeatureId, FeatureData>,
    order: Vec<FeatureId>,
    edit: Option<EditBuffer>,
}

impl LayerData {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: SlotMap::with_key(),
            order: Vec::new(),
            edit: None,
        }
    }

    pub fn add_feature(&mut self, geometry: Geometry) -> FeatureId {
        let id = self.features.insert(FeatureData::new(geometry));
        self.order.push(id);
        id
    }

    /// Feature ids in insertion order.
    #[must_use]
    pub fn feature_ids(&self) -> &[FeatureId] {
        &self.order
    }

    /// Returns the feature, or an error if it is not on this layer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FeatureNotFound` if the feature does not exist.
    pub fn feature(&self, layer: LayerId, id: FeatureId) -> Result<&FeatureData, StoreError> {
        self.features
            .get(id)
            .ok_or(StoreError::FeatureNotFound { layer, feature: id })
    }

    pub(crate) fn features_in_rect(&self, rect: &Aabb) -> Vec<FeatureId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| {
                self.features
                    .get(id)
                    .and_then(|f| f.bbox.as_ref())
                    .is_some_and(|bbox| bbox.intersects(rect))
            })
            .collect()
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.edit.is_some()
    }

    #[must_use]
    pub fn is_transaction_active(&self) -> bool {
        self.edit.as_ref().is_some_and(|e| e.transaction.is_some())
    }

    /// Undo entries, oldest first. Empty when the layer is not editable.
    #[must_use]
    pub fn undo_stack(&self) -> &[UndoEntry] {
        self.edit.as_ref().map_or(&[], |e| e.undo_stack.as_slice())
    }

    pub(crate) fn begin_editable(&mut self) {
        if self.edit.is_none() {
            self.edit = Some(EditBuffer::default());
        }
    }

    pub(crate) fn replace_geometry(
        &mut self,
        layer: LayerId,
        id: FeatureId,
        geometry: Geometry,
    ) -> Result<(), StoreError> {
        let edit = self.edit.as_mut().ok_or(StoreError::NotEditable(layer))?;
        let feature = self
            .features
            .get_mut(id)
            .ok_or(StoreError::FeatureNotFound { layer, feature: id })?;

        let previous = std::mem::replace(feature, FeatureData::new(geometry)).geometry;
        edit.originals.entry(id).or_insert_with(|| previous.clone());
        match edit.transaction.as_mut() {
            Some(transaction) => {
                transaction.before.entry(id).or_insert(previous);
            }
            None => edit.undo_stack.push(UndoEntry {
                label: IMPLICIT_CHANGE_LABEL.to_string(),
                before: HashMap::from([(id, previous)]),
            }),
        }
        Ok(())
    }

    pub(crate) fn begin_transaction(
        &mut self,
        layer: LayerId,
        label: &str,
    ) -> Result<(), StoreError> {
        let edit = self.edit.as_mut().ok_or(StoreError::NotEditable(layer))?;
        if edit.transaction.is_some() {
            return Err(StoreError::TransactionActive(layer));
        }
        edit.transaction = Some(UndoEntry {
            label: label.to_string(),
            before: HashMap::new(),
        });
        Ok(())
    }

    pub(crate) fn commit_transaction(&mut self, layer: LayerId) -> Result<(), StoreError> {
        let edit = self.edit.as_mut().ok_or(StoreError::NoTransaction(layer))?;
        let transaction = edit
            .transaction
            .take()
            .ok_or(StoreError::NoTransaction(layer))?;
        if !transaction.before.is_empty() {
            edit.undo_stack.push(transaction);
        }
        Ok(())
    }

    pub(crate) fn discard_transaction(&mut self, layer: LayerId) -> Result<(), StoreError> {
        let transaction = self
            .edit
            .as_mut()
            .and_then(|e| e.transaction.take())
            .ok_or(StoreError::NoTransaction(layer))?;
        self.restore(transaction.before);
        Ok(())
    }

    pub(crate) fn rollback(&mut self, layer: LayerId) -> Result<(), StoreError> {
        let edit = self.edit.take().ok_or(StoreError::NotEditable(layer))?;
        self.restore(edit.originals);
        Ok(())
    }

    pub(crate) fn undo(&mut self, layer: LayerId) -> Result<Option<String>, StoreError> {
        let edit = self.edit.as_mut().ok_or(StoreError::NotEditable(layer))?;
        if edit.transaction.is_some() {
            return Err(StoreError::TransactionActive(layer));
        }
        let Some(entry) = edit.undo_stack.pop() else {
            return Ok(None);
        };
        self.restore(entry.before);
        Ok(Some(entry.label))
    }

    pub(crate) fn commit_changes(&mut self, layer: LayerId) -> Result<(), StoreError> {
        if self.is_transaction_active() {
            return Err(StoreError::TransactionActive(layer));
        }
        self.edit.take().ok_or(StoreError::NotEditable(layer))?;
        Ok(())
    }

    fn restore(&mut self, geometries: HashMap<FeatureId, Geometry>) {
        for (id, geometry) in geometries {
            if let Some(feature) = self.features.get_mut(id) {
                *feature = FeatureData::new(geometry);
            }
        }
    }
}
