use slotmap::SlotMap;

use super::{FeatureId, FeatureStore, LayerData, LayerId, UndoEntry};
use crate::error::StoreError;
use crate::geometry::Geometry;
use crate::operations::query::bounding_box::Aabb;

/// In-memory feature store.
///
/// Layers live in a slotmap arena; each layer keeps its features in
/// insertion order together with a cached bounding box per feature.
#[derive(Debug, Default)]
pub struct MemoryStore {
    layers: SlotMap<LayerId, LayerData>,
    project: Vec<LayerId>,
    topological_editing: bool,
}

impl MemoryStore {
    /// Creates a new, empty store with topological editing disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a layer outside the project and returns its ID.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.layers.insert(LayerData::new(name))
    }

    /// Inserts a layer and appends it to the project layers.
    pub fn add_project_layer(&mut self, name: impl Into<String>) -> LayerId {
        let id = self.add_layer(name);
        self.project.push(id);
        id
    }

    /// Appends an existing layer to the project layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist.
    pub fn add_to_project(&mut self, layer: LayerId) -> Result<(), StoreError> {
        self.layer(layer)?;
        if !self.project.contains(&layer) {
            self.project.push(layer);
        }
        Ok(())
    }

    pub fn set_topological_editing(&mut self, enabled: bool) {
        self.topological_editing = enabled;
    }

    /// Adds a feature to a layer. Works whether or not the layer is being edited.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist.
    pub fn add_feature(
        &mut self,
        layer: LayerId,
        geometry: Geometry,
    ) -> Result<FeatureId, StoreError> {
        Ok(self.layer_mut(layer)?.add_feature(geometry))
    }

    /// Returns the layer data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist.
    pub fn layer(&self, id: LayerId) -> Result<&LayerData, StoreError> {
        self.layers.get(id).ok_or(StoreError::LayerNotFound(id))
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut LayerData, StoreError> {
        self.layers.get_mut(id).ok_or(StoreError::LayerNotFound(id))
    }

    /// Feature ids of a layer in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist.
    pub fn feature_ids(&self, layer: LayerId) -> Result<&[FeatureId], StoreError> {
        Ok(self.layer(layer)?.feature_ids())
    }

    /// Undo entries of a layer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist.
    pub fn undo_stack(&self, layer: LayerId) -> Result<&[UndoEntry], StoreError> {
        Ok(self.layer(layer)?.undo_stack())
    }

    /// Reverts the newest undo entry and returns its label.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist, is not editable or has
    /// an open transaction.
    pub fn undo(&mut self, layer: LayerId) -> Result<Option<String>, StoreError> {
        self.layer_mut(layer)?.undo(layer)
    }

    /// Keeps all edits and leaves editing mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist, is not editable or has
    /// an open transaction.
    pub fn commit_changes(&mut self, layer: LayerId) -> Result<(), StoreError> {
        self.layer_mut(layer)?.commit_changes(layer)
    }
}

impl FeatureStore for MemoryStore {
    fn project_layers(&self) -> Vec<LayerId> {
        self.project.clone()
    }

    fn topological_editing(&self) -> bool {
        self.topological_editing
    }

    fn geometry(&self, layer: LayerId, feature: FeatureId) -> Result<&Geometry, StoreError> {
        Ok(&self.layer(layer)?.feature(layer, feature)?.geometry)
    }

    fn features_in_rect(&self, layer: LayerId, rect: &Aabb) -> Result<Vec<FeatureId>, StoreError> {
        Ok(self.layer(layer)?.features_in_rect(rect))
    }

    fn replace_geometry(
        &mut self,
        layer: LayerId,
        feature: FeatureId,
        geometry: Geometry,
    ) -> Result<(), StoreError> {
        self.layer_mut(layer)?.replace_geometry(layer, feature, geometry)
    }

    fn is_editable(&self, layer: LayerId) -> bool {
        self.layers.get(layer).is_some_and(LayerData::is_editable)
    }

    fn begin_editable(&mut self, layer: LayerId) -> Result<(), StoreError> {
        self.layer_mut(layer)?.begin_editable();
        Ok(())
    }

    fn is_edit_transaction_active(&self, layer: LayerId) -> bool {
        self.layers
            .get(layer)
            .is_some_and(LayerData::is_transaction_active)
    }

    fn begin_edit_transaction(&mut self, layer: LayerId, label: &str) -> Result<(), StoreError> {
        self.layer_mut(layer)?.begin_transaction(layer, label)
    }

    fn commit_edit_transaction(&mut self, layer: LayerId) -> Result<(), StoreError> {
        self.layer_mut(layer)?.commit_transaction(layer)
    }

    fn discard_edit_transaction(&mut self, layer: LayerId) -> Result<(), StoreError> {
        self.layer_mut(layer)?.discard_transaction(layer)
    }

    fn rollback_to_non_editable(&mut self, layer: LayerId) -> Result<(), StoreError> {
        self.layer_mut(layer)?.rollback(layer)
    }
}
