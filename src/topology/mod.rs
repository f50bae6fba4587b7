//! Feature store contract and the in-memory reference store.

pub mod layer;
pub mod memory;

pub use layer::{FeatureData, LayerData, UndoEntry};
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::geometry::Geometry;
use crate::operations::query::bounding_box::Aabb;

slotmap::new_key_type! {
    /// Unique identifier for a layer in a feature store.
    pub struct LayerId;
}

slotmap::new_key_type! {
    /// Identifier for a feature, unique within its layer.
    pub struct FeatureId;
}

/// Access to layered features, spatial lookup and edit transactions.
///
/// Resolution only reads through this trait; reshaping also writes
/// geometries and drives the per-layer edit state.
pub trait FeatureStore {
    /// Layers that take part in topological editing, in project order.
    fn project_layers(&self) -> Vec<LayerId>;

    /// Whether topological editing is enabled for the project.
    fn topological_editing(&self) -> bool;

    /// Returns the stored geometry of a feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer or feature does not exist.
    fn geometry(&self, layer: LayerId, feature: FeatureId) -> Result<&Geometry, StoreError>;

    /// Features whose bounding box intersects `rect`, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer does not exist.
    fn features_in_rect(&self, layer: LayerId, rect: &Aabb) -> Result<Vec<FeatureId>, StoreError>;

    /// Replaces the geometry of a feature on an editable layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not editable or the feature does
    /// not exist.
    fn replace_geometry(
        &mut self,
        layer: LayerId,
        feature: FeatureId,
        geometry: Geometry,
    ) -> Result<(), StoreError>;

    fn is_editable(&self, layer: LayerId) -> bool;

    /// Switches a layer into editing mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer cannot be edited.
    fn begin_editable(&mut self, layer: LayerId) -> Result<(), StoreError>;

    fn is_edit_transaction_active(&self, layer: LayerId) -> bool;

    /// Opens an undoable edit transaction labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not editable or a transaction is
    /// already open.
    fn begin_edit_transaction(&mut self, layer: LayerId, label: &str) -> Result<(), StoreError>;

    /// Closes the open transaction, keeping its changes as one undo entry.
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn commit_edit_transaction(&mut self, layer: LayerId) -> Result<(), StoreError>;

    /// Closes the open transaction, restoring the geometries it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn discard_edit_transaction(&mut self, layer: LayerId) -> Result<(), StoreError>;

    /// Leaves editing mode, dropping every change made since editing began.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not editable.
    fn rollback_to_non_editable(&mut self, layer: LayerId) -> Result<(), StoreError>;
}
