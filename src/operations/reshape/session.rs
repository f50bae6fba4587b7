use tracing::{debug, warn};

use crate::error::{StoreError, TransformationError};
use crate::topology::{FeatureStore, LayerId};

/// Layers a single reshape call opened transactions on or made editable.
///
/// Owned by one [`super::MakeReshapeEdits`] run. Only what is recorded here
/// is committed or rolled back at the end; transactions the caller already
/// had open are left alone.
#[derive(Debug)]
pub struct EditSession {
    label: String,
    opened: Vec<LayerId>,
    made_editable: Vec<LayerId>,
}

impl EditSession {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            opened: Vec::new(),
            made_editable: Vec::new(),
        }
    }

    /// Layers this session opened a transaction on.
    #[must_use]
    pub fn opened(&self) -> &[LayerId] {
        &self.opened
    }

    /// Makes sure `layer` has an active edit transaction.
    ///
    /// An already active transaction is reused. Otherwise the layer is made
    /// editable if needed and a transaction is opened and recorded.
    ///
    /// # Errors
    ///
    /// Returns `TransformationError::StartEditing` or
    /// `TransformationError::BeginTransaction` if the store refuses.
    pub fn ensure_transaction<S>(
        &mut self,
        store: &mut S,
        layer: LayerId,
    ) -> Result<(), TransformationError>
    where
        S: FeatureStore + ?Sized,
    {
        if store.is_edit_transaction_active(layer) {
            return Ok(());
        }
        if !store.is_editable(layer) {
            store
                .begin_editable(layer)
                .map_err(|source| TransformationError::StartEditing { layer, source })?;
            self.made_editable.push(layer);
        }
        store
            .begin_edit_transaction(layer, &self.label)
            .map_err(|source| TransformationError::BeginTransaction { layer, source })?;
        debug!(?layer, label = %self.label, "opened edit transaction");
        self.opened.push(layer);
        Ok(())
    }

    /// Commits every transaction this session opened.
    ///
    /// # Errors
    ///
    /// Returns the first store error; the remaining layers are still
    /// committed.
    pub fn commit<S>(self, store: &mut S) -> Result<(), StoreError>
    where
        S: FeatureStore + ?Sized,
    {
        let mut first_error = None;
        for layer in self.opened {
            if let Err(err) = store.commit_edit_transaction(layer) {
                warn!(?layer, error = %err, "could not commit edit transaction");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Discards every transaction this session opened, then returns the
    /// layers it made editable to their non-editable state.
    ///
    /// Failures are logged and skipped.
    pub fn rollback<S>(self, store: &mut S)
    where
        S: FeatureStore + ?Sized,
    {
        for &layer in &self.opened {
            if let Err(err) = store.discard_edit_transaction(layer) {
                warn!(?layer, error = %err, "could not discard edit transaction");
            }
        }
        for &layer in &self.made_editable {
            if let Err(err) = store.rollback_to_non_editable(layer) {
                warn!(?layer, error = %err, "could not roll back editing");
            }
        }
    }
}
