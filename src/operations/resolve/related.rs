use tracing::debug;

use crate::error::Result;
use crate::operations::query::{BoundingBox, Intersects};
use crate::topology::{FeatureId, FeatureStore, LayerId};

/// A feature found to intersect the trigger feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelatedFeature {
    pub layer: LayerId,
    pub feature: FeatureId,
}

/// Finds the features of candidate layers that intersect a feature.
///
/// Candidates default to the project layers when topological editing is
/// enabled, and to no layers otherwise.
pub struct FindRelatedFeatures {
    layer: LayerId,
    feature: FeatureId,
    candidate_layers: Option<Vec<LayerId>>,
}

impl FindRelatedFeatures {
    /// Creates a new `FindRelatedFeatures` query.
    #[must_use]
    pub fn new(layer: LayerId, feature: FeatureId) -> Self {
        Self {
            layer,
            feature,
            candidate_layers: None,
        }
    }

    /// Searches exactly these layers instead of the project default.
    #[must_use]
    pub fn with_candidate_layers(mut self, layers: Vec<LayerId>) -> Self {
        self.candidate_layers = Some(layers);
        self
    }

    /// Executes the query.
    ///
    /// Results follow layer order, then the store's feature order. The
    /// trigger feature itself is never returned.
    ///
    /// # Errors
    ///
    /// Returns a store error if the trigger feature or a candidate layer
    /// does not exist.
    pub fn execute<S>(&self, store: &S) -> Result<Vec<RelatedFeature>>
    where
        S: FeatureStore + ?Sized,
    {
        let layers = match &self.candidate_layers {
            Some(layers) => layers.clone(),
            None if store.topological_editing() => store.project_layers(),
            None => Vec::new(),
        };

        let geometry = store.geometry(self.layer, self.feature)?;
        let Some(rect) = BoundingBox::new(geometry).execute() else {
            return Ok(Vec::new());
        };
        let prepared = Intersects::new(geometry);

        let mut related = Vec::new();
        for layer in layers {
            for feature in store.features_in_rect(layer, &rect)? {
                if layer == self.layer && feature == self.feature {
                    continue;
                }
                if prepared.execute(store.geometry(layer, feature)?) {
                    related.push(RelatedFeature { layer, feature });
                }
            }
        }
        debug!(count = related.len(), "found related features");
        Ok(related)
    }
}
