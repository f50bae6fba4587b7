use super::common::{CommonGeometries, ReshapeResult};
use super::related::FindRelatedFeatures;
use crate::error::{Result, TopologyError};
use crate::geometry::Point;
use crate::operations::query::ClosestSegment;
use crate::topology::{FeatureId, FeatureStore, LayerId};

/// Finds the shared segment at a trigger edge and every feature that has
/// to follow it when the segment is reshaped.
pub struct FindSegmentToReshape {
    layer: LayerId,
    feature: FeatureId,
    trigger: (usize, usize),
    candidate_layers: Option<Vec<LayerId>>,
}

impl FindSegmentToReshape {
    /// Creates a new `FindSegmentToReshape` operation for the trigger edge
    /// `(from, to)` given as vertex numbers.
    #[must_use]
    pub fn new(layer: LayerId, feature: FeatureId, trigger: (usize, usize)) -> Self {
        Self {
            layer,
            feature,
            trigger,
            candidate_layers: None,
        }
    }

    /// Creates the operation for the feature's segment closest to `location`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoSegmentAtLocation` if the feature has no
    /// segments, or a store error if it does not exist.
    pub fn at_location<S>(
        layer: LayerId,
        feature: FeatureId,
        location: Point,
        store: &S,
    ) -> Result<Self>
    where
        S: FeatureStore + ?Sized,
    {
        let geometry = store.geometry(layer, feature)?;
        let trigger = ClosestSegment::new(geometry, location)
            .execute()
            .ok_or(TopologyError::NoSegmentAtLocation)?;
        Ok(Self::new(layer, feature, trigger))
    }

    /// Searches these layers for related features instead of the project
    /// default.
    #[must_use]
    pub fn with_candidate_layers(mut self, layers: Vec<LayerId>) -> Self {
        self.candidate_layers = Some(layers);
        self
    }

    #[must_use]
    pub fn trigger(&self) -> (usize, usize) {
        self.trigger
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// See [`FindRelatedFeatures::execute`] and [`CommonGeometries::execute`].
    pub fn execute<S>(&self, store: &S) -> Result<ReshapeResult>
    where
        S: FeatureStore + ?Sized,
    {
        let mut query = FindRelatedFeatures::new(self.layer, self.feature);
        if let Some(layers) = &self.candidate_layers {
            query = query.with_candidate_layers(layers.clone());
        }
        let related = query.execute(store)?;
        CommonGeometries::new(self.layer, self.feature, self.trigger).execute(store, &related)
    }
}
