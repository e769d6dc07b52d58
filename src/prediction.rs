//! Machine prediction services and merging their output into an asset.

use thiserror::Error;

use crate::error::{EngineError, EngineResult};
use crate::model::{AssetMetadata, Region, RegionType};
use crate::surface::ContentSource;

/// Failures reported by a prediction service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service could not be reached; nothing was changed.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service ran and reported an error.
    #[error("Service error: {0}")]
    Application(String),

    /// The response could not be understood.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Object detector run on the rendered frame of an asset.
#[allow(async_fn_in_trait)]
pub trait Predictor {
    /// Prepare the model. Called before every prediction; cheap once loaded.
    async fn ensure_model_loaded(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Regions detected on `frame`, in the asset's native space.
    async fn predict_regions(&self, frame: &ContentSource, metadata: &AssetMetadata) -> Result<Vec<Region>, ServiceError>;
}

/// Service turning point regions into rectangles.
#[allow(async_fn_in_trait)]
pub trait DotToRect {
    async fn ensure_connected(&self) -> Result<(), ServiceError>;

    /// Converted regions. A returned region reusing an input id replaces it.
    async fn process(&self, metadata: &AssetMetadata) -> Result<Vec<Region>, ServiceError>;
}

/// Merge predicted regions into existing ones without losing either.
///
/// A prediction sharing an id with an existing region replaces it in place.
/// Any other prediction is appended unless a region with an identical
/// bounding box is already there.
pub fn merge_predictions(existing: &[Region], predicted: &[Region]) -> Vec<Region> {
    let mut merged: Vec<Region> = existing
        .iter()
        .map(|region| {
            predicted
                .iter()
                .find(|p| p.id == region.id)
                .cloned()
                .unwrap_or_else(|| region.clone())
        })
        .collect();

    for prediction in predicted {
        if merged.iter().any(|r| r.id == prediction.id) {
            continue;
        }
        let duplicate = merged
            .iter()
            .any(|r| r.bounding_box.approx_eq(&prediction.bounding_box));
        if !duplicate {
            merged.push(prediction.clone());
        }
    }
    merged
}

/// Drop predicted class names unless the project wants them as tags.
pub fn prepare_predictions(mut predicted: Vec<Region>, predict_tag: bool) -> Vec<Region> {
    if !predict_tag {
        for region in &mut predicted {
            region.tags.clear();
        }
    }
    predicted
}

/// Metadata with predictions merged in and the asset marked predicted.
pub fn apply_predictions(metadata: &AssetMetadata, predicted: &[Region]) -> AssetMetadata {
    let mut updated = metadata.clone();
    updated.regions = merge_predictions(&metadata.regions, predicted);
    updated.asset.predicted = true;
    log::debug!(
        "🤖 Merged {} prediction(s) into {}: {} -> {} region(s)",
        predicted.len(),
        metadata.asset.id,
        metadata.regions.len(),
        updated.regions.len()
    );
    updated
}

/// Dot-to-rect needs at least one point region to work from.
pub fn ensure_point_regions(metadata: &AssetMetadata) -> EngineResult<()> {
    if metadata.has_region_type(RegionType::Point) {
        Ok(())
    } else {
        Err(EngineError::NoPointRegions)
    }
}
