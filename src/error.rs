//! Engine error taxonomy.
//!
//! Each concern has its own error enum; [`EngineError`] wraps them for the
//! operations on the canvas and the session. Permission denials by the
//! editing context are not errors and never appear here.

use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::persistence::PersistenceError;
use crate::prediction::ServiceError;
use crate::transform::TransformError;

/// Application error codes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
    CanvasError,
    PasteRegionTooBig,
    UntaggedRegions,
    EmptyRegion,
    NoPointRegions,
    ServiceUnavailable,
    ActiveLearningPredictionError,
    Persistence,
    Clipboard,
    OverloadedKeyBinding,
}

impl ErrorCode {
    /// Stable identifier used as the localization key.
    pub fn key(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "unknown",
            ErrorCode::CanvasError => "canvasError",
            ErrorCode::PasteRegionTooBig => "pasteRegionTooBig",
            ErrorCode::UntaggedRegions => "untaggedRegions",
            ErrorCode::EmptyRegion => "emptyRegion",
            ErrorCode::NoPointRegions => "noPointRegions",
            ErrorCode::ServiceUnavailable => "serviceUnavailable",
            ErrorCode::ActiveLearningPredictionError => "activeLearningPredictionError",
            ErrorCode::Persistence => "persistence",
            ErrorCode::Clipboard => "clipboard",
            ErrorCode::OverloadedKeyBinding => "overloadedKeyBinding",
        }
    }
}

/// Errors returned by canvas and session operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A drawn primitive had no extent
    #[error("Drawn region is empty")]
    EmptyRegion,

    /// Some regions on the active asset carry no tag
    #[error("{count} region(s) have no tag")]
    UntaggedRegions {
        /// Number of untagged regions
        count: usize,
    },

    /// A pasted region does not fit anywhere on the asset
    #[error("Region {id} is too big to paste or has no free position")]
    PasteRegionTooBig {
        /// Id of the clipboard region that could not be placed
        id: String,
    },

    /// Dot-to-rect was requested for an asset without point regions
    #[error("You need dots on the asset before converting them to rectangles")]
    NoPointRegions,

    /// No asset is open
    #[error("No active asset")]
    NoActiveAsset,

    /// The source size of the asset is unknown or invalid
    #[error("Asset {asset_id} has no usable size")]
    MissingAssetSize {
        /// The asset without size
        asset_id: String,
    },

    /// A service endpoint was needed but none is configured
    #[error("Service not configured: {0}")]
    ServiceNotConfigured(String),

    /// Transient failure reaching a prediction service
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The prediction service answered with an application error
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// Two toolbar items claim the same accelerator in one context
    #[error("Accelerator '{accelerator}' is already bound to {existing}")]
    OverloadedKeyBinding {
        /// The clashing accelerator
        accelerator: String,
        /// Name of the item already bound to it
        existing: String,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

impl EngineError {
    /// Create an untagged-regions error.
    pub fn untagged(count: usize) -> Self {
        Self::UntaggedRegions { count }
    }

    /// Create a paste error for the given clipboard region.
    pub fn paste_too_big(id: impl Into<String>) -> Self {
        Self::PasteRegionTooBig { id: id.into() }
    }

    /// The user-facing code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::EmptyRegion => ErrorCode::EmptyRegion,
            EngineError::UntaggedRegions { .. } => ErrorCode::UntaggedRegions,
            EngineError::PasteRegionTooBig { .. } => ErrorCode::PasteRegionTooBig,
            EngineError::NoPointRegions => ErrorCode::NoPointRegions,
            EngineError::NoActiveAsset | EngineError::MissingAssetSize { .. } => {
                ErrorCode::CanvasError
            }
            EngineError::Transform(_) => ErrorCode::CanvasError,
            EngineError::ServiceNotConfigured(_) | EngineError::ServiceUnavailable(_) => {
                ErrorCode::ServiceUnavailable
            }
            EngineError::PredictionFailed(_) => ErrorCode::ActiveLearningPredictionError,
            EngineError::OverloadedKeyBinding { .. } => ErrorCode::OverloadedKeyBinding,
            EngineError::Persistence(_) => ErrorCode::Persistence,
            EngineError::Clipboard(_) => ErrorCode::Clipboard,
        }
    }

    /// Transient errors leave all state untouched and may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::ServiceUnavailable(_))
    }
}

impl From<ServiceError> for EngineError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(msg) => EngineError::ServiceUnavailable(msg),
            ServiceError::Application(msg) => EngineError::PredictionFailed(msg),
            ServiceError::Malformed(msg) => {
                EngineError::PredictionFailed(format!("malformed response: {}", msg))
            }
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_codes() {
        let transient: EngineError = ServiceError::Unavailable("timeout".into()).into();
        assert_eq!(transient.code(), ErrorCode::ServiceUnavailable);
        assert!(transient.is_transient());

        let failed: EngineError = ServiceError::Application("bad model".into()).into();
        assert_eq!(failed.code(), ErrorCode::ActiveLearningPredictionError);
        assert!(!failed.is_transient());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(EngineError::untagged(2).to_string(), "2 region(s) have no tag");
        assert_eq!(
            EngineError::paste_too_big("r1").code(),
            ErrorCode::PasteRegionTooBig
        );
        assert_eq!(ErrorCode::PasteRegionTooBig.key(), "pasteRegionTooBig");
    }
}
