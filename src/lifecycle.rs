//! Asset review state derivation and reviewer overrides.

use crate::model::{Asset, AssetMetadata, AssetState, AssetType, RegionType, TaskStatus};

/// Assets whose state follows their regions. Videos and unknown media keep
/// whatever state they were given.
pub fn is_taggable(asset_type: AssetType) -> bool {
    !matches!(asset_type, AssetType::Unknown | AssetType::Video)
}

/// State of an asset derived from its flags and region content.
///
/// Depends only on the flags and on the set of region types present, never
/// on region order.
pub fn derive_state(metadata: &AssetMetadata) -> AssetState {
    let asset = &metadata.asset;
    if !is_taggable(asset.asset_type) {
        return asset.state;
    }
    if asset.is_disabled {
        AssetState::Disabled
    } else if asset.approved {
        AssetState::Approved
    } else if asset.completed {
        AssetState::Completed
    } else if metadata.regions.is_empty() {
        AssetState::Visited
    } else if metadata.has_region_type(RegionType::Rectangle) {
        AssetState::TaggedRectangle
    } else {
        AssetState::TaggedDot
    }
}

/// Reviewer decision on the active asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
    Disable,
    Complete,
    Comment(String),
}

impl ReviewAction {
    /// State written by the action.
    pub fn target_state(&self) -> AssetState {
        match self {
            ReviewAction::Approve => AssetState::Approved,
            ReviewAction::Reject => AssetState::Rejected,
            ReviewAction::Disable => AssetState::Disabled,
            ReviewAction::Complete => AssetState::Completed,
            ReviewAction::Comment(_) => AssetState::Commented,
        }
    }

    /// Whether the action also marks the asset completed.
    ///
    /// Approving or disabling during review closes the asset.
    fn completes(&self, status: TaskStatus) -> bool {
        match self {
            ReviewAction::Complete => true,
            ReviewAction::Approve | ReviewAction::Disable => status == TaskStatus::Review,
            ReviewAction::Reject | ReviewAction::Comment(_) => false,
        }
    }
}

/// Write a reviewer override onto the asset.
pub fn apply_review_action(asset: &mut Asset, action: &ReviewAction, status: TaskStatus) {
    let state = action.target_state();
    log::debug!("📝 Review {:?} on {}: {} -> {}", action, asset.id, asset.state.name(), state.name());
    asset.state = state;
    asset.is_disabled = state == AssetState::Disabled;
    asset.approved = state == AssetState::Approved;
    asset.completed = action.completes(status);
    if let ReviewAction::Comment(text) = action {
        asset.comment = Some(text.clone());
    }
}

/// List entry of the root asset after `asset` changed.
///
/// The edited asset is its own root when it has no parent. Otherwise the
/// root's state comes from its stored metadata, falling back to the copy
/// carried on the child.
pub fn rollup_root(asset: &Asset, stored_root_state: Option<AssetState>) -> Asset {
    match &asset.parent {
        None => asset.clone(),
        Some(parent) => {
            let mut root = parent.root().clone();
            if let Some(state) = stored_root_state {
                root.state = state;
            }
            root
        }
    }
}
