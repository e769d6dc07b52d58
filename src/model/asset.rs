//! Assets, their review state and the per-asset metadata document.

use serde::{Deserialize, Serialize};

use super::region::{Region, RegionType};

/// Default zoom scale of a freshly opened asset.
pub const DEFAULT_ZOOM_SCALE: f64 = 1.0;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Kind of media an asset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
    #[default]
    Unknown,
    Image,
    Video,
    VideoFrame,
    TfRecord,
}

/// Review progress of an asset.
///
/// Serialized as its integer code so stored metadata stays comparable with
/// the numeric ordering used by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum AssetState {
    Disabled,
    #[default]
    NotVisited,
    Visited,
    TaggedDot,
    TaggedRectangle,
    Commented,
    Rejected,
    Approved,
    Completed,
}

impl AssetState {
    pub fn code(&self) -> i8 {
        match self {
            AssetState::Disabled => -1,
            AssetState::NotVisited => 0,
            AssetState::Visited => 1,
            AssetState::TaggedDot => 2,
            AssetState::TaggedRectangle => 3,
            AssetState::Commented => 4,
            AssetState::Rejected => 5,
            AssetState::Approved => 6,
            AssetState::Completed => 7,
        }
    }

    /// Get the display name for this state.
    pub fn name(&self) -> &'static str {
        match self {
            AssetState::Disabled => "Disabled",
            AssetState::NotVisited => "Not visited",
            AssetState::Visited => "Visited",
            AssetState::TaggedDot => "Tagged (dot)",
            AssetState::TaggedRectangle => "Tagged (rectangle)",
            AssetState::Commented => "Commented",
            AssetState::Rejected => "Rejected",
            AssetState::Approved => "Approved",
            AssetState::Completed => "Completed",
        }
    }
}

impl From<AssetState> for i8 {
    fn from(state: AssetState) -> Self {
        state.code()
    }
}

impl TryFrom<i8> for AssetState {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        Ok(match code {
            -1 => AssetState::Disabled,
            0 => AssetState::NotVisited,
            1 => AssetState::Visited,
            2 => AssetState::TaggedDot,
            3 => AssetState::TaggedRectangle,
            4 => AssetState::Commented,
            5 => AssetState::Rejected,
            6 => AssetState::Approved,
            7 => AssetState::Completed,
            other => return Err(format!("unknown asset state code {}", other)),
        })
    }
}

/// A taggable unit of media.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub state: AssetState,
    pub name: String,
    pub path: String,
    /// Native pixel size; unknown until the media has been read once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Outcome of purification
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub completed: bool,
    /// Root asset this one was derived from (a video for a video frame).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Asset>>,
    /// Set once machine predictions have been merged into the asset.
    #[serde(default)]
    pub predicted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Position within the parent video, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Asset {
    pub fn new(id: impl Into<String>, asset_type: AssetType, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            asset_type,
            path: name.clone(),
            name,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Derive a frame asset of this video at the given timestamp.
    pub fn frame_at(&self, timestamp: f64) -> Asset {
        Asset {
            id: format!("{}#t={}", self.id, timestamp),
            asset_type: AssetType::VideoFrame,
            state: AssetState::NotVisited,
            name: format!("{}#t={}", self.name, timestamp),
            path: format!("{}#t={}", self.path, timestamp),
            size: self.size,
            parent: Some(Box::new(self.root().clone())),
            timestamp: Some(timestamp),
            ..Default::default()
        }
    }

    /// The top-level asset: the parent if any, otherwise this asset.
    pub fn root(&self) -> &Asset {
        match &self.parent {
            Some(parent) => parent.root(),
            None => self,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Screen pan offset of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPos {
    pub left: f64,
    pub top: f64,
}

impl ScreenPos {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Per-asset view state restored when the asset is reopened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkViewData {
    pub zoom_scale: f64,
    pub screen_pos: ScreenPos,
}

impl Default for WorkViewData {
    fn default() -> Self {
        Self {
            zoom_scale: DEFAULT_ZOOM_SCALE,
            screen_pos: ScreenPos::default(),
        }
    }
}

/// Everything stored for one asset: the asset record, its regions and view state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub asset: Asset,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub work_view_data: WorkViewData,
}

impl AssetMetadata {
    /// Fresh metadata for an asset that has never been saved.
    pub fn new(asset: Asset) -> Self {
        Self {
            asset,
            regions: Vec::new(),
            version: crate::VERSION.to_string(),
            work_view_data: WorkViewData::default(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = regions;
        self
    }

    pub fn has_region_type(&self, region_type: RegionType) -> bool {
        self.regions.iter().any(|r| r.region_type == region_type)
    }

    pub fn untagged_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.is_tagged())
    }
}
