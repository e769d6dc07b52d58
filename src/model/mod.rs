//! Data models shared by the canvas, the lifecycle rules and the session.

mod asset;
mod project;
mod region;

pub use asset::{
    Asset, AssetMetadata, AssetState, AssetType, DEFAULT_ZOOM_SCALE, ScreenPos, Size,
    WorkViewData,
};
pub use project::{
    ActiveLearningSettings, AttributeKey, DotToRectSettings, Project, TaskStatus, TaskType, Tag,
};
pub use region::{BoundingBox, GEOMETRY_EPSILON, Point, Region, RegionId, RegionType, new_region_id};
