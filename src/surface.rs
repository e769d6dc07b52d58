//! The externally rendered drawing surface.
//!
//! The canvas drives a [`DrawingSurface`] with frame-space geometry and
//! reads selection and frame size back from it. [`HeadlessSurface`] keeps
//! everything in memory and is used when no renderer is attached.

use std::collections::BTreeMap;

use crate::model::{RegionId, RegionType, Size};
use crate::transform::{RegionData, Viewport};

/// Drawing tool active on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Select and move only.
    #[default]
    None,
    Rect,
    /// Click to place a rectangle of the template size.
    CopyRect,
    Point,
    Polygon,
    Polyline,
}

impl SelectionMode {
    /// Region type produced by this mode, if it draws.
    pub fn region_type(&self) -> Option<RegionType> {
        match self {
            SelectionMode::None => None,
            SelectionMode::Rect | SelectionMode::CopyRect => Some(RegionType::Rectangle),
            SelectionMode::Point => Some(RegionType::Point),
            SelectionMode::Polygon => Some(RegionType::Polygon),
            SelectionMode::Polyline => Some(RegionType::Polyline),
        }
    }
}

/// A tag as the surface renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescriptor {
    pub name: String,
    pub color: String,
}

/// Tags to draw on a region, in region order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagsDescriptor {
    pub tags: Vec<TagDescriptor>,
}

impl TagsDescriptor {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Pixel content the surface paints behind the regions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentSource {
    pub width: f64,
    pub height: f64,
    /// Location the renderer loads the pixels from.
    pub uri: String,
}

impl ContentSource {
    pub fn new(width: f64, height: f64, uri: impl Into<String>) -> Self {
        Self {
            width,
            height,
            uri: uri.into(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Renderer-side drawing surface.
pub trait DrawingSurface {
    /// Replace the background content. Regions are kept.
    fn add_content_source(&mut self, source: ContentSource);

    fn add_region(&mut self, id: &str, region_type: RegionType, data: RegionData, tags: TagsDescriptor);

    fn update_region(&mut self, id: &str, data: RegionData, tags: TagsDescriptor);

    fn update_tags(&mut self, id: &str, tags: TagsDescriptor);

    fn delete_region(&mut self, id: &str);

    fn delete_all_regions(&mut self);

    /// Ids of the regions currently selected on the surface.
    fn selected_region_ids(&self) -> Vec<RegionId>;

    /// Make `id` the only selected region.
    fn select_region(&mut self, id: &str);

    /// Add `id` to the current selection, as a shift-click would.
    fn add_to_selection(&mut self, id: &str);

    fn clear_selection(&mut self);

    /// Switch drawing tool. `template` sizes the copy-rect tool, in frame space.
    fn set_selection_mode(&mut self, mode: SelectionMode, template: Option<Size>);

    /// Current drawing frame size, including zoom.
    fn frame_size(&self) -> Size;

    fn viewport(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);
}

/// A region as held by [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRegion {
    pub region_type: RegionType,
    pub data: RegionData,
    pub tags: TagsDescriptor,
}

/// In-memory surface with no renderer attached.
///
/// The unzoomed frame matches the content size unless set explicitly.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    content: Option<ContentSource>,
    base_frame: Option<Size>,
    regions: BTreeMap<RegionId, SurfaceRegion>,
    order: Vec<RegionId>,
    selected: Vec<RegionId>,
    mode: SelectionMode,
    template: Option<Size>,
    viewport: Viewport,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the unzoomed frame size, as a renderer fitting content to a widget would.
    pub fn with_base_frame(mut self, size: Size) -> Self {
        self.base_frame = Some(size);
        self
    }

    pub fn content(&self) -> Option<&ContentSource> {
        self.content.as_ref()
    }

    pub fn region(&self, id: &str) -> Option<&SurfaceRegion> {
        self.regions.get(id)
    }

    /// Region ids in drawing order.
    pub fn region_ids(&self) -> &[RegionId] {
        &self.order
    }

    pub fn region_count(&self) -> usize {
        self.order.len()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn template(&self) -> Option<Size> {
        self.template
    }

    fn base(&self) -> Size {
        self.base_frame
            .or_else(|| self.content.as_ref().map(ContentSource::size))
            .unwrap_or_default()
    }
}

impl DrawingSurface for HeadlessSurface {
    fn add_content_source(&mut self, source: ContentSource) {
        self.content = Some(source);
    }

    fn add_region(&mut self, id: &str, region_type: RegionType, data: RegionData, tags: TagsDescriptor) {
        if !self.regions.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.regions.insert(
            id.to_string(),
            SurfaceRegion {
                region_type,
                data,
                tags,
            },
        );
    }

    fn update_region(&mut self, id: &str, data: RegionData, tags: TagsDescriptor) {
        if let Some(region) = self.regions.get_mut(id) {
            region.data = data;
            region.tags = tags;
        }
    }

    fn update_tags(&mut self, id: &str, tags: TagsDescriptor) {
        if let Some(region) = self.regions.get_mut(id) {
            region.tags = tags;
        }
    }

    fn delete_region(&mut self, id: &str) {
        if self.regions.remove(id).is_some() {
            self.order.retain(|r| r != id);
        }
        self.selected.retain(|r| r != id);
    }

    fn delete_all_regions(&mut self) {
        self.regions.clear();
        self.order.clear();
        self.selected.clear();
    }

    fn selected_region_ids(&self) -> Vec<RegionId> {
        self.selected.clone()
    }

    fn select_region(&mut self, id: &str) {
        if self.regions.contains_key(id) {
            self.selected = vec![id.to_string()];
        }
    }

    fn add_to_selection(&mut self, id: &str) {
        if self.regions.contains_key(id) && !self.selected.iter().any(|r| r == id) {
            self.selected.push(id.to_string());
        }
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn set_selection_mode(&mut self, mode: SelectionMode, template: Option<Size>) {
        self.mode = mode;
        self.template = template;
    }

    fn frame_size(&self) -> Size {
        self.viewport.frame_size(self.base())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
