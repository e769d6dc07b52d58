//! Stroke canvas for pixel-level annotation.
//!
//! Strokes are collected point by point in source space and stored as
//! polyline regions. There is no drawing surface; the renderer reads the
//! regions back directly.

use crate::context::{ContextGate, EditingContext, is_mutation_allowed};
use crate::error::{EngineError, EngineResult};
use crate::model::{AttributeKey, Point, Project, Region, RegionId, RegionType, new_region_id};
use crate::store::RegionStore;
use crate::surface::SelectionMode;
use crate::tags::{LockedTags, add_all_if_missing, apply_attribute, apply_tag_to_regions, default_attributes};

use super::{AnnotationCanvas, CanvasEvent};

/// Points of the stroke being drawn.
#[derive(Debug, Clone, Default)]
struct StrokeState {
    points: Vec<Point>,
    is_drawing: bool,
}

impl StrokeState {
    fn start(&mut self, point: Point) {
        self.points.clear();
        self.points.push(point);
        self.is_drawing = true;
    }

    fn add_point(&mut self, point: Point) {
        // skip repeats from a pointer that did not move
        if self.points.last().is_some_and(|last| last.approx_eq(&point)) {
            return;
        }
        self.points.push(point);
    }

    fn finish(&mut self) -> Option<Vec<Point>> {
        if !self.is_drawing {
            return None;
        }
        self.is_drawing = false;
        Some(std::mem::take(&mut self.points))
    }
}

/// Canvas holding freehand strokes.
///
/// Mutations go through the same [`ContextGate`] as the vector canvas and
/// queue [`CanvasEvent`]s for the owner.
#[derive(Debug, Clone, Default)]
pub struct PixelCanvas {
    store: RegionStore,
    gate: ContextGate,
    selected: Vec<RegionId>,
    mode: SelectionMode,
    stroke: StrokeState,
    locked: LockedTags,
    single_tag_mode: bool,
    attribute_keys: Vec<AttributeKey>,
    events: Vec<CanvasEvent>,
}

impl PixelCanvas {
    pub fn new(project: &Project, context: EditingContext, single_tag_mode: bool) -> Self {
        Self {
            gate: ContextGate::new(context),
            single_tag_mode,
            attribute_keys: project.attribute_keys.clone(),
            ..Default::default()
        }
    }

    /// Start from previously stored strokes. Other region types are skipped.
    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        let strokes = regions
            .into_iter()
            .filter(|r| r.region_type == RegionType::Polyline)
            .collect();
        self.store = RegionStore::from_regions(strokes);
        self
    }

    pub fn regions(&self) -> &[Region] {
        self.store.as_slice()
    }

    pub fn context(&self) -> EditingContext {
        self.gate.context()
    }

    pub fn set_context(&mut self, context: EditingContext) {
        if self.gate.set_context(context) && !is_mutation_allowed(context) {
            self.cancel_stroke();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn clear_dirty(&mut self) {
        self.store.clear_dirty();
    }

    pub fn untagged_count(&self) -> usize {
        self.store.untagged().count()
    }

    /// Take the queued notifications.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing
    }

    pub fn locked_tags(&self) -> &LockedTags {
        &self.locked
    }

    pub fn set_locked_tags(&mut self, locked: LockedTags) {
        self.locked = locked;
    }

    fn changed(&mut self) {
        self.events.push(CanvasEvent::AssetMetadataChanged);
    }

    fn selection_changed(&mut self) {
        let selected = self.selected_regions();
        self.events.push(CanvasEvent::SelectionChanged(selected));
    }

    /// Lock or unlock a tag. A newly locked tag is added to the selection.
    pub fn toggle_lock(&mut self, tag: &str) -> bool {
        if !self.gate.allows("lock tag") {
            return false;
        }
        if self.locked.toggle(tag) {
            self.tag_selection_with_locked();
        }
        true
    }

    /// Add every locked tag to the selected strokes.
    fn tag_selection_with_locked(&mut self) {
        let locked = self.locked.as_slice().to_vec();
        let changed: Vec<Region> = self
            .selected_regions()
            .into_iter()
            .filter_map(|mut region| {
                let tags = add_all_if_missing(&region.tags, &locked);
                (tags != region.tags).then(|| {
                    region.tags = tags;
                    region
                })
            })
            .collect();
        if self.store.update(&changed) > 0 {
            self.changed();
        }
    }

    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if self.mode != SelectionMode::Polyline || !self.gate.allows("paint") {
            return false;
        }
        self.stroke.start(point);
        true
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if self.stroke.is_drawing {
            self.stroke.add_point(point);
        }
    }

    /// Finish the stroke as a polyline region carrying the locked tags.
    ///
    /// A stroke that never left its first point is [`EngineError::EmptyRegion`].
    pub fn end_stroke(&mut self) -> EngineResult<Option<Region>> {
        let Some(points) = self.stroke.finish() else {
            return Ok(None);
        };
        if !self.gate.allows("paint") {
            return Ok(None);
        }
        if points.len() < RegionType::Polyline.min_points() {
            return Err(EngineError::EmptyRegion);
        }
        let mut region = Region::with_vertices(new_region_id(), RegionType::Polyline, points)
            .with_tags(self.locked.as_slice().iter().cloned());
        region.attributes = default_attributes(&self.attribute_keys);
        log::debug!("🖌️ Stroke {} with {} point(s)", region.id, region.points.len());
        self.selected = vec![region.id.clone()];
        self.store.push(region.clone());
        self.changed();
        self.selection_changed();
        Ok(Some(region))
    }

    pub fn cancel_stroke(&mut self) {
        self.stroke = StrokeState::default();
    }

    /// Select a stroke. Locked tags are added to it, as on the vector canvas.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.store.contains(id) || !self.gate.allows("select") {
            return false;
        }
        self.selected = vec![id.to_string()];
        if !self.locked.is_empty() {
            self.tag_selection_with_locked();
        }
        self.selection_changed();
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Region> {
        if !self.gate.allows("delete") {
            return None;
        }
        self.selected.retain(|s| s != id);
        let removed = self.store.remove(id)?;
        self.changed();
        self.selection_changed();
        Some(removed)
    }
}

impl AnnotationCanvas for PixelCanvas {
    fn add_regions(&mut self, regions: Vec<Region>) -> usize {
        if !self.gate.allows("add regions") {
            return 0;
        }
        let mut added = 0;
        for region in regions {
            if region.region_type != RegionType::Polyline {
                log::debug!("Pixel canvas skips {} region {}", region.region_type.name(), region.id);
                continue;
            }
            self.store.push(region);
            added += 1;
        }
        if added > 0 {
            self.changed();
        }
        added
    }

    fn selected_regions(&self) -> Vec<Region> {
        self.selected
            .iter()
            .filter_map(|id| self.store.get(id).cloned())
            .collect()
    }

    fn set_selection_mode(&mut self, mode: SelectionMode) -> bool {
        if !matches!(mode, SelectionMode::None | SelectionMode::Polyline) {
            return false;
        }
        if mode == SelectionMode::Polyline && !self.gate.allows("paint") {
            return false;
        }
        if mode == SelectionMode::None {
            self.cancel_stroke();
        }
        self.mode = mode;
        true
    }

    fn apply_tag(&mut self, tag: &str) -> bool {
        if !self.gate.allows("tag") {
            return false;
        }
        let mut selected = self.selected_regions();
        if !apply_tag_to_regions(&mut selected, tag, &self.locked, self.single_tag_mode) {
            return false;
        }
        if self.store.update(&selected) == 0 {
            return false;
        }
        self.changed();
        true
    }

    fn apply_attribute(&mut self, key: &str, value: &str) -> bool {
        if !self.gate.allows("attribute") {
            return false;
        }
        let mut selected = self.selected_regions();
        if !apply_attribute(&mut selected, &self.attribute_keys, key, value) {
            return false;
        }
        if self.store.update(&selected) == 0 {
            return false;
        }
        self.changed();
        true
    }
}
