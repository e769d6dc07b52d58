//! Annotation canvas: keeps the drawing surface and the region store of the
//! active asset in step.
//!
//! The surface works in frame space and the store in source space; every
//! crossing goes through [`crate::transform`]. Mutations are checked against
//! the [`ContextGate`] first and are silent no-ops when it denies them.
//! Changes the session has to act on are queued as [`CanvasEvent`]s.

pub mod pixel;

pub use pixel::PixelCanvas;

use crate::clipboard::{Clipboard, duplicate_regions_and_move};
use crate::config::EditorPreferences;
use crate::constants::{DEFAULT_TEMPLATE_HEIGHT, DEFAULT_TEMPLATE_WIDTH};
use crate::context::{ContextGate, EditingContext};
use crate::error::{EngineError, EngineResult};
use crate::model::{Asset, AssetMetadata, Project, Region, RegionId, Size, new_region_id};
use crate::store::RegionStore;
use crate::surface::{ContentSource, DrawingSurface, SelectionMode};
use crate::tags::{LockedTags, add_all_if_missing, apply_tag_to_regions, default_attributes, tags_descriptor};
use crate::transform::{RegionData, Viewport, region_to_frame, try_to_source_space};

// ============================================================================
// Capabilities shared by canvas variants
// ============================================================================

/// Operations every canvas variant offers to the editor.
pub trait AnnotationCanvas {
    /// Add finished regions. Returns how many were added.
    fn add_regions(&mut self, regions: Vec<Region>) -> usize;

    fn selected_regions(&self) -> Vec<Region>;

    /// Switch drawing tool. Returns false if the tool is not available.
    fn set_selection_mode(&mut self, mode: SelectionMode) -> bool;

    /// Apply a tag click to the selection. Returns true if anything changed.
    fn apply_tag(&mut self, tag: &str) -> bool;

    fn apply_attribute(&mut self, key: &str, value: &str) -> bool;
}

/// Which canvas variant edits an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasKind {
    /// Points, rectangles and polygons on [`Canvas`].
    Vector,
    /// Freehand strokes on [`PixelCanvas`].
    Pixel,
}

impl CanvasKind {
    pub fn for_context(context: EditingContext) -> Self {
        match context {
            EditingContext::Paint => CanvasKind::Pixel,
            _ => CanvasKind::Vector,
        }
    }
}

/// Notification for the owner of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Regions or the asset record changed and should be saved.
    AssetMetadataChanged,
    /// The selection is now these regions.
    SelectionChanged(Vec<Region>),
}

/// Editing switches taken from the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasOptions {
    pub single_tag_mode: bool,
    pub paste_offset: f64,
    pub max_zoom: f64,
}

impl From<&EditorPreferences> for CanvasOptions {
    fn from(prefs: &EditorPreferences) -> Self {
        Self {
            single_tag_mode: prefs.single_tag_mode,
            paste_offset: prefs.paste_offset,
            max_zoom: prefs.max_zoom,
        }
    }
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self::from(&EditorPreferences::default())
    }
}

// ============================================================================
// Vector canvas
// ============================================================================

/// Vector canvas over a [`DrawingSurface`].
#[derive(Debug)]
pub struct Canvas<S: DrawingSurface> {
    surface: S,
    asset: Option<Asset>,
    version: String,
    store: RegionStore,
    project: Project,
    gate: ContextGate,
    options: CanvasOptions,

    locked: LockedTags,
    selected_tag: Option<String>,
    editor_mode: SelectionMode,

    /// Frame size of the last drawn or selected region, used by the copy-rect tool.
    template: Size,
    /// Set by a move event, consumed by the move end.
    is_moved: bool,
    remove_all_pending: bool,

    events: Vec<CanvasEvent>,
}

impl<S: DrawingSurface> Canvas<S> {
    pub fn new(surface: S, project: Project, context: EditingContext, options: CanvasOptions) -> Self {
        Self {
            surface,
            asset: None,
            version: crate::VERSION.to_string(),
            store: RegionStore::new(),
            project,
            gate: ContextGate::new(context),
            options,
            locked: LockedTags::new(),
            selected_tag: None,
            editor_mode: SelectionMode::None,
            template: Size::new(DEFAULT_TEMPLATE_WIDTH, DEFAULT_TEMPLATE_HEIGHT),
            is_moved: false,
            remove_all_pending: false,
            events: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    /// Mutable asset record. Any access counts as a change.
    pub fn asset_mut(&mut self) -> Option<&mut Asset> {
        if self.asset.is_some() {
            self.store.mark_dirty();
        }
        self.asset.as_mut()
    }

    pub fn regions(&self) -> &[Region] {
        self.store.as_slice()
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.store.get(id)
    }

    pub fn context(&self) -> EditingContext {
        self.gate.context()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn options(&self) -> CanvasOptions {
        self.options
    }

    pub fn set_options(&mut self, options: CanvasOptions) {
        self.options = options;
    }

    pub fn locked_tags(&self) -> &LockedTags {
        &self.locked
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    pub fn editor_mode(&self) -> SelectionMode {
        self.editor_mode
    }

    pub fn template(&self) -> Size {
        self.template
    }

    pub fn is_remove_all_pending(&self) -> bool {
        self.remove_all_pending
    }

    /// Unsaved changes since the asset was loaded or last saved.
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

    /// Snapshot of the active asset with its current regions and view.
    pub fn metadata(&self) -> Option<AssetMetadata> {
        let asset = self.asset.clone()?;
        Some(AssetMetadata {
            asset,
            regions: self.store.to_vec(),
            version: self.version.clone(),
            work_view_data: self.surface.viewport().to_work_view(),
        })
    }

    // ------------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------------

    /// Replace everything with another asset and restore its view.
    pub fn load_asset(&mut self, metadata: AssetMetadata) {
        log::debug!(
            "🖼️ Loading asset {} with {} region(s)",
            metadata.asset.id,
            metadata.regions.len()
        );
        self.surface
            .set_viewport(Viewport::from_work_view(&metadata.work_view_data, self.options.max_zoom));
        self.surface.clear_selection();
        self.store = RegionStore::from_regions(metadata.regions);
        self.asset = Some(metadata.asset);
        self.version = metadata.version;
        self.is_moved = false;
        self.remove_all_pending = false;
        self.events.clear();
        self.redraw();
    }

    /// Drop the active asset.
    pub fn unload(&mut self) {
        self.surface.delete_all_regions();
        self.store = RegionStore::new();
        self.asset = None;
        self.is_moved = false;
        self.remove_all_pending = false;
        self.events.clear();
    }

    /// Hand the rendered media to the surface. An asset without a known size
    /// takes the content size.
    pub fn set_content_source(&mut self, source: ContentSource) {
        let size = source.size();
        self.surface.add_content_source(source);
        if let Some(asset) = self.asset.as_mut() {
            if !asset.size.is_some_and(|s| s.is_valid()) && size.is_valid() {
                log::debug!("📐 Asset {} size set to {}x{}", asset.id, size.width, size.height);
                asset.size = Some(size);
                self.store.mark_dirty();
            }
        }
        self.redraw();
    }

    /// Switch editing context. The surface is redrawn with the region types
    /// the new context shows.
    pub fn set_context(&mut self, context: EditingContext) {
        if self.gate.set_context(context) {
            if !self.gate.allows("drawing tool") {
                self.editor_mode = SelectionMode::None;
                self.surface.set_selection_mode(SelectionMode::None, None);
            }
            self.redraw();
        }
    }

    /// Take new tag and attribute definitions and recolor the regions.
    pub fn set_project(&mut self, project: Project) {
        let undefined: Vec<String> = self
            .locked
            .as_slice()
            .iter()
            .filter(|t| !project.has_tag(t))
            .cloned()
            .collect();
        for tag in &undefined {
            self.locked.remove(tag);
        }
        if self.selected_tag.as_deref().is_some_and(|t| !project.has_tag(t)) {
            self.selected_tag = None;
        }
        self.project = project;
        self.refresh_tags();
    }

    /// Switch drawing tool. Drawing tools are refused where editing is not allowed.
    pub fn set_editor_mode(&mut self, mode: SelectionMode) -> bool {
        if mode != SelectionMode::None && !self.gate.allows("drawing tool") {
            return false;
        }
        self.editor_mode = mode;
        let template = (mode == SelectionMode::CopyRect).then_some(self.template);
        self.surface.set_selection_mode(mode, template);
        log::debug!("🖌️ Editor mode: {:?}", mode);
        true
    }

    fn source_size(&self) -> EngineResult<Size> {
        let asset = self.asset.as_ref().ok_or(EngineError::NoActiveAsset)?;
        match asset.size {
            Some(size) if size.is_valid() => Ok(size),
            _ => Err(EngineError::MissingAssetSize {
                asset_id: asset.id.clone(),
            }),
        }
    }

    /// Clear the surface and draw the regions the context shows.
    fn redraw(&mut self) {
        self.surface.delete_all_regions();
        let Ok(source) = self.source_size() else {
            // drawn once the content source arrives
            return;
        };
        let frame = self.surface.frame_size();
        let mut drawn = 0;
        for region in self.store.iter().filter(|r| self.gate.shows(r.region_type)) {
            match region_to_frame(region, source, frame) {
                Ok(data) => {
                    self.surface.add_region(
                        &region.id,
                        region.region_type,
                        data,
                        tags_descriptor(region, &self.project),
                    );
                    drawn += 1;
                }
                Err(e) => {
                    log::warn!("Cannot draw region {}: {}", region.id, e);
                    break;
                }
            }
        }
        log::trace!("Redrew {} of {} region(s)", drawn, self.store.len());
    }

    fn refresh_tags(&mut self) {
        for region in self.store.iter().filter(|r| self.gate.shows(r.region_type)) {
            self.surface.update_tags(&region.id, tags_descriptor(region, &self.project));
        }
    }

    fn changed(&mut self) {
        self.events.push(CanvasEvent::AssetMetadataChanged);
    }

    fn selection_changed(&mut self, regions: Vec<Region>) {
        self.events.push(CanvasEvent::SelectionChanged(regions));
    }

    fn frame_template(&self, region: &Region) -> Option<Size> {
        let source = self.source_size().ok()?;
        let data = region_to_frame(region, source, self.surface.frame_size()).ok()?;
        let size = Size::new(data.width, data.height);
        size.is_valid().then_some(size)
    }

    // ------------------------------------------------------------------------
    // Surface callbacks
    // ------------------------------------------------------------------------

    /// A primitive was drawn on the surface, in frame space.
    ///
    /// Returns the new region, or None when the context does not allow drawing
    /// or no drawing tool is active.
    pub fn on_selection_end(&mut self, data: RegionData) -> EngineResult<Option<Region>> {
        if !self.gate.allows("draw") {
            return Ok(None);
        }
        let Some(region_type) = self.editor_mode.region_type() else {
            log::debug!("Selection ended without a drawing tool");
            return Ok(None);
        };
        if data.is_empty_for(region_type) {
            return Err(EngineError::EmptyRegion);
        }

        let source = self.source_size()?;
        let source_data = try_to_source_space(&data, source, self.surface.frame_size())?;

        let template = Size::new(data.width, data.height);
        if template.is_valid() {
            self.template = template;
        }

        let mut region = Region::new(new_region_id(), region_type, source_data.points.clone(), source_data.bounding_box());
        region.sync_bounding_box();
        region.tags = if !self.locked.is_empty() {
            self.locked.as_slice().to_vec()
        } else {
            self.selected_tag
                .iter()
                .filter(|t| self.project.has_tag(t))
                .cloned()
                .collect()
        };
        region.attributes = default_attributes(&self.project.attribute_keys);

        self.surface.add_region(
            &region.id,
            region_type,
            data,
            tags_descriptor(&region, &self.project),
        );
        self.surface.select_region(&region.id);
        self.store.push(region.clone());
        log::info!(
            "✅ Created {} region {} with tags {:?}",
            region_type.name(),
            region.id,
            region.tags
        );

        self.changed();
        self.selection_changed(vec![region.clone()]);
        Ok(Some(region))
    }

    /// The surface reported a region being dragged.
    pub fn on_region_move(&mut self, id: &str) {
        if self.store.contains(id) {
            self.is_moved = true;
        }
    }

    /// A drag finished with the region at `data`, in frame space.
    ///
    /// Only commits after a move event registered a displacement.
    pub fn on_region_move_end(&mut self, id: &str, data: RegionData) -> EngineResult<bool> {
        let moved = std::mem::take(&mut self.is_moved);
        if !moved || !self.gate.allows("move") {
            return Ok(false);
        }
        let source = self.source_size()?;
        let source_data = try_to_source_space(&data, source, self.surface.frame_size())?;
        let Some(region) = self.store.get_mut(id) else {
            return Ok(false);
        };
        source_data.apply_to(region);
        region.sync_bounding_box();
        let region = region.clone();
        self.surface
            .update_region(id, data, tags_descriptor(&region, &self.project));
        log::debug!("↔️ Moved region {}", id);

        self.changed();
        self.selection_changed(vec![region]);
        Ok(true)
    }

    /// Delete a region from the surface and the store.
    pub fn on_region_delete(&mut self, id: &str) -> bool {
        if !self.gate.allows("delete") {
            return false;
        }
        self.surface.delete_region(id);
        if self.store.remove(id).is_none() {
            return false;
        }
        log::info!("🗑️ Deleted region {}", id);
        self.changed();
        self.selection_changed(Vec::new());
        true
    }

    /// The surface selected `id`.
    ///
    /// The region's frame size becomes the copy-rect template and locked tags
    /// are added to the whole selection.
    pub fn on_region_selected(&mut self, id: &str) -> bool {
        if !self.gate.allows("select") {
            return false;
        }
        if let Some(template) = self.store.get(id).and_then(|r| self.frame_template(r)) {
            self.template = template;
        }

        let mut selected = self.selected_regions();
        if !self.locked.is_empty() {
            let locked = self.locked.as_slice().to_vec();
            let mut changed = Vec::new();
            for region in selected.iter_mut() {
                let tags = add_all_if_missing(&region.tags, &locked);
                if tags != region.tags {
                    region.tags = tags;
                    changed.push(region.clone());
                }
            }
            if !changed.is_empty() {
                self.update_regions(&changed);
            }
        }
        self.selection_changed(selected);
        true
    }

    /// Select a region programmatically, as a click on it would.
    pub fn select_region(&mut self, id: &str) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.surface.select_region(id);
        self.on_region_selected(id)
    }

    /// Select several regions at once. Unknown ids are skipped.
    ///
    /// Returns how many regions ended up selected.
    pub fn select_regions(&mut self, ids: &[&str]) -> usize {
        if !self.gate.allows("select") {
            return 0;
        }
        self.surface.clear_selection();
        let mut last = None;
        for id in ids.iter().filter(|id| self.store.contains(id)) {
            self.surface.add_to_selection(id);
            last = Some(*id);
        }
        match last {
            Some(id) => {
                self.on_region_selected(id);
                self.surface.selected_region_ids().len()
            }
            None => {
                self.selection_changed(Vec::new());
                0
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.surface.clear_selection();
        self.selection_changed(Vec::new());
    }

    // ------------------------------------------------------------------------
    // Remove all
    // ------------------------------------------------------------------------

    /// Ask for confirmation before removing every region.
    pub fn request_remove_all(&mut self) -> bool {
        if !self.gate.allows("remove all") {
            return false;
        }
        self.remove_all_pending = true;
        true
    }

    /// Remove every region if a request is pending. Returns how many were removed.
    pub fn confirm_remove_all(&mut self) -> usize {
        if !std::mem::take(&mut self.remove_all_pending) || !self.gate.allows("remove all") {
            return 0;
        }
        let count = self.store.len();
        self.surface.delete_all_regions();
        self.store.clear();
        log::info!("🗑️ Removed all {} region(s)", count);
        self.changed();
        self.selection_changed(Vec::new());
        count
    }

    pub fn cancel_remove_all(&mut self) {
        self.remove_all_pending = false;
    }

    // ------------------------------------------------------------------------
    // Tags and attributes
    // ------------------------------------------------------------------------

    /// Selected regions, in selection order.
    pub fn selected_regions(&self) -> Vec<Region> {
        self.surface
            .selected_region_ids()
            .iter()
            .filter_map(|id| self.store.get(id).cloned())
            .collect()
    }

    /// Write back regions by id and redraw their tags. Returns how many matched.
    pub fn update_regions(&mut self, updated: &[Region]) -> usize {
        let count = self.store.update(updated);
        for region in updated.iter().filter(|r| self.store.contains(&r.id)) {
            if self.gate.shows(region.region_type) {
                self.surface
                    .update_tags(&region.id, tags_descriptor(region, &self.project));
            }
        }
        if count > 0 {
            self.changed();
        }
        count
    }

    /// Apply a tag click to the selection.
    pub fn apply_tag(&mut self, tag: &str) -> bool {
        if !self.gate.allows("apply tag") {
            return false;
        }
        let mut selected = self.selected_regions();
        if !apply_tag_to_regions(&mut selected, tag, &self.locked, self.options.single_tag_mode) {
            return false;
        }
        log::debug!("🏷️ Applied '{}' to {} region(s)", tag, selected.len());
        self.update_regions(&selected);
        self.selection_changed(selected);
        true
    }

    /// A tag was clicked in the tag list.
    ///
    /// With the lock modifier the click toggles the lock; otherwise the tag
    /// becomes the selected tag and is applied to the selection.
    pub fn on_tag_clicked(&mut self, tag: &str, lock_modifier: bool) -> bool {
        if lock_modifier {
            self.toggle_lock(tag);
            return true;
        }
        self.selected_tag = Some(tag.to_string());
        self.apply_tag(tag)
    }

    /// Toggle a tag's lock. A newly locked tag is added to the selection.
    /// Returns true if the tag is now locked.
    pub fn toggle_lock(&mut self, tag: &str) -> bool {
        let locked = self.locked.toggle(tag);
        log::debug!("🔒 Tag '{}' locked = {}", tag, locked);
        if locked && self.gate.allows("lock tag") {
            let add = [tag.to_string()];
            let changed: Vec<Region> = self
                .selected_regions()
                .into_iter()
                .filter(|r| !r.has_tag(tag))
                .map(|mut r| {
                    r.tags = add_all_if_missing(&r.tags, &add);
                    r
                })
                .collect();
            if !changed.is_empty() {
                self.update_regions(&changed);
                let selected = self.selected_regions();
                self.selection_changed(selected);
            }
        }
        locked
    }

    pub fn set_locked_tags(&mut self, locked: LockedTags) {
        self.locked = locked;
    }

    /// Set an attribute on the selection. Unknown keys are ignored.
    pub fn apply_attribute(&mut self, key: &str, value: &str) -> bool {
        if !self.gate.allows("apply attribute") {
            return false;
        }
        let mut selected = self.selected_regions();
        if !crate::tags::apply_attribute(&mut selected, &self.project.attribute_keys, key, value) {
            log::debug!("Attribute '{}' not applied", key);
            return false;
        }
        self.update_regions(&selected);
        true
    }

    // ------------------------------------------------------------------------
    // Region lists
    // ------------------------------------------------------------------------

    /// Add finished regions in source space. Existing ids are replaced.
    pub fn add_regions(&mut self, regions: Vec<Region>) -> usize {
        if regions.is_empty() || !self.gate.allows("add regions") {
            return 0;
        }
        let source = self.source_size().ok();
        let frame = self.surface.frame_size();
        let count = regions.len();
        for region in regions {
            if let Some(source) = source {
                if self.gate.shows(region.region_type) {
                    match region_to_frame(&region, source, frame) {
                        Ok(data) => self.surface.add_region(
                            &region.id,
                            region.region_type,
                            data,
                            tags_descriptor(&region, &self.project),
                        ),
                        Err(e) => log::warn!("Cannot draw region {}: {}", region.id, e),
                    }
                }
            }
            self.store.push(region);
        }
        self.changed();
        count
    }

    /// Replace every region, as after a prediction or a tag propagation.
    pub fn replace_regions(&mut self, regions: Vec<Region>) {
        self.surface.clear_selection();
        self.store.replace_all(regions);
        self.redraw();
        self.changed();
    }

    // ------------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------------

    /// Copy the selection. Returns how many regions were copied.
    pub fn copy_regions(&self, clipboard: &impl Clipboard) -> EngineResult<usize> {
        let selected = self.selected_regions();
        if selected.is_empty() {
            return Ok(0);
        }
        clipboard.write_object(&selected)?;
        log::debug!("📋 Copied {} region(s)", selected.len());
        Ok(selected.len())
    }

    /// Copy the selection and delete the originals.
    pub fn cut_regions(&mut self, clipboard: &impl Clipboard) -> EngineResult<usize> {
        if !self.gate.allows("cut") {
            return Ok(0);
        }
        let selected = self.selected_regions();
        if selected.is_empty() {
            return Ok(0);
        }
        clipboard.write_object(&selected)?;
        for region in &selected {
            self.surface.delete_region(&region.id);
            self.store.remove(&region.id);
        }
        log::debug!("✂️ Cut {} region(s)", selected.len());
        self.changed();
        self.selection_changed(Vec::new());
        Ok(selected.len())
    }

    /// Paste copies of the clipboard regions at free positions.
    pub fn paste_regions(&mut self, clipboard: &impl Clipboard) -> EngineResult<Vec<Region>> {
        if !self.gate.allows("paste") {
            return Ok(Vec::new());
        }
        let Some(regions) = clipboard.read_object()? else {
            return Ok(Vec::new());
        };
        if regions.is_empty() {
            return Ok(Vec::new());
        }
        let bounds = self.source_size()?;
        let pasted = duplicate_regions_and_move(&regions, self.store.as_slice(), bounds, self.options.paste_offset)?;
        log::debug!("📋 Pasted {} region(s)", pasted.len());
        self.add_regions(pasted.clone());
        Ok(pasted)
    }

    // ------------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.surface.viewport()
    }

    /// Set zoom and pan, clamping the zoom, and redraw at the new frame size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let viewport = viewport.with_zoom(viewport.zoom, self.options.max_zoom);
        self.surface.set_viewport(viewport);
        self.redraw();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        let viewport = self.surface.viewport().with_zoom(zoom, self.options.max_zoom);
        self.set_viewport(viewport);
    }

    pub fn reset_zoom(&mut self) {
        log::debug!("🔄 View reset");
        self.set_viewport(Viewport::identity());
    }

    /// Selected region ids as the surface reports them.
    pub fn selected_region_ids(&self) -> Vec<RegionId> {
        self.surface.selected_region_ids()
    }
}

impl<S: DrawingSurface> AnnotationCanvas for Canvas<S> {
    fn add_regions(&mut self, regions: Vec<Region>) -> usize {
        Canvas::add_regions(self, regions)
    }

    fn selected_regions(&self) -> Vec<Region> {
        Canvas::selected_regions(self)
    }

    fn set_selection_mode(&mut self, mode: SelectionMode) -> bool {
        self.set_editor_mode(mode)
    }

    fn apply_tag(&mut self, tag: &str) -> bool {
        Canvas::apply_tag(self, tag)
    }

    fn apply_attribute(&mut self, key: &str, value: &str) -> bool {
        Canvas::apply_attribute(self, key, value)
    }
}
