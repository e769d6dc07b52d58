//! Editing session: the active asset, the root asset list and everything
//! that talks to persistence.
//!
//! The session owns the canvases of the active asset: the vector canvas, and
//! the stroke canvas that paint contexts edit through. Strokes are folded back
//! into the vector canvas before anything reads the asset's regions.
//! Switching assets flushes the previous one first, and every save derives
//! the asset's state and rolls it up to the root entry of the asset list.

use crate::autosave::SaveTracker;
use crate::canvas::{AnnotationCanvas, Canvas, CanvasEvent, CanvasKind, CanvasOptions, PixelCanvas};
use crate::clipboard::Clipboard;
use crate::config::EngineConfig;
use crate::context::{EditingContext, editing_context, is_mutation_allowed};
use crate::error::{EngineError, EngineResult};
use crate::keybindings::{HotKeyAction, KeyCode, Modifiers};
use crate::lifecycle::{ReviewAction, apply_review_action, derive_state, rollup_root};
use crate::model::{Asset, AssetMetadata, Project, Region, RegionType};
use crate::persistence::AssetPersistence;
use crate::prediction::{DotToRect, Predictor, apply_predictions, ensure_point_regions, merge_predictions, prepare_predictions};
use crate::surface::{ContentSource, DrawingSurface, SelectionMode};
use crate::tags::{delete_tag_in_metadata, rename_tag_in_metadata};
use crate::toolbar::{ToolbarItem, ToolbarItemName, ToolbarRegistry};

/// What became of a toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarOutcome {
    /// The session carried it out.
    Handled,
    /// Not available in the current context or without an open asset.
    Ignored,
    /// The host collects a comment and calls [`EditorSession::comment`].
    NeedsComment,
    /// The host asks for confirmation and calls [`EditorSession::confirm_remove_all`].
    NeedsConfirmation,
    /// The host calls [`EditorSession::submit_points`] with its service.
    NeedsDotToRect,
}

/// Snapshot of the active asset handed to a prediction service.
///
/// The session stays usable while the service runs. Finishing a ticket after
/// the user moved to another asset drops the result.
#[derive(Debug, Clone)]
pub struct ServiceTicket {
    generation: u64,
    metadata: AssetMetadata,
}

impl ServiceTicket {
    pub fn metadata(&self) -> &AssetMetadata {
        &self.metadata
    }

    pub fn asset_id(&self) -> &str {
        &self.metadata.asset.id
    }
}

/// Editor state for one project.
pub struct EditorSession<S, P, C>
where
    S: DrawingSurface,
    P: AssetPersistence,
    C: Clipboard,
{
    config: EngineConfig,
    project: Project,
    toolbar: ToolbarRegistry,
    canvas: Canvas<S>,
    /// Stroke canvas for paint contexts, loaded with the asset's polylines.
    pixel: PixelCanvas,
    persistence: P,
    clipboard: C,

    /// Root assets in list order.
    assets: Vec<Asset>,
    tracker: SaveTracker,

    /// Context forced by the host instead of the project's stage.
    context_override: Option<EditingContext>,
    /// Bumped on every asset switch; a [`ServiceTicket`] from an older
    /// generation is stale.
    generation: u64,
    selection: Vec<Region>,
}

impl<S, P, C> EditorSession<S, P, C>
where
    S: DrawingSurface,
    P: AssetPersistence,
    C: Clipboard,
{
    pub fn new(config: EngineConfig, project: Project, surface: S, persistence: P, clipboard: C) -> Self {
        let context = editing_context(project.task_type, project.task_status);
        let canvas = Canvas::new(
            surface,
            project.clone(),
            context,
            CanvasOptions::from(&config.preferences),
        );
        let pixel = PixelCanvas::new(&project, context, config.preferences.single_tag_mode);
        let tracker = config.autosave.tracker(project.auto_save);
        log::info!("📂 Session for project '{}' in context {}", project.name, context.name());
        Self {
            config,
            project,
            toolbar: ToolbarRegistry::with_defaults(),
            canvas,
            pixel,
            persistence,
            clipboard,
            assets: Vec::new(),
            tracker,
            context_override: None,
            generation: 0,
            selection: Vec::new(),
        }
    }

    /// Use a custom toolbar instead of the stock items.
    pub fn with_toolbar(mut self, toolbar: ToolbarRegistry) -> Self {
        self.toolbar = toolbar;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.canvas.set_options(CanvasOptions::from(&config.preferences));
        self.tracker.set_timing(config.autosave.timing());
        self.fold_strokes();
        self.config = config;
        self.reload_strokes();
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    /// Direct canvas access for surface callbacks. Call [`Self::pump_events`]
    /// afterwards so changes are tracked.
    pub fn canvas_mut(&mut self) -> &mut Canvas<S> {
        &mut self.canvas
    }

    /// Stroke canvas the paint contexts draw on.
    pub fn pixel_canvas(&self) -> &PixelCanvas {
        &self.pixel
    }

    /// Direct stroke canvas access for pointer input. Call
    /// [`Self::pump_events`] afterwards so changes are tracked.
    pub fn pixel_canvas_mut(&mut self) -> &mut PixelCanvas {
        &mut self.pixel
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn toolbar(&self) -> &ToolbarRegistry {
        &self.toolbar
    }

    pub fn tracker(&self) -> &SaveTracker {
        &self.tracker
    }

    /// Last selection reported by the canvas.
    pub fn selection(&self) -> &[Region] {
        &self.selection
    }

    pub fn active_asset(&self) -> Option<&Asset> {
        self.canvas.asset()
    }

    // ------------------------------------------------------------------------
    // Context
    // ------------------------------------------------------------------------

    pub fn context(&self) -> EditingContext {
        self.context_override
            .unwrap_or_else(|| editing_context(self.project.task_type, self.project.task_status))
    }

    /// Force a context, or go back to the project's stage with None.
    pub fn set_context_override(&mut self, context: Option<EditingContext>) {
        self.fold_strokes();
        self.context_override = context;
        self.canvas.set_context(self.context());
        self.reload_strokes();
    }

    pub fn canvas_kind(&self) -> CanvasKind {
        CanvasKind::for_context(self.context())
    }

    pub fn visible_toolbar_items(&self) -> Vec<&ToolbarItem> {
        self.toolbar.visible_items(self.context())
    }

    /// Take a changed project document: definitions, stage and auto-save.
    pub fn set_project(&mut self, project: Project) {
        self.fold_strokes();
        self.tracker.set_enabled(project.auto_save);
        self.canvas.set_project(project.clone());
        self.project = project;
        self.canvas.set_context(self.context());
        self.reload_strokes();
    }

    /// True when either canvas holds unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.canvas.is_dirty() || self.pixel.is_dirty()
    }

    /// Untagged regions of the active asset. In paint contexts the strokes
    /// count from the stroke canvas.
    pub fn untagged_count(&self) -> usize {
        match self.canvas_kind() {
            CanvasKind::Vector => self.canvas.untagged_count(),
            CanvasKind::Pixel => {
                let shapes = self
                    .canvas
                    .regions()
                    .iter()
                    .filter(|r| r.region_type != RegionType::Polyline && !r.is_tagged())
                    .count();
                shapes + self.pixel.untagged_count()
            }
        }
    }

    // ------------------------------------------------------------------------
    // Stroke canvas
    // ------------------------------------------------------------------------

    /// Write unsaved strokes into the vector canvas, replacing its polylines.
    fn fold_strokes(&mut self) {
        if !self.pixel.is_dirty() || self.canvas.asset().is_none() {
            return;
        }
        self.pump_events();
        let mut regions: Vec<Region> = self
            .canvas
            .regions()
            .iter()
            .filter(|r| r.region_type != RegionType::Polyline)
            .cloned()
            .collect();
        regions.extend(self.pixel.regions().iter().cloned());
        log::debug!("🖌️ Folding {} stroke(s) into the asset", self.pixel.regions().len());
        self.canvas.replace_regions(regions);
        self.canvas.drain_events();
        self.pixel.clear_dirty();
    }

    /// Rebuild the stroke canvas from the vector canvas, keeping its locks.
    fn reload_strokes(&mut self) {
        let locked = self.pixel.locked_tags().clone();
        self.pixel = PixelCanvas::new(&self.project, self.context(), self.config.preferences.single_tag_mode)
            .with_regions(self.canvas.regions().to_vec());
        self.pixel.set_locked_tags(locked);
    }

    /// Regions and view of the active asset as they would be saved now.
    fn current_metadata(&mut self) -> Option<AssetMetadata> {
        self.fold_strokes();
        self.canvas.metadata()
    }

    fn ensure_tagged(&self) -> EngineResult<()> {
        if !self.config.preferences.enforce_tagged_regions {
            return Ok(());
        }
        match self.untagged_count() {
            0 => Ok(()),
            count => {
                log::debug!("🏷️ {} untagged region(s) block the action", count);
                Err(EngineError::untagged(count))
            }
        }
    }

    fn mutation_allowed(&self, operation: &str) -> bool {
        let allowed = is_mutation_allowed(self.context());
        if !allowed {
            log::debug!("🔒 {} ignored in context {}", operation, self.context().name());
        }
        allowed
    }

    // ------------------------------------------------------------------------
    // Asset switching
    // ------------------------------------------------------------------------

    /// Fill the root asset list and open the last visited asset, or the first.
    ///
    /// Child assets and repeated ids are dropped. Does nothing once the list
    /// has been loaded.
    pub async fn load_project_assets(&mut self, assets: Vec<Asset>) -> EngineResult<bool> {
        if !self.assets.is_empty() {
            return Ok(false);
        }
        for asset in assets.into_iter().filter(Asset::is_root) {
            if !self.assets.iter().any(|a| a.id == asset.id) {
                self.assets.push(asset);
            }
        }
        log::info!("📂 {} root asset(s)", self.assets.len());

        let first = self
            .project
            .last_visited_asset_id
            .as_deref()
            .and_then(|id| self.assets.iter().find(|a| a.id == id))
            .or_else(|| self.assets.first())
            .cloned();
        match first {
            Some(asset) => self.select_asset(&asset).await,
            None => Ok(false),
        }
    }

    /// Open another asset.
    ///
    /// Refused while the active asset has untagged regions. The active asset
    /// is flushed before the new one is loaded; opening marks it visited.
    pub async fn select_asset(&mut self, asset: &Asset) -> EngineResult<bool> {
        self.ensure_tagged()?;
        if self.canvas.asset().is_some_and(|a| a.id == asset.id) {
            return Ok(false);
        }
        self.store_asset_metadata().await?;

        let mut metadata = self.persistence.load_asset_metadata(&self.project, asset).await?;
        if metadata.asset.size.is_none() {
            metadata.asset.size = asset.size;
        }
        log::info!("🖼️ Selected asset {} ({})", asset.id, asset.name);

        self.generation += 1;
        self.tracker.switch_asset(Some(&asset.id));
        self.selection.clear();
        self.project.last_visited_asset_id = Some(asset.id.clone());
        self.canvas.load_asset(metadata.clone());
        self.reload_strokes();

        let saved = self.persist(metadata, true).await?;
        self.sync_canvas_asset(&saved.asset);
        Ok(true)
    }

    /// Open the previous (`direction < 0`) or next root asset, clamped to the list.
    pub async fn goto_root_asset(&mut self, direction: i32) -> EngineResult<bool> {
        if self.assets.is_empty() {
            return Ok(false);
        }
        let current = self
            .canvas
            .asset()
            .and_then(|a| self.assets.iter().position(|r| r.id == a.root().id));
        let target = match current {
            Some(index) if direction > 0 => (index + 1).min(self.assets.len() - 1),
            Some(index) if direction < 0 => index.saturating_sub(1),
            Some(index) => index,
            None => 0,
        };
        let asset = self.assets[target].clone();
        self.select_asset(&asset).await
    }

    /// Save the active asset with its current regions, strokes and view.
    ///
    /// Refused while regions are untagged. `&mut self` already serializes
    /// flushes within the session; the tracker's in-flight flag is what a host
    /// driving its own saves through [`SaveTracker`] checks, and a flush begun
    /// while it is set is a no-op.
    pub async fn store_asset_metadata(&mut self) -> EngineResult<bool> {
        self.ensure_tagged()?;
        let Some(metadata) = self.current_metadata() else {
            return Ok(false);
        };
        if !self.tracker.begin_flush() {
            return Ok(false);
        }
        let result = self.persist(metadata, true).await;
        self.tracker.end_flush(result.is_ok());
        let saved = result?;
        self.sync_canvas_asset(&saved.asset);
        self.pixel.clear_dirty();
        Ok(true)
    }

    /// Derive the state of changed metadata, save it and the project, and
    /// update the root list entry. Returns the metadata as saved.
    pub async fn on_asset_metadata_changed(&mut self, metadata: AssetMetadata) -> EngineResult<AssetMetadata> {
        self.persist(metadata, true).await
    }

    async fn persist(&mut self, mut metadata: AssetMetadata, derive: bool) -> EngineResult<AssetMetadata> {
        if derive {
            let state = derive_state(&metadata);
            if state != metadata.asset.state {
                log::debug!(
                    "📝 Asset {} state {} -> {}",
                    metadata.asset.id,
                    metadata.asset.state.name(),
                    state.name()
                );
            }
            metadata.asset.state = state;
        }

        let stored_root_state = match &metadata.asset.parent {
            Some(parent) => Some(
                self.persistence
                    .load_asset_metadata(&self.project, parent.root())
                    .await?
                    .asset
                    .state,
            ),
            None => None,
        };
        let root = rollup_root(&metadata.asset, stored_root_state);

        self.persistence.save_asset_metadata(&self.project, &metadata).await?;
        self.persistence.save_project(&self.project).await?;
        log::info!(
            "💾 Saved asset {} ({}, {} region(s))",
            metadata.asset.id,
            metadata.asset.state.name(),
            metadata.regions.len()
        );

        if let Some(entry) = self.assets.iter_mut().find(|a| a.id == root.id) {
            *entry = root;
        }
        Ok(metadata)
    }

    /// Put the saved asset record back on the canvas. The canvas is clean afterwards.
    fn sync_canvas_asset(&mut self, saved: &Asset) {
        if let Some(asset) = self.canvas.asset_mut() {
            if asset.id == saved.id {
                *asset = saved.clone();
            }
        }
        self.canvas.clear_dirty();
    }

    /// Flush the active asset and close it.
    pub async fn teardown(&mut self) -> EngineResult<()> {
        self.store_asset_metadata().await?;
        self.canvas.unload();
        self.tracker.switch_asset(None);
        self.reload_strokes();
        self.generation += 1;
        log::info!("👋 Session closed");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Review
    // ------------------------------------------------------------------------

    /// Write a reviewer decision on the active asset and save it as is.
    pub async fn review(&mut self, action: ReviewAction) -> EngineResult<bool> {
        if self.canvas.asset().is_none() || !self.mutation_allowed("review") {
            return Ok(false);
        }
        self.ensure_tagged()?;
        self.fold_strokes();
        let status = self.project.task_status;
        if let Some(asset) = self.canvas.asset_mut() {
            apply_review_action(asset, &action, status);
        }
        let Some(metadata) = self.canvas.metadata() else {
            return Ok(false);
        };
        let saved = self.persist(metadata, false).await?;
        self.sync_canvas_asset(&saved.asset);
        self.tracker.record_saved();
        Ok(true)
    }

    pub async fn approve(&mut self) -> EngineResult<bool> {
        self.review(ReviewAction::Approve).await
    }

    pub async fn reject(&mut self) -> EngineResult<bool> {
        self.review(ReviewAction::Reject).await
    }

    pub async fn disable(&mut self) -> EngineResult<bool> {
        self.review(ReviewAction::Disable).await
    }

    pub async fn complete(&mut self) -> EngineResult<bool> {
        self.review(ReviewAction::Complete).await
    }

    pub async fn comment(&mut self, text: impl Into<String>) -> EngineResult<bool> {
        self.review(ReviewAction::Comment(text.into())).await
    }

    // ------------------------------------------------------------------------
    // Tag propagation
    // ------------------------------------------------------------------------

    /// Rename a tag on every stored asset and in the project definitions.
    ///
    /// Each affected asset is saved, then the project once. Returns the number
    /// of assets changed.
    pub async fn rename_tag(&mut self, from: &str, to: &str) -> EngineResult<usize> {
        if from == to {
            return Ok(0);
        }
        if self.is_dirty() {
            self.store_asset_metadata().await?;
        }
        let mut updated = Vec::new();
        for mut metadata in self.persistence.load_all_asset_metadata(&self.project).await? {
            if rename_tag_in_metadata(&mut metadata, from, to) {
                self.persistence.save_asset_metadata(&self.project, &metadata).await?;
                updated.push(metadata);
            }
        }
        self.project.rename_tag_definition(from, to);
        self.persistence.save_project(&self.project).await?;
        log::info!("🏷️ Renamed tag '{}' -> '{}' on {} asset(s)", from, to, updated.len());

        let mut locked = self.canvas.locked_tags().clone();
        locked.rename(from, to);
        self.canvas.set_locked_tags(locked);
        let mut locked = self.pixel.locked_tags().clone();
        locked.rename(from, to);
        self.pixel.set_locked_tags(locked);
        self.refresh_after_propagation(&updated);
        Ok(updated.len())
    }

    /// Remove a tag from every stored asset and from the project definitions.
    pub async fn delete_tag(&mut self, tag: &str) -> EngineResult<usize> {
        if self.is_dirty() {
            self.store_asset_metadata().await?;
        }
        let mut updated = Vec::new();
        for mut metadata in self.persistence.load_all_asset_metadata(&self.project).await? {
            if delete_tag_in_metadata(&mut metadata, tag) {
                self.persistence.save_asset_metadata(&self.project, &metadata).await?;
                updated.push(metadata);
            }
        }
        self.project.remove_tag_definition(tag);
        self.persistence.save_project(&self.project).await?;
        log::info!("🏷️ Deleted tag '{}' from {} asset(s)", tag, updated.len());

        let mut locked = self.canvas.locked_tags().clone();
        locked.remove(tag);
        self.canvas.set_locked_tags(locked);
        let mut locked = self.pixel.locked_tags().clone();
        locked.remove(tag);
        self.pixel.set_locked_tags(locked);

        self.refresh_after_propagation(&updated);
        Ok(updated.len())
    }

    fn refresh_after_propagation(&mut self, updated: &[AssetMetadata]) {
        self.canvas.set_project(self.project.clone());
        let active = self.canvas.asset().map(|a| a.id.clone());
        if let Some(metadata) = active.and_then(|id| updated.iter().find(|m| m.asset.id == id)) {
            self.canvas.replace_regions(metadata.regions.clone());
            // already saved
            self.canvas.clear_dirty();
            self.canvas.drain_events();
        }
        self.reload_strokes();
    }

    // ------------------------------------------------------------------------
    // Prediction services
    // ------------------------------------------------------------------------

    fn is_current(&self, ticket: &ServiceTicket) -> bool {
        self.generation == ticket.generation && self.canvas.asset().is_some_and(|a| a.id == ticket.asset_id())
    }

    fn ticket(&self) -> Option<ServiceTicket> {
        self.canvas.metadata().map(|metadata| ServiceTicket {
            generation: self.generation,
            metadata,
        })
    }

    /// Save the active asset and hand out a snapshot for the detector.
    ///
    /// None when no asset is open or the context is read-only.
    pub async fn begin_prediction(&mut self) -> EngineResult<Option<ServiceTicket>> {
        if self.canvas.asset().is_none() || !self.mutation_allowed("predict") {
            return Ok(None);
        }
        self.ensure_tagged()?;
        self.store_asset_metadata().await?;
        Ok(self.ticket())
    }

    /// Merge detector output into the asset the ticket was taken from.
    ///
    /// Returns false, changing nothing, when that asset is no longer active.
    pub async fn finish_prediction(&mut self, ticket: ServiceTicket, predicted: Vec<Region>) -> EngineResult<bool> {
        if !self.is_current(&ticket) {
            log::debug!("🤖 Dropping predictions for {}, asset changed", ticket.asset_id());
            return Ok(false);
        }
        let Some(current) = self.current_metadata() else {
            return Ok(false);
        };
        let predicted = prepare_predictions(predicted, self.project.active_learning.predict_tag);
        let updated = apply_predictions(&current, &predicted);
        self.apply_service_result(updated).await?;
        Ok(true)
    }

    /// Run the detector on the rendered frame and merge its regions.
    pub async fn predict_regions(&mut self, predictor: &impl Predictor, frame: &ContentSource) -> EngineResult<bool> {
        let Some(ticket) = self.begin_prediction().await? else {
            return Ok(false);
        };
        let predicted = match predictor.ensure_model_loaded().await {
            Ok(()) => predictor.predict_regions(frame, ticket.metadata()).await,
            Err(e) => Err(e),
        };
        match predicted {
            Ok(regions) => self.finish_prediction(ticket, regions).await,
            Err(e) => {
                log::warn!("⚠️ Prediction for {} failed: {}", ticket.asset_id(), e);
                Err(e.into())
            }
        }
    }

    /// Auto-detect once per asset when the project asks for it.
    pub async fn on_canvas_rendered(&mut self, predictor: &impl Predictor, frame: &ContentSource) -> EngineResult<bool> {
        let pending = self.canvas.asset().is_some_and(|a| !a.predicted);
        if self.project.active_learning.auto_detect && pending {
            return self.predict_regions(predictor, frame).await;
        }
        Ok(false)
    }

    /// Every precondition of dot-to-rect that needs no service call.
    fn check_submit_points(&mut self) -> EngineResult<bool> {
        if self.canvas.asset().is_none() || !self.mutation_allowed("submit points") {
            return Ok(false);
        }
        self.ensure_tagged()?;
        if !self.project.has_dot_to_rect() {
            return Err(EngineError::ServiceNotConfigured("dot-to-rect".to_string()));
        }
        match self.current_metadata() {
            Some(metadata) => {
                ensure_point_regions(&metadata)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Check the dots, save the asset and hand out a snapshot for dot-to-rect.
    ///
    /// Nothing is saved when a check fails.
    pub async fn begin_submit_points(&mut self) -> EngineResult<Option<ServiceTicket>> {
        if !self.check_submit_points()? {
            return Ok(None);
        }
        self.store_asset_metadata().await?;
        Ok(self.ticket())
    }

    /// Replace the converted dots on the asset the ticket was taken from.
    pub async fn finish_submit_points(&mut self, ticket: ServiceTicket, converted: Vec<Region>) -> EngineResult<bool> {
        if !self.is_current(&ticket) {
            log::debug!("🤖 Dropping dot-to-rect result for {}, asset changed", ticket.asset_id());
            return Ok(false);
        }
        let Some(mut updated) = self.current_metadata() else {
            return Ok(false);
        };
        updated.regions = merge_predictions(&updated.regions, &converted);
        log::info!("🤖 Dot-to-rect returned {} region(s)", converted.len());
        self.apply_service_result(updated).await?;
        Ok(true)
    }

    /// Turn the asset's dots into rectangles with the dot-to-rect service.
    pub async fn submit_points(&mut self, service: &impl DotToRect) -> EngineResult<bool> {
        if !self.check_submit_points()? {
            return Ok(false);
        }
        if let Err(e) = service.ensure_connected().await {
            log::warn!("⚠️ Dot-to-rect service unreachable: {}", e);
            return Err(e.into());
        }
        let Some(ticket) = self.begin_submit_points().await? else {
            return Ok(false);
        };
        match service.process(ticket.metadata()).await {
            Ok(converted) => self.finish_submit_points(ticket, converted).await,
            Err(e) => {
                log::warn!("⚠️ Dot-to-rect for {} failed: {}", ticket.asset_id(), e);
                Err(e.into())
            }
        }
    }

    async fn apply_service_result(&mut self, updated: AssetMetadata) -> EngineResult<()> {
        self.canvas.replace_regions(updated.regions.clone());
        self.canvas.drain_events();
        let saved = self.persist(updated, true).await?;
        self.sync_canvas_asset(&saved.asset);
        self.reload_strokes();
        self.tracker.record_saved();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Input dispatch
    // ------------------------------------------------------------------------

    /// Handle a digit hot key: apply the tag at that position, or toggle its
    /// lock with the lock modifier held.
    pub fn handle_hotkey(&mut self, key: KeyCode, modifiers: Modifiers) -> bool {
        let Some(action) = self
            .config
            .keybindings
            .action_for(key, modifiers, self.project.tags.len())
        else {
            return false;
        };
        let (index, lock) = match action {
            HotKeyAction::ApplyTag(index) => (index, false),
            HotKeyAction::ToggleLock(index) => (index, true),
        };
        let Some(tag) = self.project.tag_at(index).map(|t| t.name.clone()) else {
            return false;
        };
        let handled = match (self.canvas_kind(), lock) {
            (CanvasKind::Pixel, true) => self.pixel.toggle_lock(&tag),
            (CanvasKind::Pixel, false) => self.pixel.apply_tag(&tag),
            (CanvasKind::Vector, _) => self.canvas.on_tag_clicked(&tag, lock),
        };
        self.pump_events();
        handled
    }

    /// Handle a keyboard accelerator through the toolbar.
    pub async fn handle_accelerator(&mut self, accelerator: &str) -> EngineResult<ToolbarOutcome> {
        let Some(name) = self
            .toolbar
            .item_for_accelerator(self.context(), accelerator)
            .map(|item| item.name)
        else {
            return Ok(ToolbarOutcome::Ignored);
        };
        self.on_toolbar_item(name).await
    }

    /// Carry out a toolbar item.
    pub async fn on_toolbar_item(&mut self, name: ToolbarItemName) -> EngineResult<ToolbarOutcome> {
        let context = self.context();
        if !self.toolbar.get(name).is_some_and(|i| i.is_visible_in(context)) {
            log::debug!("🔒 Toolbar item {} not available in {}", name.as_str(), context.name());
            return Ok(ToolbarOutcome::Ignored);
        }
        log::debug!("🔘 Toolbar item {}", name.as_str());

        let handled = match name {
            ToolbarItemName::SelectCanvas => self.canvas.set_editor_mode(SelectionMode::None),
            ToolbarItemName::DrawRectangle => self.canvas.set_editor_mode(SelectionMode::Rect),
            ToolbarItemName::DrawPoint => self.canvas.set_editor_mode(SelectionMode::Point),
            ToolbarItemName::DrawPolygon => self.canvas.set_editor_mode(SelectionMode::Polygon),
            ToolbarItemName::SubmitPoints => return Ok(ToolbarOutcome::NeedsDotToRect),
            ToolbarItemName::PreviousAsset => self.goto_root_asset(-1).await?,
            ToolbarItemName::NextAsset => self.goto_root_asset(1).await?,
            ToolbarItemName::Approve => self.approve().await?,
            ToolbarItemName::Reject => self.reject().await?,
            ToolbarItemName::Disable => self.disable().await?,
            ToolbarItemName::Complete => self.complete().await?,
            ToolbarItemName::Comment => return Ok(ToolbarOutcome::NeedsComment),
            ToolbarItemName::CopyRegions => self.canvas.copy_regions(&self.clipboard)? > 0,
            ToolbarItemName::CutRegions => self.canvas.cut_regions(&self.clipboard)? > 0,
            ToolbarItemName::PasteRegions => !self.canvas.paste_regions(&self.clipboard)?.is_empty(),
            ToolbarItemName::RemoveAllRegions => {
                if self.canvas.request_remove_all() {
                    return Ok(ToolbarOutcome::NeedsConfirmation);
                }
                false
            }
            ToolbarItemName::ResetZoom => {
                self.canvas.reset_zoom();
                true
            }
            ToolbarItemName::SaveProject => self.store_asset_metadata().await?,
        };
        self.pump_events();
        Ok(if handled {
            ToolbarOutcome::Handled
        } else {
            ToolbarOutcome::Ignored
        })
    }

    /// Remove every region after the host confirmed.
    pub fn confirm_remove_all(&mut self) -> usize {
        let removed = self.canvas.confirm_remove_all();
        self.pump_events();
        removed
    }

    pub fn cancel_remove_all(&mut self) {
        self.canvas.cancel_remove_all();
    }

    // ------------------------------------------------------------------------
    // Change tracking
    // ------------------------------------------------------------------------

    /// Consume notifications of both canvases: changes mark the asset for
    /// saving and the latest selection is kept. The events are handed back to
    /// the host.
    pub fn pump_events(&mut self) -> Vec<CanvasEvent> {
        let mut events = self.canvas.drain_events();
        events.extend(self.pixel.drain_events());
        for event in &events {
            match event {
                CanvasEvent::AssetMetadataChanged => self.tracker.record_edit(),
                CanvasEvent::SelectionChanged(regions) => self.selection = regions.clone(),
            }
        }
        events
    }

    /// Periodic hook: saves the active asset when auto-save says so.
    ///
    /// Untagged regions postpone the save instead of failing.
    pub async fn tick(&mut self) -> EngineResult<bool> {
        self.pump_events();
        if !self.tracker.should_save() {
            return Ok(false);
        }
        if self.config.preferences.enforce_tagged_regions && self.untagged_count() > 0 {
            log::trace!("Auto-save postponed, untagged regions");
            return Ok(false);
        }
        log::debug!("💾 Auto-save");
        self.store_asset_metadata().await
    }
}

#[cfg(test)]
mod tests;
