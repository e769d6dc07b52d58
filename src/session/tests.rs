use std::cell::Cell;

use pollster::block_on;

use super::*;
use crate::clipboard::MemoryClipboard;
use crate::keybindings::{KeyCode, Modifier};
use crate::model::{AssetState, AssetType, BoundingBox, Point, RegionType, Tag, TaskStatus, TaskType};
use crate::persistence::MemoryPersistence;
use crate::prediction::ServiceError;
use crate::surface::HeadlessSurface;
use crate::transform::RegionData;

type TestSession = EditorSession<HeadlessSurface, MemoryPersistence, MemoryClipboard>;

fn project(task_type: TaskType, status: TaskStatus) -> Project {
    Project::new("p", "demo")
        .with_stage(task_type, status)
        .with_tags(vec![Tag::new("car", "#ff0000"), Tag::new("person", "#00ff00")])
}

fn image(id: &str) -> Asset {
    Asset::new(id, AssetType::Image, format!("{}.png", id)).with_size(800.0, 600.0)
}

fn session_with(config: EngineConfig, project: Project, persistence: MemoryPersistence) -> TestSession {
    EditorSession::new(config, project, HeadlessSurface::new(), persistence, MemoryClipboard::new())
}

fn session(project: Project) -> TestSession {
    session_with(EngineConfig::new(), project, MemoryPersistence::new())
}

/// Load the list and render the first asset.
fn open(session: &mut TestSession, assets: Vec<Asset>) {
    assert!(block_on(session.load_project_assets(assets)).unwrap());
    render(session);
}

fn render(session: &mut TestSession) {
    session
        .canvas_mut()
        .set_content_source(ContentSource::new(800.0, 600.0, "frame.png"));
    session.pump_events();
}

fn draw(session: &mut TestSession, mode: SelectionMode, data: RegionData) -> Region {
    assert!(session.canvas_mut().set_editor_mode(mode));
    let region = session.canvas_mut().on_selection_end(data).unwrap().unwrap();
    session.pump_events();
    region
}

#[test]
fn test_draw_then_save_at_zoom() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a1")]);
    assert_eq!(
        session.persistence().stored("a1").unwrap().asset.state,
        AssetState::Visited
    );

    session.canvas_mut().on_tag_clicked("car", false);
    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::DrawRectangle)).unwrap(),
        ToolbarOutcome::Handled
    );
    session.canvas_mut().set_zoom(2.0);
    draw(&mut session, SelectionMode::Rect, RegionData::rect(100.0, 100.0, 100.0, 50.0));
    assert!(session.tracker().is_dirty());

    assert!(block_on(session.store_asset_metadata()).unwrap());
    let stored = session.persistence().stored("a1").unwrap();
    assert_eq!(stored.regions.len(), 1);
    assert!(stored.regions[0].bounding_box.approx_eq(&BoundingBox::new(50.0, 50.0, 50.0, 25.0)));
    assert_eq!(stored.regions[0].tags, vec!["car".to_string()]);
    assert_eq!(stored.asset.state, AssetState::TaggedRectangle);
    assert_eq!(stored.work_view_data.zoom_scale, 2.0);

    assert_eq!(session.assets()[0].state, AssetState::TaggedRectangle);
    assert!(!session.canvas().is_dirty());
    assert!(!session.tracker().is_dirty());
}

#[test]
fn test_load_keeps_roots_and_opens_last_visited() {
    let mut project = project(TaskType::Annotation, TaskStatus::Review);
    project.last_visited_asset_id = Some("b".to_string());
    let mut session = session(project);

    let video = Asset::new("v", AssetType::Video, "v.mp4");
    let assets = vec![image("a"), image("b"), video.frame_at(2.0), image("a"), video];
    assert!(block_on(session.load_project_assets(assets)).unwrap());

    let ids: Vec<_> = session.assets().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "v"]);
    assert_eq!(session.active_asset().unwrap().id, "b");

    // a second load is ignored
    assert!(!block_on(session.load_project_assets(vec![image("c")])).unwrap());
    assert_eq!(session.assets().len(), 3);
}

#[test]
fn test_navigation_clamps_to_list() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a"), image("b")]);

    assert!(!block_on(session.goto_root_asset(-1)).unwrap());
    assert_eq!(session.active_asset().unwrap().id, "a");

    assert!(block_on(session.goto_root_asset(1)).unwrap());
    assert_eq!(session.active_asset().unwrap().id, "b");
    assert!(!block_on(session.goto_root_asset(1)).unwrap());

    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::PreviousAsset)).unwrap(),
        ToolbarOutcome::Handled
    );
    assert_eq!(session.active_asset().unwrap().id, "a");
    let stored = session.persistence().stored_project().unwrap();
    assert_eq!(stored.last_visited_asset_id.as_deref(), Some("a"));
    assert_eq!(session.assets()[1].state, AssetState::Visited);
}

#[test]
fn test_untagged_regions_block_switching() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a"), image("b")]);
    draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 40.0, 40.0));

    let err = block_on(session.goto_root_asset(1)).unwrap_err();
    assert!(matches!(err, EngineError::UntaggedRegions { count: 1 }));
    assert_eq!(session.active_asset().unwrap().id, "a");
    assert!(matches!(
        block_on(session.store_asset_metadata()),
        Err(EngineError::UntaggedRegions { .. })
    ));
    assert!(!block_on(session.tick()).unwrap());

    // tagging the region lifts the guard
    assert!(session.handle_hotkey(KeyCode::Key2, Modifiers::none()));
    assert_eq!(session.canvas().regions()[0].tags, vec!["person".to_string()]);
    assert!(block_on(session.goto_root_asset(1)).unwrap());
    assert_eq!(
        session.persistence().stored("a").unwrap().asset.state,
        AssetState::TaggedRectangle
    );
}

#[test]
fn test_untagged_allowed_when_not_enforced() {
    let mut config = EngineConfig::new();
    config.preferences.enforce_tagged_regions = false;
    let mut session = session_with(
        config,
        project(TaskType::Annotation, TaskStatus::Review),
        MemoryPersistence::new(),
    );
    open(&mut session, vec![image("a"), image("b")]);
    draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 40.0, 40.0));
    assert!(block_on(session.goto_root_asset(1)).unwrap());
    assert_eq!(session.persistence().stored("a").unwrap().regions.len(), 1);
}

#[test]
fn test_lock_hotkey() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    assert!(session.handle_hotkey(KeyCode::Key1, Modifiers::only(Modifier::Ctrl)));
    assert!(session.canvas().locked_tags().contains("car"));

    let region = draw(&mut session, SelectionMode::Rect, RegionData::rect(0.0, 0.0, 20.0, 20.0));
    assert_eq!(region.tags, vec!["car".to_string()]);
    assert_eq!(session.selection(), &[region]);

    // no third tag
    assert!(!session.handle_hotkey(KeyCode::Key3, Modifiers::none()));
}

#[test]
fn test_rename_tag_across_assets() {
    let persistence = MemoryPersistence::new();
    for id in ["a1", "a2"] {
        let meta = AssetMetadata::new(image(id))
            .with_regions(vec![Region::rectangle(format!("{}-r", id), 0.0, 0.0, 10.0, 10.0).with_tags(["car"])]);
        persistence.insert(&meta).unwrap();
    }
    let mut session = session_with(
        EngineConfig::new(),
        project(TaskType::Annotation, TaskStatus::Review),
        persistence,
    );
    open(&mut session, vec![image("a1"), image("a2")]);
    session.canvas_mut().toggle_lock("car");

    let saves = session.persistence().project_save_count();
    assert_eq!(block_on(session.rename_tag("car", "vehicle")).unwrap(), 2);
    assert_eq!(session.persistence().project_save_count(), saves + 1);

    for id in ["a1", "a2"] {
        let stored = session.persistence().stored(id).unwrap();
        assert_eq!(stored.regions[0].tags, vec!["vehicle".to_string()]);
    }
    assert_eq!(session.canvas().regions()[0].tags, vec!["vehicle".to_string()]);
    assert!(session.project().has_tag("vehicle"));
    assert!(!session.project().has_tag("car"));
    assert!(session.canvas().locked_tags().contains("vehicle"));
    assert!(!session.canvas().is_dirty());
}

#[test]
fn test_rename_onto_existing_tag_merges() {
    let persistence = MemoryPersistence::new();
    let meta = AssetMetadata::new(image("a2")).with_regions(vec![
        Region::rectangle("both", 0.0, 0.0, 10.0, 10.0).with_tags(["car", "person"]),
        Region::rectangle("car-only", 20.0, 0.0, 10.0, 10.0).with_tags(["car"]),
    ]);
    persistence.insert(&meta).unwrap();
    let mut session = session_with(
        EngineConfig::new(),
        project(TaskType::Annotation, TaskStatus::Review),
        persistence,
    );
    open(&mut session, vec![image("a1"), image("a2")]);
    session.canvas_mut().toggle_lock("car");
    session.canvas_mut().toggle_lock("person");

    let saves = session.persistence().project_save_count();
    assert_eq!(block_on(session.rename_tag("car", "person")).unwrap(), 1);
    assert_eq!(session.persistence().project_save_count(), saves + 1);

    let names: Vec<_> = session.project().tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["person"]);
    assert_eq!(session.project().tags[0].color, "#00ff00");
    let stored_project = session.persistence().stored_project().unwrap();
    assert_eq!(stored_project.tags.len(), 1);

    let stored = session.persistence().stored("a2").unwrap();
    assert_eq!(stored.regions[0].tags, vec!["person".to_string()]);
    assert_eq!(stored.regions[1].tags, vec!["person".to_string()]);
    assert_eq!(session.canvas().locked_tags().as_slice(), &["person".to_string()]);
}

#[test]
fn test_delete_tag_across_assets() {
    let persistence = MemoryPersistence::new();
    let meta = AssetMetadata::new(image("a2")).with_regions(vec![
        Region::rectangle("r", 0.0, 0.0, 10.0, 10.0).with_tags(["car", "person"]),
    ]);
    persistence.insert(&meta).unwrap();
    let mut session = session_with(
        EngineConfig::new(),
        project(TaskType::Annotation, TaskStatus::Review),
        persistence,
    );
    open(&mut session, vec![image("a1"), image("a2")]);

    assert_eq!(block_on(session.delete_tag("car")).unwrap(), 1);
    let stored = session.persistence().stored("a2").unwrap();
    assert_eq!(stored.regions[0].tags, vec!["person".to_string()]);
    assert_eq!(session.project().tags.len(), 1);
    assert!(!session.persistence().stored_project().unwrap().has_tag("car"));
}

#[test]
fn test_cut_then_paste_through_toolbar() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    session.canvas_mut().toggle_lock("car");
    let region = draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 20.0, 20.0));

    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::CutRegions)).unwrap(),
        ToolbarOutcome::Handled
    );
    assert!(session.canvas().regions().is_empty());

    assert_eq!(
        block_on(session.handle_accelerator("CmdOrCtrl+V")).unwrap(),
        ToolbarOutcome::Handled
    );
    let regions = session.canvas().regions();
    assert_eq!(regions.len(), 1);
    assert_ne!(regions[0].id, region.id);
    assert_eq!(regions[0].tags, vec!["car".to_string()]);
    assert!(session.tracker().is_dirty());
}

#[test]
fn test_remove_all_needs_confirmation() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    session.canvas_mut().toggle_lock("car");
    draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 20.0, 20.0));
    draw(&mut session, SelectionMode::Rect, RegionData::rect(50.0, 50.0, 20.0, 20.0));

    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::RemoveAllRegions)).unwrap(),
        ToolbarOutcome::NeedsConfirmation
    );
    assert_eq!(session.canvas().regions().len(), 2);
    assert_eq!(session.confirm_remove_all(), 2);
    assert!(session.canvas().regions().is_empty());
}

#[test]
fn test_review_override_is_saved_as_is() {
    let mut session = session(project(TaskType::Cleansing, TaskStatus::InProgress));
    open(&mut session, vec![image("a")]);
    assert_eq!(session.context(), EditingContext::Purify);

    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::Reject)).unwrap(),
        ToolbarOutcome::Handled
    );
    assert_eq!(
        session.persistence().stored("a").unwrap().asset.state,
        AssetState::Rejected
    );
    assert_eq!(session.assets()[0].state, AssetState::Rejected);

    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::Comment)).unwrap(),
        ToolbarOutcome::NeedsComment
    );
    assert!(block_on(session.comment("blurry")).unwrap());
    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.asset.state, AssetState::Commented);
    assert_eq!(stored.asset.comment.as_deref(), Some("blurry"));

    assert!(block_on(session.approve()).unwrap());
    // a content save keeps the approval
    assert!(block_on(session.store_asset_metadata()).unwrap());
    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.asset.state, AssetState::Approved);
    assert!(!stored.asset.completed);
}

#[test]
fn test_complete_survives_content_save() {
    let mut session = session(project(TaskType::Cleansing, TaskStatus::Review));
    open(&mut session, vec![image("a")]);

    // disable only shows while purifying
    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::Disable)).unwrap(),
        ToolbarOutcome::Ignored
    );
    assert!(block_on(session.complete()).unwrap());
    assert!(block_on(session.store_asset_metadata()).unwrap());
    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.asset.state, AssetState::Completed);
    assert!(stored.asset.completed);
}

#[test]
fn test_finished_project_is_read_only() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Finished));
    open(&mut session, vec![image("a")]);
    assert_eq!(session.context(), EditingContext::None);
    assert!(session.visible_toolbar_items().is_empty());
    assert!(!block_on(session.approve()).unwrap());
    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::SaveProject)).unwrap(),
        ToolbarOutcome::Ignored
    );

    session.set_context_override(Some(EditingContext::Revise));
    assert_eq!(session.canvas().context(), EditingContext::Revise);
    assert!(block_on(session.approve()).unwrap());
}

#[test]
fn test_frame_rolls_up_to_stored_video() {
    let video = Asset::new("v", AssetType::Video, "v.mp4").with_size(800.0, 600.0);
    let mut stored_video = AssetMetadata::new(video.clone());
    stored_video.asset.state = AssetState::TaggedRectangle;
    let persistence = MemoryPersistence::new();
    persistence.insert(&stored_video).unwrap();

    let mut session = session_with(
        EngineConfig::new(),
        project(TaskType::Annotation, TaskStatus::Review),
        persistence,
    );
    open(&mut session, vec![video.clone()]);
    assert_eq!(session.assets()[0].state, AssetState::TaggedRectangle);

    let frame = video.frame_at(1.5);
    assert!(block_on(session.select_asset(&frame)).unwrap());
    render(&mut session);
    assert_eq!(
        session.persistence().stored(&frame.id).unwrap().asset.state,
        AssetState::Visited
    );
    assert_eq!(session.assets().len(), 1);
    assert_eq!(session.assets()[0].id, "v");
    assert_eq!(session.assets()[0].state, AssetState::TaggedRectangle);

    // the frame's position in the list is its video's
    assert!(block_on(session.goto_root_asset(1)).unwrap());
    assert_eq!(session.active_asset().unwrap().id, "v");
}

struct FakeDetector {
    calls: Cell<usize>,
    result: Result<Vec<Region>, ServiceError>,
}

impl FakeDetector {
    fn returning(regions: Vec<Region>) -> Self {
        Self {
            calls: Cell::new(0),
            result: Ok(regions),
        }
    }
}

impl Predictor for FakeDetector {
    async fn predict_regions(&self, _frame: &ContentSource, _metadata: &AssetMetadata) -> Result<Vec<Region>, ServiceError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

fn frame() -> ContentSource {
    ContentSource::new(800.0, 600.0, "frame.png")
}

#[test]
fn test_auto_detect_runs_once() {
    let mut project = project(TaskType::Annotation, TaskStatus::Review);
    project.active_learning.auto_detect = true;
    project.active_learning.predict_tag = true;
    let mut session = session(project);
    open(&mut session, vec![image("a")]);

    let detector = FakeDetector::returning(vec![Region::rectangle("p1", 100.0, 100.0, 50.0, 50.0).with_tags(["car"])]);
    assert!(block_on(session.on_canvas_rendered(&detector, &frame())).unwrap());
    assert_eq!(session.canvas().regions().len(), 1);
    assert!(session.active_asset().unwrap().predicted);

    let stored = session.persistence().stored("a").unwrap();
    assert!(stored.asset.predicted);
    assert_eq!(stored.asset.state, AssetState::TaggedRectangle);

    assert!(!block_on(session.on_canvas_rendered(&detector, &frame())).unwrap());
    assert_eq!(detector.calls.get(), 1);
}

#[test]
fn test_predictions_drop_class_without_predict_tag() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    let detector = FakeDetector::returning(vec![Region::rectangle("p1", 0.0, 0.0, 50.0, 50.0).with_tags(["dog"])]);

    // auto-detect is off
    assert!(!block_on(session.on_canvas_rendered(&detector, &frame())).unwrap());
    assert!(block_on(session.predict_regions(&detector, &frame())).unwrap());
    assert!(session.canvas().regions()[0].tags.is_empty());
    assert_eq!(session.canvas().untagged_count(), 1);
}

#[test]
fn test_failed_prediction_changes_nothing() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    let detector = FakeDetector {
        calls: Cell::new(0),
        result: Err(ServiceError::Unavailable("timeout".to_string())),
    };
    let err = block_on(session.predict_regions(&detector, &frame())).unwrap_err();
    assert!(matches!(err, EngineError::ServiceUnavailable(_)));
    assert!(session.canvas().regions().is_empty());
    assert!(!session.active_asset().unwrap().predicted);
}

#[test]
fn test_late_prediction_for_left_asset_is_dropped() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a"), image("b")]);
    let ticket = block_on(session.begin_prediction()).unwrap().unwrap();
    assert_eq!(ticket.asset_id(), "a");

    // the user moves on while the detector runs
    assert!(block_on(session.goto_root_asset(1)).unwrap());
    let late = vec![Region::rectangle("p1", 10.0, 10.0, 20.0, 20.0).with_tags(["car"])];
    assert!(!block_on(session.finish_prediction(ticket.clone(), late.clone())).unwrap());
    assert!(session.canvas().regions().is_empty());
    assert!(session.persistence().stored("a").unwrap().regions.is_empty());
    assert!(!session.persistence().stored("b").unwrap().asset.predicted);

    // coming back does not revive the old ticket
    assert!(block_on(session.goto_root_asset(-1)).unwrap());
    assert!(!block_on(session.finish_prediction(ticket, late)).unwrap());
    assert!(session.canvas().regions().is_empty());
}

#[test]
fn test_edits_during_prediction_are_kept() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    let ticket = block_on(session.begin_prediction()).unwrap().unwrap();

    session.canvas_mut().toggle_lock("car");
    let drawn = draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 20.0, 20.0));
    let predicted = vec![Region::rectangle("p1", 300.0, 300.0, 50.0, 50.0)];
    assert!(block_on(session.finish_prediction(ticket, predicted)).unwrap());

    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.regions.len(), 2);
    assert!(stored.regions.iter().any(|r| r.id == drawn.id));
    assert!(stored.asset.predicted);
    assert_eq!(session.canvas().regions().len(), 2);
}

struct FakeDotToRect;

impl DotToRect for FakeDotToRect {
    async fn ensure_connected(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn process(&self, metadata: &AssetMetadata) -> Result<Vec<Region>, ServiceError> {
        Ok(metadata
            .regions
            .iter()
            .filter(|r| r.region_type == RegionType::Point)
            .map(|r| {
                let p = &r.points[0];
                Region::rectangle(r.id.clone(), p.x - 10.0, p.y - 10.0, 20.0, 20.0).with_tags(r.tags.clone())
            })
            .collect())
    }
}

#[test]
fn test_submit_points() {
    let mut project = project(TaskType::Annotation, TaskStatus::InProgress);
    let mut session = session(project.clone());
    open(&mut session, vec![image("a")]);
    assert_eq!(session.context(), EditingContext::EditDot);

    assert_eq!(
        block_on(session.on_toolbar_item(ToolbarItemName::SubmitPoints)).unwrap(),
        ToolbarOutcome::NeedsDotToRect
    );
    assert!(matches!(
        block_on(session.submit_points(&FakeDotToRect)),
        Err(EngineError::ServiceNotConfigured(_))
    ));

    project.dot_to_rect.url = "http://localhost:5000".to_string();
    session.set_project(project);
    assert!(matches!(
        block_on(session.submit_points(&FakeDotToRect)),
        Err(EngineError::NoPointRegions)
    ));

    session.canvas_mut().toggle_lock("person");
    let dot = draw(&mut session, SelectionMode::Point, RegionData::point(100.0, 100.0));
    assert!(block_on(session.submit_points(&FakeDotToRect)).unwrap());

    let regions = session.canvas().regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].id, dot.id);
    assert_eq!(regions[0].region_type, RegionType::Rectangle);
    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.asset.state, AssetState::TaggedRectangle);
    assert!(!stored.asset.predicted);
}

#[test]
fn test_rejected_submit_saves_nothing() {
    let mut project = project(TaskType::Annotation, TaskStatus::InProgress);
    project.dot_to_rect.url = "http://localhost:5000".to_string();
    let mut session = session(project);
    open(&mut session, vec![image("a")]);

    session.canvas_mut().toggle_lock("car");
    draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 20.0, 20.0));
    let saves = session.persistence().asset_save_count();
    assert!(matches!(
        block_on(session.submit_points(&FakeDotToRect)),
        Err(EngineError::NoPointRegions)
    ));
    assert!(matches!(
        block_on(session.begin_submit_points()),
        Err(EngineError::NoPointRegions)
    ));
    assert_eq!(session.persistence().asset_save_count(), saves);
    assert!(session.persistence().stored("a").unwrap().regions.is_empty());
    assert!(session.canvas().is_dirty());
}

/// Draw a freehand stroke through the session's stroke canvas.
fn paint(session: &mut TestSession, points: &[(f64, f64)]) -> Region {
    let pixel = session.pixel_canvas_mut();
    assert!(pixel.set_selection_mode(SelectionMode::Polyline));
    let (x, y) = points[0];
    assert!(pixel.begin_stroke(Point::new(x, y)));
    for &(x, y) in &points[1..] {
        pixel.extend_stroke(Point::new(x, y));
    }
    let region = pixel.end_stroke().unwrap().unwrap();
    session.pump_events();
    region
}

#[test]
fn test_paint_strokes_are_saved() {
    let persistence = MemoryPersistence::new();
    let meta = AssetMetadata::new(image("a"))
        .with_regions(vec![Region::rectangle("box", 0.0, 0.0, 10.0, 10.0).with_tags(["car"])]);
    persistence.insert(&meta).unwrap();
    let mut session = session_with(
        EngineConfig::new(),
        project(TaskType::Segmentation, TaskStatus::InProgress),
        persistence,
    );
    open(&mut session, vec![image("a")]);
    assert_eq!(session.canvas_kind(), crate::canvas::CanvasKind::Pixel);

    assert!(session.handle_hotkey(KeyCode::Key1, Modifiers::only(Modifier::Ctrl)));
    assert!(session.pixel_canvas().locked_tags().contains("car"));
    let stroke = paint(&mut session, &[(100.0, 100.0), (150.0, 120.0), (200.0, 100.0)]);
    assert!(session.tracker().is_dirty());
    assert!(session.is_dirty());
    assert_eq!(session.selection(), &[stroke.clone()]);

    assert!(block_on(session.store_asset_metadata()).unwrap());
    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.regions.len(), 2);
    assert!(stored.regions.iter().any(|r| r.id == "box"));
    let saved = stored.regions.iter().find(|r| r.id == stroke.id).unwrap();
    assert_eq!(saved.region_type, RegionType::Polyline);
    assert_eq!(saved.points.len(), 3);
    assert_eq!(saved.tags, vec!["car".to_string()]);
    assert!(!session.is_dirty());
    assert!(!session.tracker().is_dirty());
}

#[test]
fn test_untagged_stroke_blocks_switching() {
    let mut session = session(project(TaskType::Segmentation, TaskStatus::InProgress));
    open(&mut session, vec![image("a"), image("b")]);
    let stroke = paint(&mut session, &[(10.0, 10.0), (40.0, 40.0)]);

    let err = block_on(session.goto_root_asset(1)).unwrap_err();
    assert!(matches!(err, EngineError::UntaggedRegions { count: 1 }));

    // the stroke is still selected, so the tag hot key reaches it
    assert!(session.handle_hotkey(KeyCode::Key2, Modifiers::none()));
    assert!(block_on(session.goto_root_asset(1)).unwrap());
    let stored = session.persistence().stored("a").unwrap();
    assert_eq!(stored.regions.len(), 1);
    assert_eq!(stored.regions[0].id, stroke.id);
    assert_eq!(stored.regions[0].tags, vec!["person".to_string()]);
    assert!(session.pixel_canvas().regions().is_empty());
}

#[test]
fn test_leaving_paint_keeps_strokes() {
    let mut session = session(project(TaskType::Segmentation, TaskStatus::InProgress));
    open(&mut session, vec![image("a")]);
    assert!(session.handle_hotkey(KeyCode::Key1, Modifiers::only(Modifier::Ctrl)));
    let stroke = paint(&mut session, &[(10.0, 10.0), (40.0, 40.0)]);

    session.set_context_override(Some(EditingContext::Revise));
    assert_eq!(session.canvas_kind(), crate::canvas::CanvasKind::Vector);
    assert!(session.canvas().region(&stroke.id).is_some());
    assert!(session.is_dirty());
    assert_eq!(session.pixel_canvas().regions().len(), 1);

    assert!(block_on(session.store_asset_metadata()).unwrap());
    assert_eq!(session.persistence().stored("a").unwrap().regions.len(), 1);
}

#[test]
fn test_tick_saves_after_debounce() {
    let mut project = project(TaskType::Annotation, TaskStatus::Review);
    project.auto_save = true;
    let mut config = EngineConfig::new();
    config.autosave.debounce_ms = 0;
    config.autosave.interval_ms = 0;
    let mut session = session_with(config, project, MemoryPersistence::new());
    open(&mut session, vec![image("a")]);

    assert!(!block_on(session.tick()).unwrap());
    session.canvas_mut().toggle_lock("car");
    draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 20.0, 20.0));
    assert!(block_on(session.tick()).unwrap());
    assert_eq!(session.persistence().stored("a").unwrap().regions.len(), 1);
    assert!(!session.tracker().is_dirty());
}

#[test]
fn test_teardown_flushes() {
    let mut session = session(project(TaskType::Annotation, TaskStatus::Review));
    open(&mut session, vec![image("a")]);
    session.canvas_mut().toggle_lock("car");
    draw(&mut session, SelectionMode::Rect, RegionData::rect(10.0, 10.0, 20.0, 20.0));
    block_on(session.teardown()).unwrap();
    assert!(session.active_asset().is_none());
    assert_eq!(session.persistence().stored("a").unwrap().regions.len(), 1);
}

#[test]
fn test_canvas_kind_follows_context() {
    let session = session(project(TaskType::Segmentation, TaskStatus::InProgress));
    assert_eq!(session.canvas_kind(), crate::canvas::CanvasKind::Pixel);
}
