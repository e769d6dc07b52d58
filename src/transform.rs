//! Coordinate transforms between stored asset space and the drawing surface.
//!
//! Three spaces exist:
//! - source space: the asset's native pixel grid, the only space regions are stored in
//! - frame space: the surface's drawing grid, source scaled per axis to the frame size
//! - viewport space: frame space shifted by the screen pan
//!
//! Zoom only changes the frame size the surface reports. Zoom and pan are view
//! state kept in [`WorkViewData`] and never touch stored geometry.

use thiserror::Error;

use crate::constants::{DEFAULT_MAX_ZOOM, MIN_ZOOM};
use crate::model::{BoundingBox, GEOMETRY_EPSILON, Point, Region, RegionType, ScreenPos, Size, WorkViewData};

/// Errors from checked transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// One of the sizes has a zero, negative or non-finite side
    #[error("Degenerate size {width}x{height}")]
    DegenerateSize { width: f64, height: f64 },
}

/// Geometry of a drawn or rendered primitive in one coordinate space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub points: Vec<Point>,
}

impl RegionData {
    pub fn new(x: f64, y: f64, width: f64, height: f64, points: Vec<Point>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            points,
        }
    }

    /// Rectangle primitive whose points are its corners.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        let bbox = BoundingBox::new(x, y, width, height);
        Self::new(x, y, width, height, bbox.corners().to_vec())
    }

    /// Primitive of a single point.
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0, vec![Point::new(x, y)])
    }

    /// Primitive from a vertex path; the box encloses the vertices.
    pub fn path(points: Vec<Point>) -> Self {
        let bbox = BoundingBox::enclosing(&points).unwrap_or_default();
        Self::new(bbox.left, bbox.top, bbox.width, bbox.height, points)
    }

    /// Geometry of a stored region, in source space.
    pub fn from_region(region: &Region) -> Self {
        let bbox = region.bounding_box;
        Self::new(bbox.left, bbox.top, bbox.width, bbox.height, region.points.clone())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    /// Write this geometry into a region, keeping its id, tags and attributes.
    pub fn apply_to(&self, region: &mut Region) {
        region.bounding_box = self.bounding_box();
        region.points = self.points.clone();
    }

    /// True when the primitive has no usable extent for the given type.
    pub fn is_empty_for(&self, region_type: RegionType) -> bool {
        if self.points.is_empty() {
            return true;
        }
        if region_type.is_box_like() {
            return self.width.abs() < GEOMETRY_EPSILON || self.height.abs() < GEOMETRY_EPSILON;
        }
        self.points.len() < region_type.min_points()
    }

    fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
            points: self.points.iter().map(|p| Point::new(p.x * sx, p.y * sy)).collect(),
        }
    }
}

fn check_size(size: Size) -> Result<(), TransformError> {
    if size.is_valid() {
        Ok(())
    } else {
        Err(TransformError::DegenerateSize {
            width: size.width,
            height: size.height,
        })
    }
}

/// Scale source-space geometry onto the frame.
///
/// Sizes must be positive; use [`try_to_frame_space`] where that is not
/// already guaranteed.
pub fn to_frame_space(data: &RegionData, source: Size, frame: Size) -> RegionData {
    debug_assert!(source.is_valid() && frame.is_valid(), "degenerate transform size");
    data.scaled(frame.width / source.width, frame.height / source.height)
}

/// Scale frame-space geometry back to the asset's native pixels.
pub fn to_source_space(data: &RegionData, source: Size, frame: Size) -> RegionData {
    debug_assert!(source.is_valid() && frame.is_valid(), "degenerate transform size");
    data.scaled(source.width / frame.width, source.height / frame.height)
}

pub fn try_to_frame_space(data: &RegionData, source: Size, frame: Size) -> Result<RegionData, TransformError> {
    check_size(source)?;
    check_size(frame)?;
    Ok(data.scaled(frame.width / source.width, frame.height / source.height))
}

pub fn try_to_source_space(data: &RegionData, source: Size, frame: Size) -> Result<RegionData, TransformError> {
    check_size(source)?;
    check_size(frame)?;
    Ok(data.scaled(source.width / frame.width, source.height / frame.height))
}

/// Frame-space geometry of a stored region.
pub fn region_to_frame(region: &Region, source: Size, frame: Size) -> Result<RegionData, TransformError> {
    try_to_frame_space(&RegionData::from_region(region), source, frame)
}

/// Zoom and pan of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Viewport {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity viewport (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Restore a viewport from stored view state, clamping the zoom.
    pub fn from_work_view(view: &WorkViewData, max_zoom: f64) -> Self {
        Self::new(
            clamp_zoom(view.zoom_scale, max_zoom),
            view.screen_pos.left,
            view.screen_pos.top,
        )
    }

    pub fn to_work_view(&self) -> WorkViewData {
        WorkViewData {
            zoom_scale: self.zoom,
            screen_pos: ScreenPos::new(self.pan_x, self.pan_y),
        }
    }

    /// Size of the frame when the unzoomed frame is `base`.
    pub fn frame_size(&self, base: Size) -> Size {
        base.scaled(self.zoom)
    }

    /// Map a viewport point to frame space.
    pub fn viewport_to_frame(&self, p: Point) -> Point {
        Point::new(p.x - self.pan_x, p.y - self.pan_y)
    }

    /// Map a frame point to viewport space.
    pub fn frame_to_viewport(&self, p: Point) -> Point {
        Point::new(p.x + self.pan_x, p.y + self.pan_y)
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, max_zoom]`, keeping the pan.
    pub fn with_zoom(&self, zoom: f64, max_zoom: f64) -> Viewport {
        Viewport {
            zoom: clamp_zoom(zoom, max_zoom),
            ..*self
        }
    }

    /// Zoom in by a factor (e.g., 1.2 for 20% zoom in).
    pub fn zoom_in(&self, factor: f64, max_zoom: f64) -> Viewport {
        self.with_zoom(self.zoom * factor, max_zoom)
    }

    /// Zoom out by a factor.
    pub fn zoom_out(&self, factor: f64, max_zoom: f64) -> Viewport {
        self.with_zoom(self.zoom / factor, max_zoom)
    }

    /// Apply a pan delta.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Viewport {
        Viewport {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// Zoom while keeping the frame point under the cursor fixed.
    pub fn zoom_to_cursor(&self, new_zoom: f64, cursor: Point, max_zoom: f64) -> Viewport {
        let new_zoom = clamp_zoom(new_zoom, max_zoom);
        // Unzoomed frame point under cursor
        let img_x = (cursor.x - self.pan_x) / self.zoom;
        let img_y = (cursor.y - self.pan_y) / self.zoom;
        Viewport {
            zoom: new_zoom,
            pan_x: cursor.x - img_x * new_zoom,
            pan_y: cursor.y - img_y * new_zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

/// Clamp a zoom scale to `[MIN_ZOOM, max_zoom]`. Non-finite input resets to 1.
pub fn clamp_zoom(zoom: f64, max_zoom: f64) -> f64 {
    if !zoom.is_finite() {
        return 1.0;
    }
    let max_zoom = if max_zoom.is_finite() && max_zoom >= MIN_ZOOM {
        max_zoom
    } else {
        DEFAULT_MAX_ZOOM
    };
    zoom.clamp(MIN_ZOOM, max_zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_data_eq(a: &RegionData, b: &RegionData) {
        assert!(approx_eq(a.x, b.x) && approx_eq(a.y, b.y));
        assert!(approx_eq(a.width, b.width) && approx_eq(a.height, b.height));
        assert_eq!(a.points.len(), b.points.len());
        for (p, q) in a.points.iter().zip(&b.points) {
            assert!(approx_eq(p.x, q.x) && approx_eq(p.y, q.y));
        }
    }

    #[test]
    fn test_transform_is_invertible() {
        let source = Size::new(1920.0, 1080.0);
        let frames = [Size::new(640.0, 360.0), Size::new(1000.0, 700.0), Size::new(3840.0, 2160.0)];
        let shapes = [
            RegionData::rect(12.5, 40.0, 300.0, 120.25),
            RegionData::point(1919.0, 0.0),
            RegionData::path(vec![Point::new(1.0, 2.0), Point::new(500.0, 3.0), Point::new(250.0, 900.0)]),
        ];
        for frame in frames {
            for shape in &shapes {
                let there = to_frame_space(shape, source, frame);
                let back = to_source_space(&there, source, frame);
                assert_data_eq(&back, shape);
            }
        }
    }

    #[test]
    fn test_zoomed_draw_maps_to_source() {
        // 800x600 asset at zoom 2 is drawn on a 1600x1200 frame
        let source = Size::new(800.0, 600.0);
        let viewport = Viewport::identity().with_zoom(2.0, DEFAULT_MAX_ZOOM);
        let frame = viewport.frame_size(source);
        assert_eq!(frame, Size::new(1600.0, 1200.0));

        let drawn = RegionData::rect(100.0, 100.0, 100.0, 50.0);
        let stored = to_source_space(&drawn, source, frame);
        assert!(stored.bounding_box().approx_eq(&BoundingBox::new(50.0, 50.0, 50.0, 25.0)));
    }

    #[test]
    fn test_checked_transform_rejects_degenerate_size() {
        let data = RegionData::point(1.0, 1.0);
        let err = try_to_frame_space(&data, Size::new(0.0, 10.0), Size::new(10.0, 10.0));
        assert_eq!(err, Err(TransformError::DegenerateSize { width: 0.0, height: 10.0 }));
        assert!(try_to_source_space(&data, Size::new(10.0, 10.0), Size::new(10.0, -1.0)).is_err());
    }

    #[test]
    fn test_empty_primitives() {
        assert!(RegionData::rect(5.0, 5.0, 0.0, 10.0).is_empty_for(RegionType::Rectangle));
        assert!(!RegionData::rect(5.0, 5.0, 1.0, 1.0).is_empty_for(RegionType::Rectangle));
        assert!(!RegionData::point(0.0, 0.0).is_empty_for(RegionType::Point));
        assert!(RegionData::default().is_empty_for(RegionType::Point));
        let two = RegionData::path(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(two.is_empty_for(RegionType::Polygon));
        assert!(!two.is_empty_for(RegionType::Polyline));
    }

    #[test]
    fn test_pan_round_trip() {
        let viewport = Viewport::new(1.5, 30.0, -12.0);
        let p = Point::new(200.0, 100.0);
        let frame = viewport.viewport_to_frame(p);
        assert_eq!(frame, Point::new(170.0, 112.0));
        assert_eq!(viewport.frame_to_viewport(frame), p);
    }

    #[test]
    fn test_zoom_clamped() {
        let viewport = Viewport::identity();
        assert_eq!(viewport.zoom_in(100.0, DEFAULT_MAX_ZOOM).zoom, DEFAULT_MAX_ZOOM);
        assert_eq!(viewport.zoom_out(100.0, DEFAULT_MAX_ZOOM).zoom, MIN_ZOOM);
        assert_eq!(clamp_zoom(f64::NAN, 10.0), 1.0);
    }

    #[test]
    fn test_zoom_to_cursor_preserves_cursor_point() {
        let viewport = Viewport::new(1.0, 50.0, 30.0);
        let cursor = Point::new(150.0, 120.0);
        let before = Point::new((cursor.x - viewport.pan_x) / viewport.zoom, (cursor.y - viewport.pan_y) / viewport.zoom);

        let zoomed = viewport.zoom_to_cursor(2.0, cursor, DEFAULT_MAX_ZOOM);
        let after = Point::new((cursor.x - zoomed.pan_x) / zoomed.zoom, (cursor.y - zoomed.pan_y) / zoomed.zoom);
        assert!(approx_eq(before.x, after.x) && approx_eq(before.y, after.y));
    }

    #[test]
    fn test_work_view_round_trip() {
        let view = WorkViewData {
            zoom_scale: 3.0,
            screen_pos: ScreenPos::new(4.0, 5.0),
        };
        assert_eq!(Viewport::from_work_view(&view, DEFAULT_MAX_ZOOM).to_work_view(), view);
    }
}
