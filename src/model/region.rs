//! Region geometry and the region record stored per asset.
//!
//! All coordinates are in the asset's native pixel space. Screen or canvas
//! coordinates only exist inside [`crate::transform`] and the drawing surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance used when comparing geometry produced by floating point scaling.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Unique identifier of a region within one asset.
pub type RegionId = String;

/// Generate a fresh region identifier.
pub fn new_region_id() -> RegionId {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Return this point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < GEOMETRY_EPSILON && (self.y - other.y).abs() < GEOMETRY_EPSILON
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge X coordinate
    pub left: f64,
    /// Top edge Y coordinate
    pub top: f64,
    /// Width of the box
    pub width: f64,
    /// Height of the box
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a bounding box from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            left: p1.x.min(p2.x),
            top: p1.y.min(p2.y),
            width: (p1.x - p2.x).abs(),
            height: (p1.y - p2.y).abs(),
        }
    }

    /// Smallest box enclosing all points, or None for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// True when either side has no extent.
    pub fn is_degenerate(&self) -> bool {
        self.width.abs() < GEOMETRY_EPSILON || self.height.abs() < GEOMETRY_EPSILON
    }

    pub fn approx_eq(&self, other: &BoundingBox) -> bool {
        (self.left - other.left).abs() < GEOMETRY_EPSILON
            && (self.top - other.top).abs() < GEOMETRY_EPSILON
            && (self.width - other.width).abs() < GEOMETRY_EPSILON
            && (self.height - other.height).abs() < GEOMETRY_EPSILON
    }
}

/// Geometric kind of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionType {
    Point,
    Rectangle,
    Polygon,
    Polyline,
}

impl RegionType {
    /// Get the display name for this region type.
    pub fn name(&self) -> &'static str {
        match self {
            RegionType::Point => "Point",
            RegionType::Rectangle => "Rectangle",
            RegionType::Polygon => "Polygon",
            RegionType::Polyline => "Polyline",
        }
    }

    pub fn all() -> &'static [RegionType] {
        &[
            RegionType::Point,
            RegionType::Rectangle,
            RegionType::Polygon,
            RegionType::Polyline,
        ]
    }

    /// Types whose bounding box must have a positive area.
    pub fn is_box_like(&self) -> bool {
        matches!(self, RegionType::Rectangle)
    }

    /// Minimum number of points a drawn primitive of this type needs.
    pub fn min_points(&self) -> usize {
        match self {
            RegionType::Point => 1,
            RegionType::Rectangle => 1,
            RegionType::Polyline => 2,
            RegionType::Polygon => 3,
        }
    }
}

/// A tagged geometric annotation on an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Unique identifier within the asset.
    pub id: RegionId,
    /// Geometric kind.
    #[serde(rename = "type")]
    pub region_type: RegionType,
    /// Tag names in application order, without duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Vertices in native asset space.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Bounding box in native asset space.
    pub bounding_box: BoundingBox,
    /// Free-form attribute values keyed by project attribute key name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Region {
    /// Create an untagged region from its geometry.
    pub fn new(
        id: impl Into<RegionId>,
        region_type: RegionType,
        points: Vec<Point>,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            id: id.into(),
            region_type,
            tags: Vec::new(),
            points,
            bounding_box,
            attributes: BTreeMap::new(),
        }
    }

    /// Rectangle region whose points are the box corners.
    pub fn rectangle(id: impl Into<RegionId>, left: f64, top: f64, width: f64, height: f64) -> Self {
        let bbox = BoundingBox::new(left, top, width, height);
        Self::new(id, RegionType::Rectangle, bbox.corners().to_vec(), bbox)
    }

    /// Single point region with a zero-sized box.
    pub fn point(id: impl Into<RegionId>, x: f64, y: f64) -> Self {
        Self::new(
            id,
            RegionType::Point,
            vec![Point::new(x, y)],
            BoundingBox::new(x, y, 0.0, 0.0),
        )
    }

    /// Polygon or polyline region; the box encloses the vertices.
    pub fn with_vertices(id: impl Into<RegionId>, region_type: RegionType, points: Vec<Point>) -> Self {
        let bbox = BoundingBox::enclosing(&points).unwrap_or_default();
        Self::new(id, region_type, points, bbox)
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Append a tag unless already present. Returns true if added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.has_tag(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag if present. Returns true if removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Copy of this region moved by `(dx, dy)`, keeping its id.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| p.translated(dx, dy)).collect(),
            bounding_box: self.bounding_box.translated(dx, dy),
            ..self.clone()
        }
    }

    /// Make points and box agree: box-like regions take the corners of their
    /// box, other types a box enclosing their points.
    pub fn sync_bounding_box(&mut self) {
        if self.region_type.is_box_like() {
            self.points = self.bounding_box.corners().to_vec();
        } else if let Some(bbox) = BoundingBox::enclosing(&self.points) {
            self.bounding_box = bbox;
        }
    }

    /// True when both regions occupy the same position, ignoring id and tags.
    pub fn same_geometry(&self, other: &Region) -> bool {
        self.region_type == other.region_type
            && self.bounding_box.approx_eq(&other.bounding_box)
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.approx_eq(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_corners() {
        let bbox = BoundingBox::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 80.0));
        assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 40.0, 60.0));

        let reversed = BoundingBox::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(bbox, reversed);
    }

    #[test]
    fn test_enclosing_box() {
        let points = vec![
            Point::new(5.0, 9.0),
            Point::new(1.0, 3.0),
            Point::new(7.0, 4.0),
        ];
        let bbox = BoundingBox::enclosing(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(1.0, 3.0, 6.0, 6.0));
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_rectangle_points_match_box() {
        let region = Region::rectangle("r1", 10.0, 10.0, 30.0, 20.0);
        assert_eq!(region.points.len(), 4);
        assert_eq!(BoundingBox::enclosing(&region.points), Some(region.bounding_box));
    }

    #[test]
    fn test_tag_membership() {
        let mut region = Region::point("p", 1.0, 1.0);
        assert!(region.add_tag("car"));
        assert!(!region.add_tag("car"));
        assert_eq!(region.tags, vec!["car"]);
        assert!(region.remove_tag("car"));
        assert!(!region.remove_tag("car"));
        assert!(!region.is_tagged());
    }

    #[test]
    fn test_translated_keeps_shape() {
        let region = Region::rectangle("r", 0.0, 0.0, 10.0, 10.0);
        let moved = region.translated(5.0, 7.0);
        assert_eq!(moved.bounding_box, BoundingBox::new(5.0, 7.0, 10.0, 10.0));
        assert!(!moved.same_geometry(&region));
        assert!(moved.translated(-5.0, -7.0).same_geometry(&region));
    }

    #[test]
    fn test_region_json_field_names() {
        let region = Region::rectangle("r", 1.0, 2.0, 3.0, 4.0).with_tags(["car"]);
        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains("\"type\":\"RECTANGLE\""));
        assert!(json.contains("\"boundingBox\""));
    }
}
