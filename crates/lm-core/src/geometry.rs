//! Pure 2D geometry for edge endpoints and hit regions.
//!
//! Nothing here knows about the host: node rectangles come in through
//! [`NodeMeasure`], so tests run against synthetic footprints.

use crate::id::NodeId;
use crate::model::{LoreMap, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point in either world or screen space (the caller knows which).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_extents(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// AABB overlap test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

// ─── Edge intersection ───────────────────────────────────────────────────

/// Where a ray from `center` along `(dir_x, dir_y)` leaves a rectangle with
/// the given half extents.
///
/// A zero direction returns `center` unchanged.
pub fn edge_point(center: Point, half_w: f32, half_h: f32, dir_x: f32, dir_y: f32) -> Point {
    if dir_x == 0.0 && dir_y == 0.0 {
        return center;
    }

    let abs_dx = dir_x.abs();
    let abs_dy = dir_y.abs();

    // Compare slopes: a wider-than-tall direction exits a vertical side.
    // The exit coordinate is snapped to the side itself so it is exact.
    if abs_dx * half_h > abs_dy * half_w {
        let t = half_w / abs_dx;
        Point::new(center.x + half_w.copysign(dir_x), center.y + dir_y * t)
    } else {
        let t = half_h / abs_dy;
        Point::new(center.x + dir_x * t, center.y + half_h.copysign(dir_y))
    }
}

/// Endpoints of a connection drawn between two node rectangles.
///
/// Both points lie on the respective borders along the center-to-center line.
pub fn connection_endpoints(from: &Rect, to: &Rect) -> (Point, Point) {
    let from_center = from.center();
    let to_center = to.center();
    let dx = to_center.x - from_center.x;
    let dy = to_center.y - from_center.y;

    let (fw, fh) = from.half_extents();
    let (tw, th) = to.half_extents();

    (
        edge_point(from_center, fw, fh, dx, dy),
        edge_point(to_center, tw, th, -dx, -dy),
    )
}

/// Distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = (b.x - a.x, b.y - a.y);
    let ap = (p.x - a.x, p.y - a.y);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if len_sq < f32::EPSILON {
        return p.distance(a);
    }

    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * ab.0, a.y + t * ab.1))
}

// ─── Rendered bounds ─────────────────────────────────────────────────────

/// Source of node footprints in world units.
///
/// The rendering layer implements this from whatever it actually laid out;
/// `None` means the node has not been measured yet.
pub trait NodeMeasure {
    fn rendered_size(&self, id: NodeId) -> Option<(f32, f32)>;
}

/// Every node has the same footprint.
#[derive(Debug, Clone, Copy)]
pub struct FixedFootprint {
    pub width: f32,
    pub height: f32,
}

impl Default for FixedFootprint {
    fn default() -> Self {
        Self {
            width: 178.0,
            height: 50.0,
        }
    }
}

impl NodeMeasure for FixedFootprint {
    fn rendered_size(&self, _id: NodeId) -> Option<(f32, f32)> {
        Some((self.width, self.height))
    }
}

/// Sizes reported by the host after layout, keyed by node.
#[derive(Debug, Clone, Default)]
pub struct MeasuredFootprints {
    sizes: HashMap<NodeId, (f32, f32)>,
}

impl MeasuredFootprints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rendered size of a node. Non-positive sizes are ignored.
    pub fn record(&mut self, id: NodeId, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.sizes.insert(id, (width, height));
        }
    }

    pub fn forget(&mut self, id: NodeId) {
        self.sizes.remove(&id);
    }
}

impl NodeMeasure for MeasuredFootprints {
    fn rendered_size(&self, id: NodeId) -> Option<(f32, f32)> {
        self.sizes.get(&id).copied()
    }
}

/// World-space rectangle of a node: its position plus its measured size,
/// or `fallback` when unmeasured. `None` if the node does not exist.
pub fn node_rect(
    map: &LoreMap,
    id: NodeId,
    measure: &dyn NodeMeasure,
    fallback: (f32, f32),
) -> Option<Rect> {
    let node = map.get(id)?;
    let (w, h) = measure.rendered_size(id).unwrap_or(fallback);
    Some(Rect::new(node.position.x, node.position.y, w, h))
}
