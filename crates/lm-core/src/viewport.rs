//! Pan/scale camera mapping world coordinates to container pixels.
//!
//! `world = (screen - pan) / scale`. The scale always stays within the
//! configured bounds; every operation that changes it goes through
//! [`CanvasConfig::clamp_scale`].

use crate::config::CanvasConfig;
use crate::geometry::{Point, Rect};
use crate::model::Position;

/// Pixel size of the rendering surface, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel convention: scrolling down (positive delta) zooms out.
    pub fn from_wheel(delta_y: f32) -> Self {
        if delta_y > 0.0 { Self::Out } else { Self::In }
    }

    pub fn factor(self, step: f32) -> f32 {
        match self {
            Self::In => step,
            Self::Out => 1.0 / step,
        }
    }
}

/// Session-only camera state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(pan_x: f32, pan_y: f32, scale: f32) -> Self {
        Self {
            pan_x,
            pan_y,
            scale,
        }
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.scale,
            (screen.y - self.pan_y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan_x,
            world.y * self.scale + self.pan_y,
        )
    }

    /// Scale a world-space rectangle into screen space.
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.world_to_screen(Point::new(rect.x, rect.y));
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.scale,
            rect.height * self.scale,
        )
    }

    /// Zoom by one step around `cursor`, keeping the world point under it fixed.
    pub fn zoom_at(&mut self, cursor: Point, direction: ZoomDirection, config: &CanvasConfig) {
        let target = self.scale * direction.factor(config.zoom_step);
        self.set_scale_at(cursor, target, config);
    }

    /// Set an absolute scale (clamped) around `cursor`.
    pub fn set_scale_at(&mut self, cursor: Point, scale: f32, config: &CanvasConfig) {
        let new_scale = config.clamp_scale(scale);
        let ratio = new_scale / self.scale;
        self.pan_x = cursor.x - (cursor.x - self.pan_x) * ratio;
        self.pan_y = cursor.y - (cursor.y - self.pan_y) * ratio;
        self.scale = new_scale;
    }

    /// Keyboard zoom: one step around the container center.
    pub fn zoom_by_step(
        &mut self,
        direction: ZoomDirection,
        container: ContainerSize,
        config: &CanvasConfig,
    ) {
        self.zoom_at(container.center(), direction, config);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Frame every position in the container without upscaling past 1:1.
    ///
    /// Positions are top-left anchors, so the padding is asymmetric. An empty
    /// input resets to the origin.
    pub fn fit_to_content<I>(&mut self, positions: I, container: ContainerSize, config: &CanvasConfig)
    where
        I: IntoIterator<Item = Position>,
    {
        let Some(bounds) = bounding_box(positions) else {
            self.reset();
            return;
        };
        if container.is_empty() {
            log::debug!("fit skipped: container has no area");
            return;
        }

        let (left, top, right, bottom) = config.fit_padding;
        let min_x = bounds.x - left;
        let min_y = bounds.y - top;
        let content_w = bounds.width + left + right;
        let content_h = bounds.height + top + bottom;

        let scale = (container.width * config.fit_ratio / content_w)
            .min(container.height * config.fit_ratio / content_h)
            .min(1.0);
        let scale = config.clamp_scale(scale);

        let mid = Point::new(min_x + content_w / 2.0, min_y + content_h / 2.0);
        let center = container.center();
        self.scale = scale;
        self.pan_x = center.x - mid.x * scale;
        self.pan_y = center.y - mid.y * scale;
    }

    /// Move the camera so `world` sits at the container center. Scale is kept.
    pub fn center_on(&mut self, world: Point, container: ContainerSize) {
        let center = container.center();
        self.pan_x = center.x - world.x * self.scale;
        self.pan_y = center.y - world.y * self.scale;
    }

    /// World point currently at the container center.
    pub fn viewport_center(&self, container: ContainerSize) -> Point {
        self.screen_to_world(container.center())
    }

    /// World-space rectangle currently visible in the container.
    pub fn visible_world_rect(&self, container: ContainerSize) -> Rect {
        let top_left = self.screen_to_world(Point::new(0.0, 0.0));
        Rect::new(
            top_left.x,
            top_left.y,
            container.width / self.scale,
            container.height / self.scale,
        )
    }
}

/// Tight box around a set of positions; `None` when empty.
pub fn bounding_box<I>(positions: I) -> Option<Rect>
where
    I: IntoIterator<Item = Position>,
{
    let mut iter = positions.into_iter();
    let first = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in iter {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}
