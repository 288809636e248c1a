//! Fixed-size overview of the whole map.
//!
//! The overview shows every node as a dot plus the outline of what the main
//! viewport currently sees. Clicking it recenters the main viewport without
//! touching its scale.

use crate::config::MinimapConfig;
use crate::geometry::{Point, Rect};
use crate::id::NodeId;
use crate::model::{LoreMap, Position};
use crate::viewport::{ContainerSize, Viewport, bounding_box};

/// Uniform mapping between world space and overview pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapProjection {
    /// Padded world bounds shown by the overview.
    pub bounds: Rect,
    pub scale: f32,
}

impl MinimapProjection {
    /// Build the projection for a set of node positions.
    pub fn new<I>(positions: I, config: &MinimapConfig) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let bounds = match bounding_box(positions) {
            Some(b) => Rect::new(
                b.x - config.padding,
                b.y - config.padding,
                b.width + config.padding * 2.0,
                b.height + config.padding * 2.0,
            ),
            None => {
                let half = config.empty_half_extent;
                Rect::new(-half, -half, half * 2.0, half * 2.0)
            }
        };
        let scale = (config.width / bounds.width).min(config.height / bounds.height);
        Self { bounds, scale }
    }

    pub fn for_map(map: &LoreMap, config: &MinimapConfig) -> Self {
        Self::new(map.nodes().map(|n| n.position), config)
    }

    /// World point to overview pixel.
    pub fn project(&self, world: Point) -> Point {
        Point::new(
            (world.x - self.bounds.x) * self.scale,
            (world.y - self.bounds.y) * self.scale,
        )
    }

    /// Overview pixel back to world point.
    pub fn click_to_world(&self, local: Point) -> Point {
        Point::new(
            local.x / self.scale + self.bounds.x,
            local.y / self.scale + self.bounds.y,
        )
    }

    pub fn project_rect(&self, rect: &Rect) -> Rect {
        let origin = self.project(Point::new(rect.x, rect.y));
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.scale,
            rect.height * self.scale,
        )
    }

    /// Outline of the main viewport's visible area, in overview pixels.
    pub fn viewport_outline(&self, viewport: &Viewport, container: ContainerSize) -> Rect {
        self.project_rect(&viewport.visible_world_rect(container))
    }

    /// Recenter `viewport` on the world point under an overview click.
    pub fn navigate(&self, viewport: &mut Viewport, local: Point, container: ContainerSize) {
        let target = self.click_to_world(local);
        log::trace!("minimap navigate to ({:.1}, {:.1})", target.x, target.y);
        viewport.center_on(target, container);
    }
}

/// Where the overview sits inside the canvas container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapFrame {
    pub rect: Rect,
}

impl MinimapFrame {
    /// Anchor to the container's bottom-right corner.
    pub fn place(container: ContainerSize, config: &MinimapConfig) -> Self {
        Self {
            rect: Rect::new(
                container.width - config.margin - config.width,
                container.height - config.margin - config.height,
                config.width,
                config.height,
            ),
        }
    }

    pub fn contains(&self, screen: Point) -> bool {
        self.rect.contains(screen.x, screen.y)
    }

    /// Container coordinates to overview-local pixels.
    pub fn to_local(&self, screen: Point) -> Point {
        Point::new(screen.x - self.rect.x, screen.y - self.rect.y)
    }
}

/// One node as drawn in the overview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapDot {
    pub id: NodeId,
    pub at: Point,
    pub selected: bool,
    pub party_location: bool,
}

pub fn dots(map: &LoreMap, projection: &MinimapProjection, selected: Option<NodeId>) -> Vec<MinimapDot> {
    map.nodes()
        .map(|node| MinimapDot {
            id: node.id,
            at: projection.project(node.position.into()),
            selected: selected == Some(node.id),
            party_location: node.is_party_location,
        })
        .collect()
}
