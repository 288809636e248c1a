//! Hit testing: screen point → node or connection.
//!
//! Nodes are checked front-to-back (last inserted paints on top). Connections
//! are checked against their widened hit regions, nearest line first.

use crate::display::EdgeGeometry;
use lm_core::geometry::{NodeMeasure, Point, distance_to_segment, node_rect};
use lm_core::id::{ConnectionId, NodeId};
use lm_core::model::LoreMap;
use lm_core::{CanvasConfig, Viewport};

/// Find the topmost node under a screen point.
/// Returns `None` if no node is hit (background).
pub fn hit_test_node(
    map: &LoreMap,
    viewport: &Viewport,
    measure: &dyn NodeMeasure,
    config: &CanvasConfig,
    screen: Point,
) -> Option<NodeId> {
    let world = viewport.screen_to_world(screen);
    let ids: Vec<NodeId> = map.nodes().map(|n| n.id).collect();

    ids.into_iter().rev().find(|&id| {
        node_rect(map, id, measure, config.default_footprint)
            .is_some_and(|r| r.contains(world.x, world.y))
    })
}

/// Find the connection whose hit region contains a screen point.
/// When regions overlap, the nearest line wins.
pub fn hit_test_edge(edges: &[EdgeGeometry], screen: Point) -> Option<ConnectionId> {
    edges
        .iter()
        .map(|e| (e.id, distance_to_segment(screen, e.from, e.to), e.hit_half_width))
        .filter(|(_, d, half)| d <= half)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _, _)| id)
}
