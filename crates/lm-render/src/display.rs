//! Map → screen-space display list.
//!
//! Each connection is computed independently from its two node rectangles
//! and the viewport. Connections whose endpoints no longer exist are
//! skipped; they never reach the painter.

use lm_core::condition::{NameLookup, NodeBadges, StateMap, badges};
use lm_core::geometry::{NodeMeasure, Point, Rect, connection_endpoints, edge_point, node_rect};
use lm_core::id::{ConnectionId, NodeId};
use lm_core::model::{Color, HIGHLIGHT_COLOR, LoreMap};
use lm_core::{CanvasConfig, Viewport};

/// One connection, ready to paint and hit-test.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    pub id: ConnectionId,
    /// Screen-space start, on the source node's border.
    pub from: Point,
    /// Screen-space end, on the target node's border.
    pub to: Point,
    pub stroke_width: f32,
    /// Half the width of the invisible hit region.
    pub hit_half_width: f32,
    pub label: Option<String>,
    /// Midpoint pushed off the line along its left-hand normal.
    pub label_anchor: Point,
    pub color: Color,
    pub highlighted: bool,
}

impl EdgeGeometry {
    pub fn midpoint(&self) -> Point {
        Point::new((self.from.x + self.to.x) / 2.0, (self.from.y + self.to.y) / 2.0)
    }
}

/// The rubber-band edge shown while a connection is being created.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEdge {
    pub from: Point,
    pub to: Point,
    pub stroke_width: f32,
    pub color: Color,
}

/// One node, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub id: NodeId,
    /// Screen-space rectangle.
    pub rect: Rect,
    pub title: String,
    pub selected: bool,
    pub badges: NodeBadges,
}

fn screen_rect(
    map: &LoreMap,
    id: NodeId,
    viewport: &Viewport,
    measure: &dyn NodeMeasure,
    config: &CanvasConfig,
) -> Option<Rect> {
    node_rect(map, id, measure, config.default_footprint).map(|r| viewport.rect_to_screen(&r))
}

/// Left-hand offset from the segment midpoint. Screen y grows downward, so
/// a left-to-right edge gets its label above the line.
fn label_anchor(from: Point, to: Point, offset: f32) -> Point {
    let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f32::EPSILON {
        return Point::new(mid.x, mid.y - offset);
    }
    Point::new(mid.x + dy / len * offset, mid.y - dx / len * offset)
}

/// Build geometry for every drawable connection.
///
/// Connections leaving `highlight_source` use the highlight color.
pub fn build_edges(
    map: &LoreMap,
    viewport: &Viewport,
    measure: &dyn NodeMeasure,
    highlight_source: Option<NodeId>,
    config: &CanvasConfig,
) -> Vec<EdgeGeometry> {
    map.connections()
        .filter_map(|conn| {
            let (Some(from_rect), Some(to_rect)) = (
                screen_rect(map, conn.from, viewport, measure, config),
                screen_rect(map, conn.to, viewport, measure, config),
            ) else {
                log::trace!("skipping dangling connection {}", conn.id);
                return None;
            };

            let (from, to) = connection_endpoints(&from_rect, &to_rect);
            let highlighted = highlight_source == Some(conn.from);
            Some(EdgeGeometry {
                id: conn.id,
                from,
                to,
                stroke_width: config.edge_width,
                hit_half_width: config.edge_hit_width / 2.0,
                label: conn.visible_label().map(str::to_string),
                label_anchor: label_anchor(from, to, config.label_offset),
                color: if highlighted {
                    HIGHLIGHT_COLOR
                } else {
                    conn.kind.color()
                },
                highlighted,
            })
        })
        .collect()
}

/// Edge from `source`'s border toward the cursor. `None` if the source is gone.
pub fn preview_edge(
    map: &LoreMap,
    source: NodeId,
    cursor: Point,
    viewport: &Viewport,
    measure: &dyn NodeMeasure,
    config: &CanvasConfig,
) -> Option<PreviewEdge> {
    let rect = screen_rect(map, source, viewport, measure, config)?;
    let center = rect.center();
    let (hw, hh) = rect.half_extents();
    let from = edge_point(center, hw, hh, cursor.x - center.x, cursor.y - center.y);
    Some(PreviewEdge {
        from,
        to: cursor,
        stroke_width: config.edge_width,
        color: HIGHLIGHT_COLOR,
    })
}

/// Build node visuals in paint order (insertion order, last on top).
#[allow(clippy::too_many_arguments)]
pub fn build_nodes(
    map: &LoreMap,
    viewport: &Viewport,
    measure: &dyn NodeMeasure,
    state: &StateMap,
    names: &dyn NameLookup,
    selected: Option<NodeId>,
    config: &CanvasConfig,
) -> Vec<NodeVisual> {
    map.nodes()
        .filter_map(|node| {
            let rect = screen_rect(map, node.id, viewport, measure, config)?;
            Some(NodeVisual {
                id: node.id,
                rect,
                title: node.title.clone(),
                selected: selected == Some(node.id),
                badges: badges(node, state, names),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_core::FixedFootprint;
    use lm_core::model::{Connection, ConnectionKind, EventNode, Position};
    use pretty_assertions::assert_eq;

    fn two_nodes() -> LoreMap {
        let mut map = LoreMap::new();
        map.add_node(EventNode::new(NodeId::intern("da"), "A", Position::new(0.0, 0.0)));
        map.add_node(EventNode::new(NodeId::intern("db"), "B", Position::new(300.0, 0.0)));
        let mut conn = Connection::new(
            ConnectionId::intern("dab"),
            NodeId::intern("da"),
            NodeId::intern("db"),
        );
        conn.label = Some("onward".into());
        conn.kind = ConnectionKind::Failure;
        map.add_connection(conn).unwrap();
        map
    }

    #[test]
    fn edge_touches_node_borders() {
        let map = two_nodes();
        let edges = build_edges(
            &map,
            &Viewport::default(),
            &FixedFootprint::default(),
            None,
            &CanvasConfig::default(),
        );
        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.from, Point::new(178.0, 25.0));
        assert_eq!(edge.to, Point::new(300.0, 25.0));
        assert_eq!(edge.hit_half_width, 6.0);
        assert_eq!(edge.color, ConnectionKind::Failure.color());
        assert_eq!(edge.label.as_deref(), Some("onward"));
        assert_eq!(edge.label_anchor, Point::new(239.0, 15.0));
    }

    #[test]
    fn edges_follow_viewport() {
        let map = two_nodes();
        let viewport = Viewport::new(10.0, 20.0, 0.5);
        let edges = build_edges(
            &map,
            &viewport,
            &FixedFootprint::default(),
            None,
            &CanvasConfig::default(),
        );
        assert_eq!(edges[0].from, Point::new(99.0, 32.5));
        assert_eq!(edges[0].to, Point::new(160.0, 32.5));
    }

    #[test]
    fn source_edges_are_highlighted() {
        let map = two_nodes();
        let edges = build_edges(
            &map,
            &Viewport::default(),
            &FixedFootprint::default(),
            Some(NodeId::intern("da")),
            &CanvasConfig::default(),
        );
        assert!(edges[0].highlighted);
        assert_eq!(edges[0].color, HIGHLIGHT_COLOR);
    }

    #[test]
    fn removed_endpoint_removes_edge() {
        let mut map = two_nodes();
        map.remove_node(NodeId::intern("db"));
        let edges = build_edges(
            &map,
            &Viewport::default(),
            &FixedFootprint::default(),
            None,
            &CanvasConfig::default(),
        );
        assert!(edges.is_empty());
    }

    #[test]
    fn preview_starts_on_source_border() {
        let map = two_nodes();
        let preview = preview_edge(
            &map,
            NodeId::intern("da"),
            Point::new(500.0, 25.0),
            &Viewport::default(),
            &FixedFootprint::default(),
            &CanvasConfig::default(),
        )
        .unwrap();
        assert_eq!(preview.from, Point::new(178.0, 25.0));
        assert_eq!(preview.to, Point::new(500.0, 25.0));
        assert_eq!(preview.color, HIGHLIGHT_COLOR);

        assert!(
            preview_edge(
                &map,
                NodeId::intern("missing"),
                Point::new(0.0, 0.0),
                &Viewport::default(),
                &FixedFootprint::default(),
                &CanvasConfig::default(),
            )
            .is_none()
        );
    }
}
