//! Display list → Vello drawing commands.
//!
//! Paints connections under nodes, then the in-progress preview edge, then
//! the overview in its own frame. Label and title text needs a font context
//! and is left to the host; only anchors are computed here.

use crate::display::{EdgeGeometry, NodeVisual, PreviewEdge};
use kurbo::{Affine, Cap, Circle, Join, Line, Point, Rect, RoundedRect, Stroke};
use lm_core::geometry::Rect as MapRect;
use lm_core::minimap::{MinimapDot, MinimapFrame};
use lm_core::model::{Color as MapColor, HIGHLIGHT_COLOR};
use peniko::{Color, Fill};
use vello::Scene;

const NODE_RADIUS: f64 = 6.0;
const NODE_FILL: [u8; 4] = [0xF4, 0xE9, 0xD8, 0xFF];
const NODE_STROKE: [u8; 4] = [0x5C, 0x40, 0x33, 0xFF];
const LOCKED_FILL: [u8; 4] = [0xC8, 0xC2, 0xB8, 0xFF];
const COMPLETED_STROKE: [u8; 4] = [0x4A, 0x67, 0x41, 0xFF];
const MINIMAP_BG: [u8; 4] = [0x1E, 0x1E, 0x1E, 0xCC];
const MINIMAP_DOT: [u8; 4] = [0xD4, 0xB4, 0x83, 0xFF];
const PARTY_DOT: [u8; 4] = [0xE7, 0x4C, 0x3C, 0xFF];

/// Paint connections, the preview edge and nodes to a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`.
pub fn paint_scene(
    scene: &mut Scene,
    edges: &[EdgeGeometry],
    preview: Option<&PreviewEdge>,
    nodes: &[NodeVisual],
) {
    for edge in edges {
        paint_edge(scene, edge);
    }
    if let Some(p) = preview {
        paint_line(scene, p.from, p.to, p.stroke_width, to_peniko(p.color));
    }
    for node in nodes {
        paint_node(scene, node);
    }
}

fn paint_edge(scene: &mut Scene, edge: &EdgeGeometry) {
    let width = if edge.highlighted {
        edge.stroke_width * 1.5
    } else {
        edge.stroke_width
    };
    paint_line(scene, edge.from, edge.to, width, to_peniko(edge.color));
    paint_arrowhead(scene, edge);

    if let Some(label) = &edge.label {
        log::trace!(
            "LABEL {:?} for {} at ({}, {})",
            label,
            edge.id,
            edge.label_anchor.x,
            edge.label_anchor.y
        );
    }
}

fn paint_line(
    scene: &mut Scene,
    from: lm_core::Point,
    to: lm_core::Point,
    width: f32,
    color: Color,
) {
    let line = Line::new(to_kurbo(from), to_kurbo(to));
    let stroke = Stroke {
        width: width as f64,
        join: Join::Round,
        start_cap: Cap::Round,
        end_cap: Cap::Round,
        ..Default::default()
    };
    scene.stroke(&stroke, Affine::IDENTITY, color, None, &line);
}

/// Small filled triangle at the target end.
fn paint_arrowhead(scene: &mut Scene, edge: &EdgeGeometry) {
    let (dx, dy) = ((edge.to.x - edge.from.x) as f64, (edge.to.y - edge.from.y) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let size = 4.0 + edge.stroke_width as f64 * 2.0;
    let tip = to_kurbo(edge.to);
    let base = Point::new(tip.x - ux * size, tip.y - uy * size);

    let mut path = kurbo::BezPath::new();
    path.move_to(tip);
    path.line_to((base.x - uy * size / 2.0, base.y + ux * size / 2.0));
    path.line_to((base.x + uy * size / 2.0, base.y - ux * size / 2.0));
    path.close_path();
    scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(edge.color), None, &path);
}

fn paint_node(scene: &mut Scene, node: &NodeVisual) {
    let shape: RoundedRect = to_kurbo_rect(&node.rect).to_rounded_rect(NODE_RADIUS);

    let fill = rgba(if node.badges.locked.is_some() {
        LOCKED_FILL
    } else {
        NODE_FILL
    });
    scene.fill(Fill::NonZero, Affine::IDENTITY, fill, None, &shape);

    let (stroke_color, width) = if node.selected {
        (to_peniko(HIGHLIGHT_COLOR), 3.0)
    } else if node.badges.completed {
        (rgba(COMPLETED_STROKE), 2.0)
    } else {
        (rgba(NODE_STROKE), 1.0)
    };
    scene.stroke(&Stroke::new(width), Affine::IDENTITY, stroke_color, None, &shape);

    log::trace!(
        "NODE {} {:?} at ({}, {})",
        node.id,
        node.title,
        node.rect.x,
        node.rect.y
    );
}

// ─── Minimap ─────────────────────────────────────────────────────────────────

/// Paint the overview: background, node dots and the viewport outline.
/// `outline` is in overview-local pixels.
pub fn paint_minimap(scene: &mut Scene, frame: &MinimapFrame, dots: &[MinimapDot], outline: &MapRect) {
    let origin = Affine::translate((frame.rect.x as f64, frame.rect.y as f64));
    let bounds = Rect::new(0.0, 0.0, frame.rect.width as f64, frame.rect.height as f64);
    scene.fill(
        Fill::NonZero,
        origin,
        rgba(MINIMAP_BG),
        None,
        &bounds.to_rounded_rect(4.0),
    );

    // Everything outside the frame is clipped.
    scene.push_layer(peniko::Mix::Clip, 1.0, origin, &bounds);
    for dot in dots {
        let color = if dot.selected {
            to_peniko(HIGHLIGHT_COLOR)
        } else if dot.party_location {
            rgba(PARTY_DOT)
        } else {
            rgba(MINIMAP_DOT)
        };
        let radius = if dot.selected { 3.5 } else { 2.5 };
        scene.fill(
            Fill::NonZero,
            origin,
            color,
            None,
            &Circle::new(to_kurbo(dot.at), radius),
        );
    }
    scene.stroke(
        &Stroke::new(1.0),
        origin,
        to_peniko(HIGHLIGHT_COLOR),
        None,
        &to_kurbo_rect(outline),
    );
    scene.pop_layer();
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn to_kurbo(p: lm_core::Point) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

fn to_kurbo_rect(r: &MapRect) -> Rect {
    Rect::new(
        r.x as f64,
        r.y as f64,
        (r.x + r.width) as f64,
        (r.y + r.height) as f64,
    )
}

fn to_peniko(c: MapColor) -> Color {
    rgba(c.to_rgba8())
}

fn rgba([r, g, b, a]: [u8; 4]) -> Color {
    Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{build_edges, build_nodes, preview_edge};
    use lm_core::condition::{Names, StateMap};
    use lm_core::geometry::FixedFootprint;
    use lm_core::id::{ConnectionId, NodeId};
    use lm_core::minimap::{MinimapProjection, dots};
    use lm_core::model::{CharacterRegistry, Connection, EventNode, LoreMap, Position};
    use lm_core::{CanvasConfig, ContainerSize, MinimapConfig, Viewport};

    #[test]
    fn paints_full_frame_without_panicking() {
        let mut map = LoreMap::new();
        map.add_node(EventNode::new(NodeId::intern("pa"), "A", Position::new(0.0, 0.0)));
        map.add_node(EventNode::new(NodeId::intern("pb"), "B", Position::new(300.0, 120.0)));
        map.add_connection(Connection::new(
            ConnectionId::intern("pab"),
            NodeId::intern("pa"),
            NodeId::intern("pb"),
        ))
        .unwrap();

        let config = CanvasConfig::default();
        let vp = Viewport::default();
        let fp = FixedFootprint::default();
        let characters = CharacterRegistry::default();
        let names = Names::new(&map, &characters);
        let state = StateMap::new();

        let edges = build_edges(&map, &vp, &fp, Some(NodeId::intern("pa")), &config);
        let preview = preview_edge(&map, NodeId::intern("pa"), lm_core::Point::new(600.0, 400.0), &vp, &fp, &config);
        let nodes = build_nodes(&map, &vp, &fp, &state, &names, Some(NodeId::intern("pb")), &config);

        let mut scene = Scene::new();
        paint_scene(&mut scene, &edges, preview.as_ref(), &nodes);

        let container = ContainerSize::new(1024.0, 768.0);
        let mini = MinimapConfig::default();
        let projection = MinimapProjection::for_map(&map, &mini);
        let frame = MinimapFrame::place(container, &mini);
        let outline = projection.viewport_outline(&vp, container);
        paint_minimap(&mut scene, &frame, &dots(&map, &projection, None), &outline);
    }
}
