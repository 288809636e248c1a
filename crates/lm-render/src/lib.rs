pub mod display;
pub mod hit;
pub mod paint;

pub use display::{EdgeGeometry, NodeVisual, PreviewEdge, build_edges, build_nodes, preview_edge};
pub use hit::{hit_test_edge, hit_test_node};
pub use paint::{paint_minimap, paint_scene};
