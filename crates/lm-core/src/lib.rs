pub mod condition;
pub mod config;
pub mod geometry;
pub mod id;
pub mod lint;
pub mod minimap;
pub mod model;
pub mod records;
pub mod viewport;

pub use condition::{
    Accessibility, Condition, ConditionKind, NameLookup, Names, NodeBadges, StateKey, StateMap,
    badges, evaluate, normalize_conditions,
};
pub use config::{CanvasConfig, MinimapConfig};
pub use geometry::{FixedFootprint, MeasuredFootprints, NodeMeasure, Point, Rect, edge_point};
pub use id::{CharacterId, ConditionId, ConnectionId, NodeId};
pub use lint::{LintDiagnostic, LintSeverity, lint_map};
pub use minimap::{MinimapFrame, MinimapProjection};
pub use model::*;
pub use records::{ConnectionRecord, EventRecord, LoreMapRecord, completion_state};
pub use viewport::{ContainerSize, Viewport, ZoomDirection};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
