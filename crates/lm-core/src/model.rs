//! Core data model for a lore map.
//!
//! The map is a directed graph: nodes are campaign events placed in world
//! coordinates, edges are labeled connections describing narrative
//! progression. Positions are anchored at a node's top-left corner.

use crate::condition::Condition;
use crate::id::{CharacterId, ConnectionId, NodeId};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let channel = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            6 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Channels as bytes, for renderers that take 8-bit color.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

/// Stroke color of the in-progress connection and of edges leaving its source.
pub const HIGHLIGHT_COLOR: Color = Color::rgba(52.0 / 255.0, 152.0 / 255.0, 219.0 / 255.0, 1.0);

// ─── Positions ───────────────────────────────────────────────────────────

/// World-space position of a node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// Presentation tag of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ConnectionKind {
    /// Standard progression.
    #[default]
    Default,
    /// Positive outcome path.
    Success,
    /// Negative outcome path.
    Failure,
    /// Side quest path.
    Optional,
    /// A tag this build does not know. Kept so it survives a round-trip.
    Other(String),
}

impl ConnectionKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "" | "default" => Self::Default,
            "success" => Self::Success,
            "failure" => Self::Failure,
            "optional" => Self::Optional,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Optional => "optional",
            Self::Other(tag) => tag,
        }
    }

    /// Edge color. Unrecognized tags use the default color.
    pub fn color(&self) -> Color {
        let hex = match self {
            Self::Success => "#4A6741",
            Self::Failure => "#7B2D26",
            Self::Optional => "#5A7A8A",
            Self::Default | Self::Other(_) => "#8B4513",
        };
        Color::from_hex(hex).unwrap_or(Color::rgba(0.0, 0.0, 0.0, 1.0))
    }
}

/// A directed, optionally labeled edge between two event nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    pub label: Option<String>,
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn new(id: ConnectionId, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            from,
            to,
            label: None,
            kind: ConnectionKind::Default,
        }
    }

    /// Label text, if any non-blank label is set.
    pub fn visible_label(&self) -> Option<&str> {
        self.label.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A campaign event placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub dm_notes: String,
    pub position: Position,
    pub order_number: Option<u32>,
    /// Accessibility rules, already normalized from whatever was stored.
    pub conditions: SmallVec<[Condition; 2]>,
    /// Battle map / image reference. Only its presence matters here.
    pub image: Option<String>,
    pub is_party_location: bool,
    /// Completion flag as last persisted. The live value is in the state map.
    pub completed: bool,
}

impl EventNode {
    pub fn new(id: NodeId, title: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            location: String::new(),
            dm_notes: String::new(),
            position,
            order_number: None,
            conditions: SmallVec::new(),
            image: None,
            is_party_location: false,
            completed: false,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.is_empty())
    }
}

// ─── Characters ──────────────────────────────────────────────────────────

/// A character known to the external registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(default, rename = "character_type")]
    pub kind: String,
}

/// Read-only snapshot of the character registry, used to resolve names.
#[derive(Debug, Clone, Default)]
pub struct CharacterRegistry {
    characters: HashMap<CharacterId, Character>,
}

impl CharacterRegistry {
    pub fn new(characters: impl IntoIterator<Item = Character>) -> Self {
        Self {
            characters: characters.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

// ─── Lore map ────────────────────────────────────────────────────────────

/// The complete event graph.
///
/// Insertion order is tracked separately from petgraph indices because the
/// stable graph recycles vacant slots; later-inserted nodes paint on top.
#[derive(Debug, Clone, Default)]
pub struct LoreMap {
    /// The underlying directed graph.
    pub graph: StableDiGraph<EventNode, Connection>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<ConnectionId, EdgeIndex>,
    node_order: Vec<NodeId>,
    edge_order: Vec<ConnectionId>,
}

impl LoreMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. An existing node with the same id is replaced in place.
    pub fn add_node(&mut self, node: EventNode) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&node.id) {
            self.graph[idx] = node;
            return idx;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(id);
        idx
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns the removed node and the ids of the cascaded connections.
    pub fn remove_node(&mut self, id: NodeId) -> Option<(EventNode, Vec<ConnectionId>)> {
        let idx = self.node_index.remove(&id)?;
        let touching: Vec<ConnectionId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        for conn_id in &touching {
            self.edge_index.remove(conn_id);
        }
        self.edge_order.retain(|c| !touching.contains(c));
        self.node_order.retain(|n| *n != id);

        // petgraph drops incident edges together with the node.
        let node = self.graph.remove_node(idx)?;
        Some((node, touching))
    }

    pub fn get(&self, id: NodeId) -> Option<&EventNode> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut EventNode> {
        self.node_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// Move a node to an absolute world position. Returns false if unknown.
    pub fn move_node(&mut self, id: NodeId, position: Position) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Nodes in insertion (paint) order.
    pub fn nodes(&self) -> impl Iterator<Item = &EventNode> + '_ {
        self.node_order.iter().filter_map(move |id| self.get(*id))
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_order.is_empty()
    }

    /// Add a connection between two existing, distinct nodes.
    ///
    /// # Errors
    /// Fails when an endpoint is unknown, the connection is a self-loop,
    /// or the id is already in use.
    pub fn add_connection(&mut self, connection: Connection) -> Result<ConnectionId, String> {
        if connection.from == connection.to {
            return Err(format!(
                "cannot connect event {} to itself",
                connection.from
            ));
        }
        if self.edge_index.contains_key(&connection.id) {
            return Err(format!("connection {} already exists", connection.id));
        }
        let from = *self
            .node_index
            .get(&connection.from)
            .ok_or_else(|| format!("unknown source event {}", connection.from))?;
        let to = *self
            .node_index
            .get(&connection.to)
            .ok_or_else(|| format!("unknown target event {}", connection.to))?;

        let id = connection.id;
        let edge = self.graph.add_edge(from, to, connection);
        self.edge_index.insert(id, edge);
        self.edge_order.push(id);
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let edge = self.edge_index.remove(&id)?;
        self.edge_order.retain(|c| *c != id);
        self.graph.remove_edge(edge)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.edge_index.get(&id).and_then(|e| self.graph.edge_weight(*e))
    }

    pub fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        let edge = *self.edge_index.get(&id)?;
        self.graph.edge_weight_mut(edge)
    }

    /// Connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.edge_order
            .iter()
            .filter_map(move |id| self.connection(*id))
    }

    pub fn connection_count(&self) -> usize {
        self.edge_order.len()
    }

    /// Connections with `id` as source or target.
    pub fn connections_touching(&self, id: NodeId) -> Vec<&Connection> {
        self.connections()
            .filter(|c| c.from == id || c.to == id)
            .collect()
    }
}
