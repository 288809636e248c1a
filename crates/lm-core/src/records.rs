//! Wire records exchanged with the persistence collaborator.
//!
//! This is the one place stored data is sniffed and defaulted. Everything
//! past [`LoreMap::from_record`] works on typed values only.

use crate::condition::{Condition, StateKey, StateMap, normalize_conditions};
use crate::id::{ConnectionId, NodeId};
use crate::model::{Connection, ConnectionKind, EventNode, LoreMap, Position};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize a field, falling back to its default when the stored value
/// has the wrong shape. One bad field must not sink the whole map.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value.clone()).unwrap_or_else(|err| {
        log::debug!("ignoring malformed field value {value} ({err})");
        T::default()
    }))
}

/// Deserialize a list, dropping the elements that do not parse.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            log::warn!("expected a list, found {other}; treating as empty");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("skipping unreadable record: {err}");
                None
            }
        })
        .collect())
}

/// Stored position. Either coordinate may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f32>,
}

impl From<PositionRecord> for Position {
    fn from(p: PositionRecord) -> Self {
        Position::new(p.x.unwrap_or(0.0), p.y.unwrap_or(0.0))
    }
}

impl From<Position> for PositionRecord {
    fn from(p: Position) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: NodeId,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<PositionRecord>,
    #[serde(default, deserialize_with = "lenient")]
    pub order_number: Option<u32>,
    /// Raw stored conditions in any of their historical shapes.
    #[serde(default)]
    pub conditions: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub is_completed: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_party_location: Option<bool>,
    #[serde(default, alias = "image_url", deserialize_with = "lenient")]
    pub battle_map_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub dm_notes: Option<String>,
}

impl EventRecord {
    pub fn into_node(self) -> EventNode {
        let position = self.position.map(Position::from).unwrap_or(Position::ORIGIN);
        let mut node = EventNode::new(self.id, self.title.unwrap_or_default(), position);
        node.description = self.description.unwrap_or_default();
        node.location = self.location.unwrap_or_default();
        node.dm_notes = self.dm_notes.unwrap_or_default();
        node.order_number = self.order_number;
        node.conditions = normalize_conditions(self.id, &self.conditions).into_iter().collect();
        node.image = self.battle_map_url.filter(|url| !url.is_empty());
        node.is_party_location = self.is_party_location.unwrap_or(false);
        node.completed = self.is_completed.unwrap_or(false);
        node
    }

    /// Record for `node`, with `completed` taken from live state.
    pub fn from_node(node: &EventNode, completed: bool) -> Self {
        Self {
            id: node.id,
            title: Some(node.title.clone()),
            description: Some(node.description.clone()),
            location: Some(node.location.clone()),
            position: Some(node.position.into()),
            order_number: node.order_number,
            conditions: Value::Array(node.conditions.iter().map(Condition::to_value).collect()),
            is_completed: Some(completed),
            is_party_location: Some(node.is_party_location),
            battle_map_url: node.image.clone(),
            dm_notes: Some(node.dm_notes.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ConnectionId>,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub connection_type: Option<String>,
}

impl ConnectionRecord {
    pub fn into_connection(self) -> Connection {
        let id = self
            .id
            .unwrap_or_else(|| ConnectionId::with_prefix("conn"));
        let mut connection = Connection::new(id, self.from, self.to);
        connection.label = self.description.filter(|d| !d.trim().is_empty());
        connection.kind = ConnectionKind::from_tag(self.connection_type.as_deref().unwrap_or(""));
        connection
    }

    pub fn from_connection(connection: &Connection) -> Self {
        Self {
            id: Some(connection.id),
            from: connection.from,
            to: connection.to,
            description: connection.label.clone(),
            connection_type: Some(connection.kind.tag().to_string()),
        }
    }
}

/// A whole map as loaded or exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoreMapRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub events: Vec<EventRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub connections: Vec<ConnectionRecord>,
}

impl LoreMapRecord {
    /// Parse a map payload.
    ///
    /// # Errors
    /// Fails only when the text is not a map object at all. Mistyped
    /// optional fields are defaulted and unreadable events or connections
    /// (for example a missing `id`) are skipped.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("invalid lore map JSON: {e}"))
    }

    /// Pretty-printed JSON export.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("cannot export lore map: {e}"))
    }
}

impl LoreMap {
    /// Build a map from a record. Connections with unresolvable endpoints
    /// are dropped.
    pub fn from_record(record: LoreMapRecord) -> Self {
        let mut map = LoreMap::new();
        for event in record.events {
            map.add_node(event.into_node());
        }
        for conn in record.connections {
            let connection = conn.into_connection();
            let id = connection.id;
            if let Err(err) = map.add_connection(connection) {
                log::warn!("dropping connection {id}: {err}");
            }
        }
        map
    }

    /// Export every node and connection. Completion comes from `state`.
    pub fn to_record(&self, state: &StateMap) -> LoreMapRecord {
        LoreMapRecord {
            events: self
                .nodes()
                .map(|n| EventRecord::from_node(n, state.get(StateKey::EventCompleted(n.id))))
                .collect(),
            connections: self.connections().map(ConnectionRecord::from_connection).collect(),
            ..LoreMapRecord::default()
        }
    }
}

/// State map seeded with each node's persisted completion flag.
pub fn completion_state(map: &LoreMap) -> StateMap {
    let mut state = StateMap::new();
    for node in map.nodes().filter(|n| n.completed) {
        state.set(StateKey::EventCompleted(node.id), true);
    }
    state
}
