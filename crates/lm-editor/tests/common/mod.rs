//! In-memory persistence and a loaded session shared by the editor tests.

#![allow(dead_code)]

use lm_core::id::{CharacterId, ConnectionId, NodeId};
use lm_core::model::{Character, CharacterRegistry};
use lm_core::viewport::ContainerSize;
use lm_core::{ConnectionRecord, EventRecord, LoreMapRecord};
use lm_editor::{EditorSession, Persistence};
use std::collections::HashMap;

pub const CONTAINER: ContainerSize = ContainerSize::new(800.0, 600.0);

/// Records every call; fails all of them while `offline` is set.
#[derive(Default)]
pub struct MemoryStore {
    pub offline: bool,
    pub next_id: u64,
    pub completed: HashMap<NodeId, bool>,
    pub created_nodes: Vec<EventRecord>,
    pub updated_nodes: Vec<EventRecord>,
    pub deleted_nodes: Vec<NodeId>,
    pub created_connections: Vec<ConnectionRecord>,
    pub deleted_connections: Vec<ConnectionId>,
}

impl MemoryStore {
    fn check(&self) -> Result<(), String> {
        if self.offline {
            Err("503 Service Unavailable".to_string())
        } else {
            Ok(())
        }
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        100 + self.next_id
    }
}

impl Persistence for MemoryStore {
    fn create_node(&mut self, record: &EventRecord) -> Result<NodeId, String> {
        self.check()?;
        self.created_nodes.push(record.clone());
        Ok(NodeId::from(self.allocate()))
    }

    fn update_node(&mut self, record: &EventRecord) -> Result<(), String> {
        self.check()?;
        self.updated_nodes.push(record.clone());
        Ok(())
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), String> {
        self.check()?;
        self.deleted_nodes.push(id);
        Ok(())
    }

    fn create_connection(&mut self, record: &ConnectionRecord) -> Result<ConnectionId, String> {
        self.check()?;
        self.created_connections.push(record.clone());
        Ok(ConnectionId::from(self.allocate()))
    }

    fn update_connection(&mut self, _record: &ConnectionRecord) -> Result<(), String> {
        self.check()
    }

    fn delete_connection(&mut self, id: ConnectionId) -> Result<(), String> {
        self.check()?;
        self.deleted_connections.push(id);
        Ok(())
    }

    fn toggle_completed(&mut self, id: NodeId) -> Result<bool, String> {
        self.check()?;
        let flag = self.completed.entry(id).or_insert(false);
        *flag = !*flag;
        Ok(*flag)
    }
}

pub fn characters() -> CharacterRegistry {
    CharacterRegistry::new([
        Character {
            id: CharacterId::from(7),
            name: "Captain Maro".into(),
            kind: "npc".into(),
        },
        Character {
            id: CharacterId::from(8),
            name: "Ilsa".into(),
            kind: "npc".into(),
        },
    ])
}

/// Session over the fixture campaign, at pan (0, 0) and scale 1.
///
/// Unmeasured nodes use the 178 × 50 fallback footprint, so node 1 covers
/// screen (0..178, 0..50), node 2 (300..478, 0..50), node 3
/// (300..478, 200..250) and node 4 (600..778, 100..150).
pub fn session() -> EditorSession {
    let record = LoreMapRecord::from_json(include_str!("../fixtures/campaign.json")).unwrap();
    let mut session = EditorSession::new(CONTAINER);
    session.load(record, characters());
    session
}
