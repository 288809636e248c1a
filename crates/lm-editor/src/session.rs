//! Editor session: the single owner of map, viewport and interaction state.
//!
//! Every change goes through one entry point per category:
//!
//! - **Map**: [`EditorSession::apply_mutation`] with a [`MapMutation`]
//!   (local only; the persisting wrappers call it after the store agrees).
//! - **View**: [`EditorSession::apply_view`] with a [`ViewCommand`].
//! - **Input**: [`EditorSession::handle_input`], which routes through the
//!   interaction machine and applies the resulting effects.
//!
//! Persistence failures never escape as panics; they become notifications.
//! Completion toggles are optimistic and roll back on failure.

use crate::input::{InputEvent, PointerButton};
use crate::interaction::{CanvasEffect, Interaction, InteractionState, NodeHit};
use crate::notify::NotificationCenter;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use lm_core::condition::{
    Accessibility, Condition, NodeBadges, Names, StateKey, StateMap, badges, evaluate,
};
use lm_core::geometry::{MeasuredFootprints, Point, Rect};
use lm_core::id::{ConnectionId, NodeId};
use lm_core::lint::{LintDiagnostic, lint_map};
use lm_core::minimap::{MinimapDot, MinimapFrame, MinimapProjection, dots};
use lm_core::model::{CharacterRegistry, Connection, ConnectionKind, EventNode, LoreMap, Position};
use lm_core::records::{ConnectionRecord, EventRecord, LoreMapRecord, completion_state};
use lm_core::viewport::{ContainerSize, Viewport, ZoomDirection};
use lm_core::{CanvasConfig, MinimapConfig};
use lm_render::{EdgeGeometry, NodeVisual, PreviewEdge};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Collaborator seam ───────────────────────────────────────────────────

/// The external store for events and connections.
///
/// Calls are synchronous from the session's point of view; hosts with an
/// async backend use [`EditorSession::begin_toggle`] /
/// [`EditorSession::settle_toggle`] directly around their own request.
pub trait Persistence {
    /// Persist a new event and return the id the store assigned.
    fn create_node(&mut self, record: &EventRecord) -> Result<NodeId, String>;
    fn update_node(&mut self, record: &EventRecord) -> Result<(), String>;
    fn delete_node(&mut self, id: NodeId) -> Result<(), String>;
    /// Persist a new connection and return the id the store assigned.
    fn create_connection(&mut self, record: &ConnectionRecord) -> Result<ConnectionId, String>;
    fn update_connection(&mut self, record: &ConnectionRecord) -> Result<(), String>;
    fn delete_connection(&mut self, id: ConnectionId) -> Result<(), String>;
    /// Flip an event's completion flag and return the stored value.
    fn toggle_completed(&mut self, id: NodeId) -> Result<bool, String>;
}

// ─── Commands ────────────────────────────────────────────────────────────

/// Local map changes.
#[derive(Debug, Clone)]
pub enum MapMutation {
    AddNode {
        node: Box<EventNode>,
    },
    /// Replace a node's content. The id selects the node.
    UpdateNode {
        node: Box<EventNode>,
    },
    MoveNode {
        id: NodeId,
        position: Position,
    },
    /// Remove a node and every connection touching it.
    RemoveNode {
        id: NodeId,
    },
    AddConnection {
        connection: Connection,
    },
    UpdateConnection {
        id: ConnectionId,
        label: Option<String>,
        kind: ConnectionKind,
    },
    RemoveConnection {
        id: ConnectionId,
    },
    SetConditions {
        id: NodeId,
        conditions: SmallVec<[Condition; 2]>,
    },
}

/// Camera changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// One step around the container center.
    ZoomIn,
    ZoomOut,
    ZoomAt {
        cursor: Point,
        direction: ZoomDirection,
    },
    /// Frame all nodes. Forces the interaction back to idle.
    Fit,
    /// Pan (0, 0), scale 1. Forces the interaction back to idle.
    Reset,
    CenterOn(Point),
    PanBy {
        dx: f32,
        dy: f32,
    },
}

/// An optimistic state change awaiting the store's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "settle the toggle once the store answers"]
pub struct PendingToggle {
    pub key: StateKey,
    pub previous: bool,
    pub optimistic: bool,
    /// Session-unique ticket identifying this toggle while it is in flight.
    pub generation: u64,
}

/// Optimistic toggles of one flag that the store has not answered yet.
#[derive(Debug, Clone)]
struct InFlight {
    /// Value the flag had before the oldest outstanding toggle, or the
    /// store's latest answer since.
    confirmed: bool,
    /// Outstanding toggles, oldest first. Each one flips the flag.
    generations: SmallVec<[u64; 2]>,
}

impl InFlight {
    /// The confirmed value with every outstanding flip applied.
    fn value(&self) -> bool {
        self.confirmed ^ (self.generations.len() % 2 == 1)
    }
}

// ─── Session ─────────────────────────────────────────────────────────────

pub struct EditorSession {
    map: LoreMap,
    characters: CharacterRegistry,
    state: StateMap,
    viewport: Viewport,
    container: ContainerSize,
    selection: Option<NodeId>,
    interaction: Interaction,
    measured: MeasuredFootprints,
    /// Last pointer position, for the connection preview.
    cursor: Option<Point>,
    notifications: NotificationCenter,
    /// Flags with toggles awaiting the store. Entries go away once settled.
    in_flight: HashMap<StateKey, InFlight>,
    next_generation: u64,
    config: CanvasConfig,
    minimap: MinimapConfig,
}

impl EditorSession {
    /// Create an empty session.
    pub fn new(container: ContainerSize) -> Self {
        Self::with_config(container, CanvasConfig::default(), MinimapConfig::default())
    }

    pub fn with_config(container: ContainerSize, config: CanvasConfig, minimap: MinimapConfig) -> Self {
        Self {
            map: LoreMap::new(),
            characters: CharacterRegistry::default(),
            state: StateMap::new(),
            viewport: Viewport::default(),
            container,
            selection: None,
            interaction: Interaction::new(),
            measured: MeasuredFootprints::new(),
            cursor: None,
            notifications: NotificationCenter::new(),
            in_flight: HashMap::new(),
            next_generation: 0,
            config,
            minimap,
        }
    }

    /// Replace the session's content with a loaded map.
    /// Completion flags from the record seed the state map.
    pub fn load(&mut self, record: LoreMapRecord, characters: CharacterRegistry) {
        self.interaction.force_idle();
        self.map = LoreMap::from_record(record);
        self.state = completion_state(&self.map);
        self.in_flight.clear();
        self.characters = characters;
        self.selection = None;
        self.measured = MeasuredFootprints::new();
        log::debug!(
            "loaded lore map: {} events, {} connections",
            self.map.node_count(),
            self.map.connection_count()
        );
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn map(&self) -> &LoreMap {
        &self.map
    }

    pub fn characters(&self) -> &CharacterRegistry {
        &self.characters
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn names(&self) -> Names<'_> {
        Names::new(&self.map, &self.characters)
    }

    // ─── Map mutations ───────────────────────────────────────────────────

    /// Apply a local map change.
    ///
    /// # Errors
    /// Fails when the referenced node or connection does not exist, or the
    /// map rejects the change.
    pub fn apply_mutation(&mut self, mutation: MapMutation) -> Result<(), String> {
        match mutation {
            MapMutation::AddNode { node } => {
                if self.map.contains(node.id) {
                    return Err(format!("event {} already exists", node.id));
                }
                self.map.add_node(*node);
            }
            MapMutation::UpdateNode { node } => {
                let existing = self
                    .map
                    .get_mut(node.id)
                    .ok_or_else(|| format!("unknown event {}", node.id))?;
                *existing = *node;
            }
            MapMutation::MoveNode { id, position } => {
                if !self.map.move_node(id, position) {
                    return Err(format!("unknown event {id}"));
                }
            }
            MapMutation::RemoveNode { id } => {
                let (_, cascaded) = self
                    .map
                    .remove_node(id)
                    .ok_or_else(|| format!("unknown event {id}"))?;
                log::debug!("removed event {id} and {} connection(s)", cascaded.len());
                self.state.forget_event(id);
                self.in_flight.remove(&StateKey::EventCompleted(id));
                self.measured.forget(id);
                if self.selection == Some(id) {
                    self.selection = None;
                }
                if self.interaction_refers_to(id) {
                    self.interaction.force_idle();
                }
            }
            MapMutation::AddConnection { connection } => {
                self.map.add_connection(connection)?;
            }
            MapMutation::UpdateConnection { id, label, kind } => {
                let conn = self
                    .map
                    .connection_mut(id)
                    .ok_or_else(|| format!("unknown connection {id}"))?;
                conn.label = label;
                conn.kind = kind;
            }
            MapMutation::RemoveConnection { id } => {
                self.map
                    .remove_connection(id)
                    .ok_or_else(|| format!("unknown connection {id}"))?;
            }
            MapMutation::SetConditions { id, conditions } => {
                let node = self
                    .map
                    .get_mut(id)
                    .ok_or_else(|| format!("unknown event {id}"))?;
                node.conditions = conditions;
            }
        }
        Ok(())
    }

    fn interaction_refers_to(&self, id: NodeId) -> bool {
        match self.interaction.state() {
            InteractionState::DraggingNode { id: dragged, .. } => dragged == id,
            InteractionState::CreatingConnection { source } => source == id,
            InteractionState::Idle | InteractionState::Panning { .. } => false,
        }
    }

    /// Create a node centered in the visible area and select it.
    pub fn create_node_at_center(
        &mut self,
        title: &str,
        store: &mut dyn Persistence,
    ) -> Result<NodeId, String> {
        let center = self.viewport.viewport_center(self.container);
        let (w, h) = self.config.default_footprint;
        let mut node = EventNode::new(
            NodeId::with_prefix("event"),
            title,
            Position::new(center.x - w / 2.0, center.y - h / 2.0),
        );

        let id = store
            .create_node(&EventRecord::from_node(&node, false))
            .map_err(|e| self.report(format!("Failed to create event: {e}")))?;
        node.id = id;
        self.apply_mutation(MapMutation::AddNode {
            node: Box::new(node),
        })?;
        self.selection = Some(id);
        Ok(id)
    }

    /// Persist new content for an existing node, then apply it.
    /// The node keeps its current position.
    pub fn update_node(&mut self, mut node: EventNode, store: &mut dyn Persistence) -> Result<(), String> {
        let current = self
            .map
            .get(node.id)
            .ok_or_else(|| format!("unknown event {}", node.id))?;
        node.position = current.position;
        let completed = self.state.get(StateKey::EventCompleted(node.id));

        store
            .update_node(&EventRecord::from_node(&node, completed))
            .map_err(|e| self.report(format!("Failed to save event: {e}")))?;
        self.apply_mutation(MapMutation::UpdateNode {
            node: Box::new(node),
        })
    }

    /// Replace a node's conditions. Blank descriptions are generated.
    pub fn set_conditions(
        &mut self,
        id: NodeId,
        conditions: Vec<Condition>,
        store: &mut dyn Persistence,
    ) -> Result<(), String> {
        let mut node = self
            .map
            .get(id)
            .cloned()
            .ok_or_else(|| format!("unknown event {id}"))?;
        let names = self.names();
        node.conditions = conditions
            .into_iter()
            .map(|c| c.with_generated_description(&names))
            .collect();
        self.update_node(node, store)
    }

    pub fn delete_node(&mut self, id: NodeId, store: &mut dyn Persistence) -> Result<(), String> {
        if !self.map.contains(id) {
            return Err(format!("unknown event {id}"));
        }
        store
            .delete_node(id)
            .map_err(|e| self.report(format!("Failed to delete event: {e}")))?;
        self.apply_mutation(MapMutation::RemoveNode { id })
    }

    /// Delete the selected node, if any.
    pub fn delete_selected(&mut self, store: &mut dyn Persistence) -> Result<(), String> {
        match self.selection {
            Some(id) => self.delete_node(id, store),
            None => Ok(()),
        }
    }

    /// Persist and add a connection between two distinct existing nodes.
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        store: &mut dyn Persistence,
    ) -> Result<ConnectionId, String> {
        if from == to {
            return Err(format!("cannot connect event {from} to itself"));
        }
        if !self.map.contains(from) || !self.map.contains(to) {
            return Err(format!("cannot connect {from} → {to}: unknown event"));
        }

        let mut connection = Connection::new(ConnectionId::with_prefix("conn"), from, to);
        let id = store
            .create_connection(&ConnectionRecord::from_connection(&connection))
            .map_err(|e| self.report(format!("Failed to create connection: {e}")))?;
        connection.id = id;
        self.apply_mutation(MapMutation::AddConnection { connection })?;
        Ok(id)
    }

    pub fn update_connection(
        &mut self,
        id: ConnectionId,
        label: Option<String>,
        kind: ConnectionKind,
        store: &mut dyn Persistence,
    ) -> Result<(), String> {
        let mut updated = self
            .map
            .connection(id)
            .cloned()
            .ok_or_else(|| format!("unknown connection {id}"))?;
        updated.label = label.clone();
        updated.kind = kind.clone();

        store
            .update_connection(&ConnectionRecord::from_connection(&updated))
            .map_err(|e| self.report(format!("Failed to save connection: {e}")))?;
        self.apply_mutation(MapMutation::UpdateConnection { id, label, kind })
    }

    pub fn delete_connection(&mut self, id: ConnectionId, store: &mut dyn Persistence) -> Result<(), String> {
        if self.map.connection(id).is_none() {
            return Err(format!("unknown connection {id}"));
        }
        store
            .delete_connection(id)
            .map_err(|e| self.report(format!("Failed to delete connection: {e}")))?;
        self.apply_mutation(MapMutation::RemoveConnection { id })
    }

    /// Record a store failure as an error notification and pass it on.
    fn report(&mut self, message: String) -> String {
        self.notifications.error(message.clone());
        message
    }

    // ─── State flags ─────────────────────────────────────────────────────

    /// Flip a flag locally and remember how to undo it.
    pub fn begin_toggle(&mut self, key: StateKey) -> PendingToggle {
        let previous = self.state.get(key);
        self.next_generation += 1;
        let generation = self.next_generation;
        let entry = self.in_flight.entry(key).or_insert_with(|| InFlight {
            confirmed: previous,
            generations: SmallVec::new(),
        });
        entry.generations.push(generation);
        let optimistic = entry.value();
        self.state.set(key, optimistic);
        PendingToggle {
            key,
            previous,
            optimistic,
            generation,
        }
    }

    /// Settle an optimistic toggle with the store's answer.
    ///
    /// A success makes the stored value the new baseline; toggles begun
    /// earlier count as included in it. A failure drops only this toggle's
    /// flip, so the flag shows the baseline plus the flips still in flight.
    /// Toggles overtaken by [`EditorSession::set_flag`] change nothing.
    /// Nothing is retried. Returns the flag's final value.
    pub fn settle_toggle(&mut self, pending: PendingToggle, outcome: Result<bool, String>) -> bool {
        let key = pending.key;
        let tracked = self
            .in_flight
            .get(&key)
            .is_some_and(|f| f.generations.contains(&pending.generation));

        match &outcome {
            Ok(_) if !tracked => log::debug!("ignoring stale answer for {key}"),
            Err(err) if !tracked => log::debug!("toggle of {key} failed but was overwritten: {err}"),
            Ok(stored) => {
                if let Some(flight) = self.in_flight.get_mut(&key) {
                    flight.generations.retain(|g| *g > pending.generation);
                    flight.confirmed = *stored;
                }
                if let StateKey::EventCompleted(id) = key {
                    if let Some(node) = self.map.get_mut(id) {
                        node.completed = *stored;
                    }
                }
            }
            Err(err) => {
                log::warn!("toggle of {key} failed, dropping its flip: {err}");
                if let Some(flight) = self.in_flight.get_mut(&key) {
                    flight.generations.retain(|g| *g != pending.generation);
                }
            }
        }

        if tracked {
            if let Some(flight) = self.in_flight.get(&key) {
                let value = flight.value();
                if value != self.state.get(key) {
                    log::debug!("{key} settles at {value}");
                    self.state.set(key, value);
                }
                if flight.generations.is_empty() {
                    self.in_flight.remove(&key);
                }
            }
        }
        if let Err(err) = outcome {
            self.notifications
                .error(format!("Failed to update status: {err}"));
        }
        self.state.get(key)
    }

    /// Toggle an event's completion: optimistic locally, then persisted.
    pub fn toggle_completed(&mut self, id: NodeId, store: &mut dyn Persistence) -> Result<bool, String> {
        if !self.map.contains(id) {
            return Err(format!("unknown event {id}"));
        }
        let pending = self.begin_toggle(StateKey::EventCompleted(id));
        let outcome = store.toggle_completed(id);
        let failed = outcome.as_ref().err().cloned();
        let value = self.settle_toggle(pending, outcome);
        match failed {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }

    /// Set a session-local flag (character fate, custom condition).
    /// Any toggles of `key` still in flight are overwritten.
    pub fn set_flag(&mut self, key: StateKey, value: bool) {
        self.in_flight.remove(&key);
        self.state.set(key, value);
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn apply_view(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::ZoomIn => {
                self.viewport
                    .zoom_by_step(ZoomDirection::In, self.container, &self.config);
            }
            ViewCommand::ZoomOut => {
                self.viewport
                    .zoom_by_step(ZoomDirection::Out, self.container, &self.config);
            }
            ViewCommand::ZoomAt { cursor, direction } => {
                self.viewport.zoom_at(cursor, direction, &self.config);
            }
            ViewCommand::Fit => {
                self.interaction.force_idle();
                self.viewport.fit_to_content(
                    self.map.nodes().map(|n| n.position),
                    self.container,
                    &self.config,
                );
            }
            ViewCommand::Reset => {
                self.interaction.force_idle();
                self.viewport.reset();
            }
            ViewCommand::CenterOn(world) => self.viewport.center_on(world, self.container),
            ViewCommand::PanBy { dx, dy } => self.viewport.pan_by(dx, dy),
        }
    }

    /// The host container changed size. Ends any interaction and refits.
    pub fn resize(&mut self, container: ContainerSize) {
        self.container = container;
        self.apply_view(ViewCommand::Fit);
    }

    /// The host measured a node's rendered size, in world units.
    pub fn record_measurement(&mut self, id: NodeId, width: f32, height: f32) {
        self.measured.record(id, width, height);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one input event. Returns the effects that were applied.
    pub fn handle_input(&mut self, event: &InputEvent, store: &mut dyn Persistence) -> Vec<CanvasEffect> {
        let mut hit = None;
        match event {
            InputEvent::Key {
                key,
                ctrl,
                shift,
                alt,
                meta,
            } => {
                return match ShortcutMap::resolve(key, *ctrl, *shift, *alt, *meta) {
                    Some(action) => self.run_shortcut(action, store),
                    None => vec![],
                };
            }
            InputEvent::Wheel { x, y, delta_y } => {
                self.apply_view(ViewCommand::ZoomAt {
                    cursor: Point::new(*x, *y),
                    direction: ZoomDirection::from_wheel(*delta_y),
                });
                return vec![];
            }
            InputEvent::PointerDown { x, y, .. } | InputEvent::Click { x, y } => {
                let screen = Point::new(*x, *y);
                let frame = self.minimap_frame();
                if frame.contains(screen) {
                    // The overview owns its presses; the canvas never sees them.
                    // Only the primary button navigates.
                    if matches!(
                        event,
                        InputEvent::PointerDown {
                            button: PointerButton::Primary,
                            ..
                        }
                    ) {
                        let projection = self.minimap_projection();
                        projection.navigate(&mut self.viewport, frame.to_local(screen), self.container);
                    }
                    return vec![];
                }
                hit = self.node_at(screen);
            }
            InputEvent::PointerMove { x, y, .. } => self.cursor = Some(Point::new(*x, *y)),
            InputEvent::PointerUp { .. } => {}
        }

        let effects = self.interaction.handle(event, hit, &self.viewport);
        for effect in &effects {
            self.apply_effect(effect, store);
        }
        effects
    }

    fn apply_effect(&mut self, effect: &CanvasEffect, store: &mut dyn Persistence) {
        match effect {
            CanvasEffect::Pan { dx, dy } => self.viewport.pan_by(*dx, *dy),
            CanvasEffect::MoveNode { id, position } => {
                if let Err(err) = self.apply_mutation(MapMutation::MoveNode {
                    id: *id,
                    position: *position,
                }) {
                    log::debug!("drag target vanished: {err}");
                }
            }
            CanvasEffect::DragEnded { id } => {
                let Some(node) = self.map.get(*id) else {
                    return;
                };
                let record = EventRecord::from_node(node, self.state.get(StateKey::EventCompleted(*id)));
                if let Err(err) = store.update_node(&record) {
                    self.report(format!("Failed to save event position: {err}"));
                }
            }
            CanvasEffect::Select(selection) => self.selection = *selection,
            CanvasEffect::Connect { from, to } => {
                // Failures are already reported as notifications.
                let _ = self.connect(*from, *to, store);
            }
            CanvasEffect::CancelConnection => log::debug!("connection creation cancelled"),
        }
    }

    fn run_shortcut(&mut self, action: ShortcutAction, store: &mut dyn Persistence) -> Vec<CanvasEffect> {
        match action {
            ShortcutAction::ZoomIn => self.apply_view(ViewCommand::ZoomIn),
            ShortcutAction::ZoomOut => self.apply_view(ViewCommand::ZoomOut),
            ShortcutAction::ZoomToFit => self.apply_view(ViewCommand::Fit),
            ShortcutAction::ResetView => self.apply_view(ViewCommand::Reset),
            ShortcutAction::CreateNode => {
                let _ = self.create_node_at_center("New Event", store);
            }
            ShortcutAction::StartConnection => return self.start_connection(),
            ShortcutAction::ToggleCompleted => {
                if let Some(id) = self.selection {
                    let _ = self.toggle_completed(id, store);
                }
            }
            ShortcutAction::Delete => {
                let _ = self.delete_selected(store);
            }
            ShortcutAction::Deselect => {
                let effects = self.interaction.cancel_connection();
                if effects.is_empty() {
                    self.selection = None;
                }
                return effects;
            }
        }
        vec![]
    }

    /// Enter connection mode from the selected node, or cancel it if active.
    pub fn start_connection(&mut self) -> Vec<CanvasEffect> {
        if self.interaction.connection_source().is_some() {
            return self.interaction.cancel_connection();
        }
        match self.selection {
            Some(source) => self.interaction.start_connection(source),
            None => {
                self.notifications.info("Select an event to connect from");
                vec![]
            }
        }
    }

    pub fn cancel_connection(&mut self) -> Vec<CanvasEffect> {
        self.interaction.cancel_connection()
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        self.selection = id.filter(|id| self.map.contains(*id));
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Topmost node under a screen point.
    pub fn node_at(&self, screen: Point) -> Option<NodeHit> {
        let id = lm_render::hit_test_node(&self.map, &self.viewport, &self.measured, &self.config, screen)?;
        self.map.get(id).map(|n| NodeHit {
            id,
            position: n.position,
        })
    }

    pub fn connection_at(&self, screen: Point) -> Option<ConnectionId> {
        lm_render::hit_test_edge(&self.edges(), screen)
    }

    pub fn accessibility(&self, id: NodeId) -> Option<Accessibility> {
        let node = self.map.get(id)?;
        Some(evaluate(node, &self.state, &self.names()))
    }

    pub fn badges(&self, id: NodeId) -> Option<NodeBadges> {
        let node = self.map.get(id)?;
        Some(badges(node, &self.state, &self.names()))
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_map(&self.map, &self.characters)
    }

    /// Export the whole map, completion taken from the live state.
    pub fn export_json(&self) -> Result<String, String> {
        self.map.to_record(&self.state).to_json()
    }

    // ─── Render passthroughs ─────────────────────────────────────────────

    pub fn edges(&self) -> Vec<EdgeGeometry> {
        lm_render::build_edges(
            &self.map,
            &self.viewport,
            &self.measured,
            self.interaction.connection_source(),
            &self.config,
        )
    }

    /// Rubber-band edge while creating a connection.
    pub fn preview(&self) -> Option<PreviewEdge> {
        let source = self.interaction.connection_source()?;
        let cursor = self.cursor?;
        lm_render::preview_edge(&self.map, source, cursor, &self.viewport, &self.measured, &self.config)
    }

    pub fn node_visuals(&self) -> Vec<NodeVisual> {
        lm_render::build_nodes(
            &self.map,
            &self.viewport,
            &self.measured,
            &self.state,
            &self.names(),
            self.selection,
            &self.config,
        )
    }

    pub fn minimap_frame(&self) -> MinimapFrame {
        MinimapFrame::place(self.container, &self.minimap)
    }

    pub fn minimap_projection(&self) -> MinimapProjection {
        MinimapProjection::for_map(&self.map, &self.minimap)
    }

    pub fn minimap_dots(&self) -> Vec<MinimapDot> {
        dots(&self.map, &self.minimap_projection(), self.selection)
    }

    /// Visible-area outline in overview-local pixels.
    pub fn minimap_outline(&self) -> Rect {
        self.minimap_projection()
            .viewport_outline(&self.viewport, self.container)
    }
}
