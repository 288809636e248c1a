//! Canvas interaction state machine.
//!
//! Exactly one mode is active at a time. Input events are translated into
//! `CanvasEffect`s which the session applies; the machine itself never
//! touches the map or viewport.
//!
//! | From | Trigger | To |
//! |------|---------|----|
//! | Idle | secondary press | Panning |
//! | Idle | primary press on node | DraggingNode |
//! | any | start-connection command | CreatingConnection |
//! | CreatingConnection | click other node | Idle (connect) |
//! | CreatingConnection | click background / command again / secondary press | Idle (cancel) |
//! | Panning, DraggingNode | release | Idle |

use crate::input::{InputEvent, PointerButton};
use lm_core::geometry::Point;
use lm_core::id::NodeId;
use lm_core::model::Position;
use lm_core::viewport::Viewport;

/// A node under the pointer, with its world position at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeHit {
    pub id: NodeId,
    pub position: Position,
}

/// The active interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Secondary-button pan. `last` is the previous pointer position (screen).
    Panning { last: Point },
    /// `offset` is pointer world position minus node position at press time.
    DraggingNode {
        id: NodeId,
        offset: Point,
        moved: bool,
    },
    CreatingConnection { source: NodeId },
}

/// What the session should do in response to input.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEffect {
    /// Shift the viewport by a screen-space delta.
    Pan { dx: f32, dy: f32 },
    /// Place a node at a world position.
    MoveNode { id: NodeId, position: Position },
    /// A drag that moved its node has ended.
    DragEnded { id: NodeId },
    /// Replace the selection (`None` clears it).
    Select(Option<NodeId>),
    /// Create a connection.
    Connect { from: NodeId, to: NodeId },
    CancelConnection,
}

#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Source node while a connection is being created.
    pub fn connection_source(&self) -> Option<NodeId> {
        match self.state {
            InteractionState::CreatingConnection { source } => Some(source),
            _ => None,
        }
    }

    /// Drop whatever mode is active. Returns the mode that was left.
    pub fn force_idle(&mut self) -> InteractionState {
        let previous = std::mem::take(&mut self.state);
        if previous != InteractionState::Idle {
            log::debug!("interaction forced idle from {previous:?}");
        }
        previous
    }

    /// The start-connection command. Fired again while active, it cancels.
    pub fn start_connection(&mut self, source: NodeId) -> Vec<CanvasEffect> {
        if self.connection_source().is_some() {
            self.state = InteractionState::Idle;
            return vec![CanvasEffect::CancelConnection];
        }
        self.state = InteractionState::CreatingConnection { source };
        vec![]
    }

    pub fn cancel_connection(&mut self) -> Vec<CanvasEffect> {
        if self.connection_source().is_some() {
            self.state = InteractionState::Idle;
            vec![CanvasEffect::CancelConnection]
        } else {
            vec![]
        }
    }

    /// Handle an input event. `hit` is the node under the pointer, if any.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<NodeHit>,
        viewport: &Viewport,
    ) -> Vec<CanvasEffect> {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                buttons,
            } => self.pointer_down(Point::new(*x, *y), *button, buttons.secondary(), hit, viewport),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y), viewport),
            InputEvent::PointerUp { button, .. } => self.pointer_up(*button),
            InputEvent::Click { .. } => self.click(hit),
            InputEvent::Wheel { .. } | InputEvent::Key { .. } => vec![],
        }
    }

    fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
        secondary_held: bool,
        hit: Option<NodeHit>,
        viewport: &Viewport,
    ) -> Vec<CanvasEffect> {
        match (button, self.state) {
            (PointerButton::Secondary, InteractionState::Idle) => {
                self.state = InteractionState::Panning { last: screen };
                vec![]
            }
            (PointerButton::Secondary, InteractionState::CreatingConnection { .. }) => {
                self.state = InteractionState::Panning { last: screen };
                vec![CanvasEffect::CancelConnection]
            }
            (PointerButton::Primary, InteractionState::Idle) if !secondary_held => {
                if let Some(node) = hit {
                    let world = viewport.screen_to_world(screen);
                    self.state = InteractionState::DraggingNode {
                        id: node.id,
                        offset: Point::new(world.x - node.position.x, world.y - node.position.y),
                        moved: false,
                    };
                }
                vec![]
            }
            // Panning keeps priority; a drag or pending connection ignores
            // further presses.
            _ => vec![],
        }
    }

    fn pointer_move(&mut self, screen: Point, viewport: &Viewport) -> Vec<CanvasEffect> {
        match &mut self.state {
            InteractionState::Panning { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                vec![CanvasEffect::Pan { dx, dy }]
            }
            InteractionState::DraggingNode { id, offset, moved } => {
                let world = viewport.screen_to_world(screen);
                *moved = true;
                vec![CanvasEffect::MoveNode {
                    id: *id,
                    position: Position::new(world.x - offset.x, world.y - offset.y),
                }]
            }
            InteractionState::Idle | InteractionState::CreatingConnection { .. } => vec![],
        }
    }

    fn pointer_up(&mut self, button: PointerButton) -> Vec<CanvasEffect> {
        match (button, self.state) {
            (PointerButton::Secondary, InteractionState::Panning { .. }) => {
                self.state = InteractionState::Idle;
                vec![]
            }
            (PointerButton::Primary, InteractionState::DraggingNode { id, moved, .. }) => {
                self.state = InteractionState::Idle;
                if moved {
                    vec![CanvasEffect::DragEnded { id }]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }

    fn click(&mut self, hit: Option<NodeHit>) -> Vec<CanvasEffect> {
        match (self.state, hit) {
            (InteractionState::CreatingConnection { source }, Some(node)) if node.id == source => {
                vec![]
            }
            (InteractionState::CreatingConnection { source }, Some(node)) => {
                self.state = InteractionState::Idle;
                vec![CanvasEffect::Connect {
                    from: source,
                    to: node.id,
                }]
            }
            (InteractionState::CreatingConnection { .. }, None) => {
                self.state = InteractionState::Idle;
                vec![CanvasEffect::CancelConnection]
            }
            (InteractionState::Idle, hit) => vec![CanvasEffect::Select(hit.map(|n| n.id))],
            _ => vec![],
        }
    }
}
