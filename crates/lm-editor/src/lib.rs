pub mod input;
pub mod interaction;
pub mod notify;
pub mod session;
pub mod shortcuts;

pub use input::{Buttons, InputEvent, PointerButton};
pub use interaction::{CanvasEffect, Interaction, InteractionState, NodeHit};
pub use notify::{MAX_NOTIFICATIONS, Notification, NotificationCenter, NotificationLevel};
pub use session::{EditorSession, MapMutation, PendingToggle, Persistence, ViewCommand};
pub use shortcuts::{ShortcutAction, ShortcutMap};
