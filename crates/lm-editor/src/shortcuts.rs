//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so every host
//! shares one binding table.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomToFit,
    ResetView,

    // ── Map ──
    CreateNode,
    StartConnection,
    ToggleCompleted,
    Delete,

    // ── UI ──
    /// Cancel a pending connection, otherwise clear the selection.
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘, on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"c"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                "Enter" => Some(ShortcutAction::ToggleCompleted),
                _ => None,
            };
        }

        if alt {
            return None;
        }

        if shift {
            return match key {
                "!" | "1" => Some(ShortcutAction::ZoomToFit),
                "+" => Some(ShortcutAction::ZoomIn),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "=" | "+" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            "f" | "F" => Some(ShortcutAction::ZoomToFit),
            "n" | "N" => Some(ShortcutAction::CreateNode),
            "c" | "C" => Some(ShortcutAction::StartConnection),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
