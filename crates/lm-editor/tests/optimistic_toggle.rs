//! Integration tests: optimistic completion toggles and their rollback.

mod common;

use common::{MemoryStore, session};
use lm_core::StateKey;
use lm_core::id::{CharacterId, NodeId};
use lm_editor::{InputEvent, NotificationLevel};
use pretty_assertions::assert_eq;

#[test]
fn toggle_unlocks_dependent_event() {
    let mut editor = session();
    let mut store = MemoryStore::default();
    let lighthouse = NodeId::from(3);
    let vault = NodeId::from(4);

    assert!(editor.badges(vault).unwrap().locked.is_some());

    assert_eq!(editor.toggle_completed(lighthouse, &mut store), Ok(true));
    assert!(editor.state().get(StateKey::EventCompleted(lighthouse)));
    assert!(editor.map().get(lighthouse).unwrap().completed);
    assert!(editor.accessibility(vault).unwrap().accessible);
}

#[test]
fn failed_toggle_rolls_back_and_notifies() {
    let mut editor = session();
    let mut store = MemoryStore {
        offline: true,
        ..MemoryStore::default()
    };
    let lighthouse = NodeId::from(3);

    let result = editor.toggle_completed(lighthouse, &mut store);
    assert!(result.is_err());
    assert!(!editor.state().get(StateKey::EventCompleted(lighthouse)));
    assert!(!editor.map().get(lighthouse).unwrap().completed);

    let latest = editor.notifications().latest().unwrap();
    assert_eq!(latest.level, NotificationLevel::Error);
    let id = latest.id;
    assert!(editor.notifications_mut().dismiss(id));
    assert!(editor.notifications().is_empty());
}

#[test]
fn store_value_wins_over_optimistic_guess() {
    let mut editor = session();
    let mut store = MemoryStore::default();
    let harbor = NodeId::from(1);
    // The store has never heard of the completion the record carried.
    store.completed.insert(harbor, false);

    // Local state flips true → false; the store flips false → true.
    assert_eq!(editor.toggle_completed(harbor, &mut store), Ok(true));
    assert!(editor.state().get(StateKey::EventCompleted(harbor)));
}

#[test]
fn failure_drops_only_its_own_flip() {
    let mut editor = session();
    let key = StateKey::EventCompleted(NodeId::from(3));

    let first = editor.begin_toggle(key);
    let second = editor.begin_toggle(key);
    let third = editor.begin_toggle(key);
    assert!(editor.state().get(key));

    // Without the first flip, the other two cancel out.
    assert!(!editor.settle_toggle(first, Err("timeout".into())));
    assert!(!editor.state().get(key));

    // The store applied the second flip; the third is still on top.
    assert!(!editor.settle_toggle(second, Ok(true)));
    assert!(editor.map().get(NodeId::from(3)).unwrap().completed);

    assert!(!editor.settle_toggle(third, Ok(false)));
    assert!(!editor.map().get(NodeId::from(3)).unwrap().completed);
}

#[test]
fn overlapping_toggles_that_both_fail_restore_original() {
    let mut editor = session();
    let key = StateKey::EventCompleted(NodeId::from(3));

    let first = editor.begin_toggle(key);
    let second = editor.begin_toggle(key);
    assert!(!editor.state().get(key));

    assert!(editor.settle_toggle(second, Err("offline".into())));
    assert!(!editor.settle_toggle(first, Err("offline".into())));
    assert!(!editor.state().get(key));
    assert_eq!(editor.notifications().len(), 2);
}

#[test]
fn answer_for_older_toggle_is_absorbed_by_newer_success() {
    let mut editor = session();
    let key = StateKey::EventCompleted(NodeId::from(2));

    let first = editor.begin_toggle(key);
    let second = editor.begin_toggle(key);

    // The store answered the newer request first; it already covers both.
    assert!(!editor.settle_toggle(second, Ok(false)));
    assert!(!editor.settle_toggle(first, Ok(true)), "stale answer is ignored");
    assert!(!editor.state().get(key));
}

#[test]
fn latest_failure_restores_previous_value() {
    let mut editor = session();
    let key = StateKey::CharacterFreed(CharacterId::from(8));

    let pending = editor.begin_toggle(key);
    assert_eq!((pending.previous, pending.optimistic), (false, true));
    assert!(!editor.settle_toggle(pending, Err("offline".into())));
    assert!(!editor.state().get(key));
}

#[test]
fn manual_flag_supersedes_pending_toggle() {
    let mut editor = session();
    let key = StateKey::CharacterAlive(CharacterId::from(7));

    let pending = editor.begin_toggle(key);
    assert!(!editor.state().get(key));
    editor.set_flag(key, false);

    // Rolling back would revive the character; the explicit write stands.
    editor.settle_toggle(pending, Err("offline".into()));
    assert!(!editor.state().get(key));
    assert_eq!(
        editor.accessibility(NodeId::from(3)).unwrap().reason.as_deref(),
        Some("Requires \"Captain Maro\" to be alive")
    );
}

#[test]
fn shortcut_toggles_selected_event() {
    let mut editor = session();
    let mut store = MemoryStore::default();

    editor.handle_input(&InputEvent::Click { x: 310.0, y: 210.0 }, &mut store);
    editor.handle_input(
        &InputEvent::Key {
            key: "Enter".into(),
            ctrl: true,
            shift: false,
            alt: false,
            meta: false,
        },
        &mut store,
    );
    assert!(editor.state().get(StateKey::EventCompleted(NodeId::from(3))));
}

#[test]
fn export_reflects_live_completion() {
    let mut editor = session();
    let mut store = MemoryStore::default();
    editor.toggle_completed(NodeId::from(3), &mut store).unwrap();

    let json = editor.export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let lighthouse = value["events"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == "3")
        .unwrap();
    assert_eq!(lighthouse["is_completed"], true);
}
