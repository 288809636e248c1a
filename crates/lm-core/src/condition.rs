//! Accessibility rules for event nodes.
//!
//! A node is accessible when every one of its conditions holds against the
//! session's [`StateMap`]. Stored conditions arrive in several shapes (array,
//! single object, JSON-encoded string, absent); [`normalize_conditions`] turns
//! all of them into one typed sequence at the data-access boundary.

use crate::id::{CharacterId, ConditionId, NodeId};
use crate::model::{CharacterRegistry, EventNode, LoreMap};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const UNKNOWN_EVENT: &str = "Unknown Event";
const UNKNOWN_CHARACTER: &str = "Unknown Character";

// ─── Conditions ──────────────────────────────────────────────────────────

/// What a condition looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionKind {
    /// Another event has been completed.
    EventCompleted(NodeId),
    /// A character has been freed.
    CharacterFreed(CharacterId),
    /// A character is alive.
    CharacterAlive(CharacterId),
    /// A free-form flag keyed by the condition's own id.
    Custom,
    /// A tag this build does not understand. Always satisfied.
    Other { tag: String, target: String },
}

impl ConditionKind {
    /// Wire tag (`event_completed`, `character_freed`, ...).
    pub fn tag(&self) -> &str {
        match self {
            Self::EventCompleted(_) => "event_completed",
            Self::CharacterFreed(_) => "character_freed",
            Self::CharacterAlive(_) => "character_alive",
            Self::Custom => "custom",
            Self::Other { tag, .. } => tag,
        }
    }

    /// Raw target reference as stored.
    pub fn target(&self) -> &str {
        match self {
            Self::EventCompleted(id) => id.as_str(),
            Self::CharacterFreed(id) | Self::CharacterAlive(id) => id.as_str(),
            Self::Custom => "custom",
            Self::Other { target, .. } => target,
        }
    }
}

/// One accessibility rule with its required polarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub id: ConditionId,
    pub kind: ConditionKind,
    /// `true`: the looked-up flag must hold. `false`: it must not.
    pub required: bool,
    pub description: String,
}

impl Condition {
    pub fn new(kind: ConditionKind, required: bool) -> Self {
        Self {
            id: ConditionId::with_prefix("cond"),
            kind,
            required,
            description: String::new(),
        }
    }

    pub fn event_completed(target: NodeId, required: bool) -> Self {
        Self::new(ConditionKind::EventCompleted(target), required)
    }

    pub fn character_freed(target: CharacterId, required: bool) -> Self {
        Self::new(ConditionKind::CharacterFreed(target), required)
    }

    pub fn character_alive(target: CharacterId, required: bool) -> Self {
        Self::new(ConditionKind::CharacterAlive(target), required)
    }

    pub fn custom(description: impl Into<String>, required: bool) -> Self {
        Self {
            description: description.into(),
            ..Self::new(ConditionKind::Custom, required)
        }
    }

    /// The state-map key this condition reads, if any.
    pub fn state_key(&self) -> Option<StateKey> {
        match &self.kind {
            ConditionKind::EventCompleted(id) => Some(StateKey::EventCompleted(*id)),
            ConditionKind::CharacterFreed(id) => Some(StateKey::CharacterFreed(*id)),
            ConditionKind::CharacterAlive(id) => Some(StateKey::CharacterAlive(*id)),
            ConditionKind::Custom => Some(StateKey::Custom(self.id)),
            ConditionKind::Other { .. } => None,
        }
    }

    pub fn is_met(&self, state: &StateMap) -> bool {
        match self.state_key() {
            Some(key) => state.get(key) == self.required,
            None => true,
        }
    }

    /// Display name of whatever the condition points at.
    pub fn target_name(&self, names: &dyn NameLookup) -> String {
        match &self.kind {
            ConditionKind::EventCompleted(id) => names
                .event_title(*id)
                .unwrap_or(UNKNOWN_EVENT)
                .to_string(),
            ConditionKind::CharacterFreed(id) | ConditionKind::CharacterAlive(id) => names
                .character_name(*id)
                .unwrap_or(UNKNOWN_CHARACTER)
                .to_string(),
            other => other.target().to_string(),
        }
    }

    /// Why this condition blocks a node, phrased for its polarity.
    pub fn reason(&self, names: &dyn NameLookup) -> String {
        let name = self.target_name(names);
        match (&self.kind, self.required) {
            (ConditionKind::EventCompleted(_), true) => format!("Requires \"{name}\" to be completed"),
            (ConditionKind::EventCompleted(_), false) => {
                format!("Requires \"{name}\" to NOT be completed")
            }
            (ConditionKind::CharacterFreed(_), true) => format!("Requires \"{name}\" to be freed"),
            (ConditionKind::CharacterFreed(_), false) => {
                format!("Requires \"{name}\" to NOT be freed")
            }
            (ConditionKind::CharacterAlive(_), true) => format!("Requires \"{name}\" to be alive"),
            (ConditionKind::CharacterAlive(_), false) => format!("Requires \"{name}\" to be dead"),
            (ConditionKind::Custom, _) => non_blank(&self.description)
                .unwrap_or("Custom condition not met")
                .to_string(),
            (ConditionKind::Other { .. }, _) => "Unknown condition".to_string(),
        }
    }

    /// Summary shown in the condition list of the edit surface.
    pub fn describe(&self, names: &dyn NameLookup) -> String {
        let name = self.target_name(names);
        match (&self.kind, self.required) {
            (ConditionKind::EventCompleted(_), true) => format!("Event \"{name}\" must be completed"),
            (ConditionKind::EventCompleted(_), false) => {
                format!("Event \"{name}\" must NOT be completed")
            }
            (ConditionKind::CharacterFreed(_), true) => format!("Character \"{name}\" must be freed"),
            (ConditionKind::CharacterFreed(_), false) => {
                format!("Character \"{name}\" must NOT be freed")
            }
            (ConditionKind::CharacterAlive(_), true) => format!("Character \"{name}\" must be alive"),
            (ConditionKind::CharacterAlive(_), false) => {
                format!("Character \"{name}\" must be dead")
            }
            (ConditionKind::Custom, _) => non_blank(&self.description)
                .unwrap_or("Custom condition")
                .to_string(),
            (ConditionKind::Other { .. }, _) => "Unknown condition".to_string(),
        }
    }

    /// Fill in an empty description from [`Condition::describe`].
    pub fn with_generated_description(mut self, names: &dyn NameLookup) -> Self {
        if non_blank(&self.description).is_none() {
            self.description = self.describe(names);
        }
        self
    }

    /// Parse one stored condition object. `None` for anything that is not
    /// an object with a string `type`. A missing `id` is filled by
    /// `fallback_id`, which sees the tag and target.
    pub fn from_value(
        value: &Value,
        fallback_id: impl FnOnce(&str, &str) -> ConditionId,
    ) -> Option<Self> {
        let obj = value.as_object()?;
        let tag = obj.get("type")?.as_str()?;
        let target = obj.get("target").and_then(scalar_text).unwrap_or_default();

        let id = match obj.get("id").and_then(scalar_text) {
            Some(id) => ConditionId::intern(&id),
            None => fallback_id(tag, &target),
        };

        let kind = match tag {
            "event_completed" => ConditionKind::EventCompleted(NodeId::intern(&target)),
            "character_freed" => ConditionKind::CharacterFreed(CharacterId::intern(&target)),
            "character_alive" => ConditionKind::CharacterAlive(CharacterId::intern(&target)),
            "custom" => ConditionKind::Custom,
            other => ConditionKind::Other {
                tag: other.to_string(),
                target,
            },
        };

        Some(Self {
            id,
            kind,
            required: obj.get("required").is_some_and(truthy),
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Stored JSON shape of this condition.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id.as_str(),
            "type": self.kind.tag(),
            "target": self.kind.target(),
            "required": self.required,
            "description": self.description,
        })
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Condition::from_value(&value, |tag, target| {
            ConditionId::intern(&format!("{tag}_{target}"))
        })
        .ok_or_else(|| de::Error::custom("expected a condition object with a `type`"))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Loose truthiness of a stored flag: numbers are true unless zero, strings
/// unless empty; null, arrays and objects are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Normalize any stored representation into an ordered condition list for
/// the node `owner`.
///
/// Arrays keep their order and drop unusable elements; a single object
/// becomes a one-element list; strings are parsed as JSON first. Anything
/// unparseable yields an empty list, which leaves the node accessible.
/// Elements without an `id` get `{owner}_cond_{index}`, so reloading the
/// same data yields the same ids.
pub fn normalize_conditions(owner: NodeId, stored: &Value) -> Vec<Condition> {
    let fallback = move |index: usize| {
        move |_: &str, _: &str| ConditionId::intern(&format!("{owner}_cond_{index}"))
    };
    match stored {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let parsed = Condition::from_value(item, fallback(index));
                if parsed.is_none() {
                    log::debug!("skipping malformed condition element: {item}");
                }
                parsed
            })
            .collect(),
        Value::Object(_) => Condition::from_value(stored, fallback(0)).into_iter().collect(),
        Value::String(text) if text.trim().is_empty() => Vec::new(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner) => normalize_conditions(owner, &inner),
            Err(err) => {
                log::debug!("conditions are not valid JSON ({err}); treating as none");
                Vec::new()
            }
        },
        Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

// ─── State map ───────────────────────────────────────────────────────────

/// Structured key into the session's boolean state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    EventCompleted(NodeId),
    CharacterFreed(CharacterId),
    CharacterAlive(CharacterId),
    Custom(ConditionId),
}

impl StateKey {
    pub fn domain(&self) -> &'static str {
        match self {
            Self::EventCompleted(_) => "event",
            Self::CharacterFreed(_) | Self::CharacterAlive(_) => "character",
            Self::Custom(_) => "custom",
        }
    }

    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            Self::EventCompleted(_) => Some("completed"),
            Self::CharacterFreed(_) => Some("freed"),
            Self::CharacterAlive(_) => Some("alive"),
            Self::Custom(_) => None,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::EventCompleted(id) => id.as_str(),
            Self::CharacterFreed(id) | Self::CharacterAlive(id) => id.as_str(),
            Self::Custom(id) => id.as_str(),
        }
    }

    /// Value assumed when the key has never been set. Characters are alive
    /// until stated otherwise; everything else starts false.
    pub fn default_value(&self) -> bool {
        matches!(self, Self::CharacterAlive(_))
    }
}

/// Legacy flat form: `{domain}_{target}_{attribute}` or `custom_{id}`.
impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute() {
            Some(attr) => write!(f, "{}_{}_{}", self.domain(), self.target(), attr),
            None => write!(f, "{}_{}", self.domain(), self.target()),
        }
    }
}

impl FromStr for StateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = |prefix: &str, suffix: &str| -> Option<String> {
            let rest = s.strip_prefix(prefix)?.strip_suffix(suffix)?;
            (!rest.is_empty()).then(|| rest.to_string())
        };

        if let Some(id) = inner("event_", "_completed") {
            return Ok(Self::EventCompleted(NodeId::intern(&id)));
        }
        if let Some(id) = inner("character_", "_freed") {
            return Ok(Self::CharacterFreed(CharacterId::intern(&id)));
        }
        if let Some(id) = inner("character_", "_alive") {
            return Ok(Self::CharacterAlive(CharacterId::intern(&id)));
        }
        if let Some(id) = inner("custom_", "") {
            return Ok(Self::Custom(ConditionId::intern(&id)));
        }
        Err(format!("unrecognized state key `{s}`"))
    }
}

/// Session-local boolean flags consulted by the condition engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateMap {
    flags: HashMap<StateKey, bool>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, or the key's default when absent.
    pub fn get(&self, key: StateKey) -> bool {
        self.flags
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    /// Explicitly stored value, if any.
    pub fn value(&self, key: StateKey) -> Option<bool> {
        self.flags.get(&key).copied()
    }

    /// Store a value, returning the previous explicit value.
    pub fn set(&mut self, key: StateKey, value: bool) -> Option<bool> {
        self.flags.insert(key, value)
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, key: StateKey) -> bool {
        let next = !self.get(key);
        self.flags.insert(key, next);
        next
    }

    pub fn remove(&mut self, key: StateKey) -> Option<bool> {
        self.flags.remove(&key)
    }

    /// Drop every flag that mentions `node`.
    pub fn forget_event(&mut self, node: NodeId) {
        self.flags.remove(&StateKey::EventCompleted(node));
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, bool)> + '_ {
        self.flags.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl Serialize for StateMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(String, bool)> =
            self.flags.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        entries.sort();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (k, v) in &entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StateMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, bool>::deserialize(deserializer)?;
        let mut state = StateMap::new();
        for (key, value) in raw {
            match key.parse::<StateKey>() {
                Ok(parsed) => {
                    state.set(parsed, value);
                }
                Err(err) => log::debug!("dropping state entry: {err}"),
            }
        }
        Ok(state)
    }
}

// ─── Name lookup ─────────────────────────────────────────────────────────

/// Resolves ids to display names for reason text.
pub trait NameLookup {
    fn event_title(&self, id: NodeId) -> Option<&str>;
    fn character_name(&self, id: CharacterId) -> Option<&str>;
}

/// Looks names up in the current map and the character registry.
#[derive(Clone, Copy)]
pub struct Names<'a> {
    pub map: &'a LoreMap,
    pub characters: &'a CharacterRegistry,
}

impl<'a> Names<'a> {
    pub fn new(map: &'a LoreMap, characters: &'a CharacterRegistry) -> Self {
        Self { map, characters }
    }
}

impl NameLookup for Names<'_> {
    fn event_title(&self, id: NodeId) -> Option<&str> {
        self.map.get(id).map(|n| n.title.as_str())
    }

    fn character_name(&self, id: CharacterId) -> Option<&str> {
        self.characters.get(id).map(|c| c.name.as_str())
    }
}

// ─── Evaluation ──────────────────────────────────────────────────────────

/// Outcome of evaluating a node's conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessibility {
    pub accessible: bool,
    /// Reason of the first unmet condition.
    pub reason: Option<String>,
}

impl Accessibility {
    pub const OPEN: Accessibility = Accessibility {
        accessible: true,
        reason: None,
    };
}

/// Evaluate conditions in order; the first unmet one decides.
pub fn evaluate_conditions(
    conditions: &[Condition],
    state: &StateMap,
    names: &dyn NameLookup,
) -> Accessibility {
    match conditions.iter().find(|c| !c.is_met(state)) {
        Some(blocking) => Accessibility {
            accessible: false,
            reason: Some(blocking.reason(names)),
        },
        None => Accessibility::OPEN,
    }
}

/// Evaluate a node's accessibility.
pub fn evaluate(node: &EventNode, state: &StateMap, names: &dyn NameLookup) -> Accessibility {
    evaluate_conditions(&node.conditions, state, names)
}

/// Decorations shown on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBadges {
    /// Set when the node is locked, with the blocking reason.
    pub locked: Option<String>,
    pub completed: bool,
    /// The node has conditions and all of them hold.
    pub conditions_met: bool,
    pub has_image: bool,
}

pub fn badges(node: &EventNode, state: &StateMap, names: &dyn NameLookup) -> NodeBadges {
    let access = evaluate(node, state, names);
    NodeBadges {
        conditions_met: access.accessible && !node.conditions.is_empty(),
        locked: if access.accessible { None } else { access.reason },
        completed: state.get(StateKey::EventCompleted(node.id)),
        has_image: node.has_image(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Character, Position};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct NoNames;

    impl NameLookup for NoNames {
        fn event_title(&self, _id: NodeId) -> Option<&str> {
            None
        }
        fn character_name(&self, _id: CharacterId) -> Option<&str> {
            None
        }
    }

    fn node_with(conditions: Value) -> EventNode {
        let mut node = EventNode::new(NodeId::intern("n"), "N", Position::ORIGIN);
        node.conditions = normalize_conditions(node.id, &conditions).into_iter().collect();
        node
    }

    #[test]
    fn missing_completion_blocks() {
        let node = node_with(json!([{ "type": "event_completed", "target": "5", "required": true }]));
        let result = evaluate(&node, &StateMap::new(), &NoNames);
        assert!(!result.accessible);
        assert_eq!(
            result.reason.as_deref(),
            Some("Requires \"Unknown Event\" to be completed")
        );
    }

    #[test]
    fn characters_default_to_alive() {
        let node = node_with(json!([{ "type": "character_alive", "target": "2", "required": true }]));
        assert_eq!(evaluate(&node, &StateMap::new(), &NoNames), Accessibility::OPEN);
    }

    #[test]
    fn negative_polarity_requires_false() {
        let node = node_with(json!([{ "type": "character_freed", "target": 9, "required": false }]));
        let mut state = StateMap::new();
        assert!(evaluate(&node, &state, &NoNames).accessible);

        state.set(StateKey::CharacterFreed(CharacterId::intern("9")), true);
        let result = evaluate(&node, &state, &NoNames);
        assert!(!result.accessible);
        assert_eq!(
            result.reason.as_deref(),
            Some("Requires \"Unknown Character\" to NOT be freed")
        );
    }

    #[test]
    fn first_unmet_condition_wins() {
        let node = node_with(json!([
            { "type": "character_alive", "target": "1", "required": true },
            { "id": 7, "type": "custom", "target": "custom", "description": "Party found the key", "required": true },
            { "type": "event_completed", "target": "3", "required": true },
        ]));
        let result = evaluate(&node, &StateMap::new(), &NoNames);
        assert_eq!(result.reason.as_deref(), Some("Party found the key"));

        let mut state = StateMap::new();
        state.set(StateKey::Custom(ConditionId::intern("7")), true);
        let result = evaluate(&node, &state, &NoNames);
        assert_eq!(
            result.reason.as_deref(),
            Some("Requires \"Unknown Event\" to be completed")
        );
    }

    #[test]
    fn names_resolve_through_map_and_registry() {
        let mut map = LoreMap::new();
        map.add_node(EventNode::new(NodeId::intern("5"), "The Heist", Position::ORIGIN));
        let characters = CharacterRegistry::new([Character {
            id: CharacterId::intern("2"),
            name: "Mira".into(),
            kind: "npc".into(),
        }]);
        let names = Names::new(&map, &characters);

        let c = Condition::event_completed(NodeId::intern("5"), false);
        assert_eq!(c.describe(&names), "Event \"The Heist\" must NOT be completed");
        let c = Condition::character_alive(CharacterId::intern("2"), false);
        assert_eq!(c.describe(&names), "Character \"Mira\" must be dead");
        assert_eq!(c.reason(&names), "Requires \"Mira\" to be dead");
    }

    #[test]
    fn normalization_accepts_every_stored_shape() {
        let array = json!([{ "type": "custom", "description": "x" }]);
        let single = json!({ "type": "custom", "description": "x" });
        let encoded = Value::String(array.to_string());
        let owner = NodeId::intern("n");

        assert_eq!(normalize_conditions(owner, &array).len(), 1);
        assert_eq!(normalize_conditions(owner, &single).len(), 1);
        assert_eq!(normalize_conditions(owner, &encoded).len(), 1);
        assert!(normalize_conditions(owner, &Value::Null).is_empty());
        assert!(normalize_conditions(owner, &json!("{not json")).is_empty());
        assert!(normalize_conditions(owner, &json!(42)).is_empty());
        assert!(normalize_conditions(owner, &json!("")).is_empty());
    }

    #[test]
    fn malformed_elements_are_skipped_in_order() {
        let conditions = normalize_conditions(NodeId::intern("n"), &json!([
            "junk",
            { "target": "1" },
            { "type": "event_completed", "target": "1", "required": true },
            { "type": "character_freed", "target": "2" },
        ]));
        let tags: Vec<_> = conditions.iter().map(|c| c.kind.tag()).collect();
        assert_eq!(tags, vec!["event_completed", "character_freed"]);
        let required: Vec<_> = conditions.iter().map(|c| c.required).collect();
        assert_eq!(required, vec![true, false]);
    }

    #[test]
    fn required_follows_loose_truthiness() {
        let conditions = normalize_conditions(NodeId::intern("n"), &json!([
            { "type": "custom", "required": 1 },
            { "type": "custom", "required": 0 },
            { "type": "custom", "required": "yes" },
            { "type": "custom", "required": "" },
            { "type": "custom", "required": null },
            { "type": "custom", "required": [] },
            { "type": "custom" },
        ]));
        let required: Vec<_> = conditions.iter().map(|c| c.required).collect();
        assert_eq!(required, vec![true, false, true, false, false, false, false]);
    }

    #[test]
    fn missing_ids_are_stable_across_loads() {
        let stored = json!([
            { "type": "custom", "description": "a" },
            "junk",
            { "id": "kept", "type": "custom" },
            { "type": "custom", "description": "b" },
        ]);
        let owner = NodeId::intern("event_9");
        let first: Vec<_> = normalize_conditions(owner, &stored).iter().map(|c| c.id).collect();
        let second: Vec<_> = normalize_conditions(owner, &stored).iter().map(|c| c.id).collect();
        assert_eq!(first, second);

        let names: Vec<_> = first.iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["event_9_cond_0", "kept", "event_9_cond_3"]);

        let single = normalize_conditions(owner, &json!({ "type": "custom" }));
        assert_eq!(single[0].id.as_str(), "event_9_cond_0");
    }

    #[test]
    fn unknown_tags_never_block() {
        let node = node_with(json!([{ "type": "moon_phase", "target": "full", "required": true }]));
        assert!(evaluate(&node, &StateMap::new(), &NoNames).accessible);
        assert_eq!(node.conditions[0].to_value()["type"], "moon_phase");
    }

    #[test]
    fn state_keys_roundtrip_legacy_strings() {
        let keys = [
            StateKey::EventCompleted(NodeId::intern("event_3")),
            StateKey::CharacterFreed(CharacterId::intern("12")),
            StateKey::CharacterAlive(CharacterId::intern("12")),
            StateKey::Custom(ConditionId::intern("1700000000")),
        ];
        for key in keys {
            assert_eq!(key.to_string().parse::<StateKey>(), Ok(key));
        }
        assert_eq!(keys[0].to_string(), "event_event_3_completed");
        assert!("event__completed".parse::<StateKey>().is_err());
        assert!("weather_sunny".parse::<StateKey>().is_err());
    }

    #[test]
    fn toggle_flips_exactly_one_flag() {
        let mut state = StateMap::new();
        let key = StateKey::EventCompleted(NodeId::intern("t"));
        assert!(state.toggle(key));
        assert!(!state.toggle(key));
        assert_eq!(state.len(), 1);

        let alive = StateKey::CharacterAlive(CharacterId::intern("t"));
        assert!(!state.toggle(alive));
    }

    #[test]
    fn state_map_serializes_as_flat_object() {
        let mut state = StateMap::new();
        state.set(StateKey::EventCompleted(NodeId::intern("4")), true);
        state.set(StateKey::CharacterAlive(CharacterId::intern("8")), false);
        let text = serde_json::to_string(&state).unwrap();
        assert_eq!(text, r#"{"character_8_alive":false,"event_4_completed":true}"#);

        let back: StateMap =
            serde_json::from_str(r#"{"event_4_completed":true,"bogus":true,"character_8_alive":false}"#)
                .unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn badges_summarize_node() {
        let mut node = node_with(json!([{ "type": "event_completed", "target": "n", "required": false }]));
        node.image = Some("/maps/cave.png".into());
        let mut state = StateMap::new();

        let b = badges(&node, &state, &NoNames);
        assert_eq!(b.locked, None);
        assert!(b.conditions_met);
        assert!(b.has_image);
        assert!(!b.completed);

        state.toggle(StateKey::EventCompleted(node.id));
        let b = badges(&node, &state, &NoNames);
        assert!(b.completed);
        assert!(b.locked.is_some());
        assert!(!b.conditions_met);
    }

    #[test]
    fn condition_serde_uses_stored_shape() {
        let c = Condition::custom("Door unlocked", false);
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["type"], "custom");
        assert_eq!(value["required"], false);
        let back: Condition = serde_json::from_value(value).unwrap();
        assert_eq!(back, c);
    }
}
