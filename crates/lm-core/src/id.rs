use lasso::{Spur, ThreadedRodeo};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner shared by every id kind — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Accepts either a JSON string or an integer. The persistence layer hands
/// out integer ids while stored conditions reference them as strings.
struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = Spur;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Spur, E> {
        Ok(INTERNER.get_or_intern(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Spur, E> {
        Ok(INTERNER.get_or_intern(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Spur, E> {
        Ok(INTERNER.get_or_intern(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Spur, E> {
        // `Date.now()`-style temporary ids occasionally arrive as floats.
        if v.fract() == 0.0 {
            Ok(INTERNER.get_or_intern(format!("{}", v as i64)))
        } else {
            Ok(INTERNER.get_or_intern(v.to_string()))
        }
    }
}

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $sigil:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                $name(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a unique id with a prefix (e.g. `event_3`).
            pub fn with_prefix(prefix: &str) -> Self {
                use std::sync::atomic::{AtomicU64, Ordering};
                static COUNTER: AtomicU64 = AtomicU64::new(0);
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                Self::intern(&format!("{prefix}_{n}"))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($sigil, "{}"), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self::intern(&n.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::intern(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map($name)
            }
        }
    };
}

interned_id!(
    /// Identifier of an event node on the canvas.
    NodeId,
    "event#"
);

interned_id!(
    /// Identifier of a directed connection between two event nodes.
    ConnectionId,
    "conn#"
);

interned_id!(
    /// Identifier of a character in the external registry.
    CharacterId,
    "char#"
);

interned_id!(
    /// Identifier of a single condition (keys custom flags).
    ConditionId,
    "cond#"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("12");
        let b = NodeId::intern("12");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "12");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = NodeId::with_prefix("event");
        let b = NodeId::with_prefix("event");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("event_"));
    }

    #[test]
    fn numeric_and_string_ids_agree() {
        let from_num: NodeId = serde_json::from_str("5").unwrap();
        let from_str: NodeId = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(NodeId::from(5), from_num);
    }

    #[test]
    fn float_timestamp_ids_drop_fraction() {
        let id: ConnectionId = serde_json::from_str("1700000000000.0").unwrap();
        assert_eq!(id.as_str(), "1700000000000");
    }

    #[test]
    fn id_kinds_share_text_but_not_type() {
        let node = NodeId::intern("7");
        let character = CharacterId::intern("7");
        assert_eq!(node.as_str(), character.as_str());
        assert_eq!(format!("{node:?}"), "event#7");
        assert_eq!(format!("{character:?}"), "char#7");
    }
}
