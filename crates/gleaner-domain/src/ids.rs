//! Identifier types
//!
//! All identifiers are UUIDv7 values: chronologically sortable, generated
//! without coordination, and stored as their canonical string form.

use std::fmt;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its UUID string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s.trim())
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a note
    NoteId
);

uuid_id!(
    /// Unique identifier for a tag
    TagId
);

uuid_id!(
    /// Unique identifier for an action item
    ActionItemId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_string_round_trip() {
        let id = NoteId::new();
        let parsed = NoteId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_ids_are_chronological() {
        let first = TagId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TagId::new();
        assert!(first < second);
    }

    #[test]
    fn test_invalid_id_string() {
        let err = ActionItemId::from_string("not-a-uuid").unwrap_err();
        assert!(err.contains("ActionItemId"));
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        let id = NoteId::new();
        let parsed: NoteId = format!("  {}\n", id).parse().unwrap();
        assert_eq!(id, parsed);
    }
}
