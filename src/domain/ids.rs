use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Fresh random identifier for records created outside the persistence layer.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

opaque_id!(
    /// Identifier wrapper for guardians.
    GuardianId
);
opaque_id!(
    /// Identifier wrapper for children.
    ChildId
);
opaque_id!(
    /// Identifier wrapper for routines.
    RoutineId
);
opaque_id!(
    /// Identifier wrapper for routine steps.
    ItemId
);
opaque_id!(
    /// Identifier wrapper for calendar events.
    EventId
);
