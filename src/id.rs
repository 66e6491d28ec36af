//! Process-wide identifier generation for nodes and edges.
//!
//! Node and edge ids are drawn from a single counter so an id is never reused
//! across the two kinds. Ids are not persisted; a restarted process starts
//! counting again.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const ID_PREFIX: &str = "kmk";

static GLOBAL_IDS: IdGenerator = IdGenerator::new();

/// A monotonically increasing id source.
///
/// The crate keeps one instance for the whole process (see [`next_id`]);
/// separate instances only guarantee uniqueness among their own outputs.
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Returns the next raw sequence number.
    pub fn next_sequence(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns a fresh id string, e.g. `kmk_17`.
    pub fn next(&self) -> String {
        format!("{}_{}", ID_PREFIX, self.next_sequence())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the next id from the process-wide generator.
pub fn next_id() -> String {
    GLOBAL_IDS.next()
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Allocates a new id from the process-wide generator.
            pub fn generate() -> Self {
                Self(next_id())
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
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id! {
    /// Opaque, immutable node identifier.
    NodeId
}

string_id! {
    /// Opaque edge identifier. Shares its namespace with [`NodeId`].
    EdgeId
}
