//! Identifiers for diagram elements and connections.
//!
//! This module provides the [`ElementId`] and [`ConnectionId`] string
//! newtypes and the [`IdGenerator`] that mints fresh identifiers for an
//! editing session.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
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

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
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

string_id!(
    /// Identifier of a diagram element, stable for the element's lifetime.
    ///
    /// # Examples
    ///
    /// ```
    /// use procanvas_core::identifier::ElementId;
    ///
    /// let id = ElementId::new("task_1");
    /// assert_eq!(id, "task_1");
    /// assert_eq!(id.to_string(), "task_1");
    /// ```
    ElementId
);

string_id!(
    /// Identifier of a connection between two elements.
    ConnectionId
);

/// Mints session-unique identifiers of the form `<prefix>_<n>`.
///
/// The counter is shared by all prefixes and only ever increases, so an id
/// is never handed out twice in one session, even after the element it named
/// was deleted or undone. Callers pass an `is_taken` predicate so identifiers
/// that came in through an import are skipped.
///
/// # Examples
///
/// ```
/// use procanvas_core::identifier::IdGenerator;
///
/// let mut ids = IdGenerator::new();
/// assert_eq!(ids.next_id("task", |_| false), "task_1");
/// assert_eq!(ids.next_id("task", |candidate| candidate == "task_2"), "task_3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next free identifier with the given prefix.
    pub fn next_id(&mut self, prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.counter += 1;
            let candidate = format!("{prefix}_{}", self.counter);
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Returns a fresh [`ElementId`].
    pub fn next_element_id(&mut self, prefix: &str, is_taken: impl Fn(&str) -> bool) -> ElementId {
        ElementId::new(self.next_id(prefix, is_taken))
    }

    /// Returns a fresh [`ConnectionId`].
    pub fn next_connection_id(
        &mut self,
        prefix: &str,
        is_taken: impl Fn(&str) -> bool,
    ) -> ConnectionId {
        ConnectionId::new(self.next_id(prefix, is_taken))
    }
}
