//! Core data types shared by the lexer, the role model, and the triple reader.
//!
//! Identifiers, roles, and constants are all plain strings: the core never
//! looks inside a node identifier or a constant, and a role only matters as an
//! exact-match key into a [`Model`](crate::Model). [`Triple`] is the unit every
//! role-model operation acts on.

use serde::{Deserialize, Serialize};

/// An opaque string naming a graph node (a "variable"), e.g. `"a"` or `"b2"`.
pub type Identifier = String;

/// An edge label, conventionally prefixed with `:` (e.g. `":ARG0"`).
pub type Role = String;

/// An atomic leaf value: a symbol, quoted string, integer, or float, kept
/// exactly as written (quotes included).
pub type Constant = String;

/// A `(source, role, target)` edge record.
///
/// The target is either an [`Identifier`] or a [`Constant`]; the two are
/// indistinguishable at this level and are never parsed.
///
/// Serialises as `{ "source": "a", "role": ":ARG0", "target": "b" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Triple {
    /// The node the edge leaves.
    pub source: Identifier,
    /// The edge label.
    pub role: Role,
    /// The node or constant the edge points to.
    pub target: String,
}

impl Triple {
    pub fn new(
        source: impl Into<Identifier>,
        role: impl Into<Role>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            role: role.into(),
            target: target.into(),
        }
    }
}

/// Formats the triple as `(source, role, target)`.
impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.role, self.target)
    }
}

impl<S, R, T> From<(S, R, T)> for Triple
where
    S: Into<Identifier>,
    R: Into<Role>,
    T: Into<String>,
{
    fn from((source, role, target): (S, R, T)) -> Self {
        Triple::new(source, role, target)
    }
}

// --- tests -------------------------------------------------------------------
