//! Semantic model for interpreting roles.
//!
//! A [`Model`] is built once from a [`ModelConfig`] and never changes. It
//! decides which roles are legal, how roles invert and canonicalize, and how a
//! single edge reifies into a three-edge subgraph (and back).
//!
//! Roles are compared by exact string match throughout. The only place a
//! single `-of` inversion is looked through is [`Model::has_role`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Constant, Identifier, Role, Triple};

/// Suffix that marks a role as inverted (`:ARG0-of`).
pub const INVERSION_SUFFIX: &str = "-of";

/// Leading character of a role in graph notation.
pub const ROLE_MARKER: char = ':';

/// Identifier given to the fresh node introduced by [`Model::reify`].
///
/// The same placeholder is used on every call; rename it before merging the
/// triples into a graph.
pub const REIFIED_PLACEHOLDER: &str = "_";

/// Errors returned by model construction and reification.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0:?} cannot be reified")]
    NotReifiable(Role),

    #[error("cannot dereify: {0}")]
    NotDereifiable(String),

    #[error("invalid model configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Configuration a [`Model`] is built from.
///
/// Every field is optional when deserialising; absent fields take the
/// defaults below.
///
/// | Field | Default |
/// |-------|---------|
/// | `top_identifier` | `"top"` |
/// | `top_role` | `":TOP"` |
/// | `nodetype_role` | `":instance"` |
/// | `roles` | empty |
/// | `normalizations` | empty |
/// | `reifications` | empty |
///
/// ```json
/// {
///   "roles": { ":ARG0": {}, ":mod": {} },
///   "normalizations": { ":mod-of": ":domain" },
///   "reifications": [[":mod", "have-mod-91", ":ARG2", ":ARG1"]]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Identifier of the implicit node above the graph's top.
    pub top_identifier: Identifier,
    /// Role linking the implicit root to the top node.
    pub top_role: Role,
    /// Role of the edge assigning a node its concept.
    pub nodetype_role: Role,
    /// Registered roles and their associated data, passed through untouched.
    pub roles: HashMap<Role, serde_json::Value>,
    /// Preferred spellings, applied once at the end of canonicalization.
    pub normalizations: HashMap<Role, Role>,
    /// `[role, label, source_role, target_role]` entries. When a role appears
    /// more than once, the first entry is the one [`Model::reify`] uses.
    pub reifications: Vec<(Role, Constant, Role, Role)>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            top_identifier: "top".into(),
            top_role: ":TOP".into(),
            nodetype_role: ":instance".into(),
            roles: HashMap::new(),
            normalizations: HashMap::new(),
            reifications: Vec::new(),
        }
    }
}

/// How an edge with a given role expands into a reified node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reification {
    /// Concept of the fresh node.
    pub label: Constant,
    /// Role from the fresh node to the original source.
    pub source_role: Role,
    /// Role from the fresh node to the original target.
    pub target_role: Role,
}

/// Reverse index entry: which role a reified node of some label collapses to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Dereification {
    role: Role,
    source_role: Role,
    target_role: Role,
}

/// An immutable role model. Safe to share between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    top_identifier: Identifier,
    top_role: Role,
    nodetype_role: Role,
    roles: HashMap<Role, serde_json::Value>,
    normalizations: HashMap<Role, Role>,
    reifications: HashMap<Role, Vec<Reification>>,
    dereifications: HashMap<Constant, Vec<Dereification>>,
}

impl Default for Model {
    fn default() -> Self {
        Model::new(ModelConfig::default())
    }
}

impl From<ModelConfig> for Model {
    fn from(config: ModelConfig) -> Self {
        Model::new(config)
    }
}

impl Model {
    /// Build a model, grouping reification entries by role in the order given.
    pub fn new(config: ModelConfig) -> Self {
        let mut reifications: HashMap<Role, Vec<Reification>> = HashMap::new();
        let mut dereifications: HashMap<Constant, Vec<Dereification>> = HashMap::new();
        for (role, label, source_role, target_role) in config.reifications {
            dereifications
                .entry(label.clone())
                .or_default()
                .push(Dereification {
                    role: role.clone(),
                    source_role: source_role.clone(),
                    target_role: target_role.clone(),
                });
            reifications.entry(role).or_default().push(Reification {
                label,
                source_role,
                target_role,
            });
        }

        tracing::debug!(
            roles = config.roles.len(),
            normalizations = config.normalizations.len(),
            reifications = reifications.len(),
            "model built"
        );

        Self {
            top_identifier: config.top_identifier,
            top_role: config.top_role,
            nodetype_role: config.nodetype_role,
            roles: config.roles,
            normalizations: config.normalizations,
            reifications,
            dereifications,
        }
    }

    /// Build a model from a JSON [`ModelConfig`] document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let config: ModelConfig = serde_json::from_str(json)?;
        Ok(Model::new(config))
    }

    pub fn top_identifier(&self) -> &str {
        &self.top_identifier
    }

    pub fn top_role(&self) -> &str {
        &self.top_role
    }

    pub fn nodetype_role(&self) -> &str {
        &self.nodetype_role
    }

    /// Registered roles and their data, in unspecified order.
    pub fn roles(&self) -> impl Iterator<Item = (&Role, &serde_json::Value)> {
        self.roles.iter()
    }

    /// The data registered for `role`, if it is registered exactly.
    pub fn role_data(&self, role: &str) -> Option<&serde_json::Value> {
        self.roles.get(role)
    }

    pub fn normalizations(&self) -> &HashMap<Role, Role> {
        &self.normalizations
    }

    /// All reification entries for `role`, first one first.
    pub fn reifications_for(&self, role: &str) -> &[Reification] {
        self.reifications.get(role).map(Vec::as_slice).unwrap_or_default()
    }

    /// `true` if `role` is known exactly, or if it ends in `-of` and the
    /// role without that suffix is known exactly.
    ///
    /// Only one level of inversion is looked through; a role that
    /// [`canonicalize_role`](Self::canonicalize_role) would turn into a known
    /// role is not necessarily accepted here.
    pub fn has_role(&self, role: &str) -> bool {
        self.is_known(role)
            || role
                .strip_suffix(INVERSION_SUFFIX)
                .is_some_and(|base| self.is_known(base))
    }

    /// `true` if `role` is not known exactly and ends in `-of`.
    pub fn is_role_inverted(&self, role: &str) -> bool {
        !self.is_known(role) && role.ends_with(INVERSION_SUFFIX)
    }

    /// Strip `-of` from an inverted role, or append it otherwise.
    ///
    /// A registered role that happens to end in `-of` (`:consist-of`) gains
    /// a second suffix rather than losing one.
    pub fn invert_role(&self, role: &str) -> Role {
        match role.strip_suffix(INVERSION_SUFFIX) {
            Some(base) if !self.is_known(role) => base.to_string(),
            _ => format!("{role}{INVERSION_SUFFIX}"),
        }
    }

    /// Swap source and target and invert the role, whatever direction the
    /// triple currently has. The role is not normalized.
    pub fn invert(&self, triple: &Triple) -> Triple {
        Triple {
            source: triple.target.clone(),
            role: self.invert_role(&triple.role),
            target: triple.source.clone(),
        }
    }

    /// [`invert`](Self::invert) the triple only if its role is inverted.
    pub fn deinvert(&self, triple: &Triple) -> Triple {
        if self.is_role_inverted(&triple.role) {
            self.invert(triple)
        } else {
            triple.clone()
        }
    }

    /// Canonicalize `role`:
    ///
    /// * prefix `:` if it is missing;
    /// * collapse stacked inversions (`:ARG0-of-of` becomes `:ARG0`) without
    ///   changing the role's direction;
    /// * replace the result with its normalized form, if the model has one.
    pub fn canonicalize_role(&self, role: &str) -> Role {
        let mut role = if role.starts_with(ROLE_MARKER) {
            role.to_string()
        } else {
            format!("{ROLE_MARKER}{role}")
        };
        if !self.is_known(&role) {
            loop {
                let next = self.invert_role(&self.invert_role(&role));
                if next == role {
                    break;
                }
                role = next;
            }
        }
        match self.normalizations.get(&role) {
            Some(normalized) => normalized.clone(),
            None => role,
        }
    }

    /// Replace the triple's role with its canonical form. Source and target
    /// keep their places.
    pub fn canonicalize(&self, triple: &Triple) -> Triple {
        Triple {
            source: triple.source.clone(),
            role: self.canonicalize_role(&triple.role),
            target: triple.target.clone(),
        }
    }

    /// `true` if the triple's role has a reification entry (exact match).
    pub fn is_reifiable(&self, triple: &Triple) -> bool {
        self.reifications.contains_key(&triple.role)
    }

    /// The three triples that reify `triple`, using the first entry
    /// registered for its role:
    ///
    /// ```text
    /// (source, inverse(source_role), _)
    /// (_, nodetype_role, label)
    /// (_, target_role, target)
    /// ```
    ///
    /// `_` is [`REIFIED_PLACEHOLDER`]; callers must give it a fresh
    /// identifier before adding the triples to a graph.
    pub fn reify(&self, triple: &Triple) -> Result<[Triple; 3], ModelError> {
        let Some(rule) = self.reifications.get(&triple.role).and_then(|r| r.first()) else {
            return Err(ModelError::NotReifiable(triple.role.clone()));
        };
        Ok([
            Triple::new(
                triple.source.clone(),
                self.invert_role(&rule.source_role),
                REIFIED_PLACEHOLDER,
            ),
            Triple::new(REIFIED_PLACEHOLDER, self.nodetype_role.clone(), rule.label.clone()),
            Triple::new(REIFIED_PLACEHOLDER, rule.target_role.clone(), triple.target.clone()),
        ])
    }

    /// `true` if `triple` assigns a node a concept that is the label of some
    /// reification entry.
    pub fn is_dereifiable(&self, triple: &Triple) -> bool {
        triple.role == self.nodetype_role && self.dereifications.contains_key(&triple.target)
    }

    /// Collapse a reified node back into a single edge.
    ///
    /// `instance` assigns the reified node its concept; `source` links the
    /// node to the original source, either as `(x, inverse(source_role), n)`
    /// as [`reify`](Self::reify) produces it or as `(n, source_role, x)`;
    /// `target` is `(n, target_role, y)`. The first entry registered for the
    /// concept whose roles match gives the result `(x, role, y)`.
    pub fn dereify(
        &self,
        instance: &Triple,
        source: &Triple,
        target: &Triple,
    ) -> Result<Triple, ModelError> {
        if !self.is_dereifiable(instance) {
            return Err(ModelError::NotDereifiable(format!(
                "{instance} does not assign a reified concept"
            )));
        }
        let node = &instance.source;
        if &target.source != node {
            return Err(ModelError::NotDereifiable(format!(
                "{target} does not start at reified node {node:?}"
            )));
        }
        let (x, inverted, source_role) = if &source.target == node {
            (&source.source, true, &source.role)
        } else if &source.source == node {
            (&source.target, false, &source.role)
        } else {
            return Err(ModelError::NotDereifiable(format!(
                "{source} does not touch reified node {node:?}"
            )));
        };

        let entries = self
            .dereifications
            .get(&instance.target)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let found = entries.iter().find(|entry| {
            let expected_source = if inverted {
                self.invert_role(&entry.source_role)
            } else {
                entry.source_role.clone()
            };
            &expected_source == source_role && entry.target_role == target.role
        });

        match found {
            Some(entry) => Ok(Triple::new(x.clone(), entry.role.clone(), target.target.clone())),
            None => Err(ModelError::NotDereifiable(format!(
                "no reification of {:?} uses roles {} and {}",
                instance.target, source.role, target.role
            ))),
        }
    }

    // Exact membership: registered roles plus the top and node-type roles.
    fn is_known(&self, role: &str) -> bool {
        self.roles.contains_key(role) || role == self.top_role || role == self.nodetype_role
    }
}

// --- tests -------------------------------------------------------------------
