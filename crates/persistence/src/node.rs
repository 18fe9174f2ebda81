// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entities as record trees.
//!
//! Every entity serializes to a JSON object. Its `id` becomes the node's
//! identity, its nested collection (if the kind has one) becomes the
//! node's children, and everything else is the record payload.

use crate::error::ReconcileError;
use crate::port::Payload;
use conftrack_domain::{EntityKind, Identity, Tracked};
use serde::Serialize;
use serde_json::Value;

/// The field holding a kind's nested records, and their kind.
#[must_use]
pub const fn child_field(kind: EntityKind) -> Option<(&'static str, EntityKind)> {
    match kind {
        EntityKind::Ticket => Some(("phases", EntityKind::PricePhase)),
        EntityKind::PricePhase => Some(("refund_policies", EntityKind::RefundPolicy)),
        EntityKind::ResearchPhase => Some(("revision_rounds", EntityKind::RevisionRoundDeadline)),
        EntityKind::RefundPolicy
        | EntityKind::Session
        | EntityKind::Policy
        | EntityKind::Material
        | EntityKind::RankingFile
        | EntityKind::RankingReference
        | EntityKind::Media
        | EntityKind::Sponsor
        | EntityKind::RevisionRoundDeadline => None,
    }
}

/// The kinds of one entity family, outermost first.
#[must_use]
pub fn family_kinds(root: EntityKind) -> Vec<EntityKind> {
    let mut kinds: Vec<EntityKind> = vec![root];
    let mut current: EntityKind = root;
    while let Some((_, child)) = child_field(current) {
        kinds.push(child);
        current = child;
    }
    kinds
}

/// One entity and its nested entities, ready to be diffed.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    pub kind: EntityKind,
    pub identity: Identity,
    pub payload: Payload,
    pub children: Vec<Self>,
}

impl EntityNode {
    /// Builds the record tree of an entity.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Payload` if the entity does not serialize
    /// to a JSON object with a string or null `id`.
    pub fn from_entity<T: Tracked + Serialize>(entity: &T) -> Result<Self, ReconcileError> {
        let value: Value = serde_json::to_value(entity).map_err(|err| ReconcileError::Payload {
            kind: T::KIND,
            message: err.to_string(),
        })?;
        Self::from_value(T::KIND, value)
    }

    /// Builds the record trees of a collection, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first payload error.
    pub fn from_entities<T: Tracked + Serialize>(
        entities: &[T],
    ) -> Result<Vec<Self>, ReconcileError> {
        entities.iter().map(Self::from_entity).collect()
    }

    fn from_value(kind: EntityKind, value: Value) -> Result<Self, ReconcileError> {
        let Value::Object(mut payload) = value else {
            return Err(invalid(kind, "expected a JSON object"));
        };

        let identity: Identity = match payload.remove("id") {
            Some(Value::String(id)) => Identity::persisted(id),
            Some(Value::Null) | None => Identity::Local,
            Some(_) => return Err(invalid(kind, "id must be a string or null")),
        };

        let children: Vec<Self> = match child_field(kind) {
            Some((field, child_kind)) => match payload.remove(field) {
                Some(Value::Array(items)) => items
                    .into_iter()
                    .map(|item| Self::from_value(child_kind, item))
                    .collect::<Result<Vec<Self>, ReconcileError>>()?,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => return Err(invalid(kind, "nested records must be an array")),
            },
            None => Vec::new(),
        };

        Ok(Self {
            kind,
            identity,
            payload,
            children,
        })
    }
}

/// Returns the top-level fields of `local` that differ from `canonical`.
///
/// Fields missing from `local` but present in `canonical` are cleared
/// with `null`.
#[must_use]
pub fn diff_payload(local: &Payload, canonical: &Payload) -> Payload {
    let mut patch: Payload = local
        .iter()
        .filter(|(field, value)| canonical.get(field.as_str()) != Some(*value))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();
    for field in canonical.keys() {
        if !local.contains_key(field) {
            patch.insert(field.clone(), Value::Null);
        }
    }
    patch
}

fn invalid(kind: EntityKind, message: &str) -> ReconcileError {
    ReconcileError::Payload {
        kind,
        message: message.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use conftrack_domain::{PricePhase, RefundPolicy, Sponsor, Ticket};
    use serde_json::json;

    #[test]
    fn test_ticket_tree_splits_identity_payload_and_children() {
        let ticket = Ticket {
            id: Identity::persisted("t-1"),
            name: String::from("Regular"),
            phases: vec![PricePhase {
                name: String::from("Early bird"),
                refund_policies: vec![RefundPolicy::default()],
                ..PricePhase::default()
            }],
            ..Ticket::default()
        };

        let node = EntityNode::from_entity(&ticket).unwrap();

        assert_eq!(node.kind, EntityKind::Ticket);
        assert_eq!(node.identity, Identity::persisted("t-1"));
        assert!(!node.payload.contains_key("id"));
        assert!(!node.payload.contains_key("phases"));
        assert_eq!(node.payload.get("name"), Some(&json!("Regular")));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].kind, EntityKind::PricePhase);
        assert_eq!(node.children[0].identity, Identity::Local);
        assert_eq!(node.children[0].children[0].kind, EntityKind::RefundPolicy);
    }

    #[test]
    fn test_family_kinds() {
        assert_eq!(
            family_kinds(EntityKind::Ticket),
            vec![
                EntityKind::Ticket,
                EntityKind::PricePhase,
                EntityKind::RefundPolicy
            ]
        );
        assert_eq!(family_kinds(EntityKind::Media), vec![EntityKind::Media]);
    }

    #[test]
    fn test_diff_only_changed_fields() {
        let canonical = EntityNode::from_entity(&Sponsor {
            id: Identity::persisted("s-1"),
            name: String::from("ACME"),
            image_url: String::from("a.png"),
        })
        .unwrap();
        let local = EntityNode::from_entity(&Sponsor {
            id: Identity::persisted("s-1"),
            name: String::from("ACME Corp"),
            image_url: String::from("a.png"),
        })
        .unwrap();

        let patch = diff_payload(&local.payload, &canonical.payload);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("name"), Some(&json!("ACME Corp")));
        assert!(diff_payload(&canonical.payload, &canonical.payload).is_empty());
    }

    #[test]
    fn test_diff_clears_dropped_fields() {
        let local: Payload = json!({"name": "A"}).as_object().cloned().unwrap();
        let canonical: Payload = json!({"name": "A", "note": "x"})
            .as_object()
            .cloned()
            .unwrap();

        let patch = diff_payload(&local, &canonical);
        assert_eq!(patch.get("note"), Some(&Value::Null));
        assert_eq!(patch.len(), 1);
    }
}
