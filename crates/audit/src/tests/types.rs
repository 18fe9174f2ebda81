// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use time::macros::datetime;

fn create_event() -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("chair-1"), String::from("head_reviewer")),
        Cause::new(String::from("req-456"), String::from("Decision form")),
        Action::new(
            String::from("DecideArtifact"),
            Some(String::from("full_paper accepted")),
        ),
        StateSnapshot::new(String::from("paper=p1 full_paper=pending")),
        StateSnapshot::new(String::from("paper=p1 full_paper=accepted")),
        String::from("conf-2026"),
        datetime!(2026-04-05 09:30 UTC),
    )
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("chair-1"), String::from("head_reviewer"));

    assert_eq!(actor.id, "chair-1");
    assert_eq!(actor.actor_type, "head_reviewer");
}

#[test]
fn test_system_actor() {
    let actor: Actor = Actor::system();
    assert_eq!(actor.id, "system");
    assert_eq!(actor.actor_type, "system");
}

#[test]
fn test_action_creation_requires_name() {
    let action: Action = Action::new(String::from("MarkRoundCompleted"), None);

    assert_eq!(action.name, "MarkRoundCompleted");
    assert_eq!(action.details, None);
}

#[test]
fn test_new_event_is_unpersisted() {
    let event: AuditEvent = create_event();

    assert_eq!(event.event_id, None);
    assert_eq!(event.conference_id, "conf-2026");
    assert_eq!(event.action.name, "DecideArtifact");
    assert_ne!(event.before, event.after);
}

#[test]
fn test_audit_event_with_id() {
    let event: AuditEvent = create_event().with_id(42);

    assert_eq!(event.event_id, Some(42));
    assert_eq!(event.actor.id, "chair-1");
}

#[test]
fn test_audit_event_equality() {
    assert_eq!(create_event(), create_event());
    assert_ne!(create_event(), create_event().with_id(1));
}

#[test]
fn test_audit_event_serializes_timestamp_as_rfc3339() {
    let event: AuditEvent = create_event();
    let json: String = serde_json::to_string(&event).unwrap();

    assert!(json.contains("\"occurred_at\":\"2026-04-05T09:30:00Z\""));
    let restored: AuditEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, event);
}
