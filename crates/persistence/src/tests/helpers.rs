// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{InMemoryStore, RecordSet, reconcile_draft};
use conftrack::{ConferenceDraft, EditSession};
use conftrack_domain::{
    Identity, PhaseGraphVariant, PhaseWindow, PhaseWindowKind, PricePhase, RefundPolicy,
    ResearchPhase, RevisionRound, RoundNumber, Sponsor, Ticket, TimeWindow,
};
use time::OffsetDateTime;
use time::macros::datetime;

/// A local full phase starting at `start` with two revision rounds inside
/// its revise window.
pub fn create_local_phase(name: &str, start: OffsetDateTime) -> ResearchPhase {
    let mut phase = ResearchPhase::new(name, PhaseGraphVariant::Full);

    let mut cursor: OffsetDateTime = start;
    for (kind, days) in [
        (PhaseWindowKind::Registration, 9),
        (PhaseWindowKind::AbstractDecideStatus, 5),
        (PhaseWindowKind::FullPaper, 17),
        (PhaseWindowKind::Review, 14),
        (PhaseWindowKind::FullPaperDecideStatus, 10),
        (PhaseWindowKind::Revise, 35),
        (PhaseWindowKind::RevisionPaperDecideStatus, 9),
        (PhaseWindowKind::CameraReady, 15),
        (PhaseWindowKind::AuthorPayment, 15),
    ] {
        let window = PhaseWindow::with_start(cursor, days).unwrap();
        cursor = window.end().unwrap();
        *phase.window_mut(kind) = window;
    }

    let revise_start: OffsetDateTime = phase.revise.start().unwrap();
    phase.revision_rounds = vec![
        RevisionRound::new(
            RoundNumber::new(1).unwrap(),
            TimeWindow::new(
                revise_start + time::Duration::days(4),
                revise_start + time::Duration::days(13),
            )
            .unwrap(),
        ),
        RevisionRound::new(
            RoundNumber::new(2).unwrap(),
            TimeWindow::new(
                revise_start + time::Duration::days(18),
                revise_start + time::Duration::days(28),
            )
            .unwrap(),
        ),
    ];
    phase
}

/// A local ticket with one price phase holding one refund policy.
pub fn create_local_ticket(name: &str) -> Ticket {
    Ticket {
        id: Identity::Local,
        name: name.to_string(),
        price: 40_000,
        total_slot: 300,
        phases: vec![PricePhase {
            name: String::from("Early bird"),
            apply_percent: 80,
            total_slot: 100,
            refund_policies: vec![RefundPolicy {
                id: Identity::Local,
                percent_refund: 50,
                refund_deadline: Some(datetime!(2026-05-01 0:00 UTC)),
            }],
            ..PricePhase::default()
        }],
        ..Ticket::default()
    }
}

pub fn create_local_sponsor(name: &str) -> Sponsor {
    Sponsor {
        id: Identity::Local,
        name: name.to_string(),
        image_url: format!("https://cdn.example.org/{}.png", name.to_lowercase()),
    }
}

/// A full local draft: one phase, one ticket tree and two sponsors.
pub fn create_local_draft() -> ConferenceDraft {
    ConferenceDraft {
        research_phases: vec![create_local_phase(
            "Main track",
            datetime!(2026-01-01 0:00 UTC),
        )],
        tickets: vec![create_local_ticket("Regular")],
        sponsors: vec![create_local_sponsor("ACME"), create_local_sponsor("Globex")],
        ..ConferenceDraft::default()
    }
}

/// Stores `draft` and returns the store with its canonical records.
///
/// The journal is cleared so tests only see their own calls.
pub async fn seed_store(draft: ConferenceDraft) -> (InMemoryStore, ConferenceDraft) {
    let store = InMemoryStore::new();
    let session = EditSession {
        draft,
        ..EditSession::create("conf-2026")
    };

    let report = reconcile_draft(&store, &session).await.unwrap();
    assert!(report.is_success(), "seeding failed: {:?}", report.failures);

    let canonical = RecordSet::fetch(&store).await.unwrap().to_draft().unwrap();
    store.clear_journal().await;
    (store, canonical)
}
