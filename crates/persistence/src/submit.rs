// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ReconcileError;
use crate::hydrate::RecordSet;
use crate::port::PersistencePort;
use crate::reconcile::{ReconcileReport, reconcile_draft};
use conftrack::{ConferenceDraft, EditSession, State};
use tracing::{info, warn};

/// Submits an edit session to the store.
///
/// The draft's research phases are validated first; a rejected draft
/// makes no store calls. The draft is then reconciled. When every
/// operation went through, the session's deletions are cleared; otherwise
/// only the deletions that succeeded are forgotten. If any store call was
/// attempted, canonical records are fetched again and become the session's
/// new baseline and draft, and the conference state's phases.
///
/// # Arguments
///
/// * `session` - The edit session, rebased in place after a refetch
/// * `state` - The conference state whose phases are refreshed
/// * `port` - The conference store
///
/// # Returns
///
/// The reconciliation report. Individual operation failures are reported
/// there, not as errors.
///
/// # Errors
///
/// Returns `ReconcileError::Validation` if the draft is rejected,
/// `ReconcileError::Payload` if an entity cannot be converted, or
/// `ReconcileError::Refetch` if canonical records cannot be fetched.
pub async fn submit_edit<P: PersistencePort + ?Sized>(
    session: &mut EditSession,
    state: &mut State,
    port: &P,
) -> Result<ReconcileReport, ReconcileError> {
    session.validate_draft()?;

    let report: ReconcileReport = reconcile_draft(port, session).await?;

    if report.is_success() {
        session.deleted.clear();
    } else {
        warn!(
            conference_id = %session.conference_id,
            failures = report.failures.len(),
            "Submit finished with failures"
        );
        for (kind, id) in report.deleted() {
            session.deleted.unmark(kind, id);
        }
    }

    if report.needs_refresh {
        let canonical: ConferenceDraft = RecordSet::fetch(port).await?.to_draft()?;
        state.phases.clone_from(&canonical.research_phases);
        session.rebase(canonical);
    }

    info!(
        conference_id = %session.conference_id,
        operations = report.operations.len(),
        failures = report.failures.len(),
        refreshed = report.needs_refresh,
        "Submitted conference edit"
    );
    Ok(report)
}
