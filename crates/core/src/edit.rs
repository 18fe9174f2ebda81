// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The conference edit session.
//!
//! An edit session carries everything a form submission needs: the draft
//! being edited, the ids the user removed, and the canonical records the
//! draft started from. It is passed explicitly to every step of the submit
//! flow; there is no shared session store.

use conftrack_domain::{
    DeletedIds, DomainError, Material, Media, Policy, RankingFile, RankingReference,
    ResearchPhase, Session, Sponsor, Ticket, Tracked, validate_phase_sequence,
};
use serde::{Deserialize, Serialize};

/// Whether the session creates a new conference or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    Create,
    Edit,
}

/// Every editable collection of a conference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConferenceDraft {
    #[serde(default)]
    pub research_phases: Vec<ResearchPhase>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub ranking_files: Vec<RankingFile>,
    #[serde(default)]
    pub ranking_references: Vec<RankingReference>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub sponsors: Vec<Sponsor>,
}

impl ConferenceDraft {
    /// Drops every entity whose id is marked deleted, at any depth.
    pub fn retain_undeleted(&mut self, deleted: &DeletedIds) {
        retain(&mut self.research_phases, deleted);
        for phase in &mut self.research_phases {
            retain(&mut phase.revision_rounds, deleted);
        }
        retain(&mut self.tickets, deleted);
        for ticket in &mut self.tickets {
            retain(&mut ticket.phases, deleted);
            for price_phase in &mut ticket.phases {
                retain(&mut price_phase.refund_policies, deleted);
            }
        }
        retain(&mut self.sessions, deleted);
        retain(&mut self.policies, deleted);
        retain(&mut self.materials, deleted);
        retain(&mut self.ranking_files, deleted);
        retain(&mut self.ranking_references, deleted);
        retain(&mut self.media, deleted);
        retain(&mut self.sponsors, deleted);
    }
}

fn retain<T: Tracked>(items: &mut Vec<T>, deleted: &DeletedIds) {
    items.retain(|item| {
        item.identity()
            .id()
            .is_none_or(|id| !deleted.contains(T::KIND, id))
    });
}

/// An in-progress create or edit of one conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    pub conference_id: String,
    pub mode: EditMode,
    /// The collections as the user has edited them.
    pub draft: ConferenceDraft,
    /// Persisted ids the user removed since the last successful submit.
    #[serde(default)]
    pub deleted: DeletedIds,
    /// The canonical records the draft was loaded from.
    #[serde(default)]
    pub baseline: ConferenceDraft,
}

impl EditSession {
    /// Starts a session for a conference that has no stored records yet.
    #[must_use]
    pub fn create(conference_id: &str) -> Self {
        Self {
            conference_id: conference_id.to_string(),
            mode: EditMode::Create,
            draft: ConferenceDraft::default(),
            deleted: DeletedIds::new(),
            baseline: ConferenceDraft::default(),
        }
    }

    /// Starts a session editing the given canonical records.
    #[must_use]
    pub fn edit(conference_id: &str, canonical: ConferenceDraft) -> Self {
        Self {
            conference_id: conference_id.to_string(),
            mode: EditMode::Edit,
            draft: canonical.clone(),
            deleted: DeletedIds::new(),
            baseline: canonical,
        }
    }

    /// Removes an entity from one of the draft's lists.
    ///
    /// The entity and every persisted entity nested in it are recorded as
    /// deleted. Returns `None` if `index` is out of range.
    ///
    /// # Arguments
    ///
    /// * `select` - Picks the list to remove from (top level or nested)
    /// * `index` - Position of the entity in that list
    pub fn remove<T, F>(&mut self, select: F, index: usize) -> Option<T>
    where
        T: Tracked,
        F: FnOnce(&mut ConferenceDraft) -> &mut Vec<T>,
    {
        let items: &mut Vec<T> = select(&mut self.draft);
        if index >= items.len() {
            return None;
        }
        let removed: T = items.remove(index);
        self.deleted.mark_removed(&removed);
        Some(removed)
    }

    /// Returns true if the draft or the deletions differ from the baseline.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline || !self.deleted.is_empty()
    }

    /// Validates the draft's research phases in edition order.
    ///
    /// # Errors
    ///
    /// Returns the first violated timeline rule.
    pub fn validate_draft(&self) -> Result<(), DomainError> {
        validate_phase_sequence(&self.draft.research_phases)
    }

    /// Replaces baseline and draft with freshly fetched canonical records.
    ///
    /// Entities still marked deleted (their deletion failed) stay hidden
    /// from the draft so the next submit retries them.
    pub fn rebase(&mut self, canonical: ConferenceDraft) {
        let mut draft: ConferenceDraft = canonical.clone();
        draft.retain_undeleted(&self.deleted);
        self.baseline = canonical;
        self.draft = draft;
        self.mode = EditMode::Edit;
    }
}
