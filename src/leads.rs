//! Lead list state of one dashboard window.
//!
//! The board is a cache of what the server returned last. It is refreshed
//! wholesale, patched optimistically on status changes, and pruned on
//! confirmed deletes. When a mutation fails, the board asks for a full
//! re-fetch instead of rolling back locally.

use crate::api::error::ApiError;
use crate::api::models::{Lead, LeadStatus};
use crate::filter::{Stats, ViewFilter};
use crate::session::Session;
use log::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Ready,
}

/// What the window has to do after a fetch result was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    /// The token was rejected and has been cleared; show the login window.
    SignedOut,
}

/// A status change already applied to the board, waiting to be sent as
/// `PATCH /messages/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub id: i64,
    pub status: LeadStatus,
    pub previous: LeadStatus,
}

/// A delete the admin confirmed, waiting to be sent as
/// `DELETE /messages/{id}`. Only [`LeadBoard::confirm_delete`] makes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: i64,
}

impl ConfirmedDelete {
    pub fn id(self) -> i64 {
        self.id
    }
}

/// What the window has to do after a mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    /// Re-fetch the whole list to discard optimistic edits and drift.
    Resync,
    SignOut,
}

#[derive(Debug)]
pub struct LeadBoard {
    leads: Vec<Lead>,
    phase: Phase,
    notice: Option<String>,
}

impl Default for LeadBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadBoard {
    /// A fresh board starts out loading; nothing from a previous session
    /// is carried over.
    pub fn new() -> Self {
        Self {
            leads: Vec::new(),
            phase: Phase::Loading,
            notice: None,
        }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn get(&self, id: i64) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Last load problem, if the list on screen is empty because of it.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn begin_load(&mut self) {
        self.phase = Phase::Loading;
    }

    /// Takes in the result of `GET /messages/`.
    pub fn absorb(&mut self, fetched: Result<Vec<Lead>, ApiError>, session: &Session) -> LoadOutcome {
        self.phase = Phase::Ready;
        match fetched {
            Ok(leads) => {
                info!("loaded {} leads", leads.len());
                self.leads = leads;
                self.notice = None;
                LoadOutcome::Ready
            }
            Err(ApiError::Unauthorized) => {
                warn!("lead list refused: session expired");
                session.clear_token();
                self.leads.clear();
                LoadOutcome::SignedOut
            }
            Err(e) => {
                error!("failed to load leads: {e}");
                self.leads.clear();
                self.notice = Some(format!("Could not load leads: {e}"));
                LoadOutcome::Ready
            }
        }
    }

    /// Optimistic status change. Returns the previous status, or `None` if
    /// the id is not on the board.
    pub fn set_status(&mut self, id: i64, status: LeadStatus) -> Option<LeadStatus> {
        let lead = self.leads.iter_mut().find(|l| l.id == id)?;
        Some(std::mem::replace(&mut lead.status, status))
    }

    /// First half of a status change: the board shows the new status right
    /// away. `None` when there is nothing to send (unknown id or same status).
    pub fn begin_status_change(&mut self, id: i64, status: LeadStatus) -> Option<StatusChange> {
        let previous = self.set_status(id, status)?;
        if previous == status {
            return None;
        }
        Some(StatusChange { id, status, previous })
    }

    /// Second half of a status change, with the server's answer.
    pub fn finish_status_change(
        &mut self,
        change: StatusChange,
        result: Result<(), ApiError>,
        session: &Session,
    ) -> Option<Followup> {
        match result {
            Ok(()) => {
                info!("lead {} is now {}", change.id, change.status);
                None
            }
            Err(e) => Some(self.mutation_failed(&e, session)),
        }
    }

    /// Turns the answer of the confirmation dialog into a delete to send.
    /// Nothing is sent unless the admin accepted.
    pub fn confirm_delete(&self, id: i64, accepted: bool) -> Option<ConfirmedDelete> {
        if !accepted {
            info!("delete of lead {id} cancelled");
            return None;
        }
        self.get(id).map(|_| ConfirmedDelete { id })
    }

    /// Applies the server's answer to a confirmed delete.
    pub fn finish_delete(
        &mut self,
        delete: ConfirmedDelete,
        result: Result<(), ApiError>,
        session: &Session,
    ) -> Option<Followup> {
        match result {
            Ok(()) => {
                info!("lead {} deleted", delete.id);
                self.remove(delete.id);
                None
            }
            Err(e) => {
                warn!("delete of lead {} failed: {e}", delete.id);
                Some(self.mutation_failed(&e, session))
            }
        }
    }

    /// Drops a lead after the server confirmed the delete.
    pub fn remove(&mut self, id: i64) -> Option<Lead> {
        let pos = self.leads.iter().position(|l| l.id == id)?;
        Some(self.leads.remove(pos))
    }

    /// Reconciliation policy for failed status changes and deletes alike.
    pub fn mutation_failed(&mut self, err: &ApiError, session: &Session) -> Followup {
        if err.is_unauthorized() {
            warn!("mutation refused: session expired");
            session.clear_token();
            return Followup::SignOut;
        }
        error!("mutation failed, resyncing: {err}");
        self.begin_load();
        Followup::Resync
    }

    pub fn stats(&self) -> Stats {
        Stats::of(&self.leads)
    }

    pub fn visible(&self, filter: &ViewFilter) -> Vec<&Lead> {
        filter.apply(&self.leads)
    }
}
