use tracing::{debug, warn};

use crate::{
    config::TransitionPolicy,
    error::{Error, Result},
    request::{Request, Status, TrackingId},
    store::RequestStore,
};

/// Moves a stored request to a new status.
///
/// Callers validate untrusted input first ([`TrackingId::parse`],
/// [`Status::parse`]); the updater only ever sees typed values. Under the
/// default [`TransitionPolicy::Guarded`] a request that has already left
/// `in_progress` cannot be changed again; [`TransitionPolicy::Overwrite`]
/// allows repeated transitions, last writer wins.
///
/// Read-modify-write races between concurrent updaters are accepted as
/// last-writer-wins: this is low-volume, human-supervised data.
pub struct StatusUpdater<S> {
    store: S,
    policy: TransitionPolicy,
}

impl<S> StatusUpdater<S>
where
    S: RequestStore,
{
    pub fn new(store: S, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Transitions the request under `id` to `status`, replacing its notes.
    ///
    /// Returns the request as written.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when no request exists under `id`; nothing is
    ///   written.
    /// - [`Error::IllegalTransition`] under the guarded policy when the
    ///   current status is no longer `in_progress`; nothing is written.
    /// - [`Error::Store`] for any store failure, surfaced verbatim.
    pub async fn update(
        &self,
        id: TrackingId,
        status: Status,
        notes: Option<String>,
    ) -> Result<Request> {
        let Some(existing) = self.store.find(id).await? else {
            return Err(Error::NotFound(id));
        };

        if self.policy == TransitionPolicy::Guarded && existing.status != Status::InProgress {
            warn!(
                %id,
                current = %existing.status,
                requested = %status,
                "refusing transition on settled request"
            );
            return Err(Error::IllegalTransition {
                id,
                current: existing.status,
            });
        }

        self.store.update(id, status, notes.clone()).await?;
        debug!(%id, from = %existing.status, to = %status, "status updated");

        Ok(Request {
            status,
            notes,
            ..existing
        })
    }
}
