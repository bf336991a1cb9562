use crate::{
    request::{Status, TrackingId},
    store::StoreError,
};

pub type Result<T> = core::result::Result<T, Error>;

/// All failures the allocator and updater can surface.
///
/// Validation variants (`EmptyName`, `MalformedId`, `UnknownStatus`) are
/// produced before any remote call is made. Everything else maps a remote
/// outcome: a spent retry budget, a missing row, a refused transition, or a
/// store failure passed through verbatim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The display name was empty or whitespace-only.
    #[error("display name must not be empty")]
    EmptyName,

    /// The identifier input could not be parsed as a tracking number.
    #[error("malformed identifier: {input:?}")]
    MalformedId { input: String },

    /// The status input is not one of the canonical status labels.
    #[error("unknown status: {input:?}")]
    UnknownStatus { input: String },

    /// The allocator configuration is unusable (e.g. empty identifier range).
    #[error("invalid allocator configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The allocator ran out of attempts without finding a free identifier.
    ///
    /// No request was created. The caller may retry the whole submission.
    #[error("no free tracking number after {attempts} attempts")]
    CollisionExhausted { attempts: u32 },

    /// No request exists under the given identifier.
    #[error("no request found for tracking number {0}")]
    NotFound(TrackingId),

    /// The request has already left `in_progress` and the updater is running
    /// under the guarded transition policy.
    #[error("tracking number {id} already has status '{current}' and cannot be changed")]
    IllegalTransition { id: TrackingId, current: Status },

    /// Any other store failure (network, auth expiry, rejected payload).
    /// Never swallowed; reported to the caller synchronously.
    #[error(transparent)]
    Store(#[from] StoreError),
}
