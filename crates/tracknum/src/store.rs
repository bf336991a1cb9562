use crate::{Request, TrackingId, request::Status};

/// Failures reported by a [`RequestStore`] backend.
///
/// Only [`StoreError::DuplicateId`] is retryable: the allocator treats it as a
/// lost race for a candidate identifier and draws a new one. Every other
/// variant aborts the operation and surfaces to the caller verbatim.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The insert hit the uniqueness constraint on the identifier column.
    #[error("tracking number {0} is already taken")]
    DuplicateId(TrackingId),

    /// An update targeted a row that does not exist.
    #[error("no stored row for tracking number {0}")]
    MissingRow(TrackingId),

    /// The store refused the operation (schema validation, permissions).
    #[error("store rejected the operation: {context}")]
    Rejected { context: String },

    /// The store could not be reached (timeout, connectivity, expired auth).
    #[error("store unreachable: {context}")]
    Unreachable { context: String },
}

/// The remote request table, reduced to the four calls this system makes.
///
/// Implementations wrap a hosted table service; [`MemoryStore`] provides an
/// in-process fake for tests. The one contract the allocator depends on:
/// `insert` must be atomic per row and must report a taken identifier as
/// [`StoreError::DuplicateId`] — an existence probe that came back absent is
/// never proof that the insert will succeed.
///
/// All calls are independent network round trips and may fail independently
/// of application logic.
///
/// [`MemoryStore`]: crate::MemoryStore
pub trait RequestStore {
    /// Inserts a new row, enforcing identifier uniqueness.
    fn insert(&self, request: &Request) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetches the row for `id`, or `None` if absent.
    fn find(
        &self,
        id: TrackingId,
    ) -> impl Future<Output = Result<Option<Request>, StoreError>> + Send;

    /// Returns the largest identifier currently stored, or `None` on an empty
    /// table. Used by the monotonic allocation strategy.
    fn find_max_id(&self) -> impl Future<Output = Result<Option<TrackingId>, StoreError>> + Send;

    /// Overwrites status and notes on an existing row.
    fn update(
        &self,
        id: TrackingId,
        status: Status,
        notes: Option<String>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
