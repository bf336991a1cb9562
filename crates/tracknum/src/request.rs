use core::{fmt, str::FromStr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A publicly displayed tracking number.
///
/// Uniqueness across all stored requests is the one invariant of the system,
/// enforced by the store's uniqueness constraint and the allocator's retry
/// loop. The value is immutable once assigned.
///
/// # Example
///
/// ```
/// use tracknum::TrackingId;
///
/// let id = TrackingId::parse("4821").unwrap();
/// assert_eq!(id.value(), 4821);
/// assert!(TrackingId::parse("42nd").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(u32);

impl TrackingId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// The identifier immediately after this one, used by the monotonic
    /// allocation strategy.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Parses untrusted identifier input (e.g. from a lookup form).
    ///
    /// Non-numeric input is rejected with [`Error::MalformedId`] before any
    /// remote call is attempted.
    pub fn parse(input: &str) -> Result<Self, Error> {
        input
            .trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| Error::MalformedId {
                input: input.to_owned(),
            })
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TrackingId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Lifecycle status of a request.
///
/// The label set is the canonical union across deployments; every request
/// starts as [`Status::InProgress`] and is moved exactly once under the
/// guarded transition policy (see [`TransitionPolicy`]).
///
/// [`TransitionPolicy`]: crate::TransitionPolicy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Dismissed,
    Approved,
    ExtraDocsRequired,
    TransactionArrived,
    NotArrived,
    DocumentsRequired,
}

impl Status {
    /// Every canonical label, in declaration order.
    pub const ALL: [Status; 7] = [
        Status::InProgress,
        Status::Dismissed,
        Status::Approved,
        Status::ExtraDocsRequired,
        Status::TransactionArrived,
        Status::NotArrived,
        Status::DocumentsRequired,
    ];

    /// The snake_case label used for display, serialization, and parsing.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::InProgress => "in_progress",
            Status::Dismissed => "dismissed",
            Status::Approved => "approved",
            Status::ExtraDocsRequired => "extra_docs_required",
            Status::TransactionArrived => "transaction_arrived",
            Status::NotArrived => "not_arrived",
            Status::DocumentsRequired => "documents_required",
        }
    }

    /// Parses untrusted status input against the canonical label set.
    ///
    /// This replaces interactive status prompts: callers validate the target
    /// status up front and pass the typed value to the updater.
    ///
    /// # Example
    ///
    /// ```
    /// use tracknum::Status;
    ///
    /// assert_eq!(Status::parse("approved").unwrap(), Status::Approved);
    /// assert!(Status::parse("maybe later").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, Error> {
        let label = input.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == label)
            .ok_or_else(|| Error::UnknownStatus {
                input: input.to_owned(),
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A stored birth-certificate request.
///
/// Created only by the allocator (always with status `in_progress`), mutated
/// only by the updater, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: TrackingId,
    pub display_name: String,
    pub status: Status,
    pub notes: Option<String>,
    /// Milliseconds since the Unix epoch, taken from the allocator's time
    /// source at creation.
    pub created_at_ms: u64,
}

impl Request {
    /// Creation time as a [`SystemTime`], for rendering.
    pub fn created_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.created_at_ms)
    }
}
