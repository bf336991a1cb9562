//! Collision-safe tracking-number allocation for consular request tables.
//!
//! The public tracking number handed to an applicant must be unique across
//! all stored requests, yet submissions race without a central sequencer.
//! This crate packages the one correct way to do that (a constraint-backed
//! insert with bounded duplicate-key retry) behind injectable trait seams
//! for the store, the authenticator, the clock, and the RNG, plus the thin
//! lifecycle around it: status updates and receipt export.
//!
//! - [`Allocator`] proposes candidates (random 4-digit probe or monotonic
//!   next-value, per [`AllocatorConfig`]) and retries only on the store's
//!   duplicate-key signal.
//! - [`StatusUpdater`] transitions a request out of `in_progress`, guarded or
//!   overwriting per [`TransitionPolicy`].
//! - [`ReceiptWriter`] renders downloadable receipts; [`MemoryStore`] is an
//!   in-process fake backend for tests.

mod allocator;
mod auth;
mod config;
mod error;
mod memory;
mod rand;
mod random_native;
mod receipt;
mod request;
mod store;
mod time;
mod updater;

#[cfg(test)]
mod tests;

pub use crate::allocator::*;
pub use crate::auth::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::memory::*;
pub use crate::rand::*;
pub use crate::random_native::*;
pub use crate::receipt::*;
pub use crate::request::*;
pub use crate::store::*;
pub use crate::time::*;
pub use crate::updater::*;
