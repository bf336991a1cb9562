use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::{
    auth::{AuthClient, AuthError, Session},
    request::{Request, Status, TrackingId},
    store::{RequestStore, StoreError},
};

#[derive(Default)]
struct Inner {
    rows: Mutex<BTreeMap<TrackingId, Request>>,
    accounts: Mutex<HashMap<String, String>>,
    sessions_issued: AtomicU64,
    offline: AtomicBool,
}

/// An in-process stand-in for the hosted table and auth service.
///
/// Rows live in a `BTreeMap` behind a mutex; `insert` enforces the same
/// uniqueness constraint a real backend declares on the identifier column,
/// which is what makes it a faithful harness for the allocator's collision
/// handling. Cloning is cheap and shares the underlying table, so concurrent
/// tasks can race against one instance.
///
/// `set_offline(true)` makes every call fail with an `Unreachable` error, for
/// exercising the non-collision failure paths.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account for [`AuthClient::sign_in`].
    pub fn register_account(&self, email: &str, password: &str) {
        self.inner
            .accounts
            .lock()
            .insert(email.to_owned(), password.to_owned());
    }

    /// Toggles simulated connectivity loss.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> usize {
        self.inner.rows.lock().len()
    }

    /// Pre-seeds a row, bypassing the allocator. Panics on a duplicate
    /// identifier; intended for test setup only.
    pub fn seed(&self, request: Request) {
        let mut rows = self.inner.rows.lock();
        let id = request.id;
        assert!(
            rows.insert(id, request).is_none(),
            "seed: tracking number {id} already present"
        );
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.inner.offline.load(Ordering::Relaxed) {
            Err(StoreError::Unreachable {
                context: "memory store marked offline".to_owned(),
            })
        } else {
            Ok(())
        }
    }
}

impl RequestStore for MemoryStore {
    async fn insert(&self, request: &Request) -> Result<(), StoreError> {
        self.check_online()?;
        let mut rows = self.inner.rows.lock();
        if rows.contains_key(&request.id) {
            return Err(StoreError::DuplicateId(request.id));
        }
        rows.insert(request.id, request.clone());
        Ok(())
    }

    async fn find(&self, id: TrackingId) -> Result<Option<Request>, StoreError> {
        self.check_online()?;
        Ok(self.inner.rows.lock().get(&id).cloned())
    }

    async fn find_max_id(&self) -> Result<Option<TrackingId>, StoreError> {
        self.check_online()?;
        Ok(self.inner.rows.lock().keys().next_back().copied())
    }

    async fn update(
        &self,
        id: TrackingId,
        status: Status,
        notes: Option<String>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut rows = self.inner.rows.lock();
        let row = rows.get_mut(&id).ok_or(StoreError::MissingRow(id))?;
        row.status = status;
        row.notes = notes;
        Ok(())
    }
}

impl AuthClient for MemoryStore {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if self.inner.offline.load(Ordering::Relaxed) {
            return Err(AuthError::Unreachable {
                context: "memory store marked offline".to_owned(),
            });
        }
        let accounts = self.inner.accounts.lock();
        match accounts.get(email) {
            Some(stored) if stored == password => {
                let serial = self.inner.sessions_issued.fetch_add(1, Ordering::Relaxed);
                Ok(Session {
                    email: email.to_owned(),
                    token: format!("session-{serial}"),
                })
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
