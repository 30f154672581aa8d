//! In-memory user store for tests
//!
//! Rows live in a vector and ids follow insertion order. Besides serving
//! the repository trait it records how callers drive it (listing calls,
//! insert batch sizes, id pages, concurrent password updates) and can be
//! switched into failing like a database that went away. Listings can also
//! be held back after reading their rows, like a slow query.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{DomainError, NewUser, RepoResult, User, UserId, UserRepository, UserSummary};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<(User, String)>>,
    list_calls: AtomicUsize,
    batches: Mutex<Vec<usize>>,
    id_pages: Mutex<Vec<(i64, i64)>>,
    updates_in_flight: AtomicUsize,
    peak_updates: AtomicUsize,
    failing: AtomicBool,
    failing_updates: AtomicBool,
    listing_gate: Mutex<Option<Arc<Notify>>>,
}

impl InMemoryUserRepository {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call fail as if the database were down
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make only `update_password` fail
    pub fn fail_updates(&self) {
        self.failing_updates.store(true, Ordering::SeqCst);
    }

    /// Hold every later `list_summaries` call after it has read its rows
    /// until the returned handle is notified once per call
    pub fn hold_listings(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.listing_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    /// Number of `list_summaries` calls, failed ones included
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Sizes of the slices passed to `insert_many`, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().clone()
    }

    /// `(offset, limit)` of every `list_ids` call
    pub fn id_pages(&self) -> Vec<(i64, i64)> {
        self.id_pages.lock().clone()
    }

    /// Highest number of password updates seen running at once
    pub fn peak_concurrent_updates(&self) -> usize {
        self.peak_updates.load(Ordering::SeqCst)
    }

    pub fn hashes(&self) -> Vec<String> {
        self.rows.lock().iter().map(|(_, hash)| hash.clone()).collect()
    }

    pub fn hash_by_id(&self, id: UserId) -> Option<String> {
        self.rows
            .lock()
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, hash)| hash.clone())
    }

    pub fn hash_by_email(&self, email: &str) -> Option<String> {
        self.rows
            .lock()
            .iter()
            .find(|(user, _)| user.email == email)
            .map(|(_, hash)| hash.clone())
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("connection refused".into()))
        } else {
            Ok(())
        }
    }

    /// Insert unless the email is taken
    fn insert(rows: &mut Vec<(User, String)>, new: &NewUser, hash: &str) -> Option<User> {
        if rows.iter().any(|(user, _)| user.email == new.email) {
            return None;
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(rows.len() as i64 + 1),
            email: new.email.clone(),
            name: new.name.clone(),
            phone: new.phone.clone(),
            avatar: new.avatar.clone(),
            address: new.address.clone(),
            bio: new.bio.clone(),
            role: new.role,
            status: new.status,
            is_email_verified: new.is_email_verified,
            birthdate: new.birthdate,
            last_login: new.last_login,
            created_at: new.created_at.unwrap_or(now),
            updated_at: now,
        };
        rows.push((user.clone(), hash.to_string()));
        Some(user)
    }

    fn page<T>(&self, offset: i64, limit: i64, f: impl Fn(&User) -> T) -> Vec<T> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        self.rows
            .lock()
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(user, _)| f(user))
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn list_summaries(&self, offset: i64, limit: i64) -> RepoResult<Vec<UserSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let rows = self.page(offset, limit, User::summary);

        let gate = self.listing_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(rows)
    }

    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        self.check()?;
        Self::insert(&mut self.rows.lock(), user, password_hash)
            .ok_or(DomainError::EmailAlreadyExists)
    }

    async fn insert_many(&self, users: &[NewUser], password_hash: &str) -> RepoResult<u64> {
        self.check()?;
        self.batches.lock().push(users.len());
        let mut rows = self.rows.lock();
        Ok(users
            .iter()
            .filter_map(|user| Self::insert(&mut rows, user, password_hash))
            .count() as u64)
    }

    async fn count(&self) -> RepoResult<i64> {
        self.check()?;
        Ok(self.rows.lock().len() as i64)
    }

    async fn list_ids(&self, offset: i64, limit: i64) -> RepoResult<Vec<UserId>> {
        self.check()?;
        self.id_pages.lock().push((offset, limit));
        Ok(self.page(offset, limit, |user| user.id))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        self.check()?;

        let running = self.updates_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_updates.fetch_max(running, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.updates_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_updates.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection reset".into()));
        }

        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        row.1 = password_hash.to_string();
        Ok(())
    }

    async fn health_check(&self) -> RepoResult<()> {
        self.check()
    }
}
