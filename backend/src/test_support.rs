//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Nothing here is compiled into release
//! binaries.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CallRepository, CallRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Call, CallId, CallStatus, NewCall, NewUser, User, UserId, Username};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// In-memory credential store with a unique username index.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserRepositoryError> {
        let mut users = lock(&self.users);
        let key = user.username.as_ref().to_owned();
        if users.contains_key(&key) {
            return Err(UserRepositoryError::duplicate_username(key));
        }
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = UserId::new(raw).map_err(|err| UserRepositoryError::query(err.to_string()))?;
        users.insert(
            key,
            User::new(id, user.username.clone(), user.password_hash.clone()),
        );
        Ok(id)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(lock(&self.users).get(username.as_ref()).cloned())
    }
}

/// In-memory call store that mirrors the owner-scoped SQL statements.
#[derive(Default)]
pub struct InMemoryCallRepository {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicI64,
    writes: AtomicUsize,
}

impl InMemoryCallRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of insert/update/delete calls that reached the store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallRepository for InMemoryCallRepository {
    async fn insert(&self, call: &NewCall) -> Result<CallId, CallRepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = CallId::new(raw).map_err(|err| CallRepositoryError::query(err.to_string()))?;
        lock(&self.calls).push(Call {
            id,
            owner: call.owner(),
            client_name: call.client_name().to_owned(),
            phone_number: call.phone_number().clone(),
            description: call.description().to_owned(),
            status: call.status(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Call>, CallRepositoryError> {
        let mut owned: Vec<Call> = lock(&self.calls)
            .iter()
            .filter(|call| call.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn find_by_id_and_owner(
        &self,
        id: CallId,
        owner: UserId,
    ) -> Result<Option<Call>, CallRepositoryError> {
        Ok(lock(&self.calls)
            .iter()
            .find(|call| call.id == id && call.owner == owner)
            .cloned())
    }

    async fn update_status(
        &self,
        id: CallId,
        owner: UserId,
        status: CallStatus,
    ) -> Result<u64, CallRepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut calls = lock(&self.calls);
        let mut affected = 0;
        for call in calls
            .iter_mut()
            .filter(|call| call.id == id && call.owner == owner)
        {
            call.status = status;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, id: CallId, owner: UserId) -> Result<u64, CallRepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut calls = lock(&self.calls);
        let before = calls.len();
        calls.retain(|call| !(call.id == id && call.owner == owner));
        Ok(u64::try_from(before - calls.len()).unwrap_or(u64::MAX))
    }
}
