use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{
    Payment, Plan, Role, Session, Subscription, SubscriptionStatus, User,
};
use crate::domain::password::hash_password;
use crate::domain::ports::{Clock, SessionStore, SubscriptionStore, UserInsertError, UserStore};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct SessionFailures {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingSessions {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    failures: SessionFailures,
}

impl RecordingSessions {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: SessionFailures::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: SessionFailures) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, session: Session) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token.into(), session);
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<Session> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for RecordingSessions {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }
}

// Builds a valid session for tests that only need an authenticated caller.
pub(crate) fn test_session(user_id: Uuid, role: Role, expires_at: u64) -> Session {
    Session {
        user_id,
        role,
        session_id: "test-session".to_string(),
        expires_at,
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct UserFailures {
    pub insert: bool,
    pub find: bool,
    pub set_role: bool,
    // Lookups return no rows even for stored users, so a stored email
    // only surfaces as a unique hit at insert time.
    pub stale_find: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingUsers {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    failures: UserFailures,
}

impl RecordingUsers {
    pub(crate) fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            failures: UserFailures::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: UserFailures) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_user(&self, user: User) {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        guard.insert(user.id, user);
    }

    pub(crate) fn get_test_user(&self, id: Uuid) -> Option<User> {
        let guard = self.users.lock().expect("users mutex poisoned");
        guard.get(&id).cloned()
    }

    pub(crate) fn user_count(&self) -> usize {
        let guard = self.users.lock().expect("users mutex poisoned");
        guard.len()
    }
}

// Builds a stored user with a real password digest for login tests.
pub(crate) fn test_user(email: &str, password: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        display_name: "Test User".to_string(),
        password_hash: hash_password(password),
        role,
        created_at: 1_700_000_000,
    }
}

#[async_trait]
impl UserStore for RecordingUsers {
    async fn insert(&self, user: User) -> Result<(), UserInsertError> {
        if self.failures.insert {
            return Err(UserInsertError::Storage("insert failed".to_string()));
        }

        let mut guard = self.users.lock().expect("users mutex poisoned");
        // Mirrors the UNIQUE(email) constraint on the users table.
        if guard
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id)
        {
            return Err(UserInsertError::DuplicateEmail);
        }
        guard.insert(user.id, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, String> {
        if self.failures.find {
            return Err("find failed".to_string());
        }
        if self.failures.stale_find {
            return Ok(None);
        }

        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        if self.failures.find {
            return Err("find failed".to_string());
        }
        if self.failures.stale_find {
            return Ok(None);
        }

        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool, String> {
        if self.failures.set_role {
            return Err("set_role failed".to_string());
        }

        let mut guard = self.users.lock().expect("users mutex poisoned");
        match guard.get_mut(&id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct SubscriptionFailures {
    pub insert: bool,
    pub find: bool,
    pub update: bool,
    pub record_payment: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingSubscriptions {
    subscriptions: Arc<Mutex<HashMap<Uuid, Subscription>>>,
    payments: Arc<Mutex<Vec<Payment>>>,
    failures: SubscriptionFailures,
}

impl RecordingSubscriptions {
    pub(crate) fn new() -> Self {
        Self {
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
            payments: Arc::new(Mutex::new(Vec::new())),
            failures: SubscriptionFailures::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: SubscriptionFailures) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_subscription(&self, subscription: Subscription) {
        let mut guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        guard.insert(subscription.id, subscription);
    }

    pub(crate) fn get_test_subscription(&self, id: Uuid) -> Option<Subscription> {
        let guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        guard.get(&id).cloned()
    }

    pub(crate) fn recorded_payments(&self) -> Vec<Payment> {
        let guard = self.payments.lock().expect("payments mutex poisoned");
        guard.clone()
    }
}

// Builds a subscription row in a given state for billing tests.
pub(crate) fn test_subscription(
    user_id: Uuid,
    plan: Plan,
    status: SubscriptionStatus,
    created_at: u64,
) -> Subscription {
    Subscription {
        id: Uuid::new_v4(),
        user_id,
        plan,
        status,
        created_at,
        current_period_end: 0,
    }
}

#[async_trait]
impl SubscriptionStore for RecordingSubscriptions {
    async fn insert(&self, subscription: Subscription) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        guard.insert(subscription.id, subscription);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, String> {
        if self.failures.find {
            return Err("find failed".to_string());
        }

        let guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, String> {
        if self.failures.find {
            return Err("find failed".to_string());
        }

        let guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        Ok(guard
            .values()
            .filter(|subscription| subscription.user_id == user_id)
            .max_by_key(|subscription| subscription.created_at)
            .cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        current_period_end: u64,
    ) -> Result<bool, String> {
        if self.failures.update {
            return Err("update failed".to_string());
        }

        let mut guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        match guard.get_mut(&id) {
            Some(subscription) => {
                subscription.status = status;
                subscription.current_period_end = current_period_end;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_plan(
        &self,
        id: Uuid,
        plan: Plan,
        current_period_end: u64,
    ) -> Result<bool, String> {
        if self.failures.update {
            return Err("update failed".to_string());
        }

        let mut guard = self
            .subscriptions
            .lock()
            .expect("subscriptions mutex poisoned");
        match guard.get_mut(&id) {
            Some(subscription) => {
                subscription.plan = plan;
                subscription.current_period_end = current_period_end;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_payment(&self, payment: Payment) -> Result<(), String> {
        if self.failures.record_payment {
            return Err("record_payment failed".to_string());
        }

        let mut guard = self.payments.lock().expect("payments mutex poisoned");
        guard.push(payment);
        Ok(())
    }
}
