use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{
    Payment, Plan, Role, Session, Subscription, SubscriptionStatus, User,
};

// Insert failure modes for accounts. Email uniqueness is enforced by
// the store, so a duplicate hit at insert time has its own variant.
#[derive(Debug)]
pub enum UserInsertError {
    DuplicateEmail,
    Storage(String),
}

// Port for durable account storage used by account use cases.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<(), UserInsertError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, String>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String>;
    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool, String>;
}

// Port for durable subscription storage used by billing use cases.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert(&self, subscription: Subscription) -> Result<(), String>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, String>;
    // Most recent subscription for a user, regardless of status.
    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, String>;
    async fn update_status(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        current_period_end: u64,
    ) -> Result<bool, String>;
    async fn update_plan(
        &self,
        id: Uuid,
        plan: Plan,
        current_period_end: u64,
    ) -> Result<bool, String>;
    async fn record_payment(&self, payment: Payment) -> Result<(), String>;
}

// Port for session storage used by account use cases.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<Session>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
