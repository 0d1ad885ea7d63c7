use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{
    Payment, Plan, Role, Session, Subscription, SubscriptionStatus, User,
};
use crate::domain::ports::{Clock, SessionStore, SubscriptionStore, UserInsertError, UserStore};

// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    // Shared database pool for account and subscription persistence.
    pub db: PgPool,
}

// In-memory session store adapter.
#[derive(Clone)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }
}

// PostgreSQL-backed account store.
#[derive(Clone)]
pub struct PostgresUserStore {
    pub db: PgPool,
}

fn map_user_row(row: PgRow) -> Result<User, String> {
    let role: String = row.try_get("role").map_err(|e| e.to_string())?;
    let role = Role::parse(&role).ok_or_else(|| format!("unknown role in users table: {role}"))?;
    let created_at: i64 = row.try_get("created_at").map_err(|e| e.to_string())?;

    Ok(User {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        email: row.try_get("email").map_err(|e| e.to_string())?,
        display_name: row.try_get("display_name").map_err(|e| e.to_string())?,
        password_hash: row.try_get("password_hash").map_err(|e| e.to_string())?,
        role,
        created_at: created_at as u64,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: User) -> Result<(), UserInsertError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at as i64)
        .execute(&self.db)
        .await
        .map_err(|e| {
            // A concurrent registration can win the UNIQUE(email) race.
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                UserInsertError::DuplicateEmail
            } else {
                UserInsertError::Storage(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, String> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        row.map(map_user_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        row.map(map_user_row).transpose()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool, String> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() > 0)
    }
}

// PostgreSQL-backed subscription and payment store.
#[derive(Clone)]
pub struct PostgresSubscriptionStore {
    pub db: PgPool,
}

fn map_subscription_row(row: PgRow) -> Result<Subscription, String> {
    let plan: String = row.try_get("plan").map_err(|e| e.to_string())?;
    let plan =
        Plan::parse(&plan).ok_or_else(|| format!("unknown plan in subscriptions table: {plan}"))?;
    let status: String = row.try_get("status").map_err(|e| e.to_string())?;
    let status = SubscriptionStatus::parse(&status)
        .ok_or_else(|| format!("unknown status in subscriptions table: {status}"))?;
    let created_at: i64 = row.try_get("created_at").map_err(|e| e.to_string())?;
    let current_period_end: i64 = row.try_get("current_period_end").map_err(|e| e.to_string())?;

    Ok(Subscription {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        user_id: row.try_get("user_id").map_err(|e| e.to_string())?,
        plan,
        status,
        created_at: created_at as u64,
        current_period_end: current_period_end as u64,
    })
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn insert(&self, subscription: Subscription) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, user_id, plan, status, created_at, current_period_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(subscription.plan.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.created_at as i64)
        .bind(subscription.current_period_end as i64)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, String> {
        let row = sqlx::query("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        row.map(map_subscription_row).transpose()
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, String> {
        let row = sqlx::query(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        row.map(map_subscription_row).transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        current_period_end: u64,
    ) -> Result<bool, String> {
        let result = sqlx::query(
            "UPDATE subscriptions SET status = $2, current_period_end = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(current_period_end as i64)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_plan(
        &self,
        id: Uuid,
        plan: Plan,
        current_period_end: u64,
    ) -> Result<bool, String> {
        let result = sqlx::query(
            "UPDATE subscriptions SET plan = $2, current_period_end = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(plan.as_str())
        .bind(current_period_end as i64)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_payment(&self, payment: Payment) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, subscription_id, payer_id, amount_cents, executed_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(payment.id)
        .bind(payment.subscription_id)
        .bind(&payment.payer_id)
        .bind(payment.amount_cents)
        .bind(payment.executed_at as i64)
        .execute(&self.db)
        .await
        .map_err(|e| e.to_string())?;

        Ok(())
    }
}

// System clock adapter used by the use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
