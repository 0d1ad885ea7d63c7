use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Account roles recognized by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

// Account record persisted in PostgreSQL.
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: u64,
}

// Available subscription plans with their billing period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Basic,
    Premium,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Premium => "premium",
        }
    }

    pub fn parse(value: &str) -> Option<Plan> {
        match value {
            "basic" => Some(Plan::Basic),
            "premium" => Some(Plan::Premium),
            _ => None,
        }
    }

    // Billing period granted by one successful payment.
    pub fn period_seconds(&self) -> u64 {
        const DAY: u64 = 24 * 60 * 60;
        match self {
            Plan::Basic => 30 * DAY,
            Plan::Premium => 365 * DAY,
        }
    }

    // Amount charged per period, recorded in the payment ledger.
    pub fn price_cents(&self) -> i64 {
        match self {
            Plan::Basic => 999,
            Plan::Premium => 9999,
        }
    }
}

// Subscription lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    PendingPayment,
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::PendingPayment => "pending_payment",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<SubscriptionStatus> {
        match value {
            "pending_payment" => Some(SubscriptionStatus::PendingPayment),
            "active" => Some(SubscriptionStatus::Active),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            _ => None,
        }
    }
}

// Subscription record persisted in PostgreSQL.
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub created_at: u64,
    pub current_period_end: u64,
}

// Payment ledger entry recorded when a pending subscription is executed.
#[derive(Clone, Debug)]
pub struct Payment {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub payer_id: String,
    pub amount_cents: i64,
    pub executed_at: u64,
}

// Login session record stored in memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub session_id: String,
    pub expires_at: u64,
}
