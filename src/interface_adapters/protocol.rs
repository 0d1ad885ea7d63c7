use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Plan, Role, Subscription, SubscriptionStatus, User};

// Request payload for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

// Request payload for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Response payload for login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
}

// Public account profile; never carries the password digest.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: u64,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// Subscription fields exposed over the API.
#[derive(Debug, Serialize)]
pub struct SubscriptionSummary {
    pub id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub current_period_end: u64,
}

impl From<Subscription> for SubscriptionSummary {
    fn from(subscription: Subscription) -> Self {
        SubscriptionSummary {
            id: subscription.id,
            plan: subscription.plan,
            status: subscription.status,
            current_period_end: subscription.current_period_end,
        }
    }
}

// Response payload for the user lookup endpoint.
#[derive(Debug, Serialize)]
pub struct UserLookupResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub subscription: Option<SubscriptionSummary>,
}

// Request payload for starting a subscription.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan: String,
}

// Response payload for starting a subscription.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub subscription_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
}

// Request payload for payment execution.
#[derive(Debug, Deserialize)]
pub struct ExecutePaymentRequest {
    pub subscription_id: Uuid,
    pub payer_id: String,
}

// Response payload for payment execution.
#[derive(Debug, Serialize)]
pub struct ExecutePaymentResponse {
    pub subscription_id: Uuid,
    pub status: SubscriptionStatus,
    pub current_period_end: u64,
}

// Request payload for a plan change.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan: String,
}

// Response payload for a plan change.
#[derive(Debug, Serialize)]
pub struct UpdateSubscriptionResponse {
    pub subscription_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub current_period_end: u64,
}

// Response payload for cancellation.
#[derive(Debug, Serialize)]
pub struct CancelSubscriptionResponse {
    pub cancelled: bool,
}

// Request payload for the admin upgrade.
#[derive(Debug, Deserialize)]
pub struct UpgradeAdminRequest {
    pub email: String,
}

// Response payload for the admin upgrade.
#[derive(Debug, Serialize)]
pub struct UpgradeAdminResponse {
    pub email: String,
    pub role: Role,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
