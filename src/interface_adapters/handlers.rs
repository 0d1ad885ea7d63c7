use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::{extract::State, http::StatusCode, Json};

use crate::domain::entities::Session;
use crate::domain::errors::{AccountError, BillingError};
use crate::interface_adapters::protocol::{
    CancelSubscriptionResponse, ErrorResponse, ExecutePaymentRequest, ExecutePaymentResponse,
    LoginRequest, LoginResponse, RegisterRequest, SubscribeRequest, SubscribeResponse,
    UpdateSubscriptionRequest, UpdateSubscriptionResponse, UpgradeAdminRequest,
    UpgradeAdminResponse, UserLookupResponse, UserProfile,
};
use crate::interface_adapters::state::{
    AppState, InMemorySessionStore, PostgresSubscriptionStore, PostgresUserStore, SystemClock,
};
use crate::use_cases::authenticate::AuthenticateUseCase;
use crate::use_cases::cancel_subscription::CancelSubscriptionUseCase;
use crate::use_cases::execute_payment::ExecutePaymentUseCase;
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::lookup_user::LookupUserUseCase;
use crate::use_cases::register::RegisterUseCase;
use crate::use_cases::subscribe::SubscribeUseCase;
use crate::use_cases::update_subscription::UpdateSubscriptionUseCase;
use crate::use_cases::upgrade_admin::UpgradeAdminUseCase;

// Basic session lifetime for login tokens (in seconds).
const SESSION_TTL_SECONDS: u64 = 60 * 60;

type ApiError = (StatusCode, Json<ErrorResponse>);

// Handler for account registration.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let use_case = RegisterUseCase {
        clock: SystemClock,
        users: PostgresUserStore {
            db: state.db.clone(),
        },
    };

    let user = use_case.execute(payload).await.map_err(map_account_error)?;

    Ok(Json(UserProfile::from(user)))
}

// Handler for issuing a login session token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let use_case = LoginUseCase {
        clock: SystemClock,
        users: PostgresUserStore {
            db: state.db.clone(),
        },
        sessions: InMemorySessionStore {
            sessions: state.sessions.clone(),
        },
        ttl_seconds: SESSION_TTL_SECONDS,
    };

    let result = use_case.execute(payload).await.map_err(map_account_error)?;

    Ok(Json(LoginResponse {
        token: result.token,
        expires_at: result.expires_at,
    }))
}

// Handler for the authenticated profile lookup.
pub async fn lookup_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserLookupResponse>, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let use_case = LookupUserUseCase {
        users: PostgresUserStore {
            db: state.db.clone(),
        },
        subscriptions: PostgresSubscriptionStore {
            db: state.db.clone(),
        },
    };

    let result = use_case
        .execute(session.user_id)
        .await
        .map_err(map_account_error)?;

    Ok(Json(UserLookupResponse {
        profile: UserProfile::from(result.user),
        subscription: result.subscription.map(Into::into),
    }))
}

// Handler for starting a subscription (awaits payment execution).
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let use_case = SubscribeUseCase {
        clock: SystemClock,
        subscriptions: PostgresSubscriptionStore {
            db: state.db.clone(),
        },
    };

    let subscription = use_case
        .execute(session.user_id, &payload.plan)
        .await
        .map_err(map_billing_error)?;

    Ok(Json(SubscribeResponse {
        subscription_id: subscription.id,
        plan: subscription.plan,
        status: subscription.status,
    }))
}

// Handler for the payment provider's execute callback.
pub async fn execute_payment(
    State(state): State<AppState>,
    Json(payload): Json<ExecutePaymentRequest>,
) -> Result<Json<ExecutePaymentResponse>, ApiError> {
    let use_case = ExecutePaymentUseCase {
        clock: SystemClock,
        subscriptions: PostgresSubscriptionStore {
            db: state.db.clone(),
        },
    };

    let subscription = use_case
        .execute(payload.subscription_id, payload.payer_id)
        .await
        .map_err(map_billing_error)?;

    Ok(Json(ExecutePaymentResponse {
        subscription_id: subscription.id,
        status: subscription.status,
        current_period_end: subscription.current_period_end,
    }))
}

// Handler for changing the plan of an active subscription.
pub async fn update_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> Result<Json<UpdateSubscriptionResponse>, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let use_case = UpdateSubscriptionUseCase {
        clock: SystemClock,
        subscriptions: PostgresSubscriptionStore {
            db: state.db.clone(),
        },
    };

    let subscription = use_case
        .execute(session.user_id, &payload.plan)
        .await
        .map_err(map_billing_error)?;

    Ok(Json(UpdateSubscriptionResponse {
        subscription_id: subscription.id,
        plan: subscription.plan,
        status: subscription.status,
        current_period_end: subscription.current_period_end,
    }))
}

// Handler for cancelling the caller's subscription.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CancelSubscriptionResponse>, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let use_case = CancelSubscriptionUseCase {
        subscriptions: PostgresSubscriptionStore {
            db: state.db.clone(),
        },
    };

    let result = use_case
        .execute(session.user_id)
        .await
        .map_err(map_billing_error)?;

    Ok(Json(CancelSubscriptionResponse {
        cancelled: result.cancelled,
    }))
}

// Handler for promoting an account to the admin role.
pub async fn upgrade_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpgradeAdminRequest>,
) -> Result<Json<UpgradeAdminResponse>, ApiError> {
    let session = authenticate(&state, &headers).await?;

    let use_case = UpgradeAdminUseCase {
        users: PostgresUserStore {
            db: state.db.clone(),
        },
    };

    let user = use_case
        .execute(&session, &payload.email)
        .await
        .map_err(map_account_error)?;

    Ok(Json(UpgradeAdminResponse {
        email: user.email,
        role: user.role,
    }))
}

// Resolves the bearer token from the Authorization header to a session.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    let token = bearer_token(headers)?;

    let use_case = AuthenticateUseCase {
        clock: SystemClock,
        sessions: InMemorySessionStore {
            sessions: state.sessions.clone(),
        },
    };

    use_case.execute(&token).await.map_err(map_account_error)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

fn map_account_error(err: AccountError) -> ApiError {
    match err {
        AccountError::InvalidEmail => error_response(StatusCode::BAD_REQUEST, "invalid email"),
        AccountError::InvalidDisplayName => {
            error_response(StatusCode::BAD_REQUEST, "invalid display_name")
        }
        AccountError::InvalidPassword => {
            error_response(StatusCode::BAD_REQUEST, "invalid password")
        }
        AccountError::EmailTaken => {
            error_response(StatusCode::CONFLICT, "email already registered")
        }
        AccountError::InvalidCredentials => {
            error_response(StatusCode::UNAUTHORIZED, "invalid credentials")
        }
        AccountError::InvalidToken => {
            error_response(StatusCode::UNAUTHORIZED, "invalid session token")
        }
        AccountError::SessionExpired => {
            error_response(StatusCode::UNAUTHORIZED, "session expired")
        }
        AccountError::NotAdmin => error_response(StatusCode::FORBIDDEN, "admin role required"),
        AccountError::UserNotFound => error_response(StatusCode::NOT_FOUND, "user not found"),
        AccountError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    }
}

fn map_billing_error(err: BillingError) -> ApiError {
    match err {
        BillingError::UnknownPlan => error_response(StatusCode::BAD_REQUEST, "unknown plan"),
        BillingError::AlreadySubscribed => {
            error_response(StatusCode::CONFLICT, "subscription already exists")
        }
        BillingError::SubscriptionNotFound => {
            error_response(StatusCode::NOT_FOUND, "subscription not found")
        }
        BillingError::SubscriptionNotPending => error_response(
            StatusCode::CONFLICT,
            "subscription is not awaiting payment",
        ),
        BillingError::SubscriptionNotActive => {
            error_response(StatusCode::NOT_FOUND, "no active subscription")
        }
        BillingError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
    }
}
