// Domain-level errors for account workflows.
#[derive(Debug)]
pub enum AccountError {
    InvalidEmail,
    InvalidDisplayName,
    InvalidPassword,
    EmailTaken,
    InvalidCredentials,
    InvalidToken,
    SessionExpired,
    NotAdmin,
    UserNotFound,
    StorageFailure,
}

// Domain-level errors for subscription and payment workflows.
#[derive(Debug)]
pub enum BillingError {
    UnknownPlan,
    AlreadySubscribed,
    SubscriptionNotFound,
    SubscriptionNotPending,
    SubscriptionNotActive,
    StorageFailure,
}
