use uuid::Uuid;

use crate::domain::entities::{Subscription, User};
use crate::domain::errors::AccountError;
use crate::domain::ports::{SubscriptionStore, UserStore};

// Response returned by the user lookup use case.
pub struct LookupUserResponse {
    pub user: User,
    pub subscription: Option<Subscription>,
}

// User lookup use case with injected dependencies. The caller is
// expected to have resolved the session already.
pub struct LookupUserUseCase<U, B> {
    pub users: U,
    pub subscriptions: B,
}

impl<U, B> LookupUserUseCase<U, B>
where
    U: UserStore,
    B: SubscriptionStore,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<LookupUserResponse, AccountError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|_| AccountError::StorageFailure)?
            // A live session for a deleted account is treated as not found.
            .ok_or(AccountError::UserNotFound)?;

        let subscription = self
            .subscriptions
            .find_latest_by_user(user_id)
            .await
            .map_err(|_| AccountError::StorageFailure)?;

        Ok(LookupUserResponse { user, subscription })
    }
}
