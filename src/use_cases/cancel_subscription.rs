use uuid::Uuid;

use crate::domain::entities::SubscriptionStatus;
use crate::domain::errors::BillingError;
use crate::domain::ports::SubscriptionStore;

// Response returned by the cancellation use case.
pub struct CancelSubscriptionResponse {
    pub cancelled: bool,
}

// Cancellation use case with injected dependencies. Nothing to cancel
// is reported in-band, mirroring the logout revoked=false contract.
pub struct CancelSubscriptionUseCase<B> {
    pub subscriptions: B,
}

impl<B> CancelSubscriptionUseCase<B>
where
    B: SubscriptionStore,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<CancelSubscriptionResponse, BillingError> {
        let subscription = self
            .subscriptions
            .find_latest_by_user(user_id)
            .await
            .map_err(|_| BillingError::StorageFailure)?;

        let Some(subscription) = subscription else {
            return Ok(CancelSubscriptionResponse { cancelled: false });
        };
        if subscription.status == SubscriptionStatus::Cancelled {
            return Ok(CancelSubscriptionResponse { cancelled: false });
        }

        let cancelled = self
            .subscriptions
            .update_status(
                subscription.id,
                SubscriptionStatus::Cancelled,
                subscription.current_period_end,
            )
            .await
            .map_err(|_| BillingError::StorageFailure)?;

        Ok(CancelSubscriptionResponse { cancelled })
    }
}
