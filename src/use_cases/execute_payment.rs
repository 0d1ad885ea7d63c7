use uuid::Uuid;

use crate::domain::entities::{Payment, Subscription, SubscriptionStatus};
use crate::domain::errors::BillingError;
use crate::domain::ports::{Clock, SubscriptionStore};

// Payment execution use case: records the provider's payment and
// activates the pending subscription.
pub struct ExecutePaymentUseCase<C, B> {
    pub clock: C,
    pub subscriptions: B,
}

impl<C, B> ExecutePaymentUseCase<C, B>
where
    C: Clock,
    B: SubscriptionStore,
{
    pub async fn execute(
        &self,
        subscription_id: Uuid,
        payer_id: String,
    ) -> Result<Subscription, BillingError> {
        let subscription = self
            .subscriptions
            .find_by_id(subscription_id)
            .await
            .map_err(|_| BillingError::StorageFailure)?
            .ok_or(BillingError::SubscriptionNotFound)?;

        if subscription.status != SubscriptionStatus::PendingPayment {
            return Err(BillingError::SubscriptionNotPending);
        }

        let now = self.clock.now_epoch_seconds();
        let current_period_end = now + subscription.plan.period_seconds();

        // Ledger entry first; a recorded payment without an active
        // subscription is recoverable, the reverse is not.
        let payment = Payment {
            id: Uuid::new_v4(),
            subscription_id,
            payer_id,
            amount_cents: subscription.plan.price_cents(),
            executed_at: now,
        };
        self.subscriptions
            .record_payment(payment)
            .await
            .map_err(|_| BillingError::StorageFailure)?;

        let updated = self
            .subscriptions
            .update_status(subscription_id, SubscriptionStatus::Active, current_period_end)
            .await
            .map_err(|_| BillingError::StorageFailure)?;
        if !updated {
            return Err(BillingError::SubscriptionNotFound);
        }

        Ok(Subscription {
            status: SubscriptionStatus::Active,
            current_period_end,
            ..subscription
        })
    }
}
