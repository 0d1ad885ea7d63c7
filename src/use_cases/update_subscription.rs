use uuid::Uuid;

use crate::domain::entities::{Plan, Subscription, SubscriptionStatus};
use crate::domain::errors::BillingError;
use crate::domain::ports::{Clock, SubscriptionStore};

// Plan change use case for an active subscription. The new period is
// recomputed from now rather than prorated.
pub struct UpdateSubscriptionUseCase<C, B> {
    pub clock: C,
    pub subscriptions: B,
}

impl<C, B> UpdateSubscriptionUseCase<C, B>
where
    C: Clock,
    B: SubscriptionStore,
{
    pub async fn execute(&self, user_id: Uuid, plan: &str) -> Result<Subscription, BillingError> {
        let plan = Plan::parse(plan).ok_or(BillingError::UnknownPlan)?;

        let subscription = self
            .subscriptions
            .find_latest_by_user(user_id)
            .await
            .map_err(|_| BillingError::StorageFailure)?
            .ok_or(BillingError::SubscriptionNotFound)?;

        if subscription.status != SubscriptionStatus::Active {
            return Err(BillingError::SubscriptionNotActive);
        }

        if subscription.plan == plan {
            // No-op change; keep the existing period.
            return Ok(subscription);
        }

        let current_period_end = self.clock.now_epoch_seconds() + plan.period_seconds();
        let updated = self
            .subscriptions
            .update_plan(subscription.id, plan, current_period_end)
            .await
            .map_err(|_| BillingError::StorageFailure)?;
        if !updated {
            return Err(BillingError::SubscriptionNotFound);
        }

        Ok(Subscription {
            plan,
            current_period_end,
            ..subscription
        })
    }
}
