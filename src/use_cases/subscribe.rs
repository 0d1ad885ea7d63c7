use uuid::Uuid;

use crate::domain::entities::{Plan, Subscription, SubscriptionStatus};
use crate::domain::errors::BillingError;
use crate::domain::ports::{Clock, SubscriptionStore};

// Subscribe use case with injected dependencies. Creates a subscription
// awaiting payment; payment execution activates it.
pub struct SubscribeUseCase<C, B> {
    pub clock: C,
    pub subscriptions: B,
}

impl<C, B> SubscribeUseCase<C, B>
where
    C: Clock,
    B: SubscriptionStore,
{
    pub async fn execute(&self, user_id: Uuid, plan: &str) -> Result<Subscription, BillingError> {
        let plan = Plan::parse(plan).ok_or(BillingError::UnknownPlan)?;

        let latest = self
            .subscriptions
            .find_latest_by_user(user_id)
            .await
            .map_err(|_| BillingError::StorageFailure)?;
        if let Some(existing) = latest {
            if existing.status != SubscriptionStatus::Cancelled {
                return Err(BillingError::AlreadySubscribed);
            }
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id,
            plan,
            status: SubscriptionStatus::PendingPayment,
            created_at: self.clock.now_epoch_seconds(),
            // Period starts only when the payment is executed.
            current_period_end: 0,
        };

        self.subscriptions
            .insert(subscription.clone())
            .await
            .map_err(|_| BillingError::StorageFailure)?;

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        test_subscription, FixedClock, RecordingSubscriptions, SubscriptionFailures,
    };

    #[tokio::test]
    async fn when_user_has_no_subscription_then_pending_subscription_is_created() {
        let subscriptions = RecordingSubscriptions::new();
        let use_case = SubscribeUseCase {
            clock: FixedClock(1_700_000_000),
            subscriptions: subscriptions.clone(),
        };
        let user_id = Uuid::new_v4();

        let subscription = use_case
            .execute(user_id, "basic")
            .await
            .expect("expected subscribe to succeed");

        assert_eq!(subscription.user_id, user_id);
        assert_eq!(subscription.plan, Plan::Basic);
        assert_eq!(subscription.status, SubscriptionStatus::PendingPayment);
        assert_eq!(subscription.created_at, 1_700_000_000);
        assert_eq!(subscription.current_period_end, 0);

        let saved = subscriptions
            .get_test_subscription(subscription.id)
            .expect("expected subscription to be stored");
        assert_eq!(saved.status, SubscriptionStatus::PendingPayment);
    }

    #[tokio::test]
    async fn when_plan_is_unknown_then_returns_unknown_plan() {
        let use_case = SubscribeUseCase {
            clock: FixedClock(1_700_000_000),
            subscriptions: RecordingSubscriptions::new(),
        };

        let result = use_case.execute(Uuid::new_v4(), "platinum").await;

        assert!(matches!(result, Err(BillingError::UnknownPlan)));
    }

    #[tokio::test]
    async fn when_user_has_active_subscription_then_returns_already_subscribed() {
        let subscriptions = RecordingSubscriptions::new();
        let user_id = Uuid::new_v4();
        subscriptions.insert_test_subscription(test_subscription(
            user_id,
            Plan::Basic,
            SubscriptionStatus::Active,
            1_600_000_000,
        ));

        let use_case = SubscribeUseCase {
            clock: FixedClock(1_700_000_000),
            subscriptions,
        };

        let result = use_case.execute(user_id, "premium").await;

        assert!(matches!(result, Err(BillingError::AlreadySubscribed)));
    }

    #[tokio::test]
    async fn when_user_has_pending_subscription_then_returns_already_subscribed() {
        let subscriptions = RecordingSubscriptions::new();
        let user_id = Uuid::new_v4();
        subscriptions.insert_test_subscription(test_subscription(
            user_id,
            Plan::Basic,
            SubscriptionStatus::PendingPayment,
            1_600_000_000,
        ));

        let use_case = SubscribeUseCase {
            clock: FixedClock(1_700_000_000),
            subscriptions,
        };

        let result = use_case.execute(user_id, "basic").await;

        assert!(matches!(result, Err(BillingError::AlreadySubscribed)));
    }

    #[tokio::test]
    async fn when_previous_subscription_is_cancelled_then_subscribe_succeeds() {
        let subscriptions = RecordingSubscriptions::new();
        let user_id = Uuid::new_v4();
        subscriptions.insert_test_subscription(test_subscription(
            user_id,
            Plan::Basic,
            SubscriptionStatus::Cancelled,
            1_600_000_000,
        ));

        let use_case = SubscribeUseCase {
            clock: FixedClock(1_700_000_000),
            subscriptions,
        };

        let result = use_case.execute(user_id, "premium").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn when_store_insert_fails_then_returns_storage_failure() {
        let use_case = SubscribeUseCase {
            clock: FixedClock(1_700_000_000),
            subscriptions: RecordingSubscriptions::new().with_failures(SubscriptionFailures {
                insert: true,
                ..Default::default()
            }),
        };

        let result = use_case.execute(Uuid::new_v4(), "basic").await;

        assert!(matches!(result, Err(BillingError::StorageFailure)));
    }
}
