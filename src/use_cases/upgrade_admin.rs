use crate::domain::entities::{Role, Session, User};
use crate::domain::errors::AccountError;
use crate::domain::ports::UserStore;

// Admin upgrade use case: an admin session promotes another account.
pub struct UpgradeAdminUseCase<U> {
    pub users: U,
}

impl<U> UpgradeAdminUseCase<U>
where
    U: UserStore,
{
    pub async fn execute(&self, caller: &Session, email: &str) -> Result<User, AccountError> {
        if caller.role != Role::Admin {
            return Err(AccountError::NotAdmin);
        }

        let target = self
            .users
            .find_by_email(&email.to_ascii_lowercase())
            .await
            .map_err(|_| AccountError::StorageFailure)?
            .ok_or(AccountError::UserNotFound)?;

        let updated = self
            .users
            .set_role(target.id, Role::Admin)
            .await
            .map_err(|_| AccountError::StorageFailure)?;
        if !updated {
            return Err(AccountError::UserNotFound);
        }

        Ok(User {
            role: Role::Admin,
            ..target
        })
    }
}
