use uuid::Uuid;

use crate::domain::entities::{Role, User};
use crate::domain::errors::AccountError;
use crate::domain::password::hash_password;
use crate::domain::ports::{Clock, UserInsertError, UserStore};
use crate::interface_adapters::protocol::RegisterRequest;

// Registration use case with injected dependencies.
pub struct RegisterUseCase<C, U> {
    pub clock: C,
    pub users: U,
}

impl<C, U> RegisterUseCase<C, U>
where
    C: Clock,
    U: UserStore,
{
    pub async fn execute(&self, payload: RegisterRequest) -> Result<User, AccountError> {
        let email = validate_email(&payload.email)?;
        let display_name = validate_display_name(&payload.display_name)?;
        validate_password(&payload.password)?;

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|_| AccountError::StorageFailure)?;
        if existing.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash: hash_password(&payload.password),
            role: Role::User,
            created_at: self.clock.now_epoch_seconds(),
        };

        // A concurrent registration can slip past the pre-insert check;
        // the store reports the duplicate and it maps to the same error.
        self.users.insert(user.clone()).await.map_err(|err| match err {
            UserInsertError::DuplicateEmail => AccountError::EmailTaken,
            UserInsertError::Storage(_) => AccountError::StorageFailure,
        })?;

        Ok(user)
    }
}

fn validate_email(value: &str) -> Result<String, AccountError> {
    const MIN_LEN: usize = 3;
    const MAX_LEN: usize = 254;

    let len = value.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(AccountError::InvalidEmail);
    }
    if value.chars().any(|c| c.is_whitespace()) {
        return Err(AccountError::InvalidEmail);
    }

    // Minimal shape check; real deliverability is the mail provider's problem.
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(value.to_ascii_lowercase())
        }
        _ => Err(AccountError::InvalidEmail),
    }
}

fn validate_display_name(value: &str) -> Result<String, AccountError> {
    // Keep names compact and readable for account pages and logs.
    const MIN_LEN: usize = 3;
    const MAX_LEN: usize = 32;

    let len = value.chars().count();

    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(AccountError::InvalidDisplayName);
    }
    if value.trim() != value {
        return Err(AccountError::InvalidDisplayName);
    }

    // Allow a simple safe charset across the stack.
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
    {
        return Err(AccountError::InvalidDisplayName);
    }

    Ok(value.to_string())
}

fn validate_password(value: &str) -> Result<(), AccountError> {
    const MIN_LEN: usize = 8;
    const MAX_LEN: usize = 128;

    let len = value.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(AccountError::InvalidPassword);
    }

    Ok(())
}
