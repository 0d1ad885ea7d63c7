use uuid::Uuid;

use crate::domain::entities::Session;
use crate::domain::errors::AccountError;
use crate::domain::password::verify_password;
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::interface_adapters::protocol::LoginRequest;

// Response returned by the login use case.
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
}

// Login use case with injected dependencies.
pub struct LoginUseCase<C, U, S> {
    pub clock: C,
    pub users: U,
    pub sessions: S,
    pub ttl_seconds: u64,
}

impl<C, U, S> LoginUseCase<C, U, S>
where
    C: Clock,
    U: UserStore,
    S: SessionStore,
{
    pub async fn execute(&self, payload: LoginRequest) -> Result<LoginResponse, AccountError> {
        let user = self
            .users
            .find_by_email(&payload.email.to_ascii_lowercase())
            .await
            .map_err(|_| AccountError::StorageFailure)?
            // Unknown email and wrong password must be indistinguishable.
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(&payload.password, &user.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let session_id = Uuid::new_v4().to_string();
        let expires_at = self.clock.now_epoch_seconds() + self.ttl_seconds;

        let session = Session {
            user_id: user.id,
            role: user.role,
            session_id,
            expires_at,
        };

        self.sessions
            .insert(token.clone(), session)
            .await
            .map_err(|_| AccountError::StorageFailure)?;

        Ok(LoginResponse { token, expires_at })
    }
}
