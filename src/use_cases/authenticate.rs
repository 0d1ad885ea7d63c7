use crate::domain::entities::Session;
use crate::domain::errors::AccountError;
use crate::domain::ports::{Clock, SessionStore};

// Resolves a bearer token to a live session; shared by every
// authenticated endpoint.
pub struct AuthenticateUseCase<C, S> {
    pub clock: C,
    pub sessions: S,
}

impl<C, S> AuthenticateUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self, token: &str) -> Result<Session, AccountError> {
        let session = self
            .sessions
            .get(token)
            .await
            .map_err(|_| AccountError::StorageFailure)?
            .ok_or(AccountError::InvalidToken)?;

        if session.expires_at <= self.clock.now_epoch_seconds() {
            // Best-effort cleanup of expired session.
            let _ = self.sessions.remove(token).await;
            return Err(AccountError::SessionExpired);
        }

        Ok(session)
    }
}
