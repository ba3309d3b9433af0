//! Auth service.

use async_trait::async_trait;
use jiff::{Span, Timestamp};
use mockall::automock;

use crate::{
    auth::{
        errors::AuthServiceError,
        records::{CurrentAccount, SessionRecord},
        repository::PgAuthRepository,
        token::generate_session_token,
    },
    database::Db,
    domain::accounts::records::AccountUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Mint a session for the given account. A `ttl` of `None` produces a
    /// session that lives until explicitly removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the account does not exist, the ttl pushes the
    /// expiry out of range, or the insert fails.
    pub async fn create_session(
        &self,
        account: AccountUuid,
        ttl: Option<Span>,
    ) -> Result<SessionRecord, AuthServiceError> {
        let expires_at = ttl
            .map(|ttl| Timestamp::now().checked_add(ttl))
            .transpose()
            .map_err(AuthServiceError::InvalidTtl)?;

        let token = generate_session_token();

        let mut tx = self.db.begin().await?;

        let session = self
            .repository
            .create_session(&mut tx, &token, account, expires_at)
            .await?;

        tx.commit().await?;

        Ok(session)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_session(
        &self,
        token: &str,
    ) -> Result<CurrentAccount, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let account = self.repository.find_session_account(&mut tx, token).await?;

        tx.commit().await?;

        account.ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a session token to the account it belongs to.
    async fn authenticate_session(&self, token: &str)
    -> Result<CurrentAccount, AuthServiceError>;
}
