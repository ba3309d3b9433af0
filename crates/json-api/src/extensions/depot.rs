//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use agora_app::auth::CurrentAccount;

use crate::errors::ApiError;

/// Helpers for moving request-scoped values through the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    /// Stores the authenticated account for downstream handlers.
    fn insert_current_account(&mut self, account: CurrentAccount);

    /// The account the session middleware resolved, or a 401 when the
    /// request never passed through it.
    fn current_account_or_401(&self) -> Result<&CurrentAccount, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal_server_error())
    }

    fn insert_current_account(&mut self, account: CurrentAccount) {
        self.inject(account);
    }

    fn current_account_or_401(&self) -> Result<&CurrentAccount, ApiError> {
        self.obtain::<CurrentAccount>()
            .map_err(|_ignored| ApiError::unauthorized().brief("Not logged in"))
    }
}
