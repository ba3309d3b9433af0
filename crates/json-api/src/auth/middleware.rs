//! Session middleware.

use std::sync::Arc;

use salvo::prelude::*;
use tracing::error;

use agora_app::auth::AuthServiceError;

use crate::{errors::ApiError, extensions::*, state::State};

/// The cookie the storefront stores its session token in.
pub(crate) const SESSION_COOKIE: &str = "session";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = session_token(req) else {
        res.render(ApiError::unauthorized().brief("Not logged in"));

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(ApiError::internal_server_error());

            return;
        }
    };

    let account = match state.app.auth.authenticate_session(&token).await {
        Ok(account) => account,
        Err(AuthServiceError::NotFound) => {
            res.render(ApiError::unauthorized().brief("Invalid or expired session"));

            return;
        }
        Err(source) => {
            error!("failed to authenticate session: {source}");

            res.render(ApiError::internal_server_error());

            return;
        }
    };

    depot.insert_current_account(account);

    ctrl.call_next(req, depot, res).await;
}

/// Gate for operator-only routes. Must run after [`handler`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let is_admin = match depot.current_account_or_401() {
        Ok(account) => account.is_admin(),
        Err(error) => {
            res.render(error);

            return;
        }
    };

    if !is_admin {
        res.render(ApiError::forbidden().brief("Staff only"));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn session_token(req: &Request) -> Option<String> {
    let token = req.cookie(SESSION_COOKIE)?.value().trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_owned())
}
