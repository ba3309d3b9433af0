//! State

use std::sync::Arc;

use agora_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Where the gateway callback sends the shopper once their payment
    /// settles.
    pub(crate) thank_you_url: String,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, thank_you_url: String) -> Self {
        Self { app, thank_you_url }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, thank_you_url: String) -> Arc<Self> {
        Arc::new(Self::new(app, thank_you_url))
    }
}
