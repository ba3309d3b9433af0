//! Error Responses
//!
//! Every failed request leaves the API with the same body shape, so the
//! storefront can always show `message` without sniffing per-endpoint
//! formats.

use salvo::{
    http::StatusCode,
    oapi::{self, EndpointOutRegister, ToSchema},
    prelude::*,
    writing::Scribe,
};
use serde::{Deserialize, Serialize};

/// The JSON envelope carried by every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Always `"error"`
    pub status: String,
    /// What went wrong, in words fit for the storefront
    pub message: String,
}

impl ErrorBody {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_owned(),
            message: message.into(),
        }
    }
}

/// An HTTP error that renders as an [`ErrorBody`].
#[derive(Debug)]
pub(crate) struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Replaces the default message with something more specific.
    pub(crate) fn brief(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub(crate) fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad request")
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not logged in")
    }

    pub(crate) fn payment_required() -> Self {
        Self::new(StatusCode::PAYMENT_REQUIRED, "Payment failed")
    }

    pub(crate) fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden")
    }

    pub(crate) fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    pub(crate) fn conflict() -> Self {
        Self::new(StatusCode::CONFLICT, "Conflict")
    }

    pub(crate) fn unprocessable_entity() -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable entity")
    }

    pub(crate) fn bad_gateway() -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "Upstream service failed")
    }

    pub(crate) fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.code);
        res.render(Json(ErrorBody::new(self.message)));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut oapi::Components, operation: &mut oapi::Operation) {
        operation.responses.insert(
            "4XX",
            oapi::Response::new("Request rejected")
                .add_content("application/json", ErrorBody::to_schema(components)),
        );
        operation.responses.insert(
            "5XX",
            oapi::Response::new("Server error")
                .add_content("application/json", ErrorBody::to_schema(components)),
        );
    }
}
