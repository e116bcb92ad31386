use crate::http::method::Method;
use crate::http::response::{ErrorBody, Response};
use crate::http::status::Status;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no endpoint for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("endpoint failed: {0:#}")]
    Invocation(#[from] anyhow::Error),

    #[error("endpoint panicked: {0}")]
    Panicked(String),
}

impl DispatchError {
    pub fn status(&self) -> Status {
        match self {
            DispatchError::RouteNotFound { .. } => Status::NOT_FOUND,
            DispatchError::MissingParameter(_) => Status::BAD_REQUEST,
            DispatchError::Invocation(_) | DispatchError::Panicked(_) => {
                Status::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            DispatchError::RouteNotFound { .. } => ErrorBody::new(
                self.status(),
                "No such Endpoint",
                "NOT FOUND",
                "There's no such endpoint",
            ),
            DispatchError::MissingParameter(_) => ErrorBody::new(
                self.status(),
                "Request incomplete!",
                "BAD REQUEST",
                self.to_string(),
            ),
            DispatchError::Invocation(e) => ErrorBody::new(
                self.status(),
                "Couldn't invoke endpoint",
                "INTERNAL SERVER ERROR",
                format!("{:#}", e),
            ),
            DispatchError::Panicked(message) => ErrorBody::new(
                self.status(),
                "Something went wrong!",
                "INTERNAL SERVER ERROR",
                message.clone(),
            ),
        }
    }

    pub fn into_response(self) -> Response {
        self.to_body().into_response()
    }
}
