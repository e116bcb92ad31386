use crate::codec::{self, Encode};
use crate::http::content_type::ContentType;
use crate::http::status::Status;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of a dispatch, written once by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Bytes {
        status: Status,
        content_type: Option<ContentType>,
        body: Vec<u8>,
    },
    Text {
        status: Status,
        content_type: ContentType,
        body: String,
    },
    File {
        status: Status,
        path: PathBuf,
    },
    /// A file sent as an attachment.
    Download {
        status: Status,
        path: PathBuf,
    },
    Redirect {
        status: Status,
        location: String,
    },
}

impl Response {
    /// Encodes `value` as a type-tagged JSON document.
    pub fn json<T: Encode + ?Sized>(status: Status, value: &T) -> Response {
        Response::Text {
            status,
            content_type: ContentType::ApplicationJson,
            body: codec::to_json(value),
        }
    }

    pub fn plain(status: Status, text: impl Into<String>) -> Response {
        Response::Text {
            status,
            content_type: ContentType::TextPlain,
            body: text.into(),
        }
    }

    pub fn html(status: Status, html: impl Into<String>) -> Response {
        Response::Text {
            status,
            content_type: ContentType::TextHtml,
            body: html.into(),
        }
    }

    pub fn bytes(status: Status, content_type: Option<ContentType>, body: Vec<u8>) -> Response {
        Response::Bytes {
            status,
            content_type,
            body,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Response {
        Response::File {
            status: Status::OK,
            path: path.into(),
        }
    }

    pub fn download(path: impl Into<PathBuf>) -> Response {
        Response::Download {
            status: Status::OK,
            path: path.into(),
        }
    }

    pub fn redirect(location: impl Into<String>) -> Response {
        Response::Redirect {
            status: Status::FOUND,
            location: location.into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Response::Bytes { status, .. }
            | Response::Text { status, .. }
            | Response::File { status, .. }
            | Response::Download { status, .. }
            | Response::Redirect { status, .. } => *status,
        }
    }

    /// Body of an in-memory response.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Response::Bytes { body, .. } => Some(body),
            Response::Text { body, .. } => Some(body.as_bytes()),
            _ => None,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub error: String,
    pub timestamp: u64,
    pub details: String,
}

impl ErrorBody {
    pub fn new(status: Status, message: &str, error: &str, details: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        ErrorBody {
            status: status.code_num,
            message: message.to_string(),
            error: error.to_string(),
            timestamp,
            details: details.into(),
        }
    }

    pub fn into_response(self) -> Response {
        let status = Status::from_code(self.status);
        let body = serde_json::to_vec(&self).unwrap_or_default();
        Response::bytes(status, Some(ContentType::ApplicationJson), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn json_wraps_value_in_type_name() {
        let response = Response::json(Status::OK, &vec![1u8, 2]);

        let Response::Text { content_type, body, .. } = response else {
            panic!("expected a text response");
        };
        assert_eq!(content_type, ContentType::ApplicationJson);
        assert_eq!(body, r#"{"alloc::vec::Vec<u8>":[1,2]}"#);
    }

    #[test]
    fn redirect_defaults_to_found() {
        assert_eq!(Response::redirect("/home").status(), Status::FOUND);
    }

    #[test]
    fn error_body_shape() {
        let response =
            ErrorBody::new(Status::BAD_REQUEST, "Request incomplete!", "BAD REQUEST", "x")
                .into_response();

        assert_eq!(response.status(), Status::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body().unwrap()).unwrap();
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["status", "message", "error", "timestamp", "details"]);
        assert_eq!(body["status"], 400);
        assert_eq!(body["details"], "x");
        assert!(body["timestamp"].as_u64().unwrap() > 0);
    }
}
