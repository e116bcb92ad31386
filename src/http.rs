pub mod content_type;
pub mod cookie;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod method;
pub mod params;
pub mod registry;
pub mod request;
pub mod response;
pub mod server;
pub mod status;

use crate::http::status::Status;

pub(crate) const BUFFER_SIZE: usize = 1024;

/// Status line, headers and body as written to the connection.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: Status,
    pub headers: Vec<(String, String)>,
    pub content: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn from_parts(status: Status, headers: Vec<(String, String)>, content: Option<Vec<u8>>) -> Self {
        HttpResponse {
            status,
            headers,
            content,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn add_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.push((name.to_string(), value.into()));
    }

    /// Serializes the response as an HTTP/1.1 message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let content_len = self.content.as_ref().map(|c| c.len()).unwrap_or(0);
        let mut resp_bytes = Vec::with_capacity(content_len + self.headers.len() * 32);

        resp_bytes.extend(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.code_num, self.status.message
            )
            .as_bytes(),
        );

        for (key, value) in &self.headers {
            resp_bytes.extend(format!("{}: {}\r\n", key, value).as_bytes());
        }

        if let Some(c) = &self.content {
            resp_bytes.extend(format!("Content-Length: {}\r\n", c.len()).as_bytes());
            resp_bytes.extend("\r\n".as_bytes());
            resp_bytes.extend(c);
        } else {
            resp_bytes.extend("Content-Length: 0\r\n\r\n".as_bytes());
        }

        resp_bytes
    }
}
