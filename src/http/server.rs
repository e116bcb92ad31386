use crate::concurrency::ThreadPool;
use crate::http::dispatcher::{Dispatched, Dispatcher};
use crate::http::endpoint::Endpoint;
use crate::http::method::Method;
use crate::http::registry::EndpointRegistry;
use crate::http::request::Request;
use crate::http::response::{ErrorBody, Response};
use crate::http::status::Status;
use crate::http::{HttpResponse, BUFFER_SIZE};
use anyhow::{anyhow, bail, Context};
use std::cmp::min;
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Largest request body the transport will read.
pub const MAX_CONTENT_LENGTH: usize = 8 * 1024 * 1024;

pub struct Server {
    listener: TcpListener,
    registry: EndpointRegistry,
    pool: ThreadPool,
}

impl Server {
    fn new(listener: TcpListener, num_workers: usize) -> Server {
        Server {
            listener,
            registry: EndpointRegistry::new(),
            pool: ThreadPool::new(num_workers),
        }
    }

    pub fn from_tcp_addr(addr: &str, num_workers: usize) -> anyhow::Result<Server> {
        let listener =
            TcpListener::bind(addr).with_context(|| format!("Can't bind address {}", addr))?;
        Ok(Server::new(listener, num_workers))
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr().context("Can't read local address")
    }

    /// Registers an endpoint. Endpoints without a path or colliding with an
    /// earlier one are logged and skipped.
    pub fn add_endpoint(&mut self, endpoint: Endpoint) -> &mut Self {
        if let Err(e) = self.registry.register(endpoint) {
            debug!("Endpoint not registered: {}", e);
        }
        self
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Accepts connections until the listener fails. The endpoint set is
    /// frozen from here on.
    pub fn run(self) -> anyhow::Result<()> {
        let Server {
            listener,
            registry,
            pool,
        } = self;

        info!(
            "Serving {} endpoint(s) on {:?}",
            registry.len(),
            listener.local_addr().ok()
        );
        let dispatcher = Arc::new(Dispatcher::new(registry));

        for stream in listener.incoming() {
            let stream = stream.context("Error listening")?;
            let dispatcher = Arc::clone(&dispatcher);
            pool.execute(move || {
                if let Err(e) = process_incoming(&dispatcher, stream) {
                    error!("Connection failed: {:#}", e);
                }
            })?;
        }
        Ok(())
    }
}

fn process_incoming(dispatcher: &Dispatcher, mut stream: TcpStream) -> anyhow::Result<()> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .context("Can't set read timeout")?;

    let remote_addr = stream.peer_addr().ok();
    debug!("accepted new connection: {:?}", remote_addr);

    let response = match read_request(&mut stream) {
        Ok(mut request) => {
            request.remote_addr = remote_addr;
            to_http_response(dispatcher.dispatch(&request))
        }
        Err(e) => {
            warn!("Malformed request from {:?}: {:#}", remote_addr, e);
            let body = ErrorBody::new(
                Status::BAD_REQUEST,
                "Malformed request",
                "BAD REQUEST",
                format!("{:#}", e),
            );
            to_http_response(Dispatched {
                response: body.into_response(),
                cookies: Vec::new(),
            })
        }
    };

    stream
        .write_all(&response.to_bytes())
        .context("Can't write response")?;
    stream.flush().context("Can't flush response")
}

pub(crate) fn read_request(readable: &mut impl Read) -> anyhow::Result<Request> {
    let mut rdr = BufReader::new(readable);

    let mut request_line = String::new();
    rdr.read_line(&mut request_line)
        .context("Can't read request line")?;

    let mut parts = request_line.trim_ascii().split(' ');
    let (Some(verb), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        bail!("Request line must be `<verb> <target> <version>`");
    };
    let method =
        Method::from_str(verb).with_context(|| format!("Unsupported verb {}", verb))?;
    if !matches!(version, "HTTP/1.1" | "HTTP/1.0") {
        bail!("Unsupported protocol version {}", version);
    }
    let url = target.to_string();

    let mut headers: HashMap<String, String> = HashMap::new();
    let mut line = String::new();
    loop {
        line.clear();
        if rdr.read_line(&mut line).context("Can't read header")? == 0 {
            break;
        }
        let field = line.trim_ascii();
        if field.is_empty() {
            break;
        }
        let (name, value) = field
            .split_once(':')
            .ok_or_else(|| anyhow!("Header without a colon: {}", field))?;
        headers.insert(name.trim_ascii().to_lowercase(), value.trim_ascii().to_string());
    }

    let content = match headers.get("content-length") {
        Some(raw) => {
            let length: usize = raw
                .parse()
                .with_context(|| format!("Content-Length is not a length: {}", raw))?;
            if length > MAX_CONTENT_LENGTH {
                bail!(
                    "Content-Length {} exceeds the {} byte limit",
                    length,
                    MAX_CONTENT_LENGTH
                );
            }
            read_content(&mut rdr, length)?
        }
        None => Vec::new(),
    };

    Ok(Request {
        method,
        url,
        headers,
        content,
        remote_addr: None,
    })
}

/// Reads up to `length` body bytes, stopping early if the peer closes.
fn read_content(rdr: &mut impl Read, length: usize) -> anyhow::Result<Vec<u8>> {
    let mut content = Vec::with_capacity(min(length, BUFFER_SIZE * 64));
    let mut chunk = [0u8; BUFFER_SIZE];
    while content.len() < length {
        let wanted = min(BUFFER_SIZE, length - content.len());
        let n = rdr
            .read(&mut chunk[..wanted])
            .context("Can't read request body")?;
        if n == 0 {
            break;
        }
        content.extend_from_slice(&chunk[..n]);
    }
    Ok(content)
}

/// Turns a dispatch outcome into what goes on the wire.
pub fn to_http_response(dispatched: Dispatched) -> HttpResponse {
    let Dispatched { response, cookies } = dispatched;

    let mut http = match response {
        Response::Bytes {
            status,
            content_type,
            body,
        } => {
            let mut http = HttpResponse::from_parts(status, Vec::new(), Some(body));
            if let Some(content_type) = content_type {
                http.add_header("Content-Type", content_type.mime());
            }
            http
        }
        Response::Text {
            status,
            content_type,
            body,
        } => {
            let mut http = HttpResponse::from_parts(status, Vec::new(), Some(body.into_bytes()));
            http.add_header("Content-Type", content_type.mime());
            http
        }
        Response::File { status, path } => file_response(status, &path, false),
        Response::Download { status, path } => file_response(status, &path, true),
        Response::Redirect { status, location } => {
            let page = format!(
                "<meta http-equiv=\"Refresh\" content=\"0; url={}\">",
                location
            );
            let mut http = HttpResponse::from_parts(status, Vec::new(), Some(page.into_bytes()));
            http.add_header("Location", location);
            http.add_header("Content-Type", "text/html");
            http
        }
    };

    for cookie in cookies {
        http.add_header("Set-Cookie", cookie.to_string());
    }
    http
}

fn file_response(status: Status, path: &Path, attachment: bool) -> HttpResponse {
    match fs::read(path) {
        Ok(content) => {
            let mut http = HttpResponse::from_parts(status, Vec::new(), Some(content));
            http.add_header("Content-Type", "application/octet-stream");
            if attachment {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                http.add_header(
                    "Content-Disposition",
                    format!("attachment; filename={}", name),
                );
            }
            http
        }
        Err(e) => {
            warn!("Can't read file {}: {}", path.display(), e);
            let response = ErrorBody::new(
                Status::NOT_FOUND,
                "No such file",
                "NOT FOUND",
                format!("Can't read {}", path.display()),
            )
            .into_response();
            to_http_response(Dispatched {
                response,
                cookies: Vec::new(),
            })
        }
    }
}
