//! A small web-serving layer: explicit endpoint registration, parameter
//! binding from form body, query string and cookies, and a type-tagged JSON
//! codec for endpoint return values.

pub mod codec;
pub mod concurrency;
pub mod config;
pub mod http;

pub use http::endpoint::{Arguments, Endpoint};
pub use http::method::Method;
pub use http::request::RequestContext;
pub use http::response::Response;
pub use http::server::Server;
pub use http::status::Status;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default
/// `info`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
