//! Per-request pipeline: resolve the endpoint, bind its parameters from the
//! merged request table, invoke it and shape the result into a [`Response`].
//!
//! Every failure, including a panicking endpoint, ends as a structured JSON
//! error response. Nothing escapes to the transport.

use crate::concurrency::panic_message;
use crate::http::cookie::Cookie;
use crate::http::endpoint::{Arguments, Endpoint, Handler};
use crate::http::error::DispatchError;
use crate::http::params::Params;
use crate::http::registry::EndpointRegistry;
use crate::http::request::{Request, RequestContext};
use crate::http::response::Response;
use crate::http::status::Status;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// The response and the cookies the endpoint asked to set.
#[derive(Debug)]
pub struct Dispatched {
    pub response: Response,
    pub cookies: Vec<Cookie>,
}

pub struct Dispatcher {
    registry: EndpointRegistry,
}

impl Dispatcher {
    pub fn new(registry: EndpointRegistry) -> Self {
        Dispatcher { registry }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn dispatch(&self, request: &Request) -> Dispatched {
        info!(
            "Handling request from {} for {} with method {}",
            request
                .remote_addr
                .map_or_else(|| "unknown".to_string(), |a| a.ip().to_string()),
            request.url,
            request.method
        );

        let mut ctx = RequestContext::new(request);
        let response = match self.try_dispatch(request, &mut ctx) {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    DispatchError::RouteNotFound { .. } => {}
                    DispatchError::MissingParameter(key) => {
                        warn!("Rejecting {}: missing parameter {}", request.url, key)
                    }
                    DispatchError::Invocation(_) | DispatchError::Panicked(_) => {
                        error!("Endpoint for {} failed: {}", request.url, e)
                    }
                }
                e.into_response()
            }
        };

        Dispatched {
            response,
            cookies: ctx.into_cookies(),
        }
    }

    fn try_dispatch(
        &self,
        request: &Request,
        ctx: &mut RequestContext,
    ) -> Result<Response, DispatchError> {
        let path = request.path();
        let endpoint = self
            .registry
            .resolve(&path, &request.method)
            .ok_or_else(|| DispatchError::RouteNotFound {
                method: request.method,
                path: path.to_string(),
            })?;

        let args = bind(endpoint, ctx.params())?;
        debug!(
            "Invoking endpoint '{}' with parameters: {:?}",
            endpoint.path(),
            args
        );

        invoke(endpoint, ctx, &args)
    }
}

/// Looks up every declared key, in declaration order.
fn bind(endpoint: &Endpoint, params: &Params) -> Result<Arguments, DispatchError> {
    endpoint
        .params()
        .iter()
        .map(|key| {
            params
                .get(key)
                .map(|value| (key.clone(), value.to_string()))
                .ok_or_else(|| DispatchError::MissingParameter(key.clone()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Arguments::new)
}

fn invoke(
    endpoint: &Endpoint,
    ctx: &mut RequestContext,
    args: &Arguments,
) -> Result<Response, DispatchError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match endpoint.handler() {
        Handler::Response(f) => f(ctx, args),
        Handler::Value(f) => f(ctx, args).map(|value| Response::json(Status::OK, &*value)),
    }));

    match outcome {
        Ok(result) => result.map_err(DispatchError::Invocation),
        Err(payload) => Err(DispatchError::Panicked(panic_message(payload))),
    }
}
