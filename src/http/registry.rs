use crate::http::endpoint::Endpoint;
use crate::http::method::Method;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("endpoint has no path")]
    MissingPath,
    #[error("an endpoint for '{path}' already claims {methods}")]
    Conflict { path: String, methods: String },
}

/// Registered endpoints, scanned in registration order.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `endpoint` unless it has no path or could claim the same
    /// requests as an already registered one. Skipped endpoints are logged;
    /// the returned error is informational.
    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), RegistrationError> {
        if endpoint.path().is_empty() {
            warn!("Endpoint without a path, skipping");
            return Err(RegistrationError::MissingPath);
        }

        if self.endpoints.iter().any(|e| e.conflicts_with(&endpoint)) {
            warn!(
                "Redundant endpoint for '{}' ({}), skipping",
                endpoint.path(),
                endpoint.describe_methods()
            );
            return Err(RegistrationError::Conflict {
                path: endpoint.path().to_string(),
                methods: endpoint.describe_methods(),
            });
        }

        info!(
            "Registered '{}' with {}",
            endpoint.path(),
            endpoint.describe_methods()
        );
        self.endpoints.push(endpoint);
        Ok(())
    }

    /// First endpoint whose path matches (ignoring case) and which accepts
    /// `method`.
    pub fn resolve(&self, path: &str, method: &Method) -> Option<&Endpoint> {
        debug!("Searching for endpoint for path: {} with method: {}", path, method);

        let wanted = path.to_lowercase();
        let found = self
            .endpoints
            .iter()
            .find(|e| e.path() == wanted && e.accepts(method));

        if found.is_none() {
            warn!("No matching endpoint found for path: {} with method: {}", path, method);
        }
        found
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}
