use crate::codec::Encode;
use crate::http::method::Method;
use crate::http::request::RequestContext;
use crate::http::response::Response;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

pub type ResponseFunc =
    Box<dyn Fn(&mut RequestContext, &Arguments) -> anyhow::Result<Response> + Sync + Send>;

pub type ValueFunc =
    Box<dyn Fn(&mut RequestContext, &Arguments) -> anyhow::Result<Box<dyn Encode>> + Sync + Send>;

/// Endpoint logic, tagged with the shape of what it returns.
pub enum Handler {
    /// Builds the full response itself.
    Response(ResponseFunc),
    /// Returns a value that is sent back as a JSON document.
    Value(ValueFunc),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("endpoint takes {available} bound argument(s), argument {index} was requested")]
    OutOfRange { index: usize, available: usize },
    #[error("no bound argument named `{0}`")]
    Unknown(String),
}

/// Bound parameter values, in the order the endpoint declared them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Arguments {
    values: Vec<(String, String)>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<(String, String)>) -> Self {
        Arguments { values }
    }

    pub fn get(&self, index: usize) -> Result<&str, ArgumentError> {
        self.values
            .get(index)
            .map(|(_, v)| v.as_str())
            .ok_or(ArgumentError::OutOfRange {
                index,
                available: self.values.len(),
            })
    }

    pub fn named(&self, key: &str) -> Result<&str, ArgumentError> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| ArgumentError::Unknown(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A registered unit of request handling: path, accepted verbs, the keys
/// of its bound parameters and its logic.
///
/// An empty verb set accepts any verb not claimed by another endpoint on
/// the same path.
pub struct Endpoint {
    path: String,
    methods: BTreeSet<Method>,
    params: Vec<String>,
    handler: Handler,
}

impl Endpoint {
    pub fn builder(path: &str) -> EndpointBuilder {
        EndpointBuilder {
            path: path.to_lowercase(),
            methods: BTreeSet::new(),
            params: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn methods(&self) -> &BTreeSet<Method> {
        &self.methods
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn is_generic(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn accepts(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    /// Whether both endpoints could claim the same request.
    pub fn conflicts_with(&self, other: &Endpoint) -> bool {
        self.path == other.path
            && ((self.is_generic() && other.is_generic())
                || !self.methods.is_disjoint(&other.methods))
    }

    pub(crate) fn describe_methods(&self) -> String {
        if self.is_generic() {
            "generic".to_string()
        } else {
            let names: Vec<String> = self.methods.iter().map(Method::to_string).collect();
            names.join(", ")
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let returns = match self.handler {
            Handler::Response(_) => "response",
            Handler::Value(_) => "value",
        };
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("methods", &self.methods)
            .field("params", &self.params)
            .field("returns", &returns)
            .finish()
    }
}

pub struct EndpointBuilder {
    path: String,
    methods: BTreeSet<Method>,
    params: Vec<String>,
}

impl EndpointBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.methods.insert(method);
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Declares a required parameter bound from the request.
    pub fn param(mut self, key: &str) -> Self {
        self.params.push(key.to_string());
        self
    }

    /// Finishes with logic that builds its own [`Response`].
    pub fn respond<F>(self, f: F) -> Endpoint
    where
        F: Fn(&mut RequestContext, &Arguments) -> anyhow::Result<Response> + Sync + Send + 'static,
    {
        self.build(Handler::Response(Box::new(f)))
    }

    /// Finishes with logic whose return value is encoded as JSON.
    pub fn returns<T, F>(self, f: F) -> Endpoint
    where
        T: Encode + 'static,
        F: Fn(&mut RequestContext, &Arguments) -> anyhow::Result<T> + Sync + Send + 'static,
    {
        self.build(Handler::Value(Box::new(
            move |ctx: &mut RequestContext<'_>, args: &Arguments| {
                f(ctx, args).map(|v| Box::new(v) as Box<dyn Encode>)
            },
        )))
    }

    fn build(self, handler: Handler) -> Endpoint {
        Endpoint {
            path: self.path,
            methods: self.methods,
            params: self.params,
            handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::status::Status;

    fn endpoint(path: &str, methods: &[Method]) -> Endpoint {
        Endpoint::builder(path)
            .methods(methods.iter().copied())
            .respond(|_, _| Ok(Response::plain(Status::OK, "ok")))
    }

    #[test]
    fn path_is_lowercased() {
        assert_eq!(endpoint("/Hello/World", &[]).path(), "/hello/world");
    }

    #[test]
    fn generic_accepts_any_method() {
        let generic = endpoint("/a", &[]);

        assert!(generic.accepts(&Method::DELETE));
        assert!(generic.is_generic());
    }

    #[test]
    fn specific_accepts_only_its_methods() {
        let get = endpoint("/a", &[Method::GET, Method::HEAD]);

        assert!(get.accepts(&Method::HEAD));
        assert!(!get.accepts(&Method::POST));
        assert_eq!(get.describe_methods(), "GET, HEAD");
    }

    #[test]
    fn conflicts() {
        let generic = endpoint("/a", &[]);
        let get = endpoint("/A", &[Method::GET]);
        let get_post = endpoint("/a", &[Method::GET, Method::POST]);
        let put = endpoint("/a", &[Method::PUT]);

        assert!(generic.conflicts_with(&endpoint("/a", &[])));
        assert!(!generic.conflicts_with(&get));
        assert!(get.conflicts_with(&get_post));
        assert!(!get.conflicts_with(&put));
        assert!(!get.conflicts_with(&endpoint("/b", &[Method::GET])));
        assert!(endpoint("/ÉTÉ", &[]).conflicts_with(&endpoint("/été", &[])));
    }

    #[test]
    fn arguments_by_index_and_name() {
        let args = Arguments::new(vec![("id".to_string(), "7".to_string())]);

        assert_eq!(args.get(0), Ok("7"));
        assert_eq!(args.named("id"), Ok("7"));
        assert_eq!(
            args.get(1),
            Err(ArgumentError::OutOfRange { index: 1, available: 1 })
        );
        assert_eq!(args.named("x"), Err(ArgumentError::Unknown("x".to_string())));
    }
}
