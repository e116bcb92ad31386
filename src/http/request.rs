use crate::http::cookie::Cookie;
use crate::http::method::Method;
use crate::http::params::Params;
use std::borrow::Cow;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Context handed to every endpoint as its first argument.
#[derive(Debug)]
pub struct RequestContext<'a> {
    request: &'a Request,
    params: Params,
    set_cookies: Vec<Cookie>,
}

impl<'a> RequestContext<'a> {
    /// Merges the request's body, query and cookie parameters.
    pub fn new(request: &'a Request) -> RequestContext<'a> {
        let params = Params::merge(
            Params::from_body(&request.content),
            Params::from_query(request.query()),
            Params::from_cookies(request.get_header("cookie")),
        );

        RequestContext {
            request,
            params,
            set_cookies: Vec::new(),
        }
    }

    pub fn param(&self, k: &str) -> Option<&str> {
        self.params.get(k)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.request.get_header(k)
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        Params::from_cookies(self.request.get_header("cookie"))
            .get(name)
            .map(String::from)
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.request.remote_addr
    }

    pub fn query(&self) -> Option<&str> {
        self.request.query()
    }

    pub fn body(&self) -> &[u8] {
        &self.request.content
    }

    pub fn request(&self) -> &Request {
        self.request
    }

    pub fn set_cookie(&mut self, cookie: Cookie) {
        self.set_cookies.push(cookie);
    }

    pub fn remove_cookie(&mut self, name: &str) {
        self.set_cookies.push(Cookie::expired(name));
    }

    pub(crate) fn into_cookies(self) -> Vec<Cookie> {
        self.set_cookies
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub content: Vec<u8>,
    pub remote_addr: Option<SocketAddr>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Request {
        Request {
            method,
            url: url.into(),
            headers: HashMap::new(),
            content: Vec::new(),
            remote_addr: None,
        }
    }

    pub fn with_header(mut self, k: &str, v: impl Into<String>) -> Request {
        self.headers.insert(k.to_lowercase(), v.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Request {
        self.content = content.into();
        self
    }

    pub fn get_header(&self, k: &str) -> Option<&str> {
        self.headers.get(&k.to_lowercase()).map(|v| v.as_str())
    }

    /// Percent-decoded path without the query string.
    pub fn path(&self) -> Cow<'_, str> {
        let raw = self.url.split_once('?').map_or(self.url.as_str(), |(p, _)| p);
        urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
    }

    /// Raw query string, if the target has a non-empty one.
    pub fn query(&self) -> Option<&str> {
        self.url
            .split_once('?')
            .map(|(_, q)| q)
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        let request = Request::new(Method::GET, "/a%20b/c?x=1&y");

        assert_eq!(request.path(), "/a b/c");
        assert_eq!(request.query(), Some("x=1&y"));
    }

    #[test]
    fn empty_query_is_none() {
        assert_eq!(Request::new(Method::GET, "/a?").query(), None);
        assert_eq!(Request::new(Method::GET, "/a").query(), None);
    }

    #[test]
    fn context_merges_all_sources() {
        let request = Request::new(Method::POST, "/x?id=query&q=1")
            .with_header("Cookie", "id=cookie; c=2")
            .with_content("id=body&b=3");

        let ctx = RequestContext::new(&request);

        assert_eq!(ctx.param("id"), Some("cookie"));
        assert_eq!(ctx.param("q"), Some("1"));
        assert_eq!(ctx.param("b"), Some("3"));
        assert_eq!(ctx.param("c"), Some("2"));
        assert_eq!(ctx.cookie("c").as_deref(), Some("2"));
    }

    #[test]
    fn collects_cookies_to_set() {
        let request = Request::new(Method::GET, "/");
        let mut ctx = RequestContext::new(&request);

        ctx.set_cookie(Cookie::new("a", "1"));
        ctx.remove_cookie("b");

        let cookies = ctx.into_cookies();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[1].to_string(), "b=; Max-Age=0");
    }
}
