//! request.rs - The request-side seam of the naming pipeline.
//!
//! The core never touches a live servlet or HTTP stack; the host hands it a
//! [`RequestView`] exposing just the four request facts the pipeline needs.
//! [`StaticRequest`] is an owned implementation for hosts that have already
//! extracted those facts, and for tests.
//!
//! License: MIT OR APACHE 2.0

/// A single request cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Read-only view of an incoming request.
///
/// This trait decouples the naming pipeline from any particular HTTP stack.
/// Case-sensitivity of `header` lookups is the implementor's contract;
/// servlet-style hosts are expected to match header names
/// case-insensitively.
pub trait RequestView: Send + Sync {
    /// The request URI (path) to derive the transaction name from.
    fn uri(&self) -> &str;

    /// The value of the named header, if present.
    fn header(&self, name: &str) -> Option<&str>;

    /// All cookies sent with the request, in arrival order.
    fn cookies(&self) -> &[Cookie];

    /// The value of the named query/form parameter, if present.
    fn query_param(&self, name: &str) -> Option<&str>;
}

/// An owned, pre-extracted request view.
///
/// Header lookup is ASCII-case-insensitive, matching servlet `getHeader`
/// semantics.
#[derive(Debug, Default, Clone)]
pub struct StaticRequest {
    uri: String,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie>,
    query_params: Vec<(String, String)>,
}

impl StaticRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }
}

impl RequestView for StaticRequest {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
