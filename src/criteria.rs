use base64::prelude::{Engine as _, BASE64_STANDARD};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::Request;

/// Extra conditions a request must satisfy, on top of verb and template, for
/// a route to match.
///
/// Criteria are a containment check: the request must carry every listed
/// header, and may carry any number of others. Empty criteria are satisfied
/// by every request. Header names compare case-insensitively, header values
/// byte-for-byte.
///
/// ### Example
/// ```rust
/// use imposter::{MatchCriteria, Request};
///
/// let criteria = MatchCriteria::new()
///     .header("Accept", "application/json")
///     .bearer_token("s3cr3t");
///
/// let request = Request::new("GET", "https://api.example.com/me")
///     .insert_header("Accept", "application/json")
///     .insert_header("Authorization", "Bearer s3cr3t")
///     .insert_header("User-Agent", "curl/8.0");
///
/// assert!(criteria.matches(&request));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MatchCriteria {
    required: HeaderMap,
    present: Vec<HeaderName>,
}

impl MatchCriteria {
    pub fn new() -> MatchCriteria {
        MatchCriteria::default()
    }

    /// Require a header with this exact value.
    ///
    /// Requiring the same name twice requires both values on the request at
    /// once, in any order.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert into header name.");
        let value = value
            .try_into()
            .expect("Failed to convert into header value.");
        self.required.append(key, value);
        self
    }

    /// Require multiple header key-value pairs at once.
    pub fn headers<K, V, I>(mut self, headers: I) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in headers {
            self = self.header(key, value);
        }
        self
    }

    /// Require a header to be present, with any value.
    pub fn header_exists<K>(mut self, key: K) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
    {
        self.present
            .push(key.try_into().expect("Failed to convert into header name."));
        self
    }

    /// Require basic authentication with these credentials (RFC 7617).
    ///
    /// Shorthand for requiring the `Authorization` header with the encoded
    /// `username:password` pair.
    pub fn basic_auth<U, P>(self, username: U, password: P) -> Self
    where
        U: AsRef<str>,
        P: AsRef<str>,
    {
        let credentials =
            BASE64_STANDARD.encode(format!("{}:{}", username.as_ref(), password.as_ref()));
        self.header("authorization", format!("Basic {}", credentials))
    }

    /// Require a bearer token (RFC 6750).
    ///
    /// Shorthand for requiring the `Authorization` header with value
    /// `Bearer {token}`.
    pub fn bearer_token<T: AsRef<str>>(self, token: T) -> Self {
        self.header("authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Check `request` against every criterion.
    pub fn matches(&self, request: &Request) -> bool {
        request.contains_headers(&self.required)
            && self
                .present
                .iter()
                .all(|name| request.headers.contains_key(name))
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.present.is_empty()
    }
}
