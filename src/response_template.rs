use std::convert::TryInto;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

/// A simulated transport-level failure.
///
/// Stubbing one of these instead of an HTTP response exercises the error
/// paths of the client under test: the request never "reaches" the virtual
/// host, it fails the way a socket would.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("connection reset by peer")]
    ConnectionReset,
    #[error("request timed out")]
    TimedOut,
}

/// The blueprint for the stubbed response returned when a route in [`Routes`]
/// matches an intercepted request.
///
/// [`Routes`]: crate::Routes
#[derive(Clone, Debug)]
pub struct ResponseTemplate {
    mime: String,
    status_code: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    delay: Option<Duration>,
    error: Option<TransportError>,
}

// `imposter` is a crate meant for testing - failures are most likely not handled/temporary mistakes.
// Hence we prefer to panic and provide an easier API than to use `Result`s thus pushing
// the burden of "correctness" (and conversions) on the user.
//
// All methods try to accept the widest possible set of inputs and then perform the fallible conversion
// internally, bailing if the fallible conversion fails.
//
// Same principle applies to allocation/cloning, freely used where convenient.
impl ResponseTemplate {
    /// Start building a `ResponseTemplate` specifying the status code of the response.
    pub fn new<S>(s: S) -> Self
    where
        S: TryInto<StatusCode>,
        <S as TryInto<StatusCode>>::Error: std::fmt::Debug,
    {
        let status_code = s.try_into().expect("Failed to convert into status code.");
        Self {
            status_code,
            headers: HeaderMap::new(),
            mime: String::new(),
            body: None,
            delay: None,
            error: None,
        }
    }

    /// Build a template that stands in for a transport failure instead of an
    /// HTTP response.
    ///
    /// The template carries no status, headers or body;
    /// [`generate_response`](#method.generate_response) returns the error and
    /// hooks should surface it to the client as the corresponding network
    /// failure.
    ///
    /// ### Example
    /// ```rust
    /// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes, TransportError};
    ///
    /// // Arrange
    /// let interceptor = Interceptor::new();
    /// let host = Host::new("https://api.example.com", &interceptor);
    ///
    /// let mut routes = Routes::new();
    /// routes.get("/flaky", ResponseTemplate::network_error(TransportError::TimedOut));
    /// host.register(routes);
    ///
    /// // Act
    /// let request = Request::new("GET", "https://api.example.com/flaky");
    /// let response = interceptor.dispatch(&request).unwrap();
    ///
    /// // Assert
    /// assert_eq!(response.error(), Some(TransportError::TimedOut));
    /// assert!(response.generate_response().is_err());
    /// ```
    pub fn network_error(error: TransportError) -> Self {
        Self {
            // Placeholder, never surfaced: `generate_response` bails first.
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            headers: HeaderMap::new(),
            mime: String::new(),
            body: None,
            delay: None,
            error: Some(error),
        }
    }

    /// Append a header `value` to list of headers with `key` as header name.
    ///
    /// Unlike `insert_header`, this function will not override the contents of a header:
    /// - if there are no header values with `key` as header name, it will insert one;
    /// - if there are already some values with `key` as header name, it will append to the
    ///   existing list.
    pub fn append_header<K, V>(mut self, key: K, value: V) -> Self
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
        self.headers.append(key, value);
        self
    }

    /// Insert a header `value` with `key` as header name.
    ///
    /// This function will override the contents of a header:
    /// - if there are no header values with `key` as header name, it will insert one;
    /// - if there are already some values with `key` as header name, it will drop them and
    ///   start a new list of header values, containing only `value`.
    ///
    /// ### Example:
    /// ```rust
    /// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};
    ///
    /// // Arrange
    /// let interceptor = Interceptor::new();
    /// let host = Host::new("https://api.example.com", &interceptor);
    /// let correlation_id = "1311db4f-fe65-4cb2-b514-1bb47f781aa7";
    ///
    /// let mut routes = Routes::new();
    /// routes.get(
    ///     "/hello",
    ///     ResponseTemplate::new(200).insert_header("X-Correlation-ID", correlation_id),
    /// );
    /// host.register(routes);
    ///
    /// // Act
    /// let request = Request::new("GET", "https://api.example.com/hello");
    /// let response = interceptor.dispatch(&request).unwrap();
    ///
    /// // Assert
    /// assert_eq!(
    ///     response.headers().get("X-Correlation-ID").unwrap().to_str().unwrap(),
    ///     correlation_id
    /// );
    /// ```
    pub fn insert_header<K, V>(mut self, key: K, value: V) -> Self
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
        self.headers.insert(key, value);
        self
    }

    /// Append multiple header key-value pairs.
    ///
    /// Existing header values will not be overridden.
    pub fn append_headers<K, V, I>(mut self, headers: I) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
        I: IntoIterator<Item = (K, V)>,
    {
        let headers = headers.into_iter().map(|(key, value)| {
            (
                key.try_into().expect("Failed to convert into header name."),
                value
                    .try_into()
                    .expect("Failed to convert into header value."),
            )
        });
        // The `Extend<(HeaderName, T)>` impl uses `HeaderMap::append` internally: https://docs.rs/http/1.0.0/src/http/header/map.rs.html#1953
        self.headers.extend(headers);
        self
    }

    /// Set the response body with bytes.
    ///
    /// No "Content-Type" is set. Use [`set_body_raw`](#method.set_body_raw)
    /// to pair bytes with a mime type.
    pub fn set_body_bytes<B>(mut self, body: B) -> Self
    where
        B: TryInto<Vec<u8>>,
        <B as TryInto<Vec<u8>>>::Error: std::fmt::Debug,
    {
        let body = body.try_into().expect("Failed to convert into body.");
        self.body = Some(body);
        self
    }

    /// Set the response body from a JSON-serializable value.
    ///
    /// It sets "Content-Type" to "application/json".
    pub fn set_body_json<B: Serialize>(mut self, body: B) -> Self {
        let body = serde_json::to_vec(&body).expect("Failed to convert into body.");

        self.body = Some(body);
        self.mime = "application/json".to_string();
        self
    }

    /// Set the response body to a string.
    ///
    /// It sets "Content-Type" to "text/plain".
    pub fn set_body_string<T>(mut self, body: T) -> Self
    where
        T: TryInto<String>,
        <T as TryInto<String>>::Error: std::fmt::Debug,
    {
        let body = body.try_into().expect("Failed to convert into body.");

        self.body = Some(body.into_bytes());
        self.mime = "text/plain".to_string();
        self
    }

    /// Set a raw response body. The mime type needs to be set because the
    /// raw body could be of any type.
    ///
    /// ### Example:
    /// ```rust
    /// use imposter::ResponseTemplate;
    ///
    /// mod external {
    ///     // This could be a method of a struct that is
    ///     // implemented in another crate and the struct
    ///     // does not implement Serialize.
    ///     pub fn body() -> Vec<u8> {
    ///         r#"{"hello": "world"}"#.as_bytes().to_owned()
    ///     }
    /// }
    ///
    /// let template = ResponseTemplate::new(200).set_body_raw(
    ///     external::body(),
    ///     "application/json"
    /// );
    /// let response = template.generate_response().unwrap();
    ///
    /// assert_eq!(response.headers()["content-type"], "application/json");
    /// assert_eq!(response.body().as_slice(), r#"{"hello": "world"}"#.as_bytes());
    /// ```
    pub fn set_body_raw<B>(mut self, body: B, mime: &str) -> Self
    where
        B: TryInto<Vec<u8>>,
        <B as TryInto<Vec<u8>>>::Error: std::fmt::Debug,
    {
        let body = body.try_into().expect("Failed to convert into body.");
        self.body = Some(body);
        self.mime = mime.to_string();
        self
    }

    /// Ask the hook delivering this response to wait before doing so.
    ///
    /// Stubbed responses otherwise arrive as fast as possible. An artificial
    /// delay simulates the latency of a real server; in particular, you can
    /// use it to test the behaviour of your timeout policies.
    ///
    /// How the wait happens is up to the interception layer (a timer, a
    /// scheduler hook); the template only records the requested duration,
    /// exposed through [`delay`](#method.delay).
    pub fn set_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);

        self
    }

    /// The status code of the stubbed response.
    pub fn status(&self) -> StatusCode {
        self.status_code
    }

    /// The headers of the stubbed response, not including the computed
    /// "Content-Type".
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body of the stubbed response, when one was set.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The mime type of the stubbed response, when one was set.
    pub fn mime(&self) -> Option<&str> {
        if self.mime.is_empty() {
            None
        } else {
            Some(&self.mime)
        }
    }

    /// The artificial delay requested via [`set_delay`](#method.set_delay).
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// The transport failure this template stands in for, if built with
    /// [`network_error`](#method.network_error).
    pub fn error(&self) -> Option<TransportError> {
        self.error
    }

    /// Generate a response from the template.
    ///
    /// Hooks call this to materialize the `http::Response` handed back to the
    /// client. Templates built with
    /// [`network_error`](#method.network_error) return the error instead.
    pub fn generate_response(&self) -> Result<Response<Vec<u8>>, TransportError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut response = Response::builder().status(self.status_code);

        let mut headers = self.headers.clone();
        // Set content-type, if needed
        if !self.mime.is_empty() {
            headers.insert(
                http::header::CONTENT_TYPE,
                self.mime
                    .parse()
                    .expect("Failed to convert into header value."),
            );
        }
        *response.headers_mut().unwrap() = headers;

        let body = self.body.clone().unwrap_or_default();
        Ok(response
            .body(body)
            .expect("Failed to generate the response."))
    }
}
