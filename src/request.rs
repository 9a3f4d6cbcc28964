use std::fmt;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// An outgoing request captured by an [`Interceptor`] hook.
///
/// Route responders get an immutable reference to the `Request` they matched,
/// so a stub can branch on anything the client actually sent.
///
/// The interception side of an HTTP client usually sees requests in its own
/// representation. Hooks convert once into this type, at the boundary, and
/// everything downstream (scoping, matching, responders) works on it.
///
/// [`Interceptor`]: crate::Interceptor
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

// `imposter` is a crate meant for testing - failures are most likely not handled/temporary mistakes.
// Hence we prefer to panic and provide an easier API than to use `Result`s thus pushing
// the burden of "correctness" (and conversions) on the user.
impl Request {
    /// Build a request from a method and an absolute URL.
    ///
    /// Hooks use this at the interception boundary; tests use it to drive an
    /// [`Interceptor`] directly, without a live client.
    ///
    /// ### Example
    /// ```rust
    /// use imposter::Request;
    ///
    /// let request = Request::new("GET", "https://api.example.com/users/42?sort=name");
    ///
    /// assert_eq!(request.method.as_str(), "GET");
    /// assert_eq!(request.url.path(), "/users/42");
    /// ```
    ///
    /// [`Interceptor`]: crate::Interceptor
    pub fn new<M, U>(method: M, url: U) -> Request
    where
        M: AsRef<str>,
        U: AsRef<str>,
    {
        let method = Method::from_str(&method.as_ref().to_ascii_uppercase())
            .expect("Failed to convert into an HTTP method.");
        let url = url
            .as_ref()
            .parse()
            .expect("Failed to parse the request URL.");
        Request {
            url,
            method,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Insert a header `value` with `key` as header name.
    ///
    /// If values are already present for `key`, they are dropped and replaced
    /// with `value`.
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

    /// Append a header `value` to the list of values with `key` as header name.
    ///
    /// Unlike `insert_header`, values already present for `key` are kept.
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

    /// Set the request body with bytes.
    pub fn set_body_bytes<B>(mut self, body: B) -> Self
    where
        B: TryInto<Vec<u8>>,
        <B as TryInto<Vec<u8>>>::Error: std::fmt::Debug,
    {
        self.body = body.try_into().expect("Failed to convert into body.");
        self
    }

    /// Set the request body from a JSON-serializable value.
    ///
    /// It sets "Content-Type" to "application/json".
    pub fn set_body_json<B: Serialize>(mut self, body: B) -> Self {
        self.body = serde_json::to_vec(&body).expect("Failed to convert into body.");
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self
    }

    /// Deserialize the request body as JSON.
    pub fn body_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Check that every `(name, value)` pair in `expected` is present among
    /// this request's headers.
    ///
    /// The request may carry any number of additional headers, and additional
    /// values for the listed names; they do not affect the outcome. An empty
    /// `expected` map is satisfied by every request. Header names compare
    /// case-insensitively (they are normalized by [`http::HeaderMap`]), header
    /// values compare byte-for-byte.
    ///
    /// ### Example
    /// ```rust
    /// use http::HeaderMap;
    /// use imposter::Request;
    ///
    /// let request = Request::new("GET", "https://api.example.com/me")
    ///     .insert_header("Authorization", "Bearer s3cr3t")
    ///     .insert_header("Accept", "application/json");
    ///
    /// let mut expected = HeaderMap::new();
    /// expected.insert("authorization", "Bearer s3cr3t".parse().unwrap());
    ///
    /// assert!(request.contains_headers(&expected));
    /// ```
    pub fn contains_headers(&self, expected: &HeaderMap) -> bool {
        expected.iter().all(|(name, value)| {
            self.headers
                .get_all(name)
                .iter()
                .any(|candidate| candidate == value)
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        for name in self.headers.keys() {
            let values = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>();
            writeln!(f, "{}: {}", name, values.join(","))?;
        }

        if self.body.is_empty() {
            Ok(())
        } else if let Ok(body) = std::str::from_utf8(&self.body) {
            writeln!(f, "{}", body)
        } else {
            writeln!(
                f,
                "Body is likely binary (invalid utf-8) size is {} bytes",
                self.body.len()
            )
        }
    }
}
