use url::Url;

use crate::guard::RegistrationGuard;
use crate::interceptor::Interceptor;
use crate::routes::Routes;

/// A virtual host: a base URL plus the [`Interceptor`] that stands in for it.
///
/// Routes never mention scheme, host or port; a `Host` supplies them. When a
/// request comes in, the host's base URL decides whether the request is in
/// scope at all, and if so which part of its path the route templates see:
///
/// - scheme, host and port must be equal (default ports count, so
///   `https://api.example.com` and `https://api.example.com:443` are the same
///   authority);
/// - the request path must extend the base URL's path on a segment boundary.
///   With base `https://api.example.com/v2`, a request for `/v2/stops` is
///   matched against the templates as `/stops`, while `/v2stops` and
///   `/v3/stops` are out of scope.
///
/// A `Host` is cheap to create and holds no routes itself; it is a handle
/// for registering route collections with its interceptor.
///
/// ### Example
/// ```rust
/// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};
///
/// // Arrange
/// let interceptor = Interceptor::new();
/// let host = Host::new("https://api.example.com/v2", &interceptor);
///
/// let mut routes = Routes::new();
/// routes.get("/stops", ResponseTemplate::new(200));
/// host.register(routes);
///
/// // Act
/// let request = Request::new("GET", "https://api.example.com/v2/stops");
///
/// // Assert
/// assert!(interceptor.handles(&request));
/// ```
pub struct Host {
    base_url: Url,
    interceptor: Interceptor,
}

impl Host {
    /// Bind a base URL to `interceptor`.
    ///
    /// ### Panics
    ///
    /// The base URL is test configuration, so a bad one panics:
    /// - it does not parse as an absolute URL;
    /// - its scheme is not `http` or `https`;
    /// - it carries a query or a fragment.
    pub fn new<U: AsRef<str>>(base_url: U, interceptor: &Interceptor) -> Host {
        let base_url: Url = base_url
            .as_ref()
            .parse()
            .expect("Failed to parse the base URL.");
        if !matches!(base_url.scheme(), "http" | "https") {
            panic!(
                "Failed to create a host for `{}`: only http and https base URLs can be stubbed.",
                base_url
            );
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            panic!(
                "Failed to create a host for `{}`: a base URL cannot carry a query or a fragment.",
                base_url
            );
        }
        Host {
            base_url,
            interceptor: interceptor.clone(),
        }
    }

    /// The base URL this host was created with.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Activate `routes` under this host's base URL.
    ///
    /// The registration stays active until [`Interceptor::reset`] is called.
    /// Registering twice on the same host appends a second, independent
    /// registration; the earlier one keeps priority.
    ///
    /// [`Interceptor::reset`]: crate::Interceptor::reset
    pub fn register(&self, routes: Routes) {
        self.interceptor.register(self.base_url.clone(), routes);
    }

    /// Activate `routes` under this host's base URL, for as long as the
    /// returned guard is alive.
    ///
    /// Dropping the guard removes exactly this registration, which makes it
    /// the right tool for stubs that must not leak into the next test:
    ///
    /// ```rust
    /// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};
    ///
    /// let interceptor = Interceptor::new();
    /// let host = Host::new("https://api.example.com", &interceptor);
    ///
    /// let mut routes = Routes::new();
    /// routes.get("/ping", ResponseTemplate::new(200));
    /// let guard = host.register_as_scoped(routes);
    ///
    /// let request = Request::new("GET", "https://api.example.com/ping");
    /// assert!(interceptor.handles(&request));
    ///
    /// drop(guard);
    /// assert!(!interceptor.handles(&request));
    /// ```
    pub fn register_as_scoped(&self, routes: Routes) -> RegistrationGuard {
        let id = self.interceptor.register(self.base_url.clone(), routes);
        self.interceptor.guard(id)
    }
}

/// The path of `url` relative to `base`, when `url` is in `base`'s scope.
///
/// `None` when the authorities differ or the path does not extend the base
/// path on a segment boundary. A request for the base URL itself comes back
/// as `/`.
pub(crate) fn scoped_path<'u>(base: &Url, url: &'u Url) -> Option<&'u str> {
    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return None;
    }

    // Base paths `/v2` and `/v2/` scope the same requests.
    let base_path = base.path();
    let base_path = base_path.strip_suffix('/').unwrap_or(base_path);
    if base_path.is_empty() {
        return Some(url.path());
    }
    match url.path().strip_prefix(base_path) {
        Some("") => Some("/"),
        Some(rest) if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}
