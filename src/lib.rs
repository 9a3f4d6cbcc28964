//! `imposter` provides declarative HTTP request stubbing to test HTTP clients
//! against virtual hosts, without a network and without a server.
//!
//! You describe the hosts your code under test talks to, register routes with
//! `:token` captures on them, and plug the resulting [`Interceptor`] into the
//! stubbing layer of your HTTP client. Intercepted requests are answered by
//! the first matching route; everything else stays untouched.
//!
//! # Table of Contents
//! 1. [Getting started](#getting-started)
//! 2. [Route templates](#route-templates)
//! 3. [Match criteria](#match-criteria)
//! 4. [Test isolation](#test-isolation)
//! 5. [Hooking into an HTTP client](#hooking-into-an-http-client)
//! 6. [Prior art](#prior-art)
//!
//! ## Getting started
//! ```rust
//! use imposter::{Host, Interceptor, Params, Request, ResponseTemplate, Routes};
//!
//! // The interceptor is the object your HTTP client's stubbing layer talks to.
//! let interceptor = Interceptor::new();
//!
//! // A virtual host for the API the code under test calls.
//! let host = Host::new("https://api.example.com", &interceptor);
//!
//! // Stub the routes the test needs. `:token`s capture path segments and
//! // query parameter values, merged into the `Params` handed to the closure.
//! let mut routes = Routes::new();
//! routes.get(
//!     "/agencies/:agency_id/stops",
//!     |_request: &Request, params: &Params| {
//!         ResponseTemplate::new(200)
//!             .set_body_json(serde_json::json!({ "agency": &params["agency_id"] }))
//!     },
//! );
//! host.register(routes);
//!
//! // An intercepted request is answered by the first matching route.
//! let request = Request::new("GET", "https://api.example.com/agencies/77/stops");
//! let response = interceptor.dispatch(&request).unwrap();
//! assert_eq!(response.status().as_u16(), 200);
//!
//! // Requests to unstubbed hosts or paths are not handled.
//! let other = Request::new("GET", "https://elsewhere.example.com/agencies/77/stops");
//! assert!(interceptor.dispatch(&other).is_none());
//! ```
//!
//! ## Route templates
//!
//! Routes are registered with the verb helpers on [`Routes`] and are relative
//! to their host's base URL. A template like `/users/:id/widgets?sort=:sort`
//! matches on the path, captures the `:id` segment, and captures the `sort`
//! query parameter when the request carries one. Captures and the request's
//! remaining query parameters are merged into a single [`Params`] map; see
//! [`UrlTemplate`] for the exact matching rules.
//!
//! ## Match criteria
//!
//! When a verb and a template are not selective enough, [`MatchCriteria`]
//! adds header conditions: exact values, plain presence, or the
//! [`basic_auth`] and [`bearer_token`] shorthands. Criteria are a containment
//! check - the request may always carry more headers than the criteria list.
//!
//! ```rust
//! use imposter::{MatchCriteria, ResponseTemplate, Routes};
//!
//! let mut routes = Routes::new();
//! routes.get_if(
//!     "/me",
//!     MatchCriteria::new().bearer_token("s3cr3t"),
//!     ResponseTemplate::new(200),
//! );
//! routes.get("/me", ResponseTemplate::new(401));
//!
//! assert_eq!(routes.len(), 2);
//! ```
//!
//! ## Test isolation
//!
//! [`Host::register`] activates routes until [`Interceptor::reset`] is
//! called. For stubs that must not outlive a test (or a narrower scope
//! within one), [`Host::register_as_scoped`] returns a [`RegistrationGuard`]
//! that deactivates exactly its own routes when dropped - on panic too, since
//! the guard unwinds with the test. Tests that share an interceptor should
//! prefer scoped registrations; leaking a stub into the next test is how
//! "flaky" suites are born.
//!
//! ## Hooking into an HTTP client
//!
//! `imposter` never touches the network: it answers the two questions every
//! interception layer asks. Wire [`Interceptor::handles`] into the hook's
//! "should I stub this request?" predicate and [`Interceptor::dispatch`] into
//! its "what is the response?" callback, converting your client's request
//! type into [`Request`] at the boundary. The returned [`ResponseTemplate`]
//! materializes into an `http::Response` via
//! [`generate_response`](ResponseTemplate::generate_response), or into a
//! simulated [`TransportError`]; [`delay`](ResponseTemplate::delay) tells the
//! hook how long to stall before replying.
//!
//! ## Prior art
//!
//! [`wiremock`], [`mockito`] and [`httpmock`] mock HTTP by running a real
//! server on a local port and pointing the code under test at it. That is
//! the right tool when you can inject the server's URL. `imposter` targets
//! the other setup: the URLs are fixed, production ones and the HTTP client
//! offers an interception seam, so tests stub `https://api.example.com`
//! itself rather than `http://localhost:59321`.
//!
//! [`basic_auth`]: MatchCriteria::basic_auth
//! [`bearer_token`]: MatchCriteria::bearer_token
//! [`wiremock`]: https://docs.rs/wiremock/
//! [`mockito`]: https://docs.rs/mockito/
//! [`httpmock`]: https://docs.rs/httpmock/
mod criteria;
mod guard;
mod host;
mod interceptor;
mod params;
mod request;
mod respond;
mod response_template;
mod routes;
mod template;

pub use criteria::MatchCriteria;
pub use guard::RegistrationGuard;
pub use host::Host;
pub use interceptor::Interceptor;
pub use params::Params;
pub use request::Request;
pub use respond::Respond;
pub use response_template::{ResponseTemplate, TransportError};
pub use routes::Routes;
pub use template::{query_params, UrlTemplate};
