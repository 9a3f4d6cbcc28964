use crate::{Params, Request, ResponseTemplate};

/// Anything that implements `Respond` can be registered as the reply half of
/// a route in [`Routes`].
///
/// ## Fixed responses
///
/// The simplest `Respond` is [`ResponseTemplate`]: no matter the request, it
/// will always return itself.
///
/// ```rust
/// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};
///
/// // Arrange
/// let interceptor = Interceptor::new();
/// let host = Host::new("https://api.example.com", &interceptor);
///
/// let mut routes = Routes::new();
/// routes.get("/health", ResponseTemplate::new(204));
/// host.register(routes);
///
/// // Act
/// let request = Request::new("GET", "https://api.example.com/health");
/// let response = interceptor.dispatch(&request).unwrap();
///
/// // Assert
/// assert_eq!(response.status().as_u16(), 204);
/// ```
///
/// ## Dynamic responses
///
/// Closures taking the matched request and its [`Params`] implement `Respond`,
/// which covers most dynamic stubs:
///
/// ```rust
/// use imposter::{Host, Interceptor, Params, Request, ResponseTemplate, Routes};
///
/// // Arrange
/// let interceptor = Interceptor::new();
/// let host = Host::new("https://api.example.com", &interceptor);
///
/// let mut routes = Routes::new();
/// routes.get("/users/:id", |_request: &Request, params: &Params| {
///     ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": &params["id"] }))
/// });
/// host.register(routes);
///
/// // Act
/// let request = Request::new("GET", "https://api.example.com/users/42");
/// let response = interceptor.dispatch(&request).unwrap();
///
/// // Assert
/// assert_eq!(response.body(), Some(br#"{"id":"42"}"#.as_slice()));
/// ```
///
/// For responders with state or behaviour that a closure expresses poorly,
/// implement the trait on your own type. You could, for example, propagate a
/// request header back in the response:
///
/// ```rust
/// use imposter::{Params, Request, Respond, ResponseTemplate};
///
/// /// Responds with the wrapped `ResponseTemplate`, dynamically populating
/// /// the `X-Correlation-Id` header from the request data.
/// pub struct CorrelationIdResponder(pub ResponseTemplate);
///
/// impl Respond for CorrelationIdResponder {
///     fn respond(&self, request: &Request, _params: &Params) -> ResponseTemplate {
///         let mut response_template = self.0.clone();
///         if let Some(correlation_id) = request.headers.get("x-correlation-id") {
///             response_template = response_template.insert_header(
///                 "x-correlation-id",
///                 correlation_id.clone(),
///             );
///         }
///         response_template
///     }
/// }
/// ```
///
/// [`Routes`]: crate::Routes
/// [`ResponseTemplate`]: crate::ResponseTemplate
/// [`Params`]: crate::Params
pub trait Respond: Send + Sync {
    /// Given the matched [`Request`] and the [`Params`] captured while
    /// matching it, return a [`ResponseTemplate`] to use as the blueprint for
    /// the stubbed response.
    ///
    /// `params` merges the template's path captures with the request's query
    /// parameters; on a name collision the query value wins.
    ///
    /// [`Request`]: crate::Request
    /// [`Params`]: crate::Params
    /// [`ResponseTemplate`]: crate::ResponseTemplate
    fn respond(&self, request: &Request, params: &Params) -> ResponseTemplate;
}

impl<F> Respond for F
where
    F: Send + Sync + Fn(&Request, &Params) -> ResponseTemplate,
{
    fn respond(&self, request: &Request, params: &Params) -> ResponseTemplate {
        self(request, params)
    }
}

impl Respond for ResponseTemplate {
    fn respond(&self, _request: &Request, _params: &Params) -> ResponseTemplate {
        self.clone()
    }
}
