use std::sync::{Arc, RwLock};

use log::debug;
use url::Url;

use crate::guard::RegistrationGuard;
use crate::host::scoped_path;
use crate::routes::{Route, Routes};
use crate::{Params, Request, ResponseTemplate};

/// Identifier of an active registration, handed out at registration time and
/// used to deactivate it later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RegistrationId(usize);

/// A route collection bound to the base URL it was registered under.
pub(crate) struct Registration {
    id: RegistrationId,
    base_url: Url,
    routes: Routes,
}

impl Registration {
    fn select(&self, request: &Request) -> Option<(&Route, Params)> {
        let relative_path = scoped_path(&self.base_url, &request.url)?;
        self.routes.select(request, relative_path)
    }
}

/// The table of active registrations behind an [`Interceptor`] and its
/// clones.
#[derive(Default)]
pub(crate) struct InterceptorState {
    registrations: Vec<Registration>,
    next_id: usize,
}

impl InterceptorState {
    fn register(&mut self, base_url: Url, routes: Routes) -> RegistrationId {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            base_url,
            routes,
        });
        id
    }

    pub(crate) fn deactivate(&mut self, id: RegistrationId) {
        self.registrations.retain(|registration| registration.id != id);
    }
}

/// The integration point between stubbed routes and the HTTP client's
/// interception layer.
///
/// An `Interceptor` holds every active registration and answers the two
/// questions an interception hook asks about an outgoing request: *should I
/// take this one over?* ([`handles`]) and *what do I reply?* ([`dispatch`]).
/// How requests are actually diverted is the hook's business; the
/// interceptor itself never touches the network.
///
/// Registrations are added through a [`Host`] bound to this interceptor.
/// They are consulted in registration order: the first one whose base URL
/// scopes the request *and* whose routes contain a match supplies the
/// response. A registration whose base URL matches but whose routes do not is
/// skipped, so overlapping hosts fall through to later ones.
///
/// Cloning an `Interceptor` is cheap and every clone shares the same
/// registration table, so a hook can keep its own handle.
///
/// ### Example
/// ```rust
/// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};
///
/// // Arrange
/// let interceptor = Interceptor::new();
/// let host = Host::new("https://api.example.com", &interceptor);
///
/// let mut routes = Routes::new();
/// routes.get("/ping", ResponseTemplate::new(200));
/// host.register(routes);
///
/// // Act
/// let stubbed = Request::new("GET", "https://api.example.com/ping");
/// let foreign = Request::new("GET", "https://elsewhere.example.com/ping");
///
/// // Assert
/// assert!(interceptor.handles(&stubbed));
/// assert!(!interceptor.handles(&foreign));
/// ```
///
/// [`handles`]: Interceptor::handles
/// [`dispatch`]: Interceptor::dispatch
/// [`Host`]: crate::Host
#[derive(Clone, Default)]
pub struct Interceptor {
    state: Arc<RwLock<InterceptorState>>,
}

impl Interceptor {
    pub fn new() -> Interceptor {
        Interceptor::default()
    }

    /// Would [`dispatch`](Interceptor::dispatch) produce a response for
    /// `request`?
    ///
    /// Hooks use this as the predicate half of interception: a `true` means
    /// the request must not reach the network.
    pub fn handles(&self, request: &Request) -> bool {
        let state = self.state.read().expect("Poisoned lock!");
        state
            .registrations
            .iter()
            .any(|registration| registration.select(request).is_some())
    }

    /// Produce the stubbed response for `request`, if any route matches.
    ///
    /// Registrations are scanned in registration order, and within each one
    /// routes are scanned in their own registration order; the first match
    /// wins and its responder is invoked with the merged [`Params`]. `None`
    /// means no active route matched and the hook should let the request
    /// through (or fail it, depending on the test setup's policy).
    pub fn dispatch(&self, request: &Request) -> Option<ResponseTemplate> {
        let state = self.state.read().expect("Poisoned lock!");
        let selected = state.registrations.iter().find_map(|registration| {
            registration
                .select(request)
                .map(|(route, params)| (route.responder(), params))
        });
        // Release the lock before invoking the responder, so a responder
        // that inspects the interceptor does not deadlock.
        drop(state);

        match selected {
            Some((responder, params)) => Some(responder.respond(request, &params)),
            None => {
                debug!("No stubbed route matched the request:\n{}", request);
                None
            }
        }
    }

    /// Deactivate every registration, from every host bound to this
    /// interceptor.
    ///
    /// Guards returned by [`Host::register_as_scoped`] stay valid: their
    /// registration is simply gone already when they drop.
    ///
    /// [`Host::register_as_scoped`]: crate::Host::register_as_scoped
    pub fn reset(&self) {
        self.state
            .write()
            .expect("Poisoned lock!")
            .registrations
            .clear();
    }

    pub(crate) fn register(&self, base_url: Url, routes: Routes) -> RegistrationId {
        self.state
            .write()
            .expect("Poisoned lock!")
            .register(base_url, routes)
    }

    pub(crate) fn guard(&self, id: RegistrationId) -> RegistrationGuard {
        RegistrationGuard::new(id, Arc::clone(&self.state))
    }
}
