use std::sync::{Arc, RwLock};

use crate::interceptor::{InterceptorState, RegistrationId};

/// A registration that deactivates itself when dropped.
///
/// Returned by [`Host::register_as_scoped`]: the routes stay active for as
/// long as the guard is alive, and are removed from the interceptor when it
/// goes out of scope. No other registration is touched, so narrow scopes can
/// see through to stubs installed by a wider one.
///
/// ### Example
/// ```rust
/// use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};
///
/// let interceptor = Interceptor::new();
/// let host = Host::new("https://api.example.com", &interceptor);
/// let request = Request::new("GET", "https://api.example.com/ping");
///
/// {
///     let mut routes = Routes::new();
///     routes.get("/ping", ResponseTemplate::new(200));
///     let _guard = host.register_as_scoped(routes);
///     assert!(interceptor.handles(&request));
/// }
///
/// // The guard is gone, and so are its routes.
/// assert!(!interceptor.handles(&request));
/// ```
///
/// [`Host::register_as_scoped`]: crate::Host::register_as_scoped
#[must_use = "the routes are deactivated as soon as the guard is dropped"]
pub struct RegistrationGuard {
    id: RegistrationId,
    state: Arc<RwLock<InterceptorState>>,
}

impl RegistrationGuard {
    pub(crate) fn new(id: RegistrationId, state: Arc<RwLock<InterceptorState>>) -> Self {
        RegistrationGuard { id, state }
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        // A poisoned lock means another test thread panicked mid-write; skip
        // the teardown rather than panic inside an unwind.
        if let Ok(mut state) = self.state.write() {
            state.deactivate(self.id);
        }
    }
}
