use std::fmt;
use std::sync::Arc;

use http::Method;
use log::debug;

use crate::criteria::MatchCriteria;
use crate::respond::Respond;
use crate::template::{query_params, UrlTemplate};
use crate::{Params, Request};

/// One registered stub: a verb, a template, optional criteria and a
/// responder.
pub(crate) struct Route {
    method: Method,
    template: UrlTemplate,
    criteria: MatchCriteria,
    responder: Arc<dyn Respond>,
}

impl Route {
    /// Match `request` against this route, with `relative_path` already made
    /// relative to the owning host's base URL.
    ///
    /// On a match, returns the merged parameter map for the responder: path
    /// captures first, then the request's flattened query parameters, then
    /// query captures. Later sources win on a name collision, so a query
    /// parameter shadows a path capture of the same name.
    fn matches(&self, request: &Request, relative_path: &str) -> Option<Params> {
        if request.method != self.method {
            return None;
        }
        let mut params = self.template.match_path(relative_path)?;
        let query_captures = self.template.query_values(&request.url)?;
        if !self.criteria.matches(request) {
            return None;
        }
        params.merge(query_params(&request.url));
        params.merge(query_captures);
        Some(params)
    }

    pub(crate) fn responder(&self) -> Arc<dyn Respond> {
        Arc::clone(&self.responder)
    }
}

impl Clone for Route {
    fn clone(&self) -> Route {
        Route {
            method: self.method.clone(),
            template: self.template.clone(),
            criteria: self.criteria.clone(),
            responder: Arc::clone(&self.responder),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.template)
    }
}

/// An ordered collection of stubbed routes for one virtual host.
///
/// Register routes with the verb helpers ([`get`], [`post`], ...), then hand
/// the collection to [`Host::register`] or [`Host::register_as_scoped`] to
/// activate it. Registration order is significant: when an intercepted
/// request could match several routes, the first one registered wins, and
/// nothing warns about the shadowed ones.
///
/// ### Example
/// ```rust
/// use imposter::{Params, Request, ResponseTemplate, Routes};
///
/// let mut routes = Routes::new();
/// routes.get("/users/:id", |_request: &Request, params: &Params| {
///     ResponseTemplate::new(200).set_body_string(format!("user {}", &params["id"]))
/// });
/// routes.post("/users", ResponseTemplate::new(201));
///
/// assert_eq!(routes.len(), 2);
/// ```
///
/// [`get`]: Routes::get
/// [`post`]: Routes::post
/// [`Host::register`]: crate::Host::register
/// [`Host::register_as_scoped`]: crate::Host::register_as_scoped
#[derive(Clone, Default)]
pub struct Routes {
    routes: Vec<Route>,
}

impl Routes {
    pub fn new() -> Routes {
        Routes::default()
    }

    /// Stub `GET` requests whose URL matches `template`.
    ///
    /// `template` is a [`UrlTemplate`] string, relative to the base URL of
    /// the [`Host`] this collection gets registered with; its `:token`
    /// captures are handed to `responder` as [`Params`].
    ///
    /// ### Panics
    ///
    /// When `template` is malformed; see [`UrlTemplate::parse`].
    ///
    /// [`Host`]: crate::Host
    pub fn get<R>(&mut self, template: impl Into<String>, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::GET, template, MatchCriteria::default(), responder);
    }

    /// Stub `GET` requests whose URL matches `template` and which satisfy
    /// `criteria`.
    pub fn get_if<R>(&mut self, template: impl Into<String>, criteria: MatchCriteria, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::GET, template, criteria, responder);
    }

    /// Stub `HEAD` requests whose URL matches `template`.
    pub fn head<R>(&mut self, template: impl Into<String>, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::HEAD, template, MatchCriteria::default(), responder);
    }

    /// Stub `HEAD` requests whose URL matches `template` and which satisfy
    /// `criteria`.
    pub fn head_if<R>(&mut self, template: impl Into<String>, criteria: MatchCriteria, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::HEAD, template, criteria, responder);
    }

    /// Stub `POST` requests whose URL matches `template`.
    pub fn post<R>(&mut self, template: impl Into<String>, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::POST, template, MatchCriteria::default(), responder);
    }

    /// Stub `POST` requests whose URL matches `template` and which satisfy
    /// `criteria`.
    pub fn post_if<R>(&mut self, template: impl Into<String>, criteria: MatchCriteria, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::POST, template, criteria, responder);
    }

    /// Stub `PUT` requests whose URL matches `template`.
    pub fn put<R>(&mut self, template: impl Into<String>, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::PUT, template, MatchCriteria::default(), responder);
    }

    /// Stub `PUT` requests whose URL matches `template` and which satisfy
    /// `criteria`.
    pub fn put_if<R>(&mut self, template: impl Into<String>, criteria: MatchCriteria, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::PUT, template, criteria, responder);
    }

    /// Stub `DELETE` requests whose URL matches `template`.
    pub fn delete<R>(&mut self, template: impl Into<String>, responder: R)
    where
        R: Respond + 'static,
    {
        self.push(Method::DELETE, template, MatchCriteria::default(), responder);
    }

    /// Stub `DELETE` requests whose URL matches `template` and which satisfy
    /// `criteria`.
    pub fn delete_if<R>(
        &mut self,
        template: impl Into<String>,
        criteria: MatchCriteria,
        responder: R,
    ) where
        R: Respond + 'static,
    {
        self.push(Method::DELETE, template, criteria, responder);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn push<R>(
        &mut self,
        method: Method,
        template: impl Into<String>,
        criteria: MatchCriteria,
        responder: R,
    ) where
        R: Respond + 'static,
    {
        self.routes.push(Route {
            method,
            template: UrlTemplate::parse(template.into()),
            criteria,
            responder: Arc::new(responder),
        });
    }

    /// Scan the routes in registration order, returning the first match.
    pub(crate) fn select(&self, request: &Request, relative_path: &str) -> Option<(&Route, Params)> {
        for route in &self.routes {
            if let Some(params) = route.matches(request, relative_path) {
                debug!(
                    "Request `{} {}` matched route `{:?}`",
                    request.method, request.url, route
                );
                return Some((route, params));
            }
        }
        None
    }
}

impl fmt::Debug for Routes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
