//! Exact-match request routing.
//!
//! [`Router`] maps a request's method and path to a handler registered at
//! startup. Matching is literal: no captures, no wildcards. Trailing
//! slashes are normalized on registration and dispatch, so `/` and `/hello/`
//! style duplicates cannot diverge. A request that matches no route gets the
//! built-in `404 Not Found` response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::http::{Method, Request, Response, StatusCode};

/// Type-erased async handler stored in the routing table.
///
/// Handlers live behind an `Arc` so the table can be shared across the
/// Tokio tasks serving individual connections.
pub type Handler =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Request) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` qualifies through the blanket impl, so route
/// registration accepts plain async closures.
pub trait IntoHandler: Send + Sync + 'static {
    /// Invokes the handler, boxing the returned future.
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(request))
    }
}

// One registered (method, path) -> handler binding.
struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Routing table dispatching requests to registered handlers.
///
/// Routes are evaluated in registration order; the first route whose method
/// and normalized path both match wins.
///
/// # Examples
///
/// ```
/// use greeter::{Response, Router};
///
/// let mut router = Router::new();
/// router.get("/", |_req| async { Response::text("Hello World!") });
/// assert_eq!(router.len(), 1);
/// ```
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty routing table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler for `GET` requests to `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add(Method::Get, path, handler);
    }

    fn add(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        let handler: Handler = Arc::new(move |request| handler.call(request));
        self.routes.push(Route {
            method,
            path: normalize(path).to_owned(),
            handler,
        });
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches `request` to the first matching route.
    ///
    /// When no route matches the request's method and path, returns the
    /// default `404 Not Found` response.
    pub async fn dispatch(&self, request: Request) -> Response {
        let path = normalize(request.path());

        for route in &self.routes {
            if &route.method == request.method() && route.path == path {
                return (route.handler)(request).await;
            }
        }

        Response::new(StatusCode::NotFound)
    }
}

// Strips one trailing slash, except on the root path.
fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
