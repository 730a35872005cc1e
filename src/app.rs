//! The application factory.

use crate::http::Response;
use crate::router::Router;

/// The greeting returned by `GET /`.
pub const GREETING: &str = "Hello World!";

/// Builds the application's routing table.
///
/// Registers the single route this service exposes, `GET /`, answering
/// `200 OK` with [`GREETING`]. Takes no input and cannot fail; every other
/// method and path falls through to the router's 404.
pub fn app() -> Router {
    let mut router = Router::new();
    router.get("/", |_req| async { Response::text(GREETING) });
    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, StatusCode};

    fn make_request(method: &str, path: &str) -> Request {
        let raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (request, _) = Request::parse(raw.as_bytes()).unwrap();
        request
    }

    #[test]
    fn exactly_one_route() {
        assert_eq!(app().len(), 1);
    }

    #[tokio::test]
    async fn get_root_greets() {
        let response = app().dispatch(make_request("GET", "/")).await;
        assert_eq!(response.status(), StatusCode::Ok);
        let wire = String::from_utf8(response.into_bytes().to_vec()).unwrap();
        assert!(wire.ends_with("\r\n\r\nHello World!"));
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = app().dispatch(make_request("GET", "/greeting")).await;
        assert_eq!(response.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn other_methods_are_not_found() {
        let response = app().dispatch(make_request("POST", "/")).await;
        assert_eq!(response.status(), StatusCode::NotFound);
    }
}
