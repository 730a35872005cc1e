//! # greeter
//!
//! A minimal async HTTP/1.1 server that greets the world.
//!
//! The application is three small pieces: [`app::app`] builds the routing
//! table (a single route, `GET /`), [`server::Server`] owns the TCP listener
//! and connection handling, and the binary entry point wires the two
//! together on port 3000.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use greeter::app;
//! use greeter::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), greeter::ServerError> {
//!     let server = Server::bind("127.0.0.1:3000").await?;
//!     println!("listening on http://127.0.0.1:3000");
//!     server.serve(app::app()).await
//! }
//! ```

pub mod app;
pub mod http;
pub mod router;
pub mod server;

pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
