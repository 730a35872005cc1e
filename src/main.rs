//! Binary entry point: build the application, bind the listener, serve
//! until the process is terminated.

use tracing::info;
use tracing_subscriber::EnvFilter;

use greeter::app;
use greeter::server::{Server, ServerError};

/// The port this server always listens on.
const PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // A bind failure (port already taken) propagates out of main and ends
    // the process with a nonzero exit; there is no retry.
    let server = Server::bind(format!("0.0.0.0:{PORT}")).await?;
    info!("server listening at http://localhost:{PORT}");

    server.serve(app::app()).await
}
