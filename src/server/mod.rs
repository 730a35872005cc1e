//! Async TCP connection layer on Tokio.
//!
//! Accepts connections and feeds each request through the application's
//! [`Router`]. HTTP/1.1 persistent connections are honored, so one
//! connection may carry many requests.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::http::{Request, RequestError, Response, StatusCode};
use crate::router::Router;

/// Errors surfaced by the connection layer.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Upper bound on the bytes buffered for a single request (8 MiB).
const MAX_REQUEST_BYTES: usize = 8 * 1024 * 1024;

/// Starting capacity of each connection's read buffer.
const READ_BUF_CAPACITY: usize = 4096;

/// The listening half of the server.
///
/// Bind first, then hand the application's router to [`serve`](Self::serve).
/// Binding and serving are split so callers (the binary, the tests) can
/// observe the bound address before traffic starts.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address cannot be bound, for
    /// example because the port is already in use. Callers are expected to
    /// treat this as fatal; there is no retry.
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_owned(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections forever, dispatching every request through `app`.
    ///
    /// Each connection is served on its own Tokio task; the router is shared
    /// across tasks behind an [`Arc`]. Accept errors are logged and the loop
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] only if the listener itself fails
    /// irrecoverably.
    pub async fn serve(self, app: Router) -> Result<(), ServerError> {
        let app = Arc::new(app);
        info!(address = %self.local_addr, routes = app.len(), "listening");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(%peer, "connection accepted");
            let app = Arc::clone(&app);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer, app).await {
                    warn!(%peer, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Serves one TCP connection for its whole lifetime.
///
/// Requests are read into a growing buffer and dispatched one at a time
/// until the peer closes the connection or signals `Connection: close`.
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    app: Arc<Router>,
) -> Result<(), std::io::Error> {
    let mut buf = BytesMut::with_capacity(READ_BUF_CAPACITY);

    loop {
        // Accumulate bytes until a full request (head plus declared body)
        // is buffered.
        let (request, consumed) = loop {
            match Request::parse(&buf) {
                Ok((request, body_offset)) => {
                    let total = body_offset + request.content_length().unwrap_or(0);
                    if buf.len() >= total {
                        break (request, total);
                    }
                    // Head is parsed but the body is still in flight.
                }
                Err(RequestError::Incomplete) => {}
                Err(e) => {
                    warn!(%peer, error = %e, "malformed request");
                    let reply = Response::new(StatusCode::BadRequest)
                        .body(e.to_string())
                        .keep_alive(false);
                    stream.write_all(&reply.into_bytes()).await?;
                    return Ok(());
                }
            }

            if buf.len() > MAX_REQUEST_BYTES {
                warn!(%peer, bytes = buf.len(), "request too large");
                let reply = Response::new(StatusCode::PayloadTooLarge)
                    .body("request entity too large")
                    .keep_alive(false);
                stream.write_all(&reply.into_bytes()).await?;
                return Ok(());
            }

            if stream.read_buf(&mut buf).await? == 0 {
                debug!(%peer, "connection closed by peer");
                return Ok(());
            }
        };

        let keep_alive = request.is_keep_alive();
        let method = request.method().to_string();
        let path = request.path().to_owned();
        let started = Instant::now();

        let response = app.dispatch(request).await.keep_alive(keep_alive);
        let status = response.status().as_u16();

        stream.write_all(&response.into_bytes()).await?;
        stream.flush().await?;

        info!(
            %peer,
            %method,
            %path,
            status,
            elapsed = ?started.elapsed(),
            "request handled"
        );

        let _ = buf.split_to(consumed);

        if !keep_alive {
            debug!(%peer, "connection close requested");
            return Ok(());
        }
    }
}
