//! gRPC server hosting: listen address parsing, bind, serve until cancelled.
//!
//! Supported listen addresses:
//! - TCP: `"0.0.0.0:50051"`, or `"127.0.0.1:0"` for an ephemeral port
//! - Unix Domain Socket (Unix only): `"uds:///path/to/socket.sock"`
//!
//! The transport is plaintext HTTP/2 with no authentication.

use std::fmt;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::service::Routes;
use tonic::transport::Server;

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenConfig {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Uds(PathBuf),
}

impl FromStr for ListenConfig {
    type Err = anyhow::Error;

    fn from_str(listen_addr: &str) -> Result<Self, Self::Err> {
        if let Some(uds_path) = listen_addr.strip_prefix("uds://") {
            #[cfg(unix)]
            {
                if uds_path.is_empty() {
                    anyhow::bail!("UDS listen_addr has an empty path: '{listen_addr}'");
                }
                return Ok(Self::Uds(PathBuf::from(uds_path)));
            }
            #[cfg(not(unix))]
            {
                let _ = uds_path;
                anyhow::bail!("UDS listen_addr is not supported on this platform: '{listen_addr}'");
            }
        }

        let addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen_addr '{listen_addr}'"))?;
        Ok(Self::Tcp(addr))
    }
}

impl fmt::Display for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "{addr}"),
            #[cfg(unix)]
            Self::Uds(path) => write!(f, "uds://{}", path.display()),
        }
    }
}

/// One-shot notification fired once the listener is bound. Carries the
/// endpoint a client should dial (e.g. `http://127.0.0.1:50051`).
#[derive(Debug)]
pub struct ReadySignal(oneshot::Sender<String>);

impl ReadySignal {
    #[must_use]
    pub fn from_sender(tx: oneshot::Sender<String>) -> Self {
        Self(tx)
    }

    /// Create a signal together with the receiver that observes it.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn notify(self, endpoint: String) {
        if self.0.send(endpoint).is_err() {
            tracing::debug!("ready receiver dropped before bind notification");
        }
    }
}

/// Bind `listen` and serve `routes` until `cancel` fires.
///
/// # Errors
/// Returns an error if binding fails or the server terminates abnormally.
pub async fn serve(
    listen: ListenConfig,
    routes: Routes,
    cancel: CancellationToken,
    ready: ReadySignal,
) -> anyhow::Result<()> {
    match listen {
        ListenConfig::Tcp(addr) => serve_tcp(addr, routes, cancel, ready).await,
        #[cfg(unix)]
        ListenConfig::Uds(path) => serve_uds(path, routes, cancel, ready).await,
    }
}

async fn serve_tcp(
    addr: SocketAddr,
    routes: Routes,
    cancel: CancellationToken,
    ready: ReadySignal,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to listen on {addr}"))?;
    let bound_addr = listener.local_addr()?;
    tracing::info!(
        %bound_addr,
        port = bound_addr.port(),
        transport = "tcp",
        "gRPC server listening"
    );
    ready.notify(format!("http://{bound_addr}"));

    let incoming = TcpListenerStream::new(listener);
    Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await
        .context("failed to serve")?;

    tracing::info!(%bound_addr, "gRPC server stopped");
    Ok(())
}

/// Remove a stale socket file left behind by a previous run.
#[cfg(unix)]
fn prepare_uds_socket_path(path: &std::path::Path) {
    use std::io;

    if !path.exists() {
        return;
    }

    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing UDS socket file before bind");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove existing UDS socket file before bind"
            );
        }
    }
}

#[cfg(unix)]
async fn serve_uds(
    path: PathBuf,
    routes: Routes,
    cancel: CancellationToken,
    ready: ReadySignal,
) -> anyhow::Result<()> {
    use tokio::net::UnixListener;
    use tokio_stream::wrappers::UnixListenerStream;

    prepare_uds_socket_path(&path);

    let uds = UnixListener::bind(&path)
        .with_context(|| format!("failed to listen on UDS '{}'", path.display()))?;
    tracing::info!(path = %path.display(), transport = "uds", "gRPC server listening");
    ready.notify(format!("unix://{}", path.display()));

    let incoming = UnixListenerStream::new(uds);
    Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await
        .context("failed to serve")?;

    Ok(())
}
