//! Deadline helper for unary gRPC calls.
//!
//! [`call_with_deadline`] attaches the deadline to the outgoing request as the
//! `grpc-timeout` header and also enforces it locally, so a stalled server
//! or a lost response still fails the call on time. Expiry is reported as
//! [`tonic::Code::DeadlineExceeded`]. The call is made exactly once.
//!
//! ## Example
//!
//! ```ignore
//! use greeter_transport_grpc::deadline::call_with_deadline;
//!
//! let resp = call_with_deadline(
//!     client.clone(),
//!     Duration::from_secs(2),
//!     SayHelloRequest { name: "World".into() },
//!     |mut c, r| async move { c.say_hello(r).await.map(tonic::Response::into_inner) },
//!     "greeter.say_hello",
//! )
//! .await?;
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use tonic::{Code, Request, Status};
use tracing::Instrument;

use crate::client::duration_to_u64_ms;

/// Wrap `msg` in a request carrying `deadline` as its `grpc-timeout`.
pub fn request_with_deadline<T>(msg: T, deadline: Duration) -> Request<T> {
    let mut request = Request::new(msg);
    request.set_timeout(deadline);
    request
}

/// Perform one unary call bounded by `deadline`.
///
/// The client is taken by value; tonic clients are cheap to clone and the
/// returned future must own it.
///
/// # Errors
/// Returns the server's `Status` unchanged, or `DEADLINE_EXCEEDED` if the
/// deadline elapses before a response arrives.
pub async fn call_with_deadline<TClient, F, Fut, Req, Res>(
    client: TClient,
    deadline: Duration,
    req: Req,
    call: F,
    op_name: &'static str,
) -> Result<Res, Status>
where
    F: FnOnce(TClient, Request<Req>) -> Fut,
    Fut: Future<Output = Result<Res, Status>>,
{
    let deadline_ms = duration_to_u64_ms(deadline);
    let span = tracing::debug_span!("grpc_call", op = op_name, deadline_ms);

    async move {
        let request = request_with_deadline(req, deadline);
        let started = Instant::now();
        let result = match tokio::time::timeout(deadline, call(client, request)).await {
            // The server enforces the propagated deadline too and reports its
            // own expiry as CANCELLED.
            Ok(Err(status))
                if status.code() == Code::Cancelled && started.elapsed() >= deadline =>
            {
                Err(expired(op_name, deadline_ms))
            }
            Ok(result) => result,
            Err(_elapsed) => Err(expired(op_name, deadline_ms)),
        };

        if let Err(ref status) = result {
            tracing::debug!(
                code = ?status.code(),
                message = %status.message(),
                "gRPC call failed"
            );
        }
        result
    }
    .instrument(span)
    .await
}

fn expired(op_name: &str, deadline_ms: u64) -> Status {
    Status::deadline_exceeded(format!("{op_name} did not complete within {deadline_ms}ms"))
}
