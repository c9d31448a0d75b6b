//! Shared utilities for use cases.
//!
//! Cancellation checking and cancellable awaiting used by the planner
//! client, the step executor and the orchestrator.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Marker returned when a run's cancellation token has fired.
///
/// Each use case converts it into its own `Cancelled` error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cancelled;

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), Cancelled> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(Cancelled);
    }
    Ok(())
}

/// Await `future` unless the token fires first.
///
/// Cancellation wins ties, so a token that is already cancelled never lets
/// the future run.
pub(crate) async fn cancellable<F: Future>(
    token: &Option<CancellationToken>,
    future: F,
) -> Result<F::Output, Cancelled> {
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}
