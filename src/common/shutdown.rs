use std::future::Future;

use tracing::warn;

/// Drives `work` until it finishes or `interrupt` fires.
///
/// Returns `None` only when the interrupt resolved successfully; the
/// abandoned `work` future is dropped along with its in-flight requests.
/// An interrupt that fails to install is logged and `work` runs to the end.
pub async fn run_until_interrupted<F, S>(work: F, interrupt: S) -> Option<F::Output>
where
  F: Future,
  S: Future<Output = std::io::Result<()>>,
{
  tokio::pin!(work);
  tokio::select! {
    output = &mut work => Some(output),
    signal = interrupt => match signal {
      Ok(()) => None,
      Err(e) => {
        warn!("Cannot listen for Ctrl-C, continuing without cancellation: {}", e);
        Some(work.await)
      }
    },
  }
}
