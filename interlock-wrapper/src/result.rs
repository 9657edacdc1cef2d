use interlock_core::duration::DurationMs;
use interlock_core::error::InteractionError;
use tokio::sync::oneshot;

/// The eventual outcome of an async call.
///
/// The outcome can be retrieved once. Waiting with
/// [`AsyncResult::try_get`] is bounded; running out of time does not
/// cancel the call and does not consume the result, so a later retrieval
/// still sees what the call actually did. Dropping an unretrieved result
/// drops the outcome with it.
#[derive(Debug)]
pub struct AsyncResult<R> {
    receiver: Option<oneshot::Receiver<Result<R, InteractionError>>>,
    timeout: DurationMs,
}

impl<R> AsyncResult<R> {
    pub(crate) fn new(
        receiver: oneshot::Receiver<Result<R, InteractionError>>,
        timeout: DurationMs,
    ) -> Self {
        Self {
            receiver: Some(receiver),
            timeout,
        }
    }

    /// Wait at most `timeout` for the outcome.
    ///
    /// - `Err(Timeout)` if the call has not finished; try again later.
    /// - `Err(TaskFailed)` if the call ended without an outcome.
    /// - `Err(IllegalState)` if the outcome was already retrieved.
    /// - Otherwise the call's own result or error.
    pub async fn try_get(&mut self, timeout: impl Into<DurationMs>) -> Result<R, InteractionError> {
        let timeout = timeout.into();
        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| InteractionError::illegal_state("async result already retrieved"))?;

        let received = match tokio::time::timeout(timeout.to_std(), receiver).await {
            Ok(received) => received,
            Err(_) => {
                tracing::debug!(%timeout, "async result not ready");
                return Err(InteractionError::Timeout(timeout));
            }
        };
        self.receiver = None;
        received.unwrap_or_else(|_| {
            Err(InteractionError::TaskFailed(
                "call ended without producing a result".into(),
            ))
        })
    }

    /// Wait for the outcome, at most the control's timeout.
    pub async fn get(&mut self) -> Result<R, InteractionError> {
        let timeout = self.timeout;
        self.try_get(timeout).await
    }

    /// The timeout [`AsyncResult::get`] waits for.
    pub fn timeout(&self) -> DurationMs {
        self.timeout
    }

    /// Whether the outcome was already retrieved.
    pub fn is_retrieved(&self) -> bool {
        self.receiver.is_none()
    }
}
