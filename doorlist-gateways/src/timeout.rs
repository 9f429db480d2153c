use anyhow::{bail, Result};
use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

/// Run a blocking request on a separate thread and give up after `timeout`.
///
/// The request itself is not aborted, its result is discarded.
pub fn with_timeout<T, F>(timeout: Duration, request: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("gateway-request".into())
        .spawn(move || {
            // The receiver is gone after a timeout
            let _ = tx.send(request());
        })?;
    match rx.recv_timeout(timeout) {
        Ok(res) => res,
        Err(RecvTimeoutError::Timeout) => bail!("No response within {} ms", timeout.as_millis()),
        Err(RecvTimeoutError::Disconnected) => bail!("The request was aborted"),
    }
}
