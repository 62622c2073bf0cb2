use crate::input::{InputAction, InputService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Spawn a blocking thread that collects terminal input and forwards actions onto a channel.
///
/// The thread exits when `shutdown` is set, when the receiver is gone, or on a terminal
/// read error. Dropping the sender then ends the application loop.
pub fn spawn_input_thread(
    tx: UnboundedSender<InputAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut service = InputService::new();
        while !shutdown.load(Ordering::SeqCst) {
            match service.poll_action(Some(poll_interval)) {
                Ok(Some(action)) => {
                    if tx.send(action).is_err() {
                        break;
                    }
                }
                Ok(None) => continue,
                Err(err) => {
                    log::error!("input thread error: {err}");
                    break;
                }
            }
        }
    })
}

/// Wait for the input thread off the async runtime.
///
/// The thread notices the shutdown flag within one poll interval, but joining it is
/// still a blocking call, so it runs on the blocking pool.
pub async fn join_input_thread(handle: std::thread::JoinHandle<()>) {
    match tokio::task::spawn_blocking(move || handle.join()).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => log::error!("input thread panicked"),
        Err(err) => log::error!("failed to join input thread: {err}"),
    }
}
