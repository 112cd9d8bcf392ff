//! Cooperative cancellation shared between the fishing loop and its listeners

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// One-way stop flag. Written by listeners, polled by the fishing loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Spawn a thread that cancels `token` once Enter is pressed.
///
/// The session cannot be stopped from stdin once it is closed, so EOF and
/// read errors cancel as well.
pub fn spawn_enter_listener(token: CancelToken) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        println!("Press Enter to exit");
        wait_for_enter(io::stdin().lock(), &token);
    })
}

/// Block until a line, EOF or a read error on `reader`, then cancel `token`.
pub fn wait_for_enter<R: BufRead>(mut reader: R, token: &CancelToken) {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => {
            tracing::info!("[CANCEL] stdin closed, stopping");
        }
        Ok(_) => {
            println!("Enter is pressed");
        }
        Err(e) => {
            tracing::warn!("[CANCEL] Failed to read stdin, stopping: {}", e);
        }
    }
    token.cancel();
}

/// Install a Ctrl+C handler that cancels `token`.
pub fn install_ctrlc_handler(token: CancelToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        println!("Ctrl+C is pressed");
        token.cancel();
    })
}
