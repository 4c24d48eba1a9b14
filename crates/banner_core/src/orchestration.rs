//! Queueing helpers from operator input to the engine command channel.

use tokio::sync::mpsc::{error::TrySendError, Sender};

use crate::commands::Command;

/// Queue `cmd` without blocking the caller. On failure `status` receives a
/// message for the operator.
pub fn dispatch_command(cmd_tx: &Sender<Command>, cmd: Command, status: &mut String) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued operator->engine command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "Engine command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Closed(_)) => {
            *status = "Banner engine stopped; restart the console".to_string();
            false
        }
    }
}
