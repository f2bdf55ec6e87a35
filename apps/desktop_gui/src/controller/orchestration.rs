//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::LoadUserDirectory => "load_user_directory",
        BackendCommand::SelectionChanged { .. } => "selection_changed",
        BackendCommand::SubmitAddForm { .. } => "submit_add_form",
        BackendCommand::SubmitEditForm { .. } => "submit_edit_form",
        BackendCommand::DeleteEntry { .. } => "delete_entry",
        BackendCommand::FollowEditLink { .. } => "follow_edit_link",
        BackendCommand::CancelEdit => "cancel_edit",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
        }
    }
}
