//! Backend commands queued from UI to backend worker.

use shared::domain::{QrCodeId, UserId};

pub enum BackendCommand {
    LoadUserDirectory,
    SelectionChanged {
        user_ids: Vec<UserId>,
    },
    SubmitAddForm {
        data: String,
    },
    SubmitEditForm {
        data: String,
    },
    DeleteEntry {
        id: QrCodeId,
    },
    /// Follow a rendered entry's edit link; the worker treats it as a page
    /// navigation and re-runs the edit prefill against the link's query.
    FollowEditLink {
        href: String,
    },
    CancelEdit,
}
