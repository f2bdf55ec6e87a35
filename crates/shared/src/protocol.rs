use serde::{Deserialize, Serialize};

use crate::domain::{QrCodeId, UserId};

/// Render-only projection of a server QR record. The backend response carries
/// more fields (image url, dimensions, colors, created-at, owning user); the
/// client consumes only the id and the payload, so everything else is dropped
/// at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeSummary {
    pub id: QrCodeId,
    pub data: String,
}

/// One row of the user directory backing the multi-select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
}

/// Fields serialized by the add/edit form submissions. `user_ids` is the
/// comma-joined selection mirror taken from the hidden field at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeUpsert {
    pub data: String,
    pub user_ids: String,
}
