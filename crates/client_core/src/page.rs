//! Page model: the logical elements the controller drives and their state.

use std::collections::HashSet;

use shared::{
    domain::{QrCodeId, UserId},
    protocol::QrCodeSummary,
};
use thiserror::Error;

/// The logical roles the controller requires the host page to provide.
/// Element ids match the management page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    UserSelect,
    QrCodeSection,
    QrCodeList,
    AddForm,
    SelectedUserIdsField,
    EditSection,
    EditForm,
    EditDataField,
    EditUserIdsField,
}

impl ElementRole {
    pub const ALL: [ElementRole; 9] = [
        ElementRole::UserSelect,
        ElementRole::QrCodeSection,
        ElementRole::QrCodeList,
        ElementRole::AddForm,
        ElementRole::SelectedUserIdsField,
        ElementRole::EditSection,
        ElementRole::EditForm,
        ElementRole::EditDataField,
        ElementRole::EditUserIdsField,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            ElementRole::UserSelect => "userSelect",
            ElementRole::QrCodeSection => "qrcodeSection",
            ElementRole::QrCodeList => "qrcodeList",
            ElementRole::AddForm => "addQRCodeForm",
            ElementRole::SelectedUserIdsField => "selectedUserIds",
            ElementRole::EditSection => "editQRCodeSection",
            ElementRole::EditForm => "editQRCodeForm",
            ElementRole::EditDataField => "editData",
            ElementRole::EditUserIdsField => "editUserIds",
        }
    }
}

/// The set of element ids the host page actually exposes.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    ids: HashSet<String>,
}

impl PageDocument {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// A document exposing every element the controller requires.
    pub fn complete() -> Self {
        Self::from_ids(ElementRole::ALL.iter().map(|role| role.element_id()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageInitError {
    #[error("required page elements not found: {}", .ids.join(", "))]
    MissingElements { ids: Vec<&'static str> },
}

/// Typed handles to the required elements, obtained by a fail-fast binding
/// step. Construction succeeding is the proof that every role resolved.
#[derive(Debug, Clone)]
pub struct PageElements {
    pub user_select: &'static str,
    pub qr_code_section: &'static str,
    pub qr_code_list: &'static str,
    pub add_form: &'static str,
    pub selected_user_ids_field: &'static str,
    pub edit_section: &'static str,
    pub edit_form: &'static str,
    pub edit_data_field: &'static str,
    pub edit_user_ids_field: &'static str,
}

impl PageElements {
    /// Resolves every required role against the document, reporting all
    /// absent elements at once instead of failing on first dereference
    /// somewhere inside an event handler.
    pub fn bind(document: &PageDocument) -> Result<Self, PageInitError> {
        let missing: Vec<&'static str> = ElementRole::ALL
            .iter()
            .map(|role| role.element_id())
            .filter(|id| !document.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(PageInitError::MissingElements { ids: missing });
        }

        Ok(Self {
            user_select: ElementRole::UserSelect.element_id(),
            qr_code_section: ElementRole::QrCodeSection.element_id(),
            qr_code_list: ElementRole::QrCodeList.element_id(),
            add_form: ElementRole::AddForm.element_id(),
            selected_user_ids_field: ElementRole::SelectedUserIdsField.element_id(),
            edit_section: ElementRole::EditSection.element_id(),
            edit_form: ElementRole::EditForm.element_id(),
            edit_data_field: ElementRole::EditDataField.element_id(),
            edit_user_ids_field: ElementRole::EditUserIdsField.element_id(),
        })
    }
}

/// One rendered list item: visible payload text plus the actions bound to the
/// record's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrListEntry {
    pub id: QrCodeId,
    pub data: String,
    pub delete_action: String,
    pub edit_href: String,
}

impl QrListEntry {
    pub fn from_summary(summary: &QrCodeSummary) -> Self {
        Self {
            id: summary.id,
            data: summary.data.clone(),
            delete_action: format!("/api/qrcodes/{}", summary.id),
            edit_href: format!("/api/qrcodes/edit?id={}", summary.id),
        }
    }
}

/// Mutable view state of the page. Two independent visibility bits: the list
/// section follows selection emptiness, the edit section follows the prefill
/// outcome until Cancel Edit tears the page down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub selection: Vec<UserId>,
    pub list_visible: bool,
    pub list_entries: Vec<QrListEntry>,
    pub selected_ids_field: String,
    pub edit_visible: bool,
    pub edit_target: Option<QrCodeId>,
    pub edit_data_field: String,
    pub edit_user_ids_field: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_succeeds_against_a_complete_document() {
        let elements = PageElements::bind(&PageDocument::complete()).expect("bind");
        assert_eq!(elements.user_select, "userSelect");
        assert_eq!(elements.qr_code_list, "qrcodeList");
    }

    #[test]
    fn binding_names_every_missing_element() {
        let document = PageDocument::from_ids(
            ElementRole::ALL
                .iter()
                .map(|role| role.element_id())
                .filter(|id| *id != "qrcodeList" && *id != "editData"),
        );

        let err = PageElements::bind(&document).expect_err("must fail");
        assert_eq!(
            err,
            PageInitError::MissingElements {
                ids: vec!["qrcodeList", "editData"],
            }
        );
        assert_eq!(
            err.to_string(),
            "required page elements not found: qrcodeList, editData"
        );
    }

    #[test]
    fn list_entry_binds_actions_to_the_record_id() {
        let entry = QrListEntry::from_summary(&QrCodeSummary {
            id: QrCodeId(7),
            data: "https://example.com".to_string(),
        });
        assert_eq!(entry.delete_action, "/api/qrcodes/7");
        assert_eq!(entry.edit_href, "/api/qrcodes/edit?id=7");
    }
}
