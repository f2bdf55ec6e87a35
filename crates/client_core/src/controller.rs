//! Page controller: selection handling, fetch/merge, rendering, edit prefill.

use shared::{
    domain::{join_user_ids, QrCodeId, UserId},
    protocol::{QrCodeSummary, QrCodeUpsert},
};
use tracing::{error, info};
use url::Url;

use crate::{
    join::join_all_ordered,
    page::{PageDocument, PageElements, PageInitError, PageState, QrListEntry},
    QrApi,
};

/// Navigation requested from the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Home,
}

/// Drives the QR management page: reacts to selection changes, keeps the
/// rendered list in sync with the backend, and services the edit flow.
///
/// All state lives in an explicit [`PageState`] rather than in closures; the
/// host reads it back after each operation and paints accordingly.
pub struct PageController<A: QrApi> {
    api: A,
    elements: PageElements,
    state: PageState,
}

impl<A: QrApi> PageController<A> {
    /// Binds against the host page. Fails when any required element is
    /// absent; the controller cannot start on an incomplete page.
    pub fn bind(api: A, document: &PageDocument) -> Result<Self, PageInitError> {
        let elements = PageElements::bind(document)?;
        Ok(Self {
            api,
            elements,
            state: PageState::default(),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn elements(&self) -> &PageElements {
        &self.elements
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Selection Handler. Non-empty selection: reveal the list section,
    /// mirror the selection into the hidden field, refresh the list. Empty:
    /// hide the section and clear the render without issuing any request.
    /// The hidden field is deliberately left stale on an empty selection;
    /// [`Self::prepare_submit`] recomputes it at submission time.
    pub async fn handle_selection_change(&mut self, user_ids: Vec<UserId>) {
        self.state.selection = user_ids;
        if self.state.selection.is_empty() {
            self.state.list_visible = false;
            self.state.list_entries.clear();
            return;
        }

        self.state.list_visible = true;
        self.state.selected_ids_field = join_user_ids(&self.state.selection);
        self.refresh_list().await;
    }

    /// Fetch/Merge Service. Fans out one listing request per selected user,
    /// awaits them all, and concatenates the lists in selection order: the
    /// records of selection index i precede those of index i + 1 no matter
    /// which response lands first. Any single failure abandons the merge and
    /// leaves the previous render visible.
    pub async fn refresh_list(&mut self) {
        let merged = {
            let fetches: Vec<_> = self
                .state
                .selection
                .iter()
                .map(|&user_id| self.api.list_for_user(user_id))
                .collect();
            join_all_ordered(fetches).await
        };

        match merged {
            Ok(lists) => {
                let records: Vec<QrCodeSummary> = lists.into_iter().flatten().collect();
                self.render_list(&records);
            }
            Err(err) => {
                error!("failed to fetch QR codes: {err:#}");
            }
        }
    }

    /// Renderer. Clears all previously rendered entries, then emits exactly
    /// one item per record in input order. Same input twice yields the same
    /// list; nothing accumulates.
    pub fn render_list(&mut self, records: &[QrCodeSummary]) {
        self.state.list_entries.clear();
        self.state
            .list_entries
            .extend(records.iter().map(QrListEntry::from_summary));
    }

    /// Edit Prefill. Runs once at startup; only acts when the launch URL
    /// carries an `id` query parameter. On fetch success the edit section is
    /// revealed and populated; on any failure it stays hidden.
    pub async fn prefill_edit_from_url(&mut self, page_url: &Url) {
        let Some(raw_id) = page_url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
        else {
            return;
        };

        let id = match raw_id.parse::<i64>() {
            Ok(id) => QrCodeId(id),
            Err(err) => {
                error!(%raw_id, "unparsable edit id in page url: {err}");
                return;
            }
        };

        let fetched = self.api.fetch(id).await;
        match fetched {
            Ok(record) => {
                self.state.edit_visible = true;
                self.state.edit_target = Some(record.id);
                self.state.edit_data_field = record.data;
                // Mirrors the live select control, not the record's owning
                // users. At load time the selection is typically empty.
                self.state.edit_user_ids_field = join_user_ids(&self.state.selection);
            }
            Err(err) => {
                error!(id = id.0, "failed to fetch QR code for edit: {err:#}");
            }
        }
    }

    /// Submit Relay. Recomputes the hidden field from the live selection
    /// immediately before the add form is serialized, so the server always
    /// receives the selection as of the submission event.
    pub fn prepare_submit(&mut self) -> &str {
        self.state.selected_ids_field = join_user_ids(&self.state.selection);
        &self.state.selected_ids_field
    }

    /// Submits the add form: relays the current selection into the hidden
    /// field, posts the form, then refreshes the visible list.
    pub async fn submit_add(&mut self, data: String) {
        self.prepare_submit();
        let form = QrCodeUpsert {
            data,
            user_ids: self.state.selected_ids_field.clone(),
        };
        let submitted = self.api.create(&form).await;
        match submitted {
            Ok(()) => {
                info!(user_ids = %form.user_ids, "created QR code");
                self.refresh_list().await;
            }
            Err(err) => {
                error!("failed to create QR code: {err:#}");
            }
        }
    }

    /// Submits the edit form for the record loaded by the prefill, then
    /// navigates back to the root page.
    pub async fn submit_edit(&mut self, data: String) -> Option<Navigation> {
        let Some(id) = self.state.edit_target else {
            error!("edit form submitted with no record loaded");
            return None;
        };

        let form = QrCodeUpsert {
            data,
            user_ids: self.state.edit_user_ids_field.clone(),
        };
        let submitted = self.api.update(id, &form).await;
        match submitted {
            Ok(()) => {
                info!(id = id.0, "updated QR code");
                Some(self.cancel_edit())
            }
            Err(err) => {
                error!(id = id.0, "failed to update QR code: {err:#}");
                None
            }
        }
    }

    /// Deletes one rendered entry, then refreshes the list for the current
    /// selection. The delete response body is not consumed.
    pub async fn delete_entry(&mut self, id: QrCodeId) {
        let deleted = self.api.delete(id).await;
        match deleted {
            Ok(()) => {
                info!(id = id.0, "deleted QR code");
                self.refresh_list().await;
            }
            Err(err) => {
                error!(id = id.0, "failed to delete QR code: {err:#}");
            }
        }
    }

    /// Cancel Edit: hides the edit section and requests navigation to the
    /// root page. Nothing is persisted.
    pub fn cancel_edit(&mut self) -> Navigation {
        self.state.edit_visible = false;
        self.state.edit_target = None;
        Navigation::Home
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
