use std::{collections::HashSet, thread, time::Duration};

use client_core::{HttpQrApi, Navigation, PageController, PageDocument, PageState, QrApi};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::UserId, protocol::UserSummary};
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    /// Page URL loaded at startup. A `?id=<n>` query opens the edit form
    /// prefilled with that record.
    pub start_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            start_url: "http://127.0.0.1:8080/".to_string(),
        }
    }
}

/// The element ids this UI actually renders widgets for. The page controller
/// binds against this manifest at startup and refuses to run if anything it
/// needs is missing.
pub fn page_document() -> PageDocument {
    PageDocument::from_ids([
        "userSelect",
        "qrcodeSection",
        "qrcodeList",
        "addQRCodeForm",
        "selectedUserIds",
        "editQRCodeSection",
        "editQRCodeForm",
        "editData",
        "editUserIds",
    ])
}

fn server_environment_label(server_url: &str) -> &'static str {
    let server = server_url.to_ascii_lowercase();
    if server.contains("127.0.0.1") || server.contains("localhost") {
        "Local"
    } else if server.contains("staging") {
        "Staging"
    } else if server.contains("dev") {
        "Development"
    } else {
        "Production"
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Selection order follows the option order of the select control, not click
/// order, per native multi-select semantics.
fn ordered_selection(users: &[UserSummary], selected: &HashSet<UserId>) -> Vec<UserId> {
    users
        .iter()
        .filter(|user| selected.contains(&user.id))
        .map(|user| user.id)
        .collect()
}

pub struct QrManagerApp {
    config: StartupConfig,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    banner: Option<UiError>,
    users: Vec<UserSummary>,
    users_requested: bool,
    selected: HashSet<UserId>,
    page: PageState,
    add_data_input: String,
    edit_data_input: String,
}

impl QrManagerApp {
    pub fn new(
        config: StartupConfig,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            config,
            cmd_tx,
            ui_rx,
            status: String::new(),
            banner: None,
            users: Vec::new(),
            users_requested: false,
            selected: HashSet::new(),
            page: PageState::default(),
            add_data_input: String::new(),
            edit_data_input: String::new(),
        }
    }

    fn drain_backend_events(&mut self) {
        let events: Vec<UiEvent> = self.ui_rx.try_iter().collect();
        for event in events {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "backend error: {}", err.message());
                    self.banner = Some(err);
                }
                UiEvent::UserDirectoryLoaded(users) => {
                    self.users = users;
                }
                UiEvent::PageUpdated(page) => {
                    // The prefill populated the edit form; copy its payload
                    // into the editable buffer exactly once.
                    if page.edit_visible && !self.page.edit_visible {
                        self.edit_data_input = page.edit_data_field.clone();
                    }
                    self.page = page;
                }
                UiEvent::NavigatedHome => self.navigate_home(),
            }
        }
    }

    /// Desktop analog of the browser navigating back to the root page: all
    /// transient form state is torn down.
    fn navigate_home(&mut self) {
        self.selected.clear();
        self.add_data_input.clear();
        self.edit_data_input.clear();
        self.banner = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SelectionChanged {
                user_ids: Vec::new(),
            },
            &mut self.status,
        );
    }

    fn user_select_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Users");
        if self.users.is_empty() {
            ui.label("No users loaded yet.");
            return;
        }

        let mut selection_changed = false;
        for user in &self.users {
            let mut checked = self.selected.contains(&user.id);
            if ui
                .checkbox(&mut checked, format!("{} (#{})", user.name, user.id))
                .changed()
            {
                if checked {
                    self.selected.insert(user.id);
                } else {
                    self.selected.remove(&user.id);
                }
                selection_changed = true;
            }
        }

        if selection_changed {
            let user_ids = ordered_selection(&self.users, &self.selected);
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::SelectionChanged { user_ids },
                &mut self.status,
            );
        }
    }

    fn add_form_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add QR Code");
        ui.horizontal(|ui| {
            ui.label("Data:");
            ui.text_edit_singleline(&mut self.add_data_input);
            if ui.button("Add").clicked() && !self.add_data_input.trim().is_empty() {
                let data = std::mem::take(&mut self.add_data_input);
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SubmitAddForm { data },
                    &mut self.status,
                );
            }
        });
    }

    fn qr_list_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("QR Codes");
        if self.page.list_entries.is_empty() {
            ui.label("No QR codes for the selected users.");
            return;
        }

        let mut pending: Option<BackendCommand> = None;
        for entry in &self.page.list_entries {
            ui.horizontal(|ui| {
                ui.label(&entry.data);
                if ui.button("Delete").clicked() {
                    pending = Some(BackendCommand::DeleteEntry { id: entry.id });
                }
                if ui.link("Edit").clicked() {
                    pending = Some(BackendCommand::FollowEditLink {
                        href: entry.edit_href.clone(),
                    });
                }
            });
        }
        if let Some(cmd) = pending {
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        }
    }

    fn edit_section_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Edit QR Code");
        if let Some(id) = self.page.edit_target {
            ui.label(format!("Editing record #{id}"));
        }
        ui.horizontal(|ui| {
            ui.label("Data:");
            ui.text_edit_singleline(&mut self.edit_data_input);
        });
        ui.horizontal(|ui| {
            ui.label("User ids:");
            let mut mirror = self.page.edit_user_ids_field.clone();
            ui.add_enabled(false, egui::TextEdit::singleline(&mut mirror));
        });
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SubmitEditForm {
                        data: self.edit_data_input.clone(),
                    },
                    &mut self.status,
                );
            }
            if ui.button("Cancel").clicked() {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CancelEdit,
                    &mut self.status,
                );
            }
        });
    }
}

impl eframe::App for QrManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();

        if !self.users_requested {
            self.users_requested = true;
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::LoadUserDirectory,
                &mut self.status,
            );
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("QR Code Manager");
                ui.separator();
                ui.label(format!(
                    "{} ({})",
                    self.config.server_url,
                    server_environment_label(&self.config.server_url)
                ));
            });
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
            if let Some(banner) = &self.banner {
                ui.colored_label(
                    egui::Color32::LIGHT_RED,
                    format!("{}: {}", err_label(banner.category()), banner.message()),
                );
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.user_select_ui(ui);
                ui.separator();
                self.add_form_ui(ui);
                if self.page.list_visible {
                    ui.separator();
                    self.qr_list_ui(ui);
                }
                if self.page.edit_visible {
                    ui.separator();
                    self.edit_section_ui(ui);
                }
            });
        });

        // Poll the backend event queue between frames.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

pub fn start_backend_bridge(
    config: StartupConfig,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut controller =
                match PageController::bind(HttpQrApi::new(&config.server_url), &page_document()) {
                    Ok(controller) => controller,
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                            UiErrorContext::BackendStartup,
                            err.to_string(),
                        )));
                        tracing::error!("page binding failed: {err}");
                        return;
                    }
                };

            // Edit prefill runs once at load, driven by the start URL query.
            match Url::parse(&config.start_url) {
                Ok(url) => {
                    controller.prefill_edit_from_url(&url).await;
                    let _ = ui_tx.try_send(UiEvent::PageUpdated(controller.state().clone()));
                }
                Err(err) => {
                    tracing::error!(start_url = %config.start_url, "invalid start url: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("invalid start url '{}': {err}", config.start_url),
                    )));
                }
            }

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadUserDirectory => {
                        tracing::info!("bridge: load_user_directory");
                        match controller.api().list_users().await {
                            Ok(users) => {
                                let _ = ui_tx.try_send(UiEvent::UserDirectoryLoaded(users));
                            }
                            Err(err) => {
                                tracing::error!("bridge: load_user_directory failed: {err:#}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::UserDirectory,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                    BackendCommand::SelectionChanged { user_ids } => {
                        tracing::info!(count = user_ids.len(), "bridge: selection_changed");
                        controller.handle_selection_change(user_ids).await;
                        let _ = ui_tx.try_send(UiEvent::PageUpdated(controller.state().clone()));
                    }
                    BackendCommand::SubmitAddForm { data } => {
                        tracing::info!(data_len = data.len(), "bridge: submit_add_form");
                        controller.submit_add(data).await;
                        let _ = ui_tx.try_send(UiEvent::PageUpdated(controller.state().clone()));
                    }
                    BackendCommand::SubmitEditForm { data } => {
                        tracing::info!(data_len = data.len(), "bridge: submit_edit_form");
                        if controller.submit_edit(data).await == Some(Navigation::Home) {
                            let _ = ui_tx.try_send(UiEvent::NavigatedHome);
                        }
                        let _ = ui_tx.try_send(UiEvent::PageUpdated(controller.state().clone()));
                    }
                    BackendCommand::DeleteEntry { id } => {
                        tracing::info!(id = id.0, "bridge: delete_entry");
                        controller.delete_entry(id).await;
                        let _ = ui_tx.try_send(UiEvent::PageUpdated(controller.state().clone()));
                    }
                    BackendCommand::FollowEditLink { href } => {
                        tracing::info!(%href, "bridge: follow_edit_link");
                        let resolved = Url::parse(&config.server_url)
                            .and_then(|base| base.join(&href));
                        match resolved {
                            Ok(url) => {
                                controller.prefill_edit_from_url(&url).await;
                                let _ = ui_tx
                                    .try_send(UiEvent::PageUpdated(controller.state().clone()));
                            }
                            Err(err) => {
                                tracing::error!(%href, "bridge: unresolvable edit link: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::General,
                                    format!("unresolvable edit link '{href}': {err}"),
                                )));
                            }
                        }
                    }
                    BackendCommand::CancelEdit => {
                        tracing::info!("bridge: cancel_edit");
                        controller.cancel_edit();
                        let _ = ui_tx.try_send(UiEvent::NavigatedHome);
                        let _ = ui_tx.try_send(UiEvent::PageUpdated(controller.state().clone()));
                    }
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::PageElements;

    #[test]
    fn rendered_page_satisfies_controller_binding() {
        PageElements::bind(&page_document()).expect("every required element is rendered");
    }

    #[test]
    fn selection_order_follows_user_list_order_not_click_order() {
        let users = vec![
            UserSummary {
                id: UserId(3),
                name: "carol".to_string(),
            },
            UserSummary {
                id: UserId(1),
                name: "alice".to_string(),
            },
            UserSummary {
                id: UserId(2),
                name: "bob".to_string(),
            },
        ];
        let selected: HashSet<UserId> = [UserId(2), UserId(3)].into_iter().collect();

        assert_eq!(ordered_selection(&users, &selected), vec![UserId(3), UserId(2)]);
    }

    #[test]
    fn labels_local_and_remote_server_environments() {
        assert_eq!(server_environment_label("http://127.0.0.1:8080"), "Local");
        assert_eq!(
            server_environment_label("https://qr.staging.example.com"),
            "Staging"
        );
        assert_eq!(server_environment_label("https://qr.example.com"), "Production");
    }
}
