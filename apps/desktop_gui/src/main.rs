mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::app::{QrManagerApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "qr-manager", about = "Desktop client for the QR code management service")]
struct Args {
    /// Base URL of the QR code backend.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    /// Page URL to open at startup; a `?id=<n>` query prefills the edit form.
    /// Defaults to the backend's root page.
    #[arg(long)]
    start_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let start_url = args
        .start_url
        .unwrap_or_else(|| format!("{}/", args.server_url.trim_end_matches('/')));
    let config = StartupConfig {
        server_url: args.server_url,
        start_url,
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(config.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("QR Code Manager")
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "QR Code Manager",
        options,
        Box::new(|_cc| Ok(Box::new(QrManagerApp::new(config, cmd_tx, ui_rx)))),
    )
}
