//! UI layer for the desktop app: app shell and backend worker loop.

pub mod app;

pub use app::{QrManagerApp, StartupConfig};
