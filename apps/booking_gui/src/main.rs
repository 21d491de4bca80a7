mod backend_bridge;
mod controller;
mod ui;

use client_core::{load_settings, ClientSettings};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::BookingApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("falling back to default settings: {err:#}");
            ClientSettings::default()
        }
    };
    tracing::info!(server_url = %settings.server_url, "starting booking gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    let notice_ttl = settings.notice_ttl();
    let _backend = backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Doctor Appointment Booking")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Doctor Appointment Booking",
        options,
        Box::new(move |_cc| Ok(Box::new(BookingApp::new(cmd_tx, ui_rx, notice_ttl)))),
    )
}
