use std::time::Duration;

use client_core::{BookingEvent, BookingState, Phase, Submission};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::apply_booking_event,
};
use crate::ui::widgets::{appointment_card, appointment_form, CardAction, CardActions};

const NOTICE_TEXT: egui::Color32 = egui::Color32::from_rgb(46, 160, 67);

pub struct BookingApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    booking: BookingState,
    status: String,
    error_banner: Option<UiError>,
}

impl BookingApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        notice_ttl: Duration,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            booking: BookingState::with_notice_ttl(notice_ttl),
            status: "Starting backend worker...".to_string(),
            error_banner: None,
        };
        app.handle_booking_event(BookingEvent::Load);
        app
    }

    fn handle_booking_event(&mut self, event: BookingEvent) {
        for cmd in apply_booking_event(&mut self.booking, event) {
            if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
                tracing::warn!("failed to queue backend command: {}", err.message());
                self.error_banner = Some(err);
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Booking(event) => self.handle_booking_event(event),
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = "Backend unavailable".to_string();
                    self.error_banner = Some(err);
                }
            }
        }
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.error_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(banner.message()).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.error_banner = None;
                        }
                    });
                });
            });
    }

    fn show_booking_form(&self, ui: &mut egui::Ui, events: &mut Vec<BookingEvent>) {
        ui.heading("Book an Appointment");
        ui.add_space(6.0);
        if self.booking.editing_id().is_some() {
            ui.label("Finish editing the open appointment to book a new one.");
            return;
        }

        let creating = self.booking.phase == Phase::Submitting(Submission::Create);
        ui.add_enabled_ui(!creating, |ui| {
            appointment_form(ui, "book", &self.booking.form, &self.booking.errors, events);
        });
        ui.add_space(6.0);
        let label = if creating {
            "Booking..."
        } else {
            "Book Appointment"
        };
        if ui
            .add_enabled(self.booking.phase == Phase::Idle, egui::Button::new(label))
            .clicked()
        {
            events.push(BookingEvent::Submit);
        }
    }

    fn show_appointments(&self, ui: &mut egui::Ui, events: &mut Vec<BookingEvent>) {
        ui.heading("Appointments");
        if let Some(notice) = self.booking.notice {
            ui.colored_label(NOTICE_TEXT, notice.kind.message());
        }
        ui.add_space(6.0);

        if self.booking.mirror.is_empty() {
            ui.label("No appointment found.");
            return;
        }

        let actions = CardActions::for_phase(&self.booking.phase);
        ui.horizontal_wrapped(|ui| {
            for appointment in &self.booking.mirror {
                match appointment_card(ui, appointment, actions) {
                    Some(CardAction::Edit(id)) => events.push(BookingEvent::BeginEdit(id)),
                    Some(CardAction::Delete(id)) => events.push(BookingEvent::RequestDelete(id)),
                    None => {}
                }
            }
        });
    }

    fn show_edit_window(&self, ctx: &egui::Context, events: &mut Vec<BookingEvent>) {
        if self.booking.editing_id().is_none() {
            return;
        }

        let saving = matches!(self.booking.phase, Phase::Submitting(Submission::Update(_)));
        let mut open = true;
        egui::Window::new("Edit Appointment")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!saving, |ui| {
                    appointment_form(ui, "edit", &self.booking.form, &self.booking.errors, events);
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let label = if saving { "Saving..." } else { "Save Changes" };
                    if ui.add_enabled(!saving, egui::Button::new(label)).clicked() {
                        events.push(BookingEvent::Submit);
                    }
                    if ui.add_enabled(!saving, egui::Button::new("Cancel")).clicked() {
                        events.push(BookingEvent::CloseEdit);
                    }
                });
            });
        if !open && !saving {
            events.push(BookingEvent::CloseEdit);
        }
    }

    fn show_delete_confirmation(&self, ctx: &egui::Context, events: &mut Vec<BookingEvent>) {
        let Some(id) = self.booking.pending_delete() else {
            return;
        };
        let name = self
            .booking
            .find(id)
            .map(|appointment| appointment.details.name.as_str())
            .unwrap_or("this patient");

        egui::Window::new("Delete Appointment")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Are you sure you want to delete the appointment for {name}?"
                ));
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        events.push(BookingEvent::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        events.push(BookingEvent::CancelDelete);
                    }
                });
            });
    }
}

impl eframe::App for BookingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut events = Vec::new();
        egui::TopBottomPanel::top("app_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Doctor Appointments");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(&self.status);
                });
            });
            self.show_error_banner(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.show_booking_form(ui, &mut events);
                    ui.separator();
                    self.show_appointments(ui, &mut events);
                });
        });

        self.show_edit_window(ctx, &mut events);
        self.show_delete_confirmation(ctx, &mut events);

        for event in events {
            self.handle_booking_event(event);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl Drop for BookingApp {
    fn drop(&mut self) {
        self.handle_booking_event(BookingEvent::Teardown);
        let _ = dispatch_backend_command(&self.cmd_tx, BackendCommand::Shutdown);
    }
}
