use client_core::{
    display::{format_short_date, StatusBadge},
    BookingEvent, FieldErrors, Phase,
};
use eframe::egui;
use shared::{
    domain::{AppointmentId, FormField, Gender, VisitStatus},
    protocol::{Appointment, AppointmentDraft},
};

const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    Edit(AppointmentId),
    Delete(AppointmentId),
}

/// Which card buttons are live. Editing another card while an edit window is
/// open switches the session and drops unsaved changes; deleting waits until
/// the edit window is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardActions {
    pub edit: bool,
    pub delete: bool,
}

impl CardActions {
    pub fn for_phase(phase: &Phase) -> Self {
        match phase {
            Phase::Idle => Self {
                edit: true,
                delete: true,
            },
            Phase::Editing(_) => Self {
                edit: true,
                delete: false,
            },
            _ => Self {
                edit: false,
                delete: false,
            },
        }
    }
}

fn hint_for(field: FormField) -> &'static str {
    match field {
        FormField::Name => "Patient name",
        FormField::PhoneNumber => "10 digit phone number",
        FormField::DoctorName => "Dr. Firstname Lastname",
        FormField::Age => "Age",
        FormField::Date => "YYYY-MM-DD",
        FormField::Time => "HH:MM",
        FormField::Gender | FormField::Status => "",
    }
}

/// Renders every form field with its inline error. Edits are reported as
/// `FieldChanged` events; the draft itself is never mutated here.
pub fn appointment_form(
    ui: &mut egui::Ui,
    id_salt: &str,
    form: &AppointmentDraft,
    errors: &FieldErrors,
    events: &mut Vec<BookingEvent>,
) {
    egui::Grid::new(format!("{id_salt}_grid"))
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for field in FormField::ALL {
                ui.label(field.label());
                ui.vertical(|ui| {
                    match field {
                        FormField::Gender => gender_combo(ui, id_salt, form, events),
                        FormField::Status => status_combo(ui, id_salt, form, events),
                        _ => {
                            let mut value = form.field(field).to_string();
                            let response = ui.add(
                                egui::TextEdit::singleline(&mut value)
                                    .hint_text(hint_for(field))
                                    .desired_width(240.0),
                            );
                            if response.changed() {
                                events.push(BookingEvent::FieldChanged { field, value });
                            }
                        }
                    }
                    if let Some(message) = errors.get(field) {
                        ui.colored_label(ERROR_TEXT, message);
                    }
                });
                ui.end_row();
            }
        });
}

fn gender_combo(
    ui: &mut egui::Ui,
    id_salt: &str,
    form: &AppointmentDraft,
    events: &mut Vec<BookingEvent>,
) {
    let selected = if form.gender.is_empty() {
        "Select gender"
    } else {
        form.gender.as_str()
    };
    egui::ComboBox::from_id_salt(format!("{id_salt}_gender"))
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for gender in Gender::ALL {
                let is_selected = form.gender == gender.as_str();
                if ui.selectable_label(is_selected, gender.as_str()).clicked() && !is_selected {
                    events.push(BookingEvent::FieldChanged {
                        field: FormField::Gender,
                        value: gender.as_str().to_string(),
                    });
                }
            }
        });
}

fn status_combo(
    ui: &mut egui::Ui,
    id_salt: &str,
    form: &AppointmentDraft,
    events: &mut Vec<BookingEvent>,
) {
    let mut status = form.status;
    egui::ComboBox::from_id_salt(format!("{id_salt}_status"))
        .selected_text(status.as_str())
        .show_ui(ui, |ui| {
            for option in VisitStatus::ALL {
                ui.selectable_value(&mut status, option, option.as_str());
            }
        });
    if status != form.status {
        events.push(BookingEvent::FieldChanged {
            field: FormField::Status,
            value: status.as_str().to_string(),
        });
    }
}

pub fn status_badge(ui: &mut egui::Ui, status: VisitStatus) {
    let [r, g, b] = StatusBadge::for_status(status).rgb();
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(r, g, b))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(status.as_str()).color(egui::Color32::WHITE));
        });
}

pub fn appointment_card(
    ui: &mut egui::Ui,
    appointment: &Appointment,
    actions: CardActions,
) -> Option<CardAction> {
    let details = &appointment.details;
    let mut action = None;
    egui::Frame::group(ui.style())
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_min_width(260.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&details.name).strong().size(16.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    status_badge(ui, details.status);
                });
            });
            ui.label(format!("Phone: {}", details.phone_number));
            ui.label(format!("Doctor: {}", details.doctor_name));
            ui.label(format!("Gender: {}  Age: {}", details.gender, details.age));
            ui.label(format!(
                "Date: {}  Time: {}",
                format_short_date(&details.date),
                details.time
            ));
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(actions.edit, egui::Button::new("Edit"))
                    .clicked()
                {
                    action = Some(CardAction::Edit(appointment.id.clone()));
                }
                if ui
                    .add_enabled(actions.delete, egui::Button::new("Delete"))
                    .clicked()
                {
                    action = Some(CardAction::Delete(appointment.id.clone()));
                }
            });
        });
    action
}
