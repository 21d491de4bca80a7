//! Booking page state and its transitions.
//!
//! `reduce` never performs I/O. It mutates the state for one event and
//! returns the remote calls and timer actions the caller must carry out;
//! their outcomes come back as further events.

use std::time::Duration;

use shared::{
    domain::{AppointmentId, FormField},
    protocol::{Appointment, AppointmentDraft, AppointmentPatch},
};
use tracing::debug;

use crate::validation::{validate, FieldErrors};

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create,
    Update(AppointmentId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Editing(AppointmentId),
    Submitting(Submission),
    PendingDelete(AppointmentId),
    Deleting(AppointmentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Deleted,
}

impl NoticeKind {
    pub fn message(self) -> &'static str {
        match self {
            NoticeKind::Deleted => "Appointment deleted successfully",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    Load,
    FieldChanged { field: FormField, value: String },
    Submit,
    BeginEdit(AppointmentId),
    CloseEdit,
    RequestDelete(AppointmentId),
    ConfirmDelete,
    CancelDelete,
    ListLoaded(Vec<Appointment>),
    ListFailed,
    /// Carries the server's representation when its response was decodable.
    CreateSucceeded(Option<Appointment>),
    CreateFailed,
    UpdateSucceeded,
    UpdateFailed,
    DeleteSucceeded(AppointmentId),
    DeleteFailed(AppointmentId),
    NoticeExpired(u64),
    Teardown,
}

/// A call against the remote appointment collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    FetchAppointments,
    CreateAppointment(AppointmentDraft),
    UpdateAppointment {
        id: AppointmentId,
        patch: AppointmentPatch,
    },
    DeleteAppointment(AppointmentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Remote(RemoteCall),
    ScheduleNoticeClear {
        token: u64,
        after: Duration,
    },
    CancelNoticeClear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingState {
    pub form: AppointmentDraft,
    pub errors: FieldErrors,
    pub mirror: Vec<Appointment>,
    pub phase: Phase,
    pub notice: Option<Notice>,
    pub notice_ttl: Duration,
    next_notice_token: u64,
}

impl Default for BookingState {
    fn default() -> Self {
        Self::with_notice_ttl(DEFAULT_NOTICE_TTL)
    }
}

impl BookingState {
    pub fn with_notice_ttl(notice_ttl: Duration) -> Self {
        Self {
            form: AppointmentDraft::default(),
            errors: FieldErrors::default(),
            mirror: Vec::new(),
            phase: Phase::Idle,
            notice: None,
            notice_ttl,
            next_notice_token: 0,
        }
    }

    pub fn editing_id(&self) -> Option<&AppointmentId> {
        match &self.phase {
            Phase::Editing(id) | Phase::Submitting(Submission::Update(id)) => Some(id),
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<&AppointmentId> {
        match &self.phase {
            Phase::PendingDelete(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_) | Phase::Deleting(_))
    }

    pub fn find(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.mirror.iter().find(|appointment| &appointment.id == id)
    }

    fn reset_form(&mut self) {
        self.form = AppointmentDraft::default();
        self.errors = FieldErrors::default();
    }

    fn issue_notice(&mut self, kind: NoticeKind) -> Notice {
        self.next_notice_token = self.next_notice_token.wrapping_add(1);
        let notice = Notice {
            kind,
            token: self.next_notice_token,
        };
        self.notice = Some(notice);
        notice
    }
}

pub fn reduce(state: &mut BookingState, event: BookingEvent) -> Vec<Effect> {
    let phase = state.phase.clone();
    match (phase, event) {
        (_, BookingEvent::Load) => vec![Effect::Remote(RemoteCall::FetchAppointments)],

        (_, BookingEvent::FieldChanged { field, value }) => {
            state.form.set_field(field, value);
            Vec::new()
        }

        (_, BookingEvent::ListLoaded(appointments)) => {
            state.mirror = appointments;
            Vec::new()
        }
        (_, BookingEvent::ListFailed) => Vec::new(),

        (Phase::Idle, BookingEvent::Submit) => {
            state.errors = validate(&state.form);
            if !state.errors.is_valid() {
                return Vec::new();
            }
            state.phase = Phase::Submitting(Submission::Create);
            let draft = state.form.clone();
            vec![Effect::Remote(RemoteCall::CreateAppointment(draft))]
        }
        (Phase::Editing(id), BookingEvent::Submit) => {
            state.errors = validate(&state.form);
            if !state.errors.is_valid() {
                return Vec::new();
            }
            let patch = match state.find(&id) {
                Some(stored) => AppointmentPatch::between(&stored.details, &state.form),
                None => AppointmentPatch::full(&state.form),
            };
            state.phase = Phase::Submitting(Submission::Update(id.clone()));
            vec![Effect::Remote(RemoteCall::UpdateAppointment { id, patch })]
        }

        (Phase::Submitting(Submission::Create), BookingEvent::CreateSucceeded(created)) => {
            state.reset_form();
            state.phase = Phase::Idle;
            match created {
                Some(appointment) => {
                    state.mirror.push(appointment);
                    Vec::new()
                }
                None => vec![Effect::Remote(RemoteCall::FetchAppointments)],
            }
        }
        (Phase::Submitting(Submission::Create), BookingEvent::CreateFailed) => {
            state.phase = Phase::Idle;
            Vec::new()
        }

        (Phase::Idle | Phase::Editing(_), BookingEvent::BeginEdit(id)) => {
            let Some(details) = state.find(&id).map(|stored| stored.details.clone()) else {
                debug!(appointment_id = %id, "edit requested for unknown appointment");
                return Vec::new();
            };
            state.form = details;
            state.errors = FieldErrors::default();
            state.phase = Phase::Editing(id);
            Vec::new()
        }
        (Phase::Editing(_), BookingEvent::CloseEdit) => {
            state.reset_form();
            state.phase = Phase::Idle;
            Vec::new()
        }
        (Phase::Submitting(Submission::Update(_)), BookingEvent::UpdateSucceeded) => {
            state.reset_form();
            state.phase = Phase::Idle;
            vec![Effect::Remote(RemoteCall::FetchAppointments)]
        }
        (Phase::Submitting(Submission::Update(id)), BookingEvent::UpdateFailed) => {
            state.phase = Phase::Editing(id);
            Vec::new()
        }

        (Phase::Idle, BookingEvent::RequestDelete(id)) => {
            state.phase = Phase::PendingDelete(id);
            if state.notice.take().is_some() {
                vec![Effect::CancelNoticeClear]
            } else {
                Vec::new()
            }
        }
        (Phase::PendingDelete(_), BookingEvent::CancelDelete) => {
            state.phase = Phase::Idle;
            Vec::new()
        }
        (Phase::PendingDelete(id), BookingEvent::ConfirmDelete) => {
            state.phase = Phase::Deleting(id.clone());
            vec![Effect::Remote(RemoteCall::DeleteAppointment(id))]
        }
        (Phase::Deleting(pending), BookingEvent::DeleteSucceeded(id)) if pending == id => {
            state.mirror.retain(|appointment| appointment.id != id);
            state.phase = Phase::Idle;
            let notice = state.issue_notice(NoticeKind::Deleted);
            vec![Effect::ScheduleNoticeClear {
                token: notice.token,
                after: state.notice_ttl,
            }]
        }
        (Phase::Deleting(pending), BookingEvent::DeleteFailed(id)) if pending == id => {
            state.phase = Phase::Idle;
            Vec::new()
        }

        (_, BookingEvent::NoticeExpired(token)) => {
            if state.notice.is_some_and(|notice| notice.token == token) {
                state.notice = None;
            }
            Vec::new()
        }
        (_, BookingEvent::Teardown) => {
            state.notice = None;
            vec![Effect::CancelNoticeClear]
        }

        (phase, event) => {
            debug!(?phase, ?event, "ignoring booking event in current phase");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "tests/booking_tests.rs"]
mod tests;
