use std::{collections::VecDeque, sync::Arc, time::Duration};

use shared::domain::{AppointmentId, FormField};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    booking::{reduce, BookingEvent, BookingState, Effect, RemoteCall},
    notice::NoticeTimer,
    transport::AppointmentTransport,
};

/// Runs booking events against a remote appointment collection and keeps the
/// local mirror in step with it.
///
/// The state lock is released while a remote call is in flight, so
/// overlapping operations are not serialized and the last list response to
/// arrive wins.
pub struct AppointmentStore {
    state: Arc<Mutex<BookingState>>,
    transport: Arc<dyn AppointmentTransport>,
    notice_timer: Mutex<NoticeTimer>,
}

impl AppointmentStore {
    pub fn new(transport: Arc<dyn AppointmentTransport>, notice_ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BookingState::with_notice_ttl(notice_ttl))),
            transport,
            notice_timer: Mutex::new(NoticeTimer::new()),
        }
    }

    pub async fn snapshot(&self) -> BookingState {
        self.state.lock().await.clone()
    }

    pub async fn dispatch(&self, event: BookingEvent) {
        let mut pending: VecDeque<Effect> = self.apply(event).await.into();
        while let Some(effect) = pending.pop_front() {
            if let Some(outcome) = self.run_effect(effect).await {
                pending.extend(self.apply(outcome).await);
            }
        }
    }

    pub async fn list(&self) {
        self.dispatch(BookingEvent::Load).await;
    }

    pub async fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.dispatch(BookingEvent::FieldChanged {
            field,
            value: value.into(),
        })
        .await;
    }

    /// Creates or updates depending on whether an edit session is open.
    pub async fn submit(&self) {
        self.dispatch(BookingEvent::Submit).await;
    }

    pub async fn begin_edit(&self, id: AppointmentId) {
        self.dispatch(BookingEvent::BeginEdit(id)).await;
    }

    pub async fn close_edit(&self) {
        self.dispatch(BookingEvent::CloseEdit).await;
    }

    pub async fn request_delete(&self, id: AppointmentId) {
        self.dispatch(BookingEvent::RequestDelete(id)).await;
    }

    pub async fn confirm_delete(&self) {
        self.dispatch(BookingEvent::ConfirmDelete).await;
    }

    pub async fn cancel_delete(&self) {
        self.dispatch(BookingEvent::CancelDelete).await;
    }

    pub async fn shutdown(&self) {
        self.dispatch(BookingEvent::Teardown).await;
    }

    pub async fn notice_pending(&self) -> bool {
        self.notice_timer.lock().await.is_pending()
    }

    async fn apply(&self, event: BookingEvent) -> Vec<Effect> {
        let mut state = self.state.lock().await;
        reduce(&mut state, event)
    }

    async fn run_effect(&self, effect: Effect) -> Option<BookingEvent> {
        match effect {
            Effect::Remote(call) => Some(perform_remote(self.transport.as_ref(), call).await),
            Effect::ScheduleNoticeClear { token, after } => {
                let state = Arc::clone(&self.state);
                self.notice_timer.lock().await.schedule(after, async move {
                    let mut state = state.lock().await;
                    reduce(&mut state, BookingEvent::NoticeExpired(token));
                });
                None
            }
            Effect::CancelNoticeClear => {
                self.notice_timer.lock().await.cancel();
                None
            }
        }
    }
}

/// Performs one remote call and turns its outcome into the event the reducer
/// expects. Failures are logged here and never propagate further.
pub async fn perform_remote(
    transport: &dyn AppointmentTransport,
    call: RemoteCall,
) -> BookingEvent {
    match call {
        RemoteCall::FetchAppointments => match transport.list().await {
            Ok(appointments) => BookingEvent::ListLoaded(appointments),
            Err(err) => {
                warn!("error fetching appointments: {err}");
                BookingEvent::ListFailed
            }
        },
        RemoteCall::CreateAppointment(draft) => match transport.create(&draft).await {
            Ok(created) => BookingEvent::CreateSucceeded(created),
            Err(err) => {
                warn!("error creating appointment: {err}");
                BookingEvent::CreateFailed
            }
        },
        RemoteCall::UpdateAppointment { id, patch } => {
            match transport.update(&id, &patch).await {
                Ok(()) => BookingEvent::UpdateSucceeded,
                Err(err) => {
                    warn!(appointment_id = %id, "error updating appointment: {err}");
                    BookingEvent::UpdateFailed
                }
            }
        }
        RemoteCall::DeleteAppointment(id) => match transport.delete(&id).await {
            Ok(()) => BookingEvent::DeleteSucceeded(id),
            Err(err) => {
                warn!(appointment_id = %id, "error deleting appointment: {err}");
                BookingEvent::DeleteFailed(id)
            }
        },
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
