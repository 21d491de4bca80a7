//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    perform_remote, AppointmentTransport, AppointmentsClient, BookingEvent, ClientSettings,
    MissingAppointmentTransport, NoticeTimer,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
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
            let transport = connect_transport(&settings, &ui_tx);
            let mut notice_timer = NoticeTimer::new();

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                match cmd {
                    BackendCommand::Remote(call) => {
                        let transport = Arc::clone(&transport);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = perform_remote(transport.as_ref(), call).await;
                            post_booking_event(&ui_tx, outcome);
                        });
                    }
                    BackendCommand::ScheduleNoticeClear { token, after } => {
                        let ui_tx = ui_tx.clone();
                        notice_timer.schedule(after, async move {
                            post_booking_event(&ui_tx, BookingEvent::NoticeExpired(token));
                        });
                    }
                    BackendCommand::CancelNoticeClear => notice_timer.cancel(),
                    BackendCommand::Shutdown => break,
                }
            }

            notice_timer.cancel();
            tracing::info!("backend worker stopped");
        });
    })
}

/// Falls back to a transport that fails every call when the HTTP client
/// cannot be built, so the UI keeps running and reports the problem.
fn connect_transport(
    settings: &ClientSettings,
    ui_tx: &Sender<UiEvent>,
) -> Arc<dyn AppointmentTransport> {
    match AppointmentsClient::with_timeout(settings.server_url.clone(), settings.request_timeout())
    {
        Ok(client) => {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.server_url
            )));
            Arc::new(client)
        }
        Err(err) => {
            tracing::error!("failed to build http client: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: failed to build http client: {err}"),
            )));
            Arc::new(MissingAppointmentTransport)
        }
    }
}

fn post_booking_event(ui_tx: &Sender<UiEvent>, event: BookingEvent) {
    match ui_tx.try_send(UiEvent::Booking(event)) {
        Ok(()) => {}
        Err(TrySendError::Full(dropped)) => {
            tracing::warn!(?dropped, "ui event queue is full; dropping booking event");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event queue closed; dropping booking event");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use client_core::RemoteCall;
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn full_ui_queue_drops_instead_of_blocking() {
        let (ui_tx, ui_rx) = bounded(1);
        let started = Instant::now();
        post_booking_event(&ui_tx, BookingEvent::ListFailed);
        post_booking_event(&ui_tx, BookingEvent::NoticeExpired(7));
        assert!(started.elapsed() < Duration::from_secs(1));

        assert!(matches!(
            ui_rx.try_recv(),
            Ok(UiEvent::Booking(BookingEvent::ListFailed))
        ));
        assert!(ui_rx.try_recv().is_err());
    }

    #[test]
    fn closed_ui_queue_is_tolerated() {
        let (ui_tx, ui_rx) = bounded(1);
        drop(ui_rx);
        post_booking_event(&ui_tx, BookingEvent::ListFailed);
    }

    #[test]
    fn valid_settings_connect_a_live_client() {
        let (ui_tx, ui_rx) = bounded(4);
        let _transport = connect_transport(&ClientSettings::default(), &ui_tx);
        assert!(matches!(
            ui_rx.try_recv(),
            Ok(UiEvent::Info(message)) if message.contains("localhost")
        ));
    }

    #[tokio::test]
    async fn fallback_transport_fails_every_call() {
        let transport: Arc<dyn AppointmentTransport> = Arc::new(MissingAppointmentTransport);
        let outcome = perform_remote(transport.as_ref(), RemoteCall::FetchAppointments).await;
        assert_eq!(outcome, BookingEvent::ListFailed);
    }
}
