//! Backend commands queued from UI to backend worker.

use std::time::Duration;

use client_core::RemoteCall;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Remote(RemoteCall),
    ScheduleNoticeClear { token: u64, after: Duration },
    CancelNoticeClear,
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Remote(RemoteCall::FetchAppointments) => "fetch_appointments",
            BackendCommand::Remote(RemoteCall::CreateAppointment(_)) => "create_appointment",
            BackendCommand::Remote(RemoteCall::UpdateAppointment { .. }) => "update_appointment",
            BackendCommand::Remote(RemoteCall::DeleteAppointment(_)) => "delete_appointment",
            BackendCommand::ScheduleNoticeClear { .. } => "schedule_notice_clear",
            BackendCommand::CancelNoticeClear => "cancel_notice_clear",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
