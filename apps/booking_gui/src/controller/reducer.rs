//! Applies booking events to the page state and turns the resulting effects
//! into backend commands.

use client_core::{reduce, BookingEvent, BookingState, Effect};

use crate::backend_bridge::commands::BackendCommand;

pub fn command_for_effect(effect: Effect) -> BackendCommand {
    match effect {
        Effect::Remote(call) => BackendCommand::Remote(call),
        Effect::ScheduleNoticeClear { token, after } => {
            BackendCommand::ScheduleNoticeClear { token, after }
        }
        Effect::CancelNoticeClear => BackendCommand::CancelNoticeClear,
    }
}

pub fn apply_booking_event(state: &mut BookingState, event: BookingEvent) -> Vec<BackendCommand> {
    reduce(state, event)
        .into_iter()
        .map(command_for_effect)
        .collect()
}
