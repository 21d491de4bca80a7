//! UI layer for the booking GUI: app shell and form/list widgets.

pub mod app;
pub mod widgets;

pub use app::BookingApp;
