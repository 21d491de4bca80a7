//! Client-side booking logic: form validation, the booking state machine,
//! the HTTP transport to the appointment service, and the store that ties
//! them together.

pub mod booking;
pub mod config;
pub mod display;
pub mod error;
pub mod notice;
pub mod store;
pub mod transport;
pub mod validation;

pub use booking::{
    reduce, BookingEvent, BookingState, Effect, Notice, NoticeKind, Phase, RemoteCall,
    Submission, DEFAULT_NOTICE_TTL,
};
pub use config::{load_settings, load_settings_from, normalize_server_url, ClientSettings};
pub use error::{RemoteError, RemoteOperation};
pub use notice::NoticeTimer;
pub use store::{perform_remote, AppointmentStore};
pub use transport::{AppointmentTransport, AppointmentsClient, MissingAppointmentTransport};
pub use validation::{validate, FieldErrors};
