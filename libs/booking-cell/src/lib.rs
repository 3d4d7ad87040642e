pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    BookAppointmentRequest, BookDiagnosticRequest, Booking, BookingConfirmation, BookingError,
    BookingKind, BookingStatus, UpdateBookingRequest,
};
pub use services::{BookingLedger, BookingService};
