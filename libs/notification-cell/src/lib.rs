pub mod models;
pub mod services;

pub use models::{BookingNotice, NoticeKind};
pub use services::confirmation::ConfirmationSender;
