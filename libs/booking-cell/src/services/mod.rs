pub mod booking;
pub mod ledger;

pub use booking::BookingService;
pub use ledger::BookingLedger;
