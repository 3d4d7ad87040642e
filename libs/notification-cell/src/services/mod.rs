pub mod confirmation;

pub use confirmation::ConfirmationSender;
