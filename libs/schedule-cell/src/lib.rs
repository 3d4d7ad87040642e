pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AvailableSlot, ClosedReason, CreateExceptionRequest, CreateWindowRequest, DayCandidates,
    ScheduleException, ScheduleError, UpdateWindowRequest, WeeklyScheduleWindow,
};
pub use services::{ScheduleService, SlotService};
