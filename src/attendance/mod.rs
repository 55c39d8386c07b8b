pub mod error;
pub mod service;
pub mod shift_matcher;

pub use error::AttendanceError;
pub use service::{AttendanceService, ClockInOutcome, ClockOutOutcome};
