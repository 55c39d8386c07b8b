pub mod format;
pub mod schedule_normalizer;
pub mod time;
pub mod validation;
