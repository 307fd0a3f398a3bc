pub mod calendar;
pub mod dates;
pub mod overrides;
pub mod recurrence;
pub mod series;
