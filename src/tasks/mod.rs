pub mod data;
pub mod endpoints;
pub mod helpers;
pub mod recurrence;
