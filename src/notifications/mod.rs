pub mod data;
pub mod dispatch;
pub mod endpoints;
pub mod helpers;
pub mod messages;
pub mod scheduler;
pub mod sms;
