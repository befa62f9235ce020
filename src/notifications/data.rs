use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The single row of `notification_settings`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub id: i64,
    pub phone_number: String,
    pub send_daily: bool,
    pub daily_time: NaiveTime,
    pub send_evening: bool,
    pub evening_time: NaiveTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SaveSettingsRequest {
    pub phone_number: String,
    pub send_daily: bool,
    pub daily_time: NaiveTime,
    pub send_evening: bool,
    pub evening_time: NaiveTime,
}

/// Result of one outbound send: the provider's message id on success, the
/// reason otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub success: bool,
    pub detail: String,
}

impl SendOutcome {
    pub fn sent(detail: impl Into<String>) -> SendOutcome {
        SendOutcome {
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> SendOutcome {
        SendOutcome {
            success: false,
            detail: detail.into(),
        }
    }
}
