use std::env;
use std::path::PathBuf;

/// Credentials for the outbound SMS provider.
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

/// Startup configuration, read once from the environment and handed to
/// Rocket as managed state.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// `None` when any of the Twilio variables is missing.
    pub messaging: Option<MessagingConfig>,
    /// Phone number written into the settings row when it is first created.
    pub default_phone: String,
    pub scheduler_enabled: bool,
}

impl Config {
    pub fn from_env() -> Config {
        let database_path = env::var("RTODO_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rtodo.db"));

        let messaging = match (
            non_empty_var("TWILIO_ACCOUNT_SID"),
            non_empty_var("TWILIO_AUTH_TOKEN"),
            non_empty_var("TWILIO_PHONE_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(MessagingConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let default_phone = non_empty_var("USER_PHONE_NUMBER").unwrap_or_default();

        let scheduler_enabled = !matches!(
            env::var("RTODO_SCHEDULER").as_deref(),
            Ok("off") | Ok("0") | Ok("false") | Ok("no")
        );

        Config {
            database_path,
            messaging,
            default_phone,
            scheduler_enabled,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Config {
        Config {
            database_path: PathBuf::from(":memory:"),
            messaging: None,
            default_phone: "+15550001111".to_string(),
            scheduler_enabled: false,
        }
    }
}
