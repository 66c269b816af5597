use crate::clock::{DEFAULT_OFFSET_HOURS, offset_from_hours};
use chrono::{FixedOffset, Offset, Utc};
use std::{env, fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CLIENT_ID: &str = "YOUR_CLIENT_ID_HERE";
pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_CLOCK_REFRESH_SECS: u64 = 60;
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct FormConfig {
    pub api_base: String,
    pub client_id: String,
    pub port: u16,
    pub clock_offset: FixedOffset,
    pub clock_refresh: Duration,
    pub api_timeout: Duration,
}

impl FormConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let offset_hours = load(&lookup, "CLOCK_UTC_OFFSET_HOURS", DEFAULT_OFFSET_HOURS);
        let clock_offset = offset_from_hours(offset_hours).unwrap_or_else(|| {
            warn!("CLOCK_UTC_OFFSET_HOURS={offset_hours} is out of range, using {DEFAULT_OFFSET_HOURS}");
            default_offset()
        });

        Self {
            api_base: load(&lookup, "ATTENDANCE_API_BASE", DEFAULT_API_BASE.to_string()),
            client_id: load(&lookup, "GOOGLE_CLIENT_ID", DEFAULT_CLIENT_ID.to_string()),
            port: load(&lookup, "PORT", DEFAULT_PORT),
            clock_offset,
            clock_refresh: Duration::from_secs(
                load(&lookup, "CLOCK_REFRESH_SECS", DEFAULT_CLOCK_REFRESH_SECS).max(1),
            ),
            api_timeout: Duration::from_secs(
                load(&lookup, "API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS).max(1),
            ),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn default_offset() -> FixedOffset {
    offset_from_hours(DEFAULT_OFFSET_HOURS).unwrap_or_else(|| Utc.fix())
}

fn load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key).map(|raw| raw.trim().to_string()) {
        Some(raw) if !raw.is_empty() => raw.parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?}: {err}, using default: {default}");
            default
        }),
        _ => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
