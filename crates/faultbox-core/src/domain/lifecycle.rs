//! Application lifecycle types: start records and restart reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted record of application starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecord {
    /// Number of times the application has reached the ready state
    /// against this database.
    pub start_count: u64,
    /// Wall-clock time of the most recent start.
    pub last_started_at: DateTime<Utc>,
}

/// Restart monitor report, served by the actuator endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartInfo {
    pub restart_count: u64,
    pub last_start_time: Option<String>,
    pub application_ready_time: Option<String>,
    /// `HH:MM:SS` since ready, or `"Not started"`.
    pub uptime: String,
    pub current_time: String,
}

/// Format a duration in whole seconds as `HH:MM:SS`.
///
/// Hours are not wrapped at 24.
pub fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(59), "00:00:59");
        assert_eq!(format_uptime(3661), "01:01:01");
        assert_eq!(format_uptime(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn test_restart_info_camel_case() {
        let info = RestartInfo {
            restart_count: 1,
            last_start_time: None,
            application_ready_time: None,
            uptime: "Not started".to_string(),
            current_time: "now".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["restartCount"], 1);
        assert!(json["lastStartTime"].is_null());
        assert_eq!(json["uptime"], "Not started");
    }
}
